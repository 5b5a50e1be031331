use crate::core::builtin::static_cidrs;
use log::warn;
use std::env;
use std::fmt;

/*-------------------------------------------------------------------------------------------------
  Credentials
-------------------------------------------------------------------------------------------------*/

pub const ORG_ENV_VAR: &str = "ANYPOINT_ORG";
pub const CLIENT_ID_ENV_VAR: &str = "ANYPOINT_CLIENT_ID";
pub const CLIENT_SECRET_ENV_VAR: &str = "ANYPOINT_CLIENT_SECRET";

/// Anypoint Platform organization and connected-app credentials used to describe the load
/// balancers. The `Debug` output never includes the client secret.
#[derive(Clone, Eq, PartialEq)]
pub struct Credentials {
    pub org_id: String,
    pub client_id: String,
    pub client_secret: String,
}

impl Credentials {
    /// Build credentials when all three values are present and non-empty.
    pub fn new<S: Into<String>>(org_id: S, client_id: S, client_secret: S) -> Option<Self> {
        let credentials = Self {
            org_id: org_id.into(),
            client_id: client_id.into(),
            client_secret: client_secret.into(),
        };

        let complete = !credentials.org_id.is_empty()
            && !credentials.client_id.is_empty()
            && !credentials.client_secret.is_empty();

        complete.then_some(credentials)
    }

    /// Read credentials from `ANYPOINT_ORG`, `ANYPOINT_CLIENT_ID`, and
    /// `ANYPOINT_CLIENT_SECRET`. Returns `None` if any of them is unset or empty.
    pub fn from_env() -> Option<Self> {
        let value = |env_var: &str| {
            env::var(env_var)
                .inspect_err(|_| warn!("{env_var} is not set"))
                .ok()
        };

        Self::new(
            value(ORG_ENV_VAR)?,
            value(CLIENT_ID_ENV_VAR)?,
            value(CLIENT_SECRET_ENV_VAR)?,
        )
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("org_id", &self.org_id)
            .field("client_id", &self.client_id)
            .field("client_secret", &"<redacted>")
            .finish()
    }
}

/*-------------------------------------------------------------------------------------------------
  Check Configuration
-------------------------------------------------------------------------------------------------*/

/// Default load balancers whose allowlists are checked.
pub const DEFAULT_LOAD_BALANCERS: [&str; 2] = ["isc2", "isc2-np"];

/// Inputs of a check run that do not come from a remote source.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct CheckConfig {
    /// Required ranges compiled into the check, placed ahead of the fetched ranges.
    pub static_cidrs: Vec<String>,

    /// Load balancers described, in order, to build the allowlist.
    pub load_balancers: Vec<String>,
}

impl Default for CheckConfig {
    fn default() -> Self {
        Self {
            static_cidrs: static_cidrs()
                .iter()
                .map(|cidr| cidr.to_string())
                .collect(),
            load_balancers: DEFAULT_LOAD_BALANCERS
                .iter()
                .map(|name| name.to_string())
                .collect(),
        }
    }
}

/*-------------------------------------------------------------------------------------------------
  Unit Tests
-------------------------------------------------------------------------------------------------*/

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_credentials_require_every_value() {
        assert!(Credentials::new("org", "id", "secret").is_some());
        assert!(Credentials::new("", "id", "secret").is_none());
        assert!(Credentials::new("org", "", "secret").is_none());
        assert!(Credentials::new("org", "id", "").is_none());
    }

    #[test]
    fn test_credentials_debug_redacts_secret() {
        let credentials = Credentials::new("org", "id", "hunter2").unwrap();
        let debug = format!("{credentials:?}");
        assert!(debug.contains("org"));
        assert!(!debug.contains("hunter2"));
    }

    /// ENV_VAR: ANYPOINT_ORG
    /// ENV_VAR: ANYPOINT_CLIENT_ID
    /// ENV_VAR: ANYPOINT_CLIENT_SECRET
    #[test]
    fn test_credentials_from_env() {
        let env_vars = [ORG_ENV_VAR, CLIENT_ID_ENV_VAR, CLIENT_SECRET_ENV_VAR];
        let stored_env_vars: Vec<(&str, Option<String>)> = env_vars
            .iter()
            .map(|env_var| (*env_var, env::var(env_var).ok()))
            .collect();

        env::set_var(ORG_ENV_VAR, "my-org");
        env::set_var(CLIENT_ID_ENV_VAR, "my-client");
        env::set_var(CLIENT_SECRET_ENV_VAR, "my-secret");
        assert_eq!(
            Credentials::from_env(),
            Credentials::new("my-org", "my-client", "my-secret")
        );

        env::remove_var(ORG_ENV_VAR);
        assert_eq!(Credentials::from_env(), None);

        env::set_var(ORG_ENV_VAR, "");
        assert_eq!(Credentials::from_env(), None);

        for (env_var, value) in stored_env_vars {
            match value {
                Some(value) => env::set_var(env_var, value),
                None => env::remove_var(env_var),
            }
        }
    }

    #[test]
    fn test_default_check_config() {
        let config = CheckConfig::default();
        assert_eq!(config.static_cidrs, static_cidrs());
        assert_eq!(config.load_balancers, vec!["isc2", "isc2-np"]);
    }
}
