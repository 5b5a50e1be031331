use crate::core::client::get_env_var;
use crate::core::config::Credentials;
use crate::core::errors::Result;
use log::{debug, trace, warn};
use std::process::Command;

/*-------------------------------------------------------------------------------------------------
  Allowlist Lookup
-------------------------------------------------------------------------------------------------*/

/// Retrieves the allowlisted addresses and CIDRs configured on a named load balancer.
///
/// An `Err` (or an empty list) means the load balancer contributes nothing to the
/// allowlist for this run; the other load balancers are still looked up.
pub trait AllowlistLookup {
    fn lookup(&self, resource: &str, credentials: &Credentials) -> Result<Vec<String>>;
}

/*-------------------------------------------------------------------------------------------------
  Anypoint CLI
-------------------------------------------------------------------------------------------------*/

/// Field of `anypoint-cli cloudhub load-balancer describe --output json` holding the
/// comma-separated allowlist.
pub const ALLOWLIST_FIELD: &str = "Allowlisted IPs";

/// [AllowlistLookup] backed by the Anypoint CLI:
///
/// `anypoint-cli cloudhub load-balancer describe <name> --organization <org>
/// --client_id <id> --client_secret <secret> --output json`
///
/// The command has no timeout; a hung CLI blocks the check that invoked it.
#[derive(Debug, Clone)]
pub struct AnypointCli {
    program: String,
}

impl Default for AnypointCli {
    fn default() -> Self {
        Self {
            program: "anypoint-cli".to_string(),
        }
    }
}

impl AnypointCli {
    /// Create an [AnypointCli] using the program named by `CIDRCHECK_ANYPOINT_CLI`, or
    /// `anypoint-cli` from the `PATH` when the variable is not set.
    pub fn new() -> Self {
        let default = AnypointCli::default();
        Self {
            program: get_env_var("CIDRCHECK_ANYPOINT_CLI", default.program),
        }
    }

    pub fn with_program<S: Into<String>>(program: S) -> Self {
        Self {
            program: program.into(),
        }
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    /// Build the describe command for one load balancer.
    pub fn command(&self, resource: &str, credentials: &Credentials) -> Command {
        let mut command = Command::new(&self.program);
        command
            .args(["cloudhub", "load-balancer", "describe", resource])
            .args(["--organization", &credentials.org_id])
            .args(["--client_id", &credentials.client_id])
            .args(["--client_secret", &credentials.client_secret])
            .args(["--output", "json"]);
        command
    }
}

impl AllowlistLookup for AnypointCli {
    fn lookup(&self, resource: &str, credentials: &Credentials) -> Result<Vec<String>> {
        debug!("Describe load balancer `{resource}` with {}", self.program);

        let output = self
            .command(resource, credentials)
            .output()
            .map_err(|error| format!("Failed to run {}: {}", self.program, error))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            trace!("{} stderr:\n{}", self.program, stderr);
            return Err(format!(
                "Anypoint CLI error for `{resource}` ({}): {}",
                output.status,
                stderr.trim()
            )
            .into());
        }

        let stdout = String::from_utf8(output.stdout)?;
        let allowlist = parse_describe_output(&stdout)?;
        if allowlist.is_empty() {
            warn!("No allowlisted IPs found for `{resource}`");
        }

        Ok(allowlist)
    }
}

/*-------------------------------------------------------------------------------------------------
  Helper Functions
-------------------------------------------------------------------------------------------------*/

/// Extract the allowlist from the load balancer description JSON. An absent or empty
/// [ALLOWLIST_FIELD] yields an empty list.
pub fn parse_describe_output(json: &str) -> Result<Vec<String>> {
    let description: serde_json::Value = serde_json::from_str(json)?;

    Ok(description
        .get(ALLOWLIST_FIELD)
        .and_then(serde_json::Value::as_str)
        .map(split_allowlist)
        .unwrap_or_default())
}

/// Split a comma-separated allowlist into trimmed, non-empty entries.
pub fn split_allowlist(allowlist: &str) -> Vec<String> {
    allowlist
        .split(',')
        .map(str::trim)
        .filter(|entry| !entry.is_empty())
        .map(String::from)
        .collect()
}

/*-------------------------------------------------------------------------------------------------
  Unit Tests
-------------------------------------------------------------------------------------------------*/

#[cfg(test)]
mod tests {
    use super::*;
    use test_log::test;

    fn test_credentials() -> Credentials {
        Credentials::new("my-org", "my-client", "my-secret").unwrap()
    }

    /*----------------------------------------------------------------------------------
      Parsing
    ----------------------------------------------------------------------------------*/

    #[test]
    fn test_split_allowlist() {
        assert_eq!(
            split_allowlist(" 10.0.0.0/24, 52.3.16.30 ,,  ,13.108.0.0/14"),
            vec!["10.0.0.0/24", "52.3.16.30", "13.108.0.0/14"]
        );
        assert!(split_allowlist("").is_empty());
        assert!(split_allowlist(" , ").is_empty());
    }

    #[test]
    fn test_parse_describe_output() {
        let json = r#"{
          "Name": "isc2",
          "Allowlisted IPs": "10.0.0.0/24, 52.3.16.30"
        }"#;
        assert_eq!(
            parse_describe_output(json).unwrap(),
            vec!["10.0.0.0/24", "52.3.16.30"]
        );
    }

    #[test]
    fn test_parse_describe_output_without_allowlist() {
        assert!(parse_describe_output(r#"{"Name": "isc2"}"#).unwrap().is_empty());
        assert!(parse_describe_output(r#"{"Allowlisted IPs": ""}"#).unwrap().is_empty());
        assert!(parse_describe_output(r#"{"Allowlisted IPs": null}"#).unwrap().is_empty());
        assert!(parse_describe_output("Error: unauthorized").is_err());
    }

    /*----------------------------------------------------------------------------------
      Command
    ----------------------------------------------------------------------------------*/

    #[test]
    fn test_command_arguments() {
        let cli = AnypointCli::default();
        let command = cli.command("isc2-np", &test_credentials());

        assert_eq!(command.get_program(), "anypoint-cli");
        let args: Vec<&std::ffi::OsStr> = command.get_args().collect();
        assert_eq!(
            args,
            vec![
                "cloudhub",
                "load-balancer",
                "describe",
                "isc2-np",
                "--organization",
                "my-org",
                "--client_id",
                "my-client",
                "--client_secret",
                "my-secret",
                "--output",
                "json",
            ]
        );
    }

    #[test]
    fn test_missing_program_fails() {
        let cli = AnypointCli::with_program("./scratch/no-such-anypoint-cli");
        let result = cli.lookup("isc2", &test_credentials());
        assert!(result.is_err());
    }
}
