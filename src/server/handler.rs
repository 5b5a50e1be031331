use crate::core::config::Credentials;
use hyper::{Method, StatusCode};
use log::debug;
use serde::{Deserialize, Serialize};

/*-------------------------------------------------------------------------------------------------
  Request Handling
-------------------------------------------------------------------------------------------------*/

/// The single route served by the check service.
pub const ROUTE: &str = "/check-cidrs";

/// A request refused before a check runs.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Rejection {
    pub status: StatusCode,
    pub message: &'static str,
}

impl Rejection {
    const fn new(status: StatusCode, message: &'static str) -> Self {
        Self { status, message }
    }

    pub fn body(&self) -> ErrorBody {
        ErrorBody {
            error: self.message,
        }
    }
}

pub const NOT_FOUND: Rejection = Rejection::new(StatusCode::NOT_FOUND, "Not found");
pub const METHOD_NOT_ALLOWED: Rejection =
    Rejection::new(StatusCode::METHOD_NOT_ALLOWED, "Method not allowed");
pub const MISSING_CREDENTIALS: Rejection =
    Rejection::new(StatusCode::BAD_REQUEST, "Missing credentials");
pub const SERVER_MISSING_CREDENTIALS: Rejection = Rejection::new(
    StatusCode::INTERNAL_SERVER_ERROR,
    "Server is missing credentials for GET",
);
pub const CHECK_FAILED: Rejection =
    Rejection::new(StatusCode::INTERNAL_SERVER_ERROR, "Check failed");

/// Resolve the credentials for a request, or the [Rejection] to answer with.
///
/// - `POST` reads `orgId`, `clientId`, and `clientSecret` from the JSON body.
/// - `GET` uses the credentials the server was configured with.
pub fn authorize(
    method: &Method,
    path: &str,
    body: &[u8],
    server_credentials: Option<&Credentials>,
) -> Result<Credentials, Rejection> {
    if path != ROUTE {
        return Err(NOT_FOUND);
    }

    match *method {
        Method::POST => {
            let body: CredentialsBody = serde_json::from_slice(body)
                .inspect_err(|error| debug!("Unreadable request body: {error}"))
                .unwrap_or_default();

            match (body.org_id, body.client_id, body.client_secret) {
                (Some(org_id), Some(client_id), Some(client_secret)) => {
                    Credentials::new(org_id, client_id, client_secret).ok_or(MISSING_CREDENTIALS)
                }
                _ => Err(MISSING_CREDENTIALS),
            }
        }
        Method::GET => server_credentials.cloned().ok_or(SERVER_MISSING_CREDENTIALS),
        _ => Err(METHOD_NOT_ALLOWED),
    }
}

/*-------------------------------------------------------------------------------------------------
  Request and Response Bodies
-------------------------------------------------------------------------------------------------*/

/// `POST` request body. A `null` body is treated as an empty object.
#[derive(Debug, Default, Deserialize)]
struct CredentialsBody {
    #[serde(rename = "orgId", default)]
    org_id: Option<String>,

    #[serde(rename = "clientId", default)]
    client_id: Option<String>,

    #[serde(rename = "clientSecret", default)]
    client_secret: Option<String>,
}

#[derive(Debug, Eq, PartialEq, Serialize)]
pub struct ErrorBody {
    pub error: &'static str,
}

#[derive(Debug, Eq, PartialEq, Serialize)]
pub struct MissingCidrsBody {
    pub missing_cidrs: Vec<String>,
}

/*-------------------------------------------------------------------------------------------------
  Unit Tests
-------------------------------------------------------------------------------------------------*/

#[cfg(test)]
mod tests {
    use super::*;

    fn server_credentials() -> Credentials {
        Credentials::new("env-org", "env-client", "env-secret").unwrap()
    }

    /*----------------------------------------------------------------------------------
      POST
    ----------------------------------------------------------------------------------*/

    #[test]
    fn test_post_credentials() {
        let body = br#"{"orgId": "org", "clientId": "client", "clientSecret": "secret"}"#;
        assert_eq!(
            authorize(&Method::POST, ROUTE, body, None),
            Ok(Credentials::new("org", "client", "secret").unwrap())
        );
    }

    #[test]
    fn test_post_ignores_server_credentials() {
        let body = br#"{"orgId": "org", "clientId": "client"}"#;
        assert_eq!(
            authorize(&Method::POST, ROUTE, body, Some(&server_credentials())),
            Err(MISSING_CREDENTIALS)
        );
    }

    #[test]
    fn test_post_missing_client_secret() {
        let body = br#"{"orgId": "org", "clientId": "client"}"#;
        let rejection = authorize(&Method::POST, ROUTE, body, None).unwrap_err();
        assert_eq!(rejection.status, StatusCode::BAD_REQUEST);
        assert_eq!(
            serde_json::to_string(&rejection.body()).unwrap(),
            r#"{"error":"Missing credentials"}"#
        );
    }

    #[test]
    fn test_post_empty_or_invalid_body() {
        let bodies: [&[u8]; 5] = [
            b"",
            b"null",
            b"{}",
            b"not json",
            br#"{"orgId": "", "clientId": "c", "clientSecret": "s"}"#,
        ];
        for body in bodies {
            assert_eq!(
                authorize(&Method::POST, ROUTE, body, None),
                Err(MISSING_CREDENTIALS)
            );
        }
    }

    /*----------------------------------------------------------------------------------
      GET
    ----------------------------------------------------------------------------------*/

    #[test]
    fn test_get_uses_server_credentials() {
        assert_eq!(
            authorize(&Method::GET, ROUTE, b"", Some(&server_credentials())),
            Ok(server_credentials())
        );
    }

    #[test]
    fn test_get_without_server_credentials() {
        let rejection = authorize(&Method::GET, ROUTE, b"", None).unwrap_err();
        assert_eq!(rejection.status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(rejection.message, "Server is missing credentials for GET");
    }

    /*----------------------------------------------------------------------------------
      Routing
    ----------------------------------------------------------------------------------*/

    #[test]
    fn test_unknown_path_and_method() {
        assert_eq!(
            authorize(&Method::GET, "/", b"", Some(&server_credentials())),
            Err(NOT_FOUND)
        );
        assert_eq!(
            authorize(&Method::DELETE, ROUTE, b"", Some(&server_credentials())),
            Err(METHOD_NOT_ALLOWED)
        );
    }

    #[test]
    fn test_missing_cidrs_body() {
        let body = MissingCidrsBody {
            missing_cidrs: vec!["10.0.0.1/32".to_string()],
        };
        assert_eq!(
            serde_json::to_string(&body).unwrap(),
            r#"{"missing_cidrs":["10.0.0.1/32"]}"#
        );

        let empty = MissingCidrsBody {
            missing_cidrs: vec![],
        };
        assert_eq!(serde_json::to_string(&empty).unwrap(), r#"{"missing_cidrs":[]}"#);
    }
}
