use crate::core::contribution::Contribution;
use crate::core::errors::{log_error, Error, Result};
use crate::core::filter::RegionFilter;
use crate::core::json;
use log::{info, warn};
use std::env;
use std::time::Duration;

/*-------------------------------------------------------------------------------------------------
  Required Range Source
-------------------------------------------------------------------------------------------------*/

/// A provider of required ranges. Implementations never fail: any error is reported as a
/// degraded [Contribution] carrying no ranges.
pub trait RequiredRangeSource {
    fn required_ranges(&self) -> Contribution;
}

/*-------------------------------------------------------------------------------------------------
  Client Builder
-------------------------------------------------------------------------------------------------*/

/// A builder for the [Client] struct that allows you to customize the client configuration.
///
/// ```
/// let client = cidrcheck::ClientBuilder::new()
///     .url("https://ip-ranges.salesforce.com/ip-ranges.json")
///     .timeout(30) // 30 seconds
///     .build();
/// ```
///
/// The [ClientBuilder::new] method attempts to source configuration values from environment
/// variables when set and uses default values when the environment variables are not set.
/// Use [ClientBuilder::default] to ignore the environment.
#[derive(Debug, Clone)]
pub struct ClientBuilder {
    url: String,
    timeout: u64,
    filter: RegionFilter,
}

/*--------------------------------------------------------------------------------------
  Client Builder Implementation
--------------------------------------------------------------------------------------*/

impl Default for ClientBuilder {
    /// Create a new [ClientBuilder] with default configuration values.
    ///
    /// ```
    /// let client = cidrcheck::ClientBuilder::default().build();
    ///
    /// assert_eq!(client.url(), "https://ip-ranges.salesforce.com/ip-ranges.json");
    /// assert_eq!(client.timeout(), 15);
    /// ```
    fn default() -> Self {
        Self {
            url: "https://ip-ranges.salesforce.com/ip-ranges.json".to_string(),
            timeout: 15, // 15 seconds
            filter: RegionFilter::default(),
        }
    }
}

impl ClientBuilder {
    /// Create a new [ClientBuilder] reading initial configuration values from
    /// environment variables when set and default values when the environment
    /// variables are not set.
    ///
    /// The environment variables used to set the initial configuration values
    /// are:
    /// - `CIDRCHECK_URL`
    /// - `CIDRCHECK_TIMEOUT`
    pub fn new() -> Self {
        let default = ClientBuilder::default();

        Self {
            url: get_env_var("CIDRCHECK_URL", default.url),
            timeout: get_env_var("CIDRCHECK_TIMEOUT", default.timeout),
            filter: default.filter,
        }
    }

    /*-------------------------------------------------------------------------
      Setters
    -------------------------------------------------------------------------*/

    /// Set the URL used to retrieve the Salesforce IP ranges; defaults to
    /// `https://ip-ranges.salesforce.com/ip-ranges.json`.
    pub fn url<'s>(&'s mut self, url: &str) -> &'s mut Self {
        self.url = url.to_string();
        self
    }

    /// Set the request timeout in seconds; defaults to `15` seconds.
    pub fn timeout(&mut self, timeout: u64) -> &mut Self {
        self.timeout = timeout;
        self
    }

    /// Set the filter selecting which document entries contribute required ranges;
    /// defaults to provider `aws` in `us-east-1`, `us-east-2`, and `us-west-2`.
    pub fn filter(&mut self, filter: RegionFilter) -> &mut Self {
        self.filter = filter;
        self
    }

    /*-------------------------------------------------------------------------
      Build Method
    -------------------------------------------------------------------------*/

    pub fn build(&self) -> Client {
        Client {
            url: self.url.clone(),
            timeout: self.timeout,
            filter: self.filter.clone(),
        }
    }
}

/*-------------------------------------------------------------------------------------------------
  Client
-------------------------------------------------------------------------------------------------*/

/// A client for retrieving the required Hyperforce prefixes from the Salesforce IP ranges
/// document. Every call performs exactly one request; nothing is cached and failed
/// requests are not retried.
///
/// ```no_run
/// use cidrcheck::RequiredRangeSource;
///
/// let client = cidrcheck::Client::new();
/// let contribution = client.required_ranges();
/// println!("{contribution}");
/// ```
#[derive(Debug, Clone)]
pub struct Client {
    url: String,
    timeout: u64,
    filter: RegionFilter,
}

/*--------------------------------------------------------------------------------------
  Client Implementation
--------------------------------------------------------------------------------------*/

impl Default for Client {
    fn default() -> Self {
        ClientBuilder::default().build()
    }
}

impl Client {
    pub fn new() -> Self {
        ClientBuilder::new().build()
    }

    /*-------------------------------------------------------------------------
      Getters
    -------------------------------------------------------------------------*/

    /// Get the URL used to retrieve the Salesforce IP ranges.
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Get the request timeout in seconds.
    pub fn timeout(&self) -> u64 {
        self.timeout
    }

    pub fn filter(&self) -> &RegionFilter {
        &self.filter
    }

    /*-------------------------------------------------------------------------
      Get Prefixes
    -------------------------------------------------------------------------*/

    /// Retrieve the IP ranges document and return the `ip_prefix` strings of every entry
    /// accepted by the client's [RegionFilter], in document order.
    pub fn get_prefixes(&self) -> Result<Vec<String>> {
        let json = self.get_json()?;
        let json_ip_ranges = json::parse(&json)?;

        if let Some(create_date) = &json_ip_ranges.create_date {
            info!("Salesforce IP ranges published: {create_date}");
        }

        Ok(self.filter.collect_prefixes(&json_ip_ranges.prefixes))
    }

    /// Get the IP ranges JSON from the URL.
    pub fn get_json(&self) -> Result<String> {
        info!("Get Salesforce IP ranges: GET {}", self.url);

        reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(self.timeout))
            .build()
            .map_err(Error::from)
            .and_then(|client| client.get(&self.url).send().map_err(Error::from))
            .and_then(|response| response.error_for_status().map_err(Error::from))
            .and_then(|response| response.text().map_err(Error::from))
            .and_then(validate_json)
    }
}

impl RequiredRangeSource for Client {
    fn required_ranges(&self) -> Contribution {
        match self.get_prefixes() {
            Ok(prefixes) => {
                info!(
                    "Loaded {} Hyperforce {} CIDRs ({}) from JSON",
                    prefixes.len(),
                    self.filter.provider,
                    self.filter
                        .regions
                        .iter()
                        .cloned()
                        .collect::<Vec<String>>()
                        .join(", ")
                );
                Contribution::ok(&self.url, prefixes)
            }
            Err(error) => {
                log::error!("Failed to fetch Salesforce IP ranges from {}", self.url);
                log_error(&error);
                Contribution::degraded(&self.url, error.to_string())
            }
        }
    }
}

/*-------------------------------------------------------------------------------------------------
  Helper Functions
-------------------------------------------------------------------------------------------------*/

/// Get and parse an environment variable value or return a default value.
pub(crate) fn get_env_var<T: std::str::FromStr>(env_var: &str, default: T) -> T {
    env::var(env_var)
        .ok()
        .and_then(|value| {
            value
                .parse::<T>()
                .inspect(|_| info!("Using {}: {}", env_var, value))
                .inspect_err(|_| warn!("Invalid {}: {}", env_var, value))
                .ok()
        })
        .unwrap_or(default)
}

/// Validate a string contains parsable JSON.
fn validate_json(json: String) -> Result<String> {
    serde_json::from_str::<serde::de::IgnoredAny>(&json)
        .and(Ok(json))
        .or(Err("Invalid JSON".into()))
}

/*-------------------------------------------------------------------------------------------------
  Unit Tests
-------------------------------------------------------------------------------------------------*/
