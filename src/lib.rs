//! Check that the Salesforce IP ranges required by Hyperforce are covered by the
//! allowlists of a pair of CloudHub load balancers.
//!
//! The required ranges are a built-in list plus the `aws` prefixes of selected regions from
//! the published Salesforce IP ranges document. The allowlists are read with the Anypoint
//! CLI. The check is read-only: it reports the required ranges that are missing and
//! never changes a load balancer.
//!
//! ```no_run
//! let credentials = cidrcheck::Credentials::from_env().expect("ANYPOINT_* variables");
//! for cidr in cidrcheck::run_check(&credentials) {
//!     println!("{cidr}");
//! }
//! ```

/*-------------------------------------------------------------------------------------------------
  Modules
-------------------------------------------------------------------------------------------------*/

mod core;
pub mod server;

/*-------------------------------------------------------------------------------------------------
  Library Interface
-------------------------------------------------------------------------------------------------*/

pub use crate::core::allowlist::{split_allowlist, AllowlistLookup, AnypointCli};
pub use crate::core::builtin::{static_cidrs, STATIC_CIDRS};
pub use crate::core::check::{run_check, CheckReport, Checker};
pub use crate::core::client::{Client, ClientBuilder, RequiredRangeSource};
pub use crate::core::config::{CheckConfig, Credentials};
pub use crate::core::contribution::{Contribution, SourceStatus};
pub use crate::core::coverage::{evaluate, find_covering, find_missing, is_covered, Coverage};
pub use crate::core::errors::{Error, Result};
pub use crate::core::filter::RegionFilter;
pub use crate::core::network::{parse_network, to_networks};
