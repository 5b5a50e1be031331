use crate::core::json::JsonIpPrefix;
use log::trace;
use std::collections::BTreeSet;

/*-------------------------------------------------------------------------------------------------
  Region Filter
-------------------------------------------------------------------------------------------------*/

/// Default provider tag for Hyperforce prefixes hosted on AWS.
pub const DEFAULT_PROVIDER: &str = "aws";

/// Default regions whose Hyperforce prefixes must be allowlisted.
pub const DEFAULT_REGIONS: [&str; 3] = ["us-east-1", "us-east-2", "us-west-2"];

/// Selects the entries of the Salesforce IP ranges document that contribute required
/// ranges: an entry is included when its `provider` equals [RegionFilter::provider] and its
/// `region` is one of [RegionFilter::regions].
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct RegionFilter {
    pub provider: String,
    pub regions: BTreeSet<String>,
}

/*--------------------------------------------------------------------------------------
  Region Filter Implementation
--------------------------------------------------------------------------------------*/

impl Default for RegionFilter {
    fn default() -> Self {
        Self::new(DEFAULT_PROVIDER, DEFAULT_REGIONS)
    }
}

impl RegionFilter {
    pub fn new<I, S>(provider: &str, regions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            provider: provider.to_string(),
            regions: regions
                .into_iter()
                .map(|region| region.as_ref().to_string())
                .collect(),
        }
    }

    /// Determine if an IP ranges document entry should be included.
    pub fn include_prefix(&self, prefix: &JsonIpPrefix) -> bool {
        let include = match (prefix.provider.as_deref(), prefix.region.as_deref()) {
            (Some(provider), Some(region)) => {
                provider == self.provider && self.regions.contains(region)
            }
            _ => false,
        };

        trace!(
            "Entry provider={:?} region={:?} included={include}",
            prefix.provider,
            prefix.region
        );

        include
    }

    /// Concatenate the `ip_prefix` lists of all included entries, preserving document order.
    pub fn collect_prefixes<'p, I>(&self, prefixes: I) -> Vec<String>
    where
        I: IntoIterator<Item = &'p JsonIpPrefix>,
    {
        prefixes
            .into_iter()
            .filter(|prefix| self.include_prefix(prefix))
            .flat_map(|prefix| prefix.ip_prefix.iter().cloned())
            .collect()
    }
}

/*-------------------------------------------------------------------------------------------------
  Unit Tests
-------------------------------------------------------------------------------------------------*/
