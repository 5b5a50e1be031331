use crate::core::contribution::Contribution;

/*-------------------------------------------------------------------------------------------------
  Built-in Required Ranges
-------------------------------------------------------------------------------------------------*/

/// Salesforce IP addresses and ranges that must always be allowlisted, independent of the
/// published Hyperforce ranges document.
pub const STATIC_CIDRS: [&str; 37] = [
    "3.228.190.251/32",
    "34.206.116.149/32",
    "35.174.143.92/32",
    "52.203.77.201/32",
    "54.156.107.163/32",
    "54.158.77.4/32",
    "54.163.166.54/32",
    "54.83.60.38/32",
    "107.21.202.122/32",
    "3.225.151.145/32",
    "3.225.240.254/32",
    "18.204.28.162/32",
    "18.211.105.61/32",
    "34.197.58.108/32",
    "34.204.111.166/32",
    "52.3.16.30/32",
    "52.22.251.194/32",
    "52.70.135.185/32",
    "155.226.144.0/22",
    "155.226.156.0/23",
    "155.226.128.0/21",
    "3.146.43.224/28",
    "13.56.32.176/28",
    "13.58.135.64/28",
    "13.108.0.0/14",
    "34.211.108.32/28",
    "34.226.36.48/28",
    "35.182.14.32/28",
    "66.231.80.0/20",
    "68.232.192.0/20",
    "96.43.144.0/20",
    "128.17.0.0/16",
    "128.245.0.0/16",
    "136.146.0.0/15",
    "198.245.80.0/20",
    "199.122.120.0/21",
    "204.14.232.0/21",
];

/// The built-in required ranges, verbatim and in order.
pub fn static_cidrs() -> &'static [&'static str] {
    &STATIC_CIDRS
}

/// Label used for the built-in ranges in logs and reports.
pub const SOURCE_LABEL: &str = "built-in";

/// Wrap a built-in CIDR list as a (always healthy) [Contribution].
pub fn static_contribution<S: AsRef<str>>(static_cidrs: &[S]) -> Contribution {
    Contribution::ok(
        SOURCE_LABEL,
        static_cidrs
            .iter()
            .map(|cidr| cidr.as_ref().to_string())
            .collect(),
    )
}

/*-------------------------------------------------------------------------------------------------
  Unit Tests
-------------------------------------------------------------------------------------------------*/

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::network::{parse_network, to_networks};

    #[test]
    fn test_static_cidrs_parse() {
        for cidr in STATIC_CIDRS {
            let network = parse_network(cidr).unwrap();
            // Already canonical
            assert_eq!(network.to_string(), cidr);
        }
        assert_eq!(to_networks(static_cidrs()).len(), static_cidrs().len());
    }

    #[test]
    fn test_static_contribution_is_verbatim() {
        let contribution = static_contribution(&STATIC_CIDRS);
        assert!(!contribution.is_degraded());
        assert_eq!(contribution.source, SOURCE_LABEL);
        assert_eq!(contribution.ranges, STATIC_CIDRS.to_vec());
    }
}
