use crate::core::network::{is_host, is_subnet_of};
use ipnetwork::IpNetwork;

/*-------------------------------------------------------------------------------------------------
  Coverage Evaluator
-------------------------------------------------------------------------------------------------*/

/// Find the first allowlist network covering `required`.
///
/// An allowlist network covers a required network when the required network is a single
/// address inside it, is equal to it, or is one of its subnets. Networks of different
/// address families never cover each other.
pub fn find_covering<'a>(
    required: &IpNetwork,
    allowlist: &'a [IpNetwork],
) -> Option<&'a IpNetwork> {
    allowlist.iter().find(|allowed| {
        (is_host(required) && allowed.contains(required.network()))
            || *allowed == required
            || is_subnet_of(*required, **allowed)
    })
}

/// Determine if any allowlist network covers `required`; see [find_covering].
///
/// ```
/// let allowlist: Vec<ipnetwork::IpNetwork> = vec!["10.0.0.0/24".parse().unwrap()];
///
/// assert!(cidrcheck::is_covered(&"10.0.0.5/32".parse().unwrap(), &allowlist));
/// assert!(!cidrcheck::is_covered(&"10.0.1.5/32".parse().unwrap(), &allowlist));
/// ```
pub fn is_covered(required: &IpNetwork, allowlist: &[IpNetwork]) -> bool {
    find_covering(required, allowlist).is_some()
}

/// Canonical strings of the required networks not covered by the allowlist, in input
/// order. Duplicate required networks produce duplicate entries.
pub fn find_missing(required: &[IpNetwork], allowlist: &[IpNetwork]) -> Vec<String> {
    required
        .iter()
        .filter(|network| !is_covered(network, allowlist))
        .map(|network| network.to_string())
        .collect()
}

/*-------------------------------------------------------------------------------------------------
  Coverage Details
-------------------------------------------------------------------------------------------------*/

/// Coverage of one required network.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Coverage {
    pub required: IpNetwork,

    /// First allowlist network covering [Coverage::required], if any.
    pub covered_by: Option<IpNetwork>,
}

impl Coverage {
    pub fn is_covered(&self) -> bool {
        self.covered_by.is_some()
    }
}

/// Evaluate every required network against the allowlist, in input order.
pub fn evaluate(required: &[IpNetwork], allowlist: &[IpNetwork]) -> Vec<Coverage> {
    required
        .iter()
        .map(|network| Coverage {
            required: *network,
            covered_by: find_covering(network, allowlist).copied(),
        })
        .collect()
}

/*-------------------------------------------------------------------------------------------------
  Unit Tests
-------------------------------------------------------------------------------------------------*/

#[cfg(test)]
mod tests {
    use super::*;

    fn net(value: &str) -> IpNetwork {
        value.parse().unwrap()
    }

    fn nets(values: &[&str]) -> Vec<IpNetwork> {
        values.iter().map(|value| net(value)).collect()
    }

    /*----------------------------------------------------------------------------------
      is_covered
    ----------------------------------------------------------------------------------*/

    #[test]
    fn test_self_coverage() {
        for value in ["10.0.0.1/32", "10.0.0.0/24", "0.0.0.0/0", "2001:db8::/32", "::1/128"] {
            assert!(is_covered(&net(value), &[net(value)]), "{value}");
        }
    }

    #[test]
    fn test_host_in_network() {
        let allowlist = nets(&["10.0.0.0/24"]);
        assert!(is_covered(&net("10.0.0.5/32"), &allowlist));
        assert!(!is_covered(&net("10.0.1.5/32"), &allowlist));
    }

    #[test]
    fn test_subnet_coverage() {
        let allowlist = nets(&["13.108.0.0/14"]);
        assert!(is_covered(&net("13.110.0.0/16"), &allowlist));
        assert!(is_covered(&net("13.108.0.0/14"), &allowlist));

        // Supernets and overlapping neighbours are not covered
        assert!(!is_covered(&net("13.108.0.0/13"), &allowlist));
        assert!(!is_covered(&net("13.112.0.0/16"), &allowlist));
    }

    #[test]
    fn test_any_allowlist_entry_suffices() {
        let allowlist = nets(&["192.0.2.0/24", "10.0.0.0/8", "10.0.0.0/24"]);
        assert_eq!(
            find_covering(&net("10.0.0.7/32"), &allowlist),
            Some(&net("10.0.0.0/8"))
        );
    }

    #[test]
    fn test_address_family_mismatch() {
        // ::a00:0/120 embeds 10.0.0.0 numerically
        assert!(!is_covered(&net("10.0.0.1/32"), &nets(&["::a00:0/120"])));
        assert!(!is_covered(&net("::a00:1/128"), &nets(&["10.0.0.0/24"])));
        assert!(!is_covered(&net("10.0.0.0/24"), &nets(&["::/0"])));
        assert!(!is_covered(&net("2001:db8::/32"), &nets(&["0.0.0.0/0"])));
    }

    #[test]
    fn test_ipv6_coverage() {
        let allowlist = nets(&["2001:db8::/32"]);
        assert!(is_covered(&net("2001:db8::1/128"), &allowlist));
        assert!(is_covered(&net("2001:db8:1::/48"), &allowlist));
        assert!(!is_covered(&net("2001:db9::/48"), &allowlist));
    }

    #[test]
    fn test_empty_allowlist() {
        assert!(!is_covered(&net("10.0.0.1/32"), &[]));
    }

    /*----------------------------------------------------------------------------------
      find_missing
    ----------------------------------------------------------------------------------*/

    #[test]
    fn test_find_missing_preserves_order_and_duplicates() {
        let a = net("10.0.0.1/32");
        let b = net("192.0.2.0/24");
        let c = net("172.16.0.1/32");

        assert_eq!(find_missing(&[a, b, a], &nets(&["10.0.0.0/24"])), vec!["192.0.2.0/24"]);
        assert_eq!(
            find_missing(&[a, b, a], &nets(&["192.0.2.0/23"])),
            vec!["10.0.0.1/32", "10.0.0.1/32"]
        );
        assert_eq!(
            find_missing(&[a, b, c, a], &nets(&["172.16.0.0/12"])),
            vec!["10.0.0.1/32", "192.0.2.0/24", "10.0.0.1/32"]
        );
    }

    #[test]
    fn test_find_missing_all_covered() {
        let required = nets(&["10.0.0.1/32", "10.0.0.0/25"]);
        assert!(find_missing(&required, &nets(&["10.0.0.0/24"])).is_empty());
    }

    /*----------------------------------------------------------------------------------
      evaluate
    ----------------------------------------------------------------------------------*/

    #[test]
    fn test_evaluate() {
        let coverage = evaluate(
            &nets(&["10.0.0.1/32", "192.0.2.0/24"]),
            &nets(&["10.0.0.0/24"]),
        );

        assert_eq!(
            coverage,
            vec![
                Coverage {
                    required: net("10.0.0.1/32"),
                    covered_by: Some(net("10.0.0.0/24")),
                },
                Coverage {
                    required: net("192.0.2.0/24"),
                    covered_by: None,
                },
            ]
        );
        assert!(coverage[0].is_covered());
        assert!(!coverage[1].is_covered());
    }
}
