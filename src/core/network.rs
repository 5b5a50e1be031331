use crate::core::errors::Result;
use ipnetwork::{IpNetwork, Ipv4Network, Ipv6Network};
use log::warn;

/*-------------------------------------------------------------------------------------------------
  Network Parser
-------------------------------------------------------------------------------------------------*/

/// Parse a CIDR (`address/prefix-length`) or bare IP address token into a normalized
/// [IpNetwork]. Host bits are cleared rather than rejected, so `10.0.0.5/24` parses as
/// `10.0.0.0/24`. Bare addresses become single-address networks.
///
/// ```
/// let network = cidrcheck::parse_network(" 10.0.0.5/24 ").unwrap();
/// assert_eq!(network.to_string(), "10.0.0.0/24");
///
/// let host = cidrcheck::parse_network("10.0.0.1").unwrap();
/// assert_eq!(host.to_string(), "10.0.0.1/32");
/// ```
pub fn parse_network(token: &str) -> Result<IpNetwork> {
    let token = token.trim();

    // Prefix lengths are plain decimal digits; ipnetwork also accepts a leading `+`
    if let Some((_, prefix)) = token.split_once('/') {
        if prefix.is_empty() || !prefix.bytes().all(|byte| byte.is_ascii_digit()) {
            return Err(format!("Invalid prefix length in `{token}`").into());
        }
    }

    match token.parse::<IpNetwork>() {
        Ok(network) => Ok(network_prefix(&network)),
        Err(error) => format!("{token}/32")
            .parse::<IpNetwork>()
            .map(|network| network_prefix(&network))
            .map_err(|_| format!("Invalid IP network `{token}`: {error}").into()),
    }
}

/// Parse a batch of tokens, dropping (and logging) any token that fails to parse. The
/// order of the surviving networks follows the input order.
pub fn to_networks<I, S>(tokens: I) -> Vec<IpNetwork>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    tokens
        .into_iter()
        .filter_map(|token| {
            parse_network(token.as_ref())
                .inspect_err(|error| warn!("Could not parse {:?}: {}", token.as_ref(), error))
                .ok()
        })
        .collect()
}

/*-------------------------------------------------------------------------------------------------
  IP Network Supplemental Functions
-------------------------------------------------------------------------------------------------*/

/*
    The IpNetwork type does not reduce an interface CIDR prefix to its network prefix
    (where all host bits are set to `0`). It does provide a network() method that
    extracts the network IP, which is always valid for the existing prefix length.
*/

pub fn network_prefix(ip_network: &IpNetwork) -> IpNetwork {
    match ip_network {
        IpNetwork::V4(ipv4_network) => IpNetwork::V4(
            Ipv4Network::new(ipv4_network.network(), ipv4_network.prefix())
                .unwrap_or(*ipv4_network),
        ),
        IpNetwork::V6(ipv6_network) => IpNetwork::V6(
            Ipv6Network::new(ipv6_network.network(), ipv6_network.prefix())
                .unwrap_or(*ipv6_network),
        ),
    }
}

/// Maximum prefix length for the network's address family.
pub fn max_prefix(ip_network: &IpNetwork) -> u8 {
    match ip_network {
        IpNetwork::V4(_) => 32,
        IpNetwork::V6(_) => 128,
    }
}

/// A network is a single host when its prefix length is the family maximum.
pub fn is_host(ip_network: &IpNetwork) -> bool {
    ip_network.prefix() == max_prefix(ip_network)
}

/*
    The Ipv4Network and Ipv6Network types implement an is_subnet_of() method;
    however, the IpNetwork type does not. Mixed address families are never subnets
    of each other.
*/

pub fn is_subnet_of(subnet: IpNetwork, supernet: IpNetwork) -> bool {
    match (subnet, supernet) {
        (IpNetwork::V4(ipv4_subnet), IpNetwork::V4(ipv4_supernet)) => {
            ipv4_subnet.is_subnet_of(ipv4_supernet)
        }
        (IpNetwork::V6(ipv6_subnet), IpNetwork::V6(ipv6_supernet)) => {
            ipv6_subnet.is_subnet_of(ipv6_supernet)
        }
        _ => false,
    }
}

/*-------------------------------------------------------------------------------------------------
  Unit Tests
-------------------------------------------------------------------------------------------------*/
