use crate::core::allowlist::{AllowlistLookup, AnypointCli};
use crate::core::builtin::static_contribution;
use crate::core::client::{Client, RequiredRangeSource};
use crate::core::config::{CheckConfig, Credentials};
use crate::core::contribution::Contribution;
use crate::core::coverage::{evaluate, Coverage};
use crate::core::network::to_networks;
use ipnetwork::IpNetwork;
use log::{error, info, warn};

/*-------------------------------------------------------------------------------------------------
  Simple Interface
-------------------------------------------------------------------------------------------------*/

/// _**Simple library interface**_ runs one coverage check with the default configuration,
/// the environment-configured [Client], and the Anypoint CLI. Returns the canonical CIDR
/// strings of the required ranges missing from the load balancer allowlists.
///
/// ```no_run
/// let credentials = cidrcheck::Credentials::new("org-id", "client-id", "client-secret").unwrap();
/// let missing: Vec<String> = cidrcheck::run_check(&credentials);
/// ```
pub fn run_check(credentials: &Credentials) -> Vec<String> {
    Checker::default().run_check(credentials)
}

/*-------------------------------------------------------------------------------------------------
  Check Report
-------------------------------------------------------------------------------------------------*/

/// Outcome of one check run.
#[derive(Clone, Debug, Default)]
pub struct CheckReport {
    /// Parsed required networks, built-in ranges first, in source order.
    pub required: Vec<IpNetwork>,

    /// Parsed allowlist networks, in load balancer order.
    pub allowlist: Vec<IpNetwork>,

    /// Coverage of each required network, in the order of [CheckReport::required].
    pub coverage: Vec<Coverage>,

    /// Canonical strings of the uncovered required networks.
    pub missing: Vec<String>,

    /// What each source supplied to the run.
    pub contributions: Vec<Contribution>,
}

impl CheckReport {
    /// Contributions from sources that failed or returned nothing during the run.
    pub fn degraded(&self) -> impl Iterator<Item = &Contribution> {
        self.contributions
            .iter()
            .filter(|contribution| contribution.is_degraded())
    }

    pub fn is_degraded(&self) -> bool {
        self.degraded().next().is_some()
    }
}

/*-------------------------------------------------------------------------------------------------
  Checker
-------------------------------------------------------------------------------------------------*/

/// Composes the required range sources, the allowlist lookup, and the coverage evaluator
/// into a single check. A [Checker] holds no per-run state; every run rebuilds both range
/// sets from scratch, so one checker can serve concurrent runs.
#[derive(Debug, Clone)]
pub struct Checker<R, L> {
    config: CheckConfig,
    remote: R,
    lookup: L,
}

impl Default for Checker<Client, AnypointCli> {
    fn default() -> Self {
        Checker::new(CheckConfig::default(), Client::new(), AnypointCli::new())
    }
}

impl<R, L> Checker<R, L>
where
    R: RequiredRangeSource,
    L: AllowlistLookup,
{
    pub fn new(config: CheckConfig, remote: R, lookup: L) -> Self {
        Self {
            config,
            remote,
            lookup,
        }
    }

    pub fn config(&self) -> &CheckConfig {
        &self.config
    }

    /// Run the check and return only the missing ranges.
    pub fn run_check(&self, credentials: &Credentials) -> Vec<String> {
        self.run(credentials).missing
    }

    /// Run the check: gather and parse the required ranges, gather and parse the allowlist,
    /// and evaluate coverage. Source failures degrade to empty contributions; the run
    /// itself never fails.
    pub fn run(&self, credentials: &Credentials) -> CheckReport {
        // Required ranges: built-in list followed by the fetched ranges
        let required_contributions = vec![
            static_contribution(&self.config.static_cidrs),
            self.remote.required_ranges(),
        ];
        let required = to_networks(
            required_contributions
                .iter()
                .flat_map(|contribution| contribution.ranges.iter()),
        );

        // Allowlist ranges: each load balancer in order
        let allowlist_contributions: Vec<Contribution> = self
            .config
            .load_balancers
            .iter()
            .map(|load_balancer| self.allowlist_contribution(load_balancer, credentials))
            .collect();
        let allowlist = to_networks(
            allowlist_contributions
                .iter()
                .flat_map(|contribution| contribution.ranges.iter()),
        );

        log_networks("Salesforce required networks", &required);
        log_networks("LB allowlist networks", &allowlist);

        let coverage = evaluate(&required, &allowlist);
        let missing: Vec<String> = coverage
            .iter()
            .filter(|coverage| !coverage.is_covered())
            .map(|coverage| coverage.required.to_string())
            .collect();

        let report = CheckReport {
            required,
            allowlist,
            coverage,
            missing,
            contributions: required_contributions
                .into_iter()
                .chain(allowlist_contributions)
                .collect(),
        };

        for contribution in report.degraded() {
            warn!("Degraded source {contribution}");
        }
        info!(
            "{} of {} required network(s) missing from the allowlist",
            report.missing.len(),
            report.required.len()
        );

        report
    }

    /// Look up one load balancer's allowlist, degrading on error or an empty allowlist.
    fn allowlist_contribution(
        &self,
        load_balancer: &str,
        credentials: &Credentials,
    ) -> Contribution {
        match self.lookup.lookup(load_balancer, credentials) {
            Ok(allowlist) if allowlist.is_empty() => {
                Contribution::degraded(load_balancer, "No allowlisted IPs found")
            }
            Ok(allowlist) => Contribution::ok(load_balancer, allowlist),
            Err(error) => {
                error!("Allowlist lookup failed for `{load_balancer}`: {error}");
                Contribution::degraded(load_balancer, error.to_string())
            }
        }
    }
}

/*-------------------------------------------------------------------------------------------------
  Helper Functions
-------------------------------------------------------------------------------------------------*/

fn log_networks(title: &str, networks: &[IpNetwork]) {
    info!("--- {title}: {}", networks.len());
    for network in networks {
        info!("  {network}");
    }
}

/*-------------------------------------------------------------------------------------------------
  Unit Tests
-------------------------------------------------------------------------------------------------*/
