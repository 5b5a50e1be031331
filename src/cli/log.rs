use cidrcheck::CheckReport;
use log::{info, warn};

/*-------------------------------------------------------------------------------------------------
  Logging Functions
-------------------------------------------------------------------------------------------------*/

/*--------------------------------------------------------------------------------------
  Check Report
--------------------------------------------------------------------------------------*/

pub fn check_report(report: &CheckReport) {
    let count_required = report.required.len();
    let count_allowlist = report.allowlist.len();
    info!(
        "Checked {count_required} required CIDR(s) against {count_allowlist} allowlisted CIDR(s)"
    );

    let count_missing = report.missing.len();
    if count_missing > 0 {
        warn!("{count_missing} required CIDR(s) are not covered by the allowlists");
    } else {
        info!("All required CIDRs are covered by the allowlists");
    };

    for contribution in report.degraded() {
        warn!("Result may be incomplete; {contribution}");
    }
}
