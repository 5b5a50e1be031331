use clap::Parser;
use clap_verbosity_flag::{InfoLevel, Verbosity};
use std::net::SocketAddr;
use std::path::PathBuf;

/*-------------------------------------------------------------------------------------------------
  Command Line Interface (CLI) Arguments
-------------------------------------------------------------------------------------------------*/

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "Check that the Salesforce IP ranges are covered by the load balancer allowlists.",
    long_about = None
)]
pub struct Args {
    /// Run the check once with the ANYPOINT_* credentials and exit instead of serving HTTP
    #[arg(long)]
    pub check: bool,

    /// Address the HTTP service listens on
    #[arg(short, long, env = "CIDRCHECK_BIND", default_value = "0.0.0.0:8081")]
    pub bind: SocketAddr,

    /// Check the allowlists of these load balancers [default: isc2 isc2-np]
    #[arg(short = 'l', long = "load-balancer")]
    pub load_balancers: Option<Vec<String>>,

    /// Output Format: List of (RFC4632) CIDR-format missing prefixes
    #[arg(short = 'C', long, requires = "check")]
    pub cidr_format: bool,

    /// Save the coverage report to a CSV file
    #[arg(long = "csv", requires = "check")]
    pub csv_file: Option<PathBuf>,

    /// Logging verbosity
    #[command(flatten)]
    pub verbose: Verbosity<InfoLevel>,
}
