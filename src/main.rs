use cidrcheck::server::{self, ServerState};
use cidrcheck::{AnypointCli, CheckConfig, Checker, Client, Credentials};
use clap::Parser;
use log::error;
use std::process::ExitCode;

mod cli;

/*-------------------------------------------------------------------------------------------------
  Main CLI Function
-------------------------------------------------------------------------------------------------*/

fn main() -> ExitCode {
    let args = cli::Args::parse();

    // Initialize logging
    stderrlog::new()
        .module(module_path!())
        .verbosity(args.verbose.log_level_filter())
        .timestamp(stderrlog::Timestamp::Second)
        .init()
        .unwrap_or_else(|error| eprintln!("Failed to initialize logging: {error}"));

    let mut config = CheckConfig::default();
    if let Some(load_balancers) = &args.load_balancers {
        config.load_balancers.clone_from(load_balancers);
    }

    let checker = Checker::new(config, Client::new(), AnypointCli::new());
    let credentials = Credentials::from_env();

    if args.check {
        check(&args, &checker, credentials)
    } else {
        serve(&args, checker, credentials)
    }
}

/*-------------------------------------------------------------------------------------------------
  One-Shot Check
-------------------------------------------------------------------------------------------------*/

fn check(
    args: &cli::Args,
    checker: &Checker<Client, AnypointCli>,
    credentials: Option<Credentials>,
) -> ExitCode {
    let Some(credentials) = credentials else {
        error!(
            "Missing credentials; set ANYPOINT_ORG, ANYPOINT_CLIENT_ID, and ANYPOINT_CLIENT_SECRET"
        );
        return ExitCode::FAILURE;
    };

    let report = checker.run(&credentials);

    // Output
    if args.cidr_format {
        cli::output::missing_in_cidr_format(&report);
    } else {
        cli::output::coverage_table(&report);
    };

    cli::log::check_report(&report);

    // Save CSV
    if let Some(csv_file) = &args.csv_file {
        if let Err(error) = cli::csv::save(&report, csv_file) {
            error!("Failed to save CSV file `{}`: {}", csv_file.display(), error);
            return ExitCode::FAILURE;
        }
    };

    if report.missing.is_empty() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}

/*-------------------------------------------------------------------------------------------------
  HTTP Service
-------------------------------------------------------------------------------------------------*/

fn serve(
    args: &cli::Args,
    checker: Checker<Client, AnypointCli>,
    credentials: Option<Credentials>,
) -> ExitCode {
    let runtime = match tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
    {
        Ok(runtime) => runtime,
        Err(error) => {
            error!("Failed to start the async runtime: {error}");
            return ExitCode::FAILURE;
        }
    };

    let state = ServerState::new(checker, credentials);
    match runtime.block_on(server::serve(args.bind, state)) {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            error!("HTTP service failed: {error}");
            ExitCode::FAILURE
        }
    }
}
