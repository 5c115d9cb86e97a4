//! OrderEase suite runner.
//!
//! # Usage
//!
//! ```bash
//! # Run every suite against API_BASE_URL
//! oe-suite run
//!
//! # Run a single module's suite
//! oe-suite run --module admin
//!
//! # Show execution order without touching the backend
//! oe-suite list
//! ```
//!
//! Configuration comes from the environment (see `SuiteConfig`); a
//! `.env` file in the working directory is honored.

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::str::FromStr;

use clap::{Parser, Subcommand};
use orderease_harness::api::ApiClient;
use orderease_harness::fixtures::providers::standard_registry;
use orderease_harness::sequencer::Sequencer;
use orderease_harness::{Module, Runner, SuiteConfig};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "oe-suite")]
#[command(version, about = "OrderEase API test suite runner")]
struct Cli {
    /// Log at debug level regardless of RUST_LOG
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Execute the suites against the configured backend
    Run {
        /// Restrict to one suite: auth, admin, shop-owner or frontend
        #[arg(short, long)]
        module: Option<String>,
    },
    /// Print the cases in execution order, without running them
    List {
        /// Restrict to one suite: auth, admin, shop-owner or frontend
        #[arg(short, long)]
        module: Option<String>,
    },
}

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };
    tracing_subscriber::fmt().with_env_filter(filter).init();

    if let Err(e) = run(cli).await {
        error!("suite runner failed: {e}");
        std::process::exit(1);
    }
}

fn parse_module(module: Option<&str>) -> Result<Option<Module>, Box<dyn std::error::Error>> {
    Ok(match module {
        Some(name) => Some(Module::from_str(name)?),
        None => None,
    })
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    match cli.command {
        Commands::List { module } => {
            let module = parse_module(module.as_deref())?;
            list_cases(module);
            Ok(())
        }
        Commands::Run { module } => {
            let module = parse_module(module.as_deref())?;
            run_suites(module).await
        }
    }
}

#[allow(clippy::print_stdout)]
fn list_cases(module: Option<Module>) {
    let mut cases = orderease_suites::cases_for(module);
    Sequencer::default().order(&mut cases);
    for case in &cases {
        println!("{}", case.id());
    }
}

async fn run_suites(module: Option<Module>) -> Result<(), Box<dyn std::error::Error>> {
    let config = SuiteConfig::from_env()?;
    info!(base_url = %config.base_url, "starting suite run");

    let api = ApiClient::new(&config)?;
    let registry = standard_registry();
    registry.validate()?;

    let cases = orderease_suites::cases_for(module);
    let runner = Runner::new(api, registry, Sequencer::default());
    let summary = runner.run(cases).await;

    info!(
        passed = summary.passed,
        skipped = summary.skipped,
        failed = summary.failed(),
        "suite run finished"
    );
    for (id, message) in &summary.failures {
        error!(test = %id, "{message}");
    }

    if summary.is_success() {
        Ok(())
    } else {
        std::process::exit(1);
    }
}
