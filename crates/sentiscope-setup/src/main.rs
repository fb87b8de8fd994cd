//! Sentiscope Setup
//!
//! One-time machine preparation for serverless deployment: ensures the
//! deploy client is installed, applies optional local settings, runs the
//! interactive authentication flow, and verifies connectivity. Exits
//! non-zero if any step fails so shells and provisioning scripts can react.

use clap::Parser;
use std::path::Path;
use std::process::ExitCode;

mod platform;
mod steps;

#[derive(Parser, Debug)]
#[command(name = "sentiscope-setup")]
#[command(about = "Prepare this machine for serverless deployment", long_about = None)]
struct Cli {
    /// Optional settings file with key=value overrides
    #[arg(short, long, default_value = sentiscope_core::config::DEFAULT_SETTINGS_FILE)]
    settings: String,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    println!("Sentiment service setup");
    println!("This script will prepare your computer for serverless deployment");
    println!("{}", "=".repeat(60));

    let client = platform::CliDeployClient::from_env();

    match steps::run(&client, Path::new(&cli.settings)).await {
        Ok(()) => {
            println!("\nSetup complete! Your system is ready for deployment");
            println!("\nWhat you can do now:");
            println!("1. Serve locally: sentiscope-service --offline");
            println!("2. Run the smoke harness: smoke --offline");
            println!("3. Deploy through your platform client");
            ExitCode::SUCCESS
        }
        Err(e) => {
            tracing::error!(error = %e, "setup failed");
            println!("\nSetup failed - fix the issue above and re-run");
            ExitCode::FAILURE
        }
    }
}

/// Initialize tracing/logging
fn init_tracing(verbose: bool) {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

    let filter = if verbose {
        EnvFilter::new("sentiscope=debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("sentiscope=warn"))
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}
