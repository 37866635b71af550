//! depinspect - npm/yarn dependency inspection CLI tool
//!
//! Lists the dependencies a JavaScript project declares alongside the
//! installed, wanted and latest versions its package manager reports.

use clap::Parser;
use depinspect::cache::CacheKey;
use depinspect::cli::CliArgs;
use depinspect::output::{create_formatter, OutputConfig};
use depinspect::service::DependencyService;
use std::io::{self, Write};
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> ExitCode {
    let args = CliArgs::parse();
    init_tracing(args.verbose);

    // Run the main logic and handle errors
    match run(args).await {
        Ok(exit_code) => exit_code,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

/// Install a stderr subscriber; `RUST_LOG` overrides the default level
fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

/// Main application logic
async fn run(args: CliArgs) -> anyhow::Result<ExitCode> {
    // Print version info in verbose mode
    if args.verbose {
        eprintln!("depinspect v{}", env!("CARGO_PKG_VERSION"));
        eprintln!("Target: {}", args.path.display());
    }

    let project = args.path.canonicalize().unwrap_or_else(|_| args.path.clone());
    let service = DependencyService::new(args.service_config());
    let key = CacheKey::new(args.session.clone(), project.clone());

    let inspection = service
        .run_with_progress(&project, args.mode(), &key, args.show_progress())
        .await?;

    // Create output formatter based on CLI options
    let formatter = create_formatter(OutputConfig::from_cli(args.json, args.verbose, args.quiet));

    // Output results
    let mut stdout = io::stdout().lock();
    formatter.format(&inspection, &mut stdout)?;
    stdout.flush()?;

    Ok(ExitCode::SUCCESS)
}
