use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use krecon::output;
use krecon::shell::Shell;

/// Reconnaissance and enumeration shell for Apache Kafka clusters.
#[derive(Debug, Parser)]
#[command(name = "krecon", version, about)]
struct Cli {
    /// Load kafka configuration from a JSON file at startup.
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    // Diagnostics go to stderr so the reconnaissance output on stdout
    // stays clean.
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let mut shell = Shell::new();

    println!();
    match &cli.config {
        Some(path) => shell.load(path),
        None => output::ok("Started without initial configuration"),
    }

    match shell.run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            output::err(format!("ERROR: {error}"));
            ExitCode::FAILURE
        }
    }
}
