//! authn-server - demo HTTP server for the authentication chain

#![allow(missing_docs)]

use authn_chain::server;
use clap::Parser;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

/// Serve /login, /me and /logout behind the authentication middleware
#[derive(Debug, Parser)]
#[command(name = "authn-server", version, about)]
struct Args {
    /// Configuration file
    #[arg(short, long, env = "AUTHN_CONFIG", default_value = "config/authn.yaml")]
    config: PathBuf,

    /// Override the configured bind host
    #[arg(long)]
    host: Option<String>,

    /// Override the configured bind port
    #[arg(short, long)]
    port: Option<u16>,
}

#[tokio::main]
async fn main() -> ExitCode {
    // Secrets may live in a local .env file
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_target(false)
        .with_thread_ids(false)
        .init();

    let args = Args::parse();

    match server::run_server(&args.config, args.host, args.port).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            // Print error using Display (not Debug) to preserve newlines
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}
