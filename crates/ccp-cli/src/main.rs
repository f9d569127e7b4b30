//! # ccp CLI entry point
//!
//! Parses command-line arguments and dispatches to subcommand handlers.

use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use ccp_cli::credential::{run_issue, run_verify, IssueArgs, VerifyArgs};
use ccp_cli::keygen::{run_keygen, KeygenArgs};
use ccp_cli::serve::{run_serve, ServeArgs};

/// Complaint credential toolkit.
///
/// Generates issuer keys, issues and verifies complaint credentials offline,
/// and runs the credential API server.
#[derive(Parser, Debug)]
#[command(name = "ccp", version, about, long_about = None)]
struct Cli {
    /// Enable verbose output. Repeat for more verbosity (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Generate a new issuer key and write it to a file.
    Keygen(KeygenArgs),

    /// Issue a signed credential for a complaint record.
    Issue(IssueArgs),

    /// Verify a credential document. Exits 0 when verified, 2 when not.
    Verify(VerifyArgs),

    /// Run the credential API server, configured from the environment.
    Serve(ServeArgs),
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    // `serve` keeps the server's default of `info` unless RUST_LOG says otherwise.
    let filter = match (&cli.command, cli.verbose) {
        (Commands::Serve(_), 0) => EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new("info")),
        (_, 0) => EnvFilter::new("warn"),
        (_, 1) => EnvFilter::new("info"),
        (_, 2) => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let result = match cli.command {
        Commands::Keygen(args) => run_keygen(&args),
        Commands::Issue(args) => run_issue(&args),
        Commands::Verify(args) => run_verify(&args),
        Commands::Serve(args) => run_serve(&args),
    };

    match result {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            tracing::error!("{e:#}");
            eprintln!("error: {e:#}");
            ExitCode::from(1)
        }
    }
}
