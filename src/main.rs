// Pwman - Application Entry Point
//
// Parses CLI arguments, initializes structured logging on stderr (stdout is
// reserved for command output), and dispatches to the command handler.

use clap::Parser;
use tracing_subscriber::EnvFilter;

use pwman::cli::{execute, Cli};

fn main() {
    // RUST_LOG=pwman=debug shows scope and schema lifecycle.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("pwman=warn")),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    if let Err(e) = execute(cli) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
