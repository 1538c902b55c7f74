// file: src/main.rs
// version: 2.1.0
// guid: 5de6d920-3eb5-4e6b-a887-109dff71c727

//! Host Post-Install - Main entry point

use chrono::Local;
use clap::Parser;
use host_postinstall::{
    cli::{resolve_target_user, Cli},
    installer::PostInstaller,
    logging,
    prompt::TerminalPrompter,
    system::{self, SystemRunner},
};
use std::process::ExitCode;
use tracing::{info, warn};

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    let settings = cli.to_settings(Local::now());

    // Without a log file there is no record of the run; stop here
    if let Err(e) = logging::init_run_logger(&settings, cli.verbose, cli.quiet) {
        eprintln!("{}", e);
        if !system::is_root() {
            eprintln!("This program must be run as root");
        }
        if e.is_fatal() {
            return ExitCode::FAILURE;
        }
    }
    info!(
        "host-postinstall {} started, logging to {}",
        host_postinstall::VERSION,
        settings.log_file.display()
    );

    if let Err(e) = system::require_root() {
        if e.is_fatal() {
            return ExitCode::FAILURE;
        }
        warn!("{}", e);
    }

    let settings = settings.with_target_user(resolve_target_user(cli.target_user_name()));
    let runner = SystemRunner::new();
    let mut prompter = TerminalPrompter::new();

    PostInstaller::new(&settings, &runner, &mut prompter)
        .run()
        .await;

    ExitCode::SUCCESS
}
