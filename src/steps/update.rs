// file: src/steps/update.rs
// version: 1.0.0
// guid: e0aed49b-cb76-4f43-b510-cdd8937af32e

//! System package refresh and upgrade

use super::{failure_result, partial_result, success_result, StepResult};
use crate::system::runner::{command_line, CommandRunner};
use std::time::Instant;
use tracing::{info, warn};

const UPDATE: (&str, &[&str]) = ("apt-get", &["update"]);
const UPGRADE: (&str, &[&str]) = ("apt-get", &["-y", "upgrade"]);

/// Refresh package metadata, then upgrade everything unattended.
///
/// Output goes to the log file. Failures are reported in the result and
/// never stop the run.
pub async fn update_system(runner: &dyn CommandRunner) -> StepResult {
    let started = Instant::now();
    info!("Updating system packages...");

    let mut failed = Vec::new();
    for (program, args) in [UPDATE, UPGRADE] {
        let line = command_line(program, args);
        match runner.run(program, args).await {
            Ok(output) => {
                output.log();
                if !output.success() {
                    warn!("`{}` exited with {:?}", line, output.exit_code);
                    failed.push(line);
                }
            }
            Err(e) => {
                warn!("{}", e);
                failed.push(line);
            }
        }
    }

    match failed.len() {
        0 => success_result("System packages updated", started.elapsed()),
        1 => partial_result(format!("{} failed", failed[0]), started.elapsed()),
        _ => failure_result("Package update and upgrade both failed", started.elapsed()),
    }
}
