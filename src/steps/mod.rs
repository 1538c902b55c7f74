// file: src/steps/mod.rs
// version: 2.0.0
// guid: 7e8bb76b-bd00-4b4f-a247-16f718908be4

//! The individual post-install steps and their common result type

pub mod config_files;
pub mod packages;
pub mod ssh_key;
pub mod sshd;
pub mod update;

pub use config_files::ConfigApplier;
pub use packages::{PackageInstaller, PackageList, PackageOutcome};
pub use ssh_key::SshKeyProvisioner;
pub use sshd::SshHardener;
pub use update::update_system;

use std::time::Duration;

/// Result of executing a step
#[derive(Debug, Clone)]
pub struct StepResult {
    /// Status of the step execution
    pub status: StepStatus,

    /// Human-readable message describing the result
    pub message: String,

    /// Time taken to execute the step
    pub execution_time: Duration,
}

/// Status of a step execution
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepStatus {
    /// Step completed successfully
    Completed,

    /// Step ran, but part of its work failed
    PartiallyFailed,

    /// Step failed
    Failed,

    /// Step was skipped (missing input or declined)
    Skipped,
}

/// Helper for creating successful step results
pub fn success_result(message: impl Into<String>, execution_time: Duration) -> StepResult {
    StepResult {
        status: StepStatus::Completed,
        message: message.into(),
        execution_time,
    }
}

/// Helper for creating partially failed step results
pub fn partial_result(message: impl Into<String>, execution_time: Duration) -> StepResult {
    StepResult {
        status: StepStatus::PartiallyFailed,
        message: message.into(),
        execution_time,
    }
}

/// Helper for creating failed step results
pub fn failure_result(message: impl Into<String>, execution_time: Duration) -> StepResult {
    StepResult {
        status: StepStatus::Failed,
        message: message.into(),
        execution_time,
    }
}

/// Helper for creating skipped step results
pub fn skipped_result(reason: impl Into<String>) -> StepResult {
    StepResult {
        status: StepStatus::Skipped,
        message: reason.into(),
        execution_time: Duration::from_secs(0),
    }
}
