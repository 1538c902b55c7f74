// file: src/installer/mod.rs
// version: 2.0.0
// guid: 4fa1c0e0-129a-4008-8bde-87433ee49738

//! Post-install orchestrator: runs every step once, in order

use crate::config::Settings;
use crate::prompt::Prompter;
use crate::steps::{
    update_system, ConfigApplier, PackageInstaller, SshHardener, SshKeyProvisioner, StepResult,
    StepStatus,
};
use crate::system::runner::CommandRunner;
use tracing::{debug, info};

/// Step names as they appear in the report
pub const STEP_UPDATE: &str = "update-system";
pub const STEP_PACKAGES: &str = "install-packages";
pub const STEP_CONFIGS: &str = "apply-configs";
pub const STEP_SSH_KEY: &str = "ssh-key";
pub const STEP_SSHD: &str = "harden-sshd";

/// Per-step results of one run
#[derive(Debug, Clone, Default)]
pub struct RunReport {
    pub steps: Vec<(&'static str, StepResult)>,
}

impl RunReport {
    pub fn status_of(&self, step: &str) -> Option<StepStatus> {
        self.steps
            .iter()
            .find(|(name, _)| *name == step)
            .map(|(_, result)| result.status)
    }
}

/// Main post-install orchestrator.
///
/// The privilege check happens before this is constructed; every step here
/// is best-effort and the run always reaches the end.
pub struct PostInstaller<'a> {
    settings: &'a Settings,
    runner: &'a dyn CommandRunner,
    prompter: &'a mut dyn Prompter,
}

impl<'a> PostInstaller<'a> {
    pub fn new(
        settings: &'a Settings,
        runner: &'a dyn CommandRunner,
        prompter: &'a mut dyn Prompter,
    ) -> Self {
        Self {
            settings,
            runner,
            prompter,
        }
    }

    pub async fn run(&mut self) -> RunReport {
        let mut report = RunReport::default();

        let result = update_system(self.runner).await;
        Self::record(&mut report, STEP_UPDATE, result);

        let result = PackageInstaller::new(self.runner)
            .install_all(&self.settings.package_list)
            .await;
        Self::record(&mut report, STEP_PACKAGES, result);

        let result = ConfigApplier::new(self.settings).apply_all();
        Self::record(&mut report, STEP_CONFIGS, result);

        let result = SshKeyProvisioner::new(self.settings.target_user.as_ref())
            .maybe_provision_key(&mut *self.prompter);
        Self::record(&mut report, STEP_SSH_KEY, result);

        let result = SshHardener::new(self.settings, self.runner)
            .harden_ssh_daemon()
            .await;
        Self::record(&mut report, STEP_SSHD, result);

        info!(
            "Post-install complete. Log file: {}",
            self.settings.log_file.display()
        );
        report
    }

    fn record(report: &mut RunReport, name: &'static str, result: StepResult) {
        debug!(
            "Step {} finished: {:?} - {} ({:.1?})",
            name, result.status, result.message, result.execution_time
        );
        report.steps.push((name, result));
    }
}
