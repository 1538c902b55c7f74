// file: src/steps/config_files.rs
// version: 1.0.0
// guid: 4a3cf6fe-5cd8-4fc3-bbe2-27c450422858

//! Optional configuration fragments: system banner and per-user rc appends

use super::{partial_result, skipped_result, success_result, StepResult, StepStatus};
use crate::config::{Settings, TargetUser, BASHRC_FRAGMENT, MOTD_FRAGMENT, VIMRC_FRAGMENT};
use crate::system::files;
use crate::Result;
use std::fs;
use std::path::Path;
use std::time::Instant;
use tracing::{error, info, warn};

/// Applies the fragments found under the config directory.
/// The three fragments are independent of each other.
pub struct ConfigApplier<'a> {
    settings: &'a Settings,
}

impl<'a> ConfigApplier<'a> {
    pub fn new(settings: &'a Settings) -> Self {
        Self { settings }
    }

    pub fn apply_all(&self) -> StepResult {
        let started = Instant::now();

        let statuses = [
            self.apply_motd(),
            self.apply_user_append(BASHRC_FRAGMENT, ".bashrc"),
            self.apply_user_append(VIMRC_FRAGMENT, ".vimrc"),
        ];

        let applied = statuses
            .iter()
            .filter(|s| **s == StepStatus::Completed)
            .count();

        if statuses.contains(&StepStatus::Failed) {
            partial_result(
                format!("{} of 3 fragments applied", applied),
                started.elapsed(),
            )
        } else if applied == 0 {
            skipped_result("No config fragments present")
        } else {
            success_result(
                format!("{} of 3 fragments applied", applied),
                started.elapsed(),
            )
        }
    }

    /// Overwrite the system banner with the `motd` fragment
    pub fn apply_motd(&self) -> StepStatus {
        let source = self.settings.fragment(MOTD_FRAGMENT);
        if !source.exists() {
            warn!("{} not found, skipping MOTD", source.display());
            return StepStatus::Skipped;
        }

        let dest = &self.settings.motd_path;
        match fs::copy(&source, dest) {
            Ok(_) => {
                info!("Custom MOTD applied to {}", dest.display());
                StepStatus::Completed
            }
            Err(e) => {
                error!("Failed to copy {} to {}: {}", source.display(), dest.display(), e);
                StepStatus::Failed
            }
        }
    }

    /// Append a fragment to a dotfile in the target user's home
    pub fn apply_user_append(&self, fragment: &str, dotfile: &str) -> StepStatus {
        let source = self.settings.fragment(fragment);
        if !source.exists() {
            warn!("{} not found, skipping {}", source.display(), dotfile);
            return StepStatus::Skipped;
        }

        let Some(user) = self.settings.target_user.as_ref() else {
            warn!("No target user resolved, skipping {}", dotfile);
            return StepStatus::Skipped;
        };

        let dest = user.home_file(dotfile);
        match append_owned(&source, &dest, user) {
            Ok(()) => {
                info!("Appended {} to {}", source.display(), dest.display());
                StepStatus::Completed
            }
            Err(e) => {
                error!("Failed to append {} to {}: {}", source.display(), dest.display(), e);
                StepStatus::Failed
            }
        }
    }
}

fn append_owned(source: &Path, dest: &Path, user: &TargetUser) -> Result<()> {
    let content = fs::read_to_string(source)?;
    files::append_text(dest, &content)?;
    files::set_owner(dest, user.uid, user.gid)
}
