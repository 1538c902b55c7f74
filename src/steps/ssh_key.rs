// file: src/steps/ssh_key.rs
// version: 1.0.0
// guid: b48d47c2-09b5-44de-8b28-aad2d5f00a5a

//! Interactive SSH public key provisioning for the target user

use super::{failure_result, skipped_result, success_result, StepResult};
use crate::config::TargetUser;
use crate::prompt::{is_affirmative, Prompter};
use crate::system::files;
use crate::Result;
use std::fs;
use std::time::Instant;
use tracing::{error, info, warn};

const SSH_DIR_MODE: u32 = 0o700;
const AUTHORIZED_KEYS_MODE: u32 = 0o600;

pub struct SshKeyProvisioner<'a> {
    user: Option<&'a TargetUser>,
}

impl<'a> SshKeyProvisioner<'a> {
    pub fn new(user: Option<&'a TargetUser>) -> Self {
        Self { user }
    }

    /// Ask for consent, then for a key, and append it to `authorized_keys`.
    ///
    /// Anything but `y`/`yes` declines, silently and without touching disk.
    pub fn maybe_provision_key(&self, prompter: &mut dyn Prompter) -> StepResult {
        let started = Instant::now();

        let Some(user) = self.user else {
            warn!("No target user resolved, skipping SSH key setup");
            return skipped_result("No target user");
        };

        let question = format!("Add an SSH public key for {}? [y/N]", user.name);
        let consent = match prompter.ask(&question) {
            Ok(answer) => is_affirmative(&answer),
            Err(e) => {
                warn!("No answer to SSH key prompt ({}), treating as no", e);
                false
            }
        };
        if !consent {
            return skipped_result("Declined");
        }

        let key = match prompter.ask("Paste the public key:") {
            Ok(key) => key,
            Err(e) => {
                error!("Failed to read SSH public key: {}", e);
                return failure_result(e.to_string(), started.elapsed());
            }
        };
        if key.trim().is_empty() {
            warn!("Empty SSH key entered, nothing written");
            return skipped_result("Empty key");
        }

        match install_key(user, &key) {
            Ok(()) => {
                info!("SSH key added for {}", user.name);
                success_result(
                    format!("Key appended to {}", user.authorized_keys().display()),
                    started.elapsed(),
                )
            }
            Err(e) => {
                error!("Failed to install SSH key for {}: {}", user.name, e);
                failure_result(e.to_string(), started.elapsed())
            }
        }
    }
}

fn install_key(user: &TargetUser, key: &str) -> Result<()> {
    let ssh_dir = user.ssh_dir();
    let authorized_keys = user.authorized_keys();

    fs::create_dir_all(&ssh_dir)?;
    files::append_line(&authorized_keys, key)?;
    files::set_owner_recursive(&ssh_dir, user.uid, user.gid)?;
    files::set_mode(&ssh_dir, SSH_DIR_MODE)?;
    files::set_mode(&authorized_keys, AUTHORIZED_KEYS_MODE)?;
    Ok(())
}
