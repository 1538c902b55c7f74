// file: src/steps/sshd.rs
// version: 1.1.0
// guid: 81b600c6-d090-4b6c-ace8-969aa7f87eb4

//! SSH daemon authentication hardening
//!
//! Directive lines are matched with or without a leading `#`, in the global
//! section only (before the first `Match` block). The first hit is rewritten
//! to the canonical value and later hits are dropped, so every directive ends
//! up on exactly one line and a second run changes nothing.
//!
//! Dropped hits include commented ones. A stock `#PasswordAuthentication yes`
//! followed by a `# PasswordAuthentication no` example leaves only the
//! rewritten `PasswordAuthentication no` line; those commented examples are
//! lost from the global section.

use super::{failure_result, partial_result, skipped_result, success_result, StepResult};
use crate::config::Settings;
use crate::system::files;
use crate::system::runner::CommandRunner;
use crate::Result;
use regex::Regex;
use std::fs;
use std::time::Instant;
use tracing::{debug, error, info, warn};

/// A directive and the value it is forced to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Directive {
    pub name: &'static str,
    pub value: &'static str,
}

impl Directive {
    pub fn line(&self) -> String {
        format!("{} {}", self.name, self.value)
    }

    fn pattern(&self) -> Result<Regex> {
        let pattern = format!(r"^#?[ \t]*{}(?:[ \t=]|$)", regex::escape(self.name));
        Ok(Regex::new(&pattern)?)
    }
}

/// Authentication policy applied to the daemon config
pub const HARDENED_DIRECTIVES: [Directive; 3] = [
    Directive {
        name: "PasswordAuthentication",
        value: "no",
    },
    Directive {
        name: "ChallengeResponseAuthentication",
        value: "no",
    },
    Directive {
        name: "PubkeyAuthentication",
        value: "yes",
    },
];

/// Outcome of rewriting the config text
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HardenedConfig {
    pub text: String,
    /// Directives with no line at all in the global section
    pub missing: Vec<&'static str>,
}

/// Rewrite `text` so each directive appears once with its canonical value.
///
/// Directives absent from the global section are only inserted when
/// `append_missing` is set; otherwise they are reported in `missing`.
pub fn harden_config(
    text: &str,
    directives: &[Directive],
    append_missing: bool,
) -> Result<HardenedConfig> {
    let match_block = Regex::new(r"^[ \t]*(?i:match)[ \t]")?;
    let mut lines: Vec<String> = text.lines().map(str::to_string).collect();
    let mut missing = Vec::new();

    for directive in directives {
        let pattern = directive.pattern()?;
        let global_end = lines
            .iter()
            .position(|l| match_block.is_match(l))
            .unwrap_or(lines.len());

        let mut first = None;
        let mut duplicates = Vec::new();
        for (idx, line) in lines[..global_end].iter().enumerate() {
            if pattern.is_match(line) {
                if first.is_none() {
                    first = Some(idx);
                } else {
                    duplicates.push(idx);
                }
            }
        }

        match first {
            Some(idx) => {
                lines[idx] = directive.line();
                for idx in duplicates.into_iter().rev() {
                    lines.remove(idx);
                }
            }
            None => {
                missing.push(directive.name);
                if append_missing {
                    lines.insert(global_end, directive.line());
                }
            }
        }
    }

    let mut text = lines.join("\n");
    if !text.is_empty() {
        text.push('\n');
    }

    Ok(HardenedConfig { text, missing })
}

pub struct SshHardener<'a> {
    settings: &'a Settings,
    runner: &'a dyn CommandRunner,
}

impl<'a> SshHardener<'a> {
    pub fn new(settings: &'a Settings, runner: &'a dyn CommandRunner) -> Self {
        Self { settings, runner }
    }

    /// Rewrite the daemon config, then restart the daemon
    pub async fn harden_ssh_daemon(&self) -> StepResult {
        let started = Instant::now();
        let path = &self.settings.sshd_config;

        if !path.exists() {
            warn!("{} not found, skipping SSH hardening", path.display());
            return skipped_result(format!("{} not found", path.display()));
        }

        if let Err(e) = self.rewrite_config() {
            error!("Failed to harden {}: {}", path.display(), e);
            return failure_result(e.to_string(), started.elapsed());
        }

        let service = self.settings.ssh_service.as_str();
        info!("Restarting {} service...", service);
        match self.runner.run("systemctl", &["restart", service]).await {
            Ok(output) => {
                output.log();
                if output.success() {
                    info!("SSH hardened and {} restarted", service);
                    success_result("SSH daemon hardened", started.elapsed())
                } else {
                    error!("Failed to restart {} (exit code {:?})", service, output.exit_code);
                    partial_result("Config hardened, restart failed", started.elapsed())
                }
            }
            Err(e) => {
                error!("Failed to restart {}: {}", service, e);
                partial_result("Config hardened, restart failed", started.elapsed())
            }
        }
    }

    fn rewrite_config(&self) -> Result<()> {
        let path = &self.settings.sshd_config;
        let original = fs::read_to_string(path)?;
        let append = self.settings.append_missing_directives;
        let hardened = harden_config(&original, &HARDENED_DIRECTIVES, append)?;

        for name in &hardened.missing {
            if append {
                info!("{} was not present in {}, added", name, path.display());
            } else {
                warn!("{} not present in {}, left unchanged", name, path.display());
            }
        }

        if hardened.text == original {
            debug!("{} already hardened", path.display());
            return Ok(());
        }

        files::write_atomic(path, &hardened.text)
    }
}
