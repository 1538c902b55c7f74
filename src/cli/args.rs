// file: src/cli/args.rs
// version: 2.0.0
// guid: 2119f164-fc6b-426c-8377-83d3654d3d60

//! Command line argument definitions
//!
//! Every option is an override; with no arguments the run uses the fixed
//! default locations.

use crate::config::{
    Settings, TargetUser, DEFAULT_CONFIG_DIR, DEFAULT_LOG_DIR, DEFAULT_MOTD_PATH,
    DEFAULT_PACKAGE_LIST, DEFAULT_SSHD_CONFIG, DEFAULT_SSH_SERVICE,
};
use chrono::{DateTime, Local};
use clap::Parser;
use std::path::PathBuf;
use tracing::warn;

#[derive(Parser, Debug)]
#[command(name = "host-postinstall")]
#[command(about = "Update, install packages, apply dotfiles and harden SSH on a fresh host")]
#[command(version = env!("CARGO_PKG_VERSION"))]
pub struct Cli {
    #[arg(short, long)]
    pub verbose: bool,

    #[arg(short, long, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Newline-delimited package list
    #[arg(long, env = "POSTINSTALL_PACKAGE_LIST", default_value = DEFAULT_PACKAGE_LIST)]
    pub package_list: PathBuf,

    /// Directory holding motd, bashrc_append and vimrc_append
    #[arg(long, env = "POSTINSTALL_CONFIG_DIR", default_value = DEFAULT_CONFIG_DIR)]
    pub config_dir: PathBuf,

    /// Directory for per-run log files
    #[arg(long, env = "POSTINSTALL_LOG_DIR", default_value = DEFAULT_LOG_DIR)]
    pub log_dir: PathBuf,

    #[arg(long, default_value = DEFAULT_MOTD_PATH)]
    pub motd_path: PathBuf,

    #[arg(long, default_value = DEFAULT_SSHD_CONFIG)]
    pub sshd_config: PathBuf,

    /// systemd unit restarted after hardening
    #[arg(long, default_value = DEFAULT_SSH_SERVICE)]
    pub ssh_service: String,

    /// User whose home gets the rc appends and the SSH key
    #[arg(long, env = "SUDO_USER")]
    pub user: Option<String>,

    /// Insert hardening directives that are absent from the daemon config
    #[arg(long)]
    pub append_missing_directives: bool,
}

impl Cli {
    /// Resolve the arguments into run settings. The log file name is
    /// derived from `started` here and nowhere else.
    pub fn to_settings(&self, started: DateTime<Local>) -> Settings {
        Settings::default()
            .with_log_dir(&self.log_dir, started)
            .with_package_list(&self.package_list)
            .with_config_dir(&self.config_dir)
            .with_motd_path(&self.motd_path)
            .with_sshd_config(&self.sshd_config)
            .with_ssh_service(&self.ssh_service)
            .with_append_missing_directives(self.append_missing_directives)
    }

    /// Name of the target user: `--user`, else `$SUDO_USER`, else root
    pub fn target_user_name(&self) -> &str {
        match self.user.as_deref() {
            Some(name) if !name.trim().is_empty() => name,
            _ => "root",
        }
    }
}

/// Look the target user up, logging instead of failing when unknown
pub fn resolve_target_user(name: &str) -> Option<TargetUser> {
    if name == "root" {
        warn!("No invoking user found (SUDO_USER unset); configuring root's home");
    }
    match TargetUser::lookup(name) {
        Ok(user) => Some(user),
        Err(e) => {
            warn!("Cannot resolve target user {}: {}", name, e);
            None
        }
    }
}
