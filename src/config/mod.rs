// file: src/config/mod.rs
// version: 1.0.0
// guid: 85c251df-25cc-4374-9774-601850baa38b

//! Run configuration for the post-install configurator
//!
//! Everything a step needs to know about paths and the target user is
//! resolved once at startup into a [`Settings`] value and handed to each
//! component.

pub mod user;

pub use user::TargetUser;

use chrono::{DateTime, Local};
use std::path::{Path, PathBuf};

/// Default location of the package list, relative to the working directory
pub const DEFAULT_PACKAGE_LIST: &str = "packages.txt";

/// Default directory holding the optional config fragments
pub const DEFAULT_CONFIG_DIR: &str = "configs";

/// Default directory for per-run log files
pub const DEFAULT_LOG_DIR: &str = "/var/log/postinstall";

/// System banner destination
pub const DEFAULT_MOTD_PATH: &str = "/etc/motd";

/// SSH daemon configuration file
pub const DEFAULT_SSHD_CONFIG: &str = "/etc/ssh/sshd_config";

/// systemd unit name of the SSH daemon on Ubuntu
pub const DEFAULT_SSH_SERVICE: &str = "ssh";

/// Fragment file names under the config directory
pub const MOTD_FRAGMENT: &str = "motd";
pub const BASHRC_FRAGMENT: &str = "bashrc_append";
pub const VIMRC_FRAGMENT: &str = "vimrc_append";

/// Resolved settings for one run
#[derive(Debug, Clone)]
pub struct Settings {
    pub package_list: PathBuf,
    pub config_dir: PathBuf,
    pub log_dir: PathBuf,
    /// Log file for this run, derived once from `log_dir` and the start time
    pub log_file: PathBuf,
    pub motd_path: PathBuf,
    pub sshd_config: PathBuf,
    pub ssh_service: String,
    pub append_missing_directives: bool,
    /// User owning the rc files and the authorized keys; `None` when it
    /// could not be resolved from the password database
    pub target_user: Option<TargetUser>,
}

impl Default for Settings {
    fn default() -> Self {
        let log_dir = PathBuf::from(DEFAULT_LOG_DIR);
        Self {
            package_list: PathBuf::from(DEFAULT_PACKAGE_LIST),
            config_dir: PathBuf::from(DEFAULT_CONFIG_DIR),
            log_file: log_file_for(&log_dir, Local::now()),
            log_dir,
            motd_path: PathBuf::from(DEFAULT_MOTD_PATH),
            sshd_config: PathBuf::from(DEFAULT_SSHD_CONFIG),
            ssh_service: DEFAULT_SSH_SERVICE.to_string(),
            append_missing_directives: false,
            target_user: None,
        }
    }
}

impl Settings {
    /// Point the log directory somewhere else, re-deriving the log file name
    pub fn with_log_dir(mut self, log_dir: impl Into<PathBuf>, started: DateTime<Local>) -> Self {
        self.log_dir = log_dir.into();
        self.log_file = log_file_for(&self.log_dir, started);
        self
    }

    pub fn with_package_list(mut self, path: impl Into<PathBuf>) -> Self {
        self.package_list = path.into();
        self
    }

    pub fn with_config_dir(mut self, path: impl Into<PathBuf>) -> Self {
        self.config_dir = path.into();
        self
    }

    pub fn with_motd_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.motd_path = path.into();
        self
    }

    pub fn with_sshd_config(mut self, path: impl Into<PathBuf>) -> Self {
        self.sshd_config = path.into();
        self
    }

    pub fn with_ssh_service(mut self, service: impl Into<String>) -> Self {
        self.ssh_service = service.into();
        self
    }

    pub fn with_append_missing_directives(mut self, append: bool) -> Self {
        self.append_missing_directives = append;
        self
    }

    pub fn with_target_user(mut self, user: Option<TargetUser>) -> Self {
        self.target_user = user;
        self
    }

    /// Full path of a named fragment under the config directory
    pub fn fragment(&self, name: &str) -> PathBuf {
        self.config_dir.join(name)
    }
}

/// Build the per-run log file path: `<dir>/postinstall-YYYYmmdd-HHMMSS.log`
pub fn log_file_for(log_dir: &Path, started: DateTime<Local>) -> PathBuf {
    log_dir.join(format!("postinstall-{}.log", started.format("%Y%m%d-%H%M%S")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_defaults_use_fixed_paths() {
        let settings = Settings::default();

        assert_eq!(settings.package_list, PathBuf::from("packages.txt"));
        assert_eq!(settings.config_dir, PathBuf::from("configs"));
        assert_eq!(settings.sshd_config, PathBuf::from("/etc/ssh/sshd_config"));
        assert_eq!(settings.ssh_service, "ssh");
        assert!(!settings.append_missing_directives);
        assert!(settings.log_file.starts_with("/var/log/postinstall"));
    }

    #[test]
    fn test_log_file_name_from_start_time() {
        let started = Local.with_ymd_and_hms(2026, 3, 9, 7, 5, 1).unwrap();

        let path = log_file_for(Path::new("/tmp/logs"), started);

        assert_eq!(path, PathBuf::from("/tmp/logs/postinstall-20260309-070501.log"));
    }

    #[test]
    fn test_with_log_dir_rederives_file() {
        let started = Local.with_ymd_and_hms(2026, 1, 2, 3, 4, 5).unwrap();

        let settings = Settings::default().with_log_dir("/srv/logs", started);

        assert_eq!(settings.log_dir, PathBuf::from("/srv/logs"));
        assert_eq!(
            settings.log_file,
            PathBuf::from("/srv/logs/postinstall-20260102-030405.log")
        );
    }

    #[test]
    fn test_fragment_joins_config_dir() {
        let settings = Settings::default().with_config_dir("/opt/bundle/configs");

        assert_eq!(
            settings.fragment(BASHRC_FRAGMENT),
            PathBuf::from("/opt/bundle/configs/bashrc_append")
        );
    }
}
