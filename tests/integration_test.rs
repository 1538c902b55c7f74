// file: tests/integration_test.rs
// version: 2.1.0
// guid: cd819859-4623-453b-8f45-5639e993a9e7

//! Integration tests for the post-install run

use assert_cmd::Command;
use host_postinstall::{
    config::{Settings, TargetUser},
    installer::{PostInstaller, STEP_CONFIGS, STEP_PACKAGES, STEP_SSHD, STEP_SSH_KEY},
    prompt::Prompter,
    steps::StepStatus,
    system::{CommandOutput, CommandRunner},
    PostInstallError, Result,
};
use predicates::prelude::*;
use std::collections::VecDeque;
use std::fs;
use std::path::Path;
use std::sync::Mutex;
use tempfile::TempDir;

/// Pretends `git` is installed and everything else is not
#[derive(Default)]
struct FakeHost {
    calls: Mutex<Vec<String>>,
}

impl FakeHost {
    fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait::async_trait]
impl CommandRunner for FakeHost {
    async fn run(&self, program: &str, args: &[&str]) -> Result<CommandOutput> {
        let line = std::iter::once(program)
            .chain(args.iter().copied())
            .collect::<Vec<_>>()
            .join(" ");
        self.calls.lock().unwrap().push(line.clone());

        let (code, stdout) = match line.as_str() {
            "dpkg-query -W -f=${db:Status-Status} git" => (0, "installed"),
            l if l.starts_with("dpkg-query") => (1, ""),
            _ => (0, ""),
        };
        Ok(CommandOutput {
            exit_code: Some(code),
            stdout: stdout.to_string(),
            stderr: String::new(),
        })
    }
}

struct Answers(VecDeque<&'static str>);

impl Prompter for Answers {
    fn ask(&mut self, _question: &str) -> Result<String> {
        self.0
            .pop_front()
            .map(str::to_string)
            .ok_or_else(|| PostInstallError::prompt("no answer"))
    }
}

fn bundle(root: &Path) -> Settings {
    let configs = root.join("configs");
    let home = root.join("home");
    fs::create_dir_all(&configs).unwrap();
    fs::create_dir_all(&home).unwrap();

    fs::write(root.join("packages.txt"), "git\n#comment\n\ncurl\n").unwrap();
    fs::write(configs.join("motd"), "Managed host\n").unwrap();
    fs::write(configs.join("bashrc_append"), "export HISTSIZE=10000\n").unwrap();
    fs::write(root.join("sshd_config"), "#PasswordAuthentication yes\n#PubkeyAuthentication yes\nKbdInteractiveAuthentication no\nChallengeResponseAuthentication yes\n").unwrap();

    let (uid, gid) = unsafe { (libc::geteuid(), libc::getegid()) };
    Settings::default()
        .with_package_list(root.join("packages.txt"))
        .with_config_dir(&configs)
        .with_motd_path(root.join("motd"))
        .with_sshd_config(root.join("sshd_config"))
        .with_target_user(Some(TargetUser::new("tester", uid, gid, &home)))
}

#[tokio::test]
async fn test_full_run_with_consent() -> Result<()> {
    let temp = TempDir::new()?;
    let settings = bundle(temp.path());
    let host = FakeHost::default();
    let mut answers = Answers(VecDeque::from(["yes", "ssh-ed25519 AAAATEST ops@desk"]));

    let report = PostInstaller::new(&settings, &host, &mut answers).run().await;

    assert_eq!(
        host.calls(),
        vec![
            "apt-get update",
            "apt-get -y upgrade",
            "dpkg-query -W -f=${db:Status-Status} git",
            "dpkg-query -W -f=${db:Status-Status} curl",
            "apt-get install -y curl",
            "systemctl restart ssh",
        ]
    );
    assert_eq!(report.status_of(STEP_PACKAGES), Some(StepStatus::Completed));
    assert_eq!(report.status_of(STEP_CONFIGS), Some(StepStatus::Completed));
    assert_eq!(report.status_of(STEP_SSH_KEY), Some(StepStatus::Completed));
    assert_eq!(report.status_of(STEP_SSHD), Some(StepStatus::Completed));

    let home = temp.path().join("home");
    assert_eq!(fs::read_to_string(temp.path().join("motd"))?, "Managed host\n");
    assert_eq!(fs::read_to_string(home.join(".bashrc"))?, "export HISTSIZE=10000\n");
    assert!(!home.join(".vimrc").exists());
    assert_eq!(
        fs::read_to_string(home.join(".ssh/authorized_keys"))?,
        "ssh-ed25519 AAAATEST ops@desk\n"
    );
    assert_eq!(
        fs::read_to_string(temp.path().join("sshd_config"))?,
        "PasswordAuthentication no\nPubkeyAuthentication yes\nKbdInteractiveAuthentication no\nChallengeResponseAuthentication no\n"
    );
    Ok(())
}

#[tokio::test]
async fn test_second_run_leaves_sshd_config_unchanged() -> Result<()> {
    let temp = TempDir::new()?;
    let settings = bundle(temp.path());
    let host = FakeHost::default();

    PostInstaller::new(&settings, &host, &mut Answers(VecDeque::from(["n"])))
        .run()
        .await;
    let first = fs::read_to_string(temp.path().join("sshd_config"))?;
    PostInstaller::new(&settings, &host, &mut Answers(VecDeque::from(["n"])))
        .run()
        .await;
    let second = fs::read_to_string(temp.path().join("sshd_config"))?;

    assert_eq!(first, second);
    assert!(!temp.path().join("home/.ssh").exists());
    Ok(())
}

#[test]
fn test_help_lists_overrides() {
    Command::cargo_bin("host-postinstall")
        .unwrap()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("--package-list"))
        .stdout(predicate::str::contains("--append-missing-directives"));
}

#[test]
fn test_non_root_exits_with_status_one() {
    if host_postinstall::system::is_root() {
        return;
    }
    let temp = TempDir::new().unwrap();

    Command::cargo_bin("host-postinstall")
        .unwrap()
        .args(["--log-dir"])
        .arg(temp.path())
        .write_stdin("")
        .assert()
        .code(1)
        .stdout(predicate::str::contains("must be run as root"));

    let logs: Vec<_> = fs::read_dir(temp.path())
        .unwrap()
        .map(|entry| entry.unwrap().path())
        .collect();
    assert_eq!(logs.len(), 1);
    let contents = fs::read_to_string(&logs[0]).unwrap();
    let refusal =
        regex::Regex::new(r"(?m)^\[\d{4}-\d{2}-\d{2} \d{2}:\d{2}:\d{2}\] ERROR: This program must be run as root")
            .unwrap();
    assert!(refusal.is_match(&contents), "log file was: {contents}");
}
