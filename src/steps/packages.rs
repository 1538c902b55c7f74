// file: src/steps/packages.rs
// version: 1.1.0
// guid: 51852744-df33-4ee0-a37c-9adea875acbd

//! Package list parsing and conditional installation

use super::{partial_result, skipped_result, success_result, StepResult};
use crate::system::runner::CommandRunner;
use std::fs::File;
use std::io::{self, BufRead, BufReader, Lines};
use std::path::Path;
use std::time::Instant;
use tracing::{error, info, warn};

/// Status word (third field of dpkg's `Status:`) of an unpacked and
/// configured package, whatever its selection (`install`, `hold`, ...)
const INSTALLED_STATUS: &str = "installed";

/// `dpkg-query` format printing only the status word
const STATUS_WORD_FORMAT: &str = "-f=${db:Status-Status}";

/// One-pass, lazy sequence of package names from a list file.
///
/// Empty lines, whitespace-only lines and lines starting with `#` are
/// dropped. Everything else is yielded exactly as written.
pub struct PackageList<R> {
    lines: Lines<R>,
}

impl PackageList<BufReader<File>> {
    pub fn open(path: &Path) -> io::Result<Self> {
        Ok(Self::from_reader(BufReader::new(File::open(path)?)))
    }
}

impl<R: BufRead> PackageList<R> {
    pub fn from_reader(reader: R) -> Self {
        Self {
            lines: reader.lines(),
        }
    }
}

impl<R: BufRead> Iterator for PackageList<R> {
    type Item = io::Result<String>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            match self.lines.next()? {
                Ok(line) if is_package_line(&line) => return Some(Ok(line)),
                Ok(_) => continue,
                Err(e) => return Some(Err(e)),
            }
        }
    }
}

/// Whether a list line names a package
pub fn is_package_line(line: &str) -> bool {
    !line.trim().is_empty() && !line.starts_with('#')
}

/// What happened to one package
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PackageOutcome {
    AlreadyInstalled,
    Installed,
    Failed(Option<i32>),
}

pub struct PackageInstaller<'a> {
    runner: &'a dyn CommandRunner,
}

impl<'a> PackageInstaller<'a> {
    pub fn new(runner: &'a dyn CommandRunner) -> Self {
        Self { runner }
    }

    /// Install every package named in `list_path` that is not installed yet
    pub async fn install_all(&self, list_path: &Path) -> StepResult {
        let started = Instant::now();

        if !list_path.exists() {
            warn!(
                "Package list {} not found, skipping package installation",
                list_path.display()
            );
            return skipped_result(format!("{} not found", list_path.display()));
        }

        let packages = match PackageList::open(list_path) {
            Ok(list) => list,
            Err(e) => {
                error!("Failed to read package list {}: {}", list_path.display(), e);
                return skipped_result(format!("{} unreadable", list_path.display()));
            }
        };

        info!("Installing packages from {}", list_path.display());
        let outcomes = self.install_each(packages).await;

        let failed: Vec<&str> = outcomes
            .iter()
            .filter(|(_, outcome)| matches!(outcome, PackageOutcome::Failed(_)))
            .map(|(name, _)| name.as_str())
            .collect();

        if failed.is_empty() {
            success_result(
                format!("{} packages processed", outcomes.len()),
                started.elapsed(),
            )
        } else {
            partial_result(
                format!("Failed to install: {}", failed.join(", ")),
                started.elapsed(),
            )
        }
    }

    /// Walk the list once; a read error ends the walk, install failures do not
    pub async fn install_each<I>(&self, packages: I) -> Vec<(String, PackageOutcome)>
    where
        I: IntoIterator<Item = io::Result<String>>,
    {
        let mut outcomes = Vec::new();
        for entry in packages {
            let name = match entry {
                Ok(name) => name,
                Err(e) => {
                    error!("Stopped reading package list: {}", e);
                    break;
                }
            };
            let outcome = self.install_one(&name).await;
            outcomes.push((name, outcome));
        }
        outcomes
    }

    /// Check, then install if needed. Logs exactly one result line.
    pub async fn install_one(&self, name: &str) -> PackageOutcome {
        if self.is_installed(name).await {
            info!("{} is already installed", name);
            return PackageOutcome::AlreadyInstalled;
        }

        info!("Installing {}...", name);
        match self.runner.run("apt-get", &["install", "-y", name]).await {
            Ok(output) => {
                output.log();
                if output.success() {
                    info!("{} installed successfully", name);
                    PackageOutcome::Installed
                } else {
                    error!("Failed to install {} (exit code {:?})", name, output.exit_code);
                    PackageOutcome::Failed(output.exit_code)
                }
            }
            Err(e) => {
                error!("Failed to install {}: {}", name, e);
                PackageOutcome::Failed(None)
            }
        }
    }

    /// Ask the local package database; no network access involved
    pub async fn is_installed(&self, name: &str) -> bool {
        match self
            .runner
            .run("dpkg-query", &["-W", STATUS_WORD_FORMAT, name])
            .await
        {
            Ok(output) => output.success() && output.stdout.trim() == INSTALLED_STATUS,
            Err(e) => {
                warn!("Could not query install state of {}: {}", name, e);
                false
            }
        }
    }
}
