// file: src/test_support.rs
// version: 1.1.0
// guid: 6f2f8240-5710-4ef8-8d47-d2dc2b7501c0

//! Shared fixtures for unit tests

use crate::logging::RunLineFormat;
use crate::prompt::Prompter;
use crate::system::runner::{CommandOutput, CommandRunner};
use crate::Result;
use std::collections::{HashMap, VecDeque};
use std::io;
use std::sync::{Arc, Mutex};
use tracing_subscriber::fmt::MakeWriter;
use tracing_subscriber::layer::SubscriberExt;

/// Captures formatted log lines for the current thread
#[derive(Clone, Default)]
pub struct LogCapture(Arc<Mutex<Vec<u8>>>);

impl LogCapture {
    pub fn install(&self) -> tracing::subscriber::DefaultGuard {
        let subscriber = tracing_subscriber::registry().with(
            tracing_subscriber::fmt::layer()
                .event_format(RunLineFormat)
                .with_writer(self.clone()),
        );
        tracing::subscriber::set_default(subscriber)
    }

    pub fn raw(&self) -> String {
        String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
    }

    /// Logged messages with the `[timestamp] ` prefix removed
    pub fn messages(&self) -> Vec<String> {
        self.raw()
            .lines()
            .map(|line| match line.split_once("] ") {
                Some((_, message)) => message.to_string(),
                None => line.to_string(),
            })
            .collect()
    }

    pub fn count_containing(&self, needle: &str) -> usize {
        self.messages().iter().filter(|m| m.contains(needle)).count()
    }
}

pub struct CaptureWriter(Arc<Mutex<Vec<u8>>>);

impl io::Write for CaptureWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl<'a> MakeWriter<'a> for LogCapture {
    type Writer = CaptureWriter;

    fn make_writer(&'a self) -> Self::Writer {
        CaptureWriter(Arc::clone(&self.0))
    }
}

/// Records every command line and answers with canned outputs.
/// Commands without a canned answer succeed with empty output.
#[derive(Default)]
pub struct RecordingRunner {
    calls: Mutex<Vec<String>>,
    responses: HashMap<String, CommandOutput>,
}

impl RecordingRunner {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn respond(mut self, command_line: &str, exit_code: i32, stdout: &str) -> Self {
        self.responses.insert(
            command_line.to_string(),
            CommandOutput {
                exit_code: Some(exit_code),
                stdout: stdout.to_string(),
                stderr: String::new(),
            },
        );
        self
    }

    /// Mark a package as installed in the fake package database
    pub fn installed(self, package: &str) -> Self {
        let query = format!("dpkg-query -W -f=${{db:Status-Status}} {}", package);
        self.respond(&query, 0, "installed")
    }

    /// Mark a package as unknown to the fake package database
    pub fn not_installed(self, package: &str) -> Self {
        let query = format!("dpkg-query -W -f=${{db:Status-Status}} {}", package);
        self.respond(&query, 1, "")
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    pub fn calls_starting_with(&self, prefix: &str) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter(|c| c.starts_with(prefix))
            .collect()
    }
}

#[async_trait::async_trait]
impl CommandRunner for RecordingRunner {
    async fn run(&self, program: &str, args: &[&str]) -> Result<CommandOutput> {
        let mut line = program.to_string();
        for arg in args {
            line.push(' ');
            line.push_str(arg);
        }
        self.calls.lock().unwrap().push(line.clone());

        Ok(self.responses.get(&line).cloned().unwrap_or(CommandOutput {
            exit_code: Some(0),
            stdout: String::new(),
            stderr: String::new(),
        }))
    }
}

/// Answers prompts from a fixed script; errors once the script runs out
pub struct ScriptedPrompter {
    answers: VecDeque<String>,
    pub questions: Vec<String>,
}

impl ScriptedPrompter {
    pub fn new(answers: &[&str]) -> Self {
        Self {
            answers: answers.iter().map(|a| a.to_string()).collect(),
            questions: Vec::new(),
        }
    }
}

impl Prompter for ScriptedPrompter {
    fn ask(&mut self, question: &str) -> Result<String> {
        self.questions.push(question.to_string());
        self.answers
            .pop_front()
            .ok_or_else(|| crate::error::PostInstallError::prompt("no scripted answer left"))
    }
}
