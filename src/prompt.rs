// file: src/prompt.rs
// version: 1.0.0
// guid: 22d1c99a-45ae-4641-bce2-c7ff4b8cf6ac

//! Interactive operator prompts

use crate::error::PostInstallError;
use crate::Result;
use colored::Colorize;
use std::io::{self, BufRead, Write};

/// Source of operator answers
pub trait Prompter {
    /// Show `question` and return the raw answer line without its newline
    fn ask(&mut self, question: &str) -> Result<String>;
}

/// Prompts on stdout and reads answers from stdin
#[derive(Debug, Default)]
pub struct TerminalPrompter;

impl TerminalPrompter {
    pub fn new() -> Self {
        Self
    }
}

impl Prompter for TerminalPrompter {
    fn ask(&mut self, question: &str) -> Result<String> {
        let mut stdout = io::stdout();
        write!(stdout, "{} ", question.bold())?;
        stdout.flush()?;

        let mut answer = String::new();
        let read = io::stdin().lock().read_line(&mut answer)?;
        if read == 0 {
            return Err(PostInstallError::prompt("stdin closed before an answer was given"));
        }

        Ok(answer.trim_end_matches(&['\r', '\n'][..]).to_string())
    }
}

/// Only `y` or `yes`, in any case, counts as consent
pub fn is_affirmative(answer: &str) -> bool {
    let answer = answer.trim();
    answer.eq_ignore_ascii_case("y") || answer.eq_ignore_ascii_case("yes")
}
