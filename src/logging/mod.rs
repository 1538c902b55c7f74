// file: src/logging/mod.rs
// version: 2.0.0
// guid: 2645b2c1-4bc8-4961-bfae-8e4268dda6a9

//! Logging system for the post-install run

pub mod logger;

pub use logger::{init_run_logger, log_command_output, RunLineFormat, COMMAND_OUTPUT_TARGET};
