// file: src/system/mod.rs
// version: 1.0.0
// guid: 10a751b5-0331-4905-afdb-160ca7a8746c

//! Local system access: commands, privilege and file operations

pub mod files;
pub mod privilege;
pub mod runner;

pub use privilege::{is_root, require_root};
pub use runner::{CommandOutput, CommandRunner, SystemRunner};
