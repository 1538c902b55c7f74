// file: src/cli/mod.rs
// version: 2.0.0
// guid: 3b4516d3-078f-4648-80d3-6700e94d2f5d

//! Command line interface for the post-install configurator

pub mod args;

pub use args::{resolve_target_user, Cli};
