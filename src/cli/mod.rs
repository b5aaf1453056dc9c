//! CLI module for signwall - command-line interface and subcommands.
//!
//! Provides the main entry point with subcommands for running the wall,
//! inspecting a snapshot and simulating the rotation.

pub mod commands;

pub use commands::Cli;
