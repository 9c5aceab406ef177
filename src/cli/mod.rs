//! CLI module for reasoner - command-line interface and subcommands.
//!
//! Interactive mode is the default; subcommands cover one-shot queries,
//! the tool catalogue and offline dispatch.

pub mod commands;

pub use commands::Cli;
