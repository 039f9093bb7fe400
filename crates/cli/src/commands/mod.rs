//! CLI subcommands.

pub mod picker;
pub mod shell;
