//! CLI subcommand implementations.

pub mod call;
pub mod search_amendments;
pub mod tools;
