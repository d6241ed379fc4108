//! CLI module
//!
//! Command-line interface over the `Airtable` client.
//!
//! # Commands
//!
//! - `list` - List records of a table, one page or all of them
//! - `get` / `create` / `update` / `delete` - Single-record operations
//! - `bases` - List bases visible to the credentials
//! - `schema` - Show the table schema of a base
//! - `concurrent-get` - Fire parallel list calls and report timings

mod commands;
mod runner;

pub use commands::{parse_sort, Cli, Commands};
pub use runner::Runner;
