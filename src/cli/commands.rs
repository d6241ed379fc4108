//! CLI commands and argument parsing

use crate::types::Sort;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Command-line client for the Airtable REST API
#[derive(Parser, Debug)]
#[command(name = "airtable")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Configuration file (YAML)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Base id, overriding config and environment
    #[arg(short, long, global = true)]
    pub base: Option<String>,

    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// CLI subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List records of a table
    List {
        /// Table name or id
        #[arg(short, long)]
        table: String,

        /// Restrict to the records of a view
        #[arg(long)]
        view: Option<String>,

        /// Only return these fields (repeatable)
        #[arg(short, long = "field")]
        fields: Vec<String>,

        /// Sort key as FIELD[:asc|desc] (repeatable)
        #[arg(short, long, value_parser = parse_sort)]
        sort: Vec<Sort>,

        /// Filter formula
        #[arg(long)]
        formula: Option<String>,

        /// Records per page (server max 100)
        #[arg(long)]
        page_size: Option<u32>,

        /// Maximum records overall
        #[arg(long)]
        max_records: Option<u32>,

        /// Start from this cursor
        #[arg(long)]
        offset: Option<String>,

        /// Follow the cursor until the list is exhausted
        #[arg(long)]
        all: bool,
    },

    /// Fetch one record
    Get {
        #[arg(short, long)]
        table: String,

        #[arg(long)]
        id: String,
    },

    /// Create records from a JSON body
    Create {
        #[arg(short, long)]
        table: String,

        /// Request body, e.g. '{"fields":{"Name":"x"}}'
        #[arg(long)]
        json: String,
    },

    /// Update the given fields of a record
    Update {
        #[arg(short, long)]
        table: String,

        #[arg(long)]
        id: String,

        #[arg(long)]
        json: String,
    },

    /// Delete a record
    Delete {
        #[arg(short, long)]
        table: String,

        #[arg(long)]
        id: String,
    },

    /// List bases visible to the credentials
    Bases,

    /// Show the tables of a base
    Schema {
        /// Base to describe (defaults to the configured base)
        #[arg(long)]
        base_id: Option<String>,
    },

    /// Issue several list calls at once and report each outcome
    ConcurrentGet {
        #[arg(short, long)]
        table: String,

        #[arg(long)]
        view: Option<String>,

        /// Number of parallel calls
        #[arg(short = 'n', long, default_value = "10")]
        count: usize,
    },
}

/// Parse `FIELD[:asc|desc]` into a sort key
pub fn parse_sort(value: &str) -> Result<Sort, String> {
    let (field, direction) = match value.rsplit_once(':') {
        Some((field, direction)) => (field, direction.parse()?),
        None => (value, Default::default()),
    };
    if field.is_empty() {
        return Err(format!("missing field name in sort '{value}'"));
    }
    Ok(Sort {
        field: field.to_string(),
        direction,
    })
}
