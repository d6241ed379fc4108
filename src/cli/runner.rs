//! CLI runner - executes commands

use crate::cli::commands::{Cli, Commands};
use crate::client::Airtable;
use crate::config::ClientConfig;
use crate::error::{Error, Result};
use crate::params::Parameters;
use crate::types::{Record, RecordList};
use chrono::Utc;
use futures::future::join_all;
use serde::Serialize;
use serde_json::{json, Value};
use std::time::Instant;
use tracing::{debug, info};

/// CLI runner
pub struct Runner {
    cli: Cli,
}

impl Runner {
    /// Create a new runner
    pub fn new(cli: Cli) -> Self {
        Self { cli }
    }

    /// Run the CLI command
    pub async fn run(&self) -> Result<()> {
        let client = self.client()?;

        match &self.cli.command {
            Commands::List {
                table,
                view,
                fields,
                sort,
                formula,
                page_size,
                max_records,
                offset,
                all,
            } => {
                let mut params = Parameters::table(table).fields(fields.iter().cloned());
                params.sort.clone_from(sort);
                params.view.clone_from(view);
                params.filter_by_formula.clone_from(formula);
                params.page_size = *page_size;
                params.max_records = *max_records;
                self.list(&client, params, offset.as_deref(), *all).await
            }
            Commands::Get { table, id } => {
                let record = client.get(&Parameters::table(table), id).await?;
                emit(&record)
            }
            Commands::Create { table, json } => {
                let body = parse_body(json)?;
                let created: Value = client.create(&Parameters::table(table), &body).await?;
                emit(&created)
            }
            Commands::Update { table, id, json } => {
                let body = parse_body(json)?;
                let updated: Value = client.update(&Parameters::table(table), id, &body).await?;
                emit(&updated)
            }
            Commands::Delete { table, id } => {
                client.delete(&Parameters::table(table), id).await?;
                emit(&json!({ "id": id, "deleted": true }))
            }
            Commands::Bases => {
                let bases = client.list_bases().await?;
                for base in &bases.bases {
                    emit(base)?;
                }
                Ok(())
            }
            Commands::Schema { base_id } => {
                let base_id = base_id.as_deref().unwrap_or(client.base());
                let schema = client.base_schema(base_id).await?;
                for table in &schema.tables {
                    emit(table)?;
                }
                Ok(())
            }
            Commands::ConcurrentGet { table, view, count } => {
                let mut params = Parameters::table(table);
                params.view.clone_from(view);
                concurrent_get(&client, &params, *count).await
            }
        }
    }

    /// Build the client from config file, environment and flags
    fn client(&self) -> Result<Airtable> {
        let mut config = ClientConfig::load(self.cli.config.as_deref())?;
        if let Some(base) = &self.cli.base {
            config.base.clone_from(base);
        }
        if self.cli.verbose {
            config.debug = true;
        }
        Airtable::from_config(&config)
    }

    /// List one page, or every page with `all`
    async fn list(
        &self,
        client: &Airtable,
        params: Parameters,
        offset: Option<&str>,
        all: bool,
    ) -> Result<()> {
        if !all {
            let params = match offset {
                Some(offset) => params.offset(offset),
                None => params,
            };
            let page: RecordList = client.list(&params).await?;
            emit_records(&page.records)?;
            if page.has_more() {
                info!(offset = %page.offset, "more records available");
            }
            return Ok(());
        }

        let mut pager = match offset {
            Some(offset) => crate::pagination::ListPager::resume(client, params, offset),
            None => client.pager(params),
        };
        let mut total = 0;
        loop {
            match pager.next_page().await {
                Ok(records) => {
                    total += records.len();
                    debug!(page = pager.pages_fetched(), cursor = %pager.offset(), "page done");
                    emit_records(&records)?;
                }
                Err(e) if e.is_end_of_list() => break,
                Err(e) => return Err(e),
            }
        }
        info!("Listed {} records in {} pages", total, pager.pages_fetched());
        Ok(())
    }
}

/// Issue `count` list calls at once, each with its own retry budget
async fn concurrent_get(client: &Airtable, params: &Parameters, count: usize) -> Result<()> {
    let calls = (0..count).map(|call| async move {
        let started = Utc::now();
        let clock = Instant::now();
        let outcome = client.list(params).await;
        let elapsed = clock.elapsed();
        let (ok, detail) = match outcome {
            Ok(page) => (true, format!("{} records", page.records.len())),
            Err(e) => (false, e.to_string()),
        };
        json!({
            "call": call,
            "started": started.to_rfc3339(),
            "duration_ms": elapsed.as_millis() as u64,
            "ok": ok,
            "outcome": detail,
        })
    });

    let reports = join_all(calls).await;
    let failed = reports.iter().filter(|r| r["ok"] == false).count();
    for report in &reports {
        emit(report)?;
    }
    info!("{} of {} calls succeeded", count - failed, count);
    Ok(())
}

fn parse_body(body: &str) -> Result<Value> {
    serde_json::from_str(body).map_err(|e| Error::validation(format!("Invalid JSON body: {e}")))
}

fn emit_records(records: &[Record]) -> Result<()> {
    for record in records {
        emit(record)?;
    }
    Ok(())
}

/// Print one JSON line
fn emit<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string(value)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use crate::cli::{parse_sort, Cli, Commands};
    use crate::types::SortDirection;
    use clap::Parser;
    use test_case::test_case;

    #[test_case("Name", "Name", SortDirection::Asc ; "default direction")]
    #[test_case("Name:desc", "Name", SortDirection::Desc ; "descending")]
    #[test_case("Due Date:ASC", "Due Date", SortDirection::Asc ; "upper case")]
    #[test_case("a:b:desc", "a:b", SortDirection::Desc ; "colon in field")]
    fn test_parse_sort(input: &str, field: &str, direction: SortDirection) {
        let sort = parse_sort(input).unwrap();
        assert_eq!(sort.field, field);
        assert_eq!(sort.direction, direction);
    }

    #[test]
    fn test_parse_sort_rejects_bad_input() {
        assert!(parse_sort(":desc").is_err());
        assert!(parse_sort("Name:sideways").is_err());
    }

    #[test]
    fn test_parse_list_command() {
        let cli = Cli::try_parse_from([
            "airtable", "--base", "app1", "list", "--table", "Tasks", "--field", "A", "--field",
            "B", "--sort", "A:desc", "--page-size", "50", "--all",
        ])
        .unwrap();

        assert_eq!(cli.base.as_deref(), Some("app1"));
        match cli.command {
            Commands::List {
                table,
                fields,
                sort,
                page_size,
                all,
                ..
            } => {
                assert_eq!(table, "Tasks");
                assert_eq!(fields, ["A", "B"]);
                assert_eq!(sort[0].direction, SortDirection::Desc);
                assert_eq!(page_size, Some(50));
                assert!(all);
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn test_parse_concurrent_get() {
        let cli =
            Cli::try_parse_from(["airtable", "concurrent-get", "--table", "T", "-n", "25", "-v"])
                .unwrap();
        assert!(cli.verbose);
        assert!(matches!(cli.command, Commands::ConcurrentGet { count: 25, .. }));
    }
}
