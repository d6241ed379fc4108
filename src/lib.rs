// Allow common clippy pedantic lints that aren't critical for this codebase
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::too_many_lines)]
#![allow(clippy::unused_self)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::items_after_statements)]
#![allow(clippy::match_same_arms)]
#![allow(clippy::needless_pass_by_value)]
#![allow(clippy::unused_async)]

//! # Airtable CDK
//!
//! A typed, async client for the Airtable REST API.
//!
//! ## Features
//!
//! - **Typed Operations**: list, get, create, update, replace, delete
//! - **Rate-Limit Recovery**: fixed-delay, bounded retry on HTTP 429
//! - **Cursor Pagination**: restartable pager over the `offset` cursor
//! - **Metadata API**: bases and table schemas
//! - **YAML Config**: file + environment configuration
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use airtable_cdk::{Airtable, Credentials, Parameters, Result};
//!
//! #[tokio::main]
//! async fn main() -> Result<()> {
//!     let client = Airtable::new(Credentials::new("key..."), "appXXXXXXXXXXXXXX")?;
//!
//!     // One page
//!     let page = client.list(&Parameters::table("Tasks").page_size(20)).await?;
//!
//!     // Every page
//!     let mut pager = client.pager(Parameters::table("Tasks"));
//!     while let Ok(records) = pager.next_page().await {
//!         println!("{} records", records.len());
//!     }
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────┐
//! │  Airtable: list / get / create / update / delete / meta  │
//! └──────────────────────────────────────────────────────────┘
//!          │                                  │
//! ┌────────┴─────────┐              ┌─────────┴──────────┐
//! │     Executor     │◄─────────────│     ListPager      │
//! │ auth, 429 retry, │              │ offset cursor,     │
//! │ classification   │              │ EndOfList sentinel │
//! └────────┬─────────┘              └────────────────────┘
//!          │
//! ┌────────┴─────────┐
//! │    Transport     │  reqwest, or any test double
//! └──────────────────┘
//! ```

#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::doc_markdown)]

// ============================================================================
// Module declarations
// ============================================================================

/// Error types and HTTP status classification
pub mod error;

/// Record, field and metadata types
pub mod types;

/// Per-call operation parameters
pub mod params;

/// Credentials and auth headers
pub mod auth;

/// Transport, executor with 429 recovery, throttle
pub mod http;

/// Typed table operations
pub mod client;

/// Cursor pagination
pub mod pagination;

/// Client configuration
pub mod config;

/// Command-line interface
pub mod cli;

// ============================================================================
// Re-exports
// ============================================================================

pub use auth::Credentials;
pub use client::Airtable;
pub use config::ClientConfig;
pub use error::{ClientErrorKind, Error, Result, ServerErrorKind};
pub use http::{Executor, RetryPolicy, Transport};
pub use pagination::{ListPager, ListSource, PagerState};
pub use params::Parameters;
pub use types::*;

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
