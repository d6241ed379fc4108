//! Request specifications
//!
//! A `RequestSpec` describes one API call relative to the API root: the
//! method, the path segments, the query and the body. It is immutable once
//! built; the executor re-sends the same spec on every retry.

use crate::error::{Error, Result};
use crate::params::{Parameters, QueryPairs};
use crate::types::Method;
use bytes::Bytes;
use serde::Serialize;

/// One API call, relative to the API root
#[derive(Debug, Clone, PartialEq)]
pub struct RequestSpec {
    pub method: Method,
    /// Unencoded path segments, e.g. `["appXYZ", "My Table", "rec1"]`
    pub segments: Vec<String>,
    pub query: QueryPairs,
    pub body: Option<Bytes>,
}

impl RequestSpec {
    pub fn new<I, S>(method: Method, segments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            method,
            segments: segments.into_iter().map(Into::into).collect(),
            query: QueryPairs::new(),
            body: None,
        }
    }

    /// A call against `<base>/<table>` or `<base>/<table>/<record_id>`.
    ///
    /// Rejects an empty table name (and an empty record id when one is
    /// expected) before anything is built. List calls carry the list query,
    /// DELETE carries none, everything else carries the record query.
    pub fn table(
        method: Method,
        base: &str,
        params: &Parameters,
        record_id: Option<&str>,
    ) -> Result<Self> {
        params.validate()?;

        let mut segments = vec![base.to_string(), params.name.clone()];
        if let Some(id) = record_id {
            if id.trim().is_empty() {
                return Err(Error::validation("record id is required"));
            }
            segments.push(id.to_string());
        }

        let query = match (method, record_id) {
            (Method::DELETE, _) => QueryPairs::new(),
            (Method::GET, None) => params.list_query(),
            _ => params.record_query(),
        };

        Ok(Self {
            method,
            segments,
            query,
            body: None,
        })
    }

    #[must_use]
    pub fn with_query(mut self, query: QueryPairs) -> Self {
        self.query = query;
        self
    }

    #[must_use]
    pub fn with_body(mut self, body: impl Into<Bytes>) -> Self {
        self.body = Some(body.into());
        self
    }

    /// Serialize `body` as the JSON payload
    pub fn with_json<T: Serialize + ?Sized>(self, body: &T) -> Result<Self> {
        let bytes = serde_json::to_vec(body)?;
        Ok(self.with_body(bytes))
    }
}
