//! Operation parameters and query encoding
//!
//! `Parameters` names the table an operation targets and carries the
//! optional list controls (view, fields, sort, formula, paging bounds,
//! cursor). Encoding follows the API's bracketed query conventions:
//! `fields[]` repeats once per field and sort keys are zero-indexed
//! (`sort[0][field]`, `sort[0][direction]`).

use crate::error::{Error, Result};
use crate::types::{Sort, SortDirection};
use serde::{Deserialize, Serialize};

/// Ordered query pairs. Keys may repeat.
pub type QueryPairs = Vec<(String, String)>;

/// Parameters of a single table operation
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Parameters {
    /// Table name or id
    pub name: String,
    /// Total number of records returned across all pages
    #[serde(default)]
    pub max_records: Option<u32>,
    /// Records per page (the API caps this at 100)
    #[serde(default)]
    pub page_size: Option<u32>,
    /// Name or id of a view to read through
    #[serde(default)]
    pub view: Option<String>,
    /// Only return these fields
    #[serde(default)]
    pub fields: Vec<String>,
    #[serde(default)]
    pub user_locale: Option<String>,
    #[serde(default)]
    pub time_zone: Option<String>,
    /// Formula a record must satisfy to be listed
    #[serde(default)]
    pub filter_by_formula: Option<String>,
    #[serde(default)]
    pub sort: Vec<Sort>,
    /// Key returned fields by field id instead of name
    #[serde(default)]
    pub return_fields_by_field_id: Option<bool>,
    /// Pagination cursor; empty means "from the start"
    #[serde(default)]
    pub offset: String,
}

impl Parameters {
    /// Parameters targeting `table`
    pub fn table(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn max_records(mut self, max: u32) -> Self {
        self.max_records = Some(max);
        self
    }

    #[must_use]
    pub fn page_size(mut self, size: u32) -> Self {
        self.page_size = Some(size);
        self
    }

    #[must_use]
    pub fn view(mut self, view: impl Into<String>) -> Self {
        self.view = Some(view.into());
        self
    }

    #[must_use]
    pub fn field(mut self, field: impl Into<String>) -> Self {
        self.fields.push(field.into());
        self
    }

    #[must_use]
    pub fn fields<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.fields.extend(fields.into_iter().map(Into::into));
        self
    }

    #[must_use]
    pub fn sort_by(mut self, field: impl Into<String>, direction: SortDirection) -> Self {
        self.sort.push(Sort {
            field: field.into(),
            direction,
        });
        self
    }

    #[must_use]
    pub fn filter_by_formula(mut self, formula: impl Into<String>) -> Self {
        self.filter_by_formula = Some(formula.into());
        self
    }

    #[must_use]
    pub fn user_locale(mut self, locale: impl Into<String>) -> Self {
        self.user_locale = Some(locale.into());
        self
    }

    #[must_use]
    pub fn time_zone(mut self, zone: impl Into<String>) -> Self {
        self.time_zone = Some(zone.into());
        self
    }

    #[must_use]
    pub fn return_fields_by_field_id(mut self, enabled: bool) -> Self {
        self.return_fields_by_field_id = Some(enabled);
        self
    }

    #[must_use]
    pub fn offset(mut self, offset: impl Into<String>) -> Self {
        self.offset = offset.into();
        self
    }

    /// Fail fast when no table is named
    pub fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(Error::validation("table name is required"));
        }
        Ok(())
    }

    /// Query for list requests
    pub fn list_query(&self) -> QueryPairs {
        let mut query = QueryPairs::new();

        if !self.offset.is_empty() {
            push(&mut query, "offset", &self.offset);
        }
        if let Some(max) = self.max_records {
            push(&mut query, "maxRecords", max.to_string());
        }
        if let Some(size) = self.page_size {
            push(&mut query, "pageSize", size.to_string());
        }
        if let Some(view) = non_empty(&self.view) {
            push(&mut query, "view", view);
        }
        for field in &self.fields {
            push(&mut query, "fields[]", field);
        }
        for (i, sort) in self.sort.iter().enumerate() {
            push(&mut query, format!("sort[{i}][field]"), &sort.field);
            push(&mut query, format!("sort[{i}][direction]"), sort.direction.as_str());
        }
        if let Some(formula) = non_empty(&self.filter_by_formula) {
            push(&mut query, "filterByFormula", formula);
        }

        query.extend(self.record_query());
        query
    }

    /// Query for get/create/update requests
    pub fn record_query(&self) -> QueryPairs {
        let mut query = QueryPairs::new();
        if let Some(locale) = non_empty(&self.user_locale) {
            push(&mut query, "userLocale", locale);
        }
        if let Some(zone) = non_empty(&self.time_zone) {
            push(&mut query, "timeZone", zone);
        }
        if let Some(by_id) = self.return_fields_by_field_id {
            push(&mut query, "returnFieldsByFieldId", by_id.to_string());
        }
        query
    }
}

fn push(query: &mut QueryPairs, key: impl Into<String>, value: impl Into<String>) {
    query.push((key.into(), value.into()));
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.is_empty())
}
