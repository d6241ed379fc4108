//! Common types used throughout the Airtable CDK
//!
//! Wire DTOs for records, list envelopes and the metadata API, plus the
//! dynamically typed `FieldValue` used for record cells.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

// ============================================================================
// HTTP Types
// ============================================================================

/// HTTP method
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Method {
    #[default]
    GET,
    POST,
    PUT,
    PATCH,
    DELETE,
}

impl Method {
    pub fn as_str(self) -> &'static str {
        match self {
            Method::GET => "GET",
            Method::POST => "POST",
            Method::PUT => "PUT",
            Method::PATCH => "PATCH",
            Method::DELETE => "DELETE",
        }
    }
}

impl std::fmt::Display for Method {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<Method> for reqwest::Method {
    fn from(method: Method) -> Self {
        match method {
            Method::GET => reqwest::Method::GET,
            Method::POST => reqwest::Method::POST,
            Method::PUT => reqwest::Method::PUT,
            Method::PATCH => reqwest::Method::PATCH,
            Method::DELETE => reqwest::Method::DELETE,
        }
    }
}

// ============================================================================
// Field Values
// ============================================================================

/// A single cell value.
///
/// The table schema is not known to the client, so cells mirror JSON's
/// dynamic typing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    Null,
    Bool(bool),
    Number(serde_json::Number),
    Text(String),
    List(Vec<FieldValue>),
    Object(BTreeMap<String, FieldValue>),
}

impl FieldValue {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            FieldValue::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            FieldValue::Number(n) => n.as_f64(),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            FieldValue::Number(n) => n.as_i64(),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            FieldValue::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[FieldValue]> {
        match self {
            FieldValue::List(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_object(&self) -> Option<&BTreeMap<String, FieldValue>> {
        match self {
            FieldValue::Object(map) => Some(map),
            _ => None,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, FieldValue::Null)
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        FieldValue::Text(value.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        FieldValue::Text(value)
    }
}

impl From<bool> for FieldValue {
    fn from(value: bool) -> Self {
        FieldValue::Bool(value)
    }
}

impl From<i64> for FieldValue {
    fn from(value: i64) -> Self {
        FieldValue::Number(value.into())
    }
}

impl From<f64> for FieldValue {
    /// Non-finite floats have no JSON representation and become `Null`.
    fn from(value: f64) -> Self {
        serde_json::Number::from_f64(value).map_or(FieldValue::Null, FieldValue::Number)
    }
}

impl<T: Into<FieldValue>> From<Vec<T>> for FieldValue {
    fn from(values: Vec<T>) -> Self {
        FieldValue::List(values.into_iter().map(Into::into).collect())
    }
}

/// Field name to cell value
pub type Fields = BTreeMap<String, FieldValue>;

// ============================================================================
// Records
// ============================================================================

/// A single table record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    pub id: String,
    #[serde(rename = "createdTime")]
    pub created_time: DateTime<Utc>,
    #[serde(default)]
    pub fields: Fields,
}

impl Record {
    /// Look up a field by name
    pub fn field(&self, name: &str) -> Option<&FieldValue> {
        self.fields.get(name)
    }
}

/// One page of a list response.
///
/// `offset` is non-empty exactly when more pages remain.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RecordList {
    #[serde(default)]
    pub records: Vec<Record>,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub offset: String,
}

impl RecordList {
    pub fn has_more(&self) -> bool {
        !self.offset.is_empty()
    }
}

/// Request body for creating or updating a single record
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RecordFields {
    pub fields: Fields,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub typecast: bool,
}

impl RecordFields {
    pub fn new(fields: Fields) -> Self {
        Self {
            fields,
            typecast: false,
        }
    }

    #[must_use]
    pub fn field(mut self, name: impl Into<String>, value: impl Into<FieldValue>) -> Self {
        self.fields.insert(name.into(), value.into());
        self
    }

    /// Let the server convert string values to the column's type
    #[must_use]
    pub fn typecast(mut self, typecast: bool) -> Self {
        self.typecast = typecast;
        self
    }
}

// ============================================================================
// Sorting
// ============================================================================

/// Sort direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

impl SortDirection {
    pub fn as_str(self) -> &'static str {
        match self {
            SortDirection::Asc => "asc",
            SortDirection::Desc => "desc",
        }
    }
}

impl std::str::FromStr for SortDirection {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "asc" | "ascending" => Ok(SortDirection::Asc),
            "desc" | "descending" => Ok(SortDirection::Desc),
            other => Err(format!("unknown sort direction '{other}'")),
        }
    }
}

/// One sort key of a list request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sort {
    pub field: String,
    #[serde(default)]
    pub direction: SortDirection,
}

impl Sort {
    pub fn asc(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            direction: SortDirection::Asc,
        }
    }

    pub fn desc(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            direction: SortDirection::Desc,
        }
    }
}

// ============================================================================
// Attachments
// ============================================================================

/// Attachment cell item
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Attachment {
    pub id: String,
    #[serde(default)]
    pub width: u32,
    #[serde(default)]
    pub height: u32,
    pub url: String,
    #[serde(default)]
    pub filename: String,
    #[serde(default)]
    pub size: u64,
    #[serde(rename = "type", default)]
    pub mime_type: String,
    #[serde(default)]
    pub thumbnails: Option<Thumbnails>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Thumbnails {
    pub small: Option<Thumbnail>,
    pub large: Option<Thumbnail>,
    pub full: Option<Thumbnail>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Thumbnail {
    pub url: String,
    #[serde(default)]
    pub width: u32,
    #[serde(default)]
    pub height: u32,
}

impl Attachment {
    /// Decode an attachment field into typed attachments
    pub fn from_field(value: &FieldValue) -> Option<Vec<Attachment>> {
        let json = serde_json::to_value(value).ok()?;
        serde_json::from_value(json).ok()
    }
}

// ============================================================================
// Metadata API
// ============================================================================

/// Response of `GET meta/bases`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Bases {
    #[serde(default)]
    pub bases: Vec<Base>,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub offset: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Base {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub permission_level: String,
}

/// Response of `GET meta/bases/<id>/tables`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Tables {
    #[serde(default)]
    pub tables: Vec<Table>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Table {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub primary_field_id: String,
    #[serde(default)]
    pub fields: Vec<Field>,
    #[serde(default)]
    pub views: Vec<View>,
}

impl Table {
    /// The field that names each record
    pub fn primary_field(&self) -> Option<&Field> {
        self.fields.iter().find(|f| f.id == self.primary_field_id)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Field {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(rename = "type")]
    pub field_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub options: Option<FieldOptions>,
}

/// Options of linked-record fields
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldOptions {
    #[serde(default)]
    pub is_reversed: bool,
    #[serde(default)]
    pub inverse_link_field_id: Option<String>,
    #[serde(default)]
    pub linked_table_id: Option<String>,
    #[serde(default)]
    pub prefers_single_record_link: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct View {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub view_type: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_record_decodes_dynamic_fields() {
        let record: Record = serde_json::from_value(json!({
            "id": "rec1",
            "createdTime": "2024-01-02T03:04:05.000Z",
            "fields": {
                "Name": "Alice",
                "Age": 42,
                "Score": 9.5,
                "Active": true,
                "Tags": ["a", "b"],
                "Owner": {"id": "usr1", "email": "a@example.com"},
                "Empty": null
            }
        }))
        .unwrap();

        assert_eq!(record.id, "rec1");
        assert_eq!(record.field("Name").and_then(FieldValue::as_str), Some("Alice"));
        assert_eq!(record.field("Age").and_then(FieldValue::as_i64), Some(42));
        assert_eq!(record.field("Score").and_then(FieldValue::as_f64), Some(9.5));
        assert_eq!(record.field("Active").and_then(FieldValue::as_bool), Some(true));
        assert_eq!(record.field("Tags").and_then(FieldValue::as_list).map(<[_]>::len), Some(2));
        let owner = record.field("Owner").and_then(FieldValue::as_object).unwrap();
        assert_eq!(owner.get("email").and_then(FieldValue::as_str), Some("a@example.com"));
        assert!(record.field("Empty").unwrap().is_null());
    }

    #[test]
    fn test_record_list_offset_defaults_to_empty() {
        let list: RecordList = serde_json::from_value(json!({"records": []})).unwrap();
        assert!(list.offset.is_empty());
        assert!(!list.has_more());

        let list: RecordList =
            serde_json::from_value(json!({"records": [], "offset": "itr1/rec9"})).unwrap();
        assert!(list.has_more());
    }

    #[test]
    fn test_record_fields_body() {
        let body = RecordFields::default()
            .field("Name", "Bob")
            .field("Count", 3i64)
            .typecast(true);
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json, json!({"fields": {"Count": 3, "Name": "Bob"}, "typecast": true}));

        let json = serde_json::to_value(RecordFields::default().field("A", true)).unwrap();
        assert!(json.get("typecast").is_none());
    }

    #[test]
    fn test_sort_direction_parse() {
        assert_eq!("DESC".parse::<SortDirection>(), Ok(SortDirection::Desc));
        assert_eq!("asc".parse::<SortDirection>(), Ok(SortDirection::Asc));
        assert!("sideways".parse::<SortDirection>().is_err());
        assert_eq!(SortDirection::default(), SortDirection::Asc);
    }

    #[test]
    fn test_attachment_from_field() {
        let record: Record = serde_json::from_value(json!({
            "id": "rec1",
            "createdTime": "2024-01-02T03:04:05.000Z",
            "fields": {
                "Photo": [{
                    "id": "att1",
                    "url": "https://dl.example.com/a.png",
                    "filename": "a.png",
                    "size": 1024,
                    "type": "image/png",
                    "width": 10,
                    "height": 20,
                    "thumbnails": {"small": {"url": "https://dl.example.com/s.png", "width": 1, "height": 2}}
                }]
            }
        }))
        .unwrap();

        let attachments = Attachment::from_field(record.field("Photo").unwrap()).unwrap();
        assert_eq!(attachments.len(), 1);
        assert_eq!(attachments[0].mime_type, "image/png");
        assert_eq!(
            attachments[0].thumbnails.as_ref().and_then(|t| t.small.as_ref()).map(|s| s.width),
            Some(1)
        );
    }

    #[test]
    fn test_table_schema_decodes() {
        let tables: Tables = serde_json::from_value(json!({
            "tables": [{
                "id": "tbl1",
                "name": "People",
                "primaryFieldId": "fld1",
                "fields": [
                    {"id": "fld1", "name": "Name", "type": "singleLineText"},
                    {"id": "fld2", "name": "Team", "type": "multipleRecordLinks",
                     "options": {"linkedTableId": "tbl2", "isReversed": false,
                                 "prefersSingleRecordLink": true, "inverseLinkFieldId": "fld9"}}
                ],
                "views": [{"id": "viw1", "name": "Grid view", "type": "grid"}]
            }]
        }))
        .unwrap();

        let table = &tables.tables[0];
        assert_eq!(table.primary_field().map(|f| f.name.as_str()), Some("Name"));
        let options = table.fields[1].options.as_ref().unwrap();
        assert_eq!(options.linked_table_id.as_deref(), Some("tbl2"));
        assert!(options.prefers_single_record_link);
        assert_eq!(table.views[0].view_type, "grid");
    }
}
