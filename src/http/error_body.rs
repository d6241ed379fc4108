//! Best-effort decoding of API error bodies
//!
//! The API reports errors in one of two envelopes:
//! `{"error": "NOT_FOUND"}` or
//! `{"error": {"type": "INVALID_VALUE", "message": "..."}}`.
//! Candidate decoders run in order; when none matches, the raw body is
//! returned as text. Decoding never fails.

use serde::Deserialize;

type Decoder = fn(&[u8]) -> Option<String>;

const DECODERS: &[Decoder] = &[detailed, general];

#[derive(Deserialize)]
struct DetailedError {
    error: DetailedInner,
}

#[derive(Deserialize)]
struct DetailedInner {
    #[serde(default)]
    message: String,
    #[serde(rename = "type", default)]
    kind: String,
}

#[derive(Deserialize)]
struct GeneralError {
    error: String,
}

/// Diagnostic text for an error response body
pub fn decode_error_body(body: &[u8]) -> String {
    DECODERS
        .iter()
        .find_map(|decode| decode(body))
        .unwrap_or_else(|| String::from_utf8_lossy(body).trim().to_string())
}

fn detailed(body: &[u8]) -> Option<String> {
    let parsed: DetailedError = serde_json::from_slice(body).ok()?;
    let parts: Vec<&str> = [parsed.error.message.as_str(), parsed.error.kind.as_str()]
        .into_iter()
        .filter(|part| !part.is_empty())
        .collect();
    if parts.is_empty() {
        return None;
    }
    Some(parts.join(", "))
}

fn general(body: &[u8]) -> Option<String> {
    serde_json::from_slice::<GeneralError>(body)
        .ok()
        .map(|parsed| parsed.error)
}
