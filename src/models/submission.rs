//! Wire models for the feedback backend.
//!
//! - `SubmissionRequest`, `SubmitResponse`: `POST /api/submit`
//! - `Submission`: one element of `GET /api/admin/list`
//! - `ServiceInfo`: `GET /`

use chrono::{DateTime, NaiveDateTime, Utc};
use log::warn;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

pub const MIN_RATING: u8 = 1;
pub const MAX_RATING: u8 = 5;

/// Upper bound the backend enforces on `review_text`.
pub const MAX_REVIEW_CHARS: usize = 2000;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SubmissionRequest {
    pub rating: u8,
    pub review_text: String,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum SubmitStatus {
    #[default]
    Success,
    /// Stored, but the backend's AI step failed and fallback text was used.
    PartialSuccess,
    #[serde(other)]
    Unknown,
}

impl SubmitStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            SubmitStatus::Success => "success",
            SubmitStatus::PartialSuccess => "partial_success",
            SubmitStatus::Unknown => "unknown",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SubmitResponse {
    #[serde(default)]
    pub status: SubmitStatus,
    pub ai_user_response: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Submission {
    pub id: i64,
    pub rating: u8,
    pub review_text: String,
    #[serde(default)]
    pub ai_summary: Option<String>,
    #[serde(default)]
    pub ai_actions: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ai_user_response: Option<String>,
    #[serde(default, deserialize_with = "deserialize_timestamp")]
    pub created_at: Option<DateTime<Utc>>,
}

impl Submission {
    /// Summary text, or `None` while the backend has not produced one yet.
    pub fn summary(&self) -> Option<&str> {
        self.ai_summary
            .as_deref()
            .map(str::trim)
            .filter(|summary| !summary.is_empty())
    }

    pub fn actions(&self) -> &[String] {
        self.ai_actions.as_deref().unwrap_or(&[])
    }

    pub fn has_valid_rating(&self) -> bool {
        (MIN_RATING..=MAX_RATING).contains(&self.rating)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ServiceInfo {
    pub message: String,
}

/// Decodes a list body. Anything other than a JSON array yields an empty
/// list; array elements that are not submissions are dropped.
pub fn decode_submission_list(body: Value) -> Vec<Submission> {
    let items = match body {
        Value::Array(items) => items,
        other => {
            warn!(
                "list response was not an array ({}), treating as empty",
                json_kind(&other)
            );
            return Vec::new();
        }
    };

    items
        .into_iter()
        .enumerate()
        .filter_map(|(index, item)| match serde_json::from_value::<Submission>(item) {
            Ok(submission) => Some(submission),
            Err(err) => {
                warn!("skipping list entry {index}: {err}");
                None
            }
        })
        .collect()
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Accepts RFC 3339 timestamps as well as naive ones (treated as UTC).
/// Unparseable values become `None` rather than failing the whole entry.
fn deserialize_timestamp<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    Ok(raw.as_deref().and_then(parse_timestamp))
}

fn parse_timestamp(value: &str) -> Option<DateTime<Utc>> {
    if let Ok(parsed) = DateTime::parse_from_rfc3339(value) {
        return Some(parsed.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S%.f")
        .or_else(|_| NaiveDateTime::parse_from_str(value, "%Y-%m-%d %H:%M:%S%.f"))
        .map(|naive| naive.and_utc())
        .ok()
}
