//! Schema-agnostic record value.

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::DecodeError;

/// Timestamp layout used by the service for `created`/`updated`.
const SERVICE_DATETIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.fZ";

/// One record of a collection.
///
/// A record is a JSON object. The server manages `id`, `created` and
/// `updated`; any of them may be missing when a `fields` projection
/// excluded it. Everything else is interpreted by the caller.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Record(Map<String, Value>);

impl Record {
    /// Wrap a JSON object.
    pub fn new(fields: Map<String, Value>) -> Self {
        Self(fields)
    }

    /// Server-assigned identifier.
    pub fn id(&self) -> Option<&str> {
        self.get_str("id")
    }

    /// Raw `created` timestamp.
    pub fn created(&self) -> Option<&str> {
        self.get_str("created")
    }

    /// Raw `updated` timestamp.
    pub fn updated(&self) -> Option<&str> {
        self.get_str("updated")
    }

    /// `created` parsed as UTC.
    pub fn created_at(&self) -> Option<DateTime<Utc>> {
        self.created().and_then(parse_timestamp)
    }

    /// `updated` parsed as UTC.
    pub fn updated_at(&self) -> Option<DateTime<Utc>> {
        self.updated().and_then(parse_timestamp)
    }

    pub fn get(&self, field: &str) -> Option<&Value> {
        self.0.get(field)
    }

    pub fn get_str(&self, field: &str) -> Option<&str> {
        self.0.get(field).and_then(Value::as_str)
    }

    pub fn fields(&self) -> &Map<String, Value> {
        &self.0
    }

    pub fn into_inner(self) -> Map<String, Value> {
        self.0
    }

    /// Decode the record into a caller-defined type.
    pub fn deserialize_into<T: DeserializeOwned>(&self) -> Result<T, DecodeError> {
        serde_json::from_value(Value::Object(self.0.clone())).map_err(|e| {
            let body = serde_json::to_vec(&self.0).unwrap_or_default();
            DecodeError::new(std::any::type_name::<T>(), e, &body)
        })
    }
}

impl From<Map<String, Value>> for Record {
    fn from(fields: Map<String, Value>) -> Self {
        Self(fields)
    }
}

static NULL: Value = Value::Null;

/// Missing fields index as `Value::Null`, like indexing a `Value`.
impl std::ops::Index<&str> for Record {
    type Output = Value;

    fn index(&self, field: &str) -> &Value {
        self.0.get(field).unwrap_or(&NULL)
    }
}

/// Parse a service timestamp (`2024-01-31 12:00:00.123Z`) or RFC 3339.
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    if raw.is_empty() {
        return None;
    }
    if let Ok(naive) = NaiveDateTime::parse_from_str(raw, SERVICE_DATETIME_FORMAT) {
        return Some(naive.and_utc());
    }
    DateTime::parse_from_rfc3339(raw)
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}
