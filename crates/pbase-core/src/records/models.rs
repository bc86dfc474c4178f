//! Response models for creates and resource endpoints.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::record::{Record, parse_timestamp};

/// Result of creating a record.
#[derive(Debug, Clone, PartialEq)]
pub struct CreateResult {
    /// Server-assigned identifier.
    pub id: String,
    /// The full record as echoed by the server.
    pub record: Record,
}

impl CreateResult {
    /// Build from the echoed record; `None` if it carries no `id`.
    pub fn from_record(record: Record) -> Option<Self> {
        let id = record.id()?.to_string();
        Some(Self { id, record })
    }
}

/// Schema metadata of one collection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CollectionModel {
    pub id: String,
    pub name: String,
    #[serde(rename = "type", default)]
    pub kind: String,
    #[serde(default)]
    pub system: bool,
    /// Field definitions, kept as raw JSON (`schema` on older servers).
    #[serde(default, alias = "schema")]
    pub fields: Value,
    #[serde(default)]
    pub list_rule: Option<String>,
    #[serde(default)]
    pub view_rule: Option<String>,
    #[serde(default)]
    pub create_rule: Option<String>,
    #[serde(default)]
    pub update_rule: Option<String>,
    #[serde(default)]
    pub delete_rule: Option<String>,
    #[serde(default)]
    pub created: String,
    #[serde(default)]
    pub updated: String,
    /// Keys not modelled above.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl CollectionModel {
    pub fn is_auth(&self) -> bool {
        self.kind == "auth"
    }
}

/// A backup archive stored by the service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BackupFileInfo {
    pub key: String,
    #[serde(default)]
    pub size: u64,
    #[serde(default)]
    pub modified: String,
}

impl BackupFileInfo {
    pub fn modified_at(&self) -> Option<DateTime<Utc>> {
        parse_timestamp(&self.modified)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn create_result_takes_server_id() {
        let record: Record = serde_json::from_value(json!({"id": "abc123", "title": "x"})).unwrap();
        let created = CreateResult::from_record(record).unwrap();
        assert_eq!(created.id, "abc123");
        assert_eq!(created.record["title"], "x");
    }

    #[test]
    fn create_result_requires_id() {
        let record: Record = serde_json::from_value(json!({"title": "x"})).unwrap();
        assert!(CreateResult::from_record(record).is_none());
    }

    #[test]
    fn collection_model_decodes_legacy_schema_key() {
        let model: CollectionModel = serde_json::from_value(json!({
            "id": "pbc_1",
            "name": "users",
            "type": "auth",
            "system": false,
            "schema": [{"name": "avatar", "type": "file"}],
            "listRule": "id = @request.auth.id",
            "viewRule": null,
            "options": {"allowEmailAuth": true}
        }))
        .unwrap();

        assert!(model.is_auth());
        assert_eq!(model.fields[0]["name"], "avatar");
        assert_eq!(model.list_rule.as_deref(), Some("id = @request.auth.id"));
        assert!(model.view_rule.is_none());
        assert!(model.extra.contains_key("options"));
    }

    #[test]
    fn backup_info_timestamp() {
        let info: BackupFileInfo = serde_json::from_value(json!({
            "key": "pb_backup_20240101.zip",
            "size": 2048,
            "modified": "2024-01-01 00:00:00.000Z"
        }))
        .unwrap();
        assert_eq!(info.size, 2048);
        assert!(info.modified_at().is_some());
    }
}
