//! Endpoint paths and wire request/response types.

use serde::{Deserialize, Serialize};

// ============================================================================
// Endpoint Paths
// ============================================================================

/// Records of one collection.
pub const RECORDS: &str = "/api/collections/{collection}/records";

/// One record by id.
pub const RECORD: &str = "/api/collections/{collection}/records/{id}";

/// Collection metadata listing.
pub const COLLECTIONS: &str = "/api/collections";

/// One collection's metadata.
pub const COLLECTION: &str = "/api/collections/{collection}";

/// Backup archives.
pub const BACKUPS: &str = "/api/backups";

/// One backup archive.
pub const BACKUP: &str = "/api/backups/{key}";

/// Restore from a backup archive.
pub const BACKUP_RESTORE: &str = "/api/backups/{key}/restore";

/// Protected file access token.
pub const FILES_TOKEN: &str = "/api/files/token";

/// Root of file download URLs.
pub const FILES: &str = "/api/files";

// ============================================================================
// Request/Response Types
// ============================================================================

/// Request body for `auth-with-password`.
#[derive(Debug, Serialize)]
pub struct PasswordAuthRequest<'a> {
    pub identity: &'a str,
    pub password: &'a str,
}

/// Response from `auth-with-password` and `auth-refresh`.
#[derive(Debug, Deserialize)]
pub struct AuthResponse {
    #[serde(default)]
    pub token: String,
    /// The authenticated record (`admin` on older servers).
    #[serde(default, alias = "admin")]
    pub record: Option<serde_json::Value>,
}

/// Request body for creating a backup.
#[derive(Debug, Serialize)]
pub struct CreateBackupRequest<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<&'a str>,
}

/// Response from the file token endpoint.
#[derive(Debug, Deserialize)]
pub struct FileTokenResponse {
    pub token: String,
}
