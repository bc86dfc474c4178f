//! Backup archive management.

use tracing::{info, instrument};
use url::Url;

use pbase_core::{BackupFileInfo, Operation, Result};

use crate::client::Client;
use crate::endpoints::{BACKUP, BACKUP_RESTORE, BACKUPS, CreateBackupRequest};
use crate::request::RequestSpec;

/// Superuser-only backup operations.
#[derive(Debug, Clone)]
pub struct Backups {
    client: Client,
}

impl Backups {
    pub(crate) fn new(client: Client) -> Self {
        Self { client }
    }

    /// List every stored archive.
    #[instrument(skip(self))]
    pub async fn list(&self) -> Result<Vec<BackupFileInfo>> {
        self.client
            .call(Operation::Backups, RequestSpec::get(BACKUPS))
            .await
    }

    /// Start a new backup. Without a name the server picks one.
    #[instrument(skip(self))]
    pub async fn create(&self, name: Option<&str>) -> Result<()> {
        let request = CreateBackupRequest {
            name: name.filter(|n| !n.is_empty()),
        };
        let spec = RequestSpec::post(BACKUPS)
            .with_json(&request)
            .map_err(|e| e.in_operation(Operation::Backups))?;
        self.client.call_no_content(Operation::Backups, spec).await?;
        info!("backup requested");
        Ok(())
    }

    #[instrument(skip(self))]
    pub async fn delete(&self, key: &str) -> Result<()> {
        let spec = RequestSpec::delete(BACKUP).with_param("key", key);
        self.client.call_no_content(Operation::Backups, spec).await
    }

    /// Replace the current data with the archive `key`.
    ///
    /// The server restarts once the restore completes.
    #[instrument(skip(self))]
    pub async fn restore(&self, key: &str) -> Result<()> {
        let spec = RequestSpec::post(BACKUP_RESTORE).with_param("key", key);
        self.client.call_no_content(Operation::Backups, spec).await?;
        info!(key, "restore started");
        Ok(())
    }

    /// Download URL for an archive, authorized by a file token.
    ///
    /// See [`Files::token`](crate::Files::token) for obtaining one.
    pub fn download_url(&self, key: &str, file_token: &str) -> Result<Url> {
        let mut url = self.client.base_url().endpoint_url(BACKUPS)?;
        if let Ok(mut segments) = url.path_segments_mut() {
            segments.push(key);
        }
        url.query_pairs_mut().append_pair("token", file_token);
        Ok(url)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn download_url_carries_token() {
        let client = Client::builder("http://127.0.0.1:8090").build().unwrap();
        let url = client
            .backups()
            .download_url("pb_backup_2024.zip", "ftok")
            .unwrap();
        assert_eq!(
            url.as_str(),
            "http://127.0.0.1:8090/api/backups/pb_backup_2024.zip?token=ftok"
        );
    }

    #[test]
    fn download_url_escapes_key() {
        let client = Client::builder("http://127.0.0.1:8090").build().unwrap();
        let url = client.backups().download_url("a b.zip", "t").unwrap();
        assert_eq!(url.path(), "/api/backups/a%20b.zip");
    }
}
