//! File URLs and protected file tokens.

use tracing::instrument;
use url::Url;

use pbase_core::{Operation, Result};

use crate::client::Client;
use crate::endpoints::{FILES, FILES_TOKEN, FileTokenResponse};
use crate::request::RequestSpec;

/// Query options for a file URL.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FileUrlOptions {
    /// Thumbnail size such as `100x100`.
    pub thumb: Option<String>,
    /// File token for protected files.
    pub token: Option<String>,
    /// Ask the server to send `Content-Disposition: attachment`.
    pub download: bool,
}

impl FileUrlOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_thumb(mut self, thumb: impl Into<String>) -> Self {
        self.thumb = Some(thumb.into());
        self
    }

    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    pub fn with_download(mut self, download: bool) -> Self {
        self.download = download;
        self
    }

    fn query(&self) -> Vec<(&'static str, &str)> {
        let mut pairs = Vec::new();
        if let Some(thumb) = self.thumb.as_deref().filter(|t| !t.is_empty()) {
            pairs.push(("thumb", thumb));
        }
        if let Some(token) = self.token.as_deref().filter(|t| !t.is_empty()) {
            pairs.push(("token", token));
        }
        if self.download {
            pairs.push(("download", "1"));
        }
        pairs
    }
}

#[derive(Debug, Clone)]
pub struct Files {
    client: Client,
}

impl Files {
    pub(crate) fn new(client: Client) -> Self {
        Self { client }
    }

    /// Request a short-lived token for protected files.
    #[instrument(skip(self))]
    pub async fn token(&self) -> Result<String> {
        let response: FileTokenResponse = self
            .client
            .call(Operation::Files, RequestSpec::post(FILES_TOKEN))
            .await?;
        Ok(response.token)
    }

    /// Build the URL of a file stored on a record. No request is sent.
    pub fn url(
        &self,
        collection: &str,
        record_id: &str,
        filename: &str,
        options: &FileUrlOptions,
    ) -> Result<Url> {
        let mut url = self.client.base_url().endpoint_url(FILES)?;
        if let Ok(mut segments) = url.path_segments_mut() {
            segments.push(collection).push(record_id).push(filename);
        }

        let query = options.query();
        if !query.is_empty() {
            url.query_pairs_mut().extend_pairs(query);
        }
        Ok(url)
    }
}
