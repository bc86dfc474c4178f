//! HTTP request executor.

use std::borrow::Cow;

use reqwest::header::{AUTHORIZATION, CONTENT_TYPE};
use serde::de::DeserializeOwned;
use tracing::{debug, instrument, trace, warn};

use pbase_core::error::{DecodeError, ServerError, TransportError};
use pbase_core::{BaseUrl, Result};

use crate::config::{ClientConfig, RetryConfig};
use crate::request::RequestSpec;

/// Sends [`RequestSpec`]s over one shared connection pool.
///
/// The executor owns the only retry loop in the library. Non-2xx responses
/// become [`ServerError`]s, undecodable bodies [`DecodeError`]s.
#[derive(Debug, Clone)]
pub struct HttpExecutor {
    client: reqwest::Client,
    base: BaseUrl,
    retry: RetryConfig,
    debug: bool,
}

impl HttpExecutor {
    /// Build the executor and its connection pool.
    ///
    /// # Errors
    ///
    /// Returns a transport error if the HTTP client can't be initialized.
    pub fn new(config: &ClientConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(&config.user_agent)
            .timeout(config.timeout)
            .build()
            .map_err(transport_error)?;

        Ok(Self {
            client,
            base: config.base_url.clone(),
            retry: config.retry.clone(),
            debug: config.debug,
        })
    }

    /// Returns the base URL requests are sent to.
    pub fn base_url(&self) -> &BaseUrl {
        &self.base
    }

    /// Send a request and decode the JSON response body.
    #[instrument(skip(self, spec), fields(method = %spec.method()))]
    pub async fn send<R: DeserializeOwned>(&self, spec: RequestSpec<'_>) -> Result<R> {
        let body = self.execute(&spec).await?;
        serde_json::from_slice(&body)
            .map_err(|e| DecodeError::new(std::any::type_name::<R>(), e, &body).into())
    }

    /// Send a request whose response body carries nothing of interest.
    #[instrument(skip(self, spec), fields(method = %spec.method()))]
    pub async fn send_no_content(&self, spec: RequestSpec<'_>) -> Result<()> {
        self.execute(&spec).await.map(|_| ())
    }

    async fn execute(&self, spec: &RequestSpec<'_>) -> Result<Vec<u8>> {
        let url = self.base.endpoint(&spec.resolve_path()?);
        let mut attempt = 0u32;

        loop {
            let mut request = self
                .client
                .request(spec.method().clone(), &url)
                .header(CONTENT_TYPE, "application/json");

            if !spec.query().is_empty() {
                request = request.query(spec.query());
            }
            if let Some(token) = spec.token() {
                request = request.header(AUTHORIZATION, token.bearer());
            }
            if let Some(body) = spec.body() {
                request = request.body(body.to_vec());
            }

            if self.debug {
                debug!(
                    method = %spec.method(),
                    %url,
                    query = ?spec.query(),
                    body = %loggable_body(spec, spec.body().unwrap_or_default()),
                    authorized = spec.token().is_some(),
                    "request"
                );
            } else {
                trace!(method = %spec.method(), %url, "request");
            }

            let response = match request.send().await {
                Ok(response) => response,
                Err(err) if attempt < self.retry.max_retries && is_retryable(&err) => {
                    let wait = self.retry.backoff_for_attempt(attempt);
                    warn!(error = %err, attempt, ?wait, "request failed, retrying");
                    tokio::time::sleep(wait).await;
                    attempt += 1;
                    continue;
                }
                Err(err) => return Err(transport_error(err).into()),
            };

            let status = response.status();
            if !status.is_success()
                && attempt < self.retry.max_retries
                && self.retry.should_retry_status(status.as_u16())
            {
                let wait = self.retry.backoff_for_attempt(attempt);
                warn!(status = status.as_u16(), attempt, ?wait, "transient status, retrying");
                tokio::time::sleep(wait).await;
                attempt += 1;
                continue;
            }

            let body = response.bytes().await.map_err(transport_error)?.to_vec();

            if self.debug {
                debug!(
                    status = status.as_u16(),
                    body = %loggable_body(spec, &body),
                    "response"
                );
            } else {
                trace!(status = status.as_u16(), len = body.len(), "response");
            }

            if status.is_success() {
                return Ok(body);
            }

            return Err(ServerError::new(
                status.as_u16(),
                String::from_utf8_lossy(&body),
                status.canonical_reason(),
            )
            .into());
        }
    }
}

/// Body text for debug logs; sensitive bodies are reduced to their length.
fn loggable_body<'a>(spec: &RequestSpec<'_>, body: &'a [u8]) -> Cow<'a, str> {
    if spec.is_sensitive() {
        Cow::Owned(format!("[REDACTED {} bytes]", body.len()))
    } else {
        String::from_utf8_lossy(body)
    }
}

fn is_retryable(err: &reqwest::Error) -> bool {
    err.is_connect() || err.is_timeout()
}

/// Classify a reqwest failure.
pub(crate) fn transport_error(err: reqwest::Error) -> TransportError {
    if err.is_timeout() {
        TransportError::Timeout {
            message: err.to_string(),
        }
    } else if err.is_connect() {
        TransportError::Connection {
            message: err.to_string(),
        }
    } else {
        TransportError::Http {
            message: err.to_string(),
        }
    }
}
