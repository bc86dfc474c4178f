//! Record collection client.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, instrument};

use pbase_core::error::{DecodeError, Error};
use pbase_core::{
    AuthToken, BaseUrl, CreateResult, ListParams, ListResult, Operation, PageSource, PartialList,
    Record, Result, collect_all_pages,
};

use crate::auth::Authenticator;
use crate::backups::Backups;
use crate::collections::Collections;
use crate::config::{AuthConfig, ClientConfig, RetryConfig};
use crate::endpoints::{RECORD, RECORDS};
use crate::executor::HttpExecutor;
use crate::files::Files;
use crate::request::RequestSpec;

/// Session-aware client for a record service.
///
/// Every operation first asks the [`Authenticator`] for a credential and
/// then sends exactly one request (or, for [`full_list`](Self::full_list),
/// one request per page). Clones share the connection pool and credential.
///
/// # Example
///
/// ```no_run
/// use pbase_core::ListParams;
/// use pbase_http::Client;
/// use serde_json::json;
///
/// # async fn example() -> Result<(), pbase_core::Error> {
/// let client = Client::builder("http://127.0.0.1:8090")
///     .with_admin_email_password("root@example.com", "secret")
///     .build()?;
///
/// let created = client.create("notes", &json!({"title": "x"})).await?;
/// let note = client.read("notes", &created.id).await?;
/// println!("{:?}", note.get("title"));
///
/// let all = client.full_list("notes", &ListParams::new().with_sort("-created")).await?;
/// println!("{} notes", all.items.len());
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct Client {
    inner: Arc<ClientInner>,
}

struct ClientInner {
    executor: HttpExecutor,
    auth: Authenticator,
    config: ClientConfig,
}

impl Client {
    /// Create a client from a complete configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP transport can't be initialized.
    pub fn new(config: ClientConfig) -> Result<Self> {
        let executor = HttpExecutor::new(&config)?;
        let auth = Authenticator::new(config.auth.clone().into_strategy());

        Ok(Self {
            inner: Arc::new(ClientInner {
                executor,
                auth,
                config,
            }),
        })
    }

    /// Start building a client for the service at `base_url`.
    pub fn builder(base_url: impl Into<String>) -> ClientBuilder {
        ClientBuilder::new(base_url)
    }

    pub fn base_url(&self) -> &BaseUrl {
        self.inner.executor.base_url()
    }

    pub fn config(&self) -> &ClientConfig {
        &self.inner.config
    }

    /// Read access to the credential store.
    pub fn auth_store(&self) -> &Authenticator {
        &self.inner.auth
    }

    /// Make sure a credential is held, authenticating if needed.
    pub async fn authorize(&self) -> Result<()> {
        self.inner.auth.ensure(&self.inner.executor).await.map(|_| ())
    }

    pub fn collections(&self) -> Collections {
        Collections::new(self.clone())
    }

    pub fn backups(&self) -> Backups {
        Backups::new(self.clone())
    }

    pub fn files(&self) -> Files {
        Files::new(self.clone())
    }

    // ========================================================================
    // Record Operations
    // ========================================================================

    /// Create a record in `collection`.
    ///
    /// # Returns
    ///
    /// The server-assigned id and the echoed record.
    #[instrument(skip(self, body), fields(%collection))]
    pub async fn create<B>(&self, collection: &str, body: &B) -> Result<CreateResult>
    where
        B: Serialize + ?Sized,
    {
        debug!("Creating record");
        let spec = RequestSpec::post(RECORDS)
            .with_param("collection", collection)
            .with_json(body)
            .map_err(|e| e.in_operation(Operation::Create))?;

        let record: Record = self.call(Operation::Create, spec).await?;
        let echoed = serde_json::to_vec(&record).unwrap_or_default();
        CreateResult::from_record(record).ok_or_else(|| {
            let source = serde_json::Error::io(std::io::Error::new(
                std::io::ErrorKind::InvalidData,
                "created record has no id",
            ));
            Error::from(DecodeError::new("CreateResult", source, &echoed))
                .in_operation(Operation::Create)
        })
    }

    /// Fetch one record as a generic JSON object.
    pub async fn read(&self, collection: &str, id: &str) -> Result<Record> {
        self.read_as(collection, id).await
    }

    /// Fetch one record and decode it into `T`.
    #[instrument(skip(self), fields(%collection, %id))]
    pub async fn read_as<T: DeserializeOwned>(&self, collection: &str, id: &str) -> Result<T> {
        debug!("Reading record");
        let spec = RequestSpec::get(RECORD)
            .with_param("collection", collection)
            .with_param("id", id);
        self.call(Operation::Read, spec).await
    }

    /// Patch a record. Success carries no body.
    #[instrument(skip(self, body), fields(%collection, %id))]
    pub async fn update<B>(&self, collection: &str, id: &str, body: &B) -> Result<()>
    where
        B: Serialize + ?Sized,
    {
        debug!("Updating record");
        let spec = RequestSpec::patch(RECORD)
            .with_param("collection", collection)
            .with_param("id", id)
            .with_json(body)
            .map_err(|e| e.in_operation(Operation::Update))?;
        self.call_no_content(Operation::Update, spec).await
    }

    /// Delete a record.
    #[instrument(skip(self), fields(%collection, %id))]
    pub async fn delete(&self, collection: &str, id: &str) -> Result<()> {
        debug!("Deleting record");
        let spec = RequestSpec::delete(RECORD)
            .with_param("collection", collection)
            .with_param("id", id);
        self.call_no_content(Operation::Delete, spec).await
    }

    /// Fetch one page of records exactly as the server reports it.
    pub async fn list(&self, collection: &str, params: &ListParams) -> Result<ListResult<Record>> {
        self.list_as(collection, params).await
    }

    /// Fetch one page of records decoded into `T`.
    #[instrument(skip(self), fields(%collection))]
    pub async fn list_as<T: DeserializeOwned>(
        &self,
        collection: &str,
        params: &ListParams,
    ) -> Result<ListResult<T>> {
        let token = self
            .ensure()
            .await
            .map_err(|e| e.in_operation(Operation::List))?;
        self.fetch_page(collection, params, token, Operation::List)
            .await
    }

    /// Fetch every record matching `params`, ignoring its page and size.
    ///
    /// Authenticates once, then walks the pages in order.
    ///
    /// # Errors
    ///
    /// A failing page stops the walk; the [`PartialList`] holds the items
    /// fetched before it. Use `?` to turn it into an [`Error`].
    pub async fn full_list(
        &self,
        collection: &str,
        params: &ListParams,
    ) -> std::result::Result<ListResult<Record>, PartialList<Record>> {
        self.full_list_as(collection, params).await
    }

    /// Typed variant of [`full_list`](Self::full_list).
    #[instrument(skip(self), fields(%collection))]
    pub async fn full_list_as<T>(
        &self,
        collection: &str,
        params: &ListParams,
    ) -> std::result::Result<ListResult<T>, PartialList<T>>
    where
        T: DeserializeOwned + Send + 'static,
    {
        let token = match self.ensure().await {
            Ok(token) => token,
            Err(error) => {
                return Err(PartialList::new(
                    ListResult::default(),
                    error.in_operation(Operation::FullList),
                ));
            }
        };

        let pages = RecordPages {
            client: self,
            collection,
            token,
        };
        let all = collect_all_pages(&pages, params).await?;
        debug!(items = all.items.len(), "full listing complete");
        Ok(all)
    }

    // ========================================================================
    // Shared Request Path
    // ========================================================================

    async fn ensure(&self) -> Result<Option<AuthToken>> {
        self.inner.auth.ensure(&self.inner.executor).await
    }

    async fn fetch_page<T: DeserializeOwned>(
        &self,
        collection: &str,
        params: &ListParams,
        token: Option<AuthToken>,
        op: Operation,
    ) -> Result<ListResult<T>> {
        debug!(page = params.page, size = params.size, "Listing records");
        let spec = RequestSpec::get(RECORDS)
            .with_param("collection", collection)
            .with_query(params.to_query())
            .with_token(token);
        let result = self.inner.executor.send(spec).await;
        self.observe(result, op).await
    }

    /// Authorize, send, and decode the JSON response.
    pub(crate) async fn call<R: DeserializeOwned>(
        &self,
        op: Operation,
        spec: RequestSpec<'_>,
    ) -> Result<R> {
        let token = self.ensure().await.map_err(|e| e.in_operation(op))?;
        let result = self.inner.executor.send(spec.with_token(token)).await;
        self.observe(result, op).await
    }

    /// Authorize and send, discarding the response body.
    pub(crate) async fn call_no_content(&self, op: Operation, spec: RequestSpec<'_>) -> Result<()> {
        let token = self.ensure().await.map_err(|e| e.in_operation(op))?;
        let result = self.inner.executor.send_no_content(spec.with_token(token)).await;
        self.observe(result, op).await
    }

    /// Tag failures with `op` and drop a credential the server rejected.
    async fn observe<T>(&self, result: Result<T>, op: Operation) -> Result<T> {
        match result {
            Ok(value) => Ok(value),
            Err(err) => {
                if matches!(&err, Error::Server(e) if e.is_unauthorized()) {
                    self.inner.auth.invalidate().await;
                }
                Err(err.in_operation(op))
            }
        }
    }
}

impl std::fmt::Debug for Client {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Client")
            .field("base_url", self.base_url())
            .field("auth", &self.inner.auth)
            .finish()
    }
}

/// Pages of one collection, fetched with a fixed token.
struct RecordPages<'a> {
    client: &'a Client,
    collection: &'a str,
    token: Option<AuthToken>,
}

#[async_trait]
impl<T> PageSource<T> for RecordPages<'_>
where
    T: DeserializeOwned + Send + 'static,
{
    async fn fetch_page(&self, params: &ListParams) -> Result<ListResult<T>> {
        self.client
            .fetch_page(
                self.collection,
                params,
                self.token.clone(),
                Operation::FullList,
            )
            .await
    }
}

/// Builder mirroring the client's construction options.
///
/// Later auth options replace earlier ones.
#[derive(Debug)]
pub struct ClientBuilder {
    base_url: String,
    debug: bool,
    auth: AuthConfig,
    timeout: Option<Duration>,
    user_agent: Option<String>,
    retry: Option<RetryConfig>,
}

impl ClientBuilder {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            debug: false,
            auth: AuthConfig::None,
            timeout: None,
            user_agent: None,
            retry: None,
        }
    }

    /// Log request and response bodies.
    pub fn with_debug(mut self) -> Self {
        self.debug = true;
        self
    }

    pub fn with_admin_email_password(
        mut self,
        email: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        self.auth = AuthConfig::admin_password(email, password);
        self
    }

    pub fn with_user_email_password(
        mut self,
        email: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        self.auth = AuthConfig::user_password(email, password);
        self
    }

    pub fn with_user_email_password_and_collection(
        mut self,
        email: impl Into<String>,
        password: impl Into<String>,
        collection: impl Into<String>,
    ) -> Self {
        self.auth = AuthConfig::user_password_in(email, password, collection);
        self
    }

    pub fn with_admin_token(mut self, token: impl Into<String>) -> Self {
        self.auth = AuthConfig::AdminToken(token.into());
        self
    }

    pub fn with_user_token(mut self, token: impl Into<String>) -> Self {
        self.auth = AuthConfig::UserToken(token.into());
        self
    }

    pub fn with_auth(mut self, auth: AuthConfig) -> Self {
        self.auth = auth;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }

    pub fn with_retry(mut self, retry: RetryConfig) -> Self {
        self.retry = Some(retry);
        self
    }

    /// Resolve the options into a [`ClientConfig`].
    ///
    /// # Errors
    ///
    /// Returns an error if the base URL is invalid.
    pub fn config(self) -> Result<ClientConfig> {
        let mut config = ClientConfig::new(BaseUrl::new(&self.base_url)?)
            .with_debug(self.debug)
            .with_auth(self.auth);
        if let Some(timeout) = self.timeout {
            config = config.with_timeout(timeout);
        }
        if let Some(user_agent) = self.user_agent {
            config = config.with_user_agent(user_agent);
        }
        if let Some(retry) = self.retry {
            config = config.with_retry(retry);
        }
        Ok(config)
    }

    pub fn build(self) -> Result<Client> {
        Client::new(self.config()?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pbase_core::StrategyKind;

    #[test]
    fn builder_applies_options() {
        let client = Client::builder("http://127.0.0.1:8090/")
            .with_debug()
            .with_user_email_password_and_collection("m@x.io", "pw", "members")
            .with_timeout(Duration::from_secs(5))
            .with_retry(RetryConfig::no_retry())
            .build()
            .unwrap();

        assert_eq!(client.base_url().to_string(), "http://127.0.0.1:8090");
        assert!(client.config().debug);
        assert_eq!(client.config().timeout, Duration::from_secs(5));
        assert_eq!(client.config().retry.max_retries, 0);
        assert_eq!(
            client.auth_store().strategy().kind(),
            StrategyKind::EmailPassword
        );
    }

    #[test]
    fn last_auth_option_wins() {
        let client = Client::builder("http://127.0.0.1:8090")
            .with_admin_email_password("a@x.io", "pw")
            .with_user_token("tok")
            .build()
            .unwrap();
        assert_eq!(
            client.auth_store().strategy().endpoint_path().as_deref(),
            Some("/api/collections/users/auth-refresh")
        );
    }

    #[test]
    fn invalid_base_url_is_rejected() {
        let err = Client::builder("not a url").build().unwrap_err();
        assert!(matches!(err, Error::InvalidInput(_)));
    }

    #[test]
    fn debug_does_not_leak_credentials() {
        let client = Client::builder("http://127.0.0.1:8090")
            .with_admin_email_password("a@x.io", "hunter2")
            .build()
            .unwrap();
        assert!(!format!("{:?}", client).contains("hunter2"));
    }
}
