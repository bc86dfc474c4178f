//! Client configuration options.

use std::fmt;
use std::time::Duration;

use pbase_core::{AuthStrategy, BaseUrl, Credentials, IdentityEndpoint, RefreshEndpoint};

/// Configuration for a [`Client`](crate::Client).
///
/// # Example
///
/// ```
/// use pbase_core::BaseUrl;
/// use pbase_http::{AuthConfig, ClientConfig};
/// use std::time::Duration;
///
/// let config = ClientConfig::new(BaseUrl::new("http://127.0.0.1:8090").unwrap())
///     .with_debug(true)
///     .with_timeout(Duration::from_secs(10))
///     .with_auth(AuthConfig::admin_password("root@example.com", "secret"));
/// ```
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Base URL of the service.
    pub base_url: BaseUrl,
    /// Log every request and response body.
    pub debug: bool,
    /// Identity used for authenticated requests.
    pub auth: AuthConfig,
    /// Request timeout.
    pub timeout: Duration,
    /// User-Agent header value
    pub user_agent: String,
    /// Transport retry policy shared by all requests.
    pub retry: RetryConfig,
}

impl ClientConfig {
    /// Create a configuration with default values for the given service.
    pub fn new(base_url: BaseUrl) -> Self {
        Self {
            base_url,
            debug: false,
            auth: AuthConfig::None,
            timeout: Duration::from_secs(30),
            user_agent: concat!("pbase/", env!("CARGO_PKG_VERSION")).to_string(),
            retry: RetryConfig::default(),
        }
    }

    pub fn with_debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }

    pub fn with_auth(mut self, auth: AuthConfig) -> Self {
        self.auth = auth;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    pub fn with_retry(mut self, retry: RetryConfig) -> Self {
        self.retry = retry;
        self
    }
}

/// The recognized authentication options.
///
/// Exactly one is active; [`AuthConfig::None`] is the default.
#[derive(Clone, Default, PartialEq, Eq)]
pub enum AuthConfig {
    #[default]
    None,
    /// Superuser email and password.
    AdminPassword { email: String, password: String },
    /// User email and password against `users` or a named auth collection.
    UserPassword {
        email: String,
        password: String,
        collection: Option<String>,
    },
    /// Externally issued superuser token.
    AdminToken(String),
    /// Externally issued user token.
    UserToken(String),
}

impl AuthConfig {
    pub fn admin_password(email: impl Into<String>, password: impl Into<String>) -> Self {
        AuthConfig::AdminPassword {
            email: email.into(),
            password: password.into(),
        }
    }

    pub fn user_password(email: impl Into<String>, password: impl Into<String>) -> Self {
        AuthConfig::UserPassword {
            email: email.into(),
            password: password.into(),
            collection: None,
        }
    }

    pub fn user_password_in(
        email: impl Into<String>,
        password: impl Into<String>,
        collection: impl Into<String>,
    ) -> Self {
        AuthConfig::UserPassword {
            email: email.into(),
            password: password.into(),
            collection: Some(collection.into()),
        }
    }

    /// Resolve the option into the strategy the authenticator runs.
    pub fn into_strategy(self) -> AuthStrategy {
        match self {
            AuthConfig::None => AuthStrategy::NoOp,
            AuthConfig::AdminPassword { email, password } => AuthStrategy::email_password(
                Credentials::new(email, password),
                IdentityEndpoint::Superusers,
            ),
            AuthConfig::UserPassword {
                email,
                password,
                collection,
            } => {
                let endpoint = match collection {
                    Some(name) => IdentityEndpoint::Collection(name),
                    None => IdentityEndpoint::Users,
                };
                AuthStrategy::email_password(Credentials::new(email, password), endpoint)
            }
            AuthConfig::AdminToken(token) => {
                AuthStrategy::external_token(token, RefreshEndpoint::Admin)
            }
            AuthConfig::UserToken(token) => AuthStrategy::external_token(token, RefreshEndpoint::User),
        }
    }
}

impl fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AuthConfig::None => f.write_str("None"),
            AuthConfig::AdminPassword { email, .. } => f
                .debug_struct("AdminPassword")
                .field("email", email)
                .field("password", &"[REDACTED]")
                .finish(),
            AuthConfig::UserPassword {
                email, collection, ..
            } => f
                .debug_struct("UserPassword")
                .field("email", email)
                .field("password", &"[REDACTED]")
                .field("collection", collection)
                .finish(),
            AuthConfig::AdminToken(_) => f.debug_tuple("AdminToken").field(&"[REDACTED]").finish(),
            AuthConfig::UserToken(_) => f.debug_tuple("UserToken").field(&"[REDACTED]").finish(),
        }
    }
}

/// Configuration for transport-level retries.
///
/// Retries cover failed connections, timeouts and the transient statuses
/// in `retry_statuses`. Waits grow exponentially from `initial_backoff`
/// and are capped at `max_backoff`.
#[derive(Debug, Clone)]
pub struct RetryConfig {
    /// Maximum number of retry attempts
    pub max_retries: u32,
    /// Initial backoff duration
    pub initial_backoff: Duration,
    /// Maximum backoff duration
    pub max_backoff: Duration,
    /// HTTP status codes to retry on
    pub retry_statuses: Vec<u16>,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: 3,
            initial_backoff: Duration::from_secs(3),
            max_backoff: Duration::from_secs(10),
            retry_statuses: vec![429, 502, 503, 504],
        }
    }
}

impl RetryConfig {
    /// Create a configuration with no retries.
    pub fn no_retry() -> Self {
        Self {
            max_retries: 0,
            ..Default::default()
        }
    }

    pub fn with_max_retries(mut self, max: u32) -> Self {
        self.max_retries = max;
        self
    }

    pub fn with_initial_backoff(mut self, duration: Duration) -> Self {
        self.initial_backoff = duration;
        self
    }

    pub fn with_max_backoff(mut self, duration: Duration) -> Self {
        self.max_backoff = duration;
        self
    }

    /// Calculate the backoff duration for a given attempt.
    pub fn backoff_for_attempt(&self, attempt: u32) -> Duration {
        let factor = 2u32.saturating_pow(attempt);
        self.initial_backoff
            .saturating_mul(factor)
            .min(self.max_backoff)
    }

    /// Check if a status code should be retried.
    pub fn should_retry_status(&self, status: u16) -> bool {
        self.retry_statuses.contains(&status)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pbase_core::StrategyKind;

    fn base() -> BaseUrl {
        BaseUrl::new("http://127.0.0.1:8090").unwrap()
    }

    #[test]
    fn test_default_config() {
        let config = ClientConfig::new(base());
        assert!(!config.debug);
        assert_eq!(config.auth, AuthConfig::None);
        assert_eq!(config.timeout, Duration::from_secs(30));
        assert!(config.user_agent.starts_with("pbase/"));
    }

    #[test]
    fn test_retry_backoff() {
        let config = RetryConfig::default();
        assert_eq!(config.backoff_for_attempt(0), Duration::from_secs(3));
        assert_eq!(config.backoff_for_attempt(1), Duration::from_secs(6));
        // 3 * 2^2 = 12, capped at 10
        assert_eq!(config.backoff_for_attempt(2), Duration::from_secs(10));
        assert_eq!(config.backoff_for_attempt(40), Duration::from_secs(10));
    }

    #[test]
    fn test_should_retry_status() {
        let config = RetryConfig::default();
        assert!(config.should_retry_status(429));
        assert!(config.should_retry_status(503));
        assert!(!config.should_retry_status(404));
        assert!(!config.should_retry_status(401));
    }

    #[test]
    fn auth_options_map_to_strategies() {
        assert_eq!(AuthConfig::None.into_strategy(), AuthStrategy::NoOp);

        let admin = AuthConfig::admin_password("a@x.io", "pw").into_strategy();
        assert_eq!(
            admin.endpoint_path().as_deref(),
            Some("/api/collections/_superusers/auth-with-password")
        );

        let user = AuthConfig::user_password("u@x.io", "pw").into_strategy();
        assert_eq!(
            user.endpoint_path().as_deref(),
            Some("/api/collections/users/auth-with-password")
        );

        let member = AuthConfig::user_password_in("m@x.io", "pw", "members").into_strategy();
        assert_eq!(
            member.endpoint_path().as_deref(),
            Some("/api/collections/members/auth-with-password")
        );

        let admin_token = AuthConfig::AdminToken("t".into()).into_strategy();
        assert_eq!(admin_token.kind(), StrategyKind::ExternalToken);
        assert_eq!(
            admin_token.endpoint_path().as_deref(),
            Some("/api/admins/auth-refresh")
        );

        let user_token = AuthConfig::UserToken("t".into()).into_strategy();
        assert_eq!(
            user_token.endpoint_path().as_deref(),
            Some("/api/collections/users/auth-refresh")
        );
    }

    #[test]
    fn auth_config_debug_hides_secrets() {
        let debug = format!(
            "{:?} {:?}",
            AuthConfig::user_password_in("m@x.io", "hunter2", "members"),
            AuthConfig::AdminToken("tok-secret".into())
        );
        assert!(debug.contains("m@x.io"));
        assert!(!debug.contains("hunter2"));
        assert!(!debug.contains("tok-secret"));
    }
}
