//! Bearer token and credential types.

use std::fmt;

use crate::auth::StrategyKind;

/// An opaque bearer token attached to authenticated requests.
///
/// # Security
///
/// - Never logged or displayed in Debug output
/// - Treat as opaque; do not parse or inspect
#[derive(Clone, PartialEq, Eq)]
pub struct AuthToken(String);

impl AuthToken {
    /// Wrap a token string.
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    /// Returns the token value for use in authorization headers.
    ///
    /// # Security
    ///
    /// Use only when constructing HTTP authorization headers.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns the `Authorization` header value for this token.
    pub fn bearer(&self) -> String {
        format!("Bearer {}", self.0)
    }

    /// Returns true if the token string is empty.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Debug for AuthToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("AuthToken").field(&"[REDACTED]").finish()
    }
}

/// A token together with the strategy that produced it.
///
/// Credentials are created and replaced only by the authenticator. Callers
/// see cloned snapshots.
#[derive(Clone)]
pub struct Credential {
    token: AuthToken,
    kind: StrategyKind,
    record: Option<serde_json::Value>,
}

impl Credential {
    pub fn new(token: AuthToken, kind: StrategyKind, record: Option<serde_json::Value>) -> Self {
        Self {
            token,
            kind,
            record,
        }
    }

    pub fn token(&self) -> &AuthToken {
        &self.token
    }

    pub fn kind(&self) -> StrategyKind {
        self.kind
    }

    /// The authenticated identity's record as echoed by the auth endpoint.
    pub fn record(&self) -> Option<&serde_json::Value> {
        self.record.as_ref()
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credential")
            .field("token", &self.token)
            .field("kind", &self.kind)
            .field("record", &self.record.as_ref().map(|_| "[..]"))
            .finish()
    }
}
