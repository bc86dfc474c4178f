//! Authentication strategies.

use std::fmt;

use crate::{AuthToken, Credentials};

/// Path of the auth-refresh endpoint for admin tokens.
pub const ADMIN_REFRESH_PATH: &str = "/api/admins/auth-refresh";

/// Path of the auth-refresh endpoint for `users` tokens.
pub const USER_REFRESH_PATH: &str = "/api/collections/users/auth-refresh";

/// Collection holding superuser identities.
pub const SUPERUSERS_COLLECTION: &str = "_superusers";

/// Default auth collection for regular users.
pub const USERS_COLLECTION: &str = "users";

/// How a credential is obtained for outgoing requests.
///
/// Selected once when the client is built and never changed afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum AuthStrategy {
    /// No authentication; requests carry no `Authorization` header.
    #[default]
    NoOp,

    /// Password grant against an identity collection.
    EmailPassword {
        credentials: Credentials,
        endpoint: IdentityEndpoint,
    },

    /// Externally issued token, kept alive through a refresh endpoint.
    ExternalToken {
        token: AuthToken,
        refresh: RefreshEndpoint,
    },
}

impl AuthStrategy {
    pub fn email_password(credentials: Credentials, endpoint: IdentityEndpoint) -> Self {
        AuthStrategy::EmailPassword {
            credentials,
            endpoint,
        }
    }

    pub fn external_token(token: impl Into<String>, refresh: RefreshEndpoint) -> Self {
        AuthStrategy::ExternalToken {
            token: AuthToken::new(token),
            refresh,
        }
    }

    pub fn kind(&self) -> StrategyKind {
        match self {
            AuthStrategy::NoOp => StrategyKind::NoOp,
            AuthStrategy::EmailPassword { .. } => StrategyKind::EmailPassword,
            AuthStrategy::ExternalToken { .. } => StrategyKind::ExternalToken,
        }
    }

    /// Returns the endpoint path this strategy authenticates against.
    ///
    /// `None` for [`AuthStrategy::NoOp`], which never issues a request.
    pub fn endpoint_path(&self) -> Option<String> {
        match self {
            AuthStrategy::NoOp => None,
            AuthStrategy::EmailPassword { endpoint, .. } => Some(endpoint.path()),
            AuthStrategy::ExternalToken { refresh, .. } => Some(refresh.path().to_string()),
        }
    }
}

/// Discriminant of [`AuthStrategy`], carried by credentials.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StrategyKind {
    NoOp,
    EmailPassword,
    ExternalToken,
}

impl fmt::Display for StrategyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            StrategyKind::NoOp => "none",
            StrategyKind::EmailPassword => "email-password",
            StrategyKind::ExternalToken => "external-token",
        };
        f.write_str(name)
    }
}

/// Identity collection used by a password grant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IdentityEndpoint {
    /// The `_superusers` collection.
    Superusers,
    /// The default `users` collection.
    Users,
    /// Any other auth collection, by name.
    Collection(String),
}

impl IdentityEndpoint {
    pub fn collection(&self) -> &str {
        match self {
            IdentityEndpoint::Superusers => SUPERUSERS_COLLECTION,
            IdentityEndpoint::Users => USERS_COLLECTION,
            IdentityEndpoint::Collection(name) => name,
        }
    }

    /// Returns the `auth-with-password` path for this collection.
    pub fn path(&self) -> String {
        format!("/api/collections/{}/auth-with-password", self.collection())
    }
}

/// Refresh endpoint for externally issued tokens.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefreshEndpoint {
    Admin,
    User,
}

impl RefreshEndpoint {
    pub fn path(&self) -> &'static str {
        match self {
            RefreshEndpoint::Admin => ADMIN_REFRESH_PATH,
            RefreshEndpoint::User => USER_REFRESH_PATH,
        }
    }
}
