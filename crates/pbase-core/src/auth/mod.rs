//! Authentication strategy types.
//!
//! The strategy decides how a credential is obtained; the credential itself
//! is owned and refreshed by the HTTP client's authenticator.

mod strategy;

pub use strategy::{
    ADMIN_REFRESH_PATH, AuthStrategy, IdentityEndpoint, RefreshEndpoint, SUPERUSERS_COLLECTION,
    StrategyKind, USER_REFRESH_PATH, USERS_COLLECTION,
};
