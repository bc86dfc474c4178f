//! pbase-core - Core types and traits for the pbase record-service client.
//!
//! Everything here is transport-free: errors, credentials, the auth
//! strategy, record and list types, and the full-list aggregation
//! algorithm. `pbase-http` supplies the network side.

pub mod auth;
pub mod credentials;
pub mod error;
pub mod pagination;
pub mod records;
pub mod token;
pub mod traits;
pub mod types;

pub use auth::{AuthStrategy, IdentityEndpoint, RefreshEndpoint, StrategyKind};
pub use credentials::Credentials;
pub use error::{Error, Operation};
pub use pagination::{PartialList, collect_all_pages};
pub use records::{
    BackupFileInfo, CollectionModel, CreateResult, ListParams, ListResult, MAX_PAGE_SIZE, Record,
};
pub use token::{AuthToken, Credential};
pub use traits::PageSource;
pub use types::BaseUrl;

/// Result type alias using the crate's Error type.
pub type Result<T> = std::result::Result<T, Error>;
