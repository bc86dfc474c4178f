//! Record, list and resource types.
//!
//! This module defines the values exchanged with the service.
//! The operations live on the HTTP client.

mod list;
mod models;
mod record;

pub use list::{ListParams, ListResult, MAX_PAGE_SIZE};
pub use models::{BackupFileInfo, CollectionModel, CreateResult};
pub use record::{Record, parse_timestamp};
