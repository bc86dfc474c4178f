//! Page source trait.

use async_trait::async_trait;

use crate::Result;
use crate::records::{ListParams, ListResult};

/// Something that can fetch one page of a listing.
///
/// Implemented by the HTTP client for record collections; the full-list
/// aggregator is written against this trait only.
#[async_trait]
pub trait PageSource<T>: Send + Sync {
    /// Fetch the page described by `params`.
    async fn fetch_page(&self, params: &ListParams) -> Result<ListResult<T>>;
}
