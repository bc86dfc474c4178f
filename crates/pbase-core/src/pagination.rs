//! Full-listing aggregation.
//!
//! [`collect_all_pages`] walks every page of a listing at the maximum page
//! size and concatenates the items. The number of pages is taken from the
//! first response and is not re-read afterwards, so a collection that
//! changes during the walk can yield an aggregate that matches neither the
//! old nor the new server state.

use std::fmt;

use tracing::debug;

use crate::error::Error;
use crate::records::{ListParams, ListResult, MAX_PAGE_SIZE};
use crate::traits::PageSource;

/// An aggregate that stopped early, together with the error that stopped it.
///
/// `partial` holds every item fetched before the failure, in page order.
/// A `PartialList` never means "empty collection".
pub struct PartialList<T> {
    pub partial: ListResult<T>,
    pub error: Error,
}

impl<T> PartialList<T> {
    pub fn new(partial: ListResult<T>, error: Error) -> Self {
        Self { partial, error }
    }

    /// Split into the partial aggregate and the error.
    pub fn into_parts(self) -> (ListResult<T>, Error) {
        (self.partial, self.error)
    }
}

impl<T> fmt::Debug for PartialList<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PartialList")
            .field("items", &self.partial.items.len())
            .field("total_items", &self.partial.total_items)
            .field("error", &self.error)
            .finish()
    }
}

impl<T> fmt::Display for PartialList<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "listing incomplete after {} of {} items: {}",
            self.partial.items.len(),
            self.partial.total_items,
            self.error
        )
    }
}

impl<T> std::error::Error for PartialList<T> {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.error)
    }
}

impl<T> From<PartialList<T>> for Error {
    fn from(partial: PartialList<T>) -> Self {
        partial.error
    }
}

/// Fetch every page matching `params` and return one aggregate.
///
/// `page` and `size` from `params` are ignored: the walk starts at page 1
/// with [`MAX_PAGE_SIZE`] items per page. Metadata of the aggregate is
/// copied from the first page. Pages `2..=total_pages` of that first
/// response are then fetched in order.
///
/// # Errors
///
/// The first failing page stops the walk. The items gathered so far are
/// returned inside the [`PartialList`]; failed pages are not retried.
pub async fn collect_all_pages<T, S>(
    source: &S,
    params: &ListParams,
) -> Result<ListResult<T>, PartialList<T>>
where
    T: Send,
    S: PageSource<T> + ?Sized,
{
    let mut params = params.clone().with_page(1).with_size(MAX_PAGE_SIZE);

    let first = match source.fetch_page(&params).await {
        Ok(page) => page,
        Err(error) => return Err(PartialList::new(ListResult::default(), error)),
    };

    let total_pages = first.total_pages;
    debug!(
        total_pages,
        total_items = first.total_items,
        "first page fetched"
    );

    let mut aggregate = ListResult::with_metadata_of(&first);
    aggregate.items = first.items;

    for page in 2..=total_pages {
        params.page = page;
        match source.fetch_page(&params).await {
            Ok(next) => aggregate.items.extend(next.items),
            Err(error) => {
                debug!(page, fetched = aggregate.items.len(), "page fetch failed");
                return Err(PartialList::new(aggregate, error));
            }
        }
    }

    Ok(aggregate)
}
