//! Collection schema metadata.

use tracing::instrument;

use pbase_core::{CollectionModel, ListParams, ListResult, Operation, Result};

use crate::client::Client;
use crate::endpoints::{COLLECTION, COLLECTIONS};
use crate::request::RequestSpec;

/// Read access to collection definitions. Usually needs a superuser.
#[derive(Debug, Clone)]
pub struct Collections {
    client: Client,
}

impl Collections {
    pub(crate) fn new(client: Client) -> Self {
        Self { client }
    }

    /// List one page of collection definitions.
    ///
    /// Only `page`, `size` and `filter` of `params` are used.
    #[instrument(skip(self))]
    pub async fn list(&self, params: &ListParams) -> Result<ListResult<CollectionModel>> {
        let spec = RequestSpec::get(COLLECTIONS).with_query(params.to_collections_query());
        self.client.call(Operation::Collections, spec).await
    }

    /// Fetch one collection by name or id.
    #[instrument(skip(self))]
    pub async fn view(&self, name_or_id: &str) -> Result<CollectionModel> {
        let spec = RequestSpec::get(COLLECTION).with_param("collection", name_or_id);
        self.client.call(Operation::Collections, spec).await
    }
}
