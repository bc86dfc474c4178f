//! List parameters and paged results.

use serde::{Deserialize, Serialize};

/// Largest page the service returns for one list request.
pub const MAX_PAGE_SIZE: i64 = 500;

/// Query parameters for a list request.
///
/// Every field is optional: zero or empty means "not specified" and the
/// parameter is left out of the request so the server default applies.
///
/// # Example
///
/// ```
/// use pbase_core::ListParams;
///
/// let params = ListParams::new()
///     .with_page(2)
///     .with_size(50)
///     .with_filter("done = false")
///     .with_sort("-created");
///
/// let query = params.to_query();
/// assert!(query.contains(&("page", "2".to_string())));
/// assert!(!query.iter().any(|(k, _)| *k == "expand"));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListParams {
    /// 1-based page number.
    pub page: i64,
    /// Items per page (`perPage` on the wire).
    pub size: i64,
    /// Filter expression.
    pub filter: String,
    /// Sort expression, e.g. `-created,title`.
    pub sort: String,
    /// Relations to expand.
    pub expand: String,
    /// Field projection.
    pub fields: String,
}

impl ListParams {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_page(mut self, page: i64) -> Self {
        self.page = page;
        self
    }

    pub fn with_size(mut self, size: i64) -> Self {
        self.size = size;
        self
    }

    pub fn with_filter(mut self, filter: impl Into<String>) -> Self {
        self.filter = filter.into();
        self
    }

    pub fn with_sort(mut self, sort: impl Into<String>) -> Self {
        self.sort = sort.into();
        self
    }

    pub fn with_expand(mut self, expand: impl Into<String>) -> Self {
        self.expand = expand.into();
        self
    }

    pub fn with_fields(mut self, fields: impl Into<String>) -> Self {
        self.fields = fields.into();
        self
    }

    /// Query pairs for a record list request.
    ///
    /// Only specified parameters appear; values are passed verbatim.
    pub fn to_query(&self) -> Vec<(&'static str, String)> {
        let mut query = self.paging_query();
        push_non_empty(&mut query, "filter", &self.filter);
        push_non_empty(&mut query, "sort", &self.sort);
        push_non_empty(&mut query, "expand", &self.expand);
        push_non_empty(&mut query, "fields", &self.fields);
        query
    }

    /// Query pairs for the collections metadata list, which names its
    /// filter parameter `filters`.
    pub fn to_collections_query(&self) -> Vec<(&'static str, String)> {
        let mut query = self.paging_query();
        push_non_empty(&mut query, "filters", &self.filter);
        query
    }

    fn paging_query(&self) -> Vec<(&'static str, String)> {
        let mut query = Vec::with_capacity(6);
        if self.page > 0 {
            query.push(("page", self.page.to_string()));
        }
        if self.size > 0 {
            query.push(("perPage", self.size.to_string()));
        }
        query
    }
}

fn push_non_empty(query: &mut Vec<(&'static str, String)>, key: &'static str, value: &str) {
    if !value.is_empty() {
        query.push((key, value.to_string()));
    }
}

/// One page of a list response, or the aggregate of a full listing.
///
/// `total_pages` is taken from the server as-is.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListResult<T> {
    #[serde(default)]
    pub page: i64,
    #[serde(default)]
    pub per_page: i64,
    #[serde(default)]
    pub total_items: i64,
    #[serde(default)]
    pub total_pages: i64,
    #[serde(default = "Vec::new")]
    pub items: Vec<T>,
}

impl<T> Default for ListResult<T> {
    fn default() -> Self {
        Self {
            page: 0,
            per_page: 0,
            total_items: 0,
            total_pages: 0,
            items: Vec::new(),
        }
    }
}

impl<T> ListResult<T> {
    /// A result with the given page's metadata and no items.
    pub fn with_metadata_of<U>(other: &ListResult<U>) -> Self {
        Self {
            page: other.page,
            per_page: other.per_page,
            total_items: other.total_items,
            total_pages: other.total_pages,
            items: Vec::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn keys(query: &[(&'static str, String)]) -> Vec<&'static str> {
        query.iter().map(|(k, _)| *k).collect()
    }

    #[test]
    fn empty_params_produce_no_query() {
        assert!(ListParams::default().to_query().is_empty());
    }

    #[test]
    fn non_positive_page_is_omitted() {
        for page in [0, -1, -500] {
            let query = ListParams::new().with_page(page).with_size(page).to_query();
            assert!(!keys(&query).contains(&"page"), "page {page} leaked");
            assert!(!keys(&query).contains(&"perPage"));
        }
    }

    #[test]
    fn positive_page_serializes_exactly() {
        for page in [1, 7, 12345] {
            let query = ListParams::new().with_page(page).to_query();
            assert_eq!(query, vec![("page", page.to_string())]);
        }
    }

    #[test]
    fn string_params_pass_verbatim() {
        let params = ListParams::new()
            .with_filter("title ~ 'a b' && done = false")
            .with_sort("-created,+title")
            .with_expand("author,tags")
            .with_fields("id,title");

        let query = params.to_query();
        assert_eq!(
            query,
            vec![
                ("filter", "title ~ 'a b' && done = false".to_string()),
                ("sort", "-created,+title".to_string()),
                ("expand", "author,tags".to_string()),
                ("fields", "id,title".to_string()),
            ]
        );
    }

    #[test]
    fn collections_query_uses_filters_key() {
        let query = ListParams::new()
            .with_page(1)
            .with_size(10)
            .with_filter("system = false")
            .with_sort("ignored")
            .to_collections_query();
        assert_eq!(keys(&query), vec!["page", "perPage", "filters"]);
    }

    #[test]
    fn list_result_decodes_wire_names() {
        let page: ListResult<serde_json::Value> = serde_json::from_value(json!({
            "page": 1,
            "perPage": 2,
            "totalItems": 5,
            "totalPages": 3,
            "items": [{"id": "a"}, {"id": "b"}]
        }))
        .unwrap();

        assert_eq!(page.per_page, 2);
        assert_eq!(page.total_items, 5);
        assert_eq!(page.total_pages, 3);
        assert_eq!(page.len(), 2);
    }

    #[test]
    fn list_result_tolerates_missing_items() {
        let page: ListResult<serde_json::Value> =
            serde_json::from_value(json!({"page": 1, "perPage": 30})).unwrap();
        assert!(page.is_empty());
        assert_eq!(page.total_pages, 0);
    }
}
