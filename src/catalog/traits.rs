use serde_json::Value;

use crate::model::SearchError;

#[async_trait::async_trait]
pub trait CatalogSearch: Send + Sync {
    /// One keyword search against the provider. A `SearchError` means
    /// "no candidates this attempt"; retrying is the worker's business.
    async fn search(&self, keyword: &str, country: &str, page: u32) -> Result<Value, SearchError>;
}
