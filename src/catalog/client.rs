use std::time::Duration;

use reqwest::Client;
use serde_json::Value;

use crate::catalog::traits::CatalogSearch;
use crate::model::SearchError;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(15);

/// Catalog client for a RapidAPI-hosted product search provider.
///
/// Authentication is two header values (provider key and host). The response
/// body is kept as raw JSON; its shape varies per provider and is dealt with
/// by the normalizer.
pub struct RapidApiCatalog {
    client: Client,
    provider_key: String,
    provider_host: String,
    base_url: String,
}

impl RapidApiCatalog {
    pub fn new(provider_key: &str, provider_host: &str) -> Result<Self, SearchError> {
        Self::with_base_url(provider_key, provider_host, &format!("https://{provider_host}"))
    }

    /// Custom base URL constructor, used to point at a mock server in tests.
    pub fn with_base_url(
        provider_key: &str,
        provider_host: &str,
        base_url: &str,
    ) -> Result<Self, SearchError> {
        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .user_agent("promo-sniper/0.1")
            .build()
            .map_err(|e| SearchError::Http(e.to_string()))?;

        Ok(Self {
            client,
            provider_key: provider_key.to_string(),
            provider_host: provider_host.to_string(),
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }
}

#[async_trait::async_trait]
impl CatalogSearch for RapidApiCatalog {
    async fn search(&self, keyword: &str, country: &str, page: u32) -> Result<Value, SearchError> {
        let url = format!("{}/search", self.base_url);

        let response = self
            .client
            .get(&url)
            .query(&[("query", keyword), ("country", country), ("page", &page.to_string())])
            .header("x-rapidapi-key", &self.provider_key)
            .header("x-rapidapi-host", &self.provider_host)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    SearchError::Timeout
                } else {
                    SearchError::Http(e.to_string())
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(SearchError::Status(status.as_u16()));
        }

        response
            .json::<Value>()
            .await
            .map_err(|e| SearchError::Http(format!("invalid response body: {e}")))
    }
}
