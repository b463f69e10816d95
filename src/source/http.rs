use async_trait::async_trait;
use tracing::debug;

use super::{FetchError, PageSource};
use crate::config::ListingConfig;
use crate::models::{PageRequest, PageResponse};

/// Fetches pages from the users listing over HTTP.
#[derive(Clone)]
pub struct HttpPageSource {
    client: reqwest::Client,
    endpoint: String,
}

impl HttpPageSource {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            endpoint: endpoint.into(),
        }
    }

    pub fn from_config(config: &ListingConfig) -> Self {
        Self::new(config.endpoint.clone())
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl PageSource for HttpPageSource {
    async fn fetch_page(&self, request: PageRequest) -> Result<PageResponse, FetchError> {
        debug!(
            page = request.page,
            limit = request.limit.get(),
            "Fetching users from {}",
            self.endpoint
        );

        let response = self
            .client
            .get(&self.endpoint)
            .query(&request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status(status));
        }

        let text = response.text().await?;
        Ok(serde_json::from_str(&text)?)
    }
}
