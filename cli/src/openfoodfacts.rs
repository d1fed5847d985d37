use async_trait::async_trait;
use tracing::{debug, warn};

use steady_core::error::PipelineError;
use steady_core::openfoodfacts::{ProductData, SearchResponse};
use steady_core::researcher::FoodDatabase;

const SEARCH_URL: &str = "https://world.openfoodfacts.org/cgi/search.pl";

pub struct OpenFoodFactsClient {
    client: reqwest::Client,
}

impl OpenFoodFactsClient {
    pub fn new() -> Self {
        let client = reqwest::Client::builder()
            .user_agent(format!(
                "steady-cli/{} (nutrition tracker)",
                env!("CARGO_PKG_VERSION")
            ))
            .timeout(std::time::Duration::from_secs(10))
            .connect_timeout(std::time::Duration::from_secs(5))
            .build()
            .expect("Failed to build HTTP client");
        Self { client }
    }

    /// Search OpenFoodFacts by name.
    ///
    /// Transport failures surface as [`PipelineError::Network`]. A response
    /// that arrives but is unusable (non-2xx status, malformed JSON) counts
    /// as an answered search with no results.
    pub async fn search_async(
        &self,
        query: &str,
        limit: usize,
    ) -> Result<Vec<ProductData>, PipelineError> {
        let page_size = limit.to_string();
        let resp = self
            .client
            .get(SEARCH_URL)
            .query(&[
                ("search_terms", query),
                ("json", "1"),
                ("page_size", page_size.as_str()),
            ])
            .send()
            .await
            .map_err(|e| PipelineError::Network(e.to_string()))?;

        if !resp.status().is_success() {
            debug!(status = %resp.status(), "OpenFoodFacts returned non-success, treating as no results");
            return Ok(Vec::new());
        }

        let body = resp
            .text()
            .await
            .map_err(|e| PipelineError::Network(e.to_string()))?;

        match serde_json::from_str::<SearchResponse>(&body) {
            Ok(data) => Ok(data.products),
            Err(e) => {
                warn!(error = %e, "could not parse OpenFoodFacts search response");
                Ok(Vec::new())
            }
        }
    }
}

#[async_trait]
impl FoodDatabase for OpenFoodFactsClient {
    async fn search(&self, query: &str, limit: usize) -> Result<Vec<ProductData>, PipelineError> {
        self.search_async(query, limit).await
    }
}
