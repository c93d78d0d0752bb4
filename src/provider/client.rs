//! Provider client: one outbound call per search

use super::traits::Provider;
use crate::error::ProviderError;
use crate::network::HttpClient;
use crate::results::RawRecord;
use crate::search::SearchQuery;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, warn};

/// Sends searches to a single configured provider
#[derive(Clone)]
pub struct ProviderClient {
    http: HttpClient,
    provider: Arc<dyn Provider>,
}

impl ProviderClient {
    pub fn new(http: HttpClient, provider: Arc<dyn Provider>) -> Self {
        Self { http, provider }
    }

    pub fn provider_name(&self) -> &str {
        self.provider.name()
    }

    /// Fetch the raw result records for a query. No retries.
    pub async fn fetch(&self, query: &SearchQuery) -> Result<Vec<RawRecord>, ProviderError> {
        let name = self.provider.name();
        let request = self.provider.request(query)?;
        let start = Instant::now();

        let outcome = match self.http.execute(request).await {
            Ok(response) => self.provider.response(response),
            Err(e) => Err(e),
        };

        match &outcome {
            Ok(records) => debug!(
                "Provider {} returned {} records in {:?}",
                name,
                records.len(),
                start.elapsed()
            ),
            Err(e) => warn!("Provider {} failed after {:?}: {}", name, start.elapsed(), e),
        }

        outcome
    }
}
