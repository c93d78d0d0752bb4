//! Search execution: fetch, normalize, store, export

use super::models::{SearchOutcome, SearchQuery};
use crate::config::{ApiKey, Settings};
use crate::error::{Result, ValidationError};
use crate::export::{self, ExportFile, ExportFormat};
use crate::network::HttpClient;
use crate::provider::{Brave, Provider, ProviderClient};
use crate::results::{normalize, ResultSet};
use crate::session::{SessionId, SessionStore};
use std::sync::Arc;
use tracing::info;

/// Runs the search pipeline for one session at a time
pub struct SearchService {
    client: ProviderClient,
    store: Arc<dyn SessionStore>,
    settings: Arc<Settings>,
}

impl SearchService {
    pub fn new(client: ProviderClient, store: Arc<dyn SessionStore>, settings: Arc<Settings>) -> Self {
        Self {
            client,
            store,
            settings,
        }
    }

    /// Wire up the Brave binding from settings and a resolved key
    pub fn brave(
        settings: Arc<Settings>,
        api_key: ApiKey,
        http: HttpClient,
        store: Arc<dyn SessionStore>,
    ) -> Self {
        let provider: Arc<dyn Provider> = Arc::new(Brave::new(&settings.provider, api_key));
        Self::new(ProviderClient::new(http, provider), store, settings)
    }

    /// Largest count a user may request
    pub fn max_results(&self) -> u32 {
        self.settings.provider.max_results
    }

    /// Run a query and remember its results for the session.
    ///
    /// On any error the session keeps its previous results.
    pub async fn search(&self, session: SessionId, text: &str, count: u32) -> Result<SearchOutcome> {
        let query = SearchQuery::new(text, count, self.max_results())?;

        info!(
            "Searching '{}' for {} results via {}",
            query.text(),
            query.count(),
            self.client.provider_name()
        );

        let raw = self.client.fetch(&query).await?;
        let results = normalize(raw, query.count() as usize);
        let set = Arc::new(ResultSet::new(query.text(), results));

        self.store.put(session, set.clone()).await;

        if set.is_empty() {
            info!("No results for '{}'", query.text());
            return Ok(SearchOutcome::NoResults {
                query: query.text().to_string(),
            });
        }

        info!("Stored {} results for '{}'", set.len(), query.text());
        Ok(SearchOutcome::Found(set))
    }

    /// Results stored for the session, if any
    pub async fn last(&self, session: SessionId) -> Option<Arc<ResultSet>> {
        self.store.get(session).await
    }

    /// Encode the session's stored results
    pub async fn export(&self, session: SessionId, format: ExportFormat) -> Result<ExportFile> {
        let set = self
            .last(session)
            .await
            .ok_or(ValidationError::NothingToExport)?;

        let file = export::export(&set.query, &set.results, format, &self.settings.export)?;
        info!(
            "Exported {} results for '{}' as {} ({} bytes)",
            set.len(),
            set.query,
            format,
            file.bytes.len()
        );
        Ok(file)
    }
}
