//! Brave Search API binding
//!
//! `GET {endpoint}?q=..&count=..` with the key in `X-Subscription-Token`.
//! Only `web.results` is consumed; other verticals in the body are ignored.

use super::traits::*;
use crate::config::{ApiKey, ProviderSettings};
use crate::error::ProviderError;
use crate::results::RawRecord;
use crate::search::SearchQuery;
use serde::Deserialize;

#[derive(Debug, Deserialize)]
struct BraveSearchResponse {
    #[serde(default)]
    web: Option<WebResults>,
}

#[derive(Debug, Deserialize)]
struct WebResults {
    #[serde(default)]
    results: Vec<serde_json::Value>,
}

/// Brave web search
pub struct Brave {
    endpoint: String,
    api_key: ApiKey,
    overfetch_margin: u32,
    page_cap: u32,
    country: Option<String>,
    search_lang: Option<String>,
    ui_lang: Option<String>,
    safesearch: Option<String>,
}

impl Brave {
    pub fn new(settings: &ProviderSettings, api_key: ApiKey) -> Self {
        Self {
            endpoint: settings.endpoint.clone(),
            api_key,
            overfetch_margin: settings.overfetch_margin,
            page_cap: settings.page_cap,
            country: settings.country.clone(),
            search_lang: settings.search_lang.clone(),
            ui_lang: settings.ui_lang.clone(),
            safesearch: settings.safesearch.clone(),
        }
    }
}

impl Provider for Brave {
    fn name(&self) -> &str {
        "brave"
    }

    fn requested_count(&self, requested: u32) -> u32 {
        requested
            .saturating_add(self.overfetch_margin)
            .min(self.page_cap)
            .max(requested)
    }

    fn request(&self, query: &SearchQuery) -> Result<ProviderRequest, ProviderError> {
        let count = self.requested_count(query.count());

        let request = ProviderRequest::get(&self.endpoint)
            .header("Accept", "application/json")
            .header("X-Subscription-Token", self.api_key.expose())
            .param("q", query.text())
            .param("count", count.to_string())
            .param_opt("country", self.country.as_deref())
            .param_opt("search_lang", self.search_lang.as_deref())
            .param_opt("ui_lang", self.ui_lang.as_deref())
            .param_opt("safesearch", self.safesearch.as_deref());

        Ok(request)
    }

    fn response(&self, response: ProviderResponse) -> Result<Vec<RawRecord>, ProviderError> {
        let body: BraveSearchResponse = response.error_for_status()?.json()?;

        let records: Vec<RawRecord> = body
            .web
            .map(|web| web.results.into_iter().map(RawRecord::new).collect())
            .unwrap_or_default();

        Ok(records)
    }
}
