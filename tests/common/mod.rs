//! Shared fixtures for integration tests

#![allow(dead_code)]

use search_exporter::config::{ApiKey, CredentialChain, CredentialSource, Settings};
use search_exporter::network::HttpClient;
use search_exporter::session::{MemorySessionStore, SessionStore};
use search_exporter::SearchService;
use serde_json::{json, Value};
use std::sync::Arc;
use wiremock::MockServer;

pub const API_KEY: &str = "test-key";
pub const SEARCH_PATH: &str = "/res/v1/web/search";

/// Credential source with a fixed answer
pub struct Fixed(pub Option<&'static str>);

impl CredentialSource for Fixed {
    fn name(&self) -> String {
        "fixed".to_string()
    }

    fn lookup(&self) -> Option<String> {
        self.0.map(str::to_string)
    }
}

pub fn credentials() -> CredentialChain {
    CredentialChain::new().with(Fixed(Some(API_KEY)))
}

pub fn no_credentials() -> CredentialChain {
    CredentialChain::new().with(Fixed(None))
}

/// Settings pointing the provider at the mock server
pub fn settings_for(server: &MockServer) -> Settings {
    let mut settings = Settings::default();
    settings.provider.endpoint = format!("{}{}", server.uri(), SEARCH_PATH);
    settings.outgoing.request_timeout = 2.0;
    settings
}

/// Brave-shaped body with `n` web results
pub fn brave_body(n: usize) -> Value {
    let results: Vec<Value> = (1..=n)
        .map(|i| {
            json!({
                "title": format!("Result {i}"),
                "url": format!("https://example.com/{i}"),
                "description": format!("Description <strong>{i}</strong>"),
                "profile": {"name": "Example"},
            })
        })
        .collect();

    json!({
        "type": "search",
        "query": {"original": "q"},
        "web": {"type": "search", "results": results},
    })
}

pub fn service(settings: Settings) -> SearchService {
    let store: Arc<dyn SessionStore> = Arc::new(MemorySessionStore::default());
    let http = HttpClient::with_settings(&settings.outgoing).unwrap();
    SearchService::brave(Arc::new(settings), ApiKey::new(API_KEY), http, store)
}
