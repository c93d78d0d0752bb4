//! Application state shared across handlers

use crate::config::{CredentialChain, Settings};
use crate::error::ConfigurationError;
use crate::network::HttpClient;
use crate::search::SearchService;
use crate::session::{MemorySessionStore, SessionStore};
use std::sync::Arc;
use tracing::{error, info};

/// Whether the pipeline can accept queries
#[derive(Clone)]
pub enum Readiness {
    Ready(Arc<SearchService>),
    /// Startup failed; every query is refused with this error
    Unconfigured(ConfigurationError),
}

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// Global settings
    pub settings: Arc<Settings>,
    /// Search pipeline, or the reason it is unavailable
    pub readiness: Readiness,
    /// Template renderer
    pub templates: Arc<super::Templates>,
}

impl AppState {
    /// Create new application state
    pub fn new(settings: Arc<Settings>, readiness: Readiness) -> anyhow::Result<Self> {
        let templates = Arc::new(super::Templates::new()?);

        Ok(Self {
            settings,
            readiness,
            templates,
        })
    }

    /// Resolve the API key and build the pipeline. A missing key is
    /// reported once here and leaves the state unconfigured.
    pub fn from_settings(
        settings: Settings,
        credentials: &CredentialChain,
        client: HttpClient,
    ) -> anyhow::Result<Self> {
        let settings = Arc::new(settings);

        let readiness = match credentials.resolve() {
            Ok(api_key) => {
                let store: Arc<dyn SessionStore> =
                    Arc::new(MemorySessionStore::from_settings(&settings.session));
                let service = SearchService::brave(settings.clone(), api_key, client, store);
                info!("Search pipeline ready");
                Readiness::Ready(Arc::new(service))
            }
            Err(e) => {
                error!("Search disabled: {}", e);
                Readiness::Unconfigured(e)
            }
        };

        Self::new(settings, readiness)
    }

    /// The search pipeline, or the startup configuration error
    pub fn service(&self) -> Result<&Arc<SearchService>, &ConfigurationError> {
        match &self.readiness {
            Readiness::Ready(service) => Ok(service),
            Readiness::Unconfigured(e) => Err(e),
        }
    }

    pub fn is_configured(&self) -> bool {
        matches!(self.readiness, Readiness::Ready(_))
    }

    /// Get instance name
    pub fn instance_name(&self) -> &str {
        &self.settings.general.instance_name
    }
}
