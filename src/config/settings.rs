//! Settings structures for search-exporter configuration

use crate::error::ConfigurationError;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use url::Url;

/// Prefix for environment variable overrides
pub const ENV_PREFIX: &str = "SEARCH_EXPORTER_";

/// Main settings structure, loaded from settings.yml
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub general: GeneralSettings,
    pub server: ServerSettings,
    pub outgoing: OutgoingSettings,
    pub provider: ProviderSettings,
    pub export: ExportSettings,
    pub session: SessionSettings,
    pub credentials: CredentialSettings,
}

impl Settings {
    /// Load settings from a YAML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("reading {}", path.display()))?;
        let settings: Settings = serde_yaml::from_str(&content)
            .with_context(|| format!("parsing {}", path.display()))?;
        Ok(settings)
    }

    /// Merge with environment variables (SEARCH_EXPORTER_* prefix)
    pub fn merge_env(&mut self) {
        self.merge_vars(|name| std::env::var(format!("{ENV_PREFIX}{name}")).ok());
    }

    fn merge_vars(&mut self, var: impl Fn(&str) -> Option<String>) {
        if let Some(val) = var("DEBUG") {
            self.general.debug = val.parse().unwrap_or(false);
        }
        if let Some(val) = var("PORT") {
            if let Ok(port) = val.parse() {
                self.server.port = port;
            }
        }
        if let Some(val) = var("BIND_ADDRESS") {
            self.server.bind_address = val;
        }
        if let Some(val) = var("ENDPOINT") {
            self.provider.endpoint = val;
        }
        if let Some(val) = var("OVERFETCH_MARGIN") {
            if let Ok(margin) = val.parse() {
                self.provider.overfetch_margin = margin;
            }
        }
        if let Some(val) = var("COUNTRY") {
            self.provider.country = Some(val);
        }
        if let Some(val) = var("SEARCH_LANG") {
            self.provider.search_lang = Some(val);
        }
    }

    /// Check cross-field constraints that serde cannot express
    pub fn validate(&self) -> std::result::Result<(), ConfigurationError> {
        let invalid = |field, reason: &str| ConfigurationError::InvalidSetting {
            field,
            reason: reason.to_string(),
        };

        if self.provider.max_results == 0 {
            return Err(invalid("provider.max_results", "must be greater than 0"));
        }
        if self.provider.page_cap < self.provider.max_results {
            return Err(invalid(
                "provider.page_cap",
                "must be at least provider.max_results",
            ));
        }
        if Url::parse(&self.provider.endpoint).is_err() {
            return Err(invalid("provider.endpoint", "not a valid URL"));
        }
        if self.outgoing.request_timeout <= 0.0 {
            return Err(invalid("outgoing.request_timeout", "must be positive"));
        }
        if self.export.sheet_label.trim().is_empty() {
            return Err(invalid("export.sheet_label", "must not be empty"));
        }
        if self.export.max_stem_chars == 0 {
            return Err(invalid("export.max_stem_chars", "must be greater than 0"));
        }
        if self.session.ttl_seconds == 0 {
            return Err(invalid("session.ttl_seconds", "must be greater than 0"));
        }
        Ok(())
    }
}

/// General settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralSettings {
    /// Enable debug logging
    pub debug: bool,
    /// Title shown in the UI
    pub instance_name: String,
}

impl Default for GeneralSettings {
    fn default() -> Self {
        Self {
            debug: false,
            instance_name: "Search Result Exporter".to_string(),
        }
    }
}

/// Server settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerSettings {
    /// Server port
    pub port: u16,
    /// Bind address
    pub bind_address: String,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            port: 8501,
            bind_address: "127.0.0.1".to_string(),
        }
    }
}

/// Outgoing request settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutgoingSettings {
    /// Request timeout in seconds
    pub request_timeout: f64,
    /// Pool max idle connections per host
    pub pool_maxsize: usize,
    /// Verify SSL certificates
    pub verify_ssl: bool,
    /// Proxy settings
    pub proxies: ProxySettings,
    /// Extra headers to send with every provider request
    pub extra_headers: HashMap<String, String>,
}

impl Default for OutgoingSettings {
    fn default() -> Self {
        Self {
            request_timeout: 10.0,
            pool_maxsize: 4,
            verify_ssl: true,
            proxies: ProxySettings::default(),
            extra_headers: HashMap::new(),
        }
    }
}

/// Proxy settings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ProxySettings {
    pub http: Option<String>,
    pub https: Option<String>,
    pub all: Option<String>,
}

/// Search provider binding.
///
/// Locale fields are fixed per deployment and sent verbatim on every
/// request; users never choose them.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ProviderSettings {
    /// Web search endpoint
    pub endpoint: String,
    /// Largest count a user may ask for
    pub max_results: u32,
    /// Extra results requested on top of the user's count
    pub overfetch_margin: u32,
    /// Largest count the provider accepts in a single request
    pub page_cap: u32,
    /// Two-letter country code (`country`)
    pub country: Option<String>,
    /// Search language (`search_lang`)
    pub search_lang: Option<String>,
    /// UI language (`ui_lang`)
    pub ui_lang: Option<String>,
    /// off, moderate or strict
    pub safesearch: Option<String>,
}

impl Default for ProviderSettings {
    fn default() -> Self {
        Self {
            endpoint: "https://api.search.brave.com/res/v1/web/search".to_string(),
            max_results: 20,
            overfetch_margin: 10,
            page_cap: 20,
            country: None,
            search_lang: None,
            ui_lang: None,
            safesearch: None,
        }
    }
}

/// Export file settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportSettings {
    /// File name prefix
    pub file_prefix: String,
    /// Maximum number of characters taken from the query for the file name
    pub max_stem_chars: usize,
    /// Worksheet name in spreadsheet exports
    pub sheet_label: String,
}

impl Default for ExportSettings {
    fn default() -> Self {
        Self {
            file_prefix: "search_results".to_string(),
            max_stem_chars: 30,
            sheet_label: "Search Results".to_string(),
        }
    }
}

/// Session retention settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionSettings {
    /// Idle time after which a session's results are dropped
    pub ttl_seconds: u64,
    /// Maximum number of live sessions
    pub max_sessions: u64,
}

impl Default for SessionSettings {
    fn default() -> Self {
        Self {
            ttl_seconds: 3600,
            max_sessions: 10_000,
        }
    }
}

/// Where the API key is looked up, in order
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CredentialSettings {
    /// Environment variable holding the key
    pub env_var: String,
    /// Dotenv-style file checked after the process environment
    pub dotenv_path: PathBuf,
    /// YAML secrets file checked last
    pub secrets_path: PathBuf,
}

impl Default for CredentialSettings {
    fn default() -> Self {
        Self {
            env_var: "BRAVE_API_KEY".to_string(),
            dotenv_path: PathBuf::from(".env"),
            secrets_path: PathBuf::from("secrets.yml"),
        }
    }
}
