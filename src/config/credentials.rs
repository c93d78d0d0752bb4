//! API key resolution
//!
//! The key is looked up once at startup through an ordered list of sources.
//! The first source with a non-blank value wins.

use super::CredentialSettings;
use crate::error::ConfigurationError;
use std::collections::HashMap;
use std::fmt;
use std::path::PathBuf;
use tracing::{debug, warn};

/// Provider API key. Never printed.
#[derive(Clone, PartialEq, Eq)]
pub struct ApiKey(String);

impl ApiKey {
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for ApiKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ApiKey(***)")
    }
}

/// One place an API key might live
pub trait CredentialSource: Send + Sync {
    /// Human-readable description used in error messages
    fn name(&self) -> String;

    /// Look up the key; `None` when absent
    fn lookup(&self) -> Option<String>;
}

/// Process environment variable
pub struct EnvSource {
    var: String,
}

impl EnvSource {
    pub fn new(var: impl Into<String>) -> Self {
        Self { var: var.into() }
    }
}

impl CredentialSource for EnvSource {
    fn name(&self) -> String {
        format!("environment variable {}", self.var)
    }

    fn lookup(&self) -> Option<String> {
        std::env::var(&self.var).ok()
    }
}

/// Dotenv-style `KEY=value` file, read without touching the process
/// environment
pub struct DotenvSource {
    path: PathBuf,
    var: String,
}

impl DotenvSource {
    pub fn new(path: impl Into<PathBuf>, var: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            var: var.into(),
        }
    }
}

impl CredentialSource for DotenvSource {
    fn name(&self) -> String {
        format!("{} ({})", self.path.display(), self.var)
    }

    fn lookup(&self) -> Option<String> {
        let entries = dotenvy::from_path_iter(&self.path).ok()?;
        for entry in entries {
            match entry {
                Ok((key, value)) if key == self.var => return Some(value),
                Ok(_) => {}
                Err(e) => {
                    warn!("Skipping malformed line in {}: {}", self.path.display(), e);
                }
            }
        }
        None
    }
}

/// YAML mapping of secret names to values, as provided by the hosting
/// environment
pub struct SecretsFileSource {
    path: PathBuf,
    key: String,
}

impl SecretsFileSource {
    pub fn new(path: impl Into<PathBuf>, key: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            key: key.into(),
        }
    }
}

impl CredentialSource for SecretsFileSource {
    fn name(&self) -> String {
        format!("{} ({})", self.path.display(), self.key)
    }

    fn lookup(&self) -> Option<String> {
        let content = std::fs::read_to_string(&self.path).ok()?;
        let secrets: HashMap<String, serde_yaml::Value> = match serde_yaml::from_str(&content) {
            Ok(secrets) => secrets,
            Err(e) => {
                warn!("Ignoring unreadable secrets file {}: {}", self.path.display(), e);
                return None;
            }
        };
        match secrets.get(&self.key)? {
            serde_yaml::Value::String(s) => Some(s.clone()),
            _ => None,
        }
    }
}

/// Ordered list of credential sources
#[derive(Default)]
pub struct CredentialChain {
    sources: Vec<Box<dyn CredentialSource>>,
}

impl CredentialChain {
    pub fn new() -> Self {
        Self::default()
    }

    /// Environment, then dotenv file, then secrets file
    pub fn from_settings(settings: &CredentialSettings) -> Self {
        Self::new()
            .with(EnvSource::new(&settings.env_var))
            .with(DotenvSource::new(&settings.dotenv_path, &settings.env_var))
            .with(SecretsFileSource::new(&settings.secrets_path, &settings.env_var))
    }

    /// Append a source; it is consulted after all sources added before it
    pub fn with(mut self, source: impl CredentialSource + 'static) -> Self {
        self.sources.push(Box::new(source));
        self
    }

    pub fn resolve(&self) -> Result<ApiKey, ConfigurationError> {
        for source in &self.sources {
            match source.lookup() {
                Some(value) if !value.trim().is_empty() => {
                    debug!("API key found in {}", source.name());
                    return Ok(ApiKey::new(value.trim()));
                }
                _ => debug!("No API key in {}", source.name()),
            }
        }

        Err(ConfigurationError::MissingCredential {
            tried: self.sources.iter().map(|s| s.name()).collect(),
        })
    }
}
