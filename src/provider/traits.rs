//! Provider traits and request/response types

use crate::error::ProviderError;
use crate::results::RawRecord;
use crate::search::SearchQuery;
use std::collections::HashMap;

/// GET request to be sent to the provider
#[derive(Debug, Clone)]
pub struct ProviderRequest {
    /// URL to request
    pub url: String,
    /// Request headers
    pub headers: HashMap<String, String>,
    /// Query parameters, in the order they are sent
    pub params: Vec<(String, String)>,
}

impl ProviderRequest {
    /// Create a request for `url`
    pub fn get(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            headers: HashMap::new(),
            params: Vec::new(),
        }
    }

    /// Add a header
    pub fn header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(key.into(), value.into());
        self
    }

    /// Add a query parameter
    pub fn param(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.params.push((key.into(), value.into()));
        self
    }

    /// Add a query parameter when a value is configured
    pub fn param_opt(self, key: &str, value: Option<&str>) -> Self {
        match value {
            Some(v) if !v.is_empty() => self.param(key, v),
            _ => self,
        }
    }

    /// Look up a query parameter
    pub fn get_param(&self, key: &str) -> Option<&str> {
        self.params
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }
}

/// HTTP response from the provider
#[derive(Debug)]
pub struct ProviderResponse {
    /// HTTP status code
    pub status: u16,
    /// Response body as text
    pub text: String,
}

impl ProviderResponse {
    /// Parse response as JSON
    pub fn json<T: serde::de::DeserializeOwned>(&self) -> Result<T, ProviderError> {
        serde_json::from_str(&self.text).map_err(|e| ProviderError::MalformedResponse(e.to_string()))
    }

    /// Check if response is successful (2xx)
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Turn a non-2xx response into a [`ProviderError::Status`]
    pub fn error_for_status(self) -> Result<Self, ProviderError> {
        if self.is_success() {
            return Ok(self);
        }
        Err(ProviderError::Status {
            status: self.status,
            detail: excerpt(&self.text, 200),
        })
    }
}

/// First `max` characters of a body, whitespace collapsed
fn excerpt(text: &str, max: usize) -> String {
    let collapsed = text.split_whitespace().collect::<Vec<_>>().join(" ");
    if collapsed.chars().count() <= max {
        return collapsed;
    }
    let mut cut: String = collapsed.chars().take(max).collect();
    cut.push('…');
    cut
}

/// A web search provider binding.
///
/// Building the request and reading the response are separate so that a
/// binding never performs I/O itself.
pub trait Provider: Send + Sync {
    /// Provider name
    fn name(&self) -> &str;

    /// Number of results to ask the provider for, given the user's count.
    /// Never less than `requested`.
    fn requested_count(&self, requested: u32) -> u32 {
        requested
    }

    /// Build the HTTP request for a search
    fn request(&self, query: &SearchQuery) -> Result<ProviderRequest, ProviderError>;

    /// Extract the organic result records from a successful response
    fn response(&self, response: ProviderResponse) -> Result<Vec<RawRecord>, ProviderError>;
}
