//! HTTP client for talking to the search provider

use crate::config::OutgoingSettings;
use crate::error::ProviderError;
use crate::provider::{ProviderRequest, ProviderResponse};
use anyhow::{Context, Result};
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use reqwest::{Client, Response};
use std::collections::HashMap;
use std::time::Duration;
use tracing::debug;

/// User agent sent with every provider request
pub fn user_agent() -> String {
    format!("search-exporter/{}", crate::VERSION)
}

/// HTTP client wrapper configured from [`OutgoingSettings`]
#[derive(Clone)]
pub struct HttpClient {
    client: Client,
    extra_headers: HeaderMap,
}

impl HttpClient {
    /// Create a new HTTP client with custom settings
    pub fn with_settings(settings: &OutgoingSettings) -> Result<Self> {
        let mut builder = Client::builder()
            .timeout(Duration::from_secs_f64(settings.request_timeout))
            .pool_max_idle_per_host(settings.pool_maxsize)
            .user_agent(user_agent())
            .gzip(true)
            .brotli(true);

        // SSL verification
        if !settings.verify_ssl {
            builder = builder.danger_accept_invalid_certs(true);
        }

        // Proxy settings
        if let Some(ref proxy_url) = settings.proxies.all {
            builder = builder.proxy(reqwest::Proxy::all(proxy_url)?);
        } else {
            if let Some(ref http) = settings.proxies.http {
                builder = builder.proxy(reqwest::Proxy::http(http)?);
            }
            if let Some(ref https) = settings.proxies.https {
                builder = builder.proxy(reqwest::Proxy::https(https)?);
            }
        }

        let mut extra_headers = HeaderMap::new();
        for (key, value) in &settings.extra_headers {
            let (name, value) =
                header_pair(key, value).with_context(|| format!("invalid extra header {key:?}"))?;
            extra_headers.insert(name, value);
        }

        let client = builder.build()?;

        Ok(Self {
            client,
            extra_headers,
        })
    }

    /// Execute a provider request.
    ///
    /// Any completed HTTP exchange is returned as a response, whatever its
    /// status; only transport failures are errors here.
    pub async fn execute(&self, request: ProviderRequest) -> Result<ProviderResponse, ProviderError> {
        let headers = self.headers_for(&request.headers)?;

        let mut req_builder = self.client.get(&request.url).headers(headers);
        if !request.params.is_empty() {
            req_builder = req_builder.query(&request.params);
        }

        debug!(
            "Sending GET {} with {} params",
            request.url,
            request.params.len()
        );

        let response = req_builder.send().await?;

        Self::parse_response(response).await
    }

    /// Configured extras overlaid with the request's own headers.
    /// A name present in both is sent once, with the request's value.
    fn headers_for(&self, request_headers: &HashMap<String, String>) -> Result<HeaderMap, ProviderError> {
        let mut headers = self.extra_headers.clone();
        for (key, value) in request_headers {
            let (name, value) = header_pair(key, value)
                .map_err(|e| ProviderError::Transport(format!("invalid header {key:?}: {e}")))?;
            headers.insert(name, value);
        }
        Ok(headers)
    }

    /// Parse response into ProviderResponse
    async fn parse_response(response: Response) -> Result<ProviderResponse, ProviderError> {
        let status = response.status().as_u16();
        let text = response.text().await?;

        Ok(ProviderResponse { status, text })
    }
}

fn header_pair(key: &str, value: &str) -> Result<(HeaderName, HeaderValue)> {
    Ok((
        HeaderName::from_bytes(key.as_bytes())?,
        HeaderValue::from_str(value)?,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client_with_extras(extras: &[(&str, &str)]) -> HttpClient {
        let mut settings = OutgoingSettings::default();
        settings.extra_headers = extras
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        HttpClient::with_settings(&settings).unwrap()
    }

    #[test]
    fn test_client_creation() {
        assert!(HttpClient::with_settings(&OutgoingSettings::default()).is_ok());
    }

    #[test]
    fn test_request_header_replaces_extra() {
        let client = client_with_extras(&[("Accept", "text/html"), ("X-Trace", "on")]);
        let request = HashMap::from([("accept".to_string(), "application/json".to_string())]);

        let headers = client.headers_for(&request).unwrap();
        let accept: Vec<&str> = headers
            .get_all("accept")
            .iter()
            .map(|v| v.to_str().unwrap())
            .collect();
        assert_eq!(accept, vec!["application/json"]);
        assert_eq!(headers.get("x-trace").unwrap(), "on");
    }

    #[test]
    fn test_invalid_extra_header_rejected() {
        let mut settings = OutgoingSettings::default();
        settings
            .extra_headers
            .insert("bad header".to_string(), "v".to_string());
        assert!(HttpClient::with_settings(&settings).is_err());
    }

    #[test]
    fn test_bad_proxy_rejected() {
        let mut settings = OutgoingSettings::default();
        settings.proxies.all = Some("::not a proxy::".to_string());
        assert!(HttpClient::with_settings(&settings).is_err());
    }

    #[test]
    fn test_user_agent_carries_version() {
        assert!(user_agent().ends_with(crate::VERSION));
    }
}
