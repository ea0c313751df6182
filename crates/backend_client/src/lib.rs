pub mod admin;
pub mod error;
pub mod financials;

pub use error::{ClientError, Result};

use reqwest::header::{HeaderMap, HeaderValue, CONTENT_TYPE};
use reqwest::{Client, Url};

/// Configuration for talking to the financials backend.
#[derive(Debug, Clone)]
pub struct BackendConfig {
    pub base_url: String,
}

impl BackendConfig {
    /// Loads config from env vars:
    /// - `FINANCIALS_API_BASE_URL` (default: `http://localhost:8000`)
    pub fn from_env() -> Self {
        let base_url = std::env::var("FINANCIALS_API_BASE_URL")
            .unwrap_or_else(|_| "http://localhost:8000".to_string());
        Self { base_url }
    }
}

/// Async HTTP client for the financials + admin API.
#[derive(Debug, Clone)]
pub struct BackendClient {
    http: Client,
    base_url: Url,
}

impl BackendClient {
    pub fn new(config: BackendConfig) -> Result<Self> {
        let base_url = validate_base_url(&config.base_url)?;

        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let http = Client::builder()
            .default_headers(headers)
            .build()
            .map_err(ClientError::Http)?;

        Ok(Self { http, base_url })
    }

    pub fn from_env() -> Result<Self> {
        Self::new(BackendConfig::from_env())
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub(crate) fn http(&self) -> &Client {
        &self.http
    }

    /// Resolves a relative API path against the base URL.
    pub(crate) fn endpoint(&self, path: &str) -> Result<Url> {
        self.base_url
            .join(path)
            .map_err(|e| ClientError::Url(format!("{path}: {e}")))
    }

    /// Resolves a path and appends raw key segments, percent-encoding each
    /// one (override keys may contain spaces, colons, or slashes).
    pub(crate) fn keyed_endpoint(&self, path: &str, segments: &[&str]) -> Result<Url> {
        let mut url = self.endpoint(path)?;
        {
            let mut parts = url
                .path_segments_mut()
                .map_err(|_| ClientError::Url("base URL cannot hold path segments".to_string()))?;
            for segment in segments {
                parts.push(segment);
            }
        }
        Ok(url)
    }
}

fn validate_base_url(base_url: &str) -> Result<Url> {
    let mut url =
        Url::parse(base_url).map_err(|e| ClientError::Url(format!("{base_url}: {e}")))?;

    match url.scheme() {
        "http" | "https" => {}
        other => {
            return Err(ClientError::Url(format!(
                "unsupported scheme '{other}' for FINANCIALS_API_BASE_URL"
            )))
        }
    }

    if url.host_str().is_none() {
        return Err(ClientError::Url(
            "FINANCIALS_API_BASE_URL is missing a host".to_string(),
        ));
    }

    // A trailing slash keeps Url::join from eating the last path segment.
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }

    Ok(url)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_non_http_schemes() {
        assert!(matches!(
            validate_base_url("ftp://example.com"),
            Err(ClientError::Url(_))
        ));
    }

    #[test]
    fn appends_trailing_slash_to_base_path() {
        let url = validate_base_url("http://localhost:8000/api").unwrap();
        assert_eq!(url.path(), "/api/");
        assert_eq!(url.join("financials/").unwrap().path(), "/api/financials/");
    }

    #[test]
    fn keyed_endpoint_percent_encodes_segments() {
        let client = BackendClient::new(BackendConfig {
            base_url: "http://localhost:8000".to_string(),
        })
        .unwrap();

        let url = client
            .keyed_endpoint(
                "admin/concept-normalization-overrides",
                &["Income Statement", "us-gaap:Revenues/Net"],
            )
            .unwrap();

        assert!(url.path().contains("Income%20Statement"));
        // A slash inside a key must not create an extra path segment.
        assert!(url.path().contains("us-gaap:Revenues%2FNet"));
    }
}
