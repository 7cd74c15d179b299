//! HTTP client for the platform gateway

use std::time::Duration;

use platform_api::ErrorResponse;
use reqwest::{Client, RequestBuilder, StatusCode};
use serde::{de::DeserializeOwned, Serialize};
use tracing::{debug, error};
use url::Url;

use crate::errors::DeployError;
use crate::platform::credentials::CredentialBundle;

/// Environment variable naming the gateway base URL
pub const ENDPOINT_VAR: &str = "ONI_PLATFORM_URL";

/// JSON-over-HTTP client for the platform gateway
pub struct HttpPlatformClient {
    client: Client,
    base_url: Url,
    credentials: Option<CredentialBundle>,
}

impl HttpPlatformClient {
    /// Create a new client
    pub fn new(base_url: &str, credentials: Option<CredentialBundle>) -> Result<Self, DeployError> {
        let mut base_url = Url::parse(base_url).map_err(|e| {
            DeployError::ConfigError(format!("invalid platform URL {}: {}", base_url, e))
        })?;
        if base_url.cannot_be_a_base() {
            return Err(DeployError::ConfigError(format!(
                "platform URL {} cannot be used as a base",
                base_url
            )));
        }
        // Path segments are appended; a trailing empty segment would leave `//`.
        if let Ok(mut segments) = base_url.path_segments_mut() {
            segments.pop_if_empty();
        }

        let client = Client::builder().timeout(Duration::from_secs(30)).build()?;

        Ok(Self {
            client,
            base_url,
            credentials,
        })
    }

    /// Get the base URL
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Build an endpoint URL from path segments, percent-encoding each one
    pub fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.extend(segments);
        }
        url
    }

    fn authorize(&self, mut request: RequestBuilder) -> RequestBuilder {
        if let Some(credentials) = &self.credentials {
            for (name, value) in credentials.headers() {
                request = request.header(name, value);
            }
        }
        request
    }

    async fn send<T: DeserializeOwned>(
        &self,
        method: &str,
        url: &Url,
        request: RequestBuilder,
    ) -> Result<T, DeployError> {
        let response = self.authorize(request).send().await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            error!("HTTP {} {} failed: {} - {}", method, url.path(), status, body);
            return Err(DeployError::PlatformError(error_detail(status, &body)));
        }

        let body = response.json().await?;
        Ok(body)
    }

    /// Make a GET request
    pub async fn get<T: DeserializeOwned>(
        &self,
        url: Url,
        query: &[(&str, String)],
    ) -> Result<T, DeployError> {
        debug!("GET {}", url);
        let request = self.client.get(url.clone()).query(query);
        self.send("GET", &url, request).await
    }

    /// Make a POST request
    pub async fn post<T: DeserializeOwned, B: Serialize>(
        &self,
        url: Url,
        body: &B,
    ) -> Result<T, DeployError> {
        debug!("POST {}", url);
        let request = self.client.post(url.clone()).json(body);
        self.send("POST", &url, request).await
    }

    /// Make a PUT request
    pub async fn put<T: DeserializeOwned, B: Serialize>(
        &self,
        url: Url,
        body: &B,
    ) -> Result<T, DeployError> {
        debug!("PUT {}", url);
        let request = self.client.put(url.clone()).json(body);
        self.send("PUT", &url, request).await
    }
}

/// Gateway error message when the body is an error document, else the raw body
fn error_detail(status: StatusCode, body: &str) -> String {
    match serde_json::from_str::<ErrorResponse>(body) {
        Ok(response) => format!("{}: {}", status, response.message),
        Err(_) => format!("{}: {}", status, body),
    }
}
