//! Blocking JSON client shared by the Google Maps adapters.
//!
//! [`DistanceMatrixSource`](roundtrip_core::DistanceMatrixSource) and
//! [`RouteSolver`](roundtrip_core::RouteSolver) are synchronous so the core
//! stays embeddable in synchronous callers. The client bridges to `reqwest` by
//! blocking on a Tokio runtime it owns.

use std::future::Future;

use reqwest::Client;
use roundtrip_core::ProviderError;
use serde::de::DeserializeOwned;
use thiserror::Error;
use tokio::runtime::{Handle, Runtime, RuntimeFlavor};

use super::config::GoogleMapsConfig;

/// Error type for [`GoogleClient`] construction failures.
#[derive(Debug, Error)]
pub enum ClientBuildError {
    /// No API key was configured.
    #[error("a Google Maps API key is required")]
    MissingApiKey,
    /// Failed to build the HTTP client.
    #[error("failed to build HTTP client: {0}")]
    HttpClient(#[source] reqwest::Error),
    /// Failed to build the Tokio runtime.
    #[error("failed to build Tokio runtime: {0}")]
    Runtime(#[source] std::io::Error),
}

/// Blocking client for the Google Maps JSON web services.
///
/// # Runtime behaviour
///
/// Outside any Tokio runtime the client blocks on its own current-thread
/// runtime. Inside a multi-threaded runtime (detected via
/// [`Handle::try_current()`] and [`RuntimeFlavor::MultiThread`]) it uses that
/// runtime's handle with [`tokio::task::block_in_place`] so no runtime is
/// nested. Callers on a `current_thread` runtime fall back to the owned
/// runtime and must not hold that runtime's IO driver across the call.
pub struct GoogleClient {
    http: Client,
    config: GoogleMapsConfig,
    runtime: Runtime,
}

impl std::fmt::Debug for GoogleClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GoogleClient")
            .field("http", &self.http)
            .field("config", &self.config)
            .field("runtime", &"<tokio::runtime::Runtime>")
            .finish()
    }
}

impl GoogleClient {
    /// Build a client from explicit configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ClientBuildError::MissingApiKey`] when the key is blank, or
    /// an error if the HTTP client or Tokio runtime fails to build.
    pub fn new(config: GoogleMapsConfig) -> Result<Self, ClientBuildError> {
        if config.api_key.trim().is_empty() {
            return Err(ClientBuildError::MissingApiKey);
        }
        let http = Client::builder()
            .user_agent(&config.user_agent)
            .connect_timeout(config.timeout)
            .timeout(config.timeout)
            .build()
            .map_err(ClientBuildError::HttpClient)?;
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(ClientBuildError::Runtime)?;
        Ok(Self {
            http,
            config,
            runtime,
        })
    }

    /// The active configuration.
    #[must_use]
    pub const fn config(&self) -> &GoogleMapsConfig {
        &self.config
    }

    /// Fetch `service` with `query` and decode the JSON body.
    ///
    /// The API key and travel mode are appended to `query`. Errors name the
    /// endpoint without its query string so the key never reaches logs.
    pub(crate) fn get_json<T: DeserializeOwned>(
        &self,
        service: &str,
        query: &[(&str, &str)],
    ) -> Result<T, ProviderError> {
        let url = self.config.endpoint(service);
        log::debug!("requesting {url}");
        self.block_on(self.fetch_json(&url, query))
    }

    async fn fetch_json<T: DeserializeOwned>(
        &self,
        url: &str,
        query: &[(&str, &str)],
    ) -> Result<T, ProviderError> {
        let response = self
            .http
            .get(url)
            .query(query)
            .query(&[
                ("mode", self.config.travel_mode.as_str()),
                ("key", self.config.api_key.as_str()),
            ])
            .send()
            .await
            .map_err(|err| self.convert_reqwest_error(err, url))?
            .error_for_status()
            .map_err(|err| self.convert_reqwest_error(err, url))?;

        response.json().await.map_err(|err| ProviderError::Parse {
            message: err.to_string(),
        })
    }

    fn block_on<F: Future>(&self, future: F) -> F::Output {
        match Handle::try_current() {
            Ok(handle) if handle.runtime_flavor() == RuntimeFlavor::MultiThread => {
                tokio::task::block_in_place(|| handle.block_on(future))
            }
            _ => self.runtime.block_on(future),
        }
    }

    fn convert_reqwest_error(&self, error: reqwest::Error, url: &str) -> ProviderError {
        if error.is_timeout() {
            return ProviderError::Timeout {
                url: url.to_owned(),
                timeout_secs: self.config.timeout.as_secs(),
            };
        }

        // The request URL carries the API key, so it is stripped from messages.
        let status = error.status();
        let message = error.without_url().to_string();
        match status {
            Some(status) => ProviderError::Http {
                url: url.to_owned(),
                status: status.as_u16(),
                message,
            },
            None => ProviderError::Network {
                url: url.to_owned(),
                message,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("")]
    #[case("   ")]
    fn blank_keys_are_rejected(#[case] key: &str) {
        let err = GoogleClient::new(GoogleMapsConfig::new(key)).expect_err("blank key");
        assert!(matches!(err, ClientBuildError::MissingApiKey));
    }

    #[rstest]
    fn debug_output_hides_runtime_and_key() {
        let client = GoogleClient::new(GoogleMapsConfig::new("secret")).expect("client builds");
        let rendered = format!("{client:?}");
        assert!(rendered.contains("<tokio::runtime::Runtime>"));
        assert!(!rendered.contains("secret"));
    }
}
