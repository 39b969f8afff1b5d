//! HTTP plumbing shared by the registry adapters
//!
//! Status mapping:
//! - 2xx with a body -> decoded payload
//! - 2xx with an empty body -> `None`
//! - 4xx -> `PortError::NotFound`
//! - 5xx -> `PortError::ServiceUnavailable`
//! - transport timeout -> `PortError::Timeout`
//! - other transport failures -> `PortError::Connection`
//! - undecodable body -> `PortError::Transformation`

use std::fmt;
use std::time::{Duration, Instant};

use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, CONTENT_TYPE};
use reqwest::{Client, Url};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use core_kernel::{AdapterHealth, CircuitBreakerConfig, CoreError, HealthCheckResult, PortError};

use super::circuit_breaker::CircuitBreaker;

/// Connection settings for one remote registry
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RegistryConfig {
    /// Base URL the request paths are appended to
    pub base_url: String,
    /// Whole-request timeout in seconds
    pub timeout_secs: u64,
    /// Circuit breaker settings; `None` disables the breaker
    pub circuit_breaker: Option<CircuitBreakerConfig>,
}

impl RegistryConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Default::default()
        }
    }
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            base_url: String::new(),
            timeout_secs: 5,
            circuit_breaker: Some(CircuitBreakerConfig::default()),
        }
    }
}

#[derive(Debug)]
pub(crate) struct RegistryHttp {
    adapter_id: &'static str,
    base_url: Url,
    http: Client,
    timeout: Duration,
    circuit_breaker: Option<CircuitBreaker>,
}

impl RegistryHttp {
    pub(crate) fn new(adapter_id: &'static str, config: &RegistryConfig) -> Result<Self, CoreError> {
        let base_url = Url::parse(&config.base_url).map_err(|e| {
            CoreError::configuration(format!(
                "{}: invalid base URL '{}': {}",
                adapter_id, config.base_url, e
            ))
        })?;
        if base_url.cannot_be_a_base() {
            return Err(CoreError::configuration(format!(
                "{}: base URL '{}' cannot carry a path",
                adapter_id, config.base_url
            )));
        }

        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        let timeout = Duration::from_secs(config.timeout_secs);
        let http = Client::builder()
            .default_headers(headers)
            .timeout(timeout)
            .build()
            .map_err(|e| CoreError::configuration(format!("{}: {}", adapter_id, e)))?;

        Ok(Self {
            adapter_id,
            base_url,
            http,
            timeout,
            circuit_breaker: config.circuit_breaker.clone().map(CircuitBreaker::new),
        })
    }

    fn url(&self, segments: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    /// Issues a GET for the path below the base URL
    ///
    /// `entity_type` and `id` only label a `NotFound` error.
    pub(crate) async fn get<T: DeserializeOwned>(
        &self,
        operation: &str,
        segments: &[&str],
        entity_type: &str,
        id: &(dyn fmt::Display + Sync),
    ) -> Result<Option<T>, PortError> {
        if let Some(cb) = &self.circuit_breaker {
            if !cb.is_available().await {
                return Err(PortError::unavailable(format!("{} (circuit open)", self.adapter_id)));
            }
        }

        let result = self.send(operation, segments, entity_type, id).await;

        if let Some(cb) = &self.circuit_breaker {
            match &result {
                Err(e) if e.is_transient() => cb.record_failure().await,
                _ => cb.record_success(),
            }
        }
        result
    }

    async fn send<T: DeserializeOwned>(
        &self,
        operation: &str,
        segments: &[&str],
        entity_type: &str,
        id: &(dyn fmt::Display + Sync),
    ) -> Result<Option<T>, PortError> {
        let url = self.url(segments);
        debug!(adapter = self.adapter_id, %url, "GET");

        let response = self
            .http
            .get(url)
            .send()
            .await
            .map_err(|e| self.transport_error(operation, e))?;

        let status = response.status();
        if status.is_client_error() {
            debug!(adapter = self.adapter_id, %status, "Registry has no match");
            return Err(PortError::not_found(entity_type, id));
        }
        if !status.is_success() {
            warn!(adapter = self.adapter_id, %status, "Registry answered with an error");
            return Err(PortError::unavailable(format!("{} ({})", self.adapter_id, status)));
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| self.transport_error(operation, e))?;
        if body.iter().all(u8::is_ascii_whitespace) {
            return Ok(None);
        }

        serde_json::from_slice(&body).map(Some).map_err(|e| PortError::Transformation {
            message: format!("{}: {}", self.adapter_id, e),
        })
    }

    fn transport_error(&self, operation: &str, error: reqwest::Error) -> PortError {
        if error.is_timeout() {
            PortError::Timeout {
                operation: format!("{}.{}", self.adapter_id, operation),
                duration_ms: self.timeout.as_millis() as u64,
            }
        } else {
            PortError::Connection {
                message: format!("{}: {}", self.adapter_id, error),
                source: Some(Box::new(error)),
            }
        }
    }

    /// Reachability probe: any HTTP answer from the base URL counts as healthy
    pub(crate) async fn health_check(&self) -> HealthCheckResult {
        if self.circuit_breaker.as_ref().is_some_and(CircuitBreaker::is_open) {
            return HealthCheckResult::new(
                self.adapter_id,
                AdapterHealth::Degraded,
                0,
                Some("Circuit breaker is open".to_string()),
            );
        }

        let start = Instant::now();
        let outcome = self.http.get(self.base_url.clone()).send().await;
        let latency_ms = start.elapsed().as_millis() as u64;

        match outcome {
            Ok(response) if response.status().is_server_error() => HealthCheckResult::new(
                self.adapter_id,
                AdapterHealth::Degraded,
                latency_ms,
                Some(format!("Registry answered {}", response.status())),
            ),
            Ok(_) => HealthCheckResult::new(self.adapter_id, AdapterHealth::Healthy, latency_ms, None),
            Err(e) => HealthCheckResult::new(
                self.adapter_id,
                AdapterHealth::Unhealthy,
                latency_ms,
                Some(e.to_string()),
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_url_appends_segments_and_escapes() {
        let http = RegistryHttp::new("test", &RegistryConfig::new("http://localhost:9050/v1/client")).unwrap();
        let url = http.url(&["12 34", "DNI"]);
        assert_eq!(url.as_str(), "http://localhost:9050/v1/client/12%2034/DNI");
    }

    #[test]
    fn test_url_with_trailing_slash() {
        let http = RegistryHttp::new("test", &RegistryConfig::new("http://localhost:9056/v1/card/")).unwrap();
        let url = http.url(&["countCardByClient", "DNI", "1"]);
        assert_eq!(url.as_str(), "http://localhost:9056/v1/card/countCardByClient/DNI/1");
    }

    fn assert_send<T: Send>(_: T) {}

    #[test]
    fn test_get_future_is_send() {
        let http = RegistryHttp::new("test", &RegistryConfig::new("http://localhost:9056/v1/card")).unwrap();
        let id = String::from("DNI:10000001");
        assert_send(http.get::<u64>("count_cards", &["countCardByClient"], "Card", &id));
    }

    #[test]
    fn test_rejects_invalid_base_url() {
        let err = RegistryHttp::new("test", &RegistryConfig::new("not a url")).unwrap_err();
        assert!(matches!(err, CoreError::Configuration(_)));
    }
}
