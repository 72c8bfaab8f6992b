//! Forward geocoding: resolve a free-text place name to candidate locations.
//! Uses the Open-Meteo geocoding API - free, no API key required.

use std::sync::Arc;
use std::time::Duration;

use reqwest::Client;
use serde::Deserialize;
use tracing::instrument;

use crate::provider::http_client;
use crate::types::{GeocodeCandidate, WeatherError};

#[derive(Debug, Deserialize)]
struct GeocodeResponse {
    /// Absent when nothing matched
    #[serde(default)]
    results: Option<Vec<GeocodeCandidate>>,
}

/// Coordinate resolver backed by the geocoding API
#[derive(Debug, Clone)]
pub struct GeocodeClient {
    client: Arc<Client>,
    base_url: String,
}

impl GeocodeClient {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, WeatherError> {
        Ok(Self {
            client: Arc::new(http_client(timeout)?),
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Resolve `query` to zero or more candidate locations.
    ///
    /// The query is sent as-is, empty strings included; matching is up to
    /// the service. Zero matches is an empty list, not an error.
    #[instrument(skip(self), level = "info")]
    pub async fn resolve(&self, query: &str) -> Result<Vec<GeocodeCandidate>, WeatherError> {
        let url = format!(
            "{}/search?name={}",
            self.base_url,
            urlencoding::encode(query)
        );

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| WeatherError::ResolutionFailed(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            tracing::debug!("Geocode returned status {}", status);
            return Err(WeatherError::ResolutionFailed(format!("status {}", status)));
        }

        let body: GeocodeResponse = response
            .json()
            .await
            .map_err(|e| WeatherError::ResolutionFailed(format!("invalid response: {}", e)))?;

        let candidates = body.results.unwrap_or_default();
        tracing::info!("Resolved {:?} to {} candidates", query, candidates.len());
        Ok(candidates)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client_for(server: &MockServer) -> GeocodeClient {
        GeocodeClient::new(&server.uri(), Duration::from_secs(5)).unwrap()
    }

    #[tokio::test]
    async fn test_resolve_berlin() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/search"))
            .and(query_param("name", "Berlin"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "results": [
                    {
                        "id": 1,
                        "name": "Berlin",
                        "latitude": 52.52,
                        "longitude": 13.405,
                        "country_code": "DE",
                        "admin1": "Land Berlin"
                    }
                ],
                "generationtime_ms": 0.5
            })))
            .expect(1)
            .mount(&mock_server)
            .await;

        let candidates = client_for(&mock_server).resolve("Berlin").await.unwrap();

        assert_eq!(
            candidates,
            vec![GeocodeCandidate {
                id: 1,
                name: "Berlin".into(),
                country_code: "DE".into(),
                latitude: 52.52,
                longitude: 13.405,
            }]
        );
    }

    #[tokio::test]
    async fn test_resolve_encodes_query() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/search"))
            .and(query_param("name", "São Paulo & Co"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "results": []
            })))
            .expect(1)
            .mount(&mock_server)
            .await;

        let candidates = client_for(&mock_server)
            .resolve("São Paulo & Co")
            .await
            .unwrap();
        assert!(candidates.is_empty());
    }

    #[tokio::test]
    async fn test_resolve_missing_results_is_empty() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/search"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(serde_json::json!({ "generationtime_ms": 0.2 })),
            )
            .mount(&mock_server)
            .await;

        let candidates = client_for(&mock_server).resolve("Zzzxq").await.unwrap();
        assert!(candidates.is_empty());
    }

    #[tokio::test]
    async fn test_resolve_empty_query_is_forwarded() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/search"))
            .and(query_param("name", ""))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({})))
            .expect(1)
            .mount(&mock_server)
            .await;

        let candidates = client_for(&mock_server).resolve("").await.unwrap();
        assert!(candidates.is_empty());
    }

    #[tokio::test]
    async fn test_resolve_server_error() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/search"))
            .respond_with(ResponseTemplate::new(500))
            .expect(1)
            .mount(&mock_server)
            .await;

        let err = client_for(&mock_server).resolve("Berlin").await.unwrap_err();
        assert!(matches!(err, WeatherError::ResolutionFailed(_)));
    }

    #[tokio::test]
    async fn test_resolve_rejects_malformed_body() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/search"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "results": [{ "id": "not-a-number", "name": "Berlin" }]
            })))
            .mount(&mock_server)
            .await;

        let err = client_for(&mock_server).resolve("Berlin").await.unwrap_err();
        assert!(matches!(err, WeatherError::ResolutionFailed(_)));
    }

    #[tokio::test]
    async fn test_resolve_trailing_slash_base_url() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/search"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({})))
            .expect(1)
            .mount(&mock_server)
            .await;

        let client =
            GeocodeClient::new(&format!("{}/", mock_server.uri()), Duration::from_secs(5))
                .unwrap();
        assert!(client.resolve("Berlin").await.unwrap().is_empty());
    }
}
