//! HTTP client for the advert API

use crate::config::ApiConfig;
use crate::error::{IngestError, Result};
use reqwest::Client;
use std::time::Duration;
use tracing::{debug, instrument};

/// Client for the campaign count endpoint
pub struct AdvertClient {
    client: Client,
    url: String,
    token: String,
}

impl AdvertClient {
    /// Create a new client from API settings
    pub fn new(config: &ApiConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| IngestError::request(&config.url, e))?;

        Ok(Self {
            client,
            url: config.url.clone(),
            token: config.token.clone(),
        })
    }

    /// Fetch campaign groups as raw JSON
    ///
    /// Sends one `GET` with `Authorization: Bearer <token>`. Any transport
    /// error or non-success status is returned as an error; the body of a
    /// successful response must be JSON.
    #[instrument(skip(self), fields(url = %self.url))]
    pub async fn fetch_advert_data(&self) -> Result<serde_json::Value> {
        let response = self
            .client
            .get(&self.url)
            .bearer_auth(&self.token)
            .send()
            .await
            .map_err(|e| IngestError::request(&self.url, e))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(IngestError::status(status, &body));
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| IngestError::request(&self.url, e))?;
        debug!(status = %status, bytes = bytes.len(), "Received advert API response");

        serde_json::from_slice(&bytes)
            .map_err(|e| IngestError::malformed(format!("body is not valid JSON: {}", e)))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::{
        matchers::{header, method, path},
        Mock, MockServer, ResponseTemplate,
    };

    fn api_config(server: &MockServer, token: &str) -> ApiConfig {
        ApiConfig {
            url: format!("{}/adv/v1/promotion/count", server.uri()),
            token: token.to_string(),
            timeout_secs: 5,
        }
    }

    #[tokio::test]
    async fn test_sends_bearer_token_and_returns_json() {
        let server = MockServer::start().await;
        let body = json!({ "adverts": [], "all": 0 });

        Mock::given(method("GET"))
            .and(path("/adv/v1/promotion/count"))
            .and(header("Authorization", "Bearer test-token"))
            .respond_with(ResponseTemplate::new(200).set_body_json(body.clone()))
            .expect(1)
            .mount(&server)
            .await;

        let client = AdvertClient::new(&api_config(&server, "test-token")).unwrap();
        let value = client.fetch_advert_data().await.unwrap();

        assert_eq!(value, body);
    }

    #[tokio::test]
    async fn test_non_success_status_is_an_error() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(401).set_body_string("unauthorized"))
            .mount(&server)
            .await;

        let client = AdvertClient::new(&api_config(&server, "expired")).unwrap();
        let err = client.fetch_advert_data().await.unwrap_err();

        match err {
            IngestError::Status { status, body } => {
                assert_eq!(status.as_u16(), 401);
                assert_eq!(body, "unauthorized");
            },
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_non_json_body_is_malformed() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>maintenance</html>"))
            .mount(&server)
            .await;

        let client = AdvertClient::new(&api_config(&server, "t")).unwrap();
        let err = client.fetch_advert_data().await.unwrap_err();

        assert!(matches!(err, IngestError::MalformedResponse(_)));
    }

    #[tokio::test]
    async fn test_unreachable_host_is_a_request_error() {
        // Nothing listens on the port once the listener is dropped
        let port = {
            let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
            listener.local_addr().unwrap().port()
        };
        let config = ApiConfig {
            url: format!("http://127.0.0.1:{}/adv/v1/promotion/count", port),
            token: "t".to_string(),
            timeout_secs: 2,
        };

        let client = AdvertClient::new(&config).unwrap();
        let err = client.fetch_advert_data().await.unwrap_err();

        assert!(matches!(err, IngestError::Request { .. }));
    }
}
