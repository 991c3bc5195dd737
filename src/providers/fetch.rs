use tracing::{debug, warn};

use super::request::ProviderRequest;
use crate::core::{Document, ProviderError};

/// Executes a provider call once and decodes the body into a JSON object.
///
/// The HTTP status is not interpreted; providers report failures in the body.
/// A body that is empty or not a JSON object yields an empty document.
pub async fn execute(
    client: &reqwest::Client,
    request: ProviderRequest,
) -> Result<Document, ProviderError> {
    let ProviderRequest {
        provider,
        method,
        url,
    } = request;
    debug!(provider, endpoint = %url.path(), "Sending provider request");

    let response = client
        .request(method, url)
        .send()
        .await
        .map_err(|e| {
            warn!(provider, error = %e, "Failed to complete HTTP request");
            ProviderError::Transport {
                provider: provider.to_string(),
                source: e,
            }
        })?;

    let status = response.status();
    let body = response.text().await.map_err(|e| {
        warn!(provider, error = %e, "Failed to read response body");
        ProviderError::Decode {
            provider: provider.to_string(),
            source: e,
        }
    })?;
    debug!(provider, %status, bytes = body.len(), "Received provider response");

    Ok(decode_document(provider, &body))
}

fn decode_document(provider: &str, body: &str) -> Document {
    if body.trim().is_empty() {
        return Document::new();
    }
    serde_json::from_str::<Document>(body).unwrap_or_else(|e| {
        warn!(provider, error = %e, "Provider response is not a JSON object");
        Document::new()
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::providers::profile::ProviderProfile;
    use crate::providers::request::RequestBuilder;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn request(base_url: &str) -> ProviderRequest {
        RequestBuilder::new(ProviderProfile::fixer(), base_url, "test-key")
            .current_price(&["USD".to_string()])
            .unwrap()
    }

    async fn serve(body: &str, status: u16) -> MockServer {
        let mock_server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/latest"))
            .and(query_param("access_key", "test-key"))
            .respond_with(ResponseTemplate::new(status).set_body_string(body))
            .mount(&mock_server)
            .await;
        mock_server
    }

    #[tokio::test]
    async fn test_decodes_json_object() {
        let mock_server = serve(r#"{"success": true, "base": "EUR", "rates": {"USD": 1.08}}"#, 200).await;
        let doc = execute(&reqwest::Client::new(), request(&mock_server.uri()))
            .await
            .unwrap();
        assert_eq!(doc.get("base").and_then(|v| v.as_str()), Some("EUR"));
        assert_eq!(doc["rates"]["USD"].as_f64(), Some(1.08));
    }

    #[tokio::test]
    async fn test_empty_and_malformed_bodies_yield_empty_document() {
        for body in ["", "   ", "<html>Bad Gateway</html>", "[1, 2, 3]"] {
            let mock_server = serve(body, 200).await;
            let doc = execute(&reqwest::Client::new(), request(&mock_server.uri()))
                .await
                .unwrap();
            assert!(doc.is_empty(), "body {body:?} should decode to an empty document");
        }
    }

    #[tokio::test]
    async fn test_error_status_still_decodes_body() {
        let mock_server = serve(r#"{"success": false, "error": {"code": 104}}"#, 429).await;
        let doc = execute(&reqwest::Client::new(), request(&mock_server.uri()))
            .await
            .unwrap();
        assert_eq!(doc.get("success").and_then(|v| v.as_bool()), Some(false));
    }

    #[tokio::test]
    async fn test_transport_failure() {
        let result = execute(&reqwest::Client::new(), request("http://127.0.0.1:1")).await;
        match result {
            Err(ProviderError::Transport { provider, .. }) => assert_eq!(provider, "fixer"),
            other => panic!("Expected transport error, got {other:?}"),
        }
    }
}
