//! Client wrappers for the portal-local API key routes.
//!
//! These routes live on the portal origin, so callers pass a client built
//! with `PortalConfig::portal_base_url` instead of the gateway base.

use crate::api::{ApiClient, ApiResponse};
use crate::features::api_keys::types::{ApiKeyList, CreateApiKeyRequest, CreatedApiKey};

pub const API_KEYS_PATH: &str = "/api/api-keys";

pub async fn list_api_keys(client: &ApiClient) -> ApiResponse<ApiKeyList> {
    client.get(API_KEYS_PATH).await
}

/// Creates a key. The secret in the response is not retrievable again.
pub async fn create_api_key(client: &ApiClient, request: &CreateApiKeyRequest) -> ApiResponse<CreatedApiKey> {
    client.post(API_KEYS_PATH, request).await
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::api::create_api_client;
    use serde_json::json;
    use std::net::TcpListener;
    use wiremock::matchers::{body_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn can_bind_localhost() -> bool {
        TcpListener::bind("127.0.0.1:0").is_ok()
    }

    #[tokio::test]
    async fn create_returns_secret_once() {
        if !can_bind_localhost() {
            eprintln!("Skipping test: cannot bind localhost");
            return;
        }
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/api-keys"))
            .and(body_json(json!({"name": "ci"})))
            .respond_with(ResponseTemplate::new(201).set_body_json(json!({
                "id": "k1",
                "name": "ci",
                "prefix": "pk_live_ab",
                "secret": "pk_live_abcdef"
            })))
            .mount(&server)
            .await;

        let client = create_api_client(&server.uri(), Some("tok"), Some("org1"));
        let request = CreateApiKeyRequest {
            name: "ci".to_string(),
            expires_in_days: None,
        };
        let created = create_api_key(&client, &request).await.data.unwrap();
        assert_eq!(created.key.id, "k1");
        assert_eq!(created.secret, "pk_live_abcdef");
    }

    #[tokio::test]
    async fn list_accepts_camel_case_wrapper() {
        if !can_bind_localhost() {
            eprintln!("Skipping test: cannot bind localhost");
            return;
        }
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/api-keys"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "apiKeys": [{"id": "k1", "name": "ci"}]
            })))
            .mount(&server)
            .await;

        let client = create_api_client(&server.uri(), Some("tok"), None);
        let keys = list_api_keys(&client).await.data.unwrap().keys;
        assert_eq!(keys.len(), 1);
    }
}
