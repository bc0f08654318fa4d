//! CRM integration actions: connect, disconnect and the Salesforce OAuth URL.
//!
//! The OAuth exchange itself happens on the provider's side; these calls only
//! register or remove the integration record and hand back the URL to open.

use super::{id_string, ConnectionStatus, Provider};
use crate::api::{ApiClient, ApiResponse, NoContent};
use crate::config::path_segment;
use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, Serialize)]
pub struct ConnectIntegrationRequest {
    pub platform: Provider,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Provider-specific settings (instance URL, tenant id, ...).
    #[serde(skip_serializing_if = "Value::is_null")]
    pub config: Value,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct IntegrationRecord {
    #[serde(default, deserialize_with = "id_string")]
    pub id: Option<String>,
    pub platform: Provider,
    #[serde(default)]
    pub status: Option<ConnectionStatus>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct AuthUrl {
    #[serde(alias = "auth_url", alias = "authUrl")]
    pub url: String,
    #[serde(default)]
    pub state: Option<String>,
}

/// Registers a CRM integration for the current organization.
pub async fn connect_integration(
    client: &ApiClient,
    request: &ConnectIntegrationRequest,
) -> ApiResponse<IntegrationRecord> {
    client.post("/v1/crm/config/integrations", request).await
}

/// Removes an integration; its health resource reverts to `disconnected`.
pub async fn disconnect_integration(client: &ApiClient, integration_id: &str) -> ApiResponse<NoContent> {
    let integration_id = path_segment(integration_id);
    client
        .delete(&format!("/v1/crm/config/integrations/{integration_id}"))
        .await
}

/// Fetches the Salesforce authorization URL to open in the browser.
pub async fn salesforce_auth_url(client: &ApiClient) -> ApiResponse<AuthUrl> {
    client.get("/v1/salesforce/auth/url").await
}
