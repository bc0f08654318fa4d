//! Client wrappers for the LinkedIn connection endpoints.

use super::{LinkedIn, LinkedInStatus, LinkedInStatusRaw};
use crate::api::{ApiClient, ApiResponse, NoContent};
use crate::polling::StatusMapper;
use serde::{Deserialize, Serialize};
use serde_json::json;

/// Live session created by the initialize call.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct InitializedSession {
    pub session_id: String,
    #[serde(default, alias = "live_url", alias = "debugger_url")]
    pub live_view_url: Option<String>,
    #[serde(default)]
    pub expires_at: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Availability {
    pub available: bool,
    #[serde(default)]
    pub reason: Option<String>,
    /// Minutes until a new session may be started.
    #[serde(default)]
    pub can_retry_after: Option<u64>,
}

/// Starts a live browser session for the organization.
pub async fn initialize_session(client: &ApiClient) -> ApiResponse<InitializedSession> {
    client
        .post("/v1/linkedin-connection/initialize", &json!({}))
        .await
}

/// Reads the connection status, mapped into the view model.
pub async fn session_status(client: &ApiClient) -> ApiResponse<LinkedInStatus> {
    client
        .get::<LinkedInStatusRaw>("/v1/linkedin-connection/status")
        .await
        .map(|raw| LinkedIn.map(raw))
}

/// Whether a new session can be started right now.
pub async fn availability(client: &ApiClient) -> ApiResponse<Availability> {
    client.get("/v1/linkedin-connection/availability").await
}

pub async fn disconnect(client: &ApiClient) -> ApiResponse<NoContent> {
    client.delete("/v1/linkedin-connection").await
}
