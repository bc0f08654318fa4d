//! Client wrappers for workspace endpoints.

use crate::api::{ApiClient, ApiResponse, NoContent};
use crate::config::path_segment;
use crate::features::workspaces::types::{
    Workspace, WorkspaceList, WorkspacePayload, WorkspaceRequest,
};

pub async fn list_workspaces(client: &ApiClient) -> ApiResponse<WorkspaceList> {
    client.get("/v1/workspaces").await
}

/// Fetches the organization's default workspace.
pub async fn default_workspace(client: &ApiClient) -> ApiResponse<Workspace> {
    client
        .get::<WorkspacePayload>("/v1/workspaces/default")
        .await
        .map(WorkspacePayload::into_workspace)
}

pub async fn get_workspace(client: &ApiClient, workspace_id: &str) -> ApiResponse<Workspace> {
    let workspace_id = path_segment(workspace_id);
    client
        .get::<WorkspacePayload>(&format!("/v1/workspaces/{workspace_id}"))
        .await
        .map(WorkspacePayload::into_workspace)
}

pub async fn create_workspace(client: &ApiClient, request: &WorkspaceRequest) -> ApiResponse<Workspace> {
    client
        .post::<WorkspacePayload, _>("/v1/workspaces", request)
        .await
        .map(WorkspacePayload::into_workspace)
}

pub async fn update_workspace(
    client: &ApiClient,
    workspace_id: &str,
    request: &WorkspaceRequest,
) -> ApiResponse<Workspace> {
    let workspace_id = path_segment(workspace_id);
    client
        .put::<WorkspacePayload, _>(&format!("/v1/workspaces/{workspace_id}"), request)
        .await
        .map(WorkspacePayload::into_workspace)
}

pub async fn delete_workspace(client: &ApiClient, workspace_id: &str) -> ApiResponse<NoContent> {
    let workspace_id = path_segment(workspace_id);
    client
        .delete(&format!("/v1/workspaces/{workspace_id}"))
        .await
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
    async fn default_workspace_accepts_wrapped_payload() {
        if !can_bind_localhost() {
            eprintln!("Skipping test: cannot bind localhost");
            return;
        }
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v1/workspaces/default"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "success": true,
                "data": {"workspace": {"id": "w1", "name": "Main", "is_default": true}}
            })))
            .mount(&server)
            .await;

        let client = create_api_client(&server.uri(), Some("tok"), Some("org1"));
        let workspace = default_workspace(&client).await.data.unwrap();
        assert_eq!(workspace.id, "w1");
        assert!(workspace.is_default);
    }

    #[tokio::test]
    async fn update_puts_request_body() {
        if !can_bind_localhost() {
            eprintln!("Skipping test: cannot bind localhost");
            return;
        }
        let server = MockServer::start().await;
        Mock::given(method("PUT"))
            .and(path("/v1/workspaces/w1"))
            .and(body_json(json!({"name": "Renamed"})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": "w1", "name": "Renamed"})))
            .mount(&server)
            .await;

        let client = create_api_client(&server.uri(), Some("tok"), Some("org1"));
        let request = WorkspaceRequest {
            name: "Renamed".to_string(),
            description: None,
            team_id: None,
        };
        let workspace = update_workspace(&client, "w1", &request).await.data.unwrap();
        assert_eq!(workspace.name, "Renamed");
        assert!(!workspace.is_default);
    }
}
