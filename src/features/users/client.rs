//! Client wrappers for user, member and invite endpoints.
//!
//! Member and invite routes live outside the `/v1` prefix on the gateway.

use crate::api::{ApiClient, ApiResponse, NoContent};
use crate::config::path_segment;
use crate::features::users::types::{
    CreateInviteRequest, Invite, InviteList, MemberList, UserPayload, UserProfile,
};

/// Fetch the signed-in user's profile.
pub async fn fetch_me(client: &ApiClient) -> ApiResponse<UserProfile> {
    client
        .get::<UserPayload>("/v1/users/me")
        .await
        .map(UserPayload::into_profile)
}

pub async fn list_members(client: &ApiClient) -> ApiResponse<MemberList> {
    client.get("/users/members").await
}

pub async fn list_invites(client: &ApiClient) -> ApiResponse<InviteList> {
    client.get("/users/invites").await
}

pub async fn create_invite(client: &ApiClient, request: &CreateInviteRequest) -> ApiResponse<Invite> {
    client.post("/users/invites", request).await
}

/// Revoke a pending invite.
pub async fn revoke_invite(client: &ApiClient, invite_id: &str) -> ApiResponse<NoContent> {
    let invite_id = path_segment(invite_id);
    client.delete(&format!("/users/invites/{invite_id}")).await
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::api::create_api_client;
    use serde_json::json;
    use std::net::TcpListener;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn can_bind_localhost() -> bool {
        TcpListener::bind("127.0.0.1:0").is_ok()
    }

    #[tokio::test]
    async fn me_unwraps_user_key() {
        if !can_bind_localhost() {
            eprintln!("Skipping test: cannot bind localhost");
            return;
        }
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v1/users/me"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "user": {"id": "u1", "email": "dana@example.com", "two_factor_enabled": true}
            })))
            .mount(&server)
            .await;

        let client = create_api_client(&server.uri(), Some("tok"), None);
        let me = fetch_me(&client).await.data.unwrap();
        assert_eq!(me.email, "dana@example.com");
        assert!(me.two_factor_enabled);
    }

    #[tokio::test]
    async fn invites_use_unversioned_route() {
        if !can_bind_localhost() {
            eprintln!("Skipping test: cannot bind localhost");
            return;
        }
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/users/invites"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "invites": [{"id": "i1", "email": "new@example.com", "status": "pending"}]
            })))
            .mount(&server)
            .await;
        Mock::given(method("DELETE"))
            .and(path("/users/invites/i1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"success": true})))
            .mount(&server)
            .await;

        let client = create_api_client(&server.uri(), Some("tok"), Some("org1"));
        let invites = list_invites(&client).await.data.unwrap().invites;
        assert_eq!(invites[0].status.as_deref(), Some("pending"));
        assert!(revoke_invite(&client, "i1").await.success);
    }
}
