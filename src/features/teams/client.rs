//! Client wrappers for team endpoints.

use crate::api::{ApiClient, ApiResponse, NoContent};
use crate::config::path_segment;
use crate::features::teams::types::{AddTeamMemberRequest, CreateTeamRequest, Team, TeamList};

/// Lists every team in the current organization.
pub async fn list_teams(client: &ApiClient) -> ApiResponse<TeamList> {
    client.get("/v1/teams").await
}

/// Lists the teams the signed-in user belongs to.
pub async fn my_teams(client: &ApiClient) -> ApiResponse<TeamList> {
    client.get("/v1/teams/my").await
}

pub async fn create_team(client: &ApiClient, request: &CreateTeamRequest) -> ApiResponse<Team> {
    client.post("/v1/teams", request).await
}

pub async fn delete_team(client: &ApiClient, team_id: &str) -> ApiResponse<NoContent> {
    let team_id = path_segment(team_id);
    client.delete(&format!("/v1/teams/{team_id}")).await
}

pub async fn add_member(
    client: &ApiClient,
    team_id: &str,
    request: &AddTeamMemberRequest,
) -> ApiResponse<NoContent> {
    let team_id = path_segment(team_id);
    client
        .post(&format!("/v1/teams/{team_id}/members"), request)
        .await
}

pub async fn remove_member(client: &ApiClient, team_id: &str, user_id: &str) -> ApiResponse<NoContent> {
    let (team_id, user_id) = (path_segment(team_id), path_segment(user_id));
    client
        .delete(&format!("/v1/teams/{team_id}/members/{user_id}"))
        .await
}
