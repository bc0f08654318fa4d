//! Fetch-on-start resources with manual refetch.
//!
//! A [`ResourceController`] owns one [`Query`] and the last result it
//! produced. Parameters are replaced explicitly with
//! [`ResourceController::set_query`], which reloads with the new value.
//! Observers subscribe to state changes through a `watch` channel.

use crate::api::{ApiClient, ApiError, ApiResponse};
use crate::features::{
    teams::{client as teams, types::TeamList},
    users::{
        client as users,
        types::{InviteList, MemberList},
    },
    workspaces::{client as workspaces, types::WorkspaceList},
};
use serde::Serialize;
use std::future::Future;
use tokio::sync::watch;
use tracing::{debug, info_span, warn, Instrument};

/// A parameterized read against the gateway.
pub trait Query: Send + Sync {
    type Output: Clone + Send + Sync + 'static;

    /// Short name used in log spans.
    fn name(&self) -> &'static str;

    fn fetch(&self, client: &ApiClient) -> impl Future<Output = ApiResponse<Self::Output>> + Send;
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourceState<T> {
    pub data: Option<T>,
    pub is_loading: bool,
    pub error: Option<ApiError>,
}

impl<T> Default for ResourceState<T> {
    fn default() -> Self {
        Self {
            data: None,
            is_loading: false,
            error: None,
        }
    }
}

pub struct ResourceController<Q: Query> {
    client: ApiClient,
    query: Q,
    state: watch::Sender<ResourceState<Q::Output>>,
}

impl<Q: Query> ResourceController<Q> {
    /// Creates the controller without fetching.
    pub fn new(client: ApiClient, query: Q) -> Self {
        let (state, _) = watch::channel(ResourceState::default());
        Self {
            client,
            query,
            state,
        }
    }

    /// Creates the controller and runs the first load.
    pub async fn start(client: ApiClient, query: Q) -> Self {
        let controller = Self::new(client, query);
        controller.load().await;
        controller
    }

    /// Fetches with the loading flag raised for the duration of the call.
    pub async fn load(&self) -> ResourceState<Q::Output> {
        self.state.send_modify(|state| state.is_loading = true);
        self.fetch().await
    }

    /// Fetches again without raising the loading flag.
    pub async fn refetch(&self) -> ResourceState<Q::Output> {
        self.fetch().await
    }

    /// Replaces the query parameters and reloads.
    pub async fn set_query(&mut self, query: Q) -> ResourceState<Q::Output> {
        self.query = query;
        self.load().await
    }

    #[must_use]
    pub fn query(&self) -> &Q {
        &self.query
    }

    #[must_use]
    pub fn state(&self) -> ResourceState<Q::Output> {
        self.state.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<ResourceState<Q::Output>> {
        self.state.subscribe()
    }

    async fn fetch(&self) -> ResourceState<Q::Output> {
        let span = info_span!("resource.fetch", resource = self.query.name());
        let response = self.query.fetch(&self.client).instrument(span).await;

        self.state.send_modify(|state| {
            state.is_loading = false;
            match response.into_result() {
                Ok(data) => {
                    debug!(resource = self.query.name(), "resource loaded");
                    state.data = data;
                    state.error = None;
                }
                // Last good data stays visible next to the error.
                Err(error) => {
                    warn!(resource = self.query.name(), code = %error.code, "resource fetch failed: {}", error.message);
                    state.error = Some(error);
                }
            }
        });
        self.state()
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum TeamsQuery {
    #[default]
    All,
    Mine,
}

impl Query for TeamsQuery {
    type Output = TeamList;

    fn name(&self) -> &'static str {
        match self {
            Self::All => "teams",
            Self::Mine => "teams.mine",
        }
    }

    async fn fetch(&self, client: &ApiClient) -> ApiResponse<TeamList> {
        match self {
            Self::All => teams::list_teams(client).await,
            Self::Mine => teams::my_teams(client).await,
        }
    }
}

#[derive(Clone, Copy, Debug, Default)]
pub struct WorkspacesQuery;

impl Query for WorkspacesQuery {
    type Output = WorkspaceList;

    fn name(&self) -> &'static str {
        "workspaces"
    }

    async fn fetch(&self, client: &ApiClient) -> ApiResponse<WorkspaceList> {
        workspaces::list_workspaces(client).await
    }
}

#[derive(Clone, Copy, Debug, Default)]
pub struct MembersQuery;

impl Query for MembersQuery {
    type Output = MemberList;

    fn name(&self) -> &'static str {
        "members"
    }

    async fn fetch(&self, client: &ApiClient) -> ApiResponse<MemberList> {
        users::list_members(client).await
    }
}

#[derive(Clone, Copy, Debug, Default)]
pub struct InvitesQuery;

impl Query for InvitesQuery {
    type Output = InviteList;

    fn name(&self) -> &'static str {
        "invites"
    }

    async fn fetch(&self, client: &ApiClient) -> ApiResponse<InviteList> {
        users::list_invites(client).await
    }
}
