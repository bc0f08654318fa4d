//! One-shot reads of organization resources, printed as JSON.

use crate::api::ApiResponse;
use crate::cli::{actions::print_json, globals::GlobalArgs};
use crate::features::{api_keys, enrichments, users};
use crate::resource::{
    InvitesQuery, MembersQuery, Query, ResourceController, ResourceState, TeamsQuery, WorkspacesQuery,
};
use anyhow::{bail, Result};
use serde::Serialize;
use tracing::info;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Resource {
    Teams { mine: bool },
    Workspaces,
    Members,
    Invites,
    Me,
    Stats,
    ApiKeys,
}

#[derive(Debug)]
pub struct Args {
    pub globals: GlobalArgs,
    pub resource: Resource,
}

/// # Errors
/// Returns an error when the gateway answers with a failure envelope.
pub async fn execute(args: Args) -> Result<()> {
    let Args { globals, resource } = args;
    info!(?resource, api = %globals.config.api_base_url, "fetching resource");

    match resource {
        Resource::Teams { mine } => {
            let query = if mine { TeamsQuery::Mine } else { TeamsQuery::All };
            load(&globals, query).await
        }
        Resource::Workspaces => load(&globals, WorkspacesQuery).await,
        Resource::Members => load(&globals, MembersQuery).await,
        Resource::Invites => load(&globals, InvitesQuery).await,
        Resource::Me => report_envelope(users::client::fetch_me(&globals.gateway_client()).await),
        Resource::Stats => {
            report_envelope(enrichments::client::fetch_stats(&globals.gateway_client()).await)
        }
        Resource::ApiKeys => {
            report_envelope(api_keys::client::list_api_keys(&globals.portal_client()).await)
        }
    }
}

async fn load<Q>(globals: &GlobalArgs, query: Q) -> Result<()>
where
    Q: Query,
    Q::Output: Serialize,
{
    let controller = ResourceController::start(globals.gateway_client(), query).await;
    report_state(&controller.state())
}

fn report_state<T: Serialize>(state: &ResourceState<T>) -> Result<()> {
    print_json(state)?;
    if let Some(error) = &state.error {
        bail!("{error}");
    }
    Ok(())
}

fn report_envelope<T: Serialize>(response: ApiResponse<T>) -> Result<()> {
    print_json(&response)?;
    if let Some(error) = response.error {
        bail!("{error}");
    }
    Ok(())
}
