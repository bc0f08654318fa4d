//! Prints an integration's connection status, optionally following it
//! until it leaves `pending`.

use crate::api::http_client;
use crate::cli::{actions::print_json, globals::GlobalArgs};
use crate::integrations::{
    self, dynamics::Dynamics, hubspot::HubSpot, linkedin::LinkedIn, salesforce::Salesforce,
    Integration, Provider,
};
use crate::polling::{PollOptions, StatusMapper};
use anyhow::{bail, Context, Result};
use serde::Serialize;
use std::time::Duration;
use tracing::{debug, info};

#[derive(Debug)]
pub struct Args {
    pub globals: GlobalArgs,
    pub provider: Provider,
    pub watch: bool,
    pub interval: Duration,
}

/// # Errors
/// Returns an error without a token, or when the last fetch failed.
pub async fn execute(args: Args) -> Result<()> {
    match args.provider {
        Provider::LinkedIn => follow::<LinkedIn>(args).await,
        Provider::HubSpot => follow::<HubSpot>(args).await,
        Provider::Salesforce => follow::<Salesforce>(args).await,
        Provider::Dynamics => follow::<Dynamics>(args).await,
    }
}

async fn follow<I>(args: Args) -> Result<()>
where
    I: Integration,
    I::View: Serialize,
{
    let credentials = args.globals.credentials();
    if !credentials.has_token() {
        bail!("a token is required to read integration status (--token or PORTAL_TOKEN)");
    }

    info!(provider = %I::PROVIDER, watch = args.watch, "reading integration status");
    let mut handle = integrations::watch::<I>(
        http_client(),
        &args.globals.config.api_base_url,
        credentials,
        PollOptions {
            interval: args.interval,
        },
    );

    let mapper = I::default();
    let mut snapshot = handle
        .wait_for(|snapshot| !snapshot.is_loading)
        .await
        .context("status poller stopped before the first fetch")?;

    if args.watch {
        while snapshot
            .data
            .as_ref()
            .is_some_and(|view| mapper.is_pending(view))
        {
            print_json(&snapshot)?;
            debug!("still pending, waiting for the next poll");
            snapshot = handle
                .changed()
                .await
                .context("status poller stopped while pending")?;
        }
    }

    handle.stop();
    print_json(&snapshot)?;
    if let Some(error) = &snapshot.error {
        bail!("{error}");
    }
    Ok(())
}
