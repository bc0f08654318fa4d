//! Runs the LinkedIn live-session connect flow from the terminal.
//!
//! Every view change is printed as one JSON document. The live view URL is
//! meant to be opened in a browser to complete the login. Ctrl-C closes the
//! flow, except while the session request is still in flight. Once the login
//! is connected Ctrl-C only skips the remaining close delay.

use crate::cli::{actions::print_json, globals::GlobalArgs};
use crate::integrations::linkedin::connect::{ConnectModal, ConnectOptions, ConnectState, ConnectView};
use anyhow::{bail, Result};
use std::{
    sync::{
        atomic::{AtomicBool, Ordering},
        Arc,
    },
    time::Duration,
};
use tokio::signal;
use tracing::{info, warn};

#[derive(Debug)]
pub struct Args {
    pub globals: GlobalArgs,
    pub poll_interval: Duration,
}

enum Event {
    View(Option<ConnectView>),
    Interrupted,
}

/// # Errors
/// Returns an error if the flow ends in the error state or is cancelled.
pub async fn execute(args: Args) -> Result<()> {
    if args.globals.token.is_none() {
        bail!("a token is required to connect LinkedIn (--token or PORTAL_TOKEN)");
    }

    let api = Arc::new(args.globals.gateway_client());
    let options = ConnectOptions {
        poll_interval: args.poll_interval,
        ..ConnectOptions::default()
    };
    let connected = Arc::new(AtomicBool::new(false));
    let flag = Arc::clone(&connected);
    let mut modal = ConnectModal::new(api, options, move || flag.store(true, Ordering::SeqCst));

    info!(api = %args.globals.config.api_base_url, "starting LinkedIn live session");
    print_json(&modal.open().view())?;

    loop {
        let event = {
            let Some(flow) = modal.flow_mut() else {
                break;
            };
            tokio::select! {
                view = flow.changed() => Event::View(view),
                _ = signal::ctrl_c() => Event::Interrupted,
            }
        };

        match event {
            Event::View(Some(view)) => print_json(&view)?,
            Event::View(None) => break,
            // Login already succeeded; only the close delay is cut short.
            Event::Interrupted if is_connected(modal.view().as_ref()) => break,
            Event::Interrupted => match modal.close() {
                Ok(()) => bail!("LinkedIn connect cancelled"),
                Err(err) => warn!("{err}"),
            },
        }
    }

    let last = modal.view();
    modal.close()?;

    outcome(connected.load(Ordering::SeqCst), last)
}

fn is_connected(view: Option<&ConnectView>) -> bool {
    view.is_some_and(|view| view.state == ConnectState::Connected)
}

fn outcome(callback_fired: bool, last: Option<ConnectView>) -> Result<()> {
    if callback_fired || is_connected(last.as_ref()) {
        return Ok(());
    }
    match last.map(|view| view.state) {
        Some(ConnectState::Error { message }) => bail!(message),
        _ => bail!("LinkedIn connect ended before the login completed"),
    }
}
