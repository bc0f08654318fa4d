//! Interactive LinkedIn connect flow.
//!
//! States: `initializing -> waiting -> detecting -> connected`, or `error`
//! from any state before `connected`.
//!
//! - `initializing`: asks the gateway for a live browser session. A conflict
//!   means another session is already open for the organization.
//! - `waiting`: the user logs in inside the live session while the status
//!   resource is polled. After [`SESSION_TIMEOUT`] the view is flagged as
//!   timed out so the UI can offer a manual refresh; polling continues and no
//!   new session is started automatically.
//! - `detecting`: login was seen, the profile is still being captured.
//! - `connected`: the success callback fires after [`SUCCESS_CLOSE_DELAY`].
//!
//! [`ConnectModal`] owns at most one running flow and refuses to close while
//! a session request is in flight.

use super::client::{self, InitializedSession};
use super::LinkedInStatus;
use crate::api::{ApiClient, ApiError, ApiResponse};
use crate::integrations::ConnectionStatus;
use serde::Serialize;
use std::{future::Future, sync::Arc, time::Duration};
use thiserror::Error;
use tokio::{
    sync::watch,
    task::JoinHandle,
    time::{interval_at, sleep, Instant, MissedTickBehavior},
};
use tracing::{debug, info, warn};

pub const SESSION_TIMEOUT: Duration = Duration::from_millis(60_000);
pub const SUCCESS_CLOSE_DELAY: Duration = Duration::from_millis(1_500);
pub const DEFAULT_LOGIN_POLL_INTERVAL: Duration = Duration::from_millis(3_000);
/// Live view location used when the gateway does not return one.
pub const DEFAULT_LIVE_VIEW_BASE: &str = "https://www.browserbase.com/sessions";

pub const SESSION_IN_PROGRESS: &str =
    "A LinkedIn session is already in progress for your organization. Please wait for it to finish before starting a new one.";
const CONNECTION_FAILED: &str = "LinkedIn connection failed.";

#[derive(Clone, Debug)]
pub struct ConnectOptions {
    pub poll_interval: Duration,
    pub session_timeout: Duration,
    pub success_close_delay: Duration,
    pub live_view_base: String,
}

impl Default for ConnectOptions {
    fn default() -> Self {
        Self {
            poll_interval: DEFAULT_LOGIN_POLL_INTERVAL,
            session_timeout: SESSION_TIMEOUT,
            success_close_delay: SUCCESS_CLOSE_DELAY,
            live_view_base: DEFAULT_LIVE_VIEW_BASE.to_string(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum ConnectState {
    Initializing,
    Waiting,
    Detecting,
    Connected,
    Error { message: String },
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LiveSession {
    pub session_id: String,
    pub live_view_url: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConnectView {
    #[serde(flatten)]
    pub state: ConnectState,
    pub session: Option<LiveSession>,
    pub is_timed_out: bool,
    pub profile_name: Option<String>,
}

impl Default for ConnectView {
    fn default() -> Self {
        Self {
            state: ConnectState::Initializing,
            session: None,
            is_timed_out: false,
            profile_name: None,
        }
    }
}

impl ConnectView {
    /// Applies the initialize response. Returns `true` when a session is live.
    pub fn apply_initialize(
        &mut self,
        response: ApiResponse<InitializedSession>,
        live_view_base: &str,
    ) -> bool {
        match response.into_result() {
            Ok(Some(session)) => {
                let live_view_url = live_view_url(&session, live_view_base);
                self.session = Some(LiveSession {
                    session_id: session.session_id,
                    live_view_url,
                });
                self.state = ConnectState::Waiting;
                true
            }
            Ok(None) => {
                self.state = ConnectState::Error {
                    message: "The live session could not be started.".to_string(),
                };
                false
            }
            Err(error) => {
                self.state = ConnectState::Error {
                    message: initialize_error_message(&error),
                };
                false
            }
        }
    }

    /// Applies one login-status poll. Failed polls leave the state unchanged.
    pub fn apply_poll(&mut self, response: ApiResponse<LinkedInStatus>) {
        if !matches!(self.state, ConnectState::Waiting | ConnectState::Detecting) {
            return;
        }

        let status = match response.into_result() {
            Ok(Some(status)) => status,
            Ok(None) => return,
            Err(error) => {
                debug!("login status poll failed: {error}");
                return;
            }
        };

        match status.status() {
            ConnectionStatus::Connected if status.is_complete => {
                self.profile_name = status.profile_name;
                self.state = ConnectState::Connected;
            }
            ConnectionStatus::Connected => self.state = ConnectState::Detecting,
            ConnectionStatus::Error => {
                self.state = ConnectState::Error {
                    message: status
                        .error_message
                        .unwrap_or_else(|| CONNECTION_FAILED.to_string()),
                };
            }
            ConnectionStatus::Pending | ConnectionStatus::Disconnected => {}
        }
    }

    pub fn mark_timed_out(&mut self) {
        if matches!(self.state, ConnectState::Waiting | ConnectState::Detecting) {
            self.is_timed_out = true;
        }
    }

    #[must_use]
    pub fn can_close(&self) -> bool {
        self.state != ConnectState::Initializing
    }

    #[must_use]
    pub fn is_finished(&self) -> bool {
        matches!(self.state, ConnectState::Connected | ConnectState::Error { .. })
    }
}

/// User-facing message for a failed initialize call.
#[must_use]
pub fn initialize_error_message(error: &ApiError) -> String {
    if !error.is_conflict() {
        return error.message.clone();
    }
    match error
        .detail_u64("canRetryAfter")
        .or_else(|| error.detail_u64("can_retry_after"))
    {
        Some(minutes) => format!(
            "A LinkedIn session is already in progress for your organization. Please try again in {minutes} minute(s)."
        ),
        None => SESSION_IN_PROGRESS.to_string(),
    }
}

/// Live view URL from the response, or the conventional one for the session.
#[must_use]
pub fn live_view_url(session: &InitializedSession, live_view_base: &str) -> String {
    session
        .live_view_url
        .as_deref()
        .map(str::trim)
        .filter(|url| !url.is_empty())
        .map_or_else(
            || {
                format!(
                    "{}/{}/live",
                    live_view_base.trim_end_matches('/'),
                    session.session_id
                )
            },
            str::to_string,
        )
}

/// Gateway calls the connect flow depends on.
pub trait LiveSessionApi: Send + Sync + 'static {
    fn initialize(&self) -> impl Future<Output = ApiResponse<InitializedSession>> + Send;

    fn status(&self) -> impl Future<Output = ApiResponse<LinkedInStatus>> + Send;
}

impl LiveSessionApi for ApiClient {
    fn initialize(&self) -> impl Future<Output = ApiResponse<InitializedSession>> + Send {
        client::initialize_session(self)
    }

    fn status(&self) -> impl Future<Output = ApiResponse<LinkedInStatus>> + Send {
        client::session_status(self)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum CloseError {
    #[error("the live session is still initializing")]
    Initializing,
}

pub struct ConnectFlow;

impl ConnectFlow {
    /// Starts a flow. `on_success` runs once, after the success delay.
    pub fn start<A, F>(api: Arc<A>, options: ConnectOptions, on_success: F) -> ConnectHandle
    where
        A: LiveSessionApi,
        F: FnOnce() + Send + 'static,
    {
        let (state_tx, state_rx) = watch::channel(ConnectView::default());
        let task = tokio::spawn(drive(api, options, state_tx, on_success));
        ConnectHandle {
            state: state_rx,
            task,
        }
    }
}

pub struct ConnectHandle {
    state: watch::Receiver<ConnectView>,
    task: JoinHandle<()>,
}

impl ConnectHandle {
    #[must_use]
    pub fn view(&self) -> ConnectView {
        self.state.borrow().clone()
    }

    /// Waits for the next view. Returns `None` once the flow has ended.
    pub async fn changed(&mut self) -> Option<ConnectView> {
        self.state.changed().await.ok()?;
        Some(self.state.borrow_and_update().clone())
    }

    pub async fn wait_for(
        &mut self,
        mut predicate: impl FnMut(&ConnectView) -> bool,
    ) -> Option<ConnectView> {
        self.state
            .wait_for(|view| predicate(view))
            .await
            .ok()
            .map(|view| view.clone())
    }

    /// Resolves once the flow task has returned (success callback included).
    pub async fn finished(&mut self) {
        let _ = (&mut self.task).await;
    }
}

impl Drop for ConnectHandle {
    fn drop(&mut self) {
        self.task.abort();
    }
}

async fn drive<A, F>(
    api: Arc<A>,
    options: ConnectOptions,
    state: watch::Sender<ConnectView>,
    on_success: F,
) where
    A: LiveSessionApi,
    F: FnOnce() + Send + 'static,
{
    let response = api.initialize().await;
    let mut started = false;
    state.send_modify(|view| started = view.apply_initialize(response, &options.live_view_base));
    if !started {
        warn!("live session could not be started");
        return;
    }
    info!("live session started, waiting for login");

    let timeout = sleep(options.session_timeout);
    tokio::pin!(timeout);
    let mut timed_out = false;
    let mut ticks = interval_at(Instant::now() + options.poll_interval, options.poll_interval);
    ticks.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            () = &mut timeout, if !timed_out => {
                timed_out = true;
                info!("live session timed out waiting for login");
                state.send_modify(ConnectView::mark_timed_out);
            }
            _ = ticks.tick() => {
                let response = api.status().await;
                state.send_if_modified(|view| {
                    let before = view.clone();
                    view.apply_poll(response);
                    *view != before
                });
                let current = state.borrow().state.clone();
                match current {
                    ConnectState::Connected => break,
                    ConnectState::Error { message } => {
                        warn!("LinkedIn connection failed: {message}");
                        return;
                    }
                    _ => {}
                }
            }
        }
    }

    info!("LinkedIn connected");
    sleep(options.success_close_delay).await;
    on_success();
}

/// Owner of the connect flow behind the modal.
pub struct ConnectModal<A: LiveSessionApi> {
    api: Arc<A>,
    options: ConnectOptions,
    on_success: Arc<dyn Fn() + Send + Sync>,
    flow: Option<ConnectHandle>,
}

impl<A: LiveSessionApi> ConnectModal<A> {
    pub fn new(
        api: Arc<A>,
        options: ConnectOptions,
        on_success: impl Fn() + Send + Sync + 'static,
    ) -> Self {
        Self {
            api,
            options,
            on_success: Arc::new(on_success),
            flow: None,
        }
    }

    /// Opens the modal, starting a flow unless one is already running.
    pub fn open(&mut self) -> &mut ConnectHandle {
        let api = Arc::clone(&self.api);
        let options = self.options.clone();
        let on_success = Arc::clone(&self.on_success);
        self.flow
            .get_or_insert_with(|| ConnectFlow::start(api, options, move || on_success()))
    }

    #[must_use]
    pub fn is_open(&self) -> bool {
        self.flow.is_some()
    }

    #[must_use]
    pub fn view(&self) -> Option<ConnectView> {
        self.flow.as_ref().map(ConnectHandle::view)
    }

    pub fn flow_mut(&mut self) -> Option<&mut ConnectHandle> {
        self.flow.as_mut()
    }

    /// Closes the modal and discards all flow state.
    ///
    /// # Errors
    /// Returns `CloseError::Initializing` while the session request is in flight.
    pub fn close(&mut self) -> Result<(), CloseError> {
        if let Some(flow) = &self.flow {
            if !flow.view().can_close() {
                return Err(CloseError::Initializing);
            }
        }
        // Dropping the handle aborts the flow task.
        self.flow = None;
        Ok(())
    }

    /// Discards the current session and starts a new one.
    ///
    /// # Errors
    /// Returns `CloseError::Initializing` while the session request is in flight.
    pub fn refresh_session(&mut self) -> Result<&mut ConnectHandle, CloseError> {
        self.close()?;
        Ok(self.open())
    }
}
