//! Generic integration-status poller.
//!
//! A poller owns one tokio task that fetches a status resource, maps the raw
//! payload into a view model and keeps refetching on a fixed interval while
//! the view is pending. Once the status is anything else the task only wakes
//! up for explicit commands (refetch, new credentials, stop), so an idle but
//! connected integration costs no requests.
//!
//! Flow Overview:
//! - `StatusPoller::spawn` starts the task and returns a [`PollerHandle`].
//! - The first fetch runs as soon as a token is available and is the only one
//!   that raises `is_loading` on its own.
//! - An error whose `details.configured` is `false` maps to the mapper's
//!   "not configured" view instead of an error.
//! - Dropping the handle aborts the task.

use crate::api::{
    envelope::INVALID_RESPONSE, ApiClient, ApiError, ApiResponse, ClientOptions,
};
use reqwest::Client;
use secrecy::{ExposeSecret, SecretString};
use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;
use std::{future::Future, time::Duration};
use tokio::{
    sync::{mpsc, oneshot, watch},
    task::JoinHandle,
    time::sleep,
};
use tracing::{debug, warn};

pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(5_000);

/// Session credentials passed explicitly into pollers and controllers.
#[derive(Clone, Debug, Default)]
pub struct Credentials {
    pub token: Option<SecretString>,
    pub org_id: Option<String>,
    pub dev_login_key: Option<SecretString>,
}

impl Credentials {
    pub fn new(token: Option<&str>, org_id: Option<&str>) -> Self {
        Self {
            token: token.map(|token| SecretString::from(token.to_string())),
            org_id: org_id.map(str::to_string),
            dev_login_key: None,
        }
    }

    #[must_use]
    pub fn with_dev_login_key(mut self, key: Option<SecretString>) -> Self {
        self.dev_login_key = key;
        self
    }

    #[must_use]
    pub fn has_token(&self) -> bool {
        self.token
            .as_ref()
            .is_some_and(|token| !token.expose_secret().is_empty())
    }

    #[must_use]
    pub fn client_options(&self) -> ClientOptions {
        ClientOptions {
            token: self.token.clone(),
            org_id: self.org_id.clone(),
            dev_login_key: self.dev_login_key.clone(),
            custom_headers: Vec::new(),
        }
    }
}

/// Where a poller reads raw status payloads from.
pub trait StatusSource: Send + Sync + 'static {
    fn fetch(&self, credentials: &Credentials) -> impl Future<Output = ApiResponse<Value>> + Send;
}

/// Reads a status resource from the gateway with a client built per fetch
/// from the current credentials.
#[derive(Clone, Debug)]
pub struct HttpStatusSource {
    http: Client,
    base_url: String,
    path: String,
}

impl HttpStatusSource {
    pub fn new(http: Client, base_url: &str, path: &str) -> Self {
        Self {
            http,
            base_url: base_url.to_string(),
            path: path.to_string(),
        }
    }
}

impl StatusSource for HttpStatusSource {
    fn fetch(&self, credentials: &Credentials) -> impl Future<Output = ApiResponse<Value>> + Send {
        let client = ApiClient::with_http(
            self.http.clone(),
            &self.base_url,
            credentials.client_options(),
        );
        let path = self.path.clone();
        async move { client.get::<Value>(&path).await }
    }
}

/// Maps a provider's wire payload into its view model.
pub trait StatusMapper: Send + Sync + 'static {
    type Raw: DeserializeOwned + Send;
    type View: Clone + Send + Sync + 'static;

    fn map(&self, raw: Self::Raw) -> Self::View;

    fn is_pending(&self, view: &Self::View) -> bool;

    /// View used when the integration was never configured.
    fn not_configured(&self) -> Self::View;
}

#[derive(Clone, Copy, Debug)]
pub struct PollOptions {
    pub interval: Duration,
}

impl Default for PollOptions {
    fn default() -> Self {
        Self {
            interval: DEFAULT_POLL_INTERVAL,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusSnapshot<V> {
    pub data: Option<V>,
    pub is_loading: bool,
    pub error: Option<ApiError>,
}

impl<V> Default for StatusSnapshot<V> {
    fn default() -> Self {
        Self {
            data: None,
            is_loading: false,
            error: None,
        }
    }
}

enum Command {
    Refetch {
        show_loading: bool,
        done: oneshot::Sender<()>,
    },
    Credentials(Credentials),
}

pub struct StatusPoller;

impl StatusPoller {
    /// Starts polling. Must be called inside a tokio runtime.
    pub fn spawn<S, M>(
        source: S,
        mapper: M,
        credentials: Credentials,
        options: PollOptions,
    ) -> PollerHandle<M::View>
    where
        S: StatusSource,
        M: StatusMapper,
    {
        let initial = StatusSnapshot {
            is_loading: credentials.has_token(),
            ..StatusSnapshot::default()
        };
        let (state_tx, state_rx) = watch::channel(initial);
        let (command_tx, command_rx) = mpsc::unbounded_channel();

        let worker = Worker {
            source,
            mapper,
            credentials,
            state: state_tx,
        };
        let task = tokio::spawn(worker.run(options.interval, command_rx));

        PollerHandle {
            state: state_rx,
            commands: command_tx,
            task,
        }
    }
}

/// Owner of a running poller. Dropping it stops the poller.
pub struct PollerHandle<V> {
    state: watch::Receiver<StatusSnapshot<V>>,
    commands: mpsc::UnboundedSender<Command>,
    task: JoinHandle<()>,
}

impl<V: Clone> PollerHandle<V> {
    #[must_use]
    pub fn snapshot(&self) -> StatusSnapshot<V> {
        self.state.borrow().clone()
    }

    /// Refetches now and returns the resulting snapshot. The loading flag is
    /// only raised when `show_loading` is set.
    pub async fn refetch(&self, show_loading: bool) -> StatusSnapshot<V> {
        let (done, wait) = oneshot::channel();
        if self
            .commands
            .send(Command::Refetch { show_loading, done })
            .is_ok()
        {
            let _ = wait.await;
        }
        self.snapshot()
    }

    /// Replaces the session credentials. A token appearing for the first
    /// time triggers the initial fetch.
    pub fn set_credentials(&self, credentials: Credentials) {
        if self.commands.send(Command::Credentials(credentials)).is_err() {
            debug!("poller already stopped; credentials ignored");
        }
    }

    /// Waits for the next snapshot. Returns `None` once the poller is gone.
    pub async fn changed(&mut self) -> Option<StatusSnapshot<V>> {
        self.state.changed().await.ok()?;
        Some(self.state.borrow_and_update().clone())
    }

    /// Waits until a snapshot satisfies `predicate`.
    pub async fn wait_for(
        &mut self,
        mut predicate: impl FnMut(&StatusSnapshot<V>) -> bool,
    ) -> Option<StatusSnapshot<V>> {
        self.state
            .wait_for(|snapshot| predicate(snapshot))
            .await
            .ok()
            .map(|snapshot| snapshot.clone())
    }

    #[must_use]
    pub fn is_running(&self) -> bool {
        !self.task.is_finished()
    }

    /// Stops polling and returns the last snapshot.
    pub fn stop(self) -> StatusSnapshot<V> {
        self.task.abort();
        self.snapshot()
    }
}

impl<V> Drop for PollerHandle<V> {
    fn drop(&mut self) {
        self.task.abort();
    }
}

struct Worker<S, M: StatusMapper> {
    source: S,
    mapper: M,
    credentials: Credentials,
    state: watch::Sender<StatusSnapshot<M::View>>,
}

impl<S: StatusSource, M: StatusMapper> Worker<S, M> {
    async fn run(mut self, interval: Duration, mut commands: mpsc::UnboundedReceiver<Command>) {
        if self.credentials.has_token() {
            self.fetch(true).await;
        }

        loop {
            let command = if self.is_pending() {
                tokio::select! {
                    () = sleep(interval) => {
                        debug!("status pending, polling again");
                        self.fetch(false).await;
                        continue;
                    }
                    command = commands.recv() => command,
                }
            } else {
                commands.recv().await
            };

            match command {
                Some(Command::Refetch { show_loading, done }) => {
                    self.fetch(show_loading).await;
                    let _ = done.send(());
                }
                Some(Command::Credentials(next)) => {
                    let had_token = self.credentials.has_token();
                    self.credentials = next;
                    if !had_token && self.credentials.has_token() {
                        self.fetch(true).await;
                    }
                }
                None => break,
            }
        }
        debug!("status poller stopped");
    }

    fn is_pending(&self) -> bool {
        self.state
            .borrow()
            .data
            .as_ref()
            .is_some_and(|view| self.mapper.is_pending(view))
    }

    async fn fetch(&mut self, show_loading: bool) {
        if !self.credentials.has_token() {
            self.set_loading(false);
            return;
        }
        if show_loading {
            self.set_loading(true);
        }

        let response = self.source.fetch(&self.credentials).await;
        let outcome = self.interpret(response);

        self.state.send_modify(|snapshot| {
            snapshot.is_loading = false;
            match outcome {
                Ok(view) => {
                    snapshot.data = Some(view);
                    snapshot.error = None;
                }
                Err(error) => snapshot.error = Some(error),
            }
        });
    }

    // Only notifies watchers when the flag actually flips.
    fn set_loading(&self, loading: bool) {
        self.state.send_if_modified(|snapshot| {
            let changed = snapshot.is_loading != loading;
            snapshot.is_loading = loading;
            changed
        });
    }

    fn interpret(&self, response: ApiResponse<Value>) -> Result<M::View, ApiError> {
        if !response.success {
            let error = response
                .error
                .unwrap_or_else(|| ApiError::new(INVALID_RESPONSE, "Status request failed."));
            if error.is_not_configured() {
                debug!("integration not configured");
                return Ok(self.mapper.not_configured());
            }
            warn!("status request failed: {error}");
            return Err(error);
        }

        match response.decode::<M::Raw>().into_result()? {
            Some(raw) => Ok(self.mapper.map(raw)),
            None => Err(ApiError::new(INVALID_RESPONSE, "Status response had no data.")),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use serde::Deserialize;
    use serde_json::json;
    use std::{
        collections::VecDeque,
        sync::{
            atomic::{AtomicUsize, Ordering},
            Arc, Mutex,
        },
    };

    #[derive(Clone, Default)]
    struct ScriptedSource {
        responses: Arc<Mutex<VecDeque<ApiResponse<Value>>>>,
        calls: Arc<AtomicUsize>,
    }

    impl ScriptedSource {
        fn new(responses: Vec<ApiResponse<Value>>) -> Self {
            Self {
                responses: Arc::new(Mutex::new(responses.into())),
                calls: Arc::new(AtomicUsize::new(0)),
            }
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    impl StatusSource for ScriptedSource {
        fn fetch(&self, _: &Credentials) -> impl Future<Output = ApiResponse<Value>> + Send {
            self.calls.fetch_add(1, Ordering::SeqCst);
            let mut responses = self.responses.lock().unwrap();
            // The last scripted response repeats forever.
            let response = if responses.len() > 1 {
                responses.pop_front().unwrap()
            } else {
                responses.front().cloned().unwrap()
            };
            async move { response }
        }
    }

    #[derive(Deserialize)]
    struct RawStatus {
        status: String,
    }

    struct TestMapper;

    impl StatusMapper for TestMapper {
        type Raw = RawStatus;
        type View = String;

        fn map(&self, raw: RawStatus) -> String {
            raw.status
        }

        fn is_pending(&self, view: &String) -> bool {
            view == "pending"
        }

        fn not_configured(&self) -> String {
            "disconnected".to_string()
        }
    }

    fn status(value: &str) -> ApiResponse<Value> {
        ApiResponse::ok(json!({ "status": value }))
    }

    fn signed_in() -> Credentials {
        Credentials::new(Some("tok"), Some("org1"))
    }

    #[tokio::test(start_paused = true)]
    async fn polls_while_pending_and_stops_on_terminal_status() {
        let source = ScriptedSource::new(vec![
            status("pending"),
            status("pending"),
            status("connected"),
        ]);
        let mut handle =
            StatusPoller::spawn(source.clone(), TestMapper, signed_in(), PollOptions::default());

        let snapshot = handle
            .wait_for(|s| s.data.as_deref() == Some("connected"))
            .await
            .unwrap();
        assert!(!snapshot.is_loading);
        assert_eq!(source.calls(), 3);

        sleep(DEFAULT_POLL_INTERVAL * 6).await;
        assert_eq!(source.calls(), 3);
        assert!(handle.is_running());
    }

    #[tokio::test(start_paused = true)]
    async fn first_fetch_is_the_only_loading_one() {
        let source = ScriptedSource::new(vec![status("pending"), status("connected")]);
        let mut handle =
            StatusPoller::spawn(source.clone(), TestMapper, signed_in(), PollOptions::default());
        assert!(handle.snapshot().is_loading);

        let first = handle.changed().await.unwrap();
        assert!(!first.is_loading);
        assert_eq!(first.data.as_deref(), Some("pending"));

        let second = handle.changed().await.unwrap();
        assert!(!second.is_loading);
        assert_eq!(second.data.as_deref(), Some("connected"));
    }

    #[tokio::test(start_paused = true)]
    async fn not_configured_is_terminal_disconnected() {
        let error = ApiError::new("HTTP_404", "not configured").with_details(json!({
            "configured": false
        }));
        let source = ScriptedSource::new(vec![ApiResponse::failure(error)]);
        let mut handle =
            StatusPoller::spawn(source.clone(), TestMapper, signed_in(), PollOptions::default());

        let snapshot = handle.wait_for(|s| !s.is_loading).await.unwrap();
        assert_eq!(snapshot.data.as_deref(), Some("disconnected"));
        assert!(snapshot.error.is_none());

        sleep(DEFAULT_POLL_INTERVAL * 4).await;
        assert_eq!(source.calls(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn failures_surface_as_errors() {
        let source = ScriptedSource::new(vec![ApiResponse::failure(ApiError::new(
            "HTTP_500",
            "health check failed",
        ))]);
        let mut handle =
            StatusPoller::spawn(source.clone(), TestMapper, signed_in(), PollOptions::default());

        let snapshot = handle.wait_for(|s| !s.is_loading).await.unwrap();
        assert!(snapshot.data.is_none());
        assert_eq!(snapshot.error.unwrap().code, "HTTP_500");
    }

    #[tokio::test(start_paused = true)]
    async fn waits_for_token_before_first_fetch() {
        let source = ScriptedSource::new(vec![status("connected")]);
        let mut handle = StatusPoller::spawn(
            source.clone(),
            TestMapper,
            Credentials::default(),
            PollOptions::default(),
        );
        assert!(!handle.snapshot().is_loading);

        sleep(DEFAULT_POLL_INTERVAL * 2).await;
        assert_eq!(source.calls(), 0);

        handle.set_credentials(signed_in());
        let snapshot = handle
            .wait_for(|s| s.data.is_some() && !s.is_loading)
            .await
            .unwrap();
        assert_eq!(snapshot.data.as_deref(), Some("connected"));
        assert_eq!(source.calls(), 1);

        // Replacing an existing token does not trigger another fetch.
        handle.set_credentials(Credentials::new(Some("tok2"), None));
        sleep(DEFAULT_POLL_INTERVAL).await;
        assert_eq!(source.calls(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn refetch_runs_once_on_demand() {
        let source = ScriptedSource::new(vec![status("disconnected"), status("pending"), status("connected")]);
        let mut handle =
            StatusPoller::spawn(source.clone(), TestMapper, signed_in(), PollOptions::default());
        handle.wait_for(|s| !s.is_loading).await.unwrap();
        assert_eq!(source.calls(), 1);

        // A connect action moved the integration into pending; polling resumes.
        let snapshot = handle.refetch(false).await;
        assert_eq!(snapshot.data.as_deref(), Some("pending"));
        assert!(!snapshot.is_loading);

        let snapshot = handle
            .wait_for(|s| s.data.as_deref() == Some("connected"))
            .await
            .unwrap();
        assert!(snapshot.error.is_none());
        assert_eq!(source.calls(), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn stop_ends_the_task() {
        let source = ScriptedSource::new(vec![status("pending")]);
        let mut handle =
            StatusPoller::spawn(source.clone(), TestMapper, signed_in(), PollOptions::default());
        handle.wait_for(|s| !s.is_loading).await.unwrap();

        let last = handle.stop();
        assert_eq!(last.data.as_deref(), Some("pending"));
        let calls = source.calls();

        sleep(DEFAULT_POLL_INTERVAL * 3).await;
        assert_eq!(source.calls(), calls);
    }
}
