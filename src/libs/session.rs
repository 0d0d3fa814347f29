//! Session controller: starts and stops tonight's session and clears history.
//!
//! The controller keeps one logical slot, `tonight`, holding the in-progress
//! night if there is one. State is published on a watch channel as a
//! [`TrackerState`]; the visibility flags and the summary are recomputed on
//! every change. Actions the front end must react to exactly once are queued
//! as [`TrackerEvent`]s and stay pending until acknowledged.
//!
//! ```rust,no_run
//! use sleeplog::db::nights::Nights;
//! use sleeplog::libs::clock::SystemClock;
//! use sleeplog::libs::session::SessionController;
//! use std::sync::Arc;
//! use tokio_util::sync::CancellationToken;
//!
//! # async fn demo() -> anyhow::Result<()> {
//! let nights = Nights::new()?;
//! let session = SessionController::new(nights, Arc::new(SystemClock), CancellationToken::new()).await?;
//! session.start().await?;
//! assert!(session.state().stop_visible);
//! # Ok(())
//! # }
//! ```

use crate::db::nights::Nights;
use crate::libs::clock::Clock;
use crate::libs::command::{request, Reply};
use crate::libs::error::{SleepError, SleepResult};
use crate::libs::formatter::format_nights;
use crate::libs::night::SleepNight;
use std::sync::Arc;
use tokio::sync::{mpsc, watch};
use tokio_util::sync::CancellationToken;

/// One-shot signals raised by the session controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrackerEvent {
    /// A session finished; the front end should ask for its rating.
    NavigateToQuality(i64),
    /// History was wiped; the front end should show a transient notice.
    HistoryCleared,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TrackerState {
    /// The in-progress night, if any.
    pub tonight: Option<SleepNight>,
    /// Every night, newest first.
    pub nights: Vec<SleepNight>,
    pub start_visible: bool,
    pub stop_visible: bool,
    pub clear_visible: bool,
    pub nights_summary: String,
    /// Unacknowledged signals, at most one of each kind.
    pub events: Vec<TrackerEvent>,
}

impl TrackerState {
    fn new(tonight: Option<SleepNight>, nights: Vec<SleepNight>) -> Self {
        let mut state = TrackerState {
            tonight: None,
            nights: Vec::new(),
            start_visible: true,
            stop_visible: false,
            clear_visible: false,
            nights_summary: String::new(),
            events: Vec::new(),
        };
        state.set_tonight(tonight);
        state.set_nights(nights);
        state
    }

    fn set_tonight(&mut self, tonight: Option<SleepNight>) {
        self.start_visible = tonight.is_none();
        self.stop_visible = tonight.is_some();
        self.tonight = tonight;
    }

    fn set_nights(&mut self, nights: Vec<SleepNight>) {
        self.clear_visible = !nights.is_empty();
        self.nights_summary = format_nights(&nights);
        self.nights = nights;
    }

    fn fire(&mut self, event: TrackerEvent) {
        self.events.retain(|pending| std::mem::discriminant(pending) != std::mem::discriminant(&event));
        self.events.push(event);
    }

    pub fn is_tracking(&self) -> bool {
        self.tonight.is_some()
    }

    /// Id of the finished night awaiting a rating, until acknowledged.
    pub fn navigate_to_quality(&self) -> Option<i64> {
        self.events.iter().find_map(|event| match event {
            TrackerEvent::NavigateToQuality(id) => Some(*id),
            _ => None,
        })
    }

    pub fn show_snackbar(&self) -> bool {
        self.events.contains(&TrackerEvent::HistoryCleared)
    }
}

enum Command {
    Start(Reply<()>),
    Stop(Reply<Option<i64>>),
    Clear(Reply<()>),
}

/// Handle to a running session worker.
///
/// Dropping the handle, calling [`shutdown`](Self::shutdown) or cancelling
/// the token passed to [`new`](Self::new) stops the worker. Commands still
/// queued or in flight then fail with [`SleepError::Cancelled`].
pub struct SessionController {
    commands: mpsc::UnboundedSender<Command>,
    state: Arc<watch::Sender<TrackerState>>,
    cancel: CancellationToken,
}

impl SessionController {
    /// Loads tonight from the store and spawns the command worker.
    pub async fn new(nights: Nights, clock: Arc<dyn Clock>, cancel: CancellationToken) -> SleepResult<Self> {
        let mut snapshots = nights.subscribe();
        let tonight = nights.io(load_tonight).await?;
        let all = snapshots.borrow_and_update().clone();

        let (state, _) = watch::channel(TrackerState::new(tonight, all));
        let state = Arc::new(state);
        let (commands, queue) = mpsc::unbounded_channel();
        let cancel = cancel.child_token();

        let worker = SessionWorker {
            nights,
            clock,
            state: state.clone(),
            snapshots,
        };
        tokio::spawn(worker.run(queue, cancel.clone()));

        Ok(SessionController { commands, state, cancel })
    }

    /// Begins a new session. Rejected while one is already in progress.
    pub async fn start(&self) -> SleepResult<()> {
        request(&self.commands, &self.cancel, Command::Start).await
    }

    /// Ends the in-progress session and returns its id.
    ///
    /// `Ok(None)` means the night disappeared from the store before it could
    /// be updated; the controller is back to idle and no signal fired.
    pub async fn stop(&self) -> SleepResult<Option<i64>> {
        request(&self.commands, &self.cancel, Command::Stop).await
    }

    /// Deletes every night.
    pub async fn clear(&self) -> SleepResult<()> {
        request(&self.commands, &self.cancel, Command::Clear).await
    }

    pub fn state(&self) -> TrackerState {
        self.state.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<TrackerState> {
        self.state.subscribe()
    }

    /// Acknowledges [`TrackerEvent::NavigateToQuality`].
    pub fn on_done_navigating(&self) {
        self.acknowledge(|event| matches!(event, TrackerEvent::NavigateToQuality(_)));
    }

    /// Acknowledges [`TrackerEvent::HistoryCleared`].
    pub fn on_done_showing_snackbar(&self) {
        self.acknowledge(|event| matches!(event, TrackerEvent::HistoryCleared));
    }

    fn acknowledge(&self, handled: impl Fn(&TrackerEvent) -> bool) {
        self.state.send_if_modified(|state| {
            let before = state.events.len();
            state.events.retain(|event| !handled(event));
            state.events.len() != before
        });
    }

    pub fn shutdown(&self) {
        self.cancel.cancel();
    }
}

impl Drop for SessionController {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}

struct SessionWorker {
    nights: Nights,
    clock: Arc<dyn Clock>,
    state: Arc<watch::Sender<TrackerState>>,
    snapshots: watch::Receiver<Vec<SleepNight>>,
}

impl SessionWorker {
    async fn run(mut self, mut queue: mpsc::UnboundedReceiver<Command>, cancel: CancellationToken) {
        loop {
            tokio::select! {
                biased;
                _ = cancel.cancelled() => break,
                command = queue.recv() => {
                    let Some(command) = command else { break };
                    tokio::select! {
                        biased;
                        _ = cancel.cancelled() => break,
                        _ = self.execute(command) => {}
                    }
                }
                changed = self.snapshots.changed() => {
                    if changed.is_err() {
                        break;
                    }
                    let nights = self.snapshots.borrow_and_update().clone();
                    self.state.send_modify(|state| state.set_nights(nights));
                }
            }
        }
        tracing::debug!("session worker stopped");
    }

    async fn execute(&mut self, command: Command) {
        match command {
            Command::Start(reply) => {
                let _ = reply.send(self.start().await);
            }
            Command::Stop(reply) => {
                let _ = reply.send(self.stop().await);
            }
            Command::Clear(reply) => {
                let _ = reply.send(self.clear().await);
            }
        }
    }

    async fn start(&mut self) -> SleepResult<()> {
        let night = SleepNight::new(self.clock.now_millis());
        let (started, tonight) = self
            .nights
            .io(move |nights| {
                let started = nights.insert_if_idle(&night)?.is_some();
                Ok((started, load_tonight(nights)?))
            })
            .await?;

        // Either way the slot now mirrors the store, including a night opened elsewhere.
        self.publish(|state| state.set_tonight(tonight.clone()));
        if !started {
            return Err(SleepError::InvalidState("a sleep session is already in progress"));
        }

        tracing::debug!(id = ?tonight.as_ref().and_then(|n| n.id), "session started");
        Ok(())
    }

    async fn stop(&mut self) -> SleepResult<Option<i64>> {
        let Some(mut night) = self.state.borrow().tonight.clone() else {
            return Err(SleepError::InvalidState("no sleep session is in progress"));
        };
        let id = night.id.ok_or(SleepError::InvalidState("night has not been saved"))?;

        // end == start marks a night in progress, so a finished night must end strictly later.
        night.end_time_milli = self.clock.now_millis().max(night.start_time_milli + 1);

        match self.nights.io(move |nights| nights.update(&night)).await {
            Ok(()) => {
                tracing::debug!(id, "session stopped");
                self.publish(|state| {
                    state.set_tonight(None);
                    state.fire(TrackerEvent::NavigateToQuality(id));
                });
                Ok(Some(id))
            }
            Err(SleepError::NotFound(_)) => {
                tracing::warn!(id, "in-progress night vanished before stop");
                self.publish(|state| state.set_tonight(None));
                Ok(None)
            }
            Err(e) => Err(e),
        }
    }

    async fn clear(&mut self) -> SleepResult<()> {
        self.nights.io(|nights| nights.clear()).await?;
        self.publish(|state| {
            state.set_tonight(None);
            state.fire(TrackerEvent::HistoryCleared);
        });
        Ok(())
    }

    /// Publishes `change` together with the latest history snapshot.
    fn publish(&mut self, change: impl FnOnce(&mut TrackerState)) {
        let nights = self.snapshots.borrow_and_update().clone();
        self.state.send_modify(|state| {
            state.set_nights(nights);
            change(state);
        });
    }
}

/// The most recent night if it is still in progress.
fn load_tonight(nights: &Nights) -> SleepResult<Option<SleepNight>> {
    Ok(nights.get_tonight()?.filter(SleepNight::is_in_progress))
}
