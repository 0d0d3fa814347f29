//! Rating controller: stores the quality rating of one finished night.

use crate::db::nights::Nights;
use crate::libs::command::{request, Reply};
use crate::libs::error::{SleepError, SleepResult};
use crate::libs::night::is_valid_quality;
use std::sync::Arc;
use tokio::sync::{mpsc, watch};
use tokio_util::sync::CancellationToken;

/// One-shot signals raised by the rating controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RatingEvent {
    /// The rating was stored; the front end should go back to the tracker.
    ReturnToTracker,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RatingState {
    pub night_id: i64,
    pub event: Option<RatingEvent>,
}

enum Command {
    SetQuality(i32, Reply<bool>),
}

/// Handle to a rating worker bound to a single night.
pub struct RatingController {
    night_id: i64,
    commands: mpsc::UnboundedSender<Command>,
    state: Arc<watch::Sender<RatingState>>,
    cancel: CancellationToken,
}

impl RatingController {
    /// Spawns the worker; must be called inside a tokio runtime.
    pub fn new(nights: Nights, night_id: i64, cancel: CancellationToken) -> Self {
        let (state, _) = watch::channel(RatingState { night_id, event: None });
        let state = Arc::new(state);
        let (commands, queue) = mpsc::unbounded_channel();
        let cancel = cancel.child_token();

        let worker = RatingWorker {
            nights,
            night_id,
            state: state.clone(),
        };
        tokio::spawn(worker.run(queue, cancel.clone()));

        RatingController {
            night_id,
            commands,
            state,
            cancel,
        }
    }

    pub fn night_id(&self) -> i64 {
        self.night_id
    }

    /// Stores `quality` on the night.
    ///
    /// Returns `Ok(false)` without touching anything when the night no longer
    /// exists; only a stored rating raises [`RatingEvent::ReturnToTracker`].
    pub async fn set_quality(&self, quality: i32) -> SleepResult<bool> {
        request(&self.commands, &self.cancel, |reply| Command::SetQuality(quality, reply)).await
    }

    pub fn acknowledge_return(&self) {
        self.state.send_if_modified(|state| state.event.take().is_some());
    }

    pub fn state(&self) -> RatingState {
        self.state.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<RatingState> {
        self.state.subscribe()
    }

    pub fn shutdown(&self) {
        self.cancel.cancel();
    }
}

impl Drop for RatingController {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}

struct RatingWorker {
    nights: Nights,
    night_id: i64,
    state: Arc<watch::Sender<RatingState>>,
}

impl RatingWorker {
    async fn run(mut self, mut queue: mpsc::UnboundedReceiver<Command>, cancel: CancellationToken) {
        loop {
            tokio::select! {
                biased;
                _ = cancel.cancelled() => break,
                command = queue.recv() => {
                    let Some(Command::SetQuality(quality, reply)) = command else { break };
                    tokio::select! {
                        biased;
                        _ = cancel.cancelled() => break,
                        result = self.set_quality(quality) => {
                            let _ = reply.send(result);
                        }
                    }
                }
            }
        }
        tracing::debug!(night_id = self.night_id, "rating worker stopped");
    }

    async fn set_quality(&mut self, quality: i32) -> SleepResult<bool> {
        if !is_valid_quality(quality) {
            return Err(SleepError::InvalidQuality(quality));
        }

        let id = self.night_id;
        let stored = self
            .nights
            .io(move |nights| {
                let Some(mut night) = nights.get(id)? else {
                    return Ok(false);
                };
                night.quality = quality;
                match nights.update(&night) {
                    Ok(()) => Ok(true),
                    Err(SleepError::NotFound(_)) => Ok(false),
                    Err(e) => Err(e),
                }
            })
            .await?;

        if stored {
            tracing::debug!(id, quality, "night rated");
            self.state.send_modify(|state| state.event = Some(RatingEvent::ReturnToTracker));
        } else {
            tracing::warn!(id, "night to rate no longer exists");
        }
        Ok(stored)
    }
}
