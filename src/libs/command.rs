//! Plumbing shared by the controller workers.
//!
//! A controller is a thin handle around an unbounded command queue. Its
//! worker task drains the queue one command at a time, so commands never
//! interleave, and answers each one through a oneshot reply.

use crate::libs::error::{SleepError, SleepResult};
use tokio::sync::{mpsc, oneshot};
use tokio_util::sync::CancellationToken;

pub(crate) type Reply<T> = oneshot::Sender<SleepResult<T>>;

/// Enqueues a command and waits for the worker's answer.
///
/// A worker that is gone, or that drops the command because it was
/// cancelled, surfaces as [`SleepError::Cancelled`].
pub(crate) async fn request<C, T>(
    commands: &mpsc::UnboundedSender<C>,
    cancel: &CancellationToken,
    make: impl FnOnce(Reply<T>) -> C,
) -> SleepResult<T> {
    if cancel.is_cancelled() {
        return Err(SleepError::Cancelled);
    }
    let (reply, answer) = oneshot::channel();
    commands.send(make(reply)).map_err(|_| SleepError::Cancelled)?;
    answer.await.map_err(|_| SleepError::Cancelled)?
}
