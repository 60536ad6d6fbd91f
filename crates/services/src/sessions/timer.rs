use tokio::sync::{oneshot, watch};
use tokio::task::JoinHandle;
use tokio::time::{self, Duration};

use quiz_core::model::QuestionId;

//
// ─── COUNTDOWN TIMER ───────────────────────────────────────────────────────────
//

/// Cancellable countdown for the question currently on screen.
///
/// Arming spawns a one-second tick task. Remaining seconds are published
/// through a watch channel for display; expiry resolves once, carrying the
/// question id the timer was armed for so a late wakeup can be checked
/// against the question actually showing. Dropping the handle aborts the
/// task, so arming a fresh timer after any navigation tears the old one
/// down.
#[derive(Debug)]
pub struct CountdownTimer {
    question_id: QuestionId,
    remaining: watch::Receiver<u32>,
    expiry: Option<oneshot::Receiver<QuestionId>>,
    task: JoinHandle<()>,
}

impl CountdownTimer {
    /// Arm a countdown of `limit_secs` for `question_id`.
    ///
    /// Must be called from within a tokio runtime.
    #[must_use]
    pub fn start(question_id: QuestionId, limit_secs: u32) -> Self {
        let (remaining_tx, remaining_rx) = watch::channel(limit_secs);
        let (expiry_tx, expiry_rx) = oneshot::channel();

        let task = tokio::spawn(async move {
            let mut ticks = time::interval(Duration::from_secs(1));
            // the first tick resolves immediately
            ticks.tick().await;

            let mut left = limit_secs;
            while left > 0 {
                ticks.tick().await;
                left -= 1;
                if remaining_tx.send(left).is_err() {
                    // handle dropped, nobody is watching
                    return;
                }
            }
            let _ = expiry_tx.send(question_id);
        });

        Self {
            question_id,
            remaining: remaining_rx,
            expiry: Some(expiry_rx),
            task,
        }
    }

    /// The question this timer was armed for.
    #[must_use]
    pub fn question_id(&self) -> QuestionId {
        self.question_id
    }

    /// Seconds left on the countdown.
    #[must_use]
    pub fn remaining_secs(&self) -> u32 {
        *self.remaining.borrow()
    }

    /// Resolves with the armed question id once the countdown reaches zero.
    ///
    /// Returns `None` if the timer was cancelled or expiry was already
    /// consumed.
    pub async fn expired(&mut self) -> Option<QuestionId> {
        let expiry = self.expiry.take()?;
        expiry.await.ok()
    }

    /// Stop the countdown. The expiry future never resolves afterwards.
    pub fn cancel(&self) {
        self.task.abort();
    }
}

impl Drop for CountdownTimer {
    fn drop(&mut self) {
        self.task.abort();
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
