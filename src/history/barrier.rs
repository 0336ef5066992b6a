//! Count-to-N completion barrier for coordination rounds.
//!
//! The supervisor broadcasts a round to every tracker in registration order,
//! but completion acknowledgements arrive in whatever order the trackers
//! finish. The barrier is the rendezvous point: a round is over exactly when
//! the number of completions equals the number of trackers registered at
//! round start. Trackers added mid-round belong to the next round and never
//! touch the current barrier.

use tokio::sync::watch;

/// A single-use completion barrier for one coordination round.
pub struct RoundBarrier {
    expected: usize,
    tx: watch::Sender<usize>,
}

impl RoundBarrier {
    /// Create a barrier expecting `expected` completions.
    ///
    /// `expected` is snapshotted by the caller at round start; with zero
    /// participants [`wait`](Self::wait) resolves immediately.
    pub fn new(expected: usize) -> Self {
        let (tx, _rx) = watch::channel(0);
        Self { expected, tx }
    }

    /// Number of completions this round is waiting for.
    pub fn expected(&self) -> usize {
        self.expected
    }

    /// Completions counted so far.
    pub fn completed(&self) -> usize {
        *self.tx.borrow()
    }

    /// Record one participant's completion.
    ///
    /// Completions beyond `expected` indicate a protocol bug (a participant
    /// acknowledged twice, or one that was not part of the round); they are
    /// counted and logged but cannot un-finish a satisfied barrier.
    pub fn complete(&self) {
        let expected = self.expected;
        self.tx.send_modify(|done| {
            if *done >= expected {
                tracing::warn!(
                    expected,
                    completed = *done + 1,
                    "completion received after barrier was already satisfied"
                );
            }
            *done += 1;
        });
    }

    /// Resolve once completions reach the expected count.
    pub async fn wait(&self) {
        let mut rx = self.tx.subscribe();
        // wait_for inspects the current value first, so an already-satisfied
        // (or zero-participant) barrier resolves without yielding.
        let _ = rx.wait_for(|done| *done >= self.expected).await;
    }
}
