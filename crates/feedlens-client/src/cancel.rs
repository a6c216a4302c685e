// crates/feedlens-client/src/cancel.rs
// ============================================================================
// Module: Cancellation
// Description: Cooperative cancellation signal for in-flight fetches.
// Purpose: Let callers abandon a fetch raced against its request.
// Dependencies: tokio
// ============================================================================

//! ## Overview
//! [`cancel_pair`] returns a [`CancelHandle`] held by the caller and a
//! [`CancelSignal`] passed to the fetch. Firing the handle resolves every
//! clone of the signal; dropping the handle without firing never does.

// ============================================================================
// SECTION: Imports
// ============================================================================

use tokio::sync::watch;

// ============================================================================
// SECTION: Handle and Signal
// ============================================================================

/// Caller side of a cancellation pair.
#[derive(Debug)]
pub struct CancelHandle {
    /// Broadcast flag; `true` once cancelled.
    sender: watch::Sender<bool>,
}

impl CancelHandle {
    /// Cancels every fetch observing the paired signal.
    pub fn cancel(&self) {
        self.sender.send_replace(true);
    }
}

/// Fetch side of a cancellation pair.
#[derive(Debug, Clone)]
pub struct CancelSignal {
    /// Receiver for the broadcast flag.
    receiver: watch::Receiver<bool>,
}

impl CancelSignal {
    /// Returns true once the handle has fired.
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        *self.receiver.borrow()
    }

    /// Resolves when the handle fires; pends forever if it is dropped first.
    pub async fn cancelled(&mut self) {
        if self.receiver.wait_for(|cancelled| *cancelled).await.is_err() {
            std::future::pending::<()>().await;
        }
    }
}

/// Creates a connected cancellation handle and signal.
#[must_use]
pub fn cancel_pair() -> (CancelHandle, CancelSignal) {
    let (sender, receiver) = watch::channel(false);
    (
        CancelHandle {
            sender,
        },
        CancelSignal {
            receiver,
        },
    )
}
