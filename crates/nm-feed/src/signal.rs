//! Edge-triggered "post created" notification.
//!
//! Unlike the feed and the draft this is not state: an emission reaches the
//! receivers subscribed at that moment, once each, and is never replayed.

use tokio::sync::broadcast;
use tokio::sync::broadcast::error::{RecvError, TryRecvError};

const CAPACITY: usize = 16;

pub struct PostCreatedSignal {
    tx: broadcast::Sender<()>,
}

impl PostCreatedSignal {
    pub fn new() -> Self {
        let (tx, _) = broadcast::channel(CAPACITY);
        Self { tx }
    }

    pub fn notify(&self) {
        // No receivers means nobody is listening; the emission is dropped.
        let _ = self.tx.send(());
    }

    pub fn subscribe(&self) -> PostCreated {
        PostCreated {
            rx: self.tx.subscribe(),
        }
    }
}

impl Default for PostCreatedSignal {
    fn default() -> Self {
        Self::new()
    }
}

/// Receiving half handed to the UI.
pub struct PostCreated {
    rx: broadcast::Receiver<()>,
}

impl PostCreated {
    /// Waits for the next emission. Returns `false` once the controller is gone.
    ///
    /// After the buffer overflows, the dropped emissions and everything still
    /// buffered are reported as a single receipt.
    pub async fn recv(&mut self) -> bool {
        match self.rx.recv().await {
            Ok(()) => true,
            Err(RecvError::Lagged(_)) => {
                self.drain();
                true
            }
            Err(RecvError::Closed) => false,
        }
    }

    /// Consumes a pending emission without waiting. Overflow collapses the
    /// same way as in [`PostCreated::recv`].
    pub fn try_recv(&mut self) -> bool {
        match self.rx.try_recv() {
            Ok(()) => true,
            Err(TryRecvError::Lagged(_)) => {
                self.drain();
                true
            }
            Err(TryRecvError::Empty) | Err(TryRecvError::Closed) => false,
        }
    }

    fn drain(&mut self) {
        while self.rx.try_recv().is_ok() {}
    }
}
