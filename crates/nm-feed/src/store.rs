//! Single source of truth for the feed.

use nm_core::{FailurePolicy, FeedState};
use tokio::sync::watch;
use tracing::debug;

use crate::reducer::{reduce, FeedAction};

/// Holds the current [`FeedState`] and publishes every new snapshot.
///
/// The only way to change the state is [`dispatch`](Self::dispatch); the
/// reducer runs under the channel lock, so concurrent results are applied
/// one at a time against the latest state.
pub struct FeedStore {
    tx: watch::Sender<FeedState>,
    policy: FailurePolicy,
}

impl FeedStore {
    pub fn new(policy: FailurePolicy) -> Self {
        let (tx, _) = watch::channel(FeedState::default());
        Self { tx, policy }
    }

    pub fn dispatch(&self, action: FeedAction) {
        debug!(?action, "feed action");
        let policy = self.policy;
        self.tx.send_modify(|state| *state = reduce(state, action, policy));
    }

    pub fn snapshot(&self) -> FeedState {
        self.tx.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<FeedState> {
        self.tx.subscribe()
    }
}
