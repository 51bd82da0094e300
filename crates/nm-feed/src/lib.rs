//! # nm-feed
//!
//! The feed view-model: a unidirectional store for the feed, the draft being
//! composed, and the controller that reconciles repository results into both.

pub mod controller;
pub mod reducer;
pub mod signal;
pub mod store;

pub use controller::FeedController;
pub use reducer::{reduce, FeedAction};
pub use signal::{PostCreated, PostCreatedSignal};
pub use store::FeedStore;
