//! Pure state transitions for the feed.
//!
//! `reduce` never mutates its input; it always builds the next snapshot.

use nm_core::{FailurePolicy, FeedState, Post};

/// Everything that can happen to the feed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FeedAction {
    /// A full refresh was issued. Previous posts are dropped.
    LoadStarted,
    /// The refresh resolved with the backend's posts.
    Loaded(Vec<Post>),
    /// A like/unlike for `id` resolved with the authoritative post.
    Reacted { id: i64, post: Post },
    /// The backend confirmed removal of `id`.
    Removed(i64),
    /// A repository call failed.
    Failed,
}

pub fn reduce(state: &FeedState, action: FeedAction, policy: FailurePolicy) -> FeedState {
    match action {
        FeedAction::LoadStarted => FeedState::loading(),
        FeedAction::Loaded(posts) => FeedState::loaded(posts),
        FeedAction::Reacted { id, post } => {
            // Matched on the requested id, not on whatever id the backend echoed.
            let posts = state
                .posts
                .iter()
                .map(|current| {
                    if current.id == id {
                        current.clone().with_reactions_of(&post)
                    } else {
                        current.clone()
                    }
                })
                .collect();
            FeedState::loaded(posts)
        }
        FeedAction::Removed(id) => FeedState {
            posts: state
                .posts
                .iter()
                .filter(|post| post.id != id)
                .cloned()
                .collect(),
            ..state.clone()
        },
        FeedAction::Failed => match policy {
            FailurePolicy::ClearFeed => FeedState::failed(),
            FailurePolicy::KeepPosts => FeedState {
                error: true,
                ..FeedState::loaded(state.posts.clone())
            },
        },
    }
}
