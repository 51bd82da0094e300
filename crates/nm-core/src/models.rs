//! # Domain Models
//!
//! Snapshots the feed is built from. Nothing here is mutated in place:
//! every change produces a new value that replaces the old one wholesale.

use serde::{Deserialize, Serialize};

/// A single feed item as returned by the backend.
///
/// An `id` of [`Post::UNSAVED_ID`] marks a post that has never been stored.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Post {
    pub id: i64,
    pub author: String,
    pub content: String,
    /// Opaque publication stamp, rendered as-is.
    pub published: String,
    pub liked_by_me: bool,
    pub likes: u64,
}

impl Post {
    pub const UNSAVED_ID: i64 = 0;

    /// The sentinel post: nothing is being edited.
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn is_new(&self) -> bool {
        self.id == Self::UNSAVED_ID
    }

    pub fn with_content(self, content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            ..self
        }
    }

    /// Copies the like facets (`liked_by_me`, `likes`) from an authoritative
    /// copy of the same post, leaving every other field alone.
    pub fn with_reactions_of(self, other: &Post) -> Self {
        Self {
            liked_by_me: other.liked_by_me,
            likes: other.likes,
            ..self
        }
    }
}

/// UI-facing snapshot of the feed.
///
/// `posts` keeps the order the backend returned. The flags are independent
/// of each other; nothing prevents `loading` and `error` being set together.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FeedState {
    pub posts: Vec<Post>,
    pub loading: bool,
    pub error: bool,
    pub empty: bool,
}

impl FeedState {
    pub fn loading() -> Self {
        Self {
            loading: true,
            ..Self::default()
        }
    }

    pub fn failed() -> Self {
        Self {
            error: true,
            ..Self::default()
        }
    }

    pub fn loaded(posts: Vec<Post>) -> Self {
        let empty = posts.is_empty();
        Self {
            posts,
            empty,
            ..Self::default()
        }
    }

    pub fn find(&self, id: i64) -> Option<&Post> {
        self.posts.iter().find(|post| post.id == id)
    }
}

/// What a failed repository call does to the posts already on screen.
///
/// Removal failures never touch the feed under either policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailurePolicy {
    /// Replace the feed with a bare error state.
    #[default]
    ClearFeed,
    /// Raise the error flag but keep the last known posts.
    KeepPosts,
}
