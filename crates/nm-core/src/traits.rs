//! # Core Traits (Ports)
//!
//! Any post source must implement these traits to back a feed controller.

use async_trait::async_trait;

use crate::error::Result;
use crate::models::Post;

/// Remote post source. Every call resolves exactly once, to either the
/// payload or a [`RepoError`](crate::error::RepoError).
#[cfg_attr(any(test, feature = "testing"), mockall::automock)]
#[async_trait]
pub trait PostRepository: Send + Sync {
    /// The whole feed, in backend order.
    async fn fetch_all(&self) -> Result<Vec<Post>>;

    /// Marks the post liked by the caller and returns its authoritative state.
    async fn like_by_id(&self, id: i64) -> Result<Post>;

    /// Inverse of [`like_by_id`](Self::like_by_id).
    async fn unlike_by_id(&self, id: i64) -> Result<Post>;

    /// Creates the post when its id is `Post::UNSAVED_ID`, updates it otherwise.
    /// The returned post is authoritative; a created post gets a fresh id.
    async fn save(&self, post: Post) -> Result<Post>;

    async fn remove_by_id(&self, id: i64) -> Result<()>;
}
