//! Shared fixtures for the cross-crate tests under `tests/`.

use nm_core::Post;

/// A stored post with deterministic text fields.
pub fn post(id: i64, likes: u64, liked_by_me: bool) -> Post {
    Post {
        id,
        author: "Netology".into(),
        content: format!("post {id}"),
        published: "21 May at 18:36".into(),
        liked_by_me,
        likes,
    }
}

/// Newest first, the way the backend orders the feed.
pub fn feed_of(ids: &[i64]) -> Vec<Post> {
    ids.iter().map(|&id| post(id, 0, false)).collect()
}
