//! # FeedController
//!
//! Coordinates the flow between UI actions and the `PostRepository` port.
//!
//! Every method does its local bookkeeping synchronously, then hands the
//! repository call to a spawned task and returns that task's handle. The
//! outcome is folded into the feed store when the call resolves. Dropping
//! the handle does not cancel the call.

use std::sync::Arc;

use nm_core::{FailurePolicy, FeedState, Post, PostRepository};
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::reducer::FeedAction;
use crate::signal::{PostCreated, PostCreatedSignal};
use crate::store::FeedStore;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Reaction {
    Like,
    Unlike,
}

struct Inner {
    repo: Arc<dyn PostRepository>,
    store: FeedStore,
    draft: watch::Sender<Post>,
    post_created: PostCreatedSignal,
}

/// View-model for the post feed. Cheap to clone; clones share state.
///
/// # Panics
///
/// Methods that reach the repository spawn onto the current tokio runtime
/// and panic when called outside of one.
#[derive(Clone)]
pub struct FeedController {
    inner: Arc<Inner>,
}

impl FeedController {
    pub fn new(repo: Arc<dyn PostRepository>, policy: FailurePolicy) -> Self {
        let (draft, _) = watch::channel(Post::empty());
        Self {
            inner: Arc::new(Inner {
                repo,
                store: FeedStore::new(policy),
                draft,
                post_created: PostCreatedSignal::new(),
            }),
        }
    }

    /// Builds the controller and immediately issues the first refresh.
    pub fn start(repo: Arc<dyn PostRepository>, policy: FailurePolicy) -> (Self, JoinHandle<()>) {
        let controller = Self::new(repo, policy);
        let initial_load = controller.load_feed();
        (controller, initial_load)
    }

    pub fn feed(&self) -> FeedState {
        self.inner.store.snapshot()
    }

    pub fn subscribe_feed(&self) -> watch::Receiver<FeedState> {
        self.inner.store.subscribe()
    }

    pub fn draft(&self) -> Post {
        self.inner.draft.borrow().clone()
    }

    pub fn subscribe_draft(&self) -> watch::Receiver<Post> {
        self.inner.draft.subscribe()
    }

    pub fn subscribe_post_created(&self) -> PostCreated {
        self.inner.post_created.subscribe()
    }

    /// Drops the current posts, shows the loading state and fetches the feed.
    pub fn load_feed(&self) -> JoinHandle<()> {
        self.inner.store.dispatch(FeedAction::LoadStarted);
        let inner = Arc::clone(&self.inner);
        tokio::spawn(async move {
            match inner.repo.fetch_all().await {
                Ok(posts) => {
                    info!(count = posts.len(), "feed loaded");
                    inner.store.dispatch(FeedAction::Loaded(posts));
                }
                Err(err) => {
                    warn!(error = %err, "feed refresh failed");
                    inner.store.dispatch(FeedAction::Failed);
                }
            }
        })
    }

    pub fn edit(&self, post: Post) {
        debug!(id = post.id, "editing post");
        self.inner.draft.send_replace(post);
    }

    /// Sets the draft content to the trimmed `text`.
    ///
    /// Returns `false`, and notifies nobody, when the content is unchanged.
    pub fn change_content(&self, text: &str) -> bool {
        let text = text.trim();
        self.inner.draft.send_if_modified(|draft| {
            if draft.content == text {
                return false;
            }
            *draft = std::mem::take(draft).with_content(text);
            true
        })
    }

    /// Sends the draft to the repository.
    ///
    /// The draft is reset to the sentinel before this returns, whatever the
    /// repository later answers.
    pub fn save(&self) -> JoinHandle<()> {
        let draft = self.inner.draft.send_replace(Post::empty());
        let inner = Arc::clone(&self.inner);
        tokio::spawn(async move {
            let id = draft.id;
            match inner.repo.save(draft).await {
                Ok(saved) => {
                    let created = id == Post::UNSAVED_ID;
                    info!(id = saved.id, created, "post saved");
                    inner.post_created.notify();
                }
                Err(err) => {
                    warn!(id, error = %err, "saving post failed");
                    inner.store.dispatch(FeedAction::Failed);
                }
            }
        })
    }

    pub fn like_by_id(&self, id: i64) -> JoinHandle<()> {
        self.react(id, Reaction::Like)
    }

    pub fn unlike_by_id(&self, id: i64) -> JoinHandle<()> {
        self.react(id, Reaction::Unlike)
    }

    /// Removes the post once the repository confirms; nothing is removed
    /// locally before that.
    pub fn remove_by_id(&self, id: i64) -> JoinHandle<()> {
        let inner = Arc::clone(&self.inner);
        tokio::spawn(async move {
            match inner.repo.remove_by_id(id).await {
                Ok(()) => inner.store.dispatch(FeedAction::Removed(id)),
                // Nothing was removed up front, so there is nothing to roll back.
                Err(err) => warn!(id, error = %err, "removing post failed"),
            }
        })
    }

    fn react(&self, id: i64, reaction: Reaction) -> JoinHandle<()> {
        let inner = Arc::clone(&self.inner);
        tokio::spawn(async move {
            let result = match reaction {
                Reaction::Like => inner.repo.like_by_id(id).await,
                Reaction::Unlike => inner.repo.unlike_by_id(id).await,
            };
            match result {
                Ok(post) => inner.store.dispatch(FeedAction::Reacted { id, post }),
                Err(err) => {
                    warn!(id, ?reaction, error = %err, "reaction failed");
                    inner.store.dispatch(FeedAction::Failed);
                }
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockall::predicate::eq;
    use nm_core::{MockPostRepository, RepoError};

    fn post(id: i64, likes: u64, liked_by_me: bool) -> Post {
        Post {
            id,
            author: "Netology".to_string(),
            content: format!("post {id}"),
            published: "now".to_string(),
            liked_by_me,
            likes,
        }
    }

    fn controller(repo: MockPostRepository) -> FeedController {
        FeedController::new(Arc::new(repo), FailurePolicy::ClearFeed)
    }

    /// Controller whose feed already holds `posts`.
    async fn loaded(mut repo: MockPostRepository, posts: Vec<Post>) -> FeedController {
        repo.expect_fetch_all()
            .times(1)
            .returning(move || Ok(posts.clone()));
        let controller = controller(repo);
        controller.load_feed().await.unwrap();
        controller
    }

    #[tokio::test]
    async fn test_load_feed_success() {
        let posts = vec![post(1, 0, false), post(2, 1, true)];
        let controller = loaded(MockPostRepository::new(), posts.clone()).await;
        let state = controller.feed();
        assert_eq!(state.posts, posts);
        assert!(!state.empty);
        assert!(!state.loading);
        assert!(!state.error);
    }

    #[tokio::test]
    async fn test_load_feed_shows_loading_before_result() {
        let mut repo = MockPostRepository::new();
        repo.expect_fetch_all().returning(|| Ok(Vec::new()));
        let controller = controller(repo);

        let handle = controller.load_feed();
        assert_eq!(controller.feed(), FeedState::loading());

        handle.await.unwrap();
        assert!(controller.feed().empty);
        assert!(!controller.feed().loading);
    }

    #[tokio::test]
    async fn test_load_feed_failure_discards_posts() {
        let mut repo = MockPostRepository::new();
        let mut calls = 0;
        repo.expect_fetch_all().times(2).returning(move || {
            calls += 1;
            if calls == 1 {
                Ok(vec![post(1, 0, false)])
            } else {
                Err(RepoError::Unavailable("timeout".into()))
            }
        });
        let controller = controller(repo);
        controller.load_feed().await.unwrap();
        controller.load_feed().await.unwrap();
        assert_eq!(controller.feed(), FeedState::failed());
    }

    #[tokio::test]
    async fn test_start_issues_initial_load() {
        let mut repo = MockPostRepository::new();
        repo.expect_fetch_all()
            .times(1)
            .returning(|| Ok(vec![post(3, 0, false)]));
        let (controller, initial) = FeedController::start(Arc::new(repo), FailurePolicy::ClearFeed);
        initial.await.unwrap();
        assert_eq!(controller.feed().posts.len(), 1);
    }

    #[tokio::test]
    async fn test_like_by_id_reconciles_matching_post() {
        let mut repo = MockPostRepository::new();
        repo.expect_like_by_id()
            .with(eq(1))
            .times(1)
            .returning(|_| Ok(post(1, 3, true)));
        let controller = loaded(repo, vec![post(1, 2, false), post(2, 5, true)]).await;

        controller.like_by_id(1).await.unwrap();
        assert_eq!(controller.feed().posts, vec![post(1, 3, true), post(2, 5, true)]);
    }

    #[tokio::test]
    async fn test_unlike_by_id_reconciles_matching_post() {
        let mut repo = MockPostRepository::new();
        repo.expect_unlike_by_id()
            .with(eq(2))
            .times(1)
            .returning(|_| Ok(post(2, 4, false)));
        let controller = loaded(repo, vec![post(1, 2, false), post(2, 5, true)]).await;

        controller.unlike_by_id(2).await.unwrap();
        assert_eq!(controller.feed().posts, vec![post(1, 2, false), post(2, 4, false)]);
    }

    #[tokio::test]
    async fn test_like_failure_sets_error() {
        let mut repo = MockPostRepository::new();
        repo.expect_like_by_id()
            .returning(|id| Err(RepoError::NotFound(id)));
        let controller = loaded(repo, vec![post(1, 2, false)]).await;

        controller.like_by_id(1).await.unwrap();
        assert_eq!(controller.feed(), FeedState::failed());
    }

    #[tokio::test]
    async fn test_like_failure_keeps_posts_under_keep_policy() {
        let mut repo = MockPostRepository::new();
        repo.expect_fetch_all().returning(|| Ok(vec![post(1, 2, false)]));
        repo.expect_like_by_id()
            .returning(|_| Err(RepoError::Unavailable("offline".into())));
        let controller = FeedController::new(Arc::new(repo), FailurePolicy::KeepPosts);
        controller.load_feed().await.unwrap();

        controller.like_by_id(1).await.unwrap();
        let state = controller.feed();
        assert!(state.error);
        assert_eq!(state.posts, vec![post(1, 2, false)]);
    }

    #[tokio::test]
    async fn test_remove_by_id_success_filters_post() {
        let mut repo = MockPostRepository::new();
        repo.expect_remove_by_id().with(eq(2)).returning(|_| Ok(()));
        let controller =
            loaded(repo, vec![post(1, 0, false), post(2, 0, false), post(3, 0, false)]).await;

        controller.remove_by_id(2).await.unwrap();
        assert_eq!(controller.feed().posts, vec![post(1, 0, false), post(3, 0, false)]);
    }

    #[tokio::test]
    async fn test_remove_by_id_failure_leaves_state() {
        let mut repo = MockPostRepository::new();
        repo.expect_remove_by_id()
            .returning(|_| Err(RepoError::Unavailable("offline".into())));
        let controller = loaded(repo, vec![post(1, 0, false)]).await;
        let before = controller.feed();

        controller.remove_by_id(1).await.unwrap();
        assert_eq!(controller.feed(), before);
    }

    #[tokio::test]
    async fn test_remove_is_not_optimistic() {
        let mut repo = MockPostRepository::new();
        repo.expect_remove_by_id().returning(|_| Ok(()));
        let controller = loaded(repo, vec![post(1, 0, false)]).await;

        let handle = controller.remove_by_id(1);
        assert_eq!(controller.feed().posts.len(), 1);
        handle.await.unwrap();
        assert!(controller.feed().posts.is_empty());
    }

    #[test]
    fn test_change_content_trims_and_skips_duplicates() {
        let controller = controller(MockPostRepository::new());
        let mut draft = controller.subscribe_draft();

        assert!(controller.change_content(" hello "));
        assert_eq!(controller.draft().content, "hello");
        assert!(draft.has_changed().unwrap());
        draft.mark_unchanged();

        assert!(!controller.change_content("hello   "));
        assert!(!draft.has_changed().unwrap());
    }

    #[test]
    fn test_change_content_keeps_other_fields() {
        let controller = controller(MockPostRepository::new());
        controller.edit(post(5, 9, true));
        controller.change_content("edited");
        assert_eq!(controller.draft(), post(5, 9, true).with_content("edited"));
    }

    #[tokio::test]
    async fn test_save_resets_draft_before_repository_resolves() {
        let mut repo = MockPostRepository::new();
        repo.expect_save()
            .withf(|post| post.is_new() && post.content == "fresh")
            .times(1)
            .returning(|post| Ok(Post { id: 10, ..post }));
        let controller = controller(repo);
        let mut created = controller.subscribe_post_created();
        controller.change_content("fresh");

        // Current-thread runtime: the spawned call cannot run before we yield.
        let handle = controller.save();
        assert_eq!(controller.draft(), Post::empty());
        assert!(!created.try_recv());

        handle.await.unwrap();
        assert!(created.try_recv());
        assert!(!created.try_recv());
    }

    #[tokio::test]
    async fn test_save_failure_sets_error_and_still_resets_draft() {
        let mut repo = MockPostRepository::new();
        repo.expect_save()
            .returning(|_| Err(RepoError::Internal("rejected".into())));
        let controller = controller(repo);
        let mut created = controller.subscribe_post_created();
        controller.edit(post(4, 0, false));

        controller.save().await.unwrap();
        assert_eq!(controller.draft(), Post::empty());
        assert!(controller.feed().error);
        assert!(!created.try_recv());
    }

    #[tokio::test]
    async fn test_overlapping_loads_are_not_deduplicated() {
        let mut repo = MockPostRepository::new();
        repo.expect_fetch_all().times(2).returning(|| Ok(Vec::new()));
        let controller = controller(repo);
        let first = controller.load_feed();
        let second = controller.load_feed();
        first.await.unwrap();
        second.await.unwrap();
    }
}
