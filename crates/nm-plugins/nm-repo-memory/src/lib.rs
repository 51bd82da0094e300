//! # nm-repo-memory
//!
//! In-process implementation of `PostRepository`.
//! Features: newest-first ordering, JSON seeding, artificial latency and an
//! offline switch for exercising failure paths.

use std::collections::HashSet;
use std::path::Path;
use std::sync::atomic::{AtomicBool, AtomicI64, Ordering};
use std::time::Duration;

use anyhow::{bail, Context};
use async_trait::async_trait;
use nm_core::error::{RepoError, Result};
use nm_core::models::Post;
use nm_core::traits::PostRepository;
use tokio::sync::RwLock;
use tracing::debug;

const DEFAULT_AUTHOR: &str = "Me";

pub struct MemoryPostRepo {
    /// Newest first, the order `fetch_all` hands out.
    posts: RwLock<Vec<Post>>,
    /// Largest id handed out so far; creation takes the next one.
    last_id: AtomicI64,
    available: AtomicBool,
    latency: Duration,
    author: String,
}

impl MemoryPostRepo {
    pub fn new() -> Self {
        Self::seeded(Vec::new(), 0)
    }

    /// Seeds the repository. Fresh ids continue after the largest seeded id.
    ///
    /// Every seeded post must already be persisted: ids are positive and
    /// unique.
    pub fn with_posts(posts: Vec<Post>) -> anyhow::Result<Self> {
        let mut seen = HashSet::with_capacity(posts.len());
        for post in &posts {
            if post.id <= 0 {
                bail!("seed post has invalid ID {}", post.id);
            }
            if !seen.insert(post.id) {
                bail!("seed post ID {} appears more than once", post.id);
            }
        }
        let last_id = posts.iter().map(|post| post.id).max().unwrap_or(0);
        Ok(Self::seeded(posts, last_id))
    }

    fn seeded(posts: Vec<Post>, last_id: i64) -> Self {
        Self {
            posts: RwLock::new(posts),
            last_id: AtomicI64::new(last_id),
            available: AtomicBool::new(true),
            latency: Duration::ZERO,
            author: DEFAULT_AUTHOR.to_string(),
        }
    }

    /// Seeds from a JSON array of posts (camelCase keys).
    pub fn from_json(json: &str) -> anyhow::Result<Self> {
        let posts: Vec<Post> = serde_json::from_str(json).context("invalid seed JSON")?;
        Self::with_posts(posts)
    }

    pub async fn from_json_file(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let json = tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("reading seed file {}", path.display()))?;
        Self::from_json(&json)
    }

    /// Every call sleeps this long before answering.
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    /// Author stamped on created posts that don't name one.
    pub fn with_author(mut self, author: impl Into<String>) -> Self {
        self.author = author.into();
        self
    }

    /// While unavailable, every call fails with `RepoError::Unavailable`.
    pub fn set_available(&self, available: bool) {
        self.available.store(available, Ordering::SeqCst);
    }

    pub fn is_available(&self) -> bool {
        self.available.load(Ordering::SeqCst)
    }

    async fn settle(&self) -> Result<()> {
        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }
        if self.is_available() {
            Ok(())
        } else {
            Err(RepoError::Unavailable("repository is offline".to_string()))
        }
    }

    fn allocate_id(&self) -> Result<i64> {
        self.last_id
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |last| last.checked_add(1))
            .map(|last| last + 1)
            .map_err(|_| RepoError::Internal("post IDs exhausted".to_string()))
    }

    async fn update<F>(&self, id: i64, change: F) -> Result<Post>
    where
        F: FnOnce(&mut Post),
    {
        let mut posts = self.posts.write().await;
        let post = posts
            .iter_mut()
            .find(|post| post.id == id)
            .ok_or(RepoError::NotFound(id))?;
        change(post);
        Ok(post.clone())
    }
}

impl Default for MemoryPostRepo {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl PostRepository for MemoryPostRepo {
    async fn fetch_all(&self) -> Result<Vec<Post>> {
        self.settle().await?;
        Ok(self.posts.read().await.clone())
    }

    async fn like_by_id(&self, id: i64) -> Result<Post> {
        self.settle().await?;
        debug!(id, "like");
        self.update(id, |post| {
            if !post.liked_by_me {
                post.liked_by_me = true;
                post.likes = post.likes.saturating_add(1);
            }
        })
        .await
    }

    async fn unlike_by_id(&self, id: i64) -> Result<Post> {
        self.settle().await?;
        debug!(id, "unlike");
        self.update(id, |post| {
            if post.liked_by_me {
                post.liked_by_me = false;
                post.likes = post.likes.saturating_sub(1);
            }
        })
        .await
    }

    async fn save(&self, post: Post) -> Result<Post> {
        self.settle().await?;
        if !post.is_new() {
            debug!(id = post.id, "update");
            // Only the text is client-owned; likes stay as stored.
            return self.update(post.id, |stored| stored.content = post.content).await;
        }

        let author = if post.author.is_empty() {
            self.author.clone()
        } else {
            post.author
        };
        let created = Post {
            id: self.allocate_id()?,
            author,
            content: post.content,
            published: chrono::Local::now().format("%d %B at %H:%M").to_string(),
            liked_by_me: false,
            likes: 0,
        };
        debug!(id = created.id, "create");
        self.posts.write().await.insert(0, created.clone());
        Ok(created)
    }

    async fn remove_by_id(&self, id: i64) -> Result<()> {
        self.settle().await?;
        let mut posts = self.posts.write().await;
        let index = posts
            .iter()
            .position(|post| post.id == id)
            .ok_or(RepoError::NotFound(id))?;
        posts.remove(index);
        debug!(id, "remove");
        Ok(())
    }
}
