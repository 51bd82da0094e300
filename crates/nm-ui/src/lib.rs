//! Plain-text views of the feed and the draft for terminal front-ends.

use askama::Template;
use nm_core::models::{FeedState, Post};

#[derive(Template)]
#[template(
    ext = "txt",
    source = "{% if state.loading %}Loading...
{% else if state.error %}Something went wrong. Type `load` to try again.
{% else if state.empty %}No posts yet.
{% endif %}{% for post in state.posts %}#{{ post.id }} {{ post.author }} | {{ post.published }}
    {{ post.content }}
    {% if post.liked_by_me %}[liked]{% else %}[like]{% endif %} {{ post.likes }}
{% endfor %}"
)]
pub struct FeedTemplate<'a> {
    pub state: &'a FeedState,
}

#[derive(Template)]
#[template(
    ext = "txt",
    source = "{% if draft.is_new() %}new post{% else %}editing #{{ draft.id }}{% endif %}: {{ draft.content }}"
)]
pub struct DraftTemplate<'a> {
    pub draft: &'a Post,
}

pub fn render_feed(state: &FeedState) -> askama::Result<String> {
    FeedTemplate { state }.render()
}

pub fn render_draft(draft: &Post) -> askama::Result<String> {
    DraftTemplate { draft }.render()
}
