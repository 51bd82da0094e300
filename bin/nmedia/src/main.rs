//! # nmedia Binary
//!
//! A line-oriented terminal front-end: assembles the repository plugin
//! selected at compile time behind a `FeedController`, reads commands from
//! stdin and prints every feed snapshot the controller publishes.

mod commands;

use std::sync::Arc;

use anyhow::Context;
use nm_config::Settings;
use nm_core::{FeedState, Post};
use nm_feed::{FeedController, PostCreated};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::watch;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use crate::commands::{Command, ParseError, HELP};

// Feature-gated imports: the repository is picked at compile time
#[cfg(feature = "repo-memory")]
use nm_repo_memory::MemoryPostRepo;

#[cfg(not(feature = "repo-memory"))]
compile_error!("nmedia needs a repository plugin; enable the `repo-memory` feature");

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Logs go to stderr so they don't interleave with the rendered feed.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let settings = Settings::load().context("loading settings")?;

    // 1. Initialize Repository Implementation
    let repo = Arc::new(build_repo(&settings).await?);

    // 2. Wire the controller and its observers
    let controller = FeedController::new(repo.clone(), settings.failure_policy);
    tokio::spawn(print_feed_updates(controller.subscribe_feed()));
    tokio::spawn(refresh_on_post_created(
        controller.clone(),
        controller.subscribe_post_created(),
    ));

    if settings.load_on_start {
        controller.load_feed();
    }

    info!(policy = ?settings.failure_policy, "nmedia ready, type `help` for commands");

    // 3. Command loop
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        let command = match line.parse::<Command>() {
            Ok(command) => command,
            Err(ParseError::Empty) => continue,
            Err(err) => {
                eprintln!("{err}");
                continue;
            }
        };

        match command {
            Command::Load => {
                controller.load_feed();
            }
            Command::Like(id) => {
                controller.like_by_id(id);
            }
            Command::Unlike(id) => {
                controller.unlike_by_id(id);
            }
            Command::Remove(id) => {
                controller.remove_by_id(id);
            }
            Command::Edit(id) => match controller.feed().find(id) {
                Some(post) => {
                    controller.edit(post.clone());
                    print_draft(&controller);
                }
                None => eprintln!("no post #{id} in the feed"),
            },
            Command::New => {
                controller.edit(Post::empty());
                print_draft(&controller);
            }
            Command::Content(text) => {
                if controller.change_content(&text) {
                    print_draft(&controller);
                }
            }
            Command::Save => {
                controller.save();
                print_draft(&controller);
            }
            Command::Show => {
                print_feed(&controller.feed());
                print_draft(&controller);
            }
            Command::Offline => {
                repo.set_available(false);
                println!("repository offline");
            }
            Command::Online => {
                repo.set_available(true);
                println!("repository online");
            }
            Command::Help => println!("{HELP}"),
            Command::Quit => break,
        }
    }

    info!("bye");
    Ok(())
}

#[cfg(feature = "repo-memory")]
async fn build_repo(settings: &Settings) -> anyhow::Result<MemoryPostRepo> {
    let repo = match &settings.seed_path {
        Some(path) => MemoryPostRepo::from_json_file(path).await?,
        None => MemoryPostRepo::new(),
    };
    Ok(repo
        .with_latency(settings.latency())
        .with_author(settings.author.clone()))
}

async fn print_feed_updates(mut feed: watch::Receiver<FeedState>) {
    while feed.changed().await.is_ok() {
        let state = feed.borrow_and_update().clone();
        print_feed(&state);
    }
}

/// The UI refreshes after a successful save; the controller only signals.
async fn refresh_on_post_created(controller: FeedController, mut created: PostCreated) {
    while created.recv().await {
        println!("post saved");
        controller.load_feed();
    }
}

fn print_feed(state: &FeedState) {
    match nm_ui::render_feed(state) {
        Ok(text) => println!("{text}"),
        Err(err) => error!(error = %err, "rendering feed failed"),
    }
}

fn print_draft(controller: &FeedController) {
    match nm_ui::render_draft(&controller.draft()) {
        Ok(text) => println!("> {text}"),
        Err(err) => error!(error = %err, "rendering draft failed"),
    }
}
