use clap::{Parser, Subcommand, ValueEnum};
use env_logger::Env;
use log::{debug, info};
use reader_menu::{
    Anchor, BlockBus, BlockRequested, FollowOutcome, FollowSignal, FollowToggleController,
    MenuActionKind, Performed, PostMenu, Rect, ToggleError, ViewerSession,
};
use reader_post::{parse_posts, Post, PostError};
use reader_ref::PostId;
use serde_json::to_string_pretty;
use std::{
    io,
    path::{Path, PathBuf},
    sync::Arc,
    time::Duration,
};
use tokio::{
    fs::{read_to_string, write},
    sync::mpsc::{unbounded_channel, UnboundedReceiver},
};

mod config;
mod service;
mod terminal;

use config::Config;
use service::SimulatedFollowService;
use terminal::{render_signal, render_topic, Terminal};

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Failed to read {}: {}", .0.display(), .1)]
    ReadFile(PathBuf, #[source] io::Error),
    #[error("Failed to write {}: {}", .0.display(), .1)]
    WriteFile(PathBuf, #[source] io::Error),
    #[error("Invalid config: {0}")]
    Config(#[source] serde_json::Error),
    #[error("Invalid posts file: {0}")]
    Posts(#[from] PostError),
    #[error("Failed to serialize posts: {0}")]
    JsonToString(#[source] serde_json::Error),
    #[error("No post with id {0}")]
    UnknownPost(PostId),
    #[error(transparent)]
    Toggle(#[from] ToggleError),
}

#[derive(Debug, Parser)]
#[command(name = "reader-cli", about = "Show and act on reader post menus")]
struct Cli {
    /// Config file (defaults to ~/.reader-menu/config.json)
    #[arg(long)]
    config: Option<PathBuf>,
    /// Posts file, overrides the config
    #[arg(long)]
    posts: Option<PathBuf>,
    /// Act as a signed-out viewer
    #[arg(long)]
    signed_out: bool,
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Show the menu for every post
    List,
    /// Pick an action from one post's menu
    Act {
        post_id: u64,
        #[arg(value_enum)]
        action: ActionArg,
    },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum ActionArg {
    Block,
    Follow,
    Visit,
    Share,
    Cancel,
}

impl From<ActionArg> for MenuActionKind {
    fn from(value: ActionArg) -> Self {
        match value {
            ActionArg::Block => MenuActionKind::Block,
            ActionArg::Follow => MenuActionKind::ToggleFollow,
            ActionArg::Visit => MenuActionKind::Visit,
            ActionArg::Share => MenuActionKind::Share,
            ActionArg::Cancel => MenuActionKind::Cancel,
        }
    }
}

// Everything runs on one thread: signals come back to the task that asked.
#[tokio::main(flavor = "current_thread")]
async fn main() {
    let cli = Cli::parse();

    if let Err(err) = run(cli).await {
        eprintln!("Error: {}", err);
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), Error> {
    let mut config = Config::load(cli.config.as_deref()).await?;
    if let Some(posts_path) = cli.posts {
        config.posts_path = posts_path;
    }
    if cli.signed_out {
        config.authenticated = false;
    }

    env_logger::Builder::from_env(Env::default().default_filter_or(config.log_level.as_str()))
        .init();
    debug!("config: {:?}", config);

    let mut posts = read_posts(&config.posts_path).await?;
    info!("loaded {} posts from {}", posts.len(), config.posts_path.display());

    let (signal_sender, mut signals) = unbounded_channel::<FollowSignal>();
    let blocks = Arc::new(BlockBus::new());
    let (_, mut blocked) = blocks.subscribe_channel();
    let terminal = Arc::new(Terminal {
        wide: config.supports_anchored_popovers,
    });
    let service = Arc::new(SimulatedFollowService::new(
        Duration::from_millis(config.follow_latency_ms),
        config.fail_follow_requests,
    ));
    let menu = PostMenu::new(
        Arc::new(ViewerSession::new(config.authenticated)),
        FollowToggleController::new(service, Arc::new(signal_sender)),
        blocks.clone(),
        terminal.clone(),
        terminal.clone(),
        terminal,
    );

    match cli.command {
        Command::List => {
            for post in posts.iter() {
                println!(
                    "{} ({}) in {}",
                    post.display_name(),
                    post.id,
                    render_topic(post)
                );
                menu.show(post, &anchor_for(post));
            }
        }
        Command::Act { post_id, action } => {
            let post_id = PostId(post_id);
            let post = posts
                .iter_mut()
                .find(|post| post.id == post_id)
                .ok_or(Error::UnknownPost(post_id))?;
            let anchor = anchor_for(post);

            let performed = menu.perform(action.into(), post, &anchor).await?;
            debug!("performed: {:?}", performed);

            while let Ok(signal) = signals.try_recv() {
                println!("{}", render_signal(&signal));
            }

            let followed_changed = matches!(
                performed,
                Performed::Toggled(FollowOutcome::Succeeded { .. })
            );
            let removed = apply_blocks(&mut posts, &mut blocked);
            if followed_changed || removed > 0 {
                write_posts(&config.posts_path, &posts).await?;
            }
        }
    }

    blocks.unsubscribe_all();
    Ok(())
}

fn anchor_for(post: &Post) -> Anchor {
    Anchor::new(format!("post-{}-menu-button", post.id), Rect::default())
}

/// Drops every post from a blocked site. Returns how many were removed.
fn apply_blocks(posts: &mut Vec<Post>, blocked: &mut UnboundedReceiver<BlockRequested>) -> usize {
    let mut removed = 0;
    while let Ok(event) = blocked.try_recv() {
        let before = posts.len();
        posts.retain(|post| post.site_id != event.post.site_id);
        let count = before - posts.len();
        info!("blocked site {}, hid {} post(s)", event.post.site_id, count);
        removed += count;
    }
    removed
}

async fn read_posts(path: &Path) -> Result<Vec<Post>, Error> {
    let json = read_to_string(path)
        .await
        .map_err(|err| Error::ReadFile(path.to_path_buf(), err))?;
    Ok(parse_posts(&json)?)
}

async fn write_posts(path: &Path, posts: &[Post]) -> Result<(), Error> {
    let json = to_string_pretty(posts).map_err(Error::JsonToString)?;

    write(path, json)
        .await
        .map_err(|err| Error::WriteFile(path.to_path_buf(), err))?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use reader_ref::SiteId;

    #[test]
    fn test_cli_parses_act() {
        let cli = Cli::parse_from(["reader-cli", "--signed-out", "act", "7", "follow"]);
        assert!(cli.signed_out);
        match cli.command {
            Command::Act { post_id, action } => {
                assert_eq!(post_id, 7);
                assert_eq!(MenuActionKind::from(action), MenuActionKind::ToggleFollow);
            }
            other => panic!("expected act, got {:?}", other),
        }
    }

    #[test]
    fn test_apply_blocks_hides_the_whole_site() {
        let bus = BlockBus::new();
        let (_, mut blocked) = bus.subscribe_channel();
        let mut posts = vec![
            Post::new(PostId(1), SiteId(10)),
            Post::new(PostId(2), SiteId(20)),
            Post::new(PostId(3), SiteId(10)),
        ];

        bus.emit_block_requested(&posts[0].clone());

        assert_eq!(apply_blocks(&mut posts, &mut blocked), 2);
        assert_eq!(posts.len(), 1);
        assert_eq!(posts[0].id, PostId(2));
        assert_eq!(apply_blocks(&mut posts, &mut blocked), 0);
    }

    #[tokio::test]
    async fn test_posts_round_trip_through_file() {
        let path = std::env::temp_dir().join(format!("reader-cli-{}.json", std::process::id()));
        let posts = vec![Post::new(PostId(1), SiteId(10)).with_following(true)];

        write_posts(&path, &posts).await.unwrap();
        let read = read_posts(&path).await.unwrap();
        let _ = tokio::fs::remove_file(&path).await;

        assert_eq!(read, posts);
    }
}
