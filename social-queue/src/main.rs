//! social-queue - Manage scheduled social posts
//!
//! Unix-style tool for the SocialCmd scheduling backend.

use std::io::{BufRead, Write};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use clap::{Parser, Subcommand, ValueEnum};
use libsocialcmd::service::{Confirmation, DeleteOutcome, Event};
use libsocialcmd::types::{search, QueueTab};
use libsocialcmd::{
    Config, PlatformCatalog, PlatformId, PostDraft, PostId, PostStatus, PostsApi, QueuedPost,
    SchedulerService, SocialCmdError,
};
use tracing::{debug, info};

#[derive(Parser, Debug)]
#[command(name = "social-queue")]
#[command(version)]
#[command(about = "Manage scheduled social posts")]
#[command(long_about = "\
social-queue - Manage scheduled social posts

DESCRIPTION:
    social-queue is a Unix-style tool for the SocialCmd scheduling backend.
    Use it to list the queue, schedule a post to several platforms at once,
    delete queued posts, or watch the queue for publications.

COMMANDS:
    list        List queued and published posts
    schedule    Schedule a post for one or more platforms
    delete      Delete a queued post
    watch       Poll the queue and report posts as they are published

USAGE EXAMPLES:
    # Upcoming posts
    social-queue list

    # Everything, as JSON
    social-queue list --tab all --format json

    # Schedule for X and Threads
    social-queue schedule --content \"Launch day!\" \\
        --platform twitter --platform threads --at 2025-03-01T09:30

    # Delete without the confirmation prompt
    social-queue delete 42 --force

    # Report publications every 30 seconds
    social-queue watch --interval 30s

CONFIGURATION:
    Configuration file: ~/.config/socialcmd/config.toml

    Override with environment variables:
        SOCIALCMD_CONFIG      - Path to config file
        SOCIALCMD_API_URL     - Base URL of the scheduling backend
        SOCIALCMD_LOG_FORMAT  - text, json or pretty
        SOCIALCMD_LOG_LEVEL   - error, warn, info, debug, trace

EXIT CODES:
    0 - Success (including a declined delete)
    1 - Backend or network failure
    2 - Configuration error
    3 - Invalid input (bad platform, schedule, content too long, etc.)
")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging to stderr
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// List posts
    List {
        /// Output format
        #[arg(short, long, value_enum, default_value = "text")]
        format: OutputFormat,

        /// Which posts to show
        #[arg(short, long, value_enum, default_value = "upcoming")]
        tab: TabArg,

        /// Only posts for this platform
        #[arg(short, long)]
        platform: Option<String>,

        /// Only posts whose content contains this text (case-insensitive)
        #[arg(short, long)]
        search: Option<String>,
    },

    /// Schedule a post
    Schedule {
        /// Post content
        #[arg(short, long)]
        content: String,

        /// Destination platform (repeatable; defaults to the configured platforms)
        #[arg(short, long = "platform")]
        platforms: Vec<String>,

        /// Local date and time, e.g. 2025-03-01T09:30
        #[arg(short, long)]
        at: String,

        /// Media URL to attach
        #[arg(short, long)]
        media: Option<String>,

        /// Output format
        #[arg(short, long, value_enum, default_value = "text")]
        format: OutputFormat,
    },

    /// Delete a queued post
    Delete {
        /// Post ID
        post_id: String,

        /// Skip confirmation prompt
        #[arg(short, long)]
        force: bool,
    },

    /// Watch the queue and report publications
    Watch {
        /// Poll interval (e.g. "10s", "1m"); defaults to queue.poll_interval
        #[arg(short, long)]
        interval: Option<String>,

        /// Exit after the first poll
        #[arg(long)]
        once: bool,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum TabArg {
    Upcoming,
    History,
    All,
}

impl TabArg {
    fn includes(self, status: PostStatus) -> bool {
        match self {
            TabArg::Upcoming => QueueTab::Upcoming.includes(status),
            TabArg::History => QueueTab::History.includes(status),
            TabArg::All => true,
        }
    }
}

const DELETE_CONFIRM: &str = "Are you sure you want to delete this post? [y/N] ";

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    if let Err(e) = libsocialcmd::logging::config_from_env(cli.verbose).init() {
        eprintln!("Error: failed to initialize logging: {}", e);
        std::process::exit(2);
    }

    if let Err(e) = run(cli).await {
        eprintln!("Error: {:#}", e);
        std::process::exit(exit_code(&e));
    }
}

/// Library errors carry their own code; anything else is an operation failure
fn exit_code(error: &anyhow::Error) -> i32 {
    error
        .downcast_ref::<SocialCmdError>()
        .map(SocialCmdError::exit_code)
        .unwrap_or(1)
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let config = Config::load()?;
    let service = SchedulerService::from_config(&config)?;
    debug!(base_url = %config.api.base_url, "Using backend");

    match cli.command {
        Commands::List {
            format,
            tab,
            platform,
            search,
        } => cmd_list(&service, format, tab, platform.as_deref(), search.as_deref()).await,
        Commands::Schedule {
            content,
            platforms,
            at,
            media,
            format,
        } => cmd_schedule(&service, &config, content, &platforms, &at, media.as_deref(), format).await,
        Commands::Delete { post_id, force } => cmd_delete(&service, &post_id, force).await,
        Commands::Watch { interval, once } => {
            let interval = match interval {
                Some(raw) => parse_interval(&raw)?,
                None => config.poll_interval()?,
            };
            cmd_watch(&service, interval, once).await
        }
    }
}

fn parse_interval(raw: &str) -> Result<Duration, SocialCmdError> {
    let interval = humantime::parse_duration(raw).map_err(|e| {
        SocialCmdError::InvalidInput(format!("Invalid interval '{}': {}", raw, e))
    })?;
    if interval.is_zero() {
        return Err(SocialCmdError::InvalidInput(
            "Interval must be greater than zero".to_string(),
        ));
    }
    Ok(interval)
}

/// List posts
async fn cmd_list(
    service: &SchedulerService,
    format: OutputFormat,
    tab: TabArg,
    platform: Option<&str>,
    query: Option<&str>,
) -> anyhow::Result<()> {
    let posts = service.api().list_posts().await?;

    let platform = platform.map(str::to_lowercase);
    let selected: Vec<&QueuedPost> = search(&posts, query.unwrap_or(""))
        .into_iter()
        .filter(|p| tab.includes(p.status))
        .filter(|p| {
            platform
                .as_deref()
                .map_or(true, |wanted| p.platform.eq_ignore_ascii_case(wanted))
        })
        .collect();

    match format {
        OutputFormat::Json => output_json(&selected)?,
        OutputFormat::Text => output_list_text(&selected),
    }

    Ok(())
}

fn output_json<T: serde::Serialize + ?Sized>(value: &T) -> anyhow::Result<()> {
    let json = serde_json::to_string_pretty(value).context("Failed to serialize output")?;
    println!("{}", json);
    Ok(())
}

/// One post per line: id, time, platform, status, content
fn output_list_text(posts: &[&QueuedPost]) {
    let now = chrono::Utc::now().timestamp();

    for post in posts {
        let when = post
            .scheduled_at
            .with_timezone(&chrono::Local)
            .format("%Y-%m-%d %H:%M");
        let status = match post.status {
            PostStatus::Pending => format_time_until(now, post.scheduled_at.timestamp()),
            other => other.to_string(),
        };

        println!(
            "{} | {} | {} | {} | {}",
            post.id,
            when,
            PlatformCatalog::display_name_for(&post.platform),
            status,
            truncate_content(&post.content, 50)
        );
    }
}

/// Truncate content to `max_chars` characters with an ellipsis
fn truncate_content(content: &str, max_chars: usize) -> String {
    let flat = content.replace('\n', " ");
    if flat.chars().count() <= max_chars {
        flat
    } else {
        let head: String = flat.chars().take(max_chars).collect();
        format!("{}...", head)
    }
}

/// Format time until scheduled time in human-readable format
fn format_time_until(now: i64, scheduled_at: i64) -> String {
    let diff = scheduled_at - now;

    if diff < 0 {
        return "overdue".to_string();
    }

    let minutes = diff / 60;
    let hours = minutes / 60;
    let days = hours / 24;

    if days > 0 {
        format!("in {} day{}", days, if days == 1 { "" } else { "s" })
    } else if hours > 0 {
        format!("in {} hour{}", hours, if hours == 1 { "" } else { "s" })
    } else if minutes > 0 {
        format!("in {} minute{}", minutes, if minutes == 1 { "" } else { "s" })
    } else {
        "in <1 minute".to_string()
    }
}

/// Schedule a post for every requested platform
async fn cmd_schedule(
    service: &SchedulerService,
    config: &Config,
    content: String,
    platforms: &[String],
    at: &str,
    media: Option<&str>,
    format: OutputFormat,
) -> anyhow::Result<()> {
    let platforms: Vec<PlatformId> = if platforms.is_empty() {
        config.default_platforms()?
    } else {
        platforms
            .iter()
            .map(|p| p.parse())
            .collect::<Result<_, SocialCmdError>>()?
    };

    let mut draft = PostDraft::with_platforms(platforms);
    draft.set_content(content);
    draft.set_schedule_input(at)?;
    if let Some(url) = media {
        draft.set_media_url(url);
    }

    let created = service.submit(&draft).await?;
    info!(count = created.len(), "Posts scheduled");

    match format {
        OutputFormat::Json => output_json(&created)?,
        OutputFormat::Text => {
            for post in &created {
                println!(
                    "{} | {}",
                    post.id,
                    PlatformCatalog::display_name_for(&post.platform)
                );
            }
        }
    }

    Ok(())
}

/// Delete a post after confirmation
async fn cmd_delete(service: &SchedulerService, post_id: &str, force: bool) -> anyhow::Result<()> {
    let post_id = post_id.trim();
    if post_id.is_empty() {
        return Err(SocialCmdError::InvalidInput("Post ID cannot be empty".to_string()).into());
    }
    let id = PostId::new(post_id);

    let confirmation = if force {
        Confirmation::Confirmed
    } else {
        Confirmation::from(prompt_confirm(DELETE_CONFIRM)?)
    };

    match service.delete(&id, confirmation).await? {
        DeleteOutcome::Deleted => println!("Deleted post {}", id),
        DeleteOutcome::Cancelled => eprintln!("Cancelled"),
    }

    Ok(())
}

/// Ask on stderr, read the answer from stdin; anything but y/yes declines
fn prompt_confirm(prompt: &str) -> anyhow::Result<bool> {
    let mut stderr = std::io::stderr();
    write!(stderr, "{}", prompt).context("Failed to write prompt")?;
    stderr.flush().context("Failed to write prompt")?;

    let mut answer = String::new();
    std::io::stdin()
        .lock()
        .read_line(&mut answer)
        .context("Failed to read confirmation")?;

    Ok(matches!(answer.trim().to_lowercase().as_str(), "y" | "yes"))
}

/// Poll the queue and print a line per published post
async fn cmd_watch(service: &SchedulerService, interval: Duration, once: bool) -> anyhow::Result<()> {
    let shutdown = Arc::new(AtomicBool::new(false));
    setup_signal_handlers(shutdown.clone())?;

    let mut events = service.subscribe();
    let mut queue = service.start_queue_sync(interval);
    info!(interval = %humantime::format_duration(interval), "Watching queue");

    let mut check = tokio::time::interval(Duration::from_millis(250));

    loop {
        if shutdown.load(Ordering::Relaxed) {
            info!("Shutdown requested, stopping queue watch");
            break;
        }

        tokio::select! {
            event = events.recv() => match event {
                Ok(Event::PostPublished { post_id, platform_name, .. }) => {
                    println!("Post {} published to {}", post_id, platform_name);
                }
                Ok(Event::QueueUpdated { posts }) => {
                    debug!(count = posts.len(), "Queue refreshed");
                    if once {
                        break;
                    }
                }
                Ok(Event::QueueFetchFailed { error }) => {
                    if once {
                        queue.shutdown().await;
                        return Err(anyhow::anyhow!("Failed to fetch queue: {}", error));
                    }
                }
                Ok(_) => {}
                Err(tokio::sync::broadcast::error::RecvError::Lagged(skipped)) => {
                    tracing::warn!("Missed {} queue events", skipped);
                }
                Err(tokio::sync::broadcast::error::RecvError::Closed) => break,
            },
            _ = check.tick() => {}
        }
    }

    queue.shutdown().await;
    Ok(())
}

/// Set up signal handlers for graceful shutdown
fn setup_signal_handlers(shutdown: Arc<AtomicBool>) -> anyhow::Result<()> {
    use signal_hook::consts::{SIGINT, SIGTERM};
    use signal_hook::iterator::Signals;

    let mut signals = Signals::new([SIGINT, SIGTERM]).context("Signal setup failed")?;

    std::thread::spawn(move || {
        if signals.forever().next().is_some() {
            info!("Received shutdown signal, stopping gracefully...");
            shutdown.store(true, Ordering::Relaxed);
        }
    });

    Ok(())
}
