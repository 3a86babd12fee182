//! `shichou`: run the extraction pipeline against a saved page.

mod logging;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use shichou_bridge::{DataBridge, FalcorCache, PageChannel, PageResponder};
use shichou_core::watcher::WatcherSettings;
use shichou_core::{AppConfig, ControlHandler, ControlMessage, LogSink, MediaAssembler, ProgressWatcher};
use shichou_detect::{HtmlPage, PlaybackState};
use tokio::sync::watch;

#[derive(Parser)]
#[command(name = "shichou")]
#[command(about = "Extract media metadata from saved streaming pages")]
#[command(version)]
struct Cli {
    /// Log filter, e.g. `info` or `shichou=debug` (RUST_LOG takes precedence)
    #[arg(long, global = true)]
    log_level: Option<String>,

    /// Write logs to this file instead of stderr
    #[arg(long, global = true)]
    log_file: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Extract a media record and print the control-surface response
    Extract(PageArgs),

    /// Run watcher ticks against a page with a fixed playback position
    Watch {
        #[command(flatten)]
        page: PageArgs,

        /// Playback position in seconds
        #[arg(long)]
        position: f64,

        /// Media duration in seconds
        #[arg(long)]
        duration: f64,

        /// Number of ticks to run
        #[arg(long, default_value_t = 2)]
        ticks: u32,
    },
}

#[derive(Args)]
struct PageArgs {
    /// Saved page HTML
    #[arg(long)]
    html: PathBuf,

    /// URL the page was served at
    #[arg(long)]
    url: String,

    /// JSON dump of the page's falcor cache, served through the bridge
    #[arg(long)]
    cache: Option<PathBuf>,

    /// Config file (defaults to the user config, then built-ins)
    #[arg(long)]
    config: Option<PathBuf>,
}

/// Everything a command needs for one page.
struct Session {
    config: AppConfig,
    page: HtmlPage,
    assembler: Arc<MediaAssembler>,
    bridge: DataBridge,
}

impl Session {
    fn open(args: &PageArgs) -> anyhow::Result<Self> {
        let config = match &args.config {
            Some(path) => AppConfig::load_from(path)
                .with_context(|| format!("loading config {}", path.display()))?,
            None => AppConfig::load().context("loading config")?,
        };
        let assembler = Arc::new(MediaAssembler::from_config(&config)?);

        let html = read(&args.html)?;
        let page = HtmlPage::parse(&html, args.url.clone());

        let channel = PageChannel::new();
        if let Some(path) = &args.cache {
            let cache = FalcorCache::from_json(&read(path)?)
                .with_context(|| format!("parsing cache {}", path.display()))?;
            // A saved page never navigates, so the location sender is dropped.
            let (_, location) = watch::channel(args.url.clone());
            PageResponder::new(cache).spawn(channel.clone(), location);
        }
        let bridge = DataBridge::new(channel).with_timeout(config.bridge_timeout());
        tracing::info!(
            url = %args.url,
            html = %args.html.display(),
            with_cache = args.cache.is_some(),
            "Page session opened"
        );

        Ok(Self {
            config,
            page,
            assembler,
            bridge,
        })
    }
}

fn read(path: &Path) -> anyhow::Result<String> {
    std::fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let _guard = logging::init(cli.log_level.as_deref(), cli.log_file.as_deref())?;

    match cli.command {
        Command::Extract(args) => {
            let session = Session::open(&args)?;
            let handler = ControlHandler::new(session.assembler, session.bridge);
            let response = handler
                .handle(&session.page, ControlMessage::ExtractData)
                .await;
            println!("{}", serde_json::to_string_pretty(&response)?);
        }
        Command::Watch {
            page,
            position,
            duration,
            ticks,
        } => {
            let session = Session::open(&page)?;
            let page = session.page.with_playback(PlaybackState {
                current_time: position,
                duration,
            });
            let watcher = ProgressWatcher::new(
                session.assembler,
                session.bridge,
                LogSink,
                WatcherSettings::from(&session.config),
            );
            for n in 1..=ticks {
                let outcome = watcher.tick(&page).await;
                tracing::debug!(tick = n, state = ?watcher.state(), "Watcher tick finished");
                println!("tick {n}: {outcome:?}");
            }
        }
    }
    Ok(())
}
