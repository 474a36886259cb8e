mod app;
mod autoplay;
mod config;
mod error;
mod input;
mod library;
mod logging;
mod lyrics;
mod player;
mod playlist;
mod remote;
mod startup;
mod storage;
mod tui;

use anyhow::Context;
use clap::{Parser, Subcommand};
use std::time::Duration;

#[derive(Debug, Parser)]
#[command(
    name = "vibefi",
    version,
    about = "Terminal music player for local files and online audio",
    args_conflicts_with_subcommands = true
)]
struct Cli {
    /// Override config file path.
    #[arg(long, global = true)]
    config: Option<std::path::PathBuf>,

    /// Files or URLs to start playing right away.
    inputs: Vec<String>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Search online and print the results (headless).
    Search { query: String },
    /// List saved playlists (headless).
    Playlists,
    /// Fetch lyrics and print them (headless).
    Lyrics {
        /// "Artist - Title", or just the title together with --artist.
        title: String,
        #[arg(long)]
        artist: Option<String>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let cfg = config::load(cli.config.as_deref()).context("load config")?;
    let cfg_path = match cli.config.clone() {
        Some(p) => p,
        None => config::default_config_path().context("default config path")?,
    };
    let _log_guard = logging::init(&cfg.paths.data_dir).context("init logging")?;

    match cli.command {
        None => {
            let mut app = app::App::start(cfg, cfg_path).await?;
            app.open_inputs(&cli.inputs).await;
            let mut terminal = tui::TerminalGuard::enter().context("init terminal")?;
            app.run(terminal.terminal_mut()).await?;
        }
        Some(Command::Search { query }) => {
            let results = remote::search(&query, cfg.search.limit).await?;
            if results.is_empty() {
                println!("No results found.");
            }
            for (i, r) in results.iter().enumerate() {
                println!("{:02}. {}  [{}]  {}", i + 1, r.title, r.duration, r.reference);
            }
        }
        Some(Command::Playlists) => {
            let store = playlist::PlaylistStore::open(cfg.playlists_dir())?;
            let list = store.list_all()?;
            if list.is_empty() {
                println!("No playlists.");
            }
            for p in list {
                println!("{}  ({} songs)", p.name, p.song_count);
            }
        }
        Some(Command::Lyrics { title, artist }) => {
            let Some(key) = lyrics::lookup_key(&title, artist.as_deref(), None) else {
                println!("{}", lyrics::MSG_NO_ARTIST);
                return Ok(());
            };
            let client = lyrics::LrclibClient::new(&cfg.lyrics.base_url, Duration::from_secs(cfg.lyrics.timeout_secs))?;
            let cache = storage::CacheHandle::new(cfg.cache_path());
            let data = lyrics::fetch(&client, Some(&cache), &key).await?;
            if data.has_synced {
                for line in &data.synced {
                    let secs = line.timestamp.max(0.0);
                    println!("[{:02}:{:05.2}] {}", (secs / 60.0).floor() as u64, secs % 60.0, line.text);
                }
            } else {
                println!("{}", data.plain);
            }
        }
    }

    Ok(())
}
