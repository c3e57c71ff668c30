//! Binary entrypoint for breed-browser.
//!
//! Delegates all logic to the library crate; no local modules here.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing_subscriber::EnvFilter;

use breed_browser::api::DogCeoClient;
use breed_browser::avatar;
use breed_browser::config::Configuration;
use breed_browser::events::DirectoryCommand;
use breed_browser::grid::{FetchPriority, LoadingMode, fetch_priority, loading_mode};
use breed_browser::search::SessionFileStore;
use breed_browser::tasks::{directory, gallery};
use breed_browser::views::directory::DirectoryPhase;
use breed_browser::views::gallery::GalleryPhase;

#[derive(Debug, Parser)]
#[command(
    name = "breed-browser",
    version,
    about = "Browse dog breeds and their photos via the dog.ceo API"
)]
struct Cli {
    /// Path to a YAML config file; built-in defaults apply when omitted.
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// List breeds, applying the session's persisted search or a new one.
    Breeds {
        /// Filter breeds by name; omit to restore the previous search.
        #[arg(long, value_name = "QUERY")]
        search: Option<String>,
    },
    /// List a breed's image URLs with their grid load hints.
    Images {
        /// Breed name as printed by `breeds`.
        breed: String,
        /// Override how many images to request.
        #[arg(long, value_name = "N")]
        count: Option<usize>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    // init tracing (RUST_LOG controls level, default = info)
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(false)
        .compact()
        .init();

    let cli = Cli::parse();
    let mut cfg = match &cli.config {
        Some(path) => Configuration::from_yaml_file(path)
            .with_context(|| format!("failed to load configuration from {}", path.display()))?,
        None => Configuration::default(),
    }
    .validated()
    .context("invalid configuration values")?;

    if let Command::Images { count: Some(n), .. } = &cli.command {
        cfg.image_count = *n;
        cfg = cfg.validated().context("invalid image count override")?;
    }

    let provider =
        Arc::new(DogCeoClient::new(&cfg.api_base_url).context("failed to build API client")?);

    match cli.command {
        Command::Breeds { search } => run_breeds(cfg, provider, search).await,
        Command::Images { breed, .. } => run_images(cfg, provider, breed).await,
    }
}

async fn run_breeds(
    cfg: Configuration,
    provider: Arc<DogCeoClient>,
    search: Option<String>,
) -> Result<()> {
    let store_path = cfg
        .search_store_path
        .clone()
        .unwrap_or_else(SessionFileStore::default_path);
    let store = Arc::new(SessionFileStore::new(store_path));

    let (cmd_tx, cmd_rx) = mpsc::channel(16);
    let (snap_tx, mut snap_rx) = mpsc::channel(16);
    let cancel = CancellationToken::new();
    let task = tokio::spawn(directory::run(
        cfg,
        provider,
        store,
        cmd_rx,
        snap_tx,
        cancel.clone(),
    ));

    let mut snapshot = snap_rx
        .recv()
        .await
        .context("directory task ended before publishing")?;
    if let Some(query) = search {
        cmd_tx
            .send(DirectoryCommand::SetQuery(query))
            .await
            .context("directory task is gone")?;
        snapshot = snap_rx
            .recv()
            .await
            .context("directory task ended before committing the search")?;
    }
    cancel.cancel();
    let _ = task.await;

    match snapshot.phase {
        DirectoryPhase::Failed => bail!("failed to load dog breeds; please try again later"),
        DirectoryPhase::Loading => bail!("breed list never finished loading"),
        DirectoryPhase::Ready => {}
    }
    if snapshot.breeds.is_empty() {
        if snapshot.query.is_empty() {
            println!("no breeds found");
        } else {
            println!("no breeds found matching {:?}", snapshot.query);
        }
        return Ok(());
    }
    for breed in &snapshot.breeds {
        match avatar::sub_breed_summary(breed) {
            Some(summary) => println!("{} {} ({summary})", avatar::dog_emoji(&breed.name), breed.name),
            None => println!("{} {}", avatar::dog_emoji(&breed.name), breed.name),
        }
    }
    Ok(())
}

async fn run_images(cfg: Configuration, provider: Arc<DogCeoClient>, breed: String) -> Result<()> {
    let (_cmd_tx, cmd_rx) = mpsc::channel(16);
    let (snap_tx, mut snap_rx) = mpsc::channel(16);
    let cancel = CancellationToken::new();
    let task = tokio::spawn(gallery::run(
        cfg,
        provider,
        breed.clone(),
        cmd_rx,
        snap_tx,
        cancel.clone(),
    ));

    let snapshot = snap_rx
        .recv()
        .await
        .context("gallery task ended before publishing")?;
    cancel.cancel();
    let _ = task.await;

    match snapshot.phase {
        GalleryPhase::Failed => bail!("failed to load images for {breed}; please try again later"),
        GalleryPhase::Loading => bail!("image list never finished loading"),
        GalleryPhase::Empty => {
            println!("no images found for {breed}");
            return Ok(());
        }
        GalleryPhase::Ready => {}
    }
    for (index, url) in snapshot.images.iter().enumerate() {
        let mode = match loading_mode(index) {
            LoadingMode::Eager => "eager",
            LoadingMode::Lazy => "lazy",
        };
        let priority = match fetch_priority(index) {
            FetchPriority::High => ", priority",
            FetchPriority::Auto => "",
        };
        println!("{index:>3} [{mode}{priority}] {url}");
    }
    Ok(())
}
