use std::sync::Arc;
use std::time::Instant;

use anyhow::Result;
use tokio::select;
use tokio::sync::mpsc::{Receiver, Sender};
use tokio::time::{sleep_until, timeout};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::api::BreedProvider;
use crate::config::Configuration;
use crate::events::GalleryCommand;
use crate::views::gallery::{GallerySnapshot, ImageGallery};

/// Owns the image gallery view for one breed: fetches the image list, tracks
/// per-cell load state, and drives the carousel's transition deadlines.
///
/// Rules:
/// - Every accepted state change publishes a fresh snapshot.
/// - Rejected navigation (animation lock, no carousel open) publishes
///   nothing; it is a defined no-op, not an error.
/// - A fetch exceeding the configured timeout counts as an upstream failure.
pub async fn run(
    cfg: Configuration,
    provider: Arc<dyn BreedProvider>,
    breed: String,
    mut commands: Receiver<GalleryCommand>,
    snapshots: Sender<GallerySnapshot>,
    cancel: CancellationToken,
) -> Result<()> {
    let mut view = ImageGallery::new(breed, cfg.carousel_timings());
    fetch(&cfg, provider.as_ref(), &mut view).await;
    if snapshots.send(view.snapshot()).await.is_err() {
        return Ok(());
    }

    loop {
        let deadline = view.next_deadline().map(tokio::time::Instant::from_std);
        select! {
            _ = cancel.cancelled() => break,

            _ = sleep_until(deadline.unwrap_or_else(tokio::time::Instant::now)), if deadline.is_some() => {
                if let Some(index) = view.tick(Instant::now()) {
                    debug!(index, "slide resolved");
                    if snapshots.send(view.snapshot()).await.is_err() {
                        break;
                    }
                }
            }

            maybe_cmd = commands.recv() => {
                let Some(cmd) = maybe_cmd else {
                    debug!("command channel closed");
                    break;
                };
                let changed = match cmd {
                    GalleryCommand::Select(index) => view.select_index(index),
                    GalleryCommand::Next => view.next(Instant::now()),
                    GalleryCommand::Previous => view.previous(Instant::now()),
                    GalleryCommand::CloseCarousel => {
                        view.close_carousel();
                        true
                    }
                    GalleryCommand::ImageLoaded(index) => {
                        view.mark_loaded(index);
                        true
                    }
                    GalleryCommand::ImageErrored(index) => {
                        view.mark_errored(index);
                        true
                    }
                    GalleryCommand::Retry => {
                        view.reloading();
                        if snapshots.send(view.snapshot()).await.is_err() {
                            break;
                        }
                        fetch(&cfg, provider.as_ref(), &mut view).await;
                        true
                    }
                };
                if changed && snapshots.send(view.snapshot()).await.is_err() {
                    break;
                }
            }
        }
    }
    Ok(())
}

async fn fetch(cfg: &Configuration, provider: &dyn BreedProvider, view: &mut ImageGallery) {
    let breed = view.breed().to_string();
    let fetched = timeout(cfg.fetch_timeout, provider.list_images(&breed, cfg.image_count)).await;
    match fetched {
        Ok(Ok(images)) => {
            info!(breed = %breed, count = images.len(), "image list fetched");
            view.images_loaded(images);
        }
        Ok(Err(err)) => {
            warn!(breed = %breed, error = %err, "image list fetch failed");
            view.load_failed();
        }
        Err(_) => {
            warn!(breed = %breed, timeout = ?cfg.fetch_timeout, "image list fetch timed out");
            view.load_failed();
        }
    }
}
