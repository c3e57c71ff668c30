use std::sync::Arc;

use anyhow::Result;
use tokio::select;
use tokio::sync::mpsc::{Receiver, Sender};
use tokio::time::{Instant, sleep_until, timeout};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::api::BreedProvider;
use crate::config::Configuration;
use crate::events::DirectoryCommand;
use crate::search::SearchStore;
use crate::views::directory::{BreedDirectory, DirectorySnapshot};

/// Owns the breed directory view for one mount: fetches the list once,
/// restores the session's search, and commits (possibly debounced) query
/// updates.
///
/// Rules:
/// - Every accepted state change publishes a fresh snapshot; superseded
///   keystrokes publish nothing.
/// - A pending debounced query is replaced by any newer keystroke before it
///   fires; only the most recent value is ever committed.
/// - A fetch exceeding the configured timeout counts as an upstream failure.
pub async fn run(
    cfg: Configuration,
    provider: Arc<dyn BreedProvider>,
    store: Arc<dyn SearchStore>,
    mut commands: Receiver<DirectoryCommand>,
    snapshots: Sender<DirectorySnapshot>,
    cancel: CancellationToken,
) -> Result<()> {
    let mut view = BreedDirectory::new(store);
    fetch(&cfg, provider.as_ref(), &mut view).await;
    if snapshots.send(view.snapshot()).await.is_err() {
        return Ok(());
    }

    // Pending debounced query and its commit deadline.
    let mut pending: Option<(String, Instant)> = None;

    loop {
        let deadline = pending.as_ref().map(|(_, at)| *at);
        select! {
            _ = cancel.cancelled() => break,

            _ = sleep_until(deadline.unwrap_or_else(Instant::now)), if deadline.is_some() => {
                if let Some((query, _)) = pending.take() {
                    view.commit_query(query);
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
                match cmd {
                    DirectoryCommand::SetQuery(query) => {
                        if cfg.search_debounce.is_zero() {
                            pending = None;
                            view.commit_query(query);
                            if snapshots.send(view.snapshot()).await.is_err() {
                                break;
                            }
                        } else {
                            // Last write wins; a previous pending update is dropped.
                            pending = Some((query, Instant::now() + cfg.search_debounce));
                        }
                    }
                    DirectoryCommand::ClearQuery => {
                        pending = None;
                        view.clear_query();
                        if snapshots.send(view.snapshot()).await.is_err() {
                            break;
                        }
                    }
                    DirectoryCommand::Retry => {
                        pending = None;
                        view.reloading();
                        if snapshots.send(view.snapshot()).await.is_err() {
                            break;
                        }
                        fetch(&cfg, provider.as_ref(), &mut view).await;
                        if snapshots.send(view.snapshot()).await.is_err() {
                            break;
                        }
                    }
                }
            }
        }
    }
    Ok(())
}

async fn fetch(cfg: &Configuration, provider: &dyn BreedProvider, view: &mut BreedDirectory) {
    match timeout(cfg.fetch_timeout, provider.list_breeds()).await {
        Ok(Ok(breeds)) => {
            info!(count = breeds.len(), "breed list fetched");
            view.breeds_loaded(breeds);
        }
        Ok(Err(err)) => {
            warn!(error = %err, "breed list fetch failed");
            view.load_failed();
        }
        Err(_) => {
            warn!(timeout = ?cfg.fetch_timeout, "breed list fetch timed out");
            view.load_failed();
        }
    }
}
