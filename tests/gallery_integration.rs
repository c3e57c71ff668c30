use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use breed_browser::api::{ApiError, Breed, BreedProvider, ImageUrl};
use breed_browser::config::Configuration;
use breed_browser::events::GalleryCommand;
use breed_browser::grid::CellRender;
use breed_browser::tasks::gallery;
use breed_browser::views::gallery::{GalleryPhase, GallerySnapshot};
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

/// Answers every image request with the same fixed list.
struct StaticProvider {
    images: Vec<ImageUrl>,
}

#[async_trait]
impl BreedProvider for StaticProvider {
    async fn list_breeds(&self) -> Result<Vec<Breed>, ApiError> {
        Ok(Vec::new())
    }

    async fn list_images(&self, _breed: &str, _count: usize) -> Result<Vec<ImageUrl>, ApiError> {
        Ok(self.images.clone())
    }
}

/// Fails a configured number of image fetches before answering.
struct RecoveringProvider {
    bad_calls: Mutex<usize>,
    images: Vec<ImageUrl>,
}

#[async_trait]
impl BreedProvider for RecoveringProvider {
    async fn list_breeds(&self) -> Result<Vec<Breed>, ApiError> {
        Ok(Vec::new())
    }

    async fn list_images(&self, _breed: &str, _count: usize) -> Result<Vec<ImageUrl>, ApiError> {
        let mut left = self.bad_calls.lock().unwrap();
        if *left > 0 {
            *left -= 1;
            return Err(ApiError::Api("error".to_string()));
        }
        Ok(self.images.clone())
    }
}

fn urls(n: usize) -> Vec<ImageUrl> {
    (0..n).map(|i| format!("https://images.test/{i}.jpg")).collect()
}

struct Harness {
    commands: mpsc::Sender<GalleryCommand>,
    snapshots: mpsc::Receiver<GallerySnapshot>,
    cancel: CancellationToken,
    task: tokio::task::JoinHandle<anyhow::Result<()>>,
}

fn spawn(cfg: Configuration, provider: Arc<dyn BreedProvider>, breed: &str) -> Harness {
    let (cmd_tx, cmd_rx) = mpsc::channel(16);
    let (snap_tx, snap_rx) = mpsc::channel(16);
    let cancel = CancellationToken::new();
    let task = tokio::spawn(gallery::run(
        cfg,
        provider,
        breed.to_string(),
        cmd_rx,
        snap_tx,
        cancel.clone(),
    ));
    Harness {
        commands: cmd_tx,
        snapshots: snap_rx,
        cancel,
        task,
    }
}

fn quick_transitions() -> Configuration {
    Configuration {
        transition: Duration::from_millis(200),
        backward_settle: Duration::from_millis(10),
        ..Default::default()
    }
}

impl Harness {
    async fn next_snapshot(&mut self) -> GallerySnapshot {
        tokio::time::timeout(Duration::from_secs(2), self.snapshots.recv())
            .await
            .expect("timeout waiting for snapshot")
            .expect("snapshot channel closed")
    }

    async fn expect_quiet(&mut self, window: Duration) {
        let quiet = tokio::time::timeout(window, self.snapshots.recv()).await;
        assert!(quiet.is_err(), "unexpected snapshot: {:?}", quiet);
    }

    async fn shutdown(self) {
        self.cancel.cancel();
        let _ = self.task.await;
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn an_empty_image_fetch_is_the_empty_state_not_an_error() {
    let provider = Arc::new(StaticProvider { images: Vec::new() });
    let mut harness = spawn(Configuration::default(), provider, "invalidbreed");

    let snapshot = harness.next_snapshot().await;
    assert_eq!(snapshot.phase, GalleryPhase::Empty);
    assert!(snapshot.images.is_empty());
    assert!(snapshot.carousel.is_none());

    harness.shutdown().await;
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn upstream_failure_is_failed_and_retry_recovers() {
    let provider = Arc::new(RecoveringProvider {
        bad_calls: Mutex::new(1),
        images: urls(3),
    });
    let mut harness = spawn(Configuration::default(), provider, "akita");

    let snapshot = harness.next_snapshot().await;
    assert_eq!(snapshot.phase, GalleryPhase::Failed);
    assert!(snapshot.images.is_empty(), "no partial data on failure");

    harness.commands.send(GalleryCommand::Retry).await.unwrap();
    let snapshot = harness.next_snapshot().await;
    assert_eq!(snapshot.phase, GalleryPhase::Loading);
    let snapshot = harness.next_snapshot().await;
    assert_eq!(snapshot.phase, GalleryPhase::Ready);
    assert_eq!(snapshot.images, urls(3));

    harness.shutdown().await;
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn selecting_the_last_cell_and_advancing_wraps_to_the_first() {
    let provider = Arc::new(StaticProvider { images: urls(3) });
    let mut harness = spawn(quick_transitions(), provider, "akita");
    let _ = harness.next_snapshot().await;

    harness.commands.send(GalleryCommand::Select(2)).await.unwrap();
    let snapshot = harness.next_snapshot().await;
    let carousel = snapshot.carousel.expect("carousel open");
    assert_eq!(carousel.current_index, 2);
    assert!(!carousel.is_animating);

    harness.commands.send(GalleryCommand::Next).await.unwrap();
    let snapshot = harness.next_snapshot().await;
    let carousel = snapshot.carousel.expect("carousel open");
    assert!(carousel.is_animating);
    assert_eq!(carousel.current_index, 2, "index advances only at resolution");

    let snapshot = harness.next_snapshot().await;
    let carousel = snapshot.carousel.expect("carousel open");
    assert!(!carousel.is_animating);
    assert_eq!(carousel.current_index, 0, "forward wrap lands on slide 0");

    harness.shutdown().await;
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn backing_up_from_the_first_cell_wraps_to_the_last() {
    let provider = Arc::new(StaticProvider { images: urls(3) });
    let mut harness = spawn(quick_transitions(), provider, "akita");
    let _ = harness.next_snapshot().await;

    harness.commands.send(GalleryCommand::Select(0)).await.unwrap();
    let _ = harness.next_snapshot().await;

    harness.commands.send(GalleryCommand::Previous).await.unwrap();
    let snapshot = harness.next_snapshot().await;
    assert!(snapshot.carousel.expect("carousel open").is_animating);

    let snapshot = harness.next_snapshot().await;
    let carousel = snapshot.carousel.expect("carousel open");
    assert!(!carousel.is_animating);
    assert_eq!(carousel.current_index, 2, "backward wrap lands on the last slide");

    harness.shutdown().await;
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn navigation_while_animating_is_silently_dropped() {
    let provider = Arc::new(StaticProvider { images: urls(3) });
    let mut harness = spawn(quick_transitions(), provider, "akita");
    let _ = harness.next_snapshot().await;

    harness.commands.send(GalleryCommand::Select(0)).await.unwrap();
    let _ = harness.next_snapshot().await;

    harness.commands.send(GalleryCommand::Next).await.unwrap();
    harness.commands.send(GalleryCommand::Next).await.unwrap();

    let snapshot = harness.next_snapshot().await;
    assert!(snapshot.carousel.expect("carousel open").is_animating);

    let snapshot = harness.next_snapshot().await;
    let carousel = snapshot.carousel.expect("carousel open");
    assert_eq!(carousel.current_index, 1, "only the first request advances");
    assert!(!carousel.is_animating);

    // The rejected request produced no further transition.
    harness.expect_quiet(Duration::from_millis(300)).await;

    harness.shutdown().await;
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn closing_the_carousel_discards_the_pending_transition() {
    let provider = Arc::new(StaticProvider { images: urls(3) });
    let mut harness = spawn(quick_transitions(), provider, "akita");
    let _ = harness.next_snapshot().await;

    harness.commands.send(GalleryCommand::Select(1)).await.unwrap();
    let _ = harness.next_snapshot().await;
    harness.commands.send(GalleryCommand::Next).await.unwrap();
    let _ = harness.next_snapshot().await;

    harness
        .commands
        .send(GalleryCommand::CloseCarousel)
        .await
        .unwrap();
    let snapshot = harness.next_snapshot().await;
    assert!(snapshot.carousel.is_none());

    // No late resolution sneaks out after the close.
    harness.expect_quiet(Duration::from_millis(300)).await;

    harness.shutdown().await;
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn a_failed_cell_stays_failed_and_does_not_disturb_siblings() {
    let provider = Arc::new(StaticProvider { images: urls(3) });
    let mut harness = spawn(Configuration::default(), provider, "akita");
    let snapshot = harness.next_snapshot().await;
    assert_eq!(snapshot.cells, vec![CellRender::LoadingOverlay; 3]);

    harness
        .commands
        .send(GalleryCommand::ImageErrored(1))
        .await
        .unwrap();
    let _ = harness.next_snapshot().await;
    harness
        .commands
        .send(GalleryCommand::ImageLoaded(1))
        .await
        .unwrap();
    let _ = harness.next_snapshot().await;
    harness
        .commands
        .send(GalleryCommand::ImageLoaded(0))
        .await
        .unwrap();
    let snapshot = harness.next_snapshot().await;

    assert_eq!(snapshot.phase, GalleryPhase::Ready);
    assert_eq!(snapshot.cells[0], CellRender::Image);
    assert_eq!(snapshot.cells[1], CellRender::Fallback, "errors are sticky");
    assert_eq!(snapshot.cells[2], CellRender::LoadingOverlay);

    harness.shutdown().await;
}
