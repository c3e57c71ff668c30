use std::time::Instant;

use tracing::debug;

use crate::api::ImageUrl;
use crate::carousel::{CarouselController, CarouselState, CarouselTimings};
use crate::grid::{CellRender, ImageLoadTracker};

/// Lifecycle of the image list fetch. A successful fetch with zero images
/// is the distinct `Empty` state, not a failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GalleryPhase {
    Loading,
    Ready,
    Empty,
    Failed,
}

/// Read-only snapshot for the rendering surface.
#[derive(Debug, Clone, PartialEq)]
pub struct GallerySnapshot {
    pub phase: GalleryPhase,
    pub images: Vec<ImageUrl>,
    pub cells: Vec<CellRender>,
    pub carousel: Option<CarouselState>,
}

/// Breed detail view model: the fetched image list, per-cell load state,
/// and the carousel opened from a grid cell.
pub struct ImageGallery {
    breed: String,
    timings: CarouselTimings,
    phase: GalleryPhase,
    images: Vec<ImageUrl>,
    tracker: ImageLoadTracker,
    carousel: Option<CarouselController>,
}

impl ImageGallery {
    pub fn new(breed: impl Into<String>, timings: CarouselTimings) -> Self {
        Self {
            breed: breed.into(),
            timings,
            phase: GalleryPhase::Loading,
            images: Vec::new(),
            tracker: ImageLoadTracker::new(0),
            carousel: None,
        }
    }

    pub fn breed(&self) -> &str {
        &self.breed
    }

    /// The image list arrived; the tracker is sized once for its lifetime.
    pub fn images_loaded(&mut self, images: Vec<ImageUrl>) {
        self.tracker = ImageLoadTracker::new(images.len());
        self.phase = if images.is_empty() {
            GalleryPhase::Empty
        } else {
            GalleryPhase::Ready
        };
        self.images = images;
        self.carousel = None;
    }

    /// Upstream failure or timeout; no partial data is kept.
    pub fn load_failed(&mut self) {
        self.phase = GalleryPhase::Failed;
        self.images.clear();
        self.tracker = ImageLoadTracker::new(0);
        self.carousel = None;
    }

    pub fn reloading(&mut self) {
        self.phase = GalleryPhase::Loading;
    }

    /// Open the carousel at a grid index; out-of-range selections and
    /// selections outside `Ready` are ignored.
    pub fn select_index(&mut self, index: usize) -> bool {
        if self.phase != GalleryPhase::Ready || index >= self.images.len() {
            debug!(index, "selection outside grid");
            return false;
        }
        self.carousel = Some(CarouselController::new(
            self.images.len(),
            index,
            self.timings,
        ));
        true
    }

    pub fn close_carousel(&mut self) {
        if let Some(carousel) = self.carousel.as_mut() {
            carousel.close();
        }
        self.carousel = None;
    }

    pub fn next(&mut self, now: Instant) -> bool {
        self.carousel
            .as_mut()
            .map(|carousel| carousel.next(now))
            .unwrap_or(false)
    }

    pub fn previous(&mut self, now: Instant) -> bool {
        self.carousel
            .as_mut()
            .map(|carousel| carousel.previous(now))
            .unwrap_or(false)
    }

    /// Resolve the carousel's in-flight transition once due.
    pub fn tick(&mut self, now: Instant) -> Option<usize> {
        self.carousel.as_mut().and_then(|carousel| carousel.tick(now))
    }

    pub fn next_deadline(&self) -> Option<Instant> {
        self.carousel
            .as_ref()
            .and_then(|carousel| carousel.next_deadline())
    }

    pub fn mark_loaded(&mut self, index: usize) {
        self.tracker.mark_loaded(index);
    }

    pub fn mark_errored(&mut self, index: usize) {
        self.tracker.mark_errored(index);
    }

    pub fn phase(&self) -> GalleryPhase {
        self.phase
    }

    pub fn snapshot(&self) -> GallerySnapshot {
        GallerySnapshot {
            phase: self.phase,
            images: self.images.clone(),
            cells: self.tracker.cells(),
            carousel: self.carousel.as_ref().map(|carousel| carousel.snapshot()),
        }
    }
}
