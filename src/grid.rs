use tracing::debug;

/// Indices below this request their image with elevated priority.
pub const PRIORITY_WINDOW: usize = 6;

/// Indices below this load eagerly; the rest defer until near the viewport.
pub const EAGER_WINDOW: usize = 12;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlotState {
    Pending,
    Loaded,
    Errored,
}

/// Fetch hint for a grid cell; presentational, not a correctness invariant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchPriority {
    High,
    Auto,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadingMode {
    Eager,
    Lazy,
}

/// What a grid cell should draw for the image at its index.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CellRender {
    /// Permanent fallback placeholder for a failed image.
    Fallback,
    /// Loading placeholder overlaid on the image element.
    LoadingOverlay,
    Image,
}

/// Per-index load/error bookkeeping for a fixed list of image URLs.
///
/// Notifications may arrive in any order and apply independently per index;
/// an error is terminal for that index's render lifetime.
#[derive(Debug)]
pub struct ImageLoadTracker {
    slots: Vec<SlotState>,
}

impl ImageLoadTracker {
    pub fn new(len: usize) -> Self {
        Self {
            slots: vec![SlotState::Pending; len],
        }
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn mark_loaded(&mut self, index: usize) {
        match self.slots.get_mut(index) {
            Some(slot) if *slot == SlotState::Errored => {
                debug!(index, "load notification after error; error is sticky")
            }
            Some(slot) => *slot = SlotState::Loaded,
            None => debug!(index, "load notification outside grid"),
        }
    }

    /// A load failure can arrive after a successful load (late decode
    /// failure) and overrides it.
    pub fn mark_errored(&mut self, index: usize) {
        match self.slots.get_mut(index) {
            Some(slot) => *slot = SlotState::Errored,
            None => debug!(index, "error notification outside grid"),
        }
    }

    pub fn is_loaded(&self, index: usize) -> bool {
        matches!(self.slots.get(index), Some(SlotState::Loaded))
    }

    pub fn is_errored(&self, index: usize) -> bool {
        matches!(self.slots.get(index), Some(SlotState::Errored))
    }

    pub fn render_state(&self, index: usize) -> CellRender {
        match self.slots.get(index) {
            Some(SlotState::Errored) => CellRender::Fallback,
            Some(SlotState::Loaded) => CellRender::Image,
            _ => CellRender::LoadingOverlay,
        }
    }

    pub fn cells(&self) -> Vec<CellRender> {
        (0..self.slots.len()).map(|i| self.render_state(i)).collect()
    }
}

pub fn fetch_priority(index: usize) -> FetchPriority {
    if index < PRIORITY_WINDOW {
        FetchPriority::High
    } else {
        FetchPriority::Auto
    }
}

pub fn loading_mode(index: usize) -> LoadingMode {
    if index < EAGER_WINDOW {
        LoadingMode::Eager
    } else {
        LoadingMode::Lazy
    }
}
