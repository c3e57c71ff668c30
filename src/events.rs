/// Commands from the rendering surface into the breed directory task.
#[derive(Debug, Clone)]
pub enum DirectoryCommand {
    /// Replace the search query, subject to the configured debounce.
    SetQuery(String),
    /// Commit an empty query immediately, dropping any pending update.
    ClearQuery,
    /// Refetch the breed list after an upstream failure.
    Retry,
}

/// Commands from the rendering surface into the image gallery task.
#[derive(Debug, Clone)]
pub enum GalleryCommand {
    /// Open the carousel at a grid index.
    Select(usize),
    Next,
    Previous,
    CloseCarousel,
    /// The image at an index finished loading.
    ImageLoaded(usize),
    /// The image at an index failed to load or decode.
    ImageErrored(usize),
    /// Refetch the image list after an upstream failure.
    Retry,
}
