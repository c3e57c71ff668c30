use std::fs;
use std::io::ErrorKind;
use std::path::PathBuf;
use std::sync::Mutex;

use tracing::debug;

use crate::api::Breed;

/// Session-scoped storage for the directory's search query.
///
/// Injected into the directory view rather than reached for as a global, so
/// tests can substitute an in-memory fake. Reads never fail; an unavailable
/// medium degrades to "nothing persisted".
pub trait SearchStore: Send + Sync {
    /// The last persisted query, or empty when nothing is persisted.
    fn get(&self) -> String;

    /// Persist a non-empty query; an empty query removes the entry entirely.
    fn set(&self, query: &str);
}

/// File-backed store standing in for browser session storage.
pub struct SessionFileStore {
    path: PathBuf,
}

impl SessionFileStore {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    /// Default location under the OS temp directory.
    pub fn default_path() -> PathBuf {
        std::env::temp_dir().join("breed-browser").join("search")
    }
}

impl SearchStore for SessionFileStore {
    fn get(&self) -> String {
        fs::read_to_string(&self.path).unwrap_or_default()
    }

    fn set(&self, query: &str) {
        if query.is_empty() {
            match fs::remove_file(&self.path) {
                Ok(()) => {}
                Err(e) if e.kind() == ErrorKind::NotFound => {}
                Err(e) => {
                    debug!(path = %self.path.display(), error = %e, "failed to clear persisted search")
                }
            }
            return;
        }
        if let Some(parent) = self.path.parent() {
            if let Err(e) = fs::create_dir_all(parent) {
                debug!(path = %parent.display(), error = %e, "failed to create search store directory");
                return;
            }
        }
        if let Err(e) = fs::write(&self.path, query) {
            debug!(path = %self.path.display(), error = %e, "failed to persist search");
        }
    }
}

/// In-memory store for tests and persistence-free contexts.
#[derive(Default)]
pub struct MemoryStore {
    slot: Mutex<Option<String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_query(query: &str) -> Self {
        let store = Self::default();
        store.set(query);
        store
    }
}

impl SearchStore for MemoryStore {
    fn get(&self) -> String {
        self.slot
            .lock()
            .map(|slot| slot.clone().unwrap_or_default())
            .unwrap_or_default()
    }

    fn set(&self, query: &str) {
        if let Ok(mut slot) = self.slot.lock() {
            *slot = if query.is_empty() {
                None
            } else {
                Some(query.to_string())
            };
        }
    }
}

/// Case-insensitive substring filter over breed names.
///
/// Whitespace around the query is ignored and an empty (or whitespace-only)
/// query returns the input unchanged. The result is a subsequence of the
/// input in its original order.
pub fn filter_breeds(breeds: &[Breed], query: &str) -> Vec<Breed> {
    let needle = query.to_lowercase().trim().to_string();
    if needle.is_empty() {
        return breeds.to_vec();
    }
    breeds
        .iter()
        .filter(|breed| breed.name.to_lowercase().contains(&needle))
        .cloned()
        .collect()
}
