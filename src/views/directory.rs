use std::sync::Arc;

use crate::api::Breed;
use crate::search::{SearchStore, filter_breeds};

/// Lifecycle of the breed list fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DirectoryPhase {
    Loading,
    Ready,
    Failed,
}

/// Read-only snapshot for the rendering surface. `breeds` holds the rows
/// that survive the current query.
#[derive(Debug, Clone, PartialEq)]
pub struct DirectorySnapshot {
    pub phase: DirectoryPhase,
    pub query: String,
    pub breeds: Vec<Breed>,
}

impl DirectorySnapshot {
    /// `Ready` with every row filtered away by a non-empty query; rendered
    /// as "no breeds found matching …", distinct from a failed fetch.
    pub fn is_no_match(&self) -> bool {
        self.phase == DirectoryPhase::Ready && self.breeds.is_empty() && !self.query.is_empty()
    }
}

/// Breed list view model: the fetched list, the committed query, and the
/// filtered rows derived from both.
///
/// The full list is fetched once per mount; the persisted query is restored
/// when it arrives and every committed change is written back through the
/// injected store.
pub struct BreedDirectory {
    store: Arc<dyn SearchStore>,
    phase: DirectoryPhase,
    breeds: Vec<Breed>,
    query: String,
    filtered: Vec<Breed>,
}

impl BreedDirectory {
    pub fn new(store: Arc<dyn SearchStore>) -> Self {
        Self {
            store,
            phase: DirectoryPhase::Loading,
            breeds: Vec::new(),
            query: String::new(),
            filtered: Vec::new(),
        }
    }

    /// The breed list arrived: restore the session's query and filter.
    pub fn breeds_loaded(&mut self, breeds: Vec<Breed>) {
        self.query = self.store.get();
        self.filtered = filter_breeds(&breeds, &self.query);
        self.breeds = breeds;
        self.phase = DirectoryPhase::Ready;
    }

    /// Upstream failure or timeout; no partial data is kept.
    pub fn load_failed(&mut self) {
        self.phase = DirectoryPhase::Failed;
        self.breeds.clear();
        self.filtered.clear();
    }

    pub fn reloading(&mut self) {
        self.phase = DirectoryPhase::Loading;
    }

    /// Commit a query: persist it (an empty query removes the entry) and
    /// refilter the list.
    pub fn commit_query(&mut self, query: String) {
        self.store.set(&query);
        self.filtered = filter_breeds(&self.breeds, &query);
        self.query = query;
    }

    pub fn clear_query(&mut self) {
        self.commit_query(String::new());
    }

    pub fn phase(&self) -> DirectoryPhase {
        self.phase
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn snapshot(&self) -> DirectorySnapshot {
        DirectorySnapshot {
            phase: self.phase,
            query: self.query.clone(),
            breeds: self.filtered.clone(),
        }
    }
}
