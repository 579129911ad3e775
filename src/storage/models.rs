use std::path::Path;

use rand::seq::SliceRandom;
use tracing::trace;

use crate::fs;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum EntryKind {
    #[default]
    Any,
    Files,
    Directories,
}

impl EntryKind {
    /// Checked against the live filesystem, so a path that vanished or
    /// changed kind since it was tagged does not match `Files`/`Directories`.
    pub fn matches(&self, path: &Path) -> bool {
        match self {
            EntryKind::Any => true,
            EntryKind::Files => fs::is_regular(path),
            EntryKind::Directories => fs::is_directory(path),
        }
    }
}

/// Options shared by `search` and `discover`.
#[derive(Debug, Clone, Default)]
pub struct QueryOptions {
    /// Maximum number of results; 0 means unlimited.
    pub limit: usize,
    pub kind: EntryKind,
    pub random: bool,
}

impl QueryOptions {
    /// Shuffles the whole candidate set when `random` is set, then keeps
    /// candidates matching `kind` until `limit` of them have been accepted.
    pub fn select(&self, mut candidates: Vec<String>) -> Vec<String> {
        if self.random {
            candidates.shuffle(&mut rand::thread_rng());
        }

        let mut selected = Vec::new();
        for candidate in candidates {
            if self.limit > 0 && selected.len() >= self.limit {
                break;
            }
            if self.kind.matches(Path::new(&candidate)) {
                selected.push(candidate);
            } else {
                trace!(path = %candidate, kind = ?self.kind, "filtered out by kind");
            }
        }
        selected
    }
}
