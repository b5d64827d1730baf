//! Recently used directories, ranked by last access.
//!
//! The history file is a convenience cache next to `.projects.json`. It is read and
//! rewritten in full on every call and can be deleted at any time without affecting
//! the project list.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::db::{read_json, write_json_atomic};
use crate::error::Result;
use crate::project::now_timestamp;

/// How many recent paths the pickers surface.
pub const TOP_RECENT: usize = 5;

/// One remembered directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecentPath {
    #[serde(rename = "Path")]
    pub path: String,
    #[serde(rename = "LastAccess")]
    pub last_access: String,
    #[serde(rename = "TimesOpened")]
    pub times_opened: u32,
}

/// File-backed tracker of recently used directories.
#[derive(Debug, Clone)]
pub struct PathHistory {
    file: PathBuf,
}

impl PathHistory {
    pub fn new(file: impl Into<PathBuf>) -> Self {
        PathHistory { file: file.into() }
    }

    pub fn file(&self) -> &Path {
        &self.file
    }

    /// Read every entry. A missing or unreadable file is an empty history.
    pub fn load(&self) -> Vec<RecentPath> {
        if !self.file.exists() {
            debug!(file = %self.file.display(), "no path history yet");
            return Vec::new();
        }
        match read_json(&self.file) {
            Ok(entries) => entries,
            Err(e) => {
                warn!(file = %self.file.display(), error = %e, "ignoring unreadable path history");
                Vec::new()
            }
        }
    }

    fn save(&self, entries: &[RecentPath]) -> Result<()> {
        write_json_atomic(&self.file, &entries)
    }

    /// Up to `n` paths, most recently accessed first.
    pub fn top(&self, n: usize) -> Vec<String> {
        let mut entries = self.load();
        entries.sort_by(|a, b| b.last_access.cmp(&a.last_access));
        entries.into_iter().take(n).map(|e| e.path).collect()
    }

    /// Note a use of `path`, bumping its counter if it is already known.
    pub fn record(&self, path: &str) -> Result<()> {
        self.record_at(path, now_timestamp())
    }

    fn record_at(&self, path: &str, timestamp: String) -> Result<()> {
        let mut entries = self.load();
        match entries.iter_mut().find(|e| e.path == path) {
            Some(entry) => {
                entry.times_opened += 1;
                entry.last_access = timestamp;
            }
            None => entries.push(RecentPath {
                path: path.to_string(),
                last_access: timestamp,
                times_opened: 1,
            }),
        }
        self.save(&dedup_by_path(entries))
    }

    /// Forget `path`. Unknown paths leave the file untouched.
    pub fn remove(&self, path: &str) -> Result<()> {
        let mut entries = self.load();
        let before = entries.len();
        entries.retain(|e| e.path != path);
        if entries.len() == before {
            return Ok(());
        }
        self.save(&entries)
    }
}

/// Keep the first entry seen for each path.
fn dedup_by_path(entries: Vec<RecentPath>) -> Vec<RecentPath> {
    let mut unique: Vec<RecentPath> = Vec::with_capacity(entries.len());
    for entry in entries {
        if !unique.iter().any(|u| u.path == entry.path) {
            unique.push(entry);
        }
    }
    unique
}
