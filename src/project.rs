//! The project bookmark record and its display helpers.

use chrono::{SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

/// A named, described bookmark to a directory on disk.
///
/// Field names are serialised in PascalCase (`ID`, `Name`, ...) so that
/// `.projects.json` files written by earlier releases keep loading.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Project {
    #[serde(rename = "ID")]
    pub id: usize,
    #[serde(rename = "Name")]
    pub name: String,
    #[serde(rename = "Description")]
    pub description: String,
    #[serde(rename = "Path")]
    pub path: String,
    #[serde(rename = "TimeStamp")]
    pub timestamp: String,
}

impl Project {
    /// Build a record stamped with the current time.
    pub fn new(id: usize, name: &str, description: &str, path: &str) -> Self {
        Project {
            id,
            name: name.to_string(),
            description: description.to_string(),
            path: path.to_string(),
            timestamp: now_timestamp(),
        }
    }

    /// One-line form used by the project pickers.
    pub fn summary_line(&self) -> String {
        format!("ID: {}, Name: {}, Path: {}", self.id, self.name, self.path)
    }

    /// Multi-line detail view shown above per-project menus.
    pub fn info_block(&self) -> String {
        format!(
            "Project Info:\nID: {}\nName: {}\nDescription: {}\nPath: {}\nTimestamp: {}\n",
            self.id, self.name, self.description, self.path, self.timestamp
        )
    }
}

/// Current UTC time as RFC 3339 with millisecond precision.
///
/// Every persisted timestamp goes through here so string order matches time order.
pub fn now_timestamp() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}
