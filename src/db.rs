//! The project record store and the JSON file helpers it shares with the path history.
//!
//! `ProjectStore` owns the in-memory project list for the whole session. Every
//! mutation rewrites `.projects.json` in full, and IDs are renumbered to list
//! positions on load and on each save, so an ID is only meaningful until the next removal.

use std::fs::{self, File};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use serde::{de::DeserializeOwned, Serialize};
use tracing::{info, warn};

use crate::error::Result;
use crate::history::PathHistory;
use crate::project::{now_timestamp, Project};

/// In-memory project list backed by a JSON file.
#[derive(Debug)]
pub struct ProjectStore {
    file: PathBuf,
    projects: Vec<Project>,
    history: PathHistory,
}

impl ProjectStore {
    /// Load the store from `file`, starting empty if it is missing or malformed.
    pub fn load(file: &Path, history: PathHistory) -> Self {
        let mut projects = if !file.exists() {
            warn!(file = %file.display(), "project file not found, starting with no projects");
            Vec::new()
        } else {
            match read_json::<Vec<Project>>(file) {
                Ok(projects) => projects,
                Err(e) => {
                    warn!(file = %file.display(), error = %e, "could not read project file, starting fresh");
                    Vec::new()
                }
            }
        };
        // Hand-edited files may carry stale or repeated IDs; positions are authoritative.
        renumber(&mut projects);
        info!(count = projects.len(), history = %history.file().display(), "loaded projects");

        ProjectStore {
            file: file.to_path_buf(),
            projects,
            history,
        }
    }

    /// Renumber IDs to list positions and overwrite the backing file.
    pub fn save(&mut self) -> Result<()> {
        renumber(&mut self.projects);
        write_json_atomic(&self.file, &self.projects)
    }

    /// Save, logging instead of failing. Used after each mutation.
    fn persist(&mut self) {
        if let Err(e) = self.save() {
            warn!(file = %self.file.display(), error = %e, "failed to save projects");
        }
    }

    pub fn projects(&self) -> &[Project] {
        &self.projects
    }

    pub fn len(&self) -> usize {
        self.projects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.projects.is_empty()
    }

    pub fn history(&self) -> &PathHistory {
        &self.history
    }

    /// Get a project by ID.
    pub fn get(&self, id: usize) -> Option<&Project> {
        self.projects.iter().find(|p| p.id == id)
    }

    /// True when no existing project has `candidate` as its name, ignoring case.
    pub fn has_unique_name(&self, candidate: &str) -> bool {
        let candidate = candidate.to_lowercase();
        !self.projects.iter().any(|p| p.name.to_lowercase() == candidate)
    }

    /// Append a new project, make sure its directory exists and remember the path.
    ///
    /// The record is kept even when the directory cannot be created; that failure is
    /// only logged.
    pub fn add(&mut self, name: &str, description: &str, path: &str) -> Project {
        let project = Project::new(self.projects.len(), name, description, path);
        self.projects.push(project.clone());
        info!(id = project.id, name, path, "added project");

        bootstrap_directory(Path::new(path));
        if let Err(e) = self.history.record(path) {
            warn!(path, error = %e, "failed to record path history");
        }

        self.persist();
        project
    }

    /// Remove the project with `id` and renumber the rest.
    ///
    /// Only the bookmark goes away; the directory on disk is left alone.
    pub fn remove(&mut self, id: usize) -> Option<Project> {
        let idx = self.projects.iter().position(|p| p.id == id)?;
        let removed = self.projects.remove(idx);
        renumber(&mut self.projects);
        info!(id, name = %removed.name, "removed project");

        if let Err(e) = self.history.remove(&removed.path) {
            warn!(path = %removed.path, error = %e, "failed to drop path from history");
        }

        self.persist();
        Some(removed)
    }

    /// Overwrite the non-empty fields of project `id` and refresh its timestamp.
    pub fn update(&mut self, id: usize, name: &str, description: &str, path: &str) -> Option<&Project> {
        let idx = self.projects.iter().position(|p| p.id == id)?;
        {
            let project = &mut self.projects[idx];
            if !name.is_empty() {
                project.name = name.to_string();
            }
            if !description.is_empty() {
                project.description = description.to_string();
            }
            if !path.is_empty() {
                project.path = path.to_string();
            }
            project.timestamp = now_timestamp();
            info!(id, name = %project.name, "updated project");
        }

        self.persist();
        self.projects.get(idx)
    }
}

fn renumber(projects: &mut [Project]) {
    for (i, project) in projects.iter_mut().enumerate() {
        project.id = i;
    }
}

/// Create `path` as a directory when it does not exist yet. Failures are logged.
fn bootstrap_directory(path: &Path) {
    match fs::metadata(path) {
        Ok(meta) if meta.is_dir() => {}
        Ok(_) => warn!(path = %path.display(), "project path exists but is not a directory"),
        Err(e) if e.kind() == ErrorKind::NotFound => {
            if let Err(e) = fs::create_dir_all(path) {
                warn!(path = %path.display(), error = %e, "failed to create project directory");
            }
        }
        Err(e) => warn!(path = %path.display(), error = %e, "failed to inspect project path"),
    }
}

/// Read and deserialise a JSON file.
pub fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let content = fs::read_to_string(path)?;
    Ok(serde_json::from_str(&content)?)
}

/// Serialise `value` and replace `path` with it via temp file + rename.
pub fn write_json_atomic<T: Serialize + ?Sized>(path: &Path, value: &T) -> Result<()> {
    let data = serde_json::to_string_pretty(value)?;
    let tmp = path.with_extension("json.tmp");
    let mut f = File::create(&tmp)?;
    f.write_all(data.as_bytes())?;
    f.flush()?;
    fs::rename(tmp, path)?;
    Ok(())
}
