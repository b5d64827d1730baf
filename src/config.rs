//! Runtime configuration resolved from the command line.

use std::path::PathBuf;

use crate::cli::Cli;

pub const PROJECTS_FILE: &str = ".projects.json";
pub const HISTORY_FILE: &str = ".directory_history.json";
pub const LOG_FILE: &str = "log.txt";

/// Where the program keeps its files and which editor it launches.
#[derive(Debug, Clone)]
pub struct Config {
    pub data_dir: PathBuf,
    pub editor: String,
    pub log_file: PathBuf,
}

impl Config {
    pub fn from_cli(cli: &Cli) -> Self {
        Config {
            data_dir: cli.dir.clone(),
            editor: cli.editor.clone(),
            log_file: cli.log_file.clone().unwrap_or_else(|| cli.dir.join(LOG_FILE)),
        }
    }

    pub fn projects_file(&self) -> PathBuf {
        self.data_dir.join(PROJECTS_FILE)
    }

    pub fn history_file(&self) -> PathBuf {
        self.data_dir.join(HISTORY_FILE)
    }
}
