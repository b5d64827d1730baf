//! # PM - project bookmarks for the terminal
//!
//! Keeps a list of local development projects (name, description, directory) and
//! lets you browse them from a keyboard-driven menu, open them in an editor or file
//! browser, copy their path, or drop the bookmark.
//!
//! ## Quick Start
//!
//! ```bash
//! # Run in the directory that should hold the bookmark files
//! pm
//!
//! # Or keep the data somewhere else and use another editor
//! pm --dir ~/.pm --editor zed
//! ```
//!
//! ## Key Bindings
//!
//! - `↑`/`↓` move the selection (wrapping), `Enter` selects, `Esc` goes back
//! - `q` quits from the main menu
//! - In the path field, `Tab` completes a folder name when only one folder matches
//!
//! Data lives in `.projects.json` and `.directory_history.json` inside `--dir`;
//! the log goes to `log.txt` there unless `--log-file` says otherwise.

use clap::Parser;
use tracing::{error, info};

pub mod cli;
pub mod config;
pub mod db;
pub mod error;
pub mod history;
pub mod launcher;
pub mod logging;
pub mod project;
pub mod tui {
    pub mod app;
    pub mod colors;
    pub mod input;
    pub mod keys;
    pub mod menu;
    pub mod path_chooser;
    pub mod run;
    pub mod screen;
}

use cli::Cli;
use config::Config;

fn main() {
    let cli = Cli::parse();
    let config = Config::from_cli(&cli);

    if !logging::init(&config.log_file) {
        eprintln!(
            "Could not open log file {}, continuing without logs",
            config.log_file.display()
        );
    }
    info!(data_dir = %config.data_dir.display(), "program start");

    if let Err(err) = tui::run::run_tui(&config) {
        error!(error = %err, "terminal input failed");
        eprintln!("Error: {}", err);
        std::process::exit(1);
    }
}
