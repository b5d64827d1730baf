use std::path::PathBuf;

use clap::Parser;

/// Keyboard-driven bookmarks for local project directories.
/// Data lives in `.projects.json` and `.directory_history.json` inside --dir.
#[derive(Parser, Debug)]
#[command(name = "pm", version, about = "Terminal bookmark manager for project directories")]
pub struct Cli {
    /// Directory holding the project and path-history files.
    #[arg(long, default_value = ".")]
    pub dir: PathBuf,

    /// Command used to open a project in an editor.
    #[arg(long, default_value = "code")]
    pub editor: String,

    /// Log file path. Defaults to log.txt inside --dir.
    #[arg(long)]
    pub log_file: Option<PathBuf>,
}
