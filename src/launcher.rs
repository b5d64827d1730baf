//! Thin wrappers around the OS tools a project can be handed to.
//!
//! Every call takes one path. Callers log failures and carry on.

use std::process::{Command, Stdio};

use arboard::Clipboard;
use tracing::info;

use crate::error::{Error, Result};

/// External collaborators invoked on a project path.
pub trait Launcher {
    fn open_in_editor(&mut self, path: &str) -> Result<()>;
    fn open_in_file_browser(&mut self, path: &str) -> Result<()>;
    fn copy_to_clipboard(&mut self, text: &str) -> Result<()>;
    fn init_repository(&mut self, path: &str) -> Result<()>;
}

/// Launcher backed by real processes and the system clipboard.
pub struct SystemLauncher {
    editor: String,
    clipboard: Option<Clipboard>,
}

impl SystemLauncher {
    pub fn new(editor: &str) -> Self {
        SystemLauncher {
            editor: editor.to_string(),
            clipboard: None,
        }
    }
}

impl Launcher for SystemLauncher {
    fn open_in_editor(&mut self, path: &str) -> Result<()> {
        info!(editor = %self.editor, path, "opening project in editor");
        run_quiet(Command::new(&self.editor).arg(path))
    }

    fn open_in_file_browser(&mut self, path: &str) -> Result<()> {
        info!(path, "opening project in file browser");
        open::that(path)?;
        Ok(())
    }

    fn copy_to_clipboard(&mut self, text: &str) -> Result<()> {
        // The clipboard is kept alive so X11 selections outlast the call.
        if self.clipboard.is_none() {
            self.clipboard = Some(Clipboard::new().map_err(|e| Error::Clipboard(e.to_string()))?);
        }
        if let Some(clipboard) = self.clipboard.as_mut() {
            clipboard
                .set_text(text.to_string())
                .map_err(|e| Error::Clipboard(e.to_string()))?;
        }
        info!(text, "copied to clipboard");
        Ok(())
    }

    fn init_repository(&mut self, path: &str) -> Result<()> {
        info!(path, "initialising git repository");
        run_quiet(Command::new("git").arg("init").current_dir(path))
    }
}

/// Run a command to completion with its output discarded so it cannot draw over the UI.
fn run_quiet(cmd: &mut Command) -> Result<()> {
    let program = cmd.get_program().to_string_lossy().into_owned();
    let status = cmd
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()?;
    if status.success() {
        Ok(())
    } else {
        Err(Error::Command { program, status })
    }
}
