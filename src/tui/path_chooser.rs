//! Interactive path entry with folder autocomplete and recent-path quick picks.

use std::fs;
use std::io;
use std::path::{Path, MAIN_SEPARATOR};

use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    backend::Backend,
    layout::{Constraint, Direction, Layout},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, Paragraph},
    Frame,
};
use tracing::debug;

use crate::tui::colors::{ERROR, INPUT_BORDER, SELECTION_BG, SELECTION_FG, SUGGESTION};
use crate::tui::keys::KeySource;
use crate::tui::menu::{wrap_next_index, wrap_prev_index};
use crate::tui::screen::{header_height, render_header, render_status_bar, Screen};

/// Folder suggestions shown under the path field.
pub const MAX_FOLDER_MATCHES: usize = 5;

const USE_CURRENT_DIR: &str = "Use current directory";
const NO_FOLDERS: &str = "No folders found.";
const INVALID_PATH: &str = "Invalid path. Please enter a valid filesystem path.";
const CHOOSER_HELP: &str = "Type a path, Tab to complete, ↑↓ recent paths, Enter to confirm, Esc to cancel";

/// Split `path` after its last separator: `/tmp/x` gives `(Some("/tmp/"), "x")`.
pub fn split_last_segment(path: &str) -> (Option<&str>, &str) {
    match path.rfind(['/', '\\']) {
        Some(idx) => (Some(&path[..=idx]), &path[idx + 1..]),
        None => (None, path),
    }
}

/// Visible directories in `dir` whose names contain `needle`, ignoring case.
///
/// Sorted by name and capped at [`MAX_FOLDER_MATCHES`]. An unreadable `dir` has no matches.
pub fn match_folders(dir: &Path, needle: &str) -> Vec<String> {
    let entries = match fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) => {
            debug!(dir = %dir.display(), error = %e, "cannot list directory for completion");
            return Vec::new();
        }
    };

    let needle = needle.to_lowercase();
    let mut folders: Vec<String> = entries
        .filter_map(Result::ok)
        .filter(|e| e.file_type().map(|t| t.is_dir()).unwrap_or(false))
        .map(|e| e.file_name().to_string_lossy().into_owned())
        .filter(|name| !name.starts_with('.') && name.to_lowercase().contains(&needle))
        .collect();

    folders.sort();
    folders.truncate(MAX_FOLDER_MATCHES);
    folders
}

/// How a chooser session ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChooserOutcome {
    Chosen(String),
    Cancelled,
}

/// Editing state of one path chooser session.
#[derive(Debug, Clone)]
pub struct PathChooser {
    path: String,
    current_dir: String,
    recent: Vec<String>,
    selected: Option<usize>,
    error: Option<&'static str>,
}

impl PathChooser {
    /// `initial` seeds the buffer; `current_dir` backs the first quick pick.
    pub fn new(initial: &str, current_dir: &str, recent: Vec<String>) -> Self {
        PathChooser {
            path: initial.to_string(),
            current_dir: current_dir.to_string(),
            recent,
            selected: None,
            error: None,
        }
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn selected(&self) -> Option<usize> {
        self.selected
    }

    /// Quick-pick entries: the current directory followed by the recent paths.
    fn quick_picks(&self) -> Vec<&str> {
        std::iter::once(USE_CURRENT_DIR)
            .chain(self.recent.iter().map(String::as_str))
            .collect()
    }

    fn quick_pick_len(&self) -> usize {
        self.recent.len() + 1
    }

    /// Folders completing the last segment of the current path.
    pub fn folder_matches(&self) -> Vec<String> {
        match split_last_segment(&self.path) {
            (Some(parent), segment) => match_folders(Path::new(parent), segment),
            (None, _) => Vec::new(),
        }
    }

    fn select(&mut self, idx: usize) {
        self.selected = Some(idx);
        self.path = if idx == 0 {
            self.current_dir.clone()
        } else {
            self.recent[idx - 1].clone()
        };
    }

    fn complete(&mut self) {
        let matches = self.folder_matches();
        if matches.len() != 1 {
            return;
        }
        let parent = split_last_segment(&self.path).0.unwrap_or_default().to_string();
        self.path = format!("{}{}{}", parent, matches[0], MAIN_SEPARATOR);
        self.selected = None;
    }

    /// Apply one key press. Returns the outcome once the session is over.
    pub fn handle_key(&mut self, key: KeyEvent) -> Option<ChooserOutcome> {
        match key.code {
            KeyCode::Enter => {
                if Path::new(&self.path).exists() {
                    return Some(ChooserOutcome::Chosen(self.path.clone()));
                }
                self.error = Some(INVALID_PATH);
                self.path.clear();
                self.selected = None;
                return None;
            }
            KeyCode::Esc => return Some(ChooserOutcome::Cancelled),
            KeyCode::Down => {
                let next = match self.selected {
                    None => 0,
                    Some(i) => wrap_next_index(i, self.quick_pick_len()),
                };
                self.select(next);
            }
            KeyCode::Up => {
                let prev = match self.selected {
                    None => self.quick_pick_len() - 1,
                    Some(i) => wrap_prev_index(i, self.quick_pick_len()),
                };
                self.select(prev);
            }
            KeyCode::Tab => self.complete(),
            KeyCode::Backspace => {
                self.path.pop();
                self.selected = None;
            }
            KeyCode::Char(c) => {
                self.path.push(c);
                self.selected = None;
            }
            _ => {}
        }
        self.error = None;
        None
    }
}

impl<B: Backend, K: KeySource> Screen<B, K> {
    /// Let the user pick an existing path. Returns an empty string when cancelled.
    pub fn choose_path(
        &mut self,
        header: &str,
        initial: &str,
        current_dir: &str,
        recent: Vec<String>,
    ) -> io::Result<String> {
        let mut chooser = PathChooser::new(initial, current_dir, recent);
        loop {
            let matches = chooser.folder_matches();
            self.terminal.draw(|f| render_chooser(f, header, &chooser, &matches))?;

            let key = self.next_key()?;
            match chooser.handle_key(key) {
                Some(ChooserOutcome::Chosen(path)) => return Ok(path),
                Some(ChooserOutcome::Cancelled) => return Ok(String::new()),
                None => {}
            }
        }
    }
}

fn render_chooser(f: &mut Frame, header: &str, chooser: &PathChooser, matches: &[String]) {
    let picks = chooser.quick_picks();
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(header_height(header)),
            Constraint::Length(picks.len() as u16 + 2),
            Constraint::Length(3),
            Constraint::Length(MAX_FOLDER_MATCHES as u16 + 2),
            Constraint::Min(0),
            Constraint::Length(1),
        ])
        .split(f.area());

    render_header(f, chunks[0], header);

    let items: Vec<ListItem> = picks
        .iter()
        .enumerate()
        .map(|(i, pick)| {
            if chooser.selected == Some(i) {
                ListItem::new(format!("> {} <", pick))
                    .style(Style::default().bg(SELECTION_BG).fg(SELECTION_FG))
            } else {
                ListItem::new(format!("  {}", pick))
            }
        })
        .collect();
    let list = List::new(items).block(Block::default().borders(Borders::ALL).title("Recent"));
    f.render_widget(list, chunks[1]);

    let input = Paragraph::new(chooser.path.as_str()).block(
        Block::default()
            .borders(Borders::ALL)
            .title("Absolute Path")
            .border_style(Style::default().fg(INPUT_BORDER)),
    );
    f.render_widget(input, chunks[2]);
    f.set_cursor_position((
        chunks[2].x + chooser.path.chars().count() as u16 + 1,
        chunks[2].y + 1,
    ));

    let suggestion_lines: Vec<Line> = if matches.is_empty() {
        vec![Line::from(Span::styled(
            NO_FOLDERS,
            Style::default().add_modifier(Modifier::DIM),
        ))]
    } else {
        matches
            .iter()
            .map(|m| Line::from(Span::styled(m.clone(), Style::default().fg(SUGGESTION))))
            .collect()
    };
    let suggestions =
        Paragraph::new(suggestion_lines).block(Block::default().borders(Borders::ALL).title("Folders"));
    f.render_widget(suggestions, chunks[3]);

    if let Some(error) = chooser.error {
        let message = Paragraph::new(Span::styled(error, Style::default().fg(ERROR)));
        f.render_widget(message, chunks[4]);
    }

    render_status_bar(f, chunks[5], CHOOSER_HELP);
}
