//! Single-selection list menu shared by the main menu, project pickers and confirmations.

use std::io;

use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    backend::Backend,
    layout::{Constraint, Direction, Layout},
    style::Style,
    text::Line,
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph},
    Frame,
};

use crate::tui::colors::{SELECTION_BG, SELECTION_FG};
use crate::tui::keys::KeySource;
use crate::tui::screen::{header_height, render_header, render_status_bar, Screen};

const MENU_HELP: &str = "Use ↑↓ to navigate, Enter to select, Esc to go back";

/// How a menu loop ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Selection {
    /// Enter on the option at this index.
    Selected(usize),
    /// Esc.
    Cancelled,
    /// One of the caller's termination characters.
    Terminated(char),
}

pub fn wrap_next_index(current: usize, len: usize) -> usize {
    if len == 0 {
        return 0;
    }
    (current + 1) % len
}

pub fn wrap_prev_index(current: usize, len: usize) -> usize {
    if len == 0 {
        return 0;
    }
    (current + len - 1) % len
}

/// Selection state of a menu with `len` options.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MenuCursor {
    selected: usize,
    len: usize,
}

impl MenuCursor {
    pub fn new(len: usize) -> Self {
        MenuCursor { selected: 0, len }
    }

    pub fn selected(&self) -> usize {
        self.selected
    }

    pub fn next(&mut self) {
        self.selected = wrap_next_index(self.selected, self.len);
    }

    pub fn previous(&mut self) {
        self.selected = wrap_prev_index(self.selected, self.len);
    }

    /// Apply one key press, returning the outcome when the key ends the menu.
    pub fn handle_key(&mut self, key: KeyEvent, terminators: &[char]) -> Option<Selection> {
        match key.code {
            KeyCode::Down => self.next(),
            KeyCode::Up => self.previous(),
            KeyCode::Enter if self.len > 0 => return Some(Selection::Selected(self.selected)),
            KeyCode::Esc => return Some(Selection::Cancelled),
            KeyCode::Char(c) if terminators.contains(&c) => return Some(Selection::Terminated(c)),
            _ => {}
        }
        None
    }
}

impl<B: Backend, K: KeySource> Screen<B, K> {
    /// Show `options` under `header` until the user picks, cancels or terminates.
    ///
    /// With no options only `empty_message` is shown; Enter is then ignored.
    pub fn choice_menu(
        &mut self,
        options: &[String],
        header: &str,
        empty_message: &str,
        terminators: &[char],
    ) -> io::Result<Selection> {
        let mut cursor = MenuCursor::new(options.len());
        loop {
            self.terminal
                .draw(|f| render_menu(f, options, header, empty_message, cursor.selected()))?;

            let key = self.next_key()?;
            if let Some(selection) = cursor.handle_key(key, terminators) {
                return Ok(selection);
            }
        }
    }
}

fn render_menu(f: &mut Frame, options: &[String], header: &str, empty_message: &str, selected: usize) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(header_height(header)),
            Constraint::Min(0),
            Constraint::Length(1),
        ])
        .split(f.area());

    render_header(f, chunks[0], header);

    if options.is_empty() {
        let empty = Paragraph::new(empty_message.to_string()).block(Block::default().borders(Borders::ALL));
        f.render_widget(empty, chunks[1]);
    } else {
        let items: Vec<ListItem> = options
            .iter()
            .enumerate()
            .map(|(i, option)| {
                let text = if i == selected {
                    format!("> {} <", option)
                } else {
                    format!("  {}", option)
                };
                ListItem::new(Line::from(text))
            })
            .collect();

        let list = List::new(items)
            .block(Block::default().borders(Borders::ALL))
            .highlight_style(Style::default().bg(SELECTION_BG).fg(SELECTION_FG));

        let mut state = ListState::default();
        state.select(Some(selected));
        f.render_stateful_widget(list, chunks[1], &mut state);
    }

    render_status_bar(f, chunks[2], MENU_HELP);
}
