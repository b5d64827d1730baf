//! Single-line text entry for the name and description prompts.

use std::io;

use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    backend::Backend,
    layout::{Constraint, Direction, Layout},
    style::Style,
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use crate::tui::colors::INPUT_BORDER;
use crate::tui::keys::KeySource;
use crate::tui::screen::{header_height, render_header, render_status_bar, Screen};

const INPUT_HELP: &str = "Type, Enter to confirm, Esc to cancel";

/// A text input field with a cursor counted in characters.
#[derive(Clone, Debug, Default)]
pub struct InputField {
    pub value: String,
    pub cursor: usize,
}

impl InputField {
    /// Create a new empty input field.
    pub fn new() -> Self {
        Self::default()
    }

    fn byte_offset(&self, char_idx: usize) -> usize {
        self.value
            .char_indices()
            .nth(char_idx)
            .map(|(i, _)| i)
            .unwrap_or(self.value.len())
    }

    /// Insert a character at the current cursor position.
    pub fn handle_char(&mut self, c: char) {
        let at = self.byte_offset(self.cursor);
        self.value.insert(at, c);
        self.cursor += 1;
    }

    /// Delete the character before the cursor.
    pub fn handle_backspace(&mut self) {
        if self.cursor > 0 {
            let at = self.byte_offset(self.cursor - 1);
            self.value.remove(at);
            self.cursor -= 1;
        }
    }

    /// Delete the character at the cursor position.
    pub fn handle_delete(&mut self) {
        if self.cursor < self.value.chars().count() {
            let at = self.byte_offset(self.cursor);
            self.value.remove(at);
        }
    }

    pub fn move_cursor_left(&mut self) {
        self.cursor = self.cursor.saturating_sub(1);
    }

    pub fn move_cursor_right(&mut self) {
        if self.cursor < self.value.chars().count() {
            self.cursor += 1;
        }
    }

    pub fn move_home(&mut self) {
        self.cursor = 0;
    }

    pub fn move_end(&mut self) {
        self.cursor = self.value.chars().count();
    }

    /// Apply an editing key. Returns false for keys the field does not handle.
    pub fn handle_key(&mut self, key: KeyEvent) -> bool {
        match key.code {
            KeyCode::Char(c) => self.handle_char(c),
            KeyCode::Backspace => self.handle_backspace(),
            KeyCode::Delete => self.handle_delete(),
            KeyCode::Left => self.move_cursor_left(),
            KeyCode::Right => self.move_cursor_right(),
            KeyCode::Home => self.move_home(),
            KeyCode::End => self.move_end(),
            _ => return false,
        }
        true
    }
}

impl<B: Backend, K: KeySource> Screen<B, K> {
    /// Prompt for one line of text. `None` means the user pressed Esc.
    pub fn read_line(&mut self, header: &str, label: &str) -> io::Result<Option<String>> {
        let mut field = InputField::new();
        loop {
            self.terminal.draw(|f| render_prompt(f, header, label, &field))?;

            let key = self.next_key()?;
            match key.code {
                KeyCode::Enter => return Ok(Some(field.value)),
                KeyCode::Esc => return Ok(None),
                _ => {
                    field.handle_key(key);
                }
            }
        }
    }
}

fn render_prompt(f: &mut Frame, header: &str, label: &str, field: &InputField) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(header_height(header)),
            Constraint::Length(3),
            Constraint::Min(0),
            Constraint::Length(1),
        ])
        .split(f.area());

    render_header(f, chunks[0], header);

    let input = Paragraph::new(field.value.as_str()).block(
        Block::default()
            .borders(Borders::ALL)
            .title(label.to_string())
            .border_style(Style::default().fg(INPUT_BORDER)),
    );
    f.render_widget(input, chunks[1]);
    f.set_cursor_position((chunks[1].x + field.cursor as u16 + 1, chunks[1].y + 1));

    render_status_bar(f, chunks[3], INPUT_HELP);
}
