//! The terminal plus the key source every interactive component draws on and reads from.

use std::io;

use crossterm::event::KeyEvent;
use ratatui::{
    backend::Backend,
    layout::{Alignment, Rect},
    style::{Color, Style},
    text::Line,
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame, Terminal,
};

use crate::tui::colors::STATUS_BG;
use crate::tui::keys::KeySource;

/// One terminal, one input stream. Components borrow it for the length of their loop.
pub struct Screen<B: Backend, K: KeySource> {
    pub(crate) terminal: Terminal<B>,
    keys: K,
}

impl<B: Backend, K: KeySource> Screen<B, K> {
    pub fn new(terminal: Terminal<B>, keys: K) -> Self {
        Screen { terminal, keys }
    }

    /// Block until the next key press.
    pub fn next_key(&mut self) -> io::Result<KeyEvent> {
        self.keys.next_key()
    }

    pub fn terminal_mut(&mut self) -> &mut Terminal<B> {
        &mut self.terminal
    }

    #[cfg(test)]
    pub fn keys(&self) -> &K {
        &self.keys
    }
}

/// Rows needed to show `header` inside a bordered block.
pub fn header_height(header: &str) -> u16 {
    header.lines().count().max(1) as u16 + 2
}

/// Draw a multi-line header in a bordered block.
pub fn render_header(f: &mut Frame, area: Rect, header: &str) {
    let lines: Vec<Line> = header.lines().map(|l| Line::from(l.to_string())).collect();
    let widget = Paragraph::new(lines)
        .block(Block::default().borders(Borders::ALL))
        .wrap(Wrap { trim: false });
    f.render_widget(widget, area);
}

/// Draw the one-line help bar.
pub fn render_status_bar(f: &mut Frame, area: Rect, text: &str) {
    let status = Paragraph::new(text.to_string())
        .style(Style::default().bg(STATUS_BG).fg(Color::White))
        .alignment(Alignment::Left);
    f.render_widget(status, area);
}
