//! The single blocking input call every screen loop goes through.

use std::io;

use crossterm::event::{self, Event, KeyEvent, KeyEventKind};

/// Source of key presses. Each call blocks until one key is available.
pub trait KeySource {
    fn next_key(&mut self) -> io::Result<KeyEvent>;
}

/// Reads key presses from the real terminal.
pub struct TerminalKeys;

impl KeySource for TerminalKeys {
    fn next_key(&mut self) -> io::Result<KeyEvent> {
        loop {
            // Resize and release events only trigger a redraw on the next frame.
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    return Ok(key);
                }
            }
        }
    }
}

#[cfg(test)]
pub mod scripted {
    use std::collections::VecDeque;

    use crossterm::event::{KeyCode, KeyModifiers};

    use super::*;

    /// Replays a fixed key sequence, failing once it runs dry.
    pub struct ScriptedKeys(VecDeque<KeyEvent>);

    impl ScriptedKeys {
        pub fn new(codes: impl IntoIterator<Item = KeyCode>) -> Self {
            ScriptedKeys(
                codes
                    .into_iter()
                    .map(|code| KeyEvent::new(code, KeyModifiers::NONE))
                    .collect(),
            )
        }

        /// Keys for typing `text` one character at a time.
        pub fn typed(text: &str) -> Vec<KeyCode> {
            text.chars().map(KeyCode::Char).collect()
        }

        pub fn remaining(&self) -> usize {
            self.0.len()
        }
    }

    impl KeySource for ScriptedKeys {
        fn next_key(&mut self) -> io::Result<KeyEvent> {
            self.0
                .pop_front()
                .ok_or_else(|| io::Error::new(io::ErrorKind::UnexpectedEof, "key script exhausted"))
        }
    }
}
