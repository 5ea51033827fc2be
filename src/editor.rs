//! Single-line editor with history for interactive terminals.
//!
//! The editor only interprets key events; the console owns the terminal and
//! redraws the line after every keystroke.

use std::collections::VecDeque;

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

/// Submitted lines kept for recall.
pub const HISTORY_LIMIT: usize = 200;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditOutcome {
    /// The line changed or the key was ignored
    Pending,
    Submit(String),
    /// Ctrl-C
    Interrupt,
    /// Ctrl-D on an empty line
    Eof,
}

#[derive(Debug, Default)]
pub struct LineEditor {
    buffer: Vec<char>,
    cursor: usize,
    history: VecDeque<String>,
    /// Position in `history` while browsing with Up/Down
    browsing: Option<usize>,
    /// Line being typed before browsing started
    draft: Vec<char>,
}

impl LineEditor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current line contents.
    pub fn line(&self) -> String {
        self.buffer.iter().collect()
    }

    /// Cursor position in characters.
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn history(&self) -> impl Iterator<Item = &str> {
        self.history.iter().map(String::as_str)
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> EditOutcome {
        if key.kind == KeyEventKind::Release {
            return EditOutcome::Pending;
        }
        let control = key.modifiers.contains(KeyModifiers::CONTROL);

        match key.code {
            KeyCode::Char('c') if control => return EditOutcome::Interrupt,
            KeyCode::Char('d') if control => {
                if self.buffer.is_empty() {
                    return EditOutcome::Eof;
                }
                self.delete();
            }
            KeyCode::Char('a') if control => self.cursor = 0,
            KeyCode::Char('e') if control => self.cursor = self.buffer.len(),
            KeyCode::Char('u') if control => {
                self.buffer.drain(..self.cursor);
                self.cursor = 0;
            }
            KeyCode::Char(_) if control => {}
            KeyCode::Char(c) => {
                self.buffer.insert(self.cursor, c);
                self.cursor += 1;
            }
            KeyCode::Enter => return EditOutcome::Submit(self.submit()),
            KeyCode::Backspace if self.cursor > 0 => {
                self.cursor -= 1;
                self.buffer.remove(self.cursor);
            }
            KeyCode::Delete => self.delete(),
            KeyCode::Left => self.cursor = self.cursor.saturating_sub(1),
            KeyCode::Right => self.cursor = (self.cursor + 1).min(self.buffer.len()),
            KeyCode::Home => self.cursor = 0,
            KeyCode::End => self.cursor = self.buffer.len(),
            KeyCode::Up => self.recall_older(),
            KeyCode::Down => self.recall_newer(),
            _ => {}
        }
        EditOutcome::Pending
    }

    fn delete(&mut self) {
        if self.cursor < self.buffer.len() {
            self.buffer.remove(self.cursor);
        }
    }

    fn submit(&mut self) -> String {
        let line = self.line();
        self.buffer.clear();
        self.cursor = 0;
        self.browsing = None;
        self.draft.clear();

        let repeated = self.history.back().is_some_and(|last| *last == line);
        if !line.trim().is_empty() && !repeated {
            if self.history.len() == HISTORY_LIMIT {
                self.history.pop_front();
            }
            self.history.push_back(line.clone());
        }
        line
    }

    fn recall_older(&mut self) {
        let index = match self.browsing {
            None if self.history.is_empty() => return,
            None => {
                self.draft = std::mem::take(&mut self.buffer);
                self.history.len() - 1
            }
            Some(0) => return,
            Some(index) => index - 1,
        };
        self.show_entry(index);
    }

    fn recall_newer(&mut self) {
        let Some(index) = self.browsing else {
            return;
        };
        if index + 1 < self.history.len() {
            self.show_entry(index + 1);
        } else {
            self.browsing = None;
            self.buffer = std::mem::take(&mut self.draft);
            self.cursor = self.buffer.len();
        }
    }

    fn show_entry(&mut self, index: usize) {
        self.browsing = Some(index);
        self.buffer = self.history[index].chars().collect();
        self.cursor = self.buffer.len();
    }
}
