//! Editable text field used by forms and search boxes.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::style::{Color, Style};
use ratatui::text::{Line, Span};

/// A text buffer with a cursor measured in characters.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TextField {
    value: String,
    cursor: usize,
    multiline: bool,
}

impl TextField {
    pub fn multiline() -> Self {
        Self {
            multiline: true,
            ..Self::default()
        }
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    pub fn is_blank(&self) -> bool {
        self.value.trim().is_empty()
    }

    pub fn set(&mut self, value: impl Into<String>) {
        self.value = value.into();
        self.cursor = self.value.chars().count();
    }

    pub fn clear(&mut self) {
        self.value.clear();
        self.cursor = 0;
    }

    pub fn take(&mut self) -> String {
        self.cursor = 0;
        std::mem::take(&mut self.value)
    }

    fn byte_index(&self, char_index: usize) -> usize {
        self.value
            .char_indices()
            .nth(char_index)
            .map_or(self.value.len(), |(i, _)| i)
    }

    pub fn insert_char(&mut self, ch: char) {
        let at = self.byte_index(self.cursor);
        self.value.insert(at, ch);
        self.cursor += 1;
    }

    /// Inserts pasted text; newlines collapse to spaces on single-line fields.
    pub fn insert_str(&mut self, text: &str) {
        for ch in text.chars() {
            match ch {
                '\r' => {}
                '\n' if !self.multiline => self.insert_char(' '),
                ch => self.insert_char(ch),
            }
        }
    }

    pub fn backspace(&mut self) {
        if self.cursor == 0 {
            return;
        }
        self.cursor -= 1;
        let at = self.byte_index(self.cursor);
        self.value.remove(at);
    }

    pub fn delete(&mut self) {
        if self.cursor < self.value.chars().count() {
            let at = self.byte_index(self.cursor);
            self.value.remove(at);
        }
    }

    /// Applies an editing key. Returns false when the key is not an edit.
    pub fn handle_key(&mut self, key: KeyEvent) -> bool {
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        match key.code {
            KeyCode::Char('u') if ctrl => self.clear(),
            KeyCode::Char(ch) if !ctrl => self.insert_char(ch),
            KeyCode::Enter if self.multiline => self.insert_char('\n'),
            KeyCode::Backspace => self.backspace(),
            KeyCode::Delete => self.delete(),
            KeyCode::Left => self.cursor = self.cursor.saturating_sub(1),
            KeyCode::Right => self.cursor = (self.cursor + 1).min(self.value.chars().count()),
            KeyCode::Home => self.cursor = 0,
            KeyCode::End => self.cursor = self.value.chars().count(),
            _ => return false,
        }
        true
    }

    /// Renders the value as lines, drawing a block cursor when focused.
    /// `mask` replaces every character (password fields).
    pub fn lines(&self, focused: bool, mask: Option<char>, placeholder: &str) -> Vec<Line<'static>> {
        let text_style = Style::default().fg(Color::White);
        let cursor_style = Style::default().fg(Color::Green);
        if self.value.is_empty() {
            let mut spans = Vec::new();
            if focused {
                spans.push(Span::styled("█", cursor_style));
            }
            spans.push(Span::styled(
                placeholder.to_string(),
                Style::default().fg(Color::DarkGray),
            ));
            return vec![Line::from(spans)];
        }

        let shown: String = match mask {
            Some(m) => self.value.chars().map(|_| m).collect(),
            None => self.value.clone(),
        };
        let mut lines = Vec::new();
        let mut spans = Vec::new();
        let mut current = String::new();
        for (i, ch) in shown.chars().enumerate() {
            if focused && i == self.cursor {
                spans.push(Span::styled(std::mem::take(&mut current), text_style));
                spans.push(Span::styled("█", cursor_style));
            }
            if ch == '\n' {
                spans.push(Span::styled(std::mem::take(&mut current), text_style));
                lines.push(Line::from(std::mem::take(&mut spans)));
            } else {
                current.push(ch);
            }
        }
        spans.push(Span::styled(current, text_style));
        if focused && self.cursor >= shown.chars().count() {
            spans.push(Span::styled("█", cursor_style));
        }
        lines.push(Line::from(spans));
        lines
    }
}
