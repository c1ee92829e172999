//! Minimal multi-line composer embedded in the answer box.
//!
//! The composer owns the draft text and a byte cursor; the answer box owns
//! everything else. Keys reach the composer only after the box's navigation
//! handling declines them, so by the time `Enter` arrives here it always
//! means "insert a newline".
//!
//! `render_lines` produces the composer's standalone framing: a top border,
//! the wrapped content rows, and a bottom border. Embedding views discard the
//! first and last rows and decorate the inner rows themselves.

use crossterm::event::KeyCode;
use crossterm::event::KeyEvent;
use crossterm::event::KeyModifiers;
use ratatui::style::Stylize;
use ratatui::text::Line;

pub struct Composer {
    text: String,
    /// Byte offset into `text`, always on a char boundary.
    cursor: usize,
    placeholder: &'static str,
}

impl Composer {
    pub fn new(placeholder: &'static str) -> Self {
        Self {
            text: String::new(),
            cursor: 0,
            placeholder,
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    /// Replace the buffer and move the cursor to the end.
    pub fn set_text(&mut self, text: &str) {
        self.text = text.to_string();
        self.cursor = self.text.len();
    }

    /// Apply one key event to the buffer. Returns true when the buffer or
    /// cursor changed, which the owner uses as its change hook.
    pub fn handle_key_event(&mut self, key_event: KeyEvent) -> bool {
        match key_event.code {
            KeyCode::Char(c) => {
                if key_event.modifiers.contains(KeyModifiers::CONTROL) {
                    return false;
                }
                self.insert(c);
                true
            }
            KeyCode::Enter => {
                self.insert('\n');
                true
            }
            KeyCode::Backspace => self.delete_backward(),
            KeyCode::Delete => self.delete_forward(),
            KeyCode::Left => self.move_left(),
            KeyCode::Right => self.move_right(),
            KeyCode::Home => self.move_line_start(),
            KeyCode::End => self.move_line_end(),
            KeyCode::Up => self.move_vertical(true),
            KeyCode::Down => self.move_vertical(false),
            _ => false,
        }
    }

    fn insert(&mut self, ch: char) {
        self.text.insert(self.cursor, ch);
        self.cursor += ch.len_utf8();
    }

    fn prev_char(&self) -> Option<char> {
        self.text[..self.cursor].chars().next_back()
    }

    fn next_char(&self) -> Option<char> {
        self.text[self.cursor..].chars().next()
    }

    fn delete_backward(&mut self) -> bool {
        let Some(ch) = self.prev_char() else {
            return false;
        };
        self.cursor -= ch.len_utf8();
        self.text.remove(self.cursor);
        true
    }

    fn delete_forward(&mut self) -> bool {
        if self.next_char().is_none() {
            return false;
        }
        self.text.remove(self.cursor);
        true
    }

    fn move_left(&mut self) -> bool {
        let Some(ch) = self.prev_char() else {
            return false;
        };
        self.cursor -= ch.len_utf8();
        true
    }

    fn move_right(&mut self) -> bool {
        let Some(ch) = self.next_char() else {
            return false;
        };
        self.cursor += ch.len_utf8();
        true
    }

    /// Byte offset of the start of the line containing the cursor.
    fn line_start(&self) -> usize {
        self.text[..self.cursor]
            .rfind('\n')
            .map(|i| i + 1)
            .unwrap_or(0)
    }

    /// Byte offset of the end of the line containing the cursor (before its
    /// terminating newline, or end of buffer).
    fn line_end(&self) -> usize {
        self.text[self.cursor..]
            .find('\n')
            .map(|i| self.cursor + i)
            .unwrap_or(self.text.len())
    }

    fn move_line_start(&mut self) -> bool {
        let start = self.line_start();
        if start == self.cursor {
            return false;
        }
        self.cursor = start;
        true
    }

    fn move_line_end(&mut self) -> bool {
        let end = self.line_end();
        if end == self.cursor {
            return false;
        }
        self.cursor = end;
        true
    }

    /// Move the cursor to the previous/next logical line, keeping the column
    /// where possible (clamped to the target line's length).
    fn move_vertical(&mut self, up: bool) -> bool {
        let line_start = self.line_start();
        let col = self.text[line_start..self.cursor].chars().count();
        if up {
            if line_start == 0 {
                return false;
            }
            let prev_start = self.text[..line_start - 1]
                .rfind('\n')
                .map(|i| i + 1)
                .unwrap_or(0);
            let prev_line = &self.text[prev_start..line_start - 1];
            self.cursor = prev_start + byte_offset_for_col(prev_line, col);
        } else {
            let line_end = self.line_end();
            if line_end == self.text.len() {
                return false;
            }
            let next_start = line_end + 1;
            let next_end = self.text[next_start..]
                .find('\n')
                .map(|i| next_start + i)
                .unwrap_or(self.text.len());
            let next_line = &self.text[next_start..next_end];
            self.cursor = next_start + byte_offset_for_col(next_line, col);
        }
        true
    }

    /// The wrapped content rows for `width` columns, without framing.
    fn content_rows(&self, width: usize) -> Vec<Line<'static>> {
        let width = width.max(1);
        if self.text.is_empty() {
            return vec![Line::from(self.placeholder.dim())];
        }
        let mut rows: Vec<Line<'static>> = Vec::new();
        for logical in self.text.split('\n') {
            if logical.is_empty() {
                rows.push(Line::default());
                continue;
            }
            for piece in textwrap::wrap(logical, width) {
                rows.push(Line::from(piece.into_owned()));
            }
        }
        rows
    }

    /// Number of content rows at `width`, excluding the border rows.
    pub fn desired_rows(&self, width: u16) -> u16 {
        self.content_rows(width.max(1) as usize).len() as u16
    }

    /// Standalone rendering: top border, content rows, bottom border. The
    /// first and last lines are decoration; embedding views discard them and
    /// re-frame the inner rows.
    pub fn render_lines(&self, width: u16) -> Vec<Line<'static>> {
        let width = width.max(2) as usize;
        let rows = self.content_rows(width);
        let mut out: Vec<Line<'static>> = Vec::with_capacity(rows.len() + 2);
        out.push(Line::from(format!("╭{}╮", "─".repeat(width - 2))).dim());
        out.extend(rows);
        out.push(Line::from(format!("╰{}╯", "─".repeat(width - 2))).dim());
        out
    }
}

fn byte_offset_for_col(line: &str, col: usize) -> usize {
    line.char_indices()
        .nth(col)
        .map(|(i, _)| i)
        .unwrap_or(line.len())
}
