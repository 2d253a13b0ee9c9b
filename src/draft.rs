use crossterm::event::{Event, KeyCode, KeyEvent, KeyEventKind};
use tui_input::{Input, InputRequest, backend::crossterm::EventHandler};

use crate::models::ParsedDraft;

/// Multi-line authoring buffer. Each line is its own `Input`, `row` is the
/// line holding the cursor.
#[derive(Clone, Debug)]
pub struct Draft {
    lines: Vec<Input>,
    row: usize,
}

impl Default for Draft {
    fn default() -> Self {
        Draft {
            lines: vec![Input::default()],
            row: 0,
        }
    }
}

impl Draft {
    pub fn from_text(text: &str) -> Draft {
        let lines: Vec<Input> = text.split('\n').map(|l| Input::new(l.to_string())).collect();
        let row = lines.len() - 1;
        Draft { lines, row }
    }

    pub fn text(&self) -> String {
        self.lines
            .iter()
            .map(|l| l.value())
            .collect::<Vec<_>>()
            .join("\n")
    }

    pub fn parse(&self) -> Option<ParsedDraft> {
        ParsedDraft::parse(&self.text())
    }

    pub fn is_empty(&self) -> bool {
        self.lines.len() == 1 && self.lines[0].value().is_empty()
    }

    pub fn clear(&mut self) {
        *self = Draft::default();
    }

    pub fn lines(&self) -> impl Iterator<Item = &str> {
        self.lines.iter().map(|l| l.value())
    }

    pub fn row(&self) -> usize {
        self.row
    }

    pub fn current(&self) -> &Input {
        &self.lines[self.row]
    }

    /// Applies a terminal event to the buffer. Returns true if the text or the
    /// cursor changed.
    pub fn handle_event(&mut self, event: &Event) -> bool {
        match event {
            Event::Key(KeyEvent {
                code,
                kind: KeyEventKind::Press,
                ..
            }) => match code {
                KeyCode::Enter => {
                    self.split_line();
                    true
                }
                KeyCode::Backspace if self.col() == 0 && self.row > 0 => {
                    self.join_with_previous();
                    true
                }
                KeyCode::Delete if self.col() == self.line_len(self.row) && self.row + 1 < self.lines.len() => {
                    self.row += 1;
                    self.join_with_previous();
                    true
                }
                KeyCode::Up if self.row > 0 => {
                    self.move_to_row(self.row - 1);
                    true
                }
                KeyCode::Down if self.row + 1 < self.lines.len() => {
                    self.move_to_row(self.row + 1);
                    true
                }
                _ => self.lines[self.row].handle_event(event).is_some(),
            },
            Event::Paste(text) => {
                self.insert_str(text);
                true
            }
            _ => false,
        }
    }

    pub fn insert_str(&mut self, text: &str) {
        for c in text.chars() {
            match c {
                '\n' => self.split_line(),
                '\r' => {}
                c => {
                    self.lines[self.row].handle(InputRequest::InsertChar(c));
                }
            }
        }
    }

    fn col(&self) -> usize {
        self.lines[self.row].cursor()
    }

    fn line_len(&self, row: usize) -> usize {
        self.lines[row].value().chars().count()
    }

    fn split_line(&mut self) {
        let line = self.lines[self.row].value();
        let (head, tail) = line.split_at(byte_offset(line, self.col()));
        let (head, tail) = (head.to_string(), tail.to_string());
        self.lines[self.row] = Input::new(head);
        self.lines.insert(self.row + 1, Input::new(tail).with_cursor(0));
        self.row += 1;
    }

    fn join_with_previous(&mut self) {
        let current = self.lines.remove(self.row);
        self.row -= 1;
        let previous = &self.lines[self.row];
        let col = previous.value().chars().count();
        let joined = format!("{}{}", previous.value(), current.value());
        self.lines[self.row] = Input::new(joined).with_cursor(col);
    }

    fn move_to_row(&mut self, row: usize) {
        let col = self.col().min(self.line_len(row));
        self.row = row;
        let line = std::mem::take(&mut self.lines[row]);
        self.lines[row] = line.with_cursor(col);
    }
}

fn byte_offset(s: &str, chars: usize) -> usize {
    s.char_indices().nth(chars).map_or(s.len(), |(i, _)| i)
}
