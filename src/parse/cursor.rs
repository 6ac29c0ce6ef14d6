use crate::span::Span;

/// Forward-only character cursor over the raw source, tracking line and column.
pub struct Cursor {
    chars: Vec<char>,
    position: usize,
    line: usize,
    // characters consumed on the current line
    column: usize,
}

impl Cursor {
    pub fn new(input: &str) -> Self {
        Self {
            chars: input.chars().collect(),
            position: 0,
            line: 1,
            column: 0,
        }
    }

    pub fn next(&mut self) -> Option<char> {
        let c = *self.chars.get(self.position)?;
        self.position += 1;
        if c == '\n' {
            self.line += 1;
            self.column = 0;
        } else {
            self.column += 1;
        }
        Some(c)
    }

    pub fn peek(&self) -> Option<char> {
        self.chars.get(self.position).copied()
    }

    pub fn peek_next(&self) -> Option<char> {
        self.chars.get(self.position + 1).copied()
    }

    pub fn line(&self) -> usize {
        self.line
    }

    /// Position of the character `peek` would return.
    pub fn span(&self) -> Span {
        Span::new(self.line, self.column + 1)
    }

    pub fn read_while(&mut self, condition: impl Fn(char) -> bool) -> String {
        let mut result = String::new();
        while let Some(c) = self.peek() {
            if !condition(c) {
                break;
            }
            self.position += 1;
            self.column += 1;
            result.push(c);
            if c == '\n' {
                self.line += 1;
                self.column = 0;
            }
        }
        result
    }
}
