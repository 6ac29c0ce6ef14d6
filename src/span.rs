use derive_more::Display;

/// A position in the source text. Both fields are 1-based.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
#[display(fmt = "[{}:{}]", line, column)]
pub struct Span {
    pub line: usize,
    pub column: usize,
}

impl Span {
    pub fn new(line: usize, column: usize) -> Self {
        Span { line, column }
    }
}
