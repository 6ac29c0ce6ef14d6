use std::fmt;

use derive_more::Display;

use crate::interpret::RuntimeError;
use crate::parse::{LexError, ParseError};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum DiagnosticKind {
    #[display(fmt = "LexicalError")]
    LexicalError,
    #[display(fmt = "SyntaxError")]
    SyntaxError,
    #[display(fmt = "RuntimeError")]
    RuntimeError,
}

/// One failure, in the shape handed to the host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub kind: DiagnosticKind,
    pub message: String,
    pub line: usize,
    // only lexical errors know their column
    pub column: Option<usize>,
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.column {
            Some(column) => write!(
                f,
                "[line {}, column {}] {}: {}",
                self.line, column, self.kind, self.message
            ),
            None => write!(f, "[line {}] {}: {}", self.line, self.kind, self.message),
        }
    }
}

impl From<&LexError> for Diagnostic {
    fn from(err: &LexError) -> Self {
        let span = err.span();
        Diagnostic {
            kind: DiagnosticKind::LexicalError,
            message: err.to_string(),
            line: span.line,
            column: Some(span.column),
        }
    }
}

impl From<&ParseError> for Diagnostic {
    fn from(err: &ParseError) -> Self {
        let message = if err.is_at_end() {
            format!("{} Found end of input.", err)
        } else {
            err.to_string()
        };
        Diagnostic {
            kind: DiagnosticKind::SyntaxError,
            message,
            line: err.line(),
            column: None,
        }
    }
}

impl From<&RuntimeError> for Diagnostic {
    fn from(err: &RuntimeError) -> Self {
        Diagnostic {
            kind: DiagnosticKind::RuntimeError,
            message: err.to_string(),
            line: err.line(),
            column: None,
        }
    }
}

/// Outcome of running one unit of source text.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Report {
    pub diagnostics: Vec<Diagnostic>,
}

impl Report {
    pub fn is_ok(&self) -> bool {
        self.diagnostics.is_empty()
    }

    pub fn has(&self, kind: DiagnosticKind) -> bool {
        self.diagnostics.iter().any(|d| d.kind == kind)
    }

    pub fn push(&mut self, diagnostic: Diagnostic) {
        self.diagnostics.push(diagnostic);
    }
}

impl Extend<Diagnostic> for Report {
    fn extend<T: IntoIterator<Item = Diagnostic>>(&mut self, iter: T) {
        self.diagnostics.extend(iter);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::span::Span;
    use crate::token::{Token, TokenKind};

    #[test]
    fn lexical_errors_show_the_column() {
        let err = LexError::UnexpectedCharacter('@', Span::new(2, 7));
        let diagnostic = Diagnostic::from(&err);
        assert_eq!(
            diagnostic.to_string(),
            "[line 2, column 7] LexicalError: Unexpected character '@'."
        );
    }

    #[test]
    fn runtime_errors_show_the_line() {
        let token = Token::new(TokenKind::Minus, "-", None, 4);
        let diagnostic = Diagnostic::from(&RuntimeError::OperandMustBeNumber(token));
        assert_eq!(diagnostic.kind, DiagnosticKind::RuntimeError);
        assert_eq!(
            diagnostic.to_string(),
            "[line 4] RuntimeError: Operand must be a number."
        );
    }

    #[test]
    fn syntax_errors_at_end_of_input_say_so() {
        let err = ParseError::UnexpectedToken {
            found: Token::new(TokenKind::Eof, "", None, 3),
            message: "Expect '}' after block.",
        };
        assert_eq!(
            Diagnostic::from(&err).message,
            "Expect '}' after block. Found end of input."
        );
    }

    #[test]
    fn report_tracks_kinds() {
        let mut report = Report::default();
        assert!(report.is_ok());
        report.push(Diagnostic {
            kind: DiagnosticKind::SyntaxError,
            message: "x".to_string(),
            line: 1,
            column: None,
        });
        assert!(!report.is_ok());
        assert!(report.has(DiagnosticKind::SyntaxError));
        assert!(!report.has(DiagnosticKind::RuntimeError));
    }
}
