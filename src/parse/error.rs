use crate::span::Span;
use crate::token::{Token, TokenKind};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum LexError {
    #[error("Unexpected character '{0}'.")]
    UnexpectedCharacter(char, Span),

    #[error("Unterminated string.")]
    UnterminatedString(Span),
}

impl LexError {
    pub fn span(&self) -> Span {
        use LexError::*;
        match self {
            UnexpectedCharacter(_, s) => *s,
            UnterminatedString(s) => *s,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ParseError {
    #[error("{message}")]
    UnexpectedToken { found: Token, message: &'static str },

    #[error("Invalid assignment target.")]
    InvalidAssignmentTarget(Token),

    #[error("Can't have more than 255 arguments.")]
    TooManyArguments(Token),

    #[error("Can't have more than 255 parameters.")]
    TooManyParameters(Token),

    #[error("Already a parameter named '{}' in this function.", .0.lexeme)]
    DuplicateParameter(Token),

    #[error("Can't return from top-level code.")]
    ReturnOutsideFunction(Token),
}

impl ParseError {
    pub fn token(&self) -> &Token {
        use ParseError::*;
        match self {
            UnexpectedToken { found, .. } => found,
            InvalidAssignmentTarget(t) => t,
            TooManyArguments(t) => t,
            TooManyParameters(t) => t,
            DuplicateParameter(t) => t,
            ReturnOutsideFunction(t) => t,
        }
    }

    pub fn line(&self) -> usize {
        self.token().line
    }

    pub fn is_at_end(&self) -> bool {
        self.token().kind == TokenKind::Eof
    }
}
