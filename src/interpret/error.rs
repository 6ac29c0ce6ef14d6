use thiserror::Error;

use crate::token::Token;

/// A failure while evaluating. Every variant carries the token it is reported at.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RuntimeError {
    #[error("Undefined variable '{}'.", .0.lexeme)]
    UndefinedVariable(Token),

    #[error("Variable '{}' is already defined in this scope.", .0.lexeme)]
    AlreadyDefined(Token),

    #[error("Unknown operator '{}'.", .0.lexeme)]
    UnknownOperator(Token),

    #[error("Operand must be a number.")]
    OperandMustBeNumber(Token),

    #[error("Operands must be numbers.")]
    OperandsMustBeNumbers(Token),

    #[error("Operands of '{}' must be two numbers or two strings.", .0.lexeme)]
    InvalidAddOperands(Token),

    #[error("Can only call functions and natives.")]
    NotCallable(Token),

    #[error("Expected {expected} arguments but got {got}.")]
    ArityMismatch {
        paren: Token,
        expected: usize,
        got: usize,
    },
}

impl RuntimeError {
    pub fn token(&self) -> &Token {
        use RuntimeError::*;
        match self {
            UndefinedVariable(t) => t,
            AlreadyDefined(t) => t,
            UnknownOperator(t) => t,
            OperandMustBeNumber(t) => t,
            OperandsMustBeNumbers(t) => t,
            InvalidAddOperands(t) => t,
            NotCallable(t) => t,
            ArityMismatch { paren, .. } => paren,
        }
    }

    pub fn line(&self) -> usize {
        self.token().line
    }
}
