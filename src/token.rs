use std::fmt;

use derive_more::Display;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
pub enum TokenKind {
    #[display(fmt = "(")]
    LeftParen,
    #[display(fmt = ")")]
    RightParen,
    #[display(fmt = "{{")]
    LeftBrace,
    #[display(fmt = "}}")]
    RightBrace,
    #[display(fmt = ",")]
    Comma,
    #[display(fmt = ".")]
    Dot,
    #[display(fmt = "-")]
    Minus,
    #[display(fmt = "+")]
    Plus,
    #[display(fmt = ";")]
    Semicolon,
    #[display(fmt = "/")]
    Slash,
    #[display(fmt = "*")]
    Star,

    #[display(fmt = "!")]
    Bang,
    #[display(fmt = "!=")]
    BangEqual,
    #[display(fmt = "=")]
    Equal,
    #[display(fmt = "==")]
    EqualEqual,
    #[display(fmt = ">")]
    Greater,
    #[display(fmt = ">=")]
    GreaterEqual,
    #[display(fmt = "<")]
    Less,
    #[display(fmt = "<=")]
    LessEqual,

    #[display(fmt = "identifier")]
    Identifier,
    #[display(fmt = "string")]
    String,
    #[display(fmt = "number")]
    Number,

    #[display(fmt = "and")]
    And,
    #[display(fmt = "else")]
    Else,
    #[display(fmt = "false")]
    False,
    #[display(fmt = "for")]
    For,
    #[display(fmt = "fun")]
    Fun,
    #[display(fmt = "if")]
    If,
    #[display(fmt = "null")]
    Null,
    #[display(fmt = "or")]
    Or,
    #[display(fmt = "print")]
    Print,
    #[display(fmt = "return")]
    Return,
    #[display(fmt = "true")]
    True,
    #[display(fmt = "var")]
    Var,
    #[display(fmt = "void")]
    Void,
    #[display(fmt = "while")]
    While,

    #[display(fmt = "end of input")]
    Eof,
}

/// The value a literal token (or literal expression) stands for.
#[derive(Debug, Clone, PartialEq)]
pub enum Literal {
    Null,
    Bool(bool),
    Number(f64),
    Str(String),
}

impl fmt::Display for Literal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Literal::Null => write!(f, "null"),
            Literal::Bool(v) => write!(f, "{}", v),
            Literal::Number(v) => write!(f, "{}", v),
            Literal::Str(v) => write!(f, "{:?}", v),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    pub lexeme: String,
    pub literal: Option<Literal>,
    pub line: usize,
}

impl Token {
    pub fn new(kind: TokenKind, lexeme: impl Into<String>, literal: Option<Literal>, line: usize) -> Self {
        Token {
            kind,
            lexeme: lexeme.into(),
            literal,
            line,
        }
    }}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            TokenKind::Eof => write!(f, "end of input"),
            _ => write!(f, "{}", self.lexeme),
        }
    }
}
