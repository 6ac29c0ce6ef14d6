use log::trace;
use phf::phf_map;

use super::cursor::Cursor;
use super::error::LexError;
use crate::span::Span;
use crate::token::{Literal, Token, TokenKind};

static KEYWORDS: phf::Map<&'static str, TokenKind> = phf_map! {
    "and" => TokenKind::And,
    "else" => TokenKind::Else,
    "false" => TokenKind::False,
    "for" => TokenKind::For,
    "fun" => TokenKind::Fun,
    "if" => TokenKind::If,
    "null" => TokenKind::Null,
    "or" => TokenKind::Or,
    "print" => TokenKind::Print,
    "return" => TokenKind::Return,
    "true" => TokenKind::True,
    "var" => TokenKind::Var,
    "void" => TokenKind::Void,
    "while" => TokenKind::While,
};

fn is_identifier_start(c: char) -> bool {
    c == '_' || c.is_ascii_alphabetic()
}

fn is_identifier_char(c: char) -> bool {
    c == '_' || c.is_ascii_alphanumeric()
}

/// Turns the source into tokens, always ending with a single `Eof` token.
///
/// Bad input never stops the scan: the offending character (or the rest of an
/// unterminated string) is skipped and reported, and scanning carries on.
pub fn scan(input: &str) -> (Vec<Token>, Vec<LexError>) {
    let mut scanner = Scanner::new(input);
    scanner.scan_tokens();
    trace!(
        "scanned {} tokens with {} errors",
        scanner.tokens.len(),
        scanner.errors.len()
    );
    (scanner.tokens, scanner.errors)
}

struct Scanner {
    cursor: Cursor,
    tokens: Vec<Token>,
    errors: Vec<LexError>,
}

impl Scanner {
    fn new(input: &str) -> Self {
        Self {
            cursor: Cursor::new(input),
            tokens: vec![],
            errors: vec![],
        }
    }

    fn scan_tokens(&mut self) {
        while let Some(c) = self.cursor.peek() {
            let start = self.cursor.span();
            match c {
                ' ' | '\t' | '\r' | '\n' => {
                    self.cursor.next();
                }
                '"' => self.scan_string(start),
                '(' => self.single(c, TokenKind::LeftParen),
                ')' => self.single(c, TokenKind::RightParen),
                '{' => self.single(c, TokenKind::LeftBrace),
                '}' => self.single(c, TokenKind::RightBrace),
                ',' => self.single(c, TokenKind::Comma),
                '.' => self.single(c, TokenKind::Dot),
                '-' => self.single(c, TokenKind::Minus),
                '+' => self.single(c, TokenKind::Plus),
                ';' => self.single(c, TokenKind::Semicolon),
                '*' => self.single(c, TokenKind::Star),
                '!' => self.one_or_two(c, TokenKind::Bang, TokenKind::BangEqual),
                '=' => self.one_or_two(c, TokenKind::Equal, TokenKind::EqualEqual),
                '<' => self.one_or_two(c, TokenKind::Less, TokenKind::LessEqual),
                '>' => self.one_or_two(c, TokenKind::Greater, TokenKind::GreaterEqual),
                '/' => {
                    if self.cursor.peek_next() == Some('/') {
                        self.cursor.read_while(|c| c != '\n');
                    } else {
                        self.single(c, TokenKind::Slash);
                    }
                }
                c if c.is_ascii_digit() => self.scan_number(start),
                c if is_identifier_start(c) => self.scan_identifier(),
                c => {
                    self.cursor.next();
                    self.errors.push(LexError::UnexpectedCharacter(c, start));
                }
            }
        }

        let line = self.cursor.line();
        self.tokens.push(Token::new(TokenKind::Eof, "", None, line));
    }

    fn push(&mut self, kind: TokenKind, lexeme: String, literal: Option<Literal>, line: usize) {
        self.tokens.push(Token::new(kind, lexeme, literal, line));
    }

    fn single(&mut self, c: char, kind: TokenKind) {
        let line = self.cursor.line();
        self.cursor.next();
        self.push(kind, c.to_string(), None, line);
    }

    // the two-character form is always `c=`
    fn one_or_two(&mut self, c: char, one: TokenKind, two: TokenKind) {
        let line = self.cursor.line();
        self.cursor.next();
        if self.cursor.peek() == Some('=') {
            self.cursor.next();
            self.push(two, format!("{}=", c), None, line);
        } else {
            self.push(one, c.to_string(), None, line);
        }
    }

    fn scan_string(&mut self, start: Span) {
        // opening quote
        self.cursor.next();

        let mut lexeme = String::from('"');
        let mut value = String::new();
        loop {
            match self.cursor.next() {
                None => {
                    self.errors.push(LexError::UnterminatedString(start));
                    return;
                }
                Some('"') => {
                    lexeme.push('"');
                    break;
                }
                Some('\\') => {
                    lexeme.push('\\');
                    let Some(escaped) = self.cursor.next() else {
                        self.errors.push(LexError::UnterminatedString(start));
                        return;
                    };
                    lexeme.push(escaped);
                    value.push(escaped);
                }
                Some(c) => {
                    lexeme.push(c);
                    value.push(c);
                }
            }
        }

        self.push(
            TokenKind::String,
            lexeme,
            Some(Literal::Str(value)),
            start.line,
        );
    }

    fn scan_number(&mut self, start: Span) {
        let mut text = self.cursor.read_while(|c| c.is_ascii_digit());

        let has_fraction = self.cursor.peek() == Some('.')
            && self
                .cursor
                .peek_next()
                .map(|c| c.is_ascii_digit())
                .unwrap_or(false);
        if has_fraction {
            self.cursor.next();
            text.push('.');
            text.push_str(&self.cursor.read_while(|c| c.is_ascii_digit()));
        }

        // digits with an optional fraction always parse
        let value = text.parse::<f64>().unwrap_or_default();
        self.push(TokenKind::Number, text, Some(Literal::Number(value)), start.line);
    }

    fn scan_identifier(&mut self) {
        let line = self.cursor.line();
        let word = self.cursor.read_while(is_identifier_char);
        let kind = KEYWORDS
            .get(word.as_str())
            .copied()
            .unwrap_or(TokenKind::Identifier);
        self.push(kind, word, None, line);
    }
}
