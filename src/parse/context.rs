use crate::token::{Token, TokenKind};

use super::error::ParseError;

pub struct Context<'a> {
    items: &'a [Token],
    curr_pos: usize,
    // errors that are reported without abandoning the current statement
    errors: Vec<ParseError>,
    // Consider making setter getter for this
    pub is_in_fn: bool,
}

impl<'a> Context<'a> {
    /// `items` must end with an `Eof` token, as produced by `scan`.
    pub fn new(items: &'a [Token]) -> Self {
        Self {
            items,
            curr_pos: 0,
            errors: vec![],
            is_in_fn: false,
        }
    }

    pub fn get_curr(&self) -> &'a Token {
        match self.items.get(self.curr_pos) {
            Some(t) => t,
            // never moves past Eof, so only an empty slice gets here
            None => &EOF,
        }
    }

    pub fn previous(&self) -> &'a Token {
        match self.curr_pos.checked_sub(1).and_then(|p| self.items.get(p)) {
            Some(t) => t,
            None => &EOF,
        }
    }

    pub fn is_at_end(&self) -> bool {
        self.get_curr().kind == TokenKind::Eof
    }

    pub fn advance(&mut self) -> &'a Token {
        let token = self.get_curr();
        if !self.is_at_end() {
            self.curr_pos += 1;
        }
        token
    }

    pub fn peek(&self, match_tokens: &[TokenKind]) -> bool {
        !self.is_at_end() && match_tokens.contains(&self.get_curr().kind)
    }

    /// Advances past the current token if it is one of `match_tokens`.
    pub fn match_token(&mut self, match_tokens: &[TokenKind]) -> Option<&'a Token> {
        if self.peek(match_tokens) {
            Some(self.advance())
        } else {
            None
        }
    }

    pub fn consume_token(
        &mut self,
        token: TokenKind,
        message: &'static str,
    ) -> Result<&'a Token, ParseError> {
        if self.peek(&[token]) {
            return Ok(self.advance());
        }
        Err(ParseError::UnexpectedToken {
            found: self.get_curr().clone(),
            message,
        })
    }

    pub fn report(&mut self, error: ParseError) {
        self.errors.push(error);
    }

    pub fn take_errors(&mut self) -> Vec<ParseError> {
        std::mem::take(&mut self.errors)
    }

    /// Discards tokens until a likely statement boundary: just past a `;`,
    /// or right before `for`, `while`, `if` or `return`.
    pub fn synchronize(&mut self) {
        self.advance();

        while !self.is_at_end() {
            if self.previous().kind == TokenKind::Semicolon {
                return;
            }
            if self.peek(&[
                TokenKind::For,
                TokenKind::While,
                TokenKind::If,
                TokenKind::Return,
            ]) {
                return;
            }
            self.advance();
        }
    }
}

static EOF: Token = Token {
    kind: TokenKind::Eof,
    lexeme: String::new(),
    literal: None,
    line: 0,
};
