mod context;
mod cursor;
mod error;
mod lex;
mod parser;

pub use error::{LexError, ParseError};
pub use lex::scan;
pub use parser::parse;
