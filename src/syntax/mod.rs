//! Notation syntax: lexer and parser for `"ij,jk->ik"` strings.

mod parser;
mod token;

pub use parser::{parse_notation, Notation};
pub use token::Token;
