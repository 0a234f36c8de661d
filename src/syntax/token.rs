//! Token definitions for einsum notation.
//!
//! Uses the `logos` crate for lexing.

use logos::Logos;

/// Tokens of a notation string such as `"ij,jk->ik"`.
#[derive(Logos, Debug, Clone, Copy, PartialEq)]
#[logos(skip r"[ \t\r\n]+")] // Skip whitespace
pub enum Token {
    #[token(",")]
    Comma,
    #[token("->")]
    Arrow,

    /// One dimension label
    #[regex(r"[a-zA-Z]", |lex| lex.slice().chars().next())]
    Label(char),
}

impl std::fmt::Display for Token {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Token::Comma => write!(f, ","),
            Token::Arrow => write!(f, "->"),
            Token::Label(c) => write!(f, "{}", c),
        }
    }
}
