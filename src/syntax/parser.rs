//! Parser for einsum notation.
//!
//! Grammar:
//!
//! ```text
//! notation := spec ("," spec)* ("->" spec)?
//! spec     := label*
//! ```
//!
//! Without `->` the output is implicit: every label that occurs exactly once
//! across the inputs, in sorted order.

use logos::Logos;

use super::token::Token;
use crate::error::{EinError, Result};
use crate::spec::{Label, LabelMap, Spec};

/// A parsed notation string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notation {
    /// One spec per input operand, in order
    pub inputs: Vec<Spec>,
    /// Spec of the output operand
    pub output: Spec,
}

fn parse_error(src: &str, column: usize, message: impl Into<String>) -> EinError {
    EinError::Parse {
        location: format!("column {} of {:?}", column + 1, src),
        message: message.into(),
    }
}

/// Parse a notation string such as `"ij,jk->ik"` or `"ii"`.
pub fn parse_notation(src: &str) -> Result<Notation> {
    let mut inputs = Vec::new();
    let mut current: Vec<Label> = Vec::new();
    let mut arrow = false;

    for (token, span) in Token::lexer(src).spanned() {
        let token = token.map_err(|_| {
            parse_error(
                src,
                span.start,
                format!("unexpected {:?}", &src[span.clone()]),
            )
        })?;

        match token {
            Token::Label(c) => current.push(Label::new(c)?),
            Token::Comma if arrow => {
                return Err(parse_error(src, span.start, "',' after '->'"));
            }
            Token::Arrow if arrow => {
                return Err(parse_error(src, span.start, "repeated '->'"));
            }
            Token::Comma => inputs.push(current.drain(..).collect()),
            Token::Arrow => {
                inputs.push(current.drain(..).collect());
                arrow = true;
            }
        }
    }

    let output = if arrow {
        current.into_iter().collect()
    } else {
        inputs.push(current.into_iter().collect());
        implicit_output(&inputs)
    };

    Ok(Notation { inputs, output })
}

/// Labels occurring exactly once across `inputs`, sorted.
fn implicit_output(inputs: &[Spec]) -> Spec {
    let mut counts: LabelMap<usize> = LabelMap::default();
    for spec in inputs {
        for &label in spec.labels() {
            *counts.entry(label).or_insert(0) += 1;
        }
    }

    let mut once: Vec<Label> = counts
        .into_iter()
        .filter(|&(_, count)| count == 1)
        .map(|(label, _)| label)
        .collect();
    once.sort();
    once.into_iter().collect()
}
