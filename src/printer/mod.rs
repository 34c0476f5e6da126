//! Renderers turning a GROQ syntax tree back into text
//!
//! Two renderers share one signature, [`Renderer`]:
//!
//! - [`print`] emits the most compact text that still parses to the same tree.
//! - [`pretty_print`] lays the query out for reading, breaking long
//!   constructs over several indented lines.
//!
//! Neither renderer adds a trailing newline.

mod compact;
mod doc;
mod pretty;

pub use compact::print;
pub use pretty::{PrettyOptions, pretty_print, pretty_print_with};

use crate::ast::{Expr, is_identifier};
use crate::lexer::is_keyword;
use std::io::{self, Write};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("writing output: {0}")]
    Io(#[from] io::Error),
    #[error("{0:?} is not a valid identifier")]
    InvalidIdentifier(String),
}

/// Shared shape of both renderers.
pub type Renderer = fn(&Expr, &mut dyn Write) -> Result<(), RenderError>;

/// Reject names that would not lex back as a single identifier.
fn identifier(name: &str) -> Result<&str, RenderError> {
    if is_identifier(name) && !is_keyword(name) {
        Ok(name)
    } else {
        Err(RenderError::InvalidIdentifier(name.to_string()))
    }
}

/// Parameter names may be keywords, since the `$` sets them apart.
fn param_name(name: &str) -> Result<&str, RenderError> {
    if is_identifier(name) {
        Ok(name)
    } else {
        Err(RenderError::InvalidIdentifier(name.to_string()))
    }
}

/// Double-quoted string literal with JSON escapes.
fn quote(value: &str) -> String {
    let mut out = String::with_capacity(value.len() + 2);
    out.push('"');
    for c in value.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            '\u{8}' => out.push_str("\\b"),
            '\u{c}' => out.push_str("\\f"),
            c if (c as u32) < 0x20 => out.push_str(&format!("\\u{:04x}", c as u32)),
            c => out.push(c),
        }
    }
    out.push('"');
    out
}
