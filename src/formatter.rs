//! Parse-then-render formatting of a single query
//!
//! This module owns the contract between the parser and the renderers: the
//! query is parsed with parameter placeholders preserved, rendered with the
//! selected [`RenderStyle`], and terminated with exactly one newline.
//!
//! # Example
//!
//! ```rust
//! use groqfmt::formatter::{FormatOptions, RenderStyle, format_source};
//!
//! let opts = FormatOptions {
//!     style: RenderStyle::Pretty,
//! };
//!
//! let formatted = format_source("*[_type=='movie'&&slug.current==$slug][0]", &opts).unwrap();
//! assert_eq!(formatted, "*[_type == \"movie\" && slug.current == $slug][0]\n");
//! ```

use crate::error::{FormatError, Stage};
use crate::parser::{ParseOptions, parse};
use crate::printer::{self, RenderError, Renderer};
use std::io;

/// Which renderer produces the output
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum RenderStyle {
    /// Minimal syntax on a single line
    Compact,
    /// Layout-aware output, broken over indented lines when long
    #[default]
    Pretty,
}

impl RenderStyle {
    pub fn renderer(self) -> Renderer {
        match self {
            RenderStyle::Compact => printer::print,
            RenderStyle::Pretty => printer::pretty_print,
        }
    }
}

/// Configuration options for the formatter
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct FormatOptions {
    /// Render style applied to every query
    pub style: RenderStyle,
}

/// Format GROQ source text
///
/// Parses `input` keeping `$parameter` placeholders as nodes, renders the
/// tree with the renderer for `opts.style` into a buffer, and appends one
/// line terminator. Nothing is returned unless the whole render succeeded.
///
/// # Errors
///
/// - [`Stage::Parse`] when the query is not valid GROQ
/// - [`Stage::Render`] when the tree cannot be rendered
pub fn format_source(input: &str, opts: &FormatOptions) -> Result<String, FormatError> {
    let tree = parse(input, &ParseOptions::with_param_nodes())
        .map_err(|err| FormatError::new(Stage::Parse, err))?;
    log::trace!("AST: {tree:#?}");

    let render = opts.style.renderer();
    let mut buf = Vec::new();
    render(&tree, &mut buf)
        .map_err(|err| FormatError::new(Stage::Render, err))?;
    buf.push(b'\n');

    String::from_utf8(buf).map_err(|err| {
        let err = io::Error::new(io::ErrorKind::InvalidData, err);
        FormatError::new(Stage::Render, RenderError::Io(err))
    })
}
