//! # groqfmt - GROQ Query Formatter
//!
//! groqfmt formats queries written in [GROQ](https://www.sanity.io/docs/groq),
//! the query language of the Sanity content platform. A query is parsed into a
//! syntax tree and rendered back either in a compact single-line form or in a
//! layout-aware form that breaks long queries over indented lines.
//!
//! ## Usage
//!
//! ### As a Library
//!
//! ```rust
//! use groqfmt::formatter::{FormatOptions, RenderStyle, format_source};
//!
//! let query = r#"*[_type=="movie"]{title,"director":director->name}"#;
//!
//! let opts = FormatOptions {
//!     style: RenderStyle::Pretty,
//! };
//!
//! let formatted = format_source(query, &opts).unwrap();
//! assert_eq!(formatted, "*[_type == \"movie\"] { title, \"director\": director->name }\n");
//! ```
//!
//! ### As a CLI Tool
//!
//! ```text
//! groqfmt [-c] [-o FILE | -w] [- | FILE]...
//! ```
//!
//! With no files the query is read from standard input. Results go to
//! standard output unless `-o` names a file or `-w` rewrites each input in
//! place. Files are processed in order and the first failure stops the run.
//!
//! ## Modules
//!
//! - [`lexer`] and [`parser`] - GROQ source to [`ast`]
//! - [`printer`] - compact and pretty renderers
//! - [`formatter`] - parse, render and newline normalisation
//! - [`source`], [`output`], [`driver`] - reading inputs, choosing destinations, batching

/// Syntax tree for GROQ queries
pub mod ast;

/// Run configuration derived from command-line flags
pub mod config;

/// Batch processing of inputs
pub mod driver;

/// Structured formatting errors
pub mod error;

/// Core formatting entry point
pub mod formatter;

/// GROQ tokenizer
pub mod lexer;

/// Output destinations
pub mod output;

/// GROQ parser
pub mod parser;

/// Compact and pretty renderers
pub mod printer;

/// Input resolution
pub mod source;
