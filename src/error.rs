//! Errors raised while formatting an input
//!
//! Every failure is a [`FormatError`]: the [`Stage`] it happened in, the
//! input being processed when known, and the underlying cause, which stays
//! reachable through [`std::error::Error::source`].

use crate::output::ModeError;
use crate::parser::ParseError;
use crate::printer::RenderError;
use crate::source::InputRef;
use std::fmt;
use std::io;
use thiserror::Error;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Stage {
    Read,
    Parse,
    Render,
    Write,
    Validate,
}

#[derive(Debug, Error)]
pub enum Cause {
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error(transparent)]
    Parse(#[from] ParseError),
    #[error(transparent)]
    Render(#[from] RenderError),
    #[error(transparent)]
    Mode(#[from] ModeError),
}

#[derive(Debug)]
pub struct FormatError {
    stage: Stage,
    input: Option<InputRef>,
    cause: Cause,
}

impl FormatError {
    pub fn new(stage: Stage, cause: impl Into<Cause>) -> Self {
        Self {
            stage,
            input: None,
            cause: cause.into(),
        }
    }

    /// Attach the input that was being processed.
    pub fn for_input(mut self, input: &InputRef) -> Self {
        self.input = Some(input.clone());
        self
    }

    pub fn stage(&self) -> Stage {
        self.stage
    }

    pub fn input(&self) -> Option<&InputRef> {
        self.input.as_ref()
    }

    pub fn cause(&self) -> &Cause {
        &self.cause
    }
}

impl fmt::Display for FormatError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(input) = &self.input {
            write!(f, "formatting {input}: ")?;
        }
        match self.stage {
            Stage::Parse => write!(f, "parsing query: {}", self.cause),
            Stage::Render => write!(f, "formatting query: {}", self.cause),
            Stage::Read | Stage::Write | Stage::Validate => write!(f, "{}", self.cause),
        }
    }
}

impl std::error::Error for FormatError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.cause)
    }
}
