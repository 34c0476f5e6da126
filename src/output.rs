//! Choosing where a formatted query is written

use crate::source::InputRef;
use std::fmt;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Invalid combinations of output flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ModeError {
    #[error("cannot use -w together with -o flag")]
    WriteWithOutput,
    #[error("cannot use -w with stdin")]
    WriteToStdin,
}

/// Where results go, fixed for the whole run.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum OutputMode {
    #[default]
    Stdout,
    /// `-o FILE`
    File(PathBuf),
    /// `-w`, back into each input file
    InPlace,
}

impl OutputMode {
    /// Fold the `-o` and `-w` flags into a mode, rejecting the two together.
    pub fn from_flags(output: Option<PathBuf>, write_to_source: bool) -> Result<Self, ModeError> {
        match (output, write_to_source) {
            (Some(_), true) => Err(ModeError::WriteWithOutput),
            (Some(path), false) => Ok(OutputMode::File(path)),
            (None, true) => Ok(OutputMode::InPlace),
            (None, false) => Ok(OutputMode::Stdout),
        }
    }

    /// The destination for the document formatted from `input`.
    pub fn resolve<'a>(&'a self, input: &'a InputRef) -> Result<Destination<'a>, ModeError> {
        match (self, input) {
            (OutputMode::Stdout, _) => Ok(Destination::Stdout),
            (OutputMode::File(path), _) => Ok(Destination::File(path)),
            (OutputMode::InPlace, InputRef::Stdin) => Err(ModeError::WriteToStdin),
            (OutputMode::InPlace, InputRef::Path(path)) => Ok(Destination::File(path)),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Destination<'a> {
    Stdout,
    File(&'a Path),
}

impl Destination<'_> {
    /// Write the whole document, creating or truncating a file destination.
    pub fn write(&self, document: &str, stdout: &mut dyn Write) -> io::Result<()> {
        match self {
            Destination::Stdout => {
                stdout.write_all(document.as_bytes())?;
                stdout.flush()
            }
            Destination::File(path) => fs::write(path, document),
        }
    }
}

impl fmt::Display for Destination<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Destination::Stdout => f.write_str("standard output"),
            Destination::File(path) => write!(f, "{}", path.display()),
        }
    }
}
