//! Run configuration, fixed before the first input is read

use crate::formatter::{FormatOptions, RenderStyle};
use crate::output::{ModeError, OutputMode};
use std::path::PathBuf;

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Config {
    pub output: OutputMode,
    pub format: FormatOptions,
}

impl Config {
    /// Build the configuration from the `-o`, `-w` and `--compact` flags.
    pub fn from_flags(
        output: Option<PathBuf>,
        write_to_source: bool,
        compact: bool,
    ) -> Result<Self, ModeError> {
        let style = if compact {
            RenderStyle::Compact
        } else {
            RenderStyle::Pretty
        };
        Ok(Self {
            output: OutputMode::from_flags(output, write_to_source)?,
            format: FormatOptions { style },
        })
    }
}
