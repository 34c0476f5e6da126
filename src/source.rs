//! Resolving command-line inputs to query text

use std::fmt;
use std::fs;
use std::io::{self, Read};
use std::path::PathBuf;

/// One input named on the command line.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum InputRef {
    /// The `-` sentinel
    Stdin,
    Path(PathBuf),
}

impl InputRef {
    pub const STDIN_SENTINEL: &'static str = "-";

    pub fn from_arg(arg: &str) -> Self {
        if arg == Self::STDIN_SENTINEL {
            InputRef::Stdin
        } else {
            InputRef::Path(PathBuf::from(arg))
        }
    }

    pub fn is_stdin(&self) -> bool {
        matches!(self, InputRef::Stdin)
    }
}

impl fmt::Display for InputRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InputRef::Stdin => f.write_str(Self::STDIN_SENTINEL),
            InputRef::Path(path) => write!(f, "{}", path.display()),
        }
    }
}

/// Read the complete text of `input`; `stdin` is consulted only for [`InputRef::Stdin`].
///
/// Either the whole content is returned or the underlying I/O error, unchanged.
pub fn read_source(input: &InputRef, stdin: &mut dyn Read) -> io::Result<String> {
    match input {
        InputRef::Stdin => {
            let mut text = String::new();
            stdin.read_to_string(&mut text)?;
            Ok(text)
        }
        InputRef::Path(path) => fs::read_to_string(path),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn sentinel_and_paths() {
        assert_eq!(InputRef::from_arg("-"), InputRef::Stdin);
        assert_eq!(
            InputRef::from_arg("queries/a.groq"),
            InputRef::Path(PathBuf::from("queries/a.groq"))
        );
        assert_eq!(InputRef::from_arg("-").to_string(), "-");
        assert_eq!(InputRef::from_arg("a.groq").to_string(), "a.groq");
    }

    #[test]
    fn reads_stdin_to_end() {
        let mut stdin = Cursor::new("*[_type == \"a\"]\n".as_bytes());
        let text = read_source(&InputRef::Stdin, &mut stdin).unwrap();
        assert_eq!(text, "*[_type == \"a\"]\n");
    }

    #[test]
    fn reads_files_without_touching_stdin() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("q.groq");
        fs::write(&path, "count(*)").unwrap();

        let mut stdin = Cursor::new("unused".as_bytes());
        let text = read_source(&InputRef::Path(path), &mut stdin).unwrap();
        assert_eq!(text, "count(*)");
        assert_eq!(stdin.position(), 0);
    }

    #[test]
    fn missing_file_surfaces_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let input = InputRef::Path(dir.path().join("nope.groq"));
        let err = read_source(&input, &mut io::empty()).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::NotFound);
    }
}
