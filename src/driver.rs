//! Sequential, fail-fast processing of the inputs named on the command line

use crate::config::Config;
use crate::error::{FormatError, Stage};
use crate::formatter::format_source;
use crate::source::{InputRef, read_source};
use std::io::{self, Read, Write};

/// Format every input in order using the process's standard streams.
///
/// With no inputs, standard input is formatted. The first failure stops the
/// run and is labelled with the input it happened on.
pub fn run(inputs: &[InputRef], config: &Config) -> Result<(), FormatError> {
    run_with(inputs, config, &mut io::stdin(), &mut io::stdout())
}

/// [`run`] with explicit standard streams.
pub fn run_with(
    inputs: &[InputRef],
    config: &Config,
    stdin: &mut dyn Read,
    stdout: &mut dyn Write,
) -> Result<(), FormatError> {
    if inputs.is_empty() {
        return process(&InputRef::Stdin, config, stdin, stdout);
    }
    for input in inputs {
        process(input, config, stdin, stdout)
            .map_err(|err| err.for_input(input))?;
    }
    Ok(())
}

fn process(
    input: &InputRef,
    config: &Config,
    stdin: &mut dyn Read,
    stdout: &mut dyn Write,
) -> Result<(), FormatError> {
    let destination = config
        .output
        .resolve(input)
        .map_err(|err| FormatError::new(Stage::Validate, err))?;

    log::debug!("Reading {input}");
    let source = read_source(input, stdin)
        .map_err(|err| FormatError::new(Stage::Read, err))?;

    log::debug!("Formatting {input}");
    let formatted = format_source(&source, &config.format)?;

    log::debug!("Writing to {destination}");
    destination
        .write(&formatted, stdout)
        .map_err(|err| FormatError::new(Stage::Write, err))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::formatter::{FormatOptions, RenderStyle};
    use crate::output::OutputMode;
    use std::fs;
    use std::io::Cursor;

    fn stdout_config() -> Config {
        Config::default()
    }

    #[test]
    fn no_inputs_reads_stdin_and_writes_stdout() {
        let mut stdin = Cursor::new("*[a==1]{b}".as_bytes());
        let mut stdout = Vec::new();
        run_with(&[], &stdout_config(), &mut stdin, &mut stdout).unwrap();
        assert_eq!(String::from_utf8(stdout).unwrap(), "*[a == 1] { b }\n");
    }

    #[test]
    fn inputs_are_processed_in_order() {
        let dir = tempfile::tempdir().unwrap();
        let a = dir.path().join("a.groq");
        let b = dir.path().join("b.groq");
        fs::write(&a, "count( * )").unwrap();
        fs::write(&b, "@ . x").unwrap();

        let config = Config {
            output: OutputMode::Stdout,
            format: FormatOptions {
                style: RenderStyle::Compact,
            },
        };
        let inputs = [InputRef::Path(a), InputRef::Stdin, InputRef::Path(b)];
        let mut stdin = Cursor::new("[1, 2]".as_bytes());
        let mut stdout = Vec::new();
        run_with(&inputs, &config, &mut stdin, &mut stdout).unwrap();
        assert_eq!(String::from_utf8(stdout).unwrap(), "count(*)\n[1,2]\n@.x\n");
    }

    #[test]
    fn first_failure_stops_the_batch() {
        let dir = tempfile::tempdir().unwrap();
        let bad = dir.path().join("bad.groq");
        let good = dir.path().join("good.groq");
        fs::write(&bad, "*[").unwrap();
        fs::write(&good, "*[a==1]").unwrap();

        let config = Config {
            output: OutputMode::InPlace,
            ..Config::default()
        };
        let inputs = [InputRef::Path(bad.clone()), InputRef::Path(good.clone())];
        let err = run_with(&inputs, &config, &mut io::empty(), &mut io::sink()).unwrap_err();

        assert_eq!(err.stage(), Stage::Parse);
        assert_eq!(err.input(), Some(&InputRef::Path(bad.clone())));
        assert!(
            err.to_string()
                .starts_with(&format!("formatting {}: parsing query: ", bad.display())),
            "{err}"
        );
        assert_eq!(fs::read_to_string(&bad).unwrap(), "*[");
        assert_eq!(fs::read_to_string(&good).unwrap(), "*[a==1]");
    }

    #[test]
    fn in_place_rewrites_each_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("q.groq");
        fs::write(&path, "*[a==1]").unwrap();

        let config = Config {
            output: OutputMode::InPlace,
            ..Config::default()
        };
        let mut stdout = Vec::new();
        run_with(
            &[InputRef::Path(path.clone())],
            &config,
            &mut io::empty(),
            &mut stdout,
        )
        .unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "*[a == 1]\n");
        assert!(stdout.is_empty());
    }

    #[test]
    fn in_place_with_stdin_fails_before_reading() {
        let config = Config {
            output: OutputMode::InPlace,
            ..Config::default()
        };
        let mut stdin = Cursor::new("not even a query (".as_bytes());

        let err = run_with(&[], &config, &mut stdin, &mut io::sink()).unwrap_err();
        assert_eq!(err.stage(), Stage::Validate);
        assert_eq!(err.to_string(), "cannot use -w with stdin");
        assert_eq!(stdin.position(), 0);

        let err = run_with(&[InputRef::Stdin], &config, &mut stdin, &mut io::sink()).unwrap_err();
        assert_eq!(err.to_string(), "formatting -: cannot use -w with stdin");
    }

    #[test]
    fn explicit_output_file_receives_result() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("out.groq");
        let config = Config {
            output: OutputMode::File(out.clone()),
            ..Config::default()
        };
        let mut stdin = Cursor::new("count(*[])".as_bytes());
        let mut stdout = Vec::new();
        run_with(&[InputRef::Stdin], &config, &mut stdin, &mut stdout).unwrap();
        assert_eq!(fs::read_to_string(&out).unwrap(), "count(*[])\n");
        assert!(stdout.is_empty());
    }

    #[test]
    fn missing_file_is_a_read_error() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("missing.groq");
        let err = run_with(
            &[InputRef::Path(missing)],
            &stdout_config(),
            &mut io::empty(),
            &mut io::sink(),
        )
        .unwrap_err();
        assert_eq!(err.stage(), Stage::Read);
    }
}
