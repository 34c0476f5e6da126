use anyhow::Result;
use clap::Parser;
use clap::error::ErrorKind;
use groqfmt::config::Config;
use groqfmt::driver;
use groqfmt::source::InputRef;
use std::path::PathBuf;
use std::process;

#[derive(Parser, Debug)]
#[command(
    name = "groqfmt",
    version,
    about = "Formatter for GROQ queries",
    override_usage = "groqfmt [OPTIONS] [- | FILE]..."
)]
struct Cli {
    /// Queries to format; `-` or nothing reads standard input
    #[arg(value_name = "FILE")]
    inputs: Vec<String>,
    /// Write to file instead of standard output
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,
    /// Write back to input file
    #[arg(short = 'w')]
    write: bool,
    /// Compact syntax
    #[arg(short, long)]
    compact: bool,
}

fn main() {
    pretty_env_logger::init();

    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) => match err.kind() {
            ErrorKind::DisplayHelp => {
                print!("{err}");
                process::exit(2);
            }
            ErrorKind::DisplayVersion => {
                print!("{err}");
                process::exit(0);
            }
            _ => {
                eprintln!("fatal: {}", usage_error_message(&err));
                process::exit(1);
            }
        },
    };

    if let Err(err) = run(cli) {
        eprintln!("fatal: {err}");
        process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    let config = Config::from_flags(cli.output, cli.write, cli.compact)?;
    log::debug!(
        "Output mode {:?}, style {:?}",
        config.output,
        config.format.style
    );

    let inputs: Vec<InputRef> = cli
        .inputs
        .iter()
        .map(|arg| InputRef::from_arg(arg))
        .collect();
    driver::run(&inputs, &config)?;
    Ok(())
}

/// First line of clap's report without its own `error: ` prefix.
fn usage_error_message(err: &clap::Error) -> String {
    let rendered = err.to_string();
    let first = rendered.lines().next().unwrap_or_default();
    first.strip_prefix("error: ").unwrap_or(first).to_string()
}
