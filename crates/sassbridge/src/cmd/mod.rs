use std::path::PathBuf;
use std::time::Duration;

use clap::{Args, Subcommand};

use crate::exit::{CliError, CliResult, USAGE};
use crate::output::OutputFormat;

pub mod compile;
pub mod envinfo;
pub mod probe;
pub mod version;

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Compile a stylesheet and print the CSS.
    Compile(CompileArgs),
    /// Ask the compiler for its version over the embedded protocol.
    Probe(ProbeArgs),
    /// Show version information.
    Version(VersionArgs),
    /// Print build and environment diagnostics.
    Envinfo(EnvinfoArgs),
}

pub fn run(command: Command, format: Option<OutputFormat>) -> CliResult<i32> {
    let format_or_default = || format.unwrap_or_else(OutputFormat::default_for_stdout);
    match command {
        // CSS is the useful default whether or not stdout is a terminal.
        Command::Compile(args) => compile::run(args, format.unwrap_or(OutputFormat::Raw)),
        Command::Probe(args) => probe::run(args, format_or_default()),
        Command::Version(args) => version::run(args),
        Command::Envinfo(args) => envinfo::run(args, format_or_default()),
    }
}

/// How to reach the compiler.
#[derive(Args, Debug)]
pub struct CompilerArgs {
    /// Compiler executable, launched with `--embedded`.
    #[arg(long, env = "SASSBRIDGE_COMPILER", default_value = "sass")]
    pub compiler: PathBuf,
    /// Program loader to use if the compiler cannot be executed directly.
    #[arg(long, env = "SASSBRIDGE_LOADER")]
    pub loader: Option<PathBuf>,
    /// Maximum time to wait for the compiler (e.g. 30s, 500ms).
    #[arg(long, default_value = "30s")]
    pub timeout: String,
}

#[derive(Args, Debug)]
pub struct CompileArgs {
    /// Stylesheet to compile, or `-` to read from stdin.
    pub input: String,
    /// Output style: expanded or compressed.
    #[arg(long, default_value = "expanded")]
    pub style: String,
    /// Syntax of stdin input: scss, indented or css.
    #[arg(long, default_value = "scss")]
    pub syntax: String,
    /// Ask the compiler for a source map.
    #[arg(long)]
    pub source_map: bool,
    #[command(flatten)]
    pub compiler: CompilerArgs,
}

#[derive(Args, Debug)]
pub struct ProbeArgs {
    #[command(flatten)]
    pub compiler: CompilerArgs,
}

#[derive(Args, Debug)]
pub struct VersionArgs {
    /// Show extended build provenance.
    #[arg(long)]
    pub extended: bool,
}

#[derive(Args, Debug, Default)]
pub struct EnvinfoArgs {}

pub fn parse_duration(input: &str) -> CliResult<Duration> {
    let input = input.trim();
    if input.is_empty() {
        return Err(CliError::new(USAGE, "duration must not be empty"));
    }

    let (number, unit) = if let Some(num) = input.strip_suffix("ms") {
        (num, "ms")
    } else if let Some(num) = input.strip_suffix('s') {
        (num, "s")
    } else {
        (input, "s")
    };

    let value: u64 = number
        .parse()
        .map_err(|_| CliError::new(USAGE, format!("invalid duration value: {input}")))?;

    if value == 0 {
        return Err(CliError::new(USAGE, "duration must be greater than zero"));
    }

    match unit {
        "ms" => Ok(Duration::from_millis(value)),
        _ => Ok(Duration::from_secs(value)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_duration_seconds_and_millis() {
        assert_eq!(parse_duration("2s").unwrap(), Duration::from_secs(2));
        assert_eq!(parse_duration("150ms").unwrap(), Duration::from_millis(150));
        assert_eq!(parse_duration("3").unwrap(), Duration::from_secs(3));
    }

    #[test]
    fn parse_duration_rejects_invalid_input() {
        assert_eq!(parse_duration("").unwrap_err().code, USAGE);
        assert_eq!(parse_duration("0s").unwrap_err().code, USAGE);
        assert_eq!(parse_duration("soon").unwrap_err().code, USAGE);
    }
}
