//! Command-line interface for inspector-bridge.
//!
//! Uses lexopt for minimal binary size overhead (~34KB).

use std::ffi::OsString;
use std::path::PathBuf;

/// Command-line arguments.
#[derive(Debug, Clone, Default)]
pub struct Args {
    /// Path to configuration file.
    pub config: Option<PathBuf>,
    /// Context group id (overrides config file).
    pub context_group: Option<i32>,
    /// Log level (error, warn, info, debug, trace).
    pub log_level: Option<String>,
    /// Show version and exit.
    pub version: bool,
    /// Show help and exit.
    pub help: bool,
}

/// Parse command-line arguments.
pub fn parse_args() -> Result<Args, ArgsError> {
    parse_args_from(std::env::args_os())
}

/// Parse arguments from an iterator (for testing).
pub fn parse_args_from<I>(args: I) -> Result<Args, ArgsError>
where
    I: IntoIterator<Item = OsString>,
{
    use lexopt::prelude::*;

    let mut result = Args::default();
    let mut parser = lexopt::Parser::from_iter(args);

    while let Some(arg) = parser.next()? {
        match arg {
            Short('h') | Long("help") => {
                result.help = true;
            }
            Short('V') | Long("version") => {
                result.version = true;
            }
            Short('c') | Long("config") => {
                result.config = Some(parser.value()?.parse()?);
            }
            Short('g') | Long("context-group") => {
                let value: String = parser.value()?.parse()?;
                result.context_group = Some(
                    value
                        .parse()
                        .map_err(|_| ArgsError::InvalidValue("context-group", value))?,
                );
            }
            Short('l') | Long("log-level") => {
                result.log_level = Some(parser.value()?.parse()?);
            }
            Value(val) => {
                return Err(ArgsError::UnexpectedArgument(val.to_string_lossy().into()));
            }
            _ => return Err(arg.unexpected().into()),
        }
    }

    Ok(result)
}

/// Print help message.
pub fn print_help() {
    let version = env!("CARGO_PKG_VERSION");
    println!(
        r#"inspector-bridge {version}
Relay inspector protocol messages between stdin/stdout and a session

USAGE:
    inspector-bridge [OPTIONS]

Reads one protocol message per line from stdin, dispatches it into an
inspector session and writes every message the session sends back as one
line on stdout. The session is closed at end of input.

OPTIONS:
    -c, --config <FILE>         Path to configuration file (JSON)
    -g, --context-group <ID>    Context group id [default: 1]
    -l, --log-level <LVL>       Log level (error, warn, info, debug, trace)
    -h, --help                  Print help
    -V, --version               Print version

ENVIRONMENT VARIABLES:
    INSPECTOR_BRIDGE_CONTEXT_GROUP  Context group id (overrides config)
    INSPECTOR_BRIDGE_LOG_LEVEL      Log level (overrides config)
    RUST_LOG                        Alternative log level setting

EXAMPLES:
    # Ask for the protocol domains
    echo '{{"id":1,"method":"Schema.getDomains"}}' | inspector-bridge

    # Use a config file and verbose logging
    inspector-bridge -c inspector.json -l debug < session.jsonl
"#
    );
}

/// Print version.
pub fn print_version() {
    println!("inspector-bridge {}", env!("CARGO_PKG_VERSION"));
}

/// Argument parsing errors.
#[derive(Debug)]
pub enum ArgsError {
    /// Lexopt parsing error.
    Lexopt(lexopt::Error),
    /// Invalid argument value.
    InvalidValue(&'static str, String),
    /// Unexpected positional argument.
    UnexpectedArgument(String),
}

impl std::fmt::Display for ArgsError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Lexopt(e) => write!(f, "{}", e),
            Self::InvalidValue(name, value) => {
                write!(f, "invalid value for --{}: '{}'", name, value)
            }
            Self::UnexpectedArgument(arg) => {
                write!(f, "unexpected argument: '{}'", arg)
            }
        }
    }
}

impl std::error::Error for ArgsError {}

impl From<lexopt::Error> for ArgsError {
    fn from(e: lexopt::Error) -> Self {
        Self::Lexopt(e)
    }
}
