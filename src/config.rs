use std::ffi::OsString;

use pico_args::Arguments;
use thiserror::Error;

pub const USAGE: &str = "\
usage: find . -name '._*' -print0 | macresforks | xargs -r -0 rm

  --strict       also require the ._ file to start with an AppleDouble header
  -v, --verbose  log decisions to standard error
  -h, --help     display help text
  -V, --version  display version details
";

/// Environment variable holding a `tracing` filter directive.
pub const LOG_ENV: &str = "MACRESFORKS_LOG";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("unexpected argument {0:?}")]
    Unexpected(OsString),
}

#[derive(Debug, Default, Copy, Clone, Eq, PartialEq)]
pub struct Config {
    pub strict: bool,
    pub verbose: bool,
}

impl Config {
    pub fn default_log_filter(&self) -> &'static str {
        if self.verbose {
            "debug"
        } else {
            "warn"
        }
    }
}

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum Command {
    Help,
    Version,
    Run(Config),
}

impl Command {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::parse(std::env::args_os().skip(1).collect())
    }
    pub fn parse(args: Vec<OsString>) -> Result<Self, ConfigError> {
        let mut args = Arguments::from_vec(args);
        if args.contains(["-h", "--help"]) {
            return Ok(Self::Help);
        }
        if args.contains(["-V", "--version"]) {
            return Ok(Self::Version);
        }
        let config = Config {
            strict: args.contains("--strict"),
            verbose: args.contains(["-v", "--verbose"]),
        };
        if let Some(arg) = args.finish().into_iter().next() {
            return Err(ConfigError::Unexpected(arg));
        }
        Ok(Self::Run(config))
    }
}

pub fn version() -> String {
    format!("{} {}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"))
}
