//! CLI errors and the process exit codes they map to.
//!
//! - 0:  success
//! - 2:  clap rejected the arguments
//! - 10: the color core refused the request (unknown mixer, bad rate, malformed grid)
//! - 11: a palette or settings file could not be read
//! - 12: a command-line value was malformed (hex color, clip policy, alpha)
//! - 13: a JSON document could not be parsed or printed

use palette_tin_core::ColorError;
use std::fmt;

#[derive(Debug)]
pub enum CliError {
    Color(ColorError),
    Io(String),
    Input(String),
    Serialization(String),
}

impl CliError {
    /// Wraps a core error caused by a bad command-line value, so it exits as
    /// an input error whatever its core kind.
    pub fn input(what: &str, e: ColorError) -> Self {
        CliError::Input(format!("{what}: {e}"))
    }

    pub fn exit_code(&self) -> i32 {
        match self {
            CliError::Color(_) => 10,
            CliError::Io(_) => 11,
            CliError::Input(_) => 12,
            CliError::Serialization(_) => 13,
        }
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CliError::Color(e) => e.fmt(f),
            CliError::Io(msg) | CliError::Input(msg) | CliError::Serialization(msg) => {
                f.write_str(msg)
            }
        }
    }
}

impl From<ColorError> for CliError {
    fn from(e: ColorError) -> Self {
        match e {
            ColorError::Io(msg) => CliError::Io(msg),
            ColorError::Serialization(msg) => CliError::Serialization(msg),
            ColorError::InvalidColor(msg) => CliError::Input(msg),
            other => CliError::Color(other),
        }
    }
}

impl From<serde_json::Error> for CliError {
    fn from(e: serde_json::Error) -> Self {
        CliError::Serialization(e.to_string())
    }
}
