//! Structured CLI errors with meaningful exit codes.
//!
//! Exit code scheme:
//! - 0:  success
//! - 2:  clap arg parse error (automatic, before our code runs)
//! - 10: engine error (bad dimensions, invalid configuration)
//! - 11: I/O error (snapshot write)
//! - 12: input error (bad JSON params, bad color, bad pointer)
//! - 13: serialization error

use particle_net_core::EngineError;
use std::fmt;

/// Errors produced by CLI operations, each mapped to a distinct exit code.
#[derive(Debug)]
pub enum CliError {
    /// An engine-level error (bad dimensions, invalid configuration).
    Engine(EngineError),
    /// An I/O error (snapshot write).
    Io(String),
    /// A user input error (bad JSON params, bad color).
    Input(String),
    /// A serialization error (JSON output failure).
    Serialization(String),
}

impl CliError {
    /// Returns the process exit code for this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            CliError::Engine(_) => 10,
            CliError::Io(_) => 11,
            CliError::Input(_) => 12,
            CliError::Serialization(_) => 13,
        }
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CliError::Engine(e) => write!(f, "{e}"),
            CliError::Io(msg) | CliError::Input(msg) | CliError::Serialization(msg) => {
                write!(f, "{msg}")
            }
        }
    }
}

impl From<EngineError> for CliError {
    fn from(e: EngineError) -> Self {
        match e {
            EngineError::Io(msg) => CliError::Io(msg),
            EngineError::InvalidColor(msg) => CliError::Input(msg),
            other => CliError::Engine(other),
        }
    }
}

impl From<serde_json::Error> for CliError {
    fn from(e: serde_json::Error) -> Self {
        CliError::Serialization(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exit_codes_are_distinct() {
        let codes = [
            CliError::Engine(EngineError::InvalidDimensions).exit_code(),
            CliError::Io("write failed".into()).exit_code(),
            CliError::Input("bad color".into()).exit_code(),
            CliError::Serialization("json fail".into()).exit_code(),
        ];
        assert_eq!(codes, [10, 11, 12, 13]);
    }

    #[test]
    fn from_engine_error_io_routes_to_cli_io() {
        let cli_err = CliError::from(EngineError::Io("disk full".into()));
        assert_eq!(cli_err.exit_code(), 11);
        assert!(cli_err.to_string().contains("disk full"));
    }

    #[test]
    fn from_engine_error_color_routes_to_input() {
        let cli_err = CliError::from(EngineError::InvalidColor("'zz'".into()));
        assert_eq!(cli_err.exit_code(), 12);
    }

    #[test]
    fn from_engine_error_config_routes_to_engine() {
        let cli_err = CliError::from(EngineError::InvalidConfig("time_step".into()));
        assert_eq!(cli_err.exit_code(), 10);
        assert!(cli_err.to_string().contains("time_step"));
    }

    #[test]
    fn from_serde_json_error_routes_to_serialization() {
        let bad_json = serde_json::from_str::<serde_json::Value>("{invalid");
        let cli_err = CliError::from(bad_json.unwrap_err());
        assert_eq!(cli_err.exit_code(), 13);
    }
}
