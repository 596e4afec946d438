//! Error types for the patoc binary.
//!
//! This module defines the error taxonomy using `thiserror`. Errors compose via
//! `?` and `From` conversions.
//!
//! # Error Hierarchy
//!
//! - [`AppError`] - Top-level error returned by the command-line entry point
//!   - [`InputError`] - Page or scenario file reading failures
//!   - [`ConfigError`](crate::config::ConfigError) - Config file read/parse failures
//!   - [`LoggingError`](crate::logging::LoggingError) - Tracing subscriber setup failures
//!   - [`ScenarioError`](crate::integration::ScenarioError) - Invalid scroll scenarios
//!   - `std::io::Error` - Writing results to stdout or the output file
//!
//! # Recovery Strategy
//!
//! None of these come from the widget core. Extraction and resolution never fail:
//! missing DOM elements, empty settings and malformed payloads all degrade to an
//! absent or hidden widget, with a diagnostic in the log. The errors here are the
//! impure shell's: files that cannot be read and configuration that cannot be parsed.

use crate::config::ConfigError;
use crate::integration::ScenarioError;
use crate::logging::LoggingError;
use std::path::PathBuf;
use thiserror::Error;

/// Top-level application error encompassing all failure modes of the binary.
///
/// Every variant is fatal for the current command: the message is printed to
/// stderr and the process exits non-zero.
#[derive(Debug, Error)]
pub enum AppError {
    /// Failed to read the input page or scenario.
    #[error("Failed to read input: {0}")]
    Input(#[from] InputError),

    /// Configuration file exists but could not be used.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Tracing could not be initialized.
    #[error("Logging error: {0}")]
    Logging(#[from] LoggingError),

    /// Scroll scenario is structurally invalid.
    #[error("Invalid scenario: {0}")]
    Scenario(#[from] ScenarioError),

    /// Failed to write command output.
    #[error("Failed to write output: {0}")]
    Output(#[from] std::io::Error),
}

/// Errors encountered when reading input files.
///
/// # Examples
///
/// ```
/// use std::path::PathBuf;
/// use patoc::model::error::InputError;
///
/// let err = InputError::FileNotFound {
///     path: PathBuf::from("/tmp/missing.html")
/// };
/// assert!(err.to_string().contains("/tmp/missing.html"));
/// ```
#[derive(Debug, Error)]
pub enum InputError {
    /// The given path does not exist.
    #[error("File not found: {path}")]
    FileNotFound {
        /// Path as provided on the command line.
        path: PathBuf,
    },

    /// Any other I/O failure while reading (permissions, invalid UTF-8, ...).
    #[error("I/O error reading {path}: {source}")]
    Io {
        /// Path being read.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },
}

/// Read a whole input file as UTF-8, mapping "not found" to its own variant.
pub fn read_input(path: &std::path::Path) -> Result<String, InputError> {
    std::fs::read_to_string(path).map_err(|source| {
        if source.kind() == std::io::ErrorKind::NotFound {
            InputError::FileNotFound {
                path: path.to_path_buf(),
            }
        } else {
            InputError::Io {
                path: path.to_path_buf(),
                source,
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn input_error_converts_into_app_error() {
        fn fails() -> Result<(), AppError> {
            Err(InputError::FileNotFound {
                path: PathBuf::from("page.html"),
            })?;
            Ok(())
        }

        let err = fails().unwrap_err();
        assert!(matches!(err, AppError::Input(InputError::FileNotFound { .. })));
        assert_eq!(err.to_string(), "Failed to read input: File not found: page.html");
    }

    #[test]
    fn read_input_reports_missing_file() {
        let result = read_input(std::path::Path::new("/nonexistent/patoc/page.html"));
        assert!(matches!(result, Err(InputError::FileNotFound { .. })));
    }

    #[test]
    fn read_input_returns_contents() {
        let path = std::env::temp_dir().join("patoc_read_input_test.html");
        std::fs::write(&path, "<h2>Hi</h2>").expect("write temp file");

        let contents = read_input(&path).expect("readable file");
        let _ = std::fs::remove_file(&path);

        assert_eq!(contents, "<h2>Hi</h2>");
    }

    #[test]
    fn io_error_preserves_source() {
        use std::error::Error as _;

        let err = InputError::Io {
            path: PathBuf::from("page.html"),
            source: std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        };
        assert!(err.source().is_some());
        assert!(err.to_string().contains("page.html"));
    }
}
