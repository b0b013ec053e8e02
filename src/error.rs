//! Error types for the outer surfaces of the widget.
//!
//! The vessel model itself cannot fail: every value is clamped and every
//! timer is tracked. Errors only come from configuration, the terminal and
//! output encoding.

use thiserror::Error;

/// Errors surfaced by the binary and the library's I/O edges.
#[derive(Debug, Error)]
pub enum TiltbarError {
    /// An explicitly requested configuration file does not exist.
    #[error("configuration file not found: {0}")]
    ConfigNotFound(String),

    /// The configuration sources could not be parsed.
    #[error("failed to parse configuration: {0}")]
    ConfigParse(#[from] config::ConfigError),

    /// Configuration parsed but holds unusable values.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// Terminal setup, drawing or teardown failed.
    #[error("terminal error: {0}")]
    Terminal(#[from] std::io::Error),

    /// Writing the report to its output stream failed.
    #[error("failed to write output: {0}")]
    Output(std::io::Error),

    /// A snapshot could not be encoded as JSON.
    #[error("failed to encode snapshot: {0}")]
    Encode(#[from] serde_json::Error),

    /// Settings could not be rendered as TOML.
    #[error("failed to render settings: {0}")]
    Render(#[from] toml::ser::Error),
}

/// Result alias used across the crate.
pub type Result<T> = std::result::Result<T, TiltbarError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = TiltbarError::ConfigNotFound("tiltbar.toml".to_string());
        assert_eq!(err.to_string(), "configuration file not found: tiltbar.toml");

        let err = TiltbarError::InvalidConfig("fps must be between 1 and 240".to_string());
        assert!(err.to_string().starts_with("invalid configuration:"));
    }

    #[test]
    fn test_io_error_converts() {
        let io = std::io::Error::new(std::io::ErrorKind::Other, "no tty");
        let err: TiltbarError = io.into();
        assert!(matches!(err, TiltbarError::Terminal(_)));
        assert!(err.to_string().contains("no tty"));
    }
}
