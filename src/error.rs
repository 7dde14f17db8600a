//! Crate-wide error type.
//!
//! Only I/O-facing operations return these: dataset loading, config loading,
//! export writing and server start-up. Classification and filtering are total
//! and never produce an error.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum CagemapError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// Invalid configuration value
    #[error("invalid config value for {field}: {reason}")]
    Config { field: String, reason: String },

    /// A dataset file exists but could not be turned into records
    #[error("dataset '{name}' could not be loaded: {reason}")]
    Dataset { name: String, reason: String },
}

pub type Result<T> = std::result::Result<T, CagemapError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_error_display_names_the_field() {
        let err = CagemapError::Config {
            field: "bind_addr".to_string(),
            reason: "empty".to_string(),
        };
        assert_eq!(err.to_string(), "invalid config value for bind_addr: empty");
    }

    #[test]
    fn io_errors_convert() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        let err: CagemapError = io_err.into();
        assert!(matches!(err, CagemapError::Io(_)));
    }
}
