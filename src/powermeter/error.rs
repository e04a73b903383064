//! Error type shared by the processing stages and the record I/O.
//!
//! Every variant aborts the run: the stages keep positional state (offset time,
//! window fill, previous integration sample) that cannot be repaired once a
//! record has been dropped.

use thiserror::Error;

/// Convenience alias for results using the crate error type.
pub type Result<T> = std::result::Result<T, PowermeterError>;

#[derive(Error, Debug)]
pub enum PowermeterError {
    #[error("line {line}: field {field} is not a number: {value:?}")]
    Parse {
        line: u64,
        field: usize,
        value: String,
    },

    #[error("line {line}: expected {expected} fields, found {found}; run `{stage}` before")]
    Format {
        line: u64,
        found: usize,
        expected: usize,
        stage: &'static str,
    },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Configuration file error: {0}")]
    ConfigFile(#[from] toml::de::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
