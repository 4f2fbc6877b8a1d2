//! Domain error types.

use chrono::NaiveDate;

/// Top-level error type for aipsim.
#[derive(Debug, thiserror::Error)]
pub enum AipError {
    #[error("no trading date on or after {date} (series ends {last})")]
    DateNotFound { date: NaiveDate, last: String },

    #[error("invalid configuration: {reason}")]
    InvalidConfiguration { reason: String },

    #[error("math domain error: ln({base_rate}) is undefined")]
    MathDomain { base_rate: f64 },

    #[error("total invested money is not positive after {events} contributions")]
    DivisionByZero { events: usize },

    #[error("moving average undefined on {date}: no prices in the {window}-day window")]
    UndefinedMean { date: NaiveDate, window: u32 },

    #[error("config parse error in {file}: {reason}")]
    ConfigParse { file: String, reason: String },

    #[error("missing config key [{section}] {key}")]
    ConfigMissing { section: String, key: String },

    #[error("invalid config value [{section}] {key}: {reason}")]
    ConfigInvalid {
        section: String,
        key: String,
        reason: String,
    },

    #[error("data error: {reason}")]
    Data { reason: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl From<&AipError> for std::process::ExitCode {
    fn from(err: &AipError) -> Self {
        let code: u8 = match err {
            AipError::Io(_) => 1,
            AipError::ConfigParse { .. }
            | AipError::ConfigMissing { .. }
            | AipError::ConfigInvalid { .. }
            | AipError::InvalidConfiguration { .. } => 2,
            AipError::Data { .. } | AipError::DateNotFound { .. } => 3,
            AipError::MathDomain { .. }
            | AipError::DivisionByZero { .. }
            | AipError::UndefinedMean { .. } => 4,
        };
        std::process::ExitCode::from(code)
    }
}
