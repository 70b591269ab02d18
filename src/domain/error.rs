//! Domain error types.

use chrono::NaiveDate;

/// Top-level error type for market-oracle.
#[derive(Debug, thiserror::Error)]
pub enum OracleError {
    #[error("missing column '{column}' in input")]
    MissingColumn { column: String },

    #[error("duplicate date {date} in input")]
    DuplicateDate { date: NaiveDate },

    #[error("input not in ascending date order at row {position}")]
    UnsortedInput { position: usize },

    #[error("confidence {value} outside [0, 1]")]
    InvalidConfidence { value: f64 },

    #[error("data error: {reason}")]
    Data { reason: String },

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

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl OracleError {
    /// Process exit code for this error class.
    pub fn exit_code(&self) -> u8 {
        match self {
            OracleError::Io(_) => 1,
            OracleError::ConfigParse { .. }
            | OracleError::ConfigMissing { .. }
            | OracleError::ConfigInvalid { .. } => 2,
            OracleError::Data { .. } | OracleError::MissingColumn { .. } => 3,
            OracleError::DuplicateDate { .. } | OracleError::UnsortedInput { .. } => 4,
            OracleError::InvalidConfidence { .. } => 5,
        }
    }
}

impl From<&OracleError> for std::process::ExitCode {
    fn from(err: &OracleError) -> Self {
        std::process::ExitCode::from(err.exit_code())
    }
}
