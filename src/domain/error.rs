//! Domain error types.

/// Top-level error type for optdash.
#[derive(Debug, thiserror::Error)]
pub enum OptdashError {
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

    #[error("no data for {symbol}")]
    NoData { symbol: String },

    #[error("insufficient data for {symbol}: have {bars} bars, need {minimum}")]
    InsufficientData {
        symbol: String,
        bars: usize,
        minimum: usize,
    },

    #[error("price series for {symbol} is not strictly increasing at {date}")]
    UnorderedSeries { symbol: String, date: chrono::NaiveDate },

    #[error("no option expirations available for {symbol}")]
    NoExpirations { symbol: String },

    #[error("report error: {reason}")]
    Report { reason: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl OptdashError {
    /// Process exit status for this error.
    pub fn exit_status(&self) -> u8 {
        match self {
            OptdashError::Io(_) => 1,
            OptdashError::ConfigParse { .. }
            | OptdashError::ConfigMissing { .. }
            | OptdashError::ConfigInvalid { .. } => 2,
            OptdashError::Data { .. } => 3,
            OptdashError::NoData { .. }
            | OptdashError::InsufficientData { .. }
            | OptdashError::UnorderedSeries { .. }
            | OptdashError::NoExpirations { .. } => 5,
            OptdashError::Report { .. } => 6,
        }
    }
}

impl From<&OptdashError> for std::process::ExitCode {
    fn from(err: &OptdashError) -> Self {
        std::process::ExitCode::from(err.exit_status())
    }
}
