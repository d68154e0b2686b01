//! Domain error types.

/// Top-level error type for tidetrader.
#[derive(Debug, thiserror::Error)]
pub enum TidetraderError {
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

    #[error("insufficient data for {symbol}: have {bars} bars, need {minimum}")]
    InsufficientData {
        symbol: String,
        bars: usize,
        minimum: usize,
    },

    #[error("bar/metrics series misaligned: {bars} bars vs {metrics} snapshots")]
    MisalignedSeries { bars: usize, metrics: usize },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl From<&TidetraderError> for std::process::ExitCode {
    fn from(err: &TidetraderError) -> Self {
        let code: u8 = match err {
            TidetraderError::Io(_) => 1,
            TidetraderError::ConfigParse { .. }
            | TidetraderError::ConfigMissing { .. }
            | TidetraderError::ConfigInvalid { .. } => 2,
            TidetraderError::Data { .. } => 3,
            TidetraderError::InsufficientData { .. }
            | TidetraderError::MisalignedSeries { .. } => 5,
        };
        std::process::ExitCode::from(code)
    }
}
