//! Domain error types.

/// Top-level error type for smacross.
#[derive(Debug, thiserror::Error)]
pub enum SmacrossError {
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

    #[error("SMA window must be positive, got {window}")]
    InvalidWindow { window: usize },

    #[error("bucket width must be positive, got {width_ms} ms")]
    InvalidBucketWidth { width_ms: i64 },

    #[error("candle width of {minutes} minutes is out of range")]
    CandleWidthOverflow { minutes: i64 },

    #[error("timestamp {timestamp_ms} is too close to the i64 limits to bucket")]
    TimestampOutOfRange { timestamp_ms: i64 },

    #[error("sequence length mismatch: {closes} closes but {sma} SMA values")]
    LengthMismatch { closes: usize, sma: usize },

    #[error("samples not sorted by timestamp: {current} follows {previous} at index {index}")]
    UnsortedSamples {
        index: usize,
        previous: i64,
        current: i64,
    },

    #[error("no samples available")]
    NoData,

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl From<&SmacrossError> for std::process::ExitCode {
    fn from(err: &SmacrossError) -> Self {
        let code: u8 = match err {
            SmacrossError::Io(_) => 1,
            SmacrossError::ConfigParse { .. }
            | SmacrossError::ConfigMissing { .. }
            | SmacrossError::ConfigInvalid { .. } => 2,
            SmacrossError::Data { .. } | SmacrossError::TimestampOutOfRange { .. } => 3,
            SmacrossError::InvalidWindow { .. }
            | SmacrossError::InvalidBucketWidth { .. }
            | SmacrossError::CandleWidthOverflow { .. }
            | SmacrossError::LengthMismatch { .. }
            | SmacrossError::UnsortedSamples { .. } => 4,
            SmacrossError::NoData => 5,
        };
        std::process::ExitCode::from(code)
    }
}
