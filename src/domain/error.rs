//! Domain error types.

/// Failure of the scoring engine for a single instrument.
///
/// Both variants are recoverable per instrument; the screener turns them into
/// placeholder records or skips the instrument, it never aborts a batch.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ScoringError {
    #[error("insufficient data for {code}: have {bars} bars, need {minimum} ({detail})")]
    DataInsufficient {
        code: String,
        bars: usize,
        minimum: usize,
        detail: String,
    },

    #[error("malformed input for {code}: {reason}")]
    MalformedInput { code: String, reason: String },
}

/// Top-level error type for kabusignal.
#[derive(Debug, thiserror::Error)]
pub enum KabuError {
    #[error("data source error: {reason}")]
    DataSource { reason: String },

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

    #[error("no data for {code}")]
    NoData { code: String },

    #[error("malformed input for {code}: {reason}")]
    MalformedInput { code: String, reason: String },

    #[error("insufficient data for {code}: have {bars} bars, need {minimum}")]
    InsufficientData {
        code: String,
        bars: usize,
        minimum: usize,
    },

    #[error("notification failed: {reason}")]
    Notify { reason: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl From<ScoringError> for KabuError {
    fn from(err: ScoringError) -> Self {
        match err {
            ScoringError::DataInsufficient {
                code, bars, minimum, ..
            } => KabuError::InsufficientData {
                code,
                bars,
                minimum,
            },
            ScoringError::MalformedInput { code, reason } => {
                KabuError::MalformedInput { code, reason }
            }
        }
    }
}

impl From<&KabuError> for std::process::ExitCode {
    fn from(err: &KabuError) -> Self {
        let code: u8 = match err {
            KabuError::Io(_) => 1,
            KabuError::ConfigParse { .. }
            | KabuError::ConfigMissing { .. }
            | KabuError::ConfigInvalid { .. } => 2,
            KabuError::DataSource { .. } => 3,
            KabuError::MalformedInput { .. } => 4,
            KabuError::NoData { .. } | KabuError::InsufficientData { .. } => 5,
            KabuError::Notify { .. } => 6,
        };
        std::process::ExitCode::from(code)
    }
}
