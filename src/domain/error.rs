//! Domain error types.

/// Top-level error type for marketpulse.
///
/// Warm-up windows and invalid indicator parameters are not errors: the
/// engine degrades those to invalid points (see the indicator modules).
/// Errors are reserved for structurally bad inputs and acquisition
/// failures.
#[derive(Debug, thiserror::Error)]
pub enum MarketPulseError {
    #[error("shape error: {reason}")]
    Shape { reason: String },

    #[error("no data for {symbol}")]
    NoData { symbol: String },

    #[error("{provider} response error: {reason}")]
    Provider { provider: String, reason: String },

    #[error("request failed: {reason}")]
    Http { reason: String },

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

    #[error("csv error: {reason}")]
    Csv { reason: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl From<&MarketPulseError> for std::process::ExitCode {
    fn from(err: &MarketPulseError) -> Self {
        let code: u8 = match err {
            MarketPulseError::Io(_) => 1,
            MarketPulseError::ConfigParse { .. }
            | MarketPulseError::ConfigMissing { .. }
            | MarketPulseError::ConfigInvalid { .. } => 2,
            MarketPulseError::Http { .. }
            | MarketPulseError::Provider { .. }
            | MarketPulseError::Csv { .. } => 3,
            MarketPulseError::Shape { .. } => 4,
            MarketPulseError::NoData { .. } => 5,
        };
        std::process::ExitCode::from(code)
    }
}
