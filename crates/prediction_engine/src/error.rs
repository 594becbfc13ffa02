/// Input that cannot produce a trustworthy prediction.
///
/// These are never coerced into a plausible number; the caller gets the error.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum PredictionError {
    #[error("line must be a finite non-negative number, got {line}")]
    InvalidLine { line: f64 },

    #[error("sample #{index} is negative ({kills} kills)")]
    NegativeSample { index: usize, kills: i64 },

    #[error("{side} strength must be a finite positive number, got {value}")]
    InvalidStrength { side: &'static str, value: f64 },

    #[error("malformed position string {raw:?}")]
    MalformedPosition { raw: String },

    #[error("normal distribution rejected mean {mean} / sigma {sigma}: {reason}")]
    Distribution { mean: f64, sigma: f64, reason: String },
}

/// Rejected `ModelConfig` / `TeamRatings` tables.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid model config: {field} {reason}")]
    InvalidField { field: String, reason: String },

    #[error("invalid rating for team {team:?}: {value}")]
    InvalidRating { team: String, value: f64 },

    #[error("team rating with blank name")]
    BlankTeamName,

    #[error("config read failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("config parse failed: {0}")]
    Parse(#[from] serde_json::Error),
}
