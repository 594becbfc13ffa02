//! Prediction Engine pro kill lines (over/under)
//! Heuristika místo ML: normální rozdělení kolem upraveného průměru kills.
//!
//! Flow: samples → weighted average → position modifier → matchup factor →
//! sigma from consistency → P(kills > line) → confidence tier + side.

pub mod calculator;
pub mod config;
pub mod error;
pub mod model;
pub mod ratings;
pub mod stats;

pub use calculator::{LineInput, LinePredictor, StrengthOverrides};
pub use config::{ModelConfig, PositionProfile, PositionTable, MAX_CONFIDENCE_TIER};
pub use error::{ConfigError, PredictionError};
pub use model::{DataWarning, PerformanceSample, PlayerLine, Position, Prediction, Side};
pub use ratings::{normalize_team_name, TeamRatings, NEUTRAL_STRENGTH};
