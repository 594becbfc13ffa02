//! Tunable constants of the kill-line heuristic.
//!
//! The prototypes each hard-coded slightly different numbers; here they are one
//! injectable struct. Defaults are the primary prototype's values.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::ConfigError;
use crate::model::Position;

/// Kill modifier and baseline dispersion for one role.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PositionProfile {
    pub kill_modifier:   f64,
    pub base_dispersion: f64,
}

/// Profiles for every role. A struct instead of a map so a missing role is a
/// parse error, not a runtime lookup miss.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PositionTable {
    pub duelist:    PositionProfile,
    pub initiator:  PositionProfile,
    pub controller: PositionProfile,
    pub sentinel:   PositionProfile,
    pub flex:       PositionProfile,
}

impl Default for PositionTable {
    fn default() -> Self {
        Self {
            duelist:    PositionProfile { kill_modifier: 1.15, base_dispersion: 3.5 },
            initiator:  PositionProfile { kill_modifier: 1.05, base_dispersion: 3.0 },
            controller: PositionProfile { kill_modifier: 0.95, base_dispersion: 2.5 },
            sentinel:   PositionProfile { kill_modifier: 0.90, base_dispersion: 2.0 },
            flex:       PositionProfile { kill_modifier: 1.00, base_dispersion: 3.0 },
        }
    }
}

impl PositionTable {
    pub fn profile(&self, position: Position) -> PositionProfile {
        match position {
            Position::Duelist    => self.duelist,
            Position::Initiator  => self.initiator,
            Position::Controller => self.controller,
            Position::Sentinel   => self.sentinel,
            Position::Flex       => self.flex,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelConfig {
    pub positions:            PositionTable,
    /// How many of the newest samples make up the "recent" average.
    pub recent_window:        usize,
    /// Weight of the recent average once `recent_window` samples exist.
    pub recent_weight:        f64,
    /// Weight of the recent average below `recent_window` samples.
    pub sparse_recent_weight: f64,
    pub matchup_sensitivity:  f64,
    pub even_band_low:        f64,
    pub even_band_high:       f64,
    pub mismatch_volatility:  f64,
    pub sigma_floor:          f64,
    /// |edge| * tier_scale, rounded, clamped to 1..=max_tier. Variants used 10.
    pub tier_scale:           f64,
    pub max_tier:             u8,
    pub over_threshold:       f64,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            positions:            PositionTable::default(),
            recent_window:        5,
            recent_weight:        0.7,
            sparse_recent_weight: 0.5,
            matchup_sensitivity:  0.15,
            even_band_low:        0.9,
            even_band_high:       1.1,
            mismatch_volatility:  1.2,
            sigma_floor:          0.1,
            tier_scale:           12.0,
            max_tier:             3,
            over_threshold:       0.55,
        }
    }
}

/// Output records only know tiers 1..=3.
pub const MAX_CONFIDENCE_TIER: u8 = 3;

fn invalid(field: &str, reason: &str) -> ConfigError {
    ConfigError::InvalidField { field: field.to_string(), reason: reason.to_string() }
}

fn finite_positive(field: &str, value: f64) -> Result<(), ConfigError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(invalid(field, &format!("must be finite and > 0, got {value}")))
    }
}

fn unit_interval(field: &str, value: f64) -> Result<(), ConfigError> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(invalid(field, &format!("must be within [0, 1], got {value}")))
    }
}

impl ModelConfig {
    /// Reads a JSON config; missing fields keep their defaults.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path)?;
        Self::from_json_str(&raw)
    }

    pub fn from_json_str(raw: &str) -> Result<Self, ConfigError> {
        let cfg: ModelConfig = serde_json::from_str(raw)?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        for pos in Position::ALL {
            let p = self.positions.profile(pos);
            finite_positive(&format!("positions.{}.kill_modifier", pos.as_str().to_lowercase()), p.kill_modifier)?;
            finite_positive(&format!("positions.{}.base_dispersion", pos.as_str().to_lowercase()), p.base_dispersion)?;
        }
        if self.recent_window == 0 {
            return Err(invalid("recent_window", "must be at least 1"));
        }
        unit_interval("recent_weight", self.recent_weight)?;
        unit_interval("sparse_recent_weight", self.sparse_recent_weight)?;
        if !self.matchup_sensitivity.is_finite() || self.matchup_sensitivity < 0.0 {
            return Err(invalid("matchup_sensitivity", "must be finite and >= 0"));
        }
        finite_positive("even_band_low", self.even_band_low)?;
        finite_positive("even_band_high", self.even_band_high)?;
        if self.even_band_low > self.even_band_high {
            return Err(invalid("even_band_low", "must not exceed even_band_high"));
        }
        finite_positive("mismatch_volatility", self.mismatch_volatility)?;
        finite_positive("sigma_floor", self.sigma_floor)?;
        finite_positive("tier_scale", self.tier_scale)?;
        if !(1..=MAX_CONFIDENCE_TIER).contains(&self.max_tier) {
            return Err(invalid(
                "max_tier",
                &format!("must be within 1..={MAX_CONFIDENCE_TIER}, got {}", self.max_tier),
            ));
        }
        if !(self.over_threshold > 0.0 && self.over_threshold < 1.0) {
            return Err(invalid("over_threshold", "must be within (0, 1)"));
        }
        Ok(())
    }
}
