use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::PredictionError;

// ── Position ─────────────────────────────────────────────────────────────────

/// Player role. Anything unrecognised collapses to `Flex`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Position {
    Duelist,
    Initiator,
    Controller,
    Sentinel,
    Flex,
}

const DUELIST_AGENTS:    &[&str] = &["jett", "phoenix", "raze", "reyna", "neon", "yoru", "iso"];
const INITIATOR_AGENTS:  &[&str] = &["sova", "breach", "kayo", "skye", "fade", "gekko"];
const CONTROLLER_AGENTS: &[&str] = &["omen", "viper", "brimstone", "astra", "harbor", "clove"];
const SENTINEL_AGENTS:   &[&str] = &["sage", "killjoy", "cypher", "chamber", "deadlock", "vyse"];

impl Position {
    pub const ALL: [Position; 5] = [
        Position::Duelist,
        Position::Initiator,
        Position::Controller,
        Position::Sentinel,
        Position::Flex,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Position::Duelist    => "Duelist",
            Position::Initiator  => "Initiator",
            Position::Controller => "Controller",
            Position::Sentinel   => "Sentinel",
            Position::Flex       => "Flex",
        }
    }

    /// Role name (case-insensitive) or agent name → role.
    pub fn from_name(raw: &str) -> Option<Position> {
        let key: String = raw
            .trim()
            .to_lowercase()
            .chars()
            .filter(|c| c.is_alphanumeric())
            .collect();

        let by_role = Position::ALL
            .iter()
            .copied()
            .find(|p| p.as_str().eq_ignore_ascii_case(&key));
        if by_role.is_some() {
            return by_role;
        }

        Position::from_agent(&key)
    }

    /// Agent → role, matched on the normalized agent name ("KAY/O" → "kayo").
    pub fn from_agent(agent: &str) -> Option<Position> {
        let key: String = agent
            .to_lowercase()
            .chars()
            .filter(|c| c.is_alphanumeric())
            .collect();
        if key.is_empty() {
            return None;
        }
        let tables = [
            (DUELIST_AGENTS, Position::Duelist),
            (INITIATOR_AGENTS, Position::Initiator),
            (CONTROLLER_AGENTS, Position::Controller),
            (SENTINEL_AGENTS, Position::Sentinel),
        ];
        tables
            .iter()
            .find(|(agents, _)| agents.iter().any(|a| *a == key))
            .map(|(_, pos)| *pos)
    }

    /// Resolves an optional raw position string.
    ///
    /// Absent or blank input is Flex with no warning, an unknown name is Flex
    /// plus `UnknownPosition`. Control characters make the string malformed.
    pub fn resolve(raw: Option<&str>) -> Result<(Position, Option<DataWarning>), PredictionError> {
        let Some(raw) = raw else {
            return Ok((Position::Flex, None));
        };
        if raw.chars().any(char::is_control) {
            return Err(PredictionError::MalformedPosition { raw: raw.to_string() });
        }
        if raw.trim().is_empty() {
            return Ok((Position::Flex, None));
        }
        match Position::from_name(raw) {
            Some(pos) => Ok((pos, None)),
            None => Ok((
                Position::Flex,
                Some(DataWarning::UnknownPosition { raw: raw.trim().to_string() }),
            )),
        }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ── Side ─────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Side {
    Over,
    Under,
}

impl Side {
    pub fn as_str(&self) -> &'static str {
        match self {
            Side::Over  => "OVER",
            Side::Under => "UNDER",
        }
    }

    pub fn parse(raw: &str) -> Option<Side> {
        match raw.trim().to_ascii_uppercase().as_str() {
            "OVER" | "O"  => Some(Side::Over),
            "UNDER" | "U" => Some(Side::Under),
            _ => None,
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ── Inputs ───────────────────────────────────────────────────────────────────

/// One bookmaker kill line for a player.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerLine {
    pub player:   String,
    pub team:     String,
    pub position: Option<String>,
    pub line:     f64,
    pub opponent: String,
}

/// A single observed kill count. Histories are stored most-recent-first.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PerformanceSample {
    pub kills:    i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date:     Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub map:      Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub opponent: Option<String>,
}

impl PerformanceSample {
    pub fn kills(kills: i64) -> Self {
        Self { kills, date: None, map: None, opponent: None }
    }
}

// ── Output ───────────────────────────────────────────────────────────────────

/// Non-fatal data gaps. The calculator falls back to documented defaults and
/// reports what it did so callers can show reduced confidence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DataWarning {
    NoSamples,
    /// stddev of one sample is 0, so sigma sits on the floor
    SingleSample,
    UnknownTeam { team: String },
    UnknownOpponent { team: String },
    UnknownPosition { raw: String },
}

impl fmt::Display for DataWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DataWarning::NoSamples               => write!(f, "no samples, mean follows the line"),
            DataWarning::SingleSample            => write!(f, "single sample, sigma floored"),
            DataWarning::UnknownTeam { team }    => write!(f, "unknown team {team}, neutral strength"),
            DataWarning::UnknownOpponent { team } => write!(f, "unknown opponent {team}, neutral strength"),
            DataWarning::UnknownPosition { raw } => write!(f, "unknown position {raw}, using Flex"),
        }
    }
}

/// Result of one calculator run. Every intermediate is kept so a board or a
/// log line can explain the number.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Prediction {
    pub position:           Position,
    pub line:               f64,
    pub sample_count:       usize,
    pub historical_average: f64,
    pub recent_average:     f64,
    pub weighted_average:   f64,
    pub adjusted_mean:      f64,
    pub strength_ratio:     f64,
    pub matchup_factor:     f64,
    pub final_mean:         f64,
    pub consistency:        f64,
    pub volatility_factor:  f64,
    pub sigma:              f64,
    pub probability_over:   f64,
    pub edge:               f64,
    pub confidence_tier:    u8,
    pub recommended_side:   Side,
    pub warnings:           Vec<DataWarning>,
}

impl Prediction {
    pub fn is_reduced_confidence(&self) -> bool {
        !self.warnings.is_empty()
    }
}
