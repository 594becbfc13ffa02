use anyhow::{bail, Result};
use prediction_engine::{normalize_team_name, Position};
use std::cmp::Ordering;
use std::str::FromStr;

use crate::PlayerProjection;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct BoardFilter {
    pub team:           Option<String>,
    pub position:       Option<Position>,
    pub min_confidence: Option<u8>,
}

impl BoardFilter {
    pub fn matches(&self, p: &PlayerProjection) -> bool {
        if let Some(team) = &self.team {
            if normalize_team_name(team) != normalize_team_name(&p.team) {
                return false;
            }
        }
        if let Some(pos) = self.position {
            if pos != p.position {
                return false;
            }
        }
        if let Some(min) = self.min_confidence {
            if p.confidence_tier < min {
                return false;
            }
        }
        true
    }

    pub fn apply(&self, projections: &[PlayerProjection]) -> Vec<PlayerProjection> {
        projections.iter().filter(|p| self.matches(p)).cloned().collect()
    }
}

/// Edge and P(OVER) sort high → low, Line and Team low → high.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortKey {
    #[default]
    Edge,
    ProbabilityOver,
    Line,
    Team,
}

impl FromStr for SortKey {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        let key: String = s
            .to_ascii_lowercase()
            .chars()
            .filter(|c| c.is_ascii_alphanumeric())
            .collect();
        Ok(match key.as_str() {
            "edge" => SortKey::Edge,
            "pover" | "probabilityover" | "prob" => SortKey::ProbabilityOver,
            "line" => SortKey::Line,
            "team" => SortKey::Team,
            _ => bail!("unknown sort key {s:?} (edge | p_over | line | team)"),
        })
    }
}

/// Stable: ties keep their input order.
pub fn sort_projections(projections: &mut [PlayerProjection], key: SortKey) {
    projections.sort_by(|a, b| compare(a, b, key));
}

fn compare(a: &PlayerProjection, b: &PlayerProjection, key: SortKey) -> Ordering {
    match key {
        SortKey::Edge            => b.edge.total_cmp(&a.edge),
        SortKey::ProbabilityOver => b.probability_over.total_cmp(&a.probability_over),
        SortKey::Line            => a.line.total_cmp(&b.line),
        SortKey::Team            => a.team.to_lowercase().cmp(&b.team.to_lowercase()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sort_key_parses_loosely() {
        assert_eq!("Edge".parse::<SortKey>().unwrap(), SortKey::Edge);
        assert_eq!("P(OVER)".parse::<SortKey>().unwrap(), SortKey::ProbabilityOver);
        assert_eq!("probability_over".parse::<SortKey>().unwrap(), SortKey::ProbabilityOver);
        assert_eq!("team".parse::<SortKey>().unwrap(), SortKey::Team);
        assert!("kills".parse::<SortKey>().is_err());
    }
}
