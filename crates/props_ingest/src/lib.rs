//! props-lab — Ingest
//!
//! Turns pasted/exported prop lines into `PlayerLine` + history samples.
//! Accepted inputs:
//!   - JSON array of records `[{name, team, position?, line, opponent, ...}]`
//!   - slate JSON (Underdog paste) `{team1, team2, players: [...]}`
//!   - CSV with a header row (see `csv_rows`)
//!
//! Žádný network, žádné HTML. Scraping je věc volajícího.

use anyhow::{bail, Context, Result};
use prediction_engine::{normalize_team_name, PerformanceSample, PlayerLine, StrengthOverrides};
use serde::Deserialize;
use std::path::Path;
use tracing::{debug, warn};

pub mod csv_rows;
pub mod sample;

pub use sample::sample_slate;

pub const UNKNOWN_OPPONENT: &str = "Unknown";

// ── Raw input ────────────────────────────────────────────────────────────────

#[derive(Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RawRecord {
    #[serde(alias = "player")]
    pub name:              String,
    pub team:              String,
    #[serde(default, alias = "role")]
    pub position:          Option<String>,
    #[serde(default)]
    pub agent:             Option<String>,
    pub line:              f64,
    #[serde(default)]
    pub opponent:          Option<String>,
    #[serde(default, alias = "team_strength")]
    pub team_strength:     Option<f64>,
    #[serde(default, alias = "opponent_strength")]
    pub opponent_strength: Option<f64>,
    /// Most-recent-first kill counts.
    #[serde(default, alias = "recent_samples", alias = "last5")]
    pub recent_samples:    Vec<i64>,
    /// Tagged history; used when `recentSamples` is empty.
    #[serde(default)]
    pub history:           Vec<PerformanceSample>,
    /// Kills from a single scraped match; used only when nothing else is given.
    #[serde(default)]
    pub kills:             Option<f64>,
}

#[derive(Deserialize, Debug, Clone)]
struct Slate {
    #[serde(default)]
    team1:   Option<String>,
    #[serde(default)]
    team2:   Option<String>,
    // raw values so one bad player is rejected alone
    players: Vec<serde_json::Value>,
}

// ── Normalized output ────────────────────────────────────────────────────────

/// One player ready for the calculator.
#[derive(Debug, Clone, PartialEq)]
pub struct PropEntry {
    pub line:      PlayerLine,
    pub samples:   Vec<PerformanceSample>,
    pub strengths: StrengthOverrides,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Rejected {
    /// 1-based row / array position.
    pub row:    usize,
    pub player: Option<String>,
    pub reason: String,
}

/// Partial data is fine: good rows go through, bad rows are listed.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct IngestReport {
    pub entries:  Vec<PropEntry>,
    pub rejected: Vec<Rejected>,
}

impl IngestReport {
    pub fn total(&self) -> usize {
        self.entries.len() + self.rejected.len()
    }

    fn push(&mut self, row: usize, raw: &RawRecord, result: Result<PropEntry>) {
        match result {
            Ok(entry) => self.entries.push(entry),
            Err(e) => {
                warn!("row {} ({}) rejected: {:#}", row, raw.name, e);
                self.rejected.push(Rejected {
                    row,
                    player: (!raw.name.trim().is_empty()).then(|| raw.name.trim().to_string()),
                    reason: format!("{e:#}"),
                });
            }
        }
    }
}

/// Opponent for a slate player: the other slate team, else "Unknown".
fn slate_opponent(team: &str, team1: Option<&str>, team2: Option<&str>) -> Option<String> {
    let key = normalize_team_name(team);
    let t1 = team1.map(normalize_team_name);
    let t2 = team2.map(normalize_team_name);
    if t1.as_deref() == Some(key.as_str()) {
        return team2.map(str::to_string);
    }
    if t2.as_deref() == Some(key.as_str()) {
        return team1.map(str::to_string);
    }
    None
}

fn kills_to_sample(kills: f64) -> Result<PerformanceSample> {
    if !kills.is_finite() || kills.fract() != 0.0 {
        bail!("kills must be a whole number, got {kills}");
    }
    Ok(PerformanceSample::kills(kills as i64))
}

/// Structural checks only. Numeric validity (negative line, negative kills,
/// strengths) is the calculator's call.
pub fn normalize(raw: &RawRecord, default_opponent: Option<&str>) -> Result<PropEntry> {
    let name = raw.name.trim();
    let team = raw.team.trim();
    if name.is_empty() {
        bail!("player name is blank");
    }
    if team.is_empty() {
        bail!("team is blank for {name}");
    }

    let opponent = raw
        .opponent
        .as_deref()
        .map(str::trim)
        .filter(|o| !o.is_empty())
        .or(default_opponent)
        .unwrap_or(UNKNOWN_OPPONENT)
        .to_string();

    // Agent je přesnější než ručně zadaná role
    let position = raw
        .agent
        .clone()
        .filter(|a| !a.trim().is_empty())
        .or_else(|| raw.position.clone());

    let samples = if !raw.recent_samples.is_empty() {
        raw.recent_samples.iter().copied().map(PerformanceSample::kills).collect()
    } else if !raw.history.is_empty() {
        raw.history.clone()
    } else if let Some(k) = raw.kills {
        vec![kills_to_sample(k).with_context(|| format!("bad kills for {name}"))?]
    } else {
        Vec::new()
    };

    Ok(PropEntry {
        line: PlayerLine {
            player: name.to_string(),
            team: team.to_string(),
            position,
            line: raw.line,
            opponent,
        },
        samples,
        strengths: StrengthOverrides {
            team:     raw.team_strength,
            opponent: raw.opponent_strength,
        },
    })
}

// ── JSON ─────────────────────────────────────────────────────────────────────

/// Typed record from one JSON value; a value that does not fit `RawRecord`
/// is listed as rejected.
fn record_from_value(report: &mut IngestReport, row: usize, item: serde_json::Value) -> Option<RawRecord> {
    let player = item
        .get("name")
        .or_else(|| item.get("player"))
        .and_then(serde_json::Value::as_str)
        .map(str::trim)
        .filter(|n| !n.is_empty())
        .map(str::to_string);
    match serde_json::from_value::<RawRecord>(item) {
        Ok(rec) => Some(rec),
        Err(e) => {
            warn!("row {} ({}) rejected: {}", row, player.as_deref().unwrap_or("?"), e);
            report.rejected.push(Rejected {
                row,
                player,
                reason: format!("record parse failed: {e}"),
            });
            None
        }
    }
}

pub fn parse_json_str(raw: &str) -> Result<IngestReport> {
    let value: serde_json::Value = serde_json::from_str(raw).context("input JSON parse failed")?;

    let mut report = IngestReport::default();
    match value {
        serde_json::Value::Array(items) => {
            for (i, item) in items.into_iter().enumerate() {
                if let Some(rec) = record_from_value(&mut report, i + 1, item) {
                    let res = normalize(&rec, None);
                    report.push(i + 1, &rec, res);
                }
            }
        }
        obj @ serde_json::Value::Object(_) => {
            let slate: Slate = serde_json::from_value(obj)
                .context("slate JSON needs a players array (team1/team2 optional)")?;
            debug!(
                "slate {} vs {} with {} players",
                slate.team1.as_deref().unwrap_or("?"),
                slate.team2.as_deref().unwrap_or("?"),
                slate.players.len()
            );
            for (i, item) in slate.players.into_iter().enumerate() {
                let Some(rec) = record_from_value(&mut report, i + 1, item) else {
                    continue;
                };
                let opp = slate_opponent(&rec.team, slate.team1.as_deref(), slate.team2.as_deref());
                let res = normalize(&rec, opp.as_deref());
                report.push(i + 1, &rec, res);
            }
        }
        _ => bail!("input JSON must be an array of records or a slate object"),
    }
    Ok(report)
}

// ── Files ────────────────────────────────────────────────────────────────────

/// `.csv` goes through the CSV reader, anything else is treated as JSON.
pub fn load_path(path: impl AsRef<Path>) -> Result<IngestReport> {
    let path = path.as_ref();
    let raw = std::fs::read_to_string(path).with_context(|| format!("read input {}", path.display()))?;
    let is_csv = path
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("csv"));
    if is_csv {
        csv_rows::parse_csv_str(&raw).with_context(|| format!("CSV input {}", path.display()))
    } else {
        parse_json_str(&raw).with_context(|| format!("JSON input {}", path.display()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slate_opponent_matches_either_side() {
        assert_eq!(
            slate_opponent("team liquid", Some("Team Liquid"), Some("Fnatic")).as_deref(),
            Some("Fnatic")
        );
        assert_eq!(
            slate_opponent("FNATIC", Some("Team Liquid"), Some("Fnatic")).as_deref(),
            Some("Team Liquid")
        );
        assert_eq!(slate_opponent("DRX", Some("Team Liquid"), Some("Fnatic")), None);
    }

    #[test]
    fn single_match_kills_become_one_sample() {
        let raw = RawRecord {
            name: "Derke".into(),
            team: "Fnatic".into(),
            line: 25.5,
            kills: Some(27.0),
            ..RawRecord::default()
        };
        let entry = normalize(&raw, None).unwrap();
        assert_eq!(entry.samples, vec![PerformanceSample::kills(27)]);
        assert_eq!(entry.line.opponent, UNKNOWN_OPPONENT);
    }

    #[test]
    fn fractional_kills_are_rejected() {
        let raw = RawRecord {
            name: "Derke".into(),
            team: "Fnatic".into(),
            line: 25.5,
            kills: Some(27.5),
            ..RawRecord::default()
        };
        assert!(normalize(&raw, None).is_err());
    }

    #[test]
    fn agent_fills_missing_position() {
        let raw = RawRecord {
            name: "Boaster".into(),
            team: "Fnatic".into(),
            agent: Some("Brimstone".into()),
            line: 13.5,
            ..RawRecord::default()
        };
        let entry = normalize(&raw, Some("Team Liquid")).unwrap();
        assert_eq!(entry.line.position.as_deref(), Some("Brimstone"));
        assert_eq!(entry.line.opponent, "Team Liquid");
    }

    #[test]
    fn agent_wins_over_typed_position() {
        let raw = RawRecord {
            name: "Chronicle".into(),
            team: "Fnatic".into(),
            position: Some("Duelist".into()),
            agent: Some("Viper".into()),
            line: 16.5,
            ..RawRecord::default()
        };
        let entry = normalize(&raw, None).unwrap();
        assert_eq!(entry.line.position.as_deref(), Some("Viper"));

        let blank_agent = RawRecord { agent: Some("  ".into()), ..raw };
        let entry = normalize(&blank_agent, None).unwrap();
        assert_eq!(entry.line.position.as_deref(), Some("Duelist"));
    }
}
