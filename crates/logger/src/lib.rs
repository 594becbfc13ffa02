/// props-lab — Logger
/// JSONL event stream (per-day files) + flat bet outcome log

use anyhow::{Context, Result};
use chrono::Utc;
use prediction_engine::Side;
use serde::{Deserialize, Serialize};
use std::fs::{self, OpenOptions};
use std::io::{BufRead, BufReader, Write};
use std::path::{Path, PathBuf};
use tracing::warn;

pub struct EventLogger {
    log_dir: PathBuf,
}

impl EventLogger {
    pub fn new(log_dir: impl Into<PathBuf>) -> Self {
        let dir = log_dir.into();
        fs::create_dir_all(&dir).ok();
        Self { log_dir: dir }
    }

    pub fn log_dir(&self) -> &Path {
        &self.log_dir
    }

    pub fn today_path(&self) -> PathBuf {
        let date = Utc::now().format("%Y-%m-%d").to_string();
        self.log_dir.join(format!("{date}.jsonl"))
    }

    pub fn log<T: Serialize>(&self, event: &T) -> Result<()> {
        let line = serde_json::to_string(event)?;
        append_line(&self.today_path(), &line)
    }
}

/// Appends one line under an exclusive file lock, so parallel runs writing the
/// same file never interleave.
fn append_line(path: &Path, line: &str) -> Result<()> {
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("open log {}", path.display()))?;
    let mut lock = fd_lock::RwLock::new(file);
    let mut guard = lock
        .write()
        .with_context(|| format!("lock log {}", path.display()))?;
    writeln!(guard, "{line}")?;
    Ok(())
}

pub fn now_iso() -> String {
    Utc::now().to_rfc3339()
}

// ── Event typy ────────────────────────────────────────────────────────────────

#[derive(Serialize, Debug)]
pub struct PropValueEvent {
    pub ts:               String,
    pub event:            &'static str,   // "PROP_VALUE"
    pub player:           String,
    pub team:             String,
    pub opponent:         String,
    pub position:         String,
    pub line:             f64,
    pub final_mean:       f64,
    pub sigma:            f64,
    pub probability_over: f64,
    pub edge:             f64,
    pub confidence_tier:  u8,
    pub side:             Side,
    pub action:           String,         // "OBSERVE" (zatím nic nesázíme)
}

#[derive(Serialize, Debug)]
pub struct SlateProcessedEvent {
    pub ts:            String,
    pub event:         &'static str,   // "SLATE_PROCESSED"
    pub source:        String,         // input path | "sample"
    pub records:       usize,
    pub projected:     usize,
    pub rejected:      usize,
    pub warnings:      usize,
    pub value_signals: usize,
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "UPPERCASE")]
pub enum BetResult {
    Win,
    Loss,
    Push,
}

impl BetResult {
    /// OVER wins strictly above the line, UNDER strictly below, equal is a push.
    pub fn settle(side: Side, line: f64, actual: u32) -> Self {
        let actual = f64::from(actual);
        if actual == line {
            return BetResult::Push;
        }
        let over_hit = actual > line;
        match (side, over_hit) {
            (Side::Over, true) | (Side::Under, false) => BetResult::Win,
            _ => BetResult::Loss,
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct BetOutcomeEvent {
    pub ts:        String,
    pub event:     String,   // "BET_OUTCOME"
    pub player:    String,
    pub line:      f64,
    pub predicted: f64,
    pub actual:    u32,
    pub side:      Side,
    pub result:    BetResult,
}

// ── Bet log ──────────────────────────────────────────────────────────────────

/// Flat append-only JSONL file of settled bets.
pub struct BetLog {
    path: PathBuf,
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct SideTally {
    pub wins:   usize,
    pub losses: usize,
    pub pushes: usize,
}

impl SideTally {
    fn add(&mut self, result: BetResult) {
        match result {
            BetResult::Win  => self.wins += 1,
            BetResult::Loss => self.losses += 1,
            BetResult::Push => self.pushes += 1,
        }
    }

    pub fn total(&self) -> usize {
        self.wins + self.losses + self.pushes
    }

    /// Wins / decided bets; pushes do not count.
    pub fn hit_rate(&self) -> Option<f64> {
        let decided = self.wins + self.losses;
        (decided > 0).then(|| self.wins as f64 / decided as f64)
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct OutcomeSummary {
    pub all:   SideTally,
    pub over:  SideTally,
    pub under: SideTally,
    /// Mean |predicted - actual| across all records.
    pub mean_abs_error: Option<f64>,
    /// Lines in the file that did not parse.
    pub skipped: usize,
}

impl BetLog {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).ok();
        }
        Self { path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn record(
        &self,
        player:    &str,
        line:      f64,
        predicted: f64,
        actual:    u32,
        side:      Side,
    ) -> Result<BetOutcomeEvent> {
        let ev = BetOutcomeEvent {
            ts:        now_iso(),
            event:     "BET_OUTCOME".to_string(),
            player:    player.to_string(),
            line,
            predicted,
            actual,
            side,
            result:    BetResult::settle(side, line, actual),
        };
        let line = serde_json::to_string(&ev)?;
        append_line(&self.path, &line)?;
        Ok(ev)
    }

    /// All parsable records plus the count of lines that were skipped.
    /// A missing file is an empty log.
    pub fn read_all(&self) -> Result<(Vec<BetOutcomeEvent>, usize)> {
        let file = match fs::File::open(&self.path) {
            Ok(f) => f,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok((Vec::new(), 0)),
            Err(e) => return Err(e).with_context(|| format!("open bet log {}", self.path.display())),
        };

        let mut events = Vec::new();
        let mut skipped = 0usize;
        for (n, line) in BufReader::new(file).lines().enumerate() {
            let line = line.context("bet log read failed")?;
            if line.trim().is_empty() {
                continue;
            }
            match serde_json::from_str::<BetOutcomeEvent>(&line) {
                Ok(ev) => events.push(ev),
                Err(e) => {
                    warn!("bet log line {} skipped: {}", n + 1, e);
                    skipped += 1;
                }
            }
        }
        Ok((events, skipped))
    }

    pub fn summary(&self) -> Result<OutcomeSummary> {
        let (events, skipped) = self.read_all()?;
        let mut summary = summarize(&events);
        summary.skipped = skipped;
        Ok(summary)
    }
}

pub fn summarize(events: &[BetOutcomeEvent]) -> OutcomeSummary {
    let mut s = OutcomeSummary::default();
    let mut abs_err = 0.0;
    for ev in events {
        s.all.add(ev.result);
        match ev.side {
            Side::Over  => s.over.add(ev.result),
            Side::Under => s.under.add(ev.result),
        }
        abs_err += (ev.predicted - f64::from(ev.actual)).abs();
    }
    if !events.is_empty() {
        s.mean_abs_error = Some(abs_err / events.len() as f64);
    }
    s
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn settle_rules() {
        assert_eq!(BetResult::settle(Side::Over, 20.5, 21), BetResult::Win);
        assert_eq!(BetResult::settle(Side::Over, 20.5, 20), BetResult::Loss);
        assert_eq!(BetResult::settle(Side::Under, 20.5, 20), BetResult::Win);
        assert_eq!(BetResult::settle(Side::Under, 20.5, 21), BetResult::Loss);
        assert_eq!(BetResult::settle(Side::Over, 20.0, 20), BetResult::Push);
        assert_eq!(BetResult::settle(Side::Under, 20.0, 20), BetResult::Push);
    }

    #[test]
    fn hit_rate_ignores_pushes() {
        let t = SideTally { wins: 3, losses: 1, pushes: 5 };
        assert_eq!(t.hit_rate(), Some(0.75));
        assert_eq!(t.total(), 9);
        assert_eq!(SideTally::default().hit_rate(), None);
    }
}
