//! CSV input. Header row required:
//!
//! `name,team,position,line,opponent,team_strength,opponent_strength,recent_samples`
//!
//! `position`, `agent`, `opponent`, both strengths and `recent_samples` may be
//! empty or missing. `recent_samples` is a `;`/`|`/space separated list,
//! most recent first ("25;23;27;22;24").

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::{normalize, IngestReport, RawRecord, Rejected};

#[derive(Deserialize, Debug)]
struct CsvRow {
    #[serde(alias = "player")]
    name:              String,
    team:              String,
    #[serde(default)]
    position:          Option<String>,
    #[serde(default)]
    agent:             Option<String>,
    line:              f64,
    #[serde(default)]
    opponent:          Option<String>,
    #[serde(default)]
    team_strength:     Option<f64>,
    #[serde(default)]
    opponent_strength: Option<f64>,
    #[serde(default)]
    recent_samples:    Option<String>,
}

pub fn parse_sample_list(raw: &str) -> Result<Vec<i64>> {
    raw.split(|c: char| c == ';' || c == '|' || c.is_whitespace())
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| s.parse::<i64>().with_context(|| format!("bad sample {s:?}")))
        .collect()
}

fn to_raw(row: CsvRow) -> Result<RawRecord> {
    let recent_samples = match row.recent_samples.as_deref() {
        Some(s) => parse_sample_list(s)?,
        None => Vec::new(),
    };
    Ok(RawRecord {
        name: row.name,
        team: row.team,
        position: row.position,
        agent: row.agent,
        line: row.line,
        opponent: row.opponent,
        team_strength: row.team_strength,
        opponent_strength: row.opponent_strength,
        recent_samples,
        history: Vec::new(),
        kills: None,
    })
}

pub fn parse_csv_str(raw: &str) -> Result<IngestReport> {
    let mut rdr = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .flexible(true)
        .from_reader(raw.as_bytes());

    let mut report = IngestReport::default();
    for (i, row) in rdr.deserialize::<CsvRow>().enumerate() {
        // header is line 1, so data row i sits on line i + 2
        let row_no = i + 2;
        let parsed = row
            .with_context(|| format!("CSV row {row_no}"))
            .and_then(to_raw);
        match parsed {
            Ok(rec) => {
                let res = normalize(&rec, None);
                report.push(row_no, &rec, res);
            }
            Err(e) => report.rejected.push(Rejected {
                row: row_no,
                player: None,
                reason: format!("{e:#}"),
            }),
        }
    }
    Ok(report)
}
