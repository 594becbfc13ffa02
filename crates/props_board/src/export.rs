use anyhow::{Context, Result};
use serde::Serialize;
use std::fmt::Write as _;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::PlayerProjection;

/// Flat CSV row; warnings are joined since CSV has no nesting.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct CsvProjectionRow<'a> {
    player:           &'a str,
    team:             &'a str,
    opponent:         &'a str,
    position:         &'static str,
    line:             f64,
    adjusted_mean:    f64,
    final_mean:       f64,
    sigma:            f64,
    probability_over: f64,
    edge:             f64,
    confidence_tier:  u8,
    recommended_side: &'static str,
    warnings:         String,
}

pub fn write_csv<W: Write>(writer: W, projections: &[PlayerProjection]) -> Result<()> {
    let mut wtr = csv::Writer::from_writer(writer);
    for p in projections {
        let warnings = p
            .warnings
            .iter()
            .map(|w| w.to_string())
            .collect::<Vec<_>>()
            .join("; ");
        wtr.serialize(CsvProjectionRow {
            player:           &p.player,
            team:             &p.team,
            opponent:         &p.opponent,
            position:         p.position.as_str(),
            line:             p.line,
            adjusted_mean:    p.adjusted_mean,
            final_mean:       p.final_mean,
            sigma:            p.sigma,
            probability_over: p.probability_over,
            edge:             p.edge,
            confidence_tier:  p.confidence_tier,
            recommended_side: p.recommended_side.as_str(),
            warnings,
        })
        .context("CSV row write failed")?;
    }
    wtr.flush().context("CSV flush failed")?;
    Ok(())
}

pub fn write_json<W: Write>(writer: W, projections: &[PlayerProjection]) -> Result<()> {
    serde_json::to_writer_pretty(writer, projections).context("JSON export failed")?;
    Ok(())
}

pub fn export_csv_file(path: impl AsRef<Path>, projections: &[PlayerProjection]) -> Result<()> {
    let path = path.as_ref();
    let file = File::create(path).with_context(|| format!("create {}", path.display()))?;
    write_csv(BufWriter::new(file), projections)
}

pub fn export_json_file(path: impl AsRef<Path>, projections: &[PlayerProjection]) -> Result<()> {
    let path = path.as_ref();
    let file = File::create(path).with_context(|| format!("create {}", path.display()))?;
    let mut out = BufWriter::new(file);
    write_json(&mut out, projections)?;
    out.flush()?;
    Ok(())
}

fn stars(tier: u8) -> String {
    "★".repeat(tier as usize)
}

fn clip(s: &str, width: usize) -> String {
    if s.chars().count() <= width {
        s.to_string()
    } else {
        let mut out: String = s.chars().take(width.saturating_sub(1)).collect();
        out.push('…');
        out
    }
}

/// Plain text board for the terminal. `!` marks rows with data warnings.
pub fn render_table(projections: &[PlayerProjection]) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "{:<16} {:<16} {:<10} {:>6} {:>6} {:>5} {:>7} {:>6} {:<4} {:<5}",
        "PLAYER", "TEAM", "POS", "LINE", "MEAN", "SIGMA", "P(OVER)", "EDGE", "CONF", "BET"
    );
    for p in projections {
        let flag = if p.warnings.is_empty() { "" } else { " !" };
        let _ = writeln!(
            out,
            "{:<16} {:<16} {:<10} {:>6.1} {:>6.1} {:>5.1} {:>6.0}% {:>+6.2} {:<4} {:<5}{}",
            clip(&p.player, 16),
            clip(&p.team, 16),
            p.position.as_str(),
            p.line,
            p.final_mean,
            p.sigma,
            p.probability_over * 100.0,
            p.edge,
            stars(p.confidence_tier),
            p.recommended_side.as_str(),
            flag,
        );
    }
    out
}
