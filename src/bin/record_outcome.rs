/// Zapíše výsledek sázky do bet logu.
///
///   cargo run --bin record-outcome -- Derke 20.5 24.1 26 over
use anyhow::{bail, Context, Result};
use dotenv::dotenv;
use logger::BetLog;
use prediction_engine::Side;
use tracing::info;
use tracing_subscriber::{EnvFilter, fmt};

const USAGE: &str = "usage: record-outcome <player> <line> <predicted> <actual> <over|under>";

fn main() -> Result<()> {
    dotenv().ok();
    fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info"))
        )
        .init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let [player, line, predicted, actual, side] = args.as_slice() else {
        bail!(USAGE);
    };

    let line: f64 = line.parse().with_context(|| format!("line {line:?}"))?;
    if !line.is_finite() || line < 0.0 {
        bail!("line must be a non-negative number, got {line}");
    }
    let predicted: f64 = predicted
        .parse()
        .with_context(|| format!("predicted {predicted:?}"))?;
    if !predicted.is_finite() {
        bail!("predicted must be finite, got {predicted}");
    }
    let actual: u32 = actual.parse().with_context(|| format!("actual kills {actual:?}"))?;
    let Some(side) = Side::parse(side) else {
        bail!("side must be over or under, got {side:?}\n{USAGE}");
    };

    let path = std::env::var("PROPS_BET_LOG").unwrap_or_else(|_| "logs/bets.jsonl".to_string());
    let log = BetLog::new(&path);
    let ev = log.record(player, line, predicted, actual, side)?;
    info!("{} {} {:.1}: {} kills → {:?}", ev.player, ev.side, ev.line, ev.actual, ev.result);
    println!("{}", serde_json::to_string(&ev)?);
    Ok(())
}
