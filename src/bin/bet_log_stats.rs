use anyhow::Result;
use logger::{BetLog, SideTally};
use tracing_subscriber::{EnvFilter, fmt};

fn tally_line(label: &str, t: &SideTally) -> String {
    let rate = t
        .hit_rate()
        .map(|r| format!("{:.1}%", r * 100.0))
        .unwrap_or_else(|| "-".to_string());
    format!(
        "{label}: total={} wins={} losses={} pushes={} hit_rate={rate}",
        t.total(),
        t.wins,
        t.losses,
        t.pushes
    )
}

fn main() -> Result<()> {
    dotenv::dotenv().ok();
    // skipped lines are reported via warn!
    fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info"))
        )
        .init();

    let path = std::env::var("PROPS_BET_LOG").unwrap_or_else(|_| "logs/bets.jsonl".to_string());
    let summary = BetLog::new(&path).summary()?;

    println!("bet_log={path}");
    println!("{}", tally_line("all", &summary.all));
    println!("{}", tally_line("over", &summary.over));
    println!("{}", tally_line("under", &summary.under));
    match summary.mean_abs_error {
        Some(mae) => println!("mean_abs_error: {mae:.2} kills"),
        None => println!("mean_abs_error: <none>"),
    }
    if summary.skipped > 0 {
        println!("skipped_lines: {}", summary.skipped);
    }
    Ok(())
}
