/// props-lab — Kill-line Board
///
/// Co dělá:
///   1. Načte slate (JSON / CSV) nebo vestavěný demo slate
///   2. Pro každého hráče spočítá projekci killů a P(OVER) vůči lince
///   3. Vytiskne tabulku, volitelně exportuje CSV / JSON
///   4. Loguje value signály (|edge| >= PROPS_MIN_EDGE) do ./logs/
///
/// Co NEDĚLÁ: žádné sázky (observe only)
///
/// Spuštění:
///   cargo run --bin props-lab -- slate.json

mod settings;

use anyhow::{Context, Result};
use dotenv::dotenv;
use logger::{now_iso, EventLogger, SlateProcessedEvent};
use prediction_engine::{LinePredictor, ModelConfig, TeamRatings};
use props_board::export::{export_csv_file, export_json_file, render_table};
use props_board::filter::sort_projections;
use props_board::{project_all, BoardRun, ValueDetector};
use props_ingest::{load_path, sample_slate, PropEntry};
use settings::Settings;
use std::env;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

fn main() -> Result<()> {
    dotenv().ok();

    fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info"))
        )
        .init();

    let settings = Settings::from_env(env::args().nth(1))?;

    let config = match &settings.model_config {
        Some(path) => {
            let cfg = ModelConfig::from_json_file(path)
                .with_context(|| format!("model config {}", path.display()))?;
            info!("Model config: {}", path.display());
            cfg
        }
        None => ModelConfig::default(),
    };

    let ratings = match &settings.ratings {
        Some(path) => TeamRatings::from_json_file(path)
            .with_context(|| format!("team ratings {}", path.display()))?,
        None => TeamRatings::default(),
    };
    info!("Team ratings: {} teams", ratings.len());

    let (source, report) = match &settings.input {
        Some(path) => (path.display().to_string(), load_path(path)?),
        None => {
            info!("No input given, using the demo slate");
            ("sample".to_string(), sample_slate()?)
        }
    };
    info!(
        "Slate {}: {} records, {} usable, {} rejected",
        source,
        report.total(),
        report.entries.len(),
        report.rejected.len()
    );

    let predictor = LinePredictor::new(config).context("model config")?;
    let run = run_board(&report.entries, &predictor, &ratings, settings.threads)?;

    let mut board = settings.filter.apply(&run.projections);
    sort_projections(&mut board, settings.sort);
    println!("{}", render_table(&board));

    if let Some(path) = &settings.export_csv {
        export_csv_file(path, &board)?;
        info!("CSV export: {}", path.display());
    }
    if let Some(path) = &settings.export_json {
        export_json_file(path, &board)?;
        info!("JSON export: {}", path.display());
    }

    let mut detector = ValueDetector::new(&settings.log_dir, true);
    if let Some(edge) = settings.min_edge {
        detector = detector.with_min_edge(edge);
    }
    let value_signals = detector.evaluate_all(&board);

    let summary = SlateProcessedEvent {
        ts:            now_iso(),
        event:         "SLATE_PROCESSED",
        source,
        records:       report.total(),
        projected:     run.projections.len(),
        rejected:      report.rejected.len() + run.failures.len(),
        warnings:      run.warning_count(),
        value_signals,
    };
    if let Err(e) = EventLogger::new(&settings.log_dir).log(&summary) {
        warn!("Log write failed: {e}");
    }

    info!(
        "Done: {} projected, {} failed, {} warnings, {} value signals (min edge {:.2})",
        summary.projected,
        run.failures.len(),
        summary.warnings,
        value_signals,
        detector.min_edge()
    );
    Ok(())
}

/// Dedicated pool when PROPS_THREADS is set, otherwise rayon's global one.
fn run_board(
    entries:   &[PropEntry],
    predictor: &LinePredictor,
    ratings:   &TeamRatings,
    threads:   Option<usize>,
) -> Result<BoardRun> {
    match threads {
        Some(n) => {
            let pool = rayon::ThreadPoolBuilder::new()
                .num_threads(n)
                .build()
                .context("rayon pool")?;
            info!("Projecting on {n} threads");
            Ok(pool.install(|| project_all(entries, predictor, ratings)))
        }
        None => Ok(project_all(entries, predictor, ratings)),
    }
}
