//! props-lab — Board
//!
//! Batch projection of a slate plus everything the terminal / exports need:
//! filters, sort, CSV/JSON export, text table and the value signal log.

use prediction_engine::{
    DataWarning, LinePredictor, Position, Prediction, PredictionError, Side, TeamRatings,
};
use props_ingest::PropEntry;
use rayon::prelude::*;
use serde::Serialize;
use tracing::{debug, warn};

pub mod export;
pub mod filter;
pub mod value;

pub use filter::{BoardFilter, SortKey};
pub use value::ValueDetector;

/// Output record handed to presentation. Field names follow the external
/// interface (camelCase JSON).
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerProjection {
    pub player:           String,
    pub team:             String,
    pub opponent:         String,
    pub position:         Position,
    pub line:             f64,
    pub adjusted_mean:    f64,
    pub final_mean:       f64,
    pub sigma:            f64,
    pub probability_over: f64,
    pub edge:             f64,
    pub confidence_tier:  u8,
    pub recommended_side: Side,
    pub warnings:         Vec<DataWarning>,
}

impl PlayerProjection {
    pub fn from_prediction(entry: &PropEntry, p: &Prediction) -> Self {
        Self {
            player:           entry.line.player.clone(),
            team:             entry.line.team.clone(),
            opponent:         entry.line.opponent.clone(),
            position:         p.position,
            line:             p.line,
            adjusted_mean:    p.adjusted_mean,
            final_mean:       p.final_mean,
            sigma:            p.sigma,
            probability_over: p.probability_over,
            edge:             p.edge,
            confidence_tier:  p.confidence_tier,
            recommended_side: p.recommended_side,
            warnings:         p.warnings.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ProjectionFailure {
    pub player: String,
    pub team:   String,
    pub error:  PredictionError,
}

/// Result of one batch. Both lists keep input order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BoardRun {
    pub projections: Vec<PlayerProjection>,
    pub failures:    Vec<ProjectionFailure>,
}

impl BoardRun {
    pub fn warning_count(&self) -> usize {
        self.projections.iter().map(|p| p.warnings.len()).sum()
    }
}

pub fn project_one(
    entry:     &PropEntry,
    predictor: &LinePredictor,
    ratings:   &TeamRatings,
) -> Result<PlayerProjection, ProjectionFailure> {
    predictor
        .predict_player(&entry.line, &entry.samples, ratings, entry.strengths)
        .map(|p| PlayerProjection::from_prediction(entry, &p))
        .map_err(|error| ProjectionFailure {
            player: entry.line.player.clone(),
            team:   entry.line.team.clone(),
            error,
        })
}

/// Projects every entry in parallel on the current rayon pool.
///
/// Each player only reads its own entry, so the output does not depend on
/// worker count or scheduling.
pub fn project_all(
    entries:   &[PropEntry],
    predictor: &LinePredictor,
    ratings:   &TeamRatings,
) -> BoardRun {
    let results: Vec<Result<PlayerProjection, ProjectionFailure>> = entries
        .par_iter()
        .map(|entry| project_one(entry, predictor, ratings))
        .collect();

    let mut run = BoardRun::default();
    for result in results {
        match result {
            Ok(p) => {
                for w in &p.warnings {
                    debug!("{} ({}): {}", p.player, p.team, w);
                }
                run.projections.push(p);
            }
            Err(f) => {
                warn!("{} ({}) not projected: {}", f.player, f.team, f.error);
                run.failures.push(f);
            }
        }
    }
    run
}
