/// props-lab — Value Detector
/// Porovnává model P(OVER) vs break-even 50 %
/// Observe only: loguje signály, nesází

use logger::{now_iso, EventLogger, PropValueEvent};
use tracing::{info, warn};

use crate::PlayerProjection;

pub const DEFAULT_MIN_EDGE: f64 = 0.05;

pub struct ValueDetector {
    logger:       EventLogger,
    observe_only: bool,
    min_edge:     f64,
}

impl ValueDetector {
    pub fn new(log_dir: impl Into<std::path::PathBuf>, observe_only: bool) -> Self {
        Self {
            logger:       EventLogger::new(log_dir),
            observe_only,
            min_edge:     DEFAULT_MIN_EDGE,
        }
    }

    pub fn with_min_edge(mut self, min_edge: f64) -> Self {
        self.min_edge = min_edge;
        self
    }

    pub fn min_edge(&self) -> f64 {
        self.min_edge
    }

    /// Logs a `PROP_VALUE` event when |edge| clears the threshold.
    pub fn evaluate(&self, p: &PlayerProjection) -> Option<PropValueEvent> {
        if p.edge.abs() < self.min_edge {
            return None; // pod threshold → ticho
        }

        let action = if self.observe_only { "OBSERVE" } else { "BET" };

        let ev = PropValueEvent {
            ts:               now_iso(),
            event:            "PROP_VALUE",
            player:           p.player.clone(),
            team:             p.team.clone(),
            opponent:         p.opponent.clone(),
            position:         p.position.as_str().to_string(),
            line:             p.line,
            final_mean:       p.final_mean,
            sigma:            p.sigma,
            probability_over: p.probability_over,
            edge:             p.edge,
            confidence_tier:  p.confidence_tier,
            side:             p.recommended_side,
            action:           action.to_string(),
        };

        info!(
            edge = format!("{:+.1}%", p.edge * 100.0),
            p_over = format!("{:.2}", p.probability_over),
            side = %p.recommended_side,
            "{} ({}) {} {:.1}: value found",
            p.player, p.team, p.recommended_side, p.line
        );

        if let Err(e) = self.logger.log(&ev) {
            warn!("Log write failed: {e}");
        }
        Some(ev)
    }

    /// Number of signals emitted.
    pub fn evaluate_all(&self, projections: &[PlayerProjection]) -> usize {
        projections.iter().filter_map(|p| self.evaluate(p)).count()
    }
}
