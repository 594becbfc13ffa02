//! Line Prediction Calculator.
//!
//! Normal model around a position/matchup adjusted mean. Pure: borrowed inputs
//! in, fresh `Prediction` out, nothing cached between calls.

use statrs::distribution::{ContinuousCDF, Normal};
use tracing::debug;

use crate::config::ModelConfig;
use crate::error::{ConfigError, PredictionError};
use crate::model::{DataWarning, PerformanceSample, PlayerLine, Position, Prediction, Side};
use crate::ratings::{TeamRatings, NEUTRAL_STRENGTH};
use crate::stats::{mean, population_std_dev};

/// Fully resolved calculator input.
#[derive(Debug, Clone, Copy)]
pub struct LineInput<'a> {
    pub line:              f64,
    pub position:          Position,
    /// Most-recent-first.
    pub samples:           &'a [PerformanceSample],
    pub team_strength:     f64,
    pub opponent_strength: f64,
}

/// Strengths supplied with the input record. `None` means "ask the ratings table".
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct StrengthOverrides {
    pub team:     Option<f64>,
    pub opponent: Option<f64>,
}

#[derive(Debug, Clone, Default)]
pub struct LinePredictor {
    config: ModelConfig,
}

fn check_strength(side: &'static str, value: f64) -> Result<f64, PredictionError> {
    if value.is_finite() && value > 0.0 {
        Ok(value)
    } else {
        Err(PredictionError::InvalidStrength { side, value })
    }
}

impl LinePredictor {
    /// Rejects a config that fails `ModelConfig::validate`.
    pub fn new(config: ModelConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &ModelConfig {
        &self.config
    }

    pub fn predict(&self, input: &LineInput<'_>) -> Result<Prediction, PredictionError> {
        let cfg = &self.config;

        if !input.line.is_finite() || input.line < 0.0 {
            return Err(PredictionError::InvalidLine { line: input.line });
        }
        if let Some((index, s)) = input.samples.iter().enumerate().find(|(_, s)| s.kills < 0) {
            return Err(PredictionError::NegativeSample { index, kills: s.kills });
        }
        let team = check_strength("team", input.team_strength)?;
        let opponent = check_strength("opponent", input.opponent_strength)?;

        let mut warnings = Vec::new();
        let kills: Vec<f64> = input.samples.iter().map(|s| s.kills as f64).collect();
        match kills.len() {
            0 => warnings.push(DataWarning::NoSamples),
            1 => warnings.push(DataWarning::SingleSample),
            _ => {}
        }

        // No history → assume the market is right.
        let historical_average = mean(&kills).unwrap_or(input.line);
        let has_window = kills.len() >= cfg.recent_window;
        let recent_average = if has_window {
            mean(&kills[..cfg.recent_window]).unwrap_or(historical_average)
        } else {
            historical_average
        };
        let w = if has_window { cfg.recent_weight } else { cfg.sparse_recent_weight };
        let weighted_average = recent_average * w + historical_average * (1.0 - w);

        let profile = cfg.positions.profile(input.position);
        let adjusted_mean = weighted_average * profile.kill_modifier;

        let strength_ratio = opponent / team;
        // Floored at 0: past ratio ~7.7 the linear term would flip the mean negative.
        let matchup_factor = (1.0 + (1.0 - strength_ratio) * cfg.matchup_sensitivity).max(0.0);
        let final_mean = adjusted_mean * matchup_factor;

        let consistency = match population_std_dev(&kills) {
            Some(sd) if historical_average > 0.0 => sd / historical_average,
            _ => 1.0,
        };
        let volatility_factor =
            if strength_ratio < cfg.even_band_low || strength_ratio > cfg.even_band_high {
                cfg.mismatch_volatility
            } else {
                1.0
            };
        let sigma = (profile.base_dispersion * consistency * volatility_factor).max(cfg.sigma_floor);

        let dist = Normal::new(final_mean, sigma).map_err(|e| PredictionError::Distribution {
            mean: final_mean,
            sigma,
            reason: e.to_string(),
        })?;
        let probability_over = dist.sf(input.line).clamp(0.0, 1.0);
        let edge = probability_over - 0.5;

        let raw_tier = (edge.abs() * cfg.tier_scale).round();
        let confidence_tier = raw_tier.clamp(1.0, f64::from(cfg.max_tier)) as u8;
        let recommended_side = if probability_over > cfg.over_threshold {
            Side::Over
        } else {
            Side::Under
        };

        debug!(
            line = input.line,
            position = %input.position,
            samples = kills.len(),
            final_mean,
            sigma,
            probability_over,
            "line predicted"
        );

        Ok(Prediction {
            position: input.position,
            line: input.line,
            sample_count: kills.len(),
            historical_average,
            recent_average,
            weighted_average,
            adjusted_mean,
            strength_ratio,
            matchup_factor,
            final_mean,
            consistency,
            volatility_factor,
            sigma,
            probability_over,
            edge,
            confidence_tier,
            recommended_side,
            warnings,
        })
    }

    /// Resolves position and strengths for a player line, then predicts.
    ///
    /// Explicit strengths win over the ratings table; unknown teams fall back to
    /// neutral strength and are reported as warnings.
    pub fn predict_player(
        &self,
        player: &PlayerLine,
        samples: &[PerformanceSample],
        ratings: &TeamRatings,
        overrides: StrengthOverrides,
    ) -> Result<Prediction, PredictionError> {
        let (position, position_warning) = Position::resolve(player.position.as_deref())?;

        let mut warnings = Vec::new();
        if let Some(w) = position_warning {
            warnings.push(w);
        }

        let team_strength = match overrides.team.or_else(|| ratings.lookup(&player.team)) {
            Some(s) => s,
            None => {
                warnings.push(DataWarning::UnknownTeam { team: player.team.clone() });
                NEUTRAL_STRENGTH
            }
        };
        let opponent_strength = match overrides.opponent.or_else(|| ratings.lookup(&player.opponent)) {
            Some(s) => s,
            None => {
                warnings.push(DataWarning::UnknownOpponent { team: player.opponent.clone() });
                NEUTRAL_STRENGTH
            }
        };

        let mut prediction = self.predict(&LineInput {
            line: player.line,
            position,
            samples,
            team_strength,
            opponent_strength,
        })?;
        prediction.warnings.extend(warnings);
        Ok(prediction)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn samples(kills: &[i64]) -> Vec<PerformanceSample> {
        kills.iter().copied().map(PerformanceSample::kills).collect()
    }

    fn neutral<'a>(line: f64, position: Position, s: &'a [PerformanceSample]) -> LineInput<'a> {
        LineInput { line, position, samples: s, team_strength: 1.0, opponent_strength: 1.0 }
    }

    #[test]
    fn recent_window_uses_newest_samples() {
        let s = samples(&[30, 30, 30, 30, 30, 10, 10, 10, 10, 10]);
        let p = LinePredictor::default().predict(&neutral(20.0, Position::Flex, &s)).unwrap();
        assert_eq!(p.historical_average, 20.0);
        assert_eq!(p.recent_average, 30.0);
        assert!((p.weighted_average - (30.0 * 0.7 + 20.0 * 0.3)).abs() < 1e-12);
    }

    #[test]
    fn sparse_history_uses_even_weights() {
        let s = samples(&[18, 22, 20]);
        let p = LinePredictor::default().predict(&neutral(20.0, Position::Flex, &s)).unwrap();
        assert_eq!(p.recent_average, p.historical_average);
        assert_eq!(p.weighted_average, 20.0);
    }

    #[test]
    fn all_zero_history_has_max_uncertainty() {
        let s = samples(&[0, 0, 0]);
        let p = LinePredictor::default().predict(&neutral(5.0, Position::Flex, &s)).unwrap();
        assert_eq!(p.consistency, 1.0);
        assert_eq!(p.sigma, 3.0);
    }

    #[test]
    fn zero_line_is_accepted() {
        let s = samples(&[10, 12]);
        let p = LinePredictor::default().predict(&neutral(0.0, Position::Flex, &s)).unwrap();
        assert!(p.probability_over > 0.99);
    }

    #[test]
    fn rejects_invalid_numbers() {
        let predictor = LinePredictor::default();
        let s = samples(&[10]);
        let err = predictor.predict(&neutral(-0.5, Position::Flex, &s)).unwrap_err();
        assert!(matches!(err, PredictionError::InvalidLine { .. }));

        let err = predictor.predict(&neutral(f64::NAN, Position::Flex, &s)).unwrap_err();
        assert!(matches!(err, PredictionError::InvalidLine { .. }));

        let bad = samples(&[10, -1]);
        let err = predictor.predict(&neutral(10.0, Position::Flex, &bad)).unwrap_err();
        assert_eq!(err, PredictionError::NegativeSample { index: 1, kills: -1 });

        let mut input = neutral(10.0, Position::Flex, &s);
        input.opponent_strength = 0.0;
        let err = predictor.predict(&input).unwrap_err();
        assert!(matches!(err, PredictionError::InvalidStrength { side: "opponent", .. }));
    }

    #[test]
    fn tier_scale_is_configurable() {
        let s = samples(&[22, 21, 23, 20, 24, 19]);
        let input = neutral(21.0, Position::Flex, &s);
        let cfg = ModelConfig { tier_scale: 1.0, ..ModelConfig::default() };
        let p = LinePredictor::new(cfg).unwrap().predict(&input).unwrap();
        // |edge| <= 0.5 so scale 1 can never leave tier 1
        assert_eq!(p.confidence_tier, 1);
    }

    #[test]
    fn construction_rejects_unusable_config() {
        for max_tier in [0, 4] {
            let cfg = ModelConfig { max_tier, ..ModelConfig::default() };
            assert!(matches!(
                LinePredictor::new(cfg),
                Err(ConfigError::InvalidField { ref field, .. }) if field == "max_tier"
            ));
        }
        let cfg = ModelConfig { tier_scale: f64::NAN, ..ModelConfig::default() };
        assert!(LinePredictor::new(cfg).is_err());
    }
}
