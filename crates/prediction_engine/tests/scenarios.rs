use prediction_engine::{
    DataWarning, LineInput, LinePredictor, ModelConfig, PerformanceSample, PlayerLine, Position,
    PredictionError, Side, StrengthOverrides, TeamRatings,
};

fn samples(kills: &[i64]) -> Vec<PerformanceSample> {
    kills.iter().copied().map(PerformanceSample::kills).collect()
}

fn input<'a>(line: f64, position: Position, s: &'a [PerformanceSample], team: f64, opp: f64) -> LineInput<'a> {
    LineInput {
        line,
        position,
        samples: s,
        team_strength: team,
        opponent_strength: opp,
    }
}

fn close(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-9
}

#[test]
fn duelist_in_form_goes_over() {
    let s = samples(&[25, 23, 27, 22, 24]);
    let p = LinePredictor::default()
        .predict(&input(20.0, Position::Duelist, &s, 1.0, 1.0))
        .expect("valid input");

    assert!(close(p.historical_average, 24.2));
    assert!(close(p.recent_average, 24.2));
    assert!(close(p.weighted_average, 24.2));
    assert!(close(p.adjusted_mean, 27.83));
    assert!(close(p.matchup_factor, 1.0));
    assert!(close(p.final_mean, 27.83));
    assert_eq!(p.volatility_factor, 1.0);
    assert!(p.probability_over > 0.5);
    assert_eq!(p.recommended_side, Side::Over);
    assert_eq!(p.confidence_tier, 3);
    assert!(p.warnings.is_empty());
}

#[test]
fn sentinel_without_history_follows_market_then_goes_under() {
    let p = LinePredictor::default()
        .predict(&input(30.0, Position::Sentinel, &[], 1.0, 1.0))
        .expect("valid input");

    assert_eq!(p.historical_average, 30.0);
    assert_eq!(p.recent_average, 30.0);
    assert!(close(p.adjusted_mean, 27.0));
    assert!(close(p.final_mean, 27.0));
    assert_eq!(p.consistency, 1.0);
    assert!(close(p.sigma, 2.0));
    assert!(p.probability_over < 0.5);
    assert_eq!(p.recommended_side, Side::Under);
    assert_eq!(p.warnings, vec![DataWarning::NoSamples]);
}

#[test]
fn heavy_underdog_is_suppressed_and_more_volatile() {
    let s = samples(&[24, 16, 22, 18, 20]);
    let predictor = LinePredictor::default();
    let even = predictor.predict(&input(20.0, Position::Flex, &s, 1.0, 1.0)).unwrap();
    let dog = predictor.predict(&input(20.0, Position::Flex, &s, 1.0, 5.0)).unwrap();

    assert!(close(dog.strength_ratio, 5.0));
    assert!(close(dog.matchup_factor, 0.4));
    assert!(close(dog.final_mean, dog.adjusted_mean * 0.4));
    assert_eq!(dog.volatility_factor, 1.2);
    assert!(close(dog.sigma, even.sigma * 1.2));
    assert!(dog.final_mean < even.final_mean);
    assert_eq!(dog.recommended_side, Side::Under);
}

#[test]
fn favourite_gets_a_boost() {
    let s = samples(&[20, 21, 19, 20, 20]);
    let p = LinePredictor::default()
        .predict(&input(20.0, Position::Flex, &s, 1.15, 1.0))
        .unwrap();
    assert!(p.matchup_factor > 1.0);
    assert!(p.final_mean > p.adjusted_mean);
    assert_eq!(p.volatility_factor, 1.2);
}

#[test]
fn single_sample_saturates_probability() {
    // Known weakness: one sample means stddev 0 and a floored sigma.
    let s = samples(&[20]);
    let p = LinePredictor::default()
        .predict(&input(18.0, Position::Flex, &s, 1.0, 1.0))
        .unwrap();

    assert_eq!(p.historical_average, 20.0);
    assert_eq!(p.consistency, 0.0);
    assert_eq!(p.sigma, 0.1);
    assert!(p.probability_over > 0.999);
    assert_eq!(p.recommended_side, Side::Over);
    assert_eq!(p.warnings, vec![DataWarning::SingleSample]);
}

#[test]
fn over_needs_more_than_threshold() {
    // final mean == line → p = 0.5 exactly, which is below the 0.55 bar
    let s = samples(&[20, 20]);
    let p = LinePredictor::default()
        .predict(&input(20.0, Position::Flex, &s, 1.0, 1.0))
        .unwrap();
    assert!(close(p.probability_over, 0.5));
    assert_eq!(p.edge, p.probability_over - 0.5);
    assert_eq!(p.confidence_tier, 1);
    assert_eq!(p.recommended_side, Side::Under);
}

#[test]
fn predict_player_uses_ratings_and_reports_unknowns() {
    let player = PlayerLine {
        player: "Derke".into(),
        team: "Fnatic".into(),
        position: Some("Raze".into()),
        line: 25.5,
        opponent: "Paper Rex".into(),
    };
    let s = samples(&[27, 24, 26, 30, 22]);
    let p = LinePredictor::default()
        .predict_player(&player, &s, &TeamRatings::default(), StrengthOverrides::default())
        .unwrap();

    assert_eq!(p.position, Position::Duelist);
    assert!(close(p.strength_ratio, 1.0 / 1.10));
    assert_eq!(
        p.warnings,
        vec![DataWarning::UnknownOpponent { team: "Paper Rex".into() }]
    );
}

#[test]
fn rated_name_inside_unrated_team_is_still_unknown() {
    let player = PlayerLine {
        player: "OXY".into(),
        team: "Cloud9".into(),
        position: Some("Duelist".into()),
        line: 19.5,
        opponent: "Paper Rex".into(),
    };
    let p = LinePredictor::default()
        .predict_player(&player, &samples(&[20, 18, 22]), &TeamRatings::default(), StrengthOverrides::default())
        .unwrap();
    assert!(close(p.strength_ratio, 1.0));
    assert_eq!(
        p.warnings,
        vec![
            DataWarning::UnknownTeam { team: "Cloud9".into() },
            DataWarning::UnknownOpponent { team: "Paper Rex".into() },
        ]
    );
}

#[test]
fn max_tier_outside_output_range_is_rejected() {
    for max_tier in [0u8, 4] {
        let cfg = ModelConfig { max_tier, ..ModelConfig::default() };
        assert!(LinePredictor::new(cfg).is_err());
    }
    let cfg = ModelConfig { max_tier: 2, ..ModelConfig::default() };
    let p = LinePredictor::new(cfg)
        .unwrap()
        .predict(&input(10.5, Position::Duelist, &samples(&[30, 31, 29, 30, 30]), 1.0, 1.0))
        .unwrap();
    assert_eq!(p.confidence_tier, 2);
}

#[test]
fn explicit_strengths_beat_the_table() {
    let player = PlayerLine {
        player: "Jawgemo".into(),
        team: "Team Liquid".into(),
        position: Some("Duelist".into()),
        line: 20.0,
        opponent: "Fnatic".into(),
    };
    let s = samples(&[20, 22]);
    let overrides = StrengthOverrides { team: Some(2.0), opponent: Some(1.0) };
    let p = LinePredictor::default()
        .predict_player(&player, &s, &TeamRatings::default(), overrides)
        .unwrap();
    assert!(close(p.strength_ratio, 0.5));
    assert!(p.warnings.is_empty());
}

#[test]
fn malformed_position_fails_fast() {
    let player = PlayerLine {
        player: "Boaster".into(),
        team: "Fnatic".into(),
        position: Some("Contr\u{7}oller".into()),
        line: 15.5,
        opponent: "Team Liquid".into(),
    };
    let err = LinePredictor::default()
        .predict_player(&player, &[], &TeamRatings::default(), StrengthOverrides::default())
        .unwrap_err();
    assert!(matches!(err, PredictionError::MalformedPosition { .. }));
}

#[test]
fn alternative_tier_scale_changes_only_the_tier() {
    let s = samples(&[21, 22, 20, 23, 21, 22]);
    let base = LinePredictor::default()
        .predict(&input(21.0, Position::Initiator, &s, 1.0, 1.0))
        .unwrap();
    let cfg = ModelConfig { tier_scale: 10.0, ..ModelConfig::default() };
    let alt = LinePredictor::new(cfg)
        .unwrap()
        .predict(&input(21.0, Position::Initiator, &s, 1.0, 1.0))
        .unwrap();

    assert_eq!(base.probability_over, alt.probability_over);
    assert_eq!(base.recommended_side, alt.recommended_side);
    assert!(alt.confidence_tier <= base.confidence_tier);
}
