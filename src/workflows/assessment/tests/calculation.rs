use crate::workflows::assessment::{
    achievement_to_percentage, period_quota, record_percentage, score_level_from_points,
    score_to_percentage, AssessmentValue, CalculationError, IndicatorDetail, Periodicity,
    ScoreLevel, ScoringRubric, TargetProfile,
};

fn annual_profile(target_percentage: u8, total_sasaran: u32) -> TargetProfile {
    TargetProfile {
        target_percentage,
        total_sasaran,
        unit: "kegiatan".to_string(),
        periodicity: Periodicity::Annual,
    }
}

#[test]
fn score_levels_map_onto_fixed_percentages() {
    let expected = [
        (ScoreLevel::Zero, 0.0),
        (ScoreLevel::Four, 40.0),
        (ScoreLevel::Seven, 70.0),
        (ScoreLevel::Ten, 100.0),
    ];
    for (level, percentage) in expected {
        assert_eq!(score_to_percentage(level), percentage);
    }

    let percentages: Vec<f64> = ScoreLevel::ordered()
        .into_iter()
        .map(score_to_percentage)
        .collect();
    assert!(
        percentages.windows(2).all(|pair| pair[0] < pair[1]),
        "percentage must grow with the score level"
    );
}

#[test]
fn raw_scores_outside_the_rubric_are_rejected() {
    for raw in [0u8, 4, 7, 10] {
        let level = score_level_from_points(raw).expect("canonical level accepted");
        assert_eq!(level.points(), raw);
    }
    for raw in [1u8, 5, 9, 11, 100] {
        assert_eq!(
            score_level_from_points(raw),
            Err(CalculationError::InvalidScore(raw))
        );
    }
}

#[test]
fn annual_quota_splits_the_cohort_across_quarters() {
    // 90% of 150 = 135 per year, 33.75 per quarter, rounded half-up.
    assert_eq!(period_quota(&annual_profile(90, 150)), 34);
}

#[test]
fn monthly_quota_triples_the_monthly_target() {
    // 85% of 50 = 42.5 per month, 127.5 per quarter; half-up picks 128.
    let profile = TargetProfile {
        target_percentage: 85,
        total_sasaran: 50,
        unit: "orang".to_string(),
        periodicity: Periodicity::Monthly,
    };
    assert_eq!(period_quota(&profile), 128);
}

#[test]
fn achievement_percentage_is_clamped() {
    assert_eq!(achievement_to_percentage(0, 34), 0.0);
    assert_eq!(achievement_to_percentage(17, 34), 50.0);
    assert_eq!(achievement_to_percentage(34, 34), 100.0);
    assert_eq!(achievement_to_percentage(60, 34), 100.0);
}

#[test]
fn zero_quota_counts_as_met() {
    assert_eq!(period_quota(&annual_profile(0, 100)), 0);
    // 1% of 100 = 0.25 per quarter rounds down to a zero quota as well.
    assert_eq!(period_quota(&annual_profile(1, 100)), 0);
    assert_eq!(achievement_to_percentage(0, 0), 100.0);
    assert_eq!(achievement_to_percentage(5, 0), 100.0);
}

#[test]
fn record_percentage_normalizes_both_variants() {
    let scoring = IndicatorDetail::Scoring(ScoringRubric::default());
    let target = IndicatorDetail::TargetAchievement(annual_profile(90, 150));

    let score = record_percentage(&scoring, &AssessmentValue::Score(ScoreLevel::Seven))
        .expect("score normalizes");
    assert_eq!(score, 70.0);

    let achievement = record_percentage(&target, &AssessmentValue::Achievement(17))
        .expect("achievement normalizes");
    assert_eq!(achievement, 50.0);
}

#[test]
fn record_percentage_rejects_variant_mismatch() {
    let scoring = IndicatorDetail::Scoring(ScoringRubric::default());
    let target = IndicatorDetail::TargetAchievement(annual_profile(90, 150));

    assert!(matches!(
        record_percentage(&scoring, &AssessmentValue::Achievement(10)),
        Err(CalculationError::ValueVariantMismatch { .. })
    ));
    assert!(matches!(
        record_percentage(&target, &AssessmentValue::Score(ScoreLevel::Ten)),
        Err(CalculationError::ValueVariantMismatch { .. })
    ));
}
