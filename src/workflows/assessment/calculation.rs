//! Pure scoring and target-achievement arithmetic.
//!
//! These functions are the only path by which both indicator variants land on
//! a shared 0-100 percentage scale, so dashboards can aggregate them together.

use super::domain::{
    AssessmentValue, IndicatorDetail, IndicatorKind, Periodicity, ScoreLevel, TargetProfile,
};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CalculationError {
    #[error("score {0} is not one of the accepted levels 0, 4, 7, 10")]
    InvalidScore(u8),
    #[error("submitted value does not match the indicator, expected a {expected} value")]
    ValueVariantMismatch { expected: &'static str },
}

/// Resolve a raw submitted score against the four-level rubric.
///
/// Out-of-set values are rejected outright rather than clamped to the nearest
/// level.
pub fn score_level_from_points(raw: u8) -> Result<ScoreLevel, CalculationError> {
    ScoreLevel::from_points(raw).ok_or(CalculationError::InvalidScore(raw))
}

/// Normalize a rubric score onto the 0-100 scale: 0, 40, 70, or 100.
pub fn score_to_percentage(level: ScoreLevel) -> f64 {
    f64::from(level.points()) * 10.0
}

/// Derive the quarterly target count for a target-achievement indicator.
///
/// Annual cohorts are split evenly across four quarters; monthly targets are
/// tripled into a quarterly quota. The intermediate real value is rounded
/// half-up (127.5 becomes 128), uniformly for both periodicities.
pub fn period_quota(profile: &TargetProfile) -> u32 {
    let annual_target =
        f64::from(profile.target_percentage) / 100.0 * f64::from(profile.total_sasaran);
    let quarterly = match profile.periodicity {
        Periodicity::Annual => annual_target / 4.0,
        Periodicity::Monthly => annual_target * 3.0,
    };
    round_half_up(quarterly)
}

/// Normalize an actual achievement count against its quota, capped to [0, 100].
///
/// A zero quota arises from a zero target percentage or from a quarterly
/// share below one half, which rounds down; either way any achievement
/// trivially meets it.
pub fn achievement_to_percentage(actual: u32, quota: u32) -> f64 {
    if quota == 0 {
        return 100.0;
    }
    (f64::from(actual) / f64::from(quota) * 100.0).clamp(0.0, 100.0)
}

/// Derive the stored percentage for a submission against its indicator.
///
/// The value variant must match the indicator variant; a mismatch is a
/// submission error, not something to coerce.
pub fn record_percentage(
    detail: &IndicatorDetail,
    value: &AssessmentValue,
) -> Result<f64, CalculationError> {
    match (detail, value) {
        (IndicatorDetail::Scoring(_), AssessmentValue::Score(level)) => {
            Ok(score_to_percentage(*level))
        }
        (IndicatorDetail::TargetAchievement(profile), AssessmentValue::Achievement(actual)) => {
            Ok(achievement_to_percentage(*actual, period_quota(profile)))
        }
        (IndicatorDetail::Scoring(_), AssessmentValue::Achievement(_)) => {
            Err(CalculationError::ValueVariantMismatch {
                expected: IndicatorKind::Scoring.label(),
            })
        }
        (IndicatorDetail::TargetAchievement(_), AssessmentValue::Score(_)) => {
            Err(CalculationError::ValueVariantMismatch {
                expected: IndicatorKind::TargetAchievement.label(),
            })
        }
    }
}

fn round_half_up(value: f64) -> u32 {
    (value + 0.5).floor() as u32
}
