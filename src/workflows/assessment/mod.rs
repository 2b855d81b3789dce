//! Puskesmas performance assessment workflow.
//!
//! A dinkes admin authors a yearly bundle of clusters and indicators, each
//! facility submits assessment values against the active bundle per quarter,
//! the calculation engine normalizes both indicator variants onto a 0-100
//! scale, and the reviewer records verification verdicts per submission.

pub mod bundle;
pub mod calculation;
pub mod domain;
pub mod memory;
pub mod repository;
pub mod router;
pub mod service;
pub mod views;

#[cfg(test)]
mod tests;

pub use bundle::BundleError;
pub use calculation::{
    achievement_to_percentage, period_quota, record_percentage, score_level_from_points,
    score_to_percentage, CalculationError,
};
pub use domain::{
    AssessmentKey, AssessmentRecord, AssessmentValue, Bundle, BundleId, BundleStatus, Cluster,
    ClusterId, EvaluationKey, EvaluationRecord, Facility, FacilityId, Indicator, IndicatorAction,
    IndicatorDetail, IndicatorId, IndicatorKind, Period, Periodicity, Quarter, ScoreLevel,
    ScoringRubric, TargetProfile, UserId, UserRole, ValidationError, VerificationDecision,
    VerificationKey, VerificationRecord, VerificationStatus,
};
pub use repository::{
    AssessmentRepository, BundleRepository, EvaluationRepository, FacilityRepository,
    RepositoryError, VerificationRepository,
};
pub use router::assessment_router;
pub use service::{AssessmentSubmission, MonitorService, ServiceError};
pub use views::{
    BundleSummaryView, FacilityStatsView, ProgressView, ReviewerStatsView, ScoreDistributionEntry,
    VerificationView,
};
