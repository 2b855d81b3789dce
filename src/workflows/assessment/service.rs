use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use chrono::Utc;

use super::bundle::BundleError;
use super::calculation::{self, CalculationError};
use super::domain::{
    AssessmentKey, AssessmentRecord, AssessmentValue, Bundle, BundleId, EvaluationRecord, Facility,
    FacilityId, IndicatorId, Period, ScoreLevel, UserId, UserRole, ValidationError,
    VerificationDecision, VerificationKey, VerificationRecord, VerificationStatus,
};
use super::repository::{
    AssessmentRepository, BundleRepository, EvaluationRepository, FacilityRepository,
    RepositoryError, VerificationRepository,
};
use super::views::{
    BundleSummaryView, FacilityStatsView, ProgressView, ReviewerStatsView, ScoreDistributionEntry,
    VerificationView,
};

/// Service facade composing the bundle aggregate, calculation engine, and the
/// record repositories behind the HTTP router and CLI.
pub struct MonitorService<B, F, A, E, V> {
    bundles: Arc<B>,
    facilities: Arc<F>,
    assessments: Arc<A>,
    evaluations: Arc<E>,
    verifications: Arc<V>,
}

static BUNDLE_SEQUENCE: AtomicU64 = AtomicU64::new(1);

fn next_bundle_id() -> BundleId {
    BundleId(BUNDLE_SEQUENCE.fetch_add(1, Ordering::Relaxed))
}

/// A submitted assessment value before derivation.
#[derive(Debug, Clone)]
pub struct AssessmentSubmission {
    pub facility_id: FacilityId,
    pub bundle_id: BundleId,
    pub indicator_id: IndicatorId,
    pub period: Period,
    pub value: AssessmentValue,
}

impl<B, F, A, E, V> MonitorService<B, F, A, E, V>
where
    B: BundleRepository + 'static,
    F: FacilityRepository + 'static,
    A: AssessmentRepository + 'static,
    E: EvaluationRepository + 'static,
    V: VerificationRepository + 'static,
{
    pub fn new(
        bundles: Arc<B>,
        facilities: Arc<F>,
        assessments: Arc<A>,
        evaluations: Arc<E>,
        verifications: Arc<V>,
    ) -> Self {
        Self {
            bundles,
            facilities,
            assessments,
            evaluations,
            verifications,
        }
    }

    /// Create a draft bundle for a year. One bundle per year; the repository
    /// reports a conflict on duplicates.
    pub fn create_bundle(
        &self,
        year: i32,
        title: impl Into<String>,
        description: impl Into<String>,
    ) -> Result<Bundle, ServiceError> {
        let mut bundle = Bundle::new(next_bundle_id(), year, title);
        bundle.description = description.into();
        let stored = self.bundles.insert(bundle)?;
        Ok(stored)
    }

    /// Persist a draft bundle as one aggregate after validating every indicator.
    pub fn save_bundle(&self, bundle: Bundle) -> Result<(), ServiceError> {
        bundle.validate()?;
        self.bundles.update(bundle)?;
        Ok(())
    }

    pub fn bundle(&self, id: BundleId) -> Result<Bundle, ServiceError> {
        self.bundles
            .fetch(id)?
            .ok_or(ServiceError::BundleNotFound(id))
    }

    pub fn bundle_summaries(&self) -> Result<Vec<BundleSummaryView>, ServiceError> {
        let bundles = self.bundles.all()?;
        Ok(bundles
            .iter()
            .map(|bundle| BundleSummaryView {
                id: bundle.id.0,
                year: bundle.year,
                title: bundle.title.clone(),
                status: bundle.status,
                status_label: bundle.status.label(),
                cluster_count: bundle.cluster_count(),
                indicator_count: bundle.indicator_count(),
            })
            .collect())
    }

    pub fn active_bundle(&self) -> Result<Option<Bundle>, ServiceError> {
        Ok(self.bundles.active()?)
    }

    /// Activate a bundle, retiring whichever bundle was active before.
    ///
    /// The repository applies the demotion and promotion atomically, so even
    /// racing activations leave exactly one active bundle.
    pub fn activate_bundle(&self, id: BundleId) -> Result<Bundle, ServiceError> {
        self.bundles.activate(id).map_err(|err| match err {
            RepositoryError::NotFound => ServiceError::BundleNotFound(id),
            other => ServiceError::Repository(other),
        })
    }

    pub fn facility(&self, id: FacilityId) -> Result<Facility, ServiceError> {
        self.facilities
            .fetch(id)?
            .ok_or(ServiceError::FacilityNotFound(id))
    }

    /// Submit or revise one assessment value and derive its percentage.
    ///
    /// Revision is the same transition executed again; the record for the key
    /// is simply overwritten.
    pub fn submit_assessment(
        &self,
        submission: AssessmentSubmission,
    ) -> Result<AssessmentRecord, ServiceError> {
        self.facility(submission.facility_id)?;
        let bundle = self.bundle(submission.bundle_id)?;
        let indicator = bundle
            .find_indicator(submission.indicator_id)
            .ok_or(ServiceError::IndicatorNotFound(submission.indicator_id))?;

        let calculated_percentage =
            calculation::record_percentage(&indicator.detail, &submission.value)?;

        let record = AssessmentRecord {
            key: AssessmentKey {
                facility_id: submission.facility_id,
                bundle_id: submission.bundle_id,
                indicator_id: submission.indicator_id,
                period: submission.period,
            },
            value: submission.value,
            calculated_percentage,
        };

        let stored = self.assessments.upsert(record)?;
        Ok(stored)
    }

    /// Filling progress for one facility, bundle, and period.
    pub fn progress(
        &self,
        facility_id: FacilityId,
        bundle_id: BundleId,
        period: Period,
    ) -> Result<ProgressView, ServiceError> {
        let bundle = self.bundle(bundle_id)?;
        let total = bundle.indicator_count();
        let records = self.assessments.for_submission(facility_id, bundle_id)?;
        let filled = records
            .iter()
            .filter(|record| record.key.period == period)
            .count();

        let percentage = if total == 0 {
            0.0
        } else {
            filled as f64 / total as f64 * 100.0
        };

        Ok(ProgressView {
            filled_indicators: filled,
            total_indicators: total,
            percentage,
        })
    }

    /// Dashboard numbers for a facility. Filling is scoped to the requested
    /// period; completed evaluations count across the whole bundle cycle.
    pub fn facility_stats(
        &self,
        facility_id: FacilityId,
        bundle_id: BundleId,
        period: Period,
    ) -> Result<FacilityStatsView, ServiceError> {
        let bundle = self.bundle(bundle_id)?;
        let total = bundle.indicator_count();
        let filled = self
            .assessments
            .for_submission(facility_id, bundle_id)?
            .iter()
            .filter(|record| record.key.period == period)
            .count();
        let completed_evaluations = self
            .evaluations
            .for_submission(facility_id, bundle_id)?
            .iter()
            .filter(|record| record.is_complete())
            .count();

        let progress = if total == 0 {
            0
        } else {
            (filled as f64 / total as f64 * 100.0).round() as u8
        };

        Ok(FacilityStatsView {
            total_indicators: total,
            filled_indicators: filled,
            completed_evaluations,
            progress,
        })
    }

    /// How submitted rubric scores spread across the four levels for a period.
    pub fn score_distribution(
        &self,
        facility_id: FacilityId,
        bundle_id: BundleId,
        period: Period,
    ) -> Result<Vec<ScoreDistributionEntry>, ServiceError> {
        let records = self.assessments.for_submission(facility_id, bundle_id)?;
        Ok(ScoreLevel::ordered()
            .into_iter()
            .map(|level| ScoreDistributionEntry {
                level,
                points: level.points(),
                count: records
                    .iter()
                    .filter(|record| {
                        record.key.period == period
                            && record.value == AssessmentValue::Score(level)
                    })
                    .count(),
            })
            .collect())
    }

    /// Autosave one evaluation in whatever state it is in; completeness is only
    /// enforced at the explicit save.
    pub fn stash_evaluation(
        &self,
        record: EvaluationRecord,
    ) -> Result<EvaluationRecord, ServiceError> {
        Ok(self.evaluations.upsert(record)?)
    }

    /// Explicitly save a quarterly evaluation, rejecting incomplete narratives.
    pub fn save_evaluation(
        &self,
        record: EvaluationRecord,
    ) -> Result<EvaluationRecord, ServiceError> {
        if !record.is_complete() {
            return Err(ValidationError::IncompleteEvaluation.into());
        }
        Ok(self.evaluations.upsert(record)?)
    }

    pub fn evaluations(
        &self,
        facility_id: FacilityId,
        bundle_id: BundleId,
    ) -> Result<Vec<EvaluationRecord>, ServiceError> {
        Ok(self.evaluations.for_submission(facility_id, bundle_id)?)
    }

    /// Record a reviewer verdict. Leaving pending requires a comment, and a
    /// later verdict simply overwrites the previous one.
    pub fn verify(
        &self,
        reviewer: UserId,
        role: UserRole,
        key: VerificationKey,
        decision: VerificationDecision,
        comment: impl Into<String>,
    ) -> Result<VerificationRecord, ServiceError> {
        if role != UserRole::Reviewer {
            return Err(ServiceError::ReviewerRequired);
        }
        let comment = comment.into();
        if comment.trim().is_empty() {
            return Err(ValidationError::EmptyVerificationComment.into());
        }

        let record = VerificationRecord {
            key,
            status: decision.status(),
            comment,
            verified_by: Some(reviewer),
            verified_at: Some(Utc::now()),
        };
        let stored = self.verifications.upsert(record)?;
        Ok(stored)
    }

    pub fn verification(
        &self,
        key: &VerificationKey,
    ) -> Result<Option<VerificationRecord>, ServiceError> {
        Ok(self.verifications.fetch(key)?)
    }

    pub fn verification_views(
        &self,
        bundle_id: BundleId,
    ) -> Result<Vec<VerificationView>, ServiceError> {
        let records = self.verifications.for_bundle(bundle_id)?;
        Ok(records
            .iter()
            .map(|record| VerificationView {
                facility_id: record.key.facility_id.0,
                bundle_id: record.key.bundle_id.0,
                period: record.key.period.storage_key(),
                status: record.status,
                status_label: record.status.label(),
                comment: record.comment.clone(),
            })
            .collect())
    }

    /// Dashboard numbers for the reviewer role.
    pub fn reviewer_stats(&self, bundle_id: BundleId) -> Result<ReviewerStatsView, ServiceError> {
        let total_facilities = self.facilities.all()?.len();
        let records = self.verifications.for_bundle(bundle_id)?;

        let count_status = |status: VerificationStatus| {
            records
                .iter()
                .filter(|record| record.status == status)
                .count()
        };

        Ok(ReviewerStatsView {
            total_facilities,
            pending_verifications: count_status(VerificationStatus::Pending),
            approved_verifications: count_status(VerificationStatus::Approved),
            revision_verifications: count_status(VerificationStatus::Revision),
        })
    }
}

/// Error raised by the monitoring service.
#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    Calculation(#[from] CalculationError),
    #[error(transparent)]
    Bundle(#[from] BundleError),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
    #[error("facility {0:?} not found")]
    FacilityNotFound(FacilityId),
    #[error("bundle {0:?} not found")]
    BundleNotFound(BundleId),
    #[error("indicator {0:?} not found in bundle")]
    IndicatorNotFound(IndicatorId),
    #[error("only the dinkes reviewer role may record verification verdicts")]
    ReviewerRequired,
}
