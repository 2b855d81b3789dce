use super::domain::{
    AssessmentKey, AssessmentRecord, Bundle, BundleId, EvaluationKey, EvaluationRecord, Facility,
    FacilityId, VerificationKey, VerificationRecord,
};

/// Error enumeration for repository failures.
///
/// `Unavailable` carries the backend message verbatim; callers surface it
/// without retrying.
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("record already exists")]
    Conflict,
    #[error("record not found")]
    NotFound,
    #[error("repository unavailable: {0}")]
    Unavailable(String),
}

/// Storage abstraction for bundles so services can be exercised in isolation.
///
/// `update` replaces the whole aggregate, keeping bundle saves all-or-nothing.
/// `activate` demotes whichever bundle was active and promotes the target as
/// one atomic step, so concurrent activations cannot interleave and leave two
/// active bundles.
pub trait BundleRepository: Send + Sync {
    fn insert(&self, bundle: Bundle) -> Result<Bundle, RepositoryError>;
    fn update(&self, bundle: Bundle) -> Result<(), RepositoryError>;
    fn fetch(&self, id: BundleId) -> Result<Option<Bundle>, RepositoryError>;
    fn all(&self) -> Result<Vec<Bundle>, RepositoryError>;
    fn active(&self) -> Result<Option<Bundle>, RepositoryError>;
    fn activate(&self, id: BundleId) -> Result<Bundle, RepositoryError>;
}

pub trait FacilityRepository: Send + Sync {
    fn fetch(&self, id: FacilityId) -> Result<Option<Facility>, RepositoryError>;
    fn all(&self) -> Result<Vec<Facility>, RepositoryError>;
}

/// Assessment records, uniquely keyed by (facility, bundle, indicator, period).
pub trait AssessmentRepository: Send + Sync {
    fn upsert(&self, record: AssessmentRecord) -> Result<AssessmentRecord, RepositoryError>;
    fn fetch(&self, key: &AssessmentKey) -> Result<Option<AssessmentRecord>, RepositoryError>;
    fn for_submission(
        &self,
        facility_id: FacilityId,
        bundle_id: BundleId,
    ) -> Result<Vec<AssessmentRecord>, RepositoryError>;
}

/// Evaluation records, uniquely keyed by (facility, bundle, quarter, year).
pub trait EvaluationRepository: Send + Sync {
    fn upsert(&self, record: EvaluationRecord) -> Result<EvaluationRecord, RepositoryError>;
    fn fetch(&self, key: &EvaluationKey) -> Result<Option<EvaluationRecord>, RepositoryError>;
    fn for_submission(
        &self,
        facility_id: FacilityId,
        bundle_id: BundleId,
    ) -> Result<Vec<EvaluationRecord>, RepositoryError>;
}

/// Verification records, uniquely keyed by (facility, bundle, period).
pub trait VerificationRepository: Send + Sync {
    fn upsert(&self, record: VerificationRecord) -> Result<VerificationRecord, RepositoryError>;
    fn fetch(&self, key: &VerificationKey) -> Result<Option<VerificationRecord>, RepositoryError>;
    fn for_bundle(&self, bundle_id: BundleId) -> Result<Vec<VerificationRecord>, RepositoryError>;
}
