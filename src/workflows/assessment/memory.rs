//! In-memory repository implementations backing the demo binary and tests.
//!
//! The hosted database sits behind the repository traits; these stand-ins
//! honor the same unique keys and upsert semantics under a process-local lock.

use std::collections::HashMap;
use std::sync::Mutex;

use super::domain::{
    AssessmentKey, AssessmentRecord, Bundle, BundleId, BundleStatus, EvaluationKey,
    EvaluationRecord, Facility, FacilityId, VerificationKey, VerificationRecord,
};
use super::repository::{
    AssessmentRepository, BundleRepository, EvaluationRepository, FacilityRepository,
    RepositoryError, VerificationRepository,
};

#[derive(Default)]
pub struct InMemoryBundles {
    bundles: Mutex<HashMap<BundleId, Bundle>>,
}

impl BundleRepository for InMemoryBundles {
    fn insert(&self, bundle: Bundle) -> Result<Bundle, RepositoryError> {
        let mut guard = self.bundles.lock().expect("bundle store poisoned");
        if guard.contains_key(&bundle.id) {
            return Err(RepositoryError::Conflict);
        }
        // One bundle per assessment year.
        if guard.values().any(|existing| existing.year == bundle.year) {
            return Err(RepositoryError::Conflict);
        }
        guard.insert(bundle.id, bundle.clone());
        Ok(bundle)
    }

    fn update(&self, bundle: Bundle) -> Result<(), RepositoryError> {
        let mut guard = self.bundles.lock().expect("bundle store poisoned");
        if !guard.contains_key(&bundle.id) {
            return Err(RepositoryError::NotFound);
        }
        guard.insert(bundle.id, bundle);
        Ok(())
    }

    fn fetch(&self, id: BundleId) -> Result<Option<Bundle>, RepositoryError> {
        let guard = self.bundles.lock().expect("bundle store poisoned");
        Ok(guard.get(&id).cloned())
    }

    fn all(&self) -> Result<Vec<Bundle>, RepositoryError> {
        let guard = self.bundles.lock().expect("bundle store poisoned");
        let mut bundles: Vec<Bundle> = guard.values().cloned().collect();
        bundles.sort_by(|a, b| b.year.cmp(&a.year));
        Ok(bundles)
    }

    fn active(&self) -> Result<Option<Bundle>, RepositoryError> {
        let guard = self.bundles.lock().expect("bundle store poisoned");
        Ok(guard
            .values()
            .find(|bundle| bundle.status == BundleStatus::Active)
            .cloned())
    }

    // Demote and promote under one guard; the hosted backend gets the same
    // effect from a single transaction.
    fn activate(&self, id: BundleId) -> Result<Bundle, RepositoryError> {
        let mut guard = self.bundles.lock().expect("bundle store poisoned");
        if !guard.contains_key(&id) {
            return Err(RepositoryError::NotFound);
        }

        for bundle in guard.values_mut() {
            if bundle.id != id && bundle.status == BundleStatus::Active {
                bundle.status = BundleStatus::Completed;
            }
        }

        let target = guard.get_mut(&id).ok_or(RepositoryError::NotFound)?;
        target.status = BundleStatus::Active;
        Ok(target.clone())
    }
}

pub struct InMemoryFacilities {
    facilities: Vec<Facility>,
}

impl InMemoryFacilities {
    pub fn with_seed(facilities: Vec<Facility>) -> Self {
        Self { facilities }
    }
}

impl FacilityRepository for InMemoryFacilities {
    fn fetch(&self, id: FacilityId) -> Result<Option<Facility>, RepositoryError> {
        Ok(self
            .facilities
            .iter()
            .find(|facility| facility.id == id)
            .cloned())
    }

    fn all(&self) -> Result<Vec<Facility>, RepositoryError> {
        Ok(self.facilities.clone())
    }
}

#[derive(Default)]
pub struct InMemoryAssessments {
    records: Mutex<HashMap<AssessmentKey, AssessmentRecord>>,
}

impl AssessmentRepository for InMemoryAssessments {
    fn upsert(&self, record: AssessmentRecord) -> Result<AssessmentRecord, RepositoryError> {
        let mut guard = self.records.lock().expect("assessment store poisoned");
        guard.insert(record.key, record.clone());
        Ok(record)
    }

    fn fetch(&self, key: &AssessmentKey) -> Result<Option<AssessmentRecord>, RepositoryError> {
        let guard = self.records.lock().expect("assessment store poisoned");
        Ok(guard.get(key).cloned())
    }

    fn for_submission(
        &self,
        facility_id: FacilityId,
        bundle_id: BundleId,
    ) -> Result<Vec<AssessmentRecord>, RepositoryError> {
        let guard = self.records.lock().expect("assessment store poisoned");
        Ok(guard
            .values()
            .filter(|record| {
                record.key.facility_id == facility_id && record.key.bundle_id == bundle_id
            })
            .cloned()
            .collect())
    }
}

#[derive(Default)]
pub struct InMemoryEvaluations {
    records: Mutex<HashMap<EvaluationKey, EvaluationRecord>>,
}

impl EvaluationRepository for InMemoryEvaluations {
    fn upsert(&self, record: EvaluationRecord) -> Result<EvaluationRecord, RepositoryError> {
        let mut guard = self.records.lock().expect("evaluation store poisoned");
        guard.insert(record.key, record.clone());
        Ok(record)
    }

    fn fetch(&self, key: &EvaluationKey) -> Result<Option<EvaluationRecord>, RepositoryError> {
        let guard = self.records.lock().expect("evaluation store poisoned");
        Ok(guard.get(key).cloned())
    }

    fn for_submission(
        &self,
        facility_id: FacilityId,
        bundle_id: BundleId,
    ) -> Result<Vec<EvaluationRecord>, RepositoryError> {
        let guard = self.records.lock().expect("evaluation store poisoned");
        let mut records: Vec<EvaluationRecord> = guard
            .values()
            .filter(|record| {
                record.key.facility_id == facility_id && record.key.bundle_id == bundle_id
            })
            .cloned()
            .collect();
        records.sort_by_key(|record| record.key.quarter);
        Ok(records)
    }
}

#[derive(Default)]
pub struct InMemoryVerifications {
    records: Mutex<HashMap<VerificationKey, VerificationRecord>>,
}

impl VerificationRepository for InMemoryVerifications {
    fn upsert(&self, record: VerificationRecord) -> Result<VerificationRecord, RepositoryError> {
        let mut guard = self.records.lock().expect("verification store poisoned");
        guard.insert(record.key, record.clone());
        Ok(record)
    }

    fn fetch(&self, key: &VerificationKey) -> Result<Option<VerificationRecord>, RepositoryError> {
        let guard = self.records.lock().expect("verification store poisoned");
        Ok(guard.get(key).cloned())
    }

    fn for_bundle(&self, bundle_id: BundleId) -> Result<Vec<VerificationRecord>, RepositoryError> {
        let guard = self.records.lock().expect("verification store poisoned");
        Ok(guard
            .values()
            .filter(|record| record.key.bundle_id == bundle_id)
            .cloned()
            .collect())
    }
}
