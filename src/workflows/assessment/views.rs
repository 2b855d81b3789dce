//! Serializable summaries consumed by dashboards and API responses.

use serde::Serialize;

use super::domain::{BundleStatus, ScoreLevel, VerificationStatus};

/// Filling progress for one facility, bundle, and period.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProgressView {
    pub filled_indicators: usize,
    pub total_indicators: usize,
    pub percentage: f64,
}

impl ProgressView {
    pub fn is_complete(&self) -> bool {
        self.total_indicators > 0 && self.filled_indicators == self.total_indicators
    }
}

/// Dashboard headline numbers for a facility.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FacilityStatsView {
    pub total_indicators: usize,
    pub filled_indicators: usize,
    pub completed_evaluations: usize,
    pub progress: u8,
}

/// How many scoring submissions landed on each rubric level.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScoreDistributionEntry {
    pub level: ScoreLevel,
    pub points: u8,
    pub count: usize,
}

/// Dashboard headline numbers for the reviewer role.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReviewerStatsView {
    pub total_facilities: usize,
    pub pending_verifications: usize,
    pub approved_verifications: usize,
    pub revision_verifications: usize,
}

/// Bundle header with derived counts, as listed in the admin dashboard.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BundleSummaryView {
    pub id: u64,
    pub year: i32,
    pub title: String,
    pub status: BundleStatus,
    pub status_label: &'static str,
    pub cluster_count: usize,
    pub indicator_count: usize,
}

/// Verification row for the reviewer panel.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VerificationView {
    pub facility_id: u64,
    pub bundle_id: u64,
    pub period: String,
    pub status: VerificationStatus,
    pub status_label: &'static str,
    pub comment: String,
}
