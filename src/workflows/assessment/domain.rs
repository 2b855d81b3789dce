use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Identifier wrapper for assessment bundles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BundleId(pub u64);

/// Identifier wrapper for clusters within a bundle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ClusterId(pub u64);

/// Identifier wrapper for indicators within a cluster.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct IndicatorId(pub u64);

/// Identifier wrapper for assessed facilities (puskesmas).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FacilityId(pub u64);

/// Identifier wrapper for authenticated users.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct UserId(pub String);

/// Role handed to the core by the auth boundary; never re-derived here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UserRole {
    Facility,
    Reviewer,
}

impl UserRole {
    pub const fn label(self) -> &'static str {
        match self {
            UserRole::Facility => "puskesmas",
            UserRole::Reviewer => "dinkes",
        }
    }
}

/// Lifecycle status of an assessment bundle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BundleStatus {
    Draft,
    Active,
    Completed,
}

impl BundleStatus {
    pub const fn label(self) -> &'static str {
        match self {
            BundleStatus::Draft => "draft",
            BundleStatus::Active => "active",
            BundleStatus::Completed => "completed",
        }
    }
}

/// The four canonical score levels a scoring indicator accepts.
///
/// Any other raw value is rejected during submission rather than clamped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScoreLevel {
    Zero,
    Four,
    Seven,
    Ten,
}

impl ScoreLevel {
    pub const fn ordered() -> [Self; 4] {
        [Self::Zero, Self::Four, Self::Seven, Self::Ten]
    }

    pub const fn points(self) -> u8 {
        match self {
            ScoreLevel::Zero => 0,
            ScoreLevel::Four => 4,
            ScoreLevel::Seven => 7,
            ScoreLevel::Ten => 10,
        }
    }

    pub const fn from_points(points: u8) -> Option<Self> {
        match points {
            0 => Some(Self::Zero),
            4 => Some(Self::Four),
            7 => Some(Self::Seven),
            10 => Some(Self::Ten),
            _ => None,
        }
    }
}

/// Rubric text for each of the four score levels.
///
/// All four levels exist by construction; empty descriptions are permitted
/// while a bundle is being authored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoringRubric {
    pub level_0: String,
    pub level_4: String,
    pub level_7: String,
    pub level_10: String,
}

impl ScoringRubric {
    pub fn description(&self, level: ScoreLevel) -> &str {
        match level {
            ScoreLevel::Zero => &self.level_0,
            ScoreLevel::Four => &self.level_4,
            ScoreLevel::Seven => &self.level_7,
            ScoreLevel::Ten => &self.level_10,
        }
    }

    pub fn set_description(&mut self, level: ScoreLevel, text: String) {
        match level {
            ScoreLevel::Zero => self.level_0 = text,
            ScoreLevel::Four => self.level_4 = text,
            ScoreLevel::Seven => self.level_7 = text,
            ScoreLevel::Ten => self.level_10 = text,
        }
    }
}

/// Reporting cadence of a target-achievement indicator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Periodicity {
    Annual,
    Monthly,
}

impl Periodicity {
    pub const fn label(self) -> &'static str {
        match self {
            Periodicity::Annual => "annual",
            Periodicity::Monthly => "monthly",
        }
    }
}

/// Target configuration for a target-achievement indicator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TargetProfile {
    pub target_percentage: u8,
    pub total_sasaran: u32,
    pub unit: String,
    pub periodicity: Periodicity,
}

impl Default for TargetProfile {
    fn default() -> Self {
        Self {
            target_percentage: 80,
            total_sasaran: 100,
            unit: "unit".to_string(),
            periodicity: Periodicity::Annual,
        }
    }
}

/// Discriminant used when switching an indicator between variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IndicatorKind {
    Scoring,
    TargetAchievement,
}

impl IndicatorKind {
    pub const fn label(self) -> &'static str {
        match self {
            IndicatorKind::Scoring => "scoring",
            IndicatorKind::TargetAchievement => "target_achievement",
        }
    }
}

/// Variant-specific payload of an indicator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum IndicatorDetail {
    Scoring(ScoringRubric),
    TargetAchievement(TargetProfile),
}

impl IndicatorDetail {
    pub const fn kind(&self) -> IndicatorKind {
        match self {
            IndicatorDetail::Scoring(_) => IndicatorKind::Scoring,
            IndicatorDetail::TargetAchievement(_) => IndicatorKind::TargetAchievement,
        }
    }

    /// Fresh variant payload with type defaults, used when switching variants.
    pub fn defaults_for(kind: IndicatorKind) -> Self {
        match kind {
            IndicatorKind::Scoring => IndicatorDetail::Scoring(ScoringRubric::default()),
            IndicatorKind::TargetAchievement => {
                IndicatorDetail::TargetAchievement(TargetProfile::default())
            }
        }
    }
}

/// A single measurable item within a cluster.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Indicator {
    pub id: IndicatorId,
    pub name: String,
    pub operational_definition: String,
    pub order: u32,
    pub detail: IndicatorDetail,
}

impl Indicator {
    pub fn new(id: IndicatorId, name: impl Into<String>, kind: IndicatorKind) -> Self {
        Self {
            id,
            name: name.into(),
            operational_definition: String::new(),
            order: 0,
            detail: IndicatorDetail::defaults_for(kind),
        }
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.name.trim().is_empty() {
            return Err(ValidationError::EmptyIndicatorName { id: self.id });
        }
        match &self.detail {
            IndicatorDetail::Scoring(_) => Ok(()),
            IndicatorDetail::TargetAchievement(profile) => {
                if profile.target_percentage > 100 {
                    return Err(ValidationError::TargetPercentageOutOfRange {
                        value: profile.target_percentage,
                    });
                }
                if profile.total_sasaran == 0 {
                    return Err(ValidationError::ZeroSasaran);
                }
                if profile.unit.trim().is_empty() {
                    return Err(ValidationError::EmptyUnit);
                }
                Ok(())
            }
        }
    }

    /// Apply one authoring action to the indicator.
    ///
    /// Switching variant keeps `{id, name, operational_definition, order}` and
    /// discards the old variant payload. Switching to the current variant is a
    /// no-op so an accidental re-select does not wipe authored rubric text.
    pub fn apply(&mut self, action: IndicatorAction) -> Result<(), ValidationError> {
        match action {
            IndicatorAction::Rename(name) => {
                self.name = name;
                Ok(())
            }
            IndicatorAction::SetDefinition(text) => {
                self.operational_definition = text;
                Ok(())
            }
            IndicatorAction::SetRubricDescription { level, text } => match &mut self.detail {
                IndicatorDetail::Scoring(rubric) => {
                    rubric.set_description(level, text);
                    Ok(())
                }
                IndicatorDetail::TargetAchievement(_) => Err(self.wrong_variant()),
            },
            IndicatorAction::SetTargetPercentage(value) => {
                self.target_profile_mut()?.target_percentage = value;
                Ok(())
            }
            IndicatorAction::SetTotalSasaran(value) => {
                self.target_profile_mut()?.total_sasaran = value;
                Ok(())
            }
            IndicatorAction::SetUnit(unit) => {
                self.target_profile_mut()?.unit = unit;
                Ok(())
            }
            IndicatorAction::SetPeriodicity(periodicity) => {
                self.target_profile_mut()?.periodicity = periodicity;
                Ok(())
            }
            IndicatorAction::SwitchVariant(kind) => {
                if self.detail.kind() != kind {
                    self.detail = IndicatorDetail::defaults_for(kind);
                }
                Ok(())
            }
        }
    }

    fn target_profile_mut(&mut self) -> Result<&mut TargetProfile, ValidationError> {
        match &mut self.detail {
            IndicatorDetail::TargetAchievement(profile) => Ok(profile),
            IndicatorDetail::Scoring(_) => Err(ValidationError::ActionVariantMismatch {
                id: self.id,
                expected: IndicatorKind::TargetAchievement.label(),
            }),
        }
    }

    fn wrong_variant(&self) -> ValidationError {
        ValidationError::ActionVariantMismatch {
            id: self.id,
            expected: IndicatorKind::Scoring.label(),
        }
    }
}

/// Authoring actions for indicators, applied through [`Indicator::apply`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IndicatorAction {
    Rename(String),
    SetDefinition(String),
    SetRubricDescription { level: ScoreLevel, text: String },
    SetTargetPercentage(u8),
    SetTotalSasaran(u32),
    SetUnit(String),
    SetPeriodicity(Periodicity),
    SwitchVariant(IndicatorKind),
}

/// A named grouping of indicators within a bundle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cluster {
    pub id: ClusterId,
    pub name: String,
    pub order: u32,
    pub indicators: Vec<Indicator>,
}

/// A yearly collection of clusters and indicators defining one assessment cycle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bundle {
    pub id: BundleId,
    pub year: i32,
    pub title: String,
    pub description: String,
    pub status: BundleStatus,
    pub clusters: Vec<Cluster>,
}

/// One quarter of the reporting year.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Quarter {
    First,
    Second,
    Third,
    Fourth,
}

impl Quarter {
    pub const fn ordered() -> [Self; 4] {
        [Self::First, Self::Second, Self::Third, Self::Fourth]
    }

    pub const fn number(self) -> u8 {
        match self {
            Quarter::First => 1,
            Quarter::Second => 2,
            Quarter::Third => 3,
            Quarter::Fourth => 4,
        }
    }

    pub const fn from_number(number: u8) -> Option<Self> {
        match number {
            1 => Some(Self::First),
            2 => Some(Self::Second),
            3 => Some(Self::Third),
            4 => Some(Self::Fourth),
            _ => None,
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Quarter::First => "Q1 (Jan-Mar)",
            Quarter::Second => "Q2 (Apr-Jun)",
            Quarter::Third => "Q3 (Jul-Sep)",
            Quarter::Fourth => "Q4 (Okt-Des)",
        }
    }
}

/// Reporting interval against which records are keyed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Period {
    pub quarter: Quarter,
    pub year: i32,
}

impl Period {
    pub fn new(quarter: Quarter, year: i32) -> Self {
        Self { quarter, year }
    }

    /// Stable key used by the persistence boundary, e.g. `2025-Q2`.
    pub fn storage_key(&self) -> String {
        format!("{}-Q{}", self.year, self.quarter.number())
    }
}

/// Raw submitted value, matched against the indicator variant at submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AssessmentValue {
    Score(ScoreLevel),
    Achievement(u32),
}

/// Unique key of an assessment record; re-submission overwrites.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AssessmentKey {
    pub facility_id: FacilityId,
    pub bundle_id: BundleId,
    pub indicator_id: IndicatorId,
    pub period: Period,
}

/// Per-facility, per-period value for one indicator with its derived percentage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssessmentRecord {
    pub key: AssessmentKey,
    pub value: AssessmentValue,
    pub calculated_percentage: f64,
}

/// Unique key of a quarterly evaluation text record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EvaluationKey {
    pub facility_id: FacilityId,
    pub bundle_id: BundleId,
    pub quarter: Quarter,
    pub year: i32,
}

/// Quarterly narrative evaluation attached to a facility's assessment cycle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EvaluationRecord {
    pub key: EvaluationKey,
    pub analysis: String,
    pub obstacles: String,
    pub follow_up_plan: String,
}

impl EvaluationRecord {
    pub fn new(key: EvaluationKey) -> Self {
        Self {
            key,
            analysis: String::new(),
            obstacles: String::new(),
            follow_up_plan: String::new(),
        }
    }

    /// Complete iff all three narrative fields are non-empty after trimming.
    pub fn is_complete(&self) -> bool {
        !self.analysis.trim().is_empty()
            && !self.obstacles.trim().is_empty()
            && !self.follow_up_plan.trim().is_empty()
    }
}

/// Reviewer verdict on a facility's submission for a period.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VerificationStatus {
    Pending,
    Approved,
    Revision,
}

impl VerificationStatus {
    pub const fn label(self) -> &'static str {
        match self {
            VerificationStatus::Pending => "pending",
            VerificationStatus::Approved => "approved",
            VerificationStatus::Revision => "revision",
        }
    }
}

/// Decisions a reviewer can record. Returning to pending is not expressible.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VerificationDecision {
    Approved,
    Revision,
}

impl VerificationDecision {
    pub const fn status(self) -> VerificationStatus {
        match self {
            VerificationDecision::Approved => VerificationStatus::Approved,
            VerificationDecision::Revision => VerificationStatus::Revision,
        }
    }
}

/// Unique key of a verification record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct VerificationKey {
    pub facility_id: FacilityId,
    pub bundle_id: BundleId,
    pub period: Period,
}

/// Verification state for a facility's submission; upsert overwrites verdicts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VerificationRecord {
    pub key: VerificationKey,
    pub status: VerificationStatus,
    pub comment: String,
    pub verified_by: Option<UserId>,
    pub verified_at: Option<DateTime<Utc>>,
}

impl VerificationRecord {
    pub fn pending(key: VerificationKey) -> Self {
        Self {
            key,
            status: VerificationStatus::Pending,
            comment: String::new(),
            verified_by: None,
            verified_at: None,
        }
    }
}

/// An assessed clinic.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Facility {
    pub id: FacilityId,
    pub name: String,
    pub code: String,
    pub address: Option<String>,
}

/// Shape errors raised by the model; fail fast, no partial state committed.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("indicator {id:?} must have a non-empty name")]
    EmptyIndicatorName { id: IndicatorId },
    #[error("target percentage {value} exceeds 100")]
    TargetPercentageOutOfRange { value: u8 },
    #[error("total sasaran must be a positive count")]
    ZeroSasaran,
    #[error("target unit must not be empty")]
    EmptyUnit,
    #[error("indicator {id:?} is not a {expected} indicator")]
    ActionVariantMismatch {
        id: IndicatorId,
        expected: &'static str,
    },
    #[error("analysis, obstacles, and follow-up plan must all be filled before saving")]
    IncompleteEvaluation,
    #[error("a verification comment is required to leave pending status")]
    EmptyVerificationComment,
}
