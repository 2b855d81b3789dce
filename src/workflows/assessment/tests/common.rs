use std::sync::Arc;

use crate::workflows::assessment::memory::{
    InMemoryAssessments, InMemoryBundles, InMemoryEvaluations, InMemoryFacilities,
    InMemoryVerifications,
};
use crate::workflows::assessment::{
    assessment_router, Bundle, ClusterId, Facility, FacilityId, IndicatorAction, IndicatorId,
    IndicatorKind, MonitorService, Period, Periodicity, Quarter, ScoreLevel,
};

pub(super) type MemoryService = MonitorService<
    InMemoryBundles,
    InMemoryFacilities,
    InMemoryAssessments,
    InMemoryEvaluations,
    InMemoryVerifications,
>;

pub(super) fn facilities() -> Vec<Facility> {
    vec![
        Facility {
            id: FacilityId(1),
            name: "Puskesmas Cibadak".to_string(),
            code: "PKM-001".to_string(),
            address: None,
        },
        Facility {
            id: FacilityId(2),
            name: "Puskesmas Sukabumi Utara".to_string(),
            code: "PKM-002".to_string(),
            address: None,
        },
    ]
}

pub(super) fn build_service() -> (
    Arc<MemoryService>,
    Arc<InMemoryBundles>,
    Arc<InMemoryVerifications>,
) {
    let bundles = Arc::new(InMemoryBundles::default());
    let verifications = Arc::new(InMemoryVerifications::default());
    let service = Arc::new(MonitorService::new(
        bundles.clone(),
        Arc::new(InMemoryFacilities::with_seed(facilities())),
        Arc::new(InMemoryAssessments::default()),
        Arc::new(InMemoryEvaluations::default()),
        verifications.clone(),
    ));
    (service, bundles, verifications)
}

/// Author a two-cluster draft bundle with two scoring indicators and one
/// target-achievement indicator, then persist it.
pub(super) fn authored_bundle(service: &MemoryService, year: i32) -> Bundle {
    let created = service
        .create_bundle(year, format!("Bundle PKP {year}"), "Siklus penilaian kinerja")
        .expect("bundle created");
    let mut bundle = created;

    bundle
        .add_cluster(ClusterId(1), "Klaster 1: Promosi Kesehatan")
        .expect("cluster added");
    bundle
        .add_indicator(
            ClusterId(1),
            IndicatorId(11),
            "Cakupan Penyuluhan Kesehatan",
            IndicatorKind::Scoring,
        )
        .expect("indicator added");
    bundle
        .update_indicator(
            IndicatorId(11),
            IndicatorAction::SetRubricDescription {
                level: ScoreLevel::Ten,
                text: "Kegiatan penyuluhan >80% dari target".to_string(),
            },
        )
        .expect("rubric text set");
    bundle
        .add_indicator(
            ClusterId(1),
            IndicatorId(12),
            "Kegiatan Pos Bindu PTM",
            IndicatorKind::Scoring,
        )
        .expect("indicator added");

    bundle
        .add_cluster(ClusterId(2), "Klaster 2: Kesehatan Lingkungan")
        .expect("cluster added");
    bundle
        .add_indicator(
            ClusterId(2),
            IndicatorId(21),
            "Inspeksi Sanitasi Dasar",
            IndicatorKind::TargetAchievement,
        )
        .expect("indicator added");
    bundle
        .update_indicator(IndicatorId(21), IndicatorAction::SetTargetPercentage(90))
        .expect("target set");
    bundle
        .update_indicator(IndicatorId(21), IndicatorAction::SetTotalSasaran(150))
        .expect("sasaran set");
    bundle
        .update_indicator(
            IndicatorId(21),
            IndicatorAction::SetUnit("rumah".to_string()),
        )
        .expect("unit set");
    bundle
        .update_indicator(
            IndicatorId(21),
            IndicatorAction::SetPeriodicity(Periodicity::Annual),
        )
        .expect("periodicity set");

    service.save_bundle(bundle.clone()).expect("bundle saved");
    bundle
}

pub(super) fn period() -> Period {
    Period::new(Quarter::Second, 2025)
}

pub(super) fn router_with_service(service: Arc<MemoryService>) -> axum::Router {
    assessment_router(service)
}
