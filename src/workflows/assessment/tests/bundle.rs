use crate::workflows::assessment::{
    Bundle, BundleError, BundleId, BundleStatus, ClusterId, IndicatorAction, IndicatorDetail,
    IndicatorId, IndicatorKind, Periodicity, ScoreLevel, TargetProfile, ValidationError,
};

fn draft_bundle() -> Bundle {
    Bundle::new(BundleId(1), 2025, "Bundle PKP 2025")
}

#[test]
fn clusters_and_indicators_keep_dense_ordering() {
    let mut bundle = draft_bundle();
    bundle.add_cluster(ClusterId(1), "Promosi").expect("added");
    bundle.add_cluster(ClusterId(2), "Lingkungan").expect("added");
    bundle.add_cluster(ClusterId(3), "Gizi").expect("added");

    bundle.remove_cluster(ClusterId(2)).expect("removed");

    let orders: Vec<u32> = bundle.clusters.iter().map(|cluster| cluster.order).collect();
    assert_eq!(orders, vec![1, 2]);

    bundle
        .add_indicator(ClusterId(1), IndicatorId(1), "A", IndicatorKind::Scoring)
        .expect("added");
    bundle
        .add_indicator(ClusterId(1), IndicatorId(2), "B", IndicatorKind::Scoring)
        .expect("added");
    bundle
        .add_indicator(ClusterId(1), IndicatorId(3), "C", IndicatorKind::Scoring)
        .expect("added");
    bundle
        .remove_indicator(ClusterId(1), IndicatorId(1))
        .expect("removed");

    let orders: Vec<u32> = bundle.clusters[0]
        .indicators
        .iter()
        .map(|indicator| indicator.order)
        .collect();
    assert_eq!(orders, vec![1, 2]);
}

#[test]
fn derived_counts_follow_the_structure() {
    let mut bundle = draft_bundle();
    bundle.add_cluster(ClusterId(1), "Promosi").expect("added");
    bundle.add_cluster(ClusterId(2), "Lingkungan").expect("added");
    bundle
        .add_indicator(ClusterId(1), IndicatorId(1), "A", IndicatorKind::Scoring)
        .expect("added");
    bundle
        .add_indicator(
            ClusterId(2),
            IndicatorId(2),
            "B",
            IndicatorKind::TargetAchievement,
        )
        .expect("added");
    bundle
        .add_indicator(ClusterId(2), IndicatorId(3), "C", IndicatorKind::Scoring)
        .expect("added");

    assert_eq!(bundle.cluster_count(), 2);
    assert_eq!(bundle.indicator_count(), 3);
}

#[test]
fn structural_changes_require_a_draft_bundle() {
    let mut bundle = draft_bundle();
    bundle.add_cluster(ClusterId(1), "Promosi").expect("added");
    bundle.status = BundleStatus::Active;

    assert!(matches!(
        bundle.add_cluster(ClusterId(2), "Lingkungan"),
        Err(BundleError::NotEditable { .. })
    ));
    assert!(matches!(
        bundle.remove_cluster(ClusterId(1)),
        Err(BundleError::NotEditable { .. })
    ));
    assert!(matches!(
        bundle.add_indicator(ClusterId(1), IndicatorId(1), "A", IndicatorKind::Scoring),
        Err(BundleError::NotEditable { .. })
    ));
}

#[test]
fn switching_variant_discards_old_payload_and_keeps_identity() {
    let mut bundle = draft_bundle();
    bundle.add_cluster(ClusterId(1), "Promosi").expect("added");
    bundle
        .add_indicator(
            ClusterId(1),
            IndicatorId(1),
            "Cakupan Penyuluhan",
            IndicatorKind::Scoring,
        )
        .expect("added");
    bundle
        .update_indicator(
            IndicatorId(1),
            IndicatorAction::SetDefinition("Persentase kegiatan penyuluhan".to_string()),
        )
        .expect("definition set");
    bundle
        .update_indicator(
            IndicatorId(1),
            IndicatorAction::SetRubricDescription {
                level: ScoreLevel::Ten,
                text: "Semua kegiatan terlaksana".to_string(),
            },
        )
        .expect("rubric set");

    bundle
        .update_indicator(
            IndicatorId(1),
            IndicatorAction::SwitchVariant(IndicatorKind::TargetAchievement),
        )
        .expect("switched");

    let indicator = bundle.find_indicator(IndicatorId(1)).expect("present");
    assert_eq!(indicator.name, "Cakupan Penyuluhan");
    assert_eq!(indicator.operational_definition, "Persentase kegiatan penyuluhan");
    assert_eq!(
        indicator.detail,
        IndicatorDetail::TargetAchievement(TargetProfile {
            target_percentage: 80,
            total_sasaran: 100,
            unit: "unit".to_string(),
            periodicity: Periodicity::Annual,
        })
    );

    // Switching back installs a fresh rubric, not the original texts.
    bundle
        .update_indicator(
            IndicatorId(1),
            IndicatorAction::SwitchVariant(IndicatorKind::Scoring),
        )
        .expect("switched back");
    let indicator = bundle.find_indicator(IndicatorId(1)).expect("present");
    assert_eq!(indicator.name, "Cakupan Penyuluhan");
    match &indicator.detail {
        IndicatorDetail::Scoring(rubric) => {
            assert!(rubric.description(ScoreLevel::Ten).is_empty());
        }
        other => panic!("expected scoring variant, got {other:?}"),
    }
}

#[test]
fn switching_to_the_current_variant_keeps_authored_data() {
    let mut bundle = draft_bundle();
    bundle.add_cluster(ClusterId(1), "Promosi").expect("added");
    bundle
        .add_indicator(ClusterId(1), IndicatorId(1), "A", IndicatorKind::Scoring)
        .expect("added");
    bundle
        .update_indicator(
            IndicatorId(1),
            IndicatorAction::SetRubricDescription {
                level: ScoreLevel::Four,
                text: "Sebagian kecil".to_string(),
            },
        )
        .expect("rubric set");

    bundle
        .update_indicator(
            IndicatorId(1),
            IndicatorAction::SwitchVariant(IndicatorKind::Scoring),
        )
        .expect("no-op switch");

    let indicator = bundle.find_indicator(IndicatorId(1)).expect("present");
    match &indicator.detail {
        IndicatorDetail::Scoring(rubric) => {
            assert_eq!(rubric.description(ScoreLevel::Four), "Sebagian kecil");
        }
        other => panic!("expected scoring variant, got {other:?}"),
    }
}

#[test]
fn rubric_actions_reject_target_indicators() {
    let mut bundle = draft_bundle();
    bundle.add_cluster(ClusterId(1), "Promosi").expect("added");
    bundle
        .add_indicator(
            ClusterId(1),
            IndicatorId(1),
            "A",
            IndicatorKind::TargetAchievement,
        )
        .expect("added");

    let result = bundle.update_indicator(
        IndicatorId(1),
        IndicatorAction::SetRubricDescription {
            level: ScoreLevel::Zero,
            text: "Tidak ada".to_string(),
        },
    );
    assert!(matches!(
        result,
        Err(BundleError::Validation(
            ValidationError::ActionVariantMismatch { .. }
        ))
    ));
}

#[test]
fn validation_flags_bad_target_shapes() {
    let mut bundle = draft_bundle();
    bundle.add_cluster(ClusterId(1), "Promosi").expect("added");
    bundle
        .add_indicator(
            ClusterId(1),
            IndicatorId(1),
            "A",
            IndicatorKind::TargetAchievement,
        )
        .expect("added");

    bundle
        .update_indicator(IndicatorId(1), IndicatorAction::SetTotalSasaran(0))
        .expect("field applies");
    assert_eq!(bundle.validate(), Err(ValidationError::ZeroSasaran));

    bundle
        .update_indicator(IndicatorId(1), IndicatorAction::SetTotalSasaran(10))
        .expect("field applies");
    bundle
        .update_indicator(IndicatorId(1), IndicatorAction::SetTargetPercentage(120))
        .expect("field applies");
    assert_eq!(
        bundle.validate(),
        Err(ValidationError::TargetPercentageOutOfRange { value: 120 })
    );

    bundle
        .update_indicator(IndicatorId(1), IndicatorAction::SetTargetPercentage(80))
        .expect("field applies");
    bundle
        .update_indicator(IndicatorId(1), IndicatorAction::SetUnit("  ".to_string()))
        .expect("field applies");
    assert_eq!(bundle.validate(), Err(ValidationError::EmptyUnit));
}
