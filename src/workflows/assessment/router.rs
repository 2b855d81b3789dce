use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use serde::Deserialize;
use serde_json::json;

use super::bundle::BundleError;
use super::domain::{
    AssessmentValue, BundleId, FacilityId, IndicatorId, Period, Quarter, UserId, UserRole,
    VerificationDecision, VerificationKey,
};
use super::repository::{
    AssessmentRepository, BundleRepository, EvaluationRepository, FacilityRepository,
    RepositoryError, VerificationRepository,
};
use super::service::{AssessmentSubmission, MonitorService, ServiceError};
use super::{calculation, domain::EvaluationKey, domain::EvaluationRecord};

/// Router builder exposing the assessment workflow over HTTP.
pub fn assessment_router<B, F, A, E, V>(service: Arc<MonitorService<B, F, A, E, V>>) -> Router
where
    B: BundleRepository + 'static,
    F: FacilityRepository + 'static,
    A: AssessmentRepository + 'static,
    E: EvaluationRepository + 'static,
    V: VerificationRepository + 'static,
{
    Router::new()
        .route("/api/v1/bundles", get(list_bundles_handler::<B, F, A, E, V>))
        .route("/api/v1/bundles", post(create_bundle_handler::<B, F, A, E, V>))
        .route(
            "/api/v1/bundles/active",
            get(active_bundle_handler::<B, F, A, E, V>),
        )
        .route(
            "/api/v1/bundles/:bundle_id/activate",
            post(activate_bundle_handler::<B, F, A, E, V>),
        )
        .route(
            "/api/v1/assessments",
            post(submit_assessment_handler::<B, F, A, E, V>),
        )
        .route(
            "/api/v1/assessments/progress",
            get(progress_handler::<B, F, A, E, V>),
        )
        .route(
            "/api/v1/evaluations",
            post(save_evaluation_handler::<B, F, A, E, V>),
        )
        .route(
            "/api/v1/verifications",
            post(verify_handler::<B, F, A, E, V>),
        )
        .with_state(service)
}

#[derive(Debug, Deserialize)]
pub(crate) struct CreateBundleRequest {
    year: i32,
    title: String,
    #[serde(default)]
    description: String,
}

/// Raw submission mirroring the assessment table columns: exactly one of
/// `score` and `actual_achievement` must be present.
#[derive(Debug, Deserialize)]
pub(crate) struct SubmitAssessmentRequest {
    facility_id: u64,
    bundle_id: u64,
    indicator_id: u64,
    quarter: u8,
    year: i32,
    #[serde(default)]
    score: Option<u8>,
    #[serde(default)]
    actual_achievement: Option<u32>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ProgressQuery {
    facility_id: u64,
    bundle_id: u64,
    quarter: u8,
    year: i32,
}

#[derive(Debug, Deserialize)]
pub(crate) struct SaveEvaluationRequest {
    facility_id: u64,
    bundle_id: u64,
    quarter: u8,
    year: i32,
    #[serde(default)]
    analysis: String,
    #[serde(default)]
    obstacles: String,
    #[serde(default)]
    follow_up_plan: String,
    /// Autosaves skip completeness validation; the explicit save enforces it.
    #[serde(default)]
    autosave: bool,
}

#[derive(Debug, Deserialize)]
pub(crate) struct VerifyRequest {
    facility_id: u64,
    bundle_id: u64,
    quarter: u8,
    year: i32,
    decision: VerificationDecision,
    comment: String,
    verified_by: String,
    role: UserRole,
}

pub(crate) async fn list_bundles_handler<B, F, A, E, V>(
    State(service): State<Arc<MonitorService<B, F, A, E, V>>>,
) -> Response
where
    B: BundleRepository + 'static,
    F: FacilityRepository + 'static,
    A: AssessmentRepository + 'static,
    E: EvaluationRepository + 'static,
    V: VerificationRepository + 'static,
{
    match service.bundle_summaries() {
        Ok(summaries) => (StatusCode::OK, axum::Json(summaries)).into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn create_bundle_handler<B, F, A, E, V>(
    State(service): State<Arc<MonitorService<B, F, A, E, V>>>,
    axum::Json(request): axum::Json<CreateBundleRequest>,
) -> Response
where
    B: BundleRepository + 'static,
    F: FacilityRepository + 'static,
    A: AssessmentRepository + 'static,
    E: EvaluationRepository + 'static,
    V: VerificationRepository + 'static,
{
    match service.create_bundle(request.year, request.title, request.description) {
        Ok(bundle) => (StatusCode::CREATED, axum::Json(bundle)).into_response(),
        Err(ServiceError::Repository(RepositoryError::Conflict)) => {
            let payload = json!({ "error": "a bundle already exists for that year" });
            (StatusCode::CONFLICT, axum::Json(payload)).into_response()
        }
        Err(err) => error_response(err),
    }
}

pub(crate) async fn active_bundle_handler<B, F, A, E, V>(
    State(service): State<Arc<MonitorService<B, F, A, E, V>>>,
) -> Response
where
    B: BundleRepository + 'static,
    F: FacilityRepository + 'static,
    A: AssessmentRepository + 'static,
    E: EvaluationRepository + 'static,
    V: VerificationRepository + 'static,
{
    match service.active_bundle() {
        Ok(Some(bundle)) => (StatusCode::OK, axum::Json(bundle)).into_response(),
        Ok(None) => {
            let payload = json!({ "error": "no active bundle" });
            (StatusCode::NOT_FOUND, axum::Json(payload)).into_response()
        }
        Err(err) => error_response(err),
    }
}

pub(crate) async fn activate_bundle_handler<B, F, A, E, V>(
    State(service): State<Arc<MonitorService<B, F, A, E, V>>>,
    Path(bundle_id): Path<u64>,
) -> Response
where
    B: BundleRepository + 'static,
    F: FacilityRepository + 'static,
    A: AssessmentRepository + 'static,
    E: EvaluationRepository + 'static,
    V: VerificationRepository + 'static,
{
    match service.activate_bundle(BundleId(bundle_id)) {
        Ok(bundle) => (StatusCode::OK, axum::Json(bundle)).into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn submit_assessment_handler<B, F, A, E, V>(
    State(service): State<Arc<MonitorService<B, F, A, E, V>>>,
    axum::Json(request): axum::Json<SubmitAssessmentRequest>,
) -> Response
where
    B: BundleRepository + 'static,
    F: FacilityRepository + 'static,
    A: AssessmentRepository + 'static,
    E: EvaluationRepository + 'static,
    V: VerificationRepository + 'static,
{
    let period = match parse_period(request.quarter, request.year) {
        Ok(period) => period,
        Err(response) => return response,
    };

    let value = match (request.score, request.actual_achievement) {
        (Some(raw), None) => match calculation::score_level_from_points(raw) {
            Ok(level) => AssessmentValue::Score(level),
            Err(err) => {
                let payload = json!({ "error": err.to_string() });
                return (StatusCode::UNPROCESSABLE_ENTITY, axum::Json(payload)).into_response();
            }
        },
        (None, Some(actual)) => AssessmentValue::Achievement(actual),
        _ => {
            let payload =
                json!({ "error": "provide exactly one of score or actual_achievement" });
            return (StatusCode::UNPROCESSABLE_ENTITY, axum::Json(payload)).into_response();
        }
    };

    let submission = AssessmentSubmission {
        facility_id: FacilityId(request.facility_id),
        bundle_id: BundleId(request.bundle_id),
        indicator_id: IndicatorId(request.indicator_id),
        period,
        value,
    };

    match service.submit_assessment(submission) {
        Ok(record) => (StatusCode::OK, axum::Json(record)).into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn progress_handler<B, F, A, E, V>(
    State(service): State<Arc<MonitorService<B, F, A, E, V>>>,
    Query(query): Query<ProgressQuery>,
) -> Response
where
    B: BundleRepository + 'static,
    F: FacilityRepository + 'static,
    A: AssessmentRepository + 'static,
    E: EvaluationRepository + 'static,
    V: VerificationRepository + 'static,
{
    let period = match parse_period(query.quarter, query.year) {
        Ok(period) => period,
        Err(response) => return response,
    };

    match service.progress(
        FacilityId(query.facility_id),
        BundleId(query.bundle_id),
        period,
    ) {
        Ok(progress) => (StatusCode::OK, axum::Json(progress)).into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn save_evaluation_handler<B, F, A, E, V>(
    State(service): State<Arc<MonitorService<B, F, A, E, V>>>,
    axum::Json(request): axum::Json<SaveEvaluationRequest>,
) -> Response
where
    B: BundleRepository + 'static,
    F: FacilityRepository + 'static,
    A: AssessmentRepository + 'static,
    E: EvaluationRepository + 'static,
    V: VerificationRepository + 'static,
{
    let quarter = match Quarter::from_number(request.quarter) {
        Some(quarter) => quarter,
        None => return invalid_quarter_response(request.quarter),
    };

    let record = EvaluationRecord {
        key: EvaluationKey {
            facility_id: FacilityId(request.facility_id),
            bundle_id: BundleId(request.bundle_id),
            quarter,
            year: request.year,
        },
        analysis: request.analysis,
        obstacles: request.obstacles,
        follow_up_plan: request.follow_up_plan,
    };

    let result = if request.autosave {
        service.stash_evaluation(record)
    } else {
        service.save_evaluation(record)
    };

    match result {
        Ok(saved) => (StatusCode::OK, axum::Json(saved)).into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn verify_handler<B, F, A, E, V>(
    State(service): State<Arc<MonitorService<B, F, A, E, V>>>,
    axum::Json(request): axum::Json<VerifyRequest>,
) -> Response
where
    B: BundleRepository + 'static,
    F: FacilityRepository + 'static,
    A: AssessmentRepository + 'static,
    E: EvaluationRepository + 'static,
    V: VerificationRepository + 'static,
{
    let period = match parse_period(request.quarter, request.year) {
        Ok(period) => period,
        Err(response) => return response,
    };

    let key = VerificationKey {
        facility_id: FacilityId(request.facility_id),
        bundle_id: BundleId(request.bundle_id),
        period,
    };

    match service.verify(
        UserId(request.verified_by),
        request.role,
        key,
        request.decision,
        request.comment,
    ) {
        Ok(record) => (StatusCode::OK, axum::Json(record)).into_response(),
        Err(err) => error_response(err),
    }
}

fn parse_period(quarter: u8, year: i32) -> Result<Period, Response> {
    match Quarter::from_number(quarter) {
        Some(quarter) => Ok(Period::new(quarter, year)),
        None => Err(invalid_quarter_response(quarter)),
    }
}

fn invalid_quarter_response(quarter: u8) -> Response {
    let payload = json!({ "error": format!("quarter {quarter} is not in 1..=4") });
    (StatusCode::UNPROCESSABLE_ENTITY, axum::Json(payload)).into_response()
}

/// Map service failures onto HTTP statuses; every failure carries a message.
fn error_response(err: ServiceError) -> Response {
    let status = match &err {
        ServiceError::Validation(_) | ServiceError::Calculation(_) => {
            StatusCode::UNPROCESSABLE_ENTITY
        }
        ServiceError::Bundle(BundleError::NotEditable { .. }) => StatusCode::CONFLICT,
        ServiceError::Bundle(BundleError::ClusterNotFound(_))
        | ServiceError::Bundle(BundleError::IndicatorNotFound(_)) => StatusCode::NOT_FOUND,
        ServiceError::Bundle(BundleError::Validation(_)) => StatusCode::UNPROCESSABLE_ENTITY,
        ServiceError::Repository(RepositoryError::Conflict) => StatusCode::CONFLICT,
        ServiceError::Repository(RepositoryError::NotFound) => StatusCode::NOT_FOUND,
        ServiceError::Repository(RepositoryError::Unavailable(_)) => StatusCode::BAD_GATEWAY,
        ServiceError::FacilityNotFound(_)
        | ServiceError::BundleNotFound(_)
        | ServiceError::IndicatorNotFound(_) => StatusCode::NOT_FOUND,
        ServiceError::ReviewerRequired => StatusCode::FORBIDDEN,
    };

    let payload = json!({ "error": err.to_string() });
    (status, axum::Json(payload)).into_response()
}
