use axum::extract::State;
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};
use axum_prometheus::PrometheusMetricLayer;
use clap::{Args, Parser, Subcommand};
use metrics_exporter_prometheus::PrometheusHandle;
use pkp_monitor::config::AppConfig;
use pkp_monitor::error::AppError;
use pkp_monitor::telemetry;
use pkp_monitor::workflows::assessment::memory::{
    InMemoryAssessments, InMemoryBundles, InMemoryEvaluations, InMemoryFacilities,
    InMemoryVerifications,
};
use pkp_monitor::workflows::assessment::{
    achievement_to_percentage, assessment_router, period_quota, Facility, FacilityId,
    MonitorService, Periodicity, TargetProfile,
};
use serde_json::json;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::info;

#[derive(Clone)]
struct AppState {
    readiness: Arc<AtomicBool>,
    metrics: PrometheusHandle,
}

#[derive(Parser, Debug)]
#[command(
    name = "PKP Monitor",
    about = "Run the puskesmas performance assessment service from the command line",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Start the HTTP service (default command)
    Serve(ServeArgs),
    /// Compute the quarterly quota for a target-achievement indicator
    Quota(QuotaArgs),
}

#[derive(Args, Debug, Default)]
struct ServeArgs {
    /// Override the configured host for the HTTP server
    #[arg(long)]
    host: Option<String>,
    /// Override the configured port for the HTTP server
    #[arg(long)]
    port: Option<u16>,
}

#[derive(Args, Debug)]
struct QuotaArgs {
    /// Annual target percentage (0-100)
    #[arg(long)]
    target_percentage: u8,
    /// Annual or monthly cohort size
    #[arg(long)]
    total_sasaran: u32,
    /// Reporting cadence: annual or monthly
    #[arg(long, value_parser = parse_periodicity, default_value = "annual")]
    periodicity: Periodicity,
    /// Optional actual achievement to normalize against the quota
    #[arg(long)]
    actual: Option<u32>,
}

#[tokio::main]
async fn main() {
    if let Err(err) = run_cli().await {
        eprintln!("application error: {err}");
        std::process::exit(1);
    }
}

async fn run_cli() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    match command {
        Command::Serve(args) => run_server(args).await,
        Command::Quota(args) => run_quota(args),
    }
}

fn parse_periodicity(raw: &str) -> Result<Periodicity, String> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "annual" => Ok(Periodicity::Annual),
        "monthly" => Ok(Periodicity::Monthly),
        other => Err(format!("'{other}' is not 'annual' or 'monthly'")),
    }
}

async fn run_server(mut args: ServeArgs) -> Result<(), AppError> {
    let mut config = AppConfig::load()?;

    if let Some(host) = args.host.take() {
        config.server.host = host;
    }
    if let Some(port) = args.port.take() {
        config.server.port = port;
    }

    telemetry::init(&config.telemetry)?;

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(AtomicBool::new(false));
    let state = AppState {
        readiness: readiness_flag.clone(),
        metrics: prometheus_handle,
    };

    let service = Arc::new(MonitorService::new(
        Arc::new(InMemoryBundles::default()),
        Arc::new(InMemoryFacilities::with_seed(seed_facilities())),
        Arc::new(InMemoryAssessments::default()),
        Arc::new(InMemoryEvaluations::default()),
        Arc::new(InMemoryVerifications::default()),
    ));

    let app = Router::new()
        .route("/health", get(healthcheck))
        .route("/ready", get(readiness_endpoint))
        .route("/metrics", get(metrics_endpoint))
        .with_state(state)
        .merge(assessment_router(service))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, %addr, "pkp monitor ready");

    axum::serve(listener, app).await?;
    Ok(())
}

fn run_quota(args: QuotaArgs) -> Result<(), AppError> {
    let profile = TargetProfile {
        target_percentage: args.target_percentage,
        total_sasaran: args.total_sasaran,
        unit: "unit".to_string(),
        periodicity: args.periodicity,
    };

    let quota = period_quota(&profile);
    println!(
        "Quarterly quota for {}% of {} ({}): {}",
        profile.target_percentage,
        profile.total_sasaran,
        profile.periodicity.label(),
        quota
    );

    if let Some(actual) = args.actual {
        let percentage = achievement_to_percentage(actual, quota);
        println!("Achievement {actual}/{quota}: {percentage:.1}%");
    }

    Ok(())
}

/// Demo roster standing in for the hosted facilities table.
fn seed_facilities() -> Vec<Facility> {
    vec![
        Facility {
            id: FacilityId(1),
            name: "Puskesmas Cibadak".to_string(),
            code: "PKM-001".to_string(),
            address: Some("Jl. Raya Cibadak No. 12".to_string()),
        },
        Facility {
            id: FacilityId(2),
            name: "Puskesmas Sukabumi Utara".to_string(),
            code: "PKM-002".to_string(),
            address: None,
        },
        Facility {
            id: FacilityId(3),
            name: "Puskesmas Pelabuhan Ratu".to_string(),
            code: "PKM-003".to_string(),
            address: None,
        },
    ]
}

async fn healthcheck() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

async fn readiness_endpoint(State(state): State<AppState>) -> impl IntoResponse {
    let ready = state.readiness.load(Ordering::Relaxed);
    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let payload = if ready {
        json!({ "status": "ready" })
    } else {
        json!({ "status": "initializing" })
    };

    (status, Json(payload))
}

async fn metrics_endpoint(State(state): State<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.render(),
    )
}
