//! Operational endpoints: health, good-to-go, ping and build info.

use std::sync::Arc;

use axum::{extract::State, http::StatusCode, routing::get, Json, Router};
use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::app::App;

const SERVICE_NAME: &str = "content-collection-rw-neo4j";
const SERVICE_DESCRIPTION: &str =
    "Writes content collections (story packages, content packages) to Neo4j";

pub fn routes() -> Router<Arc<App>> {
    Router::new()
        .route("/__health", get(health))
        .route("/__gtg", get(good_to_go))
        .route("/__ping", get(ping))
        .route("/ping", get(ping))
        .route("/__build-info", get(build_info))
        .route("/build-info", get(build_info))
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthReport {
    pub schema_version: u8,
    pub name: &'static str,
    pub description: &'static str,
    pub checks: Vec<HealthCheck>,
    pub ok: bool,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthCheck {
    pub name: String,
    pub ok: bool,
    pub severity: u8,
    pub business_impact: String,
    pub technical_summary: String,
    pub panic_guide: String,
    pub check_output: String,
    pub last_updated: DateTime<Utc>,
}

/// One connectivity check per collection kind.
async fn run_checks(app: &App) -> Vec<HealthCheck> {
    let mut checks = Vec::new();
    for service in app.services() {
        let kind = &service.kind().name;
        let result = service.check().await;
        checks.push(HealthCheck {
            name: format!("Check connectivity to Neo4j for {kind}"),
            ok: result.is_ok(),
            severity: 1,
            business_impact: format!("Cannot read/write {kind} collections via this writer"),
            technical_summary: "Cannot connect to the Neo4j instance backing this writer"
                .to_string(),
            panic_guide: "Check the Neo4j cluster is reachable on NEO_URL".to_string(),
            check_output: result.err().map(|e| e.to_string()).unwrap_or_default(),
            last_updated: Utc::now(),
        });
    }
    checks
}

async fn health(State(app): State<Arc<App>>) -> Json<HealthReport> {
    let checks = run_checks(&app).await;
    let ok = checks.iter().all(|check| check.ok);
    if !ok {
        tracing::warn!(failing = checks.iter().filter(|c| !c.ok).count(), "Health check failing");
    }

    Json(HealthReport {
        schema_version: 1,
        name: SERVICE_NAME,
        description: SERVICE_DESCRIPTION,
        checks,
        ok,
    })
}

async fn good_to_go(State(app): State<Arc<App>>) -> (StatusCode, String) {
    match run_checks(&app).await.into_iter().find(|check| !check.ok) {
        None => (StatusCode::OK, "OK".to_string()),
        Some(failed) => (StatusCode::SERVICE_UNAVAILABLE, failed.check_output),
    }
}

async fn ping() -> &'static str {
    "pong"
}

#[derive(Debug, Serialize)]
pub struct BuildInfo {
    pub name: &'static str,
    pub version: &'static str,
    pub env: String,
}

async fn build_info(State(app): State<Arc<App>>) -> Json<BuildInfo> {
    Json(BuildInfo {
        name: env!("CARGO_PKG_NAME"),
        version: env!("CARGO_PKG_VERSION"),
        env: app.env.clone(),
    })
}
