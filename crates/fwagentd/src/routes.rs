//! API routes for fwagentd.
//!
//! Handlers only marshal requests into the engine and map its errors onto
//! status codes; the engine itself is synchronous and runs on the blocking
//! pool.

use crate::server::AppState;
use crate::update::{UpdateEngine, VersionStore};
use crate::{media, power};
use axum::{
    extract::State,
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use fwagent_common::types::{
    ArchiveInfo, HealthResponse, PowerRequest, RollbackResponse, UpdateRequest, UpdateReport,
};
use fwagent_common::UpdateError;
use std::sync::Arc;
use tracing::{error, info};

type AppStateArc = Arc<AppState>;

// ============================================================================
// Health
// ============================================================================

pub fn health_routes() -> Router<AppStateArc> {
    Router::new().route("/v1/health", get(health_check))
}

async fn health_check(State(state): State<AppStateArc>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        uptime_seconds: state.start_time.elapsed().as_secs(),
    })
}

// ============================================================================
// Removable media
// ============================================================================

pub fn media_routes() -> Router<AppStateArc> {
    Router::new().route("/v1/media/archives", get(list_archives))
}

async fn list_archives(
    State(_state): State<AppStateArc>,
) -> Result<Json<Vec<ArchiveInfo>>, (StatusCode, String)> {
    let listing = tokio::task::spawn_blocking(|| -> anyhow::Result<Vec<ArchiveInfo>> {
        let roots = media::mount_points()?;
        Ok(media::list_archives(&roots))
    })
    .await
    .map_err(join_error)?
    .map_err(|e| {
        error!("Media discovery failed: {e:#}");
        (StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
    })?;

    if listing.is_empty() {
        return Err((StatusCode::NOT_FOUND, "no firmware archives found".into()));
    }
    Ok(Json(listing))
}

// ============================================================================
// Firmware update / rollback
// ============================================================================

pub fn firmware_routes() -> Router<AppStateArc> {
    Router::new()
        .route("/v1/firmware/update", post(firmware_update))
        .route("/v1/firmware/rollback", post(firmware_rollback))
}

async fn firmware_update(
    State(state): State<AppStateArc>,
    Json(req): Json<UpdateRequest>,
) -> Result<Json<UpdateReport>, (StatusCode, String)> {
    if req.archive_path.as_os_str().is_empty() {
        return Err((StatusCode::BAD_REQUEST, "no archive selected".into()));
    }

    let _guard = state
        .engine_lock
        .try_lock()
        .map_err(|_| busy())?;

    info!(archive = %req.archive_path.display(), "Update requested");
    let engine = UpdateEngine::new(
        state.config.version_store_path(),
        state.config.backup_root(),
    );
    let archive_path = req.archive_path.clone();

    let report = tokio::task::spawn_blocking(move || engine.update(&archive_path))
        .await
        .map_err(join_error)?
        .map_err(engine_error)?;

    Ok(Json(report))
}

async fn firmware_rollback(
    State(state): State<AppStateArc>,
) -> Result<Json<RollbackResponse>, (StatusCode, String)> {
    let _guard = state
        .engine_lock
        .try_lock()
        .map_err(|_| busy())?;

    info!("Rollback requested");
    let engine = UpdateEngine::new(
        state.config.version_store_path(),
        state.config.backup_root(),
    );

    let restored = tokio::task::spawn_blocking(move || -> fwagent_common::Result<usize> {
        let store = VersionStore::load(engine.store_path())?;
        engine.rollback(&store)?;
        Ok(store.files.len())
    })
    .await
    .map_err(join_error)?
    .map_err(engine_error)?;

    Ok(Json(RollbackResponse { restored }))
}

// ============================================================================
// Power
// ============================================================================

pub fn power_routes() -> Router<AppStateArc> {
    Router::new()
        .route("/v1/power/shutdown", post(power_shutdown))
        .route("/v1/power/reboot", post(power_reboot))
}

async fn power_shutdown(
    Json(req): Json<PowerRequest>,
) -> Result<String, (StatusCode, String)> {
    if req.comment != power::SHUTDOWN_COMMENT {
        return Err((StatusCode::BAD_REQUEST, "invalid comment".into()));
    }
    power::shutdown().map_err(|e| (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()))?;
    Ok("system is shutting down".to_string())
}

async fn power_reboot(Json(req): Json<PowerRequest>) -> Result<String, (StatusCode, String)> {
    if req.comment != power::REBOOT_COMMENT {
        return Err((StatusCode::BAD_REQUEST, "invalid comment".into()));
    }
    power::reboot().map_err(|e| (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()))?;
    Ok("system is rebooting".to_string())
}

// ============================================================================
// Error mapping
// ============================================================================

fn busy() -> (StatusCode, String) {
    (
        StatusCode::CONFLICT,
        "an update or rollback is already running".to_string(),
    )
}

fn engine_error(err: UpdateError) -> (StatusCode, String) {
    error!("{err}");
    let code = match &err {
        UpdateError::HashMismatch { .. } => StatusCode::CONFLICT,
        UpdateError::ManifestNotFound
        | UpdateError::ManifestAmbiguous { .. }
        | UpdateError::ManifestMalformed(_)
        | UpdateError::InvalidVersionFormat(_)
        | UpdateError::StoreCorrupt(_)
        | UpdateError::SourceMissing(_) => StatusCode::UNPROCESSABLE_ENTITY,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    };
    (code, err.to_string())
}

fn join_error(err: tokio::task::JoinError) -> (StatusCode, String) {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        format!("task join error: {err}"),
    )
}
