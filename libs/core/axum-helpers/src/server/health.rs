use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use core_config::AppInfo;
use serde::Serialize;
use utoipa::ToSchema;

/// Liveness payload, always 200 while the process runs.
#[derive(Serialize, ToSchema)]
pub struct HealthResponse {
    pub status: &'static str,
    pub name: &'static str,
    pub version: &'static str,
}

/// Readiness payload, reports whether the database answers.
#[derive(Serialize, ToSchema)]
pub struct ReadyResponse {
    pub ready: bool,
    pub database: bool,
}

impl ReadyResponse {
    pub fn from_database(database: bool) -> Self {
        Self {
            ready: database,
            database,
        }
    }

    pub fn status_code(&self) -> StatusCode {
        if self.ready {
            StatusCode::OK
        } else {
            StatusCode::SERVICE_UNAVAILABLE
        }
    }
}

/// Health check endpoint handler.
pub async fn health_handler(State(app): State<AppInfo>) -> Response {
    let response = HealthResponse {
        status: "healthy",
        name: app.name,
        version: app.version,
    };

    (StatusCode::OK, Json(response)).into_response()
}

/// Router exposing `/health` with the app name and version.
///
/// Readiness stays in the app, which owns the database handle.
pub fn health_router(app_info: AppInfo) -> Router {
    Router::new()
        .route("/health", get(health_handler))
        .with_state(app_info)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ready_response_tracks_database() {
        let ok = ReadyResponse::from_database(true);
        assert!(ok.ready);
        assert_eq!(ok.status_code(), StatusCode::OK);

        let down = ReadyResponse::from_database(false);
        assert!(!down.ready);
        assert_eq!(down.status_code(), StatusCode::SERVICE_UNAVAILABLE);
    }
}
