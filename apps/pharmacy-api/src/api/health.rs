//! Readiness check backed by a real database round trip.

use axum::{
    extract::State,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use axum_helpers::ReadyResponse;
use sea_orm::DatabaseConnection;

pub async fn ready_handler(State(db): State<DatabaseConnection>) -> Response {
    let database = match database::postgres::check_health(&db).await {
        Ok(()) => true,
        Err(err) => {
            tracing::warn!("Database health check failed: {err}");
            false
        }
    };

    let response = ReadyResponse::from_database(database);
    (response.status_code(), Json(response)).into_response()
}

/// Router exposing `/ready`, owning the database handle it probes
pub fn ready_router(db: DatabaseConnection) -> Router {
    Router::new()
        .route("/ready", get(ready_handler))
        .with_state(db)
}
