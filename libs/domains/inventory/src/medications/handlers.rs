use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, put},
    Json, Router,
};
use axum_helpers::{ApiResponse, UuidPath, ValidatedJson};
use std::sync::Arc;
use utoipa::OpenApi;

use crate::medication_types::repository::MedicationTypeRepository;
use crate::medications::error::MedicationResult;
use crate::medications::models::{
    CreateMedication, Dashboard, ExpiryReport, ExpiryReportQuery, Medication, MedicationFilter,
    MedicationList, MedicationResponse, StockUpdateResult, UpdateMedication, UpdateStockRequest,
};
use crate::medications::repository::MedicationRepository;
use crate::medications::service::MedicationService;

/// OpenAPI documentation for the medications API
#[derive(OpenApi)]
#[openapi(
    paths(
        list_medications,
        get_medication,
        create_medication,
        update_medication,
        delete_medication,
        update_stock,
        dashboard,
        expiry_report,
    ),
    components(
        schemas(
            Medication,
            MedicationResponse,
            MedicationList,
            CreateMedication,
            UpdateMedication,
            UpdateStockRequest,
            StockUpdateResult,
            Dashboard,
            ExpiryReport,
        )
    ),
    tags(
        (name = "medications", description = "Medication inventory")
    )
)]
pub struct MedicationsApiDoc;

pub fn router<R, T>(service: MedicationService<R, T>) -> Router
where
    R: MedicationRepository + 'static,
    T: MedicationTypeRepository + 'static,
{
    let shared_service = Arc::new(service);

    Router::new()
        .route("/", get(list_medications).post(create_medication))
        .route("/reports/dashboard", get(dashboard))
        .route("/reports/expirations", get(expiry_report))
        .route(
            "/{id}",
            get(get_medication)
                .put(update_medication)
                .delete(delete_medication),
        )
        .route("/{id}/stock", put(update_stock))
        .with_state(shared_service)
}

/// List medications with optional filters
#[utoipa::path(
    get,
    path = "",
    tag = "medications",
    params(MedicationFilter),
    responses(
        (status = 200, description = "Paginated list of medications", body = MedicationList),
        (status = 500, description = "Internal server error")
    )
)]
pub async fn list_medications<R, T>(
    State(service): State<Arc<MedicationService<R, T>>>,
    Query(filter): Query<MedicationFilter>,
) -> MedicationResult<impl IntoResponse>
where
    R: MedicationRepository,
    T: MedicationTypeRepository,
{
    let list = service.list(filter).await?;
    Ok(Json(ApiResponse::data(list)))
}

/// Get a medication by ID
#[utoipa::path(
    get,
    path = "/{id}",
    tag = "medications",
    params(
        ("id" = Uuid, Path, description = "Medication ID")
    ),
    responses(
        (status = 200, description = "Medication found", body = MedicationResponse),
        (status = 404, description = "Medication not found"),
        (status = 500, description = "Internal server error")
    )
)]
pub async fn get_medication<R, T>(
    State(service): State<Arc<MedicationService<R, T>>>,
    UuidPath(id): UuidPath,
) -> MedicationResult<impl IntoResponse>
where
    R: MedicationRepository,
    T: MedicationTypeRepository,
{
    let medication = service.get(id).await?;
    Ok(Json(ApiResponse::data(medication)))
}

/// Create a medication
#[utoipa::path(
    post,
    path = "",
    tag = "medications",
    request_body = CreateMedication,
    responses(
        (status = 201, description = "Medication created", body = MedicationResponse),
        (status = 400, description = "Validation failed or unknown type"),
        (status = 500, description = "Internal server error")
    )
)]
pub async fn create_medication<R, T>(
    State(service): State<Arc<MedicationService<R, T>>>,
    ValidatedJson(input): ValidatedJson<CreateMedication>,
) -> MedicationResult<impl IntoResponse>
where
    R: MedicationRepository,
    T: MedicationTypeRepository,
{
    let created = service.create(input).await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::with_message(
            "Medicamento creado exitosamente",
            created,
        )),
    ))
}

/// Update a medication
#[utoipa::path(
    put,
    path = "/{id}",
    tag = "medications",
    params(
        ("id" = Uuid, Path, description = "Medication ID")
    ),
    request_body = UpdateMedication,
    responses(
        (status = 200, description = "Medication updated", body = MedicationResponse),
        (status = 400, description = "Validation failed or unknown type"),
        (status = 404, description = "Medication not found"),
        (status = 500, description = "Internal server error")
    )
)]
pub async fn update_medication<R, T>(
    State(service): State<Arc<MedicationService<R, T>>>,
    UuidPath(id): UuidPath,
    ValidatedJson(input): ValidatedJson<UpdateMedication>,
) -> MedicationResult<impl IntoResponse>
where
    R: MedicationRepository,
    T: MedicationTypeRepository,
{
    let updated = service.update(id, input).await?;
    Ok(Json(ApiResponse::with_message(
        "Medicamento actualizado exitosamente",
        updated,
    )))
}

/// Delete a medication
#[utoipa::path(
    delete,
    path = "/{id}",
    tag = "medications",
    params(
        ("id" = Uuid, Path, description = "Medication ID")
    ),
    responses(
        (status = 200, description = "Medication deleted"),
        (status = 404, description = "Medication not found"),
        (status = 500, description = "Internal server error")
    )
)]
pub async fn delete_medication<R, T>(
    State(service): State<Arc<MedicationService<R, T>>>,
    UuidPath(id): UuidPath,
) -> MedicationResult<impl IntoResponse>
where
    R: MedicationRepository,
    T: MedicationTypeRepository,
{
    service.delete(id).await?;
    Ok(Json(ApiResponse::message(
        "Medicamento eliminado exitosamente",
    )))
}

/// Apply a stock operation
#[utoipa::path(
    put,
    path = "/{id}/stock",
    tag = "medications",
    params(
        ("id" = Uuid, Path, description = "Medication ID")
    ),
    request_body = UpdateStockRequest,
    responses(
        (status = 200, description = "Stock updated", body = StockUpdateResult),
        (status = 400, description = "Stock would become negative"),
        (status = 404, description = "Medication not found"),
        (status = 500, description = "Internal server error")
    )
)]
pub async fn update_stock<R, T>(
    State(service): State<Arc<MedicationService<R, T>>>,
    UuidPath(id): UuidPath,
    ValidatedJson(request): ValidatedJson<UpdateStockRequest>,
) -> MedicationResult<impl IntoResponse>
where
    R: MedicationRepository,
    T: MedicationTypeRepository,
{
    let result = service.update_stock(id, request).await?;
    Ok(Json(ApiResponse::with_message(
        "Stock actualizado exitosamente",
        result,
    )))
}

/// Inventory dashboard: counts, value, and the five lowest stocks
#[utoipa::path(
    get,
    path = "/reports/dashboard",
    tag = "medications",
    responses(
        (status = 200, description = "Dashboard statistics", body = Dashboard),
        (status = 500, description = "Internal server error")
    )
)]
pub async fn dashboard<R, T>(
    State(service): State<Arc<MedicationService<R, T>>>,
) -> MedicationResult<impl IntoResponse>
where
    R: MedicationRepository,
    T: MedicationTypeRepository,
{
    let dashboard = service.dashboard().await?;
    Ok(Json(ApiResponse::data(dashboard)))
}

/// Upcoming and past expirations
#[utoipa::path(
    get,
    path = "/reports/expirations",
    tag = "medications",
    params(ExpiryReportQuery),
    responses(
        (status = 200, description = "Expiry report", body = ExpiryReport),
        (status = 500, description = "Internal server error")
    )
)]
pub async fn expiry_report<R, T>(
    State(service): State<Arc<MedicationService<R, T>>>,
    Query(query): Query<ExpiryReportQuery>,
) -> MedicationResult<impl IntoResponse>
where
    R: MedicationRepository,
    T: MedicationTypeRepository,
{
    let report = service.expiry_report(query.days).await?;
    Ok(Json(ApiResponse::data(report)))
}
