use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use axum_helpers::{ApiResponse, UuidPath, ValidatedJson};
use std::sync::Arc;
use utoipa::OpenApi;

use crate::medication_types::error::MedicationTypeResult;
use crate::medication_types::models::{
    CreateMedicationType, MedicationType, MedicationTypeDetail, MedicationTypeDetailParams,
    MedicationTypeFilter, MedicationTypeList, MedicationTypeWithCount, TypeMedicationsList,
    UpdateMedicationType,
};
use crate::medication_types::repository::MedicationTypeRepository;
use crate::medication_types::service::MedicationTypeService;
use crate::pagination::PageRequest;

/// OpenAPI documentation for the medication-types API
#[derive(OpenApi)]
#[openapi(
    paths(
        list_medication_types,
        get_medication_type,
        list_type_medications,
        create_medication_type,
        update_medication_type,
        delete_medication_type,
    ),
    components(
        schemas(
            MedicationType,
            MedicationTypeWithCount,
            MedicationTypeDetail,
            MedicationTypeList,
            TypeMedicationsList,
            CreateMedicationType,
            UpdateMedicationType,
        )
    ),
    tags(
        (name = "medication-types", description = "Medication classification types")
    )
)]
pub struct MedicationTypesApiDoc;

pub fn router<R: MedicationTypeRepository + 'static>(
    service: MedicationTypeService<R>,
) -> Router {
    let shared_service = Arc::new(service);

    Router::new()
        .route(
            "/",
            get(list_medication_types).post(create_medication_type),
        )
        .route(
            "/{id}",
            get(get_medication_type)
                .put(update_medication_type)
                .delete(delete_medication_type),
        )
        .route("/{id}/medications", get(list_type_medications))
        .with_state(shared_service)
}

/// List medication types with their reference counts
#[utoipa::path(
    get,
    path = "",
    tag = "medication-types",
    params(MedicationTypeFilter),
    responses(
        (status = 200, description = "Paginated list of types", body = MedicationTypeList),
        (status = 500, description = "Internal server error")
    )
)]
pub async fn list_medication_types<R: MedicationTypeRepository>(
    State(service): State<Arc<MedicationTypeService<R>>>,
    Query(filter): Query<MedicationTypeFilter>,
) -> MedicationTypeResult<impl IntoResponse> {
    let list = service.list(filter).await?;
    Ok(Json(ApiResponse::data(list)))
}

/// Get a medication type by ID
#[utoipa::path(
    get,
    path = "/{id}",
    tag = "medication-types",
    params(
        ("id" = Uuid, Path, description = "Medication type ID"),
        MedicationTypeDetailParams,
    ),
    responses(
        (status = 200, description = "Type found", body = MedicationTypeDetail),
        (status = 404, description = "Type not found"),
        (status = 500, description = "Internal server error")
    )
)]
pub async fn get_medication_type<R: MedicationTypeRepository>(
    State(service): State<Arc<MedicationTypeService<R>>>,
    UuidPath(id): UuidPath,
    Query(params): Query<MedicationTypeDetailParams>,
) -> MedicationTypeResult<impl IntoResponse> {
    let detail = service.get(id, params.include_medications).await?;
    Ok(Json(ApiResponse::data(detail)))
}

/// List the medications of one type
#[utoipa::path(
    get,
    path = "/{id}/medications",
    tag = "medication-types",
    params(
        ("id" = Uuid, Path, description = "Medication type ID"),
        PageRequest,
    ),
    responses(
        (status = 200, description = "Paginated medications of the type", body = TypeMedicationsList),
        (status = 404, description = "Type not found"),
        (status = 500, description = "Internal server error")
    )
)]
pub async fn list_type_medications<R: MedicationTypeRepository>(
    State(service): State<Arc<MedicationTypeService<R>>>,
    UuidPath(id): UuidPath,
    Query(page): Query<PageRequest>,
) -> MedicationTypeResult<impl IntoResponse> {
    let (medications, pagination) = service.list_medications(id, page).await?;
    Ok(Json(ApiResponse::data(TypeMedicationsList {
        medications,
        pagination,
    })))
}

/// Create a medication type
#[utoipa::path(
    post,
    path = "",
    tag = "medication-types",
    request_body = CreateMedicationType,
    responses(
        (status = 201, description = "Type created", body = MedicationType),
        (status = 400, description = "Validation failed or duplicate description"),
        (status = 500, description = "Internal server error")
    )
)]
pub async fn create_medication_type<R: MedicationTypeRepository>(
    State(service): State<Arc<MedicationTypeService<R>>>,
    ValidatedJson(input): ValidatedJson<CreateMedicationType>,
) -> MedicationTypeResult<impl IntoResponse> {
    let created = service.create(input).await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::with_message(
            "Tipo de medicamento creado exitosamente",
            created,
        )),
    ))
}

/// Update a medication type
#[utoipa::path(
    put,
    path = "/{id}",
    tag = "medication-types",
    params(
        ("id" = Uuid, Path, description = "Medication type ID")
    ),
    request_body = UpdateMedicationType,
    responses(
        (status = 200, description = "Type updated", body = MedicationType),
        (status = 400, description = "Validation failed or duplicate description"),
        (status = 404, description = "Type not found"),
        (status = 500, description = "Internal server error")
    )
)]
pub async fn update_medication_type<R: MedicationTypeRepository>(
    State(service): State<Arc<MedicationTypeService<R>>>,
    UuidPath(id): UuidPath,
    ValidatedJson(input): ValidatedJson<UpdateMedicationType>,
) -> MedicationTypeResult<impl IntoResponse> {
    let updated = service.update(id, input).await?;
    Ok(Json(ApiResponse::with_message(
        "Tipo de medicamento actualizado exitosamente",
        updated,
    )))
}

/// Delete a medication type
#[utoipa::path(
    delete,
    path = "/{id}",
    tag = "medication-types",
    params(
        ("id" = Uuid, Path, description = "Medication type ID")
    ),
    responses(
        (status = 200, description = "Type deleted"),
        (status = 400, description = "Type still referenced by medications"),
        (status = 404, description = "Type not found"),
        (status = 500, description = "Internal server error")
    )
)]
pub async fn delete_medication_type<R: MedicationTypeRepository>(
    State(service): State<Arc<MedicationTypeService<R>>>,
    UuidPath(id): UuidPath,
) -> MedicationTypeResult<impl IntoResponse> {
    service.delete(id).await?;
    Ok(Json(ApiResponse::message(
        "Tipo de medicamento eliminado exitosamente",
    )))
}
