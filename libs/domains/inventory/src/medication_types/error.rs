use axum::response::{IntoResponse, Response};
use axum_helpers::AppError;
use thiserror::Error;
use uuid::Uuid;
use validator::ValidationErrors;

#[derive(Debug, Error)]
pub enum MedicationTypeError {
    #[error("Medication type not found: {0}")]
    NotFound(Uuid),

    #[error("Duplicate description: {0}")]
    DuplicateDescription(String),

    #[error("Medication type is referenced by {0} medications")]
    InUse(u64),

    #[error("Validation failed")]
    Validation(#[from] ValidationErrors),

    #[error("Database error: {0}")]
    Database(String),
}

pub type MedicationTypeResult<T> = Result<T, MedicationTypeError>;

/// Map domain errors onto the wire envelope; messages are the
/// operator-facing Spanish strings.
impl From<MedicationTypeError> for AppError {
    fn from(err: MedicationTypeError) -> Self {
        match err {
            MedicationTypeError::NotFound(_) => {
                AppError::NotFound("Tipo de medicamento no encontrado".to_string())
            }
            MedicationTypeError::DuplicateDescription(_) => AppError::BadRequest(
                "Ya existe un tipo de medicamento con esta descripción".to_string(),
            ),
            MedicationTypeError::InUse(count) => AppError::BadRequestWithDetail {
                message:
                    "No se puede eliminar el tipo de medicamento porque tiene medicamentos asociados"
                        .to_string(),
                detail: format!("Medicamentos asociados: {}", count),
            },
            MedicationTypeError::Validation(errors) => AppError::Validation(errors),
            MedicationTypeError::Database(msg) => {
                AppError::Internal(format!("Database error: {}", msg))
            }
        }
    }
}

impl IntoResponse for MedicationTypeError {
    fn into_response(self) -> Response {
        let app_error: AppError = self.into();
        app_error.into_response()
    }
}

impl From<sea_orm::DbErr> for MedicationTypeError {
    fn from(err: sea_orm::DbErr) -> Self {
        MedicationTypeError::Database(err.to_string())
    }
}
