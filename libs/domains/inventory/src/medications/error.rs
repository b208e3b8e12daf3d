use axum::response::{IntoResponse, Response};
use axum_helpers::AppError;
use thiserror::Error;
use uuid::Uuid;
use validator::ValidationErrors;

#[derive(Debug, Error)]
pub enum MedicationError {
    #[error("Medication not found: {0}")]
    NotFound(Uuid),

    #[error("Medication type does not exist: {0}")]
    UnknownType(Uuid),

    #[error("Stock would become negative")]
    NegativeStock,

    #[error("Validation failed")]
    Validation(#[from] ValidationErrors),

    #[error("Database error: {0}")]
    Database(String),
}

pub type MedicationResult<T> = Result<T, MedicationError>;

/// Map domain errors onto the wire envelope; messages are the
/// operator-facing Spanish strings.
impl From<MedicationError> for AppError {
    fn from(err: MedicationError) -> Self {
        match err {
            MedicationError::NotFound(_) => {
                AppError::NotFound("Medicamento no encontrado".to_string())
            }
            MedicationError::UnknownType(_) => {
                AppError::BadRequest("El tipo de medicamento especificado no existe".to_string())
            }
            MedicationError::NegativeStock => {
                AppError::BadRequest("El stock no puede ser negativo".to_string())
            }
            MedicationError::Validation(errors) => AppError::Validation(errors),
            MedicationError::Database(msg) => AppError::Internal(format!("Database error: {}", msg)),
        }
    }
}

impl IntoResponse for MedicationError {
    fn into_response(self) -> Response {
        let app_error: AppError = self.into();
        app_error.into_response()
    }
}

impl From<sea_orm::DbErr> for MedicationError {
    fn from(err: sea_orm::DbErr) -> Self {
        MedicationError::Database(err.to_string())
    }
}
