pub mod health;

use axum::Router;
use domain_inventory::medication_types::{self, MedicationTypeService, PgMedicationTypeRepository};
use domain_inventory::medications::{self, MedicationService, PgMedicationRepository};
use sea_orm::DatabaseConnection;

/// Compose the API routes; both domains share the one connection pool
pub fn routes(db: DatabaseConnection) -> Router {
    let medications_service = MedicationService::new(
        PgMedicationRepository::new(db.clone()),
        PgMedicationTypeRepository::new(db.clone()),
    );
    let medication_types_service =
        MedicationTypeService::new(PgMedicationTypeRepository::new(db));

    Router::new()
        .nest("/medications", medications::router(medications_service))
        .nest(
            "/medication-types",
            medication_types::router(medication_types_service),
        )
}
