use domain_inventory::medication_types::MedicationTypesApiDoc;
use domain_inventory::medications::MedicationsApiDoc;
use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    components(
        schemas(axum_helpers::ErrorResponse)
    ),
    info(
        title = "Pharmacy API",
        version = "0.1.0",
        description = "Medication inventory service: CRUD, stock control, classification and reports"
    ),
    servers(
        (url = "/api", description = "API base path")
    ),
    nest(
        (path = "/medications", api = MedicationsApiDoc),
        (path = "/medication-types", api = MedicationTypesApiDoc)
    )
)]
pub struct ApiDoc;
