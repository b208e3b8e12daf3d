use async_trait::async_trait;
use uuid::Uuid;

use crate::medication_types::error::MedicationTypeResult;
use crate::medication_types::models::{
    CreateMedicationType, MedicationType, MedicationTypeFilter, MedicationTypeWithCount,
    UpdateMedicationType,
};

/// Repository trait for MedicationType persistence
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MedicationTypeRepository: Send + Sync {
    /// Create a new type
    async fn create(&self, input: CreateMedicationType) -> MedicationTypeResult<MedicationType>;

    /// Get a type by ID
    async fn get_by_id(&self, id: Uuid) -> MedicationTypeResult<Option<MedicationType>>;

    /// List types and their medication counts, plus the unpaginated total
    async fn list(
        &self,
        filter: MedicationTypeFilter,
    ) -> MedicationTypeResult<(Vec<MedicationTypeWithCount>, u64)>;

    /// Update an existing type
    async fn update(
        &self,
        id: Uuid,
        input: UpdateMedicationType,
    ) -> MedicationTypeResult<MedicationType>;

    /// Delete a type by ID; the service checks references first
    async fn delete(&self, id: Uuid) -> MedicationTypeResult<bool>;

    /// Whether a type with this ID exists
    async fn exists(&self, id: Uuid) -> MedicationTypeResult<bool>;

    /// Case-insensitive description lookup, optionally excluding one ID
    /// (used for the uniqueness check on update)
    async fn description_taken(
        &self,
        description: &str,
        exclude: Option<Uuid>,
    ) -> MedicationTypeResult<bool>;

    /// Count medications referencing a type
    async fn count_medications(&self, type_id: Uuid) -> MedicationTypeResult<u64>;

    /// All medications of a type (detail endpoint with includeMedications)
    async fn medications_of(
        &self,
        type_id: Uuid,
    ) -> MedicationTypeResult<Vec<crate::medications::models::Medication>>;

    /// One page of a type's medications, plus the unpaginated total
    async fn medications_page(
        &self,
        type_id: Uuid,
        page: crate::pagination::PageRequest,
    ) -> MedicationTypeResult<(Vec<crate::medications::models::Medication>, u64)>;
}
