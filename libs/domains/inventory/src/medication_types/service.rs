use std::sync::Arc;
use tracing::instrument;
use uuid::Uuid;
use validator::Validate;

use crate::medication_types::error::{MedicationTypeError, MedicationTypeResult};
use crate::medication_types::models::{
    CreateMedicationType, MedicationType, MedicationTypeDetail, MedicationTypeFilter,
    MedicationTypeList, UpdateMedicationType,
};
use crate::medication_types::repository::MedicationTypeRepository;
use crate::pagination::{PageMeta, PageRequest};

/// Business logic for medication types: CRUD, case-insensitive uniqueness
/// of descriptions, and the referential delete guard.
#[derive(Clone)]
pub struct MedicationTypeService<R: MedicationTypeRepository> {
    repository: Arc<R>,
}

impl<R: MedicationTypeRepository> MedicationTypeService<R> {
    pub fn new(repository: R) -> Self {
        Self {
            repository: Arc::new(repository),
        }
    }

    pub async fn list(&self, filter: MedicationTypeFilter) -> MedicationTypeResult<MedicationTypeList> {
        let page = filter.page_request();
        let (medication_types, total) = self.repository.list(filter).await?;

        Ok(MedicationTypeList {
            medication_types,
            pagination: PageMeta::new(total, &page),
        })
    }

    #[instrument(skip(self), fields(type_id = %id))]
    pub async fn get(
        &self,
        id: Uuid,
        include_medications: bool,
    ) -> MedicationTypeResult<MedicationTypeDetail> {
        let medication_type = self
            .repository
            .get_by_id(id)
            .await?
            .ok_or(MedicationTypeError::NotFound(id))?;

        let total_medications = self.repository.count_medications(id).await?;
        let medications = if include_medications {
            Some(self.repository.medications_of(id).await?)
        } else {
            None
        };

        Ok(MedicationTypeDetail {
            medication_type,
            total_medications,
            medications,
        })
    }

    pub async fn list_medications(
        &self,
        id: Uuid,
        page: PageRequest,
    ) -> MedicationTypeResult<(Vec<crate::medications::models::Medication>, PageMeta)> {
        if !self.repository.exists(id).await? {
            return Err(MedicationTypeError::NotFound(id));
        }

        let (medications, total) = self.repository.medications_page(id, page).await?;
        Ok((medications, PageMeta::new(total, &page)))
    }

    #[instrument(skip(self, input))]
    pub async fn create(
        &self,
        mut input: CreateMedicationType,
    ) -> MedicationTypeResult<MedicationType> {
        input.validate()?;
        input.description = input.description.trim().to_string();

        if self
            .repository
            .description_taken(&input.description, None)
            .await?
        {
            return Err(MedicationTypeError::DuplicateDescription(input.description));
        }

        self.repository.create(input).await
    }

    #[instrument(skip(self, input), fields(type_id = %id))]
    pub async fn update(
        &self,
        id: Uuid,
        mut input: UpdateMedicationType,
    ) -> MedicationTypeResult<MedicationType> {
        input.validate()?;

        if self.repository.get_by_id(id).await?.is_none() {
            return Err(MedicationTypeError::NotFound(id));
        }

        if let Some(description) = input.description.take() {
            let trimmed = description.trim().to_string();
            if self
                .repository
                .description_taken(&trimmed, Some(id))
                .await?
            {
                return Err(MedicationTypeError::DuplicateDescription(trimmed));
            }
            input.description = Some(trimmed);
        }

        self.repository.update(id, input).await
    }

    #[instrument(skip(self), fields(type_id = %id))]
    pub async fn delete(&self, id: Uuid) -> MedicationTypeResult<()> {
        if self.repository.get_by_id(id).await?.is_none() {
            return Err(MedicationTypeError::NotFound(id));
        }

        let referencing = self.repository.count_medications(id).await?;
        if referencing > 0 {
            return Err(MedicationTypeError::InUse(referencing));
        }

        if !self.repository.delete(id).await? {
            return Err(MedicationTypeError::NotFound(id));
        }

        Ok(())
    }
}
