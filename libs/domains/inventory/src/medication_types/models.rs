use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

use crate::pagination::{default_limit, default_page, PageMeta, PageRequest};

/// A medication classification category
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MedicationType {
    pub id: Uuid,
    pub description: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// List row: a type plus how many medications reference it
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MedicationTypeWithCount {
    #[serde(flatten)]
    pub medication_type: MedicationType,
    pub total_medications: u64,
}

/// Detail response; medications are attached only when requested
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MedicationTypeDetail {
    #[serde(flatten)]
    pub medication_type: MedicationType,
    pub total_medications: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub medications: Option<Vec<crate::medications::models::Medication>>,
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct CreateMedicationType {
    #[validate(length(min = 1, max = 255, message = "descripción debe tener entre 1 y 255 caracteres"))]
    pub description: String,
}

#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
pub struct UpdateMedicationType {
    #[validate(length(min = 1, max = 255, message = "descripción debe tener entre 1 y 255 caracteres"))]
    pub description: Option<String>,
}

/// Query parameters for listing types
#[derive(Debug, Clone, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
pub struct MedicationTypeFilter {
    /// Case-insensitive substring match on description
    pub search: Option<String>,
    #[serde(default = "default_page")]
    pub page: u64,
    #[serde(default = "default_limit")]
    pub limit: u64,
}

impl Default for MedicationTypeFilter {
    fn default() -> Self {
        Self {
            search: None,
            page: 1,
            limit: 10,
        }
    }
}

impl MedicationTypeFilter {
    pub fn page_request(&self) -> PageRequest {
        PageRequest::new(self.page, self.limit)
    }
}

/// Query parameters for the type detail endpoint
#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
pub struct MedicationTypeDetailParams {
    #[serde(default)]
    pub include_medications: bool,
}

/// Paginated list payload
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MedicationTypeList {
    pub medication_types: Vec<MedicationTypeWithCount>,
    pub pagination: PageMeta,
}

/// Paginated payload for a single type's medications
#[derive(Debug, Serialize, ToSchema)]
pub struct TypeMedicationsList {
    pub medications: Vec<crate::medications::models::Medication>,
    pub pagination: PageMeta,
}
