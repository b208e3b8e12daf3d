use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::{Validate, ValidationError};

use crate::medication_types::models::MedicationType;
use crate::medications::classification;
use crate::pagination::{default_limit, default_page, PageMeta, PageRequest};

/// A stored medication record. Classification flags are never part of this
/// type; they are derived at serialization time in [`MedicationResponse`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Medication {
    pub id: Uuid,
    pub description: String,
    pub manufacture_date: NaiveDate,
    pub expiry_date: NaiveDate,
    pub packaging: String,
    pub stock: i32,
    pub unit_price: Decimal,
    pub package_price: Decimal,
    pub brand: String,
    pub type_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Read payload: the record plus derived flags and, when joined, its type
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MedicationResponse {
    #[serde(flatten)]
    pub medication: Medication,
    pub is_expired: bool,
    pub is_near_expiry: bool,
    pub is_low_stock: bool,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub medication_type: Option<MedicationType>,
}

impl MedicationResponse {
    /// Annotate a record with flags computed against the given instant.
    pub fn annotate(
        medication: Medication,
        medication_type: Option<MedicationType>,
        now: DateTime<Utc>,
    ) -> Self {
        let is_expired = classification::is_expired(medication.expiry_date, now);
        let is_near_expiry = classification::is_near_expiry(
            medication.expiry_date,
            now,
            classification::NEAR_EXPIRY_HORIZON_DAYS,
        );
        let is_low_stock =
            classification::is_low_stock(medication.stock, classification::LOW_STOCK_THRESHOLD);

        Self {
            medication,
            is_expired,
            is_near_expiry,
            is_low_stock,
            medication_type,
        }
    }
}

fn validate_price(value: &Decimal) -> Result<(), ValidationError> {
    if value.is_sign_negative() {
        let mut err = ValidationError::new("negative_price");
        err.message = Some("el precio no puede ser negativo".into());
        return Err(err);
    }
    Ok(())
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateMedication {
    #[validate(length(min = 1, max = 500, message = "descripción debe tener entre 1 y 500 caracteres"))]
    pub description: String,
    pub manufacture_date: NaiveDate,
    pub expiry_date: NaiveDate,
    #[validate(length(min = 1, max = 100, message = "presentación debe tener entre 1 y 100 caracteres"))]
    pub packaging: String,
    #[serde(default)]
    #[validate(range(min = 0, message = "el stock no puede ser negativo"))]
    pub stock: i32,
    #[validate(custom(function = "validate_price"))]
    pub unit_price: Decimal,
    #[validate(custom(function = "validate_price"))]
    pub package_price: Decimal,
    #[validate(length(min = 1, max = 100, message = "marca debe tener entre 1 y 100 caracteres"))]
    pub brand: String,
    pub type_id: Uuid,
}

#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateMedication {
    #[validate(length(min = 1, max = 500, message = "descripción debe tener entre 1 y 500 caracteres"))]
    pub description: Option<String>,
    pub manufacture_date: Option<NaiveDate>,
    pub expiry_date: Option<NaiveDate>,
    #[validate(length(min = 1, max = 100, message = "presentación debe tener entre 1 y 100 caracteres"))]
    pub packaging: Option<String>,
    #[validate(range(min = 0, message = "el stock no puede ser negativo"))]
    pub stock: Option<i32>,
    #[validate(custom(function = "validate_price"))]
    pub unit_price: Option<Decimal>,
    #[validate(custom(function = "validate_price"))]
    pub package_price: Option<Decimal>,
    #[validate(length(min = 1, max = 100, message = "marca debe tener entre 1 y 100 caracteres"))]
    pub brand: Option<String>,
    pub type_id: Option<Uuid>,
}

/// Optional, independent list filters; any subset is valid
#[derive(Debug, Clone, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
pub struct MedicationFilter {
    /// Case-insensitive substring match on description
    pub search: Option<String>,
    /// Case-insensitive substring match on brand
    pub brand: Option<String>,
    /// Exact type match
    pub type_id: Option<Uuid>,
    /// stock <= 10
    pub low_stock: Option<bool>,
    /// expiryDate within [today, today+30d]
    pub near_expiry: Option<bool>,
    /// expiryDate < today
    pub expired: Option<bool>,
    #[serde(default = "default_page")]
    pub page: u64,
    #[serde(default = "default_limit")]
    pub limit: u64,
}

impl Default for MedicationFilter {
    fn default() -> Self {
        Self {
            search: None,
            brand: None,
            type_id: None,
            low_stock: None,
            near_expiry: None,
            expired: None,
            page: 1,
            limit: 10,
        }
    }
}

impl MedicationFilter {
    pub fn page_request(&self) -> PageRequest {
        PageRequest::new(self.page, self.limit)
    }
}

/// Stock mutation semantics. Unknown wire values fall back to `set`;
/// that permissive default is part of the contract.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, ToSchema, strum::Display)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum StockOperation {
    #[default]
    Set,
    Add,
    Subtract,
}

impl<'de> Deserialize<'de> for StockOperation {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        Ok(match raw.as_str() {
            "add" => StockOperation::Add,
            "subtract" => StockOperation::Subtract,
            _ => StockOperation::Set,
        })
    }
}

/// Body of `PUT /medications/{id}/stock`
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct UpdateStockRequest {
    /// Amount the operation applies (the new value for `set`)
    #[validate(range(min = 0, message = "El stock no puede ser negativo"))]
    pub stock: i32,
    #[serde(default)]
    pub operation: StockOperation,
}

/// Stock mutation outcome
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct StockUpdateResult {
    pub id: Uuid,
    pub previous_stock: i32,
    pub new_stock: i32,
    pub operation: StockOperation,
}

/// Paginated list payload
#[derive(Debug, Serialize, ToSchema)]
pub struct MedicationList {
    pub medications: Vec<MedicationResponse>,
    pub pagination: PageMeta,
}

/// Dashboard statistics block. Report keys stay in Spanish; the frontend
/// consumes them verbatim.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct DashboardStats {
    #[serde(rename = "totalMedicamentos")]
    pub total_medications: u64,
    #[serde(rename = "stockBajo")]
    pub low_stock: u64,
    #[serde(rename = "proximosVencer")]
    pub near_expiry: u64,
    #[serde(rename = "vencidos")]
    pub expired: u64,
    #[serde(rename = "valorInventario")]
    pub inventory_value: Decimal,
}

/// Minimal type reference carried by the top-low-stock rows
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct LowStockType {
    pub description: String,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LowStockItem {
    pub id: Uuid,
    pub description: String,
    pub stock: i32,
    pub brand: String,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub medication_type: Option<LowStockType>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct Dashboard {
    #[serde(rename = "estadisticas")]
    pub stats: DashboardStats,
    #[serde(rename = "topLowStock")]
    pub top_low_stock: Vec<LowStockItem>,
}

fn default_days() -> i64 {
    30
}

/// Query parameters for the expiry report
#[derive(Debug, Clone, Deserialize, IntoParams)]
pub struct ExpiryReportQuery {
    /// Horizon in days for the upcoming partition
    #[serde(default = "default_days")]
    pub days: i64,
}

impl Default for ExpiryReportQuery {
    fn default() -> Self {
        Self { days: 30 }
    }
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ExpiryReportParams {
    #[serde(rename = "diasConsultados")]
    pub days_queried: i64,
    #[serde(rename = "fechaConsulta")]
    pub queried_at: NaiveDate,
}

/// Two disjoint, ordered partitions plus the echoed parameters
#[derive(Debug, Serialize, ToSchema)]
pub struct ExpiryReport {
    #[serde(rename = "proximosVencer")]
    pub upcoming: Vec<MedicationResponse>,
    #[serde(rename = "vencidos")]
    pub expired: Vec<MedicationResponse>,
    #[serde(rename = "parametros")]
    pub params: ExpiryReportParams,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn sample_create() -> CreateMedication {
        CreateMedication {
            description: "Paracetamol 500mg".to_string(),
            manufacture_date: NaiveDate::from_ymd_opt(2025, 1, 10).unwrap(),
            expiry_date: NaiveDate::from_ymd_opt(2027, 1, 10).unwrap(),
            packaging: "Caja x 100".to_string(),
            stock: 50,
            unit_price: dec!(0.50),
            package_price: dec!(45.00),
            brand: "Genfar".to_string(),
            type_id: Uuid::now_v7(),
        }
    }

    #[test]
    fn test_create_valid_input_passes() {
        assert!(sample_create().validate().is_ok());
    }

    #[test]
    fn test_create_rejects_negative_stock() {
        let mut input = sample_create();
        input.stock = -1;
        assert!(input.validate().is_err());
    }

    #[test]
    fn test_create_rejects_negative_price() {
        let mut input = sample_create();
        input.unit_price = dec!(-0.01);
        assert!(input.validate().is_err());
    }

    #[test]
    fn test_stock_operation_known_values() {
        assert_eq!(
            serde_json::from_str::<StockOperation>("\"add\"").unwrap(),
            StockOperation::Add
        );
        assert_eq!(
            serde_json::from_str::<StockOperation>("\"subtract\"").unwrap(),
            StockOperation::Subtract
        );
        assert_eq!(
            serde_json::from_str::<StockOperation>("\"set\"").unwrap(),
            StockOperation::Set
        );
    }

    #[test]
    fn test_stock_operation_unknown_falls_back_to_set() {
        assert_eq!(
            serde_json::from_str::<StockOperation>("\"restock\"").unwrap(),
            StockOperation::Set
        );
    }

    #[test]
    fn test_stock_request_defaults_to_set() {
        let req: UpdateStockRequest = serde_json::from_str(r#"{"stock": 5}"#).unwrap();
        assert_eq!(req.operation, StockOperation::Set);
        assert_eq!(req.stock, 5);
    }

    #[test]
    fn test_filter_defaults() {
        let filter: MedicationFilter = serde_json::from_str("{}").unwrap();
        assert_eq!(filter.page, 1);
        assert_eq!(filter.limit, 10);
        assert!(filter.expired.is_none());
    }

    #[test]
    fn test_response_serializes_flags_and_type_key() {
        let medication = Medication {
            id: Uuid::now_v7(),
            description: "Ibuprofeno 400mg".to_string(),
            manufacture_date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            expiry_date: NaiveDate::from_ymd_opt(2024, 6, 1).unwrap(),
            packaging: "Caja x 30".to_string(),
            stock: 4,
            unit_price: dec!(0.80),
            package_price: dec!(22.00),
            brand: "La Santé".to_string(),
            type_id: Uuid::now_v7(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        let now = chrono::DateTime::parse_from_rfc3339("2025-01-01T12:00:00Z")
            .unwrap()
            .with_timezone(&Utc);

        let json =
            serde_json::to_value(MedicationResponse::annotate(medication, None, now)).unwrap();
        assert_eq!(json["isExpired"], true);
        assert_eq!(json["isNearExpiry"], false);
        assert_eq!(json["isLowStock"], true);
        assert!(json.get("type").is_none());
    }
}
