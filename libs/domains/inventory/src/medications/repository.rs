use async_trait::async_trait;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use uuid::Uuid;

use crate::medication_types::models::MedicationType;
use crate::medications::error::MedicationResult;
use crate::medications::models::{
    CreateMedication, Medication, MedicationFilter, StockOperation, StockUpdateResult,
    UpdateMedication,
};

/// Repository trait for Medication persistence. List and lookup methods
/// return the joined type alongside each record so responses can embed it
/// without a second round trip.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MedicationRepository: Send + Sync {
    /// Create a new medication
    async fn create(&self, input: CreateMedication) -> MedicationResult<Medication>;

    /// Get a medication and its type by ID
    async fn get_by_id(
        &self,
        id: Uuid,
    ) -> MedicationResult<Option<(Medication, Option<MedicationType>)>>;

    /// One filtered page, newest first, plus the total matching the filter
    async fn list(
        &self,
        filter: MedicationFilter,
        today: NaiveDate,
    ) -> MedicationResult<(Vec<(Medication, Option<MedicationType>)>, u64)>;

    /// Update an existing medication
    async fn update(&self, id: Uuid, input: UpdateMedication) -> MedicationResult<Medication>;

    /// Delete a medication by ID
    async fn delete(&self, id: Uuid) -> MedicationResult<bool>;

    /// Atomically apply a stock operation under a row lock. Fails with
    /// `NegativeStock` and writes nothing when subtract would go below zero.
    async fn update_stock(
        &self,
        id: Uuid,
        amount: i32,
        operation: StockOperation,
    ) -> MedicationResult<StockUpdateResult>;

    /// Total number of medications
    async fn count_all(&self) -> MedicationResult<u64>;

    /// Medications with stock at or below the low-stock threshold
    async fn count_low_stock(&self) -> MedicationResult<u64>;

    /// Medications expiring within [today, today + 30d]
    async fn count_near_expiry(&self, today: NaiveDate) -> MedicationResult<u64>;

    /// Medications with expiry strictly before today
    async fn count_expired(&self, today: NaiveDate) -> MedicationResult<u64>;

    /// Sum of unit prices across all medications
    async fn sum_unit_prices(&self) -> MedicationResult<Decimal>;

    /// The `limit` medications with the least stock, ascending
    async fn lowest_stock(
        &self,
        limit: u64,
    ) -> MedicationResult<Vec<(Medication, Option<MedicationType>)>>;

    /// Medications expiring within [today, today + days], soonest first
    async fn expiring_within(
        &self,
        today: NaiveDate,
        days: i64,
    ) -> MedicationResult<Vec<(Medication, Option<MedicationType>)>>;

    /// Already-expired medications, most recently expired first
    async fn expired_before(
        &self,
        today: NaiveDate,
    ) -> MedicationResult<Vec<(Medication, Option<MedicationType>)>>;
}
