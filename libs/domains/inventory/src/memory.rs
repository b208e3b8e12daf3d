//! In-memory implementation of both inventory repositories.
//!
//! Backs tests and local development without Postgres. Filter, ordering,
//! and stock semantics mirror the SQL implementations; the type and
//! medication maps share one store so referential checks work.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{Duration, NaiveDate, Utc};
use rust_decimal::Decimal;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::medication_types::error::{MedicationTypeError, MedicationTypeResult};
use crate::medication_types::models::{
    CreateMedicationType, MedicationType, MedicationTypeFilter, MedicationTypeWithCount,
    UpdateMedicationType,
};
use crate::medication_types::repository::MedicationTypeRepository;
use crate::medications::classification::{
    LOW_STOCK_THRESHOLD, NEAR_EXPIRY_HORIZON_DAYS, horizon_date,
};
use crate::medications::error::{MedicationError, MedicationResult};
use crate::medications::models::{
    CreateMedication, Medication, MedicationFilter, StockOperation, StockUpdateResult,
    UpdateMedication,
};
use crate::medications::repository::MedicationRepository;
use crate::pagination::PageRequest;

#[derive(Default)]
struct Store {
    medication_types: HashMap<Uuid, MedicationType>,
    medications: HashMap<Uuid, Medication>,
}

/// Shared in-memory store implementing both repository traits
#[derive(Clone, Default)]
pub struct InMemoryInventory {
    store: Arc<RwLock<Store>>,
}

impl InMemoryInventory {
    pub fn new() -> Self {
        Self::default()
    }
}

fn contains_ci(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}

fn matches_filter(medication: &Medication, filter: &MedicationFilter, today: NaiveDate) -> bool {
    if let Some(search) = filter.search.as_deref().filter(|s| !s.is_empty()) {
        if !contains_ci(&medication.description, search) {
            return false;
        }
    }
    if let Some(brand) = filter.brand.as_deref().filter(|b| !b.is_empty()) {
        if !contains_ci(&medication.brand, brand) {
            return false;
        }
    }
    if let Some(type_id) = filter.type_id {
        if medication.type_id != type_id {
            return false;
        }
    }
    if filter.low_stock == Some(true) && medication.stock > LOW_STOCK_THRESHOLD {
        return false;
    }

    // One expiry clause, expired winning over nearExpiry when both are set
    if filter.expired == Some(true) {
        if medication.expiry_date >= today {
            return false;
        }
    } else if filter.near_expiry == Some(true) {
        let horizon = today + Duration::days(NEAR_EXPIRY_HORIZON_DAYS);
        if medication.expiry_date < today || medication.expiry_date > horizon {
            return false;
        }
    }

    true
}

fn paginate<T>(mut rows: Vec<T>, page: &PageRequest) -> Vec<T> {
    let offset = page.offset() as usize;
    if offset >= rows.len() {
        return Vec::new();
    }
    let mut rows = rows.split_off(offset);
    rows.truncate(page.limit as usize);
    rows
}

#[async_trait]
impl MedicationTypeRepository for InMemoryInventory {
    async fn create(&self, input: CreateMedicationType) -> MedicationTypeResult<MedicationType> {
        let now = Utc::now();
        let medication_type = MedicationType {
            id: Uuid::now_v7(),
            description: input.description,
            created_at: now,
            updated_at: now,
        };

        let mut store = self.store.write().await;
        store
            .medication_types
            .insert(medication_type.id, medication_type.clone());
        Ok(medication_type)
    }

    async fn get_by_id(&self, id: Uuid) -> MedicationTypeResult<Option<MedicationType>> {
        let store = self.store.read().await;
        Ok(store.medication_types.get(&id).cloned())
    }

    async fn list(
        &self,
        filter: MedicationTypeFilter,
    ) -> MedicationTypeResult<(Vec<MedicationTypeWithCount>, u64)> {
        let page = filter.page_request();
        let store = self.store.read().await;

        let mut rows: Vec<MedicationType> = store
            .medication_types
            .values()
            .filter(|t| match filter.search.as_deref().filter(|s| !s.is_empty()) {
                Some(search) => contains_ci(&t.description, search),
                None => true,
            })
            .cloned()
            .collect();
        rows.sort_by(|a, b| b.created_at.cmp(&a.created_at));

        let total = rows.len() as u64;
        let rows = paginate(rows, &page)
            .into_iter()
            .map(|medication_type| {
                let total_medications = store
                    .medications
                    .values()
                    .filter(|m| m.type_id == medication_type.id)
                    .count() as u64;
                MedicationTypeWithCount {
                    medication_type,
                    total_medications,
                }
            })
            .collect();

        Ok((rows, total))
    }

    async fn update(
        &self,
        id: Uuid,
        input: UpdateMedicationType,
    ) -> MedicationTypeResult<MedicationType> {
        let mut store = self.store.write().await;
        let medication_type = store
            .medication_types
            .get_mut(&id)
            .ok_or(MedicationTypeError::NotFound(id))?;

        if let Some(description) = input.description {
            medication_type.description = description;
        }
        medication_type.updated_at = Utc::now();
        Ok(medication_type.clone())
    }

    async fn delete(&self, id: Uuid) -> MedicationTypeResult<bool> {
        let mut store = self.store.write().await;
        Ok(store.medication_types.remove(&id).is_some())
    }

    async fn exists(&self, id: Uuid) -> MedicationTypeResult<bool> {
        let store = self.store.read().await;
        Ok(store.medication_types.contains_key(&id))
    }

    async fn description_taken(
        &self,
        description: &str,
        exclude: Option<Uuid>,
    ) -> MedicationTypeResult<bool> {
        let store = self.store.read().await;
        Ok(store.medication_types.values().any(|t| {
            t.description.to_lowercase() == description.to_lowercase() && Some(t.id) != exclude
        }))
    }

    async fn count_medications(&self, type_id: Uuid) -> MedicationTypeResult<u64> {
        let store = self.store.read().await;
        Ok(store
            .medications
            .values()
            .filter(|m| m.type_id == type_id)
            .count() as u64)
    }

    async fn medications_of(&self, type_id: Uuid) -> MedicationTypeResult<Vec<Medication>> {
        let store = self.store.read().await;
        let mut rows: Vec<Medication> = store
            .medications
            .values()
            .filter(|m| m.type_id == type_id)
            .cloned()
            .collect();
        rows.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(rows)
    }

    async fn medications_page(
        &self,
        type_id: Uuid,
        page: PageRequest,
    ) -> MedicationTypeResult<(Vec<Medication>, u64)> {
        let rows = self.medications_of(type_id).await?;
        let total = rows.len() as u64;
        Ok((paginate(rows, &page), total))
    }
}

#[async_trait]
impl MedicationRepository for InMemoryInventory {
    async fn create(&self, input: CreateMedication) -> MedicationResult<Medication> {
        let now = Utc::now();
        let medication = Medication {
            id: Uuid::now_v7(),
            description: input.description,
            manufacture_date: input.manufacture_date,
            expiry_date: input.expiry_date,
            packaging: input.packaging,
            stock: input.stock,
            unit_price: input.unit_price,
            package_price: input.package_price,
            brand: input.brand,
            type_id: input.type_id,
            created_at: now,
            updated_at: now,
        };

        let mut store = self.store.write().await;
        store.medications.insert(medication.id, medication.clone());
        Ok(medication)
    }

    async fn get_by_id(
        &self,
        id: Uuid,
    ) -> MedicationResult<Option<(Medication, Option<MedicationType>)>> {
        let store = self.store.read().await;
        Ok(store.medications.get(&id).map(|medication| {
            let medication_type = store.medication_types.get(&medication.type_id).cloned();
            (medication.clone(), medication_type)
        }))
    }

    async fn list(
        &self,
        filter: MedicationFilter,
        today: NaiveDate,
    ) -> MedicationResult<(Vec<(Medication, Option<MedicationType>)>, u64)> {
        let page = filter.page_request();
        let store = self.store.read().await;

        let mut rows: Vec<Medication> = store
            .medications
            .values()
            .filter(|m| matches_filter(m, &filter, today))
            .cloned()
            .collect();
        rows.sort_by(|a, b| b.created_at.cmp(&a.created_at));

        let total = rows.len() as u64;
        let rows = paginate(rows, &page)
            .into_iter()
            .map(|medication| {
                let medication_type = store.medication_types.get(&medication.type_id).cloned();
                (medication, medication_type)
            })
            .collect();

        Ok((rows, total))
    }

    async fn update(&self, id: Uuid, input: UpdateMedication) -> MedicationResult<Medication> {
        let mut store = self.store.write().await;
        let medication = store
            .medications
            .get_mut(&id)
            .ok_or(MedicationError::NotFound(id))?;

        if let Some(description) = input.description {
            medication.description = description;
        }
        if let Some(manufacture_date) = input.manufacture_date {
            medication.manufacture_date = manufacture_date;
        }
        if let Some(expiry_date) = input.expiry_date {
            medication.expiry_date = expiry_date;
        }
        if let Some(packaging) = input.packaging {
            medication.packaging = packaging;
        }
        if let Some(stock) = input.stock {
            medication.stock = stock;
        }
        if let Some(unit_price) = input.unit_price {
            medication.unit_price = unit_price;
        }
        if let Some(package_price) = input.package_price {
            medication.package_price = package_price;
        }
        if let Some(brand) = input.brand {
            medication.brand = brand;
        }
        if let Some(type_id) = input.type_id {
            medication.type_id = type_id;
        }
        medication.updated_at = Utc::now();
        Ok(medication.clone())
    }

    async fn delete(&self, id: Uuid) -> MedicationResult<bool> {
        let mut store = self.store.write().await;
        Ok(store.medications.remove(&id).is_some())
    }

    async fn update_stock(
        &self,
        id: Uuid,
        amount: i32,
        operation: StockOperation,
    ) -> MedicationResult<StockUpdateResult> {
        // Single write lock covers read-compute-write, so the mutation is
        // atomic and a rejected subtract leaves the record untouched
        let mut store = self.store.write().await;
        let medication = store
            .medications
            .get_mut(&id)
            .ok_or(MedicationError::NotFound(id))?;

        let previous_stock = medication.stock;
        let new_stock = match operation {
            StockOperation::Set => amount,
            StockOperation::Add => previous_stock.saturating_add(amount),
            StockOperation::Subtract => previous_stock - amount,
        };

        if new_stock < 0 {
            return Err(MedicationError::NegativeStock);
        }

        medication.stock = new_stock;
        medication.updated_at = Utc::now();

        Ok(StockUpdateResult {
            id,
            previous_stock,
            new_stock,
            operation,
        })
    }

    async fn count_all(&self) -> MedicationResult<u64> {
        let store = self.store.read().await;
        Ok(store.medications.len() as u64)
    }

    async fn count_low_stock(&self) -> MedicationResult<u64> {
        let store = self.store.read().await;
        Ok(store
            .medications
            .values()
            .filter(|m| m.stock <= LOW_STOCK_THRESHOLD)
            .count() as u64)
    }

    async fn count_near_expiry(&self, today: NaiveDate) -> MedicationResult<u64> {
        let horizon = today + Duration::days(NEAR_EXPIRY_HORIZON_DAYS);
        let store = self.store.read().await;
        Ok(store
            .medications
            .values()
            .filter(|m| m.expiry_date >= today && m.expiry_date <= horizon)
            .count() as u64)
    }

    async fn count_expired(&self, today: NaiveDate) -> MedicationResult<u64> {
        let store = self.store.read().await;
        Ok(store
            .medications
            .values()
            .filter(|m| m.expiry_date < today)
            .count() as u64)
    }

    async fn sum_unit_prices(&self) -> MedicationResult<Decimal> {
        let store = self.store.read().await;
        Ok(store.medications.values().map(|m| m.unit_price).sum())
    }

    async fn lowest_stock(
        &self,
        limit: u64,
    ) -> MedicationResult<Vec<(Medication, Option<MedicationType>)>> {
        let store = self.store.read().await;
        let mut rows: Vec<Medication> = store.medications.values().cloned().collect();
        rows.sort_by_key(|m| m.stock);
        rows.truncate(limit as usize);

        Ok(rows
            .into_iter()
            .map(|medication| {
                let medication_type = store.medication_types.get(&medication.type_id).cloned();
                (medication, medication_type)
            })
            .collect())
    }

    async fn expiring_within(
        &self,
        today: NaiveDate,
        days: i64,
    ) -> MedicationResult<Vec<(Medication, Option<MedicationType>)>> {
        let horizon = horizon_date(today, days);
        let store = self.store.read().await;

        let mut rows: Vec<Medication> = store
            .medications
            .values()
            .filter(|m| m.expiry_date >= today && m.expiry_date <= horizon)
            .cloned()
            .collect();
        rows.sort_by_key(|m| m.expiry_date);

        Ok(rows
            .into_iter()
            .map(|medication| {
                let medication_type = store.medication_types.get(&medication.type_id).cloned();
                (medication, medication_type)
            })
            .collect())
    }

    async fn expired_before(
        &self,
        today: NaiveDate,
    ) -> MedicationResult<Vec<(Medication, Option<MedicationType>)>> {
        let store = self.store.read().await;

        let mut rows: Vec<Medication> = store
            .medications
            .values()
            .filter(|m| m.expiry_date < today)
            .cloned()
            .collect();
        rows.sort_by(|a, b| b.expiry_date.cmp(&a.expiry_date));

        Ok(rows
            .into_iter()
            .map(|medication| {
                let medication_type = store.medication_types.get(&medication.type_id).cloned();
                (medication, medication_type)
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    async fn seed_type(store: &InMemoryInventory, description: &str) -> MedicationType {
        MedicationTypeRepository::create(
            store,
            CreateMedicationType {
                description: description.to_string(),
            },
        )
        .await
        .unwrap()
    }

    async fn seed_medication(
        store: &InMemoryInventory,
        description: &str,
        stock: i32,
        expiry_offset_days: i64,
        type_id: Uuid,
    ) -> Medication {
        let today = Utc::now().date_naive();
        MedicationRepository::create(
            store,
            CreateMedication {
                description: description.to_string(),
                manufacture_date: today - Duration::days(60),
                expiry_date: today + Duration::days(expiry_offset_days),
                packaging: "Caja x 30".to_string(),
                stock,
                unit_price: dec!(1.50),
                package_price: dec!(40.00),
                brand: "Genfar".to_string(),
                type_id,
            },
        )
        .await
        .unwrap()
    }

    #[tokio::test]
    async fn test_expired_filter_overrides_near_expiry() {
        let store = InMemoryInventory::new();
        let t = seed_type(&store, "Analgésico").await;
        seed_medication(&store, "healthy", 50, 365, t.id).await;
        seed_medication(&store, "soon", 50, 10, t.id).await;
        seed_medication(&store, "gone", 50, -10, t.id).await;

        let filter = MedicationFilter {
            near_expiry: Some(true),
            expired: Some(true),
            ..Default::default()
        };
        let today = Utc::now().date_naive();
        let (rows, total) = MedicationRepository::list(&store, filter, today)
            .await
            .unwrap();

        assert_eq!(total, 1);
        assert_eq!(rows[0].0.description, "gone");
    }

    #[tokio::test]
    async fn test_rejected_subtract_leaves_stock_untouched() {
        let store = InMemoryInventory::new();
        let t = seed_type(&store, "Antibiótico").await;
        let m = seed_medication(&store, "amoxicilina", 100, 365, t.id).await;

        let result = store
            .update_stock(m.id, 150, StockOperation::Subtract)
            .await;
        assert!(matches!(result, Err(MedicationError::NegativeStock)));

        let (unchanged, _) = MedicationRepository::get_by_id(&store, m.id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(unchanged.stock, 100);
    }

    #[tokio::test]
    async fn test_stock_operations_report_previous_and_new() {
        let store = InMemoryInventory::new();
        let t = seed_type(&store, "Vitaminas").await;
        let m = seed_medication(&store, "complejo b", 10, 365, t.id).await;

        let result = store.update_stock(m.id, 5, StockOperation::Add).await.unwrap();
        assert_eq!((result.previous_stock, result.new_stock), (10, 15));

        let result = store
            .update_stock(m.id, 3, StockOperation::Subtract)
            .await
            .unwrap();
        assert_eq!((result.previous_stock, result.new_stock), (15, 12));

        let result = store.update_stock(m.id, 40, StockOperation::Set).await.unwrap();
        assert_eq!((result.previous_stock, result.new_stock), (12, 40));
    }

    #[tokio::test]
    async fn test_inventory_value_sums_unit_prices_only() {
        let store = InMemoryInventory::new();
        let t = seed_type(&store, "Analgésico").await;
        seed_medication(&store, "a", 100, 365, t.id).await;
        seed_medication(&store, "b", 200, 365, t.id).await;

        // 1.50 + 1.50, regardless of the 300 units on hand
        assert_eq!(store.sum_unit_prices().await.unwrap(), dec!(3.00));
    }

    #[tokio::test]
    async fn test_expiry_partitions_are_disjoint_and_ordered() {
        let store = InMemoryInventory::new();
        let t = seed_type(&store, "Antibiótico").await;
        seed_medication(&store, "in 5", 10, 5, t.id).await;
        seed_medication(&store, "in 25", 10, 25, t.id).await;
        seed_medication(&store, "15 ago", 10, -15, t.id).await;
        seed_medication(&store, "2 ago", 10, -2, t.id).await;
        seed_medication(&store, "far", 10, 400, t.id).await;

        let today = Utc::now().date_naive();
        let upcoming = store.expiring_within(today, 30).await.unwrap();
        let expired = store.expired_before(today).await.unwrap();

        let upcoming: Vec<_> = upcoming.iter().map(|(m, _)| m.description.as_str()).collect();
        let expired: Vec<_> = expired.iter().map(|(m, _)| m.description.as_str()).collect();

        // soonest first, then most recently expired first
        assert_eq!(upcoming, vec!["in 5", "in 25"]);
        assert_eq!(expired, vec!["2 ago", "15 ago"]);
    }

    #[tokio::test]
    async fn test_expiring_within_clamps_extreme_horizons() {
        let store = InMemoryInventory::new();
        let t = seed_type(&store, "Antibiótico").await;
        seed_medication(&store, "near", 10, 20, t.id).await;
        seed_medication(&store, "far", 10, 5_000, t.id).await;
        seed_medication(&store, "gone", 10, -3, t.id).await;

        let today = Utc::now().date_naive();

        // a huge horizon saturates at the calendar bounds instead of overflowing
        let upcoming = store.expiring_within(today, 1_000_000_000).await.unwrap();
        assert_eq!(upcoming.len(), 2);

        let upcoming = store.expiring_within(today, i64::MAX).await.unwrap();
        assert_eq!(upcoming.len(), 2);

        let upcoming = store.expiring_within(today, i64::MIN).await.unwrap();
        assert!(upcoming.is_empty());
    }

    #[tokio::test]
    async fn test_create_then_fetch_preserves_all_fields() {
        let store = InMemoryInventory::new();
        let t = seed_type(&store, "Analgésico").await;
        let today = Utc::now().date_naive();

        let input = CreateMedication {
            description: "Paracetamol 500mg".to_string(),
            manufacture_date: today - Duration::days(90),
            expiry_date: today + Duration::days(180),
            packaging: "Frasco x 60".to_string(),
            stock: 33,
            unit_price: dec!(0.75),
            package_price: dec!(39.90),
            brand: "MK".to_string(),
            type_id: t.id,
        };
        let created = MedicationRepository::create(&store, input.clone())
            .await
            .unwrap();

        let (fetched, fetched_type) = MedicationRepository::get_by_id(&store, created.id)
            .await
            .unwrap()
            .unwrap();

        assert_eq!(fetched, created);
        assert_eq!(fetched.description, input.description);
        assert_eq!(fetched.manufacture_date, input.manufacture_date);
        assert_eq!(fetched.expiry_date, input.expiry_date);
        assert_eq!(fetched.packaging, input.packaging);
        assert_eq!(fetched.stock, input.stock);
        assert_eq!(fetched.unit_price, input.unit_price);
        assert_eq!(fetched.package_price, input.package_price);
        assert_eq!(fetched.brand, input.brand);
        assert_eq!(fetched.type_id, input.type_id);
        assert_eq!(fetched_type.map(|ft| ft.id), Some(t.id));
    }

    #[tokio::test]
    async fn test_lowest_stock_is_ascending_and_capped() {
        let store = InMemoryInventory::new();
        let t = seed_type(&store, "Analgésico").await;
        for (name, stock) in [("a", 40), ("b", 5), ("c", 12), ("d", 0), ("e", 99), ("f", 7)] {
            seed_medication(&store, name, stock, 365, t.id).await;
        }

        let rows = store.lowest_stock(5).await.unwrap();
        let stocks: Vec<i32> = rows.iter().map(|(m, _)| m.stock).collect();
        assert_eq!(stocks, vec![0, 5, 7, 12, 40]);
    }

    #[tokio::test]
    async fn test_type_medication_count_and_case_insensitive_uniqueness() {
        let store = InMemoryInventory::new();
        let t = seed_type(&store, "Analgésico").await;
        seed_medication(&store, "a", 10, 365, t.id).await;
        seed_medication(&store, "b", 10, 365, t.id).await;

        assert_eq!(store.count_medications(t.id).await.unwrap(), 2);
        assert!(store.description_taken("ANALGÉSICO", None).await.unwrap());
        assert!(!store.description_taken("ANALGÉSICO", Some(t.id)).await.unwrap());
    }

    #[tokio::test]
    async fn test_list_pagination_counts_all_matches() {
        let store = InMemoryInventory::new();
        let t = seed_type(&store, "Analgésico").await;
        for i in 0..7 {
            seed_medication(&store, &format!("med {i}"), 10, 365, t.id).await;
        }

        let filter = MedicationFilter {
            page: 2,
            limit: 3,
            ..Default::default()
        };
        let today = Utc::now().date_naive();
        let (rows, total) = MedicationRepository::list(&store, filter, today)
            .await
            .unwrap();

        assert_eq!(total, 7);
        assert_eq!(rows.len(), 3);
    }
}
