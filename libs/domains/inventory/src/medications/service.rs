use std::sync::Arc;

use chrono::{DateTime, NaiveDate, Utc};
use tracing::instrument;
use uuid::Uuid;
use validator::{Validate, ValidationError, ValidationErrors};

use crate::medication_types::repository::MedicationTypeRepository;
use crate::medications::error::{MedicationError, MedicationResult};
use crate::medications::models::{
    CreateMedication, Dashboard, DashboardStats, ExpiryReport, ExpiryReportParams, LowStockItem,
    LowStockType, Medication, MedicationFilter, MedicationList, MedicationResponse,
    StockUpdateResult, UpdateMedication, UpdateStockRequest,
};
use crate::medications::repository::MedicationRepository;
use crate::medication_types::models::MedicationType;
use crate::pagination::PageMeta;

const TOP_LOW_STOCK_LIMIT: u64 = 5;

/// Business logic for medications: CRUD with referential and date checks,
/// atomic stock mutations, and the dashboard and expiry reports.
#[derive(Clone)]
pub struct MedicationService<R, T>
where
    R: MedicationRepository,
    T: MedicationTypeRepository,
{
    repository: Arc<R>,
    types: Arc<T>,
}

/// Cross-field date rules that the derive-level validators cannot express
fn validate_dates(
    manufacture_date: NaiveDate,
    expiry_date: NaiveDate,
    today: NaiveDate,
) -> Result<(), ValidationErrors> {
    let mut errors = ValidationErrors::new();

    if manufacture_date > today {
        let mut err = ValidationError::new("future_manufacture_date");
        err.message = Some("la fecha de fabricación no puede ser futura".into());
        errors.add("manufactureDate".into(), err);
    }

    if expiry_date <= manufacture_date {
        let mut err = ValidationError::new("expiry_before_manufacture");
        err.message =
            Some("la fecha de vencimiento debe ser posterior a la fecha de fabricación".into());
        errors.add("expiryDate".into(), err);
    } else if expiry_date <= today {
        let mut err = ValidationError::new("expiry_not_future");
        err.message = Some("la fecha de vencimiento debe ser futura".into());
        errors.add("expiryDate".into(), err);
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

impl<R, T> MedicationService<R, T>
where
    R: MedicationRepository,
    T: MedicationTypeRepository,
{
    pub fn new(repository: R, types: T) -> Self {
        Self {
            repository: Arc::new(repository),
            types: Arc::new(types),
        }
    }

    async fn type_exists(&self, type_id: Uuid) -> MedicationResult<bool> {
        self.types
            .exists(type_id)
            .await
            .map_err(|err| MedicationError::Database(err.to_string()))
    }

    async fn type_of(&self, type_id: Uuid) -> MedicationResult<Option<MedicationType>> {
        self.types
            .get_by_id(type_id)
            .await
            .map_err(|err| MedicationError::Database(err.to_string()))
    }

    pub async fn list(&self, filter: MedicationFilter) -> MedicationResult<MedicationList> {
        let now = Utc::now();
        let page = filter.page_request();
        let (rows, total) = self.repository.list(filter, now.date_naive()).await?;

        let medications = annotate_all(rows, now);
        Ok(MedicationList {
            medications,
            pagination: PageMeta::new(total, &page),
        })
    }

    #[instrument(skip(self), fields(medication_id = %id))]
    pub async fn get(&self, id: Uuid) -> MedicationResult<MedicationResponse> {
        let (medication, medication_type) = self
            .repository
            .get_by_id(id)
            .await?
            .ok_or(MedicationError::NotFound(id))?;

        Ok(MedicationResponse::annotate(
            medication,
            medication_type,
            Utc::now(),
        ))
    }

    #[instrument(skip(self, input))]
    pub async fn create(&self, input: CreateMedication) -> MedicationResult<MedicationResponse> {
        input.validate()?;
        let now = Utc::now();
        validate_dates(input.manufacture_date, input.expiry_date, now.date_naive())?;

        if !self.type_exists(input.type_id).await? {
            return Err(MedicationError::UnknownType(input.type_id));
        }

        let medication = self.repository.create(input).await?;
        let medication_type = self.type_of(medication.type_id).await?;
        Ok(MedicationResponse::annotate(medication, medication_type, now))
    }

    #[instrument(skip(self, input), fields(medication_id = %id))]
    pub async fn update(
        &self,
        id: Uuid,
        input: UpdateMedication,
    ) -> MedicationResult<MedicationResponse> {
        input.validate()?;

        let (existing, _) = self
            .repository
            .get_by_id(id)
            .await?
            .ok_or(MedicationError::NotFound(id))?;

        // Date rules apply to the record as it will be after the update
        let now = Utc::now();
        let manufacture_date = input.manufacture_date.unwrap_or(existing.manufacture_date);
        let expiry_date = input.expiry_date.unwrap_or(existing.expiry_date);
        validate_dates(manufacture_date, expiry_date, now.date_naive())?;

        if let Some(type_id) = input.type_id {
            if !self.type_exists(type_id).await? {
                return Err(MedicationError::UnknownType(type_id));
            }
        }

        let medication = self.repository.update(id, input).await?;
        let medication_type = self.type_of(medication.type_id).await?;
        Ok(MedicationResponse::annotate(medication, medication_type, now))
    }

    #[instrument(skip(self), fields(medication_id = %id))]
    pub async fn delete(&self, id: Uuid) -> MedicationResult<()> {
        if !self.repository.delete(id).await? {
            return Err(MedicationError::NotFound(id));
        }
        Ok(())
    }

    #[instrument(skip(self, request), fields(medication_id = %id))]
    pub async fn update_stock(
        &self,
        id: Uuid,
        request: UpdateStockRequest,
    ) -> MedicationResult<StockUpdateResult> {
        request.validate()?;
        self.repository
            .update_stock(id, request.stock, request.operation)
            .await
    }

    pub async fn dashboard(&self) -> MedicationResult<Dashboard> {
        let today = Utc::now().date_naive();

        let stats = DashboardStats {
            total_medications: self.repository.count_all().await?,
            low_stock: self.repository.count_low_stock().await?,
            near_expiry: self.repository.count_near_expiry(today).await?,
            expired: self.repository.count_expired(today).await?,
            // Sum of unit prices, not weighted by stock
            inventory_value: self.repository.sum_unit_prices().await?,
        };

        let top_low_stock = self
            .repository
            .lowest_stock(TOP_LOW_STOCK_LIMIT)
            .await?
            .into_iter()
            .map(|(medication, medication_type)| LowStockItem {
                id: medication.id,
                description: medication.description,
                stock: medication.stock,
                brand: medication.brand,
                medication_type: medication_type.map(|t| LowStockType {
                    description: t.description,
                }),
            })
            .collect();

        Ok(Dashboard {
            stats,
            top_low_stock,
        })
    }

    pub async fn expiry_report(&self, days: i64) -> MedicationResult<ExpiryReport> {
        let now = Utc::now();
        let today = now.date_naive();

        let upcoming = self.repository.expiring_within(today, days).await?;
        let expired = self.repository.expired_before(today).await?;

        Ok(ExpiryReport {
            upcoming: annotate_all(upcoming, now),
            expired: annotate_all(expired, now),
            params: ExpiryReportParams {
                days_queried: days,
                queried_at: today,
            },
        })
    }
}

fn annotate_all(
    rows: Vec<(Medication, Option<MedicationType>)>,
    now: DateTime<Utc>,
) -> Vec<MedicationResponse> {
    rows.into_iter()
        .map(|(medication, medication_type)| {
            MedicationResponse::annotate(medication, medication_type, now)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::medication_types::repository::MockMedicationTypeRepository;
    use crate::medications::models::StockOperation;
    use crate::medications::repository::MockMedicationRepository;
    use chrono::Duration;
    use mockall::predicate::eq;
    use rust_decimal_macros::dec;

    fn sample_create(type_id: Uuid) -> CreateMedication {
        let today = Utc::now().date_naive();
        CreateMedication {
            description: "Paracetamol 500mg".to_string(),
            manufacture_date: today - Duration::days(30),
            expiry_date: today + Duration::days(365),
            packaging: "Caja x 100".to_string(),
            stock: 50,
            unit_price: dec!(0.50),
            package_price: dec!(45.00),
            brand: "Genfar".to_string(),
            type_id,
        }
    }

    fn stored(input: &CreateMedication) -> Medication {
        Medication {
            id: Uuid::now_v7(),
            description: input.description.clone(),
            manufacture_date: input.manufacture_date,
            expiry_date: input.expiry_date,
            packaging: input.packaging.clone(),
            stock: input.stock,
            unit_price: input.unit_price,
            package_price: input.package_price,
            brand: input.brand.clone(),
            type_id: input.type_id,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn test_create_rejects_unknown_type() {
        let type_id = Uuid::now_v7();
        let repository = MockMedicationRepository::new();
        let mut types = MockMedicationTypeRepository::new();
        types
            .expect_exists()
            .with(eq(type_id))
            .returning(|_| Ok(false));

        let service = MedicationService::new(repository, types);
        let result = service.create(sample_create(type_id)).await;

        assert!(matches!(result, Err(MedicationError::UnknownType(id)) if id == type_id));
    }

    #[tokio::test]
    async fn test_create_rejects_future_manufacture_date() {
        let service = MedicationService::new(
            MockMedicationRepository::new(),
            MockMedicationTypeRepository::new(),
        );

        let mut input = sample_create(Uuid::now_v7());
        input.manufacture_date = Utc::now().date_naive() + Duration::days(1);

        let result = service.create(input).await;
        match result {
            Err(MedicationError::Validation(errors)) => {
                assert!(errors.field_errors().contains_key("manufactureDate"));
            }
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_create_rejects_expiry_before_manufacture() {
        let service = MedicationService::new(
            MockMedicationRepository::new(),
            MockMedicationTypeRepository::new(),
        );

        let today = Utc::now().date_naive();
        let mut input = sample_create(Uuid::now_v7());
        input.manufacture_date = today - Duration::days(10);
        input.expiry_date = today - Duration::days(20);

        let result = service.create(input).await;
        match result {
            Err(MedicationError::Validation(errors)) => {
                assert!(errors.field_errors().contains_key("expiryDate"));
            }
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_create_embeds_type_and_flags() {
        let type_id = Uuid::now_v7();
        let input = sample_create(type_id);
        let medication = stored(&input);

        let mut repository = MockMedicationRepository::new();
        let returned = medication.clone();
        repository
            .expect_create()
            .returning(move |_| Ok(returned.clone()));

        let mut types = MockMedicationTypeRepository::new();
        types.expect_exists().returning(|_| Ok(true));
        types.expect_get_by_id().with(eq(type_id)).returning(move |id| {
            Ok(Some(MedicationType {
                id,
                description: "Analgésico".to_string(),
                created_at: Utc::now(),
                updated_at: Utc::now(),
            }))
        });

        let service = MedicationService::new(repository, types);
        let response = service.create(input).await.unwrap();

        assert_eq!(response.medication.id, medication.id);
        assert!(!response.is_expired);
        assert!(!response.is_low_stock);
        assert_eq!(
            response.medication_type.unwrap().description,
            "Analgésico"
        );
    }

    #[tokio::test]
    async fn test_update_validates_merged_dates() {
        // Existing record expires in 5 days; moving manufacture past that
        // expiry must fail even though the request omits expiryDate.
        let type_id = Uuid::now_v7();
        let input = sample_create(type_id);
        let mut existing = stored(&input);
        let today = Utc::now().date_naive();
        existing.expiry_date = today + Duration::days(5);
        let id = existing.id;

        let mut repository = MockMedicationRepository::new();
        repository
            .expect_get_by_id()
            .with(eq(id))
            .returning(move |_| Ok(Some((existing.clone(), None))));

        let service = MedicationService::new(repository, MockMedicationTypeRepository::new());

        let update = UpdateMedication {
            manufacture_date: Some(today + Duration::days(10)),
            ..Default::default()
        };

        let result = service.update(id, update).await;
        assert!(matches!(result, Err(MedicationError::Validation(_))));
    }

    #[tokio::test]
    async fn test_update_stock_rejects_negative_amount() {
        let service = MedicationService::new(
            MockMedicationRepository::new(),
            MockMedicationTypeRepository::new(),
        );

        let request = UpdateStockRequest {
            stock: -5,
            operation: StockOperation::Set,
        };

        let result = service.update_stock(Uuid::now_v7(), request).await;
        assert!(matches!(result, Err(MedicationError::Validation(_))));
    }

    #[tokio::test]
    async fn test_delete_missing_is_not_found() {
        let mut repository = MockMedicationRepository::new();
        repository.expect_delete().returning(|_| Ok(false));

        let service = MedicationService::new(repository, MockMedicationTypeRepository::new());
        let id = Uuid::now_v7();

        let result = service.delete(id).await;
        assert!(matches!(result, Err(MedicationError::NotFound(got)) if got == id));
    }

    #[tokio::test]
    async fn test_dashboard_assembles_stats_and_top_five() {
        let mut repository = MockMedicationRepository::new();
        repository.expect_count_all().returning(|| Ok(12));
        repository.expect_count_low_stock().returning(|| Ok(3));
        repository.expect_count_near_expiry().returning(|_| Ok(2));
        repository.expect_count_expired().returning(|_| Ok(1));
        repository
            .expect_sum_unit_prices()
            .returning(|| Ok(dec!(37.50)));

        let input = sample_create(Uuid::now_v7());
        let low = stored(&input);
        repository
            .expect_lowest_stock()
            .with(eq(5u64))
            .returning(move |_| Ok(vec![(low.clone(), None)]));

        let service = MedicationService::new(repository, MockMedicationTypeRepository::new());
        let dashboard = service.dashboard().await.unwrap();

        assert_eq!(dashboard.stats.total_medications, 12);
        assert_eq!(dashboard.stats.inventory_value, dec!(37.50));
        assert_eq!(dashboard.top_low_stock.len(), 1);
    }

    #[tokio::test]
    async fn test_expiry_report_echoes_parameters() {
        let mut repository = MockMedicationRepository::new();
        repository
            .expect_expiring_within()
            .returning(|_, _| Ok(vec![]));
        repository.expect_expired_before().returning(|_| Ok(vec![]));

        let service = MedicationService::new(repository, MockMedicationTypeRepository::new());
        let report = service.expiry_report(60).await.unwrap();

        assert_eq!(report.params.days_queried, 60);
        assert_eq!(report.params.queried_at, Utc::now().date_naive());
        assert!(report.upcoming.is_empty());
        assert!(report.expired.is_empty());
    }
}
