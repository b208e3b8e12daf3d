use async_trait::async_trait;
use chrono::{Duration, NaiveDate};
use rust_decimal::Decimal;
use sea_orm::ActiveValue::Set;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, QuerySelect, TransactionError, TransactionTrait,
};
use uuid::Uuid;

use crate::medication_types;
use crate::medication_types::models::MedicationType;
use crate::medications::classification::{
    LOW_STOCK_THRESHOLD, NEAR_EXPIRY_HORIZON_DAYS, horizon_date,
};
use crate::medications::{
    entity, filter,
    error::{MedicationError, MedicationResult},
    models::{
        CreateMedication, Medication, MedicationFilter, StockOperation, StockUpdateResult,
        UpdateMedication,
    },
    repository::MedicationRepository,
};

pub struct PgMedicationRepository {
    db: DatabaseConnection,
}

impl PgMedicationRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

fn with_type(
    rows: Vec<(entity::Model, Option<medication_types::entity::Model>)>,
) -> Vec<(Medication, Option<MedicationType>)> {
    rows.into_iter()
        .map(|(medication, medication_type)| {
            (medication.into(), medication_type.map(Into::into))
        })
        .collect()
}

#[async_trait]
impl MedicationRepository for PgMedicationRepository {
    async fn create(&self, input: CreateMedication) -> MedicationResult<Medication> {
        let active_model: entity::ActiveModel = input.into();
        let model = active_model.insert(&self.db).await?;

        tracing::info!(medication_id = %model.id, "Created medication");
        Ok(model.into())
    }

    async fn get_by_id(
        &self,
        id: Uuid,
    ) -> MedicationResult<Option<(Medication, Option<MedicationType>)>> {
        let row = entity::Entity::find_by_id(id)
            .find_also_related(medication_types::entity::Entity)
            .one(&self.db)
            .await?;

        Ok(row.map(|(medication, medication_type)| {
            (medication.into(), medication_type.map(Into::into))
        }))
    }

    async fn list(
        &self,
        filter: MedicationFilter,
        today: NaiveDate,
    ) -> MedicationResult<(Vec<(Medication, Option<MedicationType>)>, u64)> {
        let page = filter.page_request();
        let condition = filter::compile(&filter, today);

        let total = entity::Entity::find()
            .filter(condition.clone())
            .count(&self.db)
            .await?;

        let rows = entity::Entity::find()
            .filter(condition)
            .find_also_related(medication_types::entity::Entity)
            .order_by_desc(entity::Column::CreatedAt)
            .limit(page.limit)
            .offset(page.offset())
            .all(&self.db)
            .await?;

        Ok((with_type(rows), total))
    }

    async fn update(&self, id: Uuid, input: UpdateMedication) -> MedicationResult<Medication> {
        let model = entity::Entity::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or(MedicationError::NotFound(id))?;

        let mut active_model: entity::ActiveModel = model.into();
        if let Some(description) = input.description {
            active_model.description = Set(description);
        }
        if let Some(manufacture_date) = input.manufacture_date {
            active_model.manufacture_date = Set(manufacture_date);
        }
        if let Some(expiry_date) = input.expiry_date {
            active_model.expiry_date = Set(expiry_date);
        }
        if let Some(packaging) = input.packaging {
            active_model.packaging = Set(packaging);
        }
        if let Some(stock) = input.stock {
            active_model.stock = Set(stock);
        }
        if let Some(unit_price) = input.unit_price {
            active_model.unit_price = Set(unit_price);
        }
        if let Some(package_price) = input.package_price {
            active_model.package_price = Set(package_price);
        }
        if let Some(brand) = input.brand {
            active_model.brand = Set(brand);
        }
        if let Some(type_id) = input.type_id {
            active_model.type_id = Set(type_id);
        }
        active_model.updated_at = Set(chrono::Utc::now().into());

        let updated = active_model.update(&self.db).await?;

        tracing::info!(medication_id = %id, "Updated medication");
        Ok(updated.into())
    }

    async fn delete(&self, id: Uuid) -> MedicationResult<bool> {
        let result = entity::Entity::delete_by_id(id).exec(&self.db).await?;

        if result.rows_affected > 0 {
            tracing::info!(medication_id = %id, "Deleted medication");
            Ok(true)
        } else {
            Ok(false)
        }
    }

    async fn update_stock(
        &self,
        id: Uuid,
        amount: i32,
        operation: StockOperation,
    ) -> MedicationResult<StockUpdateResult> {
        let result = self
            .db
            .transaction::<_, StockUpdateResult, MedicationError>(move |txn| {
                Box::pin(async move {
                    // SELECT ... FOR UPDATE so concurrent mutations serialize
                    let model = entity::Entity::find_by_id(id)
                        .lock_exclusive()
                        .one(txn)
                        .await?
                        .ok_or(MedicationError::NotFound(id))?;

                    let previous_stock = model.stock;
                    let new_stock = match operation {
                        StockOperation::Set => amount,
                        StockOperation::Add => previous_stock.saturating_add(amount),
                        StockOperation::Subtract => previous_stock - amount,
                    };

                    if new_stock < 0 {
                        return Err(MedicationError::NegativeStock);
                    }

                    let mut active_model: entity::ActiveModel = model.into();
                    active_model.stock = Set(new_stock);
                    active_model.updated_at = Set(chrono::Utc::now().into());
                    active_model.update(txn).await?;

                    Ok(StockUpdateResult {
                        id,
                        previous_stock,
                        new_stock,
                        operation,
                    })
                })
            })
            .await
            .map_err(|err| match err {
                TransactionError::Connection(db_err) => MedicationError::from(db_err),
                TransactionError::Transaction(domain_err) => domain_err,
            })?;

        tracing::info!(
            medication_id = %id,
            operation = %result.operation,
            previous_stock = result.previous_stock,
            new_stock = result.new_stock,
            "Updated stock"
        );
        Ok(result)
    }

    async fn count_all(&self) -> MedicationResult<u64> {
        Ok(entity::Entity::find().count(&self.db).await?)
    }

    async fn count_low_stock(&self) -> MedicationResult<u64> {
        let count = entity::Entity::find()
            .filter(entity::Column::Stock.lte(LOW_STOCK_THRESHOLD))
            .count(&self.db)
            .await?;
        Ok(count)
    }

    async fn count_near_expiry(&self, today: NaiveDate) -> MedicationResult<u64> {
        let horizon = today + Duration::days(NEAR_EXPIRY_HORIZON_DAYS);
        let count = entity::Entity::find()
            .filter(entity::Column::ExpiryDate.between(today, horizon))
            .count(&self.db)
            .await?;
        Ok(count)
    }

    async fn count_expired(&self, today: NaiveDate) -> MedicationResult<u64> {
        let count = entity::Entity::find()
            .filter(entity::Column::ExpiryDate.lt(today))
            .count(&self.db)
            .await?;
        Ok(count)
    }

    async fn sum_unit_prices(&self) -> MedicationResult<Decimal> {
        let total: Option<Option<Decimal>> = entity::Entity::find()
            .select_only()
            .column_as(entity::Column::UnitPrice.sum(), "value")
            .into_tuple()
            .one(&self.db)
            .await?;

        Ok(total.flatten().unwrap_or_default())
    }

    async fn lowest_stock(
        &self,
        limit: u64,
    ) -> MedicationResult<Vec<(Medication, Option<MedicationType>)>> {
        let rows = entity::Entity::find()
            .find_also_related(medication_types::entity::Entity)
            .order_by_asc(entity::Column::Stock)
            .limit(limit)
            .all(&self.db)
            .await?;

        Ok(with_type(rows))
    }

    async fn expiring_within(
        &self,
        today: NaiveDate,
        days: i64,
    ) -> MedicationResult<Vec<(Medication, Option<MedicationType>)>> {
        let horizon = horizon_date(today, days);
        let rows = entity::Entity::find()
            .filter(entity::Column::ExpiryDate.between(today, horizon))
            .find_also_related(medication_types::entity::Entity)
            .order_by_asc(entity::Column::ExpiryDate)
            .all(&self.db)
            .await?;

        Ok(with_type(rows))
    }

    async fn expired_before(
        &self,
        today: NaiveDate,
    ) -> MedicationResult<Vec<(Medication, Option<MedicationType>)>> {
        let rows = entity::Entity::find()
            .filter(entity::Column::ExpiryDate.lt(today))
            .find_also_related(medication_types::entity::Entity)
            .order_by_desc(entity::Column::ExpiryDate)
            .all(&self.db)
            .await?;

        Ok(with_type(rows))
    }
}
