use std::collections::HashMap;

use async_trait::async_trait;
use sea_orm::sea_query::extension::postgres::PgExpr;
use sea_orm::sea_query::Expr;
use sea_orm::ActiveValue::Set;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, QuerySelect,
};
use uuid::Uuid;

use crate::medication_types::{
    entity,
    error::{MedicationTypeError, MedicationTypeResult},
    models::{
        CreateMedicationType, MedicationType, MedicationTypeFilter, MedicationTypeWithCount,
        UpdateMedicationType,
    },
    repository::MedicationTypeRepository,
};
use crate::medications;

pub struct PgMedicationTypeRepository {
    db: DatabaseConnection,
}

/// Escape `LIKE` pattern metacharacters so the value matches literally.
fn escape_like(value: &str) -> String {
    value
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_")
}

impl PgMedicationTypeRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Medication counts grouped by type, for the list endpoint.
    async fn medication_counts(&self) -> MedicationTypeResult<HashMap<Uuid, u64>> {
        let rows: Vec<(Uuid, i64)> = medications::entity::Entity::find()
            .select_only()
            .column(medications::entity::Column::TypeId)
            .column_as(medications::entity::Column::Id.count(), "count")
            .group_by(medications::entity::Column::TypeId)
            .into_tuple()
            .all(&self.db)
            .await?;

        Ok(rows.into_iter().map(|(id, n)| (id, n as u64)).collect())
    }
}

#[async_trait]
impl MedicationTypeRepository for PgMedicationTypeRepository {
    async fn create(&self, input: CreateMedicationType) -> MedicationTypeResult<MedicationType> {
        let active_model: entity::ActiveModel = input.into();
        let model = active_model.insert(&self.db).await?;

        tracing::info!(type_id = %model.id, "Created medication type");
        Ok(model.into())
    }

    async fn get_by_id(&self, id: Uuid) -> MedicationTypeResult<Option<MedicationType>> {
        let model = entity::Entity::find_by_id(id).one(&self.db).await?;
        Ok(model.map(Into::into))
    }

    async fn list(
        &self,
        filter: MedicationTypeFilter,
    ) -> MedicationTypeResult<(Vec<MedicationTypeWithCount>, u64)> {
        let page = filter.page_request();

        let mut query = entity::Entity::find();
        if let Some(search) = filter.search.filter(|s| !s.is_empty()) {
            query = query.filter(
                Expr::col(entity::Column::Description).ilike(format!("%{}%", search)),
            );
        }

        let total = query.clone().count(&self.db).await?;

        let models = query
            .order_by_desc(entity::Column::CreatedAt)
            .limit(page.limit)
            .offset(page.offset())
            .all(&self.db)
            .await?;

        let counts = self.medication_counts().await?;
        let rows = models
            .into_iter()
            .map(|m| {
                let total_medications = counts.get(&m.id).copied().unwrap_or(0);
                MedicationTypeWithCount {
                    medication_type: m.into(),
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
        let model = entity::Entity::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or(MedicationTypeError::NotFound(id))?;

        let mut active_model: entity::ActiveModel = model.into();
        if let Some(description) = input.description {
            active_model.description = Set(description);
        }
        active_model.updated_at = Set(chrono::Utc::now().into());

        let updated = active_model.update(&self.db).await?;

        tracing::info!(type_id = %id, "Updated medication type");
        Ok(updated.into())
    }

    async fn delete(&self, id: Uuid) -> MedicationTypeResult<bool> {
        let result = entity::Entity::delete_by_id(id).exec(&self.db).await?;

        if result.rows_affected > 0 {
            tracing::info!(type_id = %id, "Deleted medication type");
            Ok(true)
        } else {
            Ok(false)
        }
    }

    async fn exists(&self, id: Uuid) -> MedicationTypeResult<bool> {
        let count = entity::Entity::find_by_id(id).count(&self.db).await?;
        Ok(count > 0)
    }

    async fn description_taken(
        &self,
        description: &str,
        exclude: Option<Uuid>,
    ) -> MedicationTypeResult<bool> {
        // ILIKE with wildcards escaped: whole-value match, case-insensitive
        let mut query = entity::Entity::find()
            .filter(Expr::col(entity::Column::Description).ilike(escape_like(description)));

        if let Some(id) = exclude {
            query = query.filter(entity::Column::Id.ne(id));
        }

        let count = query.count(&self.db).await?;
        Ok(count > 0)
    }

    async fn count_medications(&self, type_id: Uuid) -> MedicationTypeResult<u64> {
        let count = medications::entity::Entity::find()
            .filter(medications::entity::Column::TypeId.eq(type_id))
            .count(&self.db)
            .await?;

        Ok(count)
    }

    async fn medications_of(
        &self,
        type_id: Uuid,
    ) -> MedicationTypeResult<Vec<medications::models::Medication>> {
        let models = medications::entity::Entity::find()
            .filter(medications::entity::Column::TypeId.eq(type_id))
            .order_by_desc(medications::entity::Column::CreatedAt)
            .all(&self.db)
            .await?;

        Ok(models.into_iter().map(Into::into).collect())
    }

    async fn medications_page(
        &self,
        type_id: Uuid,
        page: crate::pagination::PageRequest,
    ) -> MedicationTypeResult<(Vec<medications::models::Medication>, u64)> {
        let query = medications::entity::Entity::find()
            .filter(medications::entity::Column::TypeId.eq(type_id));

        let total = query.clone().count(&self.db).await?;

        let models = query
            .order_by_desc(medications::entity::Column::CreatedAt)
            .limit(page.limit)
            .offset(page.offset())
            .all(&self.db)
            .await?;

        Ok((models.into_iter().map(Into::into).collect(), total))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_like_neutralizes_pattern_metacharacters() {
        assert_eq!(escape_like("Gel al 5%"), "Gel al 5\\%");
        assert_eq!(escape_like("uso_externo"), "uso\\_externo");
        assert_eq!(escape_like("a\\b"), "a\\\\b");
        assert_eq!(escape_like("Analgésico"), "Analgésico");
    }
}
