use sea_orm::entity::prelude::*;
use sea_orm::ActiveValue::Set;

/// Sea-ORM entity for the medication_types table
#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "medication_types")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub description: String,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "crate::medications::entity::Entity")]
    Medications,
}

impl Related<crate::medications::entity::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Medications.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for crate::medication_types::models::MedicationType {
    fn from(model: Model) -> Self {
        Self {
            id: model.id,
            description: model.description,
            created_at: model.created_at.into(),
            updated_at: model.updated_at.into(),
        }
    }
}

impl From<crate::medication_types::models::CreateMedicationType> for ActiveModel {
    fn from(input: crate::medication_types::models::CreateMedicationType) -> Self {
        ActiveModel {
            id: Set(Uuid::now_v7()),
            description: Set(input.description),
            created_at: Set(chrono::Utc::now().into()),
            updated_at: Set(chrono::Utc::now().into()),
        }
    }
}
