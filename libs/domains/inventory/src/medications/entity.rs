use rust_decimal::Decimal;
use sea_orm::entity::prelude::*;
use sea_orm::ActiveValue::Set;

/// Sea-ORM entity for the medications table
#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "medications")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub description: String,
    pub manufacture_date: Date,
    pub expiry_date: Date,
    pub packaging: String,
    pub stock: i32,
    #[sea_orm(column_type = "Decimal(Some((10, 2)))")]
    pub unit_price: Decimal,
    #[sea_orm(column_type = "Decimal(Some((10, 2)))")]
    pub package_price: Decimal,
    pub brand: String,
    pub type_id: Uuid,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "crate::medication_types::entity::Entity",
        from = "Column::TypeId",
        to = "crate::medication_types::entity::Column::Id",
        on_update = "Cascade",
        on_delete = "Restrict"
    )]
    MedicationType,
}

impl Related<crate::medication_types::entity::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::MedicationType.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for crate::medications::models::Medication {
    fn from(model: Model) -> Self {
        Self {
            id: model.id,
            description: model.description,
            manufacture_date: model.manufacture_date,
            expiry_date: model.expiry_date,
            packaging: model.packaging,
            stock: model.stock,
            unit_price: model.unit_price,
            package_price: model.package_price,
            brand: model.brand,
            type_id: model.type_id,
            created_at: model.created_at.into(),
            updated_at: model.updated_at.into(),
        }
    }
}

impl From<crate::medications::models::CreateMedication> for ActiveModel {
    fn from(input: crate::medications::models::CreateMedication) -> Self {
        ActiveModel {
            id: Set(Uuid::now_v7()),
            description: Set(input.description),
            manufacture_date: Set(input.manufacture_date),
            expiry_date: Set(input.expiry_date),
            packaging: Set(input.packaging),
            stock: Set(input.stock),
            unit_price: Set(input.unit_price),
            package_price: Set(input.package_price),
            brand: Set(input.brand),
            type_id: Set(input.type_id),
            created_at: Set(chrono::Utc::now().into()),
            updated_at: Set(chrono::Utc::now().into()),
        }
    }
}
