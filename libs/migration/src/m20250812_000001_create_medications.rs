use sea_orm_migration::{prelude::*, schema::*};

use crate::m20250812_000000_create_medication_types::MedicationTypes;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Medications::Table)
                    .if_not_exists()
                    .col(pk_uuid(Medications::Id))
                    .col(string_len(Medications::Description, 500))
                    .col(date(Medications::ManufactureDate))
                    .col(date(Medications::ExpiryDate))
                    .col(string_len(Medications::Packaging, 100))
                    .col(integer(Medications::Stock).default(0))
                    .col(decimal_len(Medications::UnitPrice, 10, 2))
                    .col(decimal_len(Medications::PackagePrice, 10, 2))
                    .col(string_len(Medications::Brand, 100))
                    .col(uuid(Medications::TypeId))
                    .col(
                        timestamp_with_time_zone(Medications::CreatedAt)
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        timestamp_with_time_zone(Medications::UpdatedAt)
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_medications_type_id")
                            .from(Medications::Table, Medications::TypeId)
                            .to(MedicationTypes::Table, MedicationTypes::Id)
                            .on_delete(ForeignKeyAction::Restrict)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_medications_type_id")
                    .table(Medications::Table)
                    .col(Medications::TypeId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_medications_brand")
                    .table(Medications::Table)
                    .col(Medications::Brand)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_medications_expiry_date")
                    .table(Medications::Table)
                    .col(Medications::ExpiryDate)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_medications_description")
                    .table(Medications::Table)
                    .col(Medications::Description)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Medications::Table).to_owned())
            .await?;

        Ok(())
    }
}

#[derive(DeriveIden)]
enum Medications {
    Table,
    Id,
    Description,
    ManufactureDate,
    ExpiryDate,
    Packaging,
    Stock,
    UnitPrice,
    PackagePrice,
    Brand,
    TypeId,
    CreatedAt,
    UpdatedAt,
}
