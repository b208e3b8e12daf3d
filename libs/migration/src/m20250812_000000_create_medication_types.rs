use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(MedicationTypes::Table)
                    .if_not_exists()
                    .col(pk_uuid(MedicationTypes::Id))
                    .col(string_len(MedicationTypes::Description, 255))
                    .col(
                        timestamp_with_time_zone(MedicationTypes::CreatedAt)
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        timestamp_with_time_zone(MedicationTypes::UpdatedAt)
                            .default(Expr::current_timestamp()),
                    )
                    .to_owned(),
            )
            .await?;

        // Uniqueness is case-insensitive, enforced in the service layer;
        // the index only speeds up the lookup.
        manager
            .create_index(
                Index::create()
                    .name("idx_medication_types_description")
                    .table(MedicationTypes::Table)
                    .col(MedicationTypes::Description)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(MedicationTypes::Table).to_owned())
            .await?;

        Ok(())
    }
}

#[derive(DeriveIden)]
pub(crate) enum MedicationTypes {
    Table,
    Id,
    Description,
    CreatedAt,
    UpdatedAt,
}
