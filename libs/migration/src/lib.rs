pub use sea_orm_migration::prelude::*;

mod m20250812_000000_create_medication_types;
mod m20250812_000001_create_medications;
mod m20250812_000002_seed_initial_data;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20250812_000000_create_medication_types::Migration),
            Box::new(m20250812_000001_create_medications::Migration),
            Box::new(m20250812_000002_seed_initial_data::Migration),
        ]
    }
}
