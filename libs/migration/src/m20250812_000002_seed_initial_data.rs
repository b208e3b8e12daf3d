use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .get_connection()
            .execute_unprepared(
                r#"
            INSERT INTO medication_types (id, description, created_at, updated_at)
            VALUES
                ('01990a2e-1c00-7000-8000-000000000001', 'Analgésico', NOW(), NOW()),
                ('01990a2e-1c00-7000-8000-000000000002', 'Antibiótico', NOW(), NOW()),
                ('01990a2e-1c00-7000-8000-000000000003', 'Antiinflamatorio', NOW(), NOW()),
                ('01990a2e-1c00-7000-8000-000000000004', 'Antihistamínico', NOW(), NOW()),
                ('01990a2e-1c00-7000-8000-000000000005', 'Vitaminas', NOW(), NOW())
            ON CONFLICT (id) DO NOTHING
            "#,
            )
            .await?;

        // Demo inventory covering the interesting states: healthy stock,
        // low stock, near expiry and already expired.
        manager
            .get_connection()
            .execute_unprepared(
                r#"
            INSERT INTO medications (
                id, description, manufacture_date, expiry_date, packaging,
                stock, unit_price, package_price, brand, type_id,
                created_at, updated_at
            )
            VALUES
                (
                    '01990a2e-1c00-7000-8000-000000000101',
                    'Paracetamol 500mg',
                    CURRENT_DATE - INTERVAL '6 months',
                    CURRENT_DATE + INTERVAL '18 months',
                    'Caja x 100 tabletas',
                    250, 0.50, 45.00, 'Genfar',
                    '01990a2e-1c00-7000-8000-000000000001',
                    NOW(), NOW()
                ),
                (
                    '01990a2e-1c00-7000-8000-000000000102',
                    'Amoxicilina 500mg',
                    CURRENT_DATE - INTERVAL '3 months',
                    CURRENT_DATE + INTERVAL '20 days',
                    'Caja x 50 cápsulas',
                    40, 1.20, 55.00, 'MK',
                    '01990a2e-1c00-7000-8000-000000000002',
                    NOW(), NOW()
                ),
                (
                    '01990a2e-1c00-7000-8000-000000000103',
                    'Ibuprofeno 400mg',
                    CURRENT_DATE - INTERVAL '1 year',
                    CURRENT_DATE - INTERVAL '15 days',
                    'Caja x 30 tabletas',
                    8, 0.80, 22.00, 'La Santé',
                    '01990a2e-1c00-7000-8000-000000000003',
                    NOW(), NOW()
                ),
                (
                    '01990a2e-1c00-7000-8000-000000000104',
                    'Loratadina 10mg',
                    CURRENT_DATE - INTERVAL '2 months',
                    CURRENT_DATE + INTERVAL '2 years',
                    'Caja x 10 tabletas',
                    5, 0.35, 3.20, 'Genfar',
                    '01990a2e-1c00-7000-8000-000000000004',
                    NOW(), NOW()
                ),
                (
                    '01990a2e-1c00-7000-8000-000000000105',
                    'Complejo B jarabe 120ml',
                    CURRENT_DATE - INTERVAL '1 month',
                    CURRENT_DATE + INTERVAL '1 year',
                    'Frasco 120ml',
                    60, 4.50, 4.50, 'Vitaflex',
                    '01990a2e-1c00-7000-8000-000000000005',
                    NOW(), NOW()
                )
            ON CONFLICT (id) DO NOTHING
            "#,
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .get_connection()
            .execute_unprepared(
                "DELETE FROM medications WHERE id::text LIKE '01990a2e-1c00-7000-8000-0000000001%'",
            )
            .await?;

        manager
            .get_connection()
            .execute_unprepared(
                "DELETE FROM medication_types WHERE id::text LIKE '01990a2e-1c00-7000-8000-0000000000%'",
            )
            .await?;

        Ok(())
    }
}
