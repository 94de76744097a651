//! Migration: Create test_cases table.
//!
//! Authored specifications of steps and expected results, with catalog-backed
//! status and type references.

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
                CREATE TABLE test_cases (
                    id UUID PRIMARY KEY, -- UUIDv7 for time-ordered sorting
                    task_id UUID NOT NULL REFERENCES tasks(id) ON DELETE CASCADE,
                    team_id UUID NOT NULL REFERENCES teams(id),

                    title VARCHAR(500) NOT NULL,
                    description TEXT,
                    steps TEXT,
                    expected_result TEXT,

                    -- Catalog references
                    case_type_id UUID REFERENCES status_codes(id),
                    status_id UUID NOT NULL REFERENCES status_codes(id),

                    created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
                    updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
                );

                CREATE INDEX idx_test_cases_task_id ON test_cases(task_id);
                CREATE INDEX idx_test_cases_status_id ON test_cases(status_id);

                CREATE TRIGGER update_test_cases_updated_at
                    BEFORE UPDATE ON test_cases
                    FOR EACH ROW
                    EXECUTE FUNCTION update_updated_at_column();
                "#,
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .get_connection()
            .execute_unprepared(
                r#"
                DROP TRIGGER IF EXISTS update_test_cases_updated_at ON test_cases;
                DROP TABLE IF EXISTS test_cases CASCADE;
                "#,
            )
            .await?;

        Ok(())
    }
}
