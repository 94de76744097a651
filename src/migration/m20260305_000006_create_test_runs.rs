//! Migration: Create test_runs table.

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
                CREATE TABLE test_runs (
                    id UUID PRIMARY KEY,
                    task_id UUID NOT NULL REFERENCES tasks(id) ON DELETE CASCADE,
                    name VARCHAR(500) NOT NULL,

                    created_by_team_id UUID NOT NULL REFERENCES teams(id),
                    -- Defaults to the creating team at insert time
                    executing_team_id UUID NOT NULL REFERENCES teams(id),

                    -- Clamped to NOW() at insert time when a future date is supplied
                    run_date TIMESTAMPTZ NOT NULL,
                    status_id UUID NOT NULL REFERENCES status_codes(id),

                    created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
                );

                CREATE INDEX idx_test_runs_task_id ON test_runs(task_id);
                "#,
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .get_connection()
            .execute_unprepared("DROP TABLE IF EXISTS test_runs CASCADE;")
            .await?;

        Ok(())
    }
}
