//! Migration: Create test_executions table.
//!
//! One row per (test_run_id, test_case_id) pair, enforced by a unique
//! constraint. Concurrent first submissions surface as a unique violation
//! that the recorder resolves by re-reading and updating.

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
                CREATE TABLE test_executions (
                    id UUID PRIMARY KEY,
                    test_run_id UUID NOT NULL REFERENCES test_runs(id) ON DELETE CASCADE,
                    test_case_id UUID NOT NULL REFERENCES test_cases(id),

                    actual_result TEXT NOT NULL DEFAULT '',
                    status_id UUID NOT NULL REFERENCES status_codes(id),
                    executing_team_id UUID NOT NULL REFERENCES teams(id),

                    executed_at TIMESTAMPTZ NOT NULL,
                    retries INTEGER NOT NULL DEFAULT 0,

                    created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),

                    -- Uniqueness invariant of the workflow
                    CONSTRAINT uq_test_executions_run_case UNIQUE (test_run_id, test_case_id)
                );

                CREATE INDEX idx_test_executions_test_case_id ON test_executions(test_case_id);
                -- History listing for a run is ordered by execution timestamp
                CREATE INDEX idx_test_executions_executed_at ON test_executions(test_run_id, executed_at);
                "#,
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .get_connection()
            .execute_unprepared("DROP TABLE IF EXISTS test_executions CASCADE;")
            .await?;

        Ok(())
    }
}
