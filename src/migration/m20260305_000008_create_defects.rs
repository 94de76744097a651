//! Migration: Create defects table.

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
                CREATE TABLE defects (
                    id UUID PRIMARY KEY,
                    title VARCHAR(500) NOT NULL,
                    description TEXT,
                    steps_to_reproduce TEXT,
                    severity VARCHAR(100) NOT NULL,
                    priority_id UUID NOT NULL REFERENCES status_codes(id),

                    reported_at TIMESTAMPTZ NOT NULL,
                    resolved_at TIMESTAMPTZ,

                    reported_by_team_id UUID NOT NULL REFERENCES teams(id),
                    assigned_to_team_id UUID REFERENCES teams(id),

                    -- Back-link to the triggering execution pair; NULL only for
                    -- manually filed defects with no execution
                    test_run_id UUID REFERENCES test_runs(id),
                    test_case_id UUID REFERENCES test_cases(id),

                    created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
                    updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
                );

                -- Pair lookup for dedup policy and per-case defect listings
                CREATE INDEX idx_defects_run_case ON defects(test_run_id, test_case_id)
                    WHERE test_run_id IS NOT NULL;
                CREATE INDEX idx_defects_resolved_at ON defects(resolved_at)
                    WHERE resolved_at IS NULL;

                CREATE TRIGGER update_defects_updated_at
                    BEFORE UPDATE ON defects
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
                DROP TRIGGER IF EXISTS update_defects_updated_at ON defects;
                DROP TABLE IF EXISTS defects CASCADE;
                "#,
            )
            .await?;

        Ok(())
    }
}
