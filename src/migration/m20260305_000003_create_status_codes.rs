//! Migration: Create status_codes table.
//!
//! Reference vocabulary for test-case statuses, test-run statuses and
//! priorities. Rows are seeded once and referenced by id everywhere else.

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
                CREATE TABLE status_codes (
                    id UUID PRIMARY KEY,
                    category VARCHAR(40) NOT NULL
                        CHECK (category IN ('TestCaseStatus', 'TestRunStatus', 'Priority')),
                    name VARCHAR(100) NOT NULL,
                    created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),

                    -- Names are unique within a category
                    UNIQUE (category, name)
                );

                CREATE INDEX idx_status_codes_category ON status_codes(category);
                "#,
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .get_connection()
            .execute_unprepared("DROP TABLE IF EXISTS status_codes CASCADE;")
            .await?;

        Ok(())
    }
}
