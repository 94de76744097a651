//! Migration: Seed the status catalog.
//!
//! The workflow has hard dependencies on TestCaseStatus 'Failed' and 'Retest'
//! and Priority 'Medium'; removing those rows is an operational
//! misconfiguration surfaced as MISSING_SEED_DATA at runtime.

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
                INSERT INTO status_codes (id, category, name) VALUES
                    (gen_random_uuid(), 'TestCaseStatus', 'Draft'),
                    (gen_random_uuid(), 'TestCaseStatus', 'Passed'),
                    (gen_random_uuid(), 'TestCaseStatus', 'Failed'),
                    (gen_random_uuid(), 'TestCaseStatus', 'Blocked'),
                    (gen_random_uuid(), 'TestCaseStatus', 'Retest'),
                    (gen_random_uuid(), 'TestRunStatus', 'Planned'),
                    (gen_random_uuid(), 'TestRunStatus', 'In Progress'),
                    (gen_random_uuid(), 'TestRunStatus', 'Completed'),
                    (gen_random_uuid(), 'Priority', 'Low'),
                    (gen_random_uuid(), 'Priority', 'Medium'),
                    (gen_random_uuid(), 'Priority', 'High'),
                    (gen_random_uuid(), 'Priority', 'Critical');
                "#,
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .get_connection()
            .execute_unprepared("DELETE FROM status_codes;")
            .await?;

        Ok(())
    }
}
