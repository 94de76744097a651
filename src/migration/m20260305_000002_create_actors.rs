//! Migration: Create actors table.
//!
//! Stores authenticated identities with hashed tokens and role lists.

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
                CREATE TABLE actors (
                    id UUID PRIMARY KEY,
                    username VARCHAR(200) NOT NULL UNIQUE,

                    -- SHA-256 hash of the full token; the token itself is never stored
                    token_hash VARCHAR(64) NOT NULL UNIQUE,
                    -- First 8 characters of the token for identification in logs
                    token_prefix VARCHAR(8) NOT NULL,

                    -- Comma-separated role names (admin, qa, tester, developer)
                    roles VARCHAR(200) NOT NULL DEFAULT '',

                    created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
                    deleted_at TIMESTAMPTZ
                );

                -- Token lookup on every authenticated request (active only)
                CREATE INDEX idx_actors_token_hash ON actors(token_hash)
                    WHERE deleted_at IS NULL;
                "#,
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .get_connection()
            .execute_unprepared("DROP TABLE IF EXISTS actors CASCADE;")
            .await?;

        Ok(())
    }
}
