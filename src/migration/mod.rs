//! SeaORM database migrations.

pub use sea_orm_migration::prelude::*;

mod m20260305_000001_create_teams;
mod m20260305_000002_create_actors;
mod m20260305_000003_create_status_codes;
mod m20260305_000004_create_tasks;
mod m20260305_000005_create_test_cases;
mod m20260305_000006_create_test_runs;
mod m20260305_000007_create_test_executions;
mod m20260305_000008_create_defects;
mod m20260305_000009_seed_status_codes;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20260305_000001_create_teams::Migration),
            Box::new(m20260305_000002_create_actors::Migration),
            Box::new(m20260305_000003_create_status_codes::Migration),
            Box::new(m20260305_000004_create_tasks::Migration),
            Box::new(m20260305_000005_create_test_cases::Migration),
            Box::new(m20260305_000006_create_test_runs::Migration),
            Box::new(m20260305_000007_create_test_executions::Migration),
            Box::new(m20260305_000008_create_defects::Migration),
            Box::new(m20260305_000009_seed_status_codes::Migration),
        ]
    }
}
