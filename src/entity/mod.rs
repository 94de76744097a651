//! SeaORM entity definitions for PostgreSQL database.

pub mod actor;
pub mod defect;
pub mod status_code;
pub mod task;
pub mod team;
pub mod team_member;
pub mod test_case;
pub mod test_execution;
pub mod test_run;
