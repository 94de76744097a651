//! API endpoint modules.

pub mod defects;
pub mod executions;
pub mod health;
pub mod openapi;
pub mod status_codes;
pub mod tasks;
pub mod teams;
pub mod test_cases;
pub mod test_runs;

pub use defects::configure_routes as configure_defect_routes;
pub use executions::configure_routes as configure_execution_routes;
pub use health::configure_health_routes;
pub use openapi::ApiDoc;
pub use status_codes::configure_routes as configure_status_code_routes;
pub use tasks::configure_routes as configure_task_routes;
pub use teams::configure_routes as configure_team_routes;
pub use test_cases::configure_routes as configure_test_case_routes;
pub use test_runs::configure_routes as configure_test_run_routes;
