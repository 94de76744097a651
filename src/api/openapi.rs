//! OpenAPI documentation configuration.

use utoipa::OpenApi;

use crate::{api, error, models, services};

/// OpenAPI documentation.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "QA Track Server",
        version = "0.3.0",
        description = "API server for QA test-case execution tracking and defect lifecycle"
    ),
    servers(
        (url = "/", description = "Local server")
    ),
    paths(
        // Health endpoints
        api::health::health,
        api::health::ready,
        // Status catalog
        api::status_codes::list_status_codes,
        // Teams and tasks
        api::teams::create_team,
        api::teams::list_teams,
        api::teams::add_member,
        api::tasks::create_task,
        api::tasks::list_tasks,
        api::tasks::get_task,
        // Test cases
        api::test_cases::create_test_case,
        api::test_cases::get_test_case,
        api::test_cases::get_task_test_cases,
        api::test_cases::update_test_case,
        api::test_cases::delete_test_case,
        // Test runs
        api::test_runs::create_test_run,
        api::test_runs::get_test_run,
        api::test_runs::get_task_test_runs,
        // Executions
        api::executions::submit_result,
        api::executions::get_execution,
        api::executions::get_run_executions,
        // Defects
        api::defects::create_defect,
        api::defects::query_defects,
        api::defects::get_defect,
        api::defects::update_defect,
        api::defects::resolve_defect,
        api::defects::delete_defect,
        // Auth endpoints
        services::actor_admin::create_actor,
        services::actor_admin::list_actors,
        services::actor_admin::revoke_actor,
        services::actor_admin::me,
    ),
    components(
        schemas(
            // Common
            error::ErrorResponse,
            // Health
            api::health::HealthResponse,
            api::health::ReadyResponse,
            // Status catalog
            models::status::StatusCategory,
            models::status::StatusCodeResponse,
            models::status::StatusCodeListResponse,
            // Teams and tasks
            models::team::CreateTeamRequest,
            models::team::AddTeamMemberRequest,
            models::team::TeamResponse,
            models::team::TeamListResponse,
            models::task::CreateTaskRequest,
            models::task::TaskResponse,
            models::task::TaskListResponse,
            // Test cases
            models::test_case::CreateTestCaseRequest,
            models::test_case::UpdateTestCaseRequest,
            models::test_case::TestCaseResponse,
            models::test_case::TestCaseListResponse,
            // Test runs
            models::test_run::CreateTestRunRequest,
            models::test_run::TestRunResponse,
            models::test_run::TestRunListResponse,
            // Executions
            models::execution::SubmitResultRequest,
            models::execution::ExecutionResponse,
            models::execution::SubmitResultResponse,
            models::execution::ExecutionListResponse,
            // Defects
            models::defect::CreateDefectRequest,
            models::defect::UpdateDefectRequest,
            models::defect::ResolveDefectRequest,
            models::defect::DefectResponse,
            models::defect::DefectListResponse,
            api::defects::QueryDefectsQuery,
            // Auth
            models::actor::Role,
            models::actor::CreateActorRequest,
            models::actor::ActorCreateResponse,
            models::actor::ActorListItem,
            models::actor::ActorListResponse,
            models::actor::ActorResponse,
        )
    ),
    tags(
        (name = "Health", description = "Service health endpoints"),
        (name = "Status Codes", description = "Seeded status catalog"),
        (name = "Teams", description = "Team registry"),
        (name = "Tasks", description = "Task containers"),
        (name = "Test Cases", description = "Test case authoring"),
        (name = "Test Runs", description = "Test run sessions"),
        (name = "Executions", description = "Execution recording workflow"),
        (name = "Defects", description = "Defect lifecycle"),
        (name = "Auth", description = "Actor and token management")
    ),
    modifiers(&SecurityAddon)
)]
pub struct ApiDoc;

/// Add actor token security scheme.
struct SecurityAddon;

impl utoipa::Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "actor_token",
                utoipa::openapi::security::SecurityScheme::ApiKey(
                    utoipa::openapi::security::ApiKey::Header(
                        utoipa::openapi::security::ApiKeyValue::new("X-Actor-Token"),
                    ),
                ),
            );
        }
    }
}
