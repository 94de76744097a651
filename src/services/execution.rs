//! Execution recording workflow.
//!
//! `record_result` is the core transition of the system: it upserts the
//! single execution row for a (run, case) pair and, when the reported status
//! resolves to Failed, files a defect in the same transaction. The execution
//! update and the defect insert are all-or-nothing.

use sea_orm::{ConnectionTrait, TransactionTrait};
use tracing::info;
use uuid::Uuid;

use crate::auth;
use crate::config::DefectFilingPolicy;
use crate::db::{self, DbPool};
use crate::db::defects::NewDefect;
use crate::db::test_executions::NewTestExecution;
use crate::entity::{defect, test_case, test_execution, test_run};
use crate::error::{AppError, AppResult};
use crate::models::{Actor, Role, StatusCategory};
use crate::services::catalog::{StatusCatalog, names};

/// A submitted execution result.
pub struct SubmitResult {
    pub actual_result: String,
    pub status_id: Uuid,
    pub executing_team_id: Option<Uuid>,
    pub retries: Option<i32>,
}

/// Outcome of a recorded submission.
#[derive(Debug)]
pub struct RecordedExecution {
    pub execution: test_execution::Model,
    pub filed_defect: Option<defect::Model>,
}

/// Record an execution result for a (run, case) pair.
///
/// Requires the QA or Tester role. The reported status must resolve inside
/// the TestCaseStatus category; an unknown id fails with `InvalidStatus`
/// before anything is written. On success exactly one execution row exists
/// for the pair, reflecting this submission.
pub async fn record_result(
    pool: &DbPool,
    catalog: &StatusCatalog,
    policy: DefectFilingPolicy,
    actor: &Actor,
    test_run_id: Uuid,
    test_case_id: Uuid,
    submission: SubmitResult,
) -> AppResult<RecordedExecution> {
    auth::authorize(actor, &[Role::Qa, Role::Tester])?;

    if !catalog.contains(StatusCategory::TestCaseStatus, submission.status_id) {
        return Err(AppError::InvalidStatus(format!(
            "Status id {} does not resolve to a test case status",
            submission.status_id
        )));
    }

    let txn = pool.connection().begin().await?;

    match record_in_txn(&txn, catalog, policy, test_run_id, test_case_id, submission).await {
        Ok(outcome) => {
            txn.commit().await?;

            info!(
                execution_id = %outcome.execution.id,
                test_run_id = %test_run_id,
                test_case_id = %test_case_id,
                status = catalog.name_of(outcome.execution.status_id).unwrap_or("?"),
                filed_defect = outcome.filed_defect.is_some(),
                "Recorded execution result"
            );

            Ok(outcome)
        }
        Err(e) => {
            txn.rollback().await?;
            Err(e)
        }
    }
}

async fn record_in_txn<C: ConnectionTrait>(
    txn: &C,
    catalog: &StatusCatalog,
    policy: DefectFilingPolicy,
    test_run_id: Uuid,
    test_case_id: Uuid,
    submission: SubmitResult,
) -> AppResult<RecordedExecution> {
    let run = db::test_runs::find_by_id(txn, test_run_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Test run".to_string()))?;

    let case = db::test_cases::find_by_id(txn, test_case_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Test case".to_string()))?;

    let executing_team_id = submission.executing_team_id.unwrap_or(run.executing_team_id);
    let now = chrono::Utc::now();

    // Establish the row if this is the first submission for the pair. A
    // concurrent first submission loses the insert race on the unique
    // (run, case) constraint and falls back to the row the winner created.
    let existing = db::test_executions::find_by_pair(txn, run.id, case.id).await?;
    let seeded = match existing {
        Some(row) => row,
        None => {
            let new_execution = NewTestExecution {
                test_run_id: run.id,
                test_case_id: case.id,
                actual_result: String::new(),
                status_id: submission.status_id,
                executing_team_id,
                executed_at: now,
                retries: 0,
            };

            match db::test_executions::insert(txn, new_execution).await {
                Ok(row) => row,
                Err(AppError::Conflict(_)) => db::test_executions::find_by_pair(txn, run.id, case.id)
                    .await?
                    .ok_or_else(|| {
                        AppError::Conflict(
                            "Concurrent submission for this test run and case".to_string(),
                        )
                    })?,
                Err(e) => return Err(e),
            }
        }
    };

    // Overwrite with the submitted values; the seed row's placeholders are
    // superseded even on first submission.
    let retries = submission.retries.unwrap_or(seeded.retries);
    let execution = db::test_executions::update_result(
        txn,
        seeded,
        submission.actual_result,
        submission.status_id,
        executing_team_id,
        now,
        retries,
    )
    .await?;

    let filed_defect = if catalog.name_of(execution.status_id) == Some(names::FAILED) {
        file_defect(txn, catalog, policy, &run, &case, &execution).await?
    } else {
        None
    };

    Ok(RecordedExecution {
        execution,
        filed_defect,
    })
}

/// File a defect for a failing execution, still inside the caller's
/// transaction. An error here (including a missing Medium priority) rolls
/// back the execution update as well.
async fn file_defect<C: ConnectionTrait>(
    txn: &C,
    catalog: &StatusCatalog,
    policy: DefectFilingPolicy,
    run: &test_run::Model,
    case: &test_case::Model,
    execution: &test_execution::Model,
) -> AppResult<Option<defect::Model>> {
    if policy == DefectFilingPolicy::DedupOpenDefect
        && db::defects::find_open_by_pair(txn, run.id, case.id)
            .await?
            .is_some()
    {
        info!(
            test_run_id = %run.id,
            test_case_id = %case.id,
            "Open defect already filed for failing pair, skipping"
        );
        return Ok(None);
    }

    let medium_priority_id = catalog.require(StatusCategory::Priority, names::MEDIUM)?;

    let new_defect = NewDefect {
        title: format!("Test case '{}' failed", case.title),
        description: Some(execution.actual_result.clone()),
        steps_to_reproduce: Some("N/A".to_string()),
        severity: "Unspecified".to_string(),
        priority_id: medium_priority_id,
        reported_at: execution.executed_at,
        reported_by_team_id: execution.executing_team_id,
        assigned_to_team_id: None,
        test_run_id: Some(run.id),
        test_case_id: Some(case.id),
    };

    let filed = db::defects::insert(txn, new_defect).await?;

    info!(
        defect_id = %filed.id,
        test_run_id = %run.id,
        test_case_id = %case.id,
        "Filed defect for failing execution"
    );

    Ok(Some(filed))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use sea_orm::{DatabaseBackend, MockDatabase};

    use crate::entity::status_code;

    fn catalog_rows() -> Vec<status_code::Model> {
        [
            ("TestCaseStatus", "Draft"),
            ("TestCaseStatus", "Passed"),
            ("TestCaseStatus", "Failed"),
            ("TestCaseStatus", "Retest"),
            ("Priority", "Medium"),
        ]
        .into_iter()
        .map(|(category, name)| status_code::Model {
            id: Uuid::new_v4(),
            category: category.to_string(),
            name: name.to_string(),
            created_at: Utc::now(),
        })
        .collect()
    }

    fn qa_actor() -> Actor {
        Actor {
            id: Uuid::new_v4(),
            username: "alice".to_string(),
            token_prefix: "qat_abcd".to_string(),
            roles: vec![Role::Qa],
        }
    }

    fn run_model(team_id: Uuid) -> test_run::Model {
        test_run::Model {
            id: Uuid::new_v4(),
            task_id: Uuid::new_v4(),
            name: "Nightly regression".to_string(),
            created_by_team_id: team_id,
            executing_team_id: team_id,
            run_date: Utc::now(),
            status_id: Uuid::new_v4(),
            created_at: Utc::now(),
        }
    }

    fn case_model(task_id: Uuid, team_id: Uuid, status_id: Uuid) -> test_case::Model {
        test_case::Model {
            id: Uuid::new_v4(),
            task_id,
            team_id,
            title: "Login works".to_string(),
            description: None,
            steps: Some("1. Open login page".to_string()),
            expected_result: Some("Dashboard is shown".to_string()),
            case_type_id: None,
            status_id,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn execution_model(
        run: &test_run::Model,
        case: &test_case::Model,
        actual_result: &str,
        status_id: Uuid,
        retries: i32,
    ) -> test_execution::Model {
        test_execution::Model {
            id: Uuid::now_v7(),
            test_run_id: run.id,
            test_case_id: case.id,
            actual_result: actual_result.to_string(),
            status_id,
            executing_team_id: run.executing_team_id,
            executed_at: Utc::now(),
            retries,
            created_at: Utc::now(),
        }
    }

    fn defect_model(run: &test_run::Model, case: &test_case::Model, priority_id: Uuid) -> defect::Model {
        defect::Model {
            id: Uuid::now_v7(),
            title: format!("Test case '{}' failed", case.title),
            description: Some("crashed".to_string()),
            steps_to_reproduce: Some("N/A".to_string()),
            severity: "Unspecified".to_string(),
            priority_id,
            reported_at: Utc::now(),
            resolved_at: None,
            reported_by_team_id: run.executing_team_id,
            assigned_to_team_id: None,
            test_run_id: Some(run.id),
            test_case_id: Some(case.id),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn submission(status_id: Uuid, actual_result: &str) -> SubmitResult {
        SubmitResult {
            actual_result: actual_result.to_string(),
            status_id,
            executing_team_id: None,
            retries: None,
        }
    }

    #[actix_rt::test]
    async fn test_passed_submission_creates_execution_without_defect() {
        let catalog = StatusCatalog::from_models(catalog_rows());
        let passed = catalog
            .resolve(StatusCategory::TestCaseStatus, "Passed")
            .unwrap();

        let team_id = Uuid::new_v4();
        let run = run_model(team_id);
        let case = case_model(run.task_id, team_id, passed);
        let seeded = execution_model(&run, &case, "", passed, 0);
        let updated = execution_model(&run, &case, "works", passed, 0);

        // find run, find case, find pair (none), insert seed row, overwrite
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![run.clone()]])
            .append_query_results([vec![case.clone()]])
            .append_query_results([Vec::<test_execution::Model>::new()])
            .append_query_results([vec![seeded]])
            .append_query_results([vec![updated]])
            .into_connection();
        let pool = DbPool::from_connection(db);

        let outcome = record_result(
            &pool,
            &catalog,
            DefectFilingPolicy::PerFailureEvent,
            &qa_actor(),
            run.id,
            case.id,
            submission(passed, "works"),
        )
        .await
        .unwrap();

        assert_eq!(outcome.execution.actual_result, "works");
        assert_eq!(outcome.execution.status_id, passed);
        assert!(outcome.filed_defect.is_none());
    }

    #[actix_rt::test]
    async fn test_failed_submission_files_defect() {
        let catalog = StatusCatalog::from_models(catalog_rows());
        let failed = catalog
            .resolve(StatusCategory::TestCaseStatus, "Failed")
            .unwrap();
        let medium = catalog.resolve(StatusCategory::Priority, "Medium").unwrap();

        let team_id = Uuid::new_v4();
        let run = run_model(team_id);
        let case = case_model(run.task_id, team_id, failed);
        let seeded = execution_model(&run, &case, "", failed, 0);
        let updated = execution_model(&run, &case, "crashed", failed, 0);
        let filed = defect_model(&run, &case, medium);

        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![run.clone()]])
            .append_query_results([vec![case.clone()]])
            .append_query_results([Vec::<test_execution::Model>::new()])
            .append_query_results([vec![seeded]])
            .append_query_results([vec![updated]])
            .append_query_results([vec![filed]])
            .into_connection();
        let pool = DbPool::from_connection(db);

        let outcome = record_result(
            &pool,
            &catalog,
            DefectFilingPolicy::PerFailureEvent,
            &qa_actor(),
            run.id,
            case.id,
            submission(failed, "crashed"),
        )
        .await
        .unwrap();

        let defect = outcome.filed_defect.expect("defect should be filed");
        assert_eq!(defect.test_run_id, Some(run.id));
        assert_eq!(defect.test_case_id, Some(case.id));
        assert_eq!(defect.description.as_deref(), Some("crashed"));
        assert_eq!(defect.priority_id, medium);
    }

    #[actix_rt::test]
    async fn test_resubmission_updates_in_place() {
        let catalog = StatusCatalog::from_models(catalog_rows());
        let passed = catalog
            .resolve(StatusCategory::TestCaseStatus, "Passed")
            .unwrap();

        let team_id = Uuid::new_v4();
        let run = run_model(team_id);
        let case = case_model(run.task_id, team_id, passed);
        let existing = execution_model(&run, &case, "flaky", passed, 1);
        let updated = execution_model(&run, &case, "works", passed, 1);

        // find run, find case, find pair (existing row), overwrite - no insert
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![run.clone()]])
            .append_query_results([vec![case.clone()]])
            .append_query_results([vec![existing]])
            .append_query_results([vec![updated]])
            .into_connection();
        let pool = DbPool::from_connection(db);

        let outcome = record_result(
            &pool,
            &catalog,
            DefectFilingPolicy::PerFailureEvent,
            &qa_actor(),
            run.id,
            case.id,
            submission(passed, "works"),
        )
        .await
        .unwrap();

        assert_eq!(outcome.execution.retries, 1);
        assert!(outcome.filed_defect.is_none());
    }

    #[actix_rt::test]
    async fn test_repeated_failure_files_second_defect_by_default() {
        let catalog = StatusCatalog::from_models(catalog_rows());
        let failed = catalog
            .resolve(StatusCategory::TestCaseStatus, "Failed")
            .unwrap();
        let medium = catalog.resolve(StatusCategory::Priority, "Medium").unwrap();

        let team_id = Uuid::new_v4();
        let run = run_model(team_id);
        let case = case_model(run.task_id, team_id, failed);
        let existing = execution_model(&run, &case, "crashed", failed, 0);
        let updated = execution_model(&run, &case, "still crashing", failed, 0);
        let second_defect = defect_model(&run, &case, medium);

        // Per-failure-event filing does not look for an open defect; the
        // insert happens unconditionally on a failing status.
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![run.clone()]])
            .append_query_results([vec![case.clone()]])
            .append_query_results([vec![existing]])
            .append_query_results([vec![updated]])
            .append_query_results([vec![second_defect]])
            .into_connection();
        let pool = DbPool::from_connection(db);

        let outcome = record_result(
            &pool,
            &catalog,
            DefectFilingPolicy::PerFailureEvent,
            &qa_actor(),
            run.id,
            case.id,
            submission(failed, "still crashing"),
        )
        .await
        .unwrap();

        assert!(outcome.filed_defect.is_some());
    }

    #[actix_rt::test]
    async fn test_dedup_policy_skips_second_defect() {
        let catalog = StatusCatalog::from_models(catalog_rows());
        let failed = catalog
            .resolve(StatusCategory::TestCaseStatus, "Failed")
            .unwrap();
        let medium = catalog.resolve(StatusCategory::Priority, "Medium").unwrap();

        let team_id = Uuid::new_v4();
        let run = run_model(team_id);
        let case = case_model(run.task_id, team_id, failed);
        let existing = execution_model(&run, &case, "crashed", failed, 0);
        let updated = execution_model(&run, &case, "still crashing", failed, 0);
        let open_defect = defect_model(&run, &case, medium);

        // find run, find case, find pair, overwrite, find open defect - no insert
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![run.clone()]])
            .append_query_results([vec![case.clone()]])
            .append_query_results([vec![existing]])
            .append_query_results([vec![updated]])
            .append_query_results([vec![open_defect]])
            .into_connection();
        let pool = DbPool::from_connection(db);

        let outcome = record_result(
            &pool,
            &catalog,
            DefectFilingPolicy::DedupOpenDefect,
            &qa_actor(),
            run.id,
            case.id,
            submission(failed, "still crashing"),
        )
        .await
        .unwrap();

        assert!(outcome.filed_defect.is_none());
    }

    #[actix_rt::test]
    async fn test_missing_medium_priority_rolls_back() {
        // Catalog without the Medium priority the filer depends on.
        let rows: Vec<status_code::Model> = catalog_rows()
            .into_iter()
            .filter(|row| row.name != "Medium")
            .collect();
        let catalog = StatusCatalog::from_models(rows);
        let failed = catalog
            .resolve(StatusCategory::TestCaseStatus, "Failed")
            .unwrap();

        let team_id = Uuid::new_v4();
        let run = run_model(team_id);
        let case = case_model(run.task_id, team_id, failed);
        let seeded = execution_model(&run, &case, "", failed, 0);
        let updated = execution_model(&run, &case, "crashed", failed, 0);

        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![run.clone()]])
            .append_query_results([vec![case.clone()]])
            .append_query_results([Vec::<test_execution::Model>::new()])
            .append_query_results([vec![seeded]])
            .append_query_results([vec![updated]])
            .into_connection();
        let pool = DbPool::from_connection(db);

        let err = record_result(
            &pool,
            &catalog,
            DefectFilingPolicy::PerFailureEvent,
            &qa_actor(),
            run.id,
            case.id,
            submission(failed, "crashed"),
        )
        .await
        .unwrap_err();

        // The whole unit of work fails; the transaction was rolled back.
        assert!(matches!(err, AppError::MissingSeedData(_)));
    }

    #[actix_rt::test]
    async fn test_unknown_status_is_rejected_before_any_write() {
        let catalog = StatusCatalog::from_models(catalog_rows());

        let db = MockDatabase::new(DatabaseBackend::Postgres).into_connection();
        let pool = DbPool::from_connection(db);

        let err = record_result(
            &pool,
            &catalog,
            DefectFilingPolicy::PerFailureEvent,
            &qa_actor(),
            Uuid::new_v4(),
            Uuid::new_v4(),
            submission(Uuid::new_v4(), "works"),
        )
        .await
        .unwrap_err();

        assert!(matches!(err, AppError::InvalidStatus(_)));
    }

    #[actix_rt::test]
    async fn test_priority_id_is_not_a_case_status() {
        let catalog = StatusCatalog::from_models(catalog_rows());
        let medium = catalog.resolve(StatusCategory::Priority, "Medium").unwrap();

        let db = MockDatabase::new(DatabaseBackend::Postgres).into_connection();
        let pool = DbPool::from_connection(db);

        let err = record_result(
            &pool,
            &catalog,
            DefectFilingPolicy::PerFailureEvent,
            &qa_actor(),
            Uuid::new_v4(),
            Uuid::new_v4(),
            submission(medium, "works"),
        )
        .await
        .unwrap_err();

        assert!(matches!(err, AppError::InvalidStatus(_)));
    }

    #[actix_rt::test]
    async fn test_submission_requires_qa_or_tester() {
        let catalog = StatusCatalog::from_models(catalog_rows());
        let passed = catalog
            .resolve(StatusCategory::TestCaseStatus, "Passed")
            .unwrap();

        let db = MockDatabase::new(DatabaseBackend::Postgres).into_connection();
        let pool = DbPool::from_connection(db);

        let developer = Actor {
            id: Uuid::new_v4(),
            username: "dev".to_string(),
            token_prefix: "qat_dev0".to_string(),
            roles: vec![Role::Developer],
        };

        let err = record_result(
            &pool,
            &catalog,
            DefectFilingPolicy::PerFailureEvent,
            &developer,
            Uuid::new_v4(),
            Uuid::new_v4(),
            submission(passed, "works"),
        )
        .await
        .unwrap_err();

        assert!(matches!(err, AppError::Unauthorized(_)));
    }
}
