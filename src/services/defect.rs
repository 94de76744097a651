//! Defect resolution workflow.
//!
//! Resolving a defect closes the loop of the execution workflow: the defect
//! gains a resolution timestamp and the execution that produced it, when one
//! exists, is reset to Retest so the case can be re-executed. Both writes
//! happen in one transaction.

use sea_orm::{ConnectionTrait, TransactionTrait};
use tracing::info;
use uuid::Uuid;

use crate::auth;
use crate::db::{self, DbPool};
use crate::entity::{defect, test_execution};
use crate::error::{AppError, AppResult};
use crate::models::{Actor, Role, StatusCategory};
use crate::services::catalog::{StatusCatalog, names};

/// Optional field overrides applied while resolving.
#[derive(Default)]
pub struct ResolveDefect {
    pub steps_to_reproduce: Option<String>,
    pub severity: Option<String>,
}

/// Outcome of a defect resolution.
#[derive(Debug)]
pub struct ResolvedDefect {
    pub defect: defect::Model,
    pub reopened_execution: Option<test_execution::Model>,
}

/// Resolve a defect and reopen the originating execution for retest.
///
/// Requires the Tester role. Team reassignment is best-effort: when the
/// defect's reporting team is among the actor's teams the defect is assigned
/// to it, otherwise the assignment is left untouched. A defect without a
/// matching execution resolves normally; no execution is created.
pub async fn resolve_defect(
    pool: &DbPool,
    catalog: &StatusCatalog,
    actor: &Actor,
    defect_id: Uuid,
    fields: ResolveDefect,
) -> AppResult<ResolvedDefect> {
    auth::authorize(actor, &[Role::Tester])?;

    let txn = pool.connection().begin().await?;

    match resolve_in_txn(&txn, catalog, actor, defect_id, fields).await {
        Ok(outcome) => {
            txn.commit().await?;

            info!(
                defect_id = %outcome.defect.id,
                reopened = outcome.reopened_execution.is_some(),
                "Resolved defect"
            );

            Ok(outcome)
        }
        Err(e) => {
            txn.rollback().await?;
            Err(e)
        }
    }
}

async fn resolve_in_txn<C: ConnectionTrait>(
    txn: &C,
    catalog: &StatusCatalog,
    actor: &Actor,
    defect_id: Uuid,
    fields: ResolveDefect,
) -> AppResult<ResolvedDefect> {
    let existing = db::defects::find_by_id(txn, defect_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Defect".to_string()))?;

    // Best-effort reassignment to the reporting team when the actor is a
    // member of it; an actor without teams does not fail the operation.
    let actor_teams = db::teams::team_ids_of_actor(txn, actor.id).await?;
    let assigned_to_team_id = actor_teams
        .contains(&existing.reported_by_team_id)
        .then_some(existing.reported_by_team_id);

    let pair = (existing.test_run_id, existing.test_case_id);

    let defect = db::defects::mark_resolved(
        txn,
        existing,
        fields.steps_to_reproduce,
        fields.severity,
        assigned_to_team_id,
        chrono::Utc::now(),
    )
    .await?;

    // Feedback step: reset the originating execution to Retest. A defect
    // with no (run, case) link, or one whose execution is gone, resolves
    // without touching the execution table.
    let reopened_execution = match pair {
        (Some(test_run_id), Some(test_case_id)) => {
            match db::test_executions::find_by_pair(txn, test_run_id, test_case_id).await? {
                Some(execution) => {
                    let retest_id = catalog.require(StatusCategory::TestCaseStatus, names::RETEST)?;
                    Some(db::test_executions::update_status(txn, execution, retest_id).await?)
                }
                None => None,
            }
        }
        _ => None,
    };

    Ok(ResolvedDefect {
        defect,
        reopened_execution,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use sea_orm::{DatabaseBackend, MockDatabase};

    use crate::entity::{status_code, team_member};

    fn catalog_rows() -> Vec<status_code::Model> {
        [
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

    fn tester() -> Actor {
        Actor {
            id: Uuid::new_v4(),
            username: "bob".to_string(),
            token_prefix: "qat_bob0".to_string(),
            roles: vec![Role::Tester],
        }
    }

    fn open_defect(team_id: Uuid, pair: Option<(Uuid, Uuid)>) -> defect::Model {
        defect::Model {
            id: Uuid::now_v7(),
            title: "Login crashes".to_string(),
            description: Some("crashed".to_string()),
            steps_to_reproduce: Some("N/A".to_string()),
            severity: "Unspecified".to_string(),
            priority_id: Uuid::new_v4(),
            reported_at: Utc::now(),
            resolved_at: None,
            reported_by_team_id: team_id,
            assigned_to_team_id: None,
            test_run_id: pair.map(|(run_id, _)| run_id),
            test_case_id: pair.map(|(_, case_id)| case_id),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn resolved_copy(defect: &defect::Model, assigned: Option<Uuid>) -> defect::Model {
        defect::Model {
            resolved_at: Some(Utc::now()),
            assigned_to_team_id: assigned,
            ..defect.clone()
        }
    }

    fn execution(run_id: Uuid, case_id: Uuid, status_id: Uuid) -> test_execution::Model {
        test_execution::Model {
            id: Uuid::now_v7(),
            test_run_id: run_id,
            test_case_id: case_id,
            actual_result: "crashed".to_string(),
            status_id,
            executing_team_id: Uuid::new_v4(),
            executed_at: Utc::now(),
            retries: 0,
            created_at: Utc::now(),
        }
    }

    fn membership(team_id: Uuid, actor_id: Uuid) -> team_member::Model {
        team_member::Model {
            id: Uuid::now_v7(),
            team_id,
            actor_id,
            created_at: Utc::now(),
        }
    }

    #[actix_rt::test]
    async fn test_resolution_reopens_execution_for_retest() {
        let catalog = StatusCatalog::from_models(catalog_rows());
        let failed = catalog
            .resolve(StatusCategory::TestCaseStatus, "Failed")
            .unwrap();
        let retest = catalog
            .resolve(StatusCategory::TestCaseStatus, "Retest")
            .unwrap();

        let actor = tester();
        let team_id = Uuid::new_v4();
        let run_id = Uuid::new_v4();
        let case_id = Uuid::new_v4();

        let defect = open_defect(team_id, Some((run_id, case_id)));
        let resolved = resolved_copy(&defect, Some(team_id));
        let failing = execution(run_id, case_id, failed);
        let reopened = test_execution::Model {
            status_id: retest,
            ..failing.clone()
        };

        // find defect, actor teams, resolve update, find execution, status reset
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![defect.clone()]])
            .append_query_results([vec![membership(team_id, actor.id)]])
            .append_query_results([vec![resolved]])
            .append_query_results([vec![failing]])
            .append_query_results([vec![reopened]])
            .into_connection();
        let pool = DbPool::from_connection(db);

        let outcome = resolve_defect(&pool, &catalog, &actor, defect.id, ResolveDefect::default())
            .await
            .unwrap();

        assert!(outcome.defect.resolved_at.is_some());
        assert_eq!(outcome.defect.assigned_to_team_id, Some(team_id));

        let execution = outcome.reopened_execution.expect("execution should reopen");
        assert_eq!(execution.status_id, retest);
    }

    #[actix_rt::test]
    async fn test_resolution_without_execution_is_a_no_op_reopen() {
        let catalog = StatusCatalog::from_models(catalog_rows());

        let actor = tester();
        let team_id = Uuid::new_v4();

        // Manual defect: no (run, case) link at all.
        let defect = open_defect(team_id, None);
        let resolved = resolved_copy(&defect, None);

        // find defect, actor teams (none), resolve update - no execution queries
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![defect.clone()]])
            .append_query_results([Vec::<team_member::Model>::new()])
            .append_query_results([vec![resolved]])
            .into_connection();
        let pool = DbPool::from_connection(db);

        let outcome = resolve_defect(&pool, &catalog, &actor, defect.id, ResolveDefect::default())
            .await
            .unwrap();

        assert!(outcome.defect.resolved_at.is_some());
        assert!(outcome.reopened_execution.is_none());
    }

    #[actix_rt::test]
    async fn test_resolution_with_vanished_execution_does_not_error() {
        let catalog = StatusCatalog::from_models(catalog_rows());

        let actor = tester();
        let team_id = Uuid::new_v4();
        let defect = open_defect(team_id, Some((Uuid::new_v4(), Uuid::new_v4())));
        let resolved = resolved_copy(&defect, None);

        // find defect, actor teams, resolve update, find execution (gone)
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![defect.clone()]])
            .append_query_results([Vec::<team_member::Model>::new()])
            .append_query_results([vec![resolved]])
            .append_query_results([Vec::<test_execution::Model>::new()])
            .into_connection();
        let pool = DbPool::from_connection(db);

        let outcome = resolve_defect(&pool, &catalog, &actor, defect.id, ResolveDefect::default())
            .await
            .unwrap();

        assert!(outcome.reopened_execution.is_none());
    }

    #[actix_rt::test]
    async fn test_resolution_requires_tester() {
        let catalog = StatusCatalog::from_models(catalog_rows());

        let db = MockDatabase::new(DatabaseBackend::Postgres).into_connection();
        let pool = DbPool::from_connection(db);

        let qa = Actor {
            id: Uuid::new_v4(),
            username: "alice".to_string(),
            token_prefix: "qat_ali0".to_string(),
            roles: vec![Role::Qa],
        };

        let err = resolve_defect(&pool, &catalog, &qa, Uuid::new_v4(), ResolveDefect::default())
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::Unauthorized(_)));
    }

    #[actix_rt::test]
    async fn test_unknown_defect_is_not_found() {
        let catalog = StatusCatalog::from_models(catalog_rows());

        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([Vec::<defect::Model>::new()])
            .into_connection();
        let pool = DbPool::from_connection(db);

        let err = resolve_defect(
            &pool,
            &catalog,
            &tester(),
            Uuid::new_v4(),
            ResolveDefect::default(),
        )
        .await
        .unwrap_err();

        assert!(matches!(err, AppError::NotFound(_)));
    }
}
