//! Integration tests for the PostgreSQL budget ledger.
//!
//! Exercises the transactional write path against a real database:
//! - Budget update and ledger append commit together
//! - Stale snapshots and unknown projects write nothing
//! - The ledger table rejects UPDATE and DELETE
//! - Actor names resolve, with a fallback for unknown actors

use assert_matches::assert_matches;
use buildledger_core::budget::{propose_budget_change, BudgetChangeOutcome};
use buildledger_core::error::CoreError;
use buildledger_core::ledger::{get_history, verify_chain, BudgetLedgerStore, UNKNOWN_ACTOR};
use buildledger_core::roles::{ROLE_ADMIN, ROLE_MEMBER};
use buildledger_core::session::Session;
use buildledger_db::ledger::PgBudgetLedger;
use buildledger_db::models::project::CreateProject;
use buildledger_db::models::user::CreateUser;
use buildledger_db::repositories::{BudgetChangeRepo, ProjectRepo, UserRepo};
use sqlx::PgPool;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

async fn seed_admin(pool: &PgPool, full_name: Option<&str>) -> Session {
    let user = UserRepo::create(
        pool,
        &CreateUser {
            email: "pm@example.com".into(),
            password_hash: "not-a-real-hash".into(),
            full_name: full_name.map(str::to_string),
            role: ROLE_ADMIN.into(),
        },
    )
    .await
    .unwrap();
    Session::new(user.id, user.role)
}

async fn seed_project(pool: &PgPool, budget: i64) -> buildledger_db::models::project::Project {
    ProjectRepo::create(
        pool,
        &CreateProject {
            name: "Riverside Clinic".into(),
            code: "RC-01".into(),
            status: None,
            planned_budget: budget,
            start_year: Some(2026),
        },
    )
    .await
    .unwrap()
}

async fn ledger_rows(pool: &PgPool) -> i64 {
    sqlx::query_scalar("SELECT COUNT(*) FROM budget_changes")
        .fetch_one(pool)
        .await
        .unwrap()
}

// ---------------------------------------------------------------------------
// Write path
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn change_updates_budget_and_appends_entry(pool: PgPool) {
    let session = seed_admin(&pool, Some("Dana Whitfield")).await;
    let project = seed_project(&pool, 1_000_000).await;
    let store = PgBudgetLedger::new(pool.clone());

    let outcome = propose_budget_change(
        &store,
        &session,
        &project.budget_snapshot(),
        1_250_000,
        "Change order #4: added basement",
    )
    .await
    .unwrap();

    let entry = outcome.entry().cloned().unwrap();
    assert_eq!(entry.old_value, 1_000_000);
    assert_eq!(entry.new_value, 1_250_000);
    assert_eq!(entry.change_amount, 250_000);
    assert_eq!(entry.changed_by, session.user_id);
    assert_eq!(entry.changed_by_name, "Dana Whitfield");
    assert_eq!(entry.reason.as_deref(), Some("Change order #4: added basement"));

    let reloaded = ProjectRepo::find_by_id(&pool, project.id).await.unwrap().unwrap();
    assert_eq!(reloaded.planned_budget, 1_250_000);
    assert_eq!(reloaded.initial_budget, 1_000_000);
    assert_eq!(ledger_rows(&pool).await, 1);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn unchanged_value_writes_nothing(pool: PgPool) {
    let session = seed_admin(&pool, Some("Dana Whitfield")).await;
    let project = seed_project(&pool, 500).await;
    let store = PgBudgetLedger::new(pool.clone());

    let outcome =
        propose_budget_change(&store, &session, &project.budget_snapshot(), 500, "")
            .await
            .unwrap();

    assert_matches!(outcome, BudgetChangeOutcome::Unchanged);
    assert_eq!(ledger_rows(&pool).await, 0);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn member_cannot_change_budget(pool: PgPool) {
    let project = seed_project(&pool, 500).await;
    let store = PgBudgetLedger::new(pool.clone());
    let member = Session::new(99, ROLE_MEMBER);

    let result =
        propose_budget_change(&store, &member, &project.budget_snapshot(), 700, "more").await;

    assert_matches!(result, Err(CoreError::Forbidden(_)));
    let reloaded = ProjectRepo::find_by_id(&pool, project.id).await.unwrap().unwrap();
    assert_eq!(reloaded.planned_budget, 500);
    assert_eq!(ledger_rows(&pool).await, 0);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn stale_snapshot_is_rejected_without_writes(pool: PgPool) {
    let session = seed_admin(&pool, Some("Dana Whitfield")).await;
    let project = seed_project(&pool, 100).await;
    let store = PgBudgetLedger::new(pool.clone());
    let stale = project.budget_snapshot();

    propose_budget_change(&store, &session, &stale, 200, "first")
        .await
        .unwrap();
    let result = propose_budget_change(&store, &session, &stale, 300, "second").await;

    assert_matches!(result, Err(CoreError::Conflict(_)));
    let reloaded = ProjectRepo::find_by_id(&pool, project.id).await.unwrap().unwrap();
    assert_eq!(reloaded.planned_budget, 200);
    assert_eq!(ledger_rows(&pool).await, 1);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn stale_snapshot_cannot_claim_unchanged(pool: PgPool) {
    let session = seed_admin(&pool, Some("Dana Whitfield")).await;
    let project = seed_project(&pool, 1_000).await;
    let store = PgBudgetLedger::new(pool.clone());
    let stale = project.budget_snapshot();

    propose_budget_change(&store, &session, &stale, 1_100, "first")
        .await
        .unwrap();
    let result = propose_budget_change(&store, &session, &stale, 1_000, "").await;

    assert_matches!(result, Err(CoreError::Conflict(_)));
    let reloaded = ProjectRepo::find_by_id(&pool, project.id).await.unwrap().unwrap();
    assert_eq!(reloaded.planned_budget, 1_100);
    assert_eq!(ledger_rows(&pool).await, 1);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn unknown_project_is_not_found(pool: PgPool) {
    let session = seed_admin(&pool, None).await;
    let store = PgBudgetLedger::new(pool.clone());
    let snapshot = buildledger_core::project::BudgetSnapshot {
        project_id: 424_242,
        planned_budget: 10,
    };

    let result = propose_budget_change(&store, &session, &snapshot, 20, "growth").await;

    assert_matches!(result, Err(CoreError::NotFound { entity: "Project", id: 424_242 }));
    assert_eq!(ledger_rows(&pool).await, 0);
}

// ---------------------------------------------------------------------------
// Read path
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn history_is_newest_first_and_chains(pool: PgPool) {
    let session = seed_admin(&pool, Some("Dana Whitfield")).await;
    let project = seed_project(&pool, 100).await;
    let store = PgBudgetLedger::new(pool.clone());

    let mut snapshot = project.budget_snapshot();
    for (value, reason) in [(150, "scope"), (120, "value engineering"), (400, "phase two")] {
        propose_budget_change(&store, &session, &snapshot, value, reason)
            .await
            .unwrap();
        snapshot.planned_budget = value;
    }

    let history = get_history(&store, project.id).await.unwrap();
    let values: Vec<i64> = history.iter().map(|e| e.new_value).collect();
    assert_eq!(values, vec![400, 120, 150]);

    let check = verify_chain(&history, Some(project.initial_budget), 400);
    assert!(check.chain_valid, "{:?}", check.issue);
    assert_eq!(check.verified_entries, 3);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn unnamed_actor_reads_as_unknown(pool: PgPool) {
    let session = seed_admin(&pool, None).await;
    let project = seed_project(&pool, 100).await;
    let store = PgBudgetLedger::new(pool.clone());

    propose_budget_change(&store, &session, &project.budget_snapshot(), 90, "savings")
        .await
        .unwrap();

    let entries = store.list_entries(project.id).await.unwrap();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].changed_by_name, UNKNOWN_ACTOR);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn empty_history_for_untouched_project(pool: PgPool) {
    let project = seed_project(&pool, 100).await;

    let rows = BudgetChangeRepo::list_for_project(&pool, project.id)
        .await
        .unwrap();

    assert!(rows.is_empty());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn entry_time_never_precedes_latest_entry(pool: PgPool) {
    let session = seed_admin(&pool, Some("Dana Whitfield")).await;
    let project = seed_project(&pool, 100).await;
    let store = PgBudgetLedger::new(pool.clone());

    // An earlier entry stamped ahead of the database clock.
    let ahead: chrono::DateTime<chrono::Utc> = sqlx::query_scalar(
        "INSERT INTO budget_changes \
             (project_id, changed_by, old_value, new_value, change_amount, reason, created_at) \
         VALUES ($1, $2, 100, 150, 50, 'clock ahead', now() + INTERVAL '1 hour') \
         RETURNING created_at",
    )
    .bind(project.id)
    .bind(session.user_id)
    .fetch_one(&pool)
    .await
    .unwrap();
    sqlx::query("UPDATE projects SET planned_budget = 150 WHERE id = $1")
        .bind(project.id)
        .execute(&pool)
        .await
        .unwrap();

    let mut snapshot = project.budget_snapshot();
    snapshot.planned_budget = 150;
    let entry = propose_budget_change(&store, &session, &snapshot, 175, "follow-up")
        .await
        .unwrap()
        .entry()
        .cloned()
        .unwrap();

    assert!(entry.created_at >= ahead);
    let history = get_history(&store, project.id).await.unwrap();
    assert_eq!(history[0].id, entry.id);
}

// ---------------------------------------------------------------------------
// Append-only enforcement
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn ledger_rows_cannot_be_updated_or_deleted(pool: PgPool) {
    let session = seed_admin(&pool, Some("Dana Whitfield")).await;
    let project = seed_project(&pool, 100).await;
    let store = PgBudgetLedger::new(pool.clone());
    let entry = propose_budget_change(&store, &session, &project.budget_snapshot(), 90, "savings")
        .await
        .unwrap()
        .entry()
        .cloned()
        .unwrap();

    let update = sqlx::query("UPDATE budget_changes SET reason = 'edited' WHERE id = $1")
        .bind(entry.id)
        .execute(&pool)
        .await;
    assert!(update.is_err(), "UPDATE on budget_changes must fail");

    let delete = sqlx::query("DELETE FROM budget_changes WHERE id = $1")
        .bind(entry.id)
        .execute(&pool)
        .await;
    assert!(delete.is_err(), "DELETE on budget_changes must fail");

    assert_eq!(ledger_rows(&pool).await, 1);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn inconsistent_delta_is_rejected_by_schema(pool: PgPool) {
    let project = seed_project(&pool, 100).await;

    let result = sqlx::query(
        "INSERT INTO budget_changes (project_id, changed_by, old_value, new_value, change_amount) \
         VALUES ($1, 1, 100, 200, 50)",
    )
    .bind(project.id)
    .execute(&pool)
    .await;

    assert!(result.is_err());
}
