//! Repository for the append-only `budget_changes` table.
//!
//! There are no update or delete methods; the table also rejects them with a
//! trigger.

use buildledger_core::budget::PlannedBudgetChange;
use buildledger_core::types::{DbId, Money};
use sqlx::{PgPool, Postgres, Transaction};

use crate::models::budget_change::{ApplyOutcome, BudgetChangeRow};

/// Column list for ledger reads, actor name joined from `users`.
const SELECT_WITH_ACTOR: &str = "\
    SELECT bc.id, bc.project_id, bc.changed_by, u.full_name AS changed_by_name, \
           bc.old_value, bc.new_value, bc.change_amount, bc.reason, bc.created_at \
    FROM budget_changes bc \
    LEFT JOIN users u ON u.id = bc.changed_by";

/// Provides append and read operations for the budget ledger.
pub struct BudgetChangeRepo;

impl BudgetChangeRepo {
    /// All entries for a project, newest first (`created_at`, then `id`).
    pub async fn list_for_project(
        pool: &PgPool,
        project_id: DbId,
    ) -> Result<Vec<BudgetChangeRow>, sqlx::Error> {
        let query = format!(
            "{SELECT_WITH_ACTOR} WHERE bc.project_id = $1 \
             ORDER BY bc.created_at DESC, bc.id DESC"
        );
        sqlx::query_as::<_, BudgetChangeRow>(&query)
            .bind(project_id)
            .fetch_all(pool)
            .await
    }

    /// The project's stored budget, or `None` for an unknown project.
    pub async fn current_budget(
        pool: &PgPool,
        project_id: DbId,
    ) -> Result<Option<Money>, sqlx::Error> {
        sqlx::query_scalar::<_, Money>("SELECT planned_budget FROM projects WHERE id = $1")
            .bind(project_id)
            .fetch_optional(pool)
            .await
    }

    /// Update the project budget and append one ledger entry in one transaction.
    ///
    /// The project row is locked with `FOR UPDATE` and its budget compared
    /// against `change.old_value` before anything is written. On
    /// [`ApplyOutcome::ProjectMissing`] or [`ApplyOutcome::Stale`] the
    /// transaction is dropped, which rolls it back.
    pub async fn apply(
        pool: &PgPool,
        change: &PlannedBudgetChange,
    ) -> Result<ApplyOutcome, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let current = sqlx::query_scalar::<_, Money>(
            "SELECT planned_budget FROM projects WHERE id = $1 FOR UPDATE",
        )
        .bind(change.project_id)
        .fetch_optional(&mut *tx)
        .await?;

        match current {
            None => return Ok(ApplyOutcome::ProjectMissing),
            Some(current) if current != change.old_value => {
                return Ok(ApplyOutcome::Stale { current })
            }
            Some(_) => {}
        }

        sqlx::query("UPDATE projects SET planned_budget = $2 WHERE id = $1")
            .bind(change.project_id)
            .bind(change.new_value)
            .execute(&mut *tx)
            .await?;

        let row = Self::insert_entry(&mut tx, change).await?;

        tx.commit().await?;
        Ok(ApplyOutcome::Applied(row))
    }

    /// Insert the ledger row inside an open transaction and read it back
    /// with the actor name joined.
    ///
    /// `created_at` never precedes the project's latest entry, even if the
    /// wall clock steps back. The project row lock serializes writers.
    async fn insert_entry(
        tx: &mut Transaction<'_, Postgres>,
        change: &PlannedBudgetChange,
    ) -> Result<BudgetChangeRow, sqlx::Error> {
        let id = sqlx::query_scalar::<_, DbId>(
            "INSERT INTO budget_changes \
                 (project_id, changed_by, old_value, new_value, change_amount, reason, created_at) \
             VALUES ($1, $2, $3, $4, $5, $6, GREATEST( \
                 clock_timestamp(), \
                 (SELECT MAX(created_at) FROM budget_changes WHERE project_id = $1) \
             )) \
             RETURNING id",
        )
        .bind(change.project_id)
        .bind(change.changed_by)
        .bind(change.old_value)
        .bind(change.new_value)
        .bind(change.change_amount)
        .bind(&change.reason)
        .fetch_one(&mut **tx)
        .await?;

        let query = format!("{SELECT_WITH_ACTOR} WHERE bc.id = $1");
        sqlx::query_as::<_, BudgetChangeRow>(&query)
            .bind(id)
            .fetch_one(&mut **tx)
            .await
    }
}
