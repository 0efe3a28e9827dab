//! PostgreSQL implementation of [`BudgetLedgerStore`].

use async_trait::async_trait;
use buildledger_core::budget::PlannedBudgetChange;
use buildledger_core::error::CoreError;
use buildledger_core::ledger::{BudgetChangeEntry, BudgetLedgerStore};
use buildledger_core::types::{DbId, Money};

use crate::models::budget_change::ApplyOutcome;
use crate::repositories::BudgetChangeRepo;
use crate::DbPool;

/// Budget ledger backed by the `projects` and `budget_changes` tables.
#[derive(Clone)]
pub struct PgBudgetLedger {
    pool: DbPool,
}

impl PgBudgetLedger {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

/// Log a database failure and hide its detail behind a persistence error.
fn persistence(op: &'static str, err: sqlx::Error) -> CoreError {
    tracing::error!(error = %err, op, "Budget ledger database error");
    CoreError::Persistence(format!("{op} failed"))
}

/// Log and build the conflict for a snapshot that no longer matches.
fn stale(project_id: DbId, expected: Money, current: Money) -> CoreError {
    tracing::warn!(project_id, expected, current, "Rejected stale budget snapshot");
    CoreError::Conflict(format!(
        "Budget for project {project_id} changed since it was read (expected {expected}, found {current})"
    ))
}

#[async_trait]
impl BudgetLedgerStore for PgBudgetLedger {
    async fn apply_budget_change(
        &self,
        change: &PlannedBudgetChange,
    ) -> Result<BudgetChangeEntry, CoreError> {
        let outcome = BudgetChangeRepo::apply(&self.pool, change)
            .await
            .map_err(|e| persistence("budget update", e))?;

        match outcome {
            ApplyOutcome::Applied(row) => BudgetChangeEntry::try_from(row),
            ApplyOutcome::ProjectMissing => Err(CoreError::NotFound {
                entity: "Project",
                id: change.project_id,
            }),
            ApplyOutcome::Stale { current } => Err(stale(change.project_id, change.old_value, current)),
        }
    }

    async fn confirm_unchanged(&self, project_id: DbId, expected: Money) -> Result<(), CoreError> {
        let current = BudgetChangeRepo::current_budget(&self.pool, project_id)
            .await
            .map_err(|e| persistence("budget read", e))?;

        match current {
            None => Err(CoreError::NotFound {
                entity: "Project",
                id: project_id,
            }),
            Some(current) if current != expected => Err(stale(project_id, expected, current)),
            Some(_) => Ok(()),
        }
    }

    async fn list_entries(&self, project_id: DbId) -> Result<Vec<BudgetChangeEntry>, CoreError> {
        BudgetChangeRepo::list_for_project(&self.pool, project_id)
            .await
            .map_err(|e| persistence("budget history read", e))?
            .into_iter()
            .map(BudgetChangeEntry::try_from)
            .collect()
    }
}
