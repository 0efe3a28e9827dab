//! Budget value authority.
//!
//! The only path that may change a project's `planned_budget`. Every genuine
//! change is turned into a [`PlannedBudgetChange`] and handed to a
//! [`BudgetLedgerStore`], which writes the project update and the ledger
//! entry as one unit. Identical values short-circuit to a no-op once the
//! store confirms the snapshot is still current.

use serde::Serialize;

use crate::error::CoreError;
use crate::ledger::{BudgetChangeEntry, BudgetLedgerStore};
use crate::project::BudgetSnapshot;
use crate::session::Session;
use crate::types::{DbId, Money};

/// A validated change, ready to be written by a ledger store.
///
/// `old_value` is the caller's snapshot of the budget. Stores must refuse the
/// write when the persisted budget no longer equals it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlannedBudgetChange {
    pub project_id: DbId,
    pub changed_by: DbId,
    pub old_value: Money,
    pub new_value: Money,
    pub change_amount: Money,
    pub reason: String,
}

/// Result of running the authority's checks on a request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BudgetChangeDecision {
    /// The requested value equals the current budget; nothing to write.
    Unchanged,
    Apply(PlannedBudgetChange),
}

/// What [`propose_budget_change`] did.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum BudgetChangeOutcome {
    Unchanged,
    Recorded { entry: BudgetChangeEntry },
}

impl BudgetChangeOutcome {
    pub fn entry(&self) -> Option<&BudgetChangeEntry> {
        match self {
            BudgetChangeOutcome::Unchanged => None,
            BudgetChangeOutcome::Recorded { entry } => Some(entry),
        }
    }
}

/// Checks that need neither the current budget nor storage.
///
/// The HTTP layer runs this before loading a project so authorization and
/// value errors are reported without a database round-trip.
pub fn precheck(session: &Session, new_value: Money) -> Result<(), CoreError> {
    session.require_admin("change a project budget")?;
    if new_value < 0 {
        return Err(CoreError::Validation(
            "Budget must be a non-negative amount".into(),
        ));
    }
    Ok(())
}

/// Decide what a budget change request amounts to, without side effects.
///
/// Order matters: authorization first (so a member never learns anything from
/// a no-op), then the value, then the no-op short-circuit, then the reason.
pub fn plan_budget_change(
    session: &Session,
    snapshot: &BudgetSnapshot,
    new_value: Money,
    reason: &str,
) -> Result<BudgetChangeDecision, CoreError> {
    precheck(session, new_value)?;

    if new_value == snapshot.planned_budget {
        return Ok(BudgetChangeDecision::Unchanged);
    }

    let reason = reason.trim();
    if reason.is_empty() {
        return Err(CoreError::Validation(
            "A reason is required when changing the budget".into(),
        ));
    }

    let change_amount = new_value
        .checked_sub(snapshot.planned_budget)
        .ok_or_else(|| CoreError::Validation("Budget change amount overflows".into()))?;

    Ok(BudgetChangeDecision::Apply(PlannedBudgetChange {
        project_id: snapshot.project_id,
        changed_by: session.user_id,
        old_value: snapshot.planned_budget,
        new_value,
        change_amount,
        reason: reason.to_string(),
    }))
}

/// Propose a new approved budget for a project.
///
/// On a genuine change exactly one ledger entry is appended and the
/// project's budget is updated in the same store transaction. A no-op is
/// only reported when the stored budget still equals the snapshot; a stale
/// snapshot is a [`CoreError::Conflict`] either way. Errors are returned
/// as-is; nothing is retried.
pub async fn propose_budget_change(
    store: &dyn BudgetLedgerStore,
    session: &Session,
    snapshot: &BudgetSnapshot,
    new_value: Money,
    reason: &str,
) -> Result<BudgetChangeOutcome, CoreError> {
    match plan_budget_change(session, snapshot, new_value, reason)? {
        BudgetChangeDecision::Unchanged => {
            store
                .confirm_unchanged(snapshot.project_id, snapshot.planned_budget)
                .await?;
            tracing::debug!(
                project_id = snapshot.project_id,
                user_id = session.user_id,
                "Budget unchanged, no ledger entry written"
            );
            Ok(BudgetChangeOutcome::Unchanged)
        }
        BudgetChangeDecision::Apply(change) => {
            let entry = store.apply_budget_change(&change).await?;
            tracing::info!(
                project_id = entry.project_id,
                entry_id = entry.id,
                user_id = entry.changed_by,
                old_value = entry.old_value,
                new_value = entry.new_value,
                change_amount = entry.change_amount,
                "Budget change recorded"
            );
            Ok(BudgetChangeOutcome::Recorded { entry })
        }
    }
}
