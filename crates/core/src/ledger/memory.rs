//! In-process [`BudgetLedgerStore`] implementation.
//!
//! Keeps projects, actor names and entries behind a single mutex, so the
//! budget check, update and append happen under one lock. Used by unit tests,
//! the API test harness, and local runs without a database.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;
use chrono::Utc;

use super::{resolve_display_name, BudgetChangeEntry, BudgetLedgerStore};
use crate::budget::PlannedBudgetChange;
use crate::error::CoreError;
use crate::types::{DbId, Money};

#[derive(Default)]
struct State {
    budgets: HashMap<DbId, Money>,
    actors: HashMap<DbId, String>,
    entries: Vec<BudgetChangeEntry>,
    next_id: DbId,
    writes: usize,
    fail_writes: bool,
    fail_reads: bool,
}

impl State {
    fn check_current(&self, project_id: DbId, expected: Money) -> Result<(), CoreError> {
        let current = *self.budgets.get(&project_id).ok_or(CoreError::NotFound {
            entity: "Project",
            id: project_id,
        })?;

        if current != expected {
            return Err(CoreError::Conflict(format!(
                "Project budget changed from {expected} to {current} since it was read"
            )));
        }
        Ok(())
    }
}

/// Mutex-guarded ledger store.
#[derive(Default)]
pub struct InMemoryLedger {
    state: Mutex<State>,
}

impl InMemoryLedger {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Register a project with its current budget.
    pub fn insert_project(&self, project_id: DbId, planned_budget: Money) {
        self.lock().budgets.insert(project_id, planned_budget);
    }

    /// Register an actor display name.
    pub fn insert_user(&self, user_id: DbId, display_name: &str) {
        self.lock().actors.insert(user_id, display_name.to_string());
    }

    pub fn planned_budget(&self, project_id: DbId) -> Option<Money> {
        self.lock().budgets.get(&project_id).copied()
    }

    pub fn entry_count(&self) -> usize {
        self.lock().entries.len()
    }

    /// Number of successful `apply_budget_change` calls.
    pub fn write_count(&self) -> usize {
        self.lock().writes
    }

    /// Make subsequent writes fail with [`CoreError::Persistence`].
    pub fn fail_writes(&self, fail: bool) {
        self.lock().fail_writes = fail;
    }

    /// Make subsequent reads fail with [`CoreError::Persistence`].
    pub fn fail_reads(&self, fail: bool) {
        self.lock().fail_reads = fail;
    }
}

#[async_trait]
impl BudgetLedgerStore for InMemoryLedger {
    async fn apply_budget_change(
        &self,
        change: &PlannedBudgetChange,
    ) -> Result<BudgetChangeEntry, CoreError> {
        let mut state = self.lock();

        if state.fail_writes {
            return Err(CoreError::Persistence("ledger store unavailable".into()));
        }

        state.check_current(change.project_id, change.old_value)?;

        // Timestamps never go backwards within a project.
        let now = Utc::now();
        let created_at = state
            .entries
            .iter()
            .filter(|e| e.project_id == change.project_id)
            .map(|e| e.created_at)
            .max()
            .map_or(now, |last| last.max(now));

        state.next_id += 1;
        let entry = BudgetChangeEntry {
            id: state.next_id,
            project_id: change.project_id,
            changed_by: change.changed_by,
            changed_by_name: resolve_display_name(
                state.actors.get(&change.changed_by).map(String::as_str),
            ),
            old_value: change.old_value,
            new_value: change.new_value,
            change_amount: change.change_amount,
            reason: Some(change.reason.clone()),
            created_at,
        };

        state.budgets.insert(change.project_id, change.new_value);
        state.entries.push(entry.clone());
        state.writes += 1;
        Ok(entry)
    }

    async fn confirm_unchanged(&self, project_id: DbId, expected: Money) -> Result<(), CoreError> {
        let state = self.lock();
        if state.fail_reads {
            return Err(CoreError::Persistence("ledger store unavailable".into()));
        }
        state.check_current(project_id, expected)
    }

    async fn list_entries(&self, project_id: DbId) -> Result<Vec<BudgetChangeEntry>, CoreError> {
        let state = self.lock();
        if state.fail_reads {
            return Err(CoreError::Persistence("ledger store unavailable".into()));
        }
        Ok(state
            .entries
            .iter()
            .filter(|e| e.project_id == project_id)
            .cloned()
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn change(old: Money, new: Money) -> PlannedBudgetChange {
        PlannedBudgetChange {
            project_id: 3,
            changed_by: 8,
            old_value: old,
            new_value: new,
            change_amount: new - old,
            reason: "test".into(),
        }
    }

    #[tokio::test]
    async fn unresolved_actor_is_unknown() {
        let ledger = InMemoryLedger::new();
        ledger.insert_project(3, 10);
        let entry = ledger.apply_budget_change(&change(10, 20)).await.unwrap();
        assert_eq!(entry.changed_by_name, super::super::UNKNOWN_ACTOR);
    }

    #[tokio::test]
    async fn entries_are_scoped_per_project() {
        let ledger = InMemoryLedger::new();
        ledger.insert_project(3, 10);
        ledger.insert_project(4, 10);
        ledger.apply_budget_change(&change(10, 20)).await.unwrap();
        assert_eq!(ledger.list_entries(3).await.unwrap().len(), 1);
        assert!(ledger.list_entries(4).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn confirm_unchanged_compares_stored_budget() {
        let ledger = InMemoryLedger::new();
        ledger.insert_project(3, 10);
        ledger.apply_budget_change(&change(10, 20)).await.unwrap();

        assert!(ledger.confirm_unchanged(3, 20).await.is_ok());
        assert!(matches!(
            ledger.confirm_unchanged(3, 10).await,
            Err(CoreError::Conflict(_))
        ));
        assert!(matches!(
            ledger.confirm_unchanged(4, 10).await,
            Err(CoreError::NotFound { .. })
        ));
        assert_eq!(ledger.write_count(), 1);
    }

    #[tokio::test]
    async fn timestamps_are_non_decreasing() {
        let ledger = InMemoryLedger::new();
        ledger.insert_project(3, 0);
        let mut prev = 0;
        for next in [5, 9, 2, 7] {
            ledger.apply_budget_change(&change(prev, next)).await.unwrap();
            prev = next;
        }
        let entries = ledger.list_entries(3).await.unwrap();
        assert!(entries.windows(2).all(|w| w[0].created_at <= w[1].created_at));
    }
}
