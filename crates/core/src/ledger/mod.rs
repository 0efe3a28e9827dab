//! Budget ledger: the append-only history of budget changes per project.
//!
//! - [`BudgetChangeEntry`] -- one immutable ledger row, actor name resolved.
//! - [`BudgetLedgerStore`] -- storage seam; PostgreSQL lives in `buildledger-db`,
//!   [`memory::InMemoryLedger`] is the in-process implementation.
//! - [`get_history`] -- newest-first history read.
//! - [`chain`] -- walk-consistency verification over a history.

pub mod chain;
pub mod memory;

use async_trait::async_trait;
use serde::Serialize;

use crate::budget::PlannedBudgetChange;
use crate::error::CoreError;
use crate::types::{DbId, Money, Timestamp};

pub use chain::{verify_chain, ChainCheckResult};

/// Display name used when an actor cannot be resolved.
pub const UNKNOWN_ACTOR: &str = "Unknown";

/// One immutable budget ledger entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BudgetChangeEntry {
    pub id: DbId,
    pub project_id: DbId,
    pub changed_by: DbId,
    /// Actor display name, or [`UNKNOWN_ACTOR`].
    pub changed_by_name: String,
    pub old_value: Money,
    pub new_value: Money,
    /// Always `new_value - old_value`.
    pub change_amount: Money,
    pub reason: Option<String>,
    pub created_at: Timestamp,
}

/// Resolve an optional joined display name, falling back to [`UNKNOWN_ACTOR`].
pub fn resolve_display_name(name: Option<&str>) -> String {
    match name.map(str::trim) {
        Some(n) if !n.is_empty() => n.to_string(),
        _ => UNKNOWN_ACTOR.to_string(),
    }
}

/// Storage for the budget ledger.
///
/// Implementations must make [`apply_budget_change`](Self::apply_budget_change)
/// atomic: either the project's budget is updated *and* one entry is appended,
/// or nothing changes. They must also refuse the write with
/// [`CoreError::Conflict`] when the stored budget differs from
/// `change.old_value`, and return [`CoreError::NotFound`] for an unknown
/// project. [`confirm_unchanged`](Self::confirm_unchanged) applies the same
/// two checks without writing.
#[async_trait]
pub trait BudgetLedgerStore: Send + Sync {
    /// Update the project budget and append one entry as a single unit.
    async fn apply_budget_change(
        &self,
        change: &PlannedBudgetChange,
    ) -> Result<BudgetChangeEntry, CoreError>;

    /// Check that the stored budget still equals `expected`. Writes nothing.
    async fn confirm_unchanged(&self, project_id: DbId, expected: Money) -> Result<(), CoreError>;

    /// All entries for a project with actor names resolved. Any order.
    async fn list_entries(&self, project_id: DbId) -> Result<Vec<BudgetChangeEntry>, CoreError>;
}

/// Sort entries newest first: `created_at` descending, then `id` descending.
///
/// `id` is the insertion sequence, so equal timestamps keep a stable order.
pub fn sort_newest_first(entries: &mut [BudgetChangeEntry]) {
    entries.sort_by(|a, b| {
        b.created_at
            .cmp(&a.created_at)
            .then_with(|| b.id.cmp(&a.id))
    });
}

/// Read a project's full budget history, newest first.
///
/// An empty vector means the budget was never changed.
pub async fn get_history(
    store: &dyn BudgetLedgerStore,
    project_id: DbId,
) -> Result<Vec<BudgetChangeEntry>, CoreError> {
    let mut entries = store.list_entries(project_id).await?;
    sort_newest_first(&mut entries);
    tracing::debug!(project_id, count = entries.len(), "Loaded budget history");
    Ok(entries)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn entry(id: DbId, secs: i64) -> BudgetChangeEntry {
        BudgetChangeEntry {
            id,
            project_id: 1,
            changed_by: 1,
            changed_by_name: "Test User".into(),
            old_value: 0,
            new_value: 1,
            change_amount: 1,
            reason: None,
            created_at: Utc.timestamp_opt(1_700_000_000 + secs, 0).unwrap(),
        }
    }

    #[test]
    fn display_name_fallback() {
        assert_eq!(resolve_display_name(Some("Grace Hopper")), "Grace Hopper");
        assert_eq!(resolve_display_name(Some("  Grace  ")), "Grace");
        assert_eq!(resolve_display_name(Some("   ")), UNKNOWN_ACTOR);
        assert_eq!(resolve_display_name(None), UNKNOWN_ACTOR);
    }

    #[test]
    fn sorts_by_created_at_descending() {
        let mut entries = vec![entry(1, 0), entry(2, 20), entry(3, 10)];
        sort_newest_first(&mut entries);
        let ids: Vec<_> = entries.iter().map(|e| e.id).collect();
        assert_eq!(ids, vec![2, 3, 1]);
    }

    #[test]
    fn equal_timestamps_break_ties_by_insertion_sequence() {
        let mut a = vec![entry(4, 5), entry(7, 5), entry(5, 5)];
        let mut b = vec![entry(5, 5), entry(4, 5), entry(7, 5)];
        sort_newest_first(&mut a);
        sort_newest_first(&mut b);
        let ids_a: Vec<_> = a.iter().map(|e| e.id).collect();
        let ids_b: Vec<_> = b.iter().map(|e| e.id).collect();
        assert_eq!(ids_a, vec![7, 5, 4]);
        assert_eq!(ids_a, ids_b);
    }

    #[tokio::test]
    async fn history_of_untouched_project_is_empty() {
        let ledger = memory::InMemoryLedger::new();
        ledger.insert_project(9, 100);
        let history = get_history(&ledger, 9).await.unwrap();
        assert!(history.is_empty());
    }

    #[tokio::test]
    async fn read_failure_is_persistence_error() {
        let ledger = memory::InMemoryLedger::new();
        ledger.fail_reads(true);
        let result = get_history(&ledger, 1).await;
        assert!(matches!(result, Err(CoreError::Persistence(_))));
    }
}
