//! Budget ledger row model.
//!
//! Ledger rows have no `updated_at` field (immutable records). Raw rows are
//! narrowed into [`BudgetChangeEntry`] through `TryFrom`, which re-checks the
//! delta and resolves the actor name.

use buildledger_core::error::CoreError;
use buildledger_core::ledger::{resolve_display_name, BudgetChangeEntry};
use buildledger_core::types::{DbId, Money, Timestamp};
use sqlx::FromRow;

/// A `budget_changes` row with the actor's `full_name` joined in.
#[derive(Debug, Clone, FromRow)]
pub struct BudgetChangeRow {
    pub id: DbId,
    pub project_id: DbId,
    pub changed_by: DbId,
    /// `users.full_name`, `NULL` when the actor is gone or has no name.
    pub changed_by_name: Option<String>,
    pub old_value: Money,
    pub new_value: Money,
    pub change_amount: Money,
    pub reason: Option<String>,
    pub created_at: Timestamp,
}

impl TryFrom<BudgetChangeRow> for BudgetChangeEntry {
    type Error = CoreError;

    fn try_from(row: BudgetChangeRow) -> Result<Self, Self::Error> {
        if row.old_value < 0 || row.new_value < 0 {
            return Err(CoreError::Persistence(format!(
                "budget change {} has a negative value",
                row.id
            )));
        }
        if row.new_value.checked_sub(row.old_value) != Some(row.change_amount) {
            return Err(CoreError::Persistence(format!(
                "budget change {} has an inconsistent change_amount",
                row.id
            )));
        }

        Ok(BudgetChangeEntry {
            id: row.id,
            project_id: row.project_id,
            changed_by: row.changed_by,
            changed_by_name: resolve_display_name(row.changed_by_name.as_deref()),
            old_value: row.old_value,
            new_value: row.new_value,
            change_amount: row.change_amount,
            reason: row.reason,
            created_at: row.created_at,
        })
    }
}

/// Outcome of the transactional budget write.
#[derive(Debug)]
pub enum ApplyOutcome {
    /// Project updated and entry appended; the transaction is committed.
    Applied(BudgetChangeRow),
    /// No project with the given id. Nothing written.
    ProjectMissing,
    /// The stored budget differs from the expected previous value. Nothing written.
    Stale { current: Money },
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use buildledger_core::ledger::UNKNOWN_ACTOR;
    use chrono::Utc;

    fn row(old: Money, new: Money, amount: Money, name: Option<&str>) -> BudgetChangeRow {
        BudgetChangeRow {
            id: 11,
            project_id: 2,
            changed_by: 3,
            changed_by_name: name.map(str::to_string),
            old_value: old,
            new_value: new,
            change_amount: amount,
            reason: Some("variation".into()),
            created_at: Utc::now(),
        }
    }

    #[test]
    fn consistent_row_narrows() {
        let entry = BudgetChangeEntry::try_from(row(100, 250, 150, Some("Kim Lee"))).unwrap();
        assert_eq!(entry.changed_by_name, "Kim Lee");
        assert_eq!(entry.change_amount, 150);
    }

    #[test]
    fn missing_actor_name_falls_back() {
        let entry = BudgetChangeEntry::try_from(row(100, 50, -50, None)).unwrap();
        assert_eq!(entry.changed_by_name, UNKNOWN_ACTOR);
    }

    #[test]
    fn inconsistent_delta_rejected() {
        assert_matches!(
            BudgetChangeEntry::try_from(row(100, 250, 100, None)),
            Err(CoreError::Persistence(msg)) if msg.contains("change_amount")
        );
    }

    #[test]
    fn negative_value_rejected() {
        assert_matches!(
            BudgetChangeEntry::try_from(row(-5, 10, 15, None)),
            Err(CoreError::Persistence(_))
        );
    }
}
