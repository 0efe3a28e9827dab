//! Walk-consistency verification for a project's budget history.
//!
//! Chronologically, each entry must start where the previous one ended, the
//! first entry must start at the project's initial budget, and the last one
//! must end at the project's current budget.

use serde::Serialize;

use super::BudgetChangeEntry;
use crate::types::{DbId, Money};

/// Result of a chain verification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChainCheckResult {
    /// Number of entries checked before the first break (or all of them).
    pub verified_entries: usize,
    /// Whether the whole history is consistent.
    pub chain_valid: bool,
    /// ID of the first entry (chronologically) where the chain breaks.
    pub first_break: Option<DbId>,
    /// Human-readable description of the break.
    pub issue: Option<String>,
}

impl ChainCheckResult {
    fn valid(verified_entries: usize) -> Self {
        Self {
            verified_entries,
            chain_valid: true,
            first_break: None,
            issue: None,
        }
    }

    fn broken(verified_entries: usize, first_break: Option<DbId>, issue: String) -> Self {
        Self {
            verified_entries,
            chain_valid: false,
            first_break,
            issue: Some(issue),
        }
    }
}

/// Verify a history as returned by [`get_history`](super::get_history)
/// (newest first).
///
/// `initial_budget` is the project's creation value; pass `None` when it is
/// unknown and the first entry's `old_value` cannot be checked.
pub fn verify_chain(
    history_newest_first: &[BudgetChangeEntry],
    initial_budget: Option<Money>,
    current_budget: Money,
) -> ChainCheckResult {
    let mut expected_old = initial_budget;

    for (verified, entry) in history_newest_first.iter().rev().enumerate() {
        if entry.new_value.checked_sub(entry.old_value) != Some(entry.change_amount) {
            return ChainCheckResult::broken(
                verified,
                Some(entry.id),
                format!(
                    "change_amount {} does not equal {} - {}",
                    entry.change_amount, entry.new_value, entry.old_value
                ),
            );
        }
        if let Some(expected) = expected_old {
            if entry.old_value != expected {
                return ChainCheckResult::broken(
                    verified,
                    Some(entry.id),
                    format!("old_value {} does not follow {expected}", entry.old_value),
                );
            }
        }
        expected_old = Some(entry.new_value);
    }

    let total = history_newest_first.len();
    match expected_old {
        Some(last) if last != current_budget => ChainCheckResult::broken(
            total,
            None,
            format!("current budget {current_budget} does not match last recorded value {last}"),
        ),
        _ => ChainCheckResult::valid(total),
    }
}
