//! Presentation-ready budget history timeline.
//!
//! Turns a newest-first history into items carrying a change direction and
//! actor initials, and applies progressive disclosure: only the first few
//! entries unless the caller asked for the expanded list. Disclosure is
//! per-request state and is never stored.

use serde::Serialize;

use crate::ledger::BudgetChangeEntry;
use crate::types::{DbId, Money, Timestamp};

/// Entries shown before the history is expanded.
pub const DEFAULT_PREVIEW_LEN: usize = 3;

/// Maximum characters in an actor's initials.
pub const MAX_INITIALS: usize = 2;

/// Whether a change raised the budget.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ChangeDirection {
    Increase,
    /// Decrease, or a zero delta (which the authority never records).
    Decrease,
}

impl ChangeDirection {
    pub fn of(change_amount: Money) -> Self {
        if change_amount > 0 {
            ChangeDirection::Increase
        } else {
            ChangeDirection::Decrease
        }
    }
}

/// Transient show-some / show-all state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Disclosure {
    pub expanded: bool,
    pub preview_len: usize,
}

impl Default for Disclosure {
    fn default() -> Self {
        Self {
            expanded: false,
            preview_len: DEFAULT_PREVIEW_LEN,
        }
    }
}

impl Disclosure {
    pub fn collapsed(preview_len: usize) -> Self {
        Self {
            expanded: false,
            preview_len,
        }
    }
}

/// One row of the timeline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HistoryItem {
    pub id: DbId,
    pub changed_by: DbId,
    pub changed_by_name: String,
    pub actor_initials: String,
    pub old_value: Money,
    pub new_value: Money,
    pub change_amount: Money,
    pub direction: ChangeDirection,
    pub reason: Option<String>,
    pub created_at: Timestamp,
}

impl From<&BudgetChangeEntry> for HistoryItem {
    fn from(entry: &BudgetChangeEntry) -> Self {
        Self {
            id: entry.id,
            changed_by: entry.changed_by,
            changed_by_name: entry.changed_by_name.clone(),
            actor_initials: actor_initials(&entry.changed_by_name),
            old_value: entry.old_value,
            new_value: entry.new_value,
            change_amount: entry.change_amount,
            direction: ChangeDirection::of(entry.change_amount),
            reason: entry.reason.clone(),
            created_at: entry.created_at,
        }
    }
}

/// The assembled timeline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HistoryView {
    pub project_id: DbId,
    /// Visible items, newest first.
    pub items: Vec<HistoryItem>,
    /// Number of entries in the full history.
    pub total: usize,
    /// Entries left out by the current disclosure state.
    pub hidden_count: usize,
    pub expanded: bool,
    /// Whether a toggle would change what is shown.
    pub can_expand: bool,
    /// The most recent change, whatever the disclosure state. `None` when
    /// the budget was never changed.
    pub latest: Option<HistoryItem>,
}

/// Initials for compact avatars: first letter of each space-separated token,
/// uppercased, at most [`MAX_INITIALS`] characters.
pub fn actor_initials(display_name: &str) -> String {
    display_name
        .split(' ')
        .filter_map(|token| token.chars().next())
        .flat_map(char::to_uppercase)
        .take(MAX_INITIALS)
        .collect()
}

/// Build the timeline for a newest-first history.
pub fn assemble(
    project_id: DbId,
    history_newest_first: &[BudgetChangeEntry],
    disclosure: Disclosure,
) -> HistoryView {
    let total = history_newest_first.len();
    let visible = if disclosure.expanded {
        total
    } else {
        total.min(disclosure.preview_len)
    };

    HistoryView {
        project_id,
        items: history_newest_first[..visible]
            .iter()
            .map(HistoryItem::from)
            .collect(),
        total,
        hidden_count: total - visible,
        expanded: disclosure.expanded,
        can_expand: total > disclosure.preview_len,
        latest: history_newest_first.first().map(HistoryItem::from),
    }
}
