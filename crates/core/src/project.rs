//! Project lifecycle status and budget snapshot types.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::types::{DbId, Money};

pub const STATUS_ACTIVE: &str = "active";
pub const STATUS_COMPLETED: &str = "completed";
pub const STATUS_ON_HOLD: &str = "on_hold";

/// Project lifecycle status.
///
/// Stored as TEXT; the values must match `ck_projects_status` in
/// `20260101000003_create_projects.sql`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProjectStatus {
    Active,
    Completed,
    OnHold,
}

impl ProjectStatus {
    pub const ALL: [ProjectStatus; 3] = [
        ProjectStatus::Active,
        ProjectStatus::Completed,
        ProjectStatus::OnHold,
    ];

    /// Return the database representation.
    pub fn as_str(self) -> &'static str {
        match self {
            ProjectStatus::Active => STATUS_ACTIVE,
            ProjectStatus::Completed => STATUS_COMPLETED,
            ProjectStatus::OnHold => STATUS_ON_HOLD,
        }
    }

    pub fn parse(value: &str) -> Result<Self, CoreError> {
        match value {
            STATUS_ACTIVE => Ok(ProjectStatus::Active),
            STATUS_COMPLETED => Ok(ProjectStatus::Completed),
            STATUS_ON_HOLD => Ok(ProjectStatus::OnHold),
            other => Err(CoreError::Validation(format!(
                "Unknown project status '{other}'"
            ))),
        }
    }
}

impl TryFrom<String> for ProjectStatus {
    type Error = CoreError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        ProjectStatus::parse(&value)
    }
}

impl std::fmt::Display for ProjectStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The part of a project the budget authority reasons about.
///
/// `planned_budget` is the value the caller last saw. It doubles as the
/// expected-previous-value token when the change is written.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BudgetSnapshot {
    pub project_id: DbId,
    pub planned_budget: Money,
}

/// Earliest start year accepted for a project.
pub const MIN_START_YEAR: i32 = 1900;
/// Latest start year accepted for a project.
pub const MAX_START_YEAR: i32 = 2200;

/// Validate an optional project start year.
pub fn validate_start_year(year: Option<i32>) -> Result<(), CoreError> {
    match year {
        Some(y) if !(MIN_START_YEAR..=MAX_START_YEAR).contains(&y) => Err(CoreError::Validation(
            format!("start_year must be between {MIN_START_YEAR} and {MAX_START_YEAR}"),
        )),
        _ => Ok(()),
    }
}

/// Recorded cost as a percentage of the approved budget.
///
/// Returns `None` for a zero budget, where a percentage is meaningless.
pub fn budget_utilization_pct(total_costs: Money, planned_budget: Money) -> Option<f64> {
    if planned_budget == 0 {
        return None;
    }
    Some(total_costs as f64 / planned_budget as f64 * 100.0)
}
