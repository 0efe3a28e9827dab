//! Project entity model and DTOs.

use buildledger_core::dashboard::ProjectFigures;
use buildledger_core::project::{BudgetSnapshot, ProjectStatus};
use buildledger_core::types::{DbId, Money, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

/// A project row from the `projects` table, with invoice totals joined in.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Project {
    pub id: DbId,
    pub name: String,
    pub code: String,
    #[sqlx(try_from = "String")]
    pub status: ProjectStatus,
    /// Budget at creation time. Never changes.
    pub initial_budget: Money,
    /// Current approved budget. Only the budget ledger writes this column.
    pub planned_budget: Money,
    pub start_year: Option<i32>,
    /// Sum of invoice amounts (derived).
    pub total_costs: Money,
    /// Number of invoices (derived).
    pub invoice_count: i64,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Project {
    /// The budget as seen by this read, for the budget authority.
    pub fn budget_snapshot(&self) -> BudgetSnapshot {
        BudgetSnapshot {
            project_id: self.id,
            planned_budget: self.planned_budget,
        }
    }

    pub fn figures(&self) -> ProjectFigures {
        ProjectFigures {
            status: self.status,
            planned_budget: self.planned_budget,
            total_costs: self.total_costs,
        }
    }
}

/// DTO for creating a new project.
///
/// `planned_budget` also becomes the project's `initial_budget`.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(deny_unknown_fields)]
pub struct CreateProject {
    #[validate(length(min = 1, max = 200))]
    pub name: String,
    #[validate(length(min = 1, max = 32))]
    pub code: String,
    /// Defaults to `active` if omitted.
    pub status: Option<ProjectStatus>,
    #[validate(range(min = 0))]
    pub planned_budget: Money,
    pub start_year: Option<i32>,
}

/// DTO for updating an existing project. All fields are optional.
///
/// There is deliberately no budget field: budget changes go through the
/// ledger, and unknown fields are rejected.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(deny_unknown_fields)]
pub struct UpdateProject {
    #[validate(length(min = 1, max = 200))]
    pub name: Option<String>,
    #[validate(length(min = 1, max = 32))]
    pub code: Option<String>,
    pub status: Option<ProjectStatus>,
    pub start_year: Option<i32>,
}
