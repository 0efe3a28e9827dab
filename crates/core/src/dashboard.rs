//! Portfolio summary over projects.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::project::{budget_utilization_pct, ProjectStatus};
use crate::types::Money;

/// Figures of one project that feed the summary.
#[derive(Debug, Clone, Copy)]
pub struct ProjectFigures {
    pub status: ProjectStatus,
    pub planned_budget: Money,
    pub total_costs: Money,
}

/// Aggregate budget figures across all projects.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PortfolioSummary {
    pub project_count: usize,
    /// Project count per status (`"active"`, `"completed"`, `"on_hold"`).
    pub by_status: BTreeMap<&'static str, usize>,
    pub total_planned_budget: Money,
    pub total_costs: Money,
    /// Projects whose recorded costs exceed their approved budget.
    pub over_budget_count: usize,
    /// `total_costs / total_planned_budget * 100`, `None` when the budget is 0.
    pub utilization_pct: Option<f64>,
}

/// Summarise a set of projects. Sums saturate rather than overflow.
pub fn summarize<I>(projects: I) -> PortfolioSummary
where
    I: IntoIterator<Item = ProjectFigures>,
{
    let mut by_status: BTreeMap<&'static str, usize> =
        ProjectStatus::ALL.iter().map(|s| (s.as_str(), 0)).collect();
    let mut project_count = 0;
    let mut total_planned_budget: Money = 0;
    let mut total_costs: Money = 0;
    let mut over_budget_count = 0;

    for p in projects {
        project_count += 1;
        *by_status.entry(p.status.as_str()).or_default() += 1;
        total_planned_budget = total_planned_budget.saturating_add(p.planned_budget);
        total_costs = total_costs.saturating_add(p.total_costs);
        if p.total_costs > p.planned_budget {
            over_budget_count += 1;
        }
    }

    PortfolioSummary {
        project_count,
        by_status,
        total_planned_budget,
        total_costs,
        over_budget_count,
        utilization_pct: budget_utilization_pct(total_costs, total_planned_budget),
    }
}
