//! Handlers for a project's budget: proposing changes and reading the ledger.
//!
//! Budget changes never go through the generic project update. The core
//! budget authority decides whether a request is allowed, a no-op, or a
//! change, and the ledger store writes it.

use axum::extract::{Path, Query, State};
use axum::Json;
use buildledger_core::budget::{precheck, propose_budget_change};
use buildledger_core::history_view::{assemble, Disclosure, HistoryView};
use buildledger_core::ledger::{get_history, verify_chain, BudgetChangeEntry, ChainCheckResult};
use buildledger_core::project::BudgetSnapshot;
use buildledger_core::types::{DbId, Money};
use serde::{Deserialize, Serialize};

use super::load_project;
use crate::error::AppResult;
use crate::middleware::auth::AuthUser;
use crate::middleware::rbac::RequireAuth;
use crate::response::DataResponse;
use crate::state::AppState;

/// Request body for `POST /projects/{id}/budget`.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ProposeBudgetRequest {
    pub new_value: Money,
    #[serde(default)]
    pub reason: Option<String>,
    /// The budget the caller last saw. When absent, the current stored
    /// budget is read first.
    #[serde(default)]
    pub expected_budget: Option<Money>,
}

#[derive(Debug, Serialize)]
pub struct BudgetChangeResponse {
    /// `false` when the value was unchanged and nothing was written.
    pub recorded: bool,
    pub entry: Option<BudgetChangeEntry>,
}

#[derive(Debug, Default, Deserialize)]
pub struct HistoryParams {
    #[serde(default)]
    pub expanded: bool,
}

/// POST /api/v1/projects/{id}/budget
pub async fn propose(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(project_id): Path<DbId>,
    Json(input): Json<ProposeBudgetRequest>,
) -> AppResult<Json<DataResponse<BudgetChangeResponse>>> {
    let session = auth_user.session();
    // Role and value errors are reported before any database read.
    precheck(&session, input.new_value)?;

    let snapshot = match input.expected_budget {
        Some(planned_budget) => BudgetSnapshot {
            project_id,
            planned_budget,
        },
        None => load_project(&state.pool, project_id).await?.budget_snapshot(),
    };

    let outcome = propose_budget_change(
        state.ledger.as_ref(),
        &session,
        &snapshot,
        input.new_value,
        input.reason.as_deref().unwrap_or_default(),
    )
    .await?;

    let entry = outcome.entry().cloned();
    Ok(Json(DataResponse {
        data: BudgetChangeResponse {
            recorded: entry.is_some(),
            entry,
        },
    }))
}

/// GET /api/v1/projects/{id}/budget-history?expanded=bool
pub async fn history(
    State(state): State<AppState>,
    RequireAuth(_user): RequireAuth,
    Path(project_id): Path<DbId>,
    Query(params): Query<HistoryParams>,
) -> AppResult<Json<DataResponse<HistoryView>>> {
    let entries = get_history(state.ledger.as_ref(), project_id).await?;
    let mut disclosure = Disclosure::collapsed(state.config.history_preview_len);
    disclosure.expanded = params.expanded;
    Ok(Json(DataResponse {
        data: assemble(project_id, &entries, disclosure),
    }))
}

/// GET /api/v1/projects/{id}/budget-history/verify
///
/// Walks the full history against the project's initial and current budget.
pub async fn verify(
    State(state): State<AppState>,
    RequireAuth(_user): RequireAuth,
    Path(project_id): Path<DbId>,
) -> AppResult<Json<DataResponse<ChainCheckResult>>> {
    let project = load_project(&state.pool, project_id).await?;
    let entries = get_history(state.ledger.as_ref(), project_id).await?;

    let result = verify_chain(&entries, Some(project.initial_budget), project.planned_budget);
    if !result.chain_valid {
        tracing::warn!(
            project_id,
            first_break = ?result.first_break,
            issue = ?result.issue,
            "Budget history chain is broken"
        );
    }
    Ok(Json(DataResponse { data: result }))
}
