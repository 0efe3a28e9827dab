//! Handler for the portfolio dashboard.

use axum::extract::State;
use axum::Json;
use buildledger_core::dashboard::{summarize, PortfolioSummary};
use buildledger_db::repositories::ProjectRepo;

use crate::error::AppResult;
use crate::middleware::rbac::RequireAuth;
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /api/v1/dashboard/summary
pub async fn summary(
    State(state): State<AppState>,
    RequireAuth(_user): RequireAuth,
) -> AppResult<Json<DataResponse<PortfolioSummary>>> {
    let projects = ProjectRepo::list(&state.pool).await?;
    let summary = summarize(projects.iter().map(|p| p.figures()));
    Ok(Json(DataResponse { data: summary }))
}
