//! Handlers for invoices nested under `/projects/{id}/invoices`.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use buildledger_core::error::CoreError;
use buildledger_core::types::DbId;
use buildledger_db::models::invoice::{CreateInvoice, Invoice};
use buildledger_db::repositories::{InvoiceRepo, ProjectRepo};
use validator::Validate;

use crate::error::{AppError, AppResult};
use crate::middleware::rbac::{RequireAdmin, RequireAuth};
use crate::response::DataResponse;
use crate::state::AppState;

async fn ensure_project_exists(state: &AppState, project_id: DbId) -> AppResult<()> {
    if ProjectRepo::exists(&state.pool, project_id).await? {
        Ok(())
    } else {
        Err(AppError::Core(CoreError::NotFound {
            entity: "Project",
            id: project_id,
        }))
    }
}

/// GET /api/v1/projects/{id}/invoices
pub async fn list(
    State(state): State<AppState>,
    RequireAuth(_user): RequireAuth,
    Path(project_id): Path<DbId>,
) -> AppResult<Json<DataResponse<Vec<Invoice>>>> {
    ensure_project_exists(&state, project_id).await?;
    let invoices = InvoiceRepo::list_by_project(&state.pool, project_id).await?;
    Ok(Json(DataResponse { data: invoices }))
}

/// POST /api/v1/projects/{id}/invoices
pub async fn create(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Path(project_id): Path<DbId>,
    Json(input): Json<CreateInvoice>,
) -> AppResult<(StatusCode, Json<DataResponse<Invoice>>)> {
    input.validate()?;
    ensure_project_exists(&state, project_id).await?;

    let invoice = InvoiceRepo::create(&state.pool, project_id, &input).await?;
    tracing::info!(
        project_id,
        invoice_id = invoice.id,
        amount = invoice.amount,
        created_by = admin.user_id,
        "Invoice recorded"
    );
    Ok((StatusCode::CREATED, Json(DataResponse { data: invoice })))
}

/// DELETE /api/v1/projects/{id}/invoices/{invoice_id}
pub async fn delete(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Path((project_id, invoice_id)): Path<(DbId, DbId)>,
) -> AppResult<StatusCode> {
    if InvoiceRepo::delete(&state.pool, project_id, invoice_id).await? {
        tracing::info!(project_id, invoice_id, deleted_by = admin.user_id, "Invoice deleted");
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::Core(CoreError::NotFound {
            entity: "Invoice",
            id: invoice_id,
        }))
    }
}
