//! Handlers for the `/projects` resource.
//!
//! There is no delete, and updates cannot touch the budget; see
//! [`super::budget`] for budget changes.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use buildledger_core::error::CoreError;
use buildledger_core::project::validate_start_year;
use buildledger_core::types::DbId;
use buildledger_db::models::project::{CreateProject, Project, UpdateProject};
use buildledger_db::repositories::ProjectRepo;
use validator::Validate;

use super::load_project;
use crate::error::{AppError, AppResult};
use crate::middleware::rbac::{RequireAdmin, RequireAuth};
use crate::response::DataResponse;
use crate::state::AppState;

/// POST /api/v1/projects
pub async fn create(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Json(input): Json<CreateProject>,
) -> AppResult<(StatusCode, Json<DataResponse<Project>>)> {
    input.validate()?;
    validate_start_year(input.start_year)?;

    let project = ProjectRepo::create(&state.pool, &input).await?;
    tracing::info!(
        project_id = project.id,
        code = %project.code,
        planned_budget = project.planned_budget,
        created_by = admin.user_id,
        "Project created"
    );
    Ok((StatusCode::CREATED, Json(DataResponse { data: project })))
}

/// GET /api/v1/projects
pub async fn list(
    State(state): State<AppState>,
    RequireAuth(_user): RequireAuth,
) -> AppResult<Json<DataResponse<Vec<Project>>>> {
    let projects = ProjectRepo::list(&state.pool).await?;
    Ok(Json(DataResponse { data: projects }))
}

/// GET /api/v1/projects/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    RequireAuth(_user): RequireAuth,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<Project>>> {
    let project = load_project(&state.pool, id).await?;
    Ok(Json(DataResponse { data: project }))
}

/// PUT /api/v1/projects/{id}
pub async fn update(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateProject>,
) -> AppResult<Json<DataResponse<Project>>> {
    input.validate()?;
    validate_start_year(input.start_year)?;

    let project = ProjectRepo::update(&state.pool, id, &input)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Project",
            id,
        }))?;
    Ok(Json(DataResponse { data: project }))
}
