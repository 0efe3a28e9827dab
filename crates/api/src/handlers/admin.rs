//! Handlers for the `/admin` resource (user management).
//!
//! All handlers require the `admin` role via [`RequireAdmin`].

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use buildledger_core::error::CoreError;
use buildledger_core::roles::{validate_role, ROLE_MEMBER};
use buildledger_core::types::DbId;
use buildledger_db::models::user::{CreateUser, UpdateUser, UserResponse};
use buildledger_db::repositories::UserRepo;
use serde::Deserialize;
use validator::Validate;

use crate::auth::password::{hash_password, validate_password_strength, MIN_PASSWORD_LENGTH};
use crate::error::{AppError, AppResult};
use crate::middleware::rbac::RequireAdmin;
use crate::response::DataResponse;
use crate::state::AppState;

/// Request body for `POST /admin/users`.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateUserRequest {
    #[validate(email)]
    pub email: String,
    pub password: String,
    #[validate(length(min = 1, max = 200))]
    pub full_name: Option<String>,
    /// Defaults to `member`.
    pub role: Option<String>,
}

/// POST /api/v1/admin/users
///
/// Create a user. Validates password strength, hashes it, and returns the
/// safe [`UserResponse`] with 201 Created.
pub async fn create_user(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Json(input): Json<CreateUserRequest>,
) -> AppResult<(StatusCode, Json<DataResponse<UserResponse>>)> {
    input.validate()?;
    validate_password_strength(&input.password, MIN_PASSWORD_LENGTH)
        .map_err(|msg| AppError::Core(CoreError::Validation(msg)))?;

    let role = input.role.unwrap_or_else(|| ROLE_MEMBER.to_string());
    validate_role(&role).map_err(|msg| AppError::Core(CoreError::Validation(msg)))?;

    let password_hash = hash_password(&input.password)
        .map_err(|e| AppError::InternalError(format!("Password hashing error: {e}")))?;

    let user = UserRepo::create(
        &state.pool,
        &CreateUser {
            email: input.email.trim().to_string(),
            password_hash,
            full_name: input.full_name,
            role,
        },
    )
    .await?;

    tracing::info!(user_id = user.id, created_by = admin.user_id, "User created");

    Ok((
        StatusCode::CREATED,
        Json(DataResponse {
            data: UserResponse::from(&user),
        }),
    ))
}

/// GET /api/v1/admin/users
pub async fn list_users(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
) -> AppResult<Json<DataResponse<Vec<UserResponse>>>> {
    let users = UserRepo::list(&state.pool).await?;
    Ok(Json(DataResponse {
        data: users.iter().map(UserResponse::from).collect(),
    }))
}

/// PUT /api/v1/admin/users/{id}
///
/// Update name, role or active flag. Users are deactivated, never deleted,
/// so their ledger entries keep resolving to a name.
pub async fn update_user(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateUser>,
) -> AppResult<Json<DataResponse<UserResponse>>> {
    if let Some(role) = &input.role {
        validate_role(role).map_err(|msg| AppError::Core(CoreError::Validation(msg)))?;
    }
    if id == admin.user_id && input.is_active == Some(false) {
        return Err(AppError::BadRequest(
            "Administrators cannot deactivate themselves".into(),
        ));
    }

    let user = UserRepo::update(&state.pool, id, &input)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound { entity: "User", id }))?;

    tracing::info!(user_id = user.id, updated_by = admin.user_id, "User updated");

    Ok(Json(DataResponse {
        data: UserResponse::from(&user),
    }))
}
