pub mod admin;
pub mod auth;
pub mod budget;
pub mod dashboard;
pub mod invoice;
pub mod project;

use buildledger_core::error::CoreError;
use buildledger_core::types::DbId;
use buildledger_db::models::project::Project;
use buildledger_db::repositories::ProjectRepo;
use buildledger_db::DbPool;

use crate::error::{AppError, AppResult};

/// Load a project or fail with 404.
pub(crate) async fn load_project(pool: &DbPool, id: DbId) -> AppResult<Project> {
    ProjectRepo::find_by_id(pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Project",
            id,
        }))
}
