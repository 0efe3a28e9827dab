//! Repository for the `projects` table.
//!
//! Every read joins invoice totals so `total_costs` and `invoice_count` are
//! always derived, never stored. Nothing here writes `planned_budget` after
//! creation; see [`BudgetChangeRepo`](super::BudgetChangeRepo).

use buildledger_core::project::ProjectStatus;
use buildledger_core::types::DbId;
use sqlx::PgPool;

use crate::models::project::{CreateProject, Project, UpdateProject};

/// Build the projection over a project source aliased `p`.
///
/// `source` is either the `projects` table or a CTE name holding
/// `RETURNING *` rows.
fn select_from(source: &str) -> String {
    format!(
        "SELECT p.id, p.name, p.code, p.status, p.initial_budget, p.planned_budget, \
                p.start_year, \
                COALESCE(i.total_costs, 0)::BIGINT AS total_costs, \
                COALESCE(i.invoice_count, 0)::BIGINT AS invoice_count, \
                p.created_at, p.updated_at \
         FROM {source} p \
         LEFT JOIN LATERAL ( \
             SELECT SUM(amount) AS total_costs, COUNT(*) AS invoice_count \
             FROM invoices WHERE project_id = p.id \
         ) i ON TRUE"
    )
}

/// Provides CRUD operations for projects. There is no delete.
pub struct ProjectRepo;

impl ProjectRepo {
    /// Insert a new project, returning the created row.
    ///
    /// `initial_budget` and `planned_budget` both start at `input.planned_budget`.
    /// If `status` is `None` in the input, defaults to `active`.
    pub async fn create(pool: &PgPool, input: &CreateProject) -> Result<Project, sqlx::Error> {
        let query = format!(
            "WITH inserted AS ( \
                 INSERT INTO projects (name, code, status, initial_budget, planned_budget, start_year) \
                 VALUES ($1, $2, COALESCE($3, 'active'), $4, $4, $5) \
                 RETURNING * \
             ) {}",
            select_from("inserted")
        );
        sqlx::query_as::<_, Project>(&query)
            .bind(&input.name)
            .bind(&input.code)
            .bind(input.status.map(ProjectStatus::as_str))
            .bind(input.planned_budget)
            .bind(input.start_year)
            .fetch_one(pool)
            .await
    }

    /// Find a project by its internal ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Project>, sqlx::Error> {
        let query = format!("{} WHERE p.id = $1", select_from("projects"));
        sqlx::query_as::<_, Project>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List all projects ordered by most recently created first.
    pub async fn list(pool: &PgPool) -> Result<Vec<Project>, sqlx::Error> {
        let query = format!(
            "{} ORDER BY p.created_at DESC, p.id DESC",
            select_from("projects")
        );
        sqlx::query_as::<_, Project>(&query).fetch_all(pool).await
    }

    /// Update a project. Only non-`None` fields in `input` are applied.
    ///
    /// Returns `None` if no row with the given `id` exists.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateProject,
    ) -> Result<Option<Project>, sqlx::Error> {
        let query = format!(
            "WITH updated AS ( \
                 UPDATE projects SET \
                     name = COALESCE($2, name), \
                     code = COALESCE($3, code), \
                     status = COALESCE($4, status), \
                     start_year = COALESCE($5, start_year) \
                 WHERE id = $1 \
                 RETURNING * \
             ) {}",
            select_from("updated")
        );
        sqlx::query_as::<_, Project>(&query)
            .bind(id)
            .bind(&input.name)
            .bind(&input.code)
            .bind(input.status.map(ProjectStatus::as_str))
            .bind(input.start_year)
            .fetch_optional(pool)
            .await
    }

    /// Check whether a project exists.
    pub async fn exists(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        sqlx::query_scalar::<_, bool>("SELECT EXISTS(SELECT 1 FROM projects WHERE id = $1)")
            .bind(id)
            .fetch_one(pool)
            .await
    }
}
