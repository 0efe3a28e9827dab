pub mod admin;
pub mod auth;
pub mod dashboard;
pub mod health;
pub mod project;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /auth/login                                      sign in (public)
/// /auth/me                                         current user
///
/// /admin/users                                     list, create (admin only)
/// /admin/users/{id}                                update (admin only)
///
/// /projects                                        list, create
/// /projects/{id}                                   get, update
/// /projects/{id}/budget                            propose budget change (POST)
/// /projects/{id}/budget-history                    history timeline (?expanded=)
/// /projects/{id}/budget-history/verify             chain verification
/// /projects/{id}/invoices                          list, create
/// /projects/{id}/invoices/{invoice_id}             delete
///
/// /dashboard/summary                               portfolio summary
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/auth", auth::router())
        .nest("/admin", admin::router())
        .nest("/projects", project::router())
        .nest("/dashboard", dashboard::router())
}
