//! Route definitions for the `/projects` resource and its budget and
//! invoice sub-resources.

use axum::routing::{delete, get, post};
use axum::Router;

use crate::handlers::{budget, invoice, project};
use crate::state::AppState;

/// Routes mounted at `/projects`.
///
/// ```text
/// GET    /                                 -> list
/// POST   /                                 -> create (admin)
/// GET    /{id}                             -> get_by_id
/// PUT    /{id}                             -> update (admin)
/// POST   /{id}/budget                      -> propose
/// GET    /{id}/budget-history              -> history
/// GET    /{id}/budget-history/verify       -> verify
/// GET    /{id}/invoices                    -> list invoices
/// POST   /{id}/invoices                    -> create invoice (admin)
/// DELETE /{id}/invoices/{invoice_id}       -> delete invoice (admin)
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(project::list).post(project::create))
        .route("/{id}", get(project::get_by_id).put(project::update))
        .route("/{id}/budget", post(budget::propose))
        .route("/{id}/budget-history", get(budget::history))
        .route("/{id}/budget-history/verify", get(budget::verify))
        .route("/{id}/invoices", get(invoice::list).post(invoice::create))
        .route("/{id}/invoices/{invoice_id}", delete(invoice::delete))
}
