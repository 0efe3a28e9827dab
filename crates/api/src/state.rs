use std::sync::Arc;

use buildledger_core::ledger::BudgetLedgerStore;

use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc` or is already `Clone`).
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub pool: buildledger_db::DbPool,
    /// Server configuration (accessed by middleware and handlers).
    pub config: Arc<ServerConfig>,
    /// Budget ledger store. PostgreSQL in production, in-memory in tests.
    pub ledger: Arc<dyn BudgetLedgerStore>,
}
