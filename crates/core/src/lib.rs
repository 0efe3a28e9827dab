//! Domain core for BuildLedger.
//!
//! Holds everything that does not need a database connection: shared types,
//! the error taxonomy, roles and sessions, the budget-change authority, the
//! ledger service and its store trait, history view assembly, and the
//! dashboard calculations. Both `buildledger-db` and `buildledger-api` depend
//! on this crate.

pub mod budget;
pub mod dashboard;
pub mod error;
pub mod history_view;
pub mod ledger;
pub mod project;
pub mod roles;
pub mod session;
pub mod types;
