//! Domain model structs and DTOs.
//!
//! Each submodule contains:
//! - A `FromRow` + `Serialize` entity struct matching the database row
//! - A `Deserialize` create DTO for inserts
//! - A `Deserialize` update DTO (all `Option` fields) for patches
//!
//! Rows whose columns need narrowing (status text, ledger deltas) are
//! converted into `buildledger_core` types here, before they reach handlers.

pub mod budget_change;
pub mod invoice;
pub mod project;
pub mod user;
