//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async CRUD methods
//! that accept `&PgPool` as the first argument.

pub mod budget_change_repo;
pub mod invoice_repo;
pub mod project_repo;
pub mod user_repo;

pub use budget_change_repo::BudgetChangeRepo;
pub use invoice_repo::InvoiceRepo;
pub use project_repo::ProjectRepo;
pub use user_repo::UserRepo;
