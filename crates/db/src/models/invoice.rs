//! Invoice entity model and DTOs.
//!
//! Invoice amounts feed a project's derived `total_costs` and `invoice_count`.

use buildledger_core::types::{DbId, Money, Timestamp};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

/// An invoice row from the `invoices` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Invoice {
    pub id: DbId,
    pub project_id: DbId,
    pub invoice_number: String,
    pub vendor: String,
    pub amount: Money,
    pub description: Option<String>,
    pub invoice_date: Option<NaiveDate>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for recording an invoice against a project.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(deny_unknown_fields)]
pub struct CreateInvoice {
    #[validate(length(min = 1, max = 64))]
    pub invoice_number: String,
    #[validate(length(min = 1, max = 200))]
    pub vendor: String,
    #[validate(range(min = 0))]
    pub amount: Money,
    pub description: Option<String>,
    pub invoice_date: Option<NaiveDate>,
}
