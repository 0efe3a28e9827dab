//! Repository for the `invoices` table.

use buildledger_core::types::DbId;
use sqlx::PgPool;

use crate::models::invoice::{CreateInvoice, Invoice};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, project_id, invoice_number, vendor, amount, description, \
                       invoice_date, created_at, updated_at";

/// Provides create, list and delete operations for invoices.
pub struct InvoiceRepo;

impl InvoiceRepo {
    /// Insert a new invoice for a project, returning the created row.
    pub async fn create(
        pool: &PgPool,
        project_id: DbId,
        input: &CreateInvoice,
    ) -> Result<Invoice, sqlx::Error> {
        let query = format!(
            "INSERT INTO invoices (project_id, invoice_number, vendor, amount, description, invoice_date)
             VALUES ($1, $2, $3, $4, $5, $6)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Invoice>(&query)
            .bind(project_id)
            .bind(&input.invoice_number)
            .bind(&input.vendor)
            .bind(input.amount)
            .bind(&input.description)
            .bind(input.invoice_date)
            .fetch_one(pool)
            .await
    }

    /// List a project's invoices, most recent invoice date first.
    pub async fn list_by_project(
        pool: &PgPool,
        project_id: DbId,
    ) -> Result<Vec<Invoice>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM invoices WHERE project_id = $1 \
             ORDER BY invoice_date DESC NULLS LAST, id DESC"
        );
        sqlx::query_as::<_, Invoice>(&query)
            .bind(project_id)
            .fetch_all(pool)
            .await
    }

    /// Delete an invoice scoped to its project. Returns `true` if a row was removed.
    pub async fn delete(pool: &PgPool, project_id: DbId, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM invoices WHERE id = $1 AND project_id = $2")
            .bind(id)
            .bind(project_id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
