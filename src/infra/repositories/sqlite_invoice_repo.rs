use crate::domain::{models::invoice::Invoice, ports::InvoiceRepository};
use crate::error::AppError;
use async_trait::async_trait;
use chrono::NaiveDate;
use sqlx::SqlitePool;

pub struct SqliteInvoiceRepo {
    pool: SqlitePool,
}

impl SqliteInvoiceRepo {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl InvoiceRepository for SqliteInvoiceRepo {
    async fn find_by_id(&self, id: &str) -> Result<Option<Invoice>, AppError> {
        sqlx::query_as::<_, Invoice>("SELECT * FROM invoices WHERE id = ?").bind(id).fetch_optional(&self.pool).await.map_err(AppError::Database)
    }
    async fn list_by_reservation(&self, reservation_id: &str) -> Result<Vec<Invoice>, AppError> {
        sqlx::query_as::<_, Invoice>("SELECT * FROM invoices WHERE reservation_id = ? ORDER BY kind = 'DEPOSIT' DESC, sequence_number ASC")
            .bind(reservation_id).fetch_all(&self.pool).await.map_err(AppError::Database)
    }
    async fn complete_if_open(&self, id: &str) -> Result<bool, AppError> {
        let result = sqlx::query("UPDATE invoices SET status = 'COMPLETED' WHERE id = ? AND status IN ('PENDING', 'OVERDUE')")
            .bind(id).execute(&self.pool).await.map_err(AppError::Database)?;
        Ok(result.rows_affected() > 0)
    }
    async fn fail_open_for_reservation(&self, reservation_id: &str) -> Result<u64, AppError> {
        let result = sqlx::query("UPDATE invoices SET status = 'FAILED' WHERE reservation_id = ? AND status IN ('PENDING', 'OVERDUE')")
            .bind(reservation_id).execute(&self.pool).await.map_err(AppError::Database)?;
        Ok(result.rows_affected())
    }
    async fn mark_overdue(&self, as_of: NaiveDate) -> Result<u64, AppError> {
        let result = sqlx::query("UPDATE invoices SET status = 'OVERDUE' WHERE status = 'PENDING' AND due_date < ?")
            .bind(as_of).execute(&self.pool).await.map_err(AppError::Database)?;
        Ok(result.rows_affected())
    }
}
