use crate::domain::{models::payment::Payment, ports::PaymentRepository};
use crate::error::AppError;
use async_trait::async_trait;
use chrono::Utc;
use sqlx::SqlitePool;

pub struct SqlitePaymentRepo {
    pool: SqlitePool,
}

impl SqlitePaymentRepo {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl PaymentRepository for SqlitePaymentRepo {
    async fn create(&self, payment: &Payment) -> Result<Payment, AppError> {
        sqlx::query_as::<_, Payment>(
            "INSERT INTO payments (id, invoice_id, amount_cents, method, status, approval_status, external_reference, approved_by, rejection_reason, processed_at, created_at)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
             RETURNING *"
        )
            .bind(&payment.id).bind(&payment.invoice_id).bind(payment.amount_cents).bind(&payment.method)
            .bind(&payment.status).bind(&payment.approval_status).bind(&payment.external_reference)
            .bind(&payment.approved_by).bind(&payment.rejection_reason).bind(payment.processed_at)
            .bind(payment.created_at)
            .fetch_one(&self.pool).await.map_err(AppError::Database)
    }
    async fn find_by_id(&self, id: &str) -> Result<Option<Payment>, AppError> {
        sqlx::query_as::<_, Payment>("SELECT * FROM payments WHERE id = ?").bind(id).fetch_optional(&self.pool).await.map_err(AppError::Database)
    }
    async fn list_by_invoice(&self, invoice_id: &str) -> Result<Vec<Payment>, AppError> {
        sqlx::query_as::<_, Payment>("SELECT * FROM payments WHERE invoice_id = ? ORDER BY created_at ASC").bind(invoice_id).fetch_all(&self.pool).await.map_err(AppError::Database)
    }
    async fn list_pending_approval(&self) -> Result<Vec<Payment>, AppError> {
        sqlx::query_as::<_, Payment>("SELECT * FROM payments WHERE approval_status = 'PENDING' AND status = 'PENDING' ORDER BY created_at ASC")
            .fetch_all(&self.pool).await.map_err(AppError::Database)
    }
    async fn approve_if_pending(&self, id: &str, approver_id: &str) -> Result<bool, AppError> {
        let result = sqlx::query("UPDATE payments SET approval_status = 'APPROVED', status = 'COMPLETED', approved_by = ?, processed_at = ? WHERE id = ? AND approval_status = 'PENDING'")
            .bind(approver_id).bind(Utc::now()).bind(id).execute(&self.pool).await.map_err(AppError::Database)?;
        Ok(result.rows_affected() > 0)
    }
    async fn reject_if_pending(&self, id: &str, reason: &str) -> Result<bool, AppError> {
        let result = sqlx::query("UPDATE payments SET approval_status = 'REJECTED', status = 'FAILED', rejection_reason = ?, processed_at = ? WHERE id = ? AND approval_status = 'PENDING'")
            .bind(reason).bind(Utc::now()).bind(id).execute(&self.pool).await.map_err(AppError::Database)?;
        Ok(result.rows_affected() > 0)
    }
}
