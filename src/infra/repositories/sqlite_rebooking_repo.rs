use crate::domain::{models::rebooking::RebookingRecord, ports::RebookingRepository};
use crate::error::AppError;
use async_trait::async_trait;
use sqlx::SqlitePool;

pub struct SqliteRebookingRepo {
    pool: SqlitePool,
}

impl SqliteRebookingRepo {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl RebookingRepository for SqliteRebookingRepo {
    async fn create(&self, record: &RebookingRecord) -> Result<RebookingRecord, AppError> {
        sqlx::query_as::<_, RebookingRecord>(
            "INSERT INTO rebooking_records (id, original_reservation_id, new_reservation_id, new_period_id, deposit_payment_id, status, failure_reason, needs_refund_review, created_at)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
             RETURNING *"
        )
            .bind(&record.id).bind(&record.original_reservation_id).bind(&record.new_reservation_id)
            .bind(&record.new_period_id).bind(&record.deposit_payment_id).bind(&record.status)
            .bind(&record.failure_reason).bind(record.needs_refund_review).bind(record.created_at)
            .fetch_one(&self.pool).await.map_err(AppError::Database)
    }
    async fn find_by_id(&self, id: &str) -> Result<Option<RebookingRecord>, AppError> {
        sqlx::query_as::<_, RebookingRecord>("SELECT * FROM rebooking_records WHERE id = ?").bind(id).fetch_optional(&self.pool).await.map_err(AppError::Database)
    }
    async fn mark_confirmed(&self, id: &str, new_reservation_id: &str, deposit_payment_id: &str) -> Result<(), AppError> {
        let result = sqlx::query("UPDATE rebooking_records SET status = 'CONFIRMED', new_reservation_id = ?, deposit_payment_id = ? WHERE id = ?")
            .bind(new_reservation_id).bind(deposit_payment_id).bind(id).execute(&self.pool).await.map_err(AppError::Database)?;
        if result.rows_affected() == 0 { return Err(AppError::NotFound("Rebooking record not found".into())); }
        Ok(())
    }
    async fn mark_failed(&self, id: &str, reason: &str, needs_refund_review: bool) -> Result<(), AppError> {
        let result = sqlx::query("UPDATE rebooking_records SET status = 'FAILED', failure_reason = ?, needs_refund_review = ? WHERE id = ?")
            .bind(reason).bind(needs_refund_review).bind(id).execute(&self.pool).await.map_err(AppError::Database)?;
        if result.rows_affected() == 0 { return Err(AppError::NotFound("Rebooking record not found".into())); }
        Ok(())
    }
    async fn list_refund_review(&self) -> Result<Vec<RebookingRecord>, AppError> {
        sqlx::query_as::<_, RebookingRecord>("SELECT * FROM rebooking_records WHERE status = 'FAILED' AND needs_refund_review = ? ORDER BY created_at DESC")
            .bind(true).fetch_all(&self.pool).await.map_err(AppError::Database)
    }
}
