use crate::domain::{models::period::Period, ports::PeriodRepository};
use crate::error::AppError;
use async_trait::async_trait;
use sqlx::SqlitePool;

pub struct SqlitePeriodRepo {
    pool: SqlitePool,
}

impl SqlitePeriodRepo {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl PeriodRepository for SqlitePeriodRepo {
    async fn create(&self, period: &Period) -> Result<Period, AppError> {
        sqlx::query_as::<_, Period>(
            "INSERT INTO periods (id, name, starts_on, ends_on, is_active, created_at) VALUES (?, ?, ?, ?, ?, ?) RETURNING *"
        )
            .bind(&period.id).bind(&period.name).bind(period.starts_on).bind(period.ends_on)
            .bind(period.is_active).bind(period.created_at)
            .fetch_one(&self.pool).await.map_err(AppError::Database)
    }
    async fn find_by_id(&self, id: &str) -> Result<Option<Period>, AppError> {
        sqlx::query_as::<_, Period>("SELECT * FROM periods WHERE id = ?").bind(id).fetch_optional(&self.pool).await.map_err(AppError::Database)
    }
    async fn find_active(&self) -> Result<Option<Period>, AppError> {
        sqlx::query_as::<_, Period>("SELECT * FROM periods WHERE is_active = 1 LIMIT 1").fetch_optional(&self.pool).await.map_err(AppError::Database)
    }
    async fn list(&self) -> Result<Vec<Period>, AppError> {
        sqlx::query_as::<_, Period>("SELECT * FROM periods ORDER BY starts_on DESC").fetch_all(&self.pool).await.map_err(AppError::Database)
    }
    async fn activate(&self, id: &str) -> Result<(), AppError> {
        let mut tx = self.pool.begin().await.map_err(AppError::Database)?;
        sqlx::query("UPDATE periods SET is_active = 0").execute(&mut *tx).await.map_err(AppError::Database)?;
        let result = sqlx::query("UPDATE periods SET is_active = 1 WHERE id = ?").bind(id).execute(&mut *tx).await.map_err(AppError::Database)?;
        if result.rows_affected() == 0 { return Err(AppError::NotFound("Period not found".into())); }
        tx.commit().await.map_err(AppError::Database)?;
        Ok(())
    }
}
