use crate::domain::{models::period::Period, ports::PeriodRepository};
use crate::error::AppError;
use async_trait::async_trait;
use sqlx::PgPool;

pub struct PostgresPeriodRepo {
    pool: PgPool,
}

impl PostgresPeriodRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl PeriodRepository for PostgresPeriodRepo {
    async fn create(&self, period: &Period) -> Result<Period, AppError> {
        sqlx::query_as::<_, Period>(
            "INSERT INTO periods (id, name, starts_on, ends_on, is_active, created_at) VALUES ($1, $2, $3, $4, $5, $6) RETURNING *"
        )
            .bind(&period.id).bind(&period.name).bind(period.starts_on).bind(period.ends_on)
            .bind(period.is_active).bind(period.created_at)
            .fetch_one(&self.pool).await.map_err(AppError::Database)
    }
    async fn find_by_id(&self, id: &str) -> Result<Option<Period>, AppError> {
        sqlx::query_as::<_, Period>("SELECT * FROM periods WHERE id = $1").bind(id).fetch_optional(&self.pool).await.map_err(AppError::Database)
    }
    async fn find_active(&self) -> Result<Option<Period>, AppError> {
        sqlx::query_as::<_, Period>("SELECT * FROM periods WHERE is_active = TRUE LIMIT 1").fetch_optional(&self.pool).await.map_err(AppError::Database)
    }
    async fn list(&self) -> Result<Vec<Period>, AppError> {
        sqlx::query_as::<_, Period>("SELECT * FROM periods ORDER BY starts_on DESC").fetch_all(&self.pool).await.map_err(AppError::Database)
    }
    async fn activate(&self, id: &str) -> Result<(), AppError> {
        let mut tx = self.pool.begin().await.map_err(AppError::Database)?;
        sqlx::query("UPDATE periods SET is_active = FALSE").execute(&mut *tx).await.map_err(AppError::Database)?;
        let result = sqlx::query("UPDATE periods SET is_active = TRUE WHERE id = $1").bind(id).execute(&mut *tx).await.map_err(AppError::Database)?;
        if result.rows_affected() == 0 { return Err(AppError::NotFound("Period not found".into())); }
        tx.commit().await.map_err(AppError::Database)?;
        Ok(())
    }
}
