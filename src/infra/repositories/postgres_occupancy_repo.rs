use crate::domain::{models::occupancy::OccupancyRecord, ports::OccupancyRepository};
use crate::error::AppError;
use async_trait::async_trait;
use chrono::Utc;
use sqlx::PgPool;

pub struct PostgresOccupancyRepo {
    pool: PgPool,
}

impl PostgresOccupancyRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

// 23505 = PostgreSQL unique violation; the partial index on occupied
// (unit_id, period_id) is what fires it.
fn map_occupied_conflict(e: sqlx::Error) -> AppError {
    if let sqlx::Error::Database(db_err) = &e {
        if db_err.code().unwrap_or_default() == "23505" {
            return AppError::UnitAlreadyOccupied;
        }
    }
    AppError::Database(e)
}

#[async_trait]
impl OccupancyRepository for PostgresOccupancyRepo {
    async fn insert(&self, record: &OccupancyRecord) -> Result<OccupancyRecord, AppError> {
        sqlx::query_as::<_, OccupancyRecord>(
            "INSERT INTO occupancy_records (id, unit_id, period_id, occupant_id, status, check_in_date, check_out_date, released_at, created_at)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
             RETURNING *"
        )
            .bind(&record.id).bind(&record.unit_id).bind(&record.period_id).bind(&record.occupant_id)
            .bind(&record.status).bind(record.check_in_date).bind(record.check_out_date)
            .bind(record.released_at).bind(record.created_at)
            .fetch_one(&self.pool).await.map_err(map_occupied_conflict)
    }
    async fn find_by_id(&self, id: &str) -> Result<Option<OccupancyRecord>, AppError> {
        sqlx::query_as::<_, OccupancyRecord>("SELECT * FROM occupancy_records WHERE id = $1").bind(id).fetch_optional(&self.pool).await.map_err(AppError::Database)
    }
    async fn find_occupied(&self, unit_id: &str, period_id: &str) -> Result<Option<OccupancyRecord>, AppError> {
        sqlx::query_as::<_, OccupancyRecord>("SELECT * FROM occupancy_records WHERE unit_id = $1 AND period_id = $2 AND status = 'OCCUPIED'")
            .bind(unit_id).bind(period_id).fetch_optional(&self.pool).await.map_err(AppError::Database)
    }
    async fn release(&self, id: &str) -> Result<bool, AppError> {
        let result = sqlx::query("UPDATE occupancy_records SET status = 'RELEASED', released_at = $1 WHERE id = $2 AND status = 'OCCUPIED'")
            .bind(Utc::now()).bind(id).execute(&self.pool).await.map_err(AppError::Database)?;
        Ok(result.rows_affected() > 0)
    }
}
