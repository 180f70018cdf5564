use crate::domain::{models::unit::Unit, ports::UnitRepository};
use crate::error::AppError;
use async_trait::async_trait;
use sqlx::SqlitePool;

pub struct SqliteUnitRepo {
    pool: SqlitePool,
}

impl SqliteUnitRepo {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UnitRepository for SqliteUnitRepo {
    async fn create(&self, unit: &Unit) -> Result<Unit, AppError> {
        sqlx::query_as::<_, Unit>(
            "INSERT INTO units (id, name, physical_status, created_at) VALUES (?, ?, ?, ?) RETURNING *"
        )
            .bind(&unit.id).bind(&unit.name).bind(&unit.physical_status).bind(unit.created_at)
            .fetch_one(&self.pool).await.map_err(AppError::Database)
    }
    async fn find_by_id(&self, id: &str) -> Result<Option<Unit>, AppError> {
        sqlx::query_as::<_, Unit>("SELECT * FROM units WHERE id = ?").bind(id).fetch_optional(&self.pool).await.map_err(AppError::Database)
    }
    async fn list(&self) -> Result<Vec<Unit>, AppError> {
        sqlx::query_as::<_, Unit>("SELECT * FROM units ORDER BY name ASC").fetch_all(&self.pool).await.map_err(AppError::Database)
    }
    async fn update_status(&self, id: &str, status: &str) -> Result<(), AppError> {
        let result = sqlx::query("UPDATE units SET physical_status = ? WHERE id = ?").bind(status).bind(id).execute(&self.pool).await.map_err(AppError::Database)?;
        if result.rows_affected() == 0 { return Err(AppError::NotFound("Unit not found".into())); }
        Ok(())
    }
}
