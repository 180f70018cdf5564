use crate::domain::{models::plan::InstallmentPlan, ports::PlanRepository};
use crate::error::AppError;
use async_trait::async_trait;
use sqlx::PgPool;

pub struct PostgresPlanRepo {
    pool: PgPool,
}

impl PostgresPlanRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl PlanRepository for PostgresPlanRepo {
    async fn create(&self, plan: &InstallmentPlan) -> Result<InstallmentPlan, AppError> {
        sqlx::query_as::<_, InstallmentPlan>(
            "INSERT INTO installment_plans (id, name, number_of_installments, discount_percentage, late_fee_percentage, late_fee_flat_cents, due_dates_json, deposit_cents, is_active, created_at)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
             RETURNING *"
        )
            .bind(&plan.id).bind(&plan.name).bind(plan.number_of_installments).bind(plan.discount_percentage)
            .bind(plan.late_fee_percentage).bind(plan.late_fee_flat_cents).bind(&plan.due_dates_json)
            .bind(plan.deposit_cents).bind(plan.is_active).bind(plan.created_at)
            .fetch_one(&self.pool).await.map_err(AppError::Database)
    }
    async fn find_by_id(&self, id: &str) -> Result<Option<InstallmentPlan>, AppError> {
        sqlx::query_as::<_, InstallmentPlan>("SELECT * FROM installment_plans WHERE id = $1").bind(id).fetch_optional(&self.pool).await.map_err(AppError::Database)
    }
    async fn list(&self) -> Result<Vec<InstallmentPlan>, AppError> {
        sqlx::query_as::<_, InstallmentPlan>("SELECT * FROM installment_plans ORDER BY created_at DESC").fetch_all(&self.pool).await.map_err(AppError::Database)
    }
}
