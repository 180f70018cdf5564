use crate::domain::{models::{invoice::Invoice, reservation::Reservation}, ports::ReservationRepository};
use crate::error::AppError;
use async_trait::async_trait;
use sqlx::PgPool;

pub struct PostgresReservationRepo {
    pool: PgPool,
}

impl PostgresReservationRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ReservationRepository for PostgresReservationRepo {
    async fn create_with_invoices(&self, reservation: &Reservation, invoices: &[Invoice]) -> Result<Reservation, AppError> {
        let mut tx = self.pool.begin().await.map_err(AppError::Database)?;
        let created = sqlx::query_as::<_, Reservation>(
            "INSERT INTO reservations (id, occupant_id, occupant_kind, occupant_name, occupant_email, unit_id, period_id, plan_id, occupancy_id, status, total_cents, deposit_cents, created_at)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13)
             RETURNING *"
        )
            .bind(&reservation.id).bind(&reservation.occupant_id).bind(&reservation.occupant_kind)
            .bind(&reservation.occupant_name).bind(&reservation.occupant_email).bind(&reservation.unit_id)
            .bind(&reservation.period_id).bind(&reservation.plan_id).bind(&reservation.occupancy_id)
            .bind(&reservation.status).bind(reservation.total_cents).bind(reservation.deposit_cents)
            .bind(reservation.created_at)
            .fetch_one(&mut *tx).await.map_err(AppError::Database)?;

        for invoice in invoices {
            sqlx::query("INSERT INTO invoices (id, reservation_id, kind, sequence_number, amount_cents, due_date, status, created_at) VALUES ($1, $2, $3, $4, $5, $6, $7, $8)")
                .bind(&invoice.id).bind(&invoice.reservation_id).bind(&invoice.kind).bind(invoice.sequence_number)
                .bind(invoice.amount_cents).bind(invoice.due_date).bind(&invoice.status).bind(invoice.created_at)
                .execute(&mut *tx).await.map_err(AppError::Database)?;
        }
        tx.commit().await.map_err(AppError::Database)?;
        Ok(created)
    }
    async fn find_by_id(&self, id: &str) -> Result<Option<Reservation>, AppError> {
        sqlx::query_as::<_, Reservation>("SELECT * FROM reservations WHERE id = $1").bind(id).fetch_optional(&self.pool).await.map_err(AppError::Database)
    }
    async fn list(&self) -> Result<Vec<Reservation>, AppError> {
        sqlx::query_as::<_, Reservation>("SELECT * FROM reservations ORDER BY created_at DESC").fetch_all(&self.pool).await.map_err(AppError::Database)
    }
    async fn list_by_period(&self, period_id: &str) -> Result<Vec<Reservation>, AppError> {
        sqlx::query_as::<_, Reservation>("SELECT * FROM reservations WHERE period_id = $1 ORDER BY created_at DESC").bind(period_id).fetch_all(&self.pool).await.map_err(AppError::Database)
    }
    async fn find_active_for_occupant(&self, occupant_id: &str, period_id: &str) -> Result<Option<Reservation>, AppError> {
        sqlx::query_as::<_, Reservation>("SELECT * FROM reservations WHERE occupant_id = $1 AND period_id = $2 AND status != 'CANCELLED' LIMIT 1")
            .bind(occupant_id).bind(period_id).fetch_optional(&self.pool).await.map_err(AppError::Database)
    }
    async fn transition(&self, id: &str, from: &[&str], to: &str) -> Result<bool, AppError> {
        let placeholders = (0..from.len()).map(|i| format!("${}", i + 3)).collect::<Vec<_>>().join(", ");
        let sql = format!("UPDATE reservations SET status = $1 WHERE id = $2 AND status IN ({})", placeholders);
        let mut query = sqlx::query(&sql).bind(to).bind(id);
        for status in from {
            query = query.bind(*status);
        }
        let result = query.execute(&self.pool).await.map_err(AppError::Database)?;
        Ok(result.rows_affected() > 0)
    }
}
