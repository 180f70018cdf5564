use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;
use sqlx::{postgres::{PgPoolOptions, PgConnectOptions}, sqlite::{SqlitePoolOptions, SqliteJournalMode, SqliteConnectOptions}};
use sqlx::{PgPool, SqlitePool, ConnectOptions};
use tracing::info;
use tracing::log::LevelFilter;

use crate::config::Config;
use crate::state::AppState;
use crate::infra::directory::http_occupant_directory::HttpOccupantDirectory;
use crate::infra::gateway::http_payment_gateway::HttpPaymentGateway;
use crate::infra::notify::http_notification_sink::HttpNotificationSink;
use crate::infra::repositories::{
    postgres_invoice_repo::PostgresInvoiceRepo, postgres_occupancy_repo::PostgresOccupancyRepo,
    postgres_payment_repo::PostgresPaymentRepo, postgres_period_repo::PostgresPeriodRepo,
    postgres_plan_repo::PostgresPlanRepo, postgres_rebooking_repo::PostgresRebookingRepo,
    postgres_reservation_repo::PostgresReservationRepo, postgres_unit_repo::PostgresUnitRepo,
    sqlite_invoice_repo::SqliteInvoiceRepo, sqlite_occupancy_repo::SqliteOccupancyRepo,
    sqlite_payment_repo::SqlitePaymentRepo, sqlite_period_repo::SqlitePeriodRepo,
    sqlite_plan_repo::SqlitePlanRepo, sqlite_rebooking_repo::SqliteRebookingRepo,
    sqlite_reservation_repo::SqliteReservationRepo, sqlite_unit_repo::SqliteUnitRepo,
};

pub async fn bootstrap_state(config: &Config) -> AppState {
    let database_url = &config.database_url;

    let gateway = Arc::new(HttpPaymentGateway::new(
        config.gateway_url.clone(),
        config.gateway_api_key.clone(),
        config.gateway_timeout_secs,
    ));
    let occupant_directory = Arc::new(HttpOccupantDirectory::new(
        config.occupant_directory_url.clone(),
    ));
    let notifier = Arc::new(HttpNotificationSink::new(
        config.notify_url.clone(),
        config.notify_token.clone(),
    ));

    if database_url.starts_with("postgres://") || database_url.starts_with("postgresql://") {
        info!("Initializing PostgreSQL connection...");

        let mut opts: PgConnectOptions = database_url.parse().expect("Invalid Postgres URL");
        opts = opts.log_statements(LevelFilter::Debug)
            .log_slow_statements(LevelFilter::Warn, Duration::from_millis(500));

        let pool = PgPoolOptions::new()
            .max_connections(10)
            .connect_with(opts)
            .await
            .expect("Failed to connect to Postgres");

        run_postgres_migrations(&pool).await;

        AppState::assemble(
            config.clone(),
            Arc::new(PostgresUnitRepo::new(pool.clone())),
            Arc::new(PostgresPeriodRepo::new(pool.clone())),
            Arc::new(PostgresPlanRepo::new(pool.clone())),
            Arc::new(PostgresOccupancyRepo::new(pool.clone())),
            Arc::new(PostgresReservationRepo::new(pool.clone())),
            Arc::new(PostgresInvoiceRepo::new(pool.clone())),
            Arc::new(PostgresPaymentRepo::new(pool.clone())),
            Arc::new(PostgresRebookingRepo::new(pool.clone())),
            gateway,
            occupant_directory,
            notifier,
        )
    } else {
        info!("Initializing SQLite connection with WAL Mode...");

        let opts = SqliteConnectOptions::from_str(database_url)
            .expect("Invalid SQLite connection string")
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal)
            .busy_timeout(Duration::from_secs(5))
            .log_statements(LevelFilter::Debug)
            .log_slow_statements(LevelFilter::Warn, Duration::from_millis(500));

        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect_with(opts)
            .await
            .expect("Failed to connect to SQLite");

        run_sqlite_migrations(&pool).await;

        AppState::assemble(
            config.clone(),
            Arc::new(SqliteUnitRepo::new(pool.clone())),
            Arc::new(SqlitePeriodRepo::new(pool.clone())),
            Arc::new(SqlitePlanRepo::new(pool.clone())),
            Arc::new(SqliteOccupancyRepo::new(pool.clone())),
            Arc::new(SqliteReservationRepo::new(pool.clone())),
            Arc::new(SqliteInvoiceRepo::new(pool.clone())),
            Arc::new(SqlitePaymentRepo::new(pool.clone())),
            Arc::new(SqliteRebookingRepo::new(pool.clone())),
            gateway,
            occupant_directory,
            notifier,
        )
    }
}

async fn run_postgres_migrations(pool: &PgPool) {
    sqlx::migrate!("./migrations/postgres")
        .run(pool)
        .await
        .expect("Failed to run Postgres migrations");
}

async fn run_sqlite_migrations(pool: &SqlitePool) {
    sqlx::migrate!("./migrations/sqlite")
        .run(pool)
        .await
        .expect("Failed to run SQLite migrations");
}
