use residence_backend::{
    api::router::create_router,
    config::Config,
    domain::models::{occupant::OccupantProfile, payment::{ChargeIntent, GatewayCharge}},
    domain::ports::{NotificationSink, OccupantDirectory, PaymentGateway},
    error::AppError,
    infra::repositories::{
        sqlite_invoice_repo::SqliteInvoiceRepo,
        sqlite_occupancy_repo::SqliteOccupancyRepo,
        sqlite_payment_repo::SqlitePaymentRepo,
        sqlite_period_repo::SqlitePeriodRepo,
        sqlite_plan_repo::SqlitePlanRepo,
        sqlite_rebooking_repo::SqliteRebookingRepo,
        sqlite_reservation_repo::SqliteReservationRepo,
        sqlite_unit_repo::SqliteUnitRepo,
    },
    state::AppState,
};
use async_trait::async_trait;
use axum::Router;
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions};
use sqlx::{Pool, Sqlite};
use std::str::FromStr;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use uuid::Uuid;

pub struct MockPaymentGateway {
    pub decline_charges: AtomicBool,
    pub charges: Mutex<Vec<i64>>,
}

impl MockPaymentGateway {
    pub fn new() -> Self {
        Self {
            decline_charges: AtomicBool::new(false),
            charges: Mutex::new(Vec::new()),
        }
    }
}

#[async_trait]
impl PaymentGateway for MockPaymentGateway {
    async fn create_intent(&self, _amount_cents: i64, _currency: &str, _payer_email: &str) -> Result<ChargeIntent, AppError> {
        Ok(ChargeIntent { client_secret: format!("cs_test_{}", Uuid::new_v4()) })
    }

    async fn charge(&self, amount_cents: i64, _currency: &str, _payer_email: &str) -> Result<GatewayCharge, AppError> {
        if self.decline_charges.load(Ordering::SeqCst) {
            return Err(AppError::GatewayDeclined("card declined".to_string()));
        }
        self.charges.lock().unwrap().push(amount_cents);
        Ok(GatewayCharge { reference: format!("ch_test_{}", Uuid::new_v4()) })
    }
}

pub struct MockOccupantDirectory;

#[async_trait]
impl OccupantDirectory for MockOccupantDirectory {
    async fn get_occupant(&self, id: &str) -> Result<Option<OccupantProfile>, AppError> {
        Ok(Some(OccupantProfile {
            id: id.to_string(),
            name: "Directory Profile".to_string(),
            email: Some("occupant@example.com".to_string()),
            phone: None,
        }))
    }
}

pub struct MockNotificationSink {
    pub events: Mutex<Vec<String>>,
}

impl MockNotificationSink {
    pub fn new() -> Self {
        Self { events: Mutex::new(Vec::new()) }
    }
}

#[async_trait]
impl NotificationSink for MockNotificationSink {
    async fn notify(&self, event: &str, _payload: serde_json::Value) -> Result<(), AppError> {
        self.events.lock().unwrap().push(event.to_string());
        Ok(())
    }
}

#[allow(dead_code)]
pub struct TestApp {
    pub router: Router,
    pub pool: Pool<Sqlite>,
    pub db_filename: String,
    pub state: Arc<AppState>,
    pub gateway: Arc<MockPaymentGateway>,
    pub notifier: Arc<MockNotificationSink>,
}

impl TestApp {
    pub async fn new() -> Self {
        Self::with_rebook_charge_first(true).await
    }

    pub async fn with_rebook_charge_first(rebook_charge_first: bool) -> Self {
        let db_filename = format!("test_{}.db", Uuid::new_v4());
        let db_url = format!("sqlite://{}?mode=rwc", db_filename);

        let connection_options = SqliteConnectOptions::from_str(&db_url)
            .unwrap()
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal)
            .busy_timeout(Duration::from_secs(5));

        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect_with(connection_options)
            .await
            .expect("Failed to connect to test db");

        sqlx::migrate!("./migrations/sqlite")
            .run(&pool)
            .await
            .expect("Failed to migrate test db");

        let config = Config {
            database_url: db_url.clone(),
            port: 0,
            gateway_url: "http://localhost".to_string(),
            gateway_api_key: "test-key".to_string(),
            gateway_timeout_secs: 2,
            occupant_directory_url: "http://localhost".to_string(),
            notify_url: "http://localhost".to_string(),
            notify_token: "test-notify-token".to_string(),
            webhook_token: "test-hook-token".to_string(),
            currency: "EUR".to_string(),
            default_deposit_cents: 50_000,
            discount_scope: "REMAINDER".to_string(),
            rebook_charge_first,
        };

        let gateway = Arc::new(MockPaymentGateway::new());
        let notifier = Arc::new(MockNotificationSink::new());

        let state = Arc::new(AppState::assemble(
            config,
            Arc::new(SqliteUnitRepo::new(pool.clone())),
            Arc::new(SqlitePeriodRepo::new(pool.clone())),
            Arc::new(SqlitePlanRepo::new(pool.clone())),
            Arc::new(SqliteOccupancyRepo::new(pool.clone())),
            Arc::new(SqliteReservationRepo::new(pool.clone())),
            Arc::new(SqliteInvoiceRepo::new(pool.clone())),
            Arc::new(SqlitePaymentRepo::new(pool.clone())),
            Arc::new(SqliteRebookingRepo::new(pool.clone())),
            gateway.clone(),
            Arc::new(MockOccupantDirectory),
            notifier.clone(),
        ));

        let router = create_router(state.clone());

        Self {
            router,
            pool,
            db_filename,
            state,
            gateway,
            notifier,
        }
    }
}

impl Drop for TestApp {
    fn drop(&mut self) {
        let _ = std::fs::remove_file(&self.db_filename);
        let _ = std::fs::remove_file(format!("{}-wal", self.db_filename));
        let _ = std::fs::remove_file(format!("{}-shm", self.db_filename));
    }
}
