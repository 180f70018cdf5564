use std::env;

#[derive(Clone)]
pub struct Config {
    pub database_url: String,
    pub port: u16,
    pub gateway_url: String,
    pub gateway_api_key: String,
    pub gateway_timeout_secs: u64,
    pub occupant_directory_url: String,
    pub notify_url: String,
    pub notify_token: String,
    pub webhook_token: String,
    pub currency: String,
    pub default_deposit_cents: i64,
    // "REMAINDER" applies the plan discount to the post-deposit remainder
    // before splitting; "TOTAL" discounts the full price first.
    pub discount_scope: String,
    // When false, rebooking allocates the unit before charging the deposit.
    pub rebook_charge_first: bool,
}

impl Config {
    pub fn from_env() -> Self {
        Self {
            database_url: env::var("DATABASE_URL").expect("DATABASE_URL must be set"),
            port: env::var("PORT").unwrap_or_else(|_| "3000".to_string()).parse().expect("PORT must be a number"),
            gateway_url: env::var("GATEWAY_URL").unwrap_or_else(|_| "http://localhost:8100/api/v1".to_string()),
            gateway_api_key: env::var("GATEWAY_API_KEY").unwrap_or_else(|_| "test-gateway-key".to_string()),
            gateway_timeout_secs: env::var("GATEWAY_TIMEOUT_SECS").unwrap_or_else(|_| "10".to_string()).parse().expect("GATEWAY_TIMEOUT_SECS must be a number"),
            occupant_directory_url: env::var("OCCUPANT_DIRECTORY_URL").unwrap_or_else(|_| "http://localhost:8200/api/v1".to_string()),
            notify_url: env::var("NOTIFY_URL").unwrap_or_else(|_| "http://localhost:8300/api/v1/notify".to_string()),
            notify_token: env::var("NOTIFY_TOKEN").unwrap_or_else(|_| "test-notify-token".to_string()),
            webhook_token: env::var("WEBHOOK_TOKEN").expect("WEBHOOK_TOKEN must be set"),
            currency: env::var("CURRENCY").unwrap_or_else(|_| "EUR".to_string()),
            default_deposit_cents: env::var("DEFAULT_DEPOSIT_CENTS").unwrap_or_else(|_| "50000".to_string()).parse().expect("DEFAULT_DEPOSIT_CENTS must be a number"),
            discount_scope: env::var("DISCOUNT_SCOPE").unwrap_or_else(|_| "REMAINDER".to_string()),
            rebook_charge_first: env::var("REBOOK_CHARGE_FIRST").unwrap_or_else(|_| "true".to_string()).parse().expect("REBOOK_CHARGE_FIRST must be true or false"),
        }
    }
}
