use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;
use tracing::error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error("Resource not found: {0}")]
    NotFound(String),
    #[error("Unit is already occupied for this period")]
    UnitAlreadyOccupied,
    #[error("Unit unavailable: {0}")]
    UnitUnavailable(String),
    #[error("Invalid installment plan: {0}")]
    InvalidPlan(String),
    #[error("Already processed: {0}")]
    AlreadyProcessed(String),
    #[error("Payment declined: {0}")]
    GatewayDeclined(String),
    #[error("Payment gateway timed out")]
    GatewayTimeout,
    #[error("Not eligible for rebooking: {0}")]
    IneligibleForRebooking(String),
    #[error("Unauthorized")]
    Unauthorized,
    #[error("Conflict: {0}")]
    Conflict(String),
    #[error("Invalid input: {0}")]
    Validation(String),
    #[error("Internal server error")]
    Internal,
    #[error("Internal server error: {0}")]
    InternalWithMsg(String),
}

impl AppError {
    // Stable machine-readable codes so UI layers can branch on the failure
    // kind instead of parsing messages.
    pub fn code(&self) -> &'static str {
        match self {
            AppError::Database(_) => "DATABASE_ERROR",
            AppError::NotFound(_) => "NOT_FOUND",
            AppError::UnitAlreadyOccupied => "UNIT_ALREADY_OCCUPIED",
            AppError::UnitUnavailable(_) => "UNIT_UNAVAILABLE",
            AppError::InvalidPlan(_) => "INVALID_PLAN",
            AppError::AlreadyProcessed(_) => "ALREADY_PROCESSED",
            AppError::GatewayDeclined(_) => "GATEWAY_DECLINED",
            AppError::GatewayTimeout => "GATEWAY_TIMEOUT",
            AppError::IneligibleForRebooking(_) => "INELIGIBLE_FOR_REBOOKING",
            AppError::Unauthorized => "UNAUTHORIZED",
            AppError::Conflict(_) => "CONFLICT",
            AppError::Validation(_) => "VALIDATION",
            AppError::Internal | AppError::InternalWithMsg(_) => "INTERNAL",
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let code = self.code();

        let (status, message) = match &self {
            AppError::Database(e) => {
                if let Some(db_err) = e.as_database_error() {
                    let violation = db_err.code().unwrap_or_default();

                    // 2067 = SQLite Unique Constraint
                    // 23505 = PostgreSQL Unique Violation
                    if violation == "2067" || violation == "23505" {
                        return (
                            StatusCode::CONFLICT,
                            Json(json!({ "error": "Resource already exists (duplicate entry)", "code": "CONFLICT" }))
                        ).into_response();
                    }
                }

                error!("Database error: {:?}", e);
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error".to_string())
            }
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg.clone()),
            AppError::UnitAlreadyOccupied => (StatusCode::CONFLICT, self.to_string()),
            AppError::UnitUnavailable(msg) => (StatusCode::CONFLICT, format!("Unit unavailable: {}", msg)),
            AppError::InvalidPlan(msg) => (StatusCode::UNPROCESSABLE_ENTITY, format!("Invalid installment plan: {}", msg)),
            AppError::AlreadyProcessed(msg) => (StatusCode::CONFLICT, msg.clone()),
            AppError::GatewayDeclined(msg) => (StatusCode::PAYMENT_REQUIRED, format!("Payment declined: {}", msg)),
            AppError::GatewayTimeout => (StatusCode::GATEWAY_TIMEOUT, self.to_string()),
            AppError::IneligibleForRebooking(msg) => (StatusCode::CONFLICT, format!("Not eligible for rebooking: {}", msg)),
            AppError::Unauthorized => (StatusCode::UNAUTHORIZED, "Unauthorized".to_string()),
            AppError::Conflict(msg) => (StatusCode::CONFLICT, msg.clone()),
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            AppError::Internal => (StatusCode::INTERNAL_SERVER_ERROR, "Internal error".to_string()),
            AppError::InternalWithMsg(msg) => {
                error!("Internal error: {}", msg);
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal error".to_string())
            }
        };

        let body = Json(json!({
            "error": message,
            "code": code,
        }));

        (status, body).into_response()
    }
}
