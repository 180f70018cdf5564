use crate::domain::ports::NotificationSink;
use crate::error::AppError;
use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;
use tracing::error;

/// Fire-and-forget delivery to the notification service. Callers spawn the
/// send and log failures; nothing in the booking or payment path waits on
/// this.
pub struct HttpNotificationSink {
    client: Client,
    api_url: String,
    api_key: String,
}

impl HttpNotificationSink {
    pub fn new(api_url: String, api_key: String) -> Self {
        Self {
            client: Client::new(),
            api_url,
            api_key,
        }
    }
}

#[derive(Serialize)]
struct NotificationPayload<'a> {
    event: &'a str,
    payload: serde_json::Value,
}

#[async_trait]
impl NotificationSink for HttpNotificationSink {
    async fn notify(&self, event: &str, payload: serde_json::Value) -> Result<(), AppError> {
        let body = NotificationPayload { event, payload };

        let res = self.client.post(&self.api_url)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                let msg = format!("Notification service connection error: {}", e);
                error!("{}", msg);
                AppError::InternalWithMsg(msg)
            })?;

        if !res.status().is_success() {
            let status = res.status();
            let text = res.text().await.unwrap_or_default();
            let msg = format!("Notification service failed. Status: {}, Body: {}", status, text);
            error!("{}", msg);
            return Err(AppError::InternalWithMsg(msg));
        }

        Ok(())
    }
}
