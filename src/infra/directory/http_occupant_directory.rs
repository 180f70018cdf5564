use crate::domain::models::occupant::OccupantProfile;
use crate::domain::ports::OccupantDirectory;
use crate::error::AppError;
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use tracing::error;

/// Read-only lookup against the external occupant directory. Used for
/// display and receipts; booking logic never depends on it.
pub struct HttpOccupantDirectory {
    client: Client,
    api_url: String,
}

impl HttpOccupantDirectory {
    pub fn new(api_url: String) -> Self {
        Self {
            client: Client::new(),
            api_url,
        }
    }
}

#[async_trait]
impl OccupantDirectory for HttpOccupantDirectory {
    async fn get_occupant(&self, id: &str) -> Result<Option<OccupantProfile>, AppError> {
        let res = self.client.get(format!("{}/occupants/{}", self.api_url, id))
            .send()
            .await
            .map_err(|e| {
                let msg = format!("Occupant directory connection error: {}", e);
                error!("{}", msg);
                AppError::InternalWithMsg(msg)
            })?;

        if res.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if !res.status().is_success() {
            let status = res.status();
            let msg = format!("Occupant directory lookup failed. Status: {}", status);
            error!("{}", msg);
            return Err(AppError::InternalWithMsg(msg));
        }

        let profile: OccupantProfile = res.json().await
            .map_err(|e| AppError::InternalWithMsg(format!("Malformed occupant profile: {}", e)))?;
        Ok(Some(profile))
    }
}
