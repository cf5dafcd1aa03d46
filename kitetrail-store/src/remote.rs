use std::time::Duration;

use async_trait::async_trait;
use kitetrail_core::sync::{
    BookingSyncRequest, CancellationSyncRequest, SeatSync, SyncAck, SyncError,
};
use reqwest::{Client, StatusCode};
use serde::Serialize;
use tracing::debug;

/// `SeatSync` backed by the remote booking service over HTTP. Conflict-style
/// responses (and explicit error acks) surface as `Rejected`; everything else
/// that goes wrong on the wire is a `Transport` failure.
pub struct HttpSeatSync {
    client: Client,
    base_url: String,
}

impl HttpSeatSync {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, SyncError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| SyncError::Transport(e.to_string()))?;
        let base_url: String = base_url.into();

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    async fn push<T: Serialize + Sync>(&self, path: &str, body: &T) -> Result<(), SyncError> {
        let response = self
            .client
            .post(format!("{}{}", self.base_url, path))
            .json(body)
            .send()
            .await
            .map_err(|e| SyncError::Transport(e.to_string()))?;

        match response.status() {
            StatusCode::OK => {
                let ack = response
                    .json::<SyncAck>()
                    .await
                    .map_err(|e| SyncError::Transport(e.to_string()))?;
                if ack.is_ok() {
                    Ok(())
                } else {
                    Err(SyncError::Rejected(
                        ack.message.unwrap_or_else(|| "request rejected".to_string()),
                    ))
                }
            }
            StatusCode::CONFLICT | StatusCode::BAD_REQUEST => {
                let ack = response.json::<SyncAck>().await.ok();
                Err(SyncError::Rejected(
                    ack.and_then(|a| a.message)
                        .unwrap_or_else(|| "request rejected".to_string()),
                ))
            }
            status => {
                let body = response.text().await.unwrap_or_default();
                Err(SyncError::Transport(format!("{}: {}", status, body)))
            }
        }
    }
}

#[async_trait]
impl SeatSync for HttpSeatSync {
    async fn push_booking(&self, req: &BookingSyncRequest) -> Result<(), SyncError> {
        debug!(
            "Pushing booking for flight {} seat {}",
            req.flight_id, req.seat_id
        );
        self.push("/bookings", req).await
    }

    async fn push_cancellation(&self, req: &CancellationSyncRequest) -> Result<(), SyncError> {
        debug!(
            "Pushing cancellation for flight {} seat {}",
            req.flight_id, req.seat_id
        );
        self.push("/cancellations", req).await
    }

    async fn push_reset(&self, flight_id: Option<&str>) -> Result<(), SyncError> {
        #[derive(Serialize)]
        struct ResetBody<'a> {
            #[serde(skip_serializing_if = "Option::is_none")]
            flight_id: Option<&'a str>,
        }

        self.push("/reset", &ResetBody { flight_id }).await
    }
}
