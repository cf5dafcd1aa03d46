use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Booking push: the remote service is the authority on conflicts, so a
/// rejection here means another client won the seat.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookingSyncRequest {
    pub flight_id: String,
    pub seat_id: String,
    pub passenger_name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CancellationSyncRequest {
    pub flight_id: String,
    pub seat_id: String,
}

/// Remote responses carry a status flag plus an optional human-readable
/// message explaining a rejection.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SyncAck {
    pub status: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl SyncAck {
    pub fn is_ok(&self) -> bool {
        self.status == "ok"
    }
}

#[derive(Debug, thiserror::Error)]
pub enum SyncError {
    #[error("Remote rejected the request: {0}")]
    Rejected(String),

    #[error("Transport failure: {0}")]
    Transport(String),
}

/// Capability for mirroring committed seat mutations to a remote booking
/// service. The repository and state machine never talk to the network
/// themselves; callers push through this seam after local validation, which
/// keeps the transition logic testable without any transport in place.
#[async_trait]
pub trait SeatSync: Send + Sync {
    async fn push_booking(&self, req: &BookingSyncRequest) -> Result<(), SyncError>;

    async fn push_cancellation(&self, req: &CancellationSyncRequest) -> Result<(), SyncError>;

    async fn push_reset(&self, flight_id: Option<&str>) -> Result<(), SyncError>;
}

/// Local-only mode: every push succeeds immediately and the in-process
/// repository stays the sole system of record.
pub struct NullSeatSync;

#[async_trait]
impl SeatSync for NullSeatSync {
    async fn push_booking(&self, _req: &BookingSyncRequest) -> Result<(), SyncError> {
        Ok(())
    }

    async fn push_cancellation(&self, _req: &CancellationSyncRequest) -> Result<(), SyncError> {
        Ok(())
    }

    async fn push_reset(&self, _flight_id: Option<&str>) -> Result<(), SyncError> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_booking_request_serialization() {
        let json = r#"
            {
                "flight_id": "KT123",
                "seat_id": "12A",
                "passenger_name": "Jane Doe"
            }
        "#;
        let req: BookingSyncRequest = serde_json::from_str(json).expect("Failed to deserialize");
        assert_eq!(req.flight_id, "KT123");
        assert_eq!(req.seat_id, "12A");
        assert_eq!(req.passenger_name, "Jane Doe");
    }

    #[test]
    fn test_ack_message_is_optional() {
        let ack: SyncAck = serde_json::from_str(r#"{"status":"ok"}"#).unwrap();
        assert!(ack.is_ok());
        assert!(ack.message.is_none());

        let ack: SyncAck =
            serde_json::from_str(r#"{"status":"error","message":"seat already reserved"}"#).unwrap();
        assert!(!ack.is_ok());
        assert_eq!(ack.message.as_deref(), Some("seat already reserved"));
    }

    #[tokio::test]
    async fn test_null_sync_accepts_everything() {
        let sync = NullSeatSync;
        let req = BookingSyncRequest {
            flight_id: "KT123".to_string(),
            seat_id: "12A".to_string(),
            passenger_name: "Jane Doe".to_string(),
        };
        assert!(sync.push_booking(&req).await.is_ok());
        assert!(sync.push_reset(None).await.is_ok());
    }
}
