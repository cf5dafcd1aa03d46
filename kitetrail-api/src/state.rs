use std::sync::Arc;

use kitetrail_core::booking::BookingManager;
use kitetrail_core::sync::SeatSync;
use kitetrail_domain::events::SeatEvent;
use kitetrail_domain::flight::Seat;
use kitetrail_store::SnapshotStore;
use tokio::sync::{broadcast, RwLock};

#[derive(Clone)]
pub struct AppState {
    pub manager: Arc<RwLock<BookingManager>>,
    pub snapshot: Arc<SnapshotStore>,
    pub sync: Arc<dyn SeatSync>,
    pub events_tx: broadcast::Sender<SeatEvent>,
}

impl AppState {
    /// Rewrites the snapshot after a committed mutation. Persistence trouble
    /// is logged, never bounced back to the request that triggered it.
    pub fn persist(&self, manager: &BookingManager) {
        if let Err(e) = self.snapshot.save(&manager.list_flights()) {
            tracing::warn!("Failed to persist snapshot: {}", e);
        }
    }

    /// Snapshot write plus seat-event broadcast, the tail of every mutating
    /// handler.
    pub fn commit_effects(&self, manager: &BookingManager, flight_id: &str, seat: &Seat) {
        self.persist(manager);
        let _ = self.events_tx.send(SeatEvent::now(flight_id, seat));
    }
}
