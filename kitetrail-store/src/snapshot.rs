use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use kitetrail_domain::flight::{parse_seat_label, Flight};
use serde::{Deserialize, Serialize};
use tracing::warn;

#[derive(Debug, Serialize, Deserialize)]
struct SnapshotFile {
    saved_at: DateTime<Utc>,
    flights: Vec<Flight>,
}

/// Persists the full flight/seat state as a JSON document under a fixed
/// storage namespace. Loaded once at startup and rewritten after every
/// committed mutation.
pub struct SnapshotStore {
    path: PathBuf,
}

impl SnapshotStore {
    pub fn new(dir: impl AsRef<Path>, namespace: &str) -> Self {
        Self {
            path: dir.as_ref().join(format!("{}.json", namespace)),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn save(&self, flights: &[Flight]) -> Result<(), SnapshotError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let file = SnapshotFile {
            saved_at: Utc::now(),
            flights: flights.to_vec(),
        };
        fs::write(&self.path, serde_json::to_string_pretty(&file)?)?;
        Ok(())
    }

    /// Loads the persisted snapshot. `None` means no snapshot has been
    /// written yet; callers fall back to seed data.
    pub fn load(&self) -> Result<Option<Vec<Flight>>, SnapshotError> {
        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };

        let file: SnapshotFile = serde_json::from_str(&raw)?;
        for flight in &file.flights {
            for seat in &flight.seats {
                // Opaque ids still load; the convention is only advisory here.
                if parse_seat_label(&seat.id).is_none() {
                    warn!(
                        "Seat id {} on flight {} does not follow the row/letter convention",
                        seat.id, flight.id
                    );
                }
            }
        }
        Ok(Some(file.flights))
    }
}

#[derive(Debug, thiserror::Error)]
pub enum SnapshotError {
    #[error("Snapshot IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Snapshot encoding error: {0}")]
    Encoding(#[from] serde_json::Error),
}
