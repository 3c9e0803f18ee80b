use thiserror::Error;
use tokio::sync::Mutex;

use crate::db::Database;
use crate::models::{Launch, ScheduleLaunchInput};
use crate::services::FlightNumberAllocator;

#[derive(Debug, Error)]
pub enum ScheduleError {
    #[error("No matching planet was found")]
    TargetNotFound,

    #[error(transparent)]
    Storage(#[from] anyhow::Error),
}

/// Validates and persists new launches.
///
/// All schedule calls go through one instance (shared via the router state),
/// and `alloc_gate` serializes the allocate-and-persist sequence: without it,
/// two concurrent schedules could read the same maximum flight number and
/// collide on the key.
pub struct SchedulingService {
    db: Database,
    allocator: FlightNumberAllocator,
    alloc_gate: Mutex<()>,
}

impl SchedulingService {
    pub fn new(db: Database) -> Self {
        let allocator = FlightNumberAllocator::new(db.clone());
        Self {
            db,
            allocator,
            alloc_gate: Mutex::new(()),
        }
    }

    /// Schedule a new launch against a known target planet.
    ///
    /// Target validation happens before allocation, so a rejected schedule
    /// never consumes a flight number.
    pub async fn schedule(&self, input: ScheduleLaunchInput) -> Result<Launch, ScheduleError> {
        if !self.db.planet_exists(&input.target)? {
            return Err(ScheduleError::TargetNotFound);
        }

        let _guard = self.alloc_gate.lock().await;
        let flight_number = self.allocator.next()?;
        let launch = input.into_launch(flight_number);
        self.db.upsert_launch(&launch)?;

        Ok(launch)
    }
}
