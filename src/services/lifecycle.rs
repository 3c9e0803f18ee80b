use thiserror::Error;

use crate::db::Database;
use crate::models::Launch;

#[derive(Debug, Error)]
pub enum AbortError {
    #[error("Launch not found")]
    NotFound,

    #[error(transparent)]
    Storage(#[from] anyhow::Error),
}

/// Soft-deletes launches: a launch record is never removed, only marked no
/// longer upcoming and unsuccessful.
pub struct LifecycleManager {
    db: Database,
}

impl LifecycleManager {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    /// Abort a launch by flight number.
    ///
    /// Idempotent: aborting an already-aborted launch succeeds and returns
    /// the same terminal state.
    pub fn abort(&self, flight_number: u32) -> Result<Launch, AbortError> {
        let mut launch = self
            .db
            .get_launch(flight_number)?
            .ok_or(AbortError::NotFound)?;

        launch.upcoming = false;
        launch.success = Some(false);
        self.db.upsert_launch(&launch)?;

        Ok(launch)
    }
}
