use anyhow::Result;

use crate::db::Database;
use crate::models::DEFAULT_FLIGHT_NUMBER;

/// Computes the next flight number from store state.
///
/// `next` alone is not atomic with the write that reserves the number; the
/// scheduling service wraps allocate-and-persist in a single critical
/// section so concurrent schedules can never observe the same maximum.
#[derive(Clone)]
pub struct FlightNumberAllocator {
    db: Database,
}

impl FlightNumberAllocator {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    /// Next available flight number: max + 1, or the fixed default on an
    /// empty store.
    pub fn next(&self) -> Result<u32> {
        Ok(match self.db.max_flight_number()? {
            Some(max) => max + 1,
            None => DEFAULT_FLIGHT_NUMBER,
        })
    }
}
