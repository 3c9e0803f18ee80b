use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Flight number assigned to the first launch scheduled on an empty store.
pub const DEFAULT_FLIGHT_NUMBER: u32 = 100;

/// Customer list used when a schedule request does not name any.
pub const DEFAULT_CUSTOMERS: &[&str] = &["NASA"];

/// A mission launch, either imported from the remote catalog or scheduled
/// locally.
///
/// `flight_number` is the unique key: it is allocated once, never reused, and
/// a persisted launch is never deleted — aborting only flips `upcoming` and
/// `success` in place.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Launch {
    pub flight_number: u32,
    pub mission: String,
    pub rocket: String,
    pub launch_date: DateTime<Utc>,
    /// Planet the mission targets. Catalog-imported launches have no target.
    pub target: Option<String>,
    pub upcoming: bool,
    /// `None` for catalog launches that have not flown yet.
    pub success: Option<bool>,
    pub customers: Vec<String>,
}

/// Input for scheduling a new launch. The flight number is allocated by the
/// server, never supplied by the caller.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleLaunchInput {
    pub mission: String,
    pub rocket: String,
    pub launch_date: DateTime<Utc>,
    /// Kepler name of the destination planet. Must already be known.
    pub target: String,
    /// Defaults to `["NASA"]` if not specified.
    pub customers: Option<Vec<String>>,
}

impl ScheduleLaunchInput {
    /// Materialize a full launch record with the given flight number and the
    /// scheduling defaults filled in.
    pub fn into_launch(self, flight_number: u32) -> Launch {
        Launch {
            flight_number,
            mission: self.mission,
            rocket: self.rocket,
            launch_date: self.launch_date,
            target: Some(self.target),
            upcoming: true,
            success: Some(true),
            customers: self.customers.unwrap_or_else(|| {
                DEFAULT_CUSTOMERS.iter().map(|c| c.to_string()).collect()
            }),
        }
    }
}
