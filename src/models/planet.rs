use serde::{Deserialize, Serialize};

/// A habitable planet candidate.
///
/// Only the unique Kepler name survives classification; every other catalog
/// column is discarded once the habitability predicate has passed. Planets
/// are created by the ingestion pipeline and never mutated or deleted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Planet {
    pub kepler_name: String,
}
