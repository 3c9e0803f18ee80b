//! Bootstrap reconciliation against the remote launch catalog.
//!
//! One bulk, unpaginated query pulls every historical launch with its rocket
//! name and payload customers projected in. The sync is idempotent: a
//! sentinel probe for the first catalog launch short-circuits the whole run
//! when the store is already populated.

use std::time::Duration;

use chrono::{DateTime, Utc};
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use thiserror::Error;

use crate::db::Database;
use crate::models::Launch;

/// Default catalog query endpoint.
pub const DEFAULT_CATALOG_URL: &str = "https://api.spacexdata.com/v5/launches/query";

/// The remote call is fail-fast: no retries, one bounded attempt.
const FETCH_TIMEOUT: Duration = Duration::from_secs(30);

/// Catalog sync errors. `Request` and `Status` are fatal to startup;
/// per-record write failures never surface here.
#[derive(Debug, Error)]
pub enum SyncError {
    #[error("Launch catalog request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("Launch catalog responded with status {0}")]
    Status(StatusCode),

    #[error(transparent)]
    Storage(#[from] anyhow::Error),
}

/// A launch document as the remote catalog returns it, with the rocket and
/// payload projections nested the way the query requests them.
#[derive(Debug, Clone, Deserialize)]
pub struct CatalogLaunch {
    pub flight_number: u32,
    pub name: String,
    pub rocket: CatalogRocket,
    #[serde(default)]
    pub payloads: Vec<CatalogPayload>,
    pub date_local: String,
    pub upcoming: bool,
    #[serde(default)]
    pub success: Option<bool>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CatalogRocket {
    pub name: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CatalogPayload {
    #[serde(default)]
    pub customers: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct CatalogPage {
    docs: Vec<CatalogLaunch>,
}

pub struct CatalogSyncService {
    db: Database,
    client: Client,
    url: String,
}

impl CatalogSyncService {
    pub fn new(db: Database, url: impl Into<String>) -> Self {
        Self {
            db,
            client: Client::new(),
            url: url.into(),
        }
    }

    /// Reconcile the remote catalog into the store.
    ///
    /// Skipped entirely when the sentinel launch is already present. A fetch
    /// or status failure is fatal; individual record failures are logged and
    /// the rest of the batch continues.
    pub async fn load(&self) -> Result<(), SyncError> {
        let sentinel = self.db.find_launch_matching(1, "FalconSat", "Falcon 1")?;
        if sentinel.is_some() {
            tracing::info!("Launch data already loaded");
            return Ok(());
        }

        tracing::info!("Downloading launch data from {}", self.url);
        let docs = self.fetch().await?;
        self.apply(&docs);
        Ok(())
    }

    async fn fetch(&self) -> Result<Vec<CatalogLaunch>, SyncError> {
        let response = self
            .client
            .post(&self.url)
            .timeout(FETCH_TIMEOUT)
            .json(&query_body())
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(SyncError::Status(status));
        }

        let page: CatalogPage = response.json().await?;
        Ok(page.docs)
    }

    /// Upsert every catalog document, sequentially. A record that fails to
    /// map or persist is logged and skipped; it must not abort the batch.
    pub fn apply(&self, docs: &[CatalogLaunch]) {
        for doc in docs {
            let launch = match map_launch(doc) {
                Ok(launch) => launch,
                Err(err) => {
                    tracing::warn!("Skipping catalog launch {}: {err}", doc.flight_number);
                    continue;
                }
            };

            tracing::debug!("{} {}", launch.flight_number, launch.mission);
            if let Err(err) = self.db.upsert_launch(&launch) {
                tracing::warn!("Could not save launch {}: {err}", launch.flight_number);
            }
        }
    }
}

/// Bulk query requesting rocket-name and payload-customer projections, with
/// pagination disabled.
fn query_body() -> serde_json::Value {
    serde_json::json!({
        "query": {},
        "options": {
            "pagination": false,
            "populate": [
                { "path": "rocket", "select": { "name": 1 } },
                { "path": "payloads", "select": { "customers": 1 } },
            ],
        },
    })
}

/// Typed mapping from the catalog schema to the launch schema: nested payload
/// customer lists flatten into one, and the local date parses to UTC.
fn map_launch(doc: &CatalogLaunch) -> anyhow::Result<Launch> {
    let launch_date: DateTime<Utc> = DateTime::parse_from_rfc3339(&doc.date_local)
        .map_err(|err| anyhow::anyhow!("invalid date_local {:?}: {err}", doc.date_local))?
        .with_timezone(&Utc);

    let customers = doc
        .payloads
        .iter()
        .flat_map(|payload| payload.customers.iter().cloned())
        .collect();

    Ok(Launch {
        flight_number: doc.flight_number,
        mission: doc.name.clone(),
        rocket: doc.rocket.name.clone(),
        launch_date,
        target: None,
        upcoming: doc.upcoming,
        success: doc.success,
        customers,
    })
}
