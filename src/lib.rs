//! Mission Control: launch scheduling and habitable-planet tracking.
//!
//! At startup the server classifies a local planet-candidate dataset and
//! reconciles the remote launch catalog into durable storage, then serves
//! paginated reads plus schedule/abort mutations over HTTP.

pub mod api;
pub mod catalog;
pub mod db;
pub mod ingest;
pub mod models;
pub mod services;
