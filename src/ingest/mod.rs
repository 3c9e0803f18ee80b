//! Streaming classification of the planet-candidate dataset.
//!
//! The dataset is a delimited file with a header row and `#`-prefixed comment
//! lines. Rows stream through the habitability predicate; survivors are
//! upserted by Kepler name. Processing is strictly sequential, so every write
//! has completed before the final count is taken.

use std::path::Path;

use serde::Deserialize;
use thiserror::Error;

use crate::db::Database;

#[derive(Debug, Error)]
pub enum IngestError {
    #[error("Failed to read planet dataset: {0}")]
    Csv(#[from] csv::Error),

    #[error(transparent)]
    Storage(#[from] anyhow::Error),
}

/// The candidate-table columns the classifier looks at. Everything else in
/// the row is discarded.
#[derive(Debug, Clone, Deserialize)]
pub struct CandidateRow {
    #[serde(default)]
    pub kepler_name: Option<String>,
    #[serde(default)]
    pub koi_disposition: String,
    #[serde(default)]
    pub koi_insol: Option<f64>,
    #[serde(default)]
    pub koi_prad: Option<f64>,
}

/// Habitability predicate: confirmed disposition, stellar flux strictly
/// between 0.36 and 1.11, planetary radius strictly below 1.6 Earth radii.
pub fn is_habitable(row: &CandidateRow) -> bool {
    let (Some(insolation), Some(radius)) = (row.koi_insol, row.koi_prad) else {
        return false;
    };

    row.koi_disposition == "CONFIRMED"
        && insolation > 0.36
        && insolation < 1.11
        && radius < 1.6
}

pub struct CsvIngestionPipeline {
    db: Database,
}

impl CsvIngestionPipeline {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    /// Stream the dataset at `path` and persist every habitable candidate.
    ///
    /// A read or parse error fails the whole run; a write failure on a single
    /// row is logged and the row skipped. Returns the cumulative number of
    /// habitable planets in the store, which on re-runs over the same data is
    /// unchanged because upserts by Kepler name are no-ops.
    pub fn run(&self, path: &Path) -> Result<u64, IngestError> {
        let mut reader = csv::ReaderBuilder::new()
            .comment(Some(b'#'))
            .trim(csv::Trim::All)
            .from_path(path)?;

        for result in reader.deserialize::<CandidateRow>() {
            let row = result?;
            if !is_habitable(&row) {
                continue;
            }

            let Some(name) = row.kepler_name.as_deref().filter(|n| !n.is_empty()) else {
                continue;
            };

            if let Err(err) = self.db.upsert_planet(name) {
                tracing::warn!("Could not save planet {name}: {err}");
            }
        }

        let count = self.db.count_planets()?;
        tracing::info!("done, {count} habitable planets found");
        Ok(count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn row(disposition: &str, insolation: f64, radius: f64) -> CandidateRow {
        CandidateRow {
            kepler_name: Some("Kepler-442 b".to_string()),
            koi_disposition: disposition.to_string(),
            koi_insol: Some(insolation),
            koi_prad: Some(radius),
        }
    }

    #[test]
    fn confirmed_in_range_is_habitable() {
        assert!(is_habitable(&row("CONFIRMED", 0.5, 1.59)));
    }

    #[test]
    fn non_confirmed_is_excluded_regardless_of_other_fields() {
        assert!(!is_habitable(&row("CANDIDATE", 0.5, 1.0)));
        assert!(!is_habitable(&row("FALSE POSITIVE", 0.5, 1.0)));
    }

    #[test]
    fn insolation_bounds_are_strict() {
        assert!(!is_habitable(&row("CONFIRMED", 0.36, 1.0)));
        assert!(!is_habitable(&row("CONFIRMED", 1.11, 1.0)));
        assert!(is_habitable(&row("CONFIRMED", 0.37, 1.0)));
        assert!(is_habitable(&row("CONFIRMED", 1.10, 1.0)));
    }

    #[test]
    fn radius_bound_is_strict() {
        assert!(!is_habitable(&row("CONFIRMED", 0.5, 1.6)));
        assert!(is_habitable(&row("CONFIRMED", 0.5, 1.59)));
    }

    #[test]
    fn missing_measurements_are_excluded() {
        let mut missing = row("CONFIRMED", 0.5, 1.0);
        missing.koi_insol = None;
        assert!(!is_habitable(&missing));

        let mut missing = row("CONFIRMED", 0.5, 1.0);
        missing.koi_prad = None;
        assert!(!is_habitable(&missing));
    }

    fn dataset(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    const SAMPLE: &str = "\
# Kepler Objects of Interest
# cumulative table excerpt
kepler_name,koi_disposition,koi_insol,koi_prad
Kepler-442 b,CONFIRMED,0.70,1.34
Kepler-62 f,CONFIRMED,0.41,1.41
Kepler-10 b,CONFIRMED,3408.74,1.47
Doomed-1 b,FALSE POSITIVE,0.70,1.34
,CONFIRMED,0.70,1.34
";

    #[test]
    fn pipeline_persists_only_habitable_named_candidates() {
        let db = Database::open_memory().unwrap();
        db.migrate().unwrap();
        let file = dataset(SAMPLE);

        let count = CsvIngestionPipeline::new(db.clone()).run(file.path()).unwrap();

        assert_eq!(count, 2);
        let names: Vec<_> = db
            .get_all_planets()
            .unwrap()
            .into_iter()
            .map(|p| p.kepler_name)
            .collect();
        assert_eq!(names, vec!["Kepler-442 b", "Kepler-62 f"]);
    }

    #[test]
    fn rerun_over_same_data_reports_same_cumulative_count() {
        let db = Database::open_memory().unwrap();
        db.migrate().unwrap();
        let file = dataset(SAMPLE);
        let pipeline = CsvIngestionPipeline::new(db.clone());

        assert_eq!(pipeline.run(file.path()).unwrap(), 2);
        assert_eq!(pipeline.run(file.path()).unwrap(), 2);
    }

    #[test]
    fn malformed_dataset_fails_the_run() {
        let db = Database::open_memory().unwrap();
        db.migrate().unwrap();
        let file = dataset(
            "kepler_name,koi_disposition,koi_insol,koi_prad\nKepler-442 b,CONFIRMED,not-a-number,1.34\n",
        );

        let result = CsvIngestionPipeline::new(db).run(file.path());
        assert!(matches!(result, Err(IngestError::Csv(_))));
    }
}
