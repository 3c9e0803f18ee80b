use chrono::{TimeZone, Utc};
use mission_control::db::Database;
use mission_control::models::*;

fn setup() -> Database {
    let db = Database::open_memory().expect("Failed to create database");
    db.migrate().expect("Failed to migrate");
    db
}

fn launch(flight_number: u32, mission: &str) -> Launch {
    Launch {
        flight_number,
        mission: mission.to_string(),
        rocket: "Falcon 1".to_string(),
        launch_date: Utc.with_ymd_and_hms(2030, 6, 1, 0, 0, 0).unwrap(),
        target: Some("Kepler-442 b".to_string()),
        upcoming: true,
        success: Some(true),
        customers: vec!["NASA".to_string(), "NRO".to_string()],
    }
}

mod launches {
    use super::*;

    #[test]
    fn upsert_creates_when_absent() {
        let db = setup();

        db.upsert_launch(&launch(100, "Apollo")).unwrap();

        let stored = db.get_launch(100).unwrap().unwrap();
        assert_eq!(stored.mission, "Apollo");
        assert_eq!(stored.customers, vec!["NASA", "NRO"]);
        assert_eq!(stored.success, Some(true));
    }

    #[test]
    fn upsert_fully_replaces_when_present() {
        let db = setup();
        db.upsert_launch(&launch(100, "Apollo")).unwrap();

        let mut replacement = launch(100, "Artemis");
        replacement.upcoming = false;
        replacement.success = Some(false);
        replacement.customers = vec!["ESA".to_string()];
        db.upsert_launch(&replacement).unwrap();

        let stored = db.get_launch(100).unwrap().unwrap();
        assert_eq!(stored.mission, "Artemis");
        assert!(!stored.upcoming);
        assert_eq!(stored.success, Some(false));
        assert_eq!(stored.customers, vec!["ESA"]);

        // Still exactly one record under this key.
        assert_eq!(db.list_launches(0, 0).unwrap().len(), 1);
    }

    #[test]
    fn upsert_round_trips_null_success() {
        let db = setup();
        let mut pending = launch(200, "Future Mission");
        pending.success = None;

        db.upsert_launch(&pending).unwrap();

        let stored = db.get_launch(200).unwrap().unwrap();
        assert_eq!(stored.success, None);
    }

    #[test]
    fn get_launch_returns_none_for_unknown_key() {
        let db = setup();
        assert!(db.get_launch(100).unwrap().is_none());
    }

    #[test]
    fn find_launch_matching_requires_all_fields_to_match() {
        let db = setup();
        db.upsert_launch(&launch(1, "FalconSat")).unwrap();

        assert!(db
            .find_launch_matching(1, "FalconSat", "Falcon 1")
            .unwrap()
            .is_some());
        assert!(db
            .find_launch_matching(1, "FalconSat", "Falcon 9")
            .unwrap()
            .is_none());
        assert!(db
            .find_launch_matching(2, "FalconSat", "Falcon 1")
            .unwrap()
            .is_none());
    }

    #[test]
    fn list_launches_orders_ascending_by_flight_number() {
        let db = setup();
        for n in [103, 101, 102] {
            db.upsert_launch(&launch(n, "Mission")).unwrap();
        }

        let numbers: Vec<_> = db
            .list_launches(0, 0)
            .unwrap()
            .iter()
            .map(|l| l.flight_number)
            .collect();
        assert_eq!(numbers, vec![101, 102, 103]);
    }

    #[test]
    fn list_launches_applies_skip_and_limit() {
        let db = setup();
        for n in 100..110 {
            db.upsert_launch(&launch(n, "Mission")).unwrap();
        }

        let page = db.list_launches(4, 3).unwrap();
        let numbers: Vec<_> = page.iter().map(|l| l.flight_number).collect();
        assert_eq!(numbers, vec![104, 105, 106]);
    }

    #[test]
    fn list_launches_zero_limit_means_unbounded() {
        let db = setup();
        for n in 100..110 {
            db.upsert_launch(&launch(n, "Mission")).unwrap();
        }

        assert_eq!(db.list_launches(0, 0).unwrap().len(), 10);
        assert_eq!(db.list_launches(8, 0).unwrap().len(), 2);
    }

    #[test]
    fn list_launches_clamps_oversized_skip_and_limit() {
        let db = setup();
        for n in 100..103 {
            db.upsert_launch(&launch(n, "Mission")).unwrap();
        }

        // An offset past the end addresses an empty page, never an error.
        assert!(db.list_launches(u64::MAX, 10).unwrap().is_empty());
        // A huge limit must stay bounded rather than wrap to "no limit".
        assert_eq!(db.list_launches(0, u64::MAX).unwrap().len(), 3);
    }

    #[test]
    fn max_flight_number_is_none_on_empty_store() {
        let db = setup();
        assert_eq!(db.max_flight_number().unwrap(), None);
    }

    #[test]
    fn max_flight_number_tracks_highest_key() {
        let db = setup();
        db.upsert_launch(&launch(100, "Apollo")).unwrap();
        db.upsert_launch(&launch(150, "Artemis")).unwrap();
        db.upsert_launch(&launch(120, "Gemini")).unwrap();

        assert_eq!(db.max_flight_number().unwrap(), Some(150));
    }
}

mod planets {
    use super::*;

    #[test]
    fn upsert_planet_is_idempotent() {
        let db = setup();

        db.upsert_planet("Kepler-442 b").unwrap();
        db.upsert_planet("Kepler-442 b").unwrap();

        assert_eq!(db.count_planets().unwrap(), 1);
        assert_eq!(
            db.get_all_planets().unwrap(),
            vec![Planet {
                kepler_name: "Kepler-442 b".to_string()
            }]
        );
    }

    #[test]
    fn planet_exists_distinguishes_known_from_unknown() {
        let db = setup();
        db.upsert_planet("Kepler-442 b").unwrap();

        assert!(db.planet_exists("Kepler-442 b").unwrap());
        assert!(!db.planet_exists("Vulcan").unwrap());
    }

    #[test]
    fn get_all_planets_sorts_by_name() {
        let db = setup();
        for name in ["Kepler-62 f", "Kepler-296 f", "Kepler-442 b"] {
            db.upsert_planet(name).unwrap();
        }

        let names: Vec<_> = db
            .get_all_planets()
            .unwrap()
            .into_iter()
            .map(|p| p.kepler_name)
            .collect();
        assert_eq!(names, vec!["Kepler-296 f", "Kepler-442 b", "Kepler-62 f"]);
    }
}
