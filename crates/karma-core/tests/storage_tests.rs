//! Session cache, preference persistence, config and ACG filters.

use karma_core::acg::{planets, AcgCityRow, Angle, CityFilter};
use karma_core::config::KarmaConfig;
use karma_core::preferences::{section_key, CLASSICAL_KEY};
use karma_core::{ComputeCache, ComputeParams, FileStore, UserPreferences};
use serde_json::json;
use std::fs;

fn params(n: u32) -> ComputeParams {
    ComputeParams {
        dob: format!("1990-01-{:02}", n),
        tob: "12:00".to_string(),
        tz: "UTC".to_string(),
        lat: "0".to_string(),
        lon: "0".to_string(),
    }
}

#[test]
fn test_cache_evicts_least_recently_used() {
    let mut cache = ComputeCache::new(2);
    cache.save(&params(1), json!({"n": 1}));
    cache.save(&params(2), json!({"n": 2}));

    // Touch 1 so 2 becomes the eviction candidate.
    assert!(cache.load(&params(1)).is_some());
    cache.save(&params(3), json!({"n": 3}));

    assert_eq!(cache.len(), 2);
    assert!(cache.load(&params(2)).is_none());
    assert_eq!(cache.load(&params(1)), Some(&json!({"n": 1})));
    assert_eq!(cache.load(&params(3)), Some(&json!({"n": 3})));
}

#[test]
fn test_cache_overwrite_restamps() {
    let mut cache = ComputeCache::new(4);
    cache.save(&params(1), json!({"v": "old"}));
    let first = cache.peek(&params(1)).unwrap().saved_at;
    cache.save(&params(1), json!({"v": "new"}));

    let entry = cache.peek(&params(1)).unwrap();
    assert!(entry.saved_at >= first);
    assert_eq!(entry.json, json!({"v": "new"}));
    assert_eq!(cache.len(), 1);
}

#[test]
fn test_cache_capacity_from_config() {
    let config = KarmaConfig::parse("[cache]\ncapacity = 1000\n").unwrap();
    let cache = ComputeCache::from_config(&config.cache);
    assert_eq!(cache.capacity(), 256);
    assert!(config.cache.capacity_was_clamped());
}

#[test]
fn test_preferences_persist_via_file_store() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("prefs.json");

    {
        let mut store = FileStore::open(&path).unwrap();
        let mut prefs = UserPreferences::load(&store, &["shadbala", "acg"]);
        prefs.classical_labels = true;
        prefs.toggle_section("acg");
        prefs.save(&mut store).unwrap();
    }

    let on_disk: serde_json::Value = serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
    assert_eq!(on_disk[CLASSICAL_KEY], json!("1"));
    assert_eq!(on_disk[section_key("acg")], json!("0"));

    let store = FileStore::open(&path).unwrap();
    let prefs = UserPreferences::load(&store, &["shadbala", "acg"]);
    assert!(prefs.classical_labels);
    assert!(prefs.is_open("shadbala"));
    assert!(prefs.is_collapsed("acg"));
}

#[test]
fn test_file_store_unreadable_path_is_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("prefs.json");
    fs::create_dir_all(&path).unwrap();

    // A directory is an I/O error, not an empty store.
    assert!(FileStore::open(&path).is_err());
}

#[test]
fn test_config_round_trip_on_disk() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.toml");
    fs::write(&path, "[log]\nlevel = \"info\"\n[preferences]\npath = \"/tmp/k.json\"\n").unwrap();

    let config = KarmaConfig::load(&path).unwrap();
    assert_eq!(config.log.level, "info");
    assert_eq!(config.cache.effective_capacity(), 16);
    assert_eq!(
        config.preferences.effective_path(),
        std::path::PathBuf::from("/tmp/k.json")
    );
}

#[test]
fn test_acg_rows_from_json() {
    let rows: Vec<AcgCityRow> = serde_json::from_value(json!([
        {"name": "Kyoto", "country": "Japan", "planet": "Jupiter", "angle": "MC", "distance_km": 210.0, "lat": 35.0, "lon": 135.7},
        {"name": "Osaka", "country": "Japan", "planet": "Jupiter", "angle": "IC", "lat": 34.7, "lon": 135.5},
        {"name": "Cusco", "country": "Peru", "planet": "Sun", "angle": "ASC", "distance_km": 12.5, "lat": -13.5, "lon": -72.0}
    ]))
    .unwrap();

    let filter = CityFilter {
        country: Some("japan".to_string()),
        angle: Some(Angle::Mc),
        ..Default::default()
    };
    let hits = filter.apply(&rows);
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].name, "Kyoto");

    assert_eq!(planets(&rows), vec!["Jupiter", "Sun"]);

    let sorted: Vec<&str> = CityFilter::default()
        .apply(&rows)
        .iter()
        .map(|r| r.name.as_str())
        .collect();
    assert_eq!(sorted, vec!["Cusco", "Kyoto", "Osaka"]);
}
