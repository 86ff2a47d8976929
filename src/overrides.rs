//! Optional user-supplied consumption overrides
//!
//! The file is a JSON object keyed by fiscal year, each value a consumption
//! map in KToE:
//!
//! ```json
//! { "2022-23": { "Coal": { "Industry": 190000, "Final consumption": 190000 } } }
//! ```
//!
//! A missing or unreadable file never stops generation; it is reported and
//! treated as "no overrides".

use std::fs;
use std::path::Path;

use indexmap::IndexMap;
use log::{info, warn};
use serde_json::{Map, Value};

use crate::models::{ConsumptionMap, SectorValues};

/// fiscal year -> consumption map
pub type Overrides = IndexMap<String, ConsumptionMap>;

/// Load overrides from `path`, falling back to an empty set on any problem
pub fn load_overrides(path: &Path) -> Overrides {
    if !path.exists() {
        info!("No consumption overrides at {}", path.display());
        return Overrides::new();
    }

    let raw = match fs::read_to_string(path) {
        Ok(raw) => raw,
        Err(e) => {
            warn!("Failed to read {}: {}", path.display(), e);
            return Overrides::new();
        }
    };

    let overrides = parse_overrides(&raw, path);
    if !overrides.is_empty() {
        info!("Loaded consumption overrides from {}", path.display());
    }
    overrides
}

fn parse_overrides(raw: &str, path: &Path) -> Overrides {
    let parsed: Value = match serde_json::from_str(raw) {
        Ok(value) => value,
        Err(e) => {
            warn!("Failed to parse {}: {}", path.display(), e);
            return Overrides::new();
        }
    };

    let Value::Object(years) = parsed else {
        warn!("{} is not a JSON object, ignoring", path.display());
        return Overrides::new();
    };

    let mut overrides = Overrides::new();
    for (year, entry) in years {
        let Value::Object(commodities) = entry else {
            warn!("Skipping override for {}: not an object", year);
            continue;
        };
        let map = consumption_map(&year, commodities);
        overrides.insert(year, map);
    }
    overrides
}

/// Keep every numeric sector value of one year, skipping anything else
fn consumption_map(year: &str, commodities: Map<String, Value>) -> ConsumptionMap {
    let mut map = ConsumptionMap::new();

    for (commodity, sectors) in commodities {
        let Value::Object(sectors) = sectors else {
            warn!("{}: skipping {}, not an object", year, commodity);
            continue;
        };

        let mut values = SectorValues::new();
        for (sector, value) in sectors {
            match value.as_f64() {
                Some(v) => {
                    values.insert(sector, v);
                }
                None => warn!("{}: skipping {} / {}, not a number", year, commodity, sector),
            }
        }
        map.insert(commodity, values);
    }

    map
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::File;
    use std::io::Write;
    use tempfile::tempdir;

    fn write_file(dir: &Path, contents: &str) -> std::path::PathBuf {
        let path = dir.join("consumption-overrides.json");
        let mut file = File::create(&path).unwrap();
        write!(file, "{}", contents).unwrap();
        path
    }

    #[test]
    fn missing_file_means_no_overrides() {
        let dir = tempdir().unwrap();
        let overrides = load_overrides(&dir.path().join("absent.json"));
        assert!(overrides.is_empty());
    }

    #[test]
    fn valid_file_is_keyed_by_year() {
        let dir = tempdir().unwrap();
        let path = write_file(
            dir.path(),
            r#"{
                "2022-23": {
                    "Coal": { "Industry": 190000, "Final consumption": 190000 },
                    "Electricity": { "Industry": 50000, "Others": 70000 }
                }
            }"#,
        );

        let overrides = load_overrides(&path);
        assert_eq!(overrides.len(), 1);
        let year = &overrides["2022-23"];
        assert_eq!(year["Coal"]["Industry"], 190000.0);
        assert_eq!(year["Electricity"]["Others"], 70000.0);
        let commodities: Vec<&str> = year.keys().map(String::as_str).collect();
        assert_eq!(commodities, ["Coal", "Electricity"]);
    }

    #[test]
    fn non_object_json_is_ignored() {
        let dir = tempdir().unwrap();
        for contents in ["[1, 2, 3]", "null", "42", "\"2022-23\""] {
            let path = write_file(dir.path(), contents);
            assert!(load_overrides(&path).is_empty(), "accepted {}", contents);
        }
    }

    #[test]
    fn invalid_json_is_ignored() {
        let dir = tempdir().unwrap();
        let path = write_file(dir.path(), "{ not json");
        assert!(load_overrides(&path).is_empty());
    }

    #[test]
    fn non_numeric_values_are_dropped_individually() {
        let dir = tempdir().unwrap();
        let path = write_file(
            dir.path(),
            r#"{
                "2022-23": {
                    "Coal": { "Industry": 190000, "Transport": null, "Final consumption": 190000 },
                    "Lignite": "n/a",
                    "Natural Gas": { "Industry": "lots", "Others": 1200.5 }
                }
            }"#,
        );

        let overrides = load_overrides(&path);
        let year = &overrides["2022-23"];
        assert_eq!(year["Coal"].len(), 2);
        assert_eq!(year["Coal"]["Final consumption"], 190000.0);
        assert!(!year["Coal"].contains_key("Transport"));
        assert!(!year.contains_key("Lignite"));
        assert_eq!(year["Natural Gas"].len(), 1);
        assert_eq!(year["Natural Gas"]["Others"], 1200.5);
    }

    #[test]
    fn malformed_year_entry_is_skipped() {
        let dir = tempdir().unwrap();
        let path = write_file(
            dir.path(),
            r#"{
                "2021-22": "unknown",
                "2020-21": { "Coal": { "Industry": 150000 } }
            }"#,
        );

        let overrides = load_overrides(&path);
        assert!(!overrides.contains_key("2021-22"));
        assert_eq!(overrides["2020-21"]["Coal"]["Industry"], 150000.0);
    }
}
