//! Root shape and metadata checks

use super::Findings;
use crate::error::Fault;
use crate::types::METADATA_DESCRIPTION_MAX;
use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde_json::{Map, Value};

const ROOT_KEYS: [&str; 3] = ["metadata", "nodes", "links"];
const METADATA_KEYS: [&str; 3] = ["version", "created", "description"];

/// Check required root keys and collection kinds
pub(crate) fn check_root(root: &Map<String, Value>, findings: &mut Findings) {
    let missing = missing_keys(root, &ROOT_KEYS);
    if !missing.is_empty() {
        findings.fault(Fault::MissingRootKeys { keys: missing });
    }

    for key in ["nodes", "links"] {
        if !root.get(key).is_some_and(Value::is_array) {
            findings.fault(Fault::NotAnArray { key });
        }
    }
}

/// Check metadata fields; an absent record is checked as an empty one
pub(crate) fn check_metadata(metadata: Option<&Value>, findings: &mut Findings) {
    let empty = Map::new();
    let metadata = match metadata {
        None => &empty,
        Some(Value::Object(map)) => map,
        Some(_) => {
            findings.fault(Fault::MetadataNotObject);
            return;
        }
    };

    let missing = missing_keys(metadata, &METADATA_KEYS);
    if !missing.is_empty() {
        findings.fault(Fault::MissingMetadataKeys { keys: missing });
    }

    match metadata.get("created") {
        None => {}
        Some(Value::String(created)) => {
            if !created.is_empty() && !is_iso8601(created) {
                findings.fault(Fault::InvalidCreatedDate {
                    value: created.clone(),
                });
            }
        }
        Some(other) => findings.fault(Fault::InvalidCreatedDate {
            value: other.to_string(),
        }),
    }

    match metadata.get("description") {
        None => {}
        Some(Value::String(desc)) => {
            let len = desc.chars().count();
            if len > METADATA_DESCRIPTION_MAX {
                findings.fault(Fault::MetadataDescriptionTooLong { len });
            }
        }
        Some(_) => findings.fault(Fault::MetadataFieldType {
            field: "description",
        }),
    }
}

fn missing_keys(map: &Map<String, Value>, required: &[&str]) -> Vec<String> {
    let mut missing: Vec<String> = required
        .iter()
        .filter(|k| !map.contains_key(**k))
        .map(|k| (*k).to_string())
        .collect();
    missing.sort();
    missing
}

/// Date (`2024-01-15`) or date-time with `T` or space separator, hour,
/// minute or second precision, optional fraction and optional offset or `Z`
pub(crate) fn is_iso8601(value: &str) -> bool {
    if NaiveDate::parse_from_str(value, "%Y-%m-%d").is_ok() {
        return true;
    }
    if DateTime::parse_from_rfc3339(value).is_ok() {
        return true;
    }

    let (Some(date), Some(sep), Some(time)) = (value.get(..10), value.get(10..11), value.get(11..))
    else {
        return false;
    };
    if sep != "T" && sep != " " {
        return false;
    }

    let time = match time.strip_suffix('Z') {
        Some(clock) => format!("{clock}+00:00"),
        None => time.to_string(),
    };
    let (clock, offset) = match time.find(['+', '-']) {
        Some(at) => time.split_at(at),
        None => (time.as_str(), ""),
    };
    // Hour-only precision is completed to whole minutes
    let clock = if clock.len() == 2 {
        format!("{clock}:00")
    } else {
        clock.to_string()
    };
    let candidate = format!("{date}T{clock}{offset}");

    if offset.is_empty() {
        ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M"]
            .iter()
            .any(|fmt| NaiveDateTime::parse_from_str(&candidate, fmt).is_ok())
    } else {
        ["%Y-%m-%dT%H:%M:%S%.f%:z", "%Y-%m-%dT%H:%M%:z"]
            .iter()
            .any(|fmt| DateTime::parse_from_str(&candidate, fmt).is_ok())
    }
}
