//! Fire record dataset: a JSON array of flat objects.
//!
//! Parsing is lenient per field. Structural problems (not JSON, not an array)
//! are errors; a malformed individual field never is. Bad numbers become NaN
//! and bad timestamps become `None`/[`Containment::Unparseable`], which the
//! filter later excludes.

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use foundation::time::{Timestamp, start_of_day};
use scene::record::{Containment, FireRecord};
use serde_json::{Map, Value};
use thiserror::Error;
use tracing::debug;

pub const FIELD_NAME: &str = "FIRE_NAME";
pub const FIELD_LATITUDE: &str = "latitude";
pub const FIELD_LONGITUDE: &str = "longitude";
pub const FIELD_SIZE: &str = "FIRE_SIZE";
pub const FIELD_DISCOVERED: &str = "DISCOVERY_DATETIME";
pub const FIELD_CONTAINED: &str = "CONT_DATETIME";
pub const FIELD_DURATION: &str = "FIRE_DURATION_DAYS";
pub const FIELD_CAUSE: &str = "NWCG_GENERAL_CAUSE";

/// Stable identifier fields, in lookup order.
pub const ID_FIELDS: [&str; 3] = ["FOD_ID", "OBJECTID", "id"];

const DATETIME_FORMATS: [&str; 5] = [
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M",
    "%m/%d/%Y %H:%M:%S",
];

const DATE_FORMATS: [&str; 2] = ["%Y-%m-%d", "%m/%d/%Y"];

#[derive(Debug, Error)]
pub enum FireDataError {
    #[error("fire dataset is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("fire dataset must be a JSON array of records")]
    NotAnArray,
}

/// Parses the whole dataset, preserving record order.
pub fn parse_fire_records(payload: &str) -> Result<Vec<FireRecord>, FireDataError> {
    let value: Value = serde_json::from_str(payload)?;
    fire_records_from_value(&value)
}

pub fn fire_records_from_value(value: &Value) -> Result<Vec<FireRecord>, FireDataError> {
    let items = value.as_array().ok_or(FireDataError::NotAnArray)?;

    let mut records = Vec::with_capacity(items.len());
    let mut skipped = 0usize;
    for item in items {
        match item.as_object() {
            Some(obj) => records.push(fire_record_from_object(obj)),
            None => skipped += 1,
        }
    }

    debug!(records = records.len(), skipped, "parsed fire dataset");
    Ok(records)
}

pub fn fire_record_from_object(obj: &Map<String, Value>) -> FireRecord {
    FireRecord {
        name: string_field(obj.get(FIELD_NAME)),
        latitude: lenient_number(obj.get(FIELD_LATITUDE)),
        longitude: lenient_number(obj.get(FIELD_LONGITUDE)),
        size_acres: lenient_number(obj.get(FIELD_SIZE)),
        discovered: string_field(obj.get(FIELD_DISCOVERED))
            .as_deref()
            .and_then(parse_timestamp),
        containment: containment(obj.get(FIELD_CONTAINED)),
        duration_days: lenient_number(obj.get(FIELD_DURATION)),
        cause: category_field(obj.get(FIELD_CAUSE)),
        source_id: ID_FIELDS
            .iter()
            .find_map(|field| string_field(obj.get(*field))),
    }
}

/// Numbers and numeric strings parse; anything else is NaN.
pub fn lenient_number(value: Option<&Value>) -> f64 {
    match value {
        Some(Value::Number(n)) => n.as_f64().unwrap_or(f64::NAN),
        Some(Value::String(s)) => {
            let s = s.trim();
            if s.is_empty() {
                f64::NAN
            } else {
                s.parse().unwrap_or(f64::NAN)
            }
        }
        _ => f64::NAN,
    }
}

/// Non-empty string, or a number rendered as a string.
fn string_field(value: Option<&Value>) -> Option<String> {
    match value {
        Some(Value::String(s)) if !s.is_empty() => Some(s.clone()),
        Some(Value::Number(n)) => Some(n.to_string()),
        _ => None,
    }
}

/// Any string, empty included, is a category value; null and missing are not.
fn category_field(value: Option<&Value>) -> Option<String> {
    match value {
        Some(Value::String(s)) => Some(s.clone()),
        Some(Value::Number(n)) => Some(n.to_string()),
        _ => None,
    }
}

fn containment(value: Option<&Value>) -> Containment {
    match value {
        None | Some(Value::Null) => Containment::Uncontained,
        Some(Value::String(s)) if s.is_empty() => Containment::Uncontained,
        Some(Value::String(s)) => match parse_timestamp(s) {
            Some(t) => Containment::At(t),
            None => Containment::Unparseable,
        },
        Some(_) => Containment::Unparseable,
    }
}

/// Parses a source timestamp as local wall-clock time.
///
/// Accepts ISO-like date-times (space or `T` separator, optional fraction),
/// US `m/d/Y` forms, bare dates (midnight) and RFC 3339 with an offset
/// (converted to UTC wall time).
pub fn parse_timestamp(raw: &str) -> Option<Timestamp> {
    let s = raw.trim();
    if s.is_empty() {
        return None;
    }
    for format in DATETIME_FORMATS {
        if let Ok(t) = NaiveDateTime::parse_from_str(s, format) {
            return Some(t);
        }
    }
    for format in DATE_FORMATS {
        if let Ok(d) = NaiveDate::parse_from_str(s, format) {
            return Some(start_of_day(d));
        }
    }
    DateTime::parse_from_rfc3339(s).ok().map(|t| t.naive_utc())
}

#[cfg(test)]
mod tests {
    use super::{FireDataError, lenient_number, parse_fire_records, parse_timestamp};
    use chrono::NaiveDate;
    use pretty_assertions::assert_eq;
    use scene::record::Containment;
    use serde_json::json;

    fn at(y: i32, m: u32, d: u32, h: u32, min: u32) -> chrono::NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(h, min, 0)
            .unwrap()
    }

    #[test]
    fn parses_a_full_record() {
        let payload = r#"[{
            "FIRE_NAME": "AUGUST COMPLEX",
            "latitude": 39.77,
            "longitude": "-122.67",
            "FIRE_SIZE": 1032648,
            "DISCOVERY_DATETIME": "2020-08-16 04:00:00",
            "CONT_DATETIME": "2020-11-11T18:30:00",
            "FIRE_DURATION_DAYS": 87.6,
            "NWCG_GENERAL_CAUSE": "Natural",
            "FOD_ID": 400629554
        }]"#;
        let records = parse_fire_records(payload).unwrap();
        assert_eq!(records.len(), 1);
        let r = &records[0];
        assert_eq!(r.name.as_deref(), Some("AUGUST COMPLEX"));
        assert_eq!(r.longitude, -122.67);
        assert_eq!(r.size_acres, 1_032_648.0);
        assert_eq!(r.discovered, Some(at(2020, 8, 16, 4, 0)));
        assert_eq!(r.containment, Containment::At(at(2020, 11, 11, 18, 30)));
        assert_eq!(r.cause.as_deref(), Some("Natural"));
        assert_eq!(r.source_id.as_deref(), Some("400629554"));
        assert!(r.has_finite_measurements());
    }

    #[test]
    fn missing_and_malformed_fields_are_tolerated() {
        let payload = r#"[
            {"FIRE_NAME": "", "latitude": null, "FIRE_SIZE": "abc",
             "DISCOVERY_DATETIME": "not a date", "CONT_DATETIME": "nope"},
            {"DISCOVERY_DATETIME": "2020-08-01", "CONT_DATETIME": null},
            {"CONT_DATETIME": ""},
            42
        ]"#;
        let records = parse_fire_records(payload).unwrap();
        assert_eq!(records.len(), 3);

        assert_eq!(records[0].name, None);
        assert!(records[0].latitude.is_nan());
        assert!(records[0].longitude.is_nan());
        assert!(records[0].size_acres.is_nan());
        assert_eq!(records[0].discovered, None);
        assert_eq!(records[0].containment, Containment::Unparseable);
        assert_eq!(records[0].cause, None);
        assert_eq!(records[1].cause, None);

        assert_eq!(records[1].discovered, Some(at(2020, 8, 1, 0, 0)));
        assert_eq!(records[1].containment, Containment::Uncontained);
        assert_eq!(records[2].containment, Containment::Uncontained);
    }

    #[test]
    fn empty_cause_is_a_category() {
        let payload = r#"[
            {"NWCG_GENERAL_CAUSE": ""},
            {"NWCG_GENERAL_CAUSE": null},
            {"NWCG_GENERAL_CAUSE": "Human"}
        ]"#;
        let causes: Vec<Option<String>> = parse_fire_records(payload)
            .unwrap()
            .into_iter()
            .map(|r| r.cause)
            .collect();
        assert_eq!(
            causes,
            vec![Some(String::new()), None, Some("Human".to_string())]
        );
    }

    #[test]
    fn structural_errors_are_reported() {
        assert!(matches!(
            parse_fire_records("{\"a\": 1}"),
            Err(FireDataError::NotAnArray)
        ));
        assert!(matches!(
            parse_fire_records("[{"),
            Err(FireDataError::Json(_))
        ));
        assert_eq!(parse_fire_records("[]").unwrap().len(), 0);
    }

    #[test]
    fn lenient_numbers() {
        assert_eq!(lenient_number(Some(&json!(2.5))), 2.5);
        assert_eq!(lenient_number(Some(&json!(" 10 "))), 10.0);
        assert!(lenient_number(Some(&json!(""))).is_nan());
        assert!(lenient_number(Some(&json!(null))).is_nan());
        assert!(lenient_number(Some(&json!(true))).is_nan());
        assert!(lenient_number(None).is_nan());
    }

    #[test]
    fn timestamp_forms() {
        assert_eq!(
            parse_timestamp("2020-08-16T04:00:00.000"),
            Some(at(2020, 8, 16, 4, 0))
        );
        assert_eq!(parse_timestamp("2020-08-16 04:15"), Some(at(2020, 8, 16, 4, 15)));
        assert_eq!(parse_timestamp("08/16/2020"), Some(at(2020, 8, 16, 0, 0)));
        assert_eq!(
            parse_timestamp("2020-08-16T04:00:00-07:00"),
            Some(at(2020, 8, 16, 11, 0))
        );
        assert_eq!(parse_timestamp("  "), None);
        assert_eq!(parse_timestamp("yesterday"), None);
    }
}
