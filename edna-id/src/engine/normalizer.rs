// Record Normalizer
//
// Reduces one prediction-service response to an ordered list of SpeciesRecord.
// Two producers exist upstream and their key priorities differ:
//
//   flat:   id <- sequence_id, id          name <- predicted_species, label, name
//   nested: id <- id, sequence_id          name <- name, predicted_species, label
//
// The asymmetry is observable behaviour and must not be unified.

use crate::error::NormalizeError;
use crate::types::{
    Confidence, NormalizedPayload, PayloadShape, RunMetrics, SpeciesRecord, UNKNOWN_SOURCE,
    UNKNOWN_SPECIES,
};
use serde_json::{Map, Value};
use tracing::debug;

const FLAT_ID_KEYS: &[&str] = &["sequence_id", "id"];
const FLAT_NAME_KEYS: &[&str] = &["predicted_species", "label", "name"];
const FLAT_CONFIDENCE_KEYS: &[&str] = &["confidence", "score", "match"];

const NESTED_ID_KEYS: &[&str] = &["id", "sequence_id"];
const NESTED_NAME_KEYS: &[&str] = &["name", "predicted_species", "label"];
const NESTED_CONFIDENCE_KEYS: &[&str] = &["confidence", "score"];

/// A raw payload after shape detection
///
/// Detection happens once at the boundary; mapping then dispatches on the
/// variant so each shape's fallback order stays explicit.
#[derive(Debug, Clone, Copy)]
pub enum RawPayload<'a> {
    /// Shape A: `[ {...}, ... ]`
    Flat(&'a [Value]),
    /// Shape B: `{ "species": [ {...}, ... ], "metrics"?: {...} }`
    Nested {
        species: &'a [Value],
        metrics: Option<&'a Value>,
    },
}

impl<'a> RawPayload<'a> {
    /// Classify a raw JSON value as one of the accepted shapes
    ///
    /// # Errors
    /// `UnrecognizedShape` for scalars, objects without a `species` array,
    /// and arrays containing anything other than objects.
    pub fn detect(raw: &'a Value) -> Result<Self, NormalizeError> {
        match raw {
            Value::Array(items) => {
                ensure_all_objects(items, "array element")?;
                Ok(RawPayload::Flat(items))
            }
            Value::Object(obj) => match obj.get("species") {
                Some(Value::Array(species)) => {
                    ensure_all_objects(species, "species element")?;
                    Ok(RawPayload::Nested {
                        species,
                        metrics: obj.get("metrics"),
                    })
                }
                Some(other) => Err(NormalizeError::UnrecognizedShape {
                    found: format!("object whose species field is {}", kind_of(other)),
                }),
                None => Err(NormalizeError::UnrecognizedShape {
                    found: "object without a species array".to_string(),
                }),
            },
            other => Err(NormalizeError::UnrecognizedShape {
                found: kind_of(other).to_string(),
            }),
        }
    }

    pub fn shape(&self) -> PayloadShape {
        match self {
            RawPayload::Flat(_) => PayloadShape::Flat,
            RawPayload::Nested { .. } => PayloadShape::Nested,
        }
    }

    /// Map every element to a canonical record, preserving order
    ///
    /// # Errors
    /// `UnrecognizedShape` if any element is not an object. Elements are never
    /// skipped, so a successful result has one record per element.
    pub fn into_normalized(self) -> Result<NormalizedPayload, NormalizeError> {
        match self {
            RawPayload::Flat(items) => Ok(NormalizedPayload {
                shape: PayloadShape::Flat,
                records: map_elements(items, "array element", map_flat)?,
                metrics: None,
            }),
            RawPayload::Nested { species, metrics } => Ok(NormalizedPayload {
                shape: PayloadShape::Nested,
                records: map_elements(species, "species element", map_nested)?,
                metrics: metrics.and_then(parse_metrics),
            }),
        }
    }
}

/// Normalize a raw payload to canonical records
///
/// Pure and deterministic: identical input yields identical output.
pub fn normalize(raw: &Value) -> Result<Vec<SpeciesRecord>, NormalizeError> {
    normalize_payload(raw).map(|payload| payload.records)
}

/// Normalize a raw payload, keeping its shape and any run metrics
pub fn normalize_payload(raw: &Value) -> Result<NormalizedPayload, NormalizeError> {
    let payload = RawPayload::detect(raw)?;
    let normalized = payload.into_normalized()?;

    debug!(
        "Normalized {} records from {} payload",
        normalized.records.len(),
        normalized.shape
    );

    Ok(normalized)
}

fn map_flat(obj: &Map<String, Value>, index: usize) -> SpeciesRecord {
    let id = first_text(obj, FLAT_ID_KEYS).unwrap_or_else(|| positional_id(index));
    let confidence = confidence_from(obj, FLAT_CONFIDENCE_KEYS, &id);

    SpeciesRecord {
        name: first_text(obj, FLAT_NAME_KEYS).unwrap_or_else(|| UNKNOWN_SPECIES.to_string()),
        confidence,
        sequence: Some(string_field(obj, "sequence").unwrap_or_default()),
        source: Some(string_field(obj, "source").unwrap_or_else(|| UNKNOWN_SOURCE.to_string())),
        id,
    }
}

fn map_nested(obj: &Map<String, Value>, index: usize) -> SpeciesRecord {
    let id = first_text(obj, NESTED_ID_KEYS).unwrap_or_else(|| positional_id(index));
    let confidence = confidence_from(obj, NESTED_CONFIDENCE_KEYS, &id);

    SpeciesRecord {
        name: first_text(obj, NESTED_NAME_KEYS).unwrap_or_else(|| UNKNOWN_SPECIES.to_string()),
        confidence,
        sequence: string_field(obj, "sequence"),
        source: None,
        id,
    }
}

/// 1-based positional identifier
fn positional_id(index: usize) -> String {
    (index + 1).to_string()
}

/// First key holding a non-empty string or a number (stringified)
fn first_text(obj: &Map<String, Value>, keys: &[&str]) -> Option<String> {
    keys.iter().find_map(|key| match obj.get(*key) {
        Some(Value::String(s)) if !s.is_empty() => Some(s.clone()),
        Some(Value::Number(n)) => Some(n.to_string()),
        _ => None,
    })
}

fn string_field(obj: &Map<String, Value>, key: &str) -> Option<String> {
    match obj.get(key) {
        Some(Value::String(s)) if !s.is_empty() => Some(s.clone()),
        _ => None,
    }
}

/// Select the first present confidence-like value and coerce it
///
/// Missing means absent, null or empty string. The chosen value is not
/// re-selected if it turns out to be non-numeric; it coerces to 0.
fn confidence_from(obj: &Map<String, Value>, keys: &[&str], id: &str) -> Confidence {
    let chosen = keys.iter().find_map(|key| match obj.get(*key) {
        None | Some(Value::Null) => None,
        Some(Value::String(s)) if s.is_empty() => None,
        Some(value) => Some((*key, value)),
    });

    let Some((key, value)) = chosen else {
        return 0.0;
    };

    match coerce_confidence(value) {
        Some(confidence) => confidence,
        None => {
            debug!(
                "Record {}: non-numeric {} value {} coerced to 0",
                id, key, value
            );
            0.0
        }
    }
}

/// Finite number, or a string that parses as one
fn coerce_confidence(value: &Value) -> Option<Confidence> {
    let parsed = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    parsed.filter(|v| v.is_finite())
}

fn parse_metrics(value: &Value) -> Option<RunMetrics> {
    let Some(obj) = value.as_object() else {
        debug!("Ignoring metrics field of type {}", kind_of(value));
        return None;
    };

    Some(RunMetrics {
        total_reads: obj.get("totalReads").and_then(Value::as_u64),
        total_species: obj.get("totalSpecies").and_then(Value::as_u64),
    })
}

fn map_elements(
    items: &[Value],
    label: &str,
    map: fn(&Map<String, Value>, usize) -> SpeciesRecord,
) -> Result<Vec<SpeciesRecord>, NormalizeError> {
    items
        .iter()
        .enumerate()
        .map(|(i, item)| match item.as_object() {
            Some(obj) => Ok(map(obj, i)),
            None => Err(non_object(label, i, item)),
        })
        .collect()
}

fn ensure_all_objects(items: &[Value], label: &str) -> Result<(), NormalizeError> {
    match items.iter().position(|item| !item.is_object()) {
        Some(i) => Err(non_object(label, i, &items[i])),
        None => Ok(()),
    }
}

fn non_object(label: &str, index: usize, item: &Value) -> NormalizeError {
    NormalizeError::UnrecognizedShape {
        found: format!("{} {} ({})", label, index, kind_of(item)),
    }
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
