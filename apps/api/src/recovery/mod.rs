//! Response Recovery Pipeline: turns raw model text into a validated entity.
//!
//! Tiers, cheapest first:
//! 1. direct parse of the fence-stripped text
//! 2. sanitised parse (trailing commas, typographic quotes)
//! 3. structural repair of truncation
//! 4. field-level regex extraction
//!
//! Each tier is a plain `fn(&str) -> Option<Value>`; the first `Some` wins.
//! Task parsers then normalize, fill defaults and call [`finish`].

use serde::de::DeserializeOwned;
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, warn};

use crate::models::Validate;

pub mod extract;
pub mod fences;
pub mod normalize;
pub mod repair;

pub use extract::FieldSpec;
pub use fences::strip_code_fences;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strategy {
    Direct,
    Sanitized,
    Repaired,
    Extracted,
}

#[derive(Debug, Error)]
pub enum RecoveryError {
    #[error("{task} response was empty")]
    Empty { task: &'static str },

    #[error("no recoverable JSON in {task} response. Response preview: {preview}")]
    NoJson {
        task: &'static str,
        preview: String,
    },

    #[error("{task} response failed validation: {message}")]
    Schema {
        task: &'static str,
        message: String,
    },
}

/// A parsed value and the tier that produced it.
#[derive(Debug)]
pub struct Recovered {
    pub value: Value,
    pub strategy: Strategy,
}

fn structured(value: Value) -> Option<Value> {
    (value.is_object() || value.is_array()).then_some(value)
}

fn direct(text: &str) -> Option<Value> {
    serde_json::from_str(text).ok().and_then(structured)
}

fn sanitized(text: &str) -> Option<Value> {
    serde_json::from_str(&repair::sanitize_json(text))
        .ok()
        .and_then(structured)
}

/// Repairs the text as-is first; sanitizing would also rewrite typographic quotes
/// that sit inside string values.
fn repaired(text: &str) -> Option<Value> {
    [text.to_string(), repair::sanitize_json(text)]
        .iter()
        .filter_map(|candidate| repair::repair_truncated_json(candidate))
        .find_map(|fixed| serde_json::from_str(&fixed).ok().and_then(structured))
}

/// Truncates to `max_chars` characters for log and error previews.
pub fn preview(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        text.to_string()
    } else {
        let head: String = text.chars().take(max_chars).collect();
        format!("{head}...")
    }
}

/// Runs the recovery tiers over raw provider output.
///
/// `fields` drives the last-resort extraction tier. Fails only when every tier failed.
pub fn recover_json(
    raw: &str,
    task: &'static str,
    fields: &[FieldSpec],
) -> Result<Recovered, RecoveryError> {
    let text = strip_code_fences(raw);
    if text.is_empty() {
        return Err(RecoveryError::Empty { task });
    }

    let tiers: [(Strategy, fn(&str) -> Option<Value>); 3] = [
        (Strategy::Direct, direct),
        (Strategy::Sanitized, sanitized),
        (Strategy::Repaired, repaired),
    ];

    for (strategy, attempt) in tiers {
        if let Some(value) = attempt(text) {
            if strategy == Strategy::Direct {
                debug!("{task}: parsed response directly");
            } else {
                warn!("{task}: response recovered via {strategy:?}");
            }
            return Ok(Recovered { value, strategy });
        }
    }

    match extract::extract_fields(text, fields) {
        Some(value) => {
            warn!("{task}: response rebuilt via field extraction");
            Ok(Recovered {
                value,
                strategy: Strategy::Extracted,
            })
        }
        None => Err(RecoveryError::NoJson {
            task,
            preview: preview(text, 200),
        }),
    }
}

/// Deserializes a normalized value into its typed schema without validating it.
pub fn decode<T: DeserializeOwned>(value: Value, task: &'static str) -> Result<T, RecoveryError> {
    serde_json::from_value(value).map_err(|e| RecoveryError::Schema {
        task,
        message: e.to_string(),
    })
}

/// Runs the strict validation pass on an already-typed result.
pub fn check<T: Validate>(parsed: T, task: &'static str) -> Result<T, RecoveryError> {
    parsed
        .validate()
        .map_err(|message| RecoveryError::Schema { task, message })?;
    Ok(parsed)
}

/// Deserializes a normalized value into its strict schema and validates it.
pub fn finish<T>(value: Value, task: &'static str) -> Result<T, RecoveryError>
where
    T: DeserializeOwned + Validate,
{
    check(decode(value, task)?, task)
}
