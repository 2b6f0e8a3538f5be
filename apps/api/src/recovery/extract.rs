//! Last-resort field-level extraction.
//!
//! Used only when neither direct parsing nor structural repair produced JSON.
//! Every function is pure and returns `None` instead of failing, so the pipeline
//! can fall through cleanly.

use regex::Regex;
use serde_json::{Map, Number, Value};

/// Shape of one field to pull out of unparseable text.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FieldKind {
    Text,
    Number,
    TextList,
    ObjectList,
}

#[derive(Debug, Clone, Copy)]
pub struct FieldSpec {
    pub name: &'static str,
    pub kind: FieldKind,
}

impl FieldSpec {
    pub const fn text(name: &'static str) -> Self {
        Self {
            name,
            kind: FieldKind::Text,
        }
    }

    pub const fn number(name: &'static str) -> Self {
        Self {
            name,
            kind: FieldKind::Number,
        }
    }

    pub const fn text_list(name: &'static str) -> Self {
        Self {
            name,
            kind: FieldKind::TextList,
        }
    }

    pub const fn object_list(name: &'static str) -> Self {
        Self {
            name,
            kind: FieldKind::ObjectList,
        }
    }
}

fn key_pattern(field: &str, value: &str) -> Option<Regex> {
    Regex::new(&format!(r#""{}"\s*:\s*{}"#, regex::escape(field), value)).ok()
}

/// Decodes the body of a JSON string literal (without quotes).
fn unescape(body: &str) -> Option<String> {
    serde_json::from_str::<String>(&format!("\"{body}\"")).ok()
}

/// `"field": "value"` → `value`, with JSON escapes decoded.
pub fn extract_text(text: &str, field: &str) -> Option<String> {
    let re = key_pattern(field, r#""((?:[^"\\]|\\.)*)""#)?;
    let body = re.captures(text)?.get(1)?.as_str();
    unescape(body).filter(|s| !s.trim().is_empty())
}

/// `"field": 12.5` or `"field": "12"` → `12.5` / `12`.
pub fn extract_number(text: &str, field: &str) -> Option<f64> {
    let re = key_pattern(field, r#""?(-?\d+(?:\.\d+)?)"?"#)?;
    re.captures(text)?.get(1)?.as_str().parse().ok()
}

/// Byte offset just after the `[` that opens `"field": [`.
fn array_start(text: &str, field: &str) -> Option<usize> {
    let re = key_pattern(field, r"\[")?;
    Some(re.find(text)?.end())
}

/// Collects complete string literals from `"field": [ ... ]`, stopping at the
/// closing bracket or at the end of a truncated block.
pub fn extract_text_list(text: &str, field: &str) -> Option<Vec<String>> {
    let block = &text[array_start(text, field)?..];
    let mut items = Vec::new();
    let mut in_string = false;
    let mut escape = false;
    let mut start = 0;

    for (i, c) in block.char_indices() {
        if in_string {
            if escape {
                escape = false;
            } else if c == '\\' {
                escape = true;
            } else if c == '"' {
                in_string = false;
                if let Some(item) = unescape(&block[start..i]) {
                    if !item.trim().is_empty() {
                        items.push(item);
                    }
                }
            }
            continue;
        }
        match c {
            '"' => {
                in_string = true;
                start = i + 1;
            }
            ']' | '{' | '}' => break,
            _ => {}
        }
    }

    (!items.is_empty()).then_some(items)
}

/// Collects every complete `{...}` object inside `"field": [ ... ]`.
/// Objects that fail to parse are skipped; a truncated trailing object is dropped.
pub fn extract_object_list(text: &str, field: &str) -> Option<Vec<Value>> {
    let block = &text[array_start(text, field)?..];
    let mut objects = Vec::new();
    let mut depth: i32 = 0;
    let mut start = None;
    let mut in_string = false;
    let mut escape = false;

    for (i, c) in block.char_indices() {
        if in_string {
            if escape {
                escape = false;
            } else if c == '\\' {
                escape = true;
            } else if c == '"' {
                in_string = false;
            }
            continue;
        }
        match c {
            '"' => in_string = true,
            '{' => {
                if depth == 0 {
                    start = Some(i);
                }
                depth += 1;
            }
            '}' => {
                if depth == 0 {
                    break;
                }
                depth -= 1;
                if depth == 0 {
                    if let Some(s) = start.take() {
                        if let Ok(obj @ Value::Object(_)) = serde_json::from_str(&block[s..=i]) {
                            objects.push(obj);
                        }
                    }
                }
            }
            ']' if depth == 0 => break,
            _ => {}
        }
    }

    (!objects.is_empty()).then_some(objects)
}

/// Whole numbers become integers so they deserialize into integer fields.
fn number_value(n: f64) -> Option<Value> {
    if n.fract() == 0.0 && n.abs() < 1e15 {
        Some(Value::from(n as i64))
    } else {
        Number::from_f64(n).map(Value::Number)
    }
}

/// Rebuilds a best-effort object from the named fields.
/// Returns `None` when not a single field could be recovered.
pub fn extract_fields(text: &str, specs: &[FieldSpec]) -> Option<Value> {
    let mut map = Map::new();

    for spec in specs {
        let value = match spec.kind {
            FieldKind::Text => extract_text(text, spec.name).map(Value::String),
            FieldKind::Number => extract_number(text, spec.name).and_then(number_value),
            FieldKind::TextList => extract_text_list(text, spec.name)
                .map(|items| Value::Array(items.into_iter().map(Value::String).collect())),
            FieldKind::ObjectList => extract_object_list(text, spec.name).map(Value::Array),
        };
        if let Some(value) = value {
            map.insert(spec.name.to_string(), value);
        }
    }

    (!map.is_empty()).then_some(Value::Object(map))
}
