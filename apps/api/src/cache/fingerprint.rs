//! Deterministic cache keys built from the semantically relevant request fields.

use std::fmt::Display;

/// Lowercases, trims and collapses internal whitespace.
pub fn canonical(text: &str) -> String {
    text.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

/// Builder for a task-scoped fingerprint.
///
/// Only fields added here influence the key; everything else in the request is
/// ignored, so near-duplicate requests share an entry.
#[derive(Debug, Clone)]
pub struct Fingerprint {
    task: &'static str,
    parts: Vec<String>,
}

impl Fingerprint {
    pub fn new(task: &'static str) -> Self {
        Self {
            task,
            parts: Vec::new(),
        }
    }

    pub fn field(mut self, name: &str, value: impl Display) -> Self {
        self.parts
            .push(format!("{name}={}", canonical(&value.to_string())));
        self
    }

    /// Adds the first `take` items in order.
    pub fn prefix(mut self, name: &str, items: &[String], take: usize) -> Self {
        let joined = items
            .iter()
            .take(take)
            .map(|s| canonical(s))
            .collect::<Vec<_>>()
            .join("|");
        self.parts.push(format!("{name}=[{joined}]"));
        self
    }

    /// Adds every item, sorted and de-duplicated, so ordering does not matter.
    pub fn set(mut self, name: &str, items: &[String]) -> Self {
        let mut canon: Vec<String> = items.iter().map(|s| canonical(s)).collect();
        canon.sort();
        canon.dedup();
        self.parts.push(format!("{name}={{{}}}", canon.join("|")));
        self
    }

    /// `<task>:<32 hex chars of blake3 over the canonical parts>`.
    pub fn key(&self) -> String {
        let material = self.parts.join("\n");
        let hash = blake3::hash(material.as_bytes()).to_hex();
        format!("{}:{}", self.task, &hash.as_str()[..32])
    }
}
