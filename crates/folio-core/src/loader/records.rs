//! Structured project and publication records.
//!
//! The records file is a JSON object shaped like
//! `{"projects": {"items": [...]}, "publications": {"items": [...]}}`.
//! Each collection and each item is decoded independently, so one bad record
//! only costs that record.

use serde::{Deserialize, Deserializer};
use serde_json::Value;

pub(crate) const NOT_AVAILABLE: &str = "N/A";

#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct ProjectRecord {
    pub name: String,
    #[serde(default, deserialize_with = "text_field")]
    pub dates: Option<String>,
    #[serde(default, deserialize_with = "text_field")]
    pub description: Option<String>,
    #[serde(default)]
    pub technologies: Vec<String>,
    #[serde(default, alias = "link")]
    pub url: Option<String>,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct PublicationRecord {
    pub name: String,
    #[serde(default, deserialize_with = "text_field")]
    pub dates: Option<String>,
    #[serde(default, deserialize_with = "text_field")]
    pub description: Option<String>,
    #[serde(default)]
    pub authors: Option<Authors>,
    #[serde(default, alias = "link")]
    pub url: Option<String>,
}

/// Publication authors appear either as one string or as a list.
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum Authors {
    One(String),
    Many(Vec<String>),
}

impl Authors {
    pub fn joined(&self) -> String {
        match self {
            Authors::One(s) => s.clone(),
            Authors::Many(list) => list.join(", "),
        }
    }
}

impl ProjectRecord {
    /// Labelled field text used as a project document body.
    pub fn body(&self) -> String {
        format!("Title: {}\n{}", self.name, self.details())
    }

    /// Every labelled field except the title.
    pub fn details(&self) -> String {
        format!(
            "Dates: {}\nDescription: {}\nTechnologies: {}",
            or_na(self.dates.as_deref()),
            or_na(self.description.as_deref()),
            if self.technologies.is_empty() {
                NOT_AVAILABLE.to_string()
            } else {
                self.technologies.join(", ")
            }
        )
    }
}

impl PublicationRecord {
    /// Labelled field text used as a publication document body.
    pub fn body(&self) -> String {
        format!("Title: {}\n{}", self.name, self.details())
    }

    pub fn details(&self) -> String {
        format!(
            "Authors: {}\nDates: {}\nDescription: {}",
            self.authors
                .as_ref()
                .map(Authors::joined)
                .filter(|s| !s.trim().is_empty())
                .unwrap_or_else(|| NOT_AVAILABLE.to_string()),
            or_na(self.dates.as_deref()),
            or_na(self.description.as_deref()),
        )
    }
}

/// Free-text fields are written by hand, so accept any JSON value: numbers
/// and booleans render as written, arrays join with `, `, null is absent.
fn text_field<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.as_ref().and_then(render_text))
}

fn render_text(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        Value::Array(items) => {
            let parts: Vec<String> = items.iter().filter_map(render_text).collect();
            (!parts.is_empty()).then(|| parts.join(", "))
        }
        other => Some(other.to_string()),
    }
}

fn or_na(value: Option<&str>) -> &str {
    match value {
        Some(v) if !v.trim().is_empty() => v,
        _ => NOT_AVAILABLE,
    }
}

/// Everything that could be decoded from one records file.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RecordSet {
    pub projects: Vec<ProjectRecord>,
    pub publications: Vec<PublicationRecord>,
    /// Human-readable descriptions of the parts that were skipped.
    pub skipped: Vec<String>,
}

impl RecordSet {
    /// Decode a records document. Fails only when `text` is not JSON at all.
    pub fn parse(text: &str) -> serde_json::Result<Self> {
        let root: Value = serde_json::from_str(text)?;
        let mut set = RecordSet::default();
        set.projects = decode_collection(&root, "projects", &mut set.skipped);
        set.publications = decode_collection(&root, "publications", &mut set.skipped);
        Ok(set)
    }
}

fn decode_collection<T>(root: &Value, name: &str, skipped: &mut Vec<String>) -> Vec<T>
where
    T: for<'de> Deserialize<'de>,
{
    let items = match root.get(name) {
        None | Some(Value::Null) => return Vec::new(),
        Some(collection) => match collection.get("items").and_then(Value::as_array) {
            Some(items) => items,
            None => {
                skipped.push(format!("{}: missing items array", name));
                return Vec::new();
            }
        },
    };

    items
        .iter()
        .enumerate()
        .filter_map(|(i, item)| match T::deserialize(item) {
            Ok(record) => Some(record),
            Err(e) => {
                skipped.push(format!("{}[{}]: {}", name, i, e));
                None
            }
        })
        .collect()
}
