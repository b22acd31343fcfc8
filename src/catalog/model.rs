//! Deserializable representation of the country catalog (`countries.txt`).
//!
//! A catalog is either a JSON array of records or a JSON object whose values
//! are records. Object order is kept, and the key stands in for a missing
//! `name`. Everything except `deathPenalty` is optional: absent or `null` tag
//! lists become empty sets, and coordinates are carried through untouched for
//! the presentation layer to interpret.

use crate::catalog::identity::{Category, Status, TagId};
use crate::schema_loader::{ShapeKind, validate_shape};
use anyhow::{Context, Result, bail};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::collections::BTreeSet;
use std::fs;
use std::path::Path;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
/// One country entry.
pub struct Record {
    #[serde(default)]
    pub name: String,
    #[serde(default, skip_serializing_if = "Value::is_null")]
    pub lat: Value,
    #[serde(default, skip_serializing_if = "Value::is_null")]
    pub lng: Value,
    #[serde(default, deserialize_with = "tag_set")]
    pub treaties: BTreeSet<TagId>,
    #[serde(default, deserialize_with = "tag_set")]
    pub memberships: BTreeSet<TagId>,
    #[serde(default, deserialize_with = "tag_set")]
    pub situations: BTreeSet<TagId>,
    #[serde(rename = "deathPenalty")]
    pub status: Status,
}

impl Record {
    /// Build a record with no coordinates; mostly useful in tests and fixtures.
    pub fn new(name: impl Into<String>, status: Status) -> Self {
        Self {
            name: name.into(),
            lat: Value::Null,
            lng: Value::Null,
            treaties: BTreeSet::new(),
            memberships: BTreeSet::new(),
            situations: BTreeSet::new(),
            status,
        }
    }

    /// Add tags to one category, returning the record for chaining.
    pub fn with_tags<I, T>(mut self, category: Category, tags: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<TagId>,
    {
        self.tags_mut(category)
            .extend(tags.into_iter().map(Into::into));
        self
    }

    pub fn with_coordinates(mut self, lat: f64, lng: f64) -> Self {
        self.lat = Value::from(lat);
        self.lng = Value::from(lng);
        self
    }

    pub fn tags(&self, category: Category) -> &BTreeSet<TagId> {
        match category {
            Category::Treaties => &self.treaties,
            Category::Memberships => &self.memberships,
            Category::Situations => &self.situations,
        }
    }

    fn tags_mut(&mut self, category: Category) -> &mut BTreeSet<TagId> {
        match category {
            Category::Treaties => &mut self.treaties,
            Category::Memberships => &mut self.memberships,
            Category::Situations => &mut self.situations,
        }
    }
}

fn tag_set<'de, D>(deserializer: D) -> Result<BTreeSet<TagId>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<Vec<Option<String>>> = Option::deserialize(deserializer)?;
    Ok(raw
        .unwrap_or_default()
        .into_iter()
        .flatten()
        .map(TagId)
        .collect())
}

#[derive(Clone, Debug, Default, PartialEq)]
/// Ordered, read-only sequence of records.
///
/// There is no mutating API; a reload builds a fresh catalog.
pub struct Catalog {
    records: Vec<Record>,
}

impl Catalog {
    pub fn from_records(records: Vec<Record>) -> Self {
        Self { records }
    }

    /// Validate and convert an already-parsed catalog document.
    pub fn from_value(value: Value) -> Result<Self> {
        validate_shape(ShapeKind::Catalog, &value)?;
        let records = match value {
            Value::Array(items) => items
                .into_iter()
                .enumerate()
                .map(|(idx, item)| {
                    serde_json::from_value::<Record>(item)
                        .with_context(|| format!("unable to parse catalog record {idx}"))
                })
                .collect::<Result<Vec<_>>>()?,
            Value::Object(entries) => entries
                .into_iter()
                .map(|(key, mut item)| {
                    if let Value::Object(fields) = &mut item {
                        if !fields.contains_key("name") {
                            fields.insert("name".to_string(), Value::String(key.clone()));
                        }
                    }
                    serde_json::from_value::<Record>(item)
                        .with_context(|| format!("unable to parse catalog record '{key}'"))
                })
                .collect::<Result<Vec<_>>>()?,
            _ => bail!("unsupported catalog JSON; expected array or object"),
        };
        Ok(Self { records })
    }

    pub fn from_json_str(input: &str) -> Result<Self> {
        let value: Value = serde_json::from_str(input).context("catalog is not valid JSON")?;
        Self::from_value(value)
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Record> {
        self.records.iter()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl<'a> IntoIterator for &'a Catalog {
    type Item = &'a Record;
    type IntoIter = std::slice::Iter<'a, Record>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}

/// Read, validate and parse a catalog file.
///
/// Nothing is returned unless every record parses; callers never see a
/// partial catalog.
pub fn load_catalog_from_path(path: &Path) -> Result<Catalog> {
    let data =
        fs::read_to_string(path).with_context(|| format!("opening catalog {}", path.display()))?;
    let catalog =
        Catalog::from_json_str(&data).with_context(|| format!("loading {}", path.display()))?;
    log::debug!(
        "loaded {} catalog records from {}",
        catalog.len(),
        path.display()
    );
    Ok(catalog)
}
