//! Display labels for tag ids (`glossary.txt`).
//!
//! Entries are either a plain label or `{ "name", "longName" }`. The short
//! name becomes the control text and the long name a tooltip, shown only when
//! it differs from the text. Ids without an entry label themselves. Status
//! controls look up their numeric code ("0", "1", "2") the same way.

use crate::catalog::{Status, TagId};
use crate::schema_loader::{ShapeKind, validate_shape};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum GlossaryEntry {
    Plain(String),
    Detailed {
        #[serde(default)]
        name: Option<String>,
        #[serde(default, rename = "longName")]
        long_name: Option<String>,
    },
}

/// Text and optional tooltip for one control.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Label {
    pub text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tooltip: Option<String>,
}

impl Label {
    fn new(text: String, long_text: String) -> Self {
        let tooltip = (long_text != text).then_some(long_text);
        Self { text, tooltip }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Glossary {
    entries: BTreeMap<String, GlossaryEntry>,
}

impl Glossary {
    pub fn from_value(value: Value) -> Result<Self> {
        validate_shape(ShapeKind::Glossary, &value)?;
        let entries = serde_json::from_value(value).context("unable to parse glossary entries")?;
        Ok(Self { entries })
    }

    pub fn from_json_str(input: &str) -> Result<Self> {
        let value: Value = serde_json::from_str(input).context("glossary is not valid JSON")?;
        Self::from_value(value)
    }

    /// Resolve the label for a raw id, falling back to the id itself.
    pub fn label(&self, id: &str) -> Label {
        self.label_or(id, id)
    }

    pub fn tag_label(&self, tag: &TagId) -> Label {
        self.label(tag.as_str())
    }

    pub fn status_label(&self, status: Status) -> Label {
        self.label_or(&status.code().to_string(), status.default_label())
    }

    fn label_or(&self, id: &str, fallback: &str) -> Label {
        match self.entries.get(id) {
            Some(GlossaryEntry::Plain(text)) if !text.is_empty() => {
                Label::new(text.clone(), text.clone())
            }
            Some(GlossaryEntry::Detailed { name, long_name }) => {
                let text = non_empty(name).unwrap_or(fallback).to_string();
                let long_text = non_empty(long_name).unwrap_or(fallback).to_string();
                Label::new(text, long_text)
            }
            _ => Label::new(fallback.to_string(), fallback.to_string()),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|text| !text.is_empty())
}

/// Read, validate and parse a glossary file.
pub fn load_glossary_from_path(path: &Path) -> Result<Glossary> {
    let data =
        fs::read_to_string(path).with_context(|| format!("opening glossary {}", path.display()))?;
    let glossary =
        Glossary::from_json_str(&data).with_context(|| format!("loading {}", path.display()))?;
    log::debug!(
        "loaded {} glossary entries from {}",
        glossary.len(),
        path.display()
    );
    Ok(glossary)
}
