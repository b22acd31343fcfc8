//! Data source boundary.
//!
//! A session needs two documents: the glossary (labels) and the catalog.
//! The glossary is loaded first because control labels depend on it.

use crate::catalog::{Catalog, load_catalog_from_path};
use crate::glossary::{Glossary, load_glossary_from_path};
use anyhow::Result;
use std::path::{Path, PathBuf};

pub const CATALOG_FILE: &str = "countries.txt";
pub const GLOSSARY_FILE: &str = "glossary.txt";

/// Supplies the raw inputs for a session.
pub trait DataSource {
    fn load_vocabulary_labels(&self) -> Result<Glossary>;

    fn load_catalog(&self) -> Result<Catalog>;
}

/// Reads `glossary.txt` and `countries.txt` from one directory.
#[derive(Clone, Debug)]
pub struct DirectorySource {
    root: PathBuf,
}

impl DirectorySource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn catalog_path(&self) -> PathBuf {
        self.root.join(CATALOG_FILE)
    }

    pub fn glossary_path(&self) -> PathBuf {
        self.root.join(GLOSSARY_FILE)
    }
}

impl DataSource for DirectorySource {
    fn load_vocabulary_labels(&self) -> Result<Glossary> {
        load_glossary_from_path(&self.glossary_path())
    }

    fn load_catalog(&self) -> Result<Catalog> {
        load_catalog_from_path(&self.catalog_path())
    }
}
