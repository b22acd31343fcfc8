//! Shared library for the legalmap filter engine.
//!
//! The crate exposes the catalog model (countries tagged with treaties,
//! memberships and situations plus a death-penalty status), the toggle-driven
//! filter state, and the query engine that reports which countries satisfy
//! the active filter. Loading and drawing sit behind the `DataSource` and
//! `Presentation` traits; the `legalmap-query` binary wires both to the
//! filesystem and stdout.

use anyhow::{Result, bail};
use std::{
    env, fs,
    path::{Path, PathBuf},
};

pub mod catalog;
pub mod filter;
pub mod glossary;
pub mod presentation;
pub mod query;
pub mod session;
pub mod source;

mod schema_loader;

pub use catalog::{
    Catalog, Category, Record, Status, TagId, TagIndex, Vocabulary, extract_vocabulary,
    load_catalog_from_path,
};
pub use filter::{FilterKey, FilterState, ToggleState};
pub use glossary::{Glossary, GlossaryEntry, Label, load_glossary_from_path};
pub use presentation::{
    Control, Coordinates, JsonLinesPresenter, Placement, Presentation, RenderSummary, SkipReason,
    render_results,
};
pub use query::{match_records, record_matches, show_all};
pub use session::Session;
pub use source::{CATALOG_FILE, DataSource, DirectorySource, GLOSSARY_FILE};

/// Returns true when `candidate` holds both data files.
fn is_data_root(candidate: &Path) -> bool {
    candidate.join(CATALOG_FILE).is_file() && candidate.join(GLOSSARY_FILE).is_file()
}

fn data_root_from_hint(hint: &str) -> Option<PathBuf> {
    if hint.is_empty() {
        return None;
    }
    let hint_path = PathBuf::from(hint);
    if !is_data_root(&hint_path) {
        return None;
    }
    fs::canonicalize(hint_path).ok()
}

/// Locate the directory holding `countries.txt` and `glossary.txt`.
///
/// Search order: an explicit path (which must be valid), then
/// `LEGALMAP_ROOT`, then the `data/` directory recorded at build time.
pub fn find_data_root(explicit: Option<&Path>) -> Result<PathBuf> {
    if let Some(path) = explicit {
        if !is_data_root(path) {
            bail!(
                "{} does not contain {CATALOG_FILE} and {GLOSSARY_FILE}",
                path.display()
            );
        }
        return Ok(fs::canonicalize(path).unwrap_or_else(|_| path.to_path_buf()));
    }

    if let Ok(env_root) = env::var("LEGALMAP_ROOT") {
        if let Some(root) = data_root_from_hint(&env_root) {
            return Ok(root);
        }
        log::debug!("ignoring LEGALMAP_ROOT={env_root}: data files not found");
    }

    if let Some(hint) = option_env!("LEGALMAP_ROOT_HINT") {
        if let Some(root) = data_root_from_hint(hint) {
            return Ok(root);
        }
    }

    bail!("Unable to locate legalmap data. Pass --data-dir or set LEGALMAP_ROOT.");
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn explicit_root_must_hold_both_files() -> Result<()> {
        let dir = TempDir::new()?;
        fs::write(dir.path().join(CATALOG_FILE), "[]")?;
        let err = find_data_root(Some(dir.path())).expect_err("glossary missing");
        assert!(err.to_string().contains(GLOSSARY_FILE));

        fs::write(dir.path().join(GLOSSARY_FILE), "{}")?;
        let root = find_data_root(Some(dir.path()))?;
        assert_eq!(root, fs::canonicalize(dir.path())?);
        Ok(())
    }

    #[test]
    fn empty_hint_is_ignored() {
        assert!(data_root_from_hint("").is_none());
        assert!(data_root_from_hint("/nonexistent/legalmap").is_none());
    }
}
