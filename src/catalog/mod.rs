//! Country catalog wiring.
//!
//! This module wraps the JSON catalog (`countries.txt`) so the engine can load
//! a validated, read-only snapshot and derive the filter vocabulary from it.
//! Types here mirror the catalog fields; `TagIndex` offers indexed lookups for
//! callers that re-query often.

pub mod identity;
pub mod index;
pub mod model;
pub mod vocabulary;

pub use identity::{Category, Status, TagId};
pub use index::TagIndex;
pub use model::{Catalog, Record};
pub use vocabulary::{Vocabulary, extract_vocabulary};

pub use model::load_catalog_from_path;
