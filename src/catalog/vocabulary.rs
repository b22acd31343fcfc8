//! Tag vocabulary derived from a loaded catalog.
//!
//! The vocabulary is the only legal source of filter controls: every
//! (category, value) pair offered to a user must be listed here.

use crate::catalog::identity::{Category, TagId};
use crate::catalog::model::Catalog;
use std::collections::{BTreeMap, BTreeSet};

#[derive(Clone, Debug, Default, PartialEq, Eq)]
/// Distinct non-empty tag values per category, in sorted order.
pub struct Vocabulary {
    by_category: BTreeMap<Category, BTreeSet<TagId>>,
}

impl Vocabulary {
    /// Collect every tag across every record, skipping empty ids.
    pub fn extract(catalog: &Catalog) -> Self {
        let mut by_category: BTreeMap<Category, BTreeSet<TagId>> = Category::ALL
            .into_iter()
            .map(|category| (category, BTreeSet::new()))
            .collect();

        for record in catalog {
            for category in Category::ALL {
                let values = by_category.entry(category).or_default();
                values.extend(
                    record
                        .tags(category)
                        .iter()
                        .filter(|tag| !tag.is_empty())
                        .cloned(),
                );
            }
        }

        Self { by_category }
    }

    pub fn values(&self, category: Category) -> impl Iterator<Item = &TagId> {
        self.by_category.get(&category).into_iter().flatten()
    }

    pub fn contains(&self, category: Category, tag: &TagId) -> bool {
        self.by_category
            .get(&category)
            .is_some_and(|values| values.contains(tag))
    }

    /// Every (category, value) pair, categories in declaration order.
    pub fn entries(&self) -> impl Iterator<Item = (Category, &TagId)> {
        self.by_category
            .iter()
            .flat_map(|(category, values)| values.iter().map(move |tag| (*category, tag)))
    }

    /// Total number of pairs across all categories.
    pub fn len(&self) -> usize {
        self.by_category.values().map(BTreeSet::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Convenience wrapper around [`Vocabulary::extract`].
pub fn extract_vocabulary(catalog: &Catalog) -> Vocabulary {
    Vocabulary::extract(catalog)
}
