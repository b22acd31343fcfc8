//! Inverted index over a catalog: tag -> record positions.
//!
//! Positions are stored in ascending catalog order, so matching reduces to
//! intersecting (and, for statuses, merging) sorted lists and the result keeps
//! catalog order for free. Observable results are identical to
//! [`crate::query::match_records`].

use crate::catalog::{Catalog, Category, Record, Status, TagId};
use crate::filter::FilterState;
use crate::query;
use std::collections::{BTreeMap, BTreeSet};

#[derive(Clone, Debug, Default)]
/// Positions of records per tag and per status.
pub struct TagIndex {
    record_count: usize,
    by_tag: BTreeMap<(Category, TagId), Vec<usize>>,
    by_status: BTreeMap<Status, Vec<usize>>,
}

impl TagIndex {
    pub fn build(catalog: &Catalog) -> Self {
        let mut index = TagIndex {
            record_count: catalog.len(),
            ..Default::default()
        };
        for (position, record) in catalog.iter().enumerate() {
            for category in Category::ALL {
                for tag in record.tags(category) {
                    index
                        .by_tag
                        .entry((category, tag.clone()))
                        .or_default()
                        .push(position);
                }
            }
            index
                .by_status
                .entry(record.status)
                .or_default()
                .push(position);
        }
        index
    }

    /// Catalog positions carrying `tag` in `category`, ascending.
    pub fn positions(&self, category: Category, tag: &TagId) -> &[usize] {
        self.by_tag
            .get(&(category, tag.clone()))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Same contract as [`query::match_records`], answered from the index.
    ///
    /// `catalog` must be the catalog this index was built from; positions that
    /// fall outside it are ignored.
    pub fn matching<'a>(&self, catalog: &'a Catalog, filter: &FilterState) -> Vec<&'a Record> {
        if filter.is_empty() {
            return query::show_all(catalog);
        }
        debug_assert_eq!(catalog.len(), self.record_count, "index built from another catalog");

        let mut candidates: Option<Vec<usize>> = None;
        for category in Category::ALL {
            for tag in filter.active(category) {
                let postings = self.positions(category, tag);
                candidates = Some(match candidates {
                    Some(current) => intersect_sorted(&current, postings),
                    None => postings.to_vec(),
                });
            }
        }

        let statuses = filter.active_statuses();
        if !statuses.is_empty() {
            let allowed: Vec<usize> = statuses
                .iter()
                .filter_map(|status| self.by_status.get(status))
                .flatten()
                .copied()
                .collect::<BTreeSet<usize>>()
                .into_iter()
                .collect();
            candidates = Some(match candidates {
                Some(current) => intersect_sorted(&current, &allowed),
                None => allowed,
            });
        }

        candidates
            .unwrap_or_default()
            .into_iter()
            .filter_map(|position| catalog.records().get(position))
            .collect()
    }
}

fn intersect_sorted(left: &[usize], right: &[usize]) -> Vec<usize> {
    let mut out = Vec::with_capacity(left.len().min(right.len()));
    let (mut i, mut j) = (0, 0);
    while i < left.len() && j < right.len() {
        match left[i].cmp(&right[j]) {
            std::cmp::Ordering::Less => i += 1,
            std::cmp::Ordering::Greater => j += 1,
            std::cmp::Ordering::Equal => {
                out.push(left[i]);
                i += 1;
                j += 1;
            }
        }
    }
    out
}
