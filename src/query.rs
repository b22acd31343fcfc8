//! Matching records against the active filter.
//!
//! Within one tag category the selected values are conjunctive: a record must
//! carry every one of them. Categories combine with AND. Status codes are the
//! exception: selected codes are alternatives, so a record qualifies when its
//! status is any of them. An empty collection imposes no constraint. Results
//! are always a subsequence of the catalog in catalog order.

use crate::catalog::{Catalog, Category, Record};
use crate::filter::FilterState;

/// Records satisfying every active criterion, in catalog order.
pub fn match_records<'a>(catalog: &'a Catalog, filter: &FilterState) -> Vec<&'a Record> {
    if filter.is_empty() {
        return show_all(catalog);
    }
    catalog
        .iter()
        .filter(|record| record_matches(record, filter))
        .collect()
}

/// The reset path: every record, unfiltered, in catalog order.
pub fn show_all(catalog: &Catalog) -> Vec<&Record> {
    catalog.iter().collect()
}

pub fn record_matches(record: &Record, filter: &FilterState) -> bool {
    Category::ALL
        .into_iter()
        .all(|category| qualifies_on(record, filter, category))
        && qualifies_on_status(record, filter)
}

fn qualifies_on(record: &Record, filter: &FilterState, category: Category) -> bool {
    filter.active(category).is_subset(record.tags(category))
}

fn qualifies_on_status(record: &Record, filter: &FilterState) -> bool {
    let statuses = filter.active_statuses();
    statuses.is_empty() || statuses.contains(&record.status)
}
