//! Active-filter state machine.
//!
//! Each (category, value) pair and each status code is independently on or
//! off; only the active ones are stored. Collections are sets, so toggling a
//! value on twice can never leave a stale duplicate behind after it is toggled
//! off again. The state never talks to the catalog or presentation: callers
//! use the returned [`ToggleState`] to update their controls and re-query.

use crate::catalog::{Category, Status, TagId};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

/// One filterable criterion: a tag within a category, or a status code.
#[derive(Clone, Debug, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub enum FilterKey {
    Tag(Category, TagId),
    Status(Status),
}

impl FilterKey {
    pub fn tag(category: Category, tag: impl Into<TagId>) -> Self {
        FilterKey::Tag(category, tag.into())
    }

    /// Group name used in control output (`treaties`, ..., `deathPenalty`).
    pub fn group(&self) -> &'static str {
        match self {
            FilterKey::Tag(category, _) => category.as_str(),
            FilterKey::Status(_) => "deathPenalty",
        }
    }

    /// The raw value carried by the control (tag id or status code).
    pub fn value(&self) -> String {
        match self {
            FilterKey::Tag(_, tag) => tag.0.clone(),
            FilterKey::Status(status) => status.code().to_string(),
        }
    }
}

impl fmt::Display for FilterKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}={}", self.group(), self.value())
    }
}

/// Binary state of a criterion after a toggle.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ToggleState {
    On,
    Off,
}

impl ToggleState {
    pub fn is_on(self) -> bool {
        matches!(self, ToggleState::On)
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
/// Currently-active criteria.
pub struct FilterState {
    treaties: BTreeSet<TagId>,
    memberships: BTreeSet<TagId>,
    situations: BTreeSet<TagId>,
    statuses: BTreeSet<Status>,
}

impl FilterState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Flip one criterion and report its new state.
    ///
    /// Unknown tag values are accepted as-is; offering only vocabulary values
    /// is the caller's job.
    pub fn toggle(&mut self, key: &FilterKey) -> ToggleState {
        let now_active = match key {
            FilterKey::Tag(category, tag) => flip(self.active_mut(*category), tag),
            FilterKey::Status(status) => flip(&mut self.statuses, status),
        };
        if now_active {
            ToggleState::On
        } else {
            ToggleState::Off
        }
    }

    pub fn toggle_tag(&mut self, category: Category, tag: impl Into<TagId>) -> ToggleState {
        self.toggle(&FilterKey::Tag(category, tag.into()))
    }

    pub fn toggle_status(&mut self, status: Status) -> ToggleState {
        self.toggle(&FilterKey::Status(status))
    }

    /// Drop every active criterion ("show all").
    pub fn clear(&mut self) {
        self.treaties.clear();
        self.memberships.clear();
        self.situations.clear();
        self.statuses.clear();
    }

    pub fn is_active(&self, key: &FilterKey) -> bool {
        match key {
            FilterKey::Tag(category, tag) => self.active(*category).contains(tag),
            FilterKey::Status(status) => self.statuses.contains(status),
        }
    }

    /// State a control bound to `key` should display.
    pub fn state_of(&self, key: &FilterKey) -> ToggleState {
        if self.is_active(key) {
            ToggleState::On
        } else {
            ToggleState::Off
        }
    }

    pub fn is_empty(&self) -> bool {
        self.treaties.is_empty()
            && self.memberships.is_empty()
            && self.situations.is_empty()
            && self.statuses.is_empty()
    }

    pub fn active(&self, category: Category) -> &BTreeSet<TagId> {
        match category {
            Category::Treaties => &self.treaties,
            Category::Memberships => &self.memberships,
            Category::Situations => &self.situations,
        }
    }

    pub fn active_statuses(&self) -> &BTreeSet<Status> {
        &self.statuses
    }

    /// Every active criterion, tags first in category order, then statuses.
    pub fn active_keys(&self) -> Vec<FilterKey> {
        let tags = Category::ALL.into_iter().flat_map(|category| {
            self.active(category)
                .iter()
                .map(move |tag| FilterKey::Tag(category, tag.clone()))
        });
        let statuses = self.statuses.iter().copied().map(FilterKey::Status);
        tags.chain(statuses).collect()
    }

    fn active_mut(&mut self, category: Category) -> &mut BTreeSet<TagId> {
        match category {
            Category::Treaties => &mut self.treaties,
            Category::Memberships => &mut self.memberships,
            Category::Situations => &mut self.situations,
        }
    }
}

// Returns true when the value is active afterwards.
fn flip<T: Ord + Clone>(set: &mut BTreeSet<T>, value: &T) -> bool {
    if set.remove(value) {
        false
    } else {
        set.insert(value.clone());
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn toggle_reports_new_state() {
        let mut filter = FilterState::new();
        assert_eq!(filter.toggle_tag(Category::Treaties, "T1"), ToggleState::On);
        assert!(filter.is_active(&FilterKey::tag(Category::Treaties, "T1")));
        assert_eq!(filter.toggle_tag(Category::Treaties, "T1"), ToggleState::Off);
        assert!(!filter.is_active(&FilterKey::tag(Category::Treaties, "T1")));
    }

    #[test]
    fn toggle_twice_restores_prior_state() {
        let mut filter = FilterState::new();
        filter.toggle_tag(Category::Memberships, "M1");
        filter.toggle_status(Status::InUse);
        let before = filter.clone();

        let keys = [
            FilterKey::tag(Category::Memberships, "M1"),
            FilterKey::tag(Category::Situations, "S9"),
            FilterKey::Status(Status::Abolished),
            FilterKey::Status(Status::InUse),
        ];
        for key in &keys {
            filter.toggle(key);
            filter.toggle(key);
            assert_eq!(filter, before, "double toggle of {key} changed state");
        }
    }

    #[test]
    fn categories_are_independent() {
        let mut filter = FilterState::new();
        filter.toggle_tag(Category::Treaties, "X");
        assert!(!filter.is_active(&FilterKey::tag(Category::Memberships, "X")));
        assert_eq!(filter.toggle_tag(Category::Memberships, "X"), ToggleState::On);
        assert_eq!(filter.active(Category::Treaties).len(), 1);
        assert_eq!(filter.active(Category::Memberships).len(), 1);
    }

    #[test]
    fn clear_empties_everything() {
        let mut filter = FilterState::new();
        filter.toggle_tag(Category::Treaties, "T1");
        filter.toggle_tag(Category::Situations, "S1");
        filter.toggle_status(Status::DeFactoAbolished);
        assert!(!filter.is_empty());
        assert_eq!(filter.active_keys().len(), 3);

        filter.clear();
        assert!(filter.is_empty());
        assert_eq!(filter, FilterState::default());
        assert_eq!(
            filter.state_of(&FilterKey::Status(Status::DeFactoAbolished)),
            ToggleState::Off
        );
    }

    #[test]
    fn key_display_names_group_and_value() {
        assert_eq!(
            FilterKey::tag(Category::Situations, "war").to_string(),
            "situations=war"
        );
        assert_eq!(FilterKey::Status(Status::InUse).to_string(), "deathPenalty=2");
        assert_eq!(serde_json::to_string(&ToggleState::On).unwrap(), "\"on\"");
    }
}
