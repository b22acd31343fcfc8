//! One filtering session: loaded data plus the active filter.
//!
//! Every event runs to completion: a toggle updates the filter, reflects the
//! new state on its control, re-runs the query and redraws the results.

use crate::catalog::{Catalog, Record, Status, TagIndex, Vocabulary};
use crate::filter::{FilterKey, FilterState, ToggleState};
use crate::glossary::Glossary;
use crate::presentation::{Control, Presentation, RenderSummary, render_results};
use crate::query;
use crate::source::DataSource;
use anyhow::{Context, Result};

#[derive(Debug)]
pub struct Session {
    catalog: Catalog,
    vocabulary: Vocabulary,
    index: TagIndex,
    glossary: Glossary,
    filter: FilterState,
}

impl Session {
    /// Build a session from already-loaded inputs with an empty filter.
    pub fn new(catalog: Catalog, glossary: Glossary) -> Self {
        let vocabulary = Vocabulary::extract(&catalog);
        let index = TagIndex::build(&catalog);
        Self {
            catalog,
            vocabulary,
            index,
            glossary,
            filter: FilterState::new(),
        }
    }

    /// Load labels, then the catalog. Either failure aborts the session.
    pub fn load<S: DataSource + ?Sized>(source: &S) -> Result<Self> {
        let glossary = source
            .load_vocabulary_labels()
            .context("unable to load vocabulary labels")?;
        let catalog = source.load_catalog().context("unable to load catalog")?;
        let session = Self::new(catalog, glossary);
        log::info!(
            "session ready: {} records, {} filter values",
            session.catalog.len(),
            session.vocabulary.len()
        );
        Ok(session)
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn vocabulary(&self) -> &Vocabulary {
        &self.vocabulary
    }

    pub fn filter(&self) -> &FilterState {
        &self.filter
    }

    /// One control per vocabulary entry followed by one per status code,
    /// each reflecting the current filter.
    pub fn controls(&self) -> Vec<Control> {
        let tags = self.vocabulary.entries().map(|(category, tag)| {
            let key = FilterKey::Tag(category, tag.clone());
            Control {
                label: self.glossary.tag_label(tag),
                state: self.filter.state_of(&key),
                key,
            }
        });
        let statuses = Status::ALL.into_iter().map(|status| {
            let key = FilterKey::Status(status);
            Control {
                label: self.glossary.status_label(status),
                state: self.filter.state_of(&key),
                key,
            }
        });
        tags.chain(statuses).collect()
    }

    pub fn render_controls<P: Presentation + ?Sized>(&self, presenter: &mut P) {
        for control in self.controls() {
            presenter.render_control(&control);
        }
    }

    /// Flip a criterion without redrawing anything.
    pub fn apply(&mut self, key: &FilterKey) -> ToggleState {
        let state = self.filter.toggle(key);
        log::debug!("toggled {key} -> {state:?}");
        state
    }

    /// Handle a control click: toggle, reflect, re-query, redraw.
    pub fn toggle<P: Presentation + ?Sized>(
        &mut self,
        key: &FilterKey,
        presenter: &mut P,
    ) -> ToggleState {
        let state = self.apply(key);
        presenter.update_control(key, state);
        self.refresh(presenter);
        state
    }

    /// Reset every control and draw the whole catalog.
    pub fn show_all<P: Presentation + ?Sized>(&mut self, presenter: &mut P) -> RenderSummary {
        for key in self.filter.active_keys() {
            presenter.update_control(&key, ToggleState::Off);
        }
        self.filter.clear();
        render_results(presenter, query::show_all(&self.catalog))
    }

    /// Redraw the results for the current filter.
    pub fn refresh<P: Presentation + ?Sized>(&self, presenter: &mut P) -> RenderSummary {
        render_results(presenter, self.matches())
    }

    pub fn matches(&self) -> Vec<&Record> {
        self.index.matching(&self.catalog, &self.filter)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{Category, Record};
    use crate::presentation::Placement;
    use serde_json::json;

    #[derive(Default)]
    struct Recorder {
        controls: Vec<Control>,
        updates: Vec<(FilterKey, ToggleState)>,
        clears: usize,
        placed: Vec<String>,
    }

    impl Presentation for Recorder {
        fn render_control(&mut self, control: &Control) {
            self.controls.push(control.clone());
        }

        fn update_control(&mut self, key: &FilterKey, state: ToggleState) {
            self.updates.push((key.clone(), state));
        }

        fn clear_results(&mut self) {
            self.clears += 1;
            self.placed.clear();
        }

        fn place_record(&mut self, record: &Record) -> Placement {
            self.placed.push(record.name.clone());
            Placement::Placed
        }
    }

    fn session() -> Session {
        let catalog = Catalog::from_records(vec![
            Record::new("X", Status::InUse).with_tags(Category::Treaties, ["T1"]),
            Record::new("Y", Status::Abolished)
                .with_tags(Category::Treaties, ["T1", "T2"])
                .with_tags(Category::Memberships, ["M1"]),
        ]);
        let glossary = Glossary::from_value(json!({"T1": {"name": "One", "longName": "Treaty One"}}))
            .expect("glossary");
        Session::new(catalog, glossary)
    }

    #[test]
    fn controls_cover_vocabulary_and_statuses() {
        let session = session();
        let mut recorder = Recorder::default();
        session.render_controls(&mut recorder);

        let keys: Vec<String> = recorder.controls.iter().map(|c| c.key.to_string()).collect();
        assert_eq!(
            keys,
            vec![
                "treaties=T1",
                "treaties=T2",
                "memberships=M1",
                "deathPenalty=0",
                "deathPenalty=1",
                "deathPenalty=2"
            ]
        );
        assert_eq!(recorder.controls[0].label.text, "One");
        assert_eq!(recorder.controls[0].label.tooltip.as_deref(), Some("Treaty One"));
        assert!(recorder.controls.iter().all(|c| c.state == ToggleState::Off));
    }

    #[test]
    fn toggle_updates_control_and_redraws() {
        let mut session = session();
        let mut recorder = Recorder::default();
        let key = FilterKey::tag(Category::Memberships, "M1");

        assert_eq!(session.toggle(&key, &mut recorder), ToggleState::On);
        assert_eq!(recorder.updates, vec![(key.clone(), ToggleState::On)]);
        assert_eq!(recorder.placed, vec!["Y"]);
        assert_eq!(recorder.clears, 1);

        let control = session
            .controls()
            .into_iter()
            .find(|c| c.key == key)
            .expect("control exists");
        assert_eq!(control.state, ToggleState::On);
    }

    #[test]
    fn show_all_resets_filter_and_controls() {
        let mut session = session();
        let mut recorder = Recorder::default();
        session.toggle(&FilterKey::tag(Category::Treaties, "T1"), &mut recorder);
        session.toggle(&FilterKey::Status(Status::Abolished), &mut recorder);
        assert_eq!(recorder.placed, vec!["Y"]);

        let summary = session.show_all(&mut recorder);
        assert_eq!(summary.placed, 2);
        assert!(session.filter().is_empty());
        assert_eq!(recorder.placed, vec!["X", "Y"]);
        let resets: Vec<&(FilterKey, ToggleState)> = recorder
            .updates
            .iter()
            .filter(|(_, state)| *state == ToggleState::Off)
            .collect();
        assert_eq!(resets.len(), 2);
    }

    struct FailingSource;

    impl DataSource for FailingSource {
        fn load_vocabulary_labels(&self) -> Result<Glossary> {
            Ok(Glossary::default())
        }

        fn load_catalog(&self) -> Result<Catalog> {
            anyhow::bail!("network unreachable")
        }
    }

    #[test]
    fn load_failure_is_surfaced() {
        let err = Session::load(&FailingSource).expect_err("catalog load fails");
        let rendered = format!("{err:#}");
        assert!(rendered.contains("unable to load catalog"));
        assert!(rendered.contains("network unreachable"));
    }
}
