//! Presentation boundary: controls and result placement.
//!
//! Implementations only reflect engine state. Controls are rebuilt from the
//! [`FilterState`](crate::filter::FilterState), never the other way around.
//! Placing a record yields an explicit [`Placement`]; a skipped record never
//! stops the rest of the result set from being drawn.

use crate::catalog::Record;
use crate::filter::{FilterKey, ToggleState};
use crate::glossary::Label;
use serde::Serialize;
use serde_json::{Value, json};
use std::io::{self, Write};

/// A toggle bound to exactly one criterion.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Control {
    pub key: FilterKey,
    pub label: Label,
    pub state: ToggleState,
}

impl Control {
    pub fn to_json(&self) -> Value {
        let mut value = json!({
            "group": self.key.group(),
            "value": self.key.value(),
            "label": self.label.text,
            "state": self.state,
        });
        if let Some(tooltip) = &self.label.tooltip {
            value["tooltip"] = Value::String(tooltip.clone());
        }
        value
    }
}

/// Why a record could not be placed.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SkipReason {
    MissingCoordinates,
    InvalidCoordinates,
    OutputFailed,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Placement {
    Placed,
    Skipped(SkipReason),
}

/// Parsed marker position.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct Coordinates {
    pub lat: f64,
    pub lng: f64,
}

impl Coordinates {
    /// Interpret a record's opaque `lat`/`lng` fields.
    ///
    /// Numbers and numeric strings are accepted; values must be finite and
    /// within the usual latitude/longitude ranges.
    pub fn of(record: &Record) -> Result<Self, SkipReason> {
        if record.lat.is_null() || record.lng.is_null() {
            return Err(SkipReason::MissingCoordinates);
        }
        let lat = coordinate(&record.lat).ok_or(SkipReason::InvalidCoordinates)?;
        let lng = coordinate(&record.lng).ok_or(SkipReason::InvalidCoordinates)?;
        if !(-90.0..=90.0).contains(&lat) || !(-180.0..=180.0).contains(&lng) {
            return Err(SkipReason::InvalidCoordinates);
        }
        Ok(Self { lat, lng })
    }
}

fn coordinate(value: &Value) -> Option<f64> {
    let parsed = match value {
        Value::Number(number) => number.as_f64(),
        Value::String(text) => text.trim().parse::<f64>().ok(),
        _ => None,
    }?;
    parsed.is_finite().then_some(parsed)
}

/// Outside collaborator that draws controls and results.
pub trait Presentation {
    /// Called once per control after load.
    fn render_control(&mut self, control: &Control);

    /// Reflect a state change on an already-rendered control.
    fn update_control(&mut self, _key: &FilterKey, _state: ToggleState) {}

    fn clear_results(&mut self);

    fn place_record(&mut self, record: &Record) -> Placement;
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
/// Outcome of drawing one result set.
pub struct RenderSummary {
    pub placed: usize,
    pub skipped: usize,
}

/// Clear the results and place each record independently.
pub fn render_results<'a, P, I>(presenter: &mut P, records: I) -> RenderSummary
where
    P: Presentation + ?Sized,
    I: IntoIterator<Item = &'a Record>,
{
    presenter.clear_results();
    let mut summary = RenderSummary::default();
    for record in records {
        match presenter.place_record(record) {
            Placement::Placed => summary.placed += 1,
            Placement::Skipped(reason) => {
                log::debug!("skipped placing '{}': {:?}", record.name, reason);
                summary.skipped += 1;
            }
        }
    }
    summary
}

/// Writes controls and placed records as one JSON object per line.
///
/// Write failures are remembered rather than raised so placement stays
/// independent per record; [`JsonLinesPresenter::finish`] reports the first.
pub struct JsonLinesPresenter<W: Write> {
    out: W,
    error: Option<io::Error>,
}

impl<W: Write> JsonLinesPresenter<W> {
    pub fn new(out: W) -> Self {
        Self { out, error: None }
    }

    fn write_line(&mut self, value: &Value) -> bool {
        if self.error.is_some() {
            return false;
        }
        let result = serde_json::to_writer(&mut self.out, value)
            .map_err(io::Error::from)
            .and_then(|_| self.out.write_all(b"\n"));
        match result {
            Ok(()) => true,
            Err(err) => {
                self.error = Some(err);
                false
            }
        }
    }

    /// Flush the writer and hand it back.
    pub fn finish(mut self) -> io::Result<W> {
        if let Some(err) = self.error.take() {
            return Err(err);
        }
        self.out.flush()?;
        Ok(self.out)
    }
}

impl<W: Write> Presentation for JsonLinesPresenter<W> {
    fn render_control(&mut self, control: &Control) {
        self.write_line(&control.to_json());
    }

    fn clear_results(&mut self) {}

    fn place_record(&mut self, record: &Record) -> Placement {
        let coordinates = match Coordinates::of(record) {
            Ok(coordinates) => coordinates,
            Err(reason) => return Placement::Skipped(reason),
        };
        let line = json!({
            "name": record.name,
            "lat": coordinates.lat,
            "lng": coordinates.lng,
            "treaties": record.treaties,
            "memberships": record.memberships,
            "situations": record.situations,
            "deathPenalty": record.status,
        });
        if self.write_line(&line) {
            Placement::Placed
        } else {
            Placement::Skipped(SkipReason::OutputFailed)
        }
    }
}
