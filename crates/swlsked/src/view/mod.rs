//! Alternative layouts of the canonical schedule

mod columns;
mod grid;
mod jumps;
mod scatter;

use std::collections::HashMap;
use std::fmt;
use std::hash::Hash;
use std::str::FromStr;

use log::debug;
use serde::{Serialize, Serializer};

use crate::builder::ScheduleViewBuilder;
use crate::canonical::CanonicalEntry;

pub use columns::{FrequencyColumn, TimeColumn};
pub use grid::{DayGrid, DayRow, GridCell, TimeSlot};
pub use jumps::{frequency_jumps, FrequencyJump};
pub use scatter::{ScatterPlot, ScatterPoint};

/// Which layout to build
///
/// View modes have short names which are suitable for URLs
/// and command lines. Unrecognized names select the default,
/// [`ViewMode::Columns`].
///
/// ```
/// use swlsked::ViewMode;
///
/// assert_eq!(ViewMode::Grid, ViewMode::from_name("grid"));
/// assert_eq!(ViewMode::Scatter, ViewMode::from_name("freqgrid"));
/// assert_eq!(ViewMode::Scatter, ViewMode::from_name("scatter"));
/// assert_eq!(ViewMode::Columns, ViewMode::from_name("bogus"));
/// assert_eq!("freqcolumns", ViewMode::FrequencyColumns.as_str());
/// ```
#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    PartialEq,
    Eq,
    Hash,
    strum_macros::EnumIter,
    strum_macros::EnumString,
)]
#[strum(ascii_case_insensitive)]
pub enum ViewMode {
    /// Columns of entries sharing a time window and days
    #[default]
    #[strum(serialize = "columns")]
    Columns,

    /// Columns of entries sharing a frequency
    #[strum(serialize = "freqcolumns")]
    FrequencyColumns,

    /// Weekday rows × time window columns
    #[strum(serialize = "grid")]
    Grid,

    /// Frequency × start time scatter plot
    #[strum(serialize = "freqgrid", serialize = "scatter")]
    Scatter,
}

impl ViewMode {
    /// Mode for a view name
    ///
    /// Names are matched without regard to case or surrounding
    /// whitespace. Unknown names select [`ViewMode::Columns`].
    pub fn from_name(name: &str) -> ViewMode {
        ViewMode::from_str(name.trim()).unwrap_or_default()
    }

    /// Short name, like "`freqcolumns`"
    pub fn as_str(&self) -> &'static str {
        match self {
            ViewMode::Columns => "columns",
            ViewMode::FrequencyColumns => "freqcolumns",
            ViewMode::Grid => "grid",
            ViewMode::Scatter => "freqgrid",
        }
    }

    /// Human-readable name
    pub fn as_display_str(&self) -> &'static str {
        match self {
            ViewMode::Columns => "Time columns",
            ViewMode::FrequencyColumns => "Frequency columns",
            ViewMode::Grid => "Day/time grid",
            ViewMode::Scatter => "Frequency/time plot",
        }
    }
}

impl AsRef<str> for ViewMode {
    fn as_ref(&self) -> &'static str {
        self.as_str()
    }
}

impl fmt::Display for ViewMode {
    /// Printable string
    ///
    /// * The normal form is a human-readable name
    /// * The alternate form is the short name
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if f.alternate() {
            self.as_str().fmt(f)
        } else {
            self.as_display_str().fmt(f)
        }
    }
}

impl Serialize for ViewMode {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(self.as_str())
    }
}

/// One layout of the canonical schedule
///
/// Projections borrow the entries they were built from. They
/// are cheap to rebuild and should not be kept across requests.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "view", content = "data")]
pub enum ViewProjection<'a> {
    #[serde(rename = "columns")]
    Columns(Vec<TimeColumn<'a>>),

    #[serde(rename = "freqcolumns")]
    FrequencyColumns(Vec<FrequencyColumn<'a>>),

    #[serde(rename = "grid")]
    Grid(DayGrid<'a>),

    #[serde(rename = "freqgrid")]
    Scatter(ScatterPlot<'a>),
}

impl<'a> ViewProjection<'a> {
    /// The mode which produced this projection
    pub fn mode(&self) -> ViewMode {
        match self {
            ViewProjection::Columns(_) => ViewMode::Columns,
            ViewProjection::FrequencyColumns(_) => ViewMode::FrequencyColumns,
            ViewProjection::Grid(_) => ViewMode::Grid,
            ViewProjection::Scatter(_) => ViewMode::Scatter,
        }
    }
}

/// Builds layouts of the canonical schedule
///
/// Create with a [`ScheduleViewBuilder`], which carries the
/// plot geometry and jump marker configuration.
///
/// ```
/// use swlsked::{merge_entries, RawEntry, ScheduleViewBuilder, ViewMode, ViewProjection};
///
/// let entries = merge_entries(&[RawEntry::new(9410, "0600", "0700", "")]);
/// let view = ScheduleViewBuilder::new().build();
///
/// match view.project(&entries, ViewMode::Columns) {
///     ViewProjection::Columns(cols) => assert_eq!(1, cols.len()),
///     _ => unreachable!(),
/// }
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ScheduleView {
    config: ScheduleViewBuilder,
}

impl ScheduleView {
    /// Build the projection for `mode`
    pub fn project<'a>(&self, entries: &'a [CanonicalEntry], mode: ViewMode) -> ViewProjection<'a> {
        debug!("projecting {} entries as {:#}", entries.len(), mode);
        match mode {
            ViewMode::Columns => ViewProjection::Columns(self.time_columns(entries)),
            ViewMode::FrequencyColumns => {
                ViewProjection::FrequencyColumns(self.frequency_columns(entries))
            }
            ViewMode::Grid => ViewProjection::Grid(self.day_grid(entries)),
            ViewMode::Scatter => ViewProjection::Scatter(self.scatter_plot(entries)),
        }
    }

    /// Columns of entries sharing a time window and day label
    pub fn time_columns<'a>(&self, entries: &'a [CanonicalEntry]) -> Vec<TimeColumn<'a>> {
        columns::time_columns(entries)
    }

    /// Columns of entries sharing a frequency
    pub fn frequency_columns<'a>(&self, entries: &'a [CanonicalEntry]) -> Vec<FrequencyColumn<'a>> {
        columns::frequency_columns(entries)
    }

    /// Weekday × time window grid
    pub fn day_grid<'a>(&self, entries: &'a [CanonicalEntry]) -> DayGrid<'a> {
        grid::day_grid(entries)
    }

    /// Frequency × start time scatter plot
    pub fn scatter_plot<'a>(&self, entries: &'a [CanonicalEntry]) -> ScatterPlot<'a> {
        scatter::scatter_plot(entries, &self.config)
    }

    /// Frequency jump markers
    ///
    /// Uses the configured
    /// [segment count](ScheduleViewBuilder::with_jump_segments).
    pub fn frequency_jumps(&self, entries: &[CanonicalEntry]) -> Vec<FrequencyJump> {
        jumps::frequency_jumps(entries, self.config.jump_segments())
    }

    /// Configuration
    pub fn config(&self) -> &ScheduleViewBuilder {
        &self.config
    }
}

impl From<&ScheduleViewBuilder> for ScheduleView {
    fn from(config: &ScheduleViewBuilder) -> Self {
        Self { config: *config }
    }
}

/// Build the projection for `mode` with default settings
///
/// See [`ScheduleView::project()`].
pub fn project(entries: &[CanonicalEntry], mode: ViewMode) -> ViewProjection<'_> {
    ScheduleViewBuilder::default().build().project(entries, mode)
}

// Group entries by key, keeping groups in order of first appearance
fn group_ordered<'a, K, F>(entries: &'a [CanonicalEntry], mut key: F) -> Vec<(K, Vec<&'a CanonicalEntry>)>
where
    K: Hash + Eq + Clone,
    F: FnMut(&'a CanonicalEntry) -> K,
{
    let mut index: HashMap<K, usize> = HashMap::new();
    let mut groups: Vec<(K, Vec<&'a CanonicalEntry>)> = Vec::new();
    for entry in entries {
        let k = key(entry);
        match index.get(&k) {
            Some(&pos) => groups[pos].1.push(entry),
            None => {
                index.insert(k.clone(), groups.len());
                groups.push((k, vec![entry]));
            }
        }
    }
    groups
}

// True if any entry is on the air
fn any_live(entries: &[&CanonicalEntry]) -> bool {
    entries.iter().any(|e| e.is_live_now())
}
