//! Everything needed to present one view of a schedule

use std::collections::HashSet;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::canonical::CanonicalEntry;
use crate::snapshot::ScheduleSnapshot;
use crate::view::{FrequencyJump, ScheduleView, ViewMode, ViewProjection};

/// A schedule, ready to present
///
/// A report bundles the merged schedule with the projection for
/// one [`ViewMode`], the frequency jump markers, and summary
/// counts. Only the selected view is built.
///
/// ```
/// use chrono::{TimeZone, Utc};
/// use swlsked::{annotate_liveness, merge_entries, RawEntry, ScheduleReport};
/// use swlsked::{ScheduleSnapshot, ScheduleViewBuilder, ViewMode};
///
/// let snapshot = ScheduleSnapshot::new(vec![
///     RawEntry::new(9410, "0600", "0700", "mo"),
///     RawEntry::new(9410, "0600", "0700", "tu"),
/// ]);
/// let now = Utc.with_ymd_and_hms(2021, 3, 1, 6, 30, 0).unwrap();
/// let mut entries = merge_entries(&snapshot.entries);
/// annotate_liveness(&mut entries, &now);
///
/// let view = ScheduleViewBuilder::new().build();
/// let report = ScheduleReport::new(&view, &snapshot, &entries, &now, ViewMode::Grid);
/// assert_eq!(2, report.raw_count);
/// assert_eq!(1, report.count);
/// assert_eq!(1, report.live_count);
/// assert_eq!("06:30", report.now_utc_hhmm);
/// ```
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ScheduleReport<'a> {
    /// Name of the upstream file, if known
    pub source_file: Option<&'a str>,

    /// Fetch time, as given
    pub fetched_at_utc: Option<&'a str>,

    /// Fetch time, like "`2025-06-01 12:05 UTC`"
    pub fetched_at_display: Option<String>,

    /// Number of raw schedule rows
    pub raw_count: usize,

    /// Number of merged entries
    pub count: usize,

    /// Number of merged entries on the air
    pub live_count: usize,

    /// Evaluation time, `HH:MM` UTC
    pub now_utc_hhmm: String,

    pub view_mode: ViewMode,

    /// The merged schedule
    pub entries: &'a [CanonicalEntry],

    /// Layout for `view_mode`
    pub projection: ViewProjection<'a>,

    pub freq_jumps: Vec<FrequencyJump>,

    /// Time columns in columns mode, otherwise the number of
    /// distinct time windows
    pub column_count: usize,

    /// Distinct frequencies
    pub freq_column_count: usize,

    /// Distinct time windows
    pub time_slot_count: usize,

    /// Distinct frequencies
    pub freq_slot_count: usize,
}

impl<'a> ScheduleReport<'a> {
    /// Build a report
    ///
    /// The `entries` should already be
    /// [merged](crate::merge_entries) from the `snapshot` and
    /// [annotated](crate::annotate_liveness) at `now`.
    pub fn new(
        view: &ScheduleView,
        snapshot: &'a ScheduleSnapshot,
        entries: &'a [CanonicalEntry],
        now: &DateTime<Utc>,
        mode: ViewMode,
    ) -> Self {
        let time_slots: HashSet<(&str, &str)> =
            entries.iter().map(|e| (e.time_on(), e.time_off())).collect();
        let freq_slots: HashSet<u32> = entries.iter().map(|e| e.frequency_khz()).collect();

        let projection = view.project(entries, mode);
        let column_count = match &projection {
            ViewProjection::Columns(cols) => cols.len(),
            _ => time_slots.len(),
        };

        Self {
            source_file: snapshot.source_file.as_deref(),
            fetched_at_utc: snapshot.fetched_at_utc.as_deref(),
            fetched_at_display: snapshot.fetched_at_display(),
            raw_count: snapshot.entries.len(),
            count: entries.len(),
            live_count: entries.iter().filter(|e| e.is_live_now()).count(),
            now_utc_hhmm: now.format("%H:%M").to_string(),
            view_mode: mode,
            entries,
            projection,
            freq_jumps: view.frequency_jumps(entries),
            column_count,
            freq_column_count: freq_slots.len(),
            time_slot_count: time_slots.len(),
            freq_slot_count: freq_slots.len(),
        }
    }
}
