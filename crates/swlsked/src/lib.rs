//! # swlsked: Shortwave Broadcast Schedules
//!
//! This crate turns raw shortwave broadcast schedule data, such
//! as the [EiBi](http://eibispace.de/) listings, into a tidy
//! schedule which is easy to browse. It can
//!
//! * merge rows which describe the same broadcast on different
//!   days into one entry;
//! * decide which broadcasts are on the air right now; and
//! * lay the schedule out by time window, by frequency, by
//!   weekday, or on a frequency × time plot.
//!
//! It also speaks just enough of the TCI radio control protocol
//! to tune a receiver to a broadcast and mark it with a spot.
//!
//! ## Example
//!
//! Raw schedule rows usually come from a
//! [snapshot](struct.ScheduleSnapshot.html) or an
//! [EiBi file](fn.parse_eibi_csv.html). You can also build them
//! by hand:
//!
//! ```
//! use chrono::{TimeZone, Utc};
//! use swlsked::{annotate_liveness, merge_entries, RawEntry};
//! use swlsked::{ScheduleViewBuilder, ViewMode, ViewProjection};
//!
//! let raw = vec![
//!     RawEntry::new(9410, "2300", "0100", "Mo-Fr")
//!         .with_itu("G")
//!         .with_station("BBC")
//!         .with_language("E")
//!         .with_target("Eu"),
//!     RawEntry::new(9410, "2300", "0100", "Sa")
//!         .with_itu("G")
//!         .with_station("BBC")
//!         .with_language("E")
//!         .with_target("Eu"),
//!     RawEntry::new(5955, "1800", "1900", "irregular").with_station("Radio Delta"),
//! ];
//!
//! // the two BBC rows become one entry
//! let mut entries = merge_entries(&raw);
//! assert_eq!(2, entries.len());
//! assert_eq!("Radio Delta", entries[0].station());
//! assert_eq!("Mon,Tue,Wed,Thu,Fri,Sat", entries[1].days());
//! assert_eq!("23:00-01:00 | Mon,Tue,Wed,Thu,Fri,Sat", entries[1].time_days_display());
//!
//! // what's on at 23:30 UTC on Saturday, 6 March 2021?
//! let now = Utc.with_ymd_and_hms(2021, 3, 6, 23, 30, 0).unwrap();
//! assert_eq!(1, annotate_liveness(&mut entries, &now));
//! assert!(entries[1].is_live_now());
//!
//! // lay the schedule out by frequency
//! let view = ScheduleViewBuilder::new().build();
//! match view.project(&entries, ViewMode::FrequencyColumns) {
//!     ViewProjection::FrequencyColumns(cols) => {
//!         assert_eq!("5.955 MHz", cols[0].frequency_display);
//!         assert!(cols[1].is_live_now);
//!     }
//!     _ => unreachable!(),
//! }
//! ```
//!
//! Merged entries carry ready-made display labels, such as a
//! [flag](struct.CanonicalEntry.html#method.flag) for the
//! transmitter's country.
//!
//! ## Days and times
//!
//! Upstream day text is free-form. This crate understands digit
//! strings, where `1` is Monday and `7` is Sunday, and two-letter
//! day names and ranges like "`Mo-Fr`" or "`Sa-Mo`." Empty text
//! or "`daily`" means every day. Day text which cannot be
//! understood, like "`irregular`," is kept as a label and never
//! restricts the days on which a broadcast is considered live.
//!
//! Times are four-digit `HHMM` UTC strings. A window whose end
//! precedes its start crosses midnight. A window whose start and
//! end are equal runs all day.
//!
//! ## Radio control
//!
//! The [`TciClient`](struct.TciClient.html) sends commands over
//! any [`Connector`](trait.Connector.html) you provide. This crate
//! does not open network connections on its own.

mod builder;
mod canonical;
mod clock;
mod days;
mod eibi;
mod entry;
mod itucodes;
mod live;
mod merge;
mod report;
mod snapshot;
mod tci;
mod view;

pub use builder::ScheduleViewBuilder;
pub use canonical::CanonicalEntry;
pub use clock::{
    format_hhmm, format_mhz, format_time_range, join_non_empty, parse_hhmm, start_sort_key,
    MINUTES_PER_DAY, UNPARSED_START,
};
pub use days::{parse_days, DayCode, DaySet};
pub use eibi::parse_eibi_csv;
pub use entry::{normalize, NormalizedEntry, RawEntry, RawFrequency};
pub use itucodes::{flag_for_origin, iso2_for_origin, iso2_to_flag, GLOBE};
pub use live::{annotate_liveness, is_live_at, matches_weekday};
pub use merge::merge_entries;
pub use report::ScheduleReport;
pub use snapshot::{ScheduleSnapshot, SnapshotError};
pub use tci::{
    mute_commands, raw_command, spot_commands, station_tag, tune_commands, Connector,
    SpotOptions, TciClient, TciError, TciProfile, TciStatus, Transport, DEFAULT_COMMAND_DELAY,
    DEFAULT_HOST, DEFAULT_PORT,
};
pub use view::{
    frequency_jumps, project, DayGrid, DayRow, FrequencyColumn, FrequencyJump, GridCell,
    ScatterPlot, ScatterPoint, ScheduleView, TimeColumn, TimeSlot, ViewMode, ViewProjection,
};
