//! Weekday × time window grid

use std::collections::HashMap;

use serde::Serialize;
use strum::IntoEnumIterator;

use super::any_live;
use crate::canonical::CanonicalEntry;
use crate::clock::{format_time_range, start_sort_key};
use crate::days::DayCode;
use crate::live::matches_weekday;

/// Grid of broadcasts by weekday and time window
///
/// There is one [`TimeSlot`] for every distinct start and end
/// time pair, ordered by start time. Every [`DayRow`] has one
/// [`GridCell`] per time slot, in the same order, even if the
/// cell is empty.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct DayGrid<'a> {
    /// Column headings
    pub time_slots: Vec<TimeSlot<'a>>,

    /// Monday through Sunday
    pub rows: Vec<DayRow<'a>>,
}

/// A distinct time window
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct TimeSlot<'a> {
    pub time_on: &'a str,
    pub time_off: &'a str,

    /// Label, like "`23:00-01:00`"
    pub display: String,
}

impl<'a> TimeSlot<'a> {
    /// Identifier, like "`2300-0100`"
    pub fn slot_key(&self) -> String {
        slot_key(self.time_on, self.time_off)
    }
}

/// One weekday of the grid
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct DayRow<'a> {
    pub day: DayCode,

    /// Short label, like "`Mon`"
    pub day_label: &'static str,

    /// One cell per time slot
    pub cells: Vec<GridCell<'a>>,
}

/// Entries for one weekday and time window
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct GridCell<'a> {
    /// Time slot identifier, like "`2300-0100`"
    pub slot_key: String,

    /// Members, by frequency and then station
    pub entries: Vec<&'a CanonicalEntry>,

    /// True if any member is on the air
    pub is_live_now: bool,
}

pub(super) fn day_grid(entries: &[CanonicalEntry]) -> DayGrid<'_> {
    // bucket every entry under its time window
    let mut index: HashMap<(&str, &str), usize> = HashMap::new();
    let mut slots: Vec<TimeSlot<'_>> = Vec::new();
    let mut buckets: Vec<Vec<&CanonicalEntry>> = Vec::new();
    for entry in entries {
        let key = (entry.time_on(), entry.time_off());
        let pos = *index.entry(key).or_insert_with(|| {
            slots.push(TimeSlot {
                time_on: key.0,
                time_off: key.1,
                display: format_time_range(key.0, key.1),
            });
            buckets.push(Vec::new());
            slots.len() - 1
        });
        buckets[pos].push(entry);
    }

    let mut order: Vec<usize> = (0..slots.len()).collect();
    order.sort_by(|&a, &b| {
        (start_sort_key(slots[a].time_on), slots[a].time_off)
            .cmp(&(start_sort_key(slots[b].time_on), slots[b].time_off))
    });

    let rows = DayCode::iter()
        .map(|day| {
            let cells = order
                .iter()
                .map(|&pos| {
                    let mut members: Vec<&CanonicalEntry> = buckets[pos]
                        .iter()
                        .copied()
                        .filter(|e| matches_weekday(e, day))
                        .collect();
                    members.sort_by_cached_key(|e| (e.frequency_khz(), e.station_sort()));
                    GridCell {
                        slot_key: slots[pos].slot_key(),
                        is_live_now: any_live(&members),
                        entries: members,
                    }
                })
                .collect();

            DayRow {
                day,
                day_label: day.as_display_str(),
                cells,
            }
        })
        .collect();

    let time_slots = order.iter().map(|&pos| slots[pos].clone()).collect();
    DayGrid { time_slots, rows }
}

fn slot_key(time_on: &str, time_off: &str) -> String {
    format!("{}-{}", time_on, time_off)
}
