//! Column layouts: by time window, and by frequency

use serde::Serialize;

use super::{any_live, group_ordered};
use crate::canonical::CanonicalEntry;
use crate::clock::{format_mhz, format_time_range, join_non_empty, start_sort_key};

/// Entries sharing a time window and day label
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct TimeColumn<'a> {
    /// Start time, `HHMM`
    pub time_on: &'a str,

    /// End time, `HHMM`
    pub time_off: &'a str,

    /// Day label of every member
    pub days: &'a str,

    /// Time range label, like "`23:00-01:00`"
    pub time_display: String,

    /// Time range and days, like "`23:00-01:00 | Mon,Wed`"
    pub time_days_display: String,

    /// Members, by frequency and then station
    pub entries: Vec<&'a CanonicalEntry>,

    /// True if any member is on the air
    pub is_live_now: bool,
}

/// Entries sharing a frequency
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct FrequencyColumn<'a> {
    /// Frequency, in kHz
    pub frequency_khz: u32,

    /// Frequency label, like "`9.410 MHz`"
    pub frequency_display: String,

    /// Members, by start time, end time, and station
    pub entries: Vec<&'a CanonicalEntry>,

    /// True if any member is on the air
    pub is_live_now: bool,
}

pub(super) fn time_columns(entries: &[CanonicalEntry]) -> Vec<TimeColumn<'_>> {
    let groups = group_ordered(entries, |e| (e.time_on(), e.time_off(), e.days()));

    let mut out: Vec<TimeColumn<'_>> = groups
        .into_iter()
        .map(|((time_on, time_off, days), mut members)| {
            members.sort_by_cached_key(|e| (e.frequency_khz(), e.station_sort()));
            let time_display = format_time_range(time_on, time_off);
            let time_days_display = join_non_empty(&time_display, days, " | ");
            TimeColumn {
                time_on,
                time_off,
                days,
                time_display,
                time_days_display,
                is_live_now: any_live(&members),
                entries: members,
            }
        })
        .collect();

    out.sort_by(|a, b| {
        (start_sort_key(a.time_on), a.time_off, a.days).cmp(&(
            start_sort_key(b.time_on),
            b.time_off,
            b.days,
        ))
    });
    out
}

pub(super) fn frequency_columns(entries: &[CanonicalEntry]) -> Vec<FrequencyColumn<'_>> {
    let groups = group_ordered(entries, |e| e.frequency_khz());

    let mut out: Vec<FrequencyColumn<'_>> = groups
        .into_iter()
        .map(|(frequency_khz, mut members)| {
            members.sort_by_cached_key(|e| {
                (e.start_sort(), e.time_off().to_owned(), e.station_sort())
            });
            FrequencyColumn {
                frequency_khz,
                frequency_display: format_mhz(frequency_khz),
                is_live_now: any_live(&members),
                entries: members,
            }
        })
        .collect();

    out.sort_by_key(|col| col.frequency_khz);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    use chrono::{TimeZone, Utc};

    use crate::entry::RawEntry;
    use crate::live::annotate_liveness;
    use crate::merge::merge_entries;

    fn sample() -> Vec<CanonicalEntry> {
        merge_entries(&[
            RawEntry::new(9410, "0600", "0700", "mo").with_station("BBC"),
            RawEntry::new(6000, "0600", "0700", "mo").with_station("zeta"),
            RawEntry::new(6000, "0600", "0700", "mo").with_station("Alpha"),
            RawEntry::new(6000, "0600", "0700", "tu").with_station("Beta"),
            RawEntry::new(9410, "0500", "0600", "").with_station("Early"),
            RawEntry::new(7000, "", "", "").with_station("Nowhen"),
        ])
    }

    #[test]
    fn test_time_columns() {
        let entries = sample();
        let cols = time_columns(&entries);

        let labels: Vec<&str> = cols.iter().map(|c| c.time_days_display.as_str()).collect();
        assert_eq!(
            vec![
                "05:00-06:00 | Daily",
                "06:00-07:00 | Mon",
                "06:00-07:00 | Tue",
                "Daily"
            ],
            labels
        );

        let stations: Vec<&str> = cols[1].entries.iter().map(|e| e.station()).collect();
        assert_eq!(vec!["Alpha", "zeta", "BBC"], stations);
        assert_eq!("Mon", cols[1].days);
        assert_eq!("06:00-07:00", cols[1].time_display);

        // every entry lands in exactly one column
        let total: usize = cols.iter().map(|c| c.entries.len()).sum();
        assert_eq!(entries.len(), total);
    }

    #[test]
    fn test_frequency_columns() {
        let entries = sample();
        let cols = frequency_columns(&entries);

        let freqs: Vec<u32> = cols.iter().map(|c| c.frequency_khz).collect();
        assert_eq!(vec![6000, 7000, 9410], freqs);
        assert_eq!("6.000 MHz", cols[0].frequency_display);

        let stations: Vec<&str> = cols[0].entries.iter().map(|e| e.station()).collect();
        assert_eq!(vec!["Alpha", "Beta", "zeta"], stations);

        let stations: Vec<&str> = cols[2].entries.iter().map(|e| e.station()).collect();
        assert_eq!(vec!["Early", "BBC"], stations);
    }

    #[test]
    fn test_frequency_columns_unreadable_frequency() {
        let entries = merge_entries(&[
            RawEntry::new("abc", "0600", "0700", "").with_station("Mystery"),
            RawEntry::new(9410, "0600", "0700", "").with_station("BBC"),
        ]);
        let cols = frequency_columns(&entries);

        let freqs: Vec<u32> = cols.iter().map(|c| c.frequency_khz).collect();
        assert_eq!(vec![0, 9410], freqs);
        assert_eq!("0.000 MHz", cols[0].frequency_display);
        assert_eq!(1, cols[0].entries.len());
        assert_eq!("Mystery", cols[0].entries[0].station());
    }

    #[test]
    fn test_column_liveness() {
        let mut entries = sample();

        // Monday 2021-03-01 at 06:30
        annotate_liveness(
            &mut entries,
            &Utc.with_ymd_and_hms(2021, 3, 1, 6, 30, 0).unwrap(),
        );

        let cols = time_columns(&entries);
        let live: Vec<bool> = cols.iter().map(|c| c.is_live_now).collect();
        assert_eq!(vec![false, true, false, false], live);

        let cols = frequency_columns(&entries);
        let live: Vec<bool> = cols.iter().map(|c| c.is_live_now).collect();
        assert_eq!(vec![true, false, true], live);
    }
}
