//! On-the-air evaluation against UTC wall-clock time

use chrono::{DateTime, Datelike, Timelike, Utc};
use log::debug;

use crate::canonical::CanonicalEntry;
use crate::clock::parse_hhmm;
use crate::days::{parse_days, DayCode};

/// Does the entry operate on the given day?
///
/// If the entry's days are known, the day must be one of them.
/// Otherwise the original day text is consulted again: if it
/// yields no day restriction, the entry matches every day.
///
/// Only the day is tested here, not the time window.
pub fn matches_weekday(entry: &CanonicalEntry, day: DayCode) -> bool {
    if entry.day_set_known() {
        return entry.day_set().contains(day);
    }

    match parse_days(entry.days_raw()) {
        Some(set) => set.contains(day),
        None => true,
    }
}

/// Is the entry on the air at `now`?
///
/// The entry must [operate](matches_weekday) on `now`'s UTC
/// weekday, and both its start and end time must be valid
/// `HHMM` clock strings. Then:
///
/// * If start equals end, the entry is on the air all day.
/// * If start is before end, it is on the air from start
///   (inclusive) to end (exclusive).
/// * If start is after end, the window crosses midnight, and
///   the entry is on the air from start until midnight and from
///   midnight until end.
///
/// The weekday test always uses *today's* weekday, even for the
/// part of an overnight window which began yesterday.
///
/// ```
/// use chrono::{TimeZone, Utc};
/// use swlsked::{is_live_at, merge_entries, RawEntry};
///
/// let entries = merge_entries(&[RawEntry::new(5955, "2300", "0100", "mo")]);
///
/// // Monday 2021-03-01, 23:30 UTC
/// let monday = Utc.with_ymd_and_hms(2021, 3, 1, 23, 30, 0).unwrap();
/// assert!(is_live_at(&entries[0], &monday));
/// ```
pub fn is_live_at(entry: &CanonicalEntry, now: &DateTime<Utc>) -> bool {
    if !matches_weekday(entry, DayCode::from(now.weekday())) {
        return false;
    }

    let (start, end) = match (parse_hhmm(entry.time_on()), parse_hhmm(entry.time_off())) {
        (Some(start), Some(end)) => (start as u32, end as u32),
        _ => return false,
    };

    let now_minutes = now.hour() * 60 + now.minute();
    if start == end {
        true
    } else if start < end {
        start <= now_minutes && now_minutes < end
    } else {
        now_minutes >= start || now_minutes < end
    }
}

/// Stamp every entry with its on-the-air status at `now`
///
/// Returns the number of entries which are on the air.
pub fn annotate_liveness(entries: &mut [CanonicalEntry], now: &DateTime<Utc>) -> usize {
    let mut live_count = 0;
    for entry in entries.iter_mut() {
        let live = is_live_at(entry, now);
        entry.set_live_now(live);
        if live {
            live_count += 1;
        }
    }

    debug!(
        "{} of {} entries on the air at {}",
        live_count,
        entries.len(),
        now.format("%H:%M")
    );
    live_count
}
