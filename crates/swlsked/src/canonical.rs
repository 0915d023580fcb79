//! Merged, display-ready schedule entries

use serde::Serialize;

use crate::clock::{format_time_range, join_non_empty, start_sort_key};
use crate::days::DaySet;
use crate::entry::{NormalizedEntry, RawEntry};
use crate::itucodes::flag_for_origin;

/// One logical schedule slot
///
/// A `CanonicalEntry` is the result of [merging](crate::merge_entries)
/// every raw schedule row that describes the same frequency,
/// time window, station, and program. Its operating days are
/// the union of the days of every merged row.
///
/// The entry also carries display labels which are derived once,
/// at construction:
///
/// * [`days()`](#method.days): "`Daily`," or a list like
///   "`Mon,Wed`," or the original day text if no days could be
///   parsed from it
/// * [`time_display()`](#method.time_display): "`23:00-01:00`"
/// * [`time_days_display()`](#method.time_days_display):
///   "`23:00-01:00 | Mon,Wed`"
/// * [`lang_target_display()`](#method.lang_target_display):
///   "`E | Eu`"
/// * [`flag()`](#method.flag): a flag glyph for the origin country
///
/// Entries are never modified after construction except to
/// stamp the [liveness](crate::annotate_liveness) flag.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct CanonicalEntry {
    frequency_khz: u32,
    time_on: String,
    time_off: String,
    days_raw: String,
    itu: String,
    station: String,
    language: String,
    target: String,
    remarks: String,
    day_set: DaySet,
    day_set_known: bool,
    days: String,
    flag: String,
    time_display: String,
    time_days_display: String,
    lang_target_display: String,
    is_live_now: bool,
}

impl CanonicalEntry {
    /// Build from a normalized entry and its resolved days
    ///
    /// `day_set` is `None` if no day restriction could be parsed
    /// for any of the entry's source rows.
    pub(crate) fn new(normalized: NormalizedEntry, day_set: Option<DaySet>) -> Self {
        let days = match day_set {
            Some(set) if !set.is_empty() => set.to_string(),
            _ => normalized.days_raw.clone(),
        };
        let flag = flag_for_origin(&normalized.itu);
        let time_display = format_time_range(&normalized.time_on, &normalized.time_off);
        let time_days_display = join_non_empty(&time_display, &days, " | ");
        let lang_target_display =
            join_non_empty(&normalized.language, &normalized.target, " | ");

        Self {
            frequency_khz: normalized.frequency_khz,
            time_on: normalized.time_on,
            time_off: normalized.time_off,
            days_raw: normalized.days_raw,
            itu: normalized.itu,
            station: normalized.station,
            language: normalized.language,
            target: normalized.target,
            remarks: normalized.remarks,
            day_set: day_set.unwrap_or_default(),
            day_set_known: day_set.is_some(),
            days,
            flag,
            time_display,
            time_days_display,
            lang_target_display,
            is_live_now: false,
        }
    }

    /// Frequency, in kHz (zero if unknown)
    pub fn frequency_khz(&self) -> u32 {
        self.frequency_khz
    }

    /// Start time, `HHMM` UTC, as given
    pub fn time_on(&self) -> &str {
        &self.time_on
    }

    /// End time, `HHMM` UTC, as given
    pub fn time_off(&self) -> &str {
        &self.time_off
    }

    /// Original free-text days of the first merged row
    pub fn days_raw(&self) -> &str {
        &self.days_raw
    }

    /// Origin (ITU) code
    pub fn itu(&self) -> &str {
        &self.itu
    }

    /// Station name
    pub fn station(&self) -> &str {
        &self.station
    }

    /// Broadcast language
    pub fn language(&self) -> &str {
        &self.language
    }

    /// Target audience area
    pub fn target(&self) -> &str {
        &self.target
    }

    /// Remarks
    pub fn remarks(&self) -> &str {
        &self.remarks
    }

    /// Operating days
    ///
    /// Only meaningful if [`day_set_known()`](#method.day_set_known).
    /// Otherwise this set is empty.
    pub fn day_set(&self) -> DaySet {
        self.day_set
    }

    /// True if the operating days were parsed from the day text
    pub fn day_set_known(&self) -> bool {
        self.day_set_known
    }

    /// Day label, like "`Daily`" or "`Mon,Wed`"
    pub fn days(&self) -> &str {
        &self.days
    }

    /// Flag glyph for the origin country
    pub fn flag(&self) -> &str {
        &self.flag
    }

    /// Time range label, like "`23:00-01:00`"
    pub fn time_display(&self) -> &str {
        &self.time_display
    }

    /// Time range and days, like "`23:00-01:00 | Mon,Wed`"
    pub fn time_days_display(&self) -> &str {
        &self.time_days_display
    }

    /// Language and target, like "`E | Eu`"
    pub fn lang_target_display(&self) -> &str {
        &self.lang_target_display
    }

    /// True if the entry was on the air when last evaluated
    pub fn is_live_now(&self) -> bool {
        self.is_live_now
    }

    pub(crate) fn set_live_now(&mut self, live: bool) {
        self.is_live_now = live;
    }

    /// Start minute-of-day, or the unparsed-start sentinel
    pub(crate) fn start_sort(&self) -> u32 {
        start_sort_key(&self.time_on)
    }

    /// Lower-cased station name, for ordering
    pub(crate) fn station_sort(&self) -> String {
        self.station.to_lowercase()
    }
}

impl From<&CanonicalEntry> for RawEntry {
    /// Convert back to a raw entry
    ///
    /// The day label becomes the raw day text. Day labels parse
    /// back to the same days, so merging the result again is
    /// idempotent.
    fn from(entry: &CanonicalEntry) -> Self {
        RawEntry::new(
            entry.frequency_khz,
            entry.time_on.clone(),
            entry.time_off.clone(),
            entry.days.clone(),
        )
        .with_itu(entry.itu.clone())
        .with_station(entry.station.clone())
        .with_language(entry.language.clone())
        .with_target(entry.target.clone())
        .with_remarks(entry.remarks.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::days::parse_days;
    use crate::entry::normalize;
    use crate::itucodes::GLOBE;

    #[test]
    fn test_display_fields() {
        let raw = RawEntry::new(9410, "2300", "0100", "Mo,We")
            .with_itu("G")
            .with_station("BBC")
            .with_language("E")
            .with_target("Eu");
        let entry = CanonicalEntry::new(normalize(&raw), parse_days("Mo,We"));

        assert!(entry.day_set_known());
        assert_eq!("Mon,Wed", entry.days());
        assert_eq!("23:00-01:00", entry.time_display());
        assert_eq!("23:00-01:00 | Mon,Wed", entry.time_days_display());
        assert_eq!("E | Eu", entry.lang_target_display());
        assert_eq!("\u{1F1EC}\u{1F1E7}", entry.flag());
        assert!(!entry.is_live_now());
    }

    #[test]
    fn test_unknown_days_keep_raw_text() {
        let raw = RawEntry::new(6000, "", "0100", "irr").with_itu("XYZ");
        let entry = CanonicalEntry::new(normalize(&raw), parse_days("irr"));

        assert!(!entry.day_set_known());
        assert!(entry.day_set().is_empty());
        assert_eq!("irr", entry.days());
        assert_eq!("01:00 | irr", entry.time_days_display());
        assert_eq!("", entry.lang_target_display());
        assert_eq!(GLOBE, entry.flag());
    }

    #[test]
    fn test_to_raw() {
        let raw = RawEntry::new(7325, "0600", "0700", "1234567")
            .with_station("Radio X")
            .with_remarks("test");
        let entry = CanonicalEntry::new(normalize(&raw), parse_days("1234567"));
        let back = RawEntry::from(&entry);
        assert_eq!("Daily", back.days);
        assert_eq!("Radio X", back.station);
        assert_eq!(7325, normalize(&back).frequency_khz);
    }
}
