//! Merging raw rows into canonical schedule slots

use std::collections::HashMap;

use log::{debug, trace};

use crate::canonical::CanonicalEntry;
use crate::days::{parse_days, DaySet};
use crate::entry::{NormalizedEntry, RawEntry};

/// Normalize and merge raw schedule rows
///
/// Upstream schedules often list one program as several rows
/// which differ only in their days, like "`Mo-Fr`" and "`Sa`."
/// This function groups such rows and produces one
/// [`CanonicalEntry`] per group, with the union of their days.
///
/// Rows merge if their frequency, times, origin, station,
/// language, target, and remarks are all identical *and* their
/// day text is compatible:
///
/// * Any two rows whose day text parses are compatible, even if
///   the text differs.
/// * A row whose day text does not parse is only compatible
///   with rows that have the same day text, ignoring case.
///
/// No row is ever dropped. Malformed fields degrade to defaults.
///
/// The output is ordered by start time (unparsable start times
/// last), then end time, then frequency, then station name
/// (ignoring case).
///
/// ```
/// use swlsked::{merge_entries, RawEntry};
///
/// let merged = merge_entries(&[
///     RawEntry::new(9410, "0600", "0700", "mo").with_station("BBC"),
///     RawEntry::new(9410, "0600", "0700", "we").with_station("BBC"),
/// ]);
/// assert_eq!(1, merged.len());
/// assert_eq!("Mon,Wed", merged[0].days());
/// ```
pub fn merge_entries<'a, I>(raw_entries: I) -> Vec<CanonicalEntry>
where
    I: IntoIterator<Item = &'a RawEntry>,
{
    let mut index: HashMap<MergeKey, usize> = HashMap::new();
    let mut groups: Vec<Group> = Vec::new();
    let mut raw_count = 0usize;

    for raw in raw_entries {
        raw_count += 1;
        let normalized = NormalizedEntry::from(raw);
        let day_set = parse_days(&normalized.days_raw);
        let key = MergeKey::new(&normalized, day_set.is_some());

        match index.get(&key) {
            Some(&pos) => {
                trace!("merging duplicate slot: {:?}", key);
                groups[pos].absorb(day_set);
            }
            None => {
                index.insert(key, groups.len());
                groups.push(Group {
                    first: normalized,
                    day_set,
                });
            }
        }
    }

    let mut merged: Vec<CanonicalEntry> = groups
        .into_iter()
        .map(|grp| CanonicalEntry::new(grp.first, grp.day_set))
        .collect();

    merged.sort_by_cached_key(|e| {
        (
            e.start_sort(),
            e.time_off().to_owned(),
            e.frequency_khz(),
            e.station_sort(),
        )
    });

    debug!(
        "merged {} raw schedule rows into {} entries",
        raw_count,
        merged.len()
    );
    merged
}

/// Identity of day text for merging
///
/// All parsed day text is interchangeable. Unparsed day text
/// is only equal to itself.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
enum DayIdentity {
    Parsed,
    Raw(String),
}

/// Rows with equal keys describe the same schedule slot
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
struct MergeKey {
    frequency_khz: u32,
    time_on: String,
    time_off: String,
    itu: String,
    station: String,
    language: String,
    target: String,
    remarks: String,
    days: DayIdentity,
}

impl MergeKey {
    fn new(entry: &NormalizedEntry, days_parsed: bool) -> Self {
        let days = if days_parsed {
            DayIdentity::Parsed
        } else {
            DayIdentity::Raw(entry.days_raw.to_lowercase())
        };

        Self {
            frequency_khz: entry.frequency_khz,
            time_on: entry.time_on.clone(),
            time_off: entry.time_off.clone(),
            itu: entry.itu.clone(),
            station: entry.station.clone(),
            language: entry.language.clone(),
            target: entry.target.clone(),
            remarks: entry.remarks.clone(),
            days,
        }
    }
}

// Accumulated rows for one merge key
#[derive(Clone, Debug)]
struct Group {
    // first row seen; provides every field but the days
    first: NormalizedEntry,

    // union of parsed days, or None if no row parsed
    day_set: Option<DaySet>,
}

impl Group {
    fn absorb(&mut self, day_set: Option<DaySet>) {
        match (self.day_set.as_mut(), day_set) {
            (Some(acc), Some(more)) => acc.union_with(more),
            (None, Some(more)) => self.day_set = Some(more),
            (_, None) => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::collections::HashSet;

    use crate::days::DayCode;

    fn bbc(days: &str) -> RawEntry {
        RawEntry::new(9410, "0600", "0700", days)
            .with_itu("G")
            .with_station("BBC")
            .with_language("E")
            .with_target("Eu")
    }

    #[test]
    fn test_merge_unions_days() {
        let merged = merge_entries(&[bbc("mo"), bbc("we")]);
        assert_eq!(1, merged.len());

        let entry = &merged[0];
        assert!(entry.day_set_known());
        assert_eq!(
            vec![DayCode::Monday, DayCode::Wednesday],
            entry.day_set().iter().collect::<Vec<_>>()
        );
        assert_eq!("Mon,Wed", entry.days());
        assert_eq!("mo", entry.days_raw());
    }

    #[test]
    fn test_merge_to_daily() {
        let merged = merge_entries(&[bbc("Mo-Fr"), bbc("Sa"), bbc("7")]);
        assert_eq!(1, merged.len());
        assert!(merged[0].day_set().is_all());
        assert_eq!("Daily", merged[0].days());
    }

    #[test]
    fn test_merge_unparsed_days() {
        // same unparsed text merges, ignoring case
        let merged = merge_entries(&[bbc("irr"), bbc("IRR")]);
        assert_eq!(1, merged.len());
        assert!(!merged[0].day_set_known());
        assert_eq!("irr", merged[0].days());

        // different unparsed text never merges
        let merged = merge_entries(&[bbc("irr"), bbc("alt")]);
        assert_eq!(2, merged.len());

        // unparsed text never merges with parsed text
        let merged = merge_entries(&[bbc("irr"), bbc("mo")]);
        assert_eq!(2, merged.len());
        let known: Vec<bool> = merged.iter().map(|e| e.day_set_known()).collect();
        assert!(known.contains(&true) && known.contains(&false));
    }

    #[test]
    fn test_merge_key_fields() {
        let merged = merge_entries(&[
            bbc("mo"),
            bbc("mo").with_remarks("relay"),
            bbc("mo").with_target("Af"),
            bbc("mo").with_language("F"),
            bbc("mo").with_station("BBC WS"),
            bbc("mo").with_itu("ASC"),
            RawEntry::new(9410, "0600", "0730", "mo")
                .with_itu("G")
                .with_station("BBC")
                .with_language("E")
                .with_target("Eu"),
            RawEntry::new(9411, "0600", "0700", "mo")
                .with_itu("G")
                .with_station("BBC")
                .with_language("E")
                .with_target("Eu"),
        ]);
        assert_eq!(8, merged.len());
    }

    #[test]
    fn test_merge_trims_before_keying() {
        let merged = merge_entries(&[
            bbc("mo"),
            RawEntry::new(" 9410 ", " 0600", "0700 ", "we")
                .with_itu(" G")
                .with_station("BBC ")
                .with_language("E")
                .with_target("Eu"),
        ]);
        assert_eq!(1, merged.len());
        assert_eq!("Mon,Wed", merged[0].days());
    }

    #[test]
    fn test_merge_ordering() {
        let merged = merge_entries(&[
            RawEntry::new(6000, "bad", "0100", "").with_station("z"),
            RawEntry::new(9000, "0600", "0800", "").with_station("b"),
            RawEntry::new(7000, "0600", "0700", "").with_station("Zulu"),
            RawEntry::new(7000, "0600", "0700", "").with_station("alpha"),
            RawEntry::new(5000, "0600", "0700", "").with_station("q"),
            RawEntry::new(4000, "0000", "2400", "").with_station("early"),
        ]);

        let stations: Vec<&str> = merged.iter().map(|e| e.station()).collect();
        assert_eq!(vec!["early", "q", "alpha", "Zulu", "b", "z"], stations);
    }

    #[test]
    fn test_merge_never_drops() {
        let merged = merge_entries(&[
            RawEntry::default(),
            RawEntry::new("abc", "xx", "yy", "??"),
        ]);
        assert_eq!(2, merged.len());
        assert!(merged.iter().all(|e| e.frequency_khz() == 0));
    }

    #[test]
    fn test_merge_empty() {
        let raw: Vec<RawEntry> = vec![];
        assert!(merge_entries(&raw).is_empty());
    }

    #[test]
    fn test_merge_idempotent() {
        let raw = vec![
            bbc("mo"),
            bbc("we"),
            bbc("irr"),
            RawEntry::new(5955, "2300", "0100", "Fr-Mo").with_station("X"),
            RawEntry::new(5955, "2300", "0100", "we").with_station("X"),
            RawEntry::new(11700, "1200", "1300", "").with_station("Y"),
        ];
        let once = merge_entries(&raw);
        let refed: Vec<RawEntry> = once.iter().map(RawEntry::from).collect();
        let twice = merge_entries(&refed);

        let keys = |entries: &[CanonicalEntry]| -> HashSet<(u32, String, String, String, bool, String)> {
            entries
                .iter()
                .map(|e| {
                    (
                        e.frequency_khz(),
                        e.time_on().to_owned(),
                        e.time_off().to_owned(),
                        e.station().to_owned(),
                        e.day_set_known(),
                        e.days().to_owned(),
                    )
                })
                .collect()
        };

        assert_eq!(once.len(), twice.len());
        assert_eq!(keys(&once), keys(&twice));
        for (a, b) in once.iter().zip(twice.iter()) {
            assert_eq!(a.day_set(), b.day_set());
        }
    }
}
