//! Days of the week and free-text day specifications

use std::fmt;
use std::str::FromStr;

use lazy_static::lazy_static;
use regex::Regex;
use serde::ser::SerializeSeq;
use serde::{Serialize, Serializer};
use strum::{EnumMessage, IntoEnumIterator};

/// A day of the week
///
/// Days are ordered Monday-first, the way broadcast schedules
/// number them (`1` is Monday and `7` is Sunday). Each day has a
/// two-letter code, as it appears in schedule text, and a
/// three-letter display label.
///
/// ```
/// use swlsked::DayCode;
///
/// let day = DayCode::from_code("we").unwrap();
/// assert_eq!(DayCode::Wednesday, day);
/// assert_eq!("we", day.as_code_str());
/// assert_eq!("Wed", day.as_display_str());
/// assert_eq!("Wed", &format!("{}", day));
/// assert_eq!("we", &format!("{:#}", day));
/// ```
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    strum_macros::EnumIter,
    strum_macros::EnumMessage,
    strum_macros::EnumString,
)]
#[strum(ascii_case_insensitive)]
#[repr(u8)]
pub enum DayCode {
    #[strum(serialize = "mo", detailed_message = "Mon")]
    Monday,

    #[strum(serialize = "tu", detailed_message = "Tue")]
    Tuesday,

    #[strum(serialize = "we", detailed_message = "Wed")]
    Wednesday,

    #[strum(serialize = "th", detailed_message = "Thu")]
    Thursday,

    #[strum(serialize = "fr", detailed_message = "Fri")]
    Friday,

    #[strum(serialize = "sa", detailed_message = "Sat")]
    Saturday,

    #[strum(serialize = "su", detailed_message = "Sun")]
    Sunday,
}

impl DayCode {
    /// Parse a two-letter day code, like "`mo`"
    ///
    /// Matching is case-insensitive. Returns `None` if the
    /// input is not one of the seven codes.
    pub fn from_code<S>(code: S) -> Option<Self>
    where
        S: AsRef<str>,
    {
        DayCode::from_str(code.as_ref()).ok()
    }

    /// Day from its position in the week
    ///
    /// `0` is Monday and `6` is Sunday.
    pub fn from_index(index: usize) -> Option<Self> {
        DayCode::iter().nth(index)
    }

    /// Position in the week, Monday is `0`
    pub fn index(&self) -> usize {
        *self as usize
    }

    /// Two-letter schedule code, like "`mo`"
    pub fn as_code_str(&self) -> &'static str {
        self.get_serializations()[0]
    }

    /// Three-letter display label, like "`Mon`"
    pub fn as_display_str(&self) -> &'static str {
        self.get_detailed_message().expect("missing definition")
    }
}

impl From<chrono::Weekday> for DayCode {
    fn from(day: chrono::Weekday) -> Self {
        DayCode::from_index(day.num_days_from_monday() as usize)
            .expect("chrono weekday out of range")
    }
}

impl AsRef<str> for DayCode {
    fn as_ref(&self) -> &'static str {
        self.as_code_str()
    }
}

impl fmt::Display for DayCode {
    /// Printable string
    ///
    /// * The normal form is a display label like "`Mon`"
    /// * The alternate form is the two-letter code like "`mo`"
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if f.alternate() {
            self.as_code_str().fmt(f)
        } else {
            self.as_display_str().fmt(f)
        }
    }
}

impl Serialize for DayCode {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(self.as_code_str())
    }
}

/// A set of days of the week
///
/// Iteration and display always follow the fixed Monday-first
/// order, regardless of insertion order. A set of all seven
/// days displays as "`Daily`."
///
/// ```
/// use swlsked::{DayCode, DaySet};
///
/// let set: DaySet = [DayCode::Wednesday, DayCode::Monday].into_iter().collect();
/// assert_eq!("Mon,Wed", &format!("{}", set));
/// assert_eq!("Daily", &format!("{}", DaySet::all()));
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct DaySet(u8);

impl DaySet {
    const ALL_BITS: u8 = 0b0111_1111;

    /// The empty set
    pub const fn empty() -> Self {
        Self(0)
    }

    /// Every day of the week
    pub const fn all() -> Self {
        Self(Self::ALL_BITS)
    }

    /// Add a day
    pub fn insert(&mut self, day: DayCode) {
        self.0 |= 1 << day.index();
    }

    /// Add every day from `start` to `end`, inclusive
    ///
    /// Walks forward through the week. If `start` falls after
    /// `end`, the walk wraps around from Sunday to Monday, so
    /// `Friday..=Monday` is Friday, Saturday, Sunday, Monday.
    pub fn insert_range(&mut self, start: DayCode, end: DayCode) {
        let mut idx = start.index();
        loop {
            self.0 |= 1 << idx;
            if idx == end.index() {
                break;
            }
            idx = (idx + 1) % 7;
        }
    }

    /// Add every day of `other` to this set
    pub fn union_with(&mut self, other: DaySet) {
        self.0 |= other.0;
    }

    /// True if `day` is a member
    pub fn contains(&self, day: DayCode) -> bool {
        self.0 & (1 << day.index()) != 0
    }

    /// True if no days are present
    pub fn is_empty(&self) -> bool {
        self.0 == 0
    }

    /// True if all seven days are present
    pub fn is_all(&self) -> bool {
        self.0 == Self::ALL_BITS
    }

    /// Number of days present
    pub fn len(&self) -> usize {
        self.0.count_ones() as usize
    }

    /// Iterate days, Monday first
    pub fn iter(&self) -> impl Iterator<Item = DayCode> + '_ {
        DayCode::iter().filter(move |d| self.contains(*d))
    }
}

impl FromIterator<DayCode> for DaySet {
    fn from_iter<I>(iter: I) -> Self
    where
        I: IntoIterator<Item = DayCode>,
    {
        let mut out = DaySet::empty();
        for day in iter {
            out.insert(day);
        }
        out
    }
}

impl fmt::Display for DaySet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_all() {
            return f.write_str("Daily");
        }

        let labels: Vec<&str> = self.iter().map(|d| d.as_display_str()).collect();
        f.write_str(&labels.join(","))
    }
}

impl Serialize for DaySet {
    /// Serializes as a list of two-letter codes, Monday first
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut seq = serializer.serialize_seq(Some(self.len()))?;
        for day in self.iter() {
            seq.serialize_element(day.as_code_str())?;
        }
        seq.end()
    }
}

/// Parse a free-text day specification
///
/// Schedules describe operating days in many ways: "`daily`,"
/// ISO day numbers like "`1245`," two-letter abbreviations like
/// "`Mo,We`," and ranges like "`Mo-Fr`" or "`Fr-Mo`." This
/// function recognizes all of these, case-insensitively, and
/// returns the union of every day mentioned.
///
/// * Empty text, or text containing "`daily`," is every day.
/// * The digits `1`–`7` anywhere in the text are ISO day numbers.
/// * A range `A-B` (hyphen or en-dash) walks forward from `A`
///   to `B`, wrapping around the end of the week.
///
/// If the text contains no day numbers and no abbreviations,
/// returns `None`. Callers should treat this as "no restriction
/// could be parsed," which is *not* the same thing as an
/// explicit "every day."
///
/// ```
/// use swlsked::{parse_days, DayCode, DaySet};
///
/// let fr_mo = parse_days("Fr-Mo").unwrap();
/// assert_eq!("Mon,Fri,Sat,Sun", &format!("{}", fr_mo));
///
/// assert_eq!(Some(DaySet::all()), parse_days(""));
/// assert_eq!(Some(DaySet::all()), parse_days("Daily"));
/// assert_eq!(None, parse_days("xyz"));
/// ```
pub fn parse_days<S>(text: S) -> Option<DaySet>
where
    S: AsRef<str>,
{
    lazy_static! {
        static ref DIGIT: Regex = Regex::new(r"[1-7]").expect("bad day digit regexp");
        static ref ABBREV: Regex = Regex::new(
            r"(mo|tu|we|th|fr|sa|su)(?:\s*[-–]\s*(mo|tu|we|th|fr|sa|su))?"
        )
        .expect("bad day abbreviation regexp");
    }

    let text = text.as_ref().trim().to_lowercase();
    if text.is_empty() || text.contains("daily") {
        return Some(DaySet::all());
    }

    let mut found = DaySet::empty();

    for mtc in DIGIT.find_iter(&text) {
        let num: usize = mtc.as_str().parse().expect("day digit regexp admitted non-digit");
        if let Some(day) = DayCode::from_index(num - 1) {
            found.insert(day);
        }
    }

    for cap in ABBREV.captures_iter(&text) {
        let start = cap.get(1).and_then(|m| DayCode::from_code(m.as_str()));
        let end = cap.get(2).and_then(|m| DayCode::from_code(m.as_str()));
        match (start, end) {
            (Some(start), Some(end)) => found.insert_range(start, end),
            (Some(start), None) => found.insert(start),
            _ => {}
        }
    }

    if found.is_empty() {
        None
    } else {
        Some(found)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn days(codes: &[&str]) -> DaySet {
        codes
            .iter()
            .map(|c| DayCode::from_code(c).expect("bad test code"))
            .collect()
    }

    #[test]
    fn test_day_code() {
        assert_eq!(7, DayCode::iter().count());
        for (idx, day) in DayCode::iter().enumerate() {
            assert_eq!(idx, day.index());
            assert_eq!(Some(day), DayCode::from_index(idx));
            assert_eq!(Some(day), DayCode::from_code(day.as_code_str()));
            assert_eq!(3, day.as_display_str().len());
        }
        assert_eq!(None, DayCode::from_index(7));
        assert_eq!(Some(DayCode::Thursday), DayCode::from_code("TH"));
        assert_eq!(DayCode::Sunday, DayCode::from(chrono::Weekday::Sun));
        assert_eq!(DayCode::Monday, DayCode::from(chrono::Weekday::Mon));
    }

    #[test]
    fn test_day_set() {
        let mut set = DaySet::empty();
        assert!(set.is_empty());
        set.insert(DayCode::Sunday);
        set.insert(DayCode::Tuesday);
        assert_eq!(2, set.len());
        assert!(set.contains(DayCode::Sunday));
        assert!(!set.contains(DayCode::Monday));
        assert_eq!(
            vec![DayCode::Tuesday, DayCode::Sunday],
            set.iter().collect::<Vec<_>>()
        );
        assert_eq!("Tue,Sun", &format!("{}", set));

        set.union_with(DaySet::all());
        assert!(set.is_all());
        assert_eq!("Daily", &format!("{}", set));
    }

    #[test]
    fn test_insert_range() {
        let mut set = DaySet::empty();
        set.insert_range(DayCode::Monday, DayCode::Friday);
        assert_eq!(days(&["mo", "tu", "we", "th", "fr"]), set);

        let mut set = DaySet::empty();
        set.insert_range(DayCode::Saturday, DayCode::Tuesday);
        assert_eq!(days(&["sa", "su", "mo", "tu"]), set);

        let mut set = DaySet::empty();
        set.insert_range(DayCode::Wednesday, DayCode::Wednesday);
        assert_eq!(days(&["we"]), set);
    }

    #[test]
    fn test_parse_days_every_day() {
        assert_eq!(Some(DaySet::all()), parse_days(""));
        assert_eq!(Some(DaySet::all()), parse_days("   "));
        assert_eq!(Some(DaySet::all()), parse_days("daily"));
        assert_eq!(Some(DaySet::all()), parse_days("DAILY exc. holidays"));
    }

    #[test]
    fn test_parse_days_unknown() {
        assert_eq!(None, parse_days("xyz"));
        assert_eq!(None, parse_days("irr"));
        assert_eq!(None, parse_days("0"));
        assert_eq!(None, parse_days("89"));
    }

    #[test]
    fn test_parse_days_digits() {
        assert_eq!(Some(days(&["mo", "tu", "th", "fr"])), parse_days("1245"));
        assert_eq!(Some(days(&["su"])), parse_days("7"));
        assert_eq!(Some(days(&["mo", "su"])), parse_days("7,1"));
    }

    #[test]
    fn test_parse_days_abbreviations() {
        assert_eq!(Some(days(&["mo", "we"])), parse_days("Mo,We"));
        assert_eq!(Some(days(&["sa"])), parse_days("Sa"));
        assert_eq!(
            Some(days(&["mo", "tu", "we", "th", "fr"])),
            parse_days("Mo-Fr")
        );
        assert_eq!(Some(days(&["tu", "we", "th"])), parse_days("tu – th"));
        assert_eq!(Some(days(&["mo", "sa", "su"])), parse_days("Mo,Sa-Su"));
    }

    #[test]
    fn test_parse_days_wraparound() {
        assert_eq!(Some(days(&["fr", "sa", "su", "mo"])), parse_days("fr-mo"));
        assert_eq!(Some(days(&["su", "mo"])), parse_days("Su-Mo"));

        // every A-B is a forward inclusive walk through the week
        for start in DayCode::iter() {
            for end in DayCode::iter() {
                let text = format!("{}-{}", start.as_code_str(), end.as_code_str());
                let parsed = parse_days(&text).expect("range did not parse");
                let mut expect = DaySet::empty();
                let mut idx = start.index();
                loop {
                    expect.insert(DayCode::from_index(idx).unwrap());
                    if idx == end.index() {
                        break;
                    }
                    idx = (idx + 1) % 7;
                }
                assert_eq!(expect, parsed, "range {}", text);
            }
        }
    }

    #[test]
    fn test_parse_days_mixed() {
        assert_eq!(Some(days(&["mo", "we", "sa"])), parse_days("1,We,6"));
    }

    #[test]
    fn test_parse_display_labels_roundtrip() {
        // display labels parse back to the same set
        for text in ["Mon,Wed", "Tue,Thu,Sat", "Fri,Sun", "Daily"] {
            let set = parse_days(text).expect("label did not parse");
            assert_eq!(text, &format!("{}", set));
        }
    }
}
