//! 24-hour `HHMM` clock strings and display labels

/// Sort value for a missing or unparsable start time
///
/// Larger than any real minute-of-day, so entries without a
/// usable start time always sort after those with one.
pub const UNPARSED_START: u32 = 10_000;

/// Minutes in a full day, as accepted for "`2400`"
pub const MINUTES_PER_DAY: u16 = 1440;

/// Parse a `HHMM` clock string to minutes past midnight
///
/// The input is trimmed and must be all ASCII digits. Short
/// strings are zero-padded to four digits, so "`930`" is 09:30.
/// "`2400`" is accepted as 1440 minutes (end of day). Hours
/// above 23 or minutes above 59 are invalid.
///
/// ```
/// use swlsked::parse_hhmm;
///
/// assert_eq!(Some(570), parse_hhmm("930"));
/// assert_eq!(Some(1440), parse_hhmm("2400"));
/// assert_eq!(None, parse_hhmm("2460"));
/// assert_eq!(None, parse_hhmm("noon"));
/// ```
pub fn parse_hhmm<S>(value: S) -> Option<u16>
where
    S: AsRef<str>,
{
    let padded = zero_padded(value.as_ref())?;
    let (hh, mm) = padded.split_at(2);
    let hours: u32 = hh.parse().ok()?;
    let minutes: u32 = mm.parse().ok()?;

    if hours == 24 && minutes == 0 {
        return Some(MINUTES_PER_DAY);
    }
    if hours > 23 || minutes > 59 {
        return None;
    }
    Some((hours * 60 + minutes) as u16)
}

/// Start-time sort key
///
/// Minutes past midnight, or [`UNPARSED_START`] if the
/// string does not parse.
pub fn start_sort_key<S>(time_on: S) -> u32
where
    S: AsRef<str>,
{
    parse_hhmm(time_on)
        .map(u32::from)
        .unwrap_or(UNPARSED_START)
}

/// Format a `HHMM` clock string as `HH:MM`
///
/// Strings which are not all digits are returned trimmed but
/// otherwise unchanged.
pub fn format_hhmm<S>(value: S) -> String
where
    S: AsRef<str>,
{
    let value = value.as_ref().trim();
    match zero_padded(value) {
        Some(padded) => {
            let (hh, mm) = padded.split_at(2);
            format!("{}:{}", hh, mm)
        }
        None => value.to_owned(),
    }
}

/// Format a time range like `23:00-01:00`
///
/// If either end is missing, the other end is shown alone.
/// Malformed times pass through unchanged.
pub fn format_time_range<S, T>(time_on: S, time_off: T) -> String
where
    S: AsRef<str>,
    T: AsRef<str>,
{
    let on = format_hhmm(time_on);
    let off = format_hhmm(time_off);
    join_non_empty(&on, &off, "-")
}

/// Join two labels with `separator`, omitting it if either is empty
///
/// Both sides are trimmed first.
pub fn join_non_empty(left: &str, right: &str, separator: &str) -> String {
    let left = left.trim();
    let right = right.trim();
    match (left.is_empty(), right.is_empty()) {
        (false, false) => format!("{}{}{}", left, separator, right),
        (false, true) => left.to_owned(),
        (true, _) => right.to_owned(),
    }
}

/// Format a frequency in kHz as `9.410 MHz`
pub fn format_mhz(frequency_khz: u32) -> String {
    format!("{:.3} MHz", frequency_khz as f64 / 1000.0)
}

// Trimmed, all-digit, zero-padded to at least four characters
fn zero_padded(value: &str) -> Option<String> {
    let value = value.trim();
    if value.is_empty() || !value.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    Some(format!("{:0>4}", value))
}
