//! EiBi semicolon-delimited schedule files

use lazy_static::lazy_static;
use log::{debug, trace};
use regex::Regex;

use crate::entry::{RawEntry, RawFrequency};

// Plausible broadcast frequency range, in kHz
const MIN_FREQUENCY_KHZ: u32 = 1000;
const MAX_FREQUENCY_KHZ: u32 = 30000;

lazy_static! {
    static ref TIME_RANGE: Regex =
        Regex::new(r"^\s*(\d{3,4})\s*-\s*(\d{3,4})\s*$").expect("bad time range regexp");
}

/// Read an EiBi schedule file
///
/// EiBi publishes its schedule as semicolon-delimited text,
/// one broadcast per line:
///
/// ```txt
/// kHz:75;Time(UTC):93;Days:59;ITU:49;Station:201;Lng:49;Target:62;Remarks:135;P:35;Start:60;Stop:60;
/// 9410;0600-0700;Mo-Fr;G;BBC;E;Eu;;1;;
/// ```
///
/// The frequency is the first cell which is a whole number of
/// kHz between 1000 and 30000. Rows without one, like the
/// header row, are skipped. The following cells are the time
/// range, days, origin, station, language, and target area. Any
/// cells after that are joined into the remarks.
///
/// Quoted cells and CRLF line endings are accepted.
///
/// ```
/// use swlsked::parse_eibi_csv;
///
/// let rows = parse_eibi_csv("kHz:75;Time(UTC):93\n9410;0600-0700;Mo-Fr;G;BBC;E;Eu\n");
/// assert_eq!(1, rows.len());
/// assert_eq!("0600", rows[0].time_on);
/// assert_eq!("BBC", rows[0].station);
/// ```
pub fn parse_eibi_csv(text: &str) -> Vec<RawEntry> {
    let rows = split_rows(text, ';');
    let total = rows.len();

    let out: Vec<RawEntry> = rows
        .iter()
        .filter(|row| row.iter().any(|cell| !cell.trim().is_empty()))
        .filter_map(|row| {
            let entry = entry_from_row(row);
            if entry.is_none() {
                trace!("skipping EiBi row without a frequency: {:?}", row);
            }
            entry
        })
        .collect();

    debug!("read {} broadcasts from {} EiBi rows", out.len(), total);
    out
}

fn entry_from_row(row: &[String]) -> Option<RawEntry> {
    let (freq_idx, freq) = row.iter().enumerate().find_map(|(i, cell)| {
        let cell = cell.trim();
        if cell.is_empty() || !cell.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        let khz: u32 = cell.parse().ok()?;
        (MIN_FREQUENCY_KHZ..=MAX_FREQUENCY_KHZ)
            .contains(&khz)
            .then_some((i, khz))
    })?;

    let cell = |offset: usize| -> String {
        row.get(freq_idx + offset)
            .map(|c| c.trim().to_owned())
            .unwrap_or_default()
    };

    let (time_on, time_off) = match TIME_RANGE.captures(&cell(1)) {
        Some(caps) => (caps[1].to_owned(), caps[2].to_owned()),
        None => (String::new(), String::new()),
    };

    let remarks = row
        .iter()
        .skip(freq_idx + 7)
        .map(|c| c.trim())
        .collect::<Vec<&str>>()
        .join(" | ")
        .trim()
        .to_owned();

    Some(
        RawEntry::new(RawFrequency::from(freq), time_on, time_off, cell(2))
            .with_itu(cell(3))
            .with_station(cell(4))
            .with_language(cell(5))
            .with_target(cell(6))
            .with_remarks(remarks),
    )
}

// Split delimited text into rows of cells
//
// A double quote at the start of a cell protects delimiters and
// newlines up to the closing quote, and a doubled quote inside
// quotes is a literal quote. Anything after the closing quote is
// kept as plain text. Quotes elsewhere are literal. Blank lines
// yield no row.
fn split_rows(text: &str, sep: char) -> Vec<Vec<String>> {
    let mut rows = Vec::new();
    let mut row = Vec::new();
    let mut field = String::new();
    let mut in_quotes = false;
    let mut at_field_start = true;
    let mut chars = text.chars().peekable();

    while let Some(ch) = chars.next() {
        if in_quotes {
            if ch != '"' {
                field.push(ch);
            } else if chars.peek() == Some(&'"') {
                chars.next();
                field.push('"');
            } else {
                in_quotes = false;
            }
            continue;
        }

        match ch {
            '"' if at_field_start => {
                in_quotes = true;
                at_field_start = false;
            }
            c if c == sep => {
                row.push(std::mem::take(&mut field));
                at_field_start = true;
            }
            '\r' | '\n' => {
                if ch == '\r' && chars.peek() == Some(&'\n') {
                    chars.next();
                }
                row.push(std::mem::take(&mut field));
                if row.len() == 1 && row[0].is_empty() {
                    row.clear();
                } else {
                    rows.push(std::mem::take(&mut row));
                }
                at_field_start = true;
            }
            _ => {
                field.push(ch);
                at_field_start = false;
            }
        }
    }

    if !field.is_empty() || !row.is_empty() {
        row.push(field);
        rows.push(row);
    }
    rows
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::entry::normalize;

    const SAMPLE: &str = "kHz:75;Time(UTC):93;Days:59;ITU:49;Station:201;Lng:49;Target:62;Remarks:135;P:35;Start:60;Stop:60;\r\n\
        9410;0600-0700;Mo-Fr;G;BBC;E;Eu;;1;;\r\n\
        \r\n\
        5955; 2300 - 0100 ;;HOL;\"Radio; Delta\";D;WEu;relay;2\r\n\
        ;;;;\r\n\
        150;0000-2400;;D;Longwave\r\n\
        6070;irregular\n";

    #[test]
    fn test_parse_eibi_csv() {
        let rows = parse_eibi_csv(SAMPLE);
        assert_eq!(3, rows.len());

        let bbc = normalize(&rows[0]);
        assert_eq!(9410, bbc.frequency_khz);
        assert_eq!("0600", bbc.time_on);
        assert_eq!("0700", bbc.time_off);
        assert_eq!("Mo-Fr", bbc.days_raw);
        assert_eq!("G", bbc.itu);
        assert_eq!("BBC", bbc.station);
        assert_eq!("E", bbc.language);
        assert_eq!("Eu", bbc.target);
        assert_eq!("| 1 |  |", bbc.remarks);

        let delta = normalize(&rows[1]);
        assert_eq!("2300", delta.time_on);
        assert_eq!("0100", delta.time_off);
        assert_eq!("", delta.days_raw);
        assert_eq!("Radio; Delta", delta.station);
        assert_eq!("relay | 2", delta.remarks);

        let irregular = normalize(&rows[2]);
        assert_eq!(6070, irregular.frequency_khz);
        assert_eq!("", irregular.time_on);
        assert_eq!("", irregular.time_off);
        assert_eq!("", irregular.station);
    }

    #[test]
    fn test_frequency_column_search() {
        // leading junk cells are skipped over
        let rows = parse_eibi_csv("x;12;31000;7325;1200-1300;;;Station\n");
        assert_eq!(1, rows.len());
        let row = normalize(&rows[0]);
        assert_eq!(7325, row.frequency_khz);
        assert_eq!("1200", row.time_on);
        assert_eq!("", row.itu);
        assert_eq!("Station", row.station);

        assert!(parse_eibi_csv("5955.5;0600-0700\n").is_empty());
        assert!(parse_eibi_csv("").is_empty());
    }

    #[test]
    fn test_stray_quote_keeps_rows() {
        let text = "6070;0000-0100;;USA;WRMI 6\" relay;E;NAm\n\
            9410;0600-0700;Mo-Fr;G;BBC;E;Eu\n\
            7325;1200-1300;;USA;\"WRMI\" relay;E;NAm\n";
        let rows = parse_eibi_csv(text);
        assert_eq!(3, rows.len());
        assert_eq!("WRMI 6\" relay", rows[0].station);
        assert_eq!("E", rows[0].language);
        assert_eq!("BBC", rows[1].station);
        assert_eq!("WRMI relay", rows[2].station);
        assert_eq!("NAm", rows[2].target);
    }

    #[test]
    fn test_split_rows() {
        let rows = split_rows("a;\"b\"\"c\";d\r\n\r\n\"e\nf\";g", ';');
        assert_eq!(
            vec![
                vec!["a".to_owned(), "b\"c".to_owned(), "d".to_owned()],
                vec!["e\nf".to_owned(), "g".to_owned()],
            ],
            rows
        );
    }
}
