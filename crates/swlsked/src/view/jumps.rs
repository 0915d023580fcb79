//! Quick-navigation markers across the frequency range

use serde::Serialize;

use crate::canonical::CanonicalEntry;
use crate::clock::format_mhz;

/// A marker for one segment of the frequency range
///
/// The distinct positive frequencies of the schedule are split
/// into roughly equal segments. Each marker names the first
/// frequency in its segment and the range the segment covers.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct FrequencyJump {
    /// Segment number, starting at 1
    pub index: usize,

    /// Position of the first frequency among all frequencies,
    /// from 0.0 (lowest) to 1.0 (highest)
    pub ratio: f64,

    /// First frequency of the segment, in kHz
    pub start_khz: u32,

    /// Like "`5.955 MHz`"
    pub start_label: String,

    /// Like "`5.955-7.325 MHz`"
    pub label: String,
}

/// Build `segments` frequency jump markers
///
/// Returns nothing if there are no positive frequencies or if
/// fewer than two segments are requested. When there are fewer
/// distinct frequencies than segments, some markers repeat.
///
/// ```
/// use swlsked::{frequency_jumps, merge_entries, RawEntry};
///
/// let raw: Vec<RawEntry> = (1..=25)
///     .map(|khz| RawEntry::new(khz, "0000", "0100", ""))
///     .collect();
/// let jumps = frequency_jumps(&merge_entries(&raw), 10);
/// assert_eq!(10, jumps.len());
/// assert_eq!(1, jumps[0].start_khz);
/// assert_eq!("0.001-0.002 MHz", jumps[0].label);
/// ```
pub fn frequency_jumps(entries: &[CanonicalEntry], segments: usize) -> Vec<FrequencyJump> {
    let mut freqs: Vec<u32> = entries
        .iter()
        .map(|e| e.frequency_khz())
        .filter(|&f| f > 0)
        .collect();
    freqs.sort_unstable();
    freqs.dedup();

    if freqs.is_empty() || segments <= 1 {
        return vec![];
    }

    let n = freqs.len();
    let last = n - 1;
    (0..segments)
        .map(|i| {
            let start_idx = usize::min(last, i * n / segments);
            let end_pos = ((i + 1) * n) as f64 / segments as f64 - 1.0;
            let end_idx = usize::min(last, end_pos.max(0.0) as usize);

            let start = freqs[start_idx];
            let end = freqs[end_idx];
            FrequencyJump {
                index: i + 1,
                ratio: start_idx as f64 / usize::max(1, last) as f64,
                start_khz: start,
                start_label: format_mhz(start),
                label: format!(
                    "{:.3}-{:.3} MHz",
                    start as f64 / 1000.0,
                    end as f64 / 1000.0
                ),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    use assert_approx_eq::assert_approx_eq;

    use crate::entry::RawEntry;
    use crate::merge::merge_entries;

    fn schedule<I: IntoIterator<Item = u32>>(freqs: I) -> Vec<CanonicalEntry> {
        let raw: Vec<RawEntry> = freqs
            .into_iter()
            .map(|khz| RawEntry::new(khz, "0000", "0100", ""))
            .collect();
        merge_entries(&raw)
    }

    #[test]
    fn test_jumps_even_split() {
        let jumps = frequency_jumps(&schedule(1..=25), 10);
        assert_eq!(10, jumps.len());

        let starts: Vec<u32> = jumps.iter().map(|j| j.start_khz).collect();
        assert_eq!(vec![1, 3, 6, 8, 11, 13, 16, 18, 21, 23], starts);

        let indices: Vec<usize> = jumps.iter().map(|j| j.index).collect();
        assert_eq!((1..=10).collect::<Vec<_>>(), indices);

        assert_approx_eq!(0.0, jumps[0].ratio);
        assert_approx_eq!(22.0 / 24.0, jumps[9].ratio);
        assert_eq!("0.023-0.025 MHz", jumps[9].label);
        assert_eq!("0.001 MHz", jumps[0].start_label);
    }

    #[test]
    fn test_jumps_few_frequencies() {
        let jumps = frequency_jumps(&schedule([9410, 5955, 5955]), 10);
        assert_eq!(10, jumps.len());
        for jump in &jumps[0..5] {
            assert_eq!(5955, jump.start_khz);
            assert_eq!("5.955-5.955 MHz", jump.label);
        }
        assert_eq!(9410, jumps[9].start_khz);
        assert_approx_eq!(1.0, jumps[9].ratio);

        let jumps = frequency_jumps(&schedule([7325]), 3);
        assert_eq!(3, jumps.len());
        assert!(jumps.iter().all(|j| j.start_khz == 7325 && j.ratio == 0.0));
    }

    #[test]
    fn test_jumps_degenerate() {
        assert!(frequency_jumps(&schedule([]), 10).is_empty());
        assert!(frequency_jumps(&schedule([0, 0]), 10).is_empty());
        assert!(frequency_jumps(&schedule(1..=25), 1).is_empty());
        assert!(frequency_jumps(&schedule(1..=25), 0).is_empty());
    }
}
