//! Frequency × start time scatter plot

use serde::Serialize;

use crate::builder::ScheduleViewBuilder;
use crate::canonical::CanonicalEntry;
use crate::clock::{format_mhz, parse_hhmm};

// Frequency axis range when there is nothing to plot
const EMPTY_MIN_FREQ_KHZ: u32 = 1000;
const EMPTY_MAX_FREQ_KHZ: u32 = 30000;

// Start time which maps to the bottom of the plot
const LAST_MINUTE: f64 = 1439.0;

/// Broadcasts placed on a frequency × start time canvas
///
/// Frequency increases left to right, and start time increases
/// top to bottom. Coordinates are in canvas units, with the
/// origin at the top left, and are rounded to two decimal places.
///
/// Entries with no positive frequency, or no valid start time,
/// are not plotted.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ScatterPlot<'a> {
    pub width: u32,
    pub height: u32,
    pub left: u32,
    pub top: u32,
    pub right: u32,
    pub bottom: u32,

    /// Frequency at the left margin, in kHz
    pub min_freq: u32,

    /// Frequency at the right margin, in kHz
    pub max_freq: u32,

    pub points: Vec<ScatterPoint<'a>>,
}

/// One plotted broadcast
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ScatterPoint<'a> {
    pub x: f64,
    pub y: f64,
    pub freq_khz: u32,

    /// Like "`9.410 MHz`"
    pub freq_display: String,

    pub station: &'a str,

    /// Time range and days
    pub time_display: &'a str,

    /// Language and target
    pub lang_target: &'a str,

    pub remarks: &'a str,
    pub flag: &'a str,
    pub is_live_now: bool,
}

pub(super) fn scatter_plot<'a>(
    entries: &'a [CanonicalEntry],
    config: &ScheduleViewBuilder,
) -> ScatterPlot<'a> {
    let (width, height) = config.plot_size();
    let (left, right, top, bottom) = config.plot_margins();

    let freqs = entries
        .iter()
        .map(|e| e.frequency_khz())
        .filter(|&f| f > 0);
    let min_freq = freqs.clone().min().unwrap_or(EMPTY_MIN_FREQ_KHZ);
    let mut max_freq = freqs.max().unwrap_or(EMPTY_MAX_FREQ_KHZ);
    if min_freq == max_freq {
        max_freq = min_freq + 1;
    }

    let usable_w = width.saturating_sub(left + right) as f64;
    let usable_h = height.saturating_sub(top + bottom) as f64;
    let span = (max_freq - min_freq) as f64;

    let points = entries
        .iter()
        .filter_map(|entry| {
            let freq = entry.frequency_khz();
            if freq == 0 {
                return None;
            }
            let start = parse_hhmm(entry.time_on())?;

            let x = left as f64 + ((freq - min_freq) as f64 / span) * usable_w;
            let y = top as f64 + (start as f64 / LAST_MINUTE) * usable_h;
            Some(ScatterPoint {
                x: round2(x),
                y: round2(y),
                freq_khz: freq,
                freq_display: format_mhz(freq),
                station: entry.station(),
                time_display: entry.time_days_display(),
                lang_target: entry.lang_target_display(),
                remarks: entry.remarks(),
                flag: entry.flag(),
                is_live_now: entry.is_live_now(),
            })
        })
        .collect();

    ScatterPlot {
        width,
        height,
        left,
        top,
        right,
        bottom,
        min_freq,
        max_freq,
        points,
    }
}

fn round2(val: f64) -> f64 {
    (val * 100.0).round() / 100.0
}
