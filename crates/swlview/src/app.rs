//! Program logic
//!
//! The program has two modes:
//!
//! 1. **Show**: read a schedule, merge it, mark what is on the
//!    air, and print one view of it.
//!
//! 2. **Tune** (`--tune`): send radio control commands which
//!    tune the receiver and, optionally, place a spot.

use std::io::{self, BufRead, Read, Write};
use std::path::Path;

use anyhow::Context;
use chrono::{DateTime, Utc};
use log::{debug, info};

use swlsked::{
    annotate_liveness, merge_entries, parse_eibi_csv, CanonicalEntry, Connector, ScheduleReport,
    ScheduleSnapshot, ScheduleViewBuilder, TciClient, ViewMode, ViewProjection,
};

use crate::cli::{Args, InputFormat};
use crate::settings::Settings;

/// Marker for broadcasts on the air
const LIVE: &str = "*";

/// Read a schedule from `input`
///
/// CSV input is read as an EiBi schedule and named after the
/// `--file`.
pub fn load_snapshot<R: BufRead>(args: &Args, mut input: R) -> anyhow::Result<ScheduleSnapshot> {
    match args.input_format() {
        InputFormat::Csv => {
            let mut text = String::new();
            input
                .read_to_string(&mut text)
                .context("Unable to read EiBi schedule")?;
            let mut snapshot = ScheduleSnapshot::new(parse_eibi_csv(&text));
            if !args.input_is_stdin() {
                snapshot.source_file = Path::new(&args.file)
                    .file_name()
                    .map(|name| name.to_string_lossy().into_owned());
            }
            Ok(snapshot)
        }
        _ => ScheduleSnapshot::from_reader(input).context("Unable to load schedule snapshot"),
    }
}

/// Show the schedule
///
/// Liveness is evaluated at `now`. The report is written to `out`
/// as JSON or as text.
pub fn show<W: Write>(
    args: &Args,
    snapshot: &ScheduleSnapshot,
    now: &DateTime<Utc>,
    out: &mut W,
) -> anyhow::Result<()> {
    let mut entries = merge_entries(&snapshot.entries);
    annotate_liveness(&mut entries, now);

    let (left, right, top, bottom) = args.plot_margins();
    let view = ScheduleViewBuilder::new()
        .with_plot_size(args.plot_width, args.plot_height)
        .with_plot_margins(left, right, top, bottom)
        .with_jump_segments(args.segments)
        .build();

    let mode = ViewMode::from_name(args.view.as_str());
    info!("showing {} view at {}", mode, now.format("%Y-%m-%d %H:%M UTC"));

    let report = ScheduleReport::new(&view, snapshot, &entries, now, mode);
    if args.json {
        serde_json::to_writer_pretty(&mut *out, &report).context("Unable to write JSON")?;
        writeln!(out)?;
    } else {
        render(&report, out)?;
    }
    Ok(())
}

/// Tune the receiver
///
/// Connects with the given `connector`, tunes to `frequency_khz`,
/// and then places a spot if the settings allow it. Progress is
/// written to `out`.
pub fn tune<C, W>(
    args: &Args,
    settings: &Settings,
    connector: C,
    frequency_khz: f64,
    out: &mut W,
) -> anyhow::Result<()>
where
    C: Connector,
    W: Write,
{
    let tci = &settings.tci;
    let client = TciClient::new(connector);
    client.configure(&tci.host, tci.port, Some(tci.profile()));
    debug!("radio control: {:?}", client);

    let connected = client.connect()?;
    report_line(args, out, &connected)?;

    let mode = match tci.mode.trim() {
        "" => None,
        mode => Some(mode),
    };
    let sent = client.tune(frequency_khz, mode)?;
    report_line(args, out, &format!("Tuned: {}", sent))?;

    if tci.send_spot {
        let station = args.station.as_deref().unwrap_or("");
        let sent = client.send_spot(
            station,
            frequency_khz,
            mode.unwrap_or(""),
            &tci.spot_options(),
        )?;
        report_line(args, out, &format!("Spot: {}", sent))?;
    } else {
        debug!("radio control: not placing a spot");
    }

    client.disconnect();
    Ok(())
}

fn report_line<W: Write>(args: &Args, out: &mut W, line: &str) -> io::Result<()> {
    if args.quiet {
        Ok(())
    } else {
        writeln!(out, "{}", line)
    }
}

/// Print a report as text
fn render<W: Write>(report: &ScheduleReport<'_>, out: &mut W) -> io::Result<()> {
    match (report.source_file, &report.fetched_at_display) {
        (Some(src), Some(when)) => writeln!(out, "{} (fetched {})", src, when)?,
        (Some(src), None) => writeln!(out, "{}", src)?,
        (None, Some(when)) => writeln!(out, "Fetched {}", when)?,
        (None, None) => {}
    }
    writeln!(
        out,
        "{} broadcasts from {} rows, {} on the air at {} UTC",
        report.count, report.raw_count, report.live_count, report.now_utc_hhmm
    )?;

    match &report.projection {
        ViewProjection::Columns(columns) => {
            for col in columns {
                writeln!(out)?;
                writeln!(out, "{} {}", live_mark(col.is_live_now), col.time_days_display)?;
                for entry in &col.entries {
                    writeln!(
                        out,
                        "  {} {:>6}  {}",
                        live_mark(entry.is_live_now()),
                        entry.frequency_khz(),
                        describe(entry)
                    )?;
                }
            }
        }
        ViewProjection::FrequencyColumns(columns) => {
            for col in columns {
                writeln!(out)?;
                writeln!(out, "{} {}", live_mark(col.is_live_now), col.frequency_display)?;
                for entry in &col.entries {
                    writeln!(
                        out,
                        "  {} {}  {}",
                        live_mark(entry.is_live_now()),
                        entry.time_days_display(),
                        describe(entry)
                    )?;
                }
            }
        }
        ViewProjection::Grid(grid) => {
            for row in &grid.rows {
                writeln!(out)?;
                writeln!(out, "{}", row.day_label)?;
                for (slot, cell) in grid.time_slots.iter().zip(&row.cells) {
                    if cell.entries.is_empty() {
                        continue;
                    }
                    let stations: Vec<String> = cell
                        .entries
                        .iter()
                        .map(|e| format!("{} {}", e.frequency_khz(), e.station()))
                        .collect();
                    writeln!(
                        out,
                        "  {} {}  {}",
                        live_mark(cell.is_live_now),
                        slot.display,
                        stations.join(", ")
                    )?;
                }
            }
        }
        ViewProjection::Scatter(plot) => {
            writeln!(
                out,
                "{}x{} plot, {}-{} kHz",
                plot.width, plot.height, plot.min_freq, plot.max_freq
            )?;
            for pt in &plot.points {
                writeln!(
                    out,
                    "  {} ({:>7.2}, {:>6.2})  {}  {}  {}",
                    live_mark(pt.is_live_now),
                    pt.x,
                    pt.y,
                    pt.freq_display,
                    pt.time_display,
                    pt.station
                )?;
            }
        }
    }

    if !report.freq_jumps.is_empty() {
        let jumps: Vec<&str> = report
            .freq_jumps
            .iter()
            .map(|j| j.start_label.as_str())
            .collect();
        writeln!(out)?;
        writeln!(out, "Jump to: {}", jumps.join(" "))?;
    }
    Ok(())
}

fn live_mark(live: bool) -> &'static str {
    if live {
        LIVE
    } else {
        " "
    }
}

// "🇬🇧 BBC  E | Eu  remarks"
fn describe(entry: &CanonicalEntry) -> String {
    let mut parts = vec![format!("{} {}", entry.flag(), entry.station())];
    if !entry.lang_target_display().is_empty() {
        parts.push(entry.lang_target_display().to_owned());
    }
    if !entry.remarks().is_empty() {
        parts.push(entry.remarks().to_owned());
    }
    parts.join("  ")
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::sync::{Arc, Mutex};

    use chrono::TimeZone;
    use clap::Parser;
    use swlsked::Transport;

    const SNAPSHOT: &str = r#"{
        "source_file": "sked-a25.csv",
        "fetched_at_utc": "2025-06-01T12:00:00+00:00",
        "entries": [
            {"frequency_khz": 9410, "time_on": "0600", "time_off": "0700", "days": "Mo-Fr",
             "itu": "G", "station": "BBC", "language": "E", "target": "Eu"},
            {"frequency_khz": "9410", "time_on": "0600", "time_off": "0700", "days": "Sa",
             "itu": "G", "station": "BBC", "language": "E", "target": "Eu"},
            {"frequency_khz": 5955, "time_on": "2300", "time_off": "0100", "days": "",
             "itu": "HOL", "station": "Delta"}
        ]
    }"#;

    fn args(extra: &[&str]) -> Args {
        let mut argv = vec!["swlview"];
        argv.extend_from_slice(extra);
        Args::try_parse_from(argv).unwrap()
    }

    fn monday_morning() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2021, 3, 1, 6, 30, 0).unwrap()
    }

    fn show_text(extra: &[&str]) -> String {
        let args = args(extra);
        let snapshot = load_snapshot(&args, SNAPSHOT.as_bytes()).unwrap();
        let mut out = Vec::new();
        show(&args, &snapshot, &monday_morning(), &mut out).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn test_load_snapshot() {
        let snapshot = load_snapshot(&args(&[]), SNAPSHOT.as_bytes()).unwrap();
        assert_eq!(3, snapshot.entries.len());
        assert_eq!(Some("sked-a25.csv"), snapshot.source_file.as_deref());

        let csv = "9410;0600-0700;Mo-Fr;G;BBC;E;Eu\n";
        let snapshot = load_snapshot(&args(&["-f", "/tmp/sked-a25.csv"]), csv.as_bytes()).unwrap();
        assert_eq!(1, snapshot.entries.len());
        assert_eq!(Some("sked-a25.csv"), snapshot.source_file.as_deref());

        let snapshot = load_snapshot(&args(&["--format", "csv"]), csv.as_bytes()).unwrap();
        assert_eq!(None, snapshot.source_file);

        assert!(load_snapshot(&args(&[]), "not json".as_bytes()).is_err());
    }

    #[test]
    fn test_show_columns() {
        let text = show_text(&[]);
        assert!(text.starts_with("sked-a25.csv (fetched 2025-06-01 12:00 UTC)\n"));
        assert!(text.contains("2 broadcasts from 3 rows, 1 on the air at 06:30 UTC"));
        assert!(text.contains("* 06:00-07:00 | Mon,Tue,Wed,Thu,Fri,Sat"));
        assert!(text.contains("BBC  E | Eu"));
        assert!(text.contains("Jump to: 5.955 MHz"));
    }

    #[test]
    fn test_show_other_views() {
        let text = show_text(&["--view", "freqcolumns"]);
        assert!(text.contains("* 9.410 MHz"));
        assert!(text.contains("  5.955 MHz"));

        let text = show_text(&["--view", "grid"]);
        assert!(text.contains("\nMon\n"));
        assert!(text.contains("* 06:00-07:00  9410 BBC"));
        assert!(text.contains("23:00-01:00  5955 Delta"));

        let text = show_text(&["--view", "scatter"]);
        assert!(text.contains("1500x900 plot, 5955-9410 kHz"));

        // unknown views fall back to columns
        assert_eq!(show_text(&[]), show_text(&["--view", "sideways"]));
    }

    #[test]
    fn test_show_json() {
        let text = show_text(&["--json", "--view", "grid", "--segments", "2"]);
        let json: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert_eq!("grid", json["view_mode"]);
        assert_eq!("grid", json["projection"]["view"]);
        assert_eq!(7, json["projection"]["data"]["rows"].as_array().unwrap().len());
        assert_eq!(2, json["freq_jumps"].as_array().unwrap().len());
        assert_eq!(1, json["live_count"]);
    }

    #[derive(Clone, Default)]
    struct Recorder {
        sent: Arc<Mutex<Vec<String>>>,
    }

    impl Connector for Recorder {
        type Transport = Recorder;

        fn connect(&self, _host: &str, _port: u16) -> io::Result<Recorder> {
            Ok(self.clone())
        }
    }

    impl Transport for Recorder {
        fn send(&mut self, command: &str) -> io::Result<()> {
            self.sent.lock().unwrap().push(command.to_owned());
            Ok(())
        }
    }

    #[test]
    fn test_tune() {
        let args = args(&["--tune", "9410", "--station", "BBC"]);
        let mut settings = Settings::default();
        settings.apply_args(&args);

        let recorder = Recorder::default();
        let mut out = Vec::new();
        tune(&args, &settings, recorder.clone(), 9410.0, &mut out).unwrap();

        let sent = recorder.sent.lock().unwrap();
        assert_eq!("vfo:0,0,9410000;", sent[0]);
        assert_eq!("modulation:0,0,am;", sent[1]);
        assert!(sent[3].starts_with("SPOT:BBC,AM,9410000,20381,[json]"));

        let out = String::from_utf8(out).unwrap();
        assert!(out.starts_with("Connected to ws://127.0.0.1:40001\n"));
        assert!(out.contains("Spot: SPOT:BBC"));
    }

    #[test]
    fn test_tune_quiet_no_spot() {
        let args = args(&["-q", "--tune", "7325", "--no-spot", "--mode", "usb"]);
        let mut settings = Settings::default();
        settings.apply_args(&args);

        let recorder = Recorder::default();
        let mut out = Vec::new();
        tune(&args, &settings, recorder.clone(), 7325.0, &mut out).unwrap();

        assert_eq!(
            vec!["vfo:0,0,7325000;", "modulation:0,0,usb;", "modulation:0,usb;"],
            *recorder.sent.lock().unwrap()
        );
        assert!(out.is_empty());
    }
}
