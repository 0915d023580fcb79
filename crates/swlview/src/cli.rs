use std::fmt::Display;
use std::path::PathBuf;

use chrono::{DateTime, Utc};
use clap::{error::ErrorKind, value_parser, CommandFactory, Parser, ValueEnum};
use swlsked::TciError;

/// Standard input filename
const STDIN_FILE: &str = "-";

const USAGE_SHORT: &str = r#"
This program reads a shortwave broadcast schedule, merges duplicate rows, marks the broadcasts which are on the air, and prints the schedule in the chosen --view.

See --help for more details.
"#;

const USAGE_LONG: &str = r#"
This program reads a shortwave broadcast schedule, merges duplicate rows, marks the broadcasts which are on the air, and prints the schedule in the chosen --view.

The schedule may be a JSON snapshot, as written by the schedule fetcher, or an EiBi semicolon-delimited file

    swlview --file sked-a25.csv --view grid

Use --json for machine-readable output, and --at to see what is on the air at another time (UTC).

With --tune, the program instead sends radio control (TCI) commands which tune your receiver and place a spot. Arguments which follow "--" are used to spawn a child process which delivers the commands. Each command is written to the child's standard input on its own line. For example, with a websocket pipe tool:

    swlview --tune 9410 --station BBC -- \
        sh -c 'websocat "$SWLVIEW_TCI_URL"'

The child process receives the following additional environment variables:

  SWLVIEW_TCI_HOST="127.0.0.1"
  SWLVIEW_TCI_PORT="40001"
  SWLVIEW_TCI_URL="ws://127.0.0.1:40001"

Without a child process, the commands are printed to standard output.

Radio control settings are read from the --config file. Use --save-settings to store the current settings there.
"#;

const PLOT: &str = "Plot Options";
const RADIO: &str = "Radio Control Options";

/// Schedule input format
#[derive(ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum InputFormat {
    /// EiBi CSV for `.csv` files, otherwise JSON
    #[default]
    Auto,

    /// JSON schedule snapshot
    Json,

    /// EiBi semicolon-delimited schedule
    Csv,
}

/// Top-level program arguments
#[derive(Parser, Clone, Debug)]
#[command(version)]
#[command(about, long_about = None)]
#[command(after_help = USAGE_SHORT, after_long_help = USAGE_LONG)]
#[command(max_term_width = 100)]
pub struct Args {
    /// Verbosity level (-vvv for more)
    #[arg(short, long, default_value_t = 0, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Print NOTHING
    #[arg(short, long)]
    pub quiet: bool,

    /// Schedule file (or "-" for stdin)
    #[arg(short, long, default_value_t = STDIN_FILE.to_string())]
    pub file: String,

    /// Schedule file format
    #[arg(long, value_enum, default_value_t = InputFormat::Auto)]
    pub format: InputFormat,

    /// Layout: columns, freqcolumns, grid, or freqgrid
    ///
    /// Unrecognized layouts show columns.
    #[arg(long, default_value_t = String::from("columns"))]
    pub view: String,

    /// Evaluate liveness at this UTC time (RFC 3339)
    ///
    /// Defaults to the current time.
    #[arg(long, value_parser = parse_utc)]
    pub at: Option<DateTime<Utc>>,

    /// Print the report as JSON
    #[arg(long)]
    pub json: bool,

    /// Number of frequency jump markers
    #[arg(long, default_value_t = 10)]
    pub segments: usize,

    /// Frequency/time plot width
    #[arg(long, default_value_t = 1500)]
    #[arg(hide_short_help = true)]
    #[arg(help_heading = PLOT)]
    pub plot_width: u32,

    /// Frequency/time plot height
    #[arg(long, default_value_t = 900)]
    #[arg(hide_short_help = true)]
    #[arg(help_heading = PLOT)]
    pub plot_height: u32,

    /// Frequency/time plot margins: LEFT,RIGHT,TOP,BOTTOM
    #[arg(long, value_delimiter = ',', default_values_t = [70, 20, 20, 30])]
    #[arg(hide_short_help = true)]
    #[arg(help_heading = PLOT)]
    pub plot_margins: Vec<u32>,

    /// Tune the receiver to this frequency (kHz) and exit
    #[arg(long, value_name = "KHZ")]
    #[arg(value_parser = value_parser!(f64))]
    #[arg(help_heading = RADIO)]
    pub tune: Option<f64>,

    /// Demodulator mode for --tune, like "am" or "usb"
    #[arg(long)]
    #[arg(help_heading = RADIO)]
    pub mode: Option<String>,

    /// Station name for the spot placed by --tune
    #[arg(long)]
    #[arg(help_heading = RADIO)]
    pub station: Option<String>,

    /// Do not place a spot after --tune
    #[arg(long)]
    #[arg(help_heading = RADIO)]
    pub no_spot: bool,

    /// Radio control host
    #[arg(long)]
    #[arg(help_heading = RADIO)]
    pub tci_host: Option<String>,

    /// Radio control port
    #[arg(long)]
    #[arg(help_heading = RADIO)]
    pub tci_port: Option<u16>,

    /// Radio control profile: thetis or expert
    #[arg(long)]
    #[arg(help_heading = RADIO)]
    pub tci_profile: Option<String>,

    /// Settings file
    ///
    /// Defaults to swlview/config.toml in your configuration
    /// directory.
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Save the radio control settings to the --config file
    #[arg(long)]
    pub save_settings: bool,

    /// Spawn child process to deliver radio commands. Optional.
    ///
    /// Arguments are provided VERBATIM to the child process
    /// without shell interpretation.
    #[arg(last = true)]
    pub child: Vec<String>,
}

impl Args {
    /// Return true if the user requests input from stdin
    pub fn input_is_stdin(&self) -> bool {
        self.file == STDIN_FILE
    }

    /// Resolve the input format
    ///
    /// `Auto` picks CSV for files named `*.csv`.
    pub fn input_format(&self) -> InputFormat {
        match self.format {
            InputFormat::Auto if self.file.to_ascii_lowercase().ends_with(".csv") => {
                InputFormat::Csv
            }
            InputFormat::Auto => InputFormat::Json,
            fmt => fmt,
        }
    }

    /// Plot margins (left, right, top, bottom)
    pub fn plot_margins(&self) -> (u32, u32, u32, u32) {
        let m = |i: usize| self.plot_margins.get(i).copied().unwrap_or(0);
        (m(0), m(1), m(2), m(3))
    }
}

fn parse_utc(s: &str) -> Result<DateTime<Utc>, String> {
    DateTime::parse_from_rfc3339(s.trim())
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| format!("expected a time like 2025-06-01T23:30:00Z: {}", e))
}

/// Exit status when the radio could not be controlled
pub const EXIT_RADIO: i32 = 3;

/// Exit status for any other failure
pub const EXIT_FAILURE: i32 = 1;

/// Why `swlview` stopped, and the status it exits with
///
/// Radio control failures exit with [`EXIT_RADIO`], so scripts
/// can tell them apart from an unreadable schedule. Argument
/// errors keep clap's own status.
#[derive(Debug)]
pub struct CliError {
    cause: anyhow::Error,
    status: i32,
}

impl CliError {
    pub fn new(cause: anyhow::Error, status: i32) -> CliError {
        CliError { cause, status }
    }

    /// Status passed to the shell
    pub fn status(&self) -> i32 {
        self.status
    }

    /// Write the failure to standard error
    ///
    /// Argument errors, `--help`, and `--version` come from clap
    /// and are shown as clap formats them. The rest are shown in
    /// clap's error style, with their context chain.
    pub fn report(&self) -> std::io::Result<()> {
        match self.cause.downcast_ref::<clap::Error>() {
            Some(usage) => usage.print(),
            None => Args::command()
                .error(ErrorKind::Format, self.to_string())
                .print(),
        }
    }

    /// Report and exit
    pub fn exit(&self) -> ! {
        drop(self.report());
        std::process::exit(self.status);
    }
}

impl Display for CliError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:#}", self.cause)
    }
}

impl std::error::Error for CliError {}

impl From<anyhow::Error> for CliError {
    fn from(cause: anyhow::Error) -> CliError {
        let status = if cause.chain().any(|e| e.is::<TciError>()) {
            EXIT_RADIO
        } else {
            EXIT_FAILURE
        };
        CliError::new(cause, status)
    }
}

impl From<clap::Error> for CliError {
    fn from(usage: clap::Error) -> CliError {
        let status = usage.exit_code();
        CliError::new(usage.into(), status)
    }
}
