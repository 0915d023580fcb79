use std::io;
use std::path::PathBuf;

use anyhow::{anyhow, Context};
use chrono::Utc;
use clap::Parser;
use log::{info, LevelFilter};

mod app;
mod cli;
mod settings;
mod spawner;

use cli::{Args, CliError};
use settings::Settings;
use spawner::{ChildConnector, StdoutConnector};

fn main() {
    match swlview() {
        Ok(()) => {}
        Err(cli_error) => cli_error.exit(),
    }
}

fn swlview() -> Result<(), CliError> {
    let args = Args::try_parse()?;
    log_setup(&args);

    let settings_path = settings_path(&args);
    let mut settings = match &settings_path {
        Some(path) => Settings::load(path),
        None => Settings::default(),
    };
    settings.apply_args(&args);

    if args.save_settings {
        let path = settings_path
            .as_deref()
            .ok_or_else(|| anyhow!("no configuration directory; use --config to name a file"))?;
        settings.save(path)?;
        info!("saved settings to \"{}\"", path.display());
    }

    let stdout = io::stdout();
    let mut out = stdout.lock();

    if let Some(frequency_khz) = args.tune {
        match args.child.split_first() {
            Some((cmd, cmd_args)) => app::tune(
                &args,
                &settings,
                ChildConnector::new(cmd, cmd_args),
                frequency_khz,
                &mut out,
            )?,
            None => app::tune(
                &args,
                &settings,
                StdoutConnector::new(args.quiet),
                frequency_khz,
                &mut out,
            )?,
        }
        return Ok(());
    }

    let stdin = io::stdin();
    let inbuf = open_schedule(&args, stdin.lock())?;
    let snapshot = app::load_snapshot(&args, inbuf)?;

    let now = args.at.unwrap_or_else(Utc::now);
    if args.quiet {
        app::show(&args, &snapshot, &now, &mut io::sink())?;
    } else {
        app::show(&args, &snapshot, &now, &mut out)?;
    }

    Ok(())
}

fn settings_path(args: &Args) -> Option<PathBuf> {
    args.config.clone().or_else(Settings::default_path)
}

// Logs from both crates go to stderr. `RUST_LOG`, when set,
// replaces the -v count.
fn log_setup(args: &Args) {
    if args.quiet {
        return;
    }

    if std::env::var_os("RUST_LOG").is_some() {
        pretty_env_logger::init();
        return;
    }

    let level = verbosity(args.verbose);
    pretty_env_logger::formatted_builder()
        .filter_module("swlsked", level)
        .filter_module("swlview", level)
        .init();
}

fn verbosity(count: u8) -> LevelFilter {
    match count {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        2 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    }
}

// Open the schedule named by --file. A schedule typed at the
// terminal is almost certainly a mistake.
fn open_schedule<'stdin>(
    args: &Args,
    stdin: io::StdinLock<'stdin>,
) -> anyhow::Result<Box<dyn io::BufRead + 'stdin>> {
    if !args.input_is_stdin() {
        info!("schedule file: \"{}\"", args.file);
        let file = std::fs::File::open(&args.file)
            .with_context(|| format!("Unable to open schedule \"{}\"", args.file))?;
        return Ok(Box::new(io::BufReader::new(file)));
    }

    if stdin_is_terminal(&io::stdin()) {
        return Err(anyhow!(
            "no schedule on standard input.

Pipe a JSON snapshot or an EiBi CSV into swlview, or name one
with --file. Use --tune to control the radio without a schedule."
        ));
    }

    info!("schedule from standard input");
    Ok(Box::new(stdin))
}

#[cfg(not(target_os = "windows"))]
fn stdin_is_terminal<S: std::os::fd::AsRawFd>(stream: &S) -> bool {
    terminal_size::terminal_size_using_fd(stream.as_raw_fd()).is_some()
}

#[cfg(target_os = "windows")]
fn stdin_is_terminal<S: std::os::windows::io::AsRawHandle>(stream: &S) -> bool {
    terminal_size::terminal_size_using_handle(stream.as_raw_handle()).is_some()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_verbosity() {
        assert_eq!(LevelFilter::Warn, verbosity(0));
        assert_eq!(LevelFilter::Info, verbosity(1));
        assert_eq!(LevelFilter::Debug, verbosity(2));
        assert_eq!(LevelFilter::Trace, verbosity(3));
        assert_eq!(LevelFilter::Trace, verbosity(9));
    }
}
