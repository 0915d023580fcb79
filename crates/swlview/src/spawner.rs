//! Delivers radio control commands through a child process

use std::ffi::OsString;
use std::io::{self, Write};
use std::process::{Child, ChildStdin, Command, Stdio};

use log::{debug, warn};

use swlsked::{Connector, Transport};

/// Spawns a child process for each connection
///
/// The child receives the connection target via the environment
/// and reads one command per line from its standard input. A
/// websocket pipe tool makes a suitable child.
#[derive(Clone, Debug)]
pub struct ChildConnector {
    cmd: OsString,
    args: Vec<OsString>,
}

impl ChildConnector {
    /// Connector which runs `cmd` with the given `args`
    pub fn new<C, A, B>(cmd: C, args: A) -> Self
    where
        C: Into<OsString>,
        B: Into<OsString>,
        A: IntoIterator<Item = B>,
    {
        Self {
            cmd: cmd.into(),
            args: args.into_iter().map(Into::into).collect(),
        }
    }
}

impl Connector for ChildConnector {
    type Transport = ChildTransport;

    fn connect(&self, host: &str, port: u16) -> io::Result<ChildTransport> {
        let mut child = Command::new(&self.cmd)
            .stdin(Stdio::piped())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit())
            .args(&self.args)
            .env(childenv::SWLVIEW_TCI_HOST, host)
            .env(childenv::SWLVIEW_TCI_PORT, port.to_string())
            .env(childenv::SWLVIEW_TCI_URL, format!("ws://{}:{}", host, port))
            .spawn()?;

        debug!("spawned child process PID {}", child.id());

        let stdin = match child.stdin.take() {
            Some(stdin) => stdin,
            None => {
                drop(child.kill());
                drop(child.wait());
                return Err(io::Error::new(
                    io::ErrorKind::BrokenPipe,
                    "unable to create pipe to child process",
                ));
            }
        };

        Ok(ChildTransport {
            child,
            stdin: Some(stdin),
        })
    }
}

/// A running child process
///
/// Closing the transport closes the child's standard input and
/// waits for it to exit.
#[derive(Debug)]
pub struct ChildTransport {
    child: Child,
    stdin: Option<ChildStdin>,
}

impl Transport for ChildTransport {
    fn send(&mut self, command: &str) -> io::Result<()> {
        let stdin = self
            .stdin
            .as_mut()
            .ok_or_else(|| io::Error::new(io::ErrorKind::BrokenPipe, "child input is closed"))?;
        writeln!(stdin, "{}", command)?;
        stdin.flush()
    }

    fn close(&mut self) -> io::Result<()> {
        if self.stdin.take().is_none() {
            return Ok(());
        }

        let exit = self.child.wait()?;
        if exit.success() {
            debug!("child process exited successfully");
        } else {
            warn!(
                "child process exited abnormally with status {}",
                exit.code().unwrap_or(1)
            );
        }
        Ok(())
    }
}

impl Drop for ChildTransport {
    fn drop(&mut self) {
        if let Err(err) = self.close() {
            warn!("unable to await child process exit: {}", err);
        }
    }
}

/// Prints each command to standard output
///
/// Used when there is no child process to deliver commands.
/// Nothing is printed when `quiet`.
#[derive(Clone, Copy, Debug, Default)]
pub struct StdoutConnector {
    quiet: bool,
}

impl StdoutConnector {
    pub fn new(quiet: bool) -> Self {
        Self { quiet }
    }
}

/// See [`StdoutConnector`]
#[derive(Debug)]
pub struct StdoutTransport {
    quiet: bool,
}

impl StdoutTransport {
    fn write_command<W: Write>(&self, out: &mut W, command: &str) -> io::Result<()> {
        if self.quiet {
            debug!("radio command (quiet): {}", command);
            return Ok(());
        }
        writeln!(out, "{}", command)?;
        out.flush()
    }
}

impl Connector for StdoutConnector {
    type Transport = StdoutTransport;

    fn connect(&self, host: &str, port: u16) -> io::Result<StdoutTransport> {
        debug!("printing radio commands for ws://{}:{}", host, port);
        Ok(StdoutTransport { quiet: self.quiet })
    }
}

impl Transport for StdoutTransport {
    fn send(&mut self, command: &str) -> io::Result<()> {
        self.write_command(&mut io::stdout().lock(), command)
    }
}

mod childenv {
    /// Radio control host
    ///
    /// The `--tci-host`, or the host from the settings file.
    pub const SWLVIEW_TCI_HOST: &str = "SWLVIEW_TCI_HOST";

    /// Radio control port
    pub const SWLVIEW_TCI_PORT: &str = "SWLVIEW_TCI_PORT";

    /// Radio control websocket URL
    ///
    /// ```txt
    /// ws://127.0.0.1:40001
    /// ```
    pub const SWLVIEW_TCI_URL: &str = "SWLVIEW_TCI_URL";
}
