//! Radio control over the TCI text protocol
//!
//! TCI is a plain-text command protocol spoken by SDR control
//! software. Commands are short `name:arg,arg;` strings. This
//! module knows how to phrase tune, spot, and mute commands for
//! the supported [profiles](TciProfile) and how to deliver them
//! over a single reusable connection.
//!
//! The wire itself is abstracted by the [`Connector`] and
//! [`Transport`] traits, so the client can drive a websocket, a
//! child process, or a test double.

use std::fmt;
use std::io;
use std::str::FromStr;
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::thread;
use std::time::Duration;

use chrono::{DateTime, Utc};
use log::{debug, info, warn};
use serde::{Serialize, Serializer};
use thiserror::Error;

/// Default control host
pub const DEFAULT_HOST: &str = "127.0.0.1";

/// Default control port
pub const DEFAULT_PORT: u16 = 40001;

/// Default pause after each command
pub const DEFAULT_COMMAND_DELAY: Duration = Duration::from_millis(30);

// Spot colors, as the receiving software expects them
const THETIS_SPOT_COLOR: &str = "20381";
const EXPERT_SPOT_COLOR: &str = "16711680";
const SPOT_TEXT_COLOR: &str = "#FF00FF00";

const SPOTTER: &str = "SWL_View";
const DEFAULT_STATION_TAG: &str = "M0SWL";
const MAX_STATION_TAG_LEN: usize = 12;

/// Radio control software dialect
///
/// Different control programs accept slightly different command
/// sets. Unknown profile names select [`TciProfile::Thetis`].
///
/// ```
/// use swlsked::TciProfile;
///
/// assert_eq!(TciProfile::Expert, TciProfile::from_name("Expert"));
/// assert_eq!(TciProfile::Thetis, TciProfile::from_name("nonsense"));
/// ```
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, strum_macros::EnumIter, strum_macros::EnumString,
)]
#[strum(ascii_case_insensitive)]
pub enum TciProfile {
    /// Thetis, with JSON-tagged SWL spots
    #[default]
    #[strum(serialize = "thetis")]
    Thetis,

    /// ExpertSDR, with plain-text spots
    #[strum(serialize = "expert")]
    Expert,
}

impl TciProfile {
    /// Profile for a name, ignoring case; unknown names are `thetis`
    pub fn from_name(name: &str) -> Self {
        TciProfile::from_str(name.trim()).unwrap_or_default()
    }

    /// Profile name, like "`thetis`"
    pub fn as_str(&self) -> &'static str {
        match self {
            TciProfile::Thetis => "thetis",
            TciProfile::Expert => "expert",
        }
    }
}

impl fmt::Display for TciProfile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.as_str().fmt(f)
    }
}

impl Serialize for TciProfile {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(self.as_str())
    }
}

/// Radio control error
#[derive(Error, Debug)]
pub enum TciError {
    /// No connection is open
    #[error("Not connected")]
    NotConnected,

    /// Raw command was blank
    #[error("Empty command")]
    EmptyCommand,

    /// Unable to open the connection
    #[error("unable to connect to {url}: {source}")]
    Connect {
        url: String,
        #[source]
        source: io::Error,
    },

    /// The connection failed while sending; it has been closed
    #[error("send failed: {0}")]
    Send(#[source] io::Error),

    /// Unable to encode a spot payload
    #[error("unable to encode spot: {0}")]
    Payload(#[from] serde_json::Error),
}

/// An open command channel
pub trait Transport {
    /// Send one command
    fn send(&mut self, command: &str) -> io::Result<()>;

    /// Close the channel
    ///
    /// Errors are ignored by the client.
    fn close(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Opens command channels
pub trait Connector {
    type Transport: Transport;

    /// Open a channel to `host`:`port`
    fn connect(&self, host: &str, port: u16) -> io::Result<Self::Transport>;
}

/// Spot lifetime options
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
pub struct SpotOptions {
    /// How long a timed spot stays on the panadapter
    pub ttl_seconds: u32,

    /// Tag the spot as a timed SWL spot
    pub use_swl_timed_spot: bool,

    /// Keep the spot until it is removed by hand
    pub persistent_swl_spot: bool,
}

impl Default for SpotOptions {
    fn default() -> Self {
        Self {
            ttl_seconds: 120,
            use_swl_timed_spot: true,
            persistent_swl_spot: false,
        }
    }
}

/// Snapshot of the client state
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct TciStatus {
    pub connected: bool,
    pub host: String,
    pub port: u16,
    pub profile: TciProfile,

    /// Most recent failure, or empty
    pub last_error: String,

    /// Most recent successful command batch
    pub last_command: String,

    /// Last successfully-sent mute state
    pub muted: bool,
}

/// Radio control client
///
/// Holds at most one open connection, which is reused for every
/// command until it fails or is closed. All operations are
/// serialized by an internal lock, so a client may be shared
/// between threads.
///
/// Every send operation requires an open connection. Commands
/// are sent in sequence with a short pause after each. If any
/// send fails, the connection is dropped and the error recorded;
/// the caller must [`connect()`](TciClient::connect) again.
pub struct TciClient<C: Connector> {
    connector: C,
    command_delay: Duration,
    state: Mutex<ClientState<C::Transport>>,
}

struct ClientState<T> {
    transport: Option<T>,
    host: String,
    port: u16,
    profile: TciProfile,
    last_error: String,
    last_command: String,
    muted: bool,
}

impl<C: Connector> TciClient<C> {
    /// New, disconnected client with default settings
    pub fn new(connector: C) -> Self {
        Self {
            connector,
            command_delay: DEFAULT_COMMAND_DELAY,
            state: Mutex::new(ClientState {
                transport: None,
                host: DEFAULT_HOST.to_owned(),
                port: DEFAULT_PORT,
                profile: TciProfile::default(),
                last_error: String::new(),
                last_command: String::new(),
                muted: false,
            }),
        }
    }

    /// Change the pause after each command
    pub fn with_command_delay(mut self, delay: Duration) -> Self {
        self.command_delay = delay;
        self
    }

    /// Set the connection target and profile
    ///
    /// A blank `host` selects the default. Takes effect on the
    /// next [`connect()`](TciClient::connect).
    pub fn configure(&self, host: &str, port: u16, profile: Option<TciProfile>) {
        let mut state = self.lock();
        state.host = match host.trim() {
            "" => DEFAULT_HOST.to_owned(),
            host => host.to_owned(),
        };
        state.port = port;
        if let Some(profile) = profile {
            state.profile = profile;
        }
    }

    /// Current state
    pub fn status(&self) -> TciStatus {
        let state = self.lock();
        TciStatus {
            connected: state.transport.is_some(),
            host: state.host.clone(),
            port: state.port,
            profile: state.profile,
            last_error: state.last_error.clone(),
            last_command: state.last_command.clone(),
            muted: state.muted,
        }
    }

    /// Open the connection
    ///
    /// Any existing connection is closed first.
    pub fn connect(&self) -> Result<String, TciError> {
        let mut state = self.lock();
        close_locked(&mut *state);

        let url = format!("ws://{}:{}", state.host, state.port);
        match self.connector.connect(&state.host, state.port) {
            Ok(transport) => {
                info!("radio control: connected to {}", url);
                state.transport = Some(transport);
                state.last_error.clear();
                Ok(format!("Connected to {}", url))
            }
            Err(err) => {
                warn!("radio control: unable to connect to {}: {}", url, err);
                state.last_error = err.to_string();
                Err(TciError::Connect { url, source: err })
            }
        }
    }

    /// Close the connection, if open
    pub fn disconnect(&self) {
        let mut state = self.lock();
        close_locked(&mut *state);
    }

    /// Tune the receiver
    ///
    /// If a `mode` is given, the demodulator is also switched.
    /// Returns the commands sent.
    pub fn tune(&self, frequency_khz: f64, mode: Option<&str>) -> Result<String, TciError> {
        let profile = self.lock().profile;
        self.send_batch(&tune_commands(profile, frequency_khz, mode))
    }

    /// Place a spot on the receiver's panadapter
    pub fn send_spot(
        &self,
        station: &str,
        frequency_khz: f64,
        mode: &str,
        options: &SpotOptions,
    ) -> Result<String, TciError> {
        let profile = self.lock().profile;
        let commands = spot_commands(profile, station, frequency_khz, mode, options, &Utc::now())?;
        self.send_batch(&commands)
    }

    /// Send a hand-written command
    ///
    /// The command is trimmed and given a trailing `;` if it
    /// lacks one.
    pub fn send_raw(&self, command: &str) -> Result<String, TciError> {
        let command = raw_command(command)?;
        self.send_batch(&[command])
    }

    /// Mute or unmute the receiver
    ///
    /// Sends every mute dialect in use. The muted flag is only
    /// updated if all of them are sent.
    pub fn set_mute(&self, muted: bool) -> Result<String, TciError> {
        self.send_batch_then(&mute_commands(muted), |state| state.muted = muted)
    }

    fn send_batch(&self, commands: &[String]) -> Result<String, TciError> {
        self.send_batch_then(commands, |_| {})
    }

    // Sends every command, pausing after each one. On success,
    // `update` runs before the state lock is released.
    fn send_batch_then<F>(&self, commands: &[String], update: F) -> Result<String, TciError>
    where
        F: FnOnce(&mut ClientState<C::Transport>),
    {
        let mut state = self.lock();
        let transport = match state.transport.as_mut() {
            Some(transport) => transport,
            None => {
                state.last_error = TciError::NotConnected.to_string();
                return Err(TciError::NotConnected);
            }
        };

        let mut failure = None;
        for cmd in commands {
            debug!("radio control: sending \"{}\"", cmd);
            if let Err(err) = transport.send(cmd) {
                failure = Some(err);
                break;
            }
            if !self.command_delay.is_zero() {
                thread::sleep(self.command_delay);
            }
        }

        match failure {
            None => {
                state.last_command = commands.join(" ");
                state.last_error.clear();
                update(&mut *state);
                Ok(state.last_command.clone())
            }
            Some(err) => {
                warn!("radio control: send failed, disconnecting: {}", err);
                state.last_error = err.to_string();
                close_locked(&mut *state);
                Err(TciError::Send(err))
            }
        }
    }

    fn lock(&self) -> MutexGuard<'_, ClientState<C::Transport>> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl<C: Connector> fmt::Debug for TciClient<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TciClient")
            .field("command_delay", &self.command_delay)
            .field("status", &self.status())
            .finish()
    }
}

fn close_locked<T: Transport>(state: &mut ClientState<T>) {
    if let Some(mut transport) = state.transport.take() {
        if let Err(err) = transport.close() {
            debug!("radio control: error on close: {}", err);
        }
    }
}

/// Commands which tune to `frequency_khz`
///
/// ```
/// use swlsked::{tune_commands, TciProfile};
///
/// assert_eq!(
///     vec!["vfo:0,0,9410000;", "modulation:0,0,am;", "modulation:0,am;"],
///     tune_commands(TciProfile::Thetis, 9410.0, Some("AM"))
/// );
/// ```
pub fn tune_commands(profile: TciProfile, frequency_khz: f64, mode: Option<&str>) -> Vec<String> {
    let mut out = vec![format!("vfo:0,0,{};", khz_to_hz(frequency_khz))];

    let mode = mode.unwrap_or("").trim().to_lowercase();
    if !mode.is_empty() {
        out.push(format!("modulation:0,0,{};", mode));
        out.push(format!("modulation:0,{};", mode));
        if profile == TciProfile::Expert {
            out.push(format!("mode:0,0,{};", mode));
        }
    }
    out
}

/// Commands which place a spot
///
/// The station name is reduced to a short callsign-like tag.
/// Modes other than AM, FM, LSB, USB, SSB, and CW are spotted
/// as SSB.
pub fn spot_commands(
    profile: TciProfile,
    station: &str,
    frequency_khz: f64,
    mode: &str,
    options: &SpotOptions,
    now: &DateTime<Utc>,
) -> Result<Vec<String>, TciError> {
    let tag = station_tag(station);
    let hz = khz_to_hz(frequency_khz);

    let mode = mode.trim().to_lowercase();
    let spot_mode = match mode.as_str() {
        "am" | "fm" | "lsb" | "usb" | "ssb" | "cw" => mode.to_uppercase(),
        _ => "SSB".to_owned(),
    };
    let comment = format!("SWL schedule {}", if mode.is_empty() { "am" } else { mode.as_str() });

    let cmd = match profile {
        TciProfile::Thetis => {
            let ttl = if options.persistent_swl_spot {
                0
            } else {
                u32::max(1, options.ttl_seconds)
            };
            let payload = SpotPayload {
                spotter: SPOTTER,
                comment: &comment,
                heading: 0,
                continent: "",
                country: "",
                utctime: now.format("%Y-%m-%dT%H:%M:%SZ").to_string(),
                text_color: SPOT_TEXT_COLOR,
                is_swl: options.use_swl_timed_spot,
                swl_seconds_to_live: if options.use_swl_timed_spot { ttl } else { 0 },
            };
            format!(
                "SPOT:{},{},{},{},[json]{};",
                tag,
                spot_mode,
                hz,
                THETIS_SPOT_COLOR,
                serde_json::to_string(&payload)?
            )
        }
        TciProfile::Expert => {
            let text = comment.replace([',', ';'], " ");
            let text = match text.trim() {
                "" => SPOTTER,
                text => text,
            };
            format!(
                "SPOT:{},{},{},{},{};",
                tag, spot_mode, hz, EXPERT_SPOT_COLOR, text
            )
        }
    };
    Ok(vec![cmd])
}

/// Commands which mute or unmute the receiver
pub fn mute_commands(muted: bool) -> Vec<String> {
    let value = if muted { 1 } else { 0 };
    vec![
        format!("mute:{};", value),
        format!("mute:0,{};", value),
        format!("mute:{};", muted),
        format!("mute:0,{};", muted),
        format!("audio_mute:{};", value),
        format!("audio_mute:0,{};", value),
        format!("rx_mute:{};", value),
        format!("rx_mute:0,{};", value),
    ]
}

/// Tidy a hand-written command
pub fn raw_command(command: &str) -> Result<String, TciError> {
    let command = command.trim();
    if command.is_empty() {
        Err(TciError::EmptyCommand)
    } else if command.ends_with(';') {
        Ok(command.to_owned())
    } else {
        Ok(format!("{};", command))
    }
}

/// Short spot tag for a station name
///
/// Upper-cased, reduced to letters, digits, and `/`, and
/// truncated to twelve characters.
///
/// ```
/// use swlsked::station_tag;
///
/// assert_eq!("BBCWORLDSERV", station_tag("BBC World Service"));
/// assert_eq!("M0SWL", station_tag("???"));
/// ```
pub fn station_tag(station: &str) -> String {
    let tag: String = station
        .to_uppercase()
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || *c == '/')
        .take(MAX_STATION_TAG_LEN)
        .collect();
    if tag.is_empty() {
        DEFAULT_STATION_TAG.to_owned()
    } else {
        tag
    }
}

fn khz_to_hz(frequency_khz: f64) -> i64 {
    (frequency_khz * 1000.0).round() as i64
}

#[derive(Serialize)]
struct SpotPayload<'a> {
    spotter: &'a str,
    comment: &'a str,
    heading: u32,
    continent: &'a str,
    country: &'a str,
    utctime: String,
    #[serde(rename = "TextColor")]
    text_color: &'a str,
    #[serde(rename = "IsSWL")]
    is_swl: bool,
    #[serde(rename = "SWLSecondsToLive")]
    swl_seconds_to_live: u32,
}
