//! Persisted radio control settings

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Context;
use log::{debug, warn};
use serde::{Deserialize, Serialize};

use swlsked::{SpotOptions, TciProfile, DEFAULT_HOST, DEFAULT_PORT};

use crate::cli::Args;

/// Settings file contents
///
/// ```toml
/// [tci]
/// host = "127.0.0.1"
/// port = 40001
/// profile = "thetis"
/// send_spot = true
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub tci: TciSettings,
}

/// Radio control settings
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TciSettings {
    pub host: String,
    pub port: u16,

    /// `thetis` or `expert`
    pub profile: String,

    /// Place a spot after tuning
    pub send_spot: bool,
    pub use_swl_timed_spot: bool,
    pub persistent_swl_spot: bool,

    /// Seconds a timed spot stays up
    pub spot_ttl_seconds: u32,

    /// Demodulator mode when none is given
    pub mode: String,
}

impl Default for TciSettings {
    fn default() -> Self {
        let spot = SpotOptions::default();
        Self {
            host: DEFAULT_HOST.to_owned(),
            port: DEFAULT_PORT,
            profile: TciProfile::default().as_str().to_owned(),
            send_spot: true,
            use_swl_timed_spot: spot.use_swl_timed_spot,
            persistent_swl_spot: spot.persistent_swl_spot,
            spot_ttl_seconds: spot.ttl_seconds,
            mode: "am".to_owned(),
        }
    }
}

impl TciSettings {
    /// Resolved profile; unknown names are `thetis`
    pub fn profile(&self) -> TciProfile {
        TciProfile::from_name(self.profile.as_str())
    }

    /// Spot lifetime options
    pub fn spot_options(&self) -> SpotOptions {
        SpotOptions {
            ttl_seconds: self.spot_ttl_seconds,
            use_swl_timed_spot: self.use_swl_timed_spot,
            persistent_swl_spot: self.persistent_swl_spot,
        }
    }
}

impl Settings {
    /// Default settings file location
    ///
    /// `swlview/config.toml` in the platform configuration
    /// directory, if there is one.
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join("swlview").join("config.toml"))
    }

    /// Load settings
    ///
    /// A missing, unreadable, or malformed file yields the
    /// defaults.
    pub fn load(path: &Path) -> Self {
        let text = match fs::read_to_string(path) {
            Ok(text) => text,
            Err(err) => {
                debug!("no settings from \"{}\": {}", path.display(), err);
                return Self::default();
            }
        };

        match toml::from_str(&text) {
            Ok(settings) => {
                debug!("read settings from \"{}\"", path.display());
                settings
            }
            Err(err) => {
                warn!(
                    "ignoring malformed settings file \"{}\": {}",
                    path.display(),
                    err
                );
                Self::default()
            }
        }
    }

    /// Write settings, creating the parent directory
    pub fn save(&self, path: &Path) -> anyhow::Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Unable to create \"{}\"", parent.display()))?;
        }
        let text = toml::to_string_pretty(self).context("Unable to encode settings")?;
        fs::write(path, text)
            .with_context(|| format!("Unable to write settings to \"{}\"", path.display()))?;
        debug!("wrote settings to \"{}\"", path.display());
        Ok(())
    }

    /// Apply command-line overrides
    pub fn apply_args(&mut self, args: &Args) {
        if let Some(host) = &args.tci_host {
            self.tci.host = host.clone();
        }
        if let Some(port) = args.tci_port {
            self.tci.port = port;
        }
        if let Some(profile) = &args.tci_profile {
            self.tci.profile = TciProfile::from_name(profile.as_str()).as_str().to_owned();
        }
        if let Some(mode) = &args.mode {
            self.tci.mode = mode.trim().to_lowercase();
        }
        if args.no_spot {
            self.tci.send_spot = false;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use clap::Parser;

    fn scratch_dir(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("swlview-test-{}-{}", name, std::process::id()))
    }

    #[test]
    fn test_defaults() {
        let settings = Settings::default();
        assert_eq!("127.0.0.1", settings.tci.host);
        assert_eq!(40001, settings.tci.port);
        assert_eq!(TciProfile::Thetis, settings.tci.profile());
        assert!(settings.tci.send_spot);
        assert_eq!("am", settings.tci.mode);
        assert_eq!(SpotOptions::default(), settings.tci.spot_options());
    }

    #[test]
    fn test_partial_toml() {
        let settings: Settings = toml::from_str(
            r#"
            [tci]
            port = 50001
            profile = "bogus"
            persistent_swl_spot = true
            "#,
        )
        .unwrap();
        assert_eq!("127.0.0.1", settings.tci.host);
        assert_eq!(50001, settings.tci.port);
        assert_eq!(TciProfile::Thetis, settings.tci.profile());
        assert!(settings.tci.spot_options().persistent_swl_spot);

        let settings: Settings = toml::from_str("").unwrap();
        assert_eq!(Settings::default(), settings);
    }

    #[test]
    fn test_load_missing_or_bad() {
        let dir = scratch_dir("bad");
        assert_eq!(Settings::default(), Settings::load(&dir.join("nope.toml")));

        fs::create_dir_all(&dir).unwrap();
        let path = dir.join("config.toml");
        fs::write(&path, "[tci\nport = ").unwrap();
        assert_eq!(Settings::default(), Settings::load(&path));
        fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_save_load() {
        let dir = scratch_dir("save");
        let path = dir.join("nested").join("config.toml");

        let mut settings = Settings::default();
        settings.tci.host = "radio.local".to_owned();
        settings.tci.profile = "expert".to_owned();
        settings.save(&path).unwrap();

        assert_eq!(settings, Settings::load(&path));
        fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_apply_args() {
        let args = Args::try_parse_from([
            "swlview",
            "--tci-host",
            "10.0.0.2",
            "--tci-port",
            "41000",
            "--tci-profile",
            "EXPERT",
            "--mode",
            " USB ",
            "--no-spot",
        ])
        .unwrap();

        let mut settings = Settings::default();
        settings.apply_args(&args);
        assert_eq!("10.0.0.2", settings.tci.host);
        assert_eq!(41000, settings.tci.port);
        assert_eq!("expert", settings.tci.profile);
        assert_eq!("usb", settings.tci.mode);
        assert!(!settings.tci.send_spot);
    }
}
