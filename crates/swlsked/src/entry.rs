//! Raw and normalized schedule entries

use serde::de::IgnoredAny;
use serde::{Deserialize, Deserializer, Serialize};

/// Frequency field as found in the upstream data
///
/// Upstream data is loosely typed: frequencies usually arrive as
/// numbers, but sometimes as text. Both are kept verbatim until
/// [normalization](crate::NormalizedEntry).
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(untagged)]
pub enum RawFrequency {
    /// A numeric value, in kHz
    Number(f64),

    /// A text value, which may or may not be a number
    Text(String),
}

impl RawFrequency {
    /// Coerce to a non-negative integer kHz
    ///
    /// Fractional numbers are truncated. Negative, non-finite,
    /// and non-numeric values become zero.
    pub fn to_khz(&self) -> u32 {
        match self {
            RawFrequency::Number(num) => khz_from_f64(*num),
            RawFrequency::Text(txt) => {
                let txt = txt.trim();
                match txt.parse::<u32>() {
                    Ok(khz) => khz,
                    Err(_) => txt.parse::<f64>().map(khz_from_f64).unwrap_or(0),
                }
            }
        }
    }
}

fn khz_from_f64(num: f64) -> u32 {
    if num.is_finite() && num >= 0.0 {
        num.trunc() as u32
    } else {
        0
    }
}

impl From<u32> for RawFrequency {
    fn from(khz: u32) -> Self {
        RawFrequency::Number(khz as f64)
    }
}

impl From<i32> for RawFrequency {
    fn from(khz: i32) -> Self {
        RawFrequency::Number(khz as f64)
    }
}

impl From<f64> for RawFrequency {
    fn from(khz: f64) -> Self {
        RawFrequency::Number(khz)
    }
}

impl From<&str> for RawFrequency {
    fn from(txt: &str) -> Self {
        RawFrequency::Text(txt.to_owned())
    }
}

/// One row of a broadcast schedule, as delivered by the data source
///
/// Every field is optional in the upstream data. Absent or
/// oddly-typed fields deserialize to a default rather than
/// failing, so one bad row never spoils a whole schedule.
///
/// ```
/// use swlsked::RawEntry;
///
/// let raw: RawEntry = serde_json::from_str(
///     r#"{"frequency_khz": 9410, "time_on": "2300", "station": "BBC", "days": null}"#
/// ).unwrap();
/// assert_eq!("2300", raw.time_on);
/// assert_eq!("", raw.days);
/// ```
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RawEntry {
    /// Frequency, in kHz
    #[serde(deserialize_with = "lenient_frequency")]
    pub frequency_khz: Option<RawFrequency>,

    /// Start time, `HHMM` UTC
    #[serde(deserialize_with = "lenient_text")]
    pub time_on: String,

    /// End time, `HHMM` UTC
    #[serde(deserialize_with = "lenient_text")]
    pub time_off: String,

    /// Free-text operating days
    #[serde(deserialize_with = "lenient_text")]
    pub days: String,

    /// Transmitter site ITU-style country code
    #[serde(deserialize_with = "lenient_text")]
    pub itu: String,

    /// Station name
    #[serde(deserialize_with = "lenient_text")]
    pub station: String,

    /// Broadcast language
    #[serde(deserialize_with = "lenient_text")]
    pub language: String,

    /// Target audience area
    #[serde(deserialize_with = "lenient_text")]
    pub target: String,

    /// Free-text remarks
    #[serde(deserialize_with = "lenient_text")]
    pub remarks: String,
}

impl RawEntry {
    /// New entry with frequency, time window, and days
    ///
    /// All other fields are empty. Fill them in with the
    /// `with_*()` methods.
    pub fn new<F, S, T, D>(frequency_khz: F, time_on: S, time_off: T, days: D) -> Self
    where
        F: Into<RawFrequency>,
        S: Into<String>,
        T: Into<String>,
        D: Into<String>,
    {
        Self {
            frequency_khz: Some(frequency_khz.into()),
            time_on: time_on.into(),
            time_off: time_off.into(),
            days: days.into(),
            ..Default::default()
        }
    }

    /// Set the origin (ITU) code
    pub fn with_itu<S: Into<String>>(mut self, itu: S) -> Self {
        self.itu = itu.into();
        self
    }

    /// Set the station name
    pub fn with_station<S: Into<String>>(mut self, station: S) -> Self {
        self.station = station.into();
        self
    }

    /// Set the language
    pub fn with_language<S: Into<String>>(mut self, language: S) -> Self {
        self.language = language.into();
        self
    }

    /// Set the target area
    pub fn with_target<S: Into<String>>(mut self, target: S) -> Self {
        self.target = target.into();
        self
    }

    /// Set the remarks
    pub fn with_remarks<S: Into<String>>(mut self, remarks: S) -> Self {
        self.remarks = remarks.into();
        self
    }
}

/// A schedule entry with typed, trimmed fields
///
/// Produced from a [`RawEntry`] by pure field coercion. A
/// missing or invalid frequency becomes `0`, and text fields are
/// trimmed. Nothing else is validated: malformed times are
/// kept as-is and handled downstream.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Serialize)]
pub struct NormalizedEntry {
    pub frequency_khz: u32,
    pub time_on: String,
    pub time_off: String,
    pub days_raw: String,
    pub itu: String,
    pub station: String,
    pub language: String,
    pub target: String,
    pub remarks: String,
}

impl From<&RawEntry> for NormalizedEntry {
    fn from(raw: &RawEntry) -> Self {
        Self {
            frequency_khz: raw.frequency_khz.as_ref().map(|f| f.to_khz()).unwrap_or(0),
            time_on: raw.time_on.trim().to_owned(),
            time_off: raw.time_off.trim().to_owned(),
            days_raw: raw.days.trim().to_owned(),
            itu: raw.itu.trim().to_owned(),
            station: raw.station.trim().to_owned(),
            language: raw.language.trim().to_owned(),
            target: raw.target.trim().to_owned(),
            remarks: raw.remarks.trim().to_owned(),
        }
    }
}

/// Normalize one raw entry
pub fn normalize(raw: &RawEntry) -> NormalizedEntry {
    NormalizedEntry::from(raw)
}

// Any JSON scalar; anything else is ignored
#[derive(Deserialize)]
#[serde(untagged)]
enum Scalar {
    Text(String),
    Int(i64),
    Float(f64),
    Bool(bool),
    Other(IgnoredAny),
}

fn lenient_text<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<Scalar>::deserialize(deserializer)? {
        Some(Scalar::Text(txt)) => txt,
        Some(Scalar::Int(num)) => num.to_string(),
        Some(Scalar::Float(num)) => num.to_string(),
        Some(Scalar::Bool(b)) => b.to_string(),
        Some(Scalar::Other(_)) | None => String::new(),
    })
}

fn lenient_frequency<'de, D>(deserializer: D) -> Result<Option<RawFrequency>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<Scalar>::deserialize(deserializer)? {
        Some(Scalar::Text(txt)) => Some(RawFrequency::Text(txt)),
        Some(Scalar::Int(num)) => Some(RawFrequency::Number(num as f64)),
        Some(Scalar::Float(num)) => Some(RawFrequency::Number(num)),
        Some(Scalar::Bool(_)) | Some(Scalar::Other(_)) | None => None,
    })
}
