//! # Broadcast Origin Codes Known to `swlsked`
//!
//! Schedules identify the transmitter site's country with an
//! ITU-style code of one to three letters, such as `G` for the
//! United Kingdom or `USA` for the United States. These are
//! *not* ISO 3166 codes, and many of them collide with an
//! unrelated ISO code. This module maps them to ISO 3166-1
//! alpha-2 so they can be shown as flag glyphs.
//!
//! Origin codes which are not in the table are shown with a
//! generic globe.

use phf::phf_map;

/// Glyph shown when no country flag can be derived
pub const GLOBE: &str = "\u{1F310}";

/// Look up the ISO 3166-1 alpha-2 country for an origin code
///
/// Matching ignores case and surrounding whitespace.
///
/// ```
/// use swlsked::iso2_for_origin;
///
/// assert_eq!(Some("GB"), iso2_for_origin("G"));
/// assert_eq!(Some("DE"), iso2_for_origin(" d "));
/// assert_eq!(None, iso2_for_origin("XYZ"));
/// ```
pub fn iso2_for_origin<S>(origin: S) -> Option<&'static str>
where
    S: AsRef<str>,
{
    let code = origin.as_ref().trim().to_ascii_uppercase();
    ITU_TO_ISO2.get(code.as_str()).cloned()
}

/// Flag glyph for an origin code
///
/// Returns the pair of Unicode regional indicator symbols for
/// the origin's country, or [`GLOBE`] if the origin is unknown.
///
/// ```
/// use swlsked::flag_for_origin;
///
/// assert_eq!("\u{1F1EC}\u{1F1E7}", flag_for_origin("G"));
/// assert_eq!("\u{1F310}", flag_for_origin("???"));
/// ```
pub fn flag_for_origin<S>(origin: S) -> String
where
    S: AsRef<str>,
{
    match iso2_for_origin(origin) {
        Some(iso2) => iso2_to_flag(iso2),
        None => GLOBE.to_owned(),
    }
}

/// Regional indicator flag for an ISO 3166-1 alpha-2 code
///
/// The code must be exactly two ASCII letters; anything else
/// yields [`GLOBE`].
pub fn iso2_to_flag<S>(iso2: S) -> String
where
    S: AsRef<str>,
{
    let code = iso2.as_ref().trim().to_ascii_uppercase();
    if code.len() != 2 || !code.bytes().all(|b| b.is_ascii_alphabetic()) {
        return GLOBE.to_owned();
    }

    code.chars()
        .filter_map(|c| char::from_u32(c as u32 + REGIONAL_INDICATOR_OFFSET))
        .collect()
}

// 'A' (0x41) → REGIONAL INDICATOR SYMBOL LETTER A (0x1F1E6)
const REGIONAL_INDICATOR_OFFSET: u32 = 0x1F1E6 - 0x41;

/// Origin (ITU) code → ISO 3166-1 alpha-2
static ITU_TO_ISO2: phf::Map<&'static str, &'static str> = phf_map! {
    "AFS" => "ZA", "ALG" => "DZ", "ALS" => "AL", "AND" => "AD",
    "ARG" => "AR", "AUS" => "AU", "AZE" => "AZ", "AZR" => "AZ",
    "B" => "CN", "BEL" => "BE", "BER" => "BM", "BGD" => "BD",
    "BHR" => "BH", "BLR" => "BY", "BOL" => "BO", "BUL" => "BG",
    "CAN" => "CA", "CHL" => "CL", "CHN" => "CN", "CLM" => "CO",
    "CLN" => "LK", "COD" => "CD", "COG" => "CG", "CPV" => "CV",
    "CUB" => "CU", "CVA" => "VA", "CYM" => "KY", "CZE" => "CZ",
    "D" => "DE", "DNK" => "DK", "E" => "ES", "EGY" => "EG",
    "EQA" => "EC", "EST" => "EE", "ETH" => "ET", "F" => "FR",
    "FIN" => "FI", "FJI" => "FJ", "FRO" => "FO", "G" => "GB",
    "GRC" => "GR", "GRL" => "GL", "GUF" => "GF", "GUM" => "GU",
    "HKG" => "HK", "HND" => "HN", "HNG" => "HU", "HOL" => "NL",
    "I" => "IT", "IND" => "IN", "INS" => "ID", "IRL" => "IE",
    "IRN" => "IR", "ISL" => "IS", "ISR" => "IL", "J" => "JP",
    "KAZ" => "KZ", "KGZ" => "KG", "KOR" => "KR", "KRE" => "KP",
    "KWT" => "KW", "LBR" => "LR", "LBY" => "LY", "MAU" => "MU",
    "MCO" => "MC", "MDG" => "MG", "MEX" => "MX", "MLI" => "ML",
    "MNG" => "MN", "MRT" => "MR", "MYA" => "MM", "NGR" => "NG",
    "NOR" => "NO", "NZL" => "NZ", "PAK" => "PK", "PHL" => "PH",
    "PNG" => "PG", "POL" => "PL", "POR" => "PT", "PRU" => "PE",
    "ROU" => "RO", "RUS" => "RU", "S" => "SE", "SDN" => "SD",
    "SEN" => "SN", "SEY" => "SC", "SLM" => "SB", "SNG" => "SG",
    "SOM" => "SO", "SUI" => "CH", "SVK" => "SK", "SWZ" => "SZ",
    "TCD" => "TD", "THA" => "TH", "TJK" => "TJ", "TKM" => "TM",
    "TRD" => "TT", "TUR" => "TR", "TWN" => "TW", "UKR" => "UA",
    "USA" => "US", "UZB" => "UZ", "VTN" => "VN", "VUT" => "VU",
};
