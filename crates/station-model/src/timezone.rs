//! Zone name resolution.
//!
//! Accepts IANA names (`America/Los_Angeles`) and the common US
//! abbreviations people type on the command line.

use chrono_tz::{TZ_VARIANTS, Tz};

use crate::error::{OptionsError, Result};

/// Zone the station reports in.
pub const DEFAULT_TIMEZONE: Tz = chrono_tz::America::Los_Angeles;

const ALIASES: &[(&str, &str)] = &[
    ("PST", "America/Los_Angeles"),
    ("PDT", "America/Los_Angeles"),
    ("PACIFIC", "America/Los_Angeles"),
    ("MST", "America/Denver"),
    ("MDT", "America/Denver"),
    ("CST", "America/Chicago"),
    ("CDT", "America/Chicago"),
    ("EST", "America/New_York"),
    ("EDT", "America/New_York"),
    ("AKST", "America/Anchorage"),
    ("HST", "Pacific/Honolulu"),
    ("GMT", "UTC"),
    ("Z", "UTC"),
];

/// Resolve a zone name or alias. Aliases win over the legacy fixed-offset
/// zones of the same name (`EST`, `MST`, `HST`, `GMT`); matching ignores case.
pub fn resolve_timezone(name: &str) -> Result<Tz> {
    let trimmed = name.trim();
    ALIASES
        .iter()
        .find(|(alias, _)| alias.eq_ignore_ascii_case(trimmed))
        .and_then(|(_, canonical)| canonical.parse::<Tz>().ok())
        .or_else(|| trimmed.parse::<Tz>().ok())
        .or_else(|| {
            TZ_VARIANTS
                .iter()
                .find(|tz| tz.name().eq_ignore_ascii_case(trimmed))
                .copied()
        })
        .ok_or_else(|| OptionsError::UnknownTimezone {
            name: name.to_string(),
        })
}
