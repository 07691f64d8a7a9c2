//! Heterogeneous date/time parsing.
//!
//! Station exports mix several encodings (`2020-06-15`, `15.06.2020`,
//! `06/15/2020`, `20200615 00:15`, `20200615`, bare `00:15`). Inputs are matched against
//! [`PATTERNS`] in order and the first success wins. Longer, more specific
//! patterns come first so a date+time string never matches as a bare date.
//!
//! Every naive result is localized to one zone per run. Ambiguous wall times
//! (autumn fold) resolve to the earlier instant; wall times inside a spring
//! gap are shifted forward by one hour.

use chrono::{
    DateTime, LocalResult, NaiveDate, NaiveDateTime, NaiveTime, TimeDelta, TimeZone, Utc,
};
use chrono_tz::Tz;
use station_model::PipelineOptions;

use crate::error::FormatError;

/// What a pattern yields.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PatternKind {
    /// Date and wall-clock time.
    DateTime,
    /// Date only; time is midnight.
    Date,
    /// Time only; anchored to the reference date.
    TimeOnly,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DatetimePattern {
    pub name: &'static str,
    /// `chrono` format string.
    pub format: &'static str,
    pub kind: PatternKind,
}

impl DatetimePattern {
    const fn new(name: &'static str, format: &'static str, kind: PatternKind) -> Self {
        Self { name, format, kind }
    }

    /// Parse `input` against this pattern alone.
    pub fn parse(&self, input: &str, reference_date: NaiveDate) -> Option<NaiveDateTime> {
        match self.kind {
            PatternKind::DateTime => NaiveDateTime::parse_from_str(input, self.format).ok(),
            PatternKind::Date => NaiveDate::parse_from_str(input, self.format)
                .ok()
                .map(|date| date.and_time(NaiveTime::MIN)),
            PatternKind::TimeOnly => NaiveTime::parse_from_str(input, self.format)
                .ok()
                .map(|time| reference_date.and_time(time)),
        }
    }

    /// Render `value` in this pattern's encoding.
    pub fn render(&self, value: NaiveDateTime) -> String {
        value.format(self.format).to_string()
    }
}

/// Supported encodings, most specific first.
pub const PATTERNS: &[DatetimePattern] = &[
    DatetimePattern::new("iso-datetime", "%Y-%m-%dT%H:%M:%S", PatternKind::DateTime),
    DatetimePattern::new("datetime-seconds", "%Y-%m-%d %H:%M:%S", PatternKind::DateTime),
    DatetimePattern::new("datetime-minutes", "%Y-%m-%d %H:%M", PatternKind::DateTime),
    DatetimePattern::new("compact-datetime", "%Y%m%d %H:%M", PatternKind::DateTime),
    DatetimePattern::new("iso-date", "%Y-%m-%d", PatternKind::Date),
    DatetimePattern::new("compact-date", "%Y%m%d", PatternKind::Date),
    DatetimePattern::new("dotted-date", "%d.%m.%Y", PatternKind::Date),
    DatetimePattern::new("us-date", "%m/%d/%Y", PatternKind::Date),
    DatetimePattern::new("time-only", "%H:%M", PatternKind::TimeOnly),
];

/// Either a string to parse or an instant that passes through unchanged.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DateInput<'a> {
    Text(&'a str),
    Instant(DateTime<Tz>),
}

impl<'a> From<&'a str> for DateInput<'a> {
    fn from(value: &'a str) -> Self {
        Self::Text(value)
    }
}

impl<'a> From<&'a String> for DateInput<'a> {
    fn from(value: &'a String) -> Self {
        Self::Text(value.as_str())
    }
}

impl From<DateTime<Tz>> for DateInput<'_> {
    fn from(value: DateTime<Tz>) -> Self {
        Self::Instant(value)
    }
}

/// Parses date/time strings into zone-qualified instants.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DatetimeNormalizer {
    timezone: Tz,
    reference_date: NaiveDate,
}

impl DatetimeNormalizer {
    pub fn new(timezone: Tz, reference_date: NaiveDate) -> Self {
        Self {
            timezone,
            reference_date,
        }
    }

    /// Normalizer for a run. Without an explicit reference date, time-only
    /// inputs anchor to today in the run's zone.
    pub fn from_options(options: &PipelineOptions) -> Self {
        let reference_date = options
            .reference_date
            .unwrap_or_else(|| Utc::now().with_timezone(&options.timezone).date_naive());
        Self::new(options.timezone, reference_date)
    }

    pub fn timezone(&self) -> Tz {
        self.timezone
    }

    pub fn reference_date(&self) -> NaiveDate {
        self.reference_date
    }

    pub fn parse<'a>(&self, input: impl Into<DateInput<'a>>) -> Result<DateTime<Tz>, FormatError> {
        match input.into() {
            DateInput::Instant(instant) => Ok(instant),
            DateInput::Text(text) => {
                let (naive, _) = self.parse_naive(text)?;
                Ok(self.localize(naive))
            }
        }
    }

    /// First matching pattern and its naive result.
    pub fn parse_naive(
        &self,
        input: &str,
    ) -> Result<(NaiveDateTime, &'static DatetimePattern), FormatError> {
        let trimmed = input.trim();
        PATTERNS
            .iter()
            .find_map(|pattern| {
                pattern
                    .parse(trimmed, self.reference_date)
                    .map(|naive| (naive, pattern))
            })
            .ok_or_else(|| FormatError::new(input))
    }

    /// Like [`parse`](Self::parse) for text, but a time-only input is an
    /// error: its date would be the reference date, not one from the data.
    pub fn parse_dated(&self, input: &str) -> Result<DateTime<Tz>, FormatError> {
        self.parse_wall_clock(input).map(|naive| self.localize(naive))
    }

    /// Calendar date of `input`. Time-only inputs carry no date of their own
    /// and are rejected.
    pub fn parse_date(&self, input: &str) -> Result<NaiveDate, FormatError> {
        self.parse_wall_clock(input).map(|naive| naive.date())
    }

    /// Naive date and time of `input`, before localization. Time-only
    /// inputs are rejected.
    pub fn parse_wall_clock(&self, input: &str) -> Result<NaiveDateTime, FormatError> {
        match self.parse_naive(input)? {
            (_, pattern) if pattern.kind == PatternKind::TimeOnly => {
                Err(FormatError::missing_date(input))
            }
            (naive, _) => Ok(naive),
        }
    }

    /// Attach the run's zone to a wall-clock datetime.
    pub fn localize(&self, naive: NaiveDateTime) -> DateTime<Tz> {
        match self.timezone.from_local_datetime(&naive) {
            LocalResult::Single(instant) => instant,
            LocalResult::Ambiguous(earliest, _) => earliest,
            LocalResult::None => self
                .timezone
                .from_local_datetime(&(naive + TimeDelta::hours(1)))
                .earliest()
                .unwrap_or_else(|| self.timezone.from_utc_datetime(&naive)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Timelike;
    use chrono_tz::America::Los_Angeles;

    fn normalizer() -> DatetimeNormalizer {
        DatetimeNormalizer::new(Los_Angeles, NaiveDate::from_ymd_opt(2021, 7, 4).unwrap())
    }

    #[test]
    fn compact_station_timestamp() {
        let parsed = normalizer().parse("20100101 00:15").unwrap();
        assert_eq!(
            parsed.naive_local(),
            NaiveDate::from_ymd_opt(2010, 1, 1)
                .unwrap()
                .and_hms_opt(0, 15, 0)
                .unwrap()
        );
        assert_eq!(parsed.timezone(), Los_Angeles);
    }

    #[test]
    fn date_only_is_midnight() {
        let parsed = normalizer().parse("15.06.2020").unwrap();
        assert_eq!(parsed.date_naive(), NaiveDate::from_ymd_opt(2020, 6, 15).unwrap());
        assert_eq!(parsed.hour(), 0);
    }

    #[test]
    fn time_only_uses_reference_date() {
        let parsed = normalizer().parse("06:45").unwrap();
        assert_eq!(parsed.date_naive(), NaiveDate::from_ymd_opt(2021, 7, 4).unwrap());
        assert_eq!((parsed.hour(), parsed.minute()), (6, 45));
    }

    #[test]
    fn instant_passes_through() {
        let instant = Los_Angeles
            .with_ymd_and_hms(2020, 3, 1, 6, 0, 0)
            .single()
            .unwrap();
        assert_eq!(normalizer().parse(instant).unwrap(), instant);
    }

    #[test]
    fn date_plus_time_beats_bare_date() {
        let (naive, pattern) = normalizer().parse_naive("2020-06-15 07:30").unwrap();
        assert_eq!(pattern.name, "datetime-minutes");
        assert_eq!((naive.hour(), naive.minute()), (7, 30));
    }

    #[test]
    fn unmatched_input_is_format_error() {
        assert_eq!(
            normalizer().parse("June 15th"),
            Err(FormatError::new("June 15th"))
        );
        assert!(normalizer().parse("").is_err());
        assert!(normalizer().parse("2020-13-01").is_err());
    }

    #[test]
    fn parse_date_rejects_time_only() {
        assert_eq!(
            normalizer().parse_date("06:00"),
            Err(FormatError::missing_date("06:00"))
        );
        assert_eq!(
            normalizer().parse_date("06/15/2020").unwrap(),
            NaiveDate::from_ymd_opt(2020, 6, 15).unwrap()
        );
    }

    #[test]
    fn dated_parse_keeps_dates_and_rejects_bare_times() {
        let parsed = normalizer().parse_dated("20100101 00:15").unwrap();
        assert_eq!(parsed, normalizer().parse("20100101 00:15").unwrap());
        assert_eq!(
            normalizer().parse_dated(" 06:00 "),
            Err(FormatError::missing_date(" 06:00 "))
        );
        assert_eq!(
            normalizer().parse_dated("noon"),
            Err(FormatError::new("noon"))
        );
    }

    #[test]
    fn spring_gap_shifts_forward() {
        // 2021-03-14 02:30 does not exist in Los Angeles.
        let parsed = normalizer().parse("2021-03-14 02:30").unwrap();
        assert_eq!((parsed.hour(), parsed.minute()), (3, 30));
    }

    #[test]
    fn autumn_fold_takes_earliest() {
        let parsed = normalizer().parse("2021-11-07 01:30").unwrap();
        let later = Los_Angeles
            .from_local_datetime(&parsed.naive_local())
            .latest()
            .unwrap();
        assert!(parsed < later);
    }
}
