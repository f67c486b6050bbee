//! Text-to-date transform.
//!
//! Patterns use the LDML field letters familiar from ICU and most platform
//! date formatters (`yyyy-MM-dd'T'HH:mm:ssZZZZZ`). A pattern is compiled
//! once, when the transform is built, into `chrono` format items plus an
//! anchored regex of the field widths. Input must match that shape before
//! chrono reads it, so `MM` takes exactly two digits and no field skips
//! leading whitespace or accepts a sign.

use std::sync::LazyLock;

use chrono::{
    DateTime, FixedOffset, Offset, TimeZone, Utc, Weekday,
    format::{Fixed, Item, Numeric, Pad, ParseResult, Parsed},
};
use regex::Regex;

use crate::{
    error::{DateFormatError, NodeError, Result},
    node::Node,
    transform::Transform,
};

/// The ISO 8601 pattern used by [`DateTransform::iso8601`].
pub const ISO8601_PATTERN: &str = "yyyy-MM-dd'T'HH:mm:ssZZZZZ";

/// Reason attached to [`NodeError::TransformFailed`] when a string does not
/// match the pattern.
pub const UNEXPECTED_DATE_FORMAT: &str = "Unexpected date format";

/// Locale used to read names and numerals.
///
/// `Posix` is the only name table chrono parses with, so it is the only
/// locale for now.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[non_exhaustive]
pub enum Locale {
    /// ASCII digits and English month and weekday names, with no
    /// locale-dependent interpretation.
    #[default]
    Posix,
}

/// Calendar used to interpret week-based fields (`Y`, `w`).
///
/// Both calendars are proleptic Gregorian for years, months and days.
/// Week dates need a year to count weeks in: under `Iso8601` that is the
/// week-numbering year `Y`, under `Gregorian` the calendar year `y`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Calendar {
    /// Weeks start on Monday; `w` pairs with the ISO week-numbering year `Y`.
    #[default]
    Iso8601,
    /// Weeks start on Sunday; `w` pairs with `y`. `Y` is not supported.
    Gregorian,
}

/// Date pattern plus the settings needed to read it.
///
/// Defaults to the POSIX locale, the ISO 8601 calendar and UTC.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DateFormat {
    pattern: String,
    locale: Locale,
    calendar: Calendar,
    time_zone: FixedOffset,
}

impl DateFormat {
    pub fn new(pattern: impl Into<String>) -> Self {
        DateFormat {
            pattern: pattern.into(),
            locale: Locale::default(),
            calendar: Calendar::default(),
            time_zone: Utc.fix(),
        }
    }

    pub fn iso8601() -> Self {
        Self::new(ISO8601_PATTERN)
    }

    /// Zone applied to strings whose pattern carries no offset.
    pub fn with_time_zone(mut self, time_zone: FixedOffset) -> Self {
        self.time_zone = time_zone;
        self
    }

    /// Currently always [`Locale::Posix`].
    pub fn with_locale(mut self, locale: Locale) -> Self {
        self.locale = locale;
        self
    }

    pub fn with_calendar(mut self, calendar: Calendar) -> Self {
        self.calendar = calendar;
        self
    }

    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    pub fn locale(&self) -> Locale {
        self.locale
    }

    pub fn calendar(&self) -> Calendar {
        self.calendar
    }

    pub fn time_zone(&self) -> FixedOffset {
        self.time_zone
    }
}

impl Default for DateFormat {
    fn default() -> Self {
        Self::iso8601()
    }
}

/// Which fields a compiled pattern sets.
#[derive(Debug, Clone, Copy, Default)]
struct Fields {
    year: bool,
    week_year: bool,
    month: bool,
    day: bool,
    ordinal: bool,
    week: bool,
    weekday: bool,
    hour: bool,
    hour12: bool,
    ampm: bool,
    minute: bool,
    second: bool,
    offset: bool,
}

#[derive(Debug, Clone)]
struct Compiled {
    items: Vec<Item<'static>>,
    shape: Regex,
    fields: Fields,
}

impl Compiled {
    /// Midnight, January 1st of 2000 for anything the pattern leaves out.
    fn fill_defaults(&self, parsed: &mut Parsed, calendar: Calendar) -> ParseResult<()> {
        let f = self.fields;
        if !f.year && !f.week_year {
            parsed.set_year(2000)?;
        }
        if f.week && !f.weekday {
            parsed.set_weekday(match calendar {
                Calendar::Iso8601 => Weekday::Mon,
                Calendar::Gregorian => Weekday::Sun,
            })?;
        }
        if !f.month && !f.ordinal && !f.week {
            parsed.set_month(1)?;
        }
        if !f.day && !f.ordinal && !f.week {
            parsed.set_day(1)?;
        }
        if f.hour12 && !f.ampm {
            parsed.set_ampm(false)?;
        }
        if !f.hour && !f.hour12 {
            parsed.set_hour(0)?;
        }
        if !f.minute {
            parsed.set_minute(0)?;
        }
        if !f.second {
            parsed.set_second(0)?;
        }
        Ok(())
    }
}

/// Accumulates pattern output, merging adjacent literal text.
#[derive(Default)]
struct Builder {
    items: Vec<Item<'static>>,
    shape: String,
    literal: String,
    fields: Fields,
    week_offset: Option<usize>,
}

impl Builder {
    fn flush(&mut self) {
        if !self.literal.is_empty() {
            let text = std::mem::take(&mut self.literal);
            self.shape.push_str(&regex::escape(&text));
            self.items.push(Item::OwnedLiteral(text.into_boxed_str()));
        }
    }

    fn push(&mut self, item: Item<'static>, shape: &str) {
        self.flush();
        self.items.push(item);
        self.shape.push_str(shape);
    }

    fn numeric(&mut self, numeric: Numeric, shape: &str) {
        self.push(Item::Numeric(numeric, Pad::Zero), shape);
    }

    fn fixed(&mut self, fixed: Fixed, shape: &str) {
        self.push(Item::Fixed(fixed), shape);
    }

    fn finish(mut self, pattern: &str) -> std::result::Result<Compiled, DateFormatError> {
        self.flush();
        let shape = Regex::new(&format!("^{}$", self.shape)).map_err(|err| {
            DateFormatError::TooComplex {
                pattern: pattern.to_string(),
                reason: err.to_string(),
            }
        })?;
        Ok(Compiled {
            items: self.items,
            shape,
            fields: self.fields,
        })
    }
}

/// Digits for a numeric field: one letter allows one or two digits, two
/// letters require exactly two.
fn digits(width: usize) -> &'static str {
    if width == 1 { r"\d{1,2}" } else { r"\d{2}" }
}

const NAME: &str = "[A-Za-z]+";
const OFFSET_COLON: &str = r"[+-]\d{2}:\d{2}";
const OFFSET_COLON_Z: &str = r"(?:Z|[+-]\d{2}:\d{2})";
const OFFSET_BASIC: &str = r"[+-]\d{4}";

fn compile(pattern: &str, calendar: Calendar) -> std::result::Result<Compiled, DateFormatError> {
    let chars: Vec<(usize, char)> = pattern.char_indices().collect();
    let mut out = Builder::default();
    let mut i = 0;

    while i < chars.len() {
        let (offset, c) = chars[i];

        if c == '\'' {
            // `''` is a literal quote, inside or outside quoted text.
            if matches!(chars.get(i + 1), Some((_, '\''))) {
                out.literal.push('\'');
                i += 2;
                continue;
            }
            i += 1;
            loop {
                match chars.get(i) {
                    None => return Err(DateFormatError::UnterminatedQuote { offset }),
                    Some((_, '\'')) if matches!(chars.get(i + 1), Some((_, '\''))) => {
                        out.literal.push('\'');
                        i += 2;
                    }
                    Some((_, '\'')) => {
                        i += 1;
                        break;
                    }
                    Some((_, ch)) => {
                        out.literal.push(*ch);
                        i += 1;
                    }
                }
            }
            continue;
        }

        if c.is_whitespace() {
            let start = i;
            while i < chars.len() && chars[i].1.is_whitespace() {
                i += 1;
            }
            let run: String = chars[start..i].iter().map(|(_, ch)| ch).collect();
            out.push(Item::OwnedSpace(run.into_boxed_str()), r"\s+");
            continue;
        }

        if !c.is_ascii_alphabetic() {
            out.literal.push(c);
            i += 1;
            continue;
        }

        let start = i;
        while i < chars.len() && chars[i].1 == c {
            i += 1;
        }
        let width = i - start;
        let unsupported = || DateFormatError::UnsupportedField {
            field: c.to_string().repeat(width),
            offset,
        };

        let year_digits = match width {
            2 => r"\d{2}".to_string(),
            n => format!(r"\d{{{n},}}"),
        };

        match (c, width) {
            ('y', 2) => {
                out.numeric(Numeric::YearMod100, &year_digits);
                out.fields.year = true;
            }
            ('y', _) => {
                out.numeric(Numeric::Year, &year_digits);
                out.fields.year = true;
            }
            ('Y', w) if w != 2 && calendar == Calendar::Iso8601 => {
                out.numeric(Numeric::IsoYear, &year_digits);
                out.fields.week_year = true;
                out.week_offset = out.week_offset.or(Some(offset));
            }
            ('M' | 'L', 1 | 2) => {
                out.numeric(Numeric::Month, digits(width));
                out.fields.month = true;
            }
            ('M' | 'L', 3) => {
                out.fixed(Fixed::ShortMonthName, NAME);
                out.fields.month = true;
            }
            ('M' | 'L', 4) => {
                out.fixed(Fixed::LongMonthName, NAME);
                out.fields.month = true;
            }
            ('d', 1 | 2) => {
                out.numeric(Numeric::Day, digits(width));
                out.fields.day = true;
            }
            ('D', 1..=3) => {
                out.numeric(Numeric::Ordinal, &format!(r"\d{{{width},3}}"));
                out.fields.ordinal = true;
            }
            ('w', 1 | 2) => {
                out.numeric(
                    match calendar {
                        Calendar::Iso8601 => Numeric::IsoWeek,
                        Calendar::Gregorian => Numeric::WeekFromSun,
                    },
                    digits(width),
                );
                out.fields.week = true;
                out.week_offset = out.week_offset.or(Some(offset));
            }
            ('E', 1..=3) => {
                out.fixed(Fixed::ShortWeekdayName, NAME);
                out.fields.weekday = true;
            }
            ('E', 4) => {
                out.fixed(Fixed::LongWeekdayName, NAME);
                out.fields.weekday = true;
            }
            ('H', 1 | 2) => {
                out.numeric(Numeric::Hour, digits(width));
                out.fields.hour = true;
            }
            ('h', 1 | 2) => {
                out.numeric(Numeric::Hour12, digits(width));
                out.fields.hour12 = true;
            }
            ('a', 1..=3) => {
                out.fixed(Fixed::UpperAmPm, "(?i:am|pm)");
                out.fields.ampm = true;
            }
            ('m', 1 | 2) => {
                out.numeric(Numeric::Minute, digits(width));
                out.fields.minute = true;
            }
            ('s', 1 | 2) => {
                out.numeric(Numeric::Second, digits(width));
                out.fields.second = true;
            }
            ('S', _) => {
                // chrono reads fractions together with their leading dot.
                if out.literal.pop() != Some('.') {
                    return Err(DateFormatError::DetachedFraction { offset });
                }
                out.fixed(Fixed::Nanosecond, &format!(r"\.\d{{{width}}}"));
            }
            ('Z', 1..=3) | ('x', 2) => {
                out.fixed(Fixed::TimezoneOffset, OFFSET_BASIC);
                out.fields.offset = true;
            }
            ('x', 3) => {
                out.fixed(Fixed::TimezoneOffset, OFFSET_COLON);
                out.fields.offset = true;
            }
            ('Z', 5) | ('X', 3) => {
                out.fixed(Fixed::TimezoneOffsetZ, OFFSET_COLON_Z);
                out.fields.offset = true;
            }
            _ => return Err(unsupported()),
        }
    }

    // Week numbers only resolve against their own year: ISO weeks need the
    // week-numbering year, Sunday weeks need the calendar year.
    let f = out.fields;
    let complete = match calendar {
        Calendar::Iso8601 => f.week == f.week_year,
        Calendar::Gregorian => !f.week || f.year,
    };
    if let (false, Some(offset)) = (complete, out.week_offset) {
        return Err(DateFormatError::IncompleteWeekDate { offset });
    }

    out.finish(pattern)
}

static ISO8601_SHAPE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\d{4}-\d{2}-\d{2}T\d{2}:\d{2}:\d{2}(?:Z|[+-]\d{2}:\d{2})$")
        .expect("ISO 8601 shape is valid")
});

fn iso8601_compiled() -> Compiled {
    let n = |numeric| Item::Numeric(numeric, Pad::Zero);
    Compiled {
        items: vec![
            n(Numeric::Year),
            Item::Literal("-"),
            n(Numeric::Month),
            Item::Literal("-"),
            n(Numeric::Day),
            Item::Literal("T"),
            n(Numeric::Hour),
            Item::Literal(":"),
            n(Numeric::Minute),
            Item::Literal(":"),
            n(Numeric::Second),
            Item::Fixed(Fixed::TimezoneOffsetZ),
        ],
        shape: ISO8601_SHAPE.clone(),
        fields: Fields {
            year: true,
            month: true,
            day: true,
            hour: true,
            minute: true,
            second: true,
            offset: true,
            ..Fields::default()
        },
    }
}

/// Transforms a string node into an instant using a fixed date format.
///
/// The format is copied when the transform is built; later changes to the
/// caller's [`DateFormat`] do not affect it.
///
/// # Examples
///
/// ```
/// use chrono::{TimeZone, Utc};
/// use keypath::{DateTransform, Node, Tree};
/// use serde_json::json;
///
/// let doc = json!({"created": "2015-11-10T12:00:00Z"});
/// let created = doc.root().get("created").apply(&DateTransform::iso8601()).unwrap();
/// assert_eq!(created, Utc.with_ymd_and_hms(2015, 11, 10, 12, 0, 0).unwrap());
/// ```
#[derive(Debug, Clone)]
pub struct DateTransform {
    format: DateFormat,
    compiled: Compiled,
}

impl DateTransform {
    pub fn new(format: &DateFormat) -> std::result::Result<Self, DateFormatError> {
        let compiled = compile(&format.pattern, format.calendar)?;
        Ok(DateTransform {
            format: format.clone(),
            compiled,
        })
    }

    /// Build from a pattern with the POSIX locale, ISO 8601 calendar and UTC.
    pub fn from_pattern(pattern: &str) -> std::result::Result<Self, DateFormatError> {
        Self::new(&DateFormat::new(pattern))
    }

    /// Dates formatted as `yyyy-MM-dd'T'HH:mm:ssZZZZZ`, read in UTC.
    ///
    /// Only this exact layout is accepted: a four-digit year, two digits for
    /// every other field, no fractional seconds or surrounding whitespace,
    /// and an offset of either `Z` or `±hh:mm`.
    pub fn iso8601() -> Self {
        DateTransform {
            format: DateFormat::iso8601(),
            compiled: iso8601_compiled(),
        }
    }

    pub fn format(&self) -> &DateFormat {
        &self.format
    }

    /// Parse `text` against the configured format.
    pub fn parse(&self, text: &str) -> Option<DateTime<Utc>> {
        if !self.compiled.shape.is_match(text) {
            return None;
        }
        let mut parsed = Parsed::new();
        chrono::format::parse(&mut parsed, text, self.compiled.items.iter()).ok()?;
        self.compiled
            .fill_defaults(&mut parsed, self.format.calendar)
            .ok()?;

        let instant = if self.compiled.fields.offset {
            parsed.to_datetime().ok()?
        } else {
            let zone = self.format.time_zone;
            let local = parsed
                .to_naive_datetime_with_offset(zone.local_minus_utc())
                .ok()?;
            zone.from_local_datetime(&local).single()?
        };
        Some(instant.with_timezone(&Utc))
    }
}

impl Transform for DateTransform {
    type Output = DateTime<Utc>;

    fn apply<N: Node>(&self, node: &N) -> Result<DateTime<Utc>> {
        let text: String = node.value()?;
        self.parse(&text).ok_or_else(|| {
            tracing::debug!(
                path = %node.path(),
                input = %text,
                pattern = %self.format.pattern,
                "date did not match pattern"
            );
            NodeError::transform_failed(node.path(), UNEXPECTED_DATE_FORMAT)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Datelike, Timelike};

    fn utc(y: i32, mo: u32, d: u32, h: u32, mi: u32, s: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, mo, d, h, mi, s).unwrap()
    }

    #[test]
    fn compiled_iso_pattern_matches_preset() {
        let compiled = DateTransform::from_pattern(ISO8601_PATTERN).unwrap();
        let preset = DateTransform::iso8601();
        for input in ["2015-11-10T12:00:00Z", "2015-11-10T14:30:00+02:30", "2015-11-10"] {
            assert_eq!(compiled.parse(input), preset.parse(input), "{input}");
        }
    }

    #[test]
    fn offsets_shift_to_utc() {
        let t = DateTransform::iso8601();
        assert_eq!(t.parse("2015-11-10T14:00:00+02:00"), Some(utc(2015, 11, 10, 12, 0, 0)));
        assert_eq!(t.parse("2015-11-10T07:00:00-05:00"), Some(utc(2015, 11, 10, 12, 0, 0)));
    }

    #[test]
    fn date_only_pattern_defaults_to_midnight_in_zone() {
        let zone = FixedOffset::east_opt(3600).unwrap();
        let t = DateTransform::new(&DateFormat::new("dd.MM.yyyy").with_time_zone(zone)).unwrap();
        assert_eq!(t.parse("01.02.2020"), Some(utc(2020, 1, 31, 23, 0, 0)));
    }

    #[test]
    fn month_names_and_twelve_hour_clock() {
        let t = DateTransform::from_pattern("EEE, d MMM yyyy h:mm a").unwrap();
        assert_eq!(t.parse("Tue, 10 Nov 2015 3:05 PM"), Some(utc(2015, 11, 10, 15, 5, 0)));
    }

    #[test]
    fn fractional_seconds() {
        let t = DateTransform::from_pattern("yyyy-MM-dd'T'HH:mm:ss.SSSXXX").unwrap();
        let parsed = t.parse("2015-11-10T12:00:00.250Z").unwrap();
        assert_eq!(parsed.nanosecond(), 250_000_000);
        assert_eq!(parsed.day(), 10);
    }

    #[test]
    fn quoted_literals() {
        let t = DateTransform::from_pattern("yyyy 'at' HH 'o''clock'").unwrap();
        assert_eq!(t.parse("2021 at 09 o'clock"), Some(utc(2021, 1, 1, 9, 0, 0)));
    }

    #[test]
    fn rejects_unknown_fields() {
        assert_eq!(
            DateTransform::from_pattern("yyyy-QQ").unwrap_err(),
            DateFormatError::UnsupportedField {
                field: "QQ".into(),
                offset: 5
            }
        );
        assert_eq!(
            DateTransform::from_pattern("HH:mm:ssSSS").unwrap_err(),
            DateFormatError::DetachedFraction { offset: 8 }
        );
        assert_eq!(
            DateTransform::from_pattern("yyyy 'at").unwrap_err(),
            DateFormatError::UnterminatedQuote { offset: 5 }
        );
    }

    #[test]
    fn iso_week_dates() {
        let t = DateTransform::from_pattern("YYYY-'W'ww").unwrap();
        assert_eq!(t.parse("2020-W10"), Some(utc(2020, 3, 2, 0, 0, 0)));

        let t = DateTransform::from_pattern("YYYY-'W'ww-EEE").unwrap();
        assert_eq!(t.parse("2020-W01-Wed"), Some(utc(2020, 1, 1, 0, 0, 0)));
    }

    #[test]
    fn gregorian_week_dates() {
        let format = DateFormat::new("yyyy-ww").with_calendar(Calendar::Gregorian);
        let t = DateTransform::new(&format).unwrap();
        assert_eq!(t.parse("2020-10"), Some(utc(2020, 3, 8, 0, 0, 0)));
    }

    #[test]
    fn incomplete_week_dates_fail_to_build() {
        assert_eq!(
            DateTransform::from_pattern("YYYY-MM-dd").unwrap_err(),
            DateFormatError::IncompleteWeekDate { offset: 0 }
        );
        assert_eq!(
            DateTransform::from_pattern("YYYY").unwrap_err(),
            DateFormatError::IncompleteWeekDate { offset: 0 }
        );
        assert_eq!(
            DateTransform::from_pattern("yyyy-ww").unwrap_err(),
            DateFormatError::IncompleteWeekDate { offset: 5 }
        );

        let gregorian = |pattern: &str| {
            DateTransform::new(&DateFormat::new(pattern).with_calendar(Calendar::Gregorian))
        };
        assert_eq!(
            gregorian("YYYY-ww").unwrap_err(),
            DateFormatError::UnsupportedField {
                field: "YYYY".into(),
                offset: 0
            }
        );
        assert_eq!(
            gregorian("MM ww").unwrap_err(),
            DateFormatError::IncompleteWeekDate { offset: 3 }
        );
    }

    #[test]
    fn field_widths_are_strict() {
        let t = DateTransform::from_pattern("dd.MM.yyyy HH:mm").unwrap();
        assert!(t.parse("01.02.2020 09:15").is_some());
        assert_eq!(t.parse("1.2.2020 09:15"), None);
        assert_eq!(t.parse("01.02.+2020 09:15"), None);
        assert_eq!(t.parse("01.02.2020  9:15"), None);

        let loose = DateTransform::from_pattern("d.M.yyyy").unwrap();
        assert_eq!(loose.parse("1.2.2020"), Some(utc(2020, 2, 1, 0, 0, 0)));
        assert_eq!(loose.parse("01.02.2020"), Some(utc(2020, 2, 1, 0, 0, 0)));
    }

    #[test]
    fn posix_locale_reads_english_names() {
        let format = DateFormat::new("d MMMM yyyy").with_locale(Locale::Posix);
        assert_eq!(format.locale(), Locale::Posix);
        let t = DateTransform::new(&format).unwrap();
        assert_eq!(t.parse("5 March 2021"), Some(utc(2021, 3, 5, 0, 0, 0)));
        assert_eq!(t.parse("5 März 2021"), None);
    }

    #[test]
    fn format_is_copied() {
        let mut format = DateFormat::new("yyyy-MM-dd");
        let t = DateTransform::new(&format).unwrap();
        format = format.with_time_zone(FixedOffset::west_opt(5 * 3600).unwrap());
        assert_eq!(t.format().time_zone(), Utc.fix());
        assert_ne!(format.time_zone(), t.format().time_zone());
    }
}
