//! # Temporal Value Objects
//!
//! Calendar values without a time of day: [`Date`], [`DateRange`],
//! [`BirthDate`] and [`Day`].
//!
//! ```text
//! Date       "2024-03-15"               ISO 8601 calendar date
//! DateRange  "2024-03-01/2024-03-31"    inclusive on both ends, 31 days
//! BirthDate  "1990-07-20"               not in the future; age() in whole years
//! Day        15                         day of month, 1..=31
//! ```
//!
//! "Today" is the current UTC date.

use std::fmt;
use std::str::FromStr;
use std::sync::atomic::{AtomicU32, Ordering};

use chrono::{Datelike, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::dto::DateRangeDto;
use crate::error::{Error, Result};
use crate::sql::{Scanner, SqlValue, Valuer};

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Legal age until `set_legal_age` is called.
pub const DEFAULT_LEGAL_AGE: u32 = 18;

/// Oldest accepted birth date, in years before today.
const MAX_AGE: u32 = 150;

static LEGAL_AGE: AtomicU32 = AtomicU32::new(DEFAULT_LEGAL_AGE);

/// Sets the age [`BirthDate::is_legal_age`] checks against.
pub fn set_legal_age(age: u32) {
    LEGAL_AGE.store(age, Ordering::Relaxed);
}

pub fn legal_age() -> u32 {
    LEGAL_AGE.load(Ordering::Relaxed)
}

// =============================================================================
// Date
// =============================================================================

/// A calendar date. `Date::default()` is the empty zero value and maps to
/// NULL.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Date(Option<NaiveDate>);

impl Date {
    /// Parses `YYYY-MM-DD`.
    ///
    /// ## Example
    /// ```rust
    /// use valor_core::Date;
    ///
    /// let date = Date::new("2024-02-29").unwrap();
    /// assert_eq!(date.to_string(), "2024-02-29");
    /// assert!(Date::new("2023-02-29").is_err());
    /// assert!(Date::new("29/02/2024").is_err());
    /// ```
    pub fn new(input: &str) -> Result<Self> {
        NaiveDate::parse_from_str(input.trim(), DATE_FORMAT)
            .map(|date| Date(Some(date)))
            .map_err(|e| {
                Error::invalid("date must be a valid YYYY-MM-DD")
                    .with_context("input", input)
                    .with_source(e)
            })
    }

    pub fn from_ymd(year: i32, month: u32, day: u32) -> Result<Self> {
        NaiveDate::from_ymd_opt(year, month, day).map(|date| Date(Some(date))).ok_or_else(|| {
            Error::invalid("date does not exist")
                .with_context("year", year)
                .with_context("month", month)
                .with_context("day", day)
        })
    }

    pub const fn from_naive(date: NaiveDate) -> Self {
        Date(Some(date))
    }

    /// Current UTC date.
    pub fn today() -> Self {
        Date(Some(Utc::now().date_naive()))
    }

    pub const fn naive(&self) -> Option<NaiveDate> {
        self.0
    }

    pub const fn is_empty(&self) -> bool {
        self.0.is_none()
    }

    fn require(&self, what: &str) -> Result<NaiveDate> {
        self.0.ok_or_else(|| Error::invalid(format!("{what} requires a date")))
    }
}

impl From<NaiveDate> for Date {
    fn from(value: NaiveDate) -> Self {
        Date::from_naive(value)
    }
}

impl fmt::Display for Date {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            Some(date) => write!(f, "{}", date.format(DATE_FORMAT)),
            None => Ok(()),
        }
    }
}

impl FromStr for Date {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Date::new(s)
    }
}

impl TryFrom<String> for Date {
    type Error = Error;

    fn try_from(value: String) -> Result<Self> {
        Date::new(&value)
    }
}

impl From<Date> for String {
    fn from(value: Date) -> Self {
        value.to_string()
    }
}

impl Valuer for Date {
    fn to_sql(&self) -> SqlValue {
        match self.0 {
            Some(_) => SqlValue::Text(self.to_string()),
            None => SqlValue::Null,
        }
    }
}

impl Scanner for Date {
    /// Accepts `YYYY-MM-DD` text or a timestamp (its UTC date).
    fn scan(src: SqlValue) -> Result<Self> {
        match src {
            SqlValue::Timestamp(at) => Ok(Date(Some(at.date_naive()))),
            other => match other.into_text("Date")? {
                None => Ok(Date::default()),
                Some(text) => Date::new(&text),
            },
        }
    }
}

// =============================================================================
// Date Range
// =============================================================================

/// A closed interval of dates, `start <= end`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "DateRangeDto", into = "DateRangeDto")]
pub struct DateRange {
    start: Date,
    end: Date,
}

impl DateRange {
    /// ## Example
    /// ```rust
    /// use valor_core::{Date, DateRange};
    ///
    /// let march = DateRange::new(Date::new("2024-03-01").unwrap(), Date::new("2024-03-31").unwrap()).unwrap();
    /// assert_eq!(march.days(), 31);
    /// assert!(march.contains(&Date::new("2024-03-15").unwrap()));
    /// ```
    pub fn new(start: Date, end: Date) -> Result<Self> {
        let (from, to) = (start.require("range start")?, end.require("range end")?);
        if from > to {
            return Err(Error::invalid("range start is after its end")
                .with_context("start", start.to_string())
                .with_context("end", end.to_string()));
        }
        Ok(DateRange { start, end })
    }

    /// Parses `start/end` (ISO 8601 interval of two dates).
    pub fn parse(input: &str) -> Result<Self> {
        let (start, end) = input
            .trim()
            .split_once('/')
            .ok_or_else(|| Error::invalid("date range must look like start/end").with_context("input", input))?;
        DateRange::new(Date::new(start)?, Date::new(end)?)
    }

    pub fn start(&self) -> Date {
        self.start
    }

    pub fn end(&self) -> Date {
        self.end
    }

    pub fn is_empty(&self) -> bool {
        self.start.is_empty()
    }

    /// Inclusive membership test.
    pub fn contains(&self, date: &Date) -> bool {
        !date.is_empty() && !self.is_empty() && self.start <= *date && *date <= self.end
    }

    /// Number of days covered, both ends included.
    pub fn days(&self) -> i64 {
        match (self.start.naive(), self.end.naive()) {
            (Some(start), Some(end)) => (end - start).num_days() + 1,
            _ => 0,
        }
    }

    pub fn overlaps(&self, other: &DateRange) -> bool {
        !self.is_empty() && !other.is_empty() && self.start <= other.end && other.start <= self.end
    }
}

impl fmt::Display for DateRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            return Ok(());
        }
        write!(f, "{}/{}", self.start, self.end)
    }
}

impl TryFrom<DateRangeDto> for DateRange {
    type Error = Error;

    fn try_from(dto: DateRangeDto) -> Result<Self> {
        DateRange::new(Date::new(&dto.start)?, Date::new(&dto.end)?)
    }
}

impl From<DateRange> for DateRangeDto {
    fn from(range: DateRange) -> Self {
        DateRangeDto {
            start: range.start.to_string(),
            end: range.end.to_string(),
        }
    }
}

impl Valuer for DateRange {
    fn to_sql(&self) -> SqlValue {
        if self.is_empty() {
            SqlValue::Null
        } else {
            SqlValue::Text(self.to_string())
        }
    }
}

impl Scanner for DateRange {
    fn scan(src: SqlValue) -> Result<Self> {
        match src.into_text("DateRange")? {
            None => Ok(DateRange::default()),
            Some(text) => DateRange::parse(&text),
        }
    }
}

// =============================================================================
// Birth Date
// =============================================================================

/// A date of birth: not in the future and at most 150 years ago.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct BirthDate(Date);

impl BirthDate {
    pub fn new(input: &str) -> Result<Self> {
        BirthDate::from_date(Date::new(input)?)
    }

    /// Validates against today's date.
    pub fn from_date(date: Date) -> Result<Self> {
        BirthDate::from_date_on(date, Date::today())
    }

    /// Validates against an explicit "today".
    pub fn from_date_on(date: Date, today: Date) -> Result<Self> {
        let born = date.require("birth date")?;
        let today_naive = today.require("reference date")?;
        if born > today_naive {
            return Err(Error::invalid("birth date is in the future").with_context("input", date.to_string()));
        }
        let birth = BirthDate(date);
        if birth.age_on(&today) > MAX_AGE {
            return Err(Error::invalid("birth date is too far in the past")
                .with_context("input", date.to_string())
                .with_context("max_age", MAX_AGE));
        }
        Ok(birth)
    }

    pub fn date(&self) -> Date {
        self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Whole years completed as of today.
    pub fn age(&self) -> u32 {
        self.age_on(&Date::today())
    }

    /// Whole years completed on `on`; 0 when `on` precedes the birth date.
    ///
    /// ## Example
    /// ```rust
    /// use valor_core::{BirthDate, Date};
    ///
    /// let today = Date::new("2024-07-19").unwrap();
    /// let birth = BirthDate::from_date_on(Date::new("2006-07-20").unwrap(), today).unwrap();
    /// assert_eq!(birth.age_on(&today), 17);
    /// assert_eq!(birth.age_on(&Date::new("2024-07-20").unwrap()), 18);
    /// ```
    pub fn age_on(&self, on: &Date) -> u32 {
        let (Some(born), Some(on)) = (self.0.naive(), on.naive()) else {
            return 0;
        };
        if on < born {
            return 0;
        }
        let mut years = on.year() - born.year();
        if (on.month(), on.day()) < (born.month(), born.day()) {
            years -= 1;
        }
        u32::try_from(years).unwrap_or(0)
    }

    /// `age() >= legal_age()`.
    pub fn is_legal_age(&self) -> bool {
        !self.is_empty() && self.age() >= legal_age()
    }

    pub fn is_legal_age_on(&self, on: &Date) -> bool {
        !self.is_empty() && self.age_on(on) >= legal_age()
    }
}

impl fmt::Display for BirthDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

impl FromStr for BirthDate {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        BirthDate::new(s)
    }
}

impl TryFrom<String> for BirthDate {
    type Error = Error;

    fn try_from(value: String) -> Result<Self> {
        BirthDate::new(&value)
    }
}

impl From<BirthDate> for String {
    fn from(value: BirthDate) -> Self {
        value.to_string()
    }
}

impl Valuer for BirthDate {
    fn to_sql(&self) -> SqlValue {
        self.0.to_sql()
    }
}

impl Scanner for BirthDate {
    fn scan(src: SqlValue) -> Result<Self> {
        let date = Date::scan(src)?;
        if date.is_empty() {
            Ok(BirthDate::default())
        } else {
            BirthDate::from_date(date)
        }
    }
}

// =============================================================================
// Day of Month
// =============================================================================

/// A day of the month, `1..=31` (billing day, due day). `Day::default()` (0)
/// is the zero value and maps to NULL.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "u8")]
pub struct Day(u8);

impl Day {
    pub fn new(day: i64) -> Result<Self> {
        match u8::try_from(day) {
            Ok(day) if (1..=31).contains(&day) => Ok(Day(day)),
            _ => Err(Error::invalid("day must be between 1 and 31").with_context("input", day)),
        }
    }

    #[inline]
    pub fn value(&self) -> u8 {
        self.0
    }

    /// This day in the given month, clamped to the month's last day
    /// (day 31 in February 2024 → 2024-02-29).
    pub fn in_month(&self, year: i32, month: u32) -> Result<Date> {
        if self.0 == 0 {
            return Err(Error::invalid("day is empty"));
        }
        let first = Date::from_ymd(year, month, 1)?.require("month")?;
        let next_first = if month == 12 {
            NaiveDate::from_ymd_opt(year + 1, 1, 1)
        } else {
            NaiveDate::from_ymd_opt(year, month + 1, 1)
        };
        let last_day = next_first
            .map(|next| (next - first).num_days() as u32)
            .unwrap_or(31);
        Date::from_ymd(year, month, u32::from(self.0).min(last_day))
    }
}

impl fmt::Display for Day {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<i64> for Day {
    type Error = Error;

    fn try_from(value: i64) -> Result<Self> {
        Day::new(value)
    }
}

impl From<Day> for u8 {
    fn from(value: Day) -> Self {
        value.0
    }
}

impl Valuer for Day {
    fn to_sql(&self) -> SqlValue {
        if self.0 == 0 {
            SqlValue::Null
        } else {
            SqlValue::Integer(i64::from(self.0))
        }
    }
}

impl Scanner for Day {
    fn scan(src: SqlValue) -> Result<Self> {
        match src.into_integer("Day")? {
            None => Ok(Day::default()),
            Some(day) => Day::new(day),
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn date(s: &str) -> Date {
        Date::new(s).unwrap()
    }

    #[test]
    fn test_date_parse_and_format() {
        assert_eq!(date(" 2024-03-05 ").to_string(), "2024-03-05");
        assert_eq!(Date::from_ymd(2024, 3, 5).unwrap(), date("2024-03-05"));
        assert!(Date::from_ymd(2024, 13, 1).is_err());
        assert!(Date::new("2024-3-5x").is_err());
        assert!(Date::default().is_empty());
        assert_eq!(Date::default().to_string(), "");
    }

    #[test]
    fn test_date_sql() {
        let d = date("2024-03-05");
        assert_eq!(d.to_sql(), SqlValue::Text("2024-03-05".into()));
        assert_eq!(Date::scan(d.to_sql()).unwrap(), d);
        let at = Utc.with_ymd_and_hms(2024, 3, 5, 23, 59, 0).unwrap();
        assert_eq!(Date::scan(SqlValue::Timestamp(at)).unwrap(), d);
        assert_eq!(Date::scan(SqlValue::Null).unwrap(), Date::default());
        assert_eq!(Date::default().to_sql(), SqlValue::Null);
        assert!(Date::scan(SqlValue::Integer(20240305)).is_err());
    }

    #[test]
    fn test_date_range() {
        let range = DateRange::new(date("2024-02-01"), date("2024-02-29")).unwrap();
        assert_eq!(range.days(), 29);
        assert!(range.contains(&date("2024-02-01")));
        assert!(range.contains(&date("2024-02-29")));
        assert!(!range.contains(&date("2024-03-01")));
        assert!(!range.contains(&Date::default()));

        let single = DateRange::new(date("2024-01-01"), date("2024-01-01")).unwrap();
        assert_eq!(single.days(), 1);

        assert!(DateRange::new(date("2024-03-01"), date("2024-02-01")).unwrap_err().is_invalid());
        assert!(DateRange::new(Date::default(), date("2024-02-01")).is_err());
    }

    #[test]
    fn test_date_range_overlaps() {
        let jan = DateRange::parse("2024-01-01/2024-01-31").unwrap();
        let mid = DateRange::parse("2024-01-31/2024-02-15").unwrap();
        let mar = DateRange::parse("2024-03-01/2024-03-31").unwrap();
        assert!(jan.overlaps(&mid));
        assert!(!jan.overlaps(&mar));
    }

    #[test]
    fn test_date_range_json_and_sql() {
        let range = DateRange::parse("2024-01-01/2024-01-31").unwrap();
        let json = serde_json::to_string(&range).unwrap();
        assert_eq!(json, r#"{"start":"2024-01-01","end":"2024-01-31"}"#);
        assert_eq!(serde_json::from_str::<DateRange>(&json).unwrap(), range);
        assert!(serde_json::from_str::<DateRange>(r#"{"start":"2024-02-01","end":"2024-01-01"}"#).is_err());

        assert_eq!(range.to_sql(), SqlValue::Text("2024-01-01/2024-01-31".into()));
        assert_eq!(DateRange::scan(range.to_sql()).unwrap(), range);
        assert!(DateRange::scan(SqlValue::Null).unwrap().is_empty());
    }

    #[test]
    fn test_birth_date_age() {
        let today = date("2024-07-19");
        let birth = BirthDate::from_date_on(date("1990-07-20"), today).unwrap();
        assert_eq!(birth.age_on(&today), 33);
        assert_eq!(birth.age_on(&date("2024-07-20")), 34);
        assert_eq!(birth.age_on(&date("1980-01-01")), 0);

        let leap = BirthDate::from_date_on(date("2000-02-29"), today).unwrap();
        assert_eq!(leap.age_on(&date("2001-02-28")), 0);
        assert_eq!(leap.age_on(&date("2001-03-01")), 1);
    }

    #[test]
    fn test_birth_date_bounds() {
        let today = date("2024-07-19");
        assert!(BirthDate::from_date_on(date("2024-07-20"), today).unwrap_err().is_invalid());
        assert!(BirthDate::from_date_on(date("1870-01-01"), today).is_err());
        assert!(BirthDate::from_date_on(Date::default(), today).is_err());
        assert!(BirthDate::new("3000-01-01").is_err());
    }

    #[test]
    fn test_birth_date_legal_age() {
        let on = date("2024-07-19");
        let adult = BirthDate::from_date_on(date("2006-07-19"), on).unwrap();
        let minor = BirthDate::from_date_on(date("2006-07-20"), on).unwrap();
        assert_eq!(legal_age(), DEFAULT_LEGAL_AGE);
        assert!(adult.is_legal_age_on(&on));
        assert!(!minor.is_legal_age_on(&on));
        assert!(!BirthDate::default().is_legal_age());
    }

    #[test]
    fn test_day() {
        assert_eq!(Day::new(31).unwrap().value(), 31);
        for bad in [0, 32, -1, 256] {
            assert!(Day::new(bad).is_err(), "{bad} should be rejected");
        }
        let due = Day::new(31).unwrap();
        assert_eq!(due.in_month(2024, 2).unwrap(), date("2024-02-29"));
        assert_eq!(due.in_month(2023, 12).unwrap(), date("2023-12-31"));
        assert_eq!(Day::new(10).unwrap().in_month(2024, 4).unwrap(), date("2024-04-10"));
    }

    #[test]
    fn test_day_sql_and_json() {
        let day = Day::new(15).unwrap();
        assert_eq!(day.to_sql(), SqlValue::Integer(15));
        assert_eq!(Day::scan(SqlValue::Integer(15)).unwrap(), day);
        assert_eq!(Day::scan(SqlValue::Null).unwrap(), Day::default());
        assert_eq!(serde_json::to_string(&day).unwrap(), "15");
        assert!(serde_json::from_str::<Day>("32").is_err());
    }
}
