//! Civil calendar decisions: which day-type bucket a date falls into.
//!
//! All decisions are made on civil dates in one fixed timezone. Instants are
//! converted to a civil date first and never compared directly.

mod holidays;
pub use holidays::*;

use std::{fmt::Display, str::FromStr};

use chrono::{DateTime, Datelike, NaiveDate, TimeZone, Utc, Weekday};
use chrono_tz::Tz;
use serde::{Serialize, Serializer};
use thiserror::Error;

pub const DEFAULT_TIMEZONE: Tz = chrono_tz::Europe::Zagreb;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Unknown day type {0:?}")]
pub struct UnknownDayType(pub String);

/// A weekday bucket, or the holiday bucket that supersedes it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum DayType {
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
    Saturday,
    Sunday,
    Holiday,
}

impl DayType {
    pub const fn is_holiday(&self) -> bool {
        matches!(self, Self::Holiday)
    }

    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Monday => "MON",
            Self::Tuesday => "TUE",
            Self::Wednesday => "WED",
            Self::Thursday => "THU",
            Self::Friday => "FRI",
            Self::Saturday => "SAT",
            Self::Sunday => "SUN",
            Self::Holiday => "PRAZNIK",
        }
    }
}

impl From<Weekday> for DayType {
    fn from(value: Weekday) -> Self {
        match value {
            Weekday::Mon => Self::Monday,
            Weekday::Tue => Self::Tuesday,
            Weekday::Wed => Self::Wednesday,
            Weekday::Thu => Self::Thursday,
            Weekday::Fri => Self::Friday,
            Weekday::Sat => Self::Saturday,
            Weekday::Sun => Self::Sunday,
        }
    }
}

impl FromStr for DayType {
    type Err = UnknownDayType;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "MON" => Ok(Self::Monday),
            "TUE" => Ok(Self::Tuesday),
            "WED" => Ok(Self::Wednesday),
            "THU" => Ok(Self::Thursday),
            "FRI" => Ok(Self::Friday),
            "SAT" => Ok(Self::Saturday),
            "SUN" => Ok(Self::Sunday),
            "PRAZNIK" | "HOLIDAY" => Ok(Self::Holiday),
            _ => Err(UnknownDayType(s.to_string())),
        }
    }
}

impl Display for DayType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for DayType {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(self.as_str())
    }
}

/// Holiday status wins over the weekday bucket.
pub fn resolve_day_type(date: NaiveDate, holidays: &HolidayCalendar) -> DayType {
    if holidays.is_holiday(date) {
        DayType::Holiday
    } else {
        date.weekday().into()
    }
}

/// The civil timezone and holiday set used for every "what day is it"
/// decision.
#[derive(Debug, Clone)]
pub struct Calendar {
    timezone: Tz,
    holidays: HolidayCalendar,
}

impl Default for Calendar {
    fn default() -> Self {
        Self::new(DEFAULT_TIMEZONE, HolidayCalendar::statutory())
    }
}

impl Calendar {
    pub fn new(timezone: Tz, holidays: HolidayCalendar) -> Self {
        Self { timezone, holidays }
    }

    pub fn timezone(&self) -> Tz {
        self.timezone
    }

    pub fn holidays(&self) -> &HolidayCalendar {
        &self.holidays
    }

    /// The civil date an instant falls on in this calendar's timezone.
    pub fn civil_date(&self, instant: DateTime<Utc>) -> NaiveDate {
        self.timezone
            .from_utc_datetime(&instant.naive_utc())
            .date_naive()
    }

    pub fn today(&self) -> NaiveDate {
        self.civil_date(Utc::now())
    }

    pub fn is_holiday(&self, date: NaiveDate) -> bool {
        self.holidays.is_holiday(date)
    }

    pub fn day_type(&self, date: NaiveDate) -> DayType {
        resolve_day_type(date, &self.holidays)
    }
}
