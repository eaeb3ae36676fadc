use std::{fmt::Display, ops::Add};

use serde::{Serialize, Serializer};
use thiserror::Error;

pub const MINUTES_PER_DAY: u32 = 24 * 60;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Invalid time {value:?}: {reason}")]
pub struct TimeError {
    value: String,
    reason: &'static str,
}

impl TimeError {
    fn new(value: &str, reason: &'static str) -> Self {
        Self {
            value: value.to_string(),
            reason,
        }
    }
}

/// Time of day in minutes since midnight.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Time(u32);

impl Time {
    pub const MIDNIGHT: Self = Self(0);

    pub const fn from_minutes(minutes: u32) -> Self {
        Self(minutes % MINUTES_PER_DAY)
    }

    pub const fn from_hm(hours: u32, minutes: u32) -> Self {
        Self::from_minutes(hours * 60 + minutes)
    }

    pub const fn as_minutes(&self) -> u32 {
        self.0
    }

    pub const fn hour(&self) -> u32 {
        self.0 / 60
    }

    pub const fn minute(&self) -> u32 {
        self.0 % 60
    }

    /// Parses `HH:MM`. A trailing `:SS` is accepted and must be `00`.
    pub fn parse(time: &str) -> Result<Self, TimeError> {
        let time = time.trim();
        let mut split = time.split(':');
        let hours: u32 = split
            .next()
            .filter(|val| val.len() == 2)
            .ok_or_else(|| TimeError::new(time, "expected HH:MM"))?
            .parse()
            .map_err(|_| TimeError::new(time, "invalid hour digits"))?;
        let minutes: u32 = split
            .next()
            .filter(|val| val.len() == 2)
            .ok_or_else(|| TimeError::new(time, "expected HH:MM"))?
            .parse()
            .map_err(|_| TimeError::new(time, "invalid minute digits"))?;
        if let Some(seconds) = split.next()
            && seconds != "00"
        {
            return Err(TimeError::new(time, "seconds are not supported"));
        }
        if split.next().is_some() {
            return Err(TimeError::new(time, "expected HH:MM"));
        }
        if hours > 23 {
            return Err(TimeError::new(time, "hour must be 0-23"));
        }
        if minutes > 59 {
            return Err(TimeError::new(time, "minute must be 0-59"));
        }
        Ok(Self::from_hm(hours, minutes))
    }

    pub fn to_hm_string(&self) -> String {
        format!("{:02}:{:02}", self.hour(), self.minute())
    }

    /// Minutes from `self` forward to `later`, wrapping once past midnight.
    pub const fn until(&self, later: Time) -> Duration {
        if later.0 >= self.0 {
            Duration(later.0 - self.0)
        } else {
            Duration(later.0 + MINUTES_PER_DAY - self.0)
        }
    }
}

impl Display for Time {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:02}:{:02}", self.hour(), self.minute())
    }
}

impl Serialize for Time {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(self)
    }
}

impl Add<Duration> for Time {
    type Output = Self;

    fn add(self, rhs: Duration) -> Self::Output {
        Self::from_minutes(self.0 + rhs.0)
    }
}

/// Whole minutes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct Duration(u32);

impl Duration {
    pub const fn from_minutes(minutes: u32) -> Self {
        Self(minutes)
    }

    pub const fn as_minutes(&self) -> u32 {
        self.0
    }
}

#[test]
fn parse_unparse_1() {
    let time = "00:00";
    let stime = Time::parse(time).unwrap();
    assert_eq!(time, stime.to_hm_string())
}

#[test]
fn parse_unparse_2() {
    let time = "16:30";
    let stime = Time::parse(time).unwrap();
    assert_eq!(time, stime.to_hm_string())
}

#[test]
fn parse_with_zero_seconds() {
    assert_eq!(Time::parse("08:05:00").unwrap(), Time::from_hm(8, 5));
}

#[test]
fn valid_time_test_1() {
    assert_eq!(Time::parse("01:30").unwrap().as_minutes(), 90);
}

#[test]
fn invalid_time_test_1() {
    assert!(Time::parse("0a:00").is_err())
}

#[test]
fn invalid_time_test_2() {
    assert!(Time::parse("24:00").is_err());
    assert!(Time::parse("12:60").is_err());
}

#[test]
fn invalid_time_test_3() {
    assert!(Time::parse("8:00").is_err());
    assert!(Time::parse("08:00:30").is_err());
    assert!(Time::parse("").is_err());
}

#[test]
fn until_wraps_past_midnight() {
    let first = Time::from_hm(23, 50);
    let last = Time::from_hm(0, 20);
    assert_eq!(first.until(last), Duration::from_minutes(30));
    assert_eq!(last.until(first), Duration::from_minutes(23 * 60 + 30));
}

#[test]
fn until_same_day() {
    assert_eq!(
        Time::from_hm(8, 0).until(Time::from_hm(8, 40)),
        Duration::from_minutes(40)
    );
}
