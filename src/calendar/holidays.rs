use std::collections::BTreeSet;

use chrono::{Datelike, Days, NaiveDate};

/// Fixed-date statutory holidays as (month, day).
const FIXED_HOLIDAYS: [(u32, u32); 11] = [
    (1, 1),   // New Year
    (1, 6),   // Epiphany
    (5, 1),   // Labour Day
    (5, 30),  // Statehood Day
    (6, 22),  // Anti-Fascist Struggle Day
    (8, 5),   // Victory Day
    (8, 15),  // Assumption
    (11, 1),  // All Saints
    (11, 18), // Remembrance Day
    (12, 25), // Christmas
    (12, 26), // St. Stephen
];

/// Days after Easter Sunday of the movable holidays.
const EASTER_OFFSETS: [u64; 3] = [
    0,  // Easter Sunday
    1,  // Easter Monday
    60, // Corpus Christi
];

/// The set of civil dates treated as holidays.
///
/// Holds explicit dates and, when enabled, applies the statutory rules for
/// whatever year is asked about, so the calendar never runs out.
#[derive(Debug, Clone, Default)]
pub struct HolidayCalendar {
    dates: BTreeSet<NaiveDate>,
    statutory: bool,
}

impl HolidayCalendar {
    /// Only the dates that are explicitly added.
    pub fn new() -> Self {
        Default::default()
    }

    /// Statutory holidays for every year.
    pub fn statutory() -> Self {
        Self {
            dates: BTreeSet::new(),
            statutory: true,
        }
    }

    pub fn with_dates<I>(mut self, dates: I) -> Self
    where
        I: IntoIterator<Item = NaiveDate>,
    {
        self.dates.extend(dates);
        self
    }

    pub fn is_holiday(&self, date: NaiveDate) -> bool {
        self.dates.contains(&date) || (self.statutory && is_statutory_holiday(date))
    }

    /// All holidays falling in `year`, sorted.
    pub fn holidays_in(&self, year: i32) -> Vec<NaiveDate> {
        let mut dates: BTreeSet<NaiveDate> = self
            .dates
            .iter()
            .copied()
            .filter(|date| date.year() == year)
            .collect();
        if self.statutory {
            dates.extend(statutory_holidays(year));
        }
        dates.into_iter().collect()
    }
}

fn is_statutory_holiday(date: NaiveDate) -> bool {
    if FIXED_HOLIDAYS.contains(&(date.month(), date.day())) {
        return true;
    }
    easter_sunday(date.year()).is_some_and(|easter| {
        EASTER_OFFSETS
            .iter()
            .filter_map(|offset| easter.checked_add_days(Days::new(*offset)))
            .any(|holiday| holiday == date)
    })
}

fn statutory_holidays(year: i32) -> Vec<NaiveDate> {
    let fixed = FIXED_HOLIDAYS
        .iter()
        .filter_map(|(month, day)| NaiveDate::from_ymd_opt(year, *month, *day));
    let movable = easter_sunday(year).into_iter().flat_map(|easter| {
        EASTER_OFFSETS
            .iter()
            .filter_map(move |offset| easter.checked_add_days(Days::new(*offset)))
    });
    fixed.chain(movable).collect()
}

/// Gregorian Easter Sunday (anonymous Gregorian computus).
pub fn easter_sunday(year: i32) -> Option<NaiveDate> {
    let a = year % 19;
    let b = year / 100;
    let c = year % 100;
    let d = b / 4;
    let e = b % 4;
    let f = (b + 8) / 25;
    let g = (b - f + 1) / 3;
    let h = (19 * a + b - d - g + 15) % 30;
    let i = c / 4;
    let k = c % 4;
    let l = (32 + 2 * e + 2 * i - h - k) % 7;
    let m = (a + 11 * h + 22 * l) / 451;
    let month = (h + l - 7 * m + 114) / 31;
    let day = (h + l - 7 * m + 114) % 31 + 1;
    NaiveDate::from_ymd_opt(year, month as u32, day as u32)
}
