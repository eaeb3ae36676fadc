use std::collections::BTreeSet;

use chrono::NaiveDate;
use thiserror::Error;
use tracing::{trace, warn};

use crate::{calendar::DayType, repository::Departure, season::Season};

/// Why a departure does not run on a date.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rejection {
    #[error("Runs on {departure} but the date is {date}")]
    DayType { departure: DayType, date: DayType },
    #[error("No season covers the date")]
    NoSeason,
    #[error("Belongs to another season")]
    Season,
    #[error("Date is explicitly excluded")]
    Excluded,
    #[error("Date is not in the inclusion list")]
    NotIncluded,
    #[error("Date is before the first valid date {0}")]
    BeforeRange(NaiveDate),
    #[error("Date is after the last valid date {0}")]
    AfterRange(NaiveDate),
}

/// Inclusive date bounds, open on a side when that bound is `None`.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
}

impl DateRange {
    pub const fn new(from: Option<NaiveDate>, to: Option<NaiveDate>) -> Self {
        Self { from, to }
    }

    pub const fn is_unbounded(&self) -> bool {
        self.from.is_none() && self.to.is_none()
    }

    pub fn check(&self, date: NaiveDate) -> Result<(), Rejection> {
        if let Some(from) = self.from
            && date < from
        {
            return Err(Rejection::BeforeRange(from));
        }
        if let Some(to) = self.to
            && date > to
        {
            return Err(Rejection::AfterRange(to));
        }
        Ok(())
    }
}

/// A single date-level override on a departure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DateRule {
    /// Never runs on these dates, whatever the other rules say.
    Exclude(BTreeSet<NaiveDate>),
    /// Runs only on these dates.
    Include(BTreeSet<NaiveDate>),
    Range(DateRange),
}

impl DateRule {
    fn check(&self, date: NaiveDate) -> Result<(), Rejection> {
        match self {
            Self::Exclude(dates) if dates.contains(&date) => Err(Rejection::Excluded),
            Self::Exclude(_) => Ok(()),
            Self::Include(dates) if dates.contains(&date) => Ok(()),
            Self::Include(_) => Err(Rejection::NotIncluded),
            Self::Range(range) => range.check(date),
        }
    }
}

/// The date overrides of a departure as a chain evaluated in precedence
/// order: exclusions, then inclusions, then the range.
///
/// Empty lists and unbounded ranges are dropped on construction, so an
/// empty chain means the departure runs on every date of its season.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Validity {
    rules: Vec<DateRule>,
}

impl Validity {
    pub fn new<E, I>(exclude: E, include: I, range: DateRange) -> Self
    where
        E: IntoIterator<Item = NaiveDate>,
        I: IntoIterator<Item = NaiveDate>,
    {
        let exclude: BTreeSet<NaiveDate> = exclude.into_iter().collect();
        let include: BTreeSet<NaiveDate> = include.into_iter().collect();
        let mut rules = Vec::with_capacity(3);
        if !exclude.is_empty() {
            rules.push(DateRule::Exclude(exclude));
        }
        if !include.is_empty() {
            rules.push(DateRule::Include(include));
        }
        if !range.is_unbounded() {
            rules.push(DateRule::Range(range));
        }
        Self { rules }
    }

    pub fn range(range: DateRange) -> Self {
        Self::new([], [], range)
    }

    pub fn rules(&self) -> &[DateRule] {
        &self.rules
    }

    pub fn is_unconstrained(&self) -> bool {
        self.rules.is_empty()
    }

    pub fn check(&self, date: NaiveDate) -> Result<(), Rejection> {
        self.rules.iter().try_for_each(|rule| rule.check(date))
    }
}

/// Decides whether one departure runs on `date`.
///
/// Holiday service replaces weekday service: on a holiday only
/// holiday-tagged departures qualify, on any other day only departures
/// tagged with the date's weekday do.
pub fn check_departure(
    departure: &Departure,
    day_type: DayType,
    season: Option<&Season>,
    date: NaiveDate,
) -> Result<(), Rejection> {
    let day_type_matches = match (day_type, departure.day_type) {
        (DayType::Holiday, departure_day) => departure_day.is_holiday(),
        (_, DayType::Holiday) => false,
        (date_day, departure_day) => date_day == departure_day,
    };
    if !day_type_matches {
        return Err(Rejection::DayType {
            departure: departure.day_type,
            date: day_type,
        });
    }

    let season = season.ok_or(Rejection::NoSeason)?;
    if departure.season_id != season.id {
        return Err(Rejection::Season);
    }

    departure.validity.check(date)
}

/// The departures of one route that run on `date`, ordered by time.
///
/// At most one departure survives per departure time. Should the data still
/// produce two, the first in snapshot order is kept.
pub fn eligible_departures<'a, I>(
    departures: I,
    day_type: DayType,
    season: Option<&Season>,
    date: NaiveDate,
) -> Vec<&'a Departure>
where
    I: IntoIterator<Item = &'a Departure>,
{
    let mut eligible: Vec<&Departure> = departures
        .into_iter()
        .filter(|departure| match check_departure(departure, day_type, season, date) {
            Ok(()) => true,
            Err(rejection) => {
                trace!("Departure {} rejected on {date}: {rejection}", departure.id);
                false
            }
        })
        .collect();

    eligible.sort_by_key(|departure| departure.time);
    eligible.dedup_by(|later, kept| {
        let duplicate = later.time == kept.time;
        if duplicate {
            warn!(
                "Departures {} and {} both run at {} on {date}, keeping {}",
                kept.id, later.id, kept.time, kept.id
            );
        }
        duplicate
    });
    eligible
}
