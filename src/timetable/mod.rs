//! Resolves which departures run on a date.
//!
//! A [`Timetable`] resolves the day type and season for one date once and
//! answers route, line and today queries against a [`Repository`].

mod eligibility;
mod projection;
mod today;

pub use eligibility::*;
pub use projection::*;
pub use today::*;

use chrono::NaiveDate;
use serde::Serialize;
use thiserror::Error;

use crate::{
    calendar::DayType,
    repository::{Direction, InvalidDirection, Repository, Route},
    season::{AmbiguousSeason, Season, SeasonLabel},
    shared::{
        Language,
        date::{DateError, parse_date},
        time::{Duration, Time},
    },
};

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    #[error(transparent)]
    InvalidDate(#[from] DateError),
    #[error(transparent)]
    InvalidDirection(#[from] InvalidDirection),
    #[error("Line id does not match any entry: {0}")]
    UnknownLine(String),
    #[error("Route id does not match any entry: {0}")]
    UnknownRoute(String),
    #[error("Line {line_id} has no route for direction {direction}")]
    MissingDirection { line_id: String, direction: u8 },
    #[error(transparent)]
    AmbiguousSeason(#[from] AmbiguousSeason),
}

/// A served stop in a query result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StopTimeEntry {
    pub stop_id: String,
    pub name: String,
    pub time: Time,
}

/// One departure of a route as shown in a route or line timetable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScheduledDeparture {
    pub departure_id: String,
    pub time: Time,
    pub destination: Option<String>,
    /// Minutes.
    pub duration: Duration,
    pub stops: Vec<StopTimeEntry>,
    pub notes: Option<String>,
}

/// Every departure of one route on one date.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RouteTimetable {
    pub route_id: String,
    pub line_id: String,
    pub line_name: String,
    pub subtype: Option<String>,
    pub direction: Direction,
    pub direction_label: String,
    pub origin: Option<String>,
    pub destination: Option<String>,
    pub date: String,
    pub day_type: DayType,
    pub season: Option<SeasonLabel>,
    pub departures: Vec<ScheduledDeparture>,
}

impl Repository {
    /// Resolves day type and season for `date`.
    pub fn timetable(&self, date: NaiveDate) -> Result<Timetable<'_>, self::Error> {
        Timetable::new(self, date)
    }

    /// Same as [`Repository::timetable`] for a `YYYY-MM-DD` string.
    pub fn timetable_for(&self, date: &str) -> Result<Timetable<'_>, self::Error> {
        let date = parse_date(date)?;
        Timetable::new(self, date)
    }

    /// The timetable for the current civil date in the repository timezone.
    pub fn timetable_today(&self) -> Result<Timetable<'_>, self::Error> {
        Timetable::new(self, self.calendar().today())
    }

    /// `"<origin> - <destination>"` from the route's first and last stop.
    pub fn direction_label(&self, route: &Route, language: Language) -> String {
        let name = |stop_idx: Option<u32>| {
            stop_idx
                .map(|stop_idx| self.stops[stop_idx as usize].display_name(language))
                .unwrap_or_default()
        };
        format!(
            "{} - {}",
            name(route.origin_idx()),
            name(route.destination_idx())
        )
    }
}

/// Queries for one civil date.
pub struct Timetable<'a> {
    repository: &'a Repository,
    date: NaiveDate,
    day_type: DayType,
    season: Option<&'a Season>,
    language: Language,
}

impl<'a> Timetable<'a> {
    pub fn new(repository: &'a Repository, date: NaiveDate) -> Result<Self, self::Error> {
        let day_type = repository.day_type(date);
        let season = repository.season_for(date)?;
        Ok(Self {
            repository,
            date,
            day_type,
            season,
            language: Language::default(),
        })
    }

    pub fn language(mut self, language: Language) -> Self {
        self.language = language;
        self
    }

    pub fn date(&self) -> NaiveDate {
        self.date
    }

    pub fn day_type(&self) -> DayType {
        self.day_type
    }

    pub fn season(&self) -> Option<&'a Season> {
        self.season
    }

    /// Departures of `route` that run on this date, with projected stops.
    pub fn scheduled(&self, route: &Route) -> Vec<ScheduledDeparture> {
        let stops = self.repository.stops_by_route(route);
        eligible_departures(
            self.repository.departures_by_route(route),
            self.day_type,
            self.season,
            self.date,
        )
        .into_iter()
        .map(|departure| {
            let projection = project_stop_times(departure, route, &stops);
            ScheduledDeparture {
                departure_id: departure.id.to_string(),
                time: departure.time,
                destination: projection
                    .destination
                    .map(|stop| stop.display_name(self.language).to_string()),
                duration: projection.duration,
                stops: projection
                    .calls
                    .iter()
                    .map(|call| StopTimeEntry {
                        stop_id: call.stop.id.to_string(),
                        name: call.stop.display_name(self.language).to_string(),
                        time: call.time,
                    })
                    .collect(),
                notes: departure.notes.as_deref().map(str::to_string),
            }
        })
        .collect()
    }

    pub fn route(&self, route_id: &str) -> Result<RouteTimetable, self::Error> {
        let route = self
            .repository
            .route_by_id(route_id)
            .ok_or_else(|| self::Error::UnknownRoute(route_id.to_string()))?;
        Ok(self.route_timetable(route))
    }

    /// The timetable of one direction of a line. `direction` must be 0 or 1.
    pub fn line(&self, line_id: &str, direction: u8) -> Result<RouteTimetable, self::Error> {
        let direction_index = direction;
        let direction = Direction::try_from(direction)?;
        let line = self
            .repository
            .line_by_id(line_id)
            .ok_or_else(|| self::Error::UnknownLine(line_id.to_string()))?;
        let route = self
            .repository
            .route_by_direction(line, direction)
            .ok_or_else(|| self::Error::MissingDirection {
                line_id: line_id.to_string(),
                direction: direction_index,
            })?;
        Ok(self.route_timetable(route))
    }

    fn route_timetable(&self, route: &Route) -> RouteTimetable {
        let line = self.repository.line_by_route(route);
        let stop_name = |stop_idx: Option<u32>| {
            stop_idx.map(|stop_idx| {
                self.repository.stops[stop_idx as usize]
                    .display_name(self.language)
                    .to_string()
            })
        };
        RouteTimetable {
            route_id: route.id.to_string(),
            line_id: line.id.to_string(),
            line_name: line.name.to_string(),
            subtype: line.subtype.as_deref().map(str::to_string),
            direction: route.direction,
            direction_label: self.repository.direction_label(route, self.language),
            origin: stop_name(route.origin_idx()),
            destination: stop_name(route.destination_idx()),
            date: self.date.to_string(),
            day_type: self.day_type,
            season: self.season.map(|season| season.label),
            departures: self.scheduled(route),
        }
    }
}
