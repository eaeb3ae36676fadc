use std::{
    collections::{HashMap, HashSet},
    sync::Arc,
};

mod models;
mod source;
pub use models::*;
use thiserror::Error;

use chrono::NaiveDate;
use chrono_tz::Tz;

use crate::{
    calendar::{Calendar, DEFAULT_TIMEZONE, DayType, HolidayCalendar},
    season::{self, AmbiguousSeason, InvalidSeason, Season, SeasonOverlap},
    snapshot,
};

#[derive(Error, Debug)]
pub enum Error {
    #[error("Snapshot error: {0}")]
    Snapshot(#[from] snapshot::Error),
    #[error("Invalid {table} record {id}: {reason}")]
    InvalidRecord {
        table: &'static str,
        id: String,
        reason: String,
    },
    #[error("{table} record {id} references unknown {kind} {reference}")]
    UnknownReference {
        table: &'static str,
        id: String,
        kind: &'static str,
        reference: String,
    },
    #[error("Duplicate {table} id {id}")]
    DuplicateId { table: &'static str, id: String },
    #[error("Line {line_id} has more than one route for direction {direction}")]
    DuplicateDirection { line_id: String, direction: u8 },
    #[error("Route {route_id} uses stop sequence {sequence} more than once")]
    DuplicateStopSequence { route_id: String, sequence: u32 },
    #[error(transparent)]
    InvalidSeason(#[from] InvalidSeason),
    #[error("Season catalogue has overlapping seasons: {}", describe_overlaps(.0))]
    SeasonOverlaps(Vec<SeasonOverlap>),
}

fn describe_overlaps(overlaps: &[SeasonOverlap]) -> String {
    overlaps
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

/// Settings applied while building a [`Repository`].
#[derive(Debug, Clone)]
pub struct Config {
    /// Civil timezone for every weekday and holiday decision.
    pub timezone: Tz,
    /// Stops that count as departing from the island.
    pub island_origins: Vec<String>,
    /// Apply the statutory holiday rules on top of the holidays table.
    pub statutory_holidays: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            timezone: DEFAULT_TIMEZONE,
            island_origins: Vec::new(),
            statutory_holidays: true,
        }
    }
}

/// Read-only, indexed snapshot of the timetable reference data.
///
/// Built once per import and shared between queries; nothing in it is
/// mutated after loading.
#[derive(Debug, Clone)]
pub struct Repository {
    pub stops: Box<[Stop]>,
    pub lines: Box<[Line]>,
    pub routes: Box<[Route]>,
    pub seasons: Box<[Season]>,
    pub departures: Box<[Departure]>,

    calendar: Calendar,
    island_origins: HashSet<u32>,

    stop_lookup: HashMap<Arc<str>, u32>,
    line_lookup: HashMap<Arc<str>, u32>,
    route_lookup: HashMap<Arc<str>, u32>,
    season_lookup: HashMap<Arc<str>, u32>,
}

impl Default for Repository {
    fn default() -> Self {
        Self {
            stops: Box::default(),
            lines: Box::default(),
            routes: Box::default(),
            seasons: Box::default(),
            departures: Box::default(),
            calendar: Calendar::default(),
            island_origins: HashSet::new(),
            stop_lookup: HashMap::new(),
            line_lookup: HashMap::new(),
            route_lookup: HashMap::new(),
            season_lookup: HashMap::new(),
        }
    }
}

impl Repository {
    pub fn new() -> Self {
        Default::default()
    }

    pub fn calendar(&self) -> &Calendar {
        &self.calendar
    }

    pub fn day_type(&self, date: NaiveDate) -> DayType {
        self.calendar.day_type(date)
    }

    pub fn season_for(&self, date: NaiveDate) -> Result<Option<&Season>, AmbiguousSeason> {
        season::resolve_season(&self.seasons, date)
    }

    pub fn is_island_origin(&self, stop_idx: u32) -> bool {
        self.island_origins.contains(&stop_idx)
    }

    pub fn stop_by_id(&self, id: &str) -> Option<&Stop> {
        let stop_idx = self.stop_lookup.get(id)?;
        Some(&self.stops[*stop_idx as usize])
    }

    pub fn line_by_id(&self, id: &str) -> Option<&Line> {
        let line_idx = self.line_lookup.get(id)?;
        Some(&self.lines[*line_idx as usize])
    }

    pub fn route_by_id(&self, id: &str) -> Option<&Route> {
        let route_idx = self.route_lookup.get(id)?;
        Some(&self.routes[*route_idx as usize])
    }

    pub fn season_by_id(&self, id: &str) -> Option<&Season> {
        let season_idx = self.season_lookup.get(id)?;
        Some(&self.seasons[*season_idx as usize])
    }

    pub fn line_by_route(&self, route: &Route) -> &Line {
        &self.lines[route.line_idx as usize]
    }

    pub fn routes_by_line(&self, line: &Line) -> Vec<&Route> {
        line.route_idxs
            .iter()
            .map(|route_idx| &self.routes[*route_idx as usize])
            .collect()
    }

    pub fn route_by_direction(&self, line: &Line, direction: Direction) -> Option<&Route> {
        self.routes_by_line(line)
            .into_iter()
            .find(|route| route.direction == direction)
    }

    /// The route's stops in travel order.
    pub fn stops_by_route(&self, route: &Route) -> Vec<&Stop> {
        route
            .stop_idxs
            .iter()
            .map(|stop_idx| &self.stops[*stop_idx as usize])
            .collect()
    }

    pub fn departures_by_route(&self, route: &Route) -> Vec<&Departure> {
        route
            .departure_idxs
            .iter()
            .map(|departure_idx| &self.departures[*departure_idx as usize])
            .collect()
    }

    pub(crate) fn holidays(config: &Config) -> HolidayCalendar {
        if config.statutory_holidays {
            HolidayCalendar::statutory()
        } else {
            HolidayCalendar::new()
        }
    }
}
