use chrono::Datelike;

use crate::{
    calendar::{Calendar, DayType},
    repository::{Category, Config, Departure, Direction, Error, Line, Repository, Route, Stop},
    season::{self, Season, SeasonLabel},
    shared::{
        Coordinate,
        date::{parse_date, parse_date_list},
        time::{Duration, Time},
    },
    snapshot::{
        DepartureRecord, HolidayRecord, LineRecord, RouteRecord, RouteStopRecord, SeasonRecord,
        Snapshot, SnapshotReader, StopRecord,
    },
    timetable::{DateRange, Validity},
};
use std::{
    collections::{HashMap, HashSet},
    sync::Arc,
    time::Instant,
};
use tracing::{debug, warn};

impl Repository {
    /// Reads every table through `reader` and builds the repository.
    pub fn load(reader: &SnapshotReader, config: &Config) -> Result<Self, Error> {
        debug!("Reading snapshot...");
        let now = Instant::now();
        let snapshot = reader.read()?;
        debug!("Reading snapshot took {:?}", now.elapsed());
        Self::from_snapshot(snapshot, config)
    }

    /// Builds the repository from already read rows.
    ///
    /// Fails on the first malformed row or dangling reference. Season
    /// overlaps are collected for every year and reported together.
    pub fn from_snapshot(snapshot: Snapshot, config: &Config) -> Result<Self, Error> {
        let mut repository = Self::new();
        repository.load_stops(snapshot.stops)?;
        repository.load_lines(snapshot.lines)?;
        repository.load_routes(snapshot.routes)?;
        repository.load_route_stops(snapshot.route_stops)?;
        repository.load_seasons(snapshot.seasons)?;
        repository.load_departures(snapshot.departures)?;
        repository.load_calendar(snapshot.holidays, config)?;
        repository.load_island_origins(config)?;
        Ok(repository)
    }

    fn load_stops(&mut self, records: Vec<StopRecord>) -> Result<(), Error> {
        debug!("Loading stops...");
        let now = Instant::now();
        let mut stop_lookup: HashMap<Arc<str>, u32> = HashMap::new();
        let mut stops: Vec<Stop> = Vec::with_capacity(records.len());
        for (i, record) in records.into_iter().enumerate() {
            let id: Arc<str> = record.stop_id.into();
            if stop_lookup.insert(id.clone(), i as u32).is_some() {
                return Err(duplicate("stops", &id));
            }
            let coordinate = match (record.stop_lat, record.stop_lon) {
                (Some(latitude), Some(longitude)) => Some(Coordinate::new(latitude, longitude)),
                _ => None,
            };
            stops.push(Stop {
                index: i as u32,
                id,
                name: record.stop_name.into(),
                name_en: non_empty(record.stop_name_en),
                coordinate,
            });
        }
        self.stops = stops.into();
        self.stop_lookup = stop_lookup;
        debug!("Loading stops took {:?}", now.elapsed());
        Ok(())
    }

    fn load_lines(&mut self, records: Vec<LineRecord>) -> Result<(), Error> {
        debug!("Loading lines...");
        let now = Instant::now();
        let mut line_lookup: HashMap<Arc<str>, u32> = HashMap::new();
        let mut lines: Vec<Line> = Vec::with_capacity(records.len());
        for (i, record) in records.into_iter().enumerate() {
            let id: Arc<str> = record.line_id.into();
            if line_lookup.insert(id.clone(), i as u32).is_some() {
                return Err(duplicate("lines", &id));
            }
            let category: Category = record
                .category
                .parse()
                .map_err(|err| invalid("lines", &id, err))?;
            lines.push(Line {
                index: i as u32,
                id,
                name: record.line_name.into(),
                category,
                subtype: non_empty(record.subtype),
                display_order: record.display_order,
                active: record.active,
                route_idxs: Box::default(),
            });
        }
        self.lines = lines.into();
        self.line_lookup = line_lookup;
        debug!("Loading lines took {:?}", now.elapsed());
        Ok(())
    }

    fn load_routes(&mut self, records: Vec<RouteRecord>) -> Result<(), Error> {
        debug!("Loading routes...");
        let now = Instant::now();
        let mut route_lookup: HashMap<Arc<str>, u32> = HashMap::new();
        let mut line_to_routes: Vec<Vec<u32>> = vec![Vec::new(); self.lines.len()];
        let mut routes: Vec<Route> = Vec::with_capacity(records.len());
        for (i, record) in records.into_iter().enumerate() {
            let id: Arc<str> = record.route_id.into();
            if route_lookup.insert(id.clone(), i as u32).is_some() {
                return Err(duplicate("routes", &id));
            }
            let line_idx = *self
                .line_lookup
                .get(record.line_id.as_str())
                .ok_or_else(|| unknown("routes", &id, "line", &record.line_id))?;
            let direction =
                Direction::try_from(record.direction).map_err(|err| invalid("routes", &id, err))?;
            let siblings = &mut line_to_routes[line_idx as usize];
            if siblings
                .iter()
                .any(|route_idx| routes[*route_idx as usize].direction == direction)
            {
                return Err(Error::DuplicateDirection {
                    line_id: record.line_id,
                    direction: record.direction,
                });
            }
            siblings.push(i as u32);
            routes.push(Route {
                index: i as u32,
                id,
                line_idx,
                direction,
                stop_idxs: Box::default(),
                typical_duration: Duration::from_minutes(record.typical_duration),
                departure_idxs: Box::default(),
            });
        }
        for (line, mut route_idxs) in self.lines.iter_mut().zip(line_to_routes) {
            route_idxs.sort_by_key(|route_idx| routes[*route_idx as usize].direction);
            line.route_idxs = route_idxs.into();
        }
        self.routes = routes.into();
        self.route_lookup = route_lookup;
        debug!("Loading routes took {:?}", now.elapsed());
        Ok(())
    }

    fn load_route_stops(&mut self, records: Vec<RouteStopRecord>) -> Result<(), Error> {
        debug!("Loading route stops...");
        let now = Instant::now();
        let mut route_to_stops: Vec<Vec<(u32, u32)>> = vec![Vec::new(); self.routes.len()];
        for record in records {
            let route_idx = *self
                .route_lookup
                .get(record.route_id.as_str())
                .ok_or_else(|| unknown("route_stops", &record.route_id, "route", &record.route_id))?;
            let stop_idx = *self
                .stop_lookup
                .get(record.stop_id.as_str())
                .ok_or_else(|| unknown("route_stops", &record.route_id, "stop", &record.stop_id))?;
            route_to_stops[route_idx as usize].push((record.stop_sequence, stop_idx));
        }
        for (route, mut stops) in self.routes.iter_mut().zip(route_to_stops) {
            stops.sort_by_key(|(sequence, _)| *sequence);
            if let Some(pair) = stops.windows(2).find(|pair| pair[0].0 == pair[1].0) {
                return Err(Error::DuplicateStopSequence {
                    route_id: route.id.to_string(),
                    sequence: pair[0].0,
                });
            }
            if stops.is_empty() {
                warn!("Route {} has no stops", route.id);
            }
            route.stop_idxs = stops.into_iter().map(|(_, stop_idx)| stop_idx).collect();
        }
        debug!("Loading route stops took {:?}", now.elapsed());
        Ok(())
    }

    fn load_seasons(&mut self, records: Vec<SeasonRecord>) -> Result<(), Error> {
        debug!("Loading seasons...");
        let now = Instant::now();
        let mut season_lookup: HashMap<Arc<str>, u32> = HashMap::new();
        let mut seasons: Vec<Season> = Vec::with_capacity(records.len());
        for (i, record) in records.into_iter().enumerate() {
            let id: Arc<str> = record.season_id.into();
            if season_lookup.insert(id.clone(), i as u32).is_some() {
                return Err(duplicate("seasons", &id));
            }
            let label: SeasonLabel = record
                .label
                .parse()
                .map_err(|err| invalid("seasons", &id, err))?;
            let date_from = parse_date(&record.date_from).map_err(|err| invalid("seasons", &id, err))?;
            let date_to = parse_date(&record.date_to).map_err(|err| invalid("seasons", &id, err))?;
            let season = Season::new(id, label, record.year, date_from, date_to)?;
            // overlaps are only checked within a year
            if date_from.year() != season.year || date_to.year() != season.year {
                return Err(invalid(
                    "seasons",
                    &season.id,
                    format!("dates {date_from}..{date_to} fall outside year {}", season.year),
                ));
            }
            seasons.push(season);
        }

        let overlaps = season::validate_season_catalogue(&seasons);
        if !overlaps.is_empty() {
            return Err(Error::SeasonOverlaps(overlaps));
        }

        self.seasons = seasons.into();
        self.season_lookup = season_lookup;
        debug!("Loading seasons took {:?}", now.elapsed());
        Ok(())
    }

    fn load_departures(&mut self, records: Vec<DepartureRecord>) -> Result<(), Error> {
        debug!("Loading departures...");
        let now = Instant::now();
        let mut seen: HashSet<Arc<str>> = HashSet::new();
        let mut route_to_departures: Vec<Vec<u32>> = vec![Vec::new(); self.routes.len()];
        let mut departures: Vec<Departure> = Vec::with_capacity(records.len());
        for (i, record) in records.into_iter().enumerate() {
            let id: Arc<str> = record.departure_id.as_str().into();
            if !seen.insert(id.clone()) {
                return Err(duplicate("departures", &id));
            }
            let route = self
                .route_by_id(&record.route_id)
                .ok_or_else(|| unknown("departures", &id, "route", &record.route_id))?;
            let season = self
                .season_by_id(&record.season_id)
                .ok_or_else(|| unknown("departures", &id, "season", &record.season_id))?;
            let departure = parse_departure(&record, id, route, season)?;
            if departure.stop_times.len() != route.stop_idxs.len() {
                warn!(
                    "Departure {} has {} stop times for {} stops on route {}",
                    departure.id,
                    departure.stop_times.len(),
                    route.stop_idxs.len(),
                    route.id
                );
            }
            route_to_departures[route.index as usize].push(i as u32);
            departures.push(Departure {
                index: i as u32,
                ..departure
            });
        }
        for (route, departure_idxs) in self.routes.iter_mut().zip(route_to_departures) {
            route.departure_idxs = departure_idxs.into();
        }
        self.departures = departures.into();
        debug!("Loading departures took {:?}", now.elapsed());
        Ok(())
    }

    fn load_calendar(&mut self, records: Vec<HolidayRecord>, config: &Config) -> Result<(), Error> {
        debug!("Loading holidays...");
        let now = Instant::now();
        let dates = records
            .iter()
            .map(|record| parse_date(&record.date).map_err(|err| invalid("holidays", &record.date, err)))
            .collect::<Result<Vec<_>, _>>()?;
        let holidays = Self::holidays(config).with_dates(dates);
        self.calendar = Calendar::new(config.timezone, holidays);
        debug!("Loading holidays took {:?}", now.elapsed());
        Ok(())
    }

    fn load_island_origins(&mut self, config: &Config) -> Result<(), Error> {
        self.island_origins = config
            .island_origins
            .iter()
            .map(|stop_id| {
                self.stop_lookup
                    .get(stop_id.as_str())
                    .copied()
                    .ok_or_else(|| unknown("config", "island_origins", "stop", stop_id))
            })
            .collect::<Result<HashSet<u32>, Error>>()?;
        if self.island_origins.is_empty() {
            warn!("No island origin stops configured, today's departures will be empty");
        }
        Ok(())
    }
}

fn parse_departure(
    record: &DepartureRecord,
    id: Arc<str>,
    route: &Route,
    season: &Season,
) -> Result<Departure, Error> {
    let day_type: DayType = record
        .day_type
        .parse()
        .map_err(|err| invalid("departures", &id, err))?;
    let time = Time::parse(&record.departure_time).map_err(|err| invalid("departures", &id, err))?;
    let stop_times = parse_stop_times(&record.stop_times).map_err(|err| invalid("departures", &id, err))?;

    let optional_date = |value: &Option<String>| {
        value
            .as_deref()
            .map(str::trim)
            .filter(|value| !value.is_empty())
            .map(parse_date)
            .transpose()
            .map_err(|err| invalid("departures", &id, err))
    };
    let range = DateRange::new(optional_date(&record.date_from)?, optional_date(&record.date_to)?);
    if let (Some(from), Some(to)) = (range.from, range.to)
        && to < from
    {
        return Err(invalid(
            "departures",
            &id,
            format!("date_to {to} is before date_from {from}"),
        ));
    }
    let date_list = |value: &Option<String>| {
        parse_date_list(value.as_deref().unwrap_or_default()).map_err(|err| invalid("departures", &id, err))
    };
    let validity = Validity::new(
        date_list(&record.exclude_dates)?,
        date_list(&record.include_dates)?,
        range,
    );

    Ok(Departure {
        index: u32::MAX,
        id: id.clone(),
        route_id: route.id.clone(),
        season_id: season.id.clone(),
        day_type,
        time,
        stop_times,
        validity,
        notes: non_empty(record.notes.clone()),
    })
}

/// `08:00;;08:40` becomes `[Some(08:00), None, Some(08:40)]`.
fn parse_stop_times(value: &str) -> Result<Box<[Option<Time>]>, crate::shared::TimeError> {
    if value.trim().is_empty() {
        return Ok(Box::default());
    }
    value
        .split(';')
        .map(str::trim)
        .map(|time| match time {
            "" | "-" => Ok(None),
            time => Time::parse(time).map(Some),
        })
        .collect()
}

fn non_empty(value: Option<String>) -> Option<Arc<str>> {
    value
        .filter(|value| !value.trim().is_empty())
        .map(|value| value.into())
}

fn invalid(table: &'static str, id: &str, reason: impl ToString) -> Error {
    Error::InvalidRecord {
        table,
        id: id.to_string(),
        reason: reason.to_string(),
    }
}

fn unknown(table: &'static str, id: &str, kind: &'static str, reference: &str) -> Error {
    Error::UnknownReference {
        table,
        id: id.to_string(),
        kind,
        reference: reference.to_string(),
    }
}

fn duplicate(table: &'static str, id: &str) -> Error {
    Error::DuplicateId {
        table,
        id: id.to_string(),
    }
}
