use rayon::prelude::*;
use serde::Serialize;

use crate::{
    repository::{Category, Direction, Line, Route},
    shared::time::{Duration, Time},
    timetable::Timetable,
};

/// One row of the "what leaves today" board.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TodayDeparture {
    pub time: Time,
    pub line_id: String,
    pub line_name: String,
    /// Always serialized, `null` when the line has no subtype.
    pub subtype: Option<String>,
    pub route_id: String,
    pub direction: Direction,
    pub direction_label: String,
    pub destination: Option<String>,
    /// Minutes.
    pub duration: Duration,
    #[serde(skip)]
    pub display_order: u32,
}

impl Timetable<'_> {
    /// Every departure leaving an island origin today across the active
    /// lines of `category`, ordered by time and then line display order.
    pub fn today(&self, category: Category) -> Vec<TodayDeparture> {
        let repository = self.repository;
        let mut departures: Vec<TodayDeparture> = repository
            .lines
            .par_iter()
            .filter(|line| line.active && line.category == category)
            .flat_map_iter(|line| {
                repository
                    .routes_by_line(line)
                    .into_iter()
                    .filter(|route| {
                        route
                            .origin_idx()
                            .is_some_and(|stop_idx| repository.is_island_origin(stop_idx))
                    })
                    .flat_map(|route| self.today_by_route(line, route))
                    .collect::<Vec<_>>()
            })
            .collect();

        departures.sort_by(|a, b| {
            a.time
                .cmp(&b.time)
                .then(a.display_order.cmp(&b.display_order))
                .then_with(|| a.line_id.cmp(&b.line_id))
                .then_with(|| a.route_id.cmp(&b.route_id))
        });
        departures
    }

    fn today_by_route(&self, line: &Line, route: &Route) -> Vec<TodayDeparture> {
        let direction_label = self.repository.direction_label(route, self.language);
        self.scheduled(route)
            .into_iter()
            .map(|departure| TodayDeparture {
                time: departure.time,
                line_id: line.id.to_string(),
                line_name: line.name.to_string(),
                subtype: line.subtype.as_deref().map(str::to_string),
                route_id: route.id.to_string(),
                direction: route.direction,
                direction_label: direction_label.clone(),
                destination: departure.destination,
                duration: departure.duration,
                display_order: line.display_order,
            })
            .collect()
    }
}
