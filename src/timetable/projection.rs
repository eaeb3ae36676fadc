use crate::{
    repository::{Departure, Route, Stop},
    shared::time::{Duration, Time},
};

/// A served stop on a trip.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StopCall<'a> {
    pub stop: &'a Stop,
    pub time: Time,
}

/// The renderable shape of a departure: only the stops it serves.
#[derive(Debug, Clone, PartialEq)]
pub struct Projection<'a> {
    pub calls: Vec<StopCall<'a>>,
    pub duration: Duration,
    /// The last served stop, or the route's destination when the departure
    /// has no stop times at all.
    pub destination: Option<&'a Stop>,
}

/// Walks the departure's stop times against the route's ordered stops,
/// skipping stops without a time.
///
/// Positions past the end of either list are treated as not served. With
/// fewer than two served stops the duration is the route's typical one.
pub fn project_stop_times<'a>(
    departure: &Departure,
    route: &Route,
    stops: &[&'a Stop],
) -> Projection<'a> {
    let calls: Vec<StopCall<'a>> = stops
        .iter()
        .zip(departure.stop_times.iter())
        .filter_map(|(stop, time)| time.map(|time| StopCall { stop: *stop, time }))
        .collect();

    let duration = match (calls.first(), calls.last()) {
        (Some(first), Some(last)) if calls.len() >= 2 => first.time.until(last.time),
        _ => route.typical_duration,
    };

    let destination = calls
        .last()
        .map(|call| call.stop)
        .or_else(|| stops.last().copied());

    Projection {
        calls,
        duration,
        destination,
    }
}
