use std::{fmt::Display, str::FromStr, sync::Arc};

use serde::{Serialize, Serializer};
use thiserror::Error;

use crate::{
    calendar::DayType,
    shared::{
        Language,
        geo::Coordinate,
        time::{Duration, Time},
    },
    timetable::Validity,
};

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Invalid direction index {0}, expected 0 or 1")]
pub struct InvalidDirection(pub u8);

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Unknown transport category {0:?}")]
pub struct UnknownCategory(pub String);

/// A named physical location where vehicles call.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct Stop {
    /// The global internal index used for O(1) array lookups in the repository.
    pub index: u32,
    /// The unique external identifier.
    pub id: Arc<str>,
    /// Name in the local language.
    pub name: Arc<str>,
    pub name_en: Option<Arc<str>>,
    pub coordinate: Option<Coordinate>,
}

impl Stop {
    pub fn new(id: impl Into<Arc<str>>, name: impl Into<Arc<str>>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            ..Default::default()
        }
    }

    /// English falls back to the local name when no translation exists.
    pub fn display_name(&self, language: Language) -> &str {
        match (language, &self.name_en) {
            (Language::English, Some(name)) => name,
            _ => &self.name,
        }
    }
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    #[default]
    Road,
    Sea,
}

impl FromStr for Category {
    type Err = UnknownCategory;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "road" => Ok(Self::Road),
            "sea" => Ok(Self::Sea),
            _ => Err(UnknownCategory(s.to_string())),
        }
    }
}

impl Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Road => f.write_str("road"),
            Self::Sea => f.write_str("sea"),
        }
    }
}

/// A named service, bus line or ferry line, owning one route per direction.
#[derive(Debug, Default, Clone)]
pub struct Line {
    pub index: u32,
    pub id: Arc<str>,
    pub name: Arc<str>,
    pub category: Category,
    /// Display subtype such as ferry or catamaran.
    pub subtype: Option<Arc<str>>,
    pub display_order: u32,
    pub active: bool,
    /// Indexes of the line's routes, ordered by direction.
    pub route_idxs: Box<[u32]>,
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Direction {
    #[default]
    Outbound,
    Inbound,
}

impl Direction {
    pub const fn index(&self) -> u8 {
        match self {
            Self::Outbound => 0,
            Self::Inbound => 1,
        }
    }
}

impl TryFrom<u8> for Direction {
    type Error = InvalidDirection;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Self::Outbound),
            1 => Ok(Self::Inbound),
            other => Err(InvalidDirection(other)),
        }
    }
}

impl Serialize for Direction {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_u8(self.index())
    }
}

/// One direction of travel on a line.
#[derive(Debug, Default, Clone)]
pub struct Route {
    pub index: u32,
    pub id: Arc<str>,
    pub line_idx: u32,
    pub direction: Direction,
    /// Served stops in travel order. The first is the origin, the last the
    /// destination.
    pub stop_idxs: Box<[u32]>,
    /// Used when the real trip duration cannot be derived from stop times.
    pub typical_duration: Duration,
    pub departure_idxs: Box<[u32]>,
}

impl Route {
    pub fn origin_idx(&self) -> Option<u32> {
        self.stop_idxs.first().copied()
    }

    pub fn destination_idx(&self) -> Option<u32> {
        self.stop_idxs.last().copied()
    }
}

/// One scheduled trip on a route.
#[derive(Debug, Clone)]
pub struct Departure {
    pub index: u32,
    pub id: Arc<str>,
    pub route_id: Arc<str>,
    pub season_id: Arc<str>,
    pub day_type: DayType,
    pub time: Time,
    /// Aligned with the route's stops. `None` means the trip skips the stop.
    pub stop_times: Box<[Option<Time>]>,
    pub validity: Validity,
    pub notes: Option<Arc<str>>,
}

impl Departure {
    pub fn new(
        id: impl Into<Arc<str>>,
        route_id: impl Into<Arc<str>>,
        season_id: impl Into<Arc<str>>,
        day_type: DayType,
        time: Time,
    ) -> Self {
        Self {
            index: u32::MAX,
            id: id.into(),
            route_id: route_id.into(),
            season_id: season_id.into(),
            day_type,
            time,
            stop_times: Box::default(),
            validity: Validity::default(),
            notes: None,
        }
    }

    pub fn with_stop_times<I>(mut self, stop_times: I) -> Self
    where
        I: IntoIterator<Item = Option<Time>>,
    {
        self.stop_times = stop_times.into_iter().collect();
        self
    }

    pub fn with_validity(mut self, validity: Validity) -> Self {
        self.validity = validity;
        self
    }
}
