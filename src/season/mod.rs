//! Season catalogue lookups and the load-time overlap validator.

use std::{collections::BTreeMap, fmt::Display, str::FromStr, sync::Arc};

use chrono::NaiveDate;
use rayon::prelude::*;
use serde::{Serialize, Serializer};
use thiserror::Error;
use tracing::warn;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Unknown season label {0:?}")]
pub struct UnknownSeasonLabel(pub String);

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Season {id} ends ({date_to}) before it starts ({date_from})")]
pub struct InvalidSeason {
    pub id: Arc<str>,
    pub date_from: NaiveDate,
    pub date_to: NaiveDate,
}

/// Two seasons of the same year share at least one date.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Seasons overlap in {year}: {first} ({first_id}) ends {first_end}, {second} ({second_id}) starts {second_start}")]
pub struct SeasonOverlap {
    pub year: i32,
    pub first: SeasonLabel,
    pub first_id: Arc<str>,
    pub first_end: NaiveDate,
    pub second: SeasonLabel,
    pub second_id: Arc<str>,
    pub second_start: NaiveDate,
}

/// A date is covered by more than one season.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Date {date} is covered by more than one season: {}", .season_ids.join(", "))]
pub struct AmbiguousSeason {
    pub date: NaiveDate,
    pub season_ids: Vec<Arc<str>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum SeasonLabel {
    /// Low season.
    Off,
    /// Shoulder season leading into summer.
    Pre,
    High,
    Post,
}

impl SeasonLabel {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Off => "OFF",
            Self::Pre => "PRE",
            Self::High => "HIGH",
            Self::Post => "POST",
        }
    }
}

impl FromStr for SeasonLabel {
    type Err = UnknownSeasonLabel;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "OFF" => Ok(Self::Off),
            "PRE" => Ok(Self::Pre),
            "HIGH" => Ok(Self::High),
            "POST" => Ok(Self::Post),
            _ => Err(UnknownSeasonLabel(s.to_string())),
        }
    }
}

impl Display for SeasonLabel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for SeasonLabel {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(self.as_str())
    }
}

/// A labelled, inclusive date interval within one year.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Season {
    pub id: Arc<str>,
    pub label: SeasonLabel,
    pub year: i32,
    pub date_from: NaiveDate,
    pub date_to: NaiveDate,
}

impl Season {
    pub fn new(
        id: impl Into<Arc<str>>,
        label: SeasonLabel,
        year: i32,
        date_from: NaiveDate,
        date_to: NaiveDate,
    ) -> Result<Self, InvalidSeason> {
        let id = id.into();
        if date_to < date_from {
            return Err(InvalidSeason {
                id,
                date_from,
                date_to,
            });
        }
        Ok(Self {
            id,
            label,
            year,
            date_from,
            date_to,
        })
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.date_from <= date && date <= self.date_to
    }
}

/// Finds the season whose interval contains `date`.
///
/// `Ok(None)` when nothing covers the date. Two matches are a data fault and
/// are returned as an error instead of picking one.
pub fn resolve_season(
    catalogue: &[Season],
    date: NaiveDate,
) -> Result<Option<&Season>, AmbiguousSeason> {
    let mut matches = catalogue.iter().filter(|season| season.contains(date));
    let Some(found) = matches.next() else {
        return Ok(None);
    };
    let rest: Vec<&Season> = matches.collect();
    if rest.is_empty() {
        return Ok(Some(found));
    }
    let season_ids: Vec<Arc<str>> = std::iter::once(found)
        .chain(rest)
        .map(|season| season.id.clone())
        .collect();
    warn!("Date {date} matches seasons {season_ids:?}");
    Err(AmbiguousSeason { date, season_ids })
}

/// Reports every pair of overlapping seasons, grouped by year.
///
/// Adjacent seasons (one ending the day before the next starts) are fine.
pub fn validate_season_catalogue(catalogue: &[Season]) -> Vec<SeasonOverlap> {
    let mut by_year: BTreeMap<i32, Vec<&Season>> = BTreeMap::new();
    catalogue
        .iter()
        .for_each(|season| by_year.entry(season.year).or_default().push(season));

    let years: Vec<(i32, Vec<&Season>)> = by_year.into_iter().collect();
    years
        .into_par_iter()
        .flat_map_iter(|(year, mut seasons)| {
            seasons.sort_by_key(|season| (season.date_from, season.date_to));
            seasons
                .windows(2)
                .filter(|pair| pair[0].date_to >= pair[1].date_from)
                .map(|pair| SeasonOverlap {
                    year,
                    first: pair[0].label,
                    first_id: pair[0].id.clone(),
                    first_end: pair[0].date_to,
                    second: pair[1].label,
                    second_id: pair[1].id.clone(),
                    second_start: pair[1].date_from,
                })
                .collect::<Vec<_>>()
        })
        .collect()
}
