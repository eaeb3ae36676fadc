//! Reads the timetable snapshot tables (CSV) from a zip archive or a
//! directory.

use serde::de::DeserializeOwned;
use std::{
    fs::File,
    io::{self, Read},
    path::{Path, PathBuf},
};
use thiserror::Error;
use zip::ZipArchive;

mod config;
pub mod models;
pub use config::*;
pub use models::*;

#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
    #[error("Zip error: {0}")]
    Zip(#[from] zip::result::ZipError),
    #[error("Csv error in {file}: {source}")]
    Csv {
        file: String,
        #[source]
        source: csv::Error,
    },
    #[error("Could not find file with name: {0}")]
    FileNotFound(String),
}

#[derive(Default)]
pub enum StorageType {
    #[default]
    None,
    Zip(PathBuf),
    Directory(PathBuf),
}

/// Every table of a snapshot, as raw rows.
#[derive(Debug, Clone, Default)]
pub struct Snapshot {
    pub stops: Vec<StopRecord>,
    pub lines: Vec<LineRecord>,
    pub routes: Vec<RouteRecord>,
    pub route_stops: Vec<RouteStopRecord>,
    pub seasons: Vec<SeasonRecord>,
    pub departures: Vec<DepartureRecord>,
    pub holidays: Vec<HolidayRecord>,
}

#[derive(Default)]
pub struct SnapshotReader {
    config: Config,
    storage: StorageType,
}

impl SnapshotReader {
    pub fn new(config: self::Config) -> Self {
        Self {
            config,
            storage: Default::default(),
        }
    }

    pub fn from_zip(mut self, path: PathBuf) -> Self {
        self.storage = StorageType::Zip(path);
        self
    }

    pub fn from_directory(mut self, path: PathBuf) -> Self {
        self.storage = StorageType::Directory(path);
        self
    }

    pub fn read(&self) -> Result<Snapshot, self::Error> {
        let mut snapshot = Snapshot::default();
        self.stream_stops(|(_, record)| snapshot.stops.push(record))?;
        self.stream_lines(|(_, record)| snapshot.lines.push(record))?;
        self.stream_routes(|(_, record)| snapshot.routes.push(record))?;
        self.stream_route_stops(|(_, record)| snapshot.route_stops.push(record))?;
        self.stream_seasons(|(_, record)| snapshot.seasons.push(record))?;
        self.stream_departures(|(_, record)| snapshot.departures.push(record))?;
        self.stream_holidays(|(_, record)| snapshot.holidays.push(record))?;
        Ok(snapshot)
    }

    pub fn stream_stops<F>(&self, f: F) -> Result<(), self::Error>
    where
        F: FnMut((usize, StopRecord)),
    {
        self.stream(&self.config.stops_file_name, true, f)
    }

    pub fn stream_lines<F>(&self, f: F) -> Result<(), self::Error>
    where
        F: FnMut((usize, LineRecord)),
    {
        self.stream(&self.config.lines_file_name, true, f)
    }

    pub fn stream_routes<F>(&self, f: F) -> Result<(), self::Error>
    where
        F: FnMut((usize, RouteRecord)),
    {
        self.stream(&self.config.routes_file_name, true, f)
    }

    pub fn stream_route_stops<F>(&self, f: F) -> Result<(), self::Error>
    where
        F: FnMut((usize, RouteStopRecord)),
    {
        self.stream(&self.config.route_stops_file_name, true, f)
    }

    pub fn stream_seasons<F>(&self, f: F) -> Result<(), self::Error>
    where
        F: FnMut((usize, SeasonRecord)),
    {
        self.stream(&self.config.seasons_file_name, true, f)
    }

    pub fn stream_departures<F>(&self, f: F) -> Result<(), self::Error>
    where
        F: FnMut((usize, DepartureRecord)),
    {
        self.stream(&self.config.departures_file_name, true, f)
    }

    pub fn stream_holidays<F>(&self, f: F) -> Result<(), self::Error>
    where
        F: FnMut((usize, HolidayRecord)),
    {
        self.stream(&self.config.holidays_file_name, false, f)
    }

    fn stream<T, F>(&self, file_name: &str, required: bool, f: F) -> Result<(), self::Error>
    where
        T: DeserializeOwned,
        F: FnMut((usize, T)),
    {
        let result = match &self.storage {
            StorageType::None => Ok(()),
            StorageType::Zip(path) => stream_from_zip(path, file_name, f),
            StorageType::Directory(path) => stream_from_directory(path, file_name, f),
        };
        match result {
            Err(self::Error::FileNotFound(_)) if !required => Ok(()),
            result => result,
        }
    }
}

fn stream_from_zip<T, F>(zip_path: &Path, file_name: &str, f: F) -> Result<(), self::Error>
where
    T: DeserializeOwned,
    F: FnMut((usize, T)),
{
    let zip_file = File::open(zip_path)?;
    let mut archive = ZipArchive::new(zip_file)?;
    let index = archive
        .index_for_name(file_name)
        .ok_or(self::Error::FileNotFound(file_name.to_string()))?;
    let file = archive.by_index(index)?;
    stream_csv(file, file_name, f)
}

fn stream_from_directory<T, F>(dir: &Path, file_name: &str, f: F) -> Result<(), self::Error>
where
    T: DeserializeOwned,
    F: FnMut((usize, T)),
{
    let path = dir.join(file_name);
    if !path.is_file() {
        return Err(self::Error::FileNotFound(file_name.to_string()));
    }
    stream_csv(File::open(path)?, file_name, f)
}

fn stream_csv<R, T, F>(reader: R, file_name: &str, mut f: F) -> Result<(), self::Error>
where
    R: Read,
    T: DeserializeOwned,
    F: FnMut((usize, T)),
{
    let mut reader = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(reader);
    for (i, record) in reader.deserialize().enumerate() {
        let record: T = record.map_err(|source| self::Error::Csv {
            file: file_name.to_string(),
            source,
        })?;
        f((i, record));
    }
    Ok(())
}
