#![allow(dead_code)]

use chrono::NaiveDate;
use serde::Serialize;
use std::{fs::File, io::Write, path::Path};
use voznired::{
    repository::{Config, Repository},
    snapshot::{
        DepartureRecord, HolidayRecord, LineRecord, RouteRecord, RouteStopRecord, SeasonRecord,
        Snapshot, StopRecord,
    },
};
use zip::write::SimpleFileOptions;

pub const ISLAND_ORIGINS: [&str; 3] = ["rab", "lopar", "misnjak"];

pub fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap()
}

pub fn config() -> Config {
    Config {
        island_origins: ISLAND_ORIGINS.iter().map(|id| id.to_string()).collect(),
        ..Default::default()
    }
}

pub fn repository() -> Repository {
    Repository::from_snapshot(snapshot(), &config()).unwrap()
}

pub fn stop(id: &str, name: &str, name_en: Option<&str>) -> StopRecord {
    StopRecord {
        stop_id: id.into(),
        stop_name: name.into(),
        stop_name_en: name_en.map(Into::into),
        stop_lat: None,
        stop_lon: None,
    }
}

pub fn line(id: &str, name: &str, category: &str, subtype: Option<&str>, order: u32, active: bool) -> LineRecord {
    LineRecord {
        line_id: id.into(),
        line_name: name.into(),
        category: category.into(),
        subtype: subtype.map(Into::into),
        display_order: order,
        active,
    }
}

pub fn route(id: &str, line_id: &str, direction: u8, typical_duration: u32) -> RouteRecord {
    RouteRecord {
        route_id: id.into(),
        line_id: line_id.into(),
        direction,
        typical_duration,
    }
}

pub fn route_stops(route_id: &str, stop_ids: &[&str]) -> Vec<RouteStopRecord> {
    stop_ids
        .iter()
        .enumerate()
        .map(|(i, stop_id)| RouteStopRecord {
            route_id: route_id.into(),
            stop_id: stop_id.to_string(),
            stop_sequence: (i as u32 + 1) * 10,
        })
        .collect()
}

pub fn season(id: &str, label: &str, year: i32, from: &str, to: &str) -> SeasonRecord {
    SeasonRecord {
        season_id: id.into(),
        label: label.into(),
        year,
        date_from: from.into(),
        date_to: to.into(),
    }
}

pub fn departure(id: &str, route_id: &str, day_type: &str, time: &str, stop_times: &str) -> DepartureRecord {
    DepartureRecord {
        departure_id: id.into(),
        route_id: route_id.into(),
        season_id: "off-2026".into(),
        day_type: day_type.into(),
        departure_time: time.into(),
        stop_times: stop_times.into(),
        ..Default::default()
    }
}

/// Rab island: a bus line across the island, a ferry and a catamaran to the
/// mainland, and a retired bus line.
pub fn snapshot() -> Snapshot {
    let mut route_stop_records = Vec::new();
    route_stop_records.extend(route_stops("bus-1-0", &["rab", "supetarska", "lopar"]));
    route_stop_records.extend(route_stops("bus-1-1", &["lopar", "supetarska", "rab"]));
    route_stop_records.extend(route_stops("ferry-1-0", &["misnjak", "stinica"]));
    route_stop_records.extend(route_stops("ferry-1-1", &["stinica", "misnjak"]));
    route_stop_records.extend(route_stops("cat-1-0", &["rab", "valbiska"]));
    route_stop_records.extend(route_stops("cat-1-1", &["valbiska", "rab"]));
    route_stop_records.extend(route_stops("bus-old-0", &["rab", "lopar"]));

    let mut excluded = departure("bus-mon-0630", "bus-1-0", "MON", "06:30", "06:30;06:45;07:00");
    excluded.exclude_dates = Some("2026-01-19".into());

    let mut winter = departure("bus-sun-1630-a", "bus-1-0", "SUN", "16:30", "16:30;;17:00");
    winter.date_from = Some("2026-01-01".into());
    winter.date_to = Some("2026-02-22".into());
    winter.notes = Some("Does not wait for the ferry".into());
    let mut spring = departure("bus-sun-1630-b", "bus-1-0", "SUN", "16:30", "16:30;16:45;17:00");
    spring.date_from = Some("2026-02-23".into());
    spring.date_to = Some("2026-05-28".into());

    Snapshot {
        stops: vec![
            stop("rab", "Rab", Some("Rab Town")),
            stop("supetarska", "Supetarska Draga", None),
            stop("lopar", "Lopar", None),
            stop("misnjak", "Mišnjak", Some("Misnjak ferry port")),
            stop("stinica", "Stinica", None),
            stop("valbiska", "Valbiska", None),
        ],
        lines: vec![
            line("bus-1", "Rab - Lopar", "road", None, 1, true),
            line("ferry-1", "Mišnjak - Stinica", "sea", Some("trajekt"), 1, true),
            line("cat-1", "Rab - Valbiska", "sea", Some("katamaran"), 2, true),
            line("bus-old", "Rab - Lopar (old)", "road", None, 3, false),
        ],
        routes: vec![
            route("bus-1-0", "bus-1", 0, 30),
            route("bus-1-1", "bus-1", 1, 30),
            route("ferry-1-0", "ferry-1", 0, 15),
            route("ferry-1-1", "ferry-1", 1, 15),
            route("cat-1-0", "cat-1", 0, 80),
            route("cat-1-1", "cat-1", 1, 80),
            route("bus-old-0", "bus-old", 0, 25),
        ],
        route_stops: route_stop_records,
        seasons: vec![
            season("off-2026", "OFF", 2026, "2026-01-01", "2026-05-31"),
            season("pre-2026", "PRE", 2026, "2026-06-01", "2026-06-30"),
            season("high-2026", "HIGH", 2026, "2026-07-01", "2026-08-31"),
            season("post-2026", "POST", 2026, "2026-09-01", "2026-12-31"),
        ],
        departures: vec![
            departure("bus-sun-0700", "bus-1-0", "SUN", "07:00", "07:00;07:15;07:30"),
            winter,
            spring,
            departure("bus-hol-0900", "bus-1-0", "PRAZNIK", "09:00", "09:00;09:15;09:30"),
            excluded,
            departure("bus-back-sun-1000", "bus-1-1", "SUN", "10:00", "10:00;10:15;10:30"),
            departure("ferry-sun-0800", "ferry-1-0", "SUN", "08:00", "08:00;08:15"),
            departure("ferry-sun-1630", "ferry-1-0", "SUN", "16:30", "16:30;16:45"),
            departure("ferry-back-sun-0830", "ferry-1-1", "SUN", "08:30", "08:30;08:45"),
            departure("cat-sun-1630", "cat-1-0", "SUN", "16:30", "16:30;17:50"),
            departure("cat-back-sun-1900", "cat-1-1", "SUN", "19:00", "19:00;20:20"),
            departure("old-sun-1200", "bus-old-0", "SUN", "12:00", "12:00;12:25"),
        ],
        holidays: vec![HolidayRecord {
            date: "2026-03-19".into(),
            name: Some("Town day".into()),
        }],
    }
}

fn csv_bytes<T: Serialize>(records: &[T]) -> Vec<u8> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    for record in records {
        writer.serialize(record).unwrap();
    }
    writer.into_inner().unwrap()
}

fn tables(snapshot: &Snapshot) -> Vec<(&'static str, Vec<u8>)> {
    vec![
        ("stops.txt", csv_bytes(&snapshot.stops)),
        ("lines.txt", csv_bytes(&snapshot.lines)),
        ("routes.txt", csv_bytes(&snapshot.routes)),
        ("route_stops.txt", csv_bytes(&snapshot.route_stops)),
        ("seasons.txt", csv_bytes(&snapshot.seasons)),
        ("departures.txt", csv_bytes(&snapshot.departures)),
        ("holidays.txt", csv_bytes(&snapshot.holidays)),
    ]
}

/// Writes every table as CSV into `dir`.
pub fn write_directory(dir: &Path, snapshot: &Snapshot) {
    for (name, contents) in tables(snapshot) {
        File::create(dir.join(name))
            .unwrap()
            .write_all(&contents)
            .unwrap();
    }
}

/// Writes every table as CSV into a zip archive at `path`.
pub fn write_zip(path: &Path, snapshot: &Snapshot) {
    let mut zip = zip::ZipWriter::new(File::create(path).unwrap());
    for (name, contents) in tables(snapshot) {
        zip.start_file(name, SimpleFileOptions::default()).unwrap();
        zip.write_all(&contents).unwrap();
    }
    zip.finish().unwrap();
}
