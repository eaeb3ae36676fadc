mod common;

use common::{config, date, departure, repository, route, season, snapshot, write_directory, write_zip};
use voznired::{
    calendar::DayType,
    repository::{Category, Config, Direction, Error, InvalidDirection, Repository},
    season::SeasonLabel,
    shared::{Language, Time},
    snapshot::{Config as TableConfig, Error as SnapshotError, SnapshotReader},
    timetable,
};

#[test]
fn indexes_every_table() {
    let repository = repository();
    assert_eq!(repository.stops.len(), 6);
    assert_eq!(repository.lines.len(), 4);
    assert_eq!(repository.routes.len(), 7);
    assert_eq!(repository.seasons.len(), 4);
    assert_eq!(repository.departures.len(), 12);

    let line = repository.line_by_id("ferry-1").unwrap();
    assert_eq!(line.category, Category::Sea);
    let routes = repository.routes_by_line(line);
    let directions: Vec<Direction> = routes.iter().map(|route| route.direction).collect();
    assert_eq!(directions, vec![Direction::Outbound, Direction::Inbound]);

    let route = repository.route_by_id("bus-1-0").unwrap();
    let stops: Vec<&str> = repository
        .stops_by_route(route)
        .iter()
        .map(|stop| &*stop.id)
        .collect();
    assert_eq!(stops, vec!["rab", "supetarska", "lopar"]);
    assert_eq!(repository.departures_by_route(route).len(), 5);
    assert!(repository.stop_by_id("atlantis").is_none());
}

#[test]
fn route_timetable_projects_served_stops() {
    let repository = repository();
    let timetable = repository.timetable(date(2026, 1, 18)).unwrap();
    let route = timetable.route("bus-1-0").unwrap();

    assert_eq!(route.line_id, "bus-1");
    assert_eq!(route.day_type, DayType::Sunday);
    assert_eq!(route.season, Some(SeasonLabel::Off));
    assert_eq!(route.date, "2026-01-18");
    assert_eq!(route.origin.as_deref(), Some("Rab"));
    assert_eq!(route.destination.as_deref(), Some("Lopar"));
    assert_eq!(route.direction_label, "Rab - Lopar");

    let ids: Vec<&str> = route
        .departures
        .iter()
        .map(|departure| departure.departure_id.as_str())
        .collect();
    assert_eq!(ids, vec!["bus-sun-0700", "bus-sun-1630-a"]);

    let afternoon = &route.departures[1];
    let stops: Vec<(&str, Time)> = afternoon
        .stops
        .iter()
        .map(|stop| (stop.stop_id.as_str(), stop.time))
        .collect();
    assert_eq!(
        stops,
        vec![("rab", Time::from_hm(16, 30)), ("lopar", Time::from_hm(17, 0))]
    );
    assert_eq!(afternoon.notes.as_deref(), Some("Does not wait for the ferry"));
}

#[test]
fn line_timetable_picks_the_direction() {
    let repository = repository();
    let timetable = repository
        .timetable(date(2026, 1, 18))
        .unwrap()
        .language(Language::English);

    let outbound = timetable.line("ferry-1", 0).unwrap();
    assert_eq!(outbound.route_id, "ferry-1-0");
    assert_eq!(outbound.subtype.as_deref(), Some("trajekt"));
    assert_eq!(outbound.direction_label, "Misnjak ferry port - Stinica");

    let inbound = timetable.line("ferry-1", 1).unwrap();
    assert_eq!(inbound.route_id, "ferry-1-1");
    assert_eq!(inbound.direction, Direction::Inbound);
    assert_eq!(inbound.departures.len(), 1);
    assert_eq!(inbound.departures[0].destination.as_deref(), Some("Misnjak ferry port"));
}

#[test]
fn line_timetable_rejects_bad_input() {
    let repository = repository();
    let timetable = repository.timetable(date(2026, 1, 18)).unwrap();

    assert_eq!(
        timetable.line("bus-1", 2).unwrap_err(),
        timetable::Error::InvalidDirection(InvalidDirection(2))
    );
    assert!(matches!(
        timetable.line("night-bus", 0),
        Err(timetable::Error::UnknownLine(_))
    ));
    assert!(matches!(
        timetable.line("bus-old", 1),
        Err(timetable::Error::MissingDirection { direction: 1, .. })
    ));
    assert!(matches!(
        timetable.route("bus-9-0"),
        Err(timetable::Error::UnknownRoute(_))
    ));
}

#[test]
fn date_strings_must_be_well_formed() {
    let repository = repository();
    assert!(matches!(
        repository.timetable_for("2026-1-18"),
        Err(timetable::Error::InvalidDate(_))
    ));
    assert!(matches!(
        repository.timetable_for("18.01.2026"),
        Err(timetable::Error::InvalidDate(_))
    ));
    assert!(matches!(
        repository.timetable_for("+2026-1-01"),
        Err(timetable::Error::InvalidDate(_))
    ));
    assert!(matches!(
        repository.timetable_for(" 2026-01-18"),
        Err(timetable::Error::InvalidDate(_))
    ));
    let timetable = repository.timetable_for("2026-01-18").unwrap();
    assert_eq!(timetable.day_type(), DayType::Sunday);
}

#[test]
fn loads_from_a_directory() {
    let dir = tempfile::tempdir().unwrap();
    write_directory(dir.path(), &snapshot());

    let reader = SnapshotReader::default().from_directory(dir.path().to_path_buf());
    let loaded = Repository::load(&reader, &config()).unwrap();
    let expected = repository();

    let date = date(2026, 1, 18);
    assert_eq!(
        loaded.timetable(date).unwrap().today(Category::Sea),
        expected.timetable(date).unwrap().today(Category::Sea)
    );
    assert_eq!(
        loaded.timetable(date).unwrap().route("bus-1-0").unwrap(),
        expected.timetable(date).unwrap().route("bus-1-0").unwrap()
    );
    assert!(loaded.calendar().is_holiday(common::date(2026, 3, 19)));
}

#[test]
fn loads_from_a_zip_archive() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("snapshot.zip");
    write_zip(&path, &snapshot());

    let reader = SnapshotReader::default().from_zip(path);
    let loaded = Repository::load(&reader, &config()).unwrap();
    let date = date(2026, 1, 18);
    assert_eq!(loaded.timetable(date).unwrap().today(Category::Road).len(), 3);
}

#[test]
fn holidays_table_is_optional() {
    let dir = tempfile::tempdir().unwrap();
    let mut data = snapshot();
    data.holidays.clear();
    write_directory(dir.path(), &data);
    std::fs::remove_file(dir.path().join("holidays.txt")).unwrap();

    let reader = SnapshotReader::default().from_directory(dir.path().to_path_buf());
    let loaded = Repository::load(&reader, &config()).unwrap();
    assert!(!loaded.calendar().is_holiday(date(2026, 3, 19)));
    assert!(loaded.calendar().is_holiday(date(2026, 1, 6)));
}

#[test]
fn table_names_are_configurable() {
    let dir = tempfile::tempdir().unwrap();
    write_directory(dir.path(), &snapshot());
    std::fs::rename(dir.path().join("departures.txt"), dir.path().join("polasci.txt")).unwrap();

    let tables = TableConfig {
        departures_file_name: "polasci.txt".into(),
        ..Default::default()
    };
    assert!(format!("{:?}", tables.clone()).contains("polasci.txt"));

    let reader = SnapshotReader::new(tables).from_directory(dir.path().to_path_buf());
    let loaded = Repository::load(&reader, &config()).unwrap();
    assert_eq!(loaded.departures.len(), 12);
}

#[test]
fn missing_required_table_fails() {
    let dir = tempfile::tempdir().unwrap();
    write_directory(dir.path(), &snapshot());
    std::fs::remove_file(dir.path().join("departures.txt")).unwrap();

    let reader = SnapshotReader::default().from_directory(dir.path().to_path_buf());
    assert!(matches!(
        Repository::load(&reader, &config()),
        Err(Error::Snapshot(SnapshotError::FileNotFound(_)))
    ));
}

#[test]
fn every_season_overlap_is_reported() {
    let mut data = snapshot();
    data.seasons = vec![
        season("off-2026", "OFF", 2026, "2026-01-01", "2026-05-01"),
        season("pre-2026", "PRE", 2026, "2026-05-01", "2026-06-30"),
        season("off-2027", "OFF", 2027, "2027-01-01", "2027-06-15"),
        season("pre-2027", "PRE", 2027, "2027-06-01", "2027-06-30"),
    ];
    let Err(Error::SeasonOverlaps(overlaps)) = Repository::from_snapshot(data, &config()) else {
        panic!("expected season overlaps");
    };
    let years: Vec<i32> = overlaps.iter().map(|overlap| overlap.year).collect();
    assert_eq!(years, vec![2026, 2027]);
}

#[test]
fn inverted_season_is_rejected() {
    let mut data = snapshot();
    data.seasons.push(season("broken", "HIGH", 2027, "2027-08-31", "2027-07-01"));
    assert!(matches!(
        Repository::from_snapshot(data, &config()),
        Err(Error::InvalidSeason(_))
    ));
}

#[test]
fn season_must_stay_inside_its_year() {
    let mut data = snapshot();
    data.seasons = vec![
        season("off-2026", "OFF", 2026, "2026-01-01", "2026-05-31"),
        season("post-2026", "POST", 2026, "2026-09-01", "2027-01-31"),
        season("off-2027", "OFF", 2027, "2027-01-01", "2027-05-31"),
    ];
    let Err(Error::InvalidRecord { table, id, .. }) = Repository::from_snapshot(data, &config()) else {
        panic!("expected an invalid season record");
    };
    assert_eq!(table, "seasons");
    assert_eq!(id, "post-2026");

    let mut data = snapshot();
    data.seasons.push(season("early", "OFF", 2027, "2026-12-20", "2027-03-31"));
    assert!(matches!(
        Repository::from_snapshot(data, &config()),
        Err(Error::InvalidRecord { table: "seasons", .. })
    ));
}

#[test]
fn dangling_references_are_rejected() {
    let mut data = snapshot();
    data.departures
        .push(departure("ghost", "bus-9-0", "SUN", "12:00", "12:00"));
    assert!(matches!(
        Repository::from_snapshot(data, &config()),
        Err(Error::UnknownReference { kind: "route", .. })
    ));

    let mut data = snapshot();
    let mut orphan = departure("orphan", "bus-1-0", "SUN", "12:00", "12:00");
    orphan.season_id = "winter-1999".into();
    data.departures.push(orphan);
    assert!(matches!(
        Repository::from_snapshot(data, &config()),
        Err(Error::UnknownReference { kind: "season", .. })
    ));

    let config = Config {
        island_origins: vec!["atlantis".into()],
        ..Default::default()
    };
    assert!(matches!(
        Repository::from_snapshot(snapshot(), &config),
        Err(Error::UnknownReference { kind: "stop", .. })
    ));
}

#[test]
fn line_owns_one_route_per_direction() {
    let mut data = snapshot();
    data.routes.push(route("bus-1-extra", "bus-1", 0, 30));
    assert!(matches!(
        Repository::from_snapshot(data, &config()),
        Err(Error::DuplicateDirection { direction: 0, .. })
    ));

    let mut data = snapshot();
    data.routes.push(route("bus-1-2", "bus-1", 2, 30));
    assert!(matches!(
        Repository::from_snapshot(data, &config()),
        Err(Error::InvalidRecord { table: "routes", .. })
    ));
}

#[test]
fn malformed_departures_are_rejected() {
    let mut data = snapshot();
    data.departures
        .push(departure("bad-day", "bus-1-0", "SUNDAY", "12:00", ""));
    assert!(matches!(
        Repository::from_snapshot(data, &config()),
        Err(Error::InvalidRecord { table: "departures", .. })
    ));

    let mut data = snapshot();
    let mut inverted = departure("inverted", "bus-1-0", "SUN", "12:00", "");
    inverted.date_from = Some("2026-05-01".into());
    inverted.date_to = Some("2026-04-01".into());
    data.departures.push(inverted);
    assert!(matches!(
        Repository::from_snapshot(data, &config()),
        Err(Error::InvalidRecord { table: "departures", .. })
    ));

    let mut data = snapshot();
    data.departures
        .push(departure("late", "bus-1-0", "SUN", "24:10", ""));
    assert!(matches!(
        Repository::from_snapshot(data, &config()),
        Err(Error::InvalidRecord { table: "departures", .. })
    ));
}

#[test]
fn duplicate_ids_are_rejected() {
    let mut data = snapshot();
    data.departures
        .push(departure("bus-sun-0700", "bus-1-0", "SUN", "07:05", ""));
    assert!(matches!(
        Repository::from_snapshot(data, &config()),
        Err(Error::DuplicateId { table: "departures", .. })
    ));
}

#[test]
fn statutory_holidays_can_be_switched_off() {
    let config = Config {
        statutory_holidays: false,
        ..config()
    };
    let repository = Repository::from_snapshot(snapshot(), &config).unwrap();
    assert_eq!(repository.day_type(date(2026, 1, 6)), DayType::Tuesday);
    assert_eq!(repository.day_type(date(2026, 3, 19)), DayType::Holiday);
}
