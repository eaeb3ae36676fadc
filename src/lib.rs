pub mod calendar;
pub mod repository;
pub mod season;
pub mod shared;
pub mod snapshot;
pub mod timetable;

pub mod prelude {
    pub use crate::calendar::{Calendar, DayType, HolidayCalendar, resolve_day_type};
    pub use crate::repository::{
        Category, Config, Departure, Direction, Line, Repository, Route, Stop,
    };
    pub use crate::season::{
        Season, SeasonLabel, SeasonOverlap, resolve_season, validate_season_catalogue,
    };
    pub use crate::shared::{Duration, Language, Time, parse_date};
    pub use crate::snapshot::{Snapshot, SnapshotReader};
    pub use crate::timetable::{
        DateRange, RouteTimetable, ScheduledDeparture, Timetable, TodayDeparture, Validity,
        check_departure, eligible_departures, project_stop_times,
    };
}
