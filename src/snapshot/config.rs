/// File names of the snapshot tables inside an archive or directory.
#[derive(Debug, Clone)]
pub struct Config {
    pub stops_file_name: String,
    pub lines_file_name: String,
    pub routes_file_name: String,
    pub route_stops_file_name: String,
    pub seasons_file_name: String,
    pub departures_file_name: String,
    /// Optional table. A missing file means no extra holidays.
    pub holidays_file_name: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            stops_file_name: "stops.txt".into(),
            lines_file_name: "lines.txt".into(),
            routes_file_name: "routes.txt".into(),
            route_stops_file_name: "route_stops.txt".into(),
            seasons_file_name: "seasons.txt".into(),
            departures_file_name: "departures.txt".into(),
            holidays_file_name: "holidays.txt".into(),
        }
    }
}
