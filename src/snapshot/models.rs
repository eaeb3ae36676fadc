use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Debug, Clone, Default)]
#[serde(deny_unknown_fields)]
pub struct StopRecord {
    pub stop_id: String,
    pub stop_name: String,
    pub stop_name_en: Option<String>,
    pub stop_lat: Option<f64>,
    pub stop_lon: Option<f64>,
}

#[derive(Serialize, Deserialize, Debug, Clone, Default)]
#[serde(deny_unknown_fields)]
pub struct LineRecord {
    pub line_id: String,
    pub line_name: String,
    /// `road` or `sea`.
    pub category: String,
    pub subtype: Option<String>,
    pub display_order: u32,
    pub active: bool,
}

#[derive(Serialize, Deserialize, Debug, Clone, Default)]
#[serde(deny_unknown_fields)]
pub struct RouteRecord {
    pub route_id: String,
    pub line_id: String,
    /// 0 or 1.
    pub direction: u8,
    /// Minutes.
    pub typical_duration: u32,
}

#[derive(Serialize, Deserialize, Debug, Clone, Default)]
#[serde(deny_unknown_fields)]
pub struct RouteStopRecord {
    pub route_id: String,
    pub stop_id: String,
    pub stop_sequence: u32,
}

#[derive(Serialize, Deserialize, Debug, Clone, Default)]
#[serde(deny_unknown_fields)]
pub struct SeasonRecord {
    pub season_id: String,
    pub label: String,
    pub year: i32,
    pub date_from: String,
    pub date_to: String,
}

#[derive(Serialize, Deserialize, Debug, Clone, Default)]
#[serde(deny_unknown_fields)]
pub struct DepartureRecord {
    pub departure_id: String,
    pub route_id: String,
    pub season_id: String,
    /// `MON`..`SUN` or `PRAZNIK`.
    pub day_type: String,
    pub departure_time: String,
    /// `;` separated `HH:MM` values aligned with the route's stops, blank
    /// where the trip does not call.
    pub stop_times: String,
    pub date_from: Option<String>,
    pub date_to: Option<String>,
    /// `;` separated dates.
    pub include_dates: Option<String>,
    /// `;` separated dates.
    pub exclude_dates: Option<String>,
    pub notes: Option<String>,
}

#[derive(Serialize, Deserialize, Debug, Clone, Default)]
#[serde(deny_unknown_fields)]
pub struct HolidayRecord {
    pub date: String,
    pub name: Option<String>,
}
