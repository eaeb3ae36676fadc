use chrono::NaiveDate;
use thiserror::Error;

pub const DATE_FORMAT: &str = "%Y-%m-%d";

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Invalid date {value:?}, expected YYYY-MM-DD")]
pub struct DateError {
    pub value: String,
}

/// Parses a civil date in `YYYY-MM-DD` form.
///
/// Only the exact zero-padded shape is accepted, no sign and no surrounding
/// whitespace.
pub fn parse_date(value: &str) -> Result<NaiveDate, DateError> {
    let invalid = || DateError {
        value: value.to_string(),
    };
    let well_formed = value.len() == 10
        && value.bytes().enumerate().all(|(i, byte)| match i {
            4 | 7 => byte == b'-',
            _ => byte.is_ascii_digit(),
        });
    if !well_formed {
        return Err(invalid());
    }
    NaiveDate::parse_from_str(value, DATE_FORMAT).map_err(|_| invalid())
}

/// Parses a `;` separated list of dates. Blank input is an empty list.
pub fn parse_date_list(value: &str) -> Result<Vec<NaiveDate>, DateError> {
    value
        .split(';')
        .map(str::trim)
        .filter(|val| !val.is_empty())
        .map(parse_date)
        .collect()
}
