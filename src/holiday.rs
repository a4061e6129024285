//! Statutory holiday adjustments (mainland China), 2001 through 2026.
//!
//! Each row of `data/holidays.txt` marks one Gregorian day either as a day
//! off (`休`) or as a makeup workday (`班`), together with the holiday it
//! belongs to. Days not listed carry no marker.

use std::collections::HashMap;
use std::fmt;
use std::sync::LazyLock;

use chrono::NaiveDate;
use log::error;
use serde::Serialize;

use crate::date::Date;

/// Marker shown next to the lunar date.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Serialize)]
pub enum HolidayMarker {
    /// Makeup workday on a weekend.
    #[serde(rename = "班")]
    Workday,
    /// Day off.
    #[serde(rename = "休")]
    DayOff,
}

impl HolidayMarker {
    pub fn label(&self) -> &'static str {
        match self {
            HolidayMarker::Workday => "班",
            HolidayMarker::DayOff => "休",
        }
    }
}

impl fmt::Display for HolidayMarker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, Eq, PartialEq)]
pub struct Holiday {
    pub date: Date,
    pub name: &'static str,
    pub marker: HolidayMarker,
}

static RAW_DATA: &str = include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/data/holidays.txt"));

static DATA: LazyLock<HashMap<Date, Holiday>> = LazyLock::new(|| {
    parse_raw_data().unwrap_or_else(|e| {
        error!("error parsing holiday data: {e}");
        HashMap::new()
    })
});

/// Looks up the adjustment for `date`, if any.
///
/// # Example
///
/// ```
/// use nongli::Date;
/// use nongli::holiday::{self, HolidayMarker};
///
/// let date = Date::from_gregorian(2025, 1, 26).unwrap();
/// let holiday = holiday::lookup(date).unwrap();
/// assert_eq!(HolidayMarker::Workday, holiday.marker);
/// assert_eq!("春节", holiday.name);
///
/// assert!(holiday::lookup(Date::from_gregorian(2025, 3, 3).unwrap()).is_none());
/// ```
pub fn lookup(date: Date) -> Option<&'static Holiday> {
    DATA.get(&date)
}

fn parse_raw_data() -> Result<HashMap<Date, Holiday>, RawDataError> {
    let mut res = HashMap::new();
    for (line_num, line) in (1usize..).zip(RAW_DATA.lines()) {
        if line.starts_with('#') {
            continue;
        }
        let mut it = line.split_whitespace();
        let Some(date) = it.next() else {
            continue;
        };
        let date = parse_iso(date).ok_or(RawDataError::new(line_num, 1, ErrorType::InvalidDate))?;
        let marker = match it.next() {
            Some("班") => HolidayMarker::Workday,
            Some("休") => HolidayMarker::DayOff,
            Some(_) => return Err(RawDataError::new(line_num, 2, ErrorType::InvalidMarker)),
            None => return Err(RawDataError::new(line_num, 2, ErrorType::MissingField)),
        };
        let name = it
            .next()
            .ok_or(RawDataError::new(line_num, 3, ErrorType::MissingField))?;
        if res.insert(date, Holiday { date, name, marker }).is_some() {
            return Err(RawDataError::new(line_num, 1, ErrorType::Duplicate));
        }
    }
    Ok(res)
}

fn parse_iso(s: &str) -> Option<Date> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").ok().map(Date::from)
}

#[derive(Debug)]
struct RawDataError {
    line_num: usize,
    field_num: usize,
    reason: ErrorType,
}

impl RawDataError {
    fn new(line_num: usize, field_num: usize, reason: ErrorType) -> Self {
        Self {
            line_num,
            field_num,
            reason,
        }
    }
}

impl fmt::Display for RawDataError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "line {}, field {}: {:?}",
            self.line_num, self.field_num, self.reason
        )
    }
}

#[derive(Debug)]
enum ErrorType {
    InvalidDate,
    InvalidMarker,
    MissingField,
    Duplicate,
}
