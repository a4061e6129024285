//! Error types for lunar date computation.

use std::error::Error;
use std::fmt::{Display, Formatter};

use crate::date::Date;

/// Reasons a converter could not produce a lunar record.
///
/// None of these reach callers of [`compute`](crate::compute): the engine
/// logs them and returns the fallback record instead.
#[derive(Debug, Clone, PartialEq)]
#[non_exhaustive]
pub enum EngineError {
    /// The Gregorian `(year, month, day)` does not name a real day.
    InvalidDate { year: i32, month: i32, day: i32 },
    /// The date lies outside the range covered by the embedded tables.
    OutOfRange(Date),
    /// The ephemeris has no row for the requested annus, or failed to load.
    MissingData(i32),
    /// Table data exists but does not describe a valid lunar year.
    Inconsistent(String),
    /// The platform calendar rejected the conversion.
    Platform(String),
}

impl Display for EngineError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidDate { year, month, day } => {
                write!(f, "invalid Gregorian date {year:04}-{month:02}-{day:02}")
            }
            Self::OutOfRange(date) => {
                write!(f, "{} is outside the supported range", date.iso_gregorian())
            }
            Self::MissingData(annus) => write!(f, "no ephemeris data for annus {annus}"),
            Self::Inconsistent(msg) => write!(f, "inconsistent calendar data: {msg}"),
            Self::Platform(msg) => write!(f, "platform calendar error: {msg}"),
        }
    }
}

impl Error for EngineError {}

impl From<icu_calendar::RangeError> for EngineError {
    fn from(e: icu_calendar::RangeError) -> Self {
        Self::Platform(format!("{e:?}"))
    }
}
