//! Chinese lunisolar date engine.
//!
//! Converts Gregorian dates into the traditional Chinese calendar: lunar
//! month and day, sexagenary year/month/day, zodiac sign, festivals and solar
//! terms, statutory holiday markers, the daily almanac (宜/忌, clash, sha,
//! five elements, Peng Zu taboos) and the twelve two-hour periods. Dates from
//! 1900 through 2100 are supported, using an embedded table of new moons and
//! solar terms.
//!
//! # Examples
//!
//! Basic usage with [`Date`]:
//!
//! ```
//! use nongli::Date;
//!
//! let date = Date::from_gregorian(2000, 1, 1).unwrap();
//!
//! assert_eq!(6, date.day_of_week()); // Saturday
//! assert_eq!(2451545, date.jdn());
//! ```
//!
//! Everything for one day at once:
//!
//! ```
//! use nongli::Date;
//!
//! let info = nongli::compute(Date::from_gregorian(2025, 1, 29).unwrap());
//!
//! assert_eq!("正月", info.month);
//! assert_eq!("初一", info.day);
//! assert_eq!(Some("春节"), info.festival.as_deref());
//! assert_eq!(12, info.hours.len());
//! ```
//!
//! Chinese lunisolar calendar only:
//!
//! ```
//! use nongli::Date;
//! use nongli::chinese::{Annus, Month::*};
//!
//! let date = Date::from_gregorian(2000, 1, 1).unwrap();
//! let annus = Annus::from_date(date).unwrap();
//!
//! assert_eq!(Ok((1999, Common(11), 25)), annus.ymd_for(date));
//! ```
//!
//! [`compute`] never fails. Outside the supported range it returns
//! [`LunarInfo::unavailable`], whose `is_fallback` flag is set.

pub mod chinese;
pub mod config;
pub mod date;
pub mod engine;
pub mod error;
pub mod holiday;

pub use date::{Date, YearType};
pub use engine::{
    ConverterKind, LunarConverter, LunarDate, LunarInfo, PlatformApproximate, TableBased,
    UNAVAILABLE, compute, compute_ymd,
};
pub use error::EngineError;
