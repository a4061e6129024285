//! The lunar date engine.
//!
//! [`compute`] turns a Gregorian [`Date`] into a fully populated
//! [`LunarInfo`]. It never fails: dates outside the supported range, missing
//! table rows and any other fault produce the fallback record from
//! [`LunarInfo::unavailable`], with `is_fallback` set.
//!
//! Two converters implement [`LunarConverter`]:
//!
//! - [`TableBased`] works from the embedded ephemeris and fills in every
//!   field, including festivals, holiday markers, the daily almanac and the
//!   twelve hour periods.
//! - [`PlatformApproximate`] asks `icu_calendar` for the lunar month and day
//!   and derives the year pillar from the Gregorian year alone. It leaves the
//!   festival, holiday, almanac and hour fields empty.

use clap::ValueEnum;
use icu_calendar::cal::Chinese;
use log::warn;
use serde::{Deserialize, Serialize};

use crate::chinese::almanac::{self, DailyFortune, HourPeriod};
use crate::chinese::sexagenary::GanZhi;
use crate::chinese::{self, Annus, Month, festival, fmt};
use crate::date::Date;
use crate::error::EngineError;
use crate::holiday::{self, HolidayMarker};

/// Text shown in place of every field of the fallback record.
pub const UNAVAILABLE: &str = "加载失败";

/// First supported date, 1900-01-01.
pub const FIRST_SUPPORTED_JDN: u32 = 2_415_021;
/// Last supported date, 2100-12-31.
pub const LAST_SUPPORTED_JDN: u32 = 2_488_434;

/// Lunar month and day as numbers. Serialised inline in [`LunarInfo`] as
/// `lunarYear`, `lunarMonth`, `isLeapMonth` and `lunarDay`.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LunarDate {
    /// Lunar year, counted from 正月初一 and named after the Gregorian year
    /// it mostly overlaps.
    #[serde(rename = "lunarYear")]
    pub year: i32,
    #[serde(rename = "lunarMonth")]
    pub month: u32,
    pub is_leap_month: bool,
    #[serde(rename = "lunarDay")]
    pub day: u32,
}

/// Everything the display layer shows for one Gregorian day.
#[derive(Debug, Clone, Eq, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LunarInfo {
    /// `lunarDay[·festival][·holiday]`, e.g. `正月·春节·休`.
    pub full_date: String,
    /// The festival if there is one, otherwise the lunar day.
    pub date: String,
    pub month: String,
    pub day: String,
    /// Sexagenary year, changing at 立春 for [`TableBased`].
    pub year: String,
    pub year_zodiac: String,
    pub month_ganzhi: String,
    pub day_ganzhi: String,
    pub is_festival: bool,
    pub festival: Option<String>,
    pub holiday: Option<HolidayMarker>,
    pub holiday_name: Option<String>,
    /// Solar term beginning on this day.
    pub solar_term: Option<String>,
    pub fortune: Option<DailyFortune>,
    /// Peng Zu taboos, stem line first.
    pub pengzu: Vec<String>,
    pub hours: Vec<HourPeriod>,
    /// Absent from the fallback record.
    #[serde(flatten)]
    pub lunar: Option<LunarDate>,
    pub converter: ConverterKind,
    pub is_fallback: bool,
}

impl LunarInfo {
    /// The record returned when no lunar data could be computed.
    ///
    /// ```
    /// use nongli::{ConverterKind, LunarInfo, UNAVAILABLE};
    ///
    /// let info = LunarInfo::unavailable(ConverterKind::TableBased);
    /// assert!(info.is_fallback);
    /// assert_eq!(UNAVAILABLE, info.full_date);
    /// assert!(info.hours.is_empty());
    /// ```
    pub fn unavailable(converter: ConverterKind) -> Self {
        let text = || UNAVAILABLE.to_owned();
        Self {
            full_date: text(),
            date: text(),
            month: text(),
            day: text(),
            year: text(),
            year_zodiac: text(),
            month_ganzhi: text(),
            day_ganzhi: text(),
            is_festival: false,
            festival: None,
            holiday: None,
            holiday_name: None,
            solar_term: None,
            fortune: Some(DailyFortune::unavailable(UNAVAILABLE)),
            pengzu: vec![text(), text()],
            hours: Vec::new(),
            lunar: None,
            converter,
            is_fallback: true,
        }
    }
}

/// Selects a converter, e.g. from configuration or the command line.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Default, Serialize, Deserialize, ValueEnum)]
pub enum ConverterKind {
    /// Embedded ephemeris tables.
    #[default]
    #[serde(rename = "table")]
    #[value(name = "table")]
    TableBased,
    /// The platform Chinese calendar (`icu_calendar`).
    #[serde(rename = "platform")]
    #[value(name = "platform")]
    PlatformApproximate,
}

impl ConverterKind {
    pub fn name(&self) -> &'static str {
        match self {
            ConverterKind::TableBased => "table",
            ConverterKind::PlatformApproximate => "platform",
        }
    }
}

/// A strategy for turning a Gregorian date into lunar information.
pub trait LunarConverter {
    fn kind(&self) -> ConverterKind;

    /// Converts `date`, reporting why it could not.
    fn convert(&self, date: Date) -> Result<LunarInfo, EngineError>;

    /// Converts `date`, substituting the fallback record on any error.
    fn compute(&self, date: Date) -> LunarInfo {
        self.convert(date).unwrap_or_else(|e| {
            warn!("lunar conversion of {} failed: {e}", date.iso_gregorian());
            LunarInfo::unavailable(self.kind())
        })
    }

    /// Like [`compute`](Self::compute), for a raw Gregorian date that may be
    /// malformed.
    fn compute_ymd(&self, year: i32, month: i32, day: i32) -> LunarInfo {
        match Date::from_gregorian(year, month, day) {
            Some(date) => self.compute(date),
            None => {
                warn!("{}", EngineError::InvalidDate { year, month, day });
                LunarInfo::unavailable(self.kind())
            }
        }
    }
}

impl LunarConverter for ConverterKind {
    fn kind(&self) -> ConverterKind {
        *self
    }
    fn convert(&self, date: Date) -> Result<LunarInfo, EngineError> {
        match self {
            ConverterKind::TableBased => TableBased.convert(date),
            ConverterKind::PlatformApproximate => PlatformApproximate.convert(date),
        }
    }
}

/// Converter backed by the embedded ephemeris.
#[derive(Debug, Copy, Clone, Default)]
pub struct TableBased;

/// Converter backed by `icu_calendar`'s Chinese calendar.
#[derive(Debug, Copy, Clone, Default)]
pub struct PlatformApproximate;

impl LunarConverter for TableBased {
    fn kind(&self) -> ConverterKind {
        ConverterKind::TableBased
    }

    fn convert(&self, date: Date) -> Result<LunarInfo, EngineError> {
        check_range(date)?;
        let annus = Annus::from_date(date)?;
        let misplaced =
            |_| EngineError::Inconsistent(format!("{} not in annus {}", date.iso_gregorian(), annus.annus));
        let (lunar_year, month, day) = annus.ymd_for(date).map_err(misplaced)?;
        let month_len = annus.month_length(date).map_err(misplaced)?;
        let (_, term, since_term) = annus
            .solar_term_for(date)
            .map_err(|_| EngineError::MissingData(annus.annus - 1))?;

        let pillar_year = chinese::year_by_spring(date)?;
        let day_pillar = GanZhi::of_day(date);
        let solar_term = (since_term == 0).then(|| fmt::solar_term(term));
        let festival = festival::lunar(month, day, month_len)
            .or_else(|| festival::solar(date))
            .or(solar_term);
        let holiday = holiday::lookup(date);

        let mut info = labelled(
            ConverterKind::TableBased,
            lunar_year,
            pillar_year,
            month,
            day,
            festival,
            holiday.map(|h| h.marker),
        );
        info.day_ganzhi = day_pillar.to_string();
        info.holiday_name = holiday.map(|h| h.name.to_owned());
        info.solar_term = solar_term.map(str::to_owned);
        info.fortune = Some(almanac::daily_fortune(
            day_pillar,
            almanac::month_branch_for_term(term),
        ));
        info.pengzu = almanac::pengzu(day_pillar).into();
        info.hours = almanac::hour_periods(day_pillar);
        Ok(info)
    }
}

impl LunarConverter for PlatformApproximate {
    fn kind(&self) -> ConverterKind {
        ConverterKind::PlatformApproximate
    }

    fn convert(&self, date: Date) -> Result<LunarInfo, EngineError> {
        check_range(date)?;
        let (y, m, d) = date.gregorian();
        let lunar = icu_calendar::Date::try_new_iso(y, m as u8, d as u8)?
            .to_calendar(Chinese::new());
        let month_info = lunar.month();
        let number = u32::from(month_info.month_number());
        let month = if month_info.is_leap() {
            Month::Leap(number)
        } else {
            Month::Common(number)
        };
        let day = u32::from(lunar.day_of_month().0);
        if !(1..=12).contains(&number) || !(1..=30).contains(&day) {
            return Err(EngineError::Platform(format!(
                "lunar month {number} day {day} out of range"
            )));
        }

        let mut info = labelled(
            ConverterKind::PlatformApproximate,
            lunar.cyclic_year().related_iso,
            y,
            month,
            day,
            None,
            None,
        );
        info.day_ganzhi = GanZhi::of_day(date).to_string();
        Ok(info)
    }
}

/// Converts `date` with the table-based converter.
///
/// # Example
///
/// ```
/// use nongli::Date;
///
/// let info = nongli::compute(Date::from_gregorian(2024, 2, 10).unwrap());
/// assert_eq!("正月", info.month);
/// assert_eq!("初一", info.day);
/// assert_eq!("甲辰", info.year);
/// assert_eq!("龙", info.year_zodiac);
/// assert_eq!(Some("春节"), info.festival.as_deref());
/// assert_eq!("正月·春节·休", info.full_date);
/// ```
pub fn compute(date: Date) -> LunarInfo {
    TableBased.compute(date)
}

/// Converts a raw Gregorian date with the table-based converter. Malformed
/// dates yield the fallback record.
///
/// ```
/// let info = nongli::compute_ymd(2023, 2, 29);
/// assert!(info.is_fallback);
/// ```
pub fn compute_ymd(year: i32, month: i32, day: i32) -> LunarInfo {
    TableBased.compute_ymd(year, month, day)
}

fn check_range(date: Date) -> Result<(), EngineError> {
    if (FIRST_SUPPORTED_JDN..=LAST_SUPPORTED_JDN).contains(&date.jdn()) {
        Ok(())
    } else {
        Err(EngineError::OutOfRange(date))
    }
}

/// Builds the parts of a record common to both converters. `pillar_year`
/// names the sexagenary year; the month pillar takes its stem from it.
fn labelled(
    converter: ConverterKind,
    lunar_year: i32,
    pillar_year: i32,
    month: Month,
    day: u32,
    festival: Option<&str>,
    holiday: Option<HolidayMarker>,
) -> LunarInfo {
    let year = GanZhi::of_year(pillar_year);
    let month_label = fmt::month(month);
    let day_label = fmt::day(day);
    let lunar_day = if day == 1 {
        month_label.clone()
    } else {
        day_label.clone()
    };
    let full_date = [Some(lunar_day.as_str()), festival, holiday.map(|h| h.label())]
        .into_iter()
        .flatten()
        .collect::<Vec<_>>()
        .join("·");

    LunarInfo {
        full_date,
        date: festival.map_or(lunar_day, str::to_owned),
        month: month_label,
        day: day_label,
        year: year.to_string(),
        year_zodiac: year.zodiac().to_owned(),
        month_ganzhi: GanZhi::of_month(pillar_year, month.num()).to_string(),
        day_ganzhi: String::new(),
        is_festival: festival.is_some(),
        festival: festival.map(str::to_owned),
        holiday,
        holiday_name: None,
        solar_term: None,
        fortune: None,
        pengzu: Vec::new(),
        hours: Vec::new(),
        lunar: Some(LunarDate {
            year: lunar_year,
            month: month.num(),
            is_leap_month: month.is_leap(),
            day,
        }),
        converter,
        is_fallback: false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lunar_info(y: i32, m: i32, d: i32) -> LunarInfo {
        compute(Date::from_gregorian(y, m, d).unwrap())
    }

    #[test]
    fn supported_bounds() {
        assert_eq!(
            FIRST_SUPPORTED_JDN,
            Date::from_gregorian(1900, 1, 1).unwrap().jdn()
        );
        assert_eq!(
            LAST_SUPPORTED_JDN,
            Date::from_gregorian(2100, 12, 31).unwrap().jdn()
        );
        assert!(!lunar_info(1900, 1, 1).is_fallback);
        assert!(!lunar_info(2100, 12, 31).is_fallback);
        assert!(lunar_info(1899, 12, 31).is_fallback);
        assert!(lunar_info(2101, 1, 1).is_fallback);
    }

    #[test]
    fn range_edges() {
        let first = lunar_info(1900, 1, 1);
        assert_eq!("腊月", first.month);
        assert_eq!("初一", first.day);
        assert_eq!("己亥", first.year);
        let last = lunar_info(2100, 12, 31);
        assert_eq!("腊月", last.month);
        assert_eq!("庚申", last.year);
    }

    #[test]
    fn lunar_new_year() {
        let info = lunar_info(2025, 1, 29);
        assert_eq!("正月", info.month);
        assert_eq!("初一", info.day);
        assert_eq!("戊戌", info.day_ganzhi);
        // 立春 2025-02-03 not yet reached: still a 甲 year, so 正月 is 丙寅
        assert_eq!("甲辰", info.year);
        assert_eq!("丙寅", info.month_ganzhi);
        assert_eq!(Some(HolidayMarker::DayOff), info.holiday);
        assert_eq!("正月·春节·休", info.full_date);
        assert_eq!("春节", info.date);
        assert_eq!(
            Some(LunarDate {
                year: 2025,
                month: 1,
                is_leap_month: false,
                day: 1
            }),
            info.lunar
        );
    }

    #[test]
    fn new_years_eve() {
        let info = lunar_info(2025, 1, 28);
        assert_eq!("腊月", info.month);
        assert_eq!("廿九", info.day);
        assert_eq!(Some("除夕"), info.festival.as_deref());
        assert_eq!("廿九·除夕·休", info.full_date);
    }

    #[test]
    fn plain_day() {
        let info = lunar_info(2025, 3, 3);
        assert_eq!("初四", info.full_date);
        assert_eq!("初四", info.date);
        assert!(!info.is_festival);
        assert_eq!(None, info.holiday);
    }

    #[test]
    fn solar_term_as_festival() {
        let info = lunar_info(2024, 2, 4);
        assert_eq!(Some("立春"), info.solar_term.as_deref());
        assert_eq!(Some("立春"), info.festival.as_deref());
        assert_eq!("廿五·立春·班", info.full_date);
    }

    #[test]
    fn festival_priority() {
        // 2023-01-22 春节 on a day that is also a holiday
        let info = lunar_info(2023, 1, 22);
        assert_eq!(Some("春节"), info.festival.as_deref());
        // 2024-10-01 国庆节, not a solar term
        let info = lunar_info(2024, 10, 1);
        assert_eq!(Some("国庆节"), info.festival.as_deref());
        assert_eq!(None, info.solar_term);
        // 中秋 on 国庆: the lunar festival wins
        let info = lunar_info(2020, 10, 1);
        assert_eq!(Some("中秋节"), info.festival.as_deref());
        assert_eq!("十五·中秋节·休", info.full_date);
        // 父亲节 on 夏至: the Gregorian festival wins, the term is still reported
        let info = lunar_info(2020, 6, 21);
        assert_eq!(Some("父亲节"), info.festival.as_deref());
        assert_eq!(Some("夏至"), info.solar_term.as_deref());
    }

    #[test]
    fn month_pillar_follows_year_pillar() {
        for ((y, m, d), year, month) in [
            // after 正月初一, before 立春
            ((2025, 1, 30), "甲辰", "丙寅"),
            ((2025, 2, 3), "乙巳", "戊寅"),
            // after 立春, before 正月初一
            ((2024, 2, 5), "甲辰", "丁丑"),
            ((2024, 2, 10), "甲辰", "丙寅"),
        ] {
            let info = lunar_info(y, m, d);
            assert_eq!(year, info.year, "{y}-{m}-{d}");
            assert_eq!(month, info.month_ganzhi, "{y}-{m}-{d}");
        }
    }

    #[test]
    fn leap_month() {
        let info = lunar_info(2023, 3, 22);
        assert_eq!("闰二月", info.month);
        assert_eq!("初一", info.day);
        assert_eq!("乙卯", info.month_ganzhi);
        assert_eq!("闰二月", info.full_date);
    }

    #[test]
    fn table_fields_populated() {
        let info = lunar_info(2024, 2, 10);
        let fortune = info.fortune.unwrap();
        assert_eq!("(戊戌)狗", fortune.chong);
        assert_eq!("南", fortune.sha);
        assert_eq!("木土", fortune.wuxing);
        assert_eq!("覆灯火", fortune.nayin);
        assert!(!fortune.yi.is_empty());
        assert_eq!(
            vec!["甲不开仓财物耗散", "辰不哭泣必主重丧"],
            info.pengzu
        );
        assert_eq!(12, info.hours.len());
        assert_eq!(Some("春节"), info.holiday_name.as_deref());
    }

    #[test]
    fn fallback_outside_range() {
        for (y, m, d) in [(1500, 6, 1), (3000, 1, 1)] {
            let info = lunar_info(y, m, d);
            assert!(info.is_fallback);
            assert_eq!(UNAVAILABLE, info.full_date);
            assert_eq!(UNAVAILABLE, info.month);
            assert_eq!(UNAVAILABLE, info.day);
            assert_eq!(UNAVAILABLE, info.year);
            assert_eq!(vec![UNAVAILABLE, UNAVAILABLE], info.pengzu);
            let fortune = info.fortune.unwrap();
            assert_eq!(UNAVAILABLE, fortune.chong);
            assert!(fortune.yi.is_empty());
            assert!(info.hours.is_empty());
        }
    }

    #[test]
    fn malformed_input() {
        let info = compute_ymd(2024, 2, 30);
        assert_eq!(LunarInfo::unavailable(ConverterKind::TableBased), info);
        let info = ConverterKind::PlatformApproximate.compute_ymd(2024, 13, 1);
        assert!(info.is_fallback);
        assert_eq!(ConverterKind::PlatformApproximate, info.converter);
    }

    #[test]
    fn platform_converter() {
        let date = Date::from_gregorian(2025, 1, 29).unwrap();
        let info = PlatformApproximate.compute(date);
        assert!(!info.is_fallback);
        assert_eq!("正月", info.month);
        assert_eq!("初一", info.day);
        // calendar-year rollover
        assert_eq!("乙巳", info.year);
        assert_eq!("蛇", info.year_zodiac);
        assert_eq!("戊戌", info.day_ganzhi);
        assert_eq!(None, info.festival);
        assert!(info.hours.is_empty());
        assert!(info.fortune.is_none());
        assert!(PlatformApproximate.compute_ymd(3000, 1, 1).is_fallback);
    }

    #[test]
    fn converters_agree_on_month_and_day() {
        let start = Date::from_gregorian(2023, 1, 1).unwrap();
        for offset in (0..1200).step_by(7) {
            let date = start + offset;
            let table = TableBased.compute(date);
            let platform = PlatformApproximate.compute(date);
            assert_eq!(table.month, platform.month, "{}", date.iso_gregorian());
            assert_eq!(table.day, platform.day, "{}", date.iso_gregorian());
            if table.year == platform.year {
                assert_eq!(table.month_ganzhi, platform.month_ganzhi);
            }
        }
    }

    #[test]
    fn kind_dispatch() {
        let date = Date::from_gregorian(2024, 6, 10).unwrap();
        assert_eq!(TableBased.compute(date), ConverterKind::TableBased.compute(date));
        assert_eq!(
            PlatformApproximate.compute(date),
            ConverterKind::PlatformApproximate.compute(date)
        );
    }

    #[test]
    fn json_contract() {
        let json = serde_json::to_value(lunar_info(2024, 2, 10)).unwrap();
        assert_eq!("正月·春节·休", json["fullDate"]);
        assert_eq!("龙", json["yearZodiac"]);
        assert_eq!("休", json["holiday"]);
        assert_eq!("table", json["converter"]);
        assert_eq!(false, json["isFallback"]);
        assert_eq!(12, json["hours"].as_array().unwrap().len());
        assert_eq!("(戊戌)狗", json["fortune"]["chong"]);
        assert_eq!(2024, json["lunarYear"]);
        assert_eq!(1, json["lunarMonth"]);
        assert_eq!(1, json["lunarDay"]);
        assert_eq!(false, json["isLeapMonth"]);
        assert!(json.get("lunar").is_none());

        let fallback = serde_json::to_value(lunar_info(1500, 1, 1)).unwrap();
        assert_eq!(true, fallback["isFallback"]);
        assert!(fallback.get("lunarMonth").is_none());
    }
}
