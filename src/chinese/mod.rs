//! Chinese calendar
//!
//! Note: 為方便處理諸多術語，本模塊文檔用中文。
//!
//! 本程序採用預製好的朔日節氣曆表編算農曆，見 [`ephemeris`]。干支、節日、黃曆宜忌等推算分見各子模塊。

use crate::date::Date;
use crate::error::EngineError;

pub mod almanac;
pub mod ephemeris;
pub mod festival;
pub mod fmt;
pub mod sexagenary;

/// 「歲」，相鄰兩冬至間的時段，或自冬至所在月（十一月）至下一冬至所在月前（十月或閏十月）的時段。
///
/// 支持的年份取決於曆表數據，見 [`ephemeris`]。
///
/// 注意：「歲」與「年」在曆法上不同，年以正月為首，但曆法編算須以兩冬至間的「歲」為基礎，本程序亦以「歲」編排，並依日期計算所在「年」。
///
/// # 用例
///
/// ```
/// use nongli::Date;
/// use nongli::chinese::{Annus, Month::*};
///
/// let date = Date::from_gregorian(2000, 1, 1).unwrap();
/// let annus = Annus::from_date(date).unwrap();
///
/// assert_eq!(Ok((1999, Common(11), 25)), annus.ymd_for(date));
/// ```
#[derive(Debug, Clone)]
pub struct Annus {
    /// 序號，為該歲大部分時段所在的公元年
    pub annus: i32,
    /// 該歲的曆表
    pub ephemeris: &'static ephemeris::Annus,
    /// 全部月首，包括次一歲首月用以標記本歲最末日
    pub months: Vec<NewMoon>,
}
/// 月首信息
#[derive(Debug, Copy, Clone)]
pub struct NewMoon {
    /// 月名
    pub month: Month,
    /// 月首所在日期
    pub date: Date,
}
/// 月名，`Common` 為平月，`Leap` 為閏月。
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum Month {
    Common(u32),
    Leap(u32),
}
impl Month {
    /// 取得月序號，無論平閏。
    pub fn num(&self) -> u32 {
        use Month::*;
        *match self {
            Common(v) | Leap(v) => v,
        }
    }
    /// 閏月為 `true`，平月為 `false`
    pub fn is_leap(&self) -> bool {
        matches!(self, Self::Leap(_))
    }
    /// 取得月名的文本形式，十一、十二月稱「冬月」「腊月」。
    pub fn name(&self) -> String {
        fmt::month(*self)
    }
}

impl Annus {
    /// 取得與公元 `annus` 年對應的歲。
    ///
    /// 若曆表無該歲資料則返回 [`EngineError::MissingData`]；若曆表所列朔日無法排出合理的月序（兩冬至間非 12 或 13 個月、月長非 29 或 30 日）則返回
    /// [`EngineError::Inconsistent`]。
    ///
    /// 冬至當日合朔者，該月即為十一月。
    ///
    /// # 用例
    ///
    /// ```
    /// use nongli::chinese::Annus;
    ///
    /// let annus = Annus::new(2000).unwrap();
    /// assert_eq!(13, annus.months.len());
    /// ```
    pub fn new(annus: i32) -> Result<Self, EngineError> {
        use Month::*;

        let ephemeris = ephemeris::Annus::get(annus).ok_or(EngineError::MissingData(annus))?;
        let new_moons = &ephemeris.new_moon;
        let ws = ephemeris.solar_term[0];
        let ws_next = ephemeris.solar_term[24];
        let inconsistent = |what: String| EngineError::Inconsistent(format!("annus {annus}: {what}"));

        let m11_idx = new_moons
            .partition_point(|date| date <= &ws)
            .checked_sub(1)
            .ok_or_else(|| inconsistent("no new moon before winter solstice".into()))?;
        let m11n_idx = new_moons.partition_point(|date| date <= &ws_next) - 1;
        let mut needs_leap = match m11n_idx - m11_idx {
            12 => false,
            13 => true,
            n => return Err(inconsistent(format!("{n} months between winter solstices"))),
        };

        let mut months = Vec::with_capacity(m11n_idx - m11_idx + 1);
        let mut month = 10;
        let mut term = 0;
        for i in m11_idx..=m11n_idx {
            // 首個不含中氣之月置閏
            let lacks_principal_term = match (new_moons.get(i + 1), ephemeris.solar_term.get(term)) {
                (Some(next), Some(principal)) => next <= principal,
                _ => false,
            };
            if needs_leap && lacks_principal_term {
                months.push(NewMoon {
                    month: Leap(month),
                    date: new_moons[i],
                });
                needs_leap = false;
                continue;
            }
            month = month % 12 + 1;
            months.push(NewMoon {
                month: Common(month),
                date: new_moons[i],
            });
            term += 2;
        }
        if needs_leap {
            return Err(inconsistent("no month without principal term".into()));
        }
        if let Some(w) = months
            .windows(2)
            .find(|w| !(29..=30).contains(&(w[1].date - w[0].date)))
        {
            return Err(inconsistent(format!(
                "month starting {} has {} days",
                w[0].date.iso_gregorian(),
                w[1].date - w[0].date
            )));
        }

        Ok(Annus {
            annus,
            ephemeris,
            months,
        })
    }
    /// 依特定日期取得其所在歲。
    ///
    /// 若曆表無該歲資料則返回 `Err`。
    ///
    /// # 用例
    ///
    /// ```
    /// use nongli::Date;
    /// use nongli::chinese::Annus;
    ///
    /// let date = Date::from_gregorian(1999, 12, 31).unwrap();
    /// let annus = Annus::from_date(date).unwrap();
    ///
    /// assert_eq!(2000, annus.annus);
    /// ```
    pub fn from_date(date: Date) -> Result<Self, EngineError> {
        let mut y = date.gregorian().0;
        loop {
            let annus = Self::new(y)?;
            let (start, end) = annus.span();

            if (start..end).contains(&date) {
                return Ok(annus);
            }

            y += if date < start { -1 } else { 1 };
        }
    }

    /// 該歲首日（十一月朔）與次歲首日。
    fn span(&self) -> (Date, Date) {
        match (self.months.first(), self.months.last()) {
            (Some(first), Some(last)) => (first.date, last.date),
            _ => (self.ephemeris.solar_term[0], self.ephemeris.solar_term[0]),
        }
    }

    /// 取得給定日期所在月的月首信息與該月日數。
    fn month_of(&self, date: Date) -> Result<(NewMoon, u32), OtherAnnus> {
        let (begin, end) = self.span();

        if date < begin {
            return Err(OtherAnnus::Before);
        } else if date >= end {
            return Err(OtherAnnus::After);
        }

        let idx = self.months.partition_point(|m| m.date <= date);
        match (self.months.get(idx.wrapping_sub(1)), self.months.get(idx)) {
            (Some(m), Some(next)) => Ok((*m, (next.date - m.date) as u32)),
            _ => Err(OtherAnnus::After),
        }
    }

    /// 取得給定日期在該歲的年月日，返回格式為 `(年, 月, 日)`。
    ///
    /// 若所給日期不在該歲，則回報 `Err` 並指出該日期在該歲之前還是之後。
    ///
    /// # 用例
    ///
    /// ```
    /// use nongli::Date;
    /// use nongli::chinese::{Annus, Month::*};
    ///
    /// let date = Date::from_gregorian(2000, 1, 1).unwrap();
    /// let annus = Annus::from_date(date).unwrap();
    ///
    /// assert_eq!(Ok((1999, Common(11), 25)), annus.ymd_for(date));
    /// ```
    pub fn ymd_for(&self, date: Date) -> Result<(i32, Month, u32), OtherAnnus> {
        let (m, _) = self.month_of(date)?;
        let d = date.jdn() - m.date.jdn() + 1;
        let y = if m.month.num() >= 11 {
            self.annus - 1
        } else {
            self.annus
        };
        Ok((y, m.month, d))
    }

    /// 取得給定日期所在月的日數（29 或 30）。
    ///
    /// # 用例
    ///
    /// ```
    /// use nongli::Date;
    /// use nongli::chinese::Annus;
    ///
    /// let date = Date::from_gregorian(2025, 1, 28).unwrap(); // 除夕
    /// let annus = Annus::from_date(date).unwrap();
    ///
    /// assert_eq!(Ok(29), annus.month_length(date));
    /// ```
    pub fn month_length(&self, date: Date) -> Result<u32, OtherAnnus> {
        self.month_of(date).map(|(_, len)| len)
    }

    /// 取得給定日期所在節氣信息，若當日並無交節，則給出該日相對其前一個交節的日數差。返回值格式如下：
    ///
    /// - `.0`：取得的節氣所在歲（前一歲大雪可能落在該歲，故須回報所在歲）
    /// - `.1`：該節氣序號，1..=24 對應立春到大寒
    /// - `.2`：所給 `date` 在該節交節後第幾日，為 0 則表示當日交節
    ///
    /// 本方法支持自該歲首日至次歲冬至前日的區間。
    ///
    /// 若給定日期不在該歲，或曆表無法取得前一歲節氣數據，則回報 `Err`。
    ///
    /// # 用例
    ///
    /// ```
    /// use nongli::Date;
    /// use nongli::chinese::{Annus, Month::*};
    ///
    /// let date = Date::from_gregorian(2000, 1, 1).unwrap();
    /// let annus = Annus::from_date(date).unwrap();
    ///
    /// assert_eq!(Ok((2000, 22, 10)), annus.solar_term_for(date)); // 冬至過後第 10 天
    /// ```
    pub fn solar_term_for(&self, date: Date) -> Result<(i32, u32, u32), SolarTermErr> {
        use self::OtherAnnus::*;
        use SolarTermErr::*;
        if date < self.span().0 {
            return Err(OtherAnnus(Before));
        } else if date >= self.ephemeris.solar_term[24] {
            return Err(OtherAnnus(After));
        }
        if date < self.ephemeris.solar_term[0] {
            let last_annus = ephemeris::Annus::get(self.annus - 1).ok_or(NoData)?;
            for (idx, &term_start) in (22..24).zip(&last_annus.solar_term[22..24]).rev() {
                if date >= term_start {
                    return Ok((self.annus - 1, (idx + 21) % 24 + 1, (date - term_start) as u32));
                }
            }
            return Err(NoData);
        }
        let idx = self.ephemeris.solar_term[..24].partition_point(|&term| term <= date) - 1;
        let off = date - self.ephemeris.solar_term[idx];
        Ok((self.annus, (idx as u32 + 21) % 24 + 1, off as u32))
    }
}

/// 表示給定日期不在該歲，並指出其在前還是在後。
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum OtherAnnus {
    Before,
    After,
}

/// 表示給定日期不在該歲，或曆表無法取得節氣數據。
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum SolarTermErr {
    NoData,
    OtherAnnus(OtherAnnus),
}

/// 取得公元 `year` 年的立春日。
///
/// # 用例
///
/// ```
/// use nongli::chinese::spring_start;
///
/// assert_eq!("2024-02-04", spring_start(2024).unwrap().iso_gregorian());
/// assert_eq!("2025-02-03", spring_start(2025).unwrap().iso_gregorian());
/// ```
pub fn spring_start(year: i32) -> Option<Date> {
    ephemeris::Annus::get(year).map(|annus| annus.solar_term[3])
}

/// 以立春為歲首，取得給定日期所屬干支紀年對應的公元年。
///
/// # 用例
///
/// ```
/// use nongli::Date;
/// use nongli::chinese::year_by_spring;
///
/// let eve = Date::from_gregorian(2024, 2, 3).unwrap();
/// assert_eq!(Ok(2023), year_by_spring(eve));
/// assert_eq!(Ok(2024), year_by_spring(eve + 1));
/// ```
pub fn year_by_spring(date: Date) -> Result<i32, EngineError> {
    let year = date.gregorian().0;
    let spring = spring_start(year).ok_or(EngineError::MissingData(year))?;
    Ok(if date >= spring { year } else { year - 1 })
}

/// 取得所給公元年的干支。
///
/// # 用例
///
/// ```
/// use nongli::chinese::sexagenary_for_year;
///
/// assert_eq!(1, sexagenary_for_year(-2696));
/// assert_eq!(41, sexagenary_for_year(2024)); // 甲辰
/// ```
pub fn sexagenary_for_year(year: i32) -> u32 {
    (year.rem_euclid(60) as u32 + 2696) % 60 + 1
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_date() {
        let dataset = [
            (2017, (2017, 1, 27)),
            (2017, (2017, 12, 17)),
            (2018, (2017, 12, 18)),
        ];
        for (std, (y, m, d)) in dataset {
            assert_eq!(
                Ok(std),
                Annus::from_date(Date::from_gregorian(y, m, d).unwrap()).map(|a| a.annus)
            );
        }
    }

    #[test]
    fn missing_data() {
        assert_eq!(Err(EngineError::MissingData(1800)), Annus::new(1800).map(|a| a.annus));
        let date = Date::from_gregorian(2300, 6, 1).unwrap();
        assert!(matches!(
            Annus::from_date(date),
            Err(EngineError::MissingData(_))
        ));
    }

    #[test]
    fn months() {
        let annus = Annus::new(2000).unwrap();
        let stds = [
            (11, "1999-12-08"),
            (12, "2000-01-07"),
            (1, "2000-02-05"),
            (2, "2000-03-06"),
            (3, "2000-04-05"),
            (4, "2000-05-04"),
            (5, "2000-06-02"),
            (6, "2000-07-02"),
            (7, "2000-07-31"),
            (8, "2000-08-29"),
            (9, "2000-09-28"),
            (10, "2000-10-27"),
            (11, "2000-11-26"),
        ];
        assert_eq!(stds.len(), annus.months.len());
        for (std, month) in stds.iter().zip(&annus.months) {
            assert_eq!(Month::Common(std.0), month.month);
            assert_eq!(std.1, month.date.iso_gregorian());
        }
    }

    #[test]
    fn leap_months() {
        let stds = [
            (11, "2016-11-29"),
            (12, "2016-12-29"),
            (1, "2017-01-28"),
            (2, "2017-02-26"),
            (3, "2017-03-28"),
            (4, "2017-04-26"),
            (5, "2017-05-26"),
            (6, "2017-06-24"),
            (-6, "2017-07-23"),
            (7, "2017-08-22"),
            (8, "2017-09-20"),
            (9, "2017-10-20"),
            (10, "2017-11-18"),
            (11, "2017-12-18"),
        ];
        let annus = Annus::new(2017).unwrap();
        for (std, month) in stds.iter().zip(&annus.months) {
            let std_month = if std.0 > 0 {
                Month::Common(std.0 as u32)
            } else {
                Month::Leap(-std.0 as u32)
            };
            assert_eq!(
                (std_month, std.1.into()),
                (month.month, month.date.iso_gregorian())
            );
        }
        assert_eq!(stds.len(), annus.months.len());
    }

    #[test]
    fn new_moon_on_solstice() {
        // 2014-12-22 冬至與合朔同日
        let annus = Annus::new(2015).unwrap();
        assert_eq!(Month::Common(11), annus.months[0].month);
        assert_eq!("2014-12-22", annus.months[0].date.iso_gregorian());
        let prev = Annus::new(2014).unwrap();
        assert_eq!(annus.months[0].date, prev.months.last().unwrap().date);
    }

    #[test]
    fn month_lengths_are_valid() {
        for y in 1900..=2101 {
            let annus = Annus::new(y).unwrap();
            let leaps = annus.months[..annus.months.len() - 1]
                .iter()
                .filter(|m| m.month.is_leap())
                .count();
            assert_eq!(annus.months.len() == 14, leaps == 1, "annus {y}");
        }
    }

    #[test]
    fn dates() {
        use Month::*;
        use OtherAnnus::*;
        let data = [
            ((2016, 11, 29), Ok((2016, Common(11), 1))),
            ((2017, 1, 27), Ok((2016, Common(12), 30))),
            ((2017, 1, 28), Ok((2017, Common(1), 1))),
            ((2017, 7, 22), Ok((2017, Common(6), 29))),
            ((2017, 7, 23), Ok((2017, Leap(6), 1))),
            ((2017, 12, 17), Ok((2017, Common(10), 30))),
            ((2016, 11, 28), Err(Before)),
            ((2017, 12, 18), Err(After)),
        ];
        let annus = Annus::new(2017).unwrap();
        for ((y, m, d), std) in data {
            assert_eq!(std, annus.ymd_for(Date::from_gregorian(y, m, d).unwrap()));
        }
    }

    #[test]
    fn month_length() {
        let annus = Annus::new(2017).unwrap();
        let d = |m, d| Date::from_gregorian(2017, m, d).unwrap();
        assert_eq!(Ok(30), annus.month_length(d(1, 27)));
        assert_eq!(Ok(29), annus.month_length(d(2, 1)));
        assert_eq!(Ok(30), annus.month_length(d(2, 26)));
        assert_eq!(Ok(30), annus.month_length(d(7, 23)));
        assert_eq!(Err(OtherAnnus::After), annus.month_length(d(12, 18)));
    }

    #[test]
    fn solar_terms() {
        use self::OtherAnnus::*;
        use SolarTermErr::*;
        let dataset = [
            ((2016, 11, 28), Err(OtherAnnus(Before))),
            ((2016, 11, 29), Ok((2016, 20, 7))),
            ((2016, 12, 7), Ok((2016, 21, 0))),
            ((2016, 12, 21), Ok((2017, 22, 0))),
            ((2016, 12, 22), Ok((2017, 22, 1))),
            ((2017, 1, 20), Ok((2017, 24, 0))),
            ((2017, 2, 3), Ok((2017, 1, 0))),
            ((2017, 12, 7), Ok((2017, 21, 0))),
            ((2017, 12, 17), Ok((2017, 21, 10))),
            ((2017, 12, 18), Ok((2017, 21, 11))),
            ((2017, 12, 21), Ok((2017, 21, 14))),
            ((2017, 12, 22), Err(OtherAnnus(After))),
        ];
        let annus = Annus::new(2017).unwrap();
        for ((y, m, d), std) in dataset {
            assert_eq!(
                std,
                annus.solar_term_for(Date::from_gregorian(y, m, d).unwrap())
            );
        }
    }

    #[test]
    fn spring_rollover() {
        for (year, spring) in [(1900, "1900-02-04"), (2017, "2017-02-03"), (2100, "2100-02-04")] {
            let date = spring_start(year).unwrap();
            assert_eq!(spring, date.iso_gregorian());
            assert_eq!(Ok(year), year_by_spring(date));
            assert_eq!(Ok(year - 1), year_by_spring(date + -1));
        }
    }

    #[test]
    fn year_sexagenary() {
        for (std, year) in [(60, -2697), (1, -2696), (17, 2000), (1, 1984), (42, 2025)] {
            assert_eq!(std, sexagenary_for_year(year));
        }
    }
}
