//! 干支紀法
//!
//! [`GanZhi`] 以 `0..60` 表示六十甲子中的一位，`0` 為甲子。年、月、日、時四柱皆由此表示。

use std::fmt;

use super::fmt::{BRANCHES, STEMS, ZODIAC};
use crate::date::Date;

/// 六十甲子中的一位。
///
/// # 用例
///
/// ```
/// use nongli::Date;
/// use nongli::chinese::sexagenary::GanZhi;
///
/// let day = GanZhi::of_day(Date::from_gregorian(2000, 1, 1).unwrap());
/// assert_eq!("戊午", day.to_string());
/// assert_eq!("天上火", day.nayin());
/// ```
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct GanZhi {
    cycle: u32,
}

impl GanZhi {
    /// 由序號（`1..=60`，1 為甲子）建立，與 [`Date::sexagenary`] 編號一致。超出範圍者取模。
    pub fn from_number(num: u32) -> Self {
        Self {
            cycle: (num + 59) % 60,
        }
    }
    /// 由干、支序號（甲、子為 0）組合。陰陽不配（如甲丑）則返回 `None`。
    ///
    /// ```
    /// use nongli::chinese::sexagenary::GanZhi;
    ///
    /// assert_eq!("丙寅", GanZhi::from_parts(2, 2).unwrap().to_string());
    /// assert_eq!(None, GanZhi::from_parts(0, 1));
    /// ```
    pub fn from_parts(stem: u32, branch: u32) -> Option<Self> {
        let (s, b) = (stem % 10, branch % 12);
        if s % 2 != b % 2 {
            return None;
        }
        Some(Self {
            cycle: (6 * s + 60 - 5 * b) % 60,
        })
    }

    /// 日柱
    pub fn of_day(date: Date) -> Self {
        Self::from_number(date.sexagenary())
    }
    /// 年柱，`year` 為干支紀年對應的公元年（應先依立春或正月定歲首）。
    pub fn of_year(year: i32) -> Self {
        Self::from_number(super::sexagenary_for_year(year))
    }
    /// 月柱，依「五虎遁」由年干起正月寅。`year` 為干支紀年對應的公元年（與年柱同），`month` 為農曆月序號，閏月用本月。
    ///
    /// ```
    /// use nongli::chinese::sexagenary::GanZhi;
    ///
    /// assert_eq!("丙寅", GanZhi::of_month(2024, 1).to_string()); // 甲年正月
    /// assert_eq!("戊寅", GanZhi::of_month(2025, 1).to_string()); // 乙年正月
    /// assert_eq!("丁丑", GanZhi::of_month(2024, 12).to_string());
    /// ```
    pub fn of_month(year: i32, month: u32) -> Self {
        let first_stem = Self::of_year(year).stem() % 5 * 2 + 2;
        let offset = (month + 11) % 12;
        Self::from_stem_branch_unchecked(first_stem + offset, 2 + offset)
    }
    /// 時柱，依「五鼠遁」由日干起子時，`branch` 為時辰地支序號。
    ///
    /// ```
    /// use nongli::chinese::sexagenary::GanZhi;
    ///
    /// let jia_zi = GanZhi::from_number(1);
    /// assert_eq!("甲子", GanZhi::of_hour(jia_zi, 0).to_string());
    /// assert_eq!("乙亥", GanZhi::of_hour(jia_zi, 11).to_string());
    /// ```
    pub fn of_hour(day: Self, branch: u32) -> Self {
        let first_stem = day.stem() % 5 * 2;
        Self::from_stem_branch_unchecked(first_stem + branch, branch)
    }

    fn from_stem_branch_unchecked(stem: u32, branch: u32) -> Self {
        // 五虎遁、五鼠遁所得干支陰陽必相配
        let (s, b) = (stem % 10, branch % 12);
        Self {
            cycle: (6 * s + 60 - 5 * b) % 60,
        }
    }

    /// 序號，`1..=60`
    pub fn number(&self) -> u32 {
        self.cycle + 1
    }
    /// 天干序號，`0..10`，甲為 0
    pub fn stem(&self) -> u32 {
        self.cycle % 10
    }
    /// 地支序號，`0..12`，子為 0
    pub fn branch(&self) -> u32 {
        self.cycle % 12
    }
    /// 天干文字
    pub fn stem_name(&self) -> &'static str {
        STEMS[self.stem() as usize]
    }
    /// 地支文字
    pub fn branch_name(&self) -> &'static str {
        BRANCHES[self.branch() as usize]
    }
    /// 地支所屬生肖
    pub fn zodiac(&self) -> &'static str {
        ZODIAC[self.branch() as usize]
    }
    /// 六十甲子納音
    pub fn nayin(&self) -> &'static str {
        const NAYIN: [&str; 30] = [
            "海中金", "炉中火", "大林木", "路旁土", "剑锋金", "山头火", "涧下水", "城头土",
            "白蜡金", "杨柳木", "泉中水", "屋上土", "霹雳火", "松柏木", "长流水", "沙中金",
            "山下火", "平地木", "壁上土", "金箔金", "覆灯火", "天河水", "大驿土", "钗钏金",
            "桑柘木", "大溪水", "沙中土", "天上火", "石榴木", "大海水",
        ];
        NAYIN[(self.cycle / 2) as usize]
    }
    /// 干支五行，天干五行在前，地支五行在後，如甲子為「木水」。
    pub fn wuxing(&self) -> String {
        Element::of_stem(self.stem()).name().to_owned() + Element::of_branch(self.branch()).name()
    }
}

impl fmt::Display for GanZhi {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.stem_name(), self.branch_name())
    }
}

/// 五行
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum Element {
    Wood,
    Fire,
    Earth,
    Metal,
    Water,
}

impl Element {
    /// 天干五行：甲乙木、丙丁火、戊己土、庚辛金、壬癸水。
    pub fn of_stem(stem: u32) -> Self {
        use Element::*;
        [Wood, Fire, Earth, Metal, Water][(stem % 10 / 2) as usize]
    }
    /// 地支五行
    pub fn of_branch(branch: u32) -> Self {
        use Element::*;
        const TABLE: [Element; 12] = [
            Water, Earth, Wood, Wood, Earth, Fire, Fire, Earth, Metal, Metal, Earth, Water,
        ];
        TABLE[(branch % 12) as usize]
    }
    pub fn name(&self) -> &'static str {
        match self {
            Element::Wood => "木",
            Element::Fire => "火",
            Element::Earth => "土",
            Element::Metal => "金",
            Element::Water => "水",
        }
    }
}
