//! 節日表
//!
//! 農曆節日只見於平月，閏月不重過節。除夕取臘月最末日，不論大小月。

use std::collections::HashMap;
use std::sync::LazyLock;

use super::Month;
use crate::date::Date;

static LUNAR: LazyLock<HashMap<(u32, u32), &'static str>> = LazyLock::new(|| {
    HashMap::from([
        ((1, 1), "春节"),
        ((1, 15), "元宵节"),
        ((2, 2), "龙头节"),
        ((5, 5), "端午节"),
        ((7, 7), "七夕节"),
        ((7, 15), "中元节"),
        ((8, 15), "中秋节"),
        ((9, 9), "重阳节"),
        ((12, 8), "腊八节"),
    ])
});

static SOLAR: LazyLock<HashMap<(i32, i32), &'static str>> = LazyLock::new(|| {
    HashMap::from([
        ((1, 1), "元旦节"),
        ((2, 14), "情人节"),
        ((3, 8), "妇女节"),
        ((3, 12), "植树节"),
        ((3, 15), "消费者权益日"),
        ((4, 1), "愚人节"),
        ((5, 1), "劳动节"),
        ((5, 4), "青年节"),
        ((6, 1), "儿童节"),
        ((7, 1), "建党节"),
        ((8, 1), "建军节"),
        ((9, 10), "教师节"),
        ((10, 1), "国庆节"),
        ((10, 31), "万圣节前夜"),
        ((11, 1), "万圣节"),
        ((12, 24), "平安夜"),
        ((12, 25), "圣诞节"),
    ])
});

/// 以「某月第幾個星期幾」定日的節日：`(月, 第幾週, ISO 星期)`。
const BY_WEEKDAY: [((i32, i32, i32), &str); 3] = [
    ((5, 2, 7), "母亲节"),
    ((6, 3, 7), "父亲节"),
    ((11, 4, 4), "感恩节"),
];

/// 取得農曆節日。`month_len` 為該月日數，用以判定除夕。
///
/// # 用例
///
/// ```
/// use nongli::chinese::{festival, Month::*};
///
/// assert_eq!(Some("春节"), festival::lunar(Common(1), 1, 30));
/// assert_eq!(Some("除夕"), festival::lunar(Common(12), 29, 29));
/// assert_eq!(None, festival::lunar(Leap(5), 5, 29));
/// ```
pub fn lunar(month: Month, day: u32, month_len: u32) -> Option<&'static str> {
    if month.is_leap() {
        return None;
    }
    if month.num() == 12 && day == month_len {
        return Some("除夕");
    }
    LUNAR.get(&(month.num(), day)).copied()
}

/// 取得公曆節日，固定日期者優先，其次為按星期推算者。
///
/// # 用例
///
/// ```
/// use nongli::Date;
/// use nongli::chinese::festival;
///
/// let date = Date::from_gregorian(2025, 10, 1).unwrap();
/// assert_eq!(Some("国庆节"), festival::solar(date));
/// let date = Date::from_gregorian(2025, 5, 11).unwrap();
/// assert_eq!(Some("母亲节"), festival::solar(date));
/// ```
pub fn solar(date: Date) -> Option<&'static str> {
    let (_, m, d) = date.gregorian();
    if let Some(&name) = SOLAR.get(&(m, d)) {
        return Some(name);
    }
    let week = (d - 1) / 7 + 1;
    let weekday = date.day_of_week();
    BY_WEEKDAY
        .iter()
        .find(|&&(key, _)| key == (m, week, weekday))
        .map(|&(_, name)| name)
}
