//! 朔日節氣曆表數據
//!
//! 每行為一歲：歲序、冬至日儒略日數，其後為二十五個節氣日與十五個朔日相對冬至日的日數差。
//! 日期均為中國標準時間（UTC+8，1929 年前用北京地方平時）下的民用日，曆表涵蓋 1899 至 2102 歲。

use std::fmt;
use std::num::ParseIntError;
use std::sync::LazyLock;

use log::error;

use crate::date::Date;

/// 保存一歲的曆表數據
#[derive(Debug)]
pub struct Annus {
    /// 序號，為該歲大部分時段所在公元年
    pub annus: i32,
    /// 從冬至開始的各節氣交節日，亦含次歲冬至以便計算末日
    pub solar_term: [Date; 25],
    /// 朔日，列出從冬至當日或之前一朔開始的十五個月
    pub new_moon: [Date; 15],
}

static DATA: LazyLock<Vec<Annus>> = LazyLock::new(|| {
    parse_raw_data().unwrap_or_else(|e| {
        error!("error parsing ephemeris data: {e}");
        Vec::new()
    })
});

impl Annus {
    /// 取得公元 `annus` 年對應的歳的曆表。
    ///
    /// 無數據（或曆表未能載入）則返回 `None`。
    ///
    /// # 用例
    ///
    /// ```
    /// use nongli::chinese::ephemeris::Annus;
    ///
    /// let annus = Annus::get(2000).unwrap();
    /// assert_eq!("1999-12-22", annus.solar_term[0].iso_gregorian());
    /// assert!(Annus::get(1800).is_none());
    /// ```
    pub fn get(annus: i32) -> Option<&'static Self> {
        DATA.binary_search_by_key(&annus, |an| an.annus)
            .ok()
            .map(|i| &DATA[i])
    }
}

static RAW_DATA: &str = include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/data/ephemeris.txt"));

fn parse_raw_data() -> Result<Vec<Annus>, RawDataError> {
    let mut res: Vec<Annus> = Vec::new();
    for (line_num, line) in (1usize..).zip(RAW_DATA.lines()).skip(1) {
        let mut it = line.split_whitespace();
        let annus: i32 = match it.next() {
            None => continue,
            Some(s) => s
                .parse()
                .map_err(|e| RawDataError::new(line_num, 1, ErrorType::InvalidInt(e)))?,
        };
        if res.last().is_some_and(|last| last.annus >= annus) {
            return Err(RawDataError::new(line_num, 1, ErrorType::Unsorted));
        }
        let jdn0 = u32::try_from(require_next_int(&mut it, line_num, 2)?)
            .map_err(|_| RawDataError::new(line_num, 2, ErrorType::OutOfRange))?;
        let base = Date::from_jdn(jdn0);
        let mut annus_rec = Annus {
            annus,
            solar_term: [base; 25],
            new_moon: [base; 15],
        };
        for i in 0..25 {
            annus_rec.solar_term[i] = base + require_next_int(&mut it, line_num, 3 + i)?;
        }
        for i in 0..15 {
            annus_rec.new_moon[i] = base + require_next_int(&mut it, line_num, 28 + i)?;
        }
        res.push(annus_rec);
    }
    Ok(res)
}

fn require_next_int<I: Iterator<Item = &'static str>>(
    it: &mut I,
    line_num: usize,
    field_num: usize,
) -> Result<i32, RawDataError> {
    use ErrorType::*;
    it.next()
        .ok_or_else(|| RawDataError::new(line_num, field_num, MissingField))?
        .parse()
        .map_err(|e| RawDataError::new(line_num, field_num, InvalidInt(e)))
}

#[derive(Debug)]
struct RawDataError {
    pub line_num: usize,
    pub field_num: usize,
    pub reason: ErrorType,
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
    InvalidInt(ParseIntError),
    MissingField,
    OutOfRange,
    Unsorted,
}
