//! 黃曆：每日宜忌、沖煞、彭祖百忌與十二時辰吉凶
//!
//! 宜忌依建除十二值取用；建除以節氣月（立春起寅月）的月建與日支推得。黃道黑道十二神按月支排日、按日支排時。

use serde::Serialize;

use super::fmt::BRANCHES;
use super::sexagenary::GanZhi;

/// 吉凶
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Serialize)]
pub enum Luck {
    #[serde(rename = "吉")]
    Auspicious,
    #[serde(rename = "凶")]
    Inauspicious,
}

impl Luck {
    pub fn label(&self) -> &'static str {
        match self {
            Luck::Auspicious => "吉",
            Luck::Inauspicious => "凶",
        }
    }
}

/// 一日的黃曆信息。
#[derive(Debug, Clone, Eq, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DailyFortune {
    /// 宜
    pub yi: Vec<String>,
    /// 忌
    pub ji: Vec<String>,
    /// 沖，如「(戊午)马」
    pub chong: String,
    /// 煞方
    pub sha: String,
    /// 日柱五行
    pub wuxing: String,
    /// 建除十二值
    pub officer: String,
    /// 日柱納音
    pub nayin: String,
    /// 值日黃道黑道神
    pub tian_shen: String,
    pub tian_shen_luck: Option<Luck>,
}

impl DailyFortune {
    /// 各文本欄位皆為 `marker`、宜忌為空的佔位記錄。
    pub fn unavailable(marker: &str) -> Self {
        Self {
            yi: Vec::new(),
            ji: Vec::new(),
            chong: marker.to_owned(),
            sha: marker.to_owned(),
            wuxing: marker.to_owned(),
            officer: marker.to_owned(),
            nayin: marker.to_owned(),
            tian_shen: marker.to_owned(),
            tian_shen_luck: None,
        }
    }
}

/// 一個時辰的吉凶信息。
#[derive(Debug, Clone, Eq, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HourPeriod {
    /// 時辰名，如「子时」
    pub name: String,
    /// 時柱
    pub ganzhi: String,
    pub luck: Luck,
    /// 值時黃道黑道神
    pub tian_shen: String,
    pub yi: Vec<String>,
    pub ji: Vec<String>,
}

const OFFICERS: [&str; 12] = [
    "建", "除", "满", "平", "定", "执", "破", "危", "成", "收", "开", "闭",
];

/// 建除十二值對應的宜、忌。
const OFFICER_YI_JI: [(&[&str], &[&str]); 12] = [
    (&["出行", "上任", "会友", "上书", "见工"], &["动土", "开仓", "嫁娶", "纳采"]),
    (&["祭祀", "祈福", "求医", "治病", "扫舍", "沐浴"], &["嫁娶", "出行", "移徙"]),
    (&["祭祀", "祈福", "开市", "交易", "纳财", "嫁娶"], &["上任", "求医", "栽种", "安葬"]),
    (&["祭祀", "修饰垣墙", "平治道涂"], &["开渠", "栽种", "嫁娶", "安葬"]),
    (&["嫁娶", "纳采", "订盟", "开市", "交易", "入宅"], &["词讼", "出行", "求医"]),
    (&["祭祀", "捕捉", "畋猎", "纳财"], &["开市", "移徙", "出行", "交易"]),
    (&["求医", "破屋", "坏垣"], &["嫁娶", "开市", "出行", "动土", "入宅"]),
    (&["祭祀", "祈福", "安床", "纳畜"], &["登高", "行船", "出行", "嫁娶"]),
    (&["嫁娶", "开市", "入学", "入宅", "出行", "祭祀"], &["词讼"]),
    (&["纳财", "纳畜", "捕捉", "收养"], &["出行", "安葬", "放债"]),
    (&["开市", "交易", "求嗣", "入学", "出行", "动土"], &["安葬", "破土"]),
    (&["筑堤", "补垣", "塞穴", "安葬"], &["开市", "出行", "求医", "动土"]),
];

/// 黃道黑道十二神：名稱、是否黃道、宜、忌。以青龍為首。
const TIAN_SHEN: [(&str, bool, &[&str], &[&str]); 12] = [
    ("青龙", true, &["祭祀", "祈福", "嫁娶", "出行", "求财", "开市"], &["词讼"]),
    ("明堂", true, &["会友", "求财", "出行", "上任", "见贵"], &["动土"]),
    ("天刑", false, &["祭祀"], &["词讼", "出行", "嫁娶", "开市"]),
    ("朱雀", false, &["祭祀"], &["词讼", "争执", "嫁娶", "移徙"]),
    ("金匮", true, &["嫁娶", "求财", "纳财", "开市", "交易"], &["词讼"]),
    ("天德", true, &["祭祀", "祈福", "出行", "嫁娶", "修造"], &[]),
    ("白虎", false, &["祭祀", "安葬"], &["嫁娶", "出行", "动土", "求医"]),
    ("玉堂", true, &["求财", "开市", "交易", "入宅", "嫁娶"], &["词讼"]),
    ("天牢", false, &["祭祀"], &["出行", "词讼", "移徙", "开市"]),
    ("玄武", false, &["祭祀", "斋醮"], &["词讼", "出行", "交易", "求财"]),
    ("司命", true, &["祭祀", "祈福", "开市", "求财", "嫁娶"], &["夜行"]),
    ("勾陈", false, &["祭祀"], &["嫁娶", "动土", "词讼", "移徙"]),
];

const PENGZU_STEM: [&str; 10] = [
    "甲不开仓财物耗散",
    "乙不栽植千株不长",
    "丙不修灶必见灾殃",
    "丁不剃头头必生疮",
    "戊不受田田主不祥",
    "己不破券二比并亡",
    "庚不经络织机虚张",
    "辛不合酱主人不尝",
    "壬不泱水更难提防",
    "癸不词讼理弱敌强",
];

const PENGZU_BRANCH: [&str; 12] = [
    "子不问卜自惹祸殃",
    "丑不冠带主不还乡",
    "寅不祭祀神鬼不尝",
    "卯不穿井水泉不香",
    "辰不哭泣必主重丧",
    "巳不远行财物伏藏",
    "午不苫盖屋主更张",
    "未不服药毒气入肠",
    "申不安床鬼祟入房",
    "酉不会客醉坐颠狂",
    "戌不吃犬作怪上床",
    "亥不嫁娶不利新郎",
];

fn strings(list: &[&str]) -> Vec<String> {
    list.iter().map(|&s| s.to_owned()).collect()
}

/// 節氣序號（1..=24，立春為 1）所在節氣月的月建地支序號。
///
/// ```
/// use nongli::chinese::almanac::month_branch_for_term;
///
/// assert_eq!(2, month_branch_for_term(1)); // 立春起寅月
/// assert_eq!(0, month_branch_for_term(22)); // 冬至在子月
/// assert_eq!(1, month_branch_for_term(24)); // 大寒在丑月
/// ```
pub fn month_branch_for_term(term: u32) -> u32 {
    (2 + (term + 23) % 24 / 2) % 12
}

/// 以地支 `anchor` 排黃道黑道十二神，取地支 `branch` 所值之神的序號。
fn tian_shen_index(anchor: u32, branch: u32) -> usize {
    let qing_long = (8 + 2 * anchor) % 12;
    ((branch + 12 - qing_long) % 12) as usize
}

/// 沖：天干隔四、地支隔六，附被沖生肖。
///
/// ```
/// use nongli::chinese::{almanac, sexagenary::GanZhi};
///
/// assert_eq!("(戊午)马", almanac::chong(GanZhi::from_number(1)));
/// ```
pub fn chong(day: GanZhi) -> String {
    let clash = GanZhi::from_number(day.number() + 54);
    format!("({clash}){}", clash.zodiac())
}

/// 煞方：申子辰煞南，巳酉丑煞東，寅午戌煞北，亥卯未煞西。
pub fn sha(day: GanZhi) -> &'static str {
    ["南", "东", "北", "西"][(day.branch() % 4) as usize]
}

/// 彭祖百忌，天干一句、地支一句。
pub fn pengzu(day: GanZhi) -> [String; 2] {
    [
        PENGZU_STEM[day.stem() as usize].to_owned(),
        PENGZU_BRANCH[day.branch() as usize].to_owned(),
    ]
}

/// 推算一日黃曆。`month_branch` 為節氣月的月建地支序號，見 [`month_branch_for_term`]。
///
/// # 用例
///
/// ```
/// use nongli::chinese::{almanac, sexagenary::GanZhi};
///
/// // 寅月甲寅日值「建」
/// let day = GanZhi::from_parts(0, 2).unwrap();
/// let fortune = almanac::daily_fortune(day, 2);
/// assert_eq!("建", fortune.officer);
/// assert_eq!("木木", fortune.wuxing);
/// assert_eq!("北", fortune.sha);
/// ```
pub fn daily_fortune(day: GanZhi, month_branch: u32) -> DailyFortune {
    let officer = ((day.branch() + 12 - month_branch % 12) % 12) as usize;
    let (yi, ji) = OFFICER_YI_JI[officer];
    let (tian_shen, auspicious, _, _) = TIAN_SHEN[tian_shen_index(month_branch, day.branch())];
    DailyFortune {
        yi: strings(yi),
        ji: strings(ji),
        chong: chong(day),
        sha: sha(day).to_owned(),
        wuxing: day.wuxing(),
        officer: OFFICERS[officer].to_owned(),
        nayin: day.nayin().to_owned(),
        tian_shen: tian_shen.to_owned(),
        tian_shen_luck: Some(if auspicious {
            Luck::Auspicious
        } else {
            Luck::Inauspicious
        }),
    }
}

/// 推算一日十二時辰，子時在前。
///
/// # 用例
///
/// ```
/// use nongli::chinese::{almanac, sexagenary::GanZhi};
///
/// let hours = almanac::hour_periods(GanZhi::from_number(1));
/// assert_eq!(12, hours.len());
/// assert_eq!("子时", hours[0].name);
/// assert_eq!("甲子", hours[0].ganzhi);
/// assert_eq!("金匮", hours[0].tian_shen);
/// ```
pub fn hour_periods(day: GanZhi) -> Vec<HourPeriod> {
    (0..12)
        .map(|branch| {
            let (tian_shen, auspicious, yi, ji) = TIAN_SHEN[tian_shen_index(day.branch(), branch)];
            HourPeriod {
                name: format!("{}时", BRANCHES[branch as usize]),
                ganzhi: GanZhi::of_hour(day, branch).to_string(),
                luck: if auspicious {
                    Luck::Auspicious
                } else {
                    Luck::Inauspicious
                },
                tian_shen: tian_shen.to_owned(),
                yi: strings(yi),
                ji: strings(ji),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    #[test]
    fn month_branches() {
        for (term, branch) in [(1, 2), (2, 2), (3, 3), (21, 0), (22, 0), (23, 1), (24, 1)] {
            assert_eq!(branch, month_branch_for_term(term), "term {term}");
        }
    }

    #[test]
    fn officers_cycle() {
        // 月建日值「建」，其後依序
        for month_branch in 0..12 {
            for offset in 0..12 {
                let branch = (month_branch + offset) % 12;
                let day = GanZhi::from_parts(branch % 10, branch).unwrap();
                let fortune = daily_fortune(day, month_branch);
                assert_eq!(OFFICERS[offset as usize], fortune.officer);
            }
        }
    }

    #[test]
    fn clashes() {
        for (num, std) in [(1, "(戊午)马"), (55, "(壬子)鼠"), (60, "(丁巳)蛇"), (41, "(戊戌)狗")] {
            assert_eq!(std, chong(GanZhi::from_number(num)), "{num}");
        }
    }

    #[test]
    fn sha_directions() {
        let by_branch: Vec<_> = (0..12)
            .map(|b| sha(GanZhi::from_parts(b % 10, b).unwrap()))
            .collect();
        assert_eq!(
            vec!["南", "东", "北", "西", "南", "东", "北", "西", "南", "东", "北", "西"],
            by_branch
        );
    }

    #[test]
    fn pengzu_lines() {
        let [stem, branch] = pengzu(GanZhi::from_number(41)); // 甲辰
        assert_eq!("甲不开仓财物耗散", stem);
        assert_eq!("辰不哭泣必主重丧", branch);
    }

    #[test]
    fn hours() {
        // 子午日青龙在申
        let hours = hour_periods(GanZhi::from_number(1));
        let names: Vec<_> = hours.iter().map(|h| h.tian_shen.as_str()).collect();
        assert_eq!(
            vec![
                "金匮", "天德", "白虎", "玉堂", "天牢", "玄武", "司命", "勾陈", "青龙", "明堂", "天刑",
                "朱雀"
            ],
            names
        );
        assert_eq!(Luck::Auspicious, hours[0].luck);
        assert_eq!(Luck::Inauspicious, hours[2].luck);
        let ganzhi: Vec<_> = hours.iter().map(|h| h.ganzhi.as_str()).collect();
        assert_eq!("甲子", ganzhi[0]);
        assert_eq!("乙亥", ganzhi[11]);
    }

    #[test]
    fn hours_have_distinct_branches() {
        for num in 1..=60 {
            let hours = hour_periods(GanZhi::from_number(num));
            let pillars: HashSet<_> = hours.iter().map(|h| h.ganzhi.as_str()).collect();
            assert_eq!(12, pillars.len());
            let spirits: HashSet<_> = hours.iter().map(|h| h.tian_shen.as_str()).collect();
            assert_eq!(12, spirits.len());
            for (hour, branch) in hours.iter().zip(BRANCHES) {
                assert_eq!(format!("{branch}时"), hour.name);
                assert!(hour.ganzhi.ends_with(branch));
            }
        }
    }

    #[test]
    fn day_tian_shen() {
        // 寅月子日值青龙
        let day = GanZhi::from_number(1);
        let fortune = daily_fortune(day, 2);
        assert_eq!("青龙", fortune.tian_shen);
        assert_eq!(Some(Luck::Auspicious), fortune.tian_shen_luck);
    }

    #[test]
    fn serialize() {
        let hour = &hour_periods(GanZhi::from_number(1))[0];
        let json = serde_json::to_value(hour).unwrap();
        assert_eq!("吉", json["luck"]);
        assert_eq!("金匮", json["tianShen"]);
    }
}
