use std::path::PathBuf;
use std::process::ExitCode;

use chrono::NaiveDate;
use clap::Parser;
use log::{LevelFilter, debug, error};
use nongli::config::{self, ResolvedConfig};
use nongli::date::{YearType, days_in_month};
use nongli::{ConverterKind, Date, LunarConverter, LunarInfo};
use simplelog::{ColorChoice, ConfigBuilder, TermLogger, TerminalMode};

#[derive(Parser)]
#[command(name = "nongli", version, about = "Chinese lunisolar calendar for a Gregorian date")]
struct Args {
    /// Gregorian date (YYYY-MM-DD); defaults to today
    date: Option<String>,
    /// Show every day of a Gregorian month instead (YYYY-MM)
    #[arg(short, long, conflicts_with = "date")]
    month: Option<String>,
    /// Lunar converter to use
    #[arg(short, long, value_enum)]
    converter: Option<ConverterKind>,
    /// Print JSON instead of text
    #[arg(long)]
    json: bool,
    /// Config file (default: <config dir>/nongli/config.toml)
    #[arg(long)]
    config: Option<PathBuf>,
    /// More log output (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn main() -> ExitCode {
    let args = Args::parse();

    let file_config = config::load_config(args.config.as_deref());
    let cli_level = match args.verbose {
        0 => None,
        1 => Some(LevelFilter::Info),
        2 => Some(LevelFilter::Debug),
        _ => Some(LevelFilter::Trace),
    };
    let resolved = config::resolve(
        file_config.as_ref().unwrap_or(&Default::default()),
        args.converter,
        cli_level,
    );

    let log_config = ConfigBuilder::new().set_time_format_rfc3339().build();
    let _ = TermLogger::init(
        resolved.log_level,
        log_config,
        TerminalMode::Stderr,
        ColorChoice::Auto,
    );
    if let Err(e) = &file_config {
        error!("{e}");
        return ExitCode::from(2);
    }
    debug!("Resolved config: {:?}", resolved);

    match run(&args, &resolved) {
        Ok(()) => ExitCode::SUCCESS,
        Err(msg) => {
            error!("{msg}");
            eprintln!("nongli: {msg}");
            ExitCode::FAILURE
        }
    }
}

fn run(args: &Args, resolved: &ResolvedConfig) -> Result<(), String> {
    let converter = resolved.converter;
    let days = match (&args.month, &args.date) {
        (Some(month), _) => month_days(month)?,
        (None, Some(date)) => vec![parse_date(date)?],
        (None, None) => vec![Date::today()],
    };
    let infos: Vec<(Date, LunarInfo)> = days
        .into_iter()
        .map(|date| (date, converter.compute(date)))
        .collect();

    if args.json {
        let json = if args.month.is_some() {
            serde_json::to_string_pretty(&infos.iter().map(|(_, i)| i).collect::<Vec<_>>())
        } else {
            serde_json::to_string_pretty(&infos[0].1)
        };
        println!("{}", json.map_err(|e| e.to_string())?);
    } else if args.month.is_some() {
        for (date, info) in &infos {
            println!("{}", month_line(*date, info));
        }
    } else {
        let (date, info) = &infos[0];
        print!("{}", day_report(*date, info));
    }
    Ok(())
}

fn parse_date(s: &str) -> Result<Date, String> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .map(Date::from)
        .map_err(|e| format!("invalid date {s:?}: {e}"))
}

fn month_days(s: &str) -> Result<Vec<Date>, String> {
    let first = parse_date(&format!("{s}-01")).map_err(|_| format!("invalid month {s:?}"))?;
    let (y, m, _) = first.gregorian();
    let len = days_in_month(m, YearType::from_gregorian(y));
    Ok((0..len).map(|i| first + i).collect())
}

const WEEKDAYS: [&str; 7] = ["一", "二", "三", "四", "五", "六", "日"];

fn weekday(date: Date) -> &'static str {
    WEEKDAYS[(date.day_of_week() - 1) as usize]
}

fn month_line(date: Date, info: &LunarInfo) -> String {
    format!(
        "{} 周{}  {}{}  {}",
        date.iso_gregorian(),
        weekday(date),
        info.month,
        info.day,
        info.full_date
    )
}

fn day_report(date: Date, info: &LunarInfo) -> String {
    let mut out = format!("{} 星期{}\n", date.iso_gregorian(), weekday(date));
    out += &format!("农历 {}{}  {}\n", info.month, info.day, info.full_date);
    out += &format!(
        "{}年【{}】 {}月 {}日\n",
        info.year, info.year_zodiac, info.month_ganzhi, info.day_ganzhi
    );
    if let Some(holiday) = &info.holiday_name {
        out += &format!("假日 {holiday}\n");
    }
    if let Some(fortune) = &info.fortune {
        out += &format!("宜 {}\n", fortune.yi.join(" "));
        out += &format!("忌 {}\n", fortune.ji.join(" "));
        out += &format!(
            "冲{} 煞{} 五行{} 纳音{} 值{} {}\n",
            fortune.chong, fortune.sha, fortune.wuxing, fortune.nayin, fortune.officer, fortune.tian_shen
        );
    }
    if !info.pengzu.is_empty() {
        out += &format!("彭祖百忌 {}\n", info.pengzu.join(" "));
    }
    for hour in &info.hours {
        out += &format!(
            "  {} {} {} {}  宜 {}  忌 {}\n",
            hour.name,
            hour.ganzhi,
            hour.tian_shen,
            hour.luck.label(),
            hour.yi.join(" "),
            hour.ji.join(" ")
        );
    }
    out
}
