extern crate chrono;
extern crate horae;

use chrono::{Datelike, Month, NaiveDate, NaiveDateTime, Weekday};
use horae::{generate, validate_at, Period, TimeDef};
use tracing_subscriber::EnvFilter;

fn midnight(date: NaiveDate) -> Result<NaiveDateTime, &'static str> {
    date.and_hms_opt(0, 0, 0).ok_or("no midnight")
}

// Lists a few recurring rules over a month: cargo run --example occurrences 2024 3
fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let mut args = std::env::args().skip(1);
    let year: i32 = args.next().map_or(Ok(2024), |y| y.parse())?;
    let month: u32 = args.next().map_or(Ok(1), |m| m.parse())?;

    let first = NaiveDate::from_ymd_opt(year, month, 1).ok_or("no such month")?;
    let next = first.checked_add_months(chrono::Months::new(1)).ok_or("month out of range")?;
    let bound = Period::new(midnight(first)?, midnight(next)?)?;

    let weekend = TimeDef::weekday(&[Weekday::Sat, Weekday::Sun])?;
    let rules = vec![
        ("weekends", weekend.clone()),
        ("workdays", !weekend),
        ("every 10 days", TimeDef::days(10)?),
        ("second monday-week", TimeDef::week_of_month(Weekday::Mon, &[2])?),
        ("the 13th on a friday",
         TimeDef::day(&[13])? & TimeDef::weekday(&[Weekday::Fri])?),
        ("quarter ends",
         TimeDef::from_month(&[Month::March, Month::June, Month::September,
                               Month::December])? & TimeDef::day(&[31, 30])?),
    ];

    println!("{}", bound);
    for (name, rule) in &rules {
        println!("{} {}", name, rule);
        for period in generate(rule, &bound) {
            println!("  {}", period);
        }
    }

    let payday = TimeDef::day(&[15])?;
    let mid = midnight(first.with_day0(14).ok_or("short month")?)?;
    println!("{} is payday: {}", mid.date(), validate_at(&payday, mid));
    Ok(())
}
