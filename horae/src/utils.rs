use chrono::{Datelike, Timelike, Weekday};

use crate::types::{Date, DateTime, Duration, Grain, Step, Time};

pub const DAY_NANOS: i64 = 86_400 * 1_000_000_000;

pub fn midnight(date: Date) -> Option<DateTime> {
    date.and_hms_opt(0, 0, 0)
}

pub fn days_in_month(m: u32, y: i32) -> u32 {
    static DIM: [u8; 12] = [31, 28, 31, 30, 31, 30, 31, 31, 30, 31, 30, 31];
    assert!(m > 0 && m <= 12);
    // check when february has 29 days
    if m == 2 && y % 4 == 0 && (y % 100 != 0 || y % 400 == 0) {
        return 29;
    }
    DIM[(m - 1) as usize] as u32
}

// Days to walk back from `dow` to reach the previous (or same) `week_start`
pub fn days_since(dow: Weekday, week_start: Weekday) -> u32 {
    (dow.num_days_from_monday() + 7 - week_start.num_days_from_monday()) % 7
}

/// Start of the calendar unit containing `d`.
pub fn truncate(d: DateTime, step: Step) -> Option<DateTime> {
    match step {
        Step::Minute => d.date().and_hms_opt(d.hour(), d.minute(), 0),
        Step::Hour => d.date().and_hms_opt(d.hour(), 0, 0),
        Step::Day => midnight(d.date()),
        Step::Week(week_start) => {
            let back = days_since(d.weekday(), week_start);
            midnight(d.date().checked_sub_signed(Duration::days(back as i64))?)
        }
        Step::Month => midnight(Date::from_ymd_opt(d.year(), d.month(), 1)?),
        Step::Year => midnight(Date::from_ymd_opt(d.year(), 1, 1)?),
    }
}

fn add_months(date: Date, n: i32) -> Option<Date> {
    let total = date.year() * 12 + date.month0() as i32 + n;
    let (year, month) = (total.div_euclid(12), total.rem_euclid(12) as u32 + 1);
    let day = date.day().min(days_in_month(month, year));
    Date::from_ymd_opt(year, month, day)
}

/// Move `d` by `n` grains. Month and year shifts clamp the day of month.
pub fn shift_datetime(d: DateTime, grain: Grain, n: i32) -> Option<DateTime> {
    let n64 = n as i64;
    match grain {
        Grain::Minute => d.checked_add_signed(Duration::minutes(n64)),
        Grain::Hour => d.checked_add_signed(Duration::hours(n64)),
        Grain::Day => d.checked_add_signed(Duration::days(n64)),
        Grain::Week => d.checked_add_signed(Duration::weeks(n64)),
        Grain::Month => Some(add_months(d.date(), n)?.and_time(d.time())),
        Grain::Year => Some(add_months(d.date(), n.checked_mul(12)?)?.and_time(d.time())),
    }
}

/// First calendar boundary of `step` strictly after `d`.
pub fn next_boundary(d: DateTime, step: Step) -> Option<DateTime> {
    shift_datetime(truncate(d, step)?, step.grain(), 1)
}

/// 1-based index of the calendar week (starting on `week_start`) that
/// `date` falls in within its month. The first partial week is week 1.
pub fn week_of_month(date: Date, week_start: Weekday) -> u32 {
    let first = date.with_day(1).unwrap_or(date);
    let offset = days_since(first.weekday(), week_start);
    (date.day() - 1 + offset) / 7 + 1
}

pub fn nanos_of_day(t: Time) -> i64 {
    t.num_seconds_from_midnight() as i64 * 1_000_000_000 + t.nanosecond() as i64
}

// Time-of-day span covered by [start, end]. An end landing on a later
// midnight is 24:00, so a full day spans 0..DAY_NANOS.
pub fn time_window(start: DateTime, end: DateTime) -> (i64, i64) {
    let from = nanos_of_day(start.time());
    let mut to = nanos_of_day(end.time());
    if end > start && to <= from && end.date() > start.date() {
        to += DAY_NANOS * (end.date() - start.date()).num_days();
    }
    (from, to)
}

// Does the time-of-day window [a0, a1) meet [from, to)? Windows with
// from > to wrap around midnight.
pub fn time_windows_meet(a0: i64, a1: i64, from: i64, to: i64) -> bool {
    let meets = |lo: i64, hi: i64| a0 < hi && lo < a1;
    if from <= to {
        meets(from, to) || meets(from + DAY_NANOS, to + DAY_NANOS)
    } else {
        meets(from, DAY_NANOS) || meets(0, to) || meets(DAY_NANOS, DAY_NANOS + to)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(year: i32, month: u32, day: u32) -> Date {
        Date::from_ymd_opt(year, month, day).unwrap()
    }
    fn dt(year: i32, month: u32, day: u32) -> DateTime {
        d(year, month, day).and_hms_opt(0, 0, 0).unwrap()
    }
    fn dttm(year: i32, month: u32, day: u32, h: u32, m: u32, s: u32) -> DateTime {
        d(year, month, day).and_hms_opt(h, m, s).unwrap()
    }

    #[test]
    fn test_truncate() {
        let t = dttm(2016, 9, 7, 13, 45, 12);
        assert_eq!(truncate(t, Step::Minute), Some(dttm(2016, 9, 7, 13, 45, 0)));
        assert_eq!(truncate(t, Step::Hour), Some(dttm(2016, 9, 7, 13, 0, 0)));
        assert_eq!(truncate(t, Step::Day), Some(dt(2016, 9, 7)));
        // 2016-09-07 is a wednesday
        assert_eq!(truncate(t, Step::Week(Weekday::Mon)), Some(dt(2016, 9, 5)));
        assert_eq!(truncate(t, Step::Week(Weekday::Sun)), Some(dt(2016, 9, 4)));
        assert_eq!(truncate(t, Step::Week(Weekday::Wed)), Some(dt(2016, 9, 7)));
        assert_eq!(truncate(t, Step::Month), Some(dt(2016, 9, 1)));
        assert_eq!(truncate(t, Step::Year), Some(dt(2016, 1, 1)));
    }

    #[test]
    fn test_shifts() {
        let t = dt(2016, 9, 5);
        assert_eq!(shift_datetime(t, Grain::Day, -3), Some(dt(2016, 9, 2)));
        assert_eq!(shift_datetime(t, Grain::Day, -36), Some(dt(2016, 7, 31)));
        assert_eq!(shift_datetime(t, Grain::Month, -1), Some(dt(2016, 8, 5)));
        let t = dt(2016, 1, 31);
        assert_eq!(shift_datetime(t, Grain::Month, 1), Some(dt(2016, 2, 29)));
        assert_eq!(shift_datetime(t, Grain::Month, -1), Some(dt(2015, 12, 31)));
        let t = dt(2016, 3, 31);
        assert_eq!(shift_datetime(t, Grain::Month, -13), Some(dt(2015, 2, 28)));
        assert_eq!(shift_datetime(t, Grain::Week, 7), Some(dt(2016, 5, 19)));
        assert_eq!(shift_datetime(t, Grain::Year, -7), Some(dt(2009, 3, 31)));
        let t = dt(2016, 12, 31);
        assert_eq!(shift_datetime(t, Grain::Month, 1), Some(dt(2017, 1, 31)));
    }

    #[test]
    fn test_next_boundary() {
        let t = dttm(2024, 1, 31, 10, 30, 0);
        assert_eq!(next_boundary(t, Step::Hour), Some(dttm(2024, 1, 31, 11, 0, 0)));
        assert_eq!(next_boundary(t, Step::Month), Some(dt(2024, 2, 1)));
        assert_eq!(next_boundary(t, Step::Year), Some(dt(2025, 1, 1)));
        // 2024-01-31 is a wednesday, next monday is feb 5th
        assert_eq!(next_boundary(t, Step::Week(Weekday::Mon)), Some(dt(2024, 2, 5)));
    }

    #[test]
    fn test_week_of_month() {
        // 2024-03-01 is a friday
        assert_eq!(week_of_month(d(2024, 3, 1), Weekday::Mon), 1);
        assert_eq!(week_of_month(d(2024, 3, 3), Weekday::Mon), 1);
        assert_eq!(week_of_month(d(2024, 3, 4), Weekday::Mon), 2);
        assert_eq!(week_of_month(d(2024, 3, 31), Weekday::Mon), 5);
        assert_eq!(week_of_month(d(2024, 3, 3), Weekday::Sun), 2);
        assert_eq!(week_of_month(d(2024, 3, 1), Weekday::Fri), 1);
        assert_eq!(week_of_month(d(2024, 3, 8), Weekday::Fri), 2);
    }

    #[test]
    fn test_time_windows() {
        let h = 3_600 * 1_000_000_000_i64;
        let (a0, a1) = time_window(dttm(2024, 1, 1, 23, 0, 0), dt(2024, 1, 2));
        assert_eq!((a0, a1), (23 * h, 24 * h));
        assert!(time_windows_meet(a0, a1, 22 * h, 2 * h));
        assert!(!time_windows_meet(a0, a1, 9 * h, 17 * h));
        assert!(time_windows_meet(9 * h, 10 * h, 9 * h, 17 * h));
        assert!(!time_windows_meet(17 * h, 18 * h, 9 * h, 17 * h));
    }
}
