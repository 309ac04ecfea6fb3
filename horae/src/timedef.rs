use std::collections::BTreeSet;
use std::fmt;
use std::ops;

use chrono::{Datelike, Month, Weekday};

use crate::error::{Error, Result};
use crate::types::{Date, DateTime, Step, Time};

/// A non-empty set of allowed values for one calendar field.
///
/// Only the validated constructors on [`TimeDef`] can build one, so every
/// value inside is within its field's range. Duplicates collapse.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ValueSet<T: Ord>(BTreeSet<T>);

impl<T> ValueSet<T>
    where T: Ord + Copy + Into<i64>
{
    fn checked(field: &'static str, values: &[T], min: i64, max: i64) -> Result<ValueSet<T>> {
        if values.is_empty() {
            return Err(Error::EmptySet { field });
        }
        if let Some(bad) = values.iter().map(|v| (*v).into()).find(|v| *v < min || *v > max) {
            return Err(Error::OutOfRange { field, value: bad, min, max });
        }
        Ok(ValueSet(values.iter().copied().collect()))
    }

    pub fn contains(&self, value: T) -> bool {
        self.0.contains(&value)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn sum(&self) -> i64 {
        self.0.iter().map(|v| (*v).into()).sum()
    }
}

/// A node of the recurrence rule algebra.
///
/// Leaves constrain a calendar field to a set of values, pick every Nth unit
/// of a grain or pin explicit bounds. Combinators compose the sets of
/// periods their children describe.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TimeDef {
    Minute(ValueSet<u32>),
    Hour(ValueSet<u32>),
    Day(ValueSet<u32>),
    Month(ValueSet<u32>),
    Year(ValueSet<i32>),
    // days from monday
    Weekday(ValueSet<u32>),
    WeekOfMonth { week_start: Weekday, weeks: ValueSet<u32> },

    Minutes(u32),
    Hours(u32),
    Days(u32),
    Weeks { n: u32, week_start: Weekday },
    Months(u32),
    Years(u32),

    // both days included
    DateSpan { from: Date, to: Date },
    DateTimeSpan { from: DateTime, to: DateTime },
    // wraps around midnight when from > to
    Timespan { from: Time, to: Time },

    And(Box<TimeDef>, Box<TimeDef>),
    Or(Box<TimeDef>, Box<TimeDef>),
    Not(Box<TimeDef>),
    Difference(Box<TimeDef>, Box<TimeDef>),
    Union(Box<TimeDef>, Box<TimeDef>),
}

fn quantity(field: &'static str, n: i64) -> Result<u32> {
    if n < 0 {
        return Err(Error::NegativeQuantity { field, value: n });
    }
    u32::try_from(n).map_err(|_| Error::OutOfRange {
        field, value: n, min: 0, max: u32::MAX as i64 })
}

// raw constructors
impl TimeDef {
    pub fn minute(values: &[u32]) -> Result<TimeDef> {
        Ok(TimeDef::Minute(ValueSet::checked("minute", values, 0, 59)?))
    }

    pub fn hour(values: &[u32]) -> Result<TimeDef> {
        Ok(TimeDef::Hour(ValueSet::checked("hour", values, 0, 23)?))
    }

    pub fn day(values: &[u32]) -> Result<TimeDef> {
        Ok(TimeDef::Day(ValueSet::checked("day", values, 1, 31)?))
    }

    /// Months by number, january is 1.
    pub fn month(values: &[u32]) -> Result<TimeDef> {
        Ok(TimeDef::Month(ValueSet::checked("month", values, 1, 12)?))
    }

    pub fn year(values: &[i32]) -> Result<TimeDef> {
        let (min, max) = (Date::MIN.year() as i64, Date::MAX.year() as i64);
        Ok(TimeDef::Year(ValueSet::checked("year", values, min, max)?))
    }

    pub fn weekday(values: &[Weekday]) -> Result<TimeDef> {
        let days: Vec<u32> = values.iter().map(|d| d.num_days_from_monday()).collect();
        Ok(TimeDef::Weekday(ValueSet::checked("weekday", &days, 0, 6)?))
    }

    /// Weeks of the month are 1-based, the first partial week is week 1.
    pub fn week_of_month(week_start: Weekday, weeks: &[u32]) -> Result<TimeDef> {
        let weeks = ValueSet::checked("week of month", weeks, 1, 6)?;
        Ok(TimeDef::WeekOfMonth { week_start, weeks })
    }

    pub fn minutes(n: i64) -> Result<TimeDef> {
        Ok(TimeDef::Minutes(quantity("minutes", n)?))
    }

    pub fn hours(n: i64) -> Result<TimeDef> {
        Ok(TimeDef::Hours(quantity("hours", n)?))
    }

    pub fn days(n: i64) -> Result<TimeDef> {
        Ok(TimeDef::Days(quantity("days", n)?))
    }

    pub fn weeks(n: i64, week_start: Weekday) -> Result<TimeDef> {
        Ok(TimeDef::Weeks { n: quantity("weeks", n)?, week_start })
    }

    pub fn months(n: i64) -> Result<TimeDef> {
        Ok(TimeDef::Months(quantity("months", n)?))
    }

    pub fn years(n: i64) -> Result<TimeDef> {
        Ok(TimeDef::Years(quantity("years", n)?))
    }

    pub fn date_span(from: Date, to: Date) -> Result<TimeDef> {
        if from > to {
            return Err(Error::InvalidDateSpan { from, to });
        }
        Ok(TimeDef::DateSpan { from, to })
    }

    pub fn date_time_span(from: DateTime, to: DateTime) -> Result<TimeDef> {
        if from > to {
            return Err(Error::InvalidBounds { start: from, end: to });
        }
        Ok(TimeDef::DateTimeSpan { from, to })
    }

    pub fn time_span(from: Time, to: Time) -> TimeDef {
        TimeDef::Timespan { from, to }
    }
}

// combinators
impl TimeDef {
    pub fn and(self, other: TimeDef) -> TimeDef {
        TimeDef::And(Box::new(self), Box::new(other))
    }

    pub fn or(self, other: TimeDef) -> TimeDef {
        TimeDef::Or(Box::new(self), Box::new(other))
    }

    pub fn negate(self) -> TimeDef {
        TimeDef::Not(Box::new(self))
    }

    pub fn difference(self, other: TimeDef) -> TimeDef {
        TimeDef::Difference(Box::new(self), Box::new(other))
    }

    pub fn union(self, other: TimeDef) -> TimeDef {
        TimeDef::Union(Box::new(self), Box::new(other))
    }
}

impl ops::BitAnd for TimeDef {
    type Output = TimeDef;
    fn bitand(self, rhs: TimeDef) -> TimeDef { self.and(rhs) }
}

impl ops::BitOr for TimeDef {
    type Output = TimeDef;
    fn bitor(self, rhs: TimeDef) -> TimeDef { self.or(rhs) }
}

impl ops::Not for TimeDef {
    type Output = TimeDef;
    fn not(self) -> TimeDef { self.negate() }
}

impl ops::Sub for TimeDef {
    type Output = TimeDef;
    fn sub(self, rhs: TimeDef) -> TimeDef { self.difference(rhs) }
}

// canonical factories
impl TimeDef {
    /// `Year{year} & Month{month} & Day{day}` for a date that exists.
    pub fn from_date(year: i32, month: u32, day: u32) -> Result<TimeDef> {
        if Date::from_ymd_opt(year, month, day).is_none() {
            return Err(Error::InvalidDate { year, month, day });
        }
        Ok(TimeDef::year(&[year])? & TimeDef::month(&[month])? & TimeDef::day(&[day])?)
    }

    /// [`TimeDef::from_date`] narrowed to one minute of that day.
    pub fn from_date_time(year: i32, month: u32, day: u32, hour: u32, minute: u32)
        -> Result<TimeDef>
    {
        let date = TimeDef::from_date(year, month, day)?;
        Ok(date & (TimeDef::hour(&[hour])? & TimeDef::minute(&[minute])?))
    }

    pub fn from_weekday(days: &[Weekday]) -> Result<TimeDef> {
        TimeDef::weekday(days)
    }

    pub fn from_week_of_month(week_start: Weekday, weeks: &[u32]) -> Result<TimeDef> {
        TimeDef::week_of_month(week_start, weeks)
    }

    pub fn from_year(years: &[i32]) -> Result<TimeDef> {
        TimeDef::year(years)
    }

    pub fn from_month(months: &[Month]) -> Result<TimeDef> {
        let numbers: Vec<u32> = months.iter().map(|m| m.number_from_month()).collect();
        TimeDef::month(&numbers)
    }

    pub fn from_time_span(from: Time, to: Time) -> TimeDef {
        TimeDef::time_span(from, to)
    }
}

impl TimeDef {
    /// Name of the variant, used as key when aggregating per-kind results.
    pub fn kind_name(&self) -> &'static str {
        match self {
            TimeDef::Minute(_) => "minute",
            TimeDef::Hour(_) => "hour",
            TimeDef::Day(_) => "day",
            TimeDef::Month(_) => "month",
            TimeDef::Year(_) => "year",
            TimeDef::Weekday(_) => "weekday",
            TimeDef::WeekOfMonth { .. } => "week-of-month",
            TimeDef::Minutes(_) => "minutes",
            TimeDef::Hours(_) => "hours",
            TimeDef::Days(_) => "days",
            TimeDef::Weeks { .. } => "weeks",
            TimeDef::Months(_) => "months",
            TimeDef::Years(_) => "years",
            TimeDef::DateSpan { .. } => "date-span",
            TimeDef::DateTimeSpan { .. } => "date-time-span",
            TimeDef::Timespan { .. } => "timespan",
            TimeDef::And(..) => "and",
            TimeDef::Or(..) => "or",
            TimeDef::Not(_) => "not",
            TimeDef::Difference(..) => "difference",
            TimeDef::Union(..) => "union",
        }
    }

    /// Tiling step a leaf naturally evaluates at. Combinators have none.
    pub fn step(&self) -> Option<Step> {
        match self {
            TimeDef::Minute(_) | TimeDef::Minutes(_) | TimeDef::DateTimeSpan { .. } =>
                Some(Step::Minute),
            TimeDef::Hour(_) | TimeDef::Hours(_) | TimeDef::Timespan { .. } =>
                Some(Step::Hour),
            TimeDef::Day(_) | TimeDef::Days(_) | TimeDef::DateSpan { .. } |
            TimeDef::Weekday(_) => Some(Step::Day),
            TimeDef::WeekOfMonth { week_start, .. } |
            TimeDef::Weeks { week_start, .. } => Some(Step::Week(*week_start)),
            TimeDef::Month(_) | TimeDef::Months(_) => Some(Step::Month),
            TimeDef::Year(_) | TimeDef::Years(_) => Some(Step::Year),
            TimeDef::And(..) | TimeDef::Or(..) | TimeDef::Not(_) |
            TimeDef::Difference(..) | TimeDef::Union(..) => None,
        }
    }

    pub fn is_leaf(&self) -> bool {
        self.step().is_some()
    }
}

static WEEKDAYS: [&str; 7] = ["mon", "tue", "wed", "thu", "fri", "sat", "sun"];

fn write_set<T: Ord + fmt::Display>(f: &mut fmt::Formatter<'_>, name: &str, set: &ValueSet<T>)
    -> fmt::Result
{
    write!(f, "({}", name)?;
    for v in set.0.iter() {
        write!(f, " {}", v)?;
    }
    write!(f, ")")
}

// s-expression rendering, eg: (and (year 2024) (month 3))
impl fmt::Display for TimeDef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TimeDef::Minute(s) | TimeDef::Hour(s) | TimeDef::Day(s) |
            TimeDef::Month(s) => write_set(f, self.kind_name(), s),
            TimeDef::Year(s) => write_set(f, self.kind_name(), s),
            TimeDef::Weekday(s) => {
                write!(f, "(weekday")?;
                for d in s.0.iter() {
                    write!(f, " {}", WEEKDAYS[*d as usize % 7])?;
                }
                write!(f, ")")
            }
            TimeDef::WeekOfMonth { week_start, weeks } =>
                write_set(f, &format!("week-of-month/{}", week_start), weeks),
            TimeDef::Minutes(n) | TimeDef::Hours(n) | TimeDef::Days(n) |
            TimeDef::Months(n) | TimeDef::Years(n) =>
                write!(f, "({} {})", self.kind_name(), n),
            TimeDef::Weeks { n, week_start } => write!(f, "(weeks/{} {})", week_start, n),
            TimeDef::DateSpan { from, to } => write!(f, "(date-span {} {})", from, to),
            TimeDef::DateTimeSpan { from, to } =>
                write!(f, "(date-time-span {} {})", from, to),
            TimeDef::Timespan { from, to } => write!(f, "(timespan {} {})", from, to),
            TimeDef::And(l, r) | TimeDef::Or(l, r) | TimeDef::Difference(l, r) |
            TimeDef::Union(l, r) => write!(f, "({} {} {})", self.kind_name(), l, r),
            TimeDef::Not(inner) => write!(f, "(not {})", inner),
        }
    }
}


#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn value_ranges_are_checked() {
        assert!(TimeDef::minute(&[0, 59]).is_ok());
        assert_eq!(TimeDef::minute(&[60]), Err(Error::OutOfRange {
            field: "minute", value: 60, min: 0, max: 59 }));
        assert!(TimeDef::hour(&[24]).is_err());
        assert!(TimeDef::day(&[0]).is_err());
        assert!(TimeDef::day(&[31]).is_ok());
        assert!(TimeDef::month(&[13]).is_err());
        assert!(TimeDef::week_of_month(Weekday::Mon, &[0]).is_err());
        assert_eq!(TimeDef::hour(&[]), Err(Error::EmptySet { field: "hour" }));
        assert_eq!(TimeDef::days(-1), Err(Error::NegativeQuantity {
            field: "days", value: -1 }));
        assert_eq!(TimeDef::days(0), Ok(TimeDef::Days(0)));
    }

    #[test]
    fn sets_ignore_order_and_duplicates() {
        let a = TimeDef::weekday(&[Weekday::Mon, Weekday::Fri]).unwrap();
        let b = TimeDef::weekday(&[Weekday::Fri, Weekday::Mon, Weekday::Fri]).unwrap();
        assert_eq!(a, b);
        if let TimeDef::Weekday(set) = &b {
            assert_eq!(set.len(), 2);
            assert!(set.contains(4));
        } else {
            panic!("expected a weekday leaf");
        }

        // combinators are positional
        let year = TimeDef::year(&[2024]).unwrap();
        let month = TimeDef::month(&[3]).unwrap();
        assert_ne!(year.clone() & month.clone(), month & year);
    }

    #[test]
    fn spans_are_checked() {
        let d1 = Date::from_ymd_opt(2024, 1, 1).unwrap();
        let d2 = Date::from_ymd_opt(2024, 1, 5).unwrap();
        assert!(TimeDef::date_span(d1, d2).is_ok());
        assert!(TimeDef::date_span(d1, d1).is_ok());
        assert!(TimeDef::date_span(d2, d1).is_err());
        let t1 = d1.and_hms_opt(10, 0, 0).unwrap();
        assert!(TimeDef::date_time_span(t1, t1).is_ok());
    }

    #[test]
    fn factories() {
        let date = TimeDef::from_date(2024, 3, 15).unwrap();
        let expected = TimeDef::year(&[2024]).unwrap()
            .and(TimeDef::month(&[3]).unwrap())
            .and(TimeDef::day(&[15]).unwrap());
        assert_eq!(date, expected);
        assert_eq!(TimeDef::from_date(2023, 2, 29),
            Err(Error::InvalidDate { year: 2023, month: 2, day: 29 }));
        assert!(TimeDef::from_date_time(2024, 3, 15, 24, 0).is_err());

        let march = TimeDef::from_month(&[Month::March]).unwrap();
        assert_eq!(march, TimeDef::month(&[3]).unwrap());
        assert_eq!(date.to_string(), "(and (and (year 2024) (month 3)) (day 15))");

        let weekend = TimeDef::from_weekday(&[Weekday::Sun, Weekday::Sat]).unwrap();
        assert_eq!((!weekend).to_string(), "(not (weekday sat sun))");
    }
}
