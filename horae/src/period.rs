use std::cmp::Ordering;
use std::fmt;

use chrono::Weekday;

use crate::error::{Error, Result};
use crate::seq_grain::Tiles;
use crate::types::{Date, DateTime, Duration, Grain, Kind, Stamp, Step, Time};
use crate::utils;

const EPOCH: DateTime = match (Date::from_ymd_opt(1970, 1, 1), Time::from_hms_opt(0, 0, 0)) {
    (Some(date), Some(time)) => DateTime::new(date, time),
    _ => panic!("unix epoch out of range"),
};

/// An immutable closed interval of time `[start, end]`.
///
/// Both endpoints share one [`Kind`] and `start <= end` always holds.
/// Tiles produced by decomposing a period share their endpoints with their
/// neighbours, so a period reads best as "from start up to end".
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Period {
    start: DateTime,
    end: DateTime,
    kind: Kind,
}

impl Period {
    /// Sentinel period with two default timestamps, used by `union_all` to
    /// mark consumed slots.
    pub const EMPTY: Period = Period {
        start: EPOCH,
        end: EPOCH,
        kind: Kind::Unspecified,
    };

    pub fn new(start: DateTime, end: DateTime) -> Result<Period> {
        Period::with_kind(start, end, Kind::Unspecified)
    }

    pub fn with_kind(start: DateTime, end: DateTime, kind: Kind) -> Result<Period> {
        if start > end {
            return Err(Error::InvalidBounds { start, end });
        }
        Ok(Period { start, end, kind })
    }

    /// Build a period from two stamps, which must agree on their kind.
    pub fn from_stamps(start: Stamp, end: Stamp) -> Result<Period> {
        if start.kind != end.kind {
            return Err(Error::KindMismatch { start: start.kind, end: end.kind });
        }
        Period::with_kind(start.at, end.at, start.kind)
    }

    // Callers guarantee start <= end.
    pub(crate) fn raw(start: DateTime, end: DateTime, kind: Kind) -> Period {
        debug_assert!(start <= end, "Period::raw {} > {}", start, end);
        Period { start, end, kind }
    }

    /// The calendar unit of `step` containing `at`.
    pub fn enclosing(at: DateTime, step: Step) -> Option<Period> {
        let start = utils::truncate(at, step)?;
        let end = utils::next_boundary(at, step)?;
        Some(Period::raw(start, end, Kind::Unspecified))
    }

    /// Whole days from `from` through `to`, both included.
    pub fn whole_days(from: Date, to: Date) -> Result<Period> {
        if from > to {
            return Err(Error::InvalidDateSpan { from, to });
        }
        let start = utils::midnight(from)
            .ok_or(Error::InvalidDateSpan { from, to })?;
        let end = to.succ_opt().and_then(utils::midnight)
            .ok_or(Error::InvalidDateSpan { from, to })?;
        Ok(Period::raw(start, end, Kind::Unspecified))
    }

    pub fn start(&self) -> DateTime { self.start }
    pub fn end(&self) -> DateTime { self.end }
    pub fn kind(&self) -> Kind { self.kind }

    pub fn duration(&self) -> Duration {
        self.end.signed_duration_since(self.start)
    }

    pub fn is_empty(&self) -> bool {
        *self == Period::EMPTY
    }

    pub fn is_instant(&self) -> bool {
        self.start == self.end
    }

    /// Is `point` inside this period, endpoints included.
    pub fn contains(&self, point: DateTime) -> bool {
        self.start <= point && point <= self.end
    }

    /// Is this period fully inside `other`, endpoints included.
    pub fn is_between(&self, other: &Period) -> bool {
        other.start <= self.start && self.end <= other.end
    }

    /// Strict containment: this period lies inside `other` without
    /// touching either of its endpoints.
    pub fn is_within(&self, other: &Period) -> bool {
        other.start < self.start && self.end < other.end
    }

    /// Periods that merely touch count as overlapping.
    pub fn is_overlapping(&self, other: &Period) -> bool {
        self.start <= other.end && other.start <= self.end
    }

    /// Compare only the time-of-day of both endpoints against `[from, to]`.
    /// An end landing on a later midnight reads as 24:00. A window with
    /// `from > to` wraps around midnight.
    pub fn is_time_between(&self, from: Time, to: Time) -> bool {
        let (a0, a1) = utils::time_window(self.start, self.end);
        let (from, to) = (utils::nanos_of_day(from), utils::nanos_of_day(to));
        if from <= to {
            from <= a0 && a1 <= to
        } else {
            (from <= a0 && a1 <= to + utils::DAY_NANOS) || a1 <= to
        }
    }

    /// Move both endpoints by `n` grains. Fails when the result leaves the
    /// range chrono can represent.
    pub fn shift(&self, grain: Grain, n: i32) -> Option<Period> {
        let start = utils::shift_datetime(self.start, grain, n)?;
        let end = utils::shift_datetime(self.end, grain, n)?;
        // month shifts clamp days, keep the invariant anyway
        Some(Period::raw(start, end.max(start), self.kind))
    }

    pub fn tiles(&self, step: Step) -> Tiles {
        Tiles::new(*self, step)
    }

    pub fn minutes(&self) -> Tiles { self.tiles(Step::Minute) }
    pub fn hours(&self) -> Tiles { self.tiles(Step::Hour) }
    pub fn days(&self) -> Tiles { self.tiles(Step::Day) }
    pub fn weeks(&self, week_start: Weekday) -> Tiles { self.tiles(Step::Week(week_start)) }
    pub fn months(&self) -> Tiles { self.tiles(Step::Month) }
    pub fn years(&self) -> Tiles { self.tiles(Step::Year) }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            return write!(f, "[empty]");
        }
        write!(f, "[{}, {}]", self.start, self.end)
    }
}

/// Where the empty sentinel sorts relative to real periods.
#[derive(Debug, Default, PartialEq, Eq, Clone, Copy)]
pub enum EmptyOrder {
    #[default]
    First,
    Last,
}

/// Orders periods by `(start, end)` with the empty sentinel placed
/// according to `empty`.
#[derive(Debug, Default, PartialEq, Eq, Clone, Copy)]
pub struct PeriodComparer {
    pub empty: EmptyOrder,
}

impl PeriodComparer {
    pub fn new(empty: EmptyOrder) -> PeriodComparer {
        PeriodComparer { empty }
    }

    pub fn compare(&self, a: &Period, b: &Period) -> Ordering {
        match (a.is_empty(), b.is_empty()) {
            (true, true) => Ordering::Equal,
            (true, false) => match self.empty {
                EmptyOrder::First => Ordering::Less,
                EmptyOrder::Last => Ordering::Greater,
            },
            (false, true) => match self.empty {
                EmptyOrder::First => Ordering::Greater,
                EmptyOrder::Last => Ordering::Less,
            },
            (false, false) => (a.start, a.end, a.kind).cmp(&(b.start, b.end, b.kind)),
        }
    }
}

impl Ord for Period {
    fn cmp(&self, other: &Period) -> Ordering {
        PeriodComparer::default().compare(self, other)
    }
}

impl PartialOrd for Period {
    fn partial_cmp(&self, other: &Period) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}
