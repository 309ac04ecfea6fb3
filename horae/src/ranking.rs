use std::cmp::Ordering;

use crate::timedef::TimeDef;
use crate::types::{Duration, Step, Time};
use crate::utils;
use crate::visit::walk;

impl TimeDef {
    /// Chronological granularity weight, finest first. Combinators weigh
    /// more than any leaf.
    pub fn weight(&self) -> u8 {
        match self {
            TimeDef::Minute(_) => 0,
            TimeDef::Minutes(_) => 1,
            TimeDef::Hour(_) => 2,
            TimeDef::Hours(_) => 3,
            TimeDef::Timespan { .. } => 4,
            TimeDef::DateTimeSpan { .. } => 5,
            TimeDef::Day(_) => 6,
            TimeDef::Days(_) => 7,
            TimeDef::DateSpan { .. } => 8,
            TimeDef::Weekday(_) => 9,
            TimeDef::WeekOfMonth { .. } => 10,
            TimeDef::Weeks { .. } => 11,
            TimeDef::Month(_) => 12,
            TimeDef::Months(_) => 13,
            TimeDef::Year(_) => 14,
            TimeDef::Years(_) => 15,
            TimeDef::Not(_) => 16,
            TimeDef::Difference(..) => 17,
            TimeDef::Union(..) => 18,
            TimeDef::Or(..) => 19,
            TimeDef::And(..) => 20,
        }
    }

    /// Total order by granularity. Nodes of the same kind break ties on
    /// their content: sets by size then sum, quantities by count, spans by
    /// length, combinators by their children left to right.
    pub fn chrono_cmp(&self, other: &TimeDef) -> Ordering {
        use TimeDef::*;
        let by_weight = self.weight().cmp(&other.weight());
        if by_weight != Ordering::Equal {
            return by_weight;
        }
        match (self, other) {
            (Minute(a), Minute(b)) | (Hour(a), Hour(b)) | (Day(a), Day(b)) |
            (Month(a), Month(b)) | (Weekday(a), Weekday(b)) =>
                (a.len(), a.sum()).cmp(&(b.len(), b.sum())),
            (WeekOfMonth { weeks: a, .. }, WeekOfMonth { weeks: b, .. }) =>
                (a.len(), a.sum()).cmp(&(b.len(), b.sum())),
            (Year(a), Year(b)) => (a.len(), a.sum()).cmp(&(b.len(), b.sum())),

            (Minutes(a), Minutes(b)) | (Hours(a), Hours(b)) | (Days(a), Days(b)) |
            (Months(a), Months(b)) | (Years(a), Years(b)) |
            (Weeks { n: a, .. }, Weeks { n: b, .. }) => a.cmp(b),

            (DateSpan { from: f1, to: t1 }, DateSpan { from: f2, to: t2 }) =>
                (*t1 - *f1).cmp(&(*t2 - *f2)),
            (DateTimeSpan { from: f1, to: t1 }, DateTimeSpan { from: f2, to: t2 }) =>
                (*t1 - *f1).cmp(&(*t2 - *f2)),
            (Timespan { from: f1, to: t1 }, Timespan { from: f2, to: t2 }) =>
                time_span_length(*f1, *t1).cmp(&time_span_length(*f2, *t2)),

            (And(l1, r1), And(l2, r2)) | (Or(l1, r1), Or(l2, r2)) |
            (Difference(l1, r1), Difference(l2, r2)) | (Union(l1, r1), Union(l2, r2)) =>
                l1.chrono_cmp(l2).then_with(|| r1.chrono_cmp(r2)),
            (Not(a), Not(b)) => a.chrono_cmp(b),

            (a, b) => unreachable!(
                "weight tie between {} and {}", a.kind_name(), b.kind_name()),
        }
    }
}

fn time_span_length(from: Time, to: Time) -> Duration {
    let (from, mut to) = (utils::nanos_of_day(from), utils::nanos_of_day(to));
    if to < from {
        to += utils::DAY_NANOS;
    }
    Duration::nanoseconds(to - from)
}

/// Finest leaf of the tree, None for a tree without leaves.
pub fn smallest(node: &TimeDef) -> Option<&TimeDef> {
    let mut min: Option<&TimeDef> = None;
    walk(node, &mut |n| {
        if n.is_leaf() && min.map_or(true, |m| n.chrono_cmp(m) == Ordering::Less) {
            min = Some(n);
        }
    });
    min
}

/// Coarsest leaf of the tree, None for a tree without leaves.
pub fn greatest(node: &TimeDef) -> Option<&TimeDef> {
    let mut max: Option<&TimeDef> = None;
    walk(node, &mut |n| {
        if n.is_leaf() && max.map_or(true, |m| n.chrono_cmp(m) == Ordering::Greater) {
            max = Some(n);
        }
    });
    max
}

/// Step used to tile a bounding period when evaluating the whole tree.
pub fn natural_step(node: &TimeDef) -> Option<Step> {
    smallest(node).and_then(TimeDef::step)
}
