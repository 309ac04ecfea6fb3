use std::collections::BTreeMap;

use chrono::{Datelike, Timelike};

use crate::period::Period;
use crate::timedef::TimeDef;
use crate::types::{DateTime, Step, Time};
use crate::utils;

/// Visit every node of the tree in pre-order.
pub fn walk<'a, F>(node: &'a TimeDef, f: &mut F)
    where F: FnMut(&'a TimeDef)
{
    f(node);
    match node {
        TimeDef::And(l, r) | TimeDef::Or(l, r) |
        TimeDef::Difference(l, r) | TimeDef::Union(l, r) => {
            walk(l, f);
            walk(r, f);
        }
        TimeDef::Not(inner) => walk(inner, f),
        TimeDef::Minute(_) | TimeDef::Hour(_) | TimeDef::Day(_) | TimeDef::Month(_) |
        TimeDef::Year(_) | TimeDef::Weekday(_) | TimeDef::WeekOfMonth { .. } |
        TimeDef::Minutes(_) | TimeDef::Hours(_) | TimeDef::Days(_) |
        TimeDef::Weeks { .. } | TimeDef::Months(_) | TimeDef::Years(_) |
        TimeDef::DateSpan { .. } | TimeDef::DateTimeSpan { .. } |
        TimeDef::Timespan { .. } => (),
    }
}

/// Every node of the tree, in pre-order.
pub fn flatten(node: &TimeDef) -> Vec<&TimeDef> {
    let mut nodes = Vec::new();
    walk(node, &mut |n| nodes.push(n));
    nodes
}

fn time_in_span(t: Time, from: Time, to: Time) -> bool {
    if from <= to {
        from <= t && t < to
    } else {
        from <= t || t < to
    }
}

/// Does `at` satisfy every leaf constraint reachable from `node`.
///
/// Combinators only route the walk, the answer is the conjunction of all
/// leaves. Quantity leaves don't constrain a single instant.
pub fn validate_at(node: &TimeDef, at: DateTime) -> bool {
    match node {
        TimeDef::Minute(set) => set.contains(at.minute()),
        TimeDef::Hour(set) => set.contains(at.hour()),
        TimeDef::Day(set) => set.contains(at.day()),
        TimeDef::Month(set) => set.contains(at.month()),
        TimeDef::Year(set) => set.contains(at.year()),
        TimeDef::Weekday(set) => set.contains(at.weekday().num_days_from_monday()),
        TimeDef::WeekOfMonth { week_start, weeks } =>
            weeks.contains(utils::week_of_month(at.date(), *week_start)),

        TimeDef::Minutes(_) | TimeDef::Hours(_) | TimeDef::Days(_) |
        TimeDef::Weeks { .. } | TimeDef::Months(_) | TimeDef::Years(_) => true,

        TimeDef::DateSpan { from, to } => *from <= at.date() && at.date() <= *to,
        TimeDef::DateTimeSpan { from, to } => *from <= at && at <= *to,
        TimeDef::Timespan { from, to } => time_in_span(at.time(), *from, *to),

        TimeDef::And(l, r) | TimeDef::Or(l, r) |
        TimeDef::Difference(l, r) | TimeDef::Union(l, r) =>
            validate_at(l, at) && validate_at(r, at),
        TimeDef::Not(inner) => validate_at(inner, at),
    }
}

// Every tile of `period` at `step` passes `check`
fn all_tiles<F>(period: &Period, step: Step, check: F) -> bool
    where F: Fn(DateTime) -> bool
{
    period.tiles(step).all(|tile| check(tile.start()))
}

// The period holds at least `n` tiles of `step`
fn spans_at_least(period: &Period, step: Step, n: u32) -> bool {
    period.tiles(step).take(n as usize).count() >= n as usize
}

fn leaf_holds_over(leaf: &TimeDef, period: &Period) -> bool {
    match leaf {
        TimeDef::Minute(set) => all_tiles(period, Step::Minute, |t| set.contains(t.minute())),
        TimeDef::Hour(set) => all_tiles(period, Step::Hour, |t| set.contains(t.hour())),
        TimeDef::Day(set) => all_tiles(period, Step::Day, |t| set.contains(t.day())),
        TimeDef::Month(set) => all_tiles(period, Step::Month, |t| set.contains(t.month())),
        TimeDef::Year(set) => all_tiles(period, Step::Year, |t| set.contains(t.year())),
        TimeDef::Weekday(set) => all_tiles(period, Step::Day,
            |t| set.contains(t.weekday().num_days_from_monday())),
        TimeDef::WeekOfMonth { week_start, weeks } =>
            all_tiles(period, Step::Week(*week_start),
                |t| weeks.contains(utils::week_of_month(t.date(), *week_start))),

        TimeDef::Minutes(n) => spans_at_least(period, Step::Minute, *n),
        TimeDef::Hours(n) => spans_at_least(period, Step::Hour, *n),
        TimeDef::Days(n) => spans_at_least(period, Step::Day, *n),
        TimeDef::Weeks { n, week_start } =>
            spans_at_least(period, Step::Week(*week_start), *n),
        TimeDef::Months(n) => spans_at_least(period, Step::Month, *n),
        TimeDef::Years(n) => spans_at_least(period, Step::Year, *n),

        TimeDef::DateSpan { from, to } => Period::whole_days(*from, *to)
            .is_ok_and(|span| period.is_between(&span)),
        TimeDef::DateTimeSpan { from, to } => Period::new(*from, *to)
            .is_ok_and(|span| period.is_between(&span)),
        TimeDef::Timespan { from, to } =>
            period.hours().all(|hour| hour.is_time_between(*from, *to)),

        TimeDef::And(..) | TimeDef::Or(..) | TimeDef::Not(_) |
        TimeDef::Difference(..) | TimeDef::Union(..) =>
            unreachable!("{} is not a leaf", leaf.kind_name()),
    }
}

type Verdicts = BTreeMap<&'static str, bool>;

// Fold leaf verdicts keyed by node kind, AND-ing repeated kinds
fn fold_verdicts(node: &TimeDef, period: &Period, mut acc: Verdicts) -> Verdicts {
    match node {
        TimeDef::And(l, r) | TimeDef::Or(l, r) |
        TimeDef::Difference(l, r) | TimeDef::Union(l, r) => {
            let acc = fold_verdicts(l, period, acc);
            fold_verdicts(r, period, acc)
        }
        TimeDef::Not(inner) => fold_verdicts(inner, period, acc),
        leaf => {
            let holds = leaf_holds_over(leaf, period);
            *acc.entry(leaf.kind_name()).or_insert(true) &= holds;
            acc
        }
    }
}

/// Does every leaf constraint reachable from `node` hold across the whole
/// of `period`.
pub fn validate_over(node: &TimeDef, period: &Period) -> bool {
    let verdicts = fold_verdicts(node, period, Verdicts::new());
    tracing::trace!(?verdicts, "validated {} over {}", node, period);
    verdicts.values().all(|ok| *ok)
}
