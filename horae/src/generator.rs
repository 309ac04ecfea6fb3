use std::fmt;
use std::iter;
use std::sync::Arc;

use chrono::{Datelike, Timelike};

use crate::period::{Period, PeriodComparer};
use crate::period_ops::intersect;
use crate::period_set::{except_group, intersect_group, merge, union_all};
use crate::ranking::natural_step;
use crate::timedef::TimeDef;
use crate::types::{DateTime, Step, Time};
use crate::utils;

pub type Periods = Box<dyn Iterator<Item = Period>>;

type Eval = dyn Fn(&Period) -> Periods + Send + Sync;

/// A rule compiled into a reusable function from a bounding period to the
/// sub-periods the rule selects inside it, in chronological order.
///
/// Building walks the rule tree once. Applying it is lazy where the rule
/// allows: leaves stream their tiles, combinators that need sorting collect
/// their inputs first.
#[derive(Clone)]
pub struct Generator {
    rule: &'static str,
    eval: Arc<Eval>,
}

impl fmt::Debug for Generator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Generator({})", self.rule)
    }
}

fn nothing() -> Periods {
    Box::new(iter::empty())
}

impl Generator {
    fn new<F>(rule: &'static str, eval: F) -> Generator
        where F: Fn(&Period) -> Periods + Send + Sync + 'static
    {
        Generator { rule, eval: Arc::new(eval) }
    }

    pub fn build(node: &TimeDef) -> Generator {
        tracing::trace!(rule = node.kind_name(), "building generator for {}", node);
        match node {
            TimeDef::Minute(set) => {
                let set = set.clone();
                keep_tiles(node, Step::Minute, move |t| set.contains(t.minute()))
            }
            TimeDef::Hour(set) => {
                let set = set.clone();
                keep_tiles(node, Step::Hour, move |t| set.contains(t.hour()))
            }
            TimeDef::Day(set) => {
                let set = set.clone();
                keep_tiles(node, Step::Day, move |t| set.contains(t.day()))
            }
            TimeDef::Month(set) => {
                let set = set.clone();
                keep_tiles(node, Step::Month, move |t| set.contains(t.month()))
            }
            TimeDef::Year(set) => {
                let set = set.clone();
                keep_tiles(node, Step::Year, move |t| set.contains(t.year()))
            }
            TimeDef::Weekday(set) => {
                let set = set.clone();
                keep_tiles(node, Step::Day,
                           move |t| set.contains(t.weekday().num_days_from_monday()))
            }
            TimeDef::WeekOfMonth { week_start, weeks } => {
                let (week_start, weeks) = (*week_start, weeks.clone());
                let weeks = Arc::new(weeks);
                Generator::new(node.kind_name(), move |bound| {
                    let weeks = Arc::clone(&weeks);
                    Box::new(bound.months()
                        .flat_map(move |month| month.weeks(week_start))
                        .filter(move |w| weeks.contains(
                            utils::week_of_month(w.start().date(), week_start))))
                })
            }

            TimeDef::Minutes(n) => every_nth(node, Step::Minute, *n),
            TimeDef::Hours(n) => every_nth(node, Step::Hour, *n),
            TimeDef::Days(n) => every_nth(node, Step::Day, *n),
            TimeDef::Months(n) => every_nth(node, Step::Month, *n),
            TimeDef::Years(n) => every_nth(node, Step::Year, *n),
            TimeDef::Weeks { n, week_start } => {
                let (n, week_start) = (*n as usize, *week_start);
                Generator::new(node.kind_name(), move |bound| {
                    if n == 0 {
                        tracing::debug!("every 0 weeks selects nothing");
                        return nothing();
                    }
                    // the counter runs across month boundaries
                    Box::new(bound.months()
                        .flat_map(move |month| month.weeks(week_start))
                        .step_by(n))
                })
            }

            TimeDef::DateSpan { from, to } => match Period::whole_days(*from, *to) {
                Ok(span) => clip_to(node, span.start(), span.end()),
                Err(err) => {
                    tracing::debug!(%err, "date span can't be represented");
                    Generator::new(node.kind_name(), |_| nothing())
                }
            },
            TimeDef::DateTimeSpan { from, to } => clip_to(node, *from, *to),
            TimeDef::Timespan { from, to } => hours_meeting(node, *from, *to),

            TimeDef::And(l, r) => {
                let (l, r) = (Generator::build(l), Generator::build(r));
                Generator::new(node.kind_name(), move |bound| {
                    Box::new(intersect_group(l.apply(bound), r.apply(bound)))
                })
            }
            TimeDef::Or(l, r) => {
                let (l, r) = (Generator::build(l), Generator::build(r));
                Generator::new(node.kind_name(), move |bound| {
                    let both: Vec<Period> = l.apply(bound).chain(r.apply(bound)).collect();
                    Box::new(union_all(both, &PeriodComparer::default())
                        .into_iter()
                        .filter(|p| !p.is_empty()))
                })
            }
            TimeDef::Not(inner) => {
                let step = natural_step(inner);
                let inner = Generator::build(inner);
                Generator::new(node.kind_name(), move |bound| {
                    let Some(step) = step else {
                        tracing::debug!("negated rule has no leaf to tile by");
                        return nothing();
                    };
                    let excluded: Vec<Period> = inner.apply(bound).collect();
                    Box::new(except_group(bound.tiles(step), excluded))
                })
            }
            TimeDef::Difference(l, r) => {
                let (l, r) = (Generator::build(l), Generator::build(r));
                Generator::new(node.kind_name(), move |bound| {
                    let removed: Vec<Period> = r.apply(bound).collect();
                    Box::new(except_group(l.apply(bound), removed))
                })
            }
            TimeDef::Union(l, r) => {
                let (l, r) = (Generator::build(l), Generator::build(r));
                Generator::new(node.kind_name(), move |bound| {
                    Box::new(merge(l.apply(bound).chain(r.apply(bound))).into_iter())
                })
            }
        }
    }

    /// Sub-periods of `bound` selected by the rule.
    pub fn apply(&self, bound: &Period) -> Periods {
        if bound.is_empty() {
            tracing::debug!(rule = self.rule, "empty bounding period");
            return nothing();
        }
        (self.eval)(bound)
    }
}

// Tiles of the bound at `step` whose start passes `keep`
fn keep_tiles<F>(node: &TimeDef, step: Step, keep: F) -> Generator
    where F: Fn(DateTime) -> bool + Send + Sync + 'static
{
    let keep = Arc::new(keep);
    Generator::new(node.kind_name(), move |bound| {
        let keep = Arc::clone(&keep);
        Box::new(bound.tiles(step).filter(move |t| keep(t.start())))
    })
}

// First tile and every nth after it
fn every_nth(node: &TimeDef, step: Step, n: u32) -> Generator {
    let n = n as usize;
    Generator::new(node.kind_name(), move |bound| {
        if n == 0 {
            tracing::debug!(grain = step.grain().name(), "every 0 units selects nothing");
            return nothing();
        }
        Box::new(bound.tiles(step).step_by(n))
    })
}

// The part of the bound inside [from, to]
fn clip_to(node: &TimeDef, from: DateTime, to: DateTime) -> Generator {
    Generator::new(node.kind_name(), move |bound| {
        let clipped = Period::with_kind(from, to, bound.kind()).ok()
            .and_then(|span| intersect(bound, &span));
        Box::new(clipped.into_iter())
    })
}

// Hours of the bound whose time of day meets [from, to)
fn hours_meeting(node: &TimeDef, from: Time, to: Time) -> Generator {
    let (from, to) = (utils::nanos_of_day(from), utils::nanos_of_day(to));
    Generator::new(node.kind_name(), move |bound| {
        if from == to {
            tracing::debug!("zero length time span selects nothing");
            return nothing();
        }
        Box::new(bound.hours().filter(move |h| {
            let (a0, a1) = utils::time_window(h.start(), h.end());
            utils::time_windows_meet(a0, a1, from, to)
        }))
    })
}

/// Evaluate `rule` once over `bound`.
pub fn generate(rule: &TimeDef, bound: &Period) -> impl Iterator<Item = Period> {
    Generator::build(rule).apply(bound)
}
