use crate::period::{Period, PeriodComparer};
use crate::period_ops::{except, intersect, union};

/// Collapse `periods` into their minimal covering set.
///
/// Sorts by start and sweeps left to right, folding every period that
/// overlaps or touches the running tail into it.
pub fn merge<I>(periods: I) -> Vec<Period>
    where I: IntoIterator<Item = Period>
{
    let mut sorted: Vec<Period> = periods.into_iter().collect();
    sorted.sort();
    let mut merged: Vec<Period> = Vec::with_capacity(sorted.len());
    for p in sorted {
        match merged.last_mut() {
            Some(tail) => match union(tail, &p) {
                Some(hull) => *tail = hull,
                None => merged.push(p),
            },
            None => merged.push(p),
        }
    }
    merged
}

/// Sort with `comparer` and merge overlapping neighbours in place.
///
/// Every slot consumed by a merge is overwritten with [`Period::EMPTY`].
/// Merged periods are compacted to the front, the sentinels trail behind
/// them and are NOT trimmed: the output always has the input's length.
/// Callers wanting just the periods filter with `!p.is_empty()`.
pub fn union_all(mut periods: Vec<Period>, comparer: &PeriodComparer) -> Vec<Period> {
    periods.sort_by(|a, b| comparer.compare(a, b));
    let mut w = 0;
    for j in 1..periods.len() {
        if periods[j].is_empty() {
            continue;
        }
        if periods[w].is_empty() {
            periods.swap(w, j);
            continue;
        }
        match union(&periods[w], &periods[j]) {
            Some(hull) => {
                periods[w] = hull;
                periods[j] = Period::EMPTY;
            }
            None => {
                w += 1;
                periods.swap(w, j);
            }
        }
    }
    periods
}

/// Intersections between every period of `lhs` and every period of `rhs`.
///
/// `rhs` is sorted once. Scanning it for a given `l` stops at the first `r`
/// starting after `l` ends, since no later `r` can overlap it.
pub fn intersect_group<L, R>(lhs: L, rhs: R) -> impl Iterator<Item = Period>
    where L: IntoIterator<Item = Period>,
          R: IntoIterator<Item = Period>
{
    let mut rhs: Vec<Period> = rhs.into_iter().collect();
    rhs.sort();
    lhs.into_iter().flat_map(move |l| {
        let mut hits = Vec::new();
        for r in &rhs {
            if r.start() > l.end() {
                break;
            }
            if let Some(overlap) = intersect(&l, r) {
                hits.push(overlap);
            }
        }
        hits
    })
}

/// What remains of every `lhs` period after removing all of `rhs` from it.
pub fn except_group<L, R>(lhs: L, rhs: R) -> impl Iterator<Item = Period>
    where L: IntoIterator<Item = Period>,
          R: IntoIterator<Item = Period>
{
    let mut rhs: Vec<Period> = rhs.into_iter().collect();
    rhs.sort();
    lhs.into_iter().flat_map(move |l| {
        let mut pieces = vec![l];
        for r in &rhs {
            if r.start() > l.end() {
                break;
            }
            if r.end() < l.start() {
                continue;
            }
            pieces = pieces.iter().flat_map(|piece| except(piece, r)).collect();
        }
        pieces
    })
}


#[cfg(test)]
mod test {
    use super::*;
    use crate::period::EmptyOrder;
    use crate::types::{Date, DateTime};

    fn hm(h: u32, m: u32) -> DateTime {
        Date::from_ymd_opt(2024, 1, 1).unwrap().and_hms_opt(h, m, 0).unwrap()
    }

    fn p(h0: u32, h1: u32) -> Period {
        Period::new(hm(h0, 0), hm(h1, 0)).unwrap()
    }

    #[test]
    fn merge_coalesces() {
        let merged = merge(vec![p(13, 14), p(1, 3), p(2, 5), p(5, 6), p(9, 10)]);
        assert_eq!(merged, vec![p(1, 6), p(9, 10), p(13, 14)]);
        assert!(merge(Vec::new()).is_empty());
        assert_eq!(merge(vec![p(1, 8), p(2, 3)]), vec![p(1, 8)]);
    }

    #[test]
    fn union_all_leaves_trailing_sentinels() {
        let input = vec![p(9, 10), p(1, 3), p(2, 4), p(3, 5), p(12, 13)];
        let out = union_all(input.clone(), &PeriodComparer::default());
        assert_eq!(out.len(), input.len());
        assert_eq!(out, vec![p(1, 5), p(9, 10), p(12, 13), Period::EMPTY, Period::EMPTY]);

        let real: Vec<_> = out.into_iter().filter(|x| !x.is_empty()).collect();
        assert_eq!(real, merge(input));
    }

    #[test]
    fn union_all_with_sentinels_in_input() {
        let input = vec![Period::EMPTY, p(4, 6), p(1, 2), p(5, 7)];
        let first = union_all(input.clone(), &PeriodComparer::new(EmptyOrder::First));
        assert_eq!(first, vec![p(1, 2), p(4, 7), Period::EMPTY, Period::EMPTY]);
        let last = union_all(input, &PeriodComparer::new(EmptyOrder::Last));
        assert_eq!(last, vec![p(1, 2), p(4, 7), Period::EMPTY, Period::EMPTY]);
        assert!(union_all(Vec::new(), &PeriodComparer::default()).is_empty());
    }

    #[test]
    fn intersect_group_sweeps() {
        let lhs = vec![p(1, 4), p(6, 9), p(20, 21)];
        let rhs = vec![p(8, 12), p(0, 2), p(3, 7)];
        let hits: Vec<_> = intersect_group(lhs.clone(), rhs.clone()).collect();
        assert_eq!(hits, vec![p(1, 2), p(3, 4), p(6, 7), p(8, 9)]);

        // same answer as the full cross product
        let naive: Vec<_> = lhs.iter()
            .flat_map(|l| rhs.iter().filter_map(move |r| intersect(l, r)))
            .collect();
        let mut sorted = naive.clone();
        sorted.sort();
        assert_eq!(hits, sorted);
    }

    #[test]
    fn except_group_subtracts_everything() {
        let lhs = vec![p(0, 10), p(12, 14)];
        let rhs = vec![p(2, 3), p(13, 20), p(5, 6)];
        let rest: Vec<_> = except_group(lhs, rhs).collect();
        assert_eq!(rest, vec![p(0, 2), p(3, 5), p(6, 10), p(12, 13)]);

        let untouched: Vec<_> = except_group(vec![p(1, 2)], Vec::new()).collect();
        assert_eq!(untouched, vec![p(1, 2)]);
    }
}
