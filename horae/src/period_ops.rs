use std::cmp;

use crate::period::Period;

// Pairwise set operations between two Periods
//
//   |------a------|
//            |------b------|
//
//   |----a----|
//                |-----b-----|
//
//   |---------a---------|
//        |-----b-----|


/// Overlap of `a` and `b`, clamped to the later start and the earlier end.
///
/// Two periods that only share an endpoint don't intersect, unless one of
/// them is a single instant lying on the other.
pub fn intersect(a: &Period, b: &Period) -> Option<Period> {
    if a.kind() != b.kind() {
        return None;
    }
    let start = cmp::max(a.start(), b.start());
    let end = cmp::min(a.end(), b.end());
    if start < end || (start == end && (a.is_instant() || b.is_instant())) {
        return Some(Period::raw(start, end, a.kind()));
    }
    None
}

/// Convex hull of `a` and `b` when they overlap or touch, None otherwise.
pub fn union(a: &Period, b: &Period) -> Option<Period> {
    if a.kind() != b.kind() || !a.is_overlapping(b) {
        return None;
    }
    Some(Period::raw(
        cmp::min(a.start(), b.start()),
        cmp::max(a.end(), b.end()),
        a.kind()))
}

/// Portions of `a` not covered by `b`: left remainder first, then right.
pub fn except(a: &Period, b: &Period) -> Vec<Period> {
    if intersect(a, b).is_none() {
        return vec![*a];
    }
    let mut rest = Vec::with_capacity(2);
    if a.start() < b.start() {
        rest.push(Period::raw(a.start(), b.start(), a.kind()));
    }
    if b.end() < a.end() {
        rest.push(Period::raw(b.end(), a.end(), a.kind()));
    }
    rest
}

/// Portions covered by exactly one of `a` or `b`, in chronological order.
pub fn symmetric_difference(a: &Period, b: &Period) -> Vec<Period> {
    if a == b {
        return Vec::new();
    }
    let mut rest = except(a, b);
    rest.extend(except(b, a));
    rest.sort();
    rest
}


#[cfg(test)]
mod test {
    use super::*;
    use crate::types::{Date, DateTime, Kind, Stamp};

    fn hm(h: u32, m: u32) -> DateTime {
        Date::from_ymd_opt(2024, 1, 1).unwrap().and_hms_opt(h, m, 0).unwrap()
    }

    fn p(a: DateTime, b: DateTime) -> Period {
        Period::new(a, b).unwrap()
    }

    #[test]
    fn overlapping_pair() {
        let a = p(hm(10, 0), hm(12, 0));
        let b = p(hm(11, 0), hm(13, 0));
        assert_eq!(intersect(&a, &b), Some(p(hm(11, 0), hm(12, 0))));
        assert_eq!(union(&a, &b), Some(p(hm(10, 0), hm(13, 0))));
        assert_eq!(except(&a, &b), vec![p(hm(10, 0), hm(11, 0))]);
        assert_eq!(except(&b, &a), vec![p(hm(12, 0), hm(13, 0))]);
        assert_eq!(symmetric_difference(&a, &b),
            vec![p(hm(10, 0), hm(11, 0)), p(hm(12, 0), hm(13, 0))]);
    }

    #[test]
    fn nested_pair() {
        let outer = p(hm(8, 0), hm(18, 0));
        let inner = p(hm(12, 0), hm(13, 0));
        assert_eq!(intersect(&outer, &inner), Some(inner));
        assert_eq!(union(&outer, &inner), Some(outer));
        assert_eq!(except(&outer, &inner),
            vec![p(hm(8, 0), hm(12, 0)), p(hm(13, 0), hm(18, 0))]);
        assert!(except(&inner, &outer).is_empty());
        // sharing an edge leaves a single remainder
        let head = p(hm(8, 0), hm(9, 0));
        assert_eq!(except(&outer, &head), vec![p(hm(9, 0), hm(18, 0))]);
    }

    #[test]
    fn disjoint_and_touching() {
        let a = p(hm(10, 0), hm(11, 0));
        let touching = p(hm(11, 0), hm(12, 0));
        let far = p(hm(14, 0), hm(15, 0));

        assert_eq!(intersect(&a, &far), None);
        assert_eq!(union(&a, &far), None);
        assert_eq!(except(&a, &far), vec![a]);
        assert_eq!(symmetric_difference(&a, &far), vec![a, far]);

        assert_eq!(intersect(&a, &touching), None);
        assert_eq!(union(&a, &touching), Some(p(hm(10, 0), hm(12, 0))));
        assert_eq!(except(&a, &touching), vec![a]);

        let noon = p(hm(11, 0), hm(11, 0));
        assert_eq!(intersect(&a, &noon), Some(noon));
    }

    #[test]
    fn algebraic_identities() {
        let spans = [
            p(hm(10, 0), hm(12, 0)),
            p(hm(0, 0), hm(23, 59)),
            p(hm(6, 30), hm(6, 31)),
            p(hm(6, 30), hm(6, 30)),
        ];
        for s in &spans {
            assert_eq!(intersect(s, s), Some(*s));
            assert_eq!(union(s, s), Some(*s));
            assert!(symmetric_difference(s, s).is_empty());
        }
        for a in &spans {
            for b in &spans {
                let adjacent = a.is_overlapping(b);
                assert_eq!(union(a, b).is_none(), !adjacent);
            }
        }
    }

    #[test]
    fn kinds_must_agree() {
        let utc = Period::from_stamps(Stamp::utc(hm(10, 0)), Stamp::utc(hm(12, 0))).unwrap();
        let local = Period::with_kind(hm(10, 0), hm(12, 0), Kind::Local).unwrap();
        assert_eq!(intersect(&utc, &local), None);
        assert_eq!(union(&utc, &local), None);
        assert_eq!(except(&utc, &local), vec![utc]);
    }
}
