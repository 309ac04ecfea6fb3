use std::iter::FusedIterator;

use crate::period::Period;
use crate::types::{DateTime, Kind, Step};
use crate::utils;

/// Lazily tiles a Period into calendar aligned sub-periods.
///
/// The first tile starts at the source start and stops at the next calendar
/// boundary of the step, every following tile starts where the previous one
/// ended and the last one is cut at the source end. A source crossing no
/// boundary comes out untouched as the only tile, an instant yields itself.
#[derive(Clone, Debug)]
pub struct Tiles {
    cursor: DateTime,
    end: DateTime,
    kind: Kind,
    step: Step,
    instant: Option<Period>,
}

impl Tiles {
    pub(crate) fn new(source: Period, step: Step) -> Tiles {
        Tiles {
            cursor: source.start(),
            end: source.end(),
            kind: source.kind(),
            step,
            instant: source.is_instant().then_some(source),
        }
    }
}

impl Iterator for Tiles {
    type Item = Period;

    fn next(&mut self) -> Option<Period> {
        if let Some(instant) = self.instant.take() {
            return Some(instant);
        }
        if self.cursor >= self.end {
            return None;
        }
        // running out of representable dates just ends the tile at `end`
        let stop = utils::next_boundary(self.cursor, self.step)
            .map_or(self.end, |boundary| boundary.min(self.end));
        let tile = Period::raw(self.cursor, stop, self.kind);
        self.cursor = stop;
        Some(tile)
    }
}

impl FusedIterator for Tiles {}
