use crate::types::{Date, DateTime, Kind};
use thiserror::Error;

/// Contract violations detected while constructing periods and rules.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    #[error("period start {start} is after its end {end}")]
    InvalidBounds { start: DateTime, end: DateTime },

    #[error("date span starts on {from} after it ends on {to}")]
    InvalidDateSpan { from: Date, to: Date },

    #[error("period endpoints differ in kind: {start:?} vs {end:?}")]
    KindMismatch { start: Kind, end: Kind },

    #[error("{field} value {value} outside of {min}..={max}")]
    OutOfRange { field: &'static str, value: i64, min: i64, max: i64 },

    #[error("{field} needs at least one value")]
    EmptySet { field: &'static str },

    #[error("{field} quantity can't be negative, got {value}")]
    NegativeQuantity { field: &'static str, value: i64 },

    #[error("no such date {year:04}-{month:02}-{day:02}")]
    InvalidDate { year: i32, month: u32, day: u32 },
}

pub type Result<T> = std::result::Result<T, Error>;
