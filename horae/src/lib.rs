//! Recurring time rules evaluated into concrete periods.
//!
//! A [`TimeDef`] is an expression tree of calendar constraints ("mondays",
//! "every 2 days", "march of 2024") and combinators. Rules can be checked
//! against an instant with [`validate_at`], against a whole period with
//! [`validate_over`], or expanded into the sub-periods they select inside a
//! bounding [`Period`] with [`generate`].

mod types;
pub use types::{Date, DateTime, Duration, Grain, Kind, Stamp, Step, Time};

mod error;
pub use error::{Error, Result};

mod utils;

mod period;
pub use period::{EmptyOrder, Period, PeriodComparer};

mod seq_grain;
pub use seq_grain::Tiles;

mod period_ops;
pub use period_ops::{except, intersect, symmetric_difference, union};

mod period_set;
pub use period_set::{except_group, intersect_group, merge, union_all};

mod timedef;
pub use timedef::{TimeDef, ValueSet};

mod ranking;
pub use ranking::{greatest, natural_step, smallest};

mod visit;
pub use visit::{flatten, validate_at, validate_over, walk};

mod generator;
pub use generator::{generate, Generator, Periods};
