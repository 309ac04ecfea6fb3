pub type DateTime = chrono::NaiveDateTime;
pub type Date = chrono::NaiveDate;
pub type Time = chrono::NaiveTime;
pub type Duration = chrono::Duration;

// Grains are calendar units used to tile Periods.
#[derive(Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Clone, Copy)]
pub enum Grain {
    Minute,
    Hour,
    Day,
    Week,
    Month,
    Year,
}

impl Grain {
    pub fn name(self) -> &'static str {
        match self {
            Grain::Minute => "minute",
            Grain::Hour => "hour",
            Grain::Day => "day",
            Grain::Week => "week",
            Grain::Month => "month",
            Grain::Year => "year",
        }
    }
}

/// How a Period gets tiled. Weeks need to know which day they start on.
#[derive(Debug, PartialEq, Eq, Hash, Clone, Copy)]
pub enum Step {
    Minute,
    Hour,
    Day,
    Week(chrono::Weekday),
    Month,
    Year,
}

impl Step {
    pub fn grain(self) -> Grain {
        match self {
            Step::Minute => Grain::Minute,
            Step::Hour => Grain::Hour,
            Step::Day => Grain::Day,
            Step::Week(_) => Grain::Week,
            Step::Month => Grain::Month,
            Step::Year => Grain::Year,
        }
    }
}

/// Opaque tag describing what a timestamp is relative to. It is never used
/// for conversions, only checked for equality between period endpoints.
#[derive(Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Clone, Copy)]
pub enum Kind {
    #[default]
    Unspecified,
    Utc,
    Local,
}

/// A timestamp together with its Kind.
#[derive(Debug, Default, PartialEq, Eq, Hash, Clone, Copy)]
pub struct Stamp {
    pub at: DateTime,
    pub kind: Kind,
}

impl Stamp {
    pub fn new(at: DateTime, kind: Kind) -> Stamp {
        Stamp { at, kind }
    }

    pub fn utc(at: DateTime) -> Stamp {
        Stamp { at, kind: Kind::Utc }
    }

    pub fn local(at: DateTime) -> Stamp {
        Stamp { at, kind: Kind::Local }
    }
}
