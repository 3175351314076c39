//! Calendar primitives.
//!
//! All timestamps are naive local wall-clock times. Days start at local
//! midnight.

use chrono::{Days, NaiveDate, NaiveDateTime, NaiveTime};

/// A point in local wall-clock time.
pub type Timestamp = NaiveDateTime;

/// Long display format, e.g. `August 06, 2020`.
pub const LONG_DATE_FORMAT: &str = "%B %d, %Y";
/// Date-input value format, e.g. `2020-08-06`.
pub const INPUT_DATE_FORMAT: &str = "%Y-%m-%d";

pub fn format_long_date(t: Timestamp) -> String {
    t.format(LONG_DATE_FORMAT).to_string()
}

pub fn format_input_date(day: NaiveDate) -> String {
    day.format(INPUT_DATE_FORMAT).to_string()
}

pub fn start_of_day(day: NaiveDate) -> Timestamp {
    day.and_time(NaiveTime::MIN)
}

/// Half-open activity span `[start, end)`.
///
/// `end == None` means the span is still open.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct TimeSpan {
    pub start: Timestamp,
    pub end: Option<Timestamp>,
}

impl TimeSpan {
    pub fn open(start: Timestamp) -> Self {
        Self { start, end: None }
    }

    pub fn closed(start: Timestamp, end: Timestamp) -> Self {
        Self {
            start,
            end: Some(end),
        }
    }

    /// Start inclusive, end exclusive.
    pub fn contains(&self, t: Timestamp) -> bool {
        self.start <= t && self.end.is_none_or(|end| t < end)
    }
}

/// The ordered sequence of whole days a dataset covers.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DayRange {
    days: Vec<NaiveDate>,
}

impl DayRange {
    /// Every local midnight at or after `min`, and strictly before `max + 1 day`.
    ///
    /// A `min` that falls mid-day therefore starts the range on the next day,
    /// and a `max` that falls mid-day adds one trailing day.
    pub fn covering(min: Timestamp, max: Timestamp) -> Self {
        let first = if min.time() == NaiveTime::MIN {
            Some(min.date())
        } else {
            min.date().checked_add_days(Days::new(1))
        };
        let Some(stop) = max.checked_add_days(Days::new(1)) else {
            return Self { days: Vec::new() };
        };

        let mut days = Vec::new();
        let mut day = first;
        while let Some(d) = day {
            if start_of_day(d) >= stop {
                break;
            }
            days.push(d);
            day = d.succ_opt();
        }
        Self { days }
    }

    pub fn len(&self) -> usize {
        self.days.len()
    }

    pub fn is_empty(&self) -> bool {
        self.days.is_empty()
    }

    pub fn first(&self) -> Option<NaiveDate> {
        self.days.first().copied()
    }

    pub fn last(&self) -> Option<NaiveDate> {
        self.days.last().copied()
    }

    pub fn last_index(&self) -> Option<usize> {
        self.days.len().checked_sub(1)
    }

    pub fn get(&self, index: usize) -> Option<NaiveDate> {
        self.days.get(index).copied()
    }

    /// Midnight starting the day at `index`.
    pub fn start_of(&self, index: usize) -> Option<Timestamp> {
        self.get(index).map(start_of_day)
    }

    /// Resolves a date-input value to its day index by exact match on the
    /// formatted day.
    pub fn index_of_input_value(&self, value: &str) -> Option<usize> {
        self.days.iter().position(|d| format_input_date(*d) == value)
    }

    pub fn iter(&self) -> impl Iterator<Item = NaiveDate> + '_ {
        self.days.iter().copied()
    }
}
