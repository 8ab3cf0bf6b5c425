use std::path::PathBuf;

use chrono::{NaiveDate, Weekday};
use thiserror::Error;

use crate::timing::time_of_day::TimeOfDay;

/// Everything that can be wrong with a store configuration.
///
/// These are all raised while building a `StoreConfig`, so the engine itself never has to deal
/// with half-valid schedules.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid time '{0}', expected HH:MM")]
    InvalidTime(String),

    #[error("opening time {opening} must be before closing time {closing}")]
    EmptyRange {
        opening: TimeOfDay,
        closing: TimeOfDay,
    },

    #[error("open '{open}' and close '{close}' must both be set or both be empty")]
    IncompleteHours { open: String, close: String },

    #[error("'{0}' is not a weekday")]
    UnknownWeekday(String),

    #[error("{0:?} is listed more than once")]
    DuplicateWeekday(Weekday),

    #[error("no hours given for {0:?}")]
    MissingWeekday(Weekday),

    #[error("holiday on {date} has invalid hours '{hours}', expected 'Closed' or 'HH:MM-HH:MM'")]
    InvalidHolidayHours { date: NaiveDate, hours: String },

    #[error("more than one holiday on {0}")]
    DuplicateHoliday(NaiveDate),

    #[error("unknown timezone '{0}'")]
    InvalidTimezone(String),

    #[error("lookahead_days must be between 1 and 7, got {0}")]
    InvalidLookahead(u32),

    #[error("could not parse configuration: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("could not read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
}
