use std::{
    collections::{btree_map::Entry, BTreeMap},
    fmt::Display,
    sync::LazyLock,
};

use chrono::NaiveDate;
use regex::Regex;
use serde::{Serialize, Serializer};

use crate::error::ConfigError;

use super::daily::OpeningHours;

static HOURS_RANGE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*(\S+)\s*-\s*(\S+)\s*$").unwrap());

/// What a holiday does to the store's hours.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum HolidayHours {
    Closed,
    Open(OpeningHours),
}

impl HolidayHours {
    /// Parses `Closed` (any case) or `HH:MM-HH:MM`.
    pub fn parse(date: NaiveDate, spec: &str) -> Result<Self, ConfigError> {
        let invalid = || ConfigError::InvalidHolidayHours {
            date,
            hours: spec.to_string(),
        };
        if spec.trim().eq_ignore_ascii_case("closed") {
            return Ok(Self::Closed);
        }
        let captures = HOURS_RANGE.captures(spec).ok_or_else(invalid)?;
        let opening = captures[1].parse().map_err(|_| invalid())?;
        let closing = captures[2].parse().map_err(|_| invalid())?;
        Ok(Self::Open(OpeningHours::new(opening, closing)?))
    }
}

impl Display for HolidayHours {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Closed => write!(f, "Closed"),
            Self::Open(hours) => write!(f, "{}-{}", hours.opening(), hours.closing()),
        }
    }
}

impl Serialize for HolidayHours {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct HolidayOverride {
    date: NaiveDate,
    name: String,
    hours: HolidayHours,
}

impl HolidayOverride {
    pub fn new(date: NaiveDate, name: impl Into<String>, hours: HolidayHours) -> Self {
        Self {
            date,
            name: name.into(),
            hours,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn hours(&self) -> HolidayHours {
        self.hours
    }
}

/// Date-specific overrides, at most one per calendar date.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct HolidayCalendar {
    holidays: BTreeMap<NaiveDate, HolidayOverride>,
}

impl HolidayCalendar {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_overrides(
        overrides: impl IntoIterator<Item = HolidayOverride>,
    ) -> Result<Self, ConfigError> {
        let mut calendar = Self::new();
        for holiday in overrides {
            calendar.insert(holiday)?;
        }
        Ok(calendar)
    }

    pub fn insert(&mut self, holiday: HolidayOverride) -> Result<(), ConfigError> {
        match self.holidays.entry(holiday.date) {
            Entry::Occupied(_) => Err(ConfigError::DuplicateHoliday(holiday.date)),
            Entry::Vacant(slot) => {
                slot.insert(holiday);
                Ok(())
            }
        }
    }

    pub fn get(&self, date: NaiveDate) -> Option<&HolidayOverride> {
        self.holidays.get(&date)
    }

    /// Holidays on or after `from`, in date order.
    pub fn upcoming(&self, from: NaiveDate) -> impl Iterator<Item = &HolidayOverride> {
        self.holidays.range(from..).map(|(_, holiday)| holiday)
    }

    pub fn len(&self) -> usize {
        self.holidays.len()
    }
}
