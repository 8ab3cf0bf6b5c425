use std::{fmt::Display, str::FromStr, sync::LazyLock};

use chrono::Timelike;
use regex::Regex;
use serde::{de, Deserialize, Deserializer, Serialize, Serializer};

use crate::error::ConfigError;

static HH_MM: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^([01]\d|2[0-3]):([0-5]\d)$").unwrap());

/// A wall-clock time stored as HHMM, e.g. 14:30 is `1430`.
///
/// Comparisons are plain integer comparisons. That is only monotonic because minutes are always
/// kept in 00-59, which every constructor guarantees.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TimeOfDay(u16);

impl TimeOfDay {
    pub fn new(hour: u16, minute: u16) -> Option<Self> {
        if hour > 23 || minute > 59 {
            return None;
        }
        Some(Self(hour * 100 + minute))
    }

    pub fn from_time<T: Timelike>(time: &T) -> Self {
        // chrono never hands out hour > 23 or minute > 59
        Self((time.hour() * 100 + time.minute()) as u16)
    }

    #[cfg(test)]
    pub fn hhmm(&self) -> u16 {
        self.0
    }

    pub fn hour(&self) -> u16 {
        self.0 / 100
    }

    pub fn minute(&self) -> u16 {
        self.0 % 100
    }
}

impl FromStr for TimeOfDay {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let captures = HH_MM
            .captures(s)
            .ok_or_else(|| ConfigError::InvalidTime(s.to_string()))?;
        // The regex already bounds both parts
        let hour: u16 = captures[1]
            .parse()
            .map_err(|_| ConfigError::InvalidTime(s.to_string()))?;
        let minute: u16 = captures[2]
            .parse()
            .map_err(|_| ConfigError::InvalidTime(s.to_string()))?;
        Self::new(hour, minute).ok_or_else(|| ConfigError::InvalidTime(s.to_string()))
    }
}

impl Display for TimeOfDay {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:02}:{:02}", self.hour(), self.minute())
    }
}

impl Serialize for TimeOfDay {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for TimeOfDay {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(de::Error::custom)
    }
}
