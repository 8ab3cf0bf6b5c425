use std::{collections::HashMap, fmt, fs, path::Path};

use chrono::{NaiveDate, Weekday};
use chrono_tz::Tz;
use serde::{
    de::{MapAccess, Visitor},
    Deserialize, Deserializer,
};

use crate::{
    error::ConfigError,
    timing::{
        daily::Daily,
        holiday::{HolidayCalendar, HolidayHours, HolidayOverride},
        schedule::{WeeklySchedule, WEEK},
    },
};

pub const DEFAULT_TIMEZONE: Tz = chrono_tz::Europe::London;
pub const DEFAULT_LOOKAHEAD_DAYS: u32 = 1;
pub const MAX_LOOKAHEAD_DAYS: u32 = 7;

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct RawConfig {
    #[serde(default)]
    timezone: Option<String>,
    #[serde(default)]
    lookahead_days: Option<u32>,
    #[serde(deserialize_with = "weekly_entries")]
    weekly: Vec<(String, RawHours)>,
    #[serde(default)]
    holidays: Vec<RawHoliday>,
}

/// A closed day is spelled out as `{ "open": "", "close": "" }`.
#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct RawHours {
    open: String,
    close: String,
}

#[derive(Deserialize)]
struct RawHoliday {
    date: NaiveDate,
    name: String,
    hours: String,
}

/// The validated, read-only configuration the engine runs on.
#[derive(Clone, Debug, PartialEq)]
pub struct StoreConfig {
    timezone: Tz,
    lookahead_days: u32,
    schedule: WeeklySchedule,
    holidays: HolidayCalendar,
}

impl StoreConfig {
    pub fn new(schedule: WeeklySchedule, holidays: HolidayCalendar) -> Self {
        Self {
            timezone: DEFAULT_TIMEZONE,
            lookahead_days: DEFAULT_LOOKAHEAD_DAYS,
            schedule,
            holidays,
        }
    }

    pub fn with_timezone(mut self, timezone: Tz) -> Self {
        self.timezone = timezone;
        self
    }

    pub fn with_lookahead_days(mut self, days: u32) -> Result<Self, ConfigError> {
        if !(1..=MAX_LOOKAHEAD_DAYS).contains(&days) {
            return Err(ConfigError::InvalidLookahead(days));
        }
        self.lookahead_days = days;
        Ok(self)
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&text)
    }

    pub fn from_json(text: &str) -> Result<Self, ConfigError> {
        let raw: RawConfig = serde_json::from_str(text)?;

        let timezone = match raw.timezone {
            Some(name) => name
                .parse::<Tz>()
                .map_err(|_| ConfigError::InvalidTimezone(name))?,
            None => DEFAULT_TIMEZONE,
        };

        let mut by_day: HashMap<Weekday, RawHours> = HashMap::new();
        for (key, hours) in raw.weekly {
            let weekday = parse_weekday(&key)?;
            if by_day.insert(weekday, hours).is_some() {
                return Err(ConfigError::DuplicateWeekday(weekday));
            }
        }
        let schedule = WeeklySchedule::from_fn(|weekday| {
            let hours = by_day
                .get(&weekday)
                .ok_or(ConfigError::MissingWeekday(weekday))?;
            Daily::from_strings(&hours.open, &hours.close)
        })?;

        let holidays = raw
            .holidays
            .into_iter()
            .map(|holiday| {
                let hours = HolidayHours::parse(holiday.date, &holiday.hours)?;
                Ok(HolidayOverride::new(holiday.date, holiday.name, hours))
            })
            .collect::<Result<Vec<_>, ConfigError>>()?;
        let holidays = HolidayCalendar::from_overrides(holidays)?;

        Self::new(schedule, holidays)
            .with_timezone(timezone)
            .with_lookahead_days(raw.lookahead_days.unwrap_or(DEFAULT_LOOKAHEAD_DAYS))
    }

    pub fn timezone(&self) -> Tz {
        self.timezone
    }

    pub fn lookahead_days(&self) -> u32 {
        self.lookahead_days
    }

    pub fn schedule(&self) -> &WeeklySchedule {
        &self.schedule
    }

    pub fn holidays(&self) -> &HolidayCalendar {
        &self.holidays
    }
}

/// Keeps every `weekly` entry in document order, repeated keys included, so that a weekday given
/// twice reaches the duplicate check instead of silently replacing the earlier entry.
fn weekly_entries<'de, D>(deserializer: D) -> Result<Vec<(String, RawHours)>, D::Error>
where
    D: Deserializer<'de>,
{
    struct EntriesVisitor;

    impl<'de> Visitor<'de> for EntriesVisitor {
        type Value = Vec<(String, RawHours)>;

        fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
            formatter.write_str("a map of weekday to opening hours")
        }

        fn visit_map<M>(self, mut map: M) -> Result<Self::Value, M::Error>
        where
            M: MapAccess<'de>,
        {
            let mut entries = Vec::with_capacity(map.size_hint().unwrap_or(7));
            while let Some(entry) = map.next_entry()? {
                entries.push(entry);
            }
            Ok(entries)
        }
    }

    deserializer.deserialize_map(EntriesVisitor)
}

/// Accepts "0".."6" (0 is Sunday) or an English day name such as "monday" or "Mon".
fn parse_weekday(key: &str) -> Result<Weekday, ConfigError> {
    let key = key.trim();
    if let Ok(index) = key.parse::<usize>() {
        return WEEK
            .get(index)
            .copied()
            .ok_or_else(|| ConfigError::UnknownWeekday(key.to_string()));
    }
    key.parse::<Weekday>()
        .map_err(|_| ConfigError::UnknownWeekday(key.to_string()))
}

#[cfg(test)]
pub(crate) mod fixtures {
    use super::StoreConfig;

    /// The restaurant's published hours, Sunday closed.
    pub const RESTAURANT_JSON: &str = r#"{
        "timezone": "Europe/London",
        "weekly": {
            "sunday":    { "open": "",      "close": "" },
            "monday":    { "open": "14:00", "close": "23:00" },
            "tuesday":   { "open": "14:00", "close": "23:00" },
            "wednesday": { "open": "14:00", "close": "23:00" },
            "thursday":  { "open": "14:00", "close": "23:00" },
            "friday":    { "open": "14:00", "close": "23:00" },
            "saturday":  { "open": "12:00", "close": "23:00" }
        },
        "holidays": [
            { "date": "2024-04-01", "name": "Easter Monday", "hours": "15:00-22:00" },
            { "date": "2024-05-01", "name": "Labor Day", "hours": "Closed" }
        ]
    }"#;

    pub fn restaurant() -> StoreConfig {
        StoreConfig::from_json(RESTAURANT_JSON).unwrap()
    }
}
