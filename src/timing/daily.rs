use serde::Serialize;

use crate::error::ConfigError;

use super::time_of_day::TimeOfDay;

/// A half-open `[opening, closing)` window within one day.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize)]
pub struct OpeningHours {
    #[serde(rename = "open")]
    opening: TimeOfDay,
    #[serde(rename = "close")]
    closing: TimeOfDay,
}

impl OpeningHours {
    pub fn new(opening: TimeOfDay, closing: TimeOfDay) -> Result<Self, ConfigError> {
        if opening >= closing {
            return Err(ConfigError::EmptyRange { opening, closing });
        }
        Ok(Self { opening, closing })
    }

    pub fn opening(&self) -> TimeOfDay {
        self.opening
    }

    pub fn closing(&self) -> TimeOfDay {
        self.closing
    }

    /// Opening is inclusive, closing is exclusive.
    pub fn contains(&self, time: TimeOfDay) -> bool {
        self.opening <= time && time < self.closing
    }
}

/// The regular hours for one weekday. `None` means closed all day.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Daily {
    hours: Option<OpeningHours>,
}

impl Daily {
    pub fn new_open(opening: TimeOfDay, closing: TimeOfDay) -> Result<Self, ConfigError> {
        Ok(Self {
            hours: Some(OpeningHours::new(opening, closing)?),
        })
    }

    pub fn new_closed() -> Self {
        Self { hours: None }
    }

    /// Builds a day from the `open`/`close` strings of the configuration file.
    /// Both empty marks the day as closed.
    pub fn from_strings(open: &str, close: &str) -> Result<Self, ConfigError> {
        match (open.trim(), close.trim()) {
            ("", "") => Ok(Self::new_closed()),
            ("", _) | (_, "") => Err(ConfigError::IncompleteHours {
                open: open.to_string(),
                close: close.to_string(),
            }),
            (open, close) => Self::new_open(open.parse()?, close.parse()?),
        }
    }

    #[cfg(test)]
    pub fn open(&self) -> bool {
        self.hours.is_some()
    }

    pub fn hours(&self) -> Option<OpeningHours> {
        self.hours
    }

    pub fn opening(&self) -> Option<TimeOfDay> {
        self.hours.map(|hours| hours.opening())
    }

    #[cfg(test)]
    pub fn closing(&self) -> Option<TimeOfDay> {
        self.hours.map(|hours| hours.closing())
    }
}
