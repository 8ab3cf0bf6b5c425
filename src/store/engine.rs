use chrono::{Datelike, Days, NaiveDate, NaiveDateTime, Weekday};

use crate::timing::{
    clock::Clock,
    daily::OpeningHours,
    holiday::HolidayHours,
    schedule::weekday_name,
    time_of_day::TimeOfDay,
};

use super::{config::StoreConfig, verdict::StatusVerdict};

/// Works out whether the store is open at a given instant.
///
/// The engine only holds its configuration, which never changes after construction, so one
/// instance can be shared between the ticker and any number of request handlers.
#[derive(Debug)]
pub struct StoreStatusEngine {
    config: StoreConfig,
}

impl StoreStatusEngine {
    pub fn new(config: StoreConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    pub fn status_now(&self, clock: &dyn Clock) -> StatusVerdict {
        self.compute_status(clock.now())
    }

    /// `now` is the store's local wall-clock time.
    ///
    /// A holiday on `now`'s date replaces the weekly hours entirely. Otherwise the weekday's
    /// regular hours apply. Open hours are checked as `[open, close)`.
    pub fn compute_status(&self, now: NaiveDateTime) -> StatusVerdict {
        let date = now.date();

        if let Some(holiday) = self.config.holidays().get(date) {
            return match holiday.hours() {
                HolidayHours::Closed => StatusVerdict::closed(format!("Holiday: {}", holiday.name())),
                HolidayHours::Open(hours) => self.check_hours(now, hours, Some(holiday.name())),
            };
        }

        let weekday = date.weekday();
        match self.config.schedule().day(weekday).hours() {
            None => StatusVerdict::closed(closed_day_message(weekday)),
            Some(hours) => self.check_hours(now, hours, None),
        }
    }

    fn check_hours(
        &self,
        now: NaiveDateTime,
        hours: OpeningHours,
        note: Option<&str>,
    ) -> StatusVerdict {
        if hours.contains(TimeOfDay::from_time(&now)) {
            let detail = format!("Open until {}", hours.closing());
            return match note {
                Some(note) => StatusVerdict::open(format!("{}: {}", note, detail)),
                None => StatusVerdict::open(detail),
            };
        }
        StatusVerdict::closed(format!("Opens {}", self.next_opening_description(now)))
    }

    /// Describes when the store opens next, e.g. "tomorrow at 14:00".
    ///
    /// Looks at most `lookahead_days` days past `now`'s date. When nothing in that window opens
    /// the answer comes from the day after `now` alone.
    pub fn next_opening_description(&self, now: NaiveDateTime) -> String {
        let today = now.date();

        for offset in 1..=self.config.lookahead_days() {
            let Some(date) = today.checked_add_days(Days::new(offset as u64)) else {
                break;
            };
            if let Some(hours) = self.hours_on(date) {
                return if offset == 1 {
                    format!("tomorrow at {}", hours.opening())
                } else {
                    format!("on {} at {}", weekday_name(date.weekday()), hours.opening())
                };
            }
        }

        self.fallback_description(today)
    }

    /// The hours that apply on `date`, holidays included. `None` if closed all day.
    pub fn hours_on(&self, date: NaiveDate) -> Option<OpeningHours> {
        match self.config.holidays().get(date) {
            Some(holiday) => match holiday.hours() {
                HolidayHours::Closed => None,
                HolidayHours::Open(hours) => Some(hours),
            },
            None => self.config.schedule().day(date.weekday()).hours(),
        }
    }

    fn fallback_description(&self, today: NaiveDate) -> String {
        let Some(tomorrow) = today.succ_opt() else {
            return "when regular hours resume".to_string();
        };
        if let Some(holiday) = self.config.holidays().get(tomorrow) {
            if holiday.hours() == HolidayHours::Closed {
                return "after the holiday".to_string();
            }
        }
        match self.config.schedule().next_open_after(tomorrow.weekday()) {
            Some((weekday, opening)) => format!("on {} at {}", weekday_name(weekday), opening),
            None => "when regular hours resume".to_string(),
        }
    }
}

fn closed_day_message(weekday: Weekday) -> String {
    format!("We are closed on {}s", weekday_name(weekday))
}
