use chrono::Weekday;
use serde::Serialize;

use super::{
    daily::{Daily, OpeningHours},
    time_of_day::TimeOfDay,
};

/// Sunday first, matching `Weekday::num_days_from_sunday`.
pub const WEEK: [Weekday; 7] = [
    Weekday::Sun,
    Weekday::Mon,
    Weekday::Tue,
    Weekday::Wed,
    Weekday::Thu,
    Weekday::Fri,
    Weekday::Sat,
];

pub fn weekday_name(weekday: Weekday) -> &'static str {
    match weekday {
        Weekday::Mon => "Monday",
        Weekday::Tue => "Tuesday",
        Weekday::Wed => "Wednesday",
        Weekday::Thu => "Thursday",
        Weekday::Fri => "Friday",
        Weekday::Sat => "Saturday",
        Weekday::Sun => "Sunday",
    }
}

/// The regular opening hours for every day of the week.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct WeeklySchedule {
    timings: [Daily; 7],
}

/// One row of the weekly timeline shown on the hours page.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct TimelineEntry {
    pub day: &'static str,
    pub day_index: u32,
    pub hours: Option<OpeningHours>,
    pub current: bool,
}

impl WeeklySchedule {
    /// `timings[0]` is Sunday, `timings[6]` is Saturday.
    pub fn new(timings: [Daily; 7]) -> Self {
        Self { timings }
    }

    /// Builds a schedule by asking for each weekday in turn.
    pub fn from_fn<E>(mut timing: impl FnMut(Weekday) -> Result<Daily, E>) -> Result<Self, E> {
        let mut timings = [Daily::new_closed(); 7];
        for weekday in WEEK {
            timings[weekday.num_days_from_sunday() as usize] = timing(weekday)?;
        }
        Ok(Self::new(timings))
    }

    pub fn day(&self, weekday: Weekday) -> &Daily {
        &self.timings[weekday.num_days_from_sunday() as usize]
    }

    /// The first weekday strictly after `weekday` that opens, together with its opening time.
    /// Wraps around the week, so `weekday` itself is checked last.
    pub fn next_open_after(&self, weekday: Weekday) -> Option<(Weekday, TimeOfDay)> {
        let mut day = weekday;
        for _ in 0..7 {
            day = day.succ();
            if let Some(opening) = self.day(day).opening() {
                return Some((day, opening));
            }
        }
        None
    }

    pub fn timeline(&self, today: Weekday) -> Vec<TimelineEntry> {
        WEEK.iter()
            .map(|&weekday| TimelineEntry {
                day: weekday_name(weekday),
                day_index: weekday.num_days_from_sunday(),
                hours: self.day(weekday).hours(),
                current: weekday == today,
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn open(open: &str, close: &str) -> Daily {
        Daily::from_strings(open, close).unwrap()
    }

    fn restaurant() -> WeeklySchedule {
        WeeklySchedule::from_fn::<()>(|weekday| {
            Ok(match weekday {
                Weekday::Sun => Daily::new_closed(),
                Weekday::Sat => open("12:00", "23:00"),
                _ => open("14:00", "23:00"),
            })
        })
        .unwrap()
    }

    #[test]
    fn indexes_by_weekday() {
        let schedule = restaurant();
        assert!(!schedule.day(Weekday::Sun).open());
        assert_eq!(
            schedule.day(Weekday::Sat).opening().unwrap().to_string(),
            "12:00"
        );
        assert_eq!(
            schedule.day(Weekday::Mon).opening().unwrap().to_string(),
            "14:00"
        );
    }

    #[test]
    fn next_open_skips_closed_days() {
        let schedule = restaurant();
        let (day, opening) = schedule.next_open_after(Weekday::Sat).unwrap();
        assert_eq!(day, Weekday::Mon);
        assert_eq!(opening.to_string(), "14:00");

        let (day, opening) = schedule.next_open_after(Weekday::Fri).unwrap();
        assert_eq!(day, Weekday::Sat);
        assert_eq!(opening.to_string(), "12:00");
    }

    #[test]
    fn next_open_wraps_to_same_day() {
        let mut timings = [Daily::new_closed(); 7];
        timings[3] = open("09:00", "17:00");
        let schedule = WeeklySchedule::new(timings);
        let (day, _) = schedule.next_open_after(Weekday::Wed).unwrap();
        assert_eq!(day, Weekday::Wed);
    }

    #[test]
    fn next_open_is_none_when_always_closed() {
        let schedule = WeeklySchedule::new([Daily::new_closed(); 7]);
        assert_eq!(schedule.next_open_after(Weekday::Mon), None);
    }

    #[test]
    fn timeline_flags_the_current_day() {
        let timeline = restaurant().timeline(Weekday::Tue);
        assert_eq!(timeline.len(), 7);
        assert_eq!(timeline[0].day, "Sunday");
        assert!(timeline[0].hours.is_none());
        let current: Vec<_> = timeline.iter().filter(|entry| entry.current).collect();
        assert_eq!(current.len(), 1);
        assert_eq!(current[0].day, "Tuesday");
        assert_eq!(current[0].day_index, 2);
    }
}
