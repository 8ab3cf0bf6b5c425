use chrono::{DateTime, Local, NaiveDateTime};
use chrono_tz::Tz;

/// Where "now" comes from. Returns the store's local wall-clock time.
pub trait Clock: Send + Sync {
    fn now(&self) -> NaiveDateTime;
}

/// The real clock, converted into the store's timezone.
#[derive(Copy, Clone, Debug)]
pub struct SystemClock {
    timezone: Tz,
}

impl SystemClock {
    pub fn new(timezone: Tz) -> Self {
        Self { timezone }
    }

    pub fn datetime_now(&self) -> DateTime<Tz> {
        Local::now().with_timezone(&self.timezone)
    }
}

impl Clock for SystemClock {
    fn now(&self) -> NaiveDateTime {
        self.datetime_now().naive_local()
    }
}

/// Always returns the same instant.
#[derive(Copy, Clone, Debug)]
pub struct FixedClock(pub NaiveDateTime);

impl Clock for FixedClock {
    fn now(&self) -> NaiveDateTime {
        self.0
    }
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};

    use super::*;

    #[test]
    fn fixed_clock_does_not_move() {
        let instant: NaiveDateTime = "2024-06-03T15:30:00".parse().unwrap();
        let clock = FixedClock(instant);
        assert_eq!(clock.now(), instant);
        assert_eq!(clock.now(), clock.now());
    }

    #[test]
    fn system_clock_reports_store_local_time() {
        let tz: Tz = "Asia/Tokyo".parse().unwrap();
        let clock = SystemClock::new(tz);
        let before = Utc::now().with_timezone(&tz).naive_local();
        let now = clock.now();
        let after = Utc::now().with_timezone(&tz).naive_local();
        assert!(before <= now && now <= after);
        assert_eq!(
            tz.from_local_datetime(&now).single().map(|dt| dt.naive_local()),
            Some(now)
        );
    }
}
