pub mod clock;
pub mod daily;
pub mod holiday;
pub mod schedule;
pub mod time_of_day;
