use serde::Serialize;

use crate::{
    store::verdict::StatusVerdict,
    timing::{holiday::HolidayOverride, schedule::TimelineEntry},
};

/// The body of /api/hours.
///
/// Everything the hours page needs in one go: the live status, the week with today highlighted
/// and whatever holidays are still to come.
#[derive(Serialize, Clone)]
pub struct HoursResponse {
    timezone: String,
    status: StatusVerdict,
    week: Vec<TimelineEntry>,
    holidays: Vec<HolidayOverride>,
}

impl HoursResponse {
    pub fn new(
        timezone: String,
        status: StatusVerdict,
        week: Vec<TimelineEntry>,
        holidays: Vec<HolidayOverride>,
    ) -> Self {
        Self {
            timezone,
            status,
            week,
            holidays,
        }
    }
}
