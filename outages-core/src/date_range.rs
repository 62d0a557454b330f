//! Time windows for fetching events.

use chrono::{DateTime, Days, NaiveDate, NaiveTime, TimeDelta, TimeZone, Utc};

use crate::event::{CalendarEvent, local_to_instant};

/// Number of days fetched for a forecast (today and tomorrow).
pub const FORECAST_DAYS: u64 = 2;

/// Half-open window `[from, to)` used to ask a source for events.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DateRange {
    pub from: DateTime<Utc>,
    pub to: DateTime<Utc>,
}

impl DateRange {
    pub fn new(from: DateTime<Utc>, to: DateTime<Utc>) -> Self {
        DateRange { from, to }
    }

    /// Local midnight of `today` up to local midnight `FORECAST_DAYS` later.
    pub fn forecast_window<Tz: TimeZone>(today: NaiveDate, tz: &Tz) -> Self {
        let from = local_to_instant(tz, today.and_time(NaiveTime::MIN));
        let to = local_to_instant(tz, (today + Days::new(FORECAST_DAYS)).and_time(NaiveTime::MIN));

        DateRange {
            from: from.with_timezone(&Utc),
            to: to.with_timezone(&Utc),
        }
    }

    /// Whether `event` may fall inside the window.
    ///
    /// All-day and floating times depend on the zone they are read in, so they
    /// are compared with a day of slack on both sides.
    pub fn may_contain(&self, event: &CalendarEvent) -> bool {
        let (start, end) = event.interval(&Utc);

        if event.start.is_absolute() && event.end.is_absolute() {
            start < self.to && end > self.from
        } else {
            let slack = TimeDelta::days(1);
            start < self.to + slack && end > self.from - slack
        }
    }

    /// Get `from` as RFC3339 string.
    pub fn from_rfc3339(&self) -> String {
        self.from.to_rfc3339()
    }

    /// Get `to` as RFC3339 string.
    pub fn to_rfc3339(&self) -> String {
        self.to.to_rfc3339()
    }
}

/// Resolve a day argument relative to `today`.
/// - `today` / `tomorrow`
/// - `YYYY-MM-DD`
pub fn parse_day(s: &str, today: NaiveDate) -> Result<NaiveDate, String> {
    match s {
        "today" => Ok(today),
        "tomorrow" => Ok(today + Days::new(1)),
        _ => NaiveDate::parse_from_str(s, "%Y-%m-%d").map_err(|_| {
            format!(
                "Invalid date '{}'. Expected today, tomorrow or YYYY-MM-DD",
                s
            )
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::EventTime;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 7, 1).unwrap()
    }

    #[test]
    fn test_forecast_window_covers_two_local_days() {
        let range = DateRange::forecast_window(today(), &chrono_tz::Europe::Kyiv);

        assert_eq!(range.from_rfc3339(), "2025-06-30T21:00:00+00:00");
        assert_eq!(range.to_rfc3339(), "2025-07-02T21:00:00+00:00");
    }

    #[test]
    fn test_may_contain_absolute_events() {
        let range = DateRange::forecast_window(today(), &Utc);
        let inside = CalendarEvent::new(
            EventTime::DateTimeUtc(Utc.with_ymd_and_hms(2025, 7, 1, 10, 0, 0).unwrap()),
            EventTime::DateTimeUtc(Utc.with_ymd_and_hms(2025, 7, 1, 12, 0, 0).unwrap()),
            "Outage",
            None,
        );
        let ends_at_window_start = CalendarEvent::new(
            EventTime::DateTimeUtc(Utc.with_ymd_and_hms(2025, 6, 30, 20, 0, 0).unwrap()),
            EventTime::DateTimeUtc(Utc.with_ymd_and_hms(2025, 7, 1, 0, 0, 0).unwrap()),
            "Outage",
            None,
        );

        assert!(range.may_contain(&inside));
        assert!(!range.may_contain(&ends_at_window_start));
    }

    #[test]
    fn test_may_contain_keeps_nearby_all_day_events() {
        let range = DateRange::forecast_window(today(), &Utc);
        let day_before = CalendarEvent::new(
            EventTime::Date(NaiveDate::from_ymd_opt(2025, 6, 30).unwrap()),
            EventTime::Date(today()),
            "Marker",
            Some("schedule_applies"),
        );
        let last_week = CalendarEvent::new(
            EventTime::Date(NaiveDate::from_ymd_opt(2025, 6, 20).unwrap()),
            EventTime::Date(NaiveDate::from_ymd_opt(2025, 6, 21).unwrap()),
            "Marker",
            Some("schedule_applies"),
        );

        assert!(range.may_contain(&day_before));
        assert!(!range.may_contain(&last_week));
    }

    #[test]
    fn test_parse_day() {
        assert_eq!(parse_day("today", today()), Ok(today()));
        assert_eq!(
            parse_day("tomorrow", today()),
            Ok(NaiveDate::from_ymd_opt(2025, 7, 2).unwrap())
        );
        assert_eq!(
            parse_day("2025-12-31", today()),
            Ok(NaiveDate::from_ymd_opt(2025, 12, 31).unwrap())
        );
        assert!(parse_day("next week", today()).is_err());
    }
}
