//! Event sources feeding the compiler.
//!
//! A source answers "which events does calendar X have in this window".
//! Several calendars are combined by plain concatenation before compiling.

mod ics;
mod json;
mod recurrence;

pub use ics::{IcsDirSource, parse_calendar};
pub use json::JsonResponseSource;

use tracing::warn;

use crate::date_range::DateRange;
use crate::error::OutageResult;
use crate::event::CalendarEvent;

/// Something that can list the events of a calendar for a time window.
pub trait EventSource {
    fn events(&self, calendar: &str, range: &DateRange) -> OutageResult<Vec<CalendarEvent>>;
}

/// Concatenate the events of every calendar in `calendars`.
///
/// A failing calendar fails the whole fetch: the error is logged and an empty
/// list is returned, so the compiled schedule falls back to all-powered.
pub fn aggregate_events<S: EventSource + ?Sized>(
    source: &S,
    calendars: &[String],
    range: &DateRange,
) -> Vec<CalendarEvent> {
    let mut all_events = Vec::new();

    for calendar in calendars {
        match source.events(calendar, range) {
            Ok(events) => all_events.extend(events),
            Err(e) => {
                warn!(calendar = %calendar, error = %e, "Error fetching calendar events");
                return Vec::new();
            }
        }
    }

    all_events
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::OutageError;
    use crate::event::EventTime;
    use chrono::{NaiveDate, Utc};
    use std::collections::HashMap;

    struct StaticSource(HashMap<String, Vec<CalendarEvent>>);

    impl EventSource for StaticSource {
        fn events(&self, calendar: &str, _range: &DateRange) -> OutageResult<Vec<CalendarEvent>> {
            self.0
                .get(calendar)
                .cloned()
                .ok_or_else(|| OutageError::CalendarNotFound(calendar.to_string()))
        }
    }

    fn event(summary: &str) -> CalendarEvent {
        let day = NaiveDate::from_ymd_opt(2025, 3, 20).unwrap();
        CalendarEvent::new(
            EventTime::Date(day),
            EventTime::Date(day.succ_opt().unwrap()),
            summary,
            None,
        )
    }

    fn source() -> StaticSource {
        StaticSource(HashMap::from([
            ("calendar.group_1".to_string(), vec![event("a"), event("b")]),
            ("calendar.group_2".to_string(), vec![event("c")]),
        ]))
    }

    fn range() -> DateRange {
        DateRange::forecast_window(NaiveDate::from_ymd_opt(2025, 3, 20).unwrap(), &Utc)
    }

    #[test]
    fn test_aggregate_concatenates_in_calendar_order() {
        let calendars = vec!["calendar.group_2".to_string(), "calendar.group_1".to_string()];

        let events = aggregate_events(&source(), &calendars, &range());

        let summaries: Vec<_> = events.iter().map(|e| e.summary.as_str()).collect();
        assert_eq!(summaries, vec!["c", "a", "b"]);
    }

    #[test]
    fn test_aggregate_failure_degrades_to_empty() {
        let calendars = vec!["calendar.group_1".to_string(), "calendar.missing".to_string()];

        let events = aggregate_events(&source(), &calendars, &range());

        assert!(events.is_empty());
    }

    #[test]
    fn test_aggregate_without_calendars() {
        assert!(aggregate_events(&source(), &[], &range()).is_empty());
    }
}
