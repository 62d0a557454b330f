//! Events from a `calendar.get_events` service response.
//!
//! Home Assistant answers with one event list per calendar entity:
//!
//! ```json
//! { "response": { "calendar.group_1": { "events": [ ... ] } } }
//! ```
//!
//! The bare inner map (without `"response"`) is accepted as well.

use std::collections::HashMap;
use std::path::Path;

use serde::Deserialize;
use tracing::debug;

use super::EventSource;
use crate::date_range::DateRange;
use crate::error::OutageResult;
use crate::event::CalendarEvent;

#[derive(Debug, Deserialize)]
struct CalendarEvents {
    #[serde(default)]
    events: Vec<CalendarEvent>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ServiceResponse {
    Wrapped { response: HashMap<String, CalendarEvents> },
    Bare(HashMap<String, CalendarEvents>),
}

/// Event lists keyed by calendar id, loaded once from a service response.
#[derive(Debug, Clone, Default)]
pub struct JsonResponseSource {
    calendars: HashMap<String, Vec<CalendarEvent>>,
}

impl JsonResponseSource {
    pub fn parse(json: &str) -> OutageResult<Self> {
        let response: ServiceResponse = serde_json::from_str(json)?;

        let calendars = match response {
            ServiceResponse::Wrapped { response } | ServiceResponse::Bare(response) => response,
        };

        Ok(JsonResponseSource {
            calendars: calendars
                .into_iter()
                .map(|(id, list)| (id, list.events))
                .collect(),
        })
    }

    pub fn load(path: &Path) -> OutageResult<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::parse(&content)
    }

    /// Calendar ids present in the response, sorted.
    pub fn calendars(&self) -> Vec<String> {
        let mut ids: Vec<String> = self.calendars.keys().cloned().collect();
        ids.sort();
        ids
    }
}

impl EventSource for JsonResponseSource {
    /// A calendar missing from the response has no events.
    fn events(&self, calendar: &str, range: &DateRange) -> OutageResult<Vec<CalendarEvent>> {
        let Some(events) = self.calendars.get(calendar) else {
            debug!(calendar, "Calendar missing from response");
            return Ok(Vec::new());
        };

        Ok(events
            .iter()
            .filter(|event| range.may_contain(event))
            .cloned()
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compile::compile;
    use crate::schedule::{HourState, ScheduleStatus};
    use crate::source::aggregate_events;
    use chrono::{FixedOffset, NaiveDate, TimeZone};
    use serde_json::json;

    fn response() -> serde_json::Value {
        json!({
            "response": {
                "calendar.group_1": {
                    "events": [
                        {
                            "start": "2025-03-20T10:00:00+02:00",
                            "end": "2025-03-20T12:30:00+02:00",
                            "summary": "Outage",
                            "description": "Definite"
                        },
                        {
                            "start": "2025-03-20",
                            "end": "2025-03-21",
                            "summary": "Waiting",
                            "description": "waiting_for_schedule"
                        }
                    ]
                },
                "calendar.group_2": {
                    "events": [
                        {
                            "start": "2025-03-20T20:00:00+02:00",
                            "end": "2025-03-20T22:00:00+02:00",
                            "summary": "Outage"
                        },
                        {
                            "start": "2025-02-01T20:00:00+02:00",
                            "end": "2025-02-01T22:00:00+02:00",
                            "summary": "Long gone"
                        }
                    ]
                }
            }
        })
    }

    fn range() -> DateRange {
        DateRange::forecast_window(
            NaiveDate::from_ymd_opt(2025, 3, 20).unwrap(),
            &FixedOffset::east_opt(2 * 3600).unwrap(),
        )
    }

    #[test]
    fn test_parse_wrapped_and_bare_responses() {
        let wrapped = JsonResponseSource::parse(&response().to_string()).unwrap();
        let bare = JsonResponseSource::parse(&response()["response"].to_string()).unwrap();

        assert_eq!(wrapped.calendars(), vec!["calendar.group_1", "calendar.group_2"]);
        assert_eq!(bare.calendars(), wrapped.calendars());
    }

    #[test]
    fn test_events_filtered_to_range() {
        let source = JsonResponseSource::parse(&response().to_string()).unwrap();

        let events = source.events("calendar.group_2", &range()).unwrap();

        assert_eq!(events.len(), 1);
        assert!(source.events("calendar.unknown", &range()).unwrap().is_empty());
    }

    #[test]
    fn test_multi_calendar_schedule() {
        let source = JsonResponseSource::parse(&response().to_string()).unwrap();
        let calendars = source.calendars();
        let now = FixedOffset::east_opt(2 * 3600)
            .unwrap()
            .with_ymd_and_hms(2025, 3, 20, 11, 0, 0)
            .unwrap();

        let events = aggregate_events(&source, &calendars, &range());
        let schedule = compile(&events, now.date_naive(), &now);

        assert_eq!(schedule.schedule_status, Some(ScheduleStatus::Waiting));
        assert_eq!(schedule.hours[10].state, HourState::PossibleOutage);
        assert_eq!(schedule.hours[12].part_percentage, Some(50));
        assert_eq!(schedule.hours[20].state, HourState::PossibleOutage);
        assert_eq!(schedule.hours[22].state, HourState::Powered);
        assert_eq!(schedule.current_hour(), Some(11));
    }

    #[test]
    fn test_malformed_payload_is_an_error() {
        assert!(JsonResponseSource::parse("{\"response\": 42}").is_err());
    }
}
