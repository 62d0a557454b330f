//! Classification of raw events into day markers and outage intervals.
//!
//! Outage calendars overload the event description: it either names a
//! day-level marker or the certainty of an outage span. Events are split into
//! [`EventKind`] before any hour grid logic runs.

use crate::schedule::{HourState, ScheduleStatus};

/// Day-level annotations carried by sentinel descriptions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DayMarker {
    /// `emergency_shutdowns`
    Emergency,
    /// `schedule_applies`
    ScheduleApplies,
    /// `waiting_for_schedule`
    WaitingForSchedule,
    /// `notplanned` / `not_planned`; informational only.
    NotPlanned,
}

impl DayMarker {
    fn from_description(description: &str) -> Option<Self> {
        match description {
            "emergency_shutdowns" => Some(DayMarker::Emergency),
            "schedule_applies" => Some(DayMarker::ScheduleApplies),
            "waiting_for_schedule" => Some(DayMarker::WaitingForSchedule),
            "notplanned" | "not_planned" => Some(DayMarker::NotPlanned),
            _ => None,
        }
    }

    /// Schedule status implied by this marker, if any.
    pub fn schedule_status(self) -> Option<ScheduleStatus> {
        match self {
            DayMarker::ScheduleApplies => Some(ScheduleStatus::Applies),
            DayMarker::WaitingForSchedule => Some(ScheduleStatus::Waiting),
            DayMarker::Emergency | DayMarker::NotPlanned => None,
        }
    }
}

/// How sure the calendar is that an outage will happen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Certainty {
    Certain,
    Possible,
}

impl From<Certainty> for HourState {
    fn from(certainty: Certainty) -> Self {
        match certainty {
            Certainty::Certain => HourState::CertainOutage,
            Certainty::Possible => HourState::PossibleOutage,
        }
    }
}

/// What a single calendar event means for the schedule.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventKind {
    Marker(DayMarker),
    Outage(Certainty),
}

impl EventKind {
    /// Classify an event by its description.
    ///
    /// Marker names match the lower-cased description exactly. Anything else is
    /// an outage; it is possible when its letters spell `possible` or `probable`
    /// and certain otherwise (including a missing description).
    pub fn classify(description: Option<&str>) -> Self {
        let description = description.unwrap_or_default().to_lowercase();

        if let Some(marker) = DayMarker::from_description(&description) {
            return EventKind::Marker(marker);
        }

        let letters: String = description
            .chars()
            .filter(|c| c.is_ascii_lowercase())
            .collect();

        match letters.as_str() {
            "possible" | "probable" => EventKind::Outage(Certainty::Possible),
            _ => EventKind::Outage(Certainty::Certain),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_markers_match_case_insensitively() {
        assert_eq!(
            EventKind::classify(Some("Emergency_Shutdowns")),
            EventKind::Marker(DayMarker::Emergency)
        );
        assert_eq!(
            EventKind::classify(Some("SCHEDULE_APPLIES")),
            EventKind::Marker(DayMarker::ScheduleApplies)
        );
        assert_eq!(
            EventKind::classify(Some("waiting_for_schedule")),
            EventKind::Marker(DayMarker::WaitingForSchedule)
        );
    }

    #[test]
    fn test_both_not_planned_spellings() {
        for desc in ["notplanned", "not_planned", "NotPlanned"] {
            assert_eq!(
                EventKind::classify(Some(desc)),
                EventKind::Marker(DayMarker::NotPlanned),
                "{desc} should be a marker"
            );
        }
    }

    #[test]
    fn test_marker_requires_exact_text() {
        // Non-letter stripping only applies to certainty, not to marker names.
        assert_eq!(
            EventKind::classify(Some(" not planned ")),
            EventKind::Outage(Certainty::Certain)
        );
    }

    #[test]
    fn test_possible_and_probable_ignore_punctuation() {
        for desc in ["possible", "Possible.", "PROBABLE", " probable! ", "possible_"] {
            assert_eq!(
                EventKind::classify(Some(desc)),
                EventKind::Outage(Certainty::Possible),
                "{desc} should be possible"
            );
        }
    }

    #[test]
    fn test_everything_else_is_certain() {
        for desc in [Some("Definite"), Some(""), Some("possibly"), Some("Можливе"), None] {
            assert_eq!(
                EventKind::classify(desc),
                EventKind::Outage(Certainty::Certain),
                "{desc:?} should be certain"
            );
        }
    }

    #[test]
    fn test_marker_schedule_status() {
        assert_eq!(
            DayMarker::WaitingForSchedule.schedule_status(),
            Some(ScheduleStatus::Waiting)
        );
        assert_eq!(
            DayMarker::ScheduleApplies.schedule_status(),
            Some(ScheduleStatus::Applies)
        );
        assert_eq!(DayMarker::Emergency.schedule_status(), None);
    }
}
