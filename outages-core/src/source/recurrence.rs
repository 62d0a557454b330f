//! RRULE expansion for recurring outage events.

use chrono::{TimeDelta, Utc};
use rrule::RRuleSet;

use crate::date_range::DateRange;
use crate::error::{OutageError, OutageResult};
use crate::event::{CalendarEvent, EventTime};

/// Upper bound on occurrences generated for one master event.
const MAX_OCCURRENCES: u16 = 365;

/// RRULE and EXDATE lines of a recurring master event.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Recurrence {
    pub rrule: String,
    pub exdates: Vec<EventTime>,
}

/// Build an iCalendar-format RRULE string for the rrule crate parser.
fn build_rrule_string(start: &EventTime, recurrence: &Recurrence) -> String {
    let mut lines = vec![format!("DTSTART{}", rrule_time(start))];

    lines.push(format!("RRULE:{}", recurrence.rrule));

    for exdate in &recurrence.exdates {
        lines.push(format!("EXDATE{}", rrule_time(exdate)));
    }

    lines.join("\n")
}

/// Parameters and value of a DTSTART/EXDATE line.
///
/// The rrule crate needs datetimes, so all-day dates become midnight UTC and
/// floating times are read as UTC.
fn rrule_time(time: &EventTime) -> String {
    match time {
        EventTime::Date(d) => format!(":{}T000000Z", d.format("%Y%m%d")),
        EventTime::DateTimeUtc(dt) => format!(":{}", dt.format("%Y%m%dT%H%M%SZ")),
        EventTime::DateTimeFloating(dt) => format!(":{}Z", dt.format("%Y%m%dT%H%M%S")),
        EventTime::DateTimeZoned { datetime, tzid } => {
            format!(";TZID={}:{}", tzid, datetime.format("%Y%m%dT%H%M%S"))
        }
    }
}

/// Expand a recurring master event into the occurrences that may touch `range`.
///
/// Each occurrence keeps the master's summary, description and duration.
pub(crate) fn expand_recurring_event(
    master: &CalendarEvent,
    recurrence: &Recurrence,
    range: &DateRange,
) -> OutageResult<Vec<CalendarEvent>> {
    let rrule_str = build_rrule_string(&master.start, recurrence);

    let rrule_set: RRuleSet = rrule_str.parse().map_err(|e| {
        OutageError::Recurrence(format!(
            "Failed to parse RRULE for event '{}': {}",
            master.summary, e
        ))
    })?;

    let duration = master.end.resolve(&Utc) - master.start.resolve(&Utc);

    // Occurrences starting up to one duration before the window still overlap
    // it; the extra day covers all-day and floating times.
    let slack = TimeDelta::days(1);
    let tz: rrule::Tz = Utc.into();
    let after = (range.from - duration - slack).with_timezone(&tz);
    let before = (range.to + slack).with_timezone(&tz);

    let result = rrule_set.after(after).before(before).all(MAX_OCCURRENCES);
    if result.limited {
        tracing::warn!(
            summary = %master.summary,
            "Recurring event hit the occurrence limit of {}",
            MAX_OCCURRENCES
        );
    }

    Ok(result
        .dates
        .iter()
        .map(|occurrence| CalendarEvent {
            start: master.start.with_instant(occurrence),
            end: master.end.with_instant(&(*occurrence + duration)),
            summary: master.summary.clone(),
            description: master.description.clone(),
        })
        .collect())
}
