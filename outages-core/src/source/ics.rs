//! Outage calendars stored as .ics files, one directory per calendar.

use std::path::{Path, PathBuf};

use chrono::Utc;
use icalendar::{
    DatePerhapsTime,
    parser::{Component, Property, read_calendar, unfold},
};
use tracing::{debug, warn};

use super::EventSource;
use super::recurrence::{Recurrence, expand_recurring_event};
use crate::date_range::DateRange;
use crate::error::{OutageError, OutageResult};
use crate::event::{CalendarEvent, EventTime};

/// Reads `<root>/<calendar>/*.ics`.
#[derive(Debug, Clone)]
pub struct IcsDirSource {
    root: PathBuf,
}

impl IcsDirSource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        IcsDirSource { root: root.into() }
    }

    pub fn calendar_path(&self, calendar: &str) -> PathBuf {
        self.root.join(calendar)
    }

    /// Calendar ids found under the root, sorted.
    pub fn calendars(&self) -> Vec<String> {
        let Ok(entries) = std::fs::read_dir(&self.root) else {
            return Vec::new();
        };

        let mut calendars: Vec<String> = entries
            .filter_map(|entry| entry.ok())
            .map(|entry| entry.path())
            .filter(|path| path.is_dir())
            .filter_map(|path| path.file_name().and_then(|n| n.to_str()).map(str::to_string))
            .filter(|name| !name.starts_with('.'))
            .collect();

        calendars.sort();
        calendars
    }

    fn ics_files(dir: &Path) -> OutageResult<Vec<PathBuf>> {
        let mut paths: Vec<PathBuf> = std::fs::read_dir(dir)?
            .filter_map(|entry| entry.ok())
            .map(|entry| entry.path())
            .filter(|path| path.extension().is_some_and(|ext| ext == "ics"))
            .collect();

        paths.sort();
        Ok(paths)
    }
}

impl EventSource for IcsDirSource {
    fn events(&self, calendar: &str, range: &DateRange) -> OutageResult<Vec<CalendarEvent>> {
        let dir = self.calendar_path(calendar);
        if !dir.is_dir() {
            return Err(OutageError::CalendarNotFound(calendar.to_string()));
        }

        let mut entries = Vec::new();
        for path in Self::ics_files(&dir)? {
            let content = match std::fs::read_to_string(&path) {
                Ok(content) => content,
                Err(e) => {
                    warn!(path = %path.display(), error = %e, "Skipping unreadable event file");
                    continue;
                }
            };
            match parse_entries(&content) {
                Ok(parsed) => entries.extend(parsed),
                Err(e) => warn!(path = %path.display(), error = %e, "Skipping unreadable event file"),
            }
        }

        let events = expand_entries(entries, range);
        debug!(calendar, count = events.len(), "Loaded calendar events");
        Ok(events)
    }
}

/// Parse ICS content into the events that may fall inside `range`.
///
/// Recurring events are expanded into their occurrences; instances carrying a
/// `RECURRENCE-ID` replace the occurrence they override. A recurring event
/// whose rule cannot be expanded is skipped with a warning.
pub fn parse_calendar(content: &str, range: &DateRange) -> OutageResult<Vec<CalendarEvent>> {
    Ok(expand_entries(parse_entries(content)?, range))
}

/// A VEVENT together with the fields needed to expand recurrences.
#[derive(Debug, Clone)]
struct IcsEntry {
    uid: Option<String>,
    event: CalendarEvent,
    recurrence: Option<Recurrence>,
    recurrence_id: Option<EventTime>,
}

fn parse_entries(content: &str) -> OutageResult<Vec<IcsEntry>> {
    let unfolded = unfold(content);
    let calendar = read_calendar(&unfolded).map_err(|e| OutageError::IcsParse(e.to_string()))?;

    calendar
        .components
        .iter()
        .filter(|c| c.name == "VEVENT")
        .map(parse_vevent)
        .collect()
}

fn parse_vevent(vevent: &Component) -> OutageResult<IcsEntry> {
    let uid = vevent.find_prop("UID").map(|p| p.val.to_string());
    let summary = vevent
        .find_prop("SUMMARY")
        .map(|p| p.val.to_string())
        .unwrap_or_default();
    let description = vevent.find_prop("DESCRIPTION").map(|p| p.val.to_string());

    let start = vevent
        .find_prop("DTSTART")
        .and_then(|p| DatePerhapsTime::try_from(p).ok())
        .map(to_event_time)
        .ok_or_else(|| {
            OutageError::IcsParse(format!(
                "Event '{}' has no valid DTSTART",
                uid.as_deref().unwrap_or(&summary)
            ))
        })?;

    // Without DTEND an all-day event lasts one day and a timed one is instantaneous.
    let end = match vevent
        .find_prop("DTEND")
        .and_then(|p| DatePerhapsTime::try_from(p).ok())
    {
        Some(dpt) => to_event_time(dpt),
        None => match start {
            EventTime::Date(_) => start.next_day(),
            _ => start.clone(),
        },
    };

    let rrule = vevent.find_prop("RRULE").map(|p| p.val.to_string());
    let exdates: Vec<EventTime> = vevent
        .properties
        .iter()
        .filter(|p| p.name == "EXDATE")
        .flat_map(parse_exdate_property)
        .collect();
    let recurrence = rrule.map(|rrule| Recurrence { rrule, exdates });

    let recurrence_id = vevent
        .find_prop("RECURRENCE-ID")
        .and_then(|p| DatePerhapsTime::try_from(p).ok())
        .map(to_event_time);

    Ok(IcsEntry {
        uid,
        event: CalendarEvent {
            start,
            end,
            summary,
            description,
        },
        recurrence,
        recurrence_id,
    })
}

fn expand_entries(entries: Vec<IcsEntry>, range: &DateRange) -> Vec<CalendarEvent> {
    let (masters, singles): (Vec<_>, Vec<_>) =
        entries.into_iter().partition(|e| e.recurrence.is_some());

    let mut events = Vec::new();

    for master in &masters {
        let Some(recurrence) = &master.recurrence else {
            continue;
        };

        // Occurrences replaced by an override instance of the same event
        let overridden: Vec<_> = singles
            .iter()
            .filter(|s| s.uid.is_some() && s.uid == master.uid)
            .filter_map(|s| s.recurrence_id.as_ref())
            .map(|id| id.resolve(&Utc))
            .collect();

        let occurrences = match expand_recurring_event(&master.event, recurrence, range) {
            Ok(occurrences) => occurrences,
            Err(e) => {
                warn!(summary = %master.event.summary, error = %e, "Skipping recurring event");
                continue;
            }
        };
        events.extend(
            occurrences
                .into_iter()
                .filter(|occ| !overridden.contains(&occ.start.resolve(&Utc))),
        );
    }

    events.extend(singles.into_iter().map(|s| s.event));
    events.retain(|event| range.may_contain(event));
    events
}

/// Convert icalendar's DatePerhapsTime to our EventTime, preserving timezone info
fn to_event_time(dpt: DatePerhapsTime) -> EventTime {
    match dpt {
        DatePerhapsTime::Date(d) => EventTime::Date(d),
        DatePerhapsTime::DateTime(cal_dt) => match cal_dt {
            icalendar::CalendarDateTime::Utc(dt) => EventTime::DateTimeUtc(dt),
            icalendar::CalendarDateTime::Floating(naive) => EventTime::DateTimeFloating(naive),
            icalendar::CalendarDateTime::WithTimezone { date_time, tzid } => {
                EventTime::DateTimeZoned {
                    datetime: date_time,
                    tzid,
                }
            }
        },
    }
}

/// Parse an EXDATE property into a list of EventTime values.
///
/// Handles `TZID=`, `VALUE=DATE`, UTC and floating values, comma-separated.
fn parse_exdate_property(prop: &Property) -> Vec<EventTime> {
    let tzid = prop
        .params
        .iter()
        .find(|p| p.key == "TZID")
        .and_then(|p| p.val.as_ref().map(|v| v.to_string()));

    let is_date = prop
        .params
        .iter()
        .any(|p| p.key == "VALUE" && p.val.as_ref().map(|v| v.as_ref()) == Some("DATE"));

    prop.val
        .as_ref()
        .split(',')
        .filter_map(|s| {
            let s = s.trim();
            if s.is_empty() {
                return None;
            }
            if is_date {
                chrono::NaiveDate::parse_from_str(s, "%Y%m%d")
                    .ok()
                    .map(EventTime::Date)
            } else if let Some(ref tz) = tzid {
                chrono::NaiveDateTime::parse_from_str(s, "%Y%m%dT%H%M%S")
                    .ok()
                    .map(|dt| EventTime::DateTimeZoned {
                        datetime: dt,
                        tzid: tz.clone(),
                    })
            } else if let Some(s) = s.strip_suffix('Z') {
                chrono::NaiveDateTime::parse_from_str(s, "%Y%m%dT%H%M%S")
                    .ok()
                    .map(|dt| EventTime::DateTimeUtc(dt.and_utc()))
            } else {
                chrono::NaiveDateTime::parse_from_str(s, "%Y%m%dT%H%M%S")
                    .ok()
                    .map(EventTime::DateTimeFloating)
            }
        })
        .collect()
}
