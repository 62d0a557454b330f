//! Calendar event types consumed by the schedule compiler.
//!
//! Events arrive from an external calendar source (ICS files, a Home Assistant
//! `calendar.get_events` payload). Times keep the shape they had in the source
//! and are only pinned to an instant once a timezone is known.

use chrono::{DateTime, Days, LocalResult, NaiveDate, NaiveDateTime, NaiveTime, TimeDelta, TimeZone, Utc};
use serde::{Deserialize, Serialize};

/// A calendar event describing either an outage span or a day-level marker.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalendarEvent {
    pub start: EventTime,
    /// Exclusive end, as in iCalendar.
    pub end: EventTime,
    #[serde(default)]
    pub summary: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl CalendarEvent {
    pub fn new(start: EventTime, end: EventTime, summary: &str, description: Option<&str>) -> Self {
        CalendarEvent {
            start,
            end,
            summary: summary.to_string(),
            description: description.map(str::to_string),
        }
    }

    /// Start and end pinned to instants in `tz`.
    pub fn interval<Tz: TimeZone>(&self, tz: &Tz) -> (DateTime<Tz>, DateTime<Tz>) {
        (self.start.resolve(tz), self.end.resolve(tz))
    }
}

/// Start or end of an event.
///
/// Serialized as a single string: `YYYY-MM-DD` for all-day dates, RFC 3339 for
/// absolute times and `YYYY-MM-DDTHH:MM:SS` for floating local times.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum EventTime {
    /// All-day date, starting at local midnight.
    Date(NaiveDate),
    DateTimeUtc(DateTime<Utc>),
    /// Wall-clock time in whatever zone the schedule is compiled for.
    DateTimeFloating(NaiveDateTime),
    /// Wall-clock time in an IANA zone.
    DateTimeZoned { datetime: NaiveDateTime, tzid: String },
}

impl EventTime {
    /// Pin this time to an instant, expressed in `tz`.
    ///
    /// Zoned times with an unknown `tzid` are read as floating times.
    pub fn resolve<Tz: TimeZone>(&self, tz: &Tz) -> DateTime<Tz> {
        match self {
            EventTime::Date(date) => local_to_instant(tz, date.and_time(NaiveTime::MIN)),
            EventTime::DateTimeUtc(dt) => dt.with_timezone(tz),
            EventTime::DateTimeFloating(naive) => local_to_instant(tz, *naive),
            EventTime::DateTimeZoned { datetime, tzid } => match tzid.parse::<chrono_tz::Tz>() {
                Ok(zone) => local_to_instant(&zone, *datetime).with_timezone(tz),
                Err(_) => {
                    tracing::debug!(tzid = %tzid, "unknown TZID, treating time as floating");
                    local_to_instant(tz, *datetime)
                }
            },
        }
    }

    /// Whether the time is pinned to a zone regardless of where it is read.
    pub fn is_absolute(&self) -> bool {
        match self {
            EventTime::DateTimeUtc(_) => true,
            EventTime::DateTimeZoned { tzid, .. } => tzid.parse::<chrono_tz::Tz>().is_ok(),
            EventTime::Date(_) | EventTime::DateTimeFloating(_) => false,
        }
    }

    /// The same kind of time moved to the occurrence `dt` (used for recurrences).
    pub(crate) fn with_instant<Tz: TimeZone>(&self, dt: &DateTime<Tz>) -> EventTime {
        match self {
            EventTime::Date(_) => EventTime::Date(dt.date_naive()),
            EventTime::DateTimeUtc(_) => EventTime::DateTimeUtc(dt.with_timezone(&Utc)),
            EventTime::DateTimeFloating(_) => EventTime::DateTimeFloating(dt.naive_local()),
            EventTime::DateTimeZoned { tzid, .. } => EventTime::DateTimeZoned {
                datetime: dt.naive_local(),
                tzid: tzid.clone(),
            },
        }
    }

    /// Exclusive end of a one-day event starting at this time.
    pub(crate) fn next_day(&self) -> EventTime {
        match self {
            EventTime::Date(d) => EventTime::Date(*d + Days::new(1)),
            EventTime::DateTimeUtc(dt) => EventTime::DateTimeUtc(*dt + TimeDelta::days(1)),
            EventTime::DateTimeFloating(dt) => EventTime::DateTimeFloating(*dt + TimeDelta::days(1)),
            EventTime::DateTimeZoned { datetime, tzid } => EventTime::DateTimeZoned {
                datetime: *datetime + TimeDelta::days(1),
                tzid: tzid.clone(),
            },
        }
    }
}

impl TryFrom<String> for EventTime {
    type Error = String;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        let s = s.trim();

        if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
            return Ok(EventTime::DateTimeUtc(dt.with_timezone(&Utc)));
        }
        if let Ok(date) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
            return Ok(EventTime::Date(date));
        }
        for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M"] {
            if let Ok(naive) = NaiveDateTime::parse_from_str(s, format) {
                return Ok(EventTime::DateTimeFloating(naive));
            }
        }

        Err(format!(
            "Invalid event time '{}'. Expected RFC 3339, YYYY-MM-DD or YYYY-MM-DDTHH:MM:SS",
            s
        ))
    }
}

impl From<EventTime> for String {
    fn from(time: EventTime) -> Self {
        match time {
            EventTime::Date(d) => d.format("%Y-%m-%d").to_string(),
            EventTime::DateTimeUtc(dt) => dt.to_rfc3339(),
            EventTime::DateTimeFloating(naive) => naive.format("%Y-%m-%dT%H:%M:%S").to_string(),
            EventTime::DateTimeZoned { datetime, tzid } => match tzid.parse::<chrono_tz::Tz>() {
                Ok(zone) => local_to_instant(&zone, datetime).to_rfc3339(),
                Err(_) => datetime.format("%Y-%m-%dT%H:%M:%S").to_string(),
            },
        }
    }
}

/// Map a wall-clock time in `tz` to an instant.
///
/// Ambiguous times (DST fall-back) take the earlier instant; times inside a
/// DST gap are moved forward by an hour.
pub(crate) fn local_to_instant<Tz: TimeZone>(tz: &Tz, naive: NaiveDateTime) -> DateTime<Tz> {
    match tz.from_local_datetime(&naive) {
        LocalResult::Single(dt) => dt,
        LocalResult::Ambiguous(earliest, _) => earliest,
        LocalResult::None => tz
            .from_local_datetime(&(naive + TimeDelta::hours(1)))
            .earliest()
            .unwrap_or_else(|| tz.from_utc_datetime(&naive)),
    }
}
