//! Day schedule compiler.
//!
//! Turns a flat list of calendar events into the 24-slot hour grid for one
//! calendar day. The compiler is a pure function of `(events, date, now)`;
//! the timezone of `now` is the local calendar timezone of the grid.

use chrono::{DateTime, Days, NaiveDate, NaiveTime, TimeDelta, TimeZone, Timelike, Utc};
use tracing::{debug, trace};

use crate::event::{CalendarEvent, local_to_instant};
use crate::kind::{DayMarker, EventKind};
use crate::schedule::{DaySchedule, HourSlot, HourState, PartType, ScheduleStatus};

/// First and last instant of a calendar day in a given zone.
#[derive(Debug, Clone)]
pub struct DayBounds<Tz: TimeZone> {
    /// Local midnight.
    pub start: DateTime<Tz>,
    /// 23:59:59.999 local.
    pub end: DateTime<Tz>,
}

impl<Tz: TimeZone> DayBounds<Tz> {
    pub fn new(date: NaiveDate, tz: &Tz) -> Self {
        let start = local_to_instant(tz, date.and_time(NaiveTime::MIN));
        let next_midnight = local_to_instant(tz, (date + Days::new(1)).and_time(NaiveTime::MIN));

        DayBounds {
            start,
            end: next_midnight - TimeDelta::milliseconds(1),
        }
    }

    /// Whether `[start, end)` touches this day.
    pub fn overlaps(&self, start: &DateTime<Tz>, end: &DateTime<Tz>) -> bool {
        *start <= self.end && *end > self.start
    }
}

/// Compile `events` into the schedule for `date`.
///
/// `now` decides which slot is the current hour and supplies the timezone the
/// hours are counted in.
pub fn compile<Tz: TimeZone>(events: &[CalendarEvent], date: NaiveDate, now: &DateTime<Tz>) -> DaySchedule {
    let tz = now.timezone();
    let day = DayBounds::new(date, &tz);
    let mut schedule = DaySchedule::powered(date);

    for event in events {
        let (start, end) = event.interval(&tz);

        match EventKind::classify(event.description.as_deref()) {
            EventKind::Marker(marker) => {
                if day.overlaps(&start, &end) {
                    apply_marker(&mut schedule, marker);
                }
            }
            EventKind::Outage(certainty) => {
                if !day.overlaps(&start, &end) {
                    trace!(summary = %event.summary, "outage outside target day");
                    continue;
                }
                apply_outage(&mut schedule, &day, &start, &end, certainty.into());
            }
        }
    }

    // An unconfirmed schedule cannot promise any outage.
    if schedule.schedule_status == Some(ScheduleStatus::Waiting) {
        for slot in schedule.hours.iter_mut() {
            if slot.state == HourState::CertainOutage {
                slot.state = HourState::PossibleOutage;
            }
        }
    }

    if now.date_naive() == date {
        schedule.hours[now.hour() as usize].is_current = true;
    }

    schedule
}

/// [`compile`] against the wall clock, with hours counted in `tz`.
pub fn compile_now<Tz: TimeZone>(events: &[CalendarEvent], date: NaiveDate, tz: &Tz) -> DaySchedule {
    compile(events, date, &Utc::now().with_timezone(tz))
}

fn apply_marker(schedule: &mut DaySchedule, marker: DayMarker) {
    debug!(?marker, date = %schedule.date, "day marker");

    match marker {
        DayMarker::Emergency => schedule.emergency_outages = true,
        DayMarker::ScheduleApplies | DayMarker::WaitingForSchedule => {
            schedule.schedule_status = marker.schedule_status();
        }
        DayMarker::NotPlanned => {}
    }
}

fn apply_outage<Tz: TimeZone>(
    schedule: &mut DaySchedule,
    day: &DayBounds<Tz>,
    start: &DateTime<Tz>,
    end: &DateTime<Tz>,
    state: HourState,
) {
    let starts_inside = *start >= day.start;
    let effective_start = if starts_inside { start } else { &day.start };
    let effective_end = if *end > day.end { &day.end } else { end };

    let start_hour = effective_start.hour() as usize;
    let start_minute = effective_start.minute();

    // End times are exclusive: an outage ending at 14:00 last covers hour 13.
    let (end_hour, end_minute) = match (effective_end.hour() as usize, effective_end.minute()) {
        (0, 0) => (23, 59),
        (hour, 0) => (hour - 1, 59),
        (hour, minute) => (hour, minute),
    };

    let partial_start = starts_inside && start_minute > 0;
    let partial_end = end_minute > 0 && end_minute < 59;

    for (hour, slot) in schedule
        .hours
        .iter_mut()
        .enumerate()
        .take(end_hour + 1)
        .skip(start_hour)
    {
        *slot = if hour == start_hour && partial_start {
            HourSlot::partial(state, PartType::Start, 100 - minute_percentage(start_minute))
        } else if hour == end_hour && partial_end {
            HourSlot::partial(state, PartType::End, minute_percentage(end_minute))
        } else {
            HourSlot::outage(state)
        };
    }
}

/// Share of an hour elapsed at `minute`, rounded down.
fn minute_percentage(minute: u32) -> u8 {
    (minute * 100 / 60) as u8
}
