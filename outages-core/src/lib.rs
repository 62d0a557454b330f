//! Power-outage day schedules from calendar events.
//!
//! - `event` / `kind`: raw calendar events and their classification into
//!   day markers and outage intervals
//! - `compile`: the event-to-schedule compiler producing a 24-slot hour grid
//! - `forecast`: today/tomorrow schedules from a single fetch
//! - `source`: event sources (.ics directories, service responses) and
//!   multi-calendar aggregation
//! - `config`: global configuration

pub mod compile;
pub mod config;
pub mod date_range;
pub mod error;
pub mod event;
pub mod forecast;
pub mod kind;
pub mod schedule;
pub mod source;

pub use compile::{compile, compile_now};
pub use error::{OutageError, OutageResult};
pub use event::{CalendarEvent, EventTime};
pub use forecast::{DayTab, Forecast};
pub use schedule::{DaySchedule, HOURS_PER_DAY, HourSlot, HourState, PartType, ScheduleStatus};
