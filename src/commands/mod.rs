pub mod calendars;
pub mod show;
