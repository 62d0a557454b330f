//! Today/tomorrow forecast built from one fetch of events.

use chrono::{DateTime, Days, NaiveDate, TimeZone};
use serde::Serialize;

use crate::compile::compile;
use crate::event::CalendarEvent;
use crate::schedule::DaySchedule;

/// Compiled schedules for today and tomorrow.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Forecast {
    pub today: DaySchedule,
    pub tomorrow: DaySchedule,
}

/// A selectable day in the forecast.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DayTab {
    pub date: NaiveDate,
    /// e.g. `Wed, 01.10`
    pub label: String,
    pub is_today: bool,
}

impl Forecast {
    /// Compile both days from the same event list.
    pub fn compile<Tz: TimeZone>(events: &[CalendarEvent], now: &DateTime<Tz>) -> Self {
        let today = now.date_naive();

        Forecast {
            today: compile(events, today, now),
            tomorrow: compile(events, today + Days::new(1), now),
        }
    }

    /// The schedule to show for `date`: today's when it is today, tomorrow's otherwise.
    pub fn for_date(&self, date: NaiveDate) -> &DaySchedule {
        if date == self.today.date {
            &self.today
        } else {
            &self.tomorrow
        }
    }

    pub fn tabs(&self) -> [DayTab; 2] {
        [
            DayTab {
                date: self.today.date,
                label: day_label(self.today.date),
                is_today: true,
            },
            DayTab {
                date: self.tomorrow.date,
                label: day_label(self.tomorrow.date),
                is_today: false,
            },
        ]
    }
}

fn day_label(date: NaiveDate) -> String {
    date.format("%a, %d.%m").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::EventTime;
    use crate::schedule::HourState;
    use chrono::FixedOffset;

    fn now() -> DateTime<FixedOffset> {
        FixedOffset::east_opt(2 * 3600)
            .unwrap()
            .with_ymd_and_hms(2025, 10, 1, 9, 40, 0)
            .unwrap()
    }

    fn events() -> Vec<CalendarEvent> {
        let tomorrow = NaiveDate::from_ymd_opt(2025, 10, 2).unwrap();
        vec![
            CalendarEvent::new(
                EventTime::DateTimeFloating(tomorrow.and_hms_opt(12, 0, 0).unwrap()),
                EventTime::DateTimeFloating(tomorrow.and_hms_opt(14, 0, 0).unwrap()),
                "Outage",
                Some("Definite"),
            ),
            CalendarEvent::new(
                EventTime::Date(tomorrow),
                EventTime::Date(tomorrow + Days::new(1)),
                "Emergency",
                Some("emergency_shutdowns"),
            ),
        ]
    }

    #[test]
    fn test_compiles_today_and_tomorrow() {
        let forecast = Forecast::compile(&events(), &now());

        assert_eq!(forecast.today.current_hour(), Some(9));
        assert!(!forecast.today.has_outages());
        assert!(!forecast.today.emergency_outages);

        assert_eq!(forecast.tomorrow.current_hour(), None);
        assert!(forecast.tomorrow.emergency_outages);
        assert_eq!(forecast.tomorrow.hours[12].state, HourState::CertainOutage);
        assert_eq!(forecast.tomorrow.hours[13].state, HourState::CertainOutage);
        assert_eq!(forecast.tomorrow.outage_hours(), 2);
    }

    #[test]
    fn test_for_date_falls_back_to_tomorrow() {
        let forecast = Forecast::compile(&events(), &now());

        assert_eq!(forecast.for_date(now().date_naive()), &forecast.today);
        assert_eq!(
            forecast.for_date(NaiveDate::from_ymd_opt(2025, 10, 2).unwrap()),
            &forecast.tomorrow
        );
    }

    #[test]
    fn test_tabs() {
        let forecast = Forecast::compile(&[], &now());

        let [today, tomorrow] = forecast.tabs();

        assert_eq!(today.label, "Wed, 01.10");
        assert!(today.is_today);
        assert_eq!(tomorrow.label, "Thu, 02.10");
        assert!(!tomorrow.is_today);
    }
}
