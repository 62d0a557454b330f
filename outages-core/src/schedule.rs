//! Hourly schedule types produced by the compiler.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Number of hour slots in a compiled day.
pub const HOURS_PER_DAY: usize = 24;

/// Power state of one hour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HourState {
    #[default]
    Powered,
    CertainOutage,
    PossibleOutage,
}

impl HourState {
    pub fn is_outage(self) -> bool {
        self != HourState::Powered
    }
}

/// Which end of a partially covered hour the outage occupies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PartType {
    /// Powered first, outage for the rest of the hour.
    Start,
    /// Outage first, powered for the rest of the hour.
    End,
}

/// One hour of the day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct HourSlot {
    pub state: HourState,
    /// Share of the hour covered by the outage, 0-100.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub part_percentage: Option<u8>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub part_type: Option<PartType>,
    #[serde(default)]
    pub is_current: bool,
}

impl HourSlot {
    pub fn outage(state: HourState) -> Self {
        HourSlot {
            state,
            ..Default::default()
        }
    }

    pub fn partial(state: HourState, part_type: PartType, percentage: u8) -> Self {
        HourSlot {
            state,
            part_percentage: Some(percentage),
            part_type: Some(part_type),
            is_current: false,
        }
    }

    pub fn is_partial(&self) -> bool {
        self.part_type.is_some()
    }
}

/// Whether the published schedule is confirmed for the day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScheduleStatus {
    Applies,
    Waiting,
}

/// The compiled outage schedule for a single calendar day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DaySchedule {
    pub hours: [HourSlot; HOURS_PER_DAY],
    pub date: NaiveDate,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schedule_status: Option<ScheduleStatus>,
    #[serde(default)]
    pub emergency_outages: bool,
}

impl DaySchedule {
    /// A day with power in every hour and no markers.
    pub fn powered(date: NaiveDate) -> Self {
        DaySchedule {
            hours: [HourSlot::default(); HOURS_PER_DAY],
            date,
            schedule_status: None,
            emergency_outages: false,
        }
    }

    /// Index of the slot flagged as the current hour.
    pub fn current_hour(&self) -> Option<usize> {
        self.hours.iter().position(|slot| slot.is_current)
    }

    pub fn outage_hours(&self) -> usize {
        self.hours.iter().filter(|slot| slot.state.is_outage()).count()
    }

    pub fn has_outages(&self) -> bool {
        self.outage_hours() > 0
    }
}
