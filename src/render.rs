//! Terminal rendering for outage schedules.
//!
//! Extension traits adding colored output to outages-core types using owo_colors.

use chrono::NaiveDate;
use outages_core::config::OutagesConfig;
use outages_core::{DaySchedule, DayTab, HourSlot, HourState, PartType, ScheduleStatus};
use owo_colors::OwoColorize;

/// Extension trait for TUI rendering with colors.
pub trait Render {
    fn render(&self) -> String;
}

/// Which optional parts of a day to draw.
pub struct RenderOptions {
    pub show_legend: bool,
    pub show_emergency_badge: bool,
    pub show_schedule_badge: bool,
}

impl From<&OutagesConfig> for RenderOptions {
    fn from(config: &OutagesConfig) -> Self {
        RenderOptions {
            show_legend: config.show_legend,
            show_emergency_badge: config.show_emergency_badge,
            show_schedule_badge: config.show_schedule_badge,
        }
    }
}

impl Render for HourState {
    fn render(&self) -> String {
        match self {
            HourState::Powered => "●".green().to_string(),
            HourState::CertainOutage => "■".red().to_string(),
            HourState::PossibleOutage => "▲".yellow().to_string(),
        }
    }
}

fn state_label(state: HourState) -> &'static str {
    match state {
        HourState::Powered => "powered",
        HourState::CertainOutage => "outage",
        HourState::PossibleOutage => "possible outage",
    }
}

impl Render for HourSlot {
    fn render(&self) -> String {
        let mut line = format!("{} {}", self.state.render(), state_label(self.state));

        if let (Some(part_type), Some(percentage)) = (self.part_type, self.part_percentage) {
            let part = match part_type {
                PartType::Start => format!("(last {}% of the hour)", percentage),
                PartType::End => format!("(first {}% of the hour)", percentage),
            };
            line = format!("{} {}", line, part.dimmed());
        }

        line
    }
}

impl Render for ScheduleStatus {
    fn render(&self) -> String {
        match self {
            ScheduleStatus::Applies => "Schedule applies".green().bold().to_string(),
            ScheduleStatus::Waiting => "Waiting for schedule".yellow().bold().to_string(),
        }
    }
}

pub trait RenderWith {
    fn render_with(&self, options: &RenderOptions) -> String;
}

impl RenderWith for DaySchedule {
    fn render_with(&self, options: &RenderOptions) -> String {
        let mut lines = vec![self.date.format("%A %-d %B").to_string().bold().to_string()];

        let mut badges = Vec::new();
        if options.show_emergency_badge && self.emergency_outages {
            badges.push("⚠ Emergency outages".red().bold().to_string());
        }
        if options.show_schedule_badge {
            if let Some(status) = self.schedule_status {
                badges.push(status.render());
            }
        }
        if !badges.is_empty() {
            lines.push(badges.join("  "));
        }

        lines.push(String::new());

        for (hour, slot) in self.hours.iter().enumerate() {
            let label = format!("{:02}:00", hour);
            if slot.is_current {
                lines.push(format!(
                    "{} {} {}",
                    label.bold(),
                    slot.render(),
                    "← now".bold()
                ));
            } else {
                lines.push(format!("{} {}", label.dimmed(), slot.render()));
            }
        }

        if options.show_legend {
            lines.push(String::new());
            lines.push(render_legend());
        }

        lines.join("\n")
    }
}

fn render_legend() -> String {
    [
        HourState::Powered,
        HourState::CertainOutage,
        HourState::PossibleOutage,
    ]
    .iter()
    .map(|state| format!("{} {}", state.render(), state_label(*state)))
    .collect::<Vec<_>>()
    .join("   ")
}

/// Day switcher line, e.g. `[Wed, 01.10]  Thu, 02.10`
pub fn render_tabs(tabs: &[DayTab], selected: NaiveDate) -> String {
    tabs.iter()
        .map(|tab| {
            if tab.date == selected {
                format!("[{}]", tab.label).bold().to_string()
            } else {
                format!(" {} ", tab.label).dimmed().to_string()
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}
