mod commands;
mod render;

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use outages_core::config::OutagesConfig;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "outages")]
#[command(about = "Show 24-hour power-outage schedules from your outage calendars")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the hourly schedule for a day
    Show {
        /// Calendars to combine (repeatable; defaults to `calendars` in config, then every calendar in --json)
        #[arg(short, long)]
        calendar: Vec<String>,

        /// Day to show: today, tomorrow or YYYY-MM-DD
        #[arg(short, long, default_value = "today")]
        date: String,

        /// Read events from a calendar.get_events JSON response instead of .ics files
        #[arg(long)]
        json: Option<PathBuf>,

        /// Timezone to count hours in (e.g. "Europe/Kyiv")
        #[arg(long)]
        timezone: Option<String>,

        #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },
    /// List calendars in the calendar directory
    Calendars,
}

#[derive(Clone, Copy, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_target(false).with_writer(std::io::stderr))
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .init();

    let cli = Cli::parse();
    let config = OutagesConfig::load()?;

    match cli.command {
        Commands::Show {
            calendar,
            date,
            json,
            timezone,
            format,
        } => {
            let options = commands::show::ShowOptions {
                calendars: calendar,
                date,
                json,
                timezone,
                format,
            };
            commands::show::run(&config, options)
        }
        Commands::Calendars => commands::calendars::run(&config),
    }
}
