//! Global configuration at ~/.config/outages/config.toml

use std::path::{Path, PathBuf};

use config::{Config, File, FileFormat};
use serde::{Deserialize, Deserializer};

use crate::error::{OutageError, OutageResult};

static DEFAULT_CALENDAR_DIR: &str = "~/calendar";

fn default_calendar_dir() -> PathBuf {
    PathBuf::from(DEFAULT_CALENDAR_DIR)
}

fn default_true() -> bool {
    true
}

/// `calendars = "group-1"` or `calendars = ["group-1", "group-2"]`
fn one_or_many<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum OneOrMany {
        One(String),
        Many(Vec<String>),
    }

    Ok(match OneOrMany::deserialize(deserializer)? {
        OneOrMany::One(id) => vec![id],
        OneOrMany::Many(ids) => ids,
    })
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct OutagesConfig {
    /// Directory holding one sub-directory of .ics files per calendar.
    #[serde(default = "default_calendar_dir")]
    pub calendar_dir: PathBuf,

    /// Calendars whose events are combined into one schedule.
    #[serde(default, deserialize_with = "one_or_many")]
    pub calendars: Vec<String>,

    /// IANA zone the hours are counted in. Defaults to the system zone.
    pub timezone: Option<String>,

    #[serde(default = "default_true")]
    pub show_legend: bool,

    #[serde(default = "default_true")]
    pub show_emergency_badge: bool,

    #[serde(default = "default_true")]
    pub show_schedule_badge: bool,
}

impl Default for OutagesConfig {
    fn default() -> Self {
        OutagesConfig {
            calendar_dir: default_calendar_dir(),
            calendars: Vec::new(),
            timezone: None,
            show_legend: true,
            show_emergency_badge: true,
            show_schedule_badge: true,
        }
    }
}

impl OutagesConfig {
    pub fn config_path() -> OutageResult<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| OutageError::Config("Could not determine config directory".into()))?
            .join("outages");

        Ok(config_dir.join("config.toml"))
    }

    /// Load the global config, writing a commented default file first if none exists.
    pub fn load() -> OutageResult<Self> {
        let config_path = Self::config_path()?;

        if !config_path.exists() {
            Self::create_default_config(&config_path)?;
        }

        Self::load_from(&config_path)
    }

    pub fn load_from(path: &Path) -> OutageResult<Self> {
        Config::builder()
            .add_source(File::from(path).format(FileFormat::Toml).required(false))
            .build()
            .map_err(|e| OutageError::Config(e.to_string()))?
            .try_deserialize()
            .map_err(|e| OutageError::Config(e.to_string()))
    }

    /// `calendar_dir` with `~` expanded.
    pub fn data_path(&self) -> PathBuf {
        let full_path_str = shellexpand::tilde(&self.calendar_dir.to_string_lossy()).into_owned();

        PathBuf::from(full_path_str)
    }

    /// The configured zone, if any.
    pub fn timezone(&self) -> OutageResult<Option<chrono_tz::Tz>> {
        self.timezone
            .as_deref()
            .map(|name| {
                name.parse::<chrono_tz::Tz>()
                    .map_err(|_| OutageError::InvalidTimezone(name.to_string()))
            })
            .transpose()
    }

    /// Create a default config file with all options commented out.
    pub fn create_default_config(path: &Path) -> OutageResult<()> {
        let contents = format!(
            "\
# outages configuration

# Where your outage calendars live (one directory of .ics files per calendar):
# calendar_dir = \"{}\"

# Calendars combined into the schedule:
# calendars = [\"group-1\"]

# Timezone the hours are counted in (defaults to the system timezone):
# timezone = \"Europe/Kyiv\"

# show_legend = true
# show_emergency_badge = true
# show_schedule_badge = true
",
            DEFAULT_CALENDAR_DIR
        );

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| {
                OutageError::Config(format!("Could not create config directory: {e}"))
            })?;
        }

        std::fs::write(path, contents)
            .map_err(|e| OutageError::Config(format!("Could not write config file: {e}")))?;

        Ok(())
    }
}
