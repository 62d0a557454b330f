use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::{Days, Utc};
use chrono_tz::Tz;
use outages_core::config::OutagesConfig;
use outages_core::date_range::{DateRange, parse_day};
use outages_core::source::{EventSource, IcsDirSource, JsonResponseSource, aggregate_events};
use outages_core::{Forecast, compile};

use crate::OutputFormat;
use crate::render::{RenderOptions, RenderWith, render_tabs};

pub struct ShowOptions {
    /// Calendars from the command line; may be empty
    pub calendars: Vec<String>,
    pub date: String,
    pub json: Option<PathBuf>,
    pub timezone: Option<String>,
    pub format: OutputFormat,
}

pub fn run(config: &OutagesConfig, options: ShowOptions) -> Result<()> {
    let tz = resolve_timezone(options.timezone.as_deref(), config)?;
    let now = Utc::now().with_timezone(&tz);
    let today = now.date_naive();
    let date = parse_day(&options.date, today).map_err(|e| anyhow::anyhow!(e))?;

    let (source, in_response): (Box<dyn EventSource>, Vec<String>) = match &options.json {
        Some(path) => {
            let source = JsonResponseSource::load(path)
                .with_context(|| format!("Could not read events from {}", path.display()))?;
            let ids = source.calendars();
            let source: Box<dyn EventSource> = Box::new(source);
            (source, ids)
        }
        None => {
            let source: Box<dyn EventSource> = Box::new(IcsDirSource::new(config.data_path()));
            (source, Vec::new())
        }
    };
    let calendars = resolve_calendars(options.calendars, &config.calendars, in_response)?;

    let in_forecast = date == today || date == today + Days::new(1);
    let window_start = if in_forecast { today } else { date };
    let range = DateRange::forecast_window(window_start, &tz);

    tracing::debug!(
        from = %range.from_rfc3339(),
        to = %range.to_rfc3339(),
        calendars = ?calendars,
        "Fetching events"
    );
    let events = aggregate_events(source.as_ref(), &calendars, &range);

    let render_options = RenderOptions::from(config);

    if in_forecast {
        let forecast = Forecast::compile(&events, &now);
        let schedule = forecast.for_date(date);
        match options.format {
            OutputFormat::Json => println!("{}", serde_json::to_string_pretty(schedule)?),
            OutputFormat::Text => {
                println!("{}", render_tabs(&forecast.tabs(), date));
                println!();
                println!("{}", schedule.render_with(&render_options));
            }
        }
    } else {
        let schedule = compile(&events, date, &now);
        match options.format {
            OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&schedule)?),
            OutputFormat::Text => println!("{}", schedule.render_with(&render_options)),
        }
    }

    Ok(())
}

/// Calendars given on the command line, else the configured ones, else every
/// calendar in a JSON response.
fn resolve_calendars(
    from_args: Vec<String>,
    configured: &[String],
    in_response: Vec<String>,
) -> Result<Vec<String>> {
    let calendars = if !from_args.is_empty() {
        from_args
    } else if !configured.is_empty() {
        configured.to_vec()
    } else {
        in_response
    };

    if calendars.is_empty() {
        anyhow::bail!(
            "No calendars selected.\n\n\
            Pass one with:\n  \
            outages show --calendar <calendar>\n\n\
            or set `calendars` in {}",
            OutagesConfig::config_path()?.display()
        );
    }

    Ok(calendars)
}

/// Command-line zone, else the configured one, else the system zone, else UTC.
fn resolve_timezone(from_args: Option<&str>, config: &OutagesConfig) -> Result<Tz> {
    if let Some(name) = from_args {
        return name
            .parse::<Tz>()
            .map_err(|_| anyhow::anyhow!("Unknown timezone '{}'", name));
    }

    if let Some(tz) = config.timezone()? {
        return Ok(tz);
    }

    match iana_time_zone::get_timezone() {
        Ok(name) => match name.parse::<Tz>() {
            Ok(tz) => Ok(tz),
            Err(_) => {
                tracing::warn!(timezone = %name, "Unrecognized system timezone, using UTC");
                Ok(Tz::UTC)
            }
        },
        Err(e) => {
            tracing::warn!(error = %e, "Could not detect system timezone, using UTC");
            Ok(Tz::UTC)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_timezone_argument_wins_over_config() {
        let config = OutagesConfig {
            timezone: Some("Europe/Kyiv".to_string()),
            ..Default::default()
        };

        let tz = resolve_timezone(Some("Europe/Warsaw"), &config).unwrap();

        assert_eq!(tz, chrono_tz::Europe::Warsaw);
    }

    #[test]
    fn test_configured_timezone() {
        let config = OutagesConfig {
            timezone: Some("Europe/Kyiv".to_string()),
            ..Default::default()
        };

        assert_eq!(resolve_timezone(None, &config).unwrap(), chrono_tz::Europe::Kyiv);
    }

    #[test]
    fn test_unknown_timezone_argument() {
        assert!(resolve_timezone(Some("Nowhere/Special"), &OutagesConfig::default()).is_err());
    }

    fn ids(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_calendar_argument_wins() {
        let calendars =
            resolve_calendars(ids(&["group-2"]), &ids(&["group-1"]), ids(&["calendar.a"])).unwrap();

        assert_eq!(calendars, ids(&["group-2"]));
    }

    #[test]
    fn test_configured_calendars_before_response() {
        let calendars = resolve_calendars(Vec::new(), &ids(&["group-1"]), ids(&["calendar.a"])).unwrap();

        assert_eq!(calendars, ids(&["group-1"]));
    }

    #[test]
    fn test_json_response_calendars_are_the_default() {
        let response = JsonResponseSource::parse(
            r#"{"calendar.group_2": {"events": []}, "calendar.group_1": {"events": []}}"#,
        )
        .unwrap();

        let calendars = resolve_calendars(Vec::new(), &[], response.calendars()).unwrap();

        assert_eq!(calendars, ids(&["calendar.group_1", "calendar.group_2"]));
    }

    #[test]
    fn test_no_calendars_is_an_error() {
        assert!(resolve_calendars(Vec::new(), &[], Vec::new()).is_err());
    }
}
