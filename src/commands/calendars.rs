use anyhow::Result;
use outages_core::config::OutagesConfig;
use outages_core::source::IcsDirSource;
use owo_colors::OwoColorize;

pub fn run(config: &OutagesConfig) -> Result<()> {
    let source = IcsDirSource::new(config.data_path());
    let calendars = source.calendars();

    if calendars.is_empty() {
        println!(
            "{}",
            format!("No calendars found in {}", config.calendar_dir.display()).dimmed()
        );
        return Ok(());
    }

    for calendar in calendars {
        let marker = if config.calendars.contains(&calendar) {
            "*".green().to_string()
        } else {
            " ".to_string()
        };
        println!("{} {}", marker, calendar);
    }

    Ok(())
}
