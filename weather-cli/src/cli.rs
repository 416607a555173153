use anyhow::Context;
use clap::{ArgAction, Parser, Subcommand};
use inquire::{CustomType, MultiSelect, Select, Text};
use tracing::info;
use weather_core::{
    CityQuery, Config, GeocoderId, OutputFormat, UnitSystem, WeatherService,
    properties::{self, REGISTRY},
    report,
};

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(
    name = "weather",
    version,
    about = "Current conditions for a US city from the nearest NWS station"
)]
pub struct Cli {
    /// More logging on stderr (-v info, -vv debug, -vvv trace).
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Show the latest observation near a city.
    Show {
        /// City name, e.g. "Seattle, WA", "Portland Maine" or "Salem OR".
        #[arg(required = true, num_args = 1..)]
        city: Vec<String>,

        /// Unit system: imperial or metric.
        #[arg(short, long)]
        units: Option<UnitSystem>,

        /// Output format: text or json.
        #[arg(short, long)]
        format: Option<OutputFormat>,

        /// Comma-separated properties, e.g. "temperature,humidity,wind".
        #[arg(short, long, value_delimiter = ',')]
        properties: Option<Vec<String>>,

        /// Geocoder used to resolve the city: open-meteo or nominatim.
        #[arg(short, long)]
        geocoder: Option<GeocoderId>,
    },

    /// List the properties that can be shown.
    Properties,

    /// Interactively edit the configuration file.
    Configure,

    /// Print the configuration file location.
    ConfigPath,
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<()> {
        match self.command {
            Command::Show {
                city,
                units,
                format,
                properties: property_names,
                geocoder,
            } => {
                let mut config = Config::load()?;
                if let Some(geocoder) = geocoder {
                    config.geocoder = geocoder;
                }
                let units = units.unwrap_or(config.units);
                let format = format.unwrap_or(config.format);
                let props = match property_names {
                    Some(names) => properties::select(&names)?,
                    None => config.property_specs()?,
                };

                let query = CityQuery::parse(&city.join(" "))?;
                if let Some(line) = banner(format, &query) {
                    eprintln!("{line}");
                }
                info!(%query, %format, %units, "fetching weather");

                let service = WeatherService::from_config(&config)?;
                let weather = service.fetch(&query).await?;

                match format {
                    OutputFormat::Text => {
                        print!("{}", report::render_text(&weather, &props, units));
                    }
                    OutputFormat::Json => {
                        println!("{}", report::render_json(&weather, &props, units)?);
                    }
                }
            }
            Command::Properties => {
                let defaults = properties::DEFAULT_PROPERTIES;
                println!("{:<20} {:<16} {}", "NAME", "LABEL", "SOURCE FIELD");
                for prop in REGISTRY {
                    let marker = if defaults.contains(&prop.name) { " (default)" } else { "" };
                    println!("{:<20} {:<16} {}{}", prop.name, prop.label, prop.field, marker);
                }
            }
            Command::Configure => configure()?,
            Command::ConfigPath => {
                println!("{}", Config::config_file_path()?.display());
            }
        }

        Ok(())
    }
}

/// Progress line for text output; stderr, so it never mixes into stdout.
fn banner(format: OutputFormat, query: &CityQuery) -> Option<String> {
    match format {
        OutputFormat::Text => Some(format!("Fetching weather for {query}...")),
        OutputFormat::Json => None,
    }
}

fn configure() -> anyhow::Result<()> {
    let mut config = Config::load()?;

    let geocoders = GeocoderId::all().to_vec();
    let cursor = geocoders.iter().position(|g| *g == config.geocoder).unwrap_or(0);
    config.geocoder = Select::new("Geocoder:", geocoders)
        .with_starting_cursor(cursor)
        .prompt()
        .context("Geocoder selection cancelled")?;

    let systems = UnitSystem::all().to_vec();
    let cursor = systems.iter().position(|u| *u == config.units).unwrap_or(0);
    config.units = Select::new("Units:", systems)
        .with_starting_cursor(cursor)
        .prompt()
        .context("Unit selection cancelled")?;

    let formats = OutputFormat::all().to_vec();
    let cursor = formats.iter().position(|f| *f == config.format).unwrap_or(0);
    config.format = Select::new("Output format:", formats)
        .with_starting_cursor(cursor)
        .prompt()
        .context("Format selection cancelled")?;

    let names: Vec<&'static str> = REGISTRY.iter().map(|p| p.name).collect();
    let selected: Vec<usize> = config
        .property_specs()?
        .iter()
        .filter_map(|spec| names.iter().position(|n| *n == spec.name))
        .collect();
    let chosen = MultiSelect::new("Properties to show:", names)
        .with_default(&selected)
        .prompt()
        .context("Property selection cancelled")?;
    config.properties = chosen.into_iter().map(str::to_string).collect();

    let contact = Text::new("Contact (sent in the User-Agent to api.weather.gov):")
        .with_default(&config.contact)
        .prompt()
        .context("Contact entry cancelled")?;
    config.contact = contact;

    config.timeout_secs = CustomType::<u64>::new("Request timeout in seconds:")
        .with_default(config.timeout_secs)
        .with_error_message("Please enter a whole number of seconds")
        .prompt()
        .context("Timeout entry cancelled")?;

    let path = config.save()?;
    println!("Saved configuration to {}", path.display());

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn show_joins_city_words_and_parses_flags() {
        let cli = Cli::try_parse_from([
            "weather",
            "-vv",
            "show",
            "Maple",
            "Valley,",
            "WA",
            "--units",
            "metric",
            "-f",
            "json",
            "--properties",
            "temperature,wind-gust",
            "--geocoder",
            "nominatim",
        ])
        .unwrap();

        assert_eq!(cli.verbose, 2);
        match cli.command {
            Command::Show {
                city,
                units,
                format,
                properties,
                geocoder,
            } => {
                assert_eq!(city.join(" "), "Maple Valley, WA");
                assert_eq!(units, Some(UnitSystem::Metric));
                assert_eq!(format, Some(OutputFormat::Json));
                assert_eq!(
                    properties,
                    Some(vec!["temperature".to_string(), "wind-gust".to_string()])
                );
                assert_eq!(geocoder, Some(GeocoderId::Nominatim));
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn show_requires_a_city() {
        assert!(Cli::try_parse_from(["weather", "show"]).is_err());
    }

    #[test]
    fn banner_only_in_text_mode() {
        let query = CityQuery::parse("portland maine").unwrap();
        assert_eq!(
            banner(OutputFormat::Text, &query).as_deref(),
            Some("Fetching weather for portland maine...")
        );
        assert_eq!(banner(OutputFormat::Json, &query), None);
    }

    #[test]
    fn bad_units_are_rejected_by_the_parser() {
        let err = Cli::try_parse_from(["weather", "show", "Seattle", "--units", "kelvin"])
            .unwrap_err();
        assert!(err.to_string().contains("kelvin"));
    }
}
