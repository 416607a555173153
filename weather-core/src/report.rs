use anyhow::{Context, Result};
use chrono::{DateTime, Local};
use serde_json::{Map, Value, json};
use tracing::{debug, info};

use crate::{
    Config,
    geocode::{self, Geocoder},
    http,
    model::{Location, Observation},
    nws::{self, NwsClient, StationSource},
    properties::{PropertySpec, UNAVAILABLE},
    query::CityQuery,
    units::{self, UnitSystem},
};

/// The chosen station, with its distance from the resolved location.
#[derive(Debug, Clone, PartialEq)]
pub struct StationInfo {
    pub id: String,
    pub name: String,
    pub distance_km: Option<f64>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Report {
    pub location: Location,
    pub station: StationInfo,
    pub observation: Observation,
}

/// Geocoder plus station source: city text in, report out.
#[derive(Debug)]
pub struct WeatherService {
    geocoder: Box<dyn Geocoder>,
    stations: Box<dyn StationSource>,
}

impl WeatherService {
    pub fn new(geocoder: Box<dyn Geocoder>, stations: Box<dyn StationSource>) -> Self {
        Self { geocoder, stations }
    }

    /// Build the live service from config: one shared HTTP client for the
    /// configured geocoder and api.weather.gov.
    pub fn from_config(config: &Config) -> Result<Self> {
        let client = http::build_client(&config.contact, config.timeout_secs)?;

        let stations = match &config.nws_base_url {
            Some(base) => NwsClient::with_base_url(client.clone(), base),
            None => NwsClient::new(client.clone()),
        };

        Ok(Self::new(
            geocode::geocoder_from_config(config, client),
            Box::new(stations),
        ))
    }

    pub async fn fetch(&self, query: &CityQuery) -> Result<Report> {
        let location = geocode::resolve(self.geocoder.as_ref(), query).await?;
        info!(
            "Resolved '{}' to {} ({:.4}, {:.4})",
            query.raw,
            location.display_name(),
            location.latitude,
            location.longitude
        );

        let stations = self
            .stations
            .stations_near(location.latitude, location.longitude)
            .await?;
        debug!(count = stations.len(), "observation stations near location");

        let (station, distance_km) =
            nws::nearest_station(stations, location.latitude, location.longitude)?;
        info!("Nearest station: {} ({})", station.name, station.id);

        let observation = self
            .stations
            .latest_observation(&station.id)
            .await
            .with_context(|| format!("Failed to fetch latest observation for {}", station.id))?;

        Ok(Report {
            location,
            station: StationInfo {
                id: station.id,
                name: station.name,
                distance_km,
            },
            observation,
        })
    }
}

/// Local-time rendering of an observation timestamp: `Unknown` when
/// absent, the raw text when it is not RFC 3339.
pub fn format_timestamp(ts: Option<&str>) -> String {
    let Some(ts) = ts.filter(|s| !s.trim().is_empty()) else {
        return "Unknown".to_string();
    };

    match DateTime::parse_from_rfc3339(ts) {
        Ok(dt) => dt
            .with_timezone(&Local)
            .format("%Y-%m-%d %I:%M %p %Z")
            .to_string(),
        Err(_) => ts.to_string(),
    }
}

pub fn render_text(report: &Report, props: &[&PropertySpec], system: UnitSystem) -> String {
    let station = match report.station.distance_km {
        Some(km) => {
            let distance = match system {
                UnitSystem::Imperial => format!("{:.1} mi", units::m_to_mi(km * 1000.0)),
                UnitSystem::Metric => format!("{km:.1} km"),
            };
            format!("{} ({}), {} away", report.station.name, report.station.id, distance)
        }
        None => format!("{} ({})", report.station.name, report.station.id),
    };

    let mut out = String::new();
    out.push_str(&format!("Location : {}\n", report.location.display_name()));
    out.push_str(&format!("Station  : {station}\n"));
    out.push_str(&format!(
        "Observed : {}\n",
        format_timestamp(report.observation.timestamp.as_deref())
    ));

    if props.is_empty() {
        return out;
    }

    out.push('\n');
    // one column of slack after the widest label
    let width = props.iter().map(|p| p.label.chars().count()).max().unwrap_or(0) + 1;
    for prop in props {
        let value = prop
            .display(&report.observation, system)
            .unwrap_or_else(|| UNAVAILABLE.to_string());
        out.push_str(&format!("{:<width$} : {}\n", prop.label, value));
    }

    out
}

pub fn render_json(report: &Report, props: &[&PropertySpec], system: UnitSystem) -> Result<String> {
    let mut properties = Map::new();
    for prop in props {
        properties.insert(prop.name.to_string(), prop.json(&report.observation, system));
    }

    let doc = json!({
        "location": {
            "query": report.location.query,
            "name": report.location.display_name(),
            "latitude": report.location.latitude,
            "longitude": report.location.longitude,
        },
        "station": {
            "id": report.station.id,
            "name": report.station.name,
            "distance_km": report.station.distance_km.map(|d| units::round(d, 1)),
        },
        "observed_at": report.observation.timestamp,
        "units": system.as_str(),
        "properties": Value::Object(properties),
    });

    serde_json::to_string_pretty(&doc).context("Failed to serialize report to JSON")
}
