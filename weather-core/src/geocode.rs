use crate::{
    Config,
    error::WeatherError,
    geocode::{nominatim::NominatimGeocoder, openmeteo::OpenMeteoGeocoder},
    model::{Location, Place},
    query::CityQuery,
    states::{self, State},
};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::{fmt::Debug, str::FromStr};
use tracing::debug;

pub mod nominatim;
pub mod openmeteo;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum GeocoderId {
    #[default]
    OpenMeteo,
    Nominatim,
}

impl GeocoderId {
    pub fn as_str(&self) -> &'static str {
        match self {
            GeocoderId::OpenMeteo => "open-meteo",
            GeocoderId::Nominatim => "nominatim",
        }
    }

    pub const fn all() -> &'static [GeocoderId] {
        &[GeocoderId::OpenMeteo, GeocoderId::Nominatim]
    }
}

impl std::fmt::Display for GeocoderId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for GeocoderId {
    type Error = WeatherError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let lower = value.trim().to_lowercase();

        match lower.as_str() {
            "open-meteo" | "openmeteo" | "open_meteo" => Ok(GeocoderId::OpenMeteo),
            "nominatim" | "osm" => Ok(GeocoderId::Nominatim),
            _ => Err(WeatherError::UnknownGeocoder(value.to_string())),
        }
    }
}

impl TryFrom<String> for GeocoderId {
    type Error = WeatherError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        GeocoderId::try_from(value.as_str())
    }
}

impl From<GeocoderId> for String {
    fn from(id: GeocoderId) -> Self {
        id.as_str().to_string()
    }
}

impl FromStr for GeocoderId {
    type Err = WeatherError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        GeocoderId::try_from(s)
    }
}

/// Turns a city query into candidate places, most relevant first.
#[async_trait]
pub trait Geocoder: Send + Sync + Debug {
    async fn candidates(&self, query: &CityQuery) -> anyhow::Result<Vec<Place>>;
}

/// Construct a geocoder from an explicit id, sharing the given HTTP client.
pub fn geocoder_from_id(id: GeocoderId, http: Client) -> Box<dyn Geocoder> {
    match id {
        GeocoderId::OpenMeteo => Box::new(OpenMeteoGeocoder::new(http)),
        GeocoderId::Nominatim => Box::new(NominatimGeocoder::new(http)),
    }
}

/// Construct the configured geocoder.
pub fn geocoder_from_config(config: &Config, http: Client) -> Box<dyn Geocoder> {
    geocoder_from_id(config.geocoder, http)
}

/// Resolve a query to a single US location.
///
/// Candidates outside the US and its territories are dropped; when the
/// query names a state, candidates in other states are dropped too. The
/// first survivor wins.
pub async fn resolve(geocoder: &dyn Geocoder, query: &CityQuery) -> anyhow::Result<Location> {
    let candidates = geocoder.candidates(query).await?;
    debug!(count = candidates.len(), "geocoder returned candidates for {query}");

    pick(query, candidates).ok_or_else(|| WeatherError::NoMatchingCity(query.raw.clone()).into())
}

/// ISO country code to search in: the territory's own code when the query
/// names one, `US` otherwise.
pub(crate) fn country_code(query: &CityQuery) -> &'static str {
    match query.state {
        Some(state) if state.is_territory() => state.code,
        _ => "US",
    }
}

/// The state a candidate lies in. Territories are coded as countries by
/// the geocoders, so their country code is the state; `None` as the outer
/// value means the candidate is outside the US.
fn candidate_state(place: &Place) -> Option<Option<&'static State>> {
    if place.country_code.eq_ignore_ascii_case("US") {
        return Some(place.state.as_deref().and_then(states::by_name));
    }

    states::by_code(&place.country_code)
        .filter(|state| state.is_territory())
        .map(Some)
}

fn pick(query: &CityQuery, candidates: Vec<Place>) -> Option<Location> {
    candidates
        .into_iter()
        .filter_map(|place| candidate_state(&place).map(|state| (place, state)))
        .find(|(_, state)| match query.state {
            Some(wanted) => state.is_some_and(|s| s.code == wanted.code),
            None => true,
        })
        .map(|(place, state)| {
            debug!(
                name = %place.name,
                lat = place.latitude,
                lon = place.longitude,
                "picked geocoder candidate"
            );
            Location {
                query: query.raw.clone(),
                name: place.name,
                state_code: state.map(|s| s.code),
                latitude: place.latitude,
                longitude: place.longitude,
            }
        })
}
