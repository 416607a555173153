use anyhow::Result;
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;

use crate::{http, model::Place, query::CityQuery};

use super::Geocoder;

const SEARCH_URL: &str = "https://geocoding-api.open-meteo.com/v1/search";

/// Open-Meteo geocoding search. Free, no key.
///
/// Only the city part of the query is sent, restricted to the US or to the
/// territory the query names; state filtering happens on the returned
/// candidates.
#[derive(Debug, Clone)]
pub struct OpenMeteoGeocoder {
    http: Client,
}

impl OpenMeteoGeocoder {
    pub fn new(http: Client) -> Self {
        Self { http }
    }
}

#[derive(Debug, Deserialize)]
struct OmSearchResponse {
    // absent when nothing matched
    #[serde(default)]
    results: Vec<OmResult>,
}

#[derive(Debug, Deserialize)]
struct OmResult {
    name: String,
    latitude: f64,
    longitude: f64,
    #[serde(default)]
    country_code: Option<String>,
    #[serde(default)]
    admin1: Option<String>,
    #[serde(default)]
    population: Option<u64>,
}

impl From<OmResult> for Place {
    fn from(r: OmResult) -> Self {
        Place {
            name: r.name,
            state: r.admin1,
            country_code: r.country_code.unwrap_or_default(),
            latitude: r.latitude,
            longitude: r.longitude,
            population: r.population,
        }
    }
}

fn parse_results(parsed: OmSearchResponse) -> Vec<Place> {
    parsed.results.into_iter().map(Place::from).collect()
}

#[async_trait]
impl Geocoder for OpenMeteoGeocoder {
    async fn candidates(&self, query: &CityQuery) -> Result<Vec<Place>> {
        let parsed: OmSearchResponse = http::get_json(
            &self.http,
            SEARCH_URL,
            &[
                ("name", query.city.as_str()),
                ("count", "10"),
                ("language", "en"),
                ("format", "json"),
                ("countryCode", super::country_code(query)),
            ],
            "Open-Meteo geocoding",
        )
        .await?;

        Ok(parse_results(parsed))
    }
}
