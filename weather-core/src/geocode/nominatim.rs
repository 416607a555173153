use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;

use crate::{http, model::Place, query::CityQuery};

use super::Geocoder;

const SEARCH_URL: &str = "https://nominatim.openstreetmap.org/search";

/// OpenStreetMap Nominatim structured search.
///
/// Nominatim's usage policy requires an identifying User-Agent, which the
/// shared client already sends.
#[derive(Debug, Clone)]
pub struct NominatimGeocoder {
    http: Client,
}

impl NominatimGeocoder {
    pub fn new(http: Client) -> Self {
        Self { http }
    }
}

#[derive(Debug, Deserialize)]
struct NmResult {
    lat: String,
    lon: String,
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    display_name: Option<String>,
    #[serde(default)]
    address: Option<NmAddress>,
}

#[derive(Debug, Default, Deserialize)]
struct NmAddress {
    city: Option<String>,
    town: Option<String>,
    village: Option<String>,
    state: Option<String>,
    country_code: Option<String>,
}

impl TryFrom<NmResult> for Place {
    type Error = anyhow::Error;

    fn try_from(r: NmResult) -> Result<Self> {
        let latitude: f64 = r
            .lat
            .parse()
            .with_context(|| format!("Invalid latitude '{}' from Nominatim", r.lat))?;
        let longitude: f64 = r
            .lon
            .parse()
            .with_context(|| format!("Invalid longitude '{}' from Nominatim", r.lon))?;

        let address = r.address.unwrap_or_default();

        let name = address
            .city
            .or(address.town)
            .or(address.village)
            .or(r.name)
            .or_else(|| {
                r.display_name
                    .as_deref()
                    .and_then(|d| d.split(',').next())
                    .map(|s| s.trim().to_string())
            })
            .unwrap_or_else(|| "Unknown".to_string());

        Ok(Place {
            name,
            state: address.state,
            country_code: address.country_code.unwrap_or_default(),
            latitude,
            longitude,
            population: None,
        })
    }
}

fn parse_results(results: Vec<NmResult>) -> Result<Vec<Place>> {
    results.into_iter().map(Place::try_from).collect()
}

#[async_trait]
impl Geocoder for NominatimGeocoder {
    async fn candidates(&self, query: &CityQuery) -> Result<Vec<Place>> {
        let country = super::country_code(query).to_ascii_lowercase();
        let mut params = vec![
            ("city", query.city.as_str()),
            ("countrycodes", country.as_str()),
            ("format", "jsonv2"),
            ("addressdetails", "1"),
            ("limit", "10"),
        ];
        // a territory is already pinned by countrycodes
        if let Some(state) = query.state.filter(|s| !s.is_territory()) {
            params.push(("state", state.name));
        }

        let results: Vec<NmResult> =
            http::get_json(&self.http, SEARCH_URL, &params, "Nominatim search").await?;

        parse_results(results)
    }
}
