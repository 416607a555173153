//! Client for the US National Weather Service API (api.weather.gov).
//!
//! Three sequential requests take a coordinate to a current observation:
//!
//! - `/points/{lat},{lon}` gives `properties.observationStations`, a URL
//!   listing the stations around the forecast grid point
//! - that URL gives `features[]`, each a station with its identifier, name
//!   and a `[lon, lat]` point geometry
//! - `/stations/{id}/observations/latest` gives `properties`, a flat map
//!   of quantitative values plus `timestamp` and `textDescription`

use anyhow::Result;
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use serde_json::{Map, Value};
use std::fmt::Debug;
use tracing::debug;

use crate::{
    error::WeatherError,
    http,
    model::{Observation, Station},
};

pub const BASE_URL: &str = "https://api.weather.gov";

const EARTH_RADIUS_KM: f64 = 6371.0;

/// Where stations and their observations come from.
#[async_trait]
pub trait StationSource: Send + Sync + Debug {
    /// Stations serving the grid point around `lat`,`lon`, in API order.
    async fn stations_near(&self, lat: f64, lon: f64) -> Result<Vec<Station>>;

    async fn latest_observation(&self, station_id: &str) -> Result<Observation>;
}

#[derive(Debug, Clone)]
pub struct NwsClient {
    http: Client,
    base_url: String,
}

impl NwsClient {
    pub fn new(http: Client) -> Self {
        Self::with_base_url(http, BASE_URL)
    }

    pub fn with_base_url(http: Client, base_url: &str) -> Self {
        Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    fn points_url(&self, lat: f64, lon: f64) -> String {
        // the API redirects requests with more than four decimals
        format!("{}/points/{:.4},{:.4}", self.base_url, lat, lon)
    }

    fn latest_url(&self, station_id: &str) -> String {
        format!("{}/stations/{}/observations/latest", self.base_url, station_id)
    }
}

#[derive(Debug, Deserialize)]
struct PointResponse {
    properties: PointProperties,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PointProperties {
    observation_stations: String,
}

#[derive(Debug, Deserialize)]
struct StationCollection {
    #[serde(default)]
    features: Vec<StationFeature>,
}

#[derive(Debug, Deserialize)]
struct StationFeature {
    #[serde(default)]
    geometry: Option<PointGeometry>,
    properties: StationProperties,
}

#[derive(Debug, Deserialize)]
struct PointGeometry {
    #[serde(default)]
    coordinates: Vec<f64>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct StationProperties {
    station_identifier: String,
    #[serde(default)]
    name: String,
}

impl From<StationFeature> for Station {
    fn from(f: StationFeature) -> Self {
        let coordinates = f
            .geometry
            .and_then(|g| match g.coordinates.as_slice() {
                [lon, lat, ..] => Some((*lat, *lon)),
                _ => None,
            });

        Station {
            id: f.properties.station_identifier,
            name: f.properties.name,
            coordinates,
        }
    }
}

#[derive(Debug, Deserialize)]
struct ObservationResponse {
    properties: Map<String, Value>,
}

impl From<ObservationResponse> for Observation {
    fn from(r: ObservationResponse) -> Self {
        let timestamp = r
            .properties
            .get("timestamp")
            .and_then(Value::as_str)
            .map(str::to_string);

        Observation {
            timestamp,
            fields: r.properties,
        }
    }
}

#[async_trait]
impl StationSource for NwsClient {
    async fn stations_near(&self, lat: f64, lon: f64) -> Result<Vec<Station>> {
        let point: PointResponse =
            http::get_json(&self.http, &self.points_url(lat, lon), &[], "NWS point")
                .await
                .map_err(|err| map_point_error(err, lat, lon))?;

        let stations_url = point.properties.observation_stations;
        debug!(%stations_url, "resolved observation stations URL");

        let collection: StationCollection =
            http::get_json(&self.http, &stations_url, &[], "NWS observation stations").await?;

        Ok(collection.features.into_iter().map(Station::from).collect())
    }

    async fn latest_observation(&self, station_id: &str) -> Result<Observation> {
        let response: ObservationResponse = http::get_json(
            &self.http,
            &self.latest_url(station_id),
            &[],
            "NWS latest observation",
        )
        .await?;

        Ok(response.into())
    }
}

/// A 404 from `/points` means the coordinate has no NWS grid.
fn map_point_error(err: anyhow::Error, lat: f64, lon: f64) -> anyhow::Error {
    let not_found = matches!(
        err.downcast_ref::<WeatherError>(),
        Some(WeatherError::HttpStatus { status, .. }) if *status == StatusCode::NOT_FOUND
    );
    if not_found {
        WeatherError::OutsideCoverage { lat, lon }.into()
    } else {
        err
    }
}

/// Great-circle distance in kilometres.
pub fn haversine_km(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    let lat1_rad = lat1.to_radians();
    let lat2_rad = lat2.to_radians();
    let delta_lat = (lat2 - lat1).to_radians();
    let delta_lon = (lon2 - lon1).to_radians();

    let a = (delta_lat / 2.0).sin().powi(2)
        + lat1_rad.cos() * lat2_rad.cos() * (delta_lon / 2.0).sin().powi(2);
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());

    EARTH_RADIUS_KM * c
}

/// The station closest to `lat`,`lon` and its distance, if known.
///
/// Stations without a geometry rank after those with one; on ties (and
/// when nothing has a geometry) the API's own nearest-first order holds.
pub fn nearest_station(
    stations: Vec<Station>,
    lat: f64,
    lon: f64,
) -> Result<(Station, Option<f64>), WeatherError> {
    let mut best: Option<(Station, Option<f64>)> = None;

    for station in stations {
        let distance = station
            .coordinates
            .map(|(s_lat, s_lon)| haversine_km(lat, lon, s_lat, s_lon));

        let closer = match (&best, distance) {
            (None, _) => true,
            (Some((_, None)), Some(_)) => true,
            (Some((_, Some(current))), Some(d)) => d < *current,
            _ => false,
        };

        if closer {
            best = Some((station, distance));
        }
    }

    best.ok_or(WeatherError::NoStations)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn station(id: &str, coordinates: Option<(f64, f64)>) -> Station {
        Station {
            id: id.to_string(),
            name: format!("{id} station"),
            coordinates,
        }
    }

    #[test]
    fn urls_are_built_from_base() {
        let client = NwsClient::with_base_url(Client::new(), "http://localhost:8080/");
        assert_eq!(
            client.points_url(47.37481234, -122.045),
            "http://localhost:8080/points/47.3748,-122.0450"
        );
        assert_eq!(
            client.latest_url("KSEA"),
            "http://localhost:8080/stations/KSEA/observations/latest"
        );
    }

    #[test]
    fn parses_point_response() {
        let body = r#"{
            "id": "https://api.weather.gov/points/47.3748,-122.045",
            "properties": {
                "gridId": "SEW",
                "gridX": 135,
                "gridY": 59,
                "observationStations": "https://api.weather.gov/gridpoints/SEW/135,59/stations"
            }
        }"#;
        let point: PointResponse = serde_json::from_str(body).unwrap();
        assert_eq!(
            point.properties.observation_stations,
            "https://api.weather.gov/gridpoints/SEW/135,59/stations"
        );
    }

    #[test]
    fn parses_station_collection() {
        let body = r#"{
            "type": "FeatureCollection",
            "features": [
                {
                    "id": "https://api.weather.gov/stations/KRNT",
                    "type": "Feature",
                    "geometry": {"type": "Point", "coordinates": [-122.21667, 47.49333]},
                    "properties": {"stationIdentifier": "KRNT", "name": "Renton Municipal Airport"}
                },
                {
                    "type": "Feature",
                    "geometry": null,
                    "properties": {"stationIdentifier": "XYZ1", "name": "No geometry"}
                }
            ]
        }"#;
        let collection: StationCollection = serde_json::from_str(body).unwrap();
        let stations: Vec<Station> = collection.features.into_iter().map(Station::from).collect();

        assert_eq!(stations.len(), 2);
        assert_eq!(stations[0].id, "KRNT");
        assert_eq!(stations[0].name, "Renton Municipal Airport");
        assert_eq!(stations[0].coordinates, Some((47.49333, -122.21667)));
        assert_eq!(stations[1].coordinates, None);
    }

    #[test]
    fn parses_latest_observation() {
        let body = r#"{
            "properties": {
                "stationId": "KRNT",
                "timestamp": "2024-05-01T22:53:00+00:00",
                "textDescription": "Mostly Cloudy",
                "temperature": {"unitCode": "wmoUnit:degC", "value": 11.3, "qualityControl": "V"},
                "relativeHumidity": {"unitCode": "wmoUnit:percent", "value": 71.2, "qualityControl": "V"}
            }
        }"#;
        let response: ObservationResponse = serde_json::from_str(body).unwrap();
        let obs = Observation::from(response);

        assert_eq!(obs.timestamp.as_deref(), Some("2024-05-01T22:53:00+00:00"));
        assert_eq!(obs.text("textDescription"), Some("Mostly Cloudy"));
        assert_eq!(obs.measurement("temperature").unwrap().value, Some(11.3));
    }

    fn http_status(status: StatusCode) -> anyhow::Error {
        WeatherError::HttpStatus {
            status,
            url: "https://api.weather.gov/points/51.5074,-0.1278".into(),
            body: "{}".into(),
        }
        .into()
    }

    #[test]
    fn point_not_found_is_outside_coverage() {
        let err = map_point_error(http_status(StatusCode::NOT_FOUND), 51.5074, -0.1278);
        match err.downcast_ref::<WeatherError>() {
            Some(WeatherError::OutsideCoverage { lat, lon }) => {
                assert_eq!(*lat, 51.5074);
                assert_eq!(*lon, -0.1278);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn other_point_failures_pass_through() {
        let err = map_point_error(http_status(StatusCode::INTERNAL_SERVER_ERROR), 47.0, -122.0);
        assert!(matches!(
            err.downcast_ref::<WeatherError>(),
            Some(WeatherError::HttpStatus { status, .. }) if *status == StatusCode::INTERNAL_SERVER_ERROR
        ));

        let err = map_point_error(anyhow::anyhow!("Could not connect"), 47.0, -122.0);
        assert_eq!(err.to_string(), "Could not connect");
    }

    #[test]
    fn haversine_known_distance() {
        // Seattle to Portland, OR is roughly 233 km
        let d = haversine_km(47.6062, -122.3321, 45.5152, -122.6784);
        assert!((d - 233.0).abs() < 3.0, "got {d}");
        assert!(haversine_km(10.0, 10.0, 10.0, 10.0).abs() < 1e-9);
    }

    #[test]
    fn nearest_station_picks_smallest_distance() {
        let stations = vec![
            station("FAR", Some((48.0, -122.0))),
            station("NEAR", Some((47.4, -122.05))),
        ];
        let (best, distance) = nearest_station(stations, 47.3748, -122.045).unwrap();
        assert_eq!(best.id, "NEAR");
        assert!(distance.unwrap() < 5.0);
    }

    #[test]
    fn nearest_station_prefers_known_geometry() {
        let stations = vec![station("NONE", None), station("SOME", Some((50.0, -120.0)))];
        let (best, _) = nearest_station(stations, 47.0, -122.0).unwrap();
        assert_eq!(best.id, "SOME");
    }

    #[test]
    fn nearest_station_keeps_api_order_without_geometry() {
        let stations = vec![station("FIRST", None), station("SECOND", None)];
        let (best, distance) = nearest_station(stations, 47.0, -122.0).unwrap();
        assert_eq!(best.id, "FIRST");
        assert!(distance.is_none());
    }

    #[test]
    fn nearest_station_of_nothing() {
        assert!(matches!(
            nearest_station(Vec::new(), 0.0, 0.0),
            Err(WeatherError::NoStations)
        ));
    }
}
