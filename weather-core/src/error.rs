use reqwest::StatusCode;
use thiserror::Error;

/// Domain failures surfaced to the user.
///
/// Operations return `anyhow::Result`; these are the variants worth
/// matching on (or downcasting to) when a caller needs to tell them apart.
#[derive(Debug, Error)]
pub enum WeatherError {
    #[error("No city given. Usage: `weather show <city>`, e.g. `weather show Seattle, WA`.")]
    EmptyQuery,

    #[error("No US city matching '{0}' was found.")]
    NoMatchingCity(String),

    #[error("The location {lat:.4},{lon:.4} is outside National Weather Service coverage.")]
    OutsideCoverage { lat: f64, lon: f64 },

    #[error("No observation stations found near this location.")]
    NoStations,

    #[error("HTTP {status} fetching {url}: {body}")]
    HttpStatus {
        status: StatusCode,
        url: String,
        body: String,
    },

    #[error("Unknown property '{name}'. Known properties: {known}.")]
    UnknownProperty { name: String, known: String },

    #[error("Unknown geocoder '{0}'. Supported geocoders: open-meteo, nominatim.")]
    UnknownGeocoder(String),

    #[error("Unknown {what} '{value}'. Expected one of: {expected}.")]
    UnknownValue {
        what: &'static str,
        value: String,
        expected: &'static str,
    },
}
