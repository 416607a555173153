//! Unit handling for NWS quantitative values.
//!
//! api.weather.gov reports observations in SI with `wmoUnit:` codes; values
//! are first normalised to a canonical unit per dimension, then converted
//! to the requested [`UnitSystem`].

use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::error::WeatherError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UnitSystem {
    #[default]
    Imperial,
    Metric,
}

impl UnitSystem {
    pub fn as_str(&self) -> &'static str {
        match self {
            UnitSystem::Imperial => "imperial",
            UnitSystem::Metric => "metric",
        }
    }

    pub const fn all() -> &'static [UnitSystem] {
        &[UnitSystem::Imperial, UnitSystem::Metric]
    }
}

impl std::fmt::Display for UnitSystem {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for UnitSystem {
    type Err = WeatherError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "imperial" | "us" | "f" => Ok(UnitSystem::Imperial),
            "metric" | "si" | "c" => Ok(UnitSystem::Metric),
            _ => Err(WeatherError::UnknownValue {
                what: "unit system",
                value: s.to_string(),
                expected: "imperial, metric",
            }),
        }
    }
}

pub fn c_to_f(c: f64) -> f64 {
    c * 9.0 / 5.0 + 32.0
}

pub fn f_to_c(f: f64) -> f64 {
    (f - 32.0) * 5.0 / 9.0
}

pub fn kmh_to_mph(kmh: f64) -> f64 {
    kmh / 1.609344
}

pub fn pa_to_hpa(pa: f64) -> f64 {
    pa / 100.0
}

pub fn pa_to_inhg(pa: f64) -> f64 {
    pa / 3386.389
}

pub fn m_to_mi(m: f64) -> f64 {
    m / 1609.344
}

pub fn mm_to_in(mm: f64) -> f64 {
    mm / 25.4
}

/// Temperature in degrees Celsius.
pub fn celsius(value: f64, unit_code: Option<&str>) -> f64 {
    match unit_suffix(unit_code) {
        "degF" => f_to_c(value),
        "K" => value - 273.15,
        _ => value,
    }
}

/// Speed in km/h.
pub fn kmh(value: f64, unit_code: Option<&str>) -> f64 {
    match unit_suffix(unit_code) {
        "m_s-1" => value * 3.6,
        "mi_h-1" => value * 1.609344,
        "kn" => value * 1.852,
        _ => value,
    }
}

/// Pressure in pascals.
pub fn pascals(value: f64, unit_code: Option<&str>) -> f64 {
    match unit_suffix(unit_code) {
        "hPa" | "mbar" => value * 100.0,
        "kPa" => value * 1000.0,
        _ => value,
    }
}

/// Distance in metres.
pub fn metres(value: f64, unit_code: Option<&str>) -> f64 {
    match unit_suffix(unit_code) {
        "km" => value * 1000.0,
        "mi" => value * 1609.344,
        _ => value,
    }
}

/// Precipitation depth in millimetres.
pub fn millimetres(value: f64, unit_code: Option<&str>) -> f64 {
    match unit_suffix(unit_code) {
        "m" => value * 1000.0,
        "cm" => value * 10.0,
        "in" => value * 25.4,
        _ => value,
    }
}

/// `wmoUnit:km_h-1` -> `km_h-1`. Unknown or missing codes fall through to
/// the canonical unit of each dimension.
fn unit_suffix(unit_code: Option<&str>) -> &str {
    let code = unit_code.unwrap_or_default();
    code.rsplit_once(':').map_or(code, |(_, unit)| unit)
}

const COMPASS: [&str; 16] = [
    "N", "NNE", "NE", "ENE", "E", "ESE", "SE", "SSE", "S", "SSW", "SW", "WSW", "W", "WNW", "NW",
    "NNW",
];

/// Sixteen-point compass name for a bearing in degrees.
pub fn compass(degrees: f64) -> &'static str {
    let normalised = degrees.rem_euclid(360.0);
    let index = ((normalised / 22.5).round() as usize) % COMPASS.len();
    COMPASS[index]
}

/// Round to `places` decimals, for JSON output.
pub fn round(value: f64, places: i32) -> f64 {
    let factor = 10f64.powi(places);
    (value * factor).round() / factor
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-6
    }

    #[test]
    fn temperature_conversions() {
        assert!(close(c_to_f(0.0), 32.0));
        assert!(close(c_to_f(100.0), 212.0));
        assert!(close(c_to_f(-40.0), -40.0));
        assert!(close(f_to_c(50.0), 10.0));
        assert!(close(celsius(50.0, Some("wmoUnit:degF")), 10.0));
        assert!(close(celsius(11.3, Some("wmoUnit:degC")), 11.3));
        assert!(close(celsius(273.15, Some("wmoUnit:K")), 0.0));
    }

    #[test]
    fn speed_normalisation() {
        assert!(close(kmh(10.0, Some("wmoUnit:m_s-1")), 36.0));
        assert!(close(kmh(18.5, Some("wmoUnit:km_h-1")), 18.5));
        assert!(close(kmh_to_mph(1.609344), 1.0));
    }

    #[test]
    fn pressure_and_distance() {
        assert!(close(pascals(1013.25, Some("wmoUnit:hPa")), 101325.0));
        assert!(close(pa_to_hpa(101325.0), 1013.25));
        assert!((pa_to_inhg(101325.0) - 29.92).abs() < 0.01);
        assert!(close(m_to_mi(16093.44), 10.0));
        assert!(close(metres(2.0, Some("wmoUnit:km")), 2000.0));
        assert!(close(mm_to_in(25.4), 1.0));
        assert!(close(millimetres(0.002, Some("wmoUnit:m")), 2.0));
    }

    #[test]
    fn missing_unit_code_is_canonical() {
        assert!(close(celsius(5.0, None), 5.0));
        assert!(close(kmh(5.0, None), 5.0));
        assert!(close(pascals(5.0, Some("weird")), 5.0));
    }

    #[test]
    fn compass_points() {
        assert_eq!(compass(0.0), "N");
        assert_eq!(compass(360.0), "N");
        assert_eq!(compass(349.0), "N");
        assert_eq!(compass(22.5), "NNE");
        assert_eq!(compass(90.0), "E");
        assert_eq!(compass(225.0), "SW");
        assert_eq!(compass(-90.0), "W");
    }

    #[test]
    fn unit_system_parsing() {
        assert_eq!("Metric".parse::<UnitSystem>().unwrap(), UnitSystem::Metric);
        assert_eq!("us".parse::<UnitSystem>().unwrap(), UnitSystem::Imperial);
        let err = "kelvin".parse::<UnitSystem>().unwrap_err();
        assert!(err.to_string().contains("imperial, metric"));
    }

    #[test]
    fn rounding() {
        assert!(close(round(11.345, 1), 11.3));
        assert!(close(round(29.9213, 2), 29.92));
    }
}
