//! The property registry: which observation fields can be shown, under
//! which label, and how each is rendered for text and JSON output.

use serde_json::{Value, json};

use crate::{
    error::WeatherError,
    model::Observation,
    units::{self, UnitSystem},
};

pub const UNAVAILABLE: &str = "Data unavailable";

pub const DEFAULT_PROPERTIES: &[&str] = &["temperature", "humidity", "description", "wind"];

/// How a field is read and converted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Kind {
    Text,
    Temperature,
    Percent,
    Speed,
    Direction,
    Pressure,
    Distance,
    Precipitation,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PropertySpec {
    /// User-facing name, as accepted by `--properties`.
    pub name: &'static str,
    pub label: &'static str,
    /// Key in the observation's `properties` object.
    pub field: &'static str,
    pub kind: Kind,
}

const fn prop(
    name: &'static str,
    label: &'static str,
    field: &'static str,
    kind: Kind,
) -> PropertySpec {
    PropertySpec {
        name,
        label,
        field,
        kind,
    }
}

pub static REGISTRY: &[PropertySpec] = &[
    prop("description", "Conditions", "textDescription", Kind::Text),
    prop("temperature", "Temperature", "temperature", Kind::Temperature),
    prop("dewpoint", "Dew point", "dewpoint", Kind::Temperature),
    prop("humidity", "Humidity", "relativeHumidity", Kind::Percent),
    prop("wind", "Wind", "windSpeed", Kind::Speed),
    prop("wind-direction", "Wind direction", "windDirection", Kind::Direction),
    prop("wind-gust", "Wind gust", "windGust", Kind::Speed),
    prop("pressure", "Pressure", "barometricPressure", Kind::Pressure),
    prop("sea-level-pressure", "Sea level", "seaLevelPressure", Kind::Pressure),
    prop("visibility", "Visibility", "visibility", Kind::Distance),
    prop("heat-index", "Heat index", "heatIndex", Kind::Temperature),
    prop("wind-chill", "Wind chill", "windChill", Kind::Temperature),
    prop("precipitation", "Precip (1h)", "precipitationLastHour", Kind::Precipitation),
];

pub fn find(name: &str) -> Option<&'static PropertySpec> {
    let normalised = name.trim().to_lowercase().replace('_', "-");
    REGISTRY.iter().find(|p| p.name == normalised)
}

/// Resolve names to specs, keeping the given order and dropping repeats.
pub fn select<S: AsRef<str>>(names: &[S]) -> Result<Vec<&'static PropertySpec>, WeatherError> {
    let mut selected: Vec<&'static PropertySpec> = Vec::with_capacity(names.len());

    for name in names {
        let name = name.as_ref();
        if name.trim().is_empty() {
            continue;
        }
        let spec = find(name).ok_or_else(|| WeatherError::UnknownProperty {
            name: name.to_string(),
            known: known_names(),
        })?;
        if !selected.iter().any(|s| s.name == spec.name) {
            selected.push(spec);
        }
    }

    Ok(selected)
}

pub fn defaults() -> Vec<&'static PropertySpec> {
    DEFAULT_PROPERTIES.iter().filter_map(|name| find(name)).collect()
}

fn known_names() -> String {
    REGISTRY.iter().map(|p| p.name).collect::<Vec<_>>().join(", ")
}

impl PropertySpec {
    /// Text rendering, or `None` when the station did not report a value.
    pub fn display(&self, obs: &Observation, system: UnitSystem) -> Option<String> {
        if self.kind == Kind::Text {
            return obs.text(self.field).map(str::to_string);
        }

        let m = obs.measurement(self.field)?;
        let value = m.value?;
        let unit = m.unit_code.as_deref();

        let text = match (self.kind, system) {
            (Kind::Temperature, UnitSystem::Imperial) => {
                let c = units::celsius(value, unit);
                format!("{:.1}°F  ({:.1}°C)", units::c_to_f(c), c)
            }
            (Kind::Temperature, UnitSystem::Metric) => {
                let c = units::celsius(value, unit);
                format!("{:.1}°C  ({:.1}°F)", c, units::c_to_f(c))
            }
            (Kind::Percent, _) => format!("{value:.1}%"),
            (Kind::Speed, UnitSystem::Imperial) => {
                format!("{:.1} mph", units::kmh_to_mph(units::kmh(value, unit)))
            }
            (Kind::Speed, UnitSystem::Metric) => format!("{:.1} km/h", units::kmh(value, unit)),
            (Kind::Direction, _) => format!("{value:.0}° ({})", units::compass(value)),
            (Kind::Pressure, UnitSystem::Imperial) => {
                format!("{:.2} inHg", units::pa_to_inhg(units::pascals(value, unit)))
            }
            (Kind::Pressure, UnitSystem::Metric) => {
                format!("{:.1} hPa", units::pa_to_hpa(units::pascals(value, unit)))
            }
            (Kind::Distance, UnitSystem::Imperial) => {
                format!("{:.1} mi", units::m_to_mi(units::metres(value, unit)))
            }
            (Kind::Distance, UnitSystem::Metric) => {
                format!("{:.1} km", units::metres(value, unit) / 1000.0)
            }
            (Kind::Precipitation, UnitSystem::Imperial) => {
                format!("{:.2} in", units::mm_to_in(units::millimetres(value, unit)))
            }
            (Kind::Precipitation, UnitSystem::Metric) => {
                format!("{:.1} mm", units::millimetres(value, unit))
            }
            (Kind::Text, _) => unreachable!("handled above"),
        };

        Some(text)
    }

    /// JSON rendering; `null` when the station did not report a value.
    pub fn json(&self, obs: &Observation, system: UnitSystem) -> Value {
        if self.kind == Kind::Text {
            return obs.text(self.field).map_or(Value::Null, |s| json!(s));
        }

        let Some(m) = obs.measurement(self.field) else {
            return Value::Null;
        };
        let Some(value) = m.value else {
            return Value::Null;
        };
        let unit = m.unit_code.as_deref();

        match (self.kind, system) {
            (Kind::Temperature, UnitSystem::Imperial) => {
                let c = units::celsius(value, unit);
                json!({
                    "value": units::round(units::c_to_f(c), 1),
                    "unit": "°F",
                    "celsius": units::round(c, 1),
                })
            }
            (Kind::Temperature, UnitSystem::Metric) => {
                let c = units::celsius(value, unit);
                json!({
                    "value": units::round(c, 1),
                    "unit": "°C",
                    "fahrenheit": units::round(units::c_to_f(c), 1),
                })
            }
            (Kind::Percent, _) => json!({"value": units::round(value, 1), "unit": "%"}),
            (Kind::Speed, UnitSystem::Imperial) => json!({
                "value": units::round(units::kmh_to_mph(units::kmh(value, unit)), 1),
                "unit": "mph",
            }),
            (Kind::Speed, UnitSystem::Metric) => {
                json!({"value": units::round(units::kmh(value, unit), 1), "unit": "km/h"})
            }
            (Kind::Direction, _) => json!({
                "value": units::round(value, 0),
                "unit": "°",
                "compass": units::compass(value),
            }),
            (Kind::Pressure, UnitSystem::Imperial) => json!({
                "value": units::round(units::pa_to_inhg(units::pascals(value, unit)), 2),
                "unit": "inHg",
            }),
            (Kind::Pressure, UnitSystem::Metric) => json!({
                "value": units::round(units::pa_to_hpa(units::pascals(value, unit)), 1),
                "unit": "hPa",
            }),
            (Kind::Distance, UnitSystem::Imperial) => json!({
                "value": units::round(units::m_to_mi(units::metres(value, unit)), 1),
                "unit": "mi",
            }),
            (Kind::Distance, UnitSystem::Metric) => json!({
                "value": units::round(units::metres(value, unit) / 1000.0, 1),
                "unit": "km",
            }),
            (Kind::Precipitation, UnitSystem::Imperial) => json!({
                "value": units::round(units::mm_to_in(units::millimetres(value, unit)), 2),
                "unit": "in",
            }),
            (Kind::Precipitation, UnitSystem::Metric) => json!({
                "value": units::round(units::millimetres(value, unit), 1),
                "unit": "mm",
            }),
            (Kind::Text, _) => unreachable!("handled above"),
        }
    }
}
