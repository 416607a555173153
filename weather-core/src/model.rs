use serde::Deserialize;
use serde_json::{Map, Value};

/// One geocoder candidate, before US/state filtering.
#[derive(Debug, Clone, PartialEq)]
pub struct Place {
    pub name: String,
    /// Full state name as reported by the geocoder, e.g. "Washington".
    pub state: Option<String>,
    pub country_code: String,
    pub latitude: f64,
    pub longitude: f64,
    pub population: Option<u64>,
}

/// The place a query resolved to.
#[derive(Debug, Clone, PartialEq)]
pub struct Location {
    pub query: String,
    pub name: String,
    pub state_code: Option<&'static str>,
    pub latitude: f64,
    pub longitude: f64,
}

impl Location {
    /// "Seattle, WA", or just the name when the state is unknown.
    pub fn display_name(&self) -> String {
        match self.state_code {
            Some(code) => format!("{}, {}", self.name, code),
            None => self.name.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Station {
    pub id: String,
    pub name: String,
    /// `(latitude, longitude)`; not every station feature carries a geometry.
    pub coordinates: Option<(f64, f64)>,
}

/// The latest observation of a station.
///
/// `fields` is the raw `properties` object of the NWS response so any
/// source field named in the property registry can be looked up.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Observation {
    pub timestamp: Option<String>,
    pub fields: Map<String, Value>,
}

impl Observation {
    pub fn measurement(&self, field: &str) -> Option<Measurement> {
        self.fields
            .get(field)
            .filter(|v| v.is_object())
            .and_then(|v| Measurement::deserialize(v).ok())
    }

    pub fn text(&self, field: &str) -> Option<&str> {
        self.fields
            .get(field)
            .and_then(Value::as_str)
            .map(str::trim)
            .filter(|s| !s.is_empty())
    }
}

/// An NWS quantitative value, e.g.
/// `{"unitCode": "wmoUnit:degC", "value": 11.3, "qualityControl": "V"}`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Measurement {
    #[serde(default)]
    pub value: Option<f64>,
    #[serde(default)]
    pub unit_code: Option<String>,
    #[serde(default)]
    pub quality_control: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn observation(fields: Value) -> Observation {
        Observation {
            timestamp: None,
            fields: fields.as_object().cloned().unwrap(),
        }
    }

    #[test]
    fn measurement_reads_value_unit_and_qc() {
        let obs = observation(json!({
            "temperature": {"unitCode": "wmoUnit:degC", "value": 11.3, "qualityControl": "V"}
        }));
        let m = obs.measurement("temperature").unwrap();
        assert_eq!(m.value, Some(11.3));
        assert_eq!(m.unit_code.as_deref(), Some("wmoUnit:degC"));
        assert_eq!(m.quality_control.as_deref(), Some("V"));
    }

    #[test]
    fn null_value_and_missing_field() {
        let obs = observation(json!({
            "windGust": {"unitCode": "wmoUnit:km_h-1", "value": null, "qualityControl": "Z"}
        }));
        assert_eq!(obs.measurement("windGust").unwrap().value, None);
        assert!(obs.measurement("heatIndex").is_none());
    }

    #[test]
    fn text_ignores_blank_strings() {
        let obs = observation(json!({"textDescription": "  ", "other": "Mostly Cloudy"}));
        assert_eq!(obs.text("textDescription"), None);
        assert_eq!(obs.text("other"), Some("Mostly Cloudy"));
    }

    #[test]
    fn display_name_uses_state_code() {
        let mut loc = Location {
            query: "seattle".into(),
            name: "Seattle".into(),
            state_code: Some("WA"),
            latitude: 47.6,
            longitude: -122.3,
        };
        assert_eq!(loc.display_name(), "Seattle, WA");
        loc.state_code = None;
        assert_eq!(loc.display_name(), "Seattle");
    }
}
