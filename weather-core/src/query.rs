use crate::{
    error::WeatherError,
    states::{self, State},
};

/// A free-text city as typed by the user, split into the part sent to the
/// geocoder and an optional state used to filter its answers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CityQuery {
    pub city: String,
    pub state: Option<&'static State>,
    pub raw: String,
}

impl CityQuery {
    /// Accepted shapes: `City`, `City, ST`, `City, Statename` and `City ST`.
    pub fn parse(text: &str) -> Result<Self, WeatherError> {
        let raw = text.trim();
        if raw.is_empty() {
            return Err(WeatherError::EmptyQuery);
        }

        if let Some((city, state)) = raw.rsplit_once(',') {
            let city = city.trim();
            return Ok(match states::lookup(state) {
                Some(state) if !city.is_empty() => Self::new(city, Some(state), raw),
                _ => Self::new(raw, None, raw),
            });
        }

        if let Some((city, last)) = raw.rsplit_once(char::is_whitespace) {
            let city = city.trim();
            if last.len() == 2 && !city.is_empty() {
                if let Some(state) = states::by_code(last) {
                    return Ok(Self::new(city, Some(state), raw));
                }
            }
        }

        Ok(Self::new(raw, None, raw))
    }

    fn new(city: &str, state: Option<&'static State>, raw: &str) -> Self {
        Self {
            city: city.to_string(),
            state,
            raw: raw.to_string(),
        }
    }
}

impl std::fmt::Display for CityQuery {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.state {
            Some(state) => write!(f, "{}, {}", self.city, state.code),
            None => f.write_str(&self.city),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_city_has_no_state() {
        let q = CityQuery::parse("  Seattle ").unwrap();
        assert_eq!(q.city, "Seattle");
        assert!(q.state.is_none());
        assert_eq!(q.raw, "Seattle");
    }

    #[test]
    fn comma_with_code() {
        let q = CityQuery::parse("Maple Valley, wa").unwrap();
        assert_eq!(q.city, "Maple Valley");
        assert_eq!(q.state.map(|s| s.code), Some("WA"));
        assert_eq!(q.to_string(), "Maple Valley, WA");
    }

    #[test]
    fn comma_with_full_name() {
        let q = CityQuery::parse("Portland, Maine").unwrap();
        assert_eq!(q.city, "Portland");
        assert_eq!(q.state.map(|s| s.code), Some("ME"));
    }

    #[test]
    fn comma_with_non_state_keeps_whole_text() {
        let q = CityQuery::parse("Paris, France").unwrap();
        assert_eq!(q.city, "Paris, France");
        assert!(q.state.is_none());
    }

    #[test]
    fn trailing_code_without_comma() {
        let q = CityQuery::parse("Salem OR").unwrap();
        assert_eq!(q.city, "Salem");
        assert_eq!(q.state.map(|s| s.code), Some("OR"));
    }

    #[test]
    fn multi_word_city_without_state_is_untouched() {
        for text in ["New York", "Kansas City", "Oklahoma City", "Washington"] {
            let q = CityQuery::parse(text).unwrap();
            assert_eq!(q.city, text);
            assert!(q.state.is_none(), "{text} should carry no state");
        }
    }

    #[test]
    fn empty_query_is_an_error() {
        assert!(matches!(CityQuery::parse("   "), Err(WeatherError::EmptyQuery)));
    }
}
