//! USPS codes and names for the states, DC and the inhabited territories.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct State {
    pub code: &'static str,
    pub name: &'static str,
}

const fn st(code: &'static str, name: &'static str) -> State {
    State { code, name }
}

impl State {
    /// Territories carry their own ISO country code in geocoder data.
    pub fn is_territory(&self) -> bool {
        TERRITORY_CODES.contains(&self.code)
    }
}

const TERRITORY_CODES: &[&str] = &["PR", "GU", "VI", "AS", "MP"];

pub static STATES: &[State] = &[
    st("AL", "Alabama"),
    st("AK", "Alaska"),
    st("AZ", "Arizona"),
    st("AR", "Arkansas"),
    st("CA", "California"),
    st("CO", "Colorado"),
    st("CT", "Connecticut"),
    st("DE", "Delaware"),
    st("DC", "District of Columbia"),
    st("FL", "Florida"),
    st("GA", "Georgia"),
    st("HI", "Hawaii"),
    st("ID", "Idaho"),
    st("IL", "Illinois"),
    st("IN", "Indiana"),
    st("IA", "Iowa"),
    st("KS", "Kansas"),
    st("KY", "Kentucky"),
    st("LA", "Louisiana"),
    st("ME", "Maine"),
    st("MD", "Maryland"),
    st("MA", "Massachusetts"),
    st("MI", "Michigan"),
    st("MN", "Minnesota"),
    st("MS", "Mississippi"),
    st("MO", "Missouri"),
    st("MT", "Montana"),
    st("NE", "Nebraska"),
    st("NV", "Nevada"),
    st("NH", "New Hampshire"),
    st("NJ", "New Jersey"),
    st("NM", "New Mexico"),
    st("NY", "New York"),
    st("NC", "North Carolina"),
    st("ND", "North Dakota"),
    st("OH", "Ohio"),
    st("OK", "Oklahoma"),
    st("OR", "Oregon"),
    st("PA", "Pennsylvania"),
    st("RI", "Rhode Island"),
    st("SC", "South Carolina"),
    st("SD", "South Dakota"),
    st("TN", "Tennessee"),
    st("TX", "Texas"),
    st("UT", "Utah"),
    st("VT", "Vermont"),
    st("VA", "Virginia"),
    st("WA", "Washington"),
    st("WV", "West Virginia"),
    st("WI", "Wisconsin"),
    st("WY", "Wyoming"),
    st("PR", "Puerto Rico"),
    st("GU", "Guam"),
    st("VI", "United States Virgin Islands"),
    st("AS", "American Samoa"),
    st("MP", "Northern Mariana Islands"),
];

// Spellings geocoders use for admin areas that differ from the table.
const ALIASES: &[(&str, &str)] = &[
    ("Washington, D.C.", "DC"),
    ("Washington D.C.", "DC"),
    ("Washington DC", "DC"),
    ("U.S. Virgin Islands", "VI"),
    ("US Virgin Islands", "VI"),
    ("Virgin Islands", "VI"),
    ("Commonwealth of the Northern Mariana Islands", "MP"),
];

/// Match either a two-letter code or a full name, ignoring case,
/// surrounding whitespace and a trailing period.
pub fn lookup(s: &str) -> Option<&'static State> {
    let s = s.trim().trim_end_matches('.').trim();
    if s.is_empty() {
        return None;
    }

    STATES
        .iter()
        .find(|state| state.code.eq_ignore_ascii_case(s) || state.name.eq_ignore_ascii_case(s))
}

/// Match a two-letter code only.
pub fn by_code(code: &str) -> Option<&'static State> {
    let code = code.trim();
    STATES.iter().find(|state| state.code.eq_ignore_ascii_case(code))
}

/// Match a full state name only, as returned by the geocoders.
pub fn by_name(name: &str) -> Option<&'static State> {
    let name = name.trim();
    STATES
        .iter()
        .find(|state| state.name.eq_ignore_ascii_case(name))
        .or_else(|| {
            ALIASES
                .iter()
                .find(|(alias, _)| alias.eq_ignore_ascii_case(name))
                .and_then(|(_, code)| by_code(code))
        })
}
