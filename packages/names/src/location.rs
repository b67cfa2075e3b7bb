//! City/state extraction from geocoded display names.
//!
//! Geocoder display names and free-form addresses come in several
//! shapes ("City, State", "Street, City, State", "Street, City, State,
//! Country"). The last two comma-separated parts are taken as city and
//! state, with a sanity check on the state part.

/// Longest value accepted as a state name.
const MAX_STATE_LEN: usize = 20;

/// A parsed city/state pair.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ParsedLocation {
    /// City name (may be empty if the part was blank).
    pub city: String,
    /// State name or abbreviation.
    pub state: String,
}

/// Extracts a city/state pair from a display name or address.
///
/// Returns `None` when there are fewer than two parts, or when the last
/// part looks like a ZIP code (leading digit) or is longer than a state
/// name could be.
#[must_use]
pub fn parse_location(display_name: &str) -> Option<ParsedLocation> {
    let parts: Vec<&str> = display_name.split(',').map(str::trim).collect();

    if parts.len() < 2 {
        return None;
    }

    let state = parts[parts.len() - 1];
    let city = parts[parts.len() - 2];

    if state.is_empty()
        || state.starts_with(|c: char| c.is_ascii_digit())
        || state.chars().count() > MAX_STATE_LEN
    {
        return None;
    }

    Some(ParsedLocation {
        city: city.to_string(),
        state: state.to_string(),
    })
}

/// The second-to-last comma-separated part, trimmed, with no check on
/// what follows it. `None` with fewer than two parts or a blank city.
#[must_use]
pub fn city_segment(text: &str) -> Option<&str> {
    let mut parts = text.rsplit(',').map(str::trim);
    parts.next()?;
    parts.next().filter(|city| !city.is_empty())
}

/// Picks the best available location text: the geocoder display name if
/// present and non-empty, otherwise the raw address.
#[must_use]
pub fn location_source<'a>(display_name: Option<&'a str>, address: Option<&'a str>) -> &'a str {
    display_name
        .filter(|s| !s.trim().is_empty())
        .or(address)
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn city_segment_ignores_state_shape() {
        assert_eq!(city_segment("1 Main St, Raleigh, NC"), Some("Raleigh"));
        assert_eq!(city_segment("Austin, Texas, United States of America"), Some("Texas"));
        assert_eq!(city_segment("Raleigh, 27601"), Some("Raleigh"));
        assert_eq!(city_segment("Nowhere"), None);
        assert_eq!(city_segment(" , NC"), None);
        assert_eq!(city_segment(""), None);
    }

    #[test]
    fn parses_city_state() {
        assert_eq!(
            parse_location("Raleigh, NC"),
            Some(ParsedLocation {
                city: "Raleigh".to_string(),
                state: "NC".to_string(),
            })
        );
    }

    #[test]
    fn uses_last_two_parts() {
        let parsed = parse_location("123 Main St, Austin, Texas").unwrap();
        assert_eq!(parsed.city, "Austin");
        assert_eq!(parsed.state, "Texas");
    }

    #[test]
    fn rejects_zip_and_overlong_state() {
        assert_eq!(parse_location("Austin, 78701"), None);
        assert_eq!(
            parse_location("Austin, Texas, United States of America Region"),
            None
        );
    }

    #[test]
    fn rejects_single_part() {
        assert_eq!(parse_location("Nowhere"), None);
        assert_eq!(parse_location(""), None);
    }

    #[test]
    fn prefers_display_name_over_address() {
        assert_eq!(location_source(Some("A, B"), Some("C, D")), "A, B");
        assert_eq!(location_source(Some("  "), Some("C, D")), "C, D");
        assert_eq!(location_source(None, None), "");
    }
}
