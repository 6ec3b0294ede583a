use sos_domain::{Coordinate, Facility};

pub const MAP_SEARCH_URL: &str = "https://www.google.com/maps/search/?api=1&query=";
pub const FACILITIES_HEADER: &str = "Nearby Hospitals:";

/// Map search link for a coordinate.
#[must_use]
pub fn map_link(location: Coordinate) -> String {
    format!("{MAP_SEARCH_URL}{},{}", location.lat(), location.lon())
}

/// Builds the alert body.
///
/// ```text
/// <base> Help needed at: <map link>
/// Nearby Hospitals:
/// Hospital: <name> - <map link>
/// ```
///
/// The facility block is omitted when `facilities` is empty. Facilities keep
/// the order they are given in.
#[derive(Debug, Clone, Copy, Default)]
pub struct AlertComposer;

impl AlertComposer {
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    #[must_use]
    pub fn compose(&self, base: &str, location: Coordinate, facilities: &[Facility]) -> String {
        let mut message = format!("{base} Help needed at: {}", map_link(location));
        if facilities.is_empty() {
            return message;
        }

        message.push('\n');
        message.push_str(FACILITIES_HEADER);
        for facility in facilities {
            message.push_str(&format!(
                "\nHospital: {} - {}",
                facility.display_name(),
                map_link(facility.location)
            ));
        }
        message
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn at(lat: f64, lon: f64) -> Coordinate {
        Coordinate::try_new(lat, lon).expect("valid coordinate")
    }

    fn hospital(id: i64, name: Option<&str>, lat: f64, lon: f64) -> Facility {
        Facility {
            id,
            location: at(lat, lon),
            name: name.map(str::to_owned),
            category: Some("hospital".to_owned()),
        }
    }

    #[test]
    fn location_only() {
        let text = AlertComposer::new().compose("Emergency!", at(12.9, 77.6), &[]);
        assert_eq!(
            text,
            "Emergency! Help needed at: https://www.google.com/maps/search/?api=1&query=12.9,77.6"
        );
    }

    #[test]
    fn facility_lines_follow_given_order() {
        let facilities = [
            hospital(1, Some("City Hospital"), 12.91, 77.61),
            hospital(2, None, 12.95, 77.65),
        ];
        let text = AlertComposer::new().compose("Medical emergency!", at(12.9, 77.6), &facilities);

        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 4);
        assert_eq!(lines[1], "Nearby Hospitals:");
        assert_eq!(
            lines[2],
            "Hospital: City Hospital - https://www.google.com/maps/search/?api=1&query=12.91,77.61"
        );
        assert_eq!(
            lines[3],
            "Hospital: Unknown - https://www.google.com/maps/search/?api=1&query=12.95,77.65"
        );
    }

    #[test]
    fn blank_names_read_as_unknown() {
        let text = AlertComposer::new().compose("SOS", at(0.0, 0.0), &[hospital(1, Some("  "), 1.0, 1.0)]);
        assert!(text.ends_with("Hospital: Unknown - https://www.google.com/maps/search/?api=1&query=1,1"));
    }

    #[test]
    fn negative_coordinates_render_signed() {
        assert_eq!(
            map_link(at(-33.8688, 151.2093)),
            "https://www.google.com/maps/search/?api=1&query=-33.8688,151.2093"
        );
    }

    proptest! {
        #[test]
        fn composition_is_deterministic(
            base in ".{0,40}",
            lat in -90.0..=90.0_f64,
            lon in -180.0..=180.0_f64,
            names in proptest::collection::vec(proptest::option::of("[A-Za-z ]{0,12}"), 0..6),
        ) {
            let facilities: Vec<Facility> = names
                .iter()
                .zip(0_i64..)
                .map(|(name, id)| hospital(id, name.as_deref(), lat, lon))
                .collect();
            let composer = AlertComposer::new();

            let first = composer.compose(&base, at(lat, lon), &facilities);
            let second = composer.compose(&base, at(lat, lon), &facilities);
            prop_assert_eq!(&first, &second);
            prop_assert!(first.starts_with(&base));
            prop_assert!(first.contains(&map_link(at(lat, lon))));
            prop_assert_eq!(first.matches("\nHospital: ").count(), facilities.len());
        }
    }
}
