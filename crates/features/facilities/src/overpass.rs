//! Overpass QL query building and response decoding.

use crate::error::{FacilityError, FacilityErrorExt};
use serde::Deserialize;
use sos_domain::{Coordinate, Facility};
use tracing::trace;

#[derive(Debug, Deserialize)]
struct OverpassResponse {
    #[serde(default)]
    elements: Vec<OverpassElement>,
}

#[derive(Debug, Deserialize)]
struct OverpassElement {
    id: i64,
    lat: Option<f64>,
    lon: Option<f64>,
    #[serde(default)]
    tags: OverpassTags,
}

#[derive(Debug, Default, Deserialize)]
struct OverpassTags {
    name: Option<String>,
    amenity: Option<String>,
}

/// `[out:json];node[amenity=<category>](around:<radius>,<lat>,<lon>);out;`
///
/// # Errors
/// [`FacilityError::InvalidCategory`] unless `category` is a non-empty run of
/// `[a-z_]`, so nothing but a tag value ever reaches the query text.
pub fn build_query(center: Coordinate, radius_meters: u32, category: &str) -> Result<String, FacilityError> {
    if category.is_empty() || !category.bytes().all(|b| b.is_ascii_lowercase() || b == b'_') {
        return Err(FacilityError::InvalidCategory {
            message: format!("'{category}' is not a plain tag value").into(),
            context: None,
        });
    }
    Ok(format!(
        "[out:json];node[amenity={category}](around:{radius_meters},{},{});out;",
        center.lat(),
        center.lon()
    ))
}

/// Decodes an Overpass JSON body. Elements without a usable position are skipped.
///
/// # Errors
/// [`FacilityError::Decode`] when the body is not the expected JSON shape.
pub fn parse_response(body: &[u8]) -> Result<Vec<Facility>, FacilityError> {
    let response: OverpassResponse =
        serde_json::from_slice(body).context("Decoding Overpass elements")?;

    Ok(response
        .elements
        .into_iter()
        .filter_map(|el| {
            let location = el.lat.zip(el.lon).and_then(|(lat, lon)| Coordinate::try_new(lat, lon).ok());
            if location.is_none() {
                trace!(id = el.id, "Skipping element without a valid position");
            }
            Some(Facility {
                id: el.id,
                location: location?,
                name: el.tags.name,
                category: el.tags.amenity,
            })
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn query_matches_overpass_ql() {
        let center = Coordinate::try_new(12.9, 77.6).expect("valid");
        assert_eq!(
            build_query(center, 2000, "hospital").expect("plain category"),
            "[out:json];node[amenity=hospital](around:2000,12.9,77.6);out;"
        );
        assert!(build_query(center, 500, "fire_station").is_ok());
    }

    #[test]
    fn category_cannot_inject_query_text() {
        let center = Coordinate::try_new(12.9, 77.6).expect("valid");
        for bad in ["", "hospital];out;node[shop", "Hospital", "clinic 1", "pharmacy\n"] {
            let err = build_query(center, 2000, bad).expect_err(bad);
            assert_eq!(err.kind(), "invalid_category");
        }
    }

    #[test]
    fn parses_elements_and_skips_bad_positions() {
        let body = br#"{
            "version": 0.6,
            "elements": [
                {"type":"node","id":1,"lat":12.91,"lon":77.61,"tags":{"name":"City Hospital","amenity":"hospital"}},
                {"type":"node","id":2,"lat":12.92,"lon":77.62},
                {"type":"node","id":3,"lat":95.0,"lon":77.62,"tags":{"name":"Nowhere"}},
                {"type":"node","id":4,"tags":{"name":"No coordinates"}}
            ]
        }"#;

        let facilities = parse_response(body).expect("parse");
        assert_eq!(facilities.len(), 2);
        assert_eq!(facilities[0].name.as_deref(), Some("City Hospital"));
        assert_eq!(facilities[0].category.as_deref(), Some("hospital"));
        assert_eq!(facilities[1].display_name(), "Unknown");
    }

    #[test]
    fn missing_elements_is_an_empty_answer() {
        assert!(parse_response(br#"{"remark":"runtime error"}"#).expect("parse").is_empty());
    }

    #[test]
    fn garbage_is_a_decode_error() {
        let err = parse_response(b"<html>busy</html>").expect_err("not json");
        assert_eq!(err.kind(), "decode");
    }
}
