mod client;
mod error;

pub use client::{CatalogClient, DEFAULT_GP_URL};
pub use error::CatalogError;

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use sgp4::{Constants, Elements};

/// One satellite's element set with its derived propagation constants.
///
/// Immutable once built; a refresh replaces the whole value.
pub struct Satellite {
    pub name: String,
    pub elements: Elements,
    pub constants: Constants,
}

impl Satellite {
    pub fn from_elements(elements: Elements) -> Result<Self, CatalogError> {
        let constants = Constants::from_elements(&elements)
            .map_err(|e| CatalogError::InvalidTle(e.to_string()))?;
        let name = elements
            .object_name
            .clone()
            .unwrap_or_else(|| format!("NORAD {}", elements.norad_id));
        Ok(Self {
            name,
            elements,
            constants,
        })
    }

    pub fn norad_id(&self) -> u64 {
        self.elements.norad_id
    }

    pub fn epoch(&self) -> DateTime<Utc> {
        self.elements.datetime.and_utc()
    }
}

/// Element sets keyed by exact object name.
pub struct Catalog {
    satellites: HashMap<String, Satellite>,
}

impl Catalog {
    pub fn from_elements(sets: Vec<Elements>) -> Result<Self, CatalogError> {
        let mut satellites = HashMap::with_capacity(sets.len());
        for elements in sets {
            let satellite = Satellite::from_elements(elements)?;
            satellites.insert(satellite.name.clone(), satellite);
        }
        Ok(Self { satellites })
    }

    /// Parse classic TLE text. Accepts both 2-line entries and 3-line
    /// entries with a leading name line, any number of them per input.
    pub fn from_tle_text(content: &str) -> Result<Self, CatalogError> {
        let lines: Vec<&str> = content
            .lines()
            .map(str::trim)
            .filter(|l| !l.is_empty())
            .collect();

        let mut sets = Vec::new();
        let mut i = 0;
        while i < lines.len() {
            if lines[i].starts_with("1 ") && i + 1 < lines.len() && lines[i + 1].starts_with("2 ")
            {
                sets.push(parse_entry(None, lines[i], lines[i + 1])?);
                i += 2;
            } else if i + 2 < lines.len()
                && lines[i + 1].starts_with("1 ")
                && lines[i + 2].starts_with("2 ")
            {
                sets.push(parse_entry(Some(lines[i]), lines[i + 1], lines[i + 2])?);
                i += 3;
            } else {
                i += 1; // skip unknown line
            }
        }

        Self::from_elements(sets)
    }

    pub fn get(&self, name: &str) -> Result<&Satellite, CatalogError> {
        self.satellites
            .get(name)
            .ok_or_else(|| CatalogError::NotFound(name.to_string()))
    }

    /// Consume the catalog, keeping only the named satellite.
    pub fn take(mut self, name: &str) -> Result<Satellite, CatalogError> {
        self.satellites
            .remove(name)
            .ok_or_else(|| CatalogError::NotFound(name.to_string()))
    }

    pub fn len(&self) -> usize {
        self.satellites.len()
    }

    pub fn is_empty(&self) -> bool {
        self.satellites.is_empty()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.satellites.keys().map(String::as_str)
    }
}

fn parse_entry(name: Option<&str>, line1: &str, line2: &str) -> Result<Elements, CatalogError> {
    Elements::from_tle(
        name.map(|n| n.to_string()),
        line1.as_bytes(),
        line2.as_bytes(),
    )
    .map_err(|e| CatalogError::InvalidTle(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    const ISS_TLE: &str = "ISS (ZARYA)
1 25544U 98067A   08264.51782528 -.00002182  00000-0 -11606-4 0  2927
2 25544  51.6416 247.4627 0006703 130.5360 325.0288 15.72125391563537";

    const BARE_TLE: &str = "
1 25544U 98067A   08264.51782528 -.00002182  00000-0 -11606-4 0  2927
2 25544  51.6416 247.4627 0006703 130.5360 325.0288 15.72125391563537";

    #[test]
    fn parses_named_entry() {
        let catalog = Catalog::from_tle_text(ISS_TLE).expect("valid TLE");
        assert_eq!(catalog.len(), 1);
        let sat = catalog.get("ISS (ZARYA)").expect("present");
        assert_eq!(sat.norad_id(), 25544);
    }

    #[test]
    fn parses_bare_two_line_entry() {
        let catalog = Catalog::from_tle_text(BARE_TLE).expect("valid TLE");
        let sat = catalog.get("NORAD 25544").expect("keyed by fallback name");
        assert_eq!(sat.norad_id(), 25544);
    }

    #[test]
    fn unknown_name_is_not_found() {
        let catalog = Catalog::from_tle_text(ISS_TLE).expect("valid TLE");
        match catalog.get("HUBBLE") {
            Err(CatalogError::NotFound(name)) => assert_eq!(name, "HUBBLE"),
            other => panic!("expected NotFound, got {:?}", other.map(|s| s.name.clone())),
        }
    }

    #[test]
    fn garbage_lines_are_skipped() {
        let text = format!("# comment\n\n{}\ntrailing junk", ISS_TLE);
        let catalog = Catalog::from_tle_text(&text).expect("valid TLE");
        assert_eq!(catalog.len(), 1);
    }

    #[test]
    fn omm_json_round_trip() {
        let json = r#"[{
            "OBJECT_NAME": "ISS (ZARYA)",
            "OBJECT_ID": "1998-067A",
            "EPOCH": "2008-09-20T12:25:40.104192",
            "MEAN_MOTION": 15.72125391,
            "ECCENTRICITY": 0.0006703,
            "INCLINATION": 51.6416,
            "RA_OF_ASC_NODE": 247.4627,
            "ARG_OF_PERICENTER": 130.536,
            "MEAN_ANOMALY": 325.0288,
            "EPHEMERIS_TYPE": 0,
            "CLASSIFICATION_TYPE": "U",
            "NORAD_CAT_ID": 25544,
            "ELEMENT_SET_NO": 292,
            "REV_AT_EPOCH": 56353,
            "BSTAR": -1.1606e-5,
            "MEAN_MOTION_DOT": -2.182e-5,
            "MEAN_MOTION_DDOT": 0
        }]"#;
        let sets: Vec<Elements> = serde_json::from_str(json).expect("valid OMM");
        let catalog = Catalog::from_elements(sets).expect("valid elements");
        assert!(catalog.get("ISS (ZARYA)").is_ok());
    }
}
