//! The built-in store catalog and the `Catalog` container.

use super::types::{CatalogError, Location};
use std::collections::HashSet;
use std::fs;
use std::path::Path;

struct BuiltinStore {
    id: u32,
    name: &'static str,
    city: &'static str,
    lat: f64,
    lon: f64,
}

const BUILTIN_STORES: &[BuiltinStore] = &[
    // Augsburg
    BuiltinStore {
        id: 1, name: "McDonald's Augsburg City", city: "Augsburg",
        lat: 48.36686, lon: 10.89804,
    },
    BuiltinStore {
        id: 2, name: "McDonald's Augsburg B17", city: "Augsburg",
        lat: 48.35379, lon: 10.85483,
    },
    // München
    BuiltinStore {
        id: 3, name: "McDonald's München Marienplatz", city: "München",
        lat: 48.13736, lon: 11.57549,
    },
    BuiltinStore {
        id: 4, name: "McDonald's München HBF", city: "München",
        lat: 48.14023, lon: 11.55857,
    },
    // Hamburg
    BuiltinStore {
        id: 5, name: "McDonald's Hamburg HBF", city: "Hamburg",
        lat: 53.55265, lon: 10.0069,
    },
    BuiltinStore {
        id: 6, name: "McDonald's Hamburg Mönckebergstraße", city: "Hamburg",
        lat: 53.55047, lon: 10.00134,
    },
    // Berlin
    BuiltinStore {
        id: 7, name: "McDonald's Berlin Alexanderplatz", city: "Berlin",
        lat: 52.52192, lon: 13.41321,
    },
    BuiltinStore {
        id: 8, name: "McDonald's Berlin HBF", city: "Berlin",
        lat: 52.52508, lon: 13.36941,
    },
    // Köln
    BuiltinStore {
        id: 9, name: "McDonald's Köln Dom", city: "Köln",
        lat: 50.9413, lon: 6.9583,
    },
    // Frankfurt
    BuiltinStore {
        id: 10, name: "McDonald's Frankfurt Zeil", city: "Frankfurt",
        lat: 50.11552, lon: 8.68341,
    },
];

/// The closed, ordered set of stores for a session.
///
/// Declaration order is significant: it is the default listing order and
/// the tie-break for every stable sort over the catalog.
#[derive(Debug, Clone)]
pub struct Catalog {
    locations: Vec<Location>,
}

impl Catalog {
    /// The built-in store list.
    pub fn builtin() -> Self {
        let locations = BUILTIN_STORES
            .iter()
            .map(|s| Location {
                id: s.id,
                display_name: s.name.to_string(),
                city_name: s.city.to_string(),
                latitude: s.lat,
                longitude: s.lon,
            })
            .collect();
        Self { locations }
    }

    /// Build a catalog from explicit locations, rejecting duplicate ids and
    /// coordinates outside the valid lat/lon ranges.
    pub fn from_locations(locations: Vec<Location>) -> Result<Self, CatalogError> {
        let mut seen = HashSet::new();
        for loc in &locations {
            if !seen.insert(loc.id) {
                return Err(CatalogError::DuplicateId(loc.id));
            }
            if !(-90.0..=90.0).contains(&loc.latitude) || !(-180.0..=180.0).contains(&loc.longitude) {
                return Err(CatalogError::InvalidCoordinates {
                    id: loc.id,
                    lat: loc.latitude,
                    lon: loc.longitude,
                });
            }
        }
        Ok(Self { locations })
    }

    /// Load a catalog from a JSON array of locations.
    pub fn load_from(path: &Path) -> Result<Self, CatalogError> {
        let data = fs::read_to_string(path)?;
        let locations: Vec<Location> = serde_json::from_str(&data)?;
        Self::from_locations(locations)
    }

    pub fn get(&self, id: u32) -> Option<&Location> {
        self.locations.iter().find(|l| l.id == id)
    }

    pub fn contains(&self, id: u32) -> bool {
        self.get(id).is_some()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Location> {
        self.locations.iter()
    }

    pub fn as_slice(&self) -> &[Location] {
        &self.locations
    }

    pub fn len(&self) -> usize {
        self.locations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.locations.is_empty()
    }
}

impl<'a> IntoIterator for &'a Catalog {
    type Item = &'a Location;
    type IntoIter = std::slice::Iter<'a, Location>;

    fn into_iter(self) -> Self::IntoIter {
        self.locations.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn loc(id: u32, lat: f64, lon: f64) -> Location {
        Location {
            id,
            display_name: format!("Store {}", id),
            city_name: "Testburg".into(),
            latitude: lat,
            longitude: lon,
        }
    }

    #[test]
    fn test_builtin_catalog() {
        let catalog = Catalog::builtin();
        assert_eq!(catalog.len(), 10);
        let ids: Vec<u32> = catalog.iter().map(|l| l.id).collect();
        assert_eq!(ids, (1..=10).collect::<Vec<_>>());
        assert_eq!(catalog.get(3).unwrap().city_name, "München");
        assert!(catalog.get(11).is_none());
    }

    #[test]
    fn test_builtin_passes_validation() {
        let builtin = Catalog::builtin();
        assert!(Catalog::from_locations(builtin.as_slice().to_vec()).is_ok());
    }

    #[test]
    fn test_duplicate_id_rejected() {
        let err = Catalog::from_locations(vec![loc(1, 0.0, 0.0), loc(1, 1.0, 1.0)]).unwrap_err();
        assert!(matches!(err, CatalogError::DuplicateId(1)));
    }

    #[test]
    fn test_invalid_coordinates_rejected() {
        let err = Catalog::from_locations(vec![loc(7, 91.0, 0.0)]).unwrap_err();
        assert!(matches!(err, CatalogError::InvalidCoordinates { id: 7, .. }));
        assert!(Catalog::from_locations(vec![loc(8, 0.0, -180.5)]).is_err());
    }

    #[test]
    fn test_load_from_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("stores.json");
        let json = r#"[
            {"id": 42, "display_name": "Kiosk Nord", "city_name": "Kiel", "latitude": 54.32, "longitude": 10.13},
            {"id": 7, "display_name": "Kiosk Süd", "city_name": "Kiel", "latitude": 54.30, "longitude": 10.12}
        ]"#;
        fs::write(&path, json).unwrap();

        let catalog = Catalog::load_from(&path).unwrap();
        assert_eq!(catalog.len(), 2);
        // declaration order is kept, not sorted by id
        assert_eq!(catalog.as_slice()[0].id, 42);
        assert!(catalog.contains(7));
    }

    #[test]
    fn test_load_from_missing_file() {
        let dir = TempDir::new().unwrap();
        let err = Catalog::load_from(&dir.path().join("nope.json")).unwrap_err();
        assert!(matches!(err, CatalogError::Io(_)));
    }

    #[test]
    fn test_load_from_malformed_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("bad.json");
        fs::write(&path, "{not json").unwrap();
        assert!(matches!(Catalog::load_from(&path).unwrap_err(), CatalogError::Parse(_)));
    }
}
