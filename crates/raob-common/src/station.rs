//! Radiosonde launch sites and lookups over the station directory.
//!
//! Nearest-station search uses planar distance in raw (lat, lon) degrees,
//! not great-circle distance. It is an approximation that degrades near the
//! poles and across the antimeridian.

use serde::{Deserialize, Serialize};

/// Maximum number of stations returned by a name/code search.
pub const MAX_SEARCH_MATCHES: usize = 5;

/// A radiosonde launch site.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Station {
    /// Short station code (e.g., "OAX", "DNR"). Compared case-insensitively.
    pub id: String,

    /// Human-readable name.
    pub name: String,

    /// Latitude in degrees.
    pub lat: f64,

    /// Longitude in degrees.
    pub lon: f64,
}

impl Station {
    /// Create a new station.
    pub fn new(id: impl Into<String>, name: impl Into<String>, lat: f64, lon: f64) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            lat,
            lon,
        }
    }

    /// Check whether this station matches a free-text query.
    ///
    /// Matches when the query is a case-insensitive substring of the name or
    /// an exact case-insensitive match of the station code.
    pub fn matches(&self, query: &str) -> bool {
        self.name.to_lowercase().contains(&query.to_lowercase())
            || self.id.eq_ignore_ascii_case(query)
    }

    /// Squared planar distance in degree-space.
    fn planar_distance_sq(&self, lat: f64, lon: f64) -> f64 {
        let dlat = lat - self.lat;
        let dlon = lon - self.lon;
        dlat * dlat + dlon * dlon
    }
}

/// A snapshot of the station directory, fetched fresh for each lookup.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StationDirectory {
    /// Stations in upstream order.
    pub stations: Vec<Station>,
}

impl StationDirectory {
    pub fn new(stations: Vec<Station>) -> Self {
        Self { stations }
    }

    /// Find up to [`MAX_SEARCH_MATCHES`] stations matching `query`, in directory order.
    pub fn search(&self, query: &str) -> Vec<Station> {
        self.stations
            .iter()
            .filter(|s| s.matches(query))
            .take(MAX_SEARCH_MATCHES)
            .cloned()
            .collect()
    }

    /// Find the station closest to (lat, lon).
    ///
    /// Ties resolve to the earliest station in directory order. Non-finite
    /// coordinates have no nearest station.
    pub fn nearest(&self, lat: f64, lon: f64) -> Option<&Station> {
        if !(lat.is_finite() && lon.is_finite()) {
            return None;
        }

        let mut best: Option<(&Station, f64)> = None;
        for station in &self.stations {
            let d = station.planar_distance_sq(lat, lon);
            match best {
                Some((_, best_d)) if d >= best_d => {}
                _ => best = Some((station, d)),
            }
        }
        best.map(|(s, _)| s)
    }

    pub fn len(&self) -> usize {
        self.stations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stations.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn directory() -> StationDirectory {
        StationDirectory::new(vec![
            Station::new("OAX", "Omaha/Valley", 41.32, -96.37),
            Station::new("DNR", "Denver", 39.77, -104.87),
            Station::new("GJT", "Grand Junction", 39.12, -108.53),
        ])
    }

    #[test]
    fn test_matches_name_substring() {
        let station = Station::new("DNR", "Denver", 39.77, -104.87);
        assert!(station.matches("denv"));
        assert!(station.matches("DENVER"));
        assert!(!station.matches("boulder"));
    }

    #[test]
    fn test_matches_code_exactly() {
        let station = Station::new("OAX", "Omaha/Valley", 41.32, -96.37);
        assert!(station.matches("oax"));
        assert!(station.matches("OAX"));
        // Partial codes only match through the name
        assert!(!station.matches("OA "));
    }

    #[test]
    fn test_nearest() {
        let dir = directory();
        assert_eq!(dir.nearest(40.0, -105.0).unwrap().id, "DNR");
        assert_eq!(dir.nearest(41.0, -96.0).unwrap().id, "OAX");
    }

    #[test]
    fn test_nearest_empty_directory() {
        let dir = StationDirectory::default();
        assert!(dir.nearest(40.0, -105.0).is_none());
    }

    #[test]
    fn test_nearest_rejects_non_finite_coordinates() {
        let dir = directory();
        assert!(dir.nearest(f64::NAN, -105.0).is_none());
        assert!(dir.nearest(40.0, f64::INFINITY).is_none());
    }
}
