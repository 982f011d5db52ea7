//! Tests for station search and nearest-station lookup.

use raob_common::station::{Station, StationDirectory, MAX_SEARCH_MATCHES};

fn many_denvers() -> Vec<Station> {
    (0..8)
        .map(|i| Station::new(format!("D{:02}", i), format!("Denver Site {}", i), 39.0 + i as f64, -105.0))
        .collect()
}

// ============================================================================
// search tests
// ============================================================================

#[test]
fn test_search_limits_to_five() {
    let dir = StationDirectory::new(many_denvers());
    let matches = dir.search("Denver");

    assert_eq!(matches.len(), MAX_SEARCH_MATCHES);
    for s in &matches {
        assert!(s.name.to_lowercase().contains("denver") || s.id.eq_ignore_ascii_case("denver"));
    }
}

#[test]
fn test_search_preserves_directory_order() {
    let dir = StationDirectory::new(many_denvers());
    let ids: Vec<_> = dir.search("denver").into_iter().map(|s| s.id).collect();
    assert_eq!(ids, vec!["D00", "D01", "D02", "D03", "D04"]);
}

#[test]
fn test_search_by_code() {
    let dir = StationDirectory::new(vec![
        Station::new("OAX", "Omaha/Valley", 41.32, -96.37),
        Station::new("TOP", "Topeka", 39.07, -95.63),
    ]);

    let matches = dir.search("top");
    assert_eq!(matches.len(), 1);
    assert_eq!(matches[0].id, "TOP");

    assert!(dir.search("zzz").is_empty());
}

// ============================================================================
// nearest tests
// ============================================================================

#[test]
fn test_nearest_is_order_independent() {
    let stations = vec![
        Station::new("AAA", "Alpha", 10.0, 10.0),
        Station::new("BBB", "Bravo", 12.0, 14.0),
        Station::new("CCC", "Charlie", 30.0, -20.0),
        Station::new("DDD", "Delta", -5.0, 2.0),
    ];
    let mut reversed = stations.clone();
    reversed.reverse();
    let mut rotated = stations.clone();
    rotated.rotate_left(2);

    for (lat, lon) in [(11.0, 12.0), (0.0, 0.0), (25.0, -15.0)] {
        let a = StationDirectory::new(stations.clone()).nearest(lat, lon).unwrap().id.clone();
        let b = StationDirectory::new(reversed.clone()).nearest(lat, lon).unwrap().id.clone();
        let c = StationDirectory::new(rotated.clone()).nearest(lat, lon).unwrap().id.clone();
        assert_eq!(a, b);
        assert_eq!(a, c);
    }
}

#[test]
fn test_nearest_tie_takes_first_occurrence() {
    // Both stations are exactly 1 degree from the origin
    let dir = StationDirectory::new(vec![
        Station::new("EAST", "East", 0.0, 1.0),
        Station::new("WEST", "West", 0.0, -1.0),
    ]);
    assert_eq!(dir.nearest(0.0, 0.0).unwrap().id, "EAST");

    let dir = StationDirectory::new(vec![
        Station::new("WEST", "West", 0.0, -1.0),
        Station::new("EAST", "East", 0.0, 1.0),
    ]);
    assert_eq!(dir.nearest(0.0, 0.0).unwrap().id, "WEST");
}

#[test]
fn test_nearest_uses_planar_degrees() {
    // Planar distance picks B even though A is closer on the sphere at high latitude
    let dir = StationDirectory::new(vec![
        Station::new("A", "Far east", 80.0, 8.0),
        Station::new("B", "South", 78.0, 0.0),
    ]);
    assert_eq!(dir.nearest(80.0, 0.0).unwrap().id, "B");
}
