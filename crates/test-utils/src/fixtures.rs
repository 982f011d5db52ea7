//! Common test fixtures for sounding tests.
//!
//! Soundings are (pressure hPa, temperature °C, dewpoint °C, direction °,
//! speed kt, height m) rows, ground first.

use raob_common::{Level, Profile, Station};
use serde_json::{json, Value};

type Row = (f64, f64, f64, f64, f64, f64);

/// Warm, moist boundary layer under steep lapse rates. Large CAPE, little CIN.
pub const UNSTABLE_ROWS: &[Row] = &[
    (1000.0, 30.0, 22.0, 170.0, 10.0, 110.0),
    (950.0, 26.0, 20.0, 180.0, 20.0, 560.0),
    (900.0, 22.0, 17.0, 195.0, 28.0, 1020.0),
    (850.0, 19.0, 14.0, 205.0, 35.0, 1500.0),
    (800.0, 16.0, 8.0, 215.0, 38.0, 2000.0),
    (750.0, 12.0, 2.0, 225.0, 40.0, 2520.0),
    (700.0, 8.0, -4.0, 230.0, 42.0, 3070.0),
    (650.0, 4.0, -10.0, 235.0, 45.0, 3640.0),
    (600.0, -1.0, -15.0, 240.0, 48.0, 4250.0),
    (550.0, -6.0, -20.0, 245.0, 52.0, 4890.0),
    (500.0, -11.0, -25.0, 250.0, 55.0, 5580.0),
    (450.0, -17.0, -31.0, 250.0, 60.0, 6320.0),
    (400.0, -24.0, -38.0, 255.0, 65.0, 7130.0),
    (350.0, -32.0, -45.0, 255.0, 70.0, 8010.0),
    (300.0, -41.0, -52.0, 260.0, 80.0, 8990.0),
    (250.0, -51.0, -60.0, 260.0, 90.0, 10100.0),
    (200.0, -56.0, -66.0, 265.0, 85.0, 11400.0),
    (150.0, -58.0, -70.0, 265.0, 70.0, 13200.0),
    (100.0, -60.0, -75.0, 270.0, 50.0, 16000.0),
];

/// Moist surface layer under a warm nose near 900 hPa. Positive CAPE above
/// a layer of significant CIN.
pub const CAPPED_ROWS: &[Row] = &[
    (1000.0, 28.0, 22.0, 160.0, 12.0, 110.0),
    (950.0, 24.0, 20.0, 175.0, 25.0, 560.0),
    (900.0, 26.0, 8.0, 200.0, 30.0, 1030.0),
    (850.0, 24.0, 4.0, 215.0, 32.0, 1520.0),
    (800.0, 19.0, 0.0, 225.0, 35.0, 2040.0),
    (700.0, 9.0, -8.0, 235.0, 40.0, 3120.0),
    (600.0, -1.0, -15.0, 245.0, 45.0, 4300.0),
    (500.0, -11.0, -25.0, 250.0, 55.0, 5630.0),
    (400.0, -24.0, -38.0, 255.0, 65.0, 7180.0),
    (300.0, -41.0, -52.0, 260.0, 80.0, 9040.0),
    (200.0, -56.0, -66.0, 265.0, 85.0, 11450.0),
];

/// Isothermal, very dry column. No positive area anywhere.
pub const STABLE_ROWS: &[Row] = &[
    (1000.0, 30.0, -20.0, 0.0, 5.0, 110.0),
    (900.0, 30.0, -20.0, 10.0, 8.0, 1000.0),
    (800.0, 30.0, -20.0, 20.0, 10.0, 2000.0),
    (700.0, 30.0, -20.0, 30.0, 12.0, 3100.0),
    (600.0, 30.0, -20.0, 40.0, 14.0, 4400.0),
    (500.0, 30.0, -20.0, 50.0, 16.0, 5900.0),
];

/// Build a fully populated profile from fixture rows.
pub fn profile_from_rows(rows: &[Row]) -> Profile {
    rows.iter()
        .map(|&(p, t, td, dir, spd, hght)| Level::thermo(p, t, td).with_wind(dir, spd, hght))
        .collect()
}

pub fn unstable_sounding() -> Profile {
    profile_from_rows(UNSTABLE_ROWS)
}

pub fn capped_sounding() -> Profile {
    profile_from_rows(CAPPED_ROWS)
}

pub fn stable_sounding() -> Profile {
    profile_from_rows(STABLE_ROWS)
}

/// Upstream level records for a profile, with absent fields as JSON `null`.
pub fn levels_json(profile: &[Level]) -> Vec<Value> {
    profile
        .iter()
        .map(|l| {
            json!({
                "pres": l.pressure,
                "tmpc": l.temperature,
                "dwpc": l.dewpoint,
                "drct": l.direction,
                "sknt": l.speed,
                "hght": l.height,
            })
        })
        .collect()
}

/// A sounding archive response carrying one profile.
pub fn sounding_response_json(station: &str, valid: &str, profile: &[Level]) -> Value {
    json!({
        "profiles": [{
            "station": station,
            "valid": valid,
            "data": levels_json(profile),
        }]
    })
}

/// A sounding archive response with no observation.
pub fn empty_sounding_response_json() -> Value {
    json!({ "profiles": [] })
}

/// A handful of real radiosonde sites.
pub fn sample_stations() -> Vec<Station> {
    vec![
        Station::new("OAX", "Omaha/Valley", 41.32, -96.37),
        Station::new("DNR", "Denver", 39.77, -104.87),
        Station::new("TOP", "Topeka", 39.07, -95.63),
        Station::new("OUN", "Norman", 35.18, -97.44),
        Station::new("GJT", "Grand Junction", 39.12, -108.53),
        Station::new("ABQ", "Albuquerque", 35.04, -106.62),
    ]
}

/// A station directory response as served by the network listing endpoint.
pub fn station_directory_json(stations: &[Station]) -> Value {
    let data: Vec<Value> = stations
        .iter()
        .map(|s| {
            json!({
                "id": s.id,
                "name": s.name,
                "lat": s.lat,
                "lon": s.lon,
                "network": "RAOB",
            })
        })
        .collect();
    json!({ "data": data })
}
