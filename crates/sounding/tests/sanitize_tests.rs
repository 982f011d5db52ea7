//! Sanitization tests over every combination of missing fields.

use raob_common::Level;
use sounding::{sanitize_thermo, sanitize_wind};
use test_utils::{
    every_mask_profile, masked_profile, DEWPOINT_BIT, DIRECTION_BIT, HEIGHT_BIT, PRESSURE_BIT,
    SPEED_BIT, TEMPERATURE_BIT,
};

const THERMO_MASK: u8 = PRESSURE_BIT | TEMPERATURE_BIT | DEWPOINT_BIT;
const WIND_MASK: u8 = DIRECTION_BIT | SPEED_BIT | HEIGHT_BIT;

fn has_thermo(level: &Level) -> bool {
    level.pressure.is_some() && level.temperature.is_some() && level.dewpoint.is_some()
}

fn has_wind(level: &Level) -> bool {
    level.direction.is_some() && level.speed.is_some() && level.height.is_some()
}

#[test]
fn test_thermo_keeps_exactly_complete_levels() {
    let profile = every_mask_profile();
    let expected = profile.iter().filter(|l| has_thermo(l)).count();

    let thermo = sanitize_thermo(&profile);

    // 8 of the 64 masks carry all three thermodynamic bits
    assert_eq!(thermo.len(), expected);
    assert_eq!(thermo.len(), 8);
}

#[test]
fn test_wind_keeps_exactly_complete_levels() {
    let profile = every_mask_profile();
    let wind = sanitize_wind(&profile);
    assert_eq!(wind.len(), profile.iter().filter(|l| has_wind(l)).count());
    assert_eq!(wind.len(), 8);
}

#[test]
fn test_thermo_preserves_relative_order() {
    let profile = every_mask_profile();
    let thermo = sanitize_thermo(&profile);

    let expected: Vec<f64> = profile
        .iter()
        .filter(|l| has_thermo(l))
        .filter_map(|l| l.pressure)
        .collect();
    let actual: Vec<f64> = thermo.iter().map(|l| l.pressure).collect();

    assert_eq!(actual, expected);
    assert!(actual.windows(2).all(|w| w[0] > w[1]));
}

#[test]
fn test_wind_preserves_values() {
    let profile = masked_profile(&[WIND_MASK, 0, WIND_MASK | PRESSURE_BIT]);
    let wind = sanitize_wind(&profile);

    assert_eq!(wind.len(), 2);
    assert_eq!(Some(wind[0].speed), profile[0].speed);
    assert_eq!(Some(wind[1].height), profile[2].height);
}

#[test]
fn test_sets_are_independent() {
    // Thermo-only and wind-only levels land in exactly one set each
    let profile = masked_profile(&[THERMO_MASK, WIND_MASK, THERMO_MASK | WIND_MASK]);

    assert_eq!(sanitize_thermo(&profile).len(), 2);
    assert_eq!(sanitize_wind(&profile).len(), 2);
}

#[test]
fn test_upstream_nulls_are_dropped() {
    let json = r#"[
        {"pres": 1000.0, "tmpc": 25.0, "dwpc": 20.0, "drct": 180.0, "sknt": 10.0, "hght": 110.0},
        {"pres": 925.0, "tmpc": null, "dwpc": 15.0, "drct": 200.0, "sknt": 20.0, "hght": 800.0},
        {"pres": 850.0, "tmpc": 15.0, "dwpc": 5.0}
    ]"#;
    let profile: Vec<Level> = serde_json::from_str(json).unwrap();

    let thermo = sanitize_thermo(&profile);
    let wind = sanitize_wind(&profile);

    assert_eq!(
        thermo.iter().map(|l| l.pressure).collect::<Vec<_>>(),
        vec![1000.0, 850.0]
    );
    assert_eq!(
        wind.iter().map(|l| l.height).collect::<Vec<_>>(),
        vec![110.0, 800.0]
    );
}

#[test]
fn test_empty_profile() {
    assert!(sanitize_thermo(&[]).is_empty());
    assert!(sanitize_wind(&[]).is_empty());
}
