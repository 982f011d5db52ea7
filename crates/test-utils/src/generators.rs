//! Profile generators for sanitization tests.
//!
//! Fields are switched on and off by a presence mask so a test can walk every
//! combination of missing fields. Bit order follows the upstream record:
//! pres, tmpc, dwpc, drct, sknt, hght.

use raob_common::Level;

pub const PRESSURE_BIT: u8 = 1 << 0;
pub const TEMPERATURE_BIT: u8 = 1 << 1;
pub const DEWPOINT_BIT: u8 = 1 << 2;
pub const DIRECTION_BIT: u8 = 1 << 3;
pub const SPEED_BIT: u8 = 1 << 4;
pub const HEIGHT_BIT: u8 = 1 << 5;

/// Every field present.
pub const ALL_FIELDS: u8 = 0b11_1111;

/// A level with index-derived values and only the masked fields present.
///
/// Pressure decreases with `index`, so retained levels can be checked for
/// order by their pressure alone.
pub fn masked_level(index: usize, mask: u8) -> Level {
    let i = index as f64;
    let pick = |bit: u8, value: f64| (mask & bit != 0).then_some(value);
    Level {
        pressure: pick(PRESSURE_BIT, 1000.0 - 10.0 * i),
        temperature: pick(TEMPERATURE_BIT, 25.0 - 0.5 * i),
        dewpoint: pick(DEWPOINT_BIT, 15.0 - 0.7 * i),
        direction: pick(DIRECTION_BIT, (180.0 + 5.0 * i) % 360.0),
        speed: pick(SPEED_BIT, 10.0 + i),
        height: pick(HEIGHT_BIT, 100.0 + 90.0 * i),
    }
}

/// One level per mask, in the given order.
pub fn masked_profile(masks: &[u8]) -> Vec<Level> {
    masks
        .iter()
        .enumerate()
        .map(|(i, &mask)| masked_level(i, mask))
        .collect()
}

/// A profile that cycles through all 64 presence combinations.
pub fn every_mask_profile() -> Vec<Level> {
    let masks: Vec<u8> = (0..=ALL_FIELDS).collect();
    masked_profile(&masks)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_masked_level_all_fields() {
        let level = masked_level(0, ALL_FIELDS);
        assert_eq!(level.pressure, Some(1000.0));
        assert!(level.height.is_some());
    }

    #[test]
    fn test_masked_level_no_fields() {
        assert_eq!(masked_level(3, 0), Level::default());
    }

    #[test]
    fn test_every_mask_profile_len() {
        assert_eq!(every_mask_profile().len(), 64);
    }
}
