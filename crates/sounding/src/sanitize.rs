//! Profile sanitization.
//!
//! A required field set is a type implementing [`RequiredFields`]. Projecting a
//! [`Level`] through it yields a typed record whose fields are all present, so
//! the rest of the pipeline never sees a missing value.

use raob_common::Level;
use serde::Serialize;

/// A set of fields a level must carry to be usable for some computation.
pub trait RequiredFields {
    /// The sanitized record produced for a qualifying level.
    type Output;

    /// Project a level, or `None` if any required field is absent.
    fn project(level: &Level) -> Option<Self::Output>;
}

/// {pressure, temperature, dewpoint} for thermodynamic work.
#[derive(Debug, Clone, Copy)]
pub struct Thermo;

/// {direction, speed, height} for kinematic work.
#[derive(Debug, Clone, Copy)]
pub struct Kinematic;

/// A level with all thermodynamic fields present.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ThermoLevel {
    /// hPa
    pub pressure: f64,
    /// °C
    pub temperature: f64,
    /// °C
    pub dewpoint: f64,
}

/// A level with all kinematic fields present.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct WindLevel {
    /// Degrees clockwise from north, direction the wind blows from
    pub direction: f64,
    /// Knots
    pub speed: f64,
    /// Meters
    pub height: f64,
}

impl RequiredFields for Thermo {
    type Output = ThermoLevel;

    fn project(level: &Level) -> Option<ThermoLevel> {
        match (level.pressure, level.temperature, level.dewpoint) {
            (Some(pressure), Some(temperature), Some(dewpoint)) => Some(ThermoLevel {
                pressure,
                temperature,
                dewpoint,
            }),
            _ => None,
        }
    }
}

impl RequiredFields for Kinematic {
    type Output = WindLevel;

    fn project(level: &Level) -> Option<WindLevel> {
        match (level.direction, level.speed, level.height) {
            (Some(direction), Some(speed), Some(height)) => Some(WindLevel {
                direction,
                speed,
                height,
            }),
            _ => None,
        }
    }
}

/// Keep the levels that carry every field in `R`, in their original order.
///
/// Never fails; an empty result means the profile has nothing usable for `R`.
pub fn sanitize<R: RequiredFields>(profile: &[Level]) -> Vec<R::Output> {
    profile.iter().filter_map(R::project).collect()
}

/// Shorthand for `sanitize::<Thermo>`.
pub fn sanitize_thermo(profile: &[Level]) -> Vec<ThermoLevel> {
    sanitize::<Thermo>(profile)
}

/// Shorthand for `sanitize::<Kinematic>`.
pub fn sanitize_wind(profile: &[Level]) -> Vec<WindLevel> {
    sanitize::<Kinematic>(profile)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitize_empty_profile() {
        assert!(sanitize_thermo(&[]).is_empty());
        assert!(sanitize_wind(&[]).is_empty());
    }

    #[test]
    fn test_sanitize_thermo_drops_partial_levels() {
        let profile = vec![
            Level::thermo(1000.0, 25.0, 20.0),
            Level {
                dewpoint: None,
                ..Level::thermo(925.0, 20.0, 15.0)
            },
            Level::thermo(850.0, 15.0, 10.0),
        ];

        let clean = sanitize_thermo(&profile);
        assert_eq!(clean.len(), 2);
        assert_eq!(clean[0].pressure, 1000.0);
        assert_eq!(clean[1].pressure, 850.0);
    }

    #[test]
    fn test_sets_are_independent() {
        // A level can be usable for winds but not thermodynamics
        let profile = vec![Level::wind(270.0, 40.0, 5600.0)];
        assert!(sanitize_thermo(&profile).is_empty());
        assert_eq!(sanitize_wind(&profile).len(), 1);
    }
}
