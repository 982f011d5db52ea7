//! Lifted surface-parcel temperature trace.

use metfor::Kelvin;
use raob_common::{RaobError, RaobResult};
use serde::Serialize;
use tracing::debug;

use crate::sanitize::ThermoLevel;
use crate::thermo;

/// Temperature of a surface parcel lifted through the levels of a profile.
///
/// The trace follows the profile's levels in order. It stops early where the
/// saturated adiabat can no longer be solved, so it may be shorter than the
/// profile but never longer.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ParcelPath {
    /// hPa, same order as the source profile
    pub pressure: Vec<f64>,
    /// °C
    pub temperature: Vec<f64>,
    /// hPa
    pub lcl_pressure: f64,
}

impl ParcelPath {
    pub fn len(&self) -> usize {
        self.pressure.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pressure.is_empty()
    }
}

/// Lift the first level's parcel through every pressure level of `profile`.
///
/// The parcel follows the dry adiabat up to its LCL and the saturated
/// adiabat above it.
pub fn parcel_path(profile: &[ThermoLevel]) -> RaobResult<ParcelPath> {
    validate_thermo(profile)?;

    let parcel = Parcel::from_surface(&profile[0])?;
    let (pressure, temperature): (Vec<f64>, Vec<f64>) = profile
        .iter()
        .map_while(|level| {
            parcel
                .temperature_at(level.pressure)
                .map(|t| (level.pressure, t))
        })
        .unzip();

    if pressure.len() < profile.len() {
        debug!(
            lifted = pressure.len(),
            levels = profile.len(),
            "Parcel path stops below the top of the profile"
        );
    }

    Ok(ParcelPath {
        pressure,
        temperature,
        lcl_pressure: parcel.lcl_pressure,
    })
}

/// Surface parcel with the conserved quantities needed to lift it.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Parcel {
    theta: Kelvin,
    theta_e: Kelvin,
    mixing_ratio: f64,
    pub lcl_pressure: f64,
    pub lcl_temperature: f64,
}

impl Parcel {
    pub(crate) fn from_surface(surface: &ThermoLevel) -> RaobResult<Self> {
        let ThermoLevel {
            pressure,
            temperature,
            dewpoint,
        } = *surface;
        let (lcl_pressure, lcl_temperature) = thermo::lcl(pressure, temperature, dewpoint)?;
        let invalid = || {
            RaobError::InvalidProfile(format!(
                "surface parcel {}/{} °C at {} hPa is out of range",
                temperature, dewpoint, pressure
            ))
        };

        Ok(Parcel {
            theta: thermo::theta(pressure, temperature),
            theta_e: thermo::theta_e(pressure, temperature, dewpoint).ok_or_else(invalid)?,
            mixing_ratio: thermo::mixing_ratio(pressure, dewpoint).ok_or_else(invalid)?,
            lcl_pressure,
            lcl_temperature,
        })
    }

    fn is_saturated_at(&self, pressure: f64) -> bool {
        pressure < self.lcl_pressure
    }

    /// Parcel temperature (°C) at `pressure`.
    pub(crate) fn temperature_at(&self, pressure: f64) -> Option<f64> {
        if self.is_saturated_at(pressure) {
            thermo::temperature_on_moist_adiabat(self.theta_e, pressure)
        } else {
            Some(thermo::temperature_on_dry_adiabat(self.theta, pressure))
        }
    }

    /// Parcel virtual temperature (K) at `pressure`.
    pub(crate) fn virtual_temperature_at(&self, pressure: f64) -> Option<f64> {
        let t = self.temperature_at(pressure)?;
        let td = if self.is_saturated_at(pressure) {
            t
        } else {
            thermo::dewpoint_from_mixing_ratio(pressure, self.mixing_ratio)?.min(t)
        };
        thermo::virtual_temperature(pressure, t, td)
    }
}

const ABSOLUTE_ZERO_C: f64 = -273.15;

/// Reject thermodynamic profiles the engine cannot integrate.
pub(crate) fn validate_thermo(profile: &[ThermoLevel]) -> RaobResult<()> {
    if profile.is_empty() {
        return Err(RaobError::InvalidProfile(
            "thermodynamic profile is empty".to_string(),
        ));
    }

    let mut previous: Option<f64> = None;
    for (i, level) in profile.iter().enumerate() {
        let ThermoLevel {
            pressure,
            temperature,
            dewpoint,
        } = *level;

        if !(pressure.is_finite() && temperature.is_finite() && dewpoint.is_finite()) {
            return Err(RaobError::InvalidProfile(format!(
                "level {} has a non-finite value",
                i
            )));
        }
        if pressure <= 0.0 {
            return Err(RaobError::InvalidProfile(format!(
                "level {} has non-positive pressure {}",
                i, pressure
            )));
        }
        if temperature <= ABSOLUTE_ZERO_C || dewpoint <= ABSOLUTE_ZERO_C {
            return Err(RaobError::InvalidProfile(format!(
                "level {} is below absolute zero",
                i
            )));
        }
        if let Some(prev) = previous {
            if pressure > prev {
                return Err(RaobError::InvalidProfile(format!(
                    "pressure increases at level {} ({} > {})",
                    i, pressure, prev
                )));
            }
        }
        previous = Some(pressure);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn level(p: f64, t: f64, td: f64) -> ThermoLevel {
        ThermoLevel {
            pressure: p,
            temperature: t,
            dewpoint: td,
        }
    }

    #[test]
    fn test_parcel_starts_at_surface_temperature() {
        let profile = vec![level(1000.0, 25.0, 20.0), level(850.0, 15.0, 5.0)];
        let path = parcel_path(&profile).unwrap();

        assert_eq!(path.len(), 2);
        assert!((path.temperature[0] - 25.0).abs() < 1e-9);
        assert_eq!(path.pressure, vec![1000.0, 850.0]);
    }

    #[test]
    fn test_parcel_path_cools_with_height() {
        let profile = vec![
            level(1000.0, 25.0, 20.0),
            level(900.0, 18.0, 14.0),
            level(700.0, 5.0, -5.0),
            level(500.0, -12.0, -25.0),
            level(300.0, -40.0, -50.0),
        ];
        let path = parcel_path(&profile).unwrap();
        for pair in path.temperature.windows(2) {
            assert!(pair[1] < pair[0]);
        }
    }

    #[test]
    fn test_parcel_path_carries_lcl() {
        let profile = vec![level(1000.0, 25.0, 20.0), level(850.0, 15.0, 5.0)];
        let path = parcel_path(&profile).unwrap();
        assert!((path.lcl_pressure - 929.3).abs() < 1.0);
    }

    #[test]
    fn test_moist_surface_parcel_is_virtually_warmer() {
        let parcel = Parcel::from_surface(&level(1000.0, 25.0, 20.0)).unwrap();
        let tv = parcel.virtual_temperature_at(1000.0).unwrap();
        assert!(tv > 25.0 + 273.15);
    }

    #[test]
    fn test_path_is_a_prefix_of_the_profile() {
        let profile = vec![
            level(1000.0, 30.0, 22.0),
            level(700.0, 8.0, -4.0),
            level(300.0, -41.0, -52.0),
            level(100.0, -60.0, -75.0),
            level(10.0, -50.0, -85.0),
        ];
        let path = parcel_path(&profile).unwrap();

        assert!(path.len() >= 3 && path.len() <= profile.len());
        for (p, level) in path.pressure.iter().zip(&profile) {
            assert_eq!(*p, level.pressure);
        }
    }

    #[test]
    fn test_rejects_empty_profile() {
        assert!(matches!(
            parcel_path(&[]),
            Err(RaobError::InvalidProfile(_))
        ));
    }

    #[test]
    fn test_rejects_non_finite_values() {
        let profile = vec![level(1000.0, f64::NAN, 20.0)];
        assert!(matches!(
            validate_thermo(&profile),
            Err(RaobError::InvalidProfile(_))
        ));
    }

    #[test]
    fn test_rejects_increasing_pressure() {
        let profile = vec![level(850.0, 15.0, 5.0), level(1000.0, 25.0, 20.0)];
        assert!(matches!(
            validate_thermo(&profile),
            Err(RaobError::InvalidProfile(_))
        ));
    }

    #[test]
    fn test_accepts_repeated_pressure() {
        let profile = vec![level(1000.0, 25.0, 20.0), level(1000.0, 24.8, 19.9)];
        assert!(validate_thermo(&profile).is_ok());
    }
}
