//! Moist thermodynamics on top of `metfor`.
//!
//! Values cross this module as plain `f64` in hPa and °C; inside they travel
//! as `metfor` quantities. `metfor` returns `None` outside the range its
//! formulas are valid for, and so do the fallible helpers here.

use metfor::{Celsius, HectoPascal, Kelvin, Quantity};
use raob_common::{RaobError, RaobResult};

/// Lifted condensation level of a parcel, as `(pressure_hpa, temperature_c)`.
///
/// A saturated (or supersaturated) parcel condenses where it starts.
pub fn lcl(pressure: f64, temperature: f64, dewpoint: f64) -> RaobResult<(f64, f64)> {
    if dewpoint >= temperature {
        return Ok((pressure, temperature));
    }

    let (lcl_p, lcl_t) = metfor::pressure_and_temperature_at_lcl(
        Celsius(temperature),
        Celsius(dewpoint),
        HectoPascal(pressure),
    )
    .ok_or_else(|| {
        RaobError::InvalidProfile(format!(
            "no LCL for parcel {}/{} °C at {} hPa",
            temperature, dewpoint, pressure
        ))
    })?;

    Ok((lcl_p.unpack().min(pressure), Celsius::from(lcl_t).unpack()))
}

/// Virtual temperature (K) of air at `pressure` with the given temperature and dewpoint.
pub fn virtual_temperature(pressure: f64, temperature: f64, dewpoint: f64) -> Option<f64> {
    metfor::virtual_temperature(Celsius(temperature), Celsius(dewpoint), HectoPascal(pressure))
        .map(|tv| Kelvin::from(tv).unpack())
}

/// Mixing ratio (kg/kg) of air with `dewpoint` at `pressure`.
pub fn mixing_ratio(pressure: f64, dewpoint: f64) -> Option<f64> {
    metfor::mixing_ratio(Celsius(dewpoint), HectoPascal(pressure))
}

/// Dewpoint (°C) of air at `pressure` carrying mixing ratio `mw` (kg/kg).
pub fn dewpoint_from_mixing_ratio(pressure: f64, mw: f64) -> Option<f64> {
    metfor::dew_point_from_p_and_mw(HectoPascal(pressure), mw).map(|td| Celsius::from(td).unpack())
}

/// Potential temperature of air at (`pressure`, `temperature`).
pub fn theta(pressure: f64, temperature: f64) -> Kelvin {
    metfor::potential_temperature(HectoPascal(pressure), Celsius(temperature))
}

/// Equivalent potential temperature of air at (`pressure`, `temperature`, `dewpoint`).
pub fn theta_e(pressure: f64, temperature: f64, dewpoint: f64) -> Option<Kelvin> {
    metfor::equiv_pot_temperature(Celsius(temperature), Celsius(dewpoint), HectoPascal(pressure))
}

/// Temperature (°C) at `pressure` on the dry adiabat `theta`.
pub fn temperature_on_dry_adiabat(theta: Kelvin, pressure: f64) -> f64 {
    Celsius::from(metfor::temperature_from_pot_temp(theta, HectoPascal(pressure))).unpack()
}

/// Temperature (°C) at `pressure` on the saturated adiabat `theta_e`.
pub fn temperature_on_moist_adiabat(theta_e: Kelvin, pressure: f64) -> Option<f64> {
    metfor::temperature_from_equiv_pot_temp_saturated_and_pressure(HectoPascal(pressure), theta_e)
        .map(|t| Celsius::from(t).unpack())
}

/// Temperature (°C) at `pressure` on the dry adiabat through (`p0`, `t0`).
pub fn dry_adiabat(pressure: f64, t0: f64, p0: f64) -> f64 {
    temperature_on_dry_adiabat(theta(p0, t0), pressure)
}

/// Temperature (°C) at `pressure` on the saturated adiabat through (`p0`, `t0`).
pub fn moist_adiabat(pressure: f64, t0: f64, p0: f64) -> Option<f64> {
    temperature_on_moist_adiabat(theta_e(p0, t0, t0)?, pressure)
}
