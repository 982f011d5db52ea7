//! Surface-based convective indices.
//!
//! CAPE and CIN integrate the virtual-temperature difference between a lifted
//! surface parcel and the environment over log-pressure:
//!
//! ```text
//! CAPE = Rd ∫[LFC→EL] (Tv_parcel − Tv_env) d ln p
//! CIN  = Rd ∫[SFC→LFC] min(Tv_parcel − Tv_env, 0) d ln p
//! ```
//!
//! The LCL and every buoyancy zero crossing are inserted as explicit levels so
//! the trapezoid rule never straddles a sign change.

use raob_common::RaobResult;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::parcel::{validate_thermo, Parcel};
use crate::sanitize::ThermoLevel;
use crate::thermo;

/// Dry air gas constant (J kg⁻¹ K⁻¹)
const RD: f64 = 287.04749;

/// Thermodynamic indices at full precision.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DerivedIndices {
    /// Surface-based CAPE (J/kg), never negative
    pub sbcape: f64,
    /// Surface-based CIN (J/kg), never positive
    pub sbcin: f64,
    /// LCL pressure (hPa)
    pub lcl_pressure: f64,
    /// LCL temperature (°C)
    pub lcl_temperature: f64,
}

/// Indices as reported to callers, rounded to one decimal place.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct IndicesReport {
    pub sbcape: f64,
    pub sbcin: f64,
    pub lcl_hpa: f64,
}

impl DerivedIndices {
    /// Round for presentation. Rounding happens only here, never mid-computation.
    pub fn report(&self) -> IndicesReport {
        IndicesReport {
            sbcape: round1(self.sbcape),
            sbcin: round1(self.sbcin),
            lcl_hpa: round1(self.lcl_pressure),
        }
    }
}

/// Round to one decimal place.
pub fn round1(value: f64) -> f64 {
    // + 0.0 turns -0.0 into 0.0
    (value * 10.0).round() / 10.0 + 0.0
}

/// Compute surface-based CAPE, CIN and the LCL from a thermodynamic profile.
///
/// The first level is the surface parcel. A single-level profile has no
/// layer to integrate over and yields zero CAPE and CIN.
pub fn derive_indices(profile: &[ThermoLevel]) -> RaobResult<DerivedIndices> {
    validate_thermo(profile)?;

    let parcel = Parcel::from_surface(&profile[0])?;
    let lcl_pressure = parcel.lcl_pressure;

    let (sbcape, sbcin) = if profile.len() < 2 {
        (0.0, 0.0)
    } else {
        let levels = with_lcl(profile, lcl_pressure);
        let points = buoyancy(&levels, &parcel);
        cape_cin(&insert_zero_crossings(&points), lcl_pressure)
    };

    debug!(
        levels = profile.len(),
        sbcape, sbcin, lcl_pressure, "Derived surface-based indices"
    );

    Ok(DerivedIndices {
        sbcape,
        sbcin,
        lcl_pressure,
        lcl_temperature: parcel.lcl_temperature,
    })
}

/// Copy of `profile` with an environment level interpolated at the LCL.
///
/// Nothing is inserted when the LCL coincides with a level or lies outside
/// the profile.
fn with_lcl(profile: &[ThermoLevel], lcl_pressure: f64) -> Vec<ThermoLevel> {
    let mut levels = profile.to_vec();
    let position = profile
        .windows(2)
        .position(|pair| pair[0].pressure > lcl_pressure && lcl_pressure > pair[1].pressure);

    if let Some(i) = position {
        let (lower, upper) = (profile[i], profile[i + 1]);
        let frac = (lcl_pressure.ln() - lower.pressure.ln())
            / (upper.pressure.ln() - lower.pressure.ln());
        levels.insert(
            i + 1,
            ThermoLevel {
                pressure: lcl_pressure,
                temperature: lower.temperature + frac * (upper.temperature - lower.temperature),
                dewpoint: lower.dewpoint + frac * (upper.dewpoint - lower.dewpoint),
            },
        );
    }

    levels
}

/// (pressure, Tv_parcel − Tv_env) from the surface up.
///
/// Stops at the first level where either virtual temperature is undefined.
fn buoyancy(levels: &[ThermoLevel], parcel: &Parcel) -> Vec<(f64, f64)> {
    levels
        .iter()
        .map_while(|level| {
            let p = level.pressure;
            let tv_parcel = parcel.virtual_temperature_at(p)?;
            let tv_env = thermo::virtual_temperature(p, level.temperature, level.dewpoint)?;
            Some((p, tv_parcel - tv_env))
        })
        .collect()
}

/// Insert a zero-buoyancy point wherever the sign flips between two levels.
fn insert_zero_crossings(points: &[(f64, f64)]) -> Vec<(f64, f64)> {
    let mut out = Vec::with_capacity(points.len() * 2);
    if let Some(first) = points.first() {
        out.push(*first);
    }

    for pair in points.windows(2) {
        let ((p0, y0), (p1, y1)) = (pair[0], pair[1]);
        if (y0 < 0.0 && y1 > 0.0) || (y0 > 0.0 && y1 < 0.0) {
            let (x0, x1) = (p0.ln(), p1.ln());
            let xc = x0 + (x1 - x0) * y0 / (y0 - y1);
            out.push((xc.exp(), 0.0));
        }
        out.push(pair[1]);
    }

    out
}

/// Trapezoid integral of `f(buoyancy)` over ln p, bottom to top.
fn integrate(points: &[(f64, f64)], f: impl Fn(f64) -> f64) -> f64 {
    points
        .windows(2)
        .map(|pair| {
            let ((p0, y0), (p1, y1)) = (pair[0], pair[1]);
            0.5 * (f(y0) + f(y1)) * (p0.ln() - p1.ln())
        })
        .sum()
}

fn cape_cin(points: &[(f64, f64)], lcl_pressure: f64) -> (f64, f64) {
    let n = points.len();

    // LFC: first level at or above the LCL from which the parcel is warmer going up
    let lfc = (0..n.saturating_sub(1)).find(|&i| {
        points[i].0 <= lcl_pressure && points[i].1 >= 0.0 && points[i + 1].1 > 0.0
    });
    let Some(lfc) = lfc else {
        return (0.0, 0.0);
    };

    // EL: top of the highest positive layer, or the top of the sounding
    let last_positive = (lfc + 1..n)
        .rev()
        .find(|&i| points[i].1 > 0.0)
        .unwrap_or(lfc + 1);
    let el = if last_positive == n - 1 {
        n - 1
    } else {
        last_positive + 1
    };

    let cape = (RD * integrate(&points[lfc..=el], |y| y)).max(0.0);
    let cin = (RD * integrate(&points[..=lfc], |y| y.min(0.0))).min(0.0);
    (cape, cin)
}
