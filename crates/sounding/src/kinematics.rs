//! Wind vector decomposition.

use raob_common::{RaobError, RaobResult};
use serde::Serialize;

use crate::sanitize::WindLevel;

/// Horizontal wind vector at one level, paired with its height.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct WindComponents {
    /// Eastward component (knots)
    pub u: f64,
    /// Northward component (knots)
    pub v: f64,
    /// Geopotential height (m), carried through for colouring
    pub height: f64,
}

/// Decompose a wind given as (speed, direction-from) into (u, v).
///
/// Direction is degrees clockwise from north, meteorological "from"
/// convention: a north wind (0°) blows toward the south, so v is negative.
pub fn components(speed: f64, direction_deg: f64) -> (f64, f64) {
    let rad = direction_deg.to_radians();
    (-speed * rad.sin(), -speed * rad.cos())
}

/// Compute (u, v, height) for every level of a wind profile.
pub fn wind_components(profile: &[WindLevel]) -> RaobResult<Vec<WindComponents>> {
    if profile.is_empty() {
        return Err(RaobError::InvalidProfile("wind profile is empty".to_string()));
    }

    profile
        .iter()
        .enumerate()
        .map(|(i, level)| {
            if !(level.direction.is_finite() && level.speed.is_finite() && level.height.is_finite())
            {
                return Err(RaobError::InvalidProfile(format!(
                    "wind level {} has a non-finite value",
                    i
                )));
            }
            if level.speed < 0.0 {
                return Err(RaobError::InvalidProfile(format!(
                    "wind level {} has negative speed {}",
                    i, level.speed
                )));
            }

            let (u, v) = components(level.speed, level.direction);
            Ok(WindComponents {
                u,
                v,
                height: level.height,
            })
        })
        .collect()
}
