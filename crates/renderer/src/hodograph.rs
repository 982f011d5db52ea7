//! Hodograph: the wind profile traced in (u, v) space.
//!
//! Range rings are drawn every 10 kt out to the first ring at or beyond the
//! strongest wind. Trace segments are coloured by height above the lowest
//! wind level.

use image::{Rgba, RgbaImage};
use tracing::debug;

use raob_common::{RaobError, RaobResult};
use sounding::WindComponents;

use crate::canvas::{Canvas, BLACK};
use crate::png::encode_image;

/// Spacing between range rings (knots).
pub const RING_SPACING_KT: f64 = 10.0;

const RING_COLOR: Rgba<u8> = Rgba([190, 190, 190, 255]);
const AXIS_COLOR: Rgba<u8> = Rgba([120, 120, 120, 255]);
const LABEL_COLOR: Rgba<u8> = Rgba([90, 90, 90, 255]);
const LABEL_SIZE: f32 = 14.0;

/// Height bands (m above the lowest level) and their trace colours.
/// The last band is open-ended.
const HEIGHT_BANDS: [(f64, Rgba<u8>); 5] = [
    (1000.0, Rgba([200, 0, 200, 255])),
    (3000.0, Rgba([220, 20, 20, 255])),
    (6000.0, Rgba([20, 150, 20, 255])),
    (9000.0, Rgba([210, 170, 0, 255])),
    (f64::INFINITY, Rgba([0, 170, 200, 255])),
];

/// Hodograph rendering configuration
#[derive(Debug, Clone)]
pub struct HodographConfig {
    /// Output width and height in pixels
    pub size: u32,
    /// Blank border around the outer ring (pixels)
    pub margin: u32,
    /// Trace line width (pixels)
    pub line_width: u32,
}

impl Default for HodographConfig {
    fn default() -> Self {
        Self {
            size: 600,
            margin: 40,
            line_width: 3,
        }
    }
}

/// Colour for a trace segment starting `height_agl` metres above the lowest level.
pub fn height_color(height_agl: f64) -> Rgba<u8> {
    HEIGHT_BANDS
        .iter()
        .find(|(top, _)| height_agl < *top)
        .map(|(_, color)| *color)
        .unwrap_or(HEIGHT_BANDS[HEIGHT_BANDS.len() - 1].1)
}

/// Outermost ring radius (knots): the strongest wind rounded up to the next
/// ring, never less than one ring.
pub fn ring_range(winds: &[WindComponents]) -> f64 {
    let max_speed = winds
        .iter()
        .map(|w| w.u.hypot(w.v))
        .filter(|s| s.is_finite())
        .fold(0.0_f64, f64::max);
    ((max_speed / RING_SPACING_KT).ceil() * RING_SPACING_KT).max(RING_SPACING_KT)
}

/// Render a hodograph to PNG bytes.
pub fn render_hodograph(config: &HodographConfig, winds: &[WindComponents]) -> RaobResult<Vec<u8>> {
    let image = draw_hodograph(config, winds)?;
    let png = encode_image(&image)?;
    debug!(levels = winds.len(), bytes = png.len(), "Rendered hodograph");
    Ok(png)
}

/// Draw a hodograph onto a fresh canvas.
pub fn draw_hodograph(config: &HodographConfig, winds: &[WindComponents]) -> RaobResult<RgbaImage> {
    if winds.is_empty() {
        return Err(RaobError::InvalidProfile(
            "cannot plot an empty wind profile".to_string(),
        ));
    }
    if config.size <= 2 * config.margin + 20 {
        return Err(RaobError::Render(format!(
            "hodograph size {} leaves no room inside a {} px margin",
            config.size, config.margin
        )));
    }

    let mut canvas = Canvas::new(config.size, config.size);
    let center = config.size as f64 / 2.0;
    let radius_px = center - config.margin as f64;
    let range = ring_range(winds);
    let scale = radius_px / range;
    let to_px = |u: f64, v: f64| (center + u * scale, center - v * scale);

    // Axes
    canvas.line((center - radius_px, center), (center + radius_px, center), AXIS_COLOR);
    canvas.line((center, center - radius_px), (center, center + radius_px), AXIS_COLOR);

    // Range rings, labelled along the +u axis
    let rings = (range / RING_SPACING_KT).round() as usize;
    for i in 1..=rings {
        let kt = i as f64 * RING_SPACING_KT;
        canvas.circle((center, center), kt * scale, RING_COLOR);
        canvas.text(
            (center + kt * scale + 3.0).round() as i32,
            (center + 4.0).round() as i32,
            &format!("{}", kt as i64),
            LABEL_SIZE,
            LABEL_COLOR,
        );
    }
    canvas.text(
        (center + radius_px - Canvas::text_width("kt", LABEL_SIZE) as f64).round() as i32,
        (center - 4.0 - Canvas::text_height(LABEL_SIZE) as f64).round() as i32,
        "kt",
        LABEL_SIZE,
        LABEL_COLOR,
    );

    let base = winds[0].height;
    for pair in winds.windows(2) {
        let (a, b) = (pair[0], pair[1]);
        canvas.thick_line(
            to_px(a.u, a.v),
            to_px(b.u, b.v),
            config.line_width,
            height_color(a.height - base),
        );
    }

    // Mark the lowest level; a single-level profile is just this marker
    canvas.circle(to_px(winds[0].u, winds[0].v), 4.0, BLACK);

    Ok(canvas.into_image())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn wind(u: f64, v: f64, height: f64) -> WindComponents {
        WindComponents { u, v, height }
    }

    #[test]
    fn test_height_color_bands() {
        assert_eq!(height_color(0.0), HEIGHT_BANDS[0].1);
        assert_eq!(height_color(999.0), HEIGHT_BANDS[0].1);
        assert_eq!(height_color(1000.0), HEIGHT_BANDS[1].1);
        assert_eq!(height_color(5000.0), HEIGHT_BANDS[2].1);
        assert_eq!(height_color(15000.0), HEIGHT_BANDS[4].1);
    }

    #[test]
    fn test_ring_range_rounds_up() {
        assert_eq!(ring_range(&[wind(30.0, 40.0, 0.0)]), 50.0);
        assert_eq!(ring_range(&[wind(30.0, 41.0, 0.0)]), 60.0);
    }

    #[test]
    fn test_ring_range_calm_has_one_ring() {
        assert_eq!(ring_range(&[wind(0.0, 0.0, 0.0)]), RING_SPACING_KT);
    }

    #[test]
    fn test_rejects_empty_profile() {
        let err = draw_hodograph(&HodographConfig::default(), &[]).unwrap_err();
        assert!(matches!(err, RaobError::InvalidProfile(_)));
    }

    #[test]
    fn test_trace_uses_low_level_color() {
        let winds = [wind(0.0, 0.0, 100.0), wind(20.0, 20.0, 600.0)];
        let image = draw_hodograph(&HodographConfig::default(), &winds).unwrap();
        assert!(image.pixels().any(|p| *p == HEIGHT_BANDS[0].1));
        assert!(!image.pixels().any(|p| *p == HEIGHT_BANDS[1].1));
    }
}
