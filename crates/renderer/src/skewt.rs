//! Skew-T log-p diagram.
//!
//! Pressure runs logarithmically from `p_bottom` at the base of the plot to
//! `p_top` at its top. Isotherms lean 45° to the right: moving up by one
//! pixel shifts a constant temperature right by one pixel.

use image::{Rgba, RgbaImage};
use tracing::debug;

use raob_common::{RaobError, RaobResult};
use sounding::thermo::{dry_adiabat, moist_adiabat};
use sounding::{ParcelPath, ThermoLevel};

use crate::canvas::{Canvas, BLACK, WHITE};
use crate::png::encode_image;

pub const TEMPERATURE_COLOR: Rgba<u8> = Rgba([220, 20, 20, 255]);
pub const DEWPOINT_COLOR: Rgba<u8> = Rgba([20, 150, 20, 255]);
pub const PARCEL_COLOR: Rgba<u8> = BLACK;
pub const CAPE_FILL: Rgba<u8> = Rgba([255, 190, 190, 255]);
pub const CIN_FILL: Rgba<u8> = Rgba([190, 205, 255, 255]);

const ISOTHERM_COLOR: Rgba<u8> = Rgba([205, 205, 205, 255]);
const ZERO_ISOTHERM_COLOR: Rgba<u8> = Rgba([110, 140, 220, 255]);
const ISOBAR_COLOR: Rgba<u8> = Rgba([165, 165, 165, 255]);
const DRY_ADIABAT_COLOR: Rgba<u8> = Rgba([225, 190, 150, 255]);
const MOIST_ADIABAT_COLOR: Rgba<u8> = Rgba([165, 215, 165, 255]);

/// Labelled pressure levels (hPa).
const ISOBARS: [f64; 9] = [1000.0, 925.0, 850.0, 700.0, 500.0, 400.0, 300.0, 200.0, 100.0];

/// Sub-steps per sounding layer when shading buoyant areas.
const SHADE_SUBSTEPS: usize = 8;

const LABEL_SIZE: f32 = 14.0;

/// Skew-T rendering configuration
#[derive(Debug, Clone)]
pub struct SkewTConfig {
    /// Output width in pixels
    pub width: u32,
    /// Output height in pixels
    pub height: u32,
    /// Pressure at the base of the plot (hPa)
    pub p_bottom: f64,
    /// Pressure at the top of the plot (hPa)
    pub p_top: f64,
    /// Temperature at the bottom-left corner (°C)
    pub t_min: f64,
    /// Temperature at the bottom-right corner (°C)
    pub t_max: f64,
}

impl Default for SkewTConfig {
    fn default() -> Self {
        Self {
            width: 800,
            height: 800,
            p_bottom: 1050.0,
            p_top: 100.0,
            t_min: -40.0,
            t_max: 50.0,
        }
    }
}

/// Maps (temperature, pressure) to pixel coordinates.
#[derive(Debug, Clone, Copy)]
pub struct SkewTAxes {
    pub left: f64,
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
    ln_p_bottom: f64,
    ln_p_top: f64,
    t_min: f64,
    t_max: f64,
}

impl SkewTAxes {
    pub fn new(config: &SkewTConfig) -> Self {
        Self {
            left: 60.0,
            top: 20.0,
            right: config.width as f64 - 20.0,
            bottom: config.height as f64 - 40.0,
            ln_p_bottom: config.p_bottom.ln(),
            ln_p_top: config.p_top.ln(),
            t_min: config.t_min,
            t_max: config.t_max,
        }
    }

    pub fn y(&self, p: f64) -> f64 {
        let frac = (self.ln_p_bottom - p.ln()) / (self.ln_p_bottom - self.ln_p_top);
        self.bottom - frac * (self.bottom - self.top)
    }

    pub fn x(&self, t_c: f64, p: f64) -> f64 {
        let frac = (t_c - self.t_min) / (self.t_max - self.t_min);
        self.left + frac * (self.right - self.left) + (self.bottom - self.y(p))
    }

    pub fn point(&self, t_c: f64, p: f64) -> (f64, f64) {
        (self.x(t_c, p), self.y(p))
    }

    fn p_bottom(&self) -> f64 {
        self.ln_p_bottom.exp()
    }

    fn p_top(&self) -> f64 {
        self.ln_p_top.exp()
    }
}

/// Render a Skew-T diagram to PNG bytes.
pub fn render_skewt(
    config: &SkewTConfig,
    profile: &[ThermoLevel],
    parcel: Option<&ParcelPath>,
) -> RaobResult<Vec<u8>> {
    let image = draw_skewt(config, profile, parcel)?;
    let png = encode_image(&image)?;
    debug!(levels = profile.len(), bytes = png.len(), "Rendered Skew-T");
    Ok(png)
}

/// Draw a Skew-T diagram onto a fresh canvas.
pub fn draw_skewt(
    config: &SkewTConfig,
    profile: &[ThermoLevel],
    parcel: Option<&ParcelPath>,
) -> RaobResult<RgbaImage> {
    if profile.is_empty() {
        return Err(RaobError::InvalidProfile(
            "cannot plot an empty thermodynamic profile".to_string(),
        ));
    }
    if config.width < 200 || config.height < 200 || config.p_top >= config.p_bottom {
        return Err(RaobError::Render(format!(
            "unusable Skew-T geometry {}x{}, {}..{} hPa",
            config.width, config.height, config.p_bottom, config.p_top
        )));
    }
    if let Some(path) = parcel {
        if path.len() > profile.len() {
            return Err(RaobError::Render(format!(
                "parcel path has {} levels, profile has only {}",
                path.len(),
                profile.len()
            )));
        }
    }

    let axes = SkewTAxes::new(config);
    let mut canvas = Canvas::new(config.width, config.height);

    if let Some(path) = parcel {
        shade_buoyancy(&mut canvas, &axes, profile, path);
    }
    draw_background(&mut canvas, &axes, config);

    let temperature: Vec<(f64, f64)> = profile
        .iter()
        .map(|l| axes.point(l.temperature, l.pressure))
        .collect();
    let dewpoint: Vec<(f64, f64)> = profile
        .iter()
        .map(|l| axes.point(l.dewpoint, l.pressure))
        .collect();
    canvas.polyline(&temperature, 3, TEMPERATURE_COLOR);
    canvas.polyline(&dewpoint, 3, DEWPOINT_COLOR);

    if let Some(path) = parcel {
        let trace: Vec<(f64, f64)> = path
            .pressure
            .iter()
            .zip(&path.temperature)
            .map(|(&p, &t)| axes.point(t, p))
            .collect();
        canvas.polyline(&trace, 2, PARCEL_COLOR);
    }

    mask_margins(&mut canvas, &axes);
    draw_labels(&mut canvas, &axes, config);

    Ok(canvas.into_image())
}

/// Isotherms, dry and moist adiabats, isobars.
fn draw_background(canvas: &mut Canvas, axes: &SkewTAxes, config: &SkewTConfig) {
    let (p_bottom, p_top) = (axes.p_bottom(), axes.p_top());

    // Isotherms extend far left so the skewed lines cover the upper plot
    let mut t = config.t_min - 100.0;
    while t <= config.t_max {
        let color = if t == 0.0 {
            ZERO_ISOTHERM_COLOR
        } else {
            ISOTHERM_COLOR
        };
        canvas.line(axes.point(t, p_bottom), axes.point(t, p_top), color);
        t += 10.0;
    }

    let pressures = pressure_ladder(p_bottom, p_top, 25.0);

    let mut theta_c = -40.0;
    while theta_c <= 200.0 {
        let curve: Vec<(f64, f64)> = pressures
            .iter()
            .map(|&p| axes.point(dry_adiabat(p, theta_c, 1000.0), p))
            .collect();
        canvas.polyline(&curve, 1, DRY_ADIABAT_COLOR);
        theta_c += 10.0;
    }

    // Moist adiabats start at 1000 hPa and end where they leave the solvable range
    let upper: Vec<f64> = pressures.iter().copied().filter(|&p| p <= 1000.0).collect();
    let mut start_c = -10.0;
    while start_c <= 35.0 {
        let mut prev_pt = axes.point(start_c, 1000.0);
        for &p in &upper {
            let Some(t) = moist_adiabat(p, start_c, 1000.0) else {
                break;
            };
            let pt = axes.point(t, p);
            canvas.dashed_line(prev_pt, pt, 4.0, MOIST_ADIABAT_COLOR);
            prev_pt = pt;
        }
        start_c += 5.0;
    }

    for &p in ISOBARS.iter().filter(|&&p| p <= p_bottom && p >= p_top) {
        let y = axes.y(p);
        canvas.line((axes.left, y), (axes.right, y), ISOBAR_COLOR);
    }
}

/// `p_bottom`, then every multiple of `step` below it, then `p_top`.
fn pressure_ladder(p_bottom: f64, p_top: f64, step: f64) -> Vec<f64> {
    let mut out = vec![p_bottom];
    let mut p = (p_bottom / step).floor() * step;
    if p >= p_bottom {
        p -= step;
    }
    while p > p_top {
        out.push(p);
        p -= step;
    }
    out.push(p_top);
    out
}

/// Blank everything outside the plot area and draw its border.
fn mask_margins(canvas: &mut Canvas, axes: &SkewTAxes) {
    let (w, h) = (canvas.width(), canvas.height());
    let left = axes.left.round() as u32;
    let right = axes.right.round() as u32;
    let top = axes.top.round() as u32;
    let bottom = axes.bottom.round() as u32;

    canvas.fill_rect(0, 0, w, top, WHITE);
    canvas.fill_rect(0, bottom as i32 + 1, w, h.saturating_sub(bottom + 1), WHITE);
    canvas.fill_rect(0, 0, left, h, WHITE);
    canvas.fill_rect(right as i32 + 1, 0, w.saturating_sub(right + 1), h, WHITE);
    canvas.frame(axes.left, axes.top, axes.right, axes.bottom, BLACK);
}

fn draw_labels(canvas: &mut Canvas, axes: &SkewTAxes, config: &SkewTConfig) {
    let text_h = Canvas::text_height(LABEL_SIZE) as f64;

    for &p in ISOBARS.iter().filter(|&&p| p <= axes.p_bottom() && p >= axes.p_top()) {
        let label = format!("{}", p as i64);
        let w = Canvas::text_width(&label, LABEL_SIZE) as f64;
        canvas.text(
            (axes.left - 6.0 - w).round() as i32,
            (axes.y(p) - text_h / 2.0).round() as i32,
            &label,
            LABEL_SIZE,
            BLACK,
        );
    }

    let mut t = config.t_min;
    while t <= config.t_max {
        let label = format!("{}", t as i64);
        let w = Canvas::text_width(&label, LABEL_SIZE) as f64;
        canvas.text(
            (axes.x(t, axes.p_bottom()) - w / 2.0).round() as i32,
            (axes.bottom + 8.0).round() as i32,
            &label,
            LABEL_SIZE,
            BLACK,
        );
        t += 10.0;
    }
}

/// Environment and parcel temperature at one pressure.
#[derive(Debug, Clone, Copy)]
struct Sample {
    p: f64,
    env: f64,
    parcel: f64,
}

impl Sample {
    fn diff(&self) -> f64 {
        self.parcel - self.env
    }

    /// Interpolate linearly in ln p.
    fn lerp(&self, other: &Sample, frac: f64) -> Sample {
        let ln_p = self.p.ln() + frac * (other.p.ln() - self.p.ln());
        Sample {
            p: ln_p.exp(),
            env: self.env + frac * (other.env - self.env),
            parcel: self.parcel + frac * (other.parcel - self.parcel),
        }
    }
}

/// Shade positive area above the LFC as CAPE and negative area below it as CIN.
fn shade_buoyancy(canvas: &mut Canvas, axes: &SkewTAxes, profile: &[ThermoLevel], parcel: &ParcelPath) {
    let lcl_p = parcel.lcl_pressure;

    let levels: Vec<Sample> = profile
        .iter()
        .zip(&parcel.temperature)
        .map(|(l, &t)| Sample {
            p: l.pressure,
            env: l.temperature,
            parcel: t,
        })
        .collect();

    let mut samples = Vec::with_capacity(levels.len() * SHADE_SUBSTEPS);
    for pair in levels.windows(2) {
        for k in 0..SHADE_SUBSTEPS {
            samples.push(pair[0].lerp(&pair[1], k as f64 / SHADE_SUBSTEPS as f64));
        }
    }
    if let Some(last) = levels.last() {
        samples.push(*last);
    }

    let Some(lfc_p) = level_of_free_convection(&samples, lcl_p) else {
        return;
    };

    for pair in samples.windows(2) {
        let (a, b) = (pair[0], pair[1]);
        let (da, db) = (a.diff(), b.diff());
        if (da < 0.0 && db > 0.0) || (da > 0.0 && db < 0.0) {
            let c = a.lerp(&b, da / (da - db));
            shade_layer(canvas, axes, &a, &c, lfc_p);
            shade_layer(canvas, axes, &c, &b, lfc_p);
        } else {
            shade_layer(canvas, axes, &a, &b, lfc_p);
        }
    }
}

/// Pressure of the first positively buoyant sample at or above the LCL.
fn level_of_free_convection(samples: &[Sample], lcl_p: f64) -> Option<f64> {
    let j = samples
        .iter()
        .position(|s| s.p <= lcl_p && s.diff() > 0.0)?;
    if j == 0 {
        return Some(samples[0].p);
    }

    let (a, b) = (samples[j - 1], samples[j]);
    if a.diff() <= 0.0 {
        let frac = a.diff() / (a.diff() - b.diff());
        Some(a.lerp(&b, frac).p.min(lcl_p))
    } else {
        Some(b.p)
    }
}

/// Fill the quad between the environment and parcel curves over one layer
/// that does not change sign.
fn shade_layer(canvas: &mut Canvas, axes: &SkewTAxes, a: &Sample, b: &Sample, lfc_p: f64) {
    let mid = a.lerp(b, 0.5);
    let diff = mid.diff();
    let color = if diff > 0.0 && mid.p <= lfc_p {
        CAPE_FILL
    } else if diff < 0.0 && mid.p > lfc_p {
        CIN_FILL
    } else {
        return;
    };

    canvas.fill_polygon(
        &[
            axes.point(a.env, a.p),
            axes.point(b.env, b.p),
            axes.point(b.parcel, b.p),
            axes.point(a.parcel, a.p),
        ],
        color,
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_axes_pressure_is_logarithmic() {
        let axes = SkewTAxes::new(&SkewTConfig::default());
        assert!((axes.y(1050.0) - axes.bottom).abs() < 1e-9);
        assert!((axes.y(100.0) - axes.top).abs() < 1e-9);
        assert!(axes.y(500.0) < axes.y(850.0));
    }

    #[test]
    fn test_isotherms_lean_right_at_45_degrees() {
        let axes = SkewTAxes::new(&SkewTConfig::default());
        let (x0, y0) = axes.point(0.0, 1000.0);
        let (x1, y1) = axes.point(0.0, 500.0);
        assert!((x1 - x0 - (y0 - y1)).abs() < 1e-9);
    }

    #[test]
    fn test_pressure_ladder() {
        let ladder = pressure_ladder(1050.0, 100.0, 25.0);
        assert_eq!(ladder.first(), Some(&1050.0));
        assert_eq!(ladder[1], 1025.0);
        assert_eq!(ladder.last(), Some(&100.0));
        assert!(ladder.windows(2).all(|w| w[0] > w[1]));
    }

    #[test]
    fn test_lfc_interpolates_crossing() {
        let samples = [
            Sample { p: 900.0, env: 20.0, parcel: 19.0 },
            Sample { p: 800.0, env: 12.0, parcel: 13.0 },
        ];
        let lfc = level_of_free_convection(&samples, 950.0).unwrap();
        assert!(lfc < 900.0 && lfc > 800.0);
    }

    #[test]
    fn test_no_lfc_without_positive_area() {
        let samples = [
            Sample { p: 900.0, env: 20.0, parcel: 19.0 },
            Sample { p: 800.0, env: 12.0, parcel: 5.0 },
        ];
        assert!(level_of_free_convection(&samples, 950.0).is_none());
    }

    #[test]
    fn test_rejects_empty_profile() {
        let err = draw_skewt(&SkewTConfig::default(), &[], None).unwrap_err();
        assert!(matches!(err, RaobError::InvalidProfile(_)));
    }
}
