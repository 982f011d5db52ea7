//! Drawing surface shared by the diagram renderers.
//!
//! Thin layer over `imageproc` drawing primitives: thick polylines, guarded
//! polygon fills and TrueType axis labels.

use std::sync::OnceLock;

use image::{Rgba, RgbaImage};
use imageproc::drawing::{
    draw_filled_rect_mut, draw_hollow_circle_mut, draw_line_segment_mut, draw_polygon_mut,
    draw_text_mut, text_size,
};
use imageproc::point::Point;
use imageproc::rect::Rect;
use rusttype::{Font, Scale};

pub const WHITE: Rgba<u8> = Rgba([255, 255, 255, 255]);
pub const BLACK: Rgba<u8> = Rgba([0, 0, 0, 255]);

/// Embedded label font - DejaVu Sans Mono
const FONT_DATA: &[u8] = include_bytes!("../assets/DejaVuSansMono.ttf");

/// Label font, parsed on first use. `None` if the embedded data is unusable.
fn label_font() -> Option<&'static Font<'static>> {
    static FONT: OnceLock<Option<Font<'static>>> = OnceLock::new();
    FONT.get_or_init(|| {
        let font = Font::try_from_bytes(FONT_DATA);
        if font.is_none() {
            tracing::warn!("Failed to load font for axis labels");
        }
        font
    })
    .as_ref()
}

/// RGBA canvas with pixel-space drawing helpers.
pub struct Canvas {
    image: RgbaImage,
}

impl Canvas {
    /// A white canvas.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            image: RgbaImage::from_pixel(width, height, WHITE),
        }
    }

    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }

    pub fn image(&self) -> &RgbaImage {
        &self.image
    }

    pub fn into_image(self) -> RgbaImage {
        self.image
    }

    /// One-pixel line segment. Non-finite endpoints are skipped.
    pub fn line(&mut self, from: (f64, f64), to: (f64, f64), color: Rgba<u8>) {
        if !(from.0.is_finite() && from.1.is_finite() && to.0.is_finite() && to.1.is_finite()) {
            return;
        }
        draw_line_segment_mut(
            &mut self.image,
            (from.0 as f32, from.1 as f32),
            (to.0 as f32, to.1 as f32),
            color,
        );
    }

    /// Line segment `thickness` pixels wide, drawn as parallel offsets.
    pub fn thick_line(&mut self, from: (f64, f64), to: (f64, f64), thickness: u32, color: Rgba<u8>) {
        let (dx, dy) = (to.0 - from.0, to.1 - from.1);
        let len = (dx * dx + dy * dy).sqrt();
        if len == 0.0 || thickness <= 1 {
            self.line(from, to, color);
            return;
        }

        // Unit normal to the segment
        let (nx, ny) = (-dy / len, dx / len);
        let half = (thickness as f64 - 1.0) / 2.0;
        let steps = (thickness as usize - 1) * 2;
        for i in 0..=steps {
            let offset = -half + i as f64 * 0.5;
            self.line(
                (from.0 + nx * offset, from.1 + ny * offset),
                (to.0 + nx * offset, to.1 + ny * offset),
                color,
            );
        }
    }

    /// Connected line through `points`.
    pub fn polyline(&mut self, points: &[(f64, f64)], thickness: u32, color: Rgba<u8>) {
        for pair in points.windows(2) {
            self.thick_line(pair[0], pair[1], thickness, color);
        }
    }

    /// Dashed line: `dash` pixels drawn, `dash` pixels skipped.
    pub fn dashed_line(&mut self, from: (f64, f64), to: (f64, f64), dash: f64, color: Rgba<u8>) {
        let (dx, dy) = (to.0 - from.0, to.1 - from.1);
        let len = (dx * dx + dy * dy).sqrt();
        if !len.is_finite() || len == 0.0 || dash <= 0.0 {
            return;
        }

        let mut start = 0.0;
        while start < len {
            let end = (start + dash).min(len);
            let at = |d: f64| (from.0 + dx * d / len, from.1 + dy * d / len);
            self.line(at(start), at(end), color);
            start += 2.0 * dash;
        }
    }

    /// Fill a polygon.
    ///
    /// Vertices are snapped to pixels; repeated vertices and a closing vertex
    /// equal to the first are dropped, and anything left with fewer than
    /// three vertices is not drawn.
    pub fn fill_polygon(&mut self, vertices: &[(f64, f64)], color: Rgba<u8>) {
        if vertices.iter().any(|(x, y)| !x.is_finite() || !y.is_finite()) {
            return;
        }

        let mut points: Vec<Point<i32>> = Vec::with_capacity(vertices.len());
        for &(x, y) in vertices {
            let point = Point::new(x.round() as i32, y.round() as i32);
            if points.last() != Some(&point) {
                points.push(point);
            }
        }
        while points.len() > 1 && points.first() == points.last() {
            points.pop();
        }
        if points.len() < 3 {
            return;
        }

        draw_polygon_mut(&mut self.image, &points, color);
    }

    /// Axis-aligned filled rectangle, clipped to the canvas.
    pub fn fill_rect(&mut self, x: i32, y: i32, width: u32, height: u32, color: Rgba<u8>) {
        if width == 0 || height == 0 {
            return;
        }
        draw_filled_rect_mut(&mut self.image, Rect::at(x, y).of_size(width, height), color);
    }

    pub fn circle(&mut self, center: (f64, f64), radius: f64, color: Rgba<u8>) {
        if radius < 1.0 {
            return;
        }
        draw_hollow_circle_mut(
            &mut self.image,
            (center.0.round() as i32, center.1.round() as i32),
            radius.round() as i32,
            color,
        );
    }

    /// Rectangle outline.
    pub fn frame(&mut self, left: f64, top: f64, right: f64, bottom: f64, color: Rgba<u8>) {
        self.line((left, top), (right, top), color);
        self.line((right, top), (right, bottom), color);
        self.line((right, bottom), (left, bottom), color);
        self.line((left, bottom), (left, top), color);
    }

    /// Width in pixels of `text` drawn at `size` px.
    pub fn text_width(text: &str, size: f32) -> u32 {
        match label_font() {
            Some(font) if !text.is_empty() => {
                text_size(Scale::uniform(size), font, text).0.max(0) as u32
            }
            _ => 0,
        }
    }

    pub fn text_height(size: f32) -> u32 {
        size.ceil().max(0.0) as u32
    }

    /// Draw `text` with its top-left corner at (x, y). Labels are skipped if
    /// the font failed to load.
    pub fn text(&mut self, x: i32, y: i32, text: &str, size: f32, color: Rgba<u8>) {
        if let Some(font) = label_font() {
            draw_text_mut(&mut self.image, color, x, y, Scale::uniform(size), font, text);
        }
    }
}
