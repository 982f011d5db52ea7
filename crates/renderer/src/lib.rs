//! Image rendering for sounding diagrams.
//!
//! Implements:
//! - Skew-T log-p diagrams with parcel trace and CAPE/CIN shading
//! - Hodographs coloured by height
//! - PNG encoding (indexed when the palette fits, RGBA otherwise)

pub mod canvas;
pub mod hodograph;
pub mod png;
pub mod skewt;

pub use hodograph::{draw_hodograph, render_hodograph, HodographConfig};
pub use png::encode_image;
pub use skewt::{draw_skewt, render_skewt, SkewTConfig};
