//! Card rendering: imperfection styling, layout templates, SVG and PNG output.

pub mod color;
pub mod composition;
pub mod filter;
mod fonts;
pub mod layout;
pub mod raster;
pub mod style;
pub mod typography;

use thiserror::Error;

pub use color::Color;
pub use composition::{
    xml_escape, Align, Background, BackgroundSource, Composition, Controls, Layer, Overlay, Panel,
    Rect, TextBlock, CARD_HEIGHT, CARD_WIDTH,
};
pub use filter::{FilterChain, FilterOp};
pub use layout::{render, render_with_style};
pub use raster::{encode_png, rasterize};
pub use style::{
    compute_style, compute_style_random, BlendMode, StyleParameters, TextShadow, TextTreatment,
    Texture,
};

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("pixel ratio must be a positive number, got {0}")]
    InvalidPixelRatio(f32),

    #[error("failed to decode background image: {0}")]
    Decode(#[source] image::ImageError),

    #[error("failed to encode image: {0}")]
    Encode(#[source] image::ImageError),

    #[error("bundled font could not be parsed: {0}")]
    Font(#[from] ab_glyph::InvalidFont),
}
