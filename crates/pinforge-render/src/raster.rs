//! Pixel rendering of a [`Composition`] with the `image` crate.
//!
//! Text is drawn with bundled DejaVu faces. Headline rotation and text
//! filters are SVG-only; offsets and shadows are honoured.

use std::io::Cursor;

use ab_glyph::{point, Font, FontRef, GlyphId, PxScale, ScaleFont};
use image::{imageops::FilterType, ImageFormat, Rgba, RgbaImage};

use crate::color::Color;
use crate::composition::{Align, BackgroundSource, Composition, Layer, Panel, Rect, TextBlock};
use crate::filter::to_u8;
use crate::fonts::{em_scale, Faces};
use crate::style::{BlendMode, Texture};
use crate::RenderError;

/// Rasterize a card at `pixel_ratio` times its logical size.
///
/// `background` holds the encoded image bytes for the background, if any were
/// resolved. Without them the placeholder fill is used.
///
/// # Errors
///
/// Returns [`RenderError::InvalidPixelRatio`] for non-positive ratios and
/// [`RenderError::Decode`] if the background bytes are not a supported image.
/// [`RenderError::Font`] means the bundled faces are damaged.
pub fn rasterize(
    comp: &Composition,
    background: Option<&[u8]>,
    pixel_ratio: f32,
) -> Result<RgbaImage, RenderError> {
    if !(pixel_ratio.is_finite() && pixel_ratio > 0.0) {
        return Err(RenderError::InvalidPixelRatio(pixel_ratio));
    }
    let width = px(comp.width * pixel_ratio).max(1);
    let height = px(comp.height * pixel_ratio).max(1);
    let mut canvas = RgbaImage::from_pixel(width, height, opaque(comp.base));

    let bg_rect = scaled(&comp.background.rect, pixel_ratio);
    match (background, &comp.background.source) {
        (Some(bytes), BackgroundSource::Image(_) | BackgroundSource::Video(_)) => {
            let decoded = image::load_from_memory(bytes).map_err(RenderError::Decode)?;
            let (w, h) = (px(bg_rect.w).max(1), px(bg_rect.h).max(1));
            let fitted = decoded.resize_to_fill(w, h, FilterType::Triangle).to_rgba8();
            draw_image(&mut canvas, &fitted, &bg_rect, comp.background.opacity);
        }
        _ => {
            fill_rect(
                &mut canvas,
                &bg_rect,
                Color::PLACEHOLDER.with_alpha(0.2 * comp.background.opacity),
                BlendMode::Normal,
            );
        }
    }

    shade(&mut canvas, &bg_rect, comp.background.opacity);

    if let Some(overlay) = &comp.overlay {
        if overlay.opacity > 0.0 {
            draw_texture(
                &mut canvas,
                &bg_rect,
                overlay.texture,
                overlay.blend,
                overlay.opacity,
                pixel_ratio,
            );
        }
    }

    let faces = Faces::load()?;
    for layer in &comp.layers {
        match layer {
            Layer::Panel(panel) => draw_panel(&mut canvas, panel, pixel_ratio),
            Layer::Text(text) => draw_text(&mut canvas, &faces, text, pixel_ratio),
        }
    }

    if !comp.container_filter.is_empty() {
        for pixel in canvas.pixels_mut() {
            pixel.0 = comp.container_filter.apply_pixel(pixel.0);
        }
    }

    if comp.controls.is_some() {
        let full = Rect::new(0.0, 0.0, f32_from(width), f32_from(height));
        fill_rect(&mut canvas, &full, Color::BLACK.with_alpha(0.8), BlendMode::Normal);
    }

    tracing::debug!(width, height, layers = comp.layers.len(), "rasterized card");
    Ok(canvas)
}

/// PNG-encode an image.
///
/// # Errors
///
/// Returns [`RenderError::Encode`] if encoding fails.
pub fn encode_png(image: &RgbaImage) -> Result<Vec<u8>, RenderError> {
    let mut buf = Cursor::new(Vec::new());
    image
        .write_to(&mut buf, ImageFormat::Png)
        .map_err(RenderError::Encode)?;
    Ok(buf.into_inner())
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn px(v: f32) -> u32 {
    v.round().max(0.0) as u32
}

#[allow(clippy::cast_precision_loss)]
fn f32_from(v: u32) -> f32 {
    v as f32
}

fn scaled(r: &Rect, k: f32) -> Rect {
    Rect::new(r.x * k, r.y * k, r.w * k, r.h * k)
}

fn opaque(c: Color) -> Rgba<u8> {
    Rgba([c.r, c.g, c.b, 255])
}

/// Pixel bounds of `r` clipped to the canvas, as half-open ranges.
fn bounds(canvas: &RgbaImage, r: &Rect) -> (u32, u32, u32, u32) {
    let x0 = px(r.x.max(0.0)).min(canvas.width());
    let y0 = px(r.y.max(0.0)).min(canvas.height());
    let x1 = px((r.x + r.w).max(0.0)).min(canvas.width());
    let y1 = px((r.y + r.h).max(0.0)).min(canvas.height());
    (x0, y0, x1, y1)
}

fn blend_pixel(dst: &mut Rgba<u8>, src: [f32; 3], alpha: f32, mode: BlendMode) {
    if alpha <= 0.0 {
        return;
    }
    let a = alpha.min(1.0);
    for (i, s) in src.iter().enumerate() {
        let b = f32::from(dst.0[i]) / 255.0;
        let mixed = mode.channel(b, *s);
        dst.0[i] = to_u8(b * (1.0 - a) + mixed * a);
    }
}

fn fill_rect(canvas: &mut RgbaImage, r: &Rect, color: Color, mode: BlendMode) {
    let (x0, y0, x1, y1) = bounds(canvas, r);
    let src = color.channels();
    for y in y0..y1 {
        for x in x0..x1 {
            blend_pixel(canvas.get_pixel_mut(x, y), src, color.a, mode);
        }
    }
}

fn draw_image(canvas: &mut RgbaImage, image: &RgbaImage, r: &Rect, opacity: f32) {
    let (x0, y0, x1, y1) = bounds(canvas, r);
    let ox = px(r.x.max(0.0));
    let oy = px(r.y.max(0.0));
    for y in y0..y1 {
        for x in x0..x1 {
            let (sx, sy) = (x - ox, y - oy);
            if sx >= image.width() || sy >= image.height() {
                continue;
            }
            let s = image.get_pixel(sx, sy).0;
            let alpha = f32::from(s[3]) / 255.0 * opacity;
            let src = [s[0], s[1], s[2]].map(|c| f32::from(c) / 255.0);
            blend_pixel(canvas.get_pixel_mut(x, y), src, alpha, BlendMode::Normal);
        }
    }
}

/// Vertical black gradient: 20% at the top, clear at the middle, 80% at the bottom.
fn shade(canvas: &mut RgbaImage, r: &Rect, opacity: f32) {
    let (x0, y0, x1, y1) = bounds(canvas, r);
    let span = (y1.saturating_sub(y0)).max(1);
    for y in y0..y1 {
        let t = f32_from(y - y0) / f32_from(span);
        let alpha = if t < 0.5 {
            0.2 * (1.0 - t / 0.5)
        } else {
            0.8 * ((t - 0.5) / 0.5)
        };
        for x in x0..x1 {
            blend_pixel(canvas.get_pixel_mut(x, y), [0.0; 3], alpha * opacity, BlendMode::Normal);
        }
    }
}

fn draw_texture(
    canvas: &mut RgbaImage,
    r: &Rect,
    texture: Texture,
    mode: BlendMode,
    opacity: f32,
    pixel_ratio: f32,
) {
    let (x0, y0, x1, y1) = bounds(canvas, r);
    for y in y0..y1 {
        for x in x0..x1 {
            // Sample in card space so the pattern scale is independent of pixel ratio.
            #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
            let (cx, cy) = (
                (f32_from(x) / pixel_ratio) as u32,
                (f32_from(y) / pixel_ratio) as u32,
            );
            let (value, alpha) = texture_sample(texture, cx, cy);
            blend_pixel(canvas.get_pixel_mut(x, y), [value; 3], alpha * opacity, mode);
        }
    }
}

/// Procedural stand-ins for the tiling textures. Returns (gray level, coverage).
fn texture_sample(texture: Texture, x: u32, y: u32) -> (f32, f32) {
    let n = noise(x, y);
    match texture {
        Texture::Pinstripe => {
            if x % 6 == 0 {
                (1.0, 0.9)
            } else {
                (0.5, 0.0)
            }
        }
        Texture::AsphaltDark => {
            if n > 0.55 {
                (0.05, 0.35 + 0.65 * (n - 0.55) / 0.45)
            } else {
                (0.0, 0.0)
            }
        }
        Texture::FilmGrain => (n, 0.6),
        Texture::Paper => {
            let coarse = noise(x / 4, y / 4);
            (0.85 + 0.15 * coarse, 0.25 + 0.5 * n * coarse)
        }
    }
}

/// Deterministic hash noise in 0.0..1.0.
fn noise(x: u32, y: u32) -> f32 {
    let mut h = x.wrapping_mul(0x27d4_eb2d) ^ y.wrapping_mul(0x1656_67b1);
    h ^= h >> 15;
    h = h.wrapping_mul(0x85eb_ca6b);
    h ^= h >> 13;
    f32_from(h & 0xffff) / 65535.0
}

fn draw_panel(canvas: &mut RgbaImage, panel: &Panel, pixel_ratio: f32) {
    if panel.fill.a > 0.0 {
        fill_rect(
            canvas,
            &scaled(&panel.rect, pixel_ratio),
            panel.fill,
            panel.blend,
        );
    }
    if let Some(stroke) = panel.stroke {
        let r = scaled(&panel.rect, pixel_ratio);
        let t = pixel_ratio.max(1.0);
        for edge in [
            Rect::new(r.x, r.y, r.w, t),
            Rect::new(r.x, r.y + r.h - t, r.w, t),
            Rect::new(r.x, r.y, t, r.h),
            Rect::new(r.x + r.w - t, r.y, t, r.h),
        ] {
            fill_rect(canvas, &edge, stroke, BlendMode::Normal);
        }
    }
}

fn draw_text(canvas: &mut RgbaImage, faces: &Faces, t: &TextBlock, k: f32) {
    let font = faces.pick(&t.typography);
    let size = t.font_size * k;
    let scale = em_scale(font, size);
    let tracking = t.typography.tracking * size;
    let line_px = size * t.line_height;

    let (mut dx, mut dy) = (0.0, 0.0);
    let mut passes: Vec<(f32, Color)> = Vec::new();
    if let Some(treatment) = &t.treatment {
        dx = treatment.offset_x * k;
        dy = treatment.offset_y * k;
        passes.extend(treatment.shadows.iter().map(|s| (s.offset_x * k, s.color)));
    }
    passes.push((0.0, t.color));

    // Baseline sits roughly 80% down the first line box, as in the SVG.
    let mut baseline = t.rect.y * k + (line_px - size) / 2.0 + size * 0.8 + dy;
    for line in &t.lines {
        let text = if t.typography.uppercase {
            line.to_uppercase()
        } else {
            line.clone()
        };
        let width = line_width(font, scale, &text, tracking);
        let left = match t.align {
            Align::Start => t.rect.x * k,
            Align::Middle => (t.rect.x + t.rect.w / 2.0) * k - width / 2.0,
            Align::End => (t.rect.x + t.rect.w) * k - width,
        } + dx;
        for (offset, color) in &passes {
            let pen = Pen {
                font,
                scale,
                tracking,
                color: *color,
            };
            pen.draw_line(canvas, &text, left + offset, baseline);
        }
        baseline += line_px;
    }
}

fn line_width(font: &FontRef<'_>, scale: PxScale, text: &str, tracking: f32) -> f32 {
    let scaled = font.as_scaled(scale);
    let mut width = 0.0;
    let mut previous: Option<GlyphId> = None;
    for c in text.chars() {
        let id = scaled.glyph_id(c);
        if let Some(prev) = previous {
            width += scaled.kern(prev, id);
        }
        width += scaled.h_advance(id) + tracking;
        previous = Some(id);
    }
    width - if previous.is_some() { tracking } else { 0.0 }
}

struct Pen<'a> {
    font: &'a FontRef<'a>,
    scale: PxScale,
    tracking: f32,
    color: Color,
}

impl Pen<'_> {
    fn draw_line(&self, canvas: &mut RgbaImage, text: &str, left: f32, baseline: f32) {
        let scaled = self.font.as_scaled(self.scale);
        let src = self.color.channels();
        let (width, height) = (canvas.width(), canvas.height());
        let mut caret = left;
        let mut previous: Option<GlyphId> = None;
        for c in text.chars() {
            let id = scaled.glyph_id(c);
            if let Some(prev) = previous {
                caret += scaled.kern(prev, id);
            }
            let glyph = id.with_scale_and_position(self.scale, point(caret, baseline));
            caret += scaled.h_advance(id) + self.tracking;
            previous = Some(id);

            let Some(outline) = self.font.outline_glyph(glyph) else {
                continue;
            };
            let bounds = outline.px_bounds();
            outline.draw(|gx, gy, coverage| {
                #[allow(clippy::cast_possible_truncation)]
                let (x, y) = (
                    bounds.min.x as i64 + i64::from(gx),
                    bounds.min.y as i64 + i64::from(gy),
                );
                let (Ok(x), Ok(y)) = (u32::try_from(x), u32::try_from(y)) else {
                    return;
                };
                if x < width && y < height {
                    blend_pixel(
                        canvas.get_pixel_mut(x, y),
                        src,
                        coverage * self.color.a,
                        BlendMode::Normal,
                    );
                }
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::composition::{Background, CARD_HEIGHT, CARD_WIDTH};
    use crate::filter::FilterChain;
    use crate::typography::{FontFamily, Typography};

    fn bare(source: BackgroundSource) -> Composition {
        Composition {
            width: CARD_WIDTH,
            height: CARD_HEIGHT,
            scale: 1.0,
            base: Color::BLACK,
            background: Background {
                source,
                rect: Rect::card(),
                opacity: 1.0,
                radius: 0.0,
                alt: String::new(),
            },
            container_filter: FilterChain::none(),
            overlay: None,
            layers: Vec::new(),
            controls: None,
        }
    }

    fn png(w: u32, h: u32, color: [u8; 4]) -> Vec<u8> {
        encode_png(&RgbaImage::from_pixel(w, h, Rgba(color))).unwrap()
    }

    #[test]
    fn output_size_follows_pixel_ratio() {
        let img = rasterize(&bare(BackgroundSource::Placeholder), None, 2.5).unwrap();
        assert_eq!(img.dimensions(), (675, 1200));
    }

    #[test]
    fn rejects_bad_pixel_ratio() {
        let comp = bare(BackgroundSource::Placeholder);
        assert!(matches!(
            rasterize(&comp, None, 0.0),
            Err(RenderError::InvalidPixelRatio(_))
        ));
        assert!(matches!(
            rasterize(&comp, None, f32::NAN),
            Err(RenderError::InvalidPixelRatio(_))
        ));
    }

    #[test]
    fn background_image_is_cover_fitted() {
        let bytes = png(10, 10, [255, 0, 0, 255]);
        let img = rasterize(&bare(BackgroundSource::Image("x".into())), Some(&bytes), 1.0).unwrap();
        // Middle row has no shade applied.
        let mid = img.get_pixel(135, 240).0;
        assert!(mid[0] > 240 && mid[1] < 10 && mid[2] < 10, "{mid:?}");
        // Bottom row is darkened by the gradient.
        assert!(img.get_pixel(135, 479).0[0] < 80);
    }

    #[test]
    fn undecodable_background_is_an_error() {
        let result = rasterize(
            &bare(BackgroundSource::Image("x".into())),
            Some(b"not an image"),
            1.0,
        );
        assert!(matches!(result, Err(RenderError::Decode(_))));
    }

    #[test]
    fn container_filter_applies_to_every_pixel() {
        let bytes = png(4, 4, [200, 30, 30, 255]);
        let mut comp = bare(BackgroundSource::Image("x".into()));
        comp.container_filter =
            FilterChain::new(vec![crate::filter::FilterOp::Grayscale(1.0)]);
        let img = rasterize(&comp, Some(&bytes), 1.0).unwrap();
        let [r, g, b, _] = img.get_pixel(135, 240).0;
        assert!(r.abs_diff(g) <= 1 && g.abs_diff(b) <= 1);
    }

    #[test]
    fn encoded_png_decodes() {
        let img = rasterize(&bare(BackgroundSource::Placeholder), None, 1.0).unwrap();
        let bytes = encode_png(&img).unwrap();
        assert_eq!(&bytes[1..4], b"PNG");
        let back = image::load_from_memory(&bytes).unwrap();
        assert_eq!(back.width(), 270);
    }

    fn headline(text: &str, align: Align) -> TextBlock {
        TextBlock {
            lines: vec![text.to_string()],
            rect: Rect::new(20.0, 200.0, 230.0, 40.0),
            font_size: 28.0,
            line_height: 1.2,
            color: Color::WHITE,
            typography: Typography {
                family: FontFamily::Sans,
                weight: 900,
                italic: false,
                uppercase: true,
                tracking: 0.0,
                line_height: None,
                size: None,
            },
            align,
            treatment: None,
        }
    }

    /// Columns and rows (min x, max x, count) where `a` and `b` differ.
    fn ink(a: &RgbaImage, b: &RgbaImage) -> (u32, u32, usize) {
        let (mut min_x, mut max_x, mut count) = (u32::MAX, 0, 0);
        for (x, y, p) in a.enumerate_pixels() {
            if p != b.get_pixel(x, y) {
                min_x = min_x.min(x);
                max_x = max_x.max(x);
                count += 1;
            }
        }
        (min_x, max_x, count)
    }

    #[test]
    fn text_is_drawn_inside_its_block() {
        let plain = bare(BackgroundSource::Placeholder);
        let mut with_text = plain.clone();
        with_text
            .layers
            .push(Layer::Text(headline("desk chaos", Align::Start)));

        let before = rasterize(&plain, None, 1.0).unwrap();
        let after = rasterize(&with_text, None, 1.0).unwrap();

        let (min_x, max_x, count) = ink(&before, &after);
        assert!(count > 200, "only {count} pixels changed");
        assert!(min_x >= 20 && max_x <= 250, "ink spans {min_x}..={max_x}");
        for (x, y, p) in after.enumerate_pixels() {
            if y < 195 || y > 245 {
                assert_eq!(p, before.get_pixel(x, y), "stray ink at ({x}, {y})");
            }
        }
    }

    #[test]
    fn middle_aligned_text_is_centered() {
        let plain = bare(BackgroundSource::Placeholder);
        let mut with_text = plain.clone();
        with_text
            .layers
            .push(Layer::Text(headline("hi", Align::Middle)));

        let before = rasterize(&plain, None, 2.0).unwrap();
        let after = rasterize(&with_text, None, 2.0).unwrap();

        let (min_x, max_x, _) = ink(&before, &after);
        let center = (min_x + max_x) / 2;
        assert!(center.abs_diff(270) <= 6, "centered at {center}");
    }
}
