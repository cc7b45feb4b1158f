//! Typed scene for one card and its SVG serialization.

use std::fmt::Write as _;

use crate::color::Color;
use crate::filter::{fmt_num, FilterChain};
use crate::style::{BlendMode, TextTreatment, Texture};
use crate::typography::Typography;

pub const CARD_WIDTH: f32 = 270.0;
pub const CARD_HEIGHT: f32 = 480.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

impl Rect {
    #[must_use]
    pub const fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self { x, y, w, h }
    }

    #[must_use]
    pub const fn card() -> Self {
        Self::new(0.0, 0.0, CARD_WIDTH, CARD_HEIGHT)
    }
}

/// What fills the background area, in priority order video, image, placeholder.
#[derive(Debug, Clone, PartialEq)]
pub enum BackgroundSource {
    Video(String),
    Image(String),
    Placeholder,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Background {
    pub source: BackgroundSource,
    pub rect: Rect,
    pub opacity: f32,
    pub radius: f32,
    pub alt: String,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Overlay {
    pub texture: Texture,
    pub opacity: f32,
    pub blend: BlendMode,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Panel {
    pub rect: Rect,
    pub fill: Color,
    pub radius: f32,
    pub blend: BlendMode,
    pub stroke: Option<Color>,
    /// Rotation in degrees around the panel center.
    pub rotation_deg: f32,
}

impl Panel {
    #[must_use]
    pub fn filled(rect: Rect, fill: Color) -> Self {
        Self {
            rect,
            fill,
            radius: 0.0,
            blend: BlendMode::Normal,
            stroke: None,
            rotation_deg: 0.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Align {
    Start,
    Middle,
    End,
}

impl Align {
    fn anchor(self) -> &'static str {
        match self {
            Align::Start => "start",
            Align::Middle => "middle",
            Align::End => "end",
        }
    }
}

/// A block of pre-wrapped text. `rect.y` is the top of the first line box.
#[derive(Debug, Clone, PartialEq)]
pub struct TextBlock {
    pub lines: Vec<String>,
    pub rect: Rect,
    pub font_size: f32,
    pub line_height: f32,
    pub color: Color,
    pub typography: Typography,
    pub align: Align,
    pub treatment: Option<TextTreatment>,
}

impl TextBlock {
    /// Height of all line boxes in px.
    #[must_use]
    pub fn height(&self) -> f32 {
        #[allow(clippy::cast_precision_loss)]
        let n = self.lines.len() as f32;
        n * self.font_size * self.line_height
    }

    #[must_use]
    pub fn text(&self) -> String {
        self.lines.join(" ")
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Layer {
    Panel(Panel),
    Text(TextBlock),
}

/// Hover controls shown over the card in interactive views.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Controls {
    pub button: String,
    pub label: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Composition {
    pub width: f32,
    pub height: f32,
    pub scale: f32,
    pub base: Color,
    pub background: Background,
    pub container_filter: FilterChain,
    pub overlay: Option<Overlay>,
    pub layers: Vec<Layer>,
    pub controls: Option<Controls>,
}

impl Composition {
    /// Every text block in paint order.
    pub fn texts(&self) -> impl Iterator<Item = &TextBlock> {
        self.layers.iter().filter_map(|l| match l {
            Layer::Text(t) => Some(t),
            Layer::Panel(_) => None,
        })
    }

    pub fn panels(&self) -> impl Iterator<Item = &Panel> {
        self.layers.iter().filter_map(|l| match l {
            Layer::Panel(p) => Some(p),
            Layer::Text(_) => None,
        })
    }

    /// Standalone SVG document for the card.
    #[must_use]
    pub fn to_svg(&self) -> String {
        let mut out = String::with_capacity(4096);
        let _ = write!(
            out,
            r#"<svg xmlns="http://www.w3.org/2000/svg" xmlns:xlink="http://www.w3.org/1999/xlink" width="{}" height="{}" viewBox="0 0 {} {}">"#,
            fmt_num(self.width * self.scale),
            fmt_num(self.height * self.scale),
            fmt_num(self.width),
            fmt_num(self.height),
        );
        self.write_defs(&mut out);

        let _ = write!(
            out,
            r#"<rect width="{}" height="{}" fill="{}"/>"#,
            fmt_num(self.width),
            fmt_num(self.height),
            self.base.hex()
        );

        if self.container_filter.is_empty() {
            out.push_str("<g>");
        } else {
            let _ = write!(
                out,
                r#"<g style="filter:{}">"#,
                self.container_filter.css()
            );
        }
        self.write_background(&mut out);
        for layer in &self.layers {
            match layer {
                Layer::Panel(p) => write_panel(&mut out, p),
                Layer::Text(t) => write_text(&mut out, t),
            }
        }
        out.push_str("</g>");

        if let Some(controls) = &self.controls {
            self.write_controls(&mut out, controls);
        }
        out.push_str("</svg>");
        out
    }

    fn write_defs(&self, out: &mut String) {
        let bg = &self.background.rect;
        out.push_str("<defs>");
        let _ = write!(
            out,
            r##"<linearGradient id="shade" x1="0" y1="0" x2="0" y2="1"><stop offset="0" stop-color="#000" stop-opacity="0.2"/><stop offset="0.5" stop-color="#000" stop-opacity="0"/><stop offset="1" stop-color="#000" stop-opacity="0.8"/></linearGradient>"##
        );
        let _ = write!(
            out,
            r#"<clipPath id="bg-clip"><rect x="{}" y="{}" width="{}" height="{}" rx="{}"/></clipPath>"#,
            fmt_num(bg.x),
            fmt_num(bg.y),
            fmt_num(bg.w),
            fmt_num(bg.h),
            fmt_num(self.background.radius)
        );
        if let Some(overlay) = &self.overlay {
            let tile = fmt_num(Texture::TILE_SIZE);
            let _ = write!(
                out,
                r#"<pattern id="texture" width="{tile}" height="{tile}" patternUnits="userSpaceOnUse"><image href="{}" width="{tile}" height="{tile}"/></pattern>"#,
                xml_escape(overlay.texture.url())
            );
        }
        out.push_str("</defs>");
    }

    fn write_background(&self, out: &mut String) {
        let bg = &self.background;
        let r = &bg.rect;
        let geom = format!(
            r#"x="{}" y="{}" width="{}" height="{}""#,
            fmt_num(r.x),
            fmt_num(r.y),
            fmt_num(r.w),
            fmt_num(r.h)
        );
        let _ = write!(
            out,
            r#"<g clip-path="url(#bg-clip)" opacity="{}">"#,
            fmt_num(bg.opacity)
        );
        match &bg.source {
            BackgroundSource::Video(src) => {
                let _ = write!(
                    out,
                    r#"<foreignObject {geom}><video xmlns="http://www.w3.org/1999/xhtml" src="{}" autoplay="" muted="" loop="" playsinline="" style="width:100%;height:100%;object-fit:cover"/></foreignObject>"#,
                    xml_escape(src)
                );
            }
            BackgroundSource::Image(src) => {
                let _ = write!(
                    out,
                    r#"<image {geom} href="{}" preserveAspectRatio="xMidYMid slice"><title>{}</title></image>"#,
                    xml_escape(src),
                    xml_escape(&bg.alt)
                );
            }
            BackgroundSource::Placeholder => {
                let _ = write!(
                    out,
                    r#"<rect {geom} fill="{}" opacity="0.2"/>"#,
                    Color::PLACEHOLDER.hex()
                );
            }
        }
        let _ = write!(out, r#"<rect {geom} fill="url(#shade)"/>"#);
        if let Some(overlay) = &self.overlay {
            let _ = write!(
                out,
                r#"<rect {geom} fill="url(#texture)" opacity="{}" style="mix-blend-mode:{}"/>"#,
                fmt_num(overlay.opacity),
                overlay.blend.css()
            );
        }
        out.push_str("</g>");
    }

    fn write_controls(&self, out: &mut String, controls: &Controls) {
        let cx = self.width / 2.0;
        let cy = self.height / 2.0;
        let _ = write!(
            out,
            r#"<g class="controls"><rect width="{}" height="{}" fill="{}"/>"#,
            fmt_num(self.width),
            fmt_num(self.height),
            Color::BLACK.with_alpha(0.8).css()
        );
        let _ = write!(
            out,
            r##"<rect x="{}" y="{}" width="180" height="44" rx="22" fill="#fff"/>"##,
            fmt_num(cx - 90.0),
            fmt_num(cy - 40.0)
        );
        let _ = write!(
            out,
            r#"<text x="{}" y="{}" text-anchor="middle" font-family="{}" font-size="11" font-weight="900" letter-spacing="2.2">{}</text>"#,
            fmt_num(cx),
            fmt_num(cy - 14.0),
            xml_escape(crate::typography::FontFamily::Sans.css_stack()),
            xml_escape(&controls.button.to_uppercase())
        );
        let _ = write!(
            out,
            r#"<text x="{}" y="{}" text-anchor="middle" font-family="{}" font-size="9" fill="{}" letter-spacing="2.7">{}</text></g>"#,
            fmt_num(cx),
            fmt_num(cy + 30.0),
            xml_escape(crate::typography::FontFamily::Mono.css_stack()),
            Color::WHITE.with_alpha(0.4).css(),
            xml_escape(&controls.label)
        );
    }
}

fn write_panel(out: &mut String, p: &Panel) {
    let r = &p.rect;
    let mut attrs = format!(
        r#"x="{}" y="{}" width="{}" height="{}" fill="{}""#,
        fmt_num(r.x),
        fmt_num(r.y),
        fmt_num(r.w),
        fmt_num(r.h),
        p.fill.hex()
    );
    if p.fill.a < 1.0 {
        let _ = write!(attrs, r#" fill-opacity="{}""#, fmt_num(p.fill.a));
    }
    if p.radius > 0.0 {
        let _ = write!(attrs, r#" rx="{}""#, fmt_num(p.radius));
    }
    if let Some(stroke) = p.stroke {
        let _ = write!(
            attrs,
            r#" stroke="{}" stroke-opacity="{}""#,
            stroke.hex(),
            fmt_num(stroke.a)
        );
    }
    if p.blend != BlendMode::Normal {
        let _ = write!(attrs, r#" style="mix-blend-mode:{}""#, p.blend.css());
    }
    if p.rotation_deg != 0.0 {
        let _ = write!(
            attrs,
            r#" transform="rotate({} {} {})""#,
            fmt_num(p.rotation_deg),
            fmt_num(r.x + r.w / 2.0),
            fmt_num(r.y + r.h / 2.0)
        );
    }
    let _ = write!(out, "<rect {attrs}/>");
}

fn write_text(out: &mut String, t: &TextBlock) {
    let treatment = t.treatment.as_ref();
    let open_group = treatment.is_some();
    if let Some(tr) = treatment {
        let mut style = String::new();
        if !tr.filter.is_empty() {
            style = format!(r#" style="filter:{}""#, tr.filter.css());
        }
        let _ = write!(out, r#"<g transform="{}"{style}>"#, tr.transform());
        for shadow in &tr.shadows {
            write_text_element(out, t, shadow.offset_x, shadow.color);
        }
    }
    write_text_element(out, t, 0.0, t.color);
    if open_group {
        out.push_str("</g>");
    }
}

fn write_text_element(out: &mut String, t: &TextBlock, dx: f32, color: Color) {
    let x = match t.align {
        Align::Start => t.rect.x,
        Align::Middle => t.rect.x + t.rect.w / 2.0,
        Align::End => t.rect.x + t.rect.w,
    } + dx;
    let line_px = t.font_size * t.line_height;
    // Baseline sits roughly 80% down the first line box.
    let baseline = t.rect.y + (line_px - t.font_size) / 2.0 + t.font_size * 0.8;
    let ty = &t.typography;

    let mut attrs = format!(
        r#"x="{}" y="{}" text-anchor="{}" font-family="{}" font-size="{}" font-weight="{}" fill="{}""#,
        fmt_num(x),
        fmt_num(baseline),
        t.align.anchor(),
        xml_escape(ty.family.css_stack()),
        fmt_num(t.font_size),
        ty.weight,
        color.hex()
    );
    if color.a < 1.0 {
        let _ = write!(attrs, r#" fill-opacity="{}""#, fmt_num(color.a));
    }
    if ty.italic {
        attrs.push_str(r#" font-style="italic""#);
    }
    if ty.tracking != 0.0 {
        let _ = write!(
            attrs,
            r#" letter-spacing="{}""#,
            fmt_num(ty.tracking * t.font_size)
        );
    }

    let _ = write!(out, "<text {attrs}>");
    for (i, line) in t.lines.iter().enumerate() {
        let text = if ty.uppercase {
            line.to_uppercase()
        } else {
            line.clone()
        };
        let dy = if i == 0 { 0.0 } else { line_px };
        let _ = write!(
            out,
            r#"<tspan x="{}" dy="{}">{}</tspan>"#,
            fmt_num(x),
            fmt_num(dy),
            xml_escape(&text)
        );
    }
    out.push_str("</text>");
}

/// Escape text for use in XML content and attribute values.
#[must_use]
pub fn xml_escape(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            _ => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn escapes_markup() {
        assert_eq!(
            xml_escape(r#"<b>"Tom" & 'Jerry'</b>"#),
            "&lt;b&gt;&quot;Tom&quot; &amp; &apos;Jerry&apos;&lt;/b&gt;"
        );
    }

    #[test]
    fn placeholder_background_serializes() {
        let comp = Composition {
            width: CARD_WIDTH,
            height: CARD_HEIGHT,
            scale: 2.0,
            base: Color::BLACK,
            background: Background {
                source: BackgroundSource::Placeholder,
                rect: Rect::card(),
                opacity: 1.0,
                radius: 0.0,
                alt: String::new(),
            },
            container_filter: FilterChain::none(),
            overlay: None,
            layers: Vec::new(),
            controls: None,
        };
        let svg = comp.to_svg();
        assert!(svg.starts_with("<svg "));
        assert!(svg.contains(r#"width="540" height="960" viewBox="0 0 270 480""#));
        assert!(svg.contains("#27272a"));
        assert!(!svg.contains("url(#texture)"));
        assert!(svg.ends_with("</svg>"));
    }
}
