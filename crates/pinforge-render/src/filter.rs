//! CSS-style filter functions with a per-pixel implementation.
//!
//! Color matrices follow the Filter Effects Level 1 definitions so the SVG
//! output and the raster agree.

/// One filter function.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FilterOp {
    Brightness(f32),
    Contrast(f32),
    Grayscale(f32),
    Sepia(f32),
    /// Degrees.
    HueRotate(f32),
    /// Pixels. Only meaningful for text; ignored per pixel.
    Blur(f32),
}

impl FilterOp {
    #[must_use]
    pub fn css(&self) -> String {
        match *self {
            FilterOp::Brightness(v) => format!("brightness({})", fmt_num(v)),
            FilterOp::Contrast(v) => format!("contrast({})", fmt_num(v)),
            FilterOp::Grayscale(v) => format!("grayscale({})", fmt_num(v)),
            FilterOp::Sepia(v) => format!("sepia({})", fmt_num(v)),
            FilterOp::HueRotate(v) => format!("hue-rotate({}deg)", fmt_num(v)),
            FilterOp::Blur(v) => format!("blur({}px)", fmt_num(v)),
        }
    }

    fn apply(&self, rgb: [f32; 3]) -> [f32; 3] {
        match *self {
            FilterOp::Brightness(a) => rgb.map(|c| c * a),
            FilterOp::Contrast(a) => rgb.map(|c| (c - 0.5) * a + 0.5),
            FilterOp::Grayscale(a) => {
                let k = 1.0 - a.clamp(0.0, 1.0);
                mul(
                    [
                        [0.2126 + 0.7874 * k, 0.7152 - 0.7152 * k, 0.0722 - 0.0722 * k],
                        [0.2126 - 0.2126 * k, 0.7152 + 0.2848 * k, 0.0722 - 0.0722 * k],
                        [0.2126 - 0.2126 * k, 0.7152 - 0.7152 * k, 0.0722 + 0.9278 * k],
                    ],
                    rgb,
                )
            }
            FilterOp::Sepia(a) => {
                let k = 1.0 - a.clamp(0.0, 1.0);
                mul(
                    [
                        [0.393 + 0.607 * k, 0.769 - 0.769 * k, 0.189 - 0.189 * k],
                        [0.349 - 0.349 * k, 0.686 + 0.314 * k, 0.168 - 0.168 * k],
                        [0.272 - 0.272 * k, 0.534 - 0.534 * k, 0.131 + 0.869 * k],
                    ],
                    rgb,
                )
            }
            FilterOp::HueRotate(deg) => {
                let (sin, cos) = deg.to_radians().sin_cos();
                mul(
                    [
                        [
                            0.213 + cos * 0.787 - sin * 0.213,
                            0.715 - cos * 0.715 - sin * 0.715,
                            0.072 - cos * 0.072 + sin * 0.928,
                        ],
                        [
                            0.213 - cos * 0.213 + sin * 0.143,
                            0.715 + cos * 0.285 + sin * 0.140,
                            0.072 - cos * 0.072 - sin * 0.283,
                        ],
                        [
                            0.213 - cos * 0.213 - sin * 0.787,
                            0.715 - cos * 0.715 + sin * 0.715,
                            0.072 + cos * 0.928 + sin * 0.072,
                        ],
                    ],
                    rgb,
                )
            }
            FilterOp::Blur(_) => rgb,
        }
    }
}

fn mul(m: [[f32; 3]; 3], v: [f32; 3]) -> [f32; 3] {
    [
        m[0][0] * v[0] + m[0][1] * v[1] + m[0][2] * v[2],
        m[1][0] * v[0] + m[1][1] * v[1] + m[1][2] * v[2],
        m[2][0] * v[0] + m[2][1] * v[1] + m[2][2] * v[2],
    ]
}

/// Ordered list of filter functions. Empty means `none`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilterChain(Vec<FilterOp>);

impl FilterChain {
    #[must_use]
    pub fn new(ops: Vec<FilterOp>) -> Self {
        Self(ops)
    }

    #[must_use]
    pub fn none() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    #[must_use]
    pub fn ops(&self) -> &[FilterOp] {
        &self.0
    }

    /// CSS `filter` value, `none` when empty.
    #[must_use]
    pub fn css(&self) -> String {
        if self.0.is_empty() {
            return "none".to_string();
        }
        self.0
            .iter()
            .map(FilterOp::css)
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Apply every color op in order to one pixel. Alpha is untouched.
    #[must_use]
    pub fn apply_pixel(&self, px: [u8; 4]) -> [u8; 4] {
        if self.0.is_empty() {
            return px;
        }
        let mut rgb = [px[0], px[1], px[2]].map(|c| f32::from(c) / 255.0);
        for op in &self.0 {
            rgb = op.apply(rgb).map(|c| c.clamp(0.0, 1.0));
        }
        let [r, g, b] = rgb.map(to_u8);
        [r, g, b, px[3]]
    }
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub(crate) fn to_u8(c: f32) -> u8 {
    (c.clamp(0.0, 1.0) * 255.0).round() as u8
}

/// Format a number with at most three decimals and no trailing zeros.
pub(crate) fn fmt_num(v: f32) -> String {
    let s = format!("{v:.3}");
    let s = s.trim_end_matches('0').trim_end_matches('.');
    if s == "-0" {
        "0".to_string()
    } else {
        s.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn css_serialization() {
        let chain = FilterChain::new(vec![
            FilterOp::Brightness(0.95),
            FilterOp::Contrast(1.05),
            FilterOp::HueRotate(4.0),
        ]);
        assert_eq!(chain.css(), "brightness(0.95) contrast(1.05) hue-rotate(4deg)");
        assert_eq!(FilterChain::none().css(), "none");
    }

    #[test]
    fn full_grayscale_equalizes_channels() {
        let chain = FilterChain::new(vec![FilterOp::Grayscale(1.0)]);
        let [r, g, b, a] = chain.apply_pixel([200, 40, 90, 128]);
        assert!(r.abs_diff(g) <= 1 && g.abs_diff(b) <= 1);
        assert_eq!(a, 128);
    }

    #[test]
    fn contrast_pushes_away_from_mid_gray() {
        let chain = FilterChain::new(vec![FilterOp::Contrast(2.0)]);
        let [r, ..] = chain.apply_pixel([200, 0, 0, 255]);
        assert!(r > 200);
        let [r, ..] = chain.apply_pixel([60, 0, 0, 255]);
        assert!(r < 60);
    }

    #[test]
    fn zero_amount_ops_are_identity() {
        let chain = FilterChain::new(vec![
            FilterOp::Sepia(0.0),
            FilterOp::HueRotate(0.0),
            FilterOp::Brightness(1.0),
        ]);
        let px = [12, 150, 240, 255];
        let out = chain.apply_pixel(px);
        for i in 0..3 {
            assert!(out[i].abs_diff(px[i]) <= 1, "channel {i}: {out:?} vs {px:?}");
        }
    }

    #[test]
    fn fmt_num_trims() {
        assert_eq!(fmt_num(1.0), "1");
        assert_eq!(fmt_num(0.150_000_01), "0.15");
        assert_eq!(fmt_num(-0.0001), "0");
    }
}
