//! Imperfection styling: overlay texture, color filters and text jitter.

use pinforge_core::ImperfectionType;
use rand::Rng;

use crate::color::Color;
use crate::filter::{FilterChain, FilterOp};

/// Tiling texture drawn over the card background.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Texture {
    Pinstripe,
    AsphaltDark,
    FilmGrain,
    Paper,
}

impl Texture {
    /// Tile edge length in card pixels.
    pub const TILE_SIZE: f32 = 200.0;

    #[must_use]
    pub fn url(self) -> &'static str {
        match self {
            Texture::Pinstripe => "https://www.transparenttextures.com/patterns/pinstripe.png",
            Texture::AsphaltDark => "https://www.transparenttextures.com/patterns/asfalt-dark.png",
            Texture::FilmGrain => "https://www.transparenttextures.com/patterns/film-grain.png",
            Texture::Paper => "https://www.transparenttextures.com/patterns/paper.png",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BlendMode {
    #[default]
    Normal,
    Overlay,
    Multiply,
    Screen,
    Difference,
}

impl BlendMode {
    #[must_use]
    pub fn css(self) -> &'static str {
        match self {
            BlendMode::Normal => "normal",
            BlendMode::Overlay => "overlay",
            BlendMode::Multiply => "multiply",
            BlendMode::Screen => "screen",
            BlendMode::Difference => "difference",
        }
    }

    /// Blend one channel (`backdrop`, `source` in 0.0..=1.0).
    #[must_use]
    pub fn channel(self, backdrop: f32, source: f32) -> f32 {
        match self {
            BlendMode::Normal => source,
            BlendMode::Multiply => backdrop * source,
            BlendMode::Screen => 1.0 - (1.0 - backdrop) * (1.0 - source),
            BlendMode::Overlay => {
                if backdrop < 0.5 {
                    2.0 * backdrop * source
                } else {
                    1.0 - 2.0 * (1.0 - backdrop) * (1.0 - source)
                }
            }
            BlendMode::Difference => (backdrop - source).abs(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TextShadow {
    pub offset_x: f32,
    pub color: Color,
}

/// Transform and effects applied to headline text.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TextTreatment {
    pub rotation_deg: f32,
    pub offset_x: f32,
    pub offset_y: f32,
    pub filter: FilterChain,
    pub shadows: Vec<TextShadow>,
}

impl TextTreatment {
    /// CSS/SVG transform value.
    #[must_use]
    pub fn transform(&self) -> String {
        use crate::filter::fmt_num;
        format!(
            "rotate({}) translate({} {})",
            fmt_num(self.rotation_deg),
            fmt_num(self.offset_x),
            fmt_num(self.offset_y)
        )
    }
}

/// Everything the renderer needs to apply an imperfection treatment.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StyleParameters {
    pub text: TextTreatment,
    pub container_filter: FilterChain,
    pub overlay: Option<Texture>,
    pub overlay_opacity: f32,
    pub blend_mode: BlendMode,
}

/// Compute style parameters for a pin's imperfection settings.
///
/// `level` is on the 0–10 scale and is clamped. Jitter is drawn from `rng`
/// once per call, so pass a seeded RNG for reproducible output.
pub fn compute_style<R>(imperfection: ImperfectionType, level: u8, rng: &mut R) -> StyleParameters
where
    R: Rng + ?Sized,
{
    let l = f32::from(level.min(10)) / 10.0;

    let text = TextTreatment {
        rotation_deg: (rng.random::<f32>() - 0.5) * 1.5 * l,
        offset_x: (rng.random::<f32>() - 0.5) * 8.0 * l,
        offset_y: (rng.random::<f32>() - 0.5) * 8.0 * l,
        ..TextTreatment::default()
    };

    match imperfection {
        ImperfectionType::Organic => StyleParameters {
            text,
            container_filter: FilterChain::new(vec![
                FilterOp::Brightness(1.0 - l * 0.05),
                FilterOp::Contrast(1.0 + l * 0.05),
            ]),
            overlay: Some(Texture::Pinstripe),
            overlay_opacity: l * 0.15,
            blend_mode: BlendMode::Overlay,
        },
        ImperfectionType::Gritty => StyleParameters {
            text,
            container_filter: FilterChain::new(vec![
                FilterOp::Contrast(1.0 + l * 0.2),
                FilterOp::Grayscale(l * 0.2),
            ]),
            overlay: Some(Texture::AsphaltDark),
            overlay_opacity: l * 0.3,
            blend_mode: BlendMode::Multiply,
        },
        ImperfectionType::Analog => {
            let mut text = text;
            text.filter = FilterChain::new(vec![FilterOp::Blur(l * 0.4)]);
            if l > 0.5 {
                text.shadows = vec![
                    TextShadow {
                        offset_x: 1.5 * l,
                        color: Color::rgb(255, 0, 0).with_alpha(0.5),
                    },
                    TextShadow {
                        offset_x: -1.5 * l,
                        color: Color::rgb(0, 255, 255).with_alpha(0.5),
                    },
                ];
            }
            StyleParameters {
                text,
                container_filter: FilterChain::new(vec![
                    FilterOp::Sepia(l * 0.1),
                    FilterOp::HueRotate(l * 5.0),
                ]),
                overlay: Some(Texture::FilmGrain),
                overlay_opacity: l * 0.4,
                blend_mode: BlendMode::Screen,
            }
        }
        ImperfectionType::HandDrawn => StyleParameters {
            text,
            container_filter: FilterChain::none(),
            overlay: Some(Texture::Paper),
            overlay_opacity: l * 0.1,
            blend_mode: BlendMode::Multiply,
        },
        ImperfectionType::None => StyleParameters {
            text,
            container_filter: FilterChain::none(),
            overlay: None,
            overlay_opacity: 0.0,
            blend_mode: BlendMode::Normal,
        },
    }
}

/// [`compute_style`] with the thread-local RNG.
#[must_use]
pub fn compute_style_random(imperfection: ImperfectionType, level: u8) -> StyleParameters {
    compute_style(imperfection, level, &mut rand::rng())
}

#[cfg(test)]
mod tests {
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    use super::*;

    fn approx(a: f32, b: f32) -> bool {
        (a - b).abs() < 1e-5
    }

    #[test]
    fn none_has_no_overlay_and_zero_opacity() {
        let mut rng = StdRng::seed_from_u64(7);
        for level in [0, 4, 10] {
            let style = compute_style(ImperfectionType::None, level, &mut rng);
            assert!(style.overlay.is_none());
            assert!(approx(style.overlay_opacity, 0.0));
            assert!(style.container_filter.is_empty());
        }
    }

    #[test]
    fn organic_at_full_level() {
        let mut rng = StdRng::seed_from_u64(1);
        let style = compute_style(ImperfectionType::Organic, 10, &mut rng);
        assert_eq!(style.overlay, Some(Texture::Pinstripe));
        assert_eq!(style.blend_mode, BlendMode::Overlay);
        assert!(approx(style.overlay_opacity, 0.15));
        assert_eq!(style.container_filter.css(), "brightness(0.95) contrast(1.05)");
    }

    #[test]
    fn gritty_scales_with_level() {
        let mut rng = StdRng::seed_from_u64(1);
        let style = compute_style(ImperfectionType::Gritty, 5, &mut rng);
        assert_eq!(style.overlay, Some(Texture::AsphaltDark));
        assert_eq!(style.blend_mode, BlendMode::Multiply);
        assert!(approx(style.overlay_opacity, 0.15));
        assert_eq!(style.container_filter.css(), "contrast(1.1) grayscale(0.1)");
    }

    #[test]
    fn analog_shadows_only_above_half() {
        let mut rng = StdRng::seed_from_u64(3);
        let low = compute_style(ImperfectionType::Analog, 5, &mut rng);
        assert!(low.text.shadows.is_empty());
        assert_eq!(low.text.filter.css(), "blur(0.2px)");

        let high = compute_style(ImperfectionType::Analog, 8, &mut rng);
        assert_eq!(high.text.shadows.len(), 2);
        assert!(approx(high.text.shadows[0].offset_x, 1.2));
        assert!(approx(high.text.shadows[1].offset_x, -1.2));
        assert_eq!(high.blend_mode, BlendMode::Screen);
        assert!(approx(high.overlay_opacity, 0.32));
        assert_eq!(high.container_filter.css(), "sepia(0.08) hue-rotate(4deg)");
    }

    #[test]
    fn hand_drawn_has_texture_but_no_filter() {
        let mut rng = StdRng::seed_from_u64(3);
        let style = compute_style(ImperfectionType::HandDrawn, 10, &mut rng);
        assert_eq!(style.overlay, Some(Texture::Paper));
        assert!(style.container_filter.is_empty());
        assert!(approx(style.overlay_opacity, 0.1));
    }

    #[test]
    fn jitter_is_bounded_by_level() {
        let mut rng = StdRng::seed_from_u64(42);
        for _ in 0..100 {
            let style = compute_style(ImperfectionType::Organic, 10, &mut rng);
            assert!(style.text.rotation_deg.abs() <= 0.75);
            assert!(style.text.offset_x.abs() <= 4.0);
            assert!(style.text.offset_y.abs() <= 4.0);
        }
        let flat = compute_style(ImperfectionType::Organic, 0, &mut rng);
        assert!(approx(flat.text.rotation_deg, 0.0));
    }

    #[test]
    fn seeded_rng_is_reproducible() {
        let a = compute_style(ImperfectionType::Gritty, 6, &mut StdRng::seed_from_u64(9));
        let b = compute_style(ImperfectionType::Gritty, 6, &mut StdRng::seed_from_u64(9));
        assert_eq!(a, b);
    }

    #[test]
    fn level_is_clamped() {
        let mut rng = StdRng::seed_from_u64(0);
        let style = compute_style(ImperfectionType::HandDrawn, 40, &mut rng);
        assert!(approx(style.overlay_opacity, 0.1));
    }

    #[test]
    fn blend_modes() {
        assert!(approx(BlendMode::Multiply.channel(0.5, 0.5), 0.25));
        assert!(approx(BlendMode::Screen.channel(0.5, 0.5), 0.75));
        assert!(approx(BlendMode::Difference.channel(0.2, 0.9), 0.7));
        assert!(approx(BlendMode::Overlay.channel(0.25, 1.0), 0.5));
    }
}
