//! Bundled DejaVu faces used to draw card text into rasters.

use ab_glyph::{Font, FontRef, PxScale};

use crate::typography::{FontFamily, Typography};
use crate::RenderError;

static SANS: &[u8] = include_bytes!("../assets/fonts/DejaVuSans.ttf");
static SANS_BOLD: &[u8] = include_bytes!("../assets/fonts/DejaVuSans-Bold.ttf");
static SERIF_BOLD: &[u8] = include_bytes!("../assets/fonts/DejaVuSerif-Bold.ttf");
static MONO_BOLD: &[u8] = include_bytes!("../assets/fonts/DejaVuSansMono-Bold.ttf");

pub(crate) struct Faces {
    sans: FontRef<'static>,
    sans_bold: FontRef<'static>,
    serif_bold: FontRef<'static>,
    mono_bold: FontRef<'static>,
}

impl Faces {
    pub(crate) fn load() -> Result<Self, RenderError> {
        Ok(Self {
            sans: FontRef::try_from_slice(SANS)?,
            sans_bold: FontRef::try_from_slice(SANS_BOLD)?,
            serif_bold: FontRef::try_from_slice(SERIF_BOLD)?,
            mono_bold: FontRef::try_from_slice(MONO_BOLD)?,
        })
    }

    /// Closest bundled face for `typography`. Italics fall back to upright.
    pub(crate) fn pick(&self, typography: &Typography) -> &FontRef<'static> {
        match typography.family {
            FontFamily::Serif => &self.serif_bold,
            FontFamily::Mono => &self.mono_bold,
            FontFamily::Sans | FontFamily::Display if typography.weight >= 600 => &self.sans_bold,
            FontFamily::Sans | FontFamily::Display => &self.sans,
        }
    }
}

/// Scale whose em square is `size` px, so sizes match CSS `font-size`.
pub(crate) fn em_scale(font: &impl Font, size: f32) -> PxScale {
    let units_per_em = font.units_per_em().unwrap_or(2048.0);
    PxScale::from(size * font.height_unscaled() / units_per_em)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bundled_faces_parse() {
        let faces = Faces::load().unwrap();
        assert!(faces.sans.units_per_em().is_some());
        assert!(faces.mono_bold.units_per_em().is_some());
    }

    #[test]
    fn em_scale_is_taller_than_font_size() {
        let faces = Faces::load().unwrap();
        let scale = em_scale(&faces.sans_bold, 20.0);
        // DejaVu ascent minus descent exceeds one em.
        assert!(scale.y > 20.0 && scale.y < 30.0, "{scale:?}");
    }
}
