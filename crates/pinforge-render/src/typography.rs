use pinforge_core::FontPairing;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FontFamily {
    Sans,
    Serif,
    Mono,
    Display,
}

impl FontFamily {
    #[must_use]
    pub fn css_stack(self) -> &'static str {
        match self {
            FontFamily::Sans => "Inter, 'Helvetica Neue', Arial, sans-serif",
            FontFamily::Serif => "'Playfair Display', Georgia, serif",
            FontFamily::Mono => "'JetBrains Mono', 'Courier New', monospace",
            FontFamily::Display => "'Bebas Neue', Impact, sans-serif",
        }
    }

    /// Average glyph advance as a fraction of the font size. Used for wrapping.
    fn advance(self) -> f32 {
        match self {
            FontFamily::Mono => 0.6,
            FontFamily::Display => 0.45,
            FontFamily::Sans | FontFamily::Serif => 0.55,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Typography {
    pub family: FontFamily,
    pub weight: u16,
    pub italic: bool,
    pub uppercase: bool,
    /// Letter spacing in em.
    pub tracking: f32,
    /// Line height as a multiple of font size, when the pairing forces one.
    pub line_height: Option<f32>,
    /// Fixed size in px, when the pairing forces one.
    pub size: Option<f32>,
}

impl Typography {
    const fn new(family: FontFamily, weight: u16) -> Self {
        Self {
            family,
            weight,
            italic: false,
            uppercase: false,
            tracking: 0.0,
            line_height: None,
            size: None,
        }
    }

    /// Effective glyph advance in px for `font_size`.
    #[must_use]
    pub fn char_width(&self, font_size: f32) -> f32 {
        let base = self.family.advance() * if self.weight >= 800 { 1.08 } else { 1.0 };
        font_size * (base + self.tracking)
    }
}

/// Headline and body typography for a font pairing.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FontPair {
    pub head: Typography,
    pub body: Typography,
}

#[must_use]
pub fn font_pair(pairing: FontPairing) -> FontPair {
    use FontFamily::{Display, Mono, Sans, Serif};
    match pairing {
        FontPairing::TechMono => FontPair {
            head: Typography {
                tracking: -0.05,
                ..Typography::new(Mono, 700)
            },
            body: Typography {
                uppercase: true,
                size: Some(8.0),
                ..Typography::new(Mono, 400)
            },
        },
        FontPairing::FutureHeavy => FontPair {
            head: Typography {
                italic: true,
                uppercase: true,
                line_height: Some(0.8),
                ..Typography::new(Sans, 900)
            },
            body: Typography {
                size: Some(9.0),
                ..Typography::new(Sans, 400)
            },
        },
        FontPairing::RetroPop => FontPair {
            head: Typography {
                uppercase: true,
                tracking: -0.05,
                ..Typography::new(Display, 900)
            },
            body: Typography::new(Sans, 700),
        },
        FontPairing::Editorial => FontPair {
            head: Typography {
                italic: true,
                ..Typography::new(Serif, 700)
            },
            body: Typography {
                tracking: 0.025,
                ..Typography::new(Sans, 400)
            },
        },
        _ => FontPair {
            head: Typography {
                tracking: -0.025,
                ..Typography::new(Sans, 900)
            },
            body: Typography::new(Sans, 500),
        },
    }
}

/// Greedy word wrap using an estimated glyph width.
///
/// Words longer than a line are kept whole on their own line.
#[must_use]
pub fn wrap_text(text: &str, max_width: f32, font_size: f32, typography: &Typography) -> Vec<String> {
    let per_char = typography.char_width(font_size).max(0.1);
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let max_chars = ((max_width / per_char + 1e-3).floor() as usize).max(1);

    let mut lines = Vec::new();
    let mut current = String::new();
    for word in text.split_whitespace() {
        let needed = if current.is_empty() {
            word.chars().count()
        } else {
            current.chars().count() + 1 + word.chars().count()
        };
        if needed > max_chars && !current.is_empty() {
            lines.push(std::mem::take(&mut current));
        }
        if !current.is_empty() {
            current.push(' ');
        }
        current.push_str(word);
    }
    if !current.is_empty() {
        lines.push(current);
    }
    lines
}
