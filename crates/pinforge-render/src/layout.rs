//! Layout templates that turn a pin into a [`Composition`].

use pinforge_core::{GeneratedPin, LayoutType};

use crate::color::Color;
use crate::composition::{
    Align, Background, BackgroundSource, Composition, Controls, Layer, Overlay, Panel, Rect,
    TextBlock, CARD_HEIGHT, CARD_WIDTH,
};
use crate::style::{compute_style_random, BlendMode, StyleParameters, TextTreatment};
use crate::typography::{font_pair, wrap_text, FontPair, Typography};

/// Render a pin with a fresh style draw.
#[must_use]
pub fn render(pin: &GeneratedPin, scale: f32, show_controls: bool) -> Composition {
    let style = compute_style_random(
        pin.strategy.imperfection_type,
        pin.strategy.imperfection_level,
    );
    render_with_style(pin, &style, scale, show_controls)
}

/// Render a pin with explicit style parameters.
#[must_use]
pub fn render_with_style(
    pin: &GeneratedPin,
    style: &StyleParameters,
    scale: f32,
    show_controls: bool,
) -> Composition {
    let fonts = font_pair(pin.strategy.font_pairing);
    let mut comp = Composition {
        width: CARD_WIDTH,
        height: CARD_HEIGHT,
        scale,
        base: Color::BLACK,
        background: background_for(pin, Rect::card()),
        container_filter: style.container_filter.clone(),
        overlay: style.overlay.map(|texture| Overlay {
            texture,
            opacity: style.overlay_opacity,
            blend: style.blend_mode,
        }),
        layers: Vec::new(),
        controls: None,
    };

    match pin.strategy.layout {
        LayoutType::MagazineCutout => magazine_cutout(&mut comp, pin, &fonts, &style.text),
        LayoutType::AbstractDataViz => abstract_data_viz(&mut comp, pin, &fonts, &style.text),
        LayoutType::SplitVertical => split_vertical(&mut comp, pin, &fonts, &style.text),
        _ => centered(&mut comp, pin, &fonts, &style.text),
    }

    if show_controls {
        comp.controls = Some(Controls {
            button: "Manual Override".to_string(),
            label: format!(
                "{}: {}/10",
                pin.strategy.imperfection_type.as_str().to_uppercase(),
                pin.strategy.imperfection_level
            ),
        });
    }
    comp
}

fn background_for(pin: &GeneratedPin, rect: Rect) -> Background {
    let source = match (&pin.video_url, pin.image_url.trim()) {
        (Some(video), _) if !video.trim().is_empty() => BackgroundSource::Video(video.clone()),
        (_, image) if !image.is_empty() => BackgroundSource::Image(image.to_string()),
        _ => BackgroundSource::Placeholder,
    };
    Background {
        source,
        rect,
        opacity: 1.0,
        radius: 0.0,
        alt: pin.strategy.headline.clone(),
    }
}

struct TextSpec<'a> {
    text: &'a str,
    font_size: f32,
    line_height: f32,
    color: Color,
    typography: Typography,
    align: Align,
}

fn text_block(spec: TextSpec<'_>, x: f32, y: f32, width: f32) -> TextBlock {
    let font_size = spec.typography.size.unwrap_or(spec.font_size);
    let line_height = spec.typography.line_height.unwrap_or(spec.line_height);
    TextBlock {
        lines: wrap_text(spec.text, width, font_size, &spec.typography),
        rect: Rect::new(x, y, width, 0.0),
        font_size,
        line_height,
        color: spec.color,
        typography: spec.typography,
        align: spec.align,
        treatment: None,
    }
    .with_height()
}

impl TextBlock {
    fn with_height(mut self) -> Self {
        self.rect.h = self.height();
        self
    }

    fn jittered(mut self, treatment: &TextTreatment) -> Self {
        self.treatment = Some(treatment.clone());
        self
    }
}

fn heading(base: Typography) -> Typography {
    Typography {
        uppercase: true,
        ..base
    }
}

fn magazine_cutout(comp: &mut Composition, pin: &GeneratedPin, fonts: &FontPair, jitter: &TextTreatment) {
    const PAD: f32 = 16.0;
    let frame = Rect::new(PAD, PAD, CARD_WIDTH - 2.0 * PAD, CARD_HEIGHT - 2.0 * PAD);
    comp.base = Color::ZINC_950;
    comp.background = Background {
        radius: 8.0,
        ..background_for(pin, frame)
    };

    let inner_x = frame.x + 24.0;
    let inner_w = frame.w - 48.0;

    let headline = text_block(
        TextSpec {
            text: &pin.strategy.headline,
            font_size: 36.0,
            line_height: 0.75,
            color: Color::BLACK,
            typography: Typography {
                tracking: -0.05,
                ..heading(fonts.head)
            },
            align: Align::Start,
        },
        inner_x + 24.0,
        frame.y + 40.0 + 24.0,
        inner_w - 48.0,
    )
    .jittered(jitter);
    let cutout = Panel {
        blend: BlendMode::Difference,
        ..Panel::filled(
            Rect::new(inner_x, frame.y + 40.0, inner_w, headline.rect.h + 48.0),
            Color::WHITE,
        )
    };

    let sub = text_block(
        TextSpec {
            text: &pin.strategy.subheadline,
            font_size: 12.0,
            line_height: 1.5,
            color: Color::WHITE,
            typography: fonts.body,
            align: Align::Start,
        },
        inner_x + 12.0,
        0.0,
        inner_w - 24.0,
    );
    let bottom = frame.y + frame.h - 40.0;
    let sub_panel_h = sub.rect.h + 24.0;
    let sub_panel_y = bottom - sub_panel_h;
    let sub = TextBlock {
        rect: Rect::new(sub.rect.x, sub_panel_y + 12.0, sub.rect.w, sub.rect.h),
        ..sub
    };

    let cta_text = text_block(
        TextSpec {
            text: &pin.strategy.cta,
            font_size: 14.0,
            line_height: 1.25,
            color: Color::WHITE,
            typography: Typography {
                uppercase: true,
                weight: 900,
                size: None,
                ..fonts.body
            },
            align: Align::Start,
        },
        inner_x + 20.0,
        0.0,
        inner_w - 40.0,
    );
    let cta_h = cta_text.rect.h + 16.0;
    let cta_y = sub_panel_y - 16.0 - cta_h;
    let cta_w = cta_text
        .lines
        .iter()
        .map(|l| l.chars().count())
        .max()
        .map_or(0.0, |n| {
            #[allow(clippy::cast_precision_loss)]
            let n = n as f32;
            n * cta_text.typography.char_width(cta_text.font_size) + 40.0
        })
        .min(inner_w);
    let cta_text = TextBlock {
        rect: Rect::new(cta_text.rect.x, cta_y + 8.0, cta_text.rect.w, cta_text.rect.h),
        ..cta_text
    };

    comp.layers.extend([
        Layer::Panel(Panel {
            radius: 8.0,
            stroke: Some(Color::WHITE.with_alpha(0.1)),
            ..Panel::filled(frame, Color::BLACK.with_alpha(0.0))
        }),
        Layer::Panel(cutout),
        Layer::Text(headline),
        Layer::Panel(Panel {
            rotation_deg: -1.0,
            ..Panel::filled(Rect::new(inner_x, cta_y, cta_w, cta_h), Color::ACCENT)
        }),
        Layer::Text(cta_text),
        Layer::Panel(Panel {
            radius: 2.0,
            ..Panel::filled(
                Rect::new(inner_x, sub_panel_y, inner_w, sub_panel_h),
                Color::BLACK.with_alpha(0.6),
            )
        }),
        Layer::Text(sub),
    ]);
}

fn abstract_data_viz(comp: &mut Composition, pin: &GeneratedPin, fonts: &FontPair, jitter: &TextTreatment) {
    const PAD: f32 = 32.0;
    const INNER: f32 = 24.0;
    comp.background.opacity = 0.4;

    let frame = Rect::new(PAD, PAD, CARD_WIDTH - 2.0 * PAD, CARD_HEIGHT - 2.0 * PAD);
    let x = frame.x + INNER;
    let w = frame.w - 2.0 * INNER;
    let mono = |weight: u16| Typography {
        family: crate::typography::FontFamily::Mono,
        weight,
        italic: false,
        uppercase: true,
        tracking: 0.2,
        line_height: None,
        size: None,
    };

    let mut y = frame.y + INNER;
    let status = text_block(
        TextSpec {
            text: "SYS_PINFLOW_ACTIVE",
            font_size: 7.0,
            line_height: 1.2,
            color: Color::WHITE.with_alpha(0.4),
            typography: mono(400),
            align: Align::Start,
        },
        x,
        y,
        w / 2.0,
    );
    let score = pin
        .strategy
        .viral_audit
        .as_ref()
        .map_or_else(|| "--".to_string(), |a| a.viral_score.to_string());
    let confidence = text_block(
        TextSpec {
            text: &format!("CONFIDENCE: {score}%"),
            font_size: 7.0,
            line_height: 1.2,
            color: Color::WHITE.with_alpha(0.4),
            typography: Typography {
                tracking: 0.05,
                ..mono(400)
            },
            align: Align::End,
        },
        x + w / 2.0,
        y,
        w / 2.0,
    );
    y += status.rect.h.max(confidence.rect.h) + 8.0;
    let divider = Panel::filled(Rect::new(x, y, w, 1.0), Color::WHITE.with_alpha(0.1));
    y += 17.0;

    let headline = text_block(
        TextSpec {
            text: &pin.strategy.headline,
            font_size: 30.0,
            line_height: 1.0,
            color: Color::WHITE,
            typography: heading(fonts.head),
            align: Align::Start,
        },
        x,
        y,
        w,
    )
    .jittered(jitter);
    y += headline.rect.h + 16.0;

    let keyword = text_block(
        TextSpec {
            text: &pin.strategy.target_keyword.to_uppercase(),
            font_size: 10.0,
            line_height: 1.4,
            color: Color::ACCENT,
            typography: mono(700),
            align: Align::Start,
        },
        x,
        y,
        w,
    );

    let bottom = frame.y + frame.h - INNER;
    let cta = text_block(
        TextSpec {
            text: &pin.strategy.cta,
            font_size: 11.0,
            line_height: 1.3,
            color: Color::BLACK,
            typography: mono(900),
            align: Align::Middle,
        },
        x,
        0.0,
        w,
    );
    let cta_box_h = cta.rect.h + 32.0;
    let cta_box_y = bottom - cta_box_h;
    let cta = TextBlock {
        rect: Rect::new(x, cta_box_y + 16.0, w, cta.rect.h),
        ..cta
    };

    let sub = text_block(
        TextSpec {
            text: &pin.strategy.subheadline,
            font_size: 11.0,
            line_height: 1.6,
            color: Color::WHITE.with_alpha(0.8),
            typography: Typography {
                italic: true,
                ..fonts.body
            },
            align: Align::Start,
        },
        x + 16.0,
        0.0,
        w - 16.0,
    );
    let sub_y = cta_box_y - 24.0 - sub.rect.h;
    let sub = TextBlock {
        rect: Rect::new(sub.rect.x, sub_y, sub.rect.w, sub.rect.h),
        ..sub
    };

    comp.layers.extend([
        Layer::Panel(Panel {
            stroke: Some(Color::WHITE.with_alpha(0.1)),
            ..Panel::filled(frame, Color::BLACK.with_alpha(0.3))
        }),
        Layer::Text(status),
        Layer::Text(confidence),
        Layer::Panel(divider),
        Layer::Text(headline),
        Layer::Text(keyword),
        Layer::Panel(Panel::filled(
            Rect::new(x, sub_y, 2.0, sub.rect.h),
            Color::ACCENT,
        )),
        Layer::Text(sub),
        Layer::Panel(Panel::filled(
            Rect::new(x, cta_box_y, w, cta_box_h),
            Color::WHITE,
        )),
        Layer::Text(cta),
    ]);
}

/// Image on top, a solid color block with the copy underneath.
fn split_vertical(comp: &mut Composition, pin: &GeneratedPin, fonts: &FontPair, jitter: &TextTreatment) {
    let half = CARD_HEIGHT / 2.0;
    comp.background = background_for(pin, Rect::new(0.0, 0.0, CARD_WIDTH, half));

    let primary = Color::from_hex(&pin.strategy.primary_color).unwrap_or(Color::ZINC_950);
    let secondary = Color::from_hex(&pin.strategy.secondary_color).unwrap_or(Color::WHITE);
    let x = 24.0;
    let w = CARD_WIDTH - 48.0;

    let mut y = half + 24.0;
    let headline = text_block(
        TextSpec {
            text: &pin.strategy.headline,
            font_size: 28.0,
            line_height: 0.9,
            color: secondary,
            typography: heading(fonts.head),
            align: Align::Start,
        },
        x,
        y,
        w,
    )
    .jittered(jitter);
    y += headline.rect.h + 12.0;

    let sub = text_block(
        TextSpec {
            text: &pin.strategy.subheadline,
            font_size: 12.0,
            line_height: 1.4,
            color: secondary.with_alpha(0.85),
            typography: fonts.body,
            align: Align::Start,
        },
        x,
        y,
        w,
    );

    let cta = text_block(
        TextSpec {
            text: &pin.strategy.cta,
            font_size: 12.0,
            line_height: 1.3,
            color: Color::BLACK,
            typography: Typography {
                uppercase: true,
                weight: 900,
                ..fonts.body
            },
            align: Align::Middle,
        },
        x,
        0.0,
        w,
    );
    let pill_h = cta.rect.h + 24.0;
    let pill_y = CARD_HEIGHT - 24.0 - pill_h;
    let cta = TextBlock {
        rect: Rect::new(x, pill_y + 12.0, w, cta.rect.h),
        ..cta
    };

    comp.layers.extend([
        Layer::Panel(Panel::filled(
            Rect::new(0.0, half, CARD_WIDTH, half),
            primary,
        )),
        Layer::Panel(Panel::filled(Rect::new(0.0, half - 2.0, CARD_WIDTH, 4.0), Color::ACCENT)),
        Layer::Text(headline),
        Layer::Text(sub),
        Layer::Panel(Panel {
            radius: pill_h / 2.0,
            ..Panel::filled(Rect::new(x, pill_y, w, pill_h), Color::WHITE)
        }),
        Layer::Text(cta),
    ]);
}

fn centered(comp: &mut Composition, pin: &GeneratedPin, fonts: &FontPair, jitter: &TextTreatment) {
    const PAD: f32 = 40.0;
    let w = CARD_WIDTH - 2.0 * PAD;

    let headline = text_block(
        TextSpec {
            text: &pin.strategy.headline,
            font_size: 36.0,
            line_height: 0.85,
            color: Color::WHITE,
            typography: Typography {
                tracking: -0.05,
                ..heading(fonts.head)
            },
            align: Align::Middle,
        },
        PAD,
        0.0,
        w,
    )
    .jittered(jitter);
    let sub = text_block(
        TextSpec {
            text: &pin.strategy.subheadline,
            font_size: 15.0,
            line_height: 1.375,
            color: Color::WHITE.with_alpha(0.95),
            typography: fonts.body,
            align: Align::Middle,
        },
        PAD + w * 0.05,
        0.0,
        w * 0.9,
    );
    let cta = text_block(
        TextSpec {
            text: &pin.strategy.cta,
            font_size: 12.0,
            line_height: 1.3,
            color: Color::BLACK,
            typography: Typography {
                uppercase: true,
                weight: 900,
                size: None,
                ..fonts.body
            },
            align: Align::Middle,
        },
        PAD,
        0.0,
        w,
    );

    let rule_h = 4.0;
    let pill_h = cta.rect.h + 32.0;
    let total = rule_h + 40.0 + headline.rect.h + 24.0 + sub.rect.h + 48.0 + pill_h;
    let mut y = ((CARD_HEIGHT - total) / 2.0).max(PAD);

    let rule = Panel::filled(Rect::new(CARD_WIDTH / 2.0 - 32.0, y, 64.0, rule_h), Color::ACCENT);
    y += rule_h + 40.0;
    let headline = TextBlock {
        rect: Rect::new(headline.rect.x, y, headline.rect.w, headline.rect.h),
        ..headline
    };
    y += headline.rect.h + 24.0;
    let sub = TextBlock {
        rect: Rect::new(sub.rect.x, y, sub.rect.w, sub.rect.h),
        ..sub
    };
    y += sub.rect.h + 48.0;
    let pill = Panel {
        radius: pill_h / 2.0,
        ..Panel::filled(Rect::new(PAD - 8.0, y, w + 16.0, pill_h), Color::WHITE)
    };
    let cta = TextBlock {
        rect: Rect::new(cta.rect.x, y + 16.0, cta.rect.w, cta.rect.h),
        ..cta
    };

    comp.layers.extend([
        Layer::Panel(rule),
        Layer::Text(headline),
        Layer::Text(sub),
        Layer::Panel(pill),
        Layer::Text(cta),
    ]);
}
