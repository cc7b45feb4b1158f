use serde::{Deserialize, Serialize};

use crate::InputError;

/// Upper bound on pins generated by a single batch.
pub const MAX_PIN_COUNT: u32 = 20;

/// Where a batch draws its work items from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceType {
    #[default]
    Brand,
    Rss,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HumorLevel {
    Friendly,
    Sarcastic,
    #[default]
    Unhinged,
}

impl HumorLevel {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            HumorLevel::Friendly => "friendly",
            HumorLevel::Sarcastic => "sarcastic",
            HumorLevel::Unhinged => "unhinged",
        }
    }
}

impl std::fmt::Display for HumorLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Named art direction passed to the image model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum VisualStyle {
    #[default]
    Modern,
    Retro,
    Classic,
    Cartoonie,
    Realistic,
    HighTech,
    Abstract,
    MagazineCutout,
    PhotoCollage,
    AbstractDataViz,
    SchematicBlueprint,
    Brutalist,
    NeonNoir,
    Vaporwave,
    #[serde(rename = "3d-claymation")]
    Claymation3d,
    MinimalEditorial,
}

impl VisualStyle {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            VisualStyle::Modern => "modern",
            VisualStyle::Retro => "retro",
            VisualStyle::Classic => "classic",
            VisualStyle::Cartoonie => "cartoonie",
            VisualStyle::Realistic => "realistic",
            VisualStyle::HighTech => "high-tech",
            VisualStyle::Abstract => "abstract",
            VisualStyle::MagazineCutout => "magazine-cutout",
            VisualStyle::PhotoCollage => "photo-collage",
            VisualStyle::AbstractDataViz => "abstract-data-viz",
            VisualStyle::SchematicBlueprint => "schematic-blueprint",
            VisualStyle::Brutalist => "brutalist",
            VisualStyle::NeonNoir => "neon-noir",
            VisualStyle::Vaporwave => "vaporwave",
            VisualStyle::Claymation3d => "3d-claymation",
            VisualStyle::MinimalEditorial => "minimal-editorial",
        }
    }
}

impl std::fmt::Display for VisualStyle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Deliberate visual distortion family applied to a card.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ImperfectionType {
    #[default]
    None,
    Organic,
    Gritty,
    Analog,
    HandDrawn,
}

impl ImperfectionType {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            ImperfectionType::None => "none",
            ImperfectionType::Organic => "organic",
            ImperfectionType::Gritty => "gritty",
            ImperfectionType::Analog => "analog",
            ImperfectionType::HandDrawn => "hand-drawn",
        }
    }
}

impl std::fmt::Display for ImperfectionType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The 0–5 intensity control. Pins store `level()`, which is twice this.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct ImperfectionIntensity(u8);

impl ImperfectionIntensity {
    pub const MAX: u8 = 5;

    /// # Errors
    ///
    /// Returns [`InputError::IntensityOutOfRange`] for values above 5.
    pub fn new(value: u8) -> Result<Self, InputError> {
        if value > Self::MAX {
            return Err(InputError::IntensityOutOfRange(value));
        }
        Ok(Self(value))
    }

    #[must_use]
    pub fn get(self) -> u8 {
        self.0
    }

    /// Imperfection level stored on pins, on the 0–10 scale.
    #[must_use]
    pub fn level(self) -> u8 {
        self.0 * 2
    }
}

impl Default for ImperfectionIntensity {
    fn default() -> Self {
        Self(3)
    }
}

impl TryFrom<u8> for ImperfectionIntensity {
    type Error = InputError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<ImperfectionIntensity> for u8 {
    fn from(value: ImperfectionIntensity) -> Self {
        value.0
    }
}

/// User configuration for one generation batch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductInput {
    pub source_type: SourceType,
    /// Product name, brand, or URL describing what is being marketed.
    #[serde(default)]
    pub url_or_name: String,
    /// Newline-separated keyword bank; takes precedence over analysis keywords.
    #[serde(default)]
    pub manual_keywords: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub brand_voice: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_demographic: Option<String>,
    pub pin_count: u32,
    pub humor_level: HumorLevel,
    pub visual_style: VisualStyle,
    pub imperfection_type: ImperfectionType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub destination_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rss_url: Option<String>,
}

impl Default for ProductInput {
    fn default() -> Self {
        Self {
            source_type: SourceType::Brand,
            url_or_name: String::new(),
            manual_keywords: String::new(),
            brand_voice: Some("Savage, Unhinged & Sarcastic".to_string()),
            target_demographic: Some("Women (Millennial/Gen-Z)".to_string()),
            pin_count: 5,
            humor_level: HumorLevel::Unhinged,
            visual_style: VisualStyle::Modern,
            imperfection_type: ImperfectionType::Organic,
            destination_url: None,
            rss_url: None,
        }
    }
}

impl ProductInput {
    /// Manual keywords split one per line, trimmed, blanks dropped.
    #[must_use]
    pub fn manual_keyword_list(&self) -> Vec<String> {
        self.manual_keywords
            .lines()
            .map(str::trim)
            .filter(|k| !k.is_empty())
            .map(str::to_string)
            .collect()
    }

    /// Destination link for pins, ignoring blank values.
    #[must_use]
    pub fn destination(&self) -> Option<&str> {
        self.destination_url
            .as_deref()
            .map(str::trim)
            .filter(|d| !d.is_empty())
    }

    /// Check the input before any network call is made.
    ///
    /// `feed_items_loaded` is the number of feed entries available for a feed run.
    ///
    /// # Errors
    ///
    /// Returns the first [`InputError`] found.
    pub fn validate_for_batch(&self, feed_items_loaded: usize) -> Result<(), InputError> {
        if self.pin_count == 0 || self.pin_count > MAX_PIN_COUNT {
            return Err(InputError::PinCountOutOfRange(self.pin_count));
        }
        match self.source_type {
            SourceType::Brand => {
                if self.url_or_name.trim().is_empty() && self.manual_keyword_list().is_empty() {
                    return Err(InputError::MissingSubject);
                }
            }
            SourceType::Rss => {
                if feed_items_loaded == 0 {
                    return Err(InputError::EmptyFeed);
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn intensity_level_is_doubled() {
        for v in 0..=5u8 {
            assert_eq!(ImperfectionIntensity::new(v).unwrap().level(), v * 2);
        }
    }

    #[test]
    fn intensity_rejects_values_above_five() {
        assert_eq!(
            ImperfectionIntensity::new(6),
            Err(InputError::IntensityOutOfRange(6))
        );
    }

    #[test]
    fn manual_keywords_are_trimmed_and_blank_lines_dropped() {
        let input = ProductInput {
            manual_keywords: "  cat collars \n\n spoiled pet hacks\n   \nkitty decor".to_string(),
            ..ProductInput::default()
        };
        assert_eq!(
            input.manual_keyword_list(),
            vec!["cat collars", "spoiled pet hacks", "kitty decor"]
        );
    }

    #[test]
    fn brand_run_requires_name_or_keywords() {
        let input = ProductInput::default();
        assert_eq!(input.validate_for_batch(0), Err(InputError::MissingSubject));

        let named = ProductInput {
            url_or_name: "Designer Cat Collars".to_string(),
            ..ProductInput::default()
        };
        assert!(named.validate_for_batch(0).is_ok());
    }

    #[test]
    fn feed_run_requires_loaded_items() {
        let input = ProductInput {
            source_type: SourceType::Rss,
            ..ProductInput::default()
        };
        assert_eq!(input.validate_for_batch(0), Err(InputError::EmptyFeed));
        assert!(input.validate_for_batch(3).is_ok());
    }

    #[test]
    fn pin_count_bounds_are_enforced() {
        let base = ProductInput {
            url_or_name: "x".to_string(),
            ..ProductInput::default()
        };
        for bad in [0, 21] {
            let input = ProductInput {
                pin_count: bad,
                ..base.clone()
            };
            assert_eq!(
                input.validate_for_batch(0),
                Err(InputError::PinCountOutOfRange(bad))
            );
        }
    }

    #[test]
    fn visual_style_serializes_with_original_names() {
        let json = serde_json::to_string(&VisualStyle::Claymation3d).unwrap();
        assert_eq!(json, "\"3d-claymation\"");
        let parsed: VisualStyle = serde_json::from_str("\"neon-noir\"").unwrap();
        assert_eq!(parsed, VisualStyle::NeonNoir);
        assert_eq!(parsed.as_str(), "neon-noir");
    }

    #[test]
    fn blank_destination_is_none() {
        let input = ProductInput {
            destination_url: Some("   ".to_string()),
            ..ProductInput::default()
        };
        assert!(input.destination().is_none());
    }
}
