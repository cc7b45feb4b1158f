use serde::{Deserialize, Deserializer, Serialize};
use uuid::Uuid;

use crate::input::ImperfectionType;

/// Card layout template requested by the strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum LayoutType {
    TechGlassmorphism,
    CyberGlow,
    ModernMinimalProduct,
    FloatingUi,
    DiagnosticGrid,
    BlueprintTech,
    BrutalistSpec,
    GlitchScanline,
    HolographicCard,
    CircuitOverlay,
    NeonWireframe,
    MinimalFrame,
    MagazineCutout,
    SplitVertical,
    RealisticLifestyle,
    AbstractDataViz,
    MacroHardware,
    SchematicDark,
    MinimalistPoster,
    PhotoCollage,
    EditorialGrid,
    #[default]
    #[serde(other)]
    Other,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EngagementStyle {
    ChaoticHumanMoment,
    VisualRoast,
    ExaggeratedMetaphor,
    ScreenshotFakeUi,
    BeforeAfterChaos,
    UglyOnPurpose,
    ObjectAsProtagonist,
    #[default]
    #[serde(other)]
    Other,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FontPairing {
    ModernBold,
    ElegantSerif,
    PlayfulHand,
    Editorial,
    RetroPop,
    MinimalSans,
    TechMono,
    FutureHeavy,
    #[default]
    #[serde(other)]
    Other,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MarketingAngle {
    Urgency,
    Curiosity,
    Benefit,
    ProblemSolution,
    Emotional,
    Bold,
    Sassy,
    Cozy,
    DadHumor,
    Aspirational,
    SnarkyTruth,
    ExistentialDread,
    HighTechFlex,
    #[default]
    #[serde(other)]
    Other,
}

/// Critique and score the model attaches to each strategy.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ViralAudit {
    #[serde(deserialize_with = "score_0_100")]
    pub viral_score: u8,
    #[serde(default)]
    pub critique: String,
    #[serde(default)]
    pub hook_improvement: String,
    #[serde(deserialize_with = "score_0_100")]
    pub seo_strength: u8,
}

/// One AI-produced marketing plan for a single keyword.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PinStrategy {
    #[serde(default = "Uuid::new_v4")]
    pub id: Uuid,
    pub target_keyword: String,
    pub headline: String,
    #[serde(default)]
    pub subheadline: String,
    #[serde(default)]
    pub cta: String,
    #[serde(default)]
    pub image_prompt: String,
    #[serde(default)]
    pub layout: LayoutType,
    #[serde(default)]
    pub engagement_style: EngagementStyle,
    #[serde(default)]
    pub primary_color: String,
    #[serde(default)]
    pub secondary_color: String,
    #[serde(default)]
    pub font_pairing: FontPairing,
    #[serde(default)]
    pub marketing_angle: MarketingAngle,
    #[serde(default, deserialize_with = "level_0_10")]
    pub imperfection_level: u8,
    #[serde(default, deserialize_with = "lenient_imperfection_type")]
    pub imperfection_type: ImperfectionType,
    #[serde(default, rename = "viralExpert", skip_serializing_if = "Option::is_none")]
    pub viral_audit: Option<ViralAudit>,
}

impl PinStrategy {
    /// A strategy is usable when it names a keyword and a headline.
    #[must_use]
    pub fn is_usable(&self) -> bool {
        !self.target_keyword.trim().is_empty() && !self.headline.trim().is_empty()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PinStatus {
    #[default]
    Pending,
    Completed,
    Failed,
}

/// A strategy plus its generated media and publish state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeneratedPin {
    #[serde(flatten)]
    pub strategy: PinStrategy,
    /// Image reference: data URL, http(s) URL, or local path. Empty while pending.
    #[serde(default)]
    pub image_url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub video_url: Option<String>,
    #[serde(default)]
    pub status: PinStatus,
    #[serde(default, rename = "postedToPinterest")]
    pub posted: bool,
    #[serde(default, rename = "pinterestPinId", skip_serializing_if = "Option::is_none")]
    pub external_id: Option<String>,
    #[serde(default, rename = "pinterestError", skip_serializing_if = "Option::is_none")]
    pub last_error: Option<String>,
    /// Link of the feed entry this pin was generated from.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_link: Option<String>,
}

impl GeneratedPin {
    #[must_use]
    pub fn pending(strategy: PinStrategy) -> Self {
        Self {
            strategy,
            image_url: String::new(),
            video_url: None,
            status: PinStatus::Pending,
            posted: false,
            external_id: None,
            last_error: None,
            source_link: None,
        }
    }

    #[must_use]
    pub fn id(&self) -> Uuid {
        self.strategy.id
    }

    #[must_use]
    pub fn is_completed(&self) -> bool {
        self.status == PinStatus::Completed
    }

    pub fn complete(&mut self, image_url: String) {
        self.image_url = image_url;
        self.status = PinStatus::Completed;
    }

    pub fn fail(&mut self) {
        self.image_url.clear();
        self.status = PinStatus::Failed;
    }
}

fn score_0_100<'de, D>(deserializer: D) -> Result<u8, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = f64::deserialize(deserializer)?;
    Ok(clamp_round(raw, 100.0))
}

fn level_0_10<'de, D>(deserializer: D) -> Result<u8, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = f64::deserialize(deserializer)?;
    Ok(clamp_round(raw, 10.0))
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn clamp_round(raw: f64, max: f64) -> u8 {
    if raw.is_nan() {
        return 0;
    }
    raw.round().clamp(0.0, max) as u8
}

fn lenient_imperfection_type<'de, D>(deserializer: D) -> Result<ImperfectionType, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    Ok(raw
        .and_then(|s| serde_json::from_value(serde_json::Value::String(s)).ok())
        .unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strategy_json() -> serde_json::Value {
        serde_json::json!({
            "targetKeyword": "cat collars",
            "headline": "Your cat judges you",
            "subheadline": "and the collar agrees",
            "cta": "Shop the shame",
            "imagePrompt": "a smug cat",
            "layout": "magazine-cutout",
            "engagementStyle": "VISUAL_ROAST",
            "primaryColor": "#ff0055",
            "secondaryColor": "#111111",
            "fontPairing": "retro-pop",
            "marketingAngle": "snarky-truth",
            "imperfectionLevel": 7.6,
            "imperfectionType": "gritty",
            "viralExpert": {
                "viralScore": 87.4,
                "critique": "strong hook",
                "hookImprovement": "shorter",
                "seoStrength": 140
            }
        })
    }

    #[test]
    fn strategy_parses_with_generated_id() {
        let strategy: PinStrategy = serde_json::from_value(strategy_json()).unwrap();
        assert_eq!(strategy.layout, LayoutType::MagazineCutout);
        assert_eq!(strategy.engagement_style, EngagementStyle::VisualRoast);
        assert_eq!(strategy.marketing_angle, MarketingAngle::SnarkyTruth);
        assert_eq!(strategy.imperfection_level, 8);
        assert_eq!(strategy.imperfection_type, ImperfectionType::Gritty);
        let audit = strategy.viral_audit.unwrap();
        assert_eq!(audit.viral_score, 87);
        assert_eq!(audit.seo_strength, 100);
        assert!(!strategy.id.is_nil());
    }

    #[test]
    fn unknown_enum_strings_fall_back() {
        let mut json = strategy_json();
        json["layout"] = "vertical-mosaic".into();
        json["fontPairing"] = "comic-sans".into();
        json["marketingAngle"] = "nostalgia".into();
        json["engagementStyle"] = "MEME".into();
        json["imperfectionType"] = "watercolor".into();
        let strategy: PinStrategy = serde_json::from_value(json).unwrap();
        assert_eq!(strategy.layout, LayoutType::Other);
        assert_eq!(strategy.font_pairing, FontPairing::Other);
        assert_eq!(strategy.marketing_angle, MarketingAngle::Other);
        assert_eq!(strategy.engagement_style, EngagementStyle::Other);
        assert_eq!(strategy.imperfection_type, ImperfectionType::None);
    }

    #[test]
    fn generated_pin_flattens_strategy() {
        let strategy: PinStrategy = serde_json::from_value(strategy_json()).unwrap();
        let mut pin = GeneratedPin::pending(strategy);
        pin.complete("https://cdn.example.com/a.png".to_string());

        let value = serde_json::to_value(&pin).unwrap();
        assert_eq!(value["headline"], "Your cat judges you");
        assert_eq!(value["status"], "completed");
        assert_eq!(value["postedToPinterest"], false);

        let back: GeneratedPin = serde_json::from_value(value).unwrap();
        assert_eq!(back, pin);
    }

    #[test]
    fn failing_a_pin_clears_its_image() {
        let strategy: PinStrategy = serde_json::from_value(strategy_json()).unwrap();
        let mut pin = GeneratedPin::pending(strategy);
        pin.image_url = "partial".to_string();
        pin.fail();
        assert_eq!(pin.status, PinStatus::Failed);
        assert!(pin.image_url.is_empty());
    }
}
