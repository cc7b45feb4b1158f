use serde::{Deserialize, Serialize};

/// Keywords grouped by search-intent tier.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExpandedKeywords {
    #[serde(default)]
    pub long_tail: Vec<String>,
    #[serde(default)]
    pub mid_tail: Vec<String>,
    #[serde(default)]
    pub buying_intent: Vec<String>,
}

/// AI-derived summary of a brand's audience and visual direction, computed
/// once per batch and reused by append runs.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NicheAnalysis {
    pub niche: String,
    pub visual_style: String,
    #[serde(default)]
    pub color_palette: Vec<String>,
    #[serde(default)]
    pub keywords: Vec<String>,
    #[serde(default)]
    pub expanded_keywords: ExpandedKeywords,
    #[serde(default)]
    pub audience_pain_points: Vec<String>,
    #[serde(default)]
    pub cta_tone: String,
}

impl NicheAnalysis {
    /// An analysis is usable when it names a niche or yields at least one keyword.
    #[must_use]
    pub fn is_usable(&self) -> bool {
        !self.niche.trim().is_empty() || self.keywords.iter().any(|k| !k.trim().is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_camel_case_payload() {
        let json = r##"{
            "niche": "luxury pet accessories",
            "visualStyle": "soft pastel editorial",
            "colorPalette": ["#FFC0CB", "#111111"],
            "keywords": ["cat collars", "pet hacks"],
            "expandedKeywords": {
                "longTail": ["designer cat collar with bell"],
                "midTail": ["cat collar"],
                "buyingIntent": ["buy cat collar"]
            },
            "audiencePainPoints": ["cats hate collars"],
            "ctaTone": "playful"
        }"##;
        let analysis: NicheAnalysis = serde_json::from_str(json).unwrap();
        assert_eq!(analysis.color_palette.len(), 2);
        assert_eq!(analysis.expanded_keywords.buying_intent, vec!["buy cat collar"]);
        assert!(analysis.is_usable());
    }

    #[test]
    fn empty_analysis_is_not_usable() {
        let analysis = NicheAnalysis::default();
        assert!(!analysis.is_usable());
    }
}
