//! Structured-output schemas for `generateContent`.

use serde_json::{json, Value};

fn string_array() -> Value {
    json!({ "type": "ARRAY", "items": { "type": "STRING" } })
}

#[must_use]
pub fn analysis_schema() -> Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "niche": { "type": "STRING" },
            "visualStyle": { "type": "STRING" },
            "colorPalette": string_array(),
            "keywords": string_array(),
            "expandedKeywords": {
                "type": "OBJECT",
                "properties": {
                    "longTail": string_array(),
                    "midTail": string_array(),
                    "buyingIntent": string_array(),
                },
                "required": ["longTail", "midTail", "buyingIntent"],
            },
            "audiencePainPoints": string_array(),
            "ctaTone": { "type": "STRING" },
        },
        "required": [
            "niche", "visualStyle", "colorPalette", "keywords",
            "expandedKeywords", "audiencePainPoints", "ctaTone",
        ],
    })
}

#[must_use]
pub fn strategy_schema() -> Value {
    json!({
        "type": "ARRAY",
        "items": {
            "type": "OBJECT",
            "properties": {
                "targetKeyword": { "type": "STRING" },
                "headline": { "type": "STRING" },
                "subheadline": { "type": "STRING" },
                "cta": { "type": "STRING" },
                "imagePrompt": { "type": "STRING" },
                "layout": { "type": "STRING" },
                "engagementStyle": { "type": "STRING" },
                "primaryColor": { "type": "STRING" },
                "secondaryColor": { "type": "STRING" },
                "fontPairing": { "type": "STRING" },
                "marketingAngle": { "type": "STRING" },
                "imperfectionLevel": { "type": "NUMBER" },
                "viralExpert": {
                    "type": "OBJECT",
                    "properties": {
                        "viralScore": { "type": "NUMBER" },
                        "critique": { "type": "STRING" },
                        "hookImprovement": { "type": "STRING" },
                        "seoStrength": { "type": "NUMBER" },
                    },
                    "required": ["viralScore", "critique", "hookImprovement", "seoStrength"],
                },
            },
            "required": [
                "targetKeyword", "headline", "subheadline", "cta", "imagePrompt", "layout",
                "engagementStyle", "primaryColor", "secondaryColor", "fontPairing",
                "marketingAngle", "imperfectionLevel", "viralExpert",
            ],
        },
    })
}
