//! Prompt text sent to the model.

use pinforge_core::{GeneratedPin, HumorLevel, ImperfectionType, ProductInput, VisualStyle};

fn tone_directive(humor: HumorLevel) -> &'static str {
    match humor {
        HumorLevel::Unhinged => "Completely unhinged, dramatic, and hilariously relatable.",
        HumorLevel::Sarcastic => "Dry, witty, and slightly savage.",
        HumorLevel::Friendly => "Friendly, supportive, and helpful.",
    }
}

fn persona(humor: HumorLevel) -> &'static str {
    match humor {
        HumorLevel::Unhinged => {
            "YOU ARE AN UNHINGED FEMALE MARKETING SAVANT. Use humor like \"I'm literally just a girl,\" \
             \"Me thinking I have money,\" or \"POV: You're making a chaotic decision.\" \
             Be over-the-top, slightly dramatic, and loud."
        }
        HumorLevel::Sarcastic => {
            "YOU ARE A DRY, WITTY SAVANT. Use sarcasm to point out why the user 'needs' this to fix \
             their life. Be dry, judgmental but in a funny way, and sophisticatedly savage."
        }
        HumorLevel::Friendly => {
            "YOU ARE A HELPFUL BESTIE. Be wholesome, supportive, and use soft puns. Focus on genuine \
             benefits and aesthetic inspiration."
        }
    }
}

#[must_use]
pub fn analysis_prompt(input: &ProductInput) -> String {
    let keywords = input.manual_keyword_list();
    let keywords = if keywords.is_empty() {
        "None".to_string()
    } else {
        keywords.join(", ")
    };
    let voice = input
        .brand_voice
        .as_deref()
        .filter(|v| !v.trim().is_empty())
        .map(|v| format!("\nBRAND VOICE: {v}."))
        .unwrap_or_default();
    let audience = input
        .target_demographic
        .as_deref()
        .filter(|v| !v.trim().is_empty())
        .map(|v| format!("\nTARGET DEMOGRAPHIC: {v}."))
        .unwrap_or_default();

    format!(
        "Deep Analysis of Brand/Product: \"{subject}\".\n\
         Keywords: {keywords}.{voice}{audience}\n\n\
         TASK: Identify the \"Pattern Interrupt\" factor for this brand on Pinterest.\n\
         CORE FOCUS: Target female users who are tired of being sold to.\n\
         TONE DIRECTIVE: {tone}\n\
         Use deep emotional triggers like \"Validation through overconsumption,\" \"Sarcastic Empowerment,\" and \"Relatable Chaos.\"\n\
         Identify raw emotional triggers and define a color palette that is high-contrast, trendy \
         (gen-z/millennial female aesthetic), and attention-grabbing.",
        subject = input.url_or_name.trim(),
        tone = tone_directive(input.humor_level),
    )
}

#[must_use]
pub fn strategy_prompt(
    count: usize,
    humor: HumorLevel,
    keywords: &[String],
    imperfection: ImperfectionType,
) -> String {
    let keyword_list = serde_json::to_string(keywords).unwrap_or_else(|_| "[]".to_string());
    format!(
        "{persona}\n\
         GENERATE {count} ARRESTING PIN STRATEGIES for: {keyword_list}.\n\n\
         TARGET: Millennial/Gen-Z women.\n\n\
         STYLE RULES:\n\
         - Headlines: Must match the {humor} tone. If unhinged, use caps or dramatic punctuation.\n\
         - Subheadlines: The \"too real\" inner monologue.\n\
         - CTAs: If unhinged, make them pushy but funny (e.g., \"Add to cart, it's cheaper than therapy\").\n\n\
         FOR EACH PIN, PROVIDE A \"viralExpert\" AUDIT:\n\
         - viralScore: 0-100.\n\
         - critique: Be a savage critic. Why is this pin mid?\n\
         - hookImprovement: A truly scroll-stopping alternative headline.\n\
         - seoStrength: Search intent matching.\n\n\
         IMPERFECTION SETTING: User selected \"{imperfection}\".\n\
         Set \"imperfectionLevel\" (0-10).\n\n\
         OUTPUT AS JSON ARRAY.",
        persona = persona(humor),
    )
}

#[must_use]
pub fn image_prompt(subject: &str, style: VisualStyle) -> String {
    format!(
        "A high-impact Pinterest hero image targeting a female aesthetic.\n\
         SUBJECT: {subject}.\n\
         STYLE: {style}, hyper-detailed, vibrant.\n\
         VIBE: High-quality editorial or \"Relatable Aesthetic Chaos\".\n\
         STRICT: No text, no logos."
    )
}

#[must_use]
pub fn video_prompt(pin: &GeneratedPin, style: VisualStyle) -> String {
    format!(
        "A dynamic promotional video for {keyword}.\n\
         Headline: {headline}.\n\
         Style: {style}, energetic social media aesthetic.",
        keyword = pin.strategy.target_keyword,
        headline = pin.strategy.headline,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn analysis_prompt_includes_subject_tone_and_keywords() {
        let input = ProductInput {
            url_or_name: "Designer Cat Collars".to_string(),
            manual_keywords: "cat collars\nkitty bling".to_string(),
            humor_level: HumorLevel::Sarcastic,
            ..ProductInput::default()
        };
        let prompt = analysis_prompt(&input);
        assert!(prompt.contains("\"Designer Cat Collars\""));
        assert!(prompt.contains("Keywords: cat collars, kitty bling."));
        assert!(prompt.contains("Dry, witty, and slightly savage."));
        assert!(prompt.contains("BRAND VOICE: Savage, Unhinged & Sarcastic."));
    }

    #[test]
    fn analysis_prompt_without_keywords_says_none() {
        let input = ProductInput {
            url_or_name: "x".to_string(),
            brand_voice: None,
            target_demographic: None,
            ..ProductInput::default()
        };
        let prompt = analysis_prompt(&input);
        assert!(prompt.contains("Keywords: None."));
        assert!(!prompt.contains("BRAND VOICE"));
    }

    #[test]
    fn strategy_prompt_lists_keywords_as_json() {
        let prompt = strategy_prompt(
            1,
            HumorLevel::Friendly,
            &["cat \"collars\"".to_string()],
            ImperfectionType::HandDrawn,
        );
        assert!(prompt.starts_with("YOU ARE A HELPFUL BESTIE."));
        assert!(prompt.contains("GENERATE 1 ARRESTING PIN STRATEGIES for: [\"cat \\\"collars\\\"\"]."));
        assert!(prompt.contains("User selected \"hand-drawn\"."));
        assert!(prompt.contains("match the friendly tone"));
    }

    #[test]
    fn image_prompt_names_style() {
        let prompt = image_prompt("a smug cat", VisualStyle::NeonNoir);
        assert!(prompt.contains("SUBJECT: a smug cat."));
        assert!(prompt.contains("STYLE: neon-noir, hyper-detailed"));
    }
}
