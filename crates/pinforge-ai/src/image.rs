//! Hero image generation with tiered model fallback.

use pinforge_core::{LayoutType, VisualStyle};
use serde_json::{json, Value};

use crate::client::GeminiClient;
use crate::error::AiError;
use crate::prompts;

/// Output size requested from the primary image model.
const PRIMARY_IMAGE_SIZE: &str = "2K";

/// Generation config for an image request. Only the pro tier accepts an
/// explicit `imageSize`.
pub(crate) fn image_generation_config(size: Option<&str>) -> Value {
    let mut image_config = json!({ "aspectRatio": "9:16" });
    if let Some(size) = size {
        image_config["imageSize"] = Value::from(size);
    }
    json!({
        "responseModalities": ["IMAGE"],
        "imageConfig": image_config,
    })
}

impl GeminiClient {
    /// Try the primary model, then the fallback model, then the configured
    /// placeholder.
    ///
    /// Auth failures abort the chain immediately. Any other failure moves on
    /// to the next tier.
    pub(crate) async fn generate_image_tiered(
        &self,
        subject: &str,
        layout: LayoutType,
        style: VisualStyle,
    ) -> Result<String, AiError> {
        let prompt = prompts::image_prompt(subject, style);

        let tiers = [
            (self.config.image_model.as_str(), Some(PRIMARY_IMAGE_SIZE)),
            (self.config.image_fallback_model.as_str(), None),
        ];

        for (model, size) in tiers {
            match self.try_image_model(model, &prompt, size).await {
                Ok(Some(url)) => {
                    tracing::debug!(model, ?layout, "hero image generated");
                    return Ok(url);
                }
                Ok(None) => {
                    tracing::warn!(model, "image model returned no inline image");
                }
                Err(e) if e.is_auth() => return Err(e),
                Err(e) => {
                    tracing::warn!(model, error = %e, "image model failed; trying next tier");
                }
            }
        }

        match &self.config.placeholder_image_url {
            Some(url) => {
                tracing::warn!("all image tiers failed; using placeholder image");
                Ok(url.clone())
            }
            None => Err(AiError::ImageUnavailable),
        }
    }

    async fn try_image_model(
        &self,
        model: &str,
        prompt: &str,
        size: Option<&str>,
    ) -> Result<Option<String>, AiError> {
        let response = self
            .generate_content(model, prompt, image_generation_config(size))
            .await?;
        Ok(response.image_data_url())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pro_tier_requests_explicit_size() {
        let config = image_generation_config(Some(PRIMARY_IMAGE_SIZE));
        assert_eq!(config["imageConfig"]["imageSize"], "2K");
        assert_eq!(config["imageConfig"]["aspectRatio"], "9:16");
        assert_eq!(config["responseModalities"][0], "IMAGE");
    }

    #[test]
    fn fallback_tier_omits_size() {
        let config = image_generation_config(None);
        assert!(config["imageConfig"].get("imageSize").is_none());
    }
}
