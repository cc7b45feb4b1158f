use async_trait::async_trait;
use pinforge_core::{
    GeneratedPin, HumorLevel, ImperfectionType, LayoutType, NicheAnalysis, PinStrategy,
    ProductInput, VisualStyle,
};

use crate::AiError;

/// The generative-AI operations the pipeline depends on.
///
/// Auth-class failures must surface as [`AiError::AuthRequired`] so callers
/// can stop a batch and prompt for a new key.
#[async_trait]
pub trait GenerativeAi: Send + Sync {
    /// Whether a credential is configured. Checked before any network call.
    fn has_credential(&self) -> bool;

    async fn analyze(&self, input: &ProductInput) -> Result<NicheAnalysis, AiError>;

    /// Request up to `count` strategies for the given keywords. Every returned
    /// strategy carries `imperfection` as its imperfection type.
    async fn generate_strategies(
        &self,
        analysis: &NicheAnalysis,
        count: usize,
        humor: HumorLevel,
        keywords: &[String],
        imperfection: ImperfectionType,
    ) -> Result<Vec<PinStrategy>, AiError>;

    /// Produce a hero image reference (data URL or http URL).
    async fn generate_image(
        &self,
        prompt: &str,
        layout: LayoutType,
        style: VisualStyle,
    ) -> Result<String, AiError>;

    /// Produce a short vertical video for a pin and return the encoded bytes.
    async fn generate_video(&self, pin: &GeneratedPin, style: VisualStyle)
        -> Result<Vec<u8>, AiError>;
}
