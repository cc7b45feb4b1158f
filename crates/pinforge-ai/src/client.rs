//! HTTP client for the Gemini REST API.
//!
//! Structured-output calls (`generateContent` with a response schema) back
//! analysis and strategy generation; image and video generation live in
//! [`crate::image`] and [`crate::video`].

use std::time::Duration;

use async_trait::async_trait;
use pinforge_core::{
    AppConfig, GeneratedPin, HumorLevel, ImperfectionType, LayoutType, NicheAnalysis,
    PinStrategy, ProductInput, VisualStyle,
};
use reqwest::{Client, Url};
use serde_json::{json, Value};

use crate::error::{classify_status, AiError};
use crate::service::GenerativeAi;
use crate::wire::GenerateContentResponse;
use crate::{prompts, schema};

const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Model names and tunables for [`GeminiClient`].
#[derive(Clone)]
pub struct GeminiConfig {
    pub api_key: Option<String>,
    pub base_url: String,
    pub analysis_model: String,
    pub strategy_model: String,
    pub image_model: String,
    pub image_fallback_model: String,
    pub video_model: String,
    pub timeout: Duration,
    pub placeholder_image_url: Option<String>,
    pub video_poll_interval: Duration,
    pub video_max_wait: Duration,
}

impl std::fmt::Debug for GeminiConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeminiConfig")
            .field("api_key", &self.api_key.as_ref().map(|_| "[redacted]"))
            .field("base_url", &self.base_url)
            .field("image_model", &self.image_model)
            .field("video_model", &self.video_model)
            .finish_non_exhaustive()
    }
}

impl GeminiConfig {
    /// Defaults matching the production API, with the given key.
    #[must_use]
    pub fn new(api_key: Option<String>) -> Self {
        Self {
            api_key,
            base_url: DEFAULT_BASE_URL.to_string(),
            analysis_model: "gemini-3-flash-preview".to_string(),
            strategy_model: "gemini-3-pro-preview".to_string(),
            image_model: "gemini-3-pro-image-preview".to_string(),
            image_fallback_model: "gemini-2.5-flash-image".to_string(),
            video_model: "veo-3.1-fast-generate-preview".to_string(),
            timeout: Duration::from_secs(120),
            placeholder_image_url: None,
            video_poll_interval: Duration::from_secs(10),
            video_max_wait: Duration::from_secs(600),
        }
    }

    #[must_use]
    pub fn from_app_config(config: &AppConfig) -> Self {
        Self {
            api_key: config.gemini_api_key.clone(),
            base_url: config.ai_base_url.clone(),
            analysis_model: config.ai_analysis_model.clone(),
            strategy_model: config.ai_strategy_model.clone(),
            image_model: config.ai_image_model.clone(),
            image_fallback_model: config.ai_image_fallback_model.clone(),
            video_model: config.ai_video_model.clone(),
            timeout: Duration::from_secs(config.ai_timeout_secs),
            placeholder_image_url: config.placeholder_image_url.clone(),
            video_poll_interval: Duration::from_secs(config.video_poll_interval_secs),
            video_max_wait: Duration::from_secs(config.video_max_wait_secs),
        }
    }
}

/// Client for the Gemini `generativelanguage` REST API.
pub struct GeminiClient {
    pub(crate) client: Client,
    pub(crate) config: GeminiConfig,
    pub(crate) base_url: Url,
}

impl GeminiClient {
    /// # Errors
    ///
    /// Returns [`AiError::Http`] if the `reqwest::Client` cannot be built, or
    /// [`AiError::InvalidBaseUrl`] if the configured base URL does not parse.
    pub fn new(config: GeminiConfig) -> Result<Self, AiError> {
        let client = Client::builder()
            .timeout(config.timeout)
            .connect_timeout(Duration::from_secs(10))
            .user_agent("pinforge/0.1")
            .build()?;

        let normalised = format!("{}/", config.base_url.trim_end_matches('/'));
        let base_url =
            Url::parse(&normalised).map_err(|e| AiError::InvalidBaseUrl(format!("{normalised}: {e}")))?;

        Ok(Self {
            client,
            config,
            base_url,
        })
    }

    /// Same as [`GeminiClient::new`] but pointed at `base_url` (for wiremock).
    ///
    /// # Errors
    ///
    /// See [`GeminiClient::new`].
    pub fn with_base_url(mut config: GeminiConfig, base_url: &str) -> Result<Self, AiError> {
        base_url.clone_into(&mut config.base_url);
        Self::new(config)
    }

    pub(crate) fn api_key(&self) -> Result<&str, AiError> {
        self.config
            .api_key
            .as_deref()
            .ok_or_else(|| AiError::AuthRequired("GEMINI_API_KEY is not set".to_string()))
    }

    /// Resolve a path relative to the API base, e.g. `models/x:generateContent`.
    pub(crate) fn endpoint(&self, path: &str) -> Result<Url, AiError> {
        self.base_url
            .join(path.trim_start_matches('/'))
            .map_err(|e| AiError::InvalidBaseUrl(format!("{path}: {e}")))
    }

    /// POST JSON and return the parsed JSON body, classifying failures.
    pub(crate) async fn post_json(&self, url: Url, body: &Value) -> Result<Value, AiError> {
        let key = self.api_key()?;
        let response = self
            .client
            .post(url.clone())
            .header("x-goog-api-key", key)
            .json(body)
            .send()
            .await?;
        Self::read_json(url, response).await
    }

    pub(crate) async fn get_json(&self, url: Url) -> Result<Value, AiError> {
        let key = self.api_key()?;
        let response = self
            .client
            .get(url.clone())
            .header("x-goog-api-key", key)
            .send()
            .await?;
        Self::read_json(url, response).await
    }

    async fn read_json(url: Url, response: reqwest::Response) -> Result<Value, AiError> {
        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            return Err(classify_status(status.as_u16(), &body));
        }
        serde_json::from_str(&body).map_err(|e| AiError::Deserialize {
            context: url.path().to_string(),
            source: e,
        })
    }

    /// Call `generateContent` on `model`.
    pub(crate) async fn generate_content(
        &self,
        model: &str,
        prompt: &str,
        generation_config: Value,
    ) -> Result<GenerateContentResponse, AiError> {
        let url = self.endpoint(&format!("models/{model}:generateContent"))?;
        let body = json!({
            "contents": [{ "parts": [{ "text": prompt }] }],
            "generationConfig": generation_config,
        });
        let value = self.post_json(url, &body).await?;
        serde_json::from_value(value).map_err(|e| AiError::Deserialize {
            context: format!("generateContent({model})"),
            source: e,
        })
    }

    fn structured(schema: Value) -> Value {
        json!({
            "responseMimeType": "application/json",
            "responseSchema": schema,
        })
    }
}

#[async_trait]
impl GenerativeAi for GeminiClient {
    fn has_credential(&self) -> bool {
        self.config
            .api_key
            .as_deref()
            .is_some_and(|k| !k.trim().is_empty())
    }

    async fn analyze(&self, input: &ProductInput) -> Result<NicheAnalysis, AiError> {
        let prompt = prompts::analysis_prompt(input);
        let response = self
            .generate_content(
                &self.config.analysis_model,
                &prompt,
                Self::structured(schema::analysis_schema()),
            )
            .await?;

        let text = response
            .text()
            .ok_or_else(|| AiError::AnalysisFailed("empty response".to_string()))?;
        let analysis: NicheAnalysis = serde_json::from_str(&text)
            .map_err(|e| AiError::AnalysisFailed(format!("malformed analysis: {e}")))?;
        if !analysis.is_usable() {
            return Err(AiError::AnalysisFailed(
                "analysis has no niche or keywords".to_string(),
            ));
        }
        tracing::debug!(niche = %analysis.niche, keywords = analysis.keywords.len(), "niche analysis received");
        Ok(analysis)
    }

    async fn generate_strategies(
        &self,
        _analysis: &NicheAnalysis,
        count: usize,
        humor: HumorLevel,
        keywords: &[String],
        imperfection: ImperfectionType,
    ) -> Result<Vec<PinStrategy>, AiError> {
        let prompt = prompts::strategy_prompt(count, humor, keywords, imperfection);
        let response = self
            .generate_content(
                &self.config.strategy_model,
                &prompt,
                Self::structured(schema::strategy_schema()),
            )
            .await?;

        let text = response
            .text()
            .ok_or_else(|| AiError::StrategyFailed("empty response".to_string()))?;
        let strategies = parse_strategies(&text)
            .map_err(|e| AiError::StrategyFailed(format!("malformed strategies: {e}")))?;

        let usable: Vec<PinStrategy> = strategies
            .into_iter()
            .filter(PinStrategy::is_usable)
            .map(|mut s| {
                s.imperfection_type = imperfection;
                s
            })
            .collect();
        if usable.is_empty() {
            return Err(AiError::StrategyFailed(
                "no usable strategies in response".to_string(),
            ));
        }
        Ok(usable)
    }

    async fn generate_image(
        &self,
        prompt: &str,
        layout: LayoutType,
        style: VisualStyle,
    ) -> Result<String, AiError> {
        self.generate_image_tiered(prompt, layout, style).await
    }

    async fn generate_video(
        &self,
        pin: &GeneratedPin,
        style: VisualStyle,
    ) -> Result<Vec<u8>, AiError> {
        self.generate_video_bytes(pin, style).await
    }
}

/// Decode a strategy array. Any `id` the model echoes is discarded so every
/// strategy gets a freshly minted one.
fn parse_strategies(text: &str) -> Result<Vec<PinStrategy>, serde_json::Error> {
    let raw: Vec<serde_json::Value> = serde_json::from_str(text)?;
    raw.into_iter()
        .map(|mut value| {
            if let Some(object) = value.as_object_mut() {
                object.remove("id");
            }
            serde_json::from_value(value)
        })
        .collect()
}

#[cfg(test)]
#[path = "client_test.rs"]
mod tests;
