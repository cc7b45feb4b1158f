use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Environment {
    Development,
    Test,
    Production,
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Environment::Development => write!(f, "development"),
            Environment::Test => write!(f, "test"),
            Environment::Production => write!(f, "production"),
        }
    }
}

#[derive(Clone)]
pub struct AppConfig {
    pub env: Environment,
    pub log_level: String,
    pub data_dir: PathBuf,
    pub gemini_api_key: Option<String>,
    pub ai_base_url: String,
    pub ai_analysis_model: String,
    pub ai_strategy_model: String,
    pub ai_image_model: String,
    pub ai_image_fallback_model: String,
    pub ai_video_model: String,
    pub ai_timeout_secs: u64,
    /// Static image used when every image tier fails. `None` disables the
    /// last-resort fallback so the pin is marked failed instead.
    pub placeholder_image_url: Option<String>,
    pub video_poll_interval_secs: u64,
    pub video_max_wait_secs: u64,
    pub pinterest_app_id: String,
    pub pinterest_client_secret: Option<String>,
    pub pinterest_redirect_uri: String,
    pub pinterest_api_base: String,
    pub pinterest_oauth_base: String,
    pub proxy_base: String,
    pub http_timeout_secs: u64,
    pub default_destination_url: String,
    pub export_pixel_ratio: f32,
}

impl AppConfig {
    /// Directory where generated videos are written.
    #[must_use]
    pub fn media_dir(&self) -> PathBuf {
        self.data_dir.join("media")
    }
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("env", &self.env)
            .field("log_level", &self.log_level)
            .field("data_dir", &self.data_dir)
            .field(
                "gemini_api_key",
                &self.gemini_api_key.as_ref().map(|_| "[redacted]"),
            )
            .field("ai_base_url", &self.ai_base_url)
            .field("ai_analysis_model", &self.ai_analysis_model)
            .field("ai_strategy_model", &self.ai_strategy_model)
            .field("ai_image_model", &self.ai_image_model)
            .field("ai_image_fallback_model", &self.ai_image_fallback_model)
            .field("ai_video_model", &self.ai_video_model)
            .field("ai_timeout_secs", &self.ai_timeout_secs)
            .field("placeholder_image_url", &self.placeholder_image_url)
            .field("video_poll_interval_secs", &self.video_poll_interval_secs)
            .field("video_max_wait_secs", &self.video_max_wait_secs)
            .field("pinterest_app_id", &self.pinterest_app_id)
            .field(
                "pinterest_client_secret",
                &self.pinterest_client_secret.as_ref().map(|_| "[redacted]"),
            )
            .field("pinterest_redirect_uri", &self.pinterest_redirect_uri)
            .field("pinterest_api_base", &self.pinterest_api_base)
            .field("pinterest_oauth_base", &self.pinterest_oauth_base)
            .field("proxy_base", &self.proxy_base)
            .field("http_timeout_secs", &self.http_timeout_secs)
            .field("default_destination_url", &self.default_destination_url)
            .field("export_pixel_ratio", &self.export_pixel_ratio)
            .finish()
    }
}
