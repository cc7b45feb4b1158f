//! Shared data model and configuration for pinforge.

pub mod analysis;
pub mod app_config;
pub mod config;
pub mod data_url;
pub mod feed;
pub mod input;
pub mod pin;
pub mod project;

use thiserror::Error;

pub use analysis::{ExpandedKeywords, NicheAnalysis};
pub use app_config::{AppConfig, Environment};
pub use config::{load_app_config, load_app_config_from_env};
pub use data_url::split_data_url;
pub use feed::FeedItem;
pub use input::{
    HumorLevel, ImperfectionIntensity, ImperfectionType, ProductInput, SourceType, VisualStyle,
    MAX_PIN_COUNT,
};
pub use pin::{
    EngagementStyle, FontPairing, GeneratedPin, LayoutType, MarketingAngle, PinStatus,
    PinStrategy, ViralAudit,
};
pub use project::Project;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },
}

/// Rejections raised while validating user input before a batch starts.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InputError {
    #[error("a product name or at least one manual keyword is required")]
    MissingSubject,

    #[error("no feed items loaded; fetch the feed before generating")]
    EmptyFeed,

    #[error("pin count {0} is outside 1..={MAX_PIN_COUNT}")]
    PinCountOutOfRange(u32),

    #[error("imperfection intensity {0} is outside 0..=5")]
    IntensityOutOfRange(u8),
}
