//! Generative-AI collaborator: niche analysis, pin strategies, hero images
//! and short videos, backed by the Gemini REST API.

pub mod client;
pub mod error;
mod image;
pub mod prompts;
pub mod schema;
pub mod service;
mod video;
mod wire;

pub use client::{GeminiClient, GeminiConfig};
pub use error::AiError;
pub use service::GenerativeAi;
