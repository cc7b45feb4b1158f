use pinforge_ai::AiError;
use pinforge_core::InputError;
use pinforge_platform::PlatformError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("invalid batch input: {0}")]
    ValidationFailed(#[from] InputError),

    /// A collaborator rejected its credential. Callers should prompt the user
    /// to reconnect before retrying.
    #[error("authorization required: {0}")]
    AuthRequired(String),

    #[error("niche analysis failed: {0}")]
    AnalysisFailed(String),

    #[error("not found: {0}")]
    NotFound(String),

    #[error(transparent)]
    Store(#[from] pinforge_store::StoreError),

    #[error(transparent)]
    Render(#[from] pinforge_render::RenderError),

    #[error("io error for {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("unusable media reference: {0}")]
    InvalidMedia(String),

    #[error("zip error: {0}")]
    Zip(#[from] zip::result::ZipError),

    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),

    #[error(transparent)]
    Ai(AiError),

    #[error(transparent)]
    Platform(PlatformError),
}

impl PipelineError {
    #[must_use]
    pub fn is_auth(&self) -> bool {
        matches!(self, PipelineError::AuthRequired(_))
    }
}

impl From<AiError> for PipelineError {
    fn from(e: AiError) -> Self {
        if e.is_auth() {
            PipelineError::AuthRequired(e.to_string())
        } else {
            PipelineError::Ai(e)
        }
    }
}

impl From<PlatformError> for PipelineError {
    fn from(e: PlatformError) -> Self {
        if e.is_auth() {
            PipelineError::AuthRequired(e.to_string())
        } else {
            PipelineError::Platform(e)
        }
    }
}
