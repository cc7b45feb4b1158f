use thiserror::Error;

#[derive(Debug, Error)]
pub enum PlatformError {
    /// Token missing, expired or rejected. The user must reconnect.
    #[error("Pinterest authorization required: {0}")]
    AuthRequired(String),

    /// Both the direct request and the proxy fallback failed.
    #[error("connection failed: {0}")]
    NetworkFailure(String),

    #[error("OAuth state did not match the pending authorization")]
    StateMismatch,

    #[error("Pinterest API error {status}: {message}")]
    Api { status: u16, message: String },

    #[error("missing configuration: {0}")]
    MissingConfig(&'static str),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON deserialization error for {context}: {source}")]
    Deserialize {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("XML parse error: {0}")]
    Xml(#[from] quick_xml::Error),

    #[error(transparent)]
    Store(#[from] pinforge_store::StoreError),
}

impl PlatformError {
    #[must_use]
    pub fn is_auth(&self) -> bool {
        matches!(self, PlatformError::AuthRequired(_))
    }
}
