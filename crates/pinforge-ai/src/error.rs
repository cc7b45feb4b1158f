use thiserror::Error;

/// Errors returned by the generative-AI collaborator.
#[derive(Debug, Error)]
pub enum AiError {
    /// Missing, invalid or revoked credential. The user must re-authenticate.
    #[error("AI credential rejected or missing: {0}")]
    AuthRequired(String),

    #[error("niche analysis failed: {0}")]
    AnalysisFailed(String),

    #[error("strategy generation failed: {0}")]
    StrategyFailed(String),

    /// Every image tier failed and no placeholder is configured.
    #[error("no image could be generated")]
    ImageUnavailable,

    #[error("video generation failed: {0}")]
    VideoFailed(String),

    #[error("video generation did not finish within {waited_secs}s")]
    VideoTimedOut { waited_secs: u64 },

    #[error("invalid AI base URL '{0}'")]
    InvalidBaseUrl(String),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("AI API returned status {status}: {body}")]
    UnexpectedStatus { status: u16, body: String },

    #[error("JSON deserialization error for {context}: {source}")]
    Deserialize {
        context: String,
        #[source]
        source: serde_json::Error,
    },
}

impl AiError {
    #[must_use]
    pub fn is_auth(&self) -> bool {
        matches!(self, AiError::AuthRequired(_))
    }
}

/// Error-message fragments that mean the key is invalid or lacks access.
const AUTH_MARKERS: [&str; 3] = [
    "API_KEY_INVALID",
    "permission denied",
    "Requested entity was not found",
];

/// Map a non-success response to an [`AiError`], detecting auth failures by
/// status and by message content.
pub(crate) fn classify_status(status: u16, body: &str) -> AiError {
    let lowered = body.to_lowercase();
    let auth_marker = AUTH_MARKERS
        .iter()
        .any(|m| lowered.contains(&m.to_lowercase()));
    if status == 401 || status == 403 || auth_marker {
        return AiError::AuthRequired(truncate(body, 200));
    }
    AiError::UnexpectedStatus {
        status,
        body: truncate(body, 500),
    }
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        return s.to_string();
    }
    let mut out: String = s.chars().take(max).collect();
    out.push('…');
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_401_and_403_are_auth() {
        assert!(classify_status(401, "").is_auth());
        assert!(classify_status(403, "nope").is_auth());
    }

    #[test]
    fn auth_markers_in_body_are_auth() {
        let body = r#"{"error":{"code":400,"message":"API key not valid.","status":"INVALID_ARGUMENT","details":[{"reason":"API_KEY_INVALID"}]}}"#;
        assert!(classify_status(400, body).is_auth());
        assert!(classify_status(404, "Requested entity was not found.").is_auth());
        assert!(classify_status(500, "Permission denied on resource").is_auth());
    }

    #[test]
    fn other_failures_keep_status() {
        let err = classify_status(503, "overloaded");
        assert!(matches!(err, AiError::UnexpectedStatus { status: 503, .. }));
    }

    #[test]
    fn long_bodies_are_truncated() {
        let body = "x".repeat(2_000);
        match classify_status(500, &body) {
            AiError::UnexpectedStatus { body, .. } => assert_eq!(body.chars().count(), 501),
            other => panic!("unexpected {other:?}"),
        }
    }
}
