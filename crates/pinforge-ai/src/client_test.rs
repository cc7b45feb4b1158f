use super::*;

fn test_client(base_url: &str, key: Option<&str>) -> GeminiClient {
    GeminiClient::with_base_url(GeminiConfig::new(key.map(str::to_string)), base_url)
        .expect("client construction should not fail")
}

#[test]
fn endpoint_joins_model_paths() {
    let client = test_client("https://generativelanguage.googleapis.com/v1beta", Some("k"));
    let url = client
        .endpoint("models/gemini-3-pro-preview:generateContent")
        .unwrap();
    assert_eq!(
        url.as_str(),
        "https://generativelanguage.googleapis.com/v1beta/models/gemini-3-pro-preview:generateContent"
    );
}

#[test]
fn endpoint_tolerates_trailing_slash_on_base() {
    let client = test_client("http://127.0.0.1:9999/", Some("k"));
    let url = client.endpoint("/models/veo/operations/abc").unwrap();
    assert_eq!(url.as_str(), "http://127.0.0.1:9999/models/veo/operations/abc");
}

#[test]
fn has_credential_reflects_key() {
    assert!(test_client("http://localhost", Some("k")).has_credential());
    assert!(!test_client("http://localhost", None).has_credential());
    assert!(!test_client("http://localhost", Some("  ")).has_credential());
}

#[test]
fn missing_key_is_auth_required() {
    let client = test_client("http://localhost", None);
    assert!(client.api_key().unwrap_err().is_auth());
}

#[test]
fn invalid_base_url_is_rejected() {
    let result = GeminiClient::with_base_url(GeminiConfig::new(None), "not a url");
    assert!(matches!(result, Err(AiError::InvalidBaseUrl(_))));
}

#[test]
fn debug_redacts_key() {
    let rendered = format!("{:?}", GeminiConfig::new(Some("sk-secret".to_string())));
    assert!(!rendered.contains("sk-secret"));
}
