//! Short vertical video generation via a long-running operation.

use pinforge_core::{split_data_url, GeneratedPin, VisualStyle};
use reqwest::Url;
use serde_json::{json, Value};
use tokio::time::{sleep, Instant};

use crate::client::GeminiClient;
use crate::error::{classify_status, AiError};
use crate::prompts;
use crate::wire::Operation;

/// Request body for `predictLongRunning`. The pin image seeds the video only
/// when it is an inline data URL.
pub(crate) fn video_request(pin: &GeneratedPin, style: VisualStyle) -> Value {
    let mut instance = json!({ "prompt": prompts::video_prompt(pin, style) });
    if let Some((mime, data)) = split_data_url(&pin.image_url) {
        instance["image"] = json!({
            "bytesBase64Encoded": data,
            "mimeType": mime,
        });
    }
    json!({
        "instances": [instance],
        "parameters": {
            "aspectRatio": "9:16",
            "resolution": "720p",
        },
    })
}

fn parse_operation(value: Value) -> Result<Operation, AiError> {
    serde_json::from_value(value).map_err(|e| AiError::Deserialize {
        context: "video operation".to_string(),
        source: e,
    })
}

/// Turn an operation-level error into an [`AiError`], keeping auth failures
/// recognisable.
fn operation_failure(message: &str) -> AiError {
    match classify_status(200, message) {
        auth @ AiError::AuthRequired(_) => auth,
        _ => AiError::VideoFailed(message.to_string()),
    }
}

impl GeminiClient {
    pub(crate) async fn generate_video_bytes(
        &self,
        pin: &GeneratedPin,
        style: VisualStyle,
    ) -> Result<Vec<u8>, AiError> {
        let submit = self.endpoint(&format!(
            "models/{}:predictLongRunning",
            self.config.video_model
        ))?;
        let mut operation = parse_operation(self.post_json(submit, &video_request(pin, style)).await?)?;
        tracing::info!(operation = %operation.name, pin_id = %pin.id(), "video generation started");

        let started = Instant::now();
        while !operation.done {
            if started.elapsed() >= self.config.video_max_wait {
                return Err(AiError::VideoTimedOut {
                    waited_secs: self.config.video_max_wait.as_secs(),
                });
            }
            sleep(self.config.video_poll_interval).await;
            let poll = self.endpoint(&operation.name)?;
            operation = parse_operation(self.get_json(poll).await?)?;
            tracing::debug!(operation = %operation.name, done = operation.done, "polled video operation");
        }

        if let Some(error) = &operation.error {
            return Err(operation_failure(&error.message));
        }
        let uri = operation
            .video_uri()
            .ok_or_else(|| AiError::VideoFailed("operation finished without a video".to_string()))?;
        self.download_video(&uri).await
    }

    async fn download_video(&self, uri: &str) -> Result<Vec<u8>, AiError> {
        let key = self.api_key()?;
        let mut url = Url::parse(uri)
            .map_err(|e| AiError::VideoFailed(format!("invalid video uri '{uri}': {e}")))?;
        url.query_pairs_mut().append_pair("key", key);

        let response = self.client.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(classify_status(status.as_u16(), &body));
        }
        let bytes = response.bytes().await?;
        tracing::info!(bytes = bytes.len(), "video downloaded");
        Ok(bytes.to_vec())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pinforge_core::PinStrategy;

    fn pin_with_image(url: &str) -> GeneratedPin {
        let strategy: PinStrategy = serde_json::from_value(json!({
            "targetKeyword": "desk lamp",
            "headline": "Your desk is crying",
        }))
        .unwrap();
        let mut pin = GeneratedPin::pending(strategy);
        pin.complete(url.to_string());
        pin
    }

    #[test]
    fn data_url_image_seeds_request() {
        let body = video_request(&pin_with_image("data:image/png;base64,QUJD"), VisualStyle::Modern);
        let instance = &body["instances"][0];
        assert_eq!(instance["image"]["mimeType"], "image/png");
        assert_eq!(instance["image"]["bytesBase64Encoded"], "QUJD");
        assert!(instance["prompt"].as_str().unwrap().contains("desk lamp"));
        assert_eq!(body["parameters"]["resolution"], "720p");
    }

    #[test]
    fn remote_image_is_not_sent() {
        let body = video_request(&pin_with_image("https://cdn.example/a.png"), VisualStyle::Modern);
        assert!(body["instances"][0].get("image").is_none());
    }

    #[test]
    fn operation_errors_keep_auth_class() {
        assert!(operation_failure("Requested entity was not found.").is_auth());
        assert!(matches!(
            operation_failure("quota exceeded"),
            AiError::VideoFailed(_)
        ));
    }
}
