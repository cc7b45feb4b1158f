//! Response shapes for the Gemini REST API. Only the fields we read.

use serde::Deserialize;

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct GenerateContentResponse {
    #[serde(default)]
    pub candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct Candidate {
    #[serde(default)]
    pub content: Option<Content>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct Content {
    #[serde(default)]
    pub parts: Vec<Part>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct Part {
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub inline_data: Option<InlineData>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct InlineData {
    #[serde(default)]
    pub mime_type: Option<String>,
    pub data: String,
}

impl GenerateContentResponse {
    fn parts(&self) -> impl Iterator<Item = &Part> {
        self.candidates
            .first()
            .and_then(|c| c.content.as_ref())
            .into_iter()
            .flat_map(|c| c.parts.iter())
    }

    /// Concatenated text parts of the first candidate, if any.
    pub fn text(&self) -> Option<String> {
        let text: String = self.parts().filter_map(|p| p.text.as_deref()).collect();
        if text.trim().is_empty() {
            None
        } else {
            Some(text)
        }
    }

    /// First inline image of the first candidate, as a data URL.
    pub fn image_data_url(&self) -> Option<String> {
        self.parts().find_map(|p| {
            p.inline_data.as_ref().map(|d| {
                format!(
                    "data:{};base64,{}",
                    d.mime_type.as_deref().unwrap_or("image/png"),
                    d.data
                )
            })
        })
    }
}

/// Long-running operation envelope returned by `predictLongRunning` and polling.
#[derive(Debug, Deserialize)]
pub(crate) struct Operation {
    pub name: String,
    #[serde(default)]
    pub done: bool,
    #[serde(default)]
    pub error: Option<OperationError>,
    #[serde(default)]
    pub response: Option<serde_json::Value>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct OperationError {
    #[serde(default)]
    pub message: String,
}

impl Operation {
    /// Download URI of the first generated video.
    ///
    /// Accepts both the REST shape (`generateVideoResponse.generatedSamples`)
    /// and the SDK shape (`generatedVideos`).
    pub fn video_uri(&self) -> Option<String> {
        let response = self.response.as_ref()?;
        let samples = response
            .pointer("/generateVideoResponse/generatedSamples")
            .or_else(|| response.pointer("/generatedVideos"))?;
        samples
            .get(0)?
            .pointer("/video/uri")?
            .as_str()
            .map(str::to_string)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn text_joins_parts() {
        let resp: GenerateContentResponse = serde_json::from_value(serde_json::json!({
            "candidates": [{ "content": { "parts": [{ "text": "[{" }, { "text": "}]" }] } }]
        }))
        .unwrap();
        assert_eq!(resp.text().as_deref(), Some("[{}]"));
    }

    #[test]
    fn empty_response_has_no_text_or_image() {
        let resp: GenerateContentResponse = serde_json::from_str("{}").unwrap();
        assert!(resp.text().is_none());
        assert!(resp.image_data_url().is_none());
    }

    #[test]
    fn inline_data_becomes_data_url() {
        let resp: GenerateContentResponse = serde_json::from_value(serde_json::json!({
            "candidates": [{ "content": { "parts": [
                { "text": "here you go" },
                { "inlineData": { "mimeType": "image/jpeg", "data": "QUJD" } }
            ] } }]
        }))
        .unwrap();
        assert_eq!(
            resp.image_data_url().as_deref(),
            Some("data:image/jpeg;base64,QUJD")
        );
    }

    #[test]
    fn operation_video_uri_both_shapes() {
        let rest: Operation = serde_json::from_value(serde_json::json!({
            "name": "ops/1", "done": true,
            "response": { "generateVideoResponse": { "generatedSamples": [
                { "video": { "uri": "https://files.example/v1?alt=media" } }
            ] } }
        }))
        .unwrap();
        assert_eq!(
            rest.video_uri().as_deref(),
            Some("https://files.example/v1?alt=media")
        );

        let sdk: Operation = serde_json::from_value(serde_json::json!({
            "name": "ops/2", "done": true,
            "response": { "generatedVideos": [{ "video": { "uri": "u" } }] }
        }))
        .unwrap();
        assert_eq!(sdk.video_uri().as_deref(), Some("u"));
    }
}
