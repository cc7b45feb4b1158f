//! Pinterest v5 REST client: boards and pin creation.

use async_trait::async_trait;
use pinforge_core::{split_data_url, GeneratedPin};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::error::PlatformError;
use crate::transport::{read_json, FallbackTransport};

/// A board the connected account can publish to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Board {
    pub id: String,
    pub name: String,
    /// Absolute board URL on pinterest.com.
    pub url: String,
}

#[derive(Debug, Deserialize)]
struct BoardsPage {
    #[serde(default)]
    items: Option<Vec<RawBoard>>,
}

#[derive(Debug, Deserialize)]
struct RawBoard {
    id: String,
    name: String,
    #[serde(default)]
    url: Option<String>,
}

#[derive(Debug, Deserialize)]
struct CreatedPin {
    id: String,
}

/// Publishes one pin to a board. The publish loop depends on this seam.
#[async_trait]
pub trait PinPublisher: Send + Sync {
    /// Create `pin` on `board_id` and return the platform's pin id.
    async fn publish(
        &self,
        board_id: &str,
        pin: &GeneratedPin,
        link: Option<&str>,
    ) -> Result<String, PlatformError>;
}

pub struct PinterestClient {
    transport: FallbackTransport,
    api_base: String,
    token: String,
}

impl PinterestClient {
    #[must_use]
    pub fn new(transport: FallbackTransport, api_base: &str, token: impl Into<String>) -> Self {
        Self {
            transport,
            api_base: api_base.trim_end_matches('/').to_string(),
            token: token.into(),
        }
    }

    /// List up to 100 boards for the connected account.
    ///
    /// # Errors
    ///
    /// Returns [`PlatformError::AuthRequired`] on 401, [`PlatformError::Api`]
    /// for other failures, or [`PlatformError::NetworkFailure`].
    pub async fn list_boards(&self) -> Result<Vec<Board>, PlatformError> {
        let url = format!("{}/boards?page_size=100", self.api_base);
        let response = self
            .transport
            .send(&url, |client, target| {
                client.get(target).bearer_auth(&self.token)
            })
            .await?;
        let page: BoardsPage = read_json(response, "boards").await?;

        let boards: Vec<Board> = page
            .items
            .unwrap_or_default()
            .into_iter()
            .map(|b| Board {
                id: b.id,
                name: b.name,
                url: format!(
                    "https://www.pinterest.com{}",
                    b.url.as_deref().unwrap_or("/")
                ),
            })
            .collect();
        tracing::debug!(count = boards.len(), "fetched boards");
        Ok(boards)
    }

    /// Create a pin from `pin`'s headline, copy and image.
    ///
    /// # Errors
    ///
    /// See [`PinterestClient::list_boards`].
    pub async fn create_pin(
        &self,
        board_id: &str,
        pin: &GeneratedPin,
        link: Option<&str>,
    ) -> Result<String, PlatformError> {
        let payload = pin_payload(board_id, pin, link);
        let url = format!("{}/pins", self.api_base);
        let response = self
            .transport
            .send(&url, |client, target| {
                client.post(target).bearer_auth(&self.token).json(&payload)
            })
            .await?;
        let created: CreatedPin = read_json(response, "pins").await?;
        tracing::info!(pin_id = %pin.id(), external_id = %created.id, board_id, "pin published");
        Ok(created.id)
    }
}

#[async_trait]
impl PinPublisher for PinterestClient {
    async fn publish(
        &self,
        board_id: &str,
        pin: &GeneratedPin,
        link: Option<&str>,
    ) -> Result<String, PlatformError> {
        self.create_pin(board_id, pin, link).await
    }
}

/// Media source for a pin image: inline bytes for data URLs, otherwise a URL
/// for Pinterest to fetch.
fn media_source(image_url: &str) -> Value {
    match split_data_url(image_url) {
        Some((mime, data)) => json!({
            "source_type": "image_base64",
            "content_type": mime,
            "data": data,
        }),
        None => json!({
            "source_type": "image_url",
            "url": image_url,
        }),
    }
}

pub(crate) fn pin_payload(board_id: &str, pin: &GeneratedPin, link: Option<&str>) -> Value {
    let strategy = &pin.strategy;
    let mut payload = json!({
        "board_id": board_id,
        "title": strategy.headline,
        "description": format!("{}\n\n{}", strategy.subheadline, strategy.cta),
        "media_source": media_source(&pin.image_url),
    });
    if let Some(link) = link {
        payload["link"] = Value::from(link);
    }
    payload
}

#[cfg(test)]
mod tests {
    use super::*;
    use pinforge_core::PinStrategy;

    fn pin(image_url: &str) -> GeneratedPin {
        let strategy: PinStrategy = serde_json::from_value(json!({
            "targetKeyword": "cat collars",
            "headline": "Your cat deserves drip",
            "subheadline": "Collars with attitude",
            "cta": "Shop now"
        }))
        .unwrap();
        let mut pin = GeneratedPin::pending(strategy);
        pin.complete(image_url.to_string());
        pin
    }

    #[test]
    fn data_url_becomes_base64_source() {
        let payload = pin_payload("b1", &pin("data:image/png;base64,QUJD"), Some("https://shop"));
        assert_eq!(payload["media_source"]["source_type"], "image_base64");
        assert_eq!(payload["media_source"]["content_type"], "image/png");
        assert_eq!(payload["media_source"]["data"], "QUJD");
        assert_eq!(payload["description"], "Collars with attitude\n\nShop now");
        assert_eq!(payload["link"], "https://shop");
    }

    #[test]
    fn remote_image_becomes_url_source() {
        let payload = pin_payload("b1", &pin("https://cdn.example/a.jpg"), None);
        assert_eq!(payload["media_source"]["source_type"], "image_url");
        assert_eq!(payload["media_source"]["url"], "https://cdn.example/a.jpg");
        assert!(payload.get("link").is_none());
        assert_eq!(payload["title"], "Your cat deserves drip");
    }
}
