use serde::{Deserialize, Serialize};

/// One entry parsed from an RSS feed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeedItem {
    pub title: String,
    #[serde(default)]
    pub link: String,
    /// Plain-text description with HTML tags removed.
    #[serde(default)]
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pub_date: Option<String>,
}
