//! RSS feed fetching and `<item>` extraction.

use pinforge_core::FeedItem;
use quick_xml::events::Event;
use quick_xml::Reader;

use crate::error::PlatformError;
use crate::transport::{api_error, FallbackTransport};

/// Fetch `url` and parse its items.
///
/// # Errors
///
/// Returns [`PlatformError::NetworkFailure`] when both transports fail,
/// [`PlatformError::Api`] on a non-2xx response, or [`PlatformError::Xml`]
/// for malformed XML.
pub async fn fetch_feed(
    transport: &FallbackTransport,
    url: &str,
) -> Result<Vec<FeedItem>, PlatformError> {
    let response = transport
        .send(url, |client, target| client.get(target))
        .await?;
    let status = response.status();
    let body = response.text().await?;
    if !status.is_success() {
        return Err(api_error(status.as_u16(), &body));
    }
    let items = parse_feed(&body)?;
    tracing::info!(url, items = items.len(), "feed loaded");
    Ok(items)
}

/// Parse an RSS document into [`FeedItem`]s in document order.
///
/// Descriptions are stripped of HTML. Items without a title are skipped.
///
/// # Errors
///
/// Returns [`PlatformError::Xml`] if the XML is malformed.
pub fn parse_feed(xml: &str) -> Result<Vec<FeedItem>, PlatformError> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);

    let mut items = Vec::new();
    let mut in_item = false;
    let mut current_tag = String::new();
    let mut current = FeedItem::default();

    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) => {
                let name = std::str::from_utf8(e.name().as_ref())
                    .unwrap_or("")
                    .to_string();
                if name == "item" {
                    in_item = true;
                    current = FeedItem::default();
                }
                current_tag = name;
            }
            Ok(Event::End(e)) => {
                let raw = e.name();
                let name = std::str::from_utf8(raw.as_ref()).unwrap_or("");
                if name == "item" && in_item {
                    in_item = false;
                    if current.title.is_empty() {
                        tracing::debug!("skipping feed item without title");
                    } else {
                        current.description = strip_html(&current.description);
                        items.push(std::mem::take(&mut current));
                    }
                }
                current_tag.clear();
            }
            Ok(Event::Text(e)) => {
                if in_item {
                    let text = e.unescape().unwrap_or_default().into_owned();
                    append_field(&mut current, &current_tag, &text);
                }
            }
            Ok(Event::CData(e)) => {
                if in_item {
                    let text = String::from_utf8_lossy(e.as_ref()).into_owned();
                    append_field(&mut current, &current_tag, &text);
                }
            }
            Ok(Event::Eof) => break,
            Err(e) => return Err(PlatformError::Xml(e)),
            _ => {}
        }
    }

    Ok(items)
}

fn append_field(item: &mut FeedItem, tag: &str, text: &str) {
    let field = match tag {
        "title" => &mut item.title,
        "link" => &mut item.link,
        "description" => &mut item.description,
        "pubDate" => item.pub_date.get_or_insert_with(String::new),
        _ => return,
    };
    field.push_str(text.trim());
}

/// Strip HTML tags from a string and normalize whitespace.
pub(crate) fn strip_html(html: &str) -> String {
    let mut out = String::with_capacity(html.len());
    let mut in_tag = false;
    for ch in html.chars() {
        match ch {
            '<' => in_tag = true,
            '>' => in_tag = false,
            _ if !in_tag => out.push(ch),
            _ => {}
        }
    }
    out.split_whitespace().collect::<Vec<_>>().join(" ")
}
