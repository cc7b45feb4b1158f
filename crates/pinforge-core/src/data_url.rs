/// Split a `data:<mime>;base64,<payload>` URL into its MIME type and payload.
///
/// Returns `None` for anything that is not a base64 data URL.
#[must_use]
pub fn split_data_url(url: &str) -> Option<(&str, &str)> {
    let rest = url.strip_prefix("data:")?;
    let (meta, payload) = rest.split_once(',')?;
    let mime = meta.strip_suffix(";base64")?;
    let mime = if mime.is_empty() { "text/plain" } else { mime };
    Some((mime, payload))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_base64_data_url() {
        assert_eq!(
            split_data_url("data:image/png;base64,iVBOR"),
            Some(("image/png", "iVBOR"))
        );
    }

    #[test]
    fn rejects_non_base64_and_plain_urls() {
        assert_eq!(split_data_url("data:text/plain,hello"), None);
        assert_eq!(split_data_url("https://example.com/a.png"), None);
        assert_eq!(split_data_url("data:image/png;base64"), None);
    }
}
