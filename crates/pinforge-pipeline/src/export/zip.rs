use std::collections::HashSet;
use std::io::{Cursor, Write};
use std::path::PathBuf;
use std::time::Duration;

use ::zip::write::SimpleFileOptions;
use ::zip::{CompressionMethod, ZipWriter};
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use pinforge_core::{split_data_url, GeneratedPin, Project};
use pinforge_render::{encode_png, rasterize, render};
use uuid::Uuid;

use super::file_stem;
use crate::error::PipelineError;

/// A completed pin that could not be exported.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedPin {
    pub pin_id: Uuid,
    pub keyword: String,
    pub reason: String,
}

#[derive(Debug, Default)]
pub struct ZipExportReport {
    /// The encoded archive.
    pub bytes: Vec<u8>,
    /// Entry stems written, one PNG and one SVG each.
    pub written: Vec<String>,
    pub skipped: Vec<SkippedPin>,
}

#[must_use]
pub fn zip_file_name(project: &Project) -> String {
    format!("PINFORGE_EXPORT_{}.zip", file_stem(&project.name))
}

/// Resolves a pin's image reference to encoded image bytes.
///
/// Data URLs are decoded inline, `http(s)` references are downloaded, and
/// anything else is read as a file path (relative paths against `base_dir`).
#[derive(Debug, Clone)]
pub struct BackgroundLoader {
    client: reqwest::Client,
    base_dir: Option<PathBuf>,
}

impl BackgroundLoader {
    /// # Errors
    ///
    /// Returns [`PipelineError::Http`] if the HTTP client cannot be built.
    pub fn new(timeout: Duration, base_dir: Option<PathBuf>) -> Result<Self, PipelineError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent("pinforge/0.1")
            .build()?;
        Ok(Self { client, base_dir })
    }

    /// Load the bytes behind `reference`. An empty reference yields `None`.
    ///
    /// # Errors
    ///
    /// Returns [`PipelineError::InvalidMedia`] for undecodable data URLs,
    /// [`PipelineError::Http`] for failed downloads, or [`PipelineError::Io`]
    /// for unreadable files.
    pub async fn load(&self, reference: &str) -> Result<Option<Vec<u8>>, PipelineError> {
        let reference = reference.trim();
        if reference.is_empty() {
            return Ok(None);
        }

        if reference.starts_with("data:") {
            let (_, payload) = split_data_url(reference).ok_or_else(|| {
                PipelineError::InvalidMedia("data URL is not base64-encoded".to_string())
            })?;
            let bytes = STANDARD
                .decode(payload)
                .map_err(|e| PipelineError::InvalidMedia(format!("bad base64 payload: {e}")))?;
            return Ok(Some(bytes));
        }

        if reference.starts_with("http://") || reference.starts_with("https://") {
            let response = self.client.get(reference).send().await?.error_for_status()?;
            return Ok(Some(response.bytes().await?.to_vec()));
        }

        let path = match &self.base_dir {
            Some(dir) => dir.join(reference),
            None => PathBuf::from(reference),
        };
        let bytes = tokio::fs::read(&path).await.map_err(|e| PipelineError::Io {
            path: path.display().to_string(),
            source: e,
        })?;
        Ok(Some(bytes))
    }
}

/// Archive entry stem for a keyword: whitespace and path-hostile characters
/// become `_`.
fn entry_stem(keyword: &str) -> String {
    let stem: String = keyword
        .trim()
        .chars()
        .map(|c| match c {
            c if c.is_whitespace() => '_',
            '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => '_',
            c => c,
        })
        .collect();
    if stem.is_empty() {
        "pin".to_string()
    } else {
        stem
    }
}

/// `stem`, or `stem_2`, `stem_3`, ... when already taken.
fn unique_stem(stem: String, used: &mut HashSet<String>) -> String {
    if used.insert(stem.clone()) {
        return stem;
    }
    let mut n = 2;
    loop {
        let candidate = format!("{stem}_{n}");
        if used.insert(candidate.clone()) {
            return candidate;
        }
        n += 1;
    }
}

fn entry_options() -> SimpleFileOptions {
    SimpleFileOptions::default().compression_method(CompressionMethod::Deflated)
}

async fn render_pin(
    pin: &GeneratedPin,
    loader: &BackgroundLoader,
    pixel_ratio: f32,
) -> Result<(Vec<u8>, String), PipelineError> {
    let composition = render(pin, 1.0, false);
    let background = loader.load(&pin.image_url).await?;
    let image = rasterize(&composition, background.as_deref(), pixel_ratio)?;
    let png = encode_png(&image)?;
    Ok((png, composition.to_svg()))
}

/// Render every completed pin to PNG (at `pixel_ratio`) and SVG and pack them
/// into a ZIP archive.
///
/// Pins that fail to render are logged and listed in the report instead of
/// failing the export.
///
/// # Errors
///
/// Returns [`PipelineError::Zip`] or [`PipelineError::Io`] if the archive
/// itself cannot be written.
pub async fn export_zip(
    project: &Project,
    loader: &BackgroundLoader,
    pixel_ratio: f32,
) -> Result<ZipExportReport, PipelineError> {
    let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
    let mut used = HashSet::new();
    let mut report = ZipExportReport::default();

    for pin in project.completed_pins() {
        let keyword = &pin.strategy.target_keyword;
        let (png, svg) = match render_pin(pin, loader, pixel_ratio).await {
            Ok(rendered) => rendered,
            Err(e) => {
                tracing::warn!(pin = %pin.id(), keyword = %keyword, error = %e, "skipping pin in zip export");
                report.skipped.push(SkippedPin {
                    pin_id: pin.id(),
                    keyword: keyword.clone(),
                    reason: e.to_string(),
                });
                continue;
            }
        };

        let stem = unique_stem(entry_stem(keyword), &mut used);
        for (name, data) in [
            (format!("{stem}.png"), png.as_slice()),
            (format!("{stem}.svg"), svg.as_bytes()),
        ] {
            writer.start_file(name.clone(), entry_options())?;
            writer.write_all(data).map_err(|e| PipelineError::Io { path: name, source: e })?;
        }
        report.written.push(stem);
    }

    report.bytes = writer.finish()?.into_inner();
    tracing::info!(
        project = %project.id,
        written = report.written.len(),
        skipped = report.skipped.len(),
        "zip export finished"
    );
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn entry_stem_replaces_unsafe_characters() {
        assert_eq!(entry_stem("cable management"), "cable_management");
        assert_eq!(entry_stem("a/b: c?"), "a_b__c_");
        assert_eq!(entry_stem("   "), "pin");
    }

    #[test]
    fn duplicate_stems_get_suffixes() {
        let mut used = HashSet::new();
        assert_eq!(unique_stem("desk".to_string(), &mut used), "desk");
        assert_eq!(unique_stem("desk".to_string(), &mut used), "desk_2");
        assert_eq!(unique_stem("desk".to_string(), &mut used), "desk_3");
    }

    #[tokio::test]
    async fn loader_decodes_data_urls_and_skips_empty() {
        let loader = BackgroundLoader::new(Duration::from_secs(1), None).unwrap();
        assert_eq!(
            loader.load("data:image/png;base64,QUJD").await.unwrap(),
            Some(b"ABC".to_vec())
        );
        assert_eq!(loader.load("  ").await.unwrap(), None);
        assert!(matches!(
            loader.load("data:image/png;base64,@@@").await,
            Err(PipelineError::InvalidMedia(_))
        ));
    }
}
