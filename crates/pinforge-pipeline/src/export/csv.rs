use ::csv::{QuoteStyle, Terminator, WriterBuilder};
use pinforge_core::{GeneratedPin, Project};

use super::file_stem;
use crate::error::PipelineError;

/// Column header of the bulk-upload sheet.
pub const CSV_HEADER: [&str; 10] = [
    "Pin Title",
    "Pin Description",
    "Keywords",
    "Hashtags",
    "Image URL",
    "Destination URL",
    "viralScore",
    "critique",
    "hookImprovement",
    "seoStrength",
];

#[must_use]
pub fn csv_file_name(project: &Project) -> String {
    format!("PINFORGE_BULK_{}.csv", file_stem(&project.name))
}

fn hashtags(keyword: &str) -> String {
    let tag: String = keyword.split_whitespace().collect();
    format!("#{tag} #viral #aesthetic #unhinged")
}

/// Double-quote `text`, doubling any embedded quotes.
fn quote(text: &str) -> String {
    format!("\"{}\"", text.replace('"', "\"\""))
}

/// One data row. Text columns are always quoted, even when they look
/// numeric; the two scores are written bare.
fn row(pin: &GeneratedPin, destination: &str) -> String {
    let s = &pin.strategy;
    let audit = s.viral_audit.as_ref();
    let text = [
        s.headline.clone(),
        format!("{} {}", s.subheadline, s.cta),
        s.target_keyword.clone(),
        hashtags(&s.target_keyword),
        pin.image_url.clone(),
        destination.to_string(),
    ];
    let mut cells: Vec<String> = text.iter().map(|t| quote(t)).collect();
    cells.push(audit.map_or(0, |a| a.viral_score).to_string());
    cells.push(quote(audit.map_or("", |a| a.critique.as_str())));
    cells.push(quote(audit.map_or("", |a| a.hook_improvement.as_str())));
    cells.push(audit.map_or(0, |a| a.seo_strength).to_string());
    cells.join(",")
}

fn header_line() -> Result<String, PipelineError> {
    let mut writer = WriterBuilder::new()
        .quote_style(QuoteStyle::Necessary)
        .terminator(Terminator::Any(b'\n'))
        .from_writer(Vec::new());
    writer.write_record(CSV_HEADER)?;
    let bytes = writer
        .into_inner()
        .map_err(|e| ::csv::Error::from(e.into_error()))?;
    Ok(String::from_utf8_lossy(&bytes).trim_end_matches('\n').to_string())
}

/// Render every pin in `project` as a bulk-upload CSV.
///
/// The header is bare; data rows quote every text field (empty text becomes
/// `""`) and leave the two scores unquoted. Lines are joined with `\n` and
/// the last row has no terminator.
///
/// # Errors
///
/// Returns [`PipelineError::Csv`] if the header cannot be written.
pub fn export_csv(project: &Project, default_destination: &str) -> Result<String, PipelineError> {
    let destination = project.input.destination().unwrap_or(default_destination);
    let mut lines = vec![header_line()?];
    lines.extend(project.pins.iter().map(|pin| row(pin, destination)));
    Ok(lines.join("\n"))
}
