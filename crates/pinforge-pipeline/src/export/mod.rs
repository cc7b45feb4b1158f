//! Bulk export of a project's pins.

mod csv;
mod zip;

pub use self::csv::{csv_file_name, export_csv, CSV_HEADER};
pub use self::zip::{export_zip, zip_file_name, BackgroundLoader, SkippedPin, ZipExportReport};

/// Project name with whitespace runs collapsed to `_`, for export file names.
pub(crate) fn file_stem(name: &str) -> String {
    name.split_whitespace().collect::<Vec<_>>().join("_")
}
