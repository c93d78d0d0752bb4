//! Export of result sets to downloadable files
//!
//! Two formats are supported: CSV (BOM-prefixed UTF-8) and XLSX. Both share
//! the same column layout.

pub mod delimited;
pub mod spreadsheet;

use crate::config::ExportSettings;
use crate::error::{EncodingError, ValidationError};
use crate::results::SearchResult;
use std::fmt;
use std::str::FromStr;

/// Column names, in output order
pub const HEADER: [&str; 4] = ["Rank", "Title", "URL", "Description"];

/// Output format chosen by the user
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    /// Comma-separated text
    Csv,
    /// Office Open XML workbook
    Xlsx,
}

impl ExportFormat {
    pub const ALL: [ExportFormat; 2] = [ExportFormat::Csv, ExportFormat::Xlsx];

    pub fn extension(self) -> &'static str {
        match self {
            Self::Csv => "csv",
            Self::Xlsx => "xlsx",
        }
    }

    pub fn mime(self) -> &'static str {
        match self {
            Self::Csv => "text/csv",
            Self::Xlsx => "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet",
        }
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

impl FromStr for ExportFormat {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "csv" => Ok(Self::Csv),
            "xlsx" | "excel" => Ok(Self::Xlsx),
            other => Err(ValidationError::UnknownFormat(other.to_string())),
        }
    }
}

/// Encoded file ready for download
#[derive(Debug, Clone)]
pub struct ExportFile {
    pub bytes: Vec<u8>,
    pub file_name: String,
    pub mime: &'static str,
}

/// Serialize results in the given format
pub fn encode(
    results: &[SearchResult],
    format: ExportFormat,
    sheet_label: &str,
) -> Result<Vec<u8>, EncodingError> {
    match format {
        ExportFormat::Csv => delimited::encode(results),
        ExportFormat::Xlsx => spreadsheet::encode(results, sheet_label),
    }
}

/// Encode and attach the file name and media type
pub fn export(
    query: &str,
    results: &[SearchResult],
    format: ExportFormat,
    settings: &ExportSettings,
) -> Result<ExportFile, EncodingError> {
    Ok(ExportFile {
        bytes: encode(results, format, &settings.sheet_label)?,
        file_name: file_name(query, format, settings),
        mime: format.mime(),
    })
}

/// `{prefix}_{stem}.{ext}`, where the stem is the query with every
/// non-alphanumeric character replaced by `_` and cut to the configured
/// length
pub fn file_name(query: &str, format: ExportFormat, settings: &ExportSettings) -> String {
    let stem: String = query
        .trim()
        .chars()
        .map(|c| if c.is_alphanumeric() { c } else { '_' })
        .take(settings.max_stem_chars)
        .collect();

    if stem.is_empty() {
        format!("{}.{}", settings.file_prefix, format.extension())
    } else {
        format!("{}_{}.{}", settings.file_prefix, stem, format.extension())
    }
}
