//! XLSX export
//!
//! The workbook container records a creation timestamp, so two encodings of
//! the same results are equal in content but not byte-for-byte.

use super::HEADER;
use crate::error::EncodingError;
use crate::results::SearchResult;
use rust_xlsxwriter::{Format, Workbook};

/// Excel's limit on worksheet name length
const MAX_SHEET_NAME_CHARS: usize = 31;

/// Excel's limit on the length of a text cell
const MAX_CELL_CHARS: usize = 32_767;

const COLUMN_WIDTHS: [f64; 4] = [6.0, 50.0, 50.0, 80.0];

/// Single worksheet named after `sheet_label`: header row then one row per
/// result
pub fn encode(results: &[SearchResult], sheet_label: &str) -> Result<Vec<u8>, EncodingError> {
    let mut workbook = Workbook::new();
    let header_format = Format::new().set_bold();

    {
        let sheet = workbook.add_worksheet();
        sheet.set_name(sheet_name(sheet_label))?;

        for (col, (title, width)) in (0u16..).zip(HEADER.iter().zip(COLUMN_WIDTHS)) {
            sheet.write_string_with_format(0, col, *title, &header_format)?;
            sheet.set_column_width(col, width)?;
        }
        sheet.set_freeze_panes(1, 0)?;

        for (row, r) in (1u32..).zip(results) {
            sheet.write_number(row, 0, f64::from(r.rank))?;
            sheet.write_string(row, 1, cell_text(&r.title))?;
            sheet.write_string(row, 2, cell_text(&r.url))?;
            sheet.write_string(row, 3, cell_text(&r.description))?;
        }
    }

    Ok(workbook.save_to_buffer()?)
}

/// Make a label acceptable as a worksheet name
pub fn sheet_name(label: &str) -> String {
    let cleaned: String = label
        .chars()
        .filter(|c| !matches!(c, '[' | ']' | ':' | '*' | '?' | '/' | '\\'))
        .take(MAX_SHEET_NAME_CHARS)
        .collect();
    let cleaned = cleaned.trim().trim_matches('\'').trim();

    if cleaned.is_empty() {
        "Sheet1".to_string()
    } else if cleaned.eq_ignore_ascii_case("history") {
        // reserved by Excel
        format!("{cleaned}_")
    } else {
        cleaned.to_string()
    }
}

fn cell_text(text: &str) -> String {
    if text.chars().count() <= MAX_CELL_CHARS {
        text.to_string()
    } else {
        text.chars().take(MAX_CELL_CHARS).collect()
    }
}
