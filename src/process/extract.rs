use tracing::{debug, trace};

use crate::error::ExtractError;
use crate::process::dataset::Row;
use crate::process::header::HeaderClassifier;
use crate::process::raw_table::RawTable;
use crate::process::utils::clean_cell;
use crate::schema::DocumentCategory;

/// Located header plus the data rows below it, all at the category's width.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractedTable {
    pub header: Row,
    pub rows: Vec<Row>,
}

/// Turn per-page raw tables into a header and fixed-width data rows.
///
/// - every cell is cleaned and all-blank rows are dropped
/// - the first header-like row becomes the header; anything above it is preamble
/// - header-like rows further down (page-break repeats) are skipped
/// - rows are padded or truncated to `category.expected_width()`
///
/// Pages without a table (`None`) are simply skipped.
pub fn extract_table(
    pages: &[Option<RawTable>],
    category: DocumentCategory,
    classifier: &HeaderClassifier,
) -> Result<ExtractedTable, ExtractError> {
    // 1) flatten + clean, in page order
    let flat: Vec<Row> = pages
        .iter()
        .flatten()
        .flat_map(|table| table.rows.iter())
        .map(|raw| raw.iter().map(|c| clean_cell(c.as_deref())).collect::<Row>())
        .filter(|row| !row.is_blank())
        .collect();
    trace!(category = %category, rows = flat.len(), "flattened page rows");

    // 2) locate the header
    let header_idx = flat
        .iter()
        .position(|row| classifier.is_header(row.cells()))
        .ok_or(ExtractError::MissingHeader)?;
    if header_idx > 0 {
        debug!(category = %category, skipped = header_idx, "discarded preamble rows");
    }

    let width = category.expected_width();
    let mut rest = flat.into_iter().skip(header_idx);
    let mut header = rest.next().ok_or(ExtractError::MissingHeader)?;
    header.fit_width(width);

    // 3) data rows, minus repeated headers
    let mut repeated = 0usize;
    let rows: Vec<Row> = rest
        .filter(|row| {
            let is_repeat = classifier.is_header(row.cells());
            if is_repeat {
                repeated += 1;
            }
            !is_repeat
        })
        .map(|mut row| {
            row.fit_width(width);
            row
        })
        .filter(|row| !row.is_blank())
        .collect();

    debug!(
        category = %category,
        rows = rows.len(),
        repeated_headers = repeated,
        "extracted table"
    );
    Ok(ExtractedTable { header, rows })
}
