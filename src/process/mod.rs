// src/process/mod.rs
pub mod combine;
pub mod dataset;
pub mod date_parser;
pub mod extract;
pub mod header;
pub mod raw_table;
pub mod utils;

use tracing::{debug, info};

use crate::error::ExtractError;
use crate::schema::{standardize_header, DocumentCategory, List};

pub use combine::combine;
pub use dataset::{Dataset, Record, Row};
pub use date_parser::normalize_date;
pub use extract::{extract_table, ExtractedTable};
pub use header::HeaderClassifier;
pub use raw_table::{RawCell, RawTable};

/// How many changed dates are echoed at debug level per document.
const DATE_SAMPLE: usize = 5;

/// Full per-document pass: extract → canonical header → date cleanup.
///
/// A table with a header but no data rows is an empty dataset, not an error.
#[tracing::instrument(level = "info", skip(pages, category, classifier), fields(category = %category, pages = pages.len()))]
pub fn process_pages(
    pages: &[Option<RawTable>],
    category: DocumentCategory,
    classifier: &HeaderClassifier,
) -> Result<Dataset, ExtractError> {
    let table = extract_table(pages, category, classifier)?;
    let dataset = build_dataset(table, category, classifier);
    info!(records = dataset.len(), "document processed");
    Ok(dataset)
}

/// Standardize the header, normalize the category's date column and, for
/// Lista B, drop a header-like first record.
pub fn build_dataset(
    table: ExtractedTable,
    category: DocumentCategory,
    classifier: &HeaderClassifier,
) -> Dataset {
    let header = standardize_header(&table.header);
    let mut dataset = Dataset::new(category.kind, header, table.rows);

    let date_col = category.kind.date_column();
    match dataset.column_index(date_col.as_str()) {
        Some(idx) => {
            let mut shown = 0;
            dataset.map_column(idx, |raw| {
                let norm = normalize_date(Some(raw));
                if norm != raw && shown < DATE_SAMPLE {
                    shown += 1;
                    debug!(from = raw, to = %norm, "normalized date");
                }
                norm
            });
        }
        None => debug!(column = %date_col, "date column not present; dates left as-is"),
    }

    if category.list == List::B && dataset.drop_leading_header(classifier) {
        info!(category = %category, "dropped duplicated header from Lista B");
    }

    dataset
}
