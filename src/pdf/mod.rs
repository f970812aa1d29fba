// src/pdf/mod.rs

pub mod layout;

use lopdf::content::Content;
use lopdf::{Document, ObjectId};
use tracing::{debug, warn};

use crate::error::ExtractError;
use crate::process::RawTable;

/// Turns document bytes into at most one raw table per page, in page order.
pub trait TableReader {
    fn read_pages(&self, bytes: &[u8]) -> Result<Vec<Option<RawTable>>, ExtractError>;
}

/// Layout-based reader over `lopdf`.
///
/// Text is placed on the page from the content stream's text operators,
/// grouped into rows by baseline and split into cells on horizontal gaps.
/// A page with no shown text has no table. Glyph widths are estimated, so
/// cells separated by less than about one em may merge.
#[derive(Debug, Default, Clone, Copy)]
pub struct LopdfTableReader;

impl TableReader for LopdfTableReader {
    fn read_pages(&self, bytes: &[u8]) -> Result<Vec<Option<RawTable>>, ExtractError> {
        let doc = Document::load_mem(bytes).map_err(|e| ExtractError::Unreadable(e.to_string()))?;

        let mut pages = Vec::new();
        for (page_num, page_id) in doc.get_pages() {
            let table = match page_table(&doc, page_id) {
                Ok(table) => table,
                Err(e) => {
                    warn!(page = page_num, error = %e, "skipping unreadable page");
                    None
                }
            };
            debug!(
                page = page_num,
                rows = table.as_ref().map_or(0, |t| t.rows.len()),
                "read page"
            );
            pages.push(table);
        }
        Ok(pages)
    }
}

fn page_table(doc: &Document, page_id: ObjectId) -> Result<Option<RawTable>, lopdf::Error> {
    let content = Content::decode(&doc.get_page_content(page_id)?)?;
    let rows = layout::group_rows(layout::text_runs(&content.operations));
    Ok((!rows.is_empty()).then(|| RawTable::from_text_rows(rows)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::process::{process_pages, HeaderClassifier};
    use crate::schema::{DocumentCategory, List, RecordKind};
    use lopdf::content::Operation;
    use lopdf::{dictionary, Object, Stream, StringFormat};

    fn latin1(s: &str) -> Object {
        Object::String(s.chars().map(|c| c as u8).collect(), StringFormat::Literal)
    }

    /// One text object per cell, the way table generators usually draw them.
    fn cell_ops(x: i64, y: i64, text: &str) -> Vec<Operation> {
        vec![
            Operation::new("BT", vec![]),
            Operation::new("Tf", vec!["F1".into(), Object::Integer(6)]),
            Operation::new("Td", vec![Object::Integer(x), Object::Integer(y)]),
            Operation::new("Tj", vec![latin1(text)]),
            Operation::new("ET", vec![]),
        ]
    }

    fn table_pdf(rows: &[(i64, &[&str])]) -> Vec<u8> {
        let mut doc = Document::with_version("1.5");
        let pages_id = doc.new_object_id();
        let font_id = doc.add_object(dictionary! {
            "Type" => "Font",
            "Subtype" => "Type1",
            "BaseFont" => "Helvetica",
        });
        let resources_id = doc.add_object(dictionary! {
            "Font" => dictionary! { "F1" => font_id },
        });

        let mut operations = Vec::new();
        for (y, cells) in rows {
            for (i, text) in cells.iter().enumerate() {
                operations.extend(cell_ops(40 + 75 * i as i64, *y, text));
            }
        }
        let content = Content { operations };
        let content_id = doc.add_object(Stream::new(dictionary! {}, content.encode().unwrap()));
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Contents" => content_id,
        });
        doc.objects.insert(
            pages_id,
            Object::Dictionary(dictionary! {
                "Type" => "Pages",
                "Kids" => vec![page_id.into()],
                "Count" => 1,
                "Resources" => resources_id,
                "MediaBox" => vec![0.into(), 0.into(), 595.into(), 842.into()],
            }),
        );
        let catalog_id = doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
        });
        doc.trailer.set("Root", catalog_id);

        let mut buf = Vec::new();
        doc.save_to(&mut buf).unwrap();
        buf
    }

    const HEADER: &[&str] = &[
        "FÁRMACO",
        "DETENTOR",
        "MEDICAMENTO",
        "REGISTRO",
        "CONCENTRAÇÃO",
        "FORMA FARMACÊUTICA",
        "DATA DE INCLUSÃO",
    ];

    #[test]
    fn cells_drawn_separately_form_one_row() {
        let data: &[&str] = &[
            "aciclovir",
            "GSK",
            "Zovirax",
            "1010700",
            "200 mg",
            "comprimido",
            "12/11/2012",
        ];
        let bytes = table_pdf(&[(760, &["LISTA A"]), (720, HEADER), (700, data)]);

        let pages = LopdfTableReader.read_pages(&bytes).unwrap();
        assert_eq!(pages.len(), 1);
        let table = pages[0].as_ref().unwrap();
        assert_eq!(table.rows.len(), 3);
        assert_eq!(table.rows[1].len(), 7);
        assert_eq!(table.rows[1][0].as_deref(), Some("FÁRMACO"));

        let ds = process_pages(
            &pages,
            DocumentCategory::new(List::A, RecordKind::Included),
            &HeaderClassifier::default(),
        )
        .unwrap();
        assert_eq!(ds.header().get(0), Some("FÁRMACO"));
        assert_eq!(ds.header().get(6), Some("DATA INCLUSÃO"));
        assert_eq!(ds.len(), 1);
        assert_eq!(ds.records()[0].cells()[1], "GSK");
        assert_eq!(ds.records()[0].cells()[6], "12.11.2012");
    }

    #[test]
    fn page_without_text_has_no_table() {
        let bytes = table_pdf(&[]);
        assert_eq!(LopdfTableReader.read_pages(&bytes).unwrap(), vec![None]);
    }

    #[test]
    fn garbage_bytes_are_unreadable() {
        let err = LopdfTableReader.read_pages(b"definitely not a pdf").unwrap_err();
        assert!(matches!(err, ExtractError::Unreadable(_)));
    }
}
