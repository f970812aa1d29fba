/// One cell as handed over by the PDF layer. `None` and `Some("")` are
/// distinct on the way in but both clean to the empty string.
pub type RawCell = Option<String>;

/// A table as found on a single PDF page, before any cleaning.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawTable {
    /// Rows in page order; widths vary freely.
    pub rows: Vec<Vec<RawCell>>,
}

impl RawTable {
    pub fn new(rows: Vec<Vec<RawCell>>) -> Self {
        Self { rows }
    }

    /// Convenience for fixtures and text-based readers.
    pub fn from_text_rows<I, R, S>(rows: I) -> Self
    where
        I: IntoIterator<Item = R>,
        R: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            rows: rows
                .into_iter()
                .map(|r| r.into_iter().map(|c| Some(c.into())).collect())
                .collect(),
        }
    }
}
