use crate::process::header::HeaderClassifier;
use crate::schema::RecordKind;

/// An ordered row of cleaned cell text.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Row(Vec<String>);

impl Row {
    pub fn new(cells: Vec<String>) -> Self {
        Self(cells)
    }

    pub fn cells(&self) -> &[String] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn get(&self, idx: usize) -> Option<&str> {
        self.0.get(idx).map(String::as_str)
    }

    /// True when every cell is empty or whitespace.
    pub fn is_blank(&self) -> bool {
        self.0.iter().all(|c| c.trim().is_empty())
    }

    /// Pad with trailing empty cells, or drop trailing cells, to exactly `width`.
    pub fn fit_width(&mut self, width: usize) {
        self.0.resize(width, String::new());
    }

    pub(crate) fn set(&mut self, idx: usize, value: String) {
        if let Some(cell) = self.0.get_mut(idx) {
            *cell = value;
        }
    }
}

impl FromIterator<String> for Row {
    fn from_iter<I: IntoIterator<Item = String>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl From<Vec<String>> for Row {
    fn from(cells: Vec<String>) -> Self {
        Self(cells)
    }
}

/// A data row bound to its dataset's canonical header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
    id: usize,
    row: Row,
}

impl Record {
    /// Position of the record within its dataset, renumbered after merges.
    pub fn id(&self) -> usize {
        self.id
    }

    pub fn cells(&self) -> &[String] {
        self.row.cells()
    }
}

/// Ordered, fixed-width records plus their header.
///
/// Every record and the header hold exactly `kind.expected_width()` cells.
/// Order is document page order and survives merges.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dataset {
    kind: RecordKind,
    header: Row,
    records: Vec<Record>,
}

impl Dataset {
    pub fn new(kind: RecordKind, mut header: Row, rows: Vec<Row>) -> Self {
        let width = kind.expected_width();
        header.fit_width(width);
        let records = rows
            .into_iter()
            .enumerate()
            .map(|(id, mut row)| {
                row.fit_width(width);
                Record { id, row }
            })
            .collect();
        Self {
            kind,
            header,
            records,
        }
    }

    /// No records, blank header of the right width.
    pub fn empty(kind: RecordKind) -> Self {
        Self::new(kind, Row::default(), Vec::new())
    }

    pub fn kind(&self) -> RecordKind {
        self.kind
    }

    pub fn header(&self) -> &Row {
        &self.header
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.header.cells().iter().position(|c| c == name)
    }

    /// Rewrite one column in place, keeping everything else.
    pub fn map_column<F>(&mut self, idx: usize, mut f: F)
    where
        F: FnMut(&str) -> String,
    {
        for rec in &mut self.records {
            if let Some(old) = rec.row.get(idx) {
                let new = f(old);
                rec.row.set(idx, new);
            }
        }
    }

    /// Drop the first record when it looks like a header that leaked
    /// through extraction. Returns whether a record was removed.
    pub fn drop_leading_header(&mut self, classifier: &HeaderClassifier) -> bool {
        let leaked = self
            .records
            .first()
            .map(|r| classifier.is_header(r.cells()))
            .unwrap_or(false);
        if leaked {
            self.records.remove(0);
            self.renumber();
        }
        leaked
    }

    /// Move `other`'s records after ours, keeping our header.
    pub(crate) fn append(&mut self, other: Dataset) {
        self.records.extend(other.records);
        self.renumber();
    }

    fn renumber(&mut self) {
        for (id, rec) in self.records.iter_mut().enumerate() {
            rec.id = id;
        }
    }
}
