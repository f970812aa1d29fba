pub mod standardize;
pub mod types;

pub use standardize::{classify_label, standardize_header};
pub use types::{CanonicalColumn, DocumentCategory, List, RecordKind};
