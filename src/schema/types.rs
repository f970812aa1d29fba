// src/schema/types.rs

use serde::Serialize;
use std::fmt;
use std::str::FromStr;

/// Which of the two published lists a document belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum List {
    A,
    B,
}

/// Included vs. excluded records. Decides the schema width.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RecordKind {
    Included,
    Excluded,
}

impl RecordKind {
    pub const ALL: [RecordKind; 2] = [RecordKind::Included, RecordKind::Excluded];

    /// Number of columns every row of this kind is padded or truncated to.
    pub fn expected_width(self) -> usize {
        match self {
            RecordKind::Included => 7,
            RecordKind::Excluded => 8,
        }
    }

    /// The column that carries the (possibly multi-valued) date.
    pub fn date_column(self) -> CanonicalColumn {
        match self {
            RecordKind::Included => CanonicalColumn::DataInclusao,
            RecordKind::Excluded => CanonicalColumn::DataExclusao,
        }
    }

    /// File name of the reconciled Lista A + Lista B output.
    pub fn combined_file_name(self) -> &'static str {
        match self {
            RecordKind::Included => "medicamentos_referencia_incluidos.csv",
            RecordKind::Excluded => "medicamentos_referencia_excluidos.csv",
        }
    }

    /// The (Lista A, Lista B) pair that is reconciled into this kind's output.
    pub fn halves(self) -> (DocumentCategory, DocumentCategory) {
        (
            DocumentCategory::new(List::A, self),
            DocumentCategory::new(List::B, self),
        )
    }
}

impl fmt::Display for RecordKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecordKind::Included => f.write_str("included"),
            RecordKind::Excluded => f.write_str("excluded"),
        }
    }
}

/// One of the four source documents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct DocumentCategory {
    pub list: List,
    pub kind: RecordKind,
}

impl DocumentCategory {
    pub const ALL: [DocumentCategory; 4] = [
        DocumentCategory::new(List::A, RecordKind::Included),
        DocumentCategory::new(List::A, RecordKind::Excluded),
        DocumentCategory::new(List::B, RecordKind::Included),
        DocumentCategory::new(List::B, RecordKind::Excluded),
    ];

    pub const fn new(list: List, kind: RecordKind) -> Self {
        Self { list, kind }
    }

    pub fn expected_width(self) -> usize {
        self.kind.expected_width()
    }

    pub fn is_excluded(self) -> bool {
        self.kind == RecordKind::Excluded
    }

    /// Stable identifier, also used as the per-category CSV file stem.
    pub fn slug(self) -> &'static str {
        match (self.list, self.kind) {
            (List::A, RecordKind::Included) => "lista_a",
            (List::A, RecordKind::Excluded) => "lista_a_excluidos",
            (List::B, RecordKind::Included) => "lista_b",
            (List::B, RecordKind::Excluded) => "lista_b_excluidos",
        }
    }
}

impl fmt::Display for DocumentCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.slug())
    }
}

impl FromStr for DocumentCategory {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase();
        DocumentCategory::ALL
            .into_iter()
            .find(|c| c.slug() == wanted)
            .ok_or_else(|| {
                anyhow::anyhow!(
                    "unknown category {:?} (expected one of lista_a, lista_a_excluidos, lista_b, lista_b_excluidos)",
                    s
                )
            })
    }
}

impl Serialize for DocumentCategory {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.slug())
    }
}

/// Target column vocabulary that raw header labels are mapped onto.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CanonicalColumn {
    Farmaco,
    Detentor,
    Medicamento,
    Registro,
    Concentracao,
    FormaFarmaceutica,
    DataInclusao,
    DataExclusao,
    MotivoExclusao,
}

impl CanonicalColumn {
    pub fn as_str(self) -> &'static str {
        match self {
            CanonicalColumn::Farmaco => "FÁRMACO",
            CanonicalColumn::Detentor => "DETENTOR",
            CanonicalColumn::Medicamento => "MEDICAMENTO",
            CanonicalColumn::Registro => "REGISTRO",
            CanonicalColumn::Concentracao => "CONCENTRAÇÃO",
            CanonicalColumn::FormaFarmaceutica => "FORMA FARMACÊUTICA",
            CanonicalColumn::DataInclusao => "DATA INCLUSÃO",
            CanonicalColumn::DataExclusao => "DATA DE EXCLUSÃO",
            CanonicalColumn::MotivoExclusao => "MOTIVO DA EXCLUSÃO",
        }
    }
}

impl fmt::Display for CanonicalColumn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
