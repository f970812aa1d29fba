// src/schema/standardize.rs

use crate::process::dataset::Row;

use super::types::CanonicalColumn;

/// How a rule tests an upper-cased header label.
enum Match {
    /// Any of the fragments is a substring.
    Any(&'static [&'static str]),
    /// Every fragment is a substring.
    All(&'static [&'static str]),
}

impl Match {
    fn test(&self, label: &str) -> bool {
        match self {
            Match::Any(frags) => frags.iter().any(|f| label.contains(f)),
            Match::All(frags) => frags.iter().all(|f| label.contains(f)),
        }
    }
}

struct Rule {
    when: Match,
    column: CanonicalColumn,
}

/// Evaluated top to bottom, first match wins. The order is load-bearing:
/// "DATA ... INCLUSÃO" is caught by the generic DATA+INCLUSÃO rule, so
/// nothing narrower for that phrasing can ever fire after it.
static RULES: &[Rule] = &[
    Rule {
        when: Match::Any(&["FÁRMACO", "ASSOCIAÇÃO"]),
        column: CanonicalColumn::Farmaco,
    },
    Rule {
        when: Match::Any(&["DETENTOR"]),
        column: CanonicalColumn::Detentor,
    },
    Rule {
        when: Match::Any(&["MEDICAMENTO"]),
        column: CanonicalColumn::Medicamento,
    },
    Rule {
        when: Match::Any(&["REGISTRO"]),
        column: CanonicalColumn::Registro,
    },
    Rule {
        when: Match::Any(&["CONCENTRAÇÃO", "CONCENTRAÇAO"]),
        column: CanonicalColumn::Concentracao,
    },
    Rule {
        when: Match::Any(&["FORMA FARMACÊUTICA", "FORMA FARMACEUTICA"]),
        column: CanonicalColumn::FormaFarmaceutica,
    },
    Rule {
        when: Match::All(&["DATA", "INCLUSÃO"]),
        column: CanonicalColumn::DataInclusao,
    },
    Rule {
        when: Match::All(&["DATA", "EXCLUSÃO"]),
        column: CanonicalColumn::DataExclusao,
    },
    Rule {
        when: Match::Any(&["MOTIVO"]),
        column: CanonicalColumn::MotivoExclusao,
    },
];

/// Map a single (already cleaned) header label to its canonical name.
/// Returns `None` when no rule recognizes it.
pub fn classify_label(label: &str) -> Option<CanonicalColumn> {
    let upper = label.to_uppercase();
    RULES
        .iter()
        .find(|rule| rule.when.test(&upper))
        .map(|rule| rule.column)
}

/// Rename every header cell to its canonical name; unrecognized labels keep
/// their original text.
pub fn standardize_header(header: &Row) -> Row {
    header
        .cells()
        .iter()
        .map(|label| match classify_label(label) {
            Some(col) => col.as_str().to_string(),
            None => label.clone(),
        })
        .collect()
}
