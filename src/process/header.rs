/// Keywords that mark a header row in the reference-drug lists.
/// Matching is diacritic-exact.
pub const DEFAULT_HEADER_KEYWORDS: &[&str] = &[
    "FÁRMACO",
    "ASSOCIAÇÃO",
    "DETENTOR",
    "MEDICAMENTO",
    "REGISTRO",
    "CONCENTRAÇÃO",
    "FORMA",
    "FARMACÊUTICA",
    "DATA",
    "INCLUSÃO",
    "EXCLUSÃO",
    "MOTIVO",
];

pub const DEFAULT_HEADER_THRESHOLD: usize = 3;

/// Decides by keyword density whether a row is a table header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeaderClassifier {
    keywords: Vec<String>,
    threshold: usize,
}

impl Default for HeaderClassifier {
    fn default() -> Self {
        Self::new(
            DEFAULT_HEADER_KEYWORDS.iter().map(|k| k.to_string()),
            DEFAULT_HEADER_THRESHOLD,
        )
    }
}

impl HeaderClassifier {
    /// Keywords are upper-cased and de-duplicated, so the count is always
    /// over distinct keywords.
    pub fn new<I, S>(keywords: I, threshold: usize) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut uniq: Vec<String> = Vec::new();
        for k in keywords {
            let k = k.into().to_uppercase();
            if !k.is_empty() && !uniq.contains(&k) {
                uniq.push(k);
            }
        }
        Self {
            keywords: uniq,
            threshold,
        }
    }

    pub fn keywords(&self) -> &[String] {
        &self.keywords
    }

    pub fn threshold(&self) -> usize {
        self.threshold
    }

    /// How many distinct keywords occur (as substrings) in the row's
    /// non-empty cells joined by spaces.
    pub fn keyword_count<S: AsRef<str>>(&self, cells: &[S]) -> usize {
        let text = cells
            .iter()
            .map(AsRef::as_ref)
            .filter(|c| !c.is_empty())
            .collect::<Vec<_>>()
            .join(" ")
            .to_uppercase();
        self.keywords
            .iter()
            .filter(|k| text.contains(k.as_str()))
            .count()
    }

    pub fn is_header<S: AsRef<str>>(&self, cells: &[S]) -> bool {
        !cells.is_empty() && self.keyword_count(cells) >= self.threshold
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn three_keywords_make_a_header() {
        let c = HeaderClassifier::default();
        assert!(c.is_header(&["Fármaco", "Detentor", "Medicamento"]));
        assert!(!c.is_header(&["Fármaco", "Detentor", "paracetamol"]));
    }

    #[test]
    fn counts_below_threshold_are_not_headers() {
        let c = HeaderClassifier::default();
        assert!(!c.is_header::<&str>(&[]));
        assert!(!c.is_header(&["", "", ""]));
        assert_eq!(c.keyword_count(&["REGISTRO 1.0234.0001"]), 1);
        assert!(!c.is_header(&["DATA", "REGISTRO"]));
    }

    #[test]
    fn repeated_keywords_count_once() {
        let c = HeaderClassifier::default();
        let row = ["DATA", "DATA", "DATA DATA", "data"];
        assert_eq!(c.keyword_count(&row), 1);
        assert!(!c.is_header(&row));
    }

    #[test]
    fn order_does_not_matter() {
        let c = HeaderClassifier::default();
        let a = ["MOTIVO", "", "EXCLUSÃO", "DATA"];
        let b = ["DATA", "EXCLUSÃO", "MOTIVO", ""];
        assert_eq!(c.keyword_count(&a), c.keyword_count(&b));
        assert!(c.is_header(&a) && c.is_header(&b));
    }

    #[test]
    fn forma_farmaceutica_counts_as_two() {
        let c = HeaderClassifier::default();
        assert_eq!(c.keyword_count(&["Forma Farmacêutica"]), 2);
    }

    #[test]
    fn matching_is_diacritic_exact() {
        let c = HeaderClassifier::default();
        assert_eq!(c.keyword_count(&["FARMACO ASSOCIACAO CONCENTRACAO"]), 0);
    }

    #[test]
    fn custom_keywords_and_threshold() {
        let c = HeaderClassifier::new(["col", "COL", "name"], 2);
        assert_eq!(c.keywords(), &["COL".to_string(), "NAME".to_string()]);
        assert!(c.is_header(&["Col A", "Name"]));
        assert!(!c.is_header(&["Col A"]));
    }
}
