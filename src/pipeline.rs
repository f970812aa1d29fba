// src/pipeline.rs

use std::collections::BTreeMap;
use tracing::{error, info, warn};
use url::Url;

use crate::error::{CategoryError, ExtractError, FetchError};
use crate::fetch::DocumentSource;
use crate::pdf::TableReader;
use crate::process::{combine, process_pages, Dataset, HeaderClassifier};
use crate::report::RunReport;
use crate::schema::{DocumentCategory, RecordKind};

/// Everything one run produced. Missing categories are simply absent.
#[derive(Debug)]
pub struct PipelineOutput {
    pub datasets: BTreeMap<DocumentCategory, Dataset>,
    pub combined: BTreeMap<RecordKind, Dataset>,
    pub report: RunReport,
}

/// One run over all four documents: fetch → read pages → extract →
/// standardize → reconcile. Categories are handled one after the other and
/// a failing category never stops the others.
pub struct Pipeline<S, R> {
    source: S,
    reader: R,
    classifier: HeaderClassifier,
}

impl<S: DocumentSource, R: TableReader> Pipeline<S, R> {
    pub fn new(source: S, reader: R, classifier: HeaderClassifier) -> Self {
        Self {
            source,
            reader,
            classifier,
        }
    }

    pub async fn run(&self) -> PipelineOutput {
        let mut report = RunReport::start();
        info!("starting run");

        let mut datasets = BTreeMap::new();
        match self.source.listing().await {
            Ok(links) => {
                for category in DocumentCategory::ALL {
                    match self.process_category(category, links.get(&category)).await {
                        Ok(ds) => {
                            report.record_ok(category, ds.len());
                            datasets.insert(category, ds);
                        }
                        Err(e) => {
                            log_skip(category, &e);
                            report.record_skipped(category, &e);
                        }
                    }
                }
            }
            Err(e) => {
                error!(error = %e, "could not resolve document links");
                for category in DocumentCategory::ALL {
                    report.record_skipped(category, &e);
                }
            }
        }

        let combined = reconcile(&datasets, &self.classifier);
        for (kind, ds) in &combined {
            report.record_combined(*kind, ds.len());
        }

        report.finish();
        info!(
            processed = datasets.len(),
            skipped = report.skipped(),
            "run finished"
        );
        PipelineOutput {
            datasets,
            combined,
            report,
        }
    }

    #[tracing::instrument(level = "info", skip(self, category, url), fields(category = %category))]
    async fn process_category(
        &self,
        category: DocumentCategory,
        url: Option<&Url>,
    ) -> Result<Dataset, CategoryError> {
        let url = url.ok_or(FetchError::NoLink(category))?;
        info!(%url, "processing document");
        let bytes = self.source.fetch(url).await?;
        let pages = self.reader.read_pages(&bytes)?;
        Ok(process_pages(&pages, category, &self.classifier)?)
    }
}

fn log_skip(category: DocumentCategory, err: &CategoryError) {
    match err {
        CategoryError::Extract(ExtractError::MissingHeader) => {
            warn!(category = %category, "header not found in document; skipping")
        }
        CategoryError::Fetch(FetchError::NoLink(_)) => {
            warn!(category = %category, "no link on listing page; skipping")
        }
        other => error!(category = %category, error = %other, "skipping category"),
    }
}

/// Build the included/excluded outputs from whichever halves exist.
pub fn reconcile(
    datasets: &BTreeMap<DocumentCategory, Dataset>,
    classifier: &HeaderClassifier,
) -> BTreeMap<RecordKind, Dataset> {
    let mut out = BTreeMap::new();
    for kind in RecordKind::ALL {
        let (a, b) = kind.halves();
        let merged = match (datasets.get(&a), datasets.get(&b)) {
            (Some(a), Some(b)) => combine(a.clone(), b.clone(), kind, classifier),
            (Some(a), None) => {
                info!(kind = %kind, "only Lista A available");
                a.clone()
            }
            (None, Some(b)) => {
                info!(kind = %kind, "only Lista B available");
                b.clone()
            }
            (None, None) => {
                warn!(kind = %kind, "neither list available; no combined output");
                continue;
            }
        };
        info!(kind = %kind, records = merged.len(), "combined");
        out.insert(kind, merged);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::process::RawTable;
    use crate::report::CategoryStatus;
    use crate::schema::List;
    use std::collections::HashMap;

    /// Serves a fixed listing; documents are keyed by URL.
    struct FixtureSource {
        listing_ok: bool,
        links: BTreeMap<DocumentCategory, Url>,
        docs: HashMap<String, Vec<u8>>,
    }

    impl DocumentSource for FixtureSource {
        async fn listing(&self) -> Result<BTreeMap<DocumentCategory, Url>, FetchError> {
            if self.listing_ok {
                Ok(self.links.clone())
            } else {
                Err(FetchError::Timeout {
                    url: "https://example.test/".into(),
                })
            }
        }

        async fn fetch(&self, url: &Url) -> Result<Vec<u8>, FetchError> {
            self.docs
                .get(url.as_str())
                .cloned()
                .ok_or_else(|| FetchError::Status {
                    url: url.to_string(),
                    status: 404,
                })
        }
    }

    /// "PDF bytes" are a key into prepared page tables.
    struct FixtureReader(HashMap<Vec<u8>, Vec<Option<RawTable>>>);

    impl TableReader for FixtureReader {
        fn read_pages(&self, bytes: &[u8]) -> Result<Vec<Option<RawTable>>, ExtractError> {
            self.0
                .get(bytes)
                .cloned()
                .ok_or_else(|| ExtractError::Unreadable("unknown fixture".into()))
        }
    }

    fn included_page(drugs: &[&str]) -> RawTable {
        let mut rows = vec![vec![
            "FÁRMACO".to_string(),
            "DETENTOR".into(),
            "MEDICAMENTO".into(),
            "REGISTRO".into(),
            "CONCENTRAÇÃO".into(),
            "FORMA FARMACÊUTICA".into(),
            "DATA DE INCLUSÃO".into(),
        ]];
        for d in drugs {
            let mut r = vec![d.to_string()];
            r.extend(["LAB", "X", "1", "1 mg", "comp", "1/2/2020"].map(String::from));
            rows.push(r);
        }
        RawTable::from_text_rows(rows)
    }

    fn excluded_page(drugs: &[&str]) -> RawTable {
        let mut rows = vec![vec![
            "FÁRMACO".to_string(),
            "DETENTOR".into(),
            "MEDICAMENTO".into(),
            "REGISTRO".into(),
            "CONCENTRAÇÃO".into(),
            "FORMA FARMACÊUTICA".into(),
            "DATA DE EXCLUSÃO".into(),
            "MOTIVO DA EXCLUSÃO".into(),
        ]];
        for d in drugs {
            let mut r = vec![d.to_string()];
            r.extend(["LAB", "X", "1", "1 mg", "comp", "01022020", "cancelado"].map(String::from));
            rows.push(r);
        }
        RawTable::from_text_rows(rows)
    }

    fn cat(list: List, kind: RecordKind) -> DocumentCategory {
        DocumentCategory::new(list, kind)
    }

    fn fixture(listing_ok: bool) -> Pipeline<FixtureSource, FixtureReader> {
        let mut links = BTreeMap::new();
        let mut docs = HashMap::new();
        let mut pages = HashMap::new();

        let entries: Vec<(DocumentCategory, Vec<Option<RawTable>>)> = vec![
            (
                cat(List::A, RecordKind::Included),
                vec![Some(included_page(&["a1", "a2"]))],
            ),
            (
                cat(List::B, RecordKind::Included),
                vec![None, Some(included_page(&["b1"]))],
            ),
            (
                cat(List::A, RecordKind::Excluded),
                vec![Some(excluded_page(&["ax1"]))],
            ),
            // no recognizable header
            (
                cat(List::B, RecordKind::Excluded),
                vec![Some(RawTable::from_text_rows(vec![vec!["sem", "cabeçalho"]]))],
            ),
        ];
        for (c, doc_pages) in entries {
            let url = Url::parse(&format!("https://example.test/{}.pdf", c.slug())).unwrap();
            let key = c.slug().as_bytes().to_vec();
            docs.insert(url.to_string(), key.clone());
            pages.insert(key, doc_pages);
            links.insert(c, url);
        }

        Pipeline::new(
            FixtureSource {
                listing_ok,
                links,
                docs,
            },
            FixtureReader(pages),
            HeaderClassifier::default(),
        )
    }

    fn firsts(ds: &Dataset) -> Vec<String> {
        ds.records().iter().map(|r| r.cells()[0].clone()).collect()
    }

    #[tokio::test]
    async fn full_run_reconciles_available_halves() {
        let out = fixture(true).run().await;

        assert_eq!(out.datasets.len(), 3);
        let included = &out.combined[&RecordKind::Included];
        assert_eq!(firsts(included), ["a1", "a2", "b1"]);
        assert!(included.records().iter().all(|r| r.cells()[6] == "01.02.2020"));

        // excluded falls back to Lista A alone
        let excluded = &out.combined[&RecordKind::Excluded];
        assert_eq!(firsts(excluded), ["ax1"]);
        assert_eq!(excluded.records()[0].cells()[6], "01.02.2020");

        assert_eq!(
            out.report.categories[&cat(List::B, RecordKind::Excluded)],
            CategoryStatus::Skipped {
                reason: "no row matched the header heuristic".into()
            }
        );
        assert_eq!(out.report.combined[&RecordKind::Included], 3);
        assert!(out.report.finished_at.is_some());
    }

    #[tokio::test]
    async fn listing_failure_skips_everything() {
        let out = fixture(false).run().await;
        assert!(out.datasets.is_empty());
        assert!(out.combined.is_empty());
        assert_eq!(out.report.skipped(), 4);
    }

    #[tokio::test]
    async fn missing_link_and_failed_fetch_are_isolated() {
        let mut p = fixture(true);
        p.source.links.remove(&cat(List::A, RecordKind::Included));
        p.source
            .docs
            .remove("https://example.test/lista_a_excluidos.pdf");

        let out = p.run().await;

        assert_eq!(out.datasets.len(), 1);
        assert_eq!(firsts(&out.combined[&RecordKind::Included]), ["b1"]);
        assert!(!out.combined.contains_key(&RecordKind::Excluded));
        assert!(matches!(
            out.report.categories[&cat(List::A, RecordKind::Excluded)],
            CategoryStatus::Skipped { .. }
        ));
    }

    #[test]
    fn reconcile_with_nothing_is_empty() {
        assert!(reconcile(&BTreeMap::new(), &HeaderClassifier::default()).is_empty());
    }
}
