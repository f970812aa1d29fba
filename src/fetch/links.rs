// src/fetch/links.rs
use once_cell::sync::Lazy;
use scraper::{Html, Selector};
use std::collections::BTreeMap;
use tracing::{info, trace, warn};
use url::Url;

use crate::schema::{DocumentCategory, List, RecordKind};

static ANCHOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse("a[href]").expect("CSS selector for links should be valid"));

/// Classify a link by its visible text. Only "lista a"/"lista b" anchors
/// count; "excluído" anywhere in the text marks the excluded list.
pub fn classify_link_text(text: &str) -> Option<DocumentCategory> {
    let text = text.to_lowercase();
    let list = if text.contains("lista a") {
        List::A
    } else if text.contains("lista b") {
        List::B
    } else {
        return None;
    };
    let kind = if text.contains("excluído") {
        RecordKind::Excluded
    } else {
        RecordKind::Included
    };
    Some(DocumentCategory::new(list, kind))
}

/// Find the PDF link of each category on the listing page.
///
/// Relative hrefs are joined onto `link_base`. When a category appears more
/// than once, the last link on the page wins.
pub fn resolve_links(html: &str, link_base: &Url) -> BTreeMap<DocumentCategory, Url> {
    let doc = Html::parse_document(html);
    let mut out = BTreeMap::new();

    for el in doc.select(&ANCHOR) {
        let Some(href) = el.value().attr("href") else {
            continue;
        };
        if !href.trim().to_lowercase().ends_with(".pdf") {
            continue;
        }
        let text = el.text().collect::<String>();
        let Some(category) = classify_link_text(text.trim()) else {
            trace!(href, "pdf link without a list label");
            continue;
        };
        match link_base.join(href.trim()) {
            Ok(url) => {
                trace!(category = %category, url = %url, "found document link");
                out.insert(category, url);
            }
            Err(e) => warn!(href, error = %e, "unusable document link"),
        }
    }

    info!(
        categories = ?out.keys().map(|c| c.slug()).collect::<Vec<_>>(),
        "resolved document links"
    );
    out
}
