// src/fetch/mod.rs
pub mod download;
pub mod links;

use anyhow::{Context, Result};
use reqwest::Client;
use std::collections::BTreeMap;
use std::time::Duration;
use tracing::info;
use url::Url;

use crate::config::Config;
use crate::error::FetchError;
use crate::schema::DocumentCategory;

pub use links::resolve_links;

/// Where documents come from. `HttpSource` in production; tests plug in
/// an in-memory source.
#[allow(async_fn_in_trait)]
pub trait DocumentSource {
    /// Locate the document of each category. A category may be missing.
    async fn listing(&self) -> Result<BTreeMap<DocumentCategory, Url>, FetchError>;

    /// Raw bytes of one document.
    async fn fetch(&self, url: &Url) -> Result<Vec<u8>, FetchError>;
}

/// Scrapes the listing page and downloads PDFs over HTTP.
pub struct HttpSource {
    client: Client,
    base_url: Url,
    link_base: Url,
    max_retries: u32,
    retry_delay: Duration,
}

impl HttpSource {
    pub fn new(cfg: &Config) -> Result<Self> {
        let client = Client::builder()
            .user_agent(cfg.user_agent.clone())
            .timeout(cfg.timeout())
            .cookie_store(true)
            .build()
            .context("building HTTP client")?;
        let base_url = Url::parse(&cfg.base_url)
            .with_context(|| format!("parsing base_url {}", cfg.base_url))?;
        let link_base = Url::parse(&cfg.link_base)
            .with_context(|| format!("parsing link_base {}", cfg.link_base))?;
        Ok(Self {
            client,
            base_url,
            link_base,
            max_retries: cfg.max_retries,
            retry_delay: cfg.retry_delay(),
        })
    }
}

impl DocumentSource for HttpSource {
    async fn listing(&self) -> Result<BTreeMap<DocumentCategory, Url>, FetchError> {
        info!(url = %self.base_url, "fetching listing page");
        let html = download::get_text_with_retry(
            &self.client,
            self.base_url.as_str(),
            self.max_retries,
            self.retry_delay,
        )
        .await?;
        Ok(resolve_links(&html, &self.link_base))
    }

    async fn fetch(&self, url: &Url) -> Result<Vec<u8>, FetchError> {
        let bytes = download::get_bytes_with_retry(
            &self.client,
            url.as_str(),
            self.max_retries,
            self.retry_delay,
        )
        .await?;
        info!(%url, bytes = bytes.len(), "downloaded document");
        Ok(bytes)
    }
}
