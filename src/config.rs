// src/config.rs

use anyhow::{Context, Result};
use serde::Deserialize;
use std::{
    env, fs,
    path::{Path, PathBuf},
    time::Duration,
};
use tracing::{debug, info};

use crate::process::header::{DEFAULT_HEADER_KEYWORDS, DEFAULT_HEADER_THRESHOLD};
use crate::process::HeaderClassifier;

pub const DEFAULT_BASE_URL: &str = "https://www.gov.br/anvisa/pt-br/setorregulado/regularizacao/medicamentos/medicamentos-de-referencia/lista-de-medicamentos-de-referencia";
pub const DEFAULT_LINK_BASE: &str = "https://www.gov.br";
pub const DEFAULT_USER_AGENT: &str =
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36";

/// Runtime settings. Every field has a default, so an empty or missing
/// YAML file is a valid configuration.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Page that lists the PDF documents.
    pub base_url: String,
    /// Origin used to absolutize relative PDF links.
    pub link_base: String,
    pub user_agent: String,
    pub timeout_secs: u64,
    pub max_retries: u32,
    pub retry_delay_ms: u64,
    pub output_dir: PathBuf,
    pub header: HeaderConfig,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct HeaderConfig {
    pub keywords: Vec<String>,
    pub threshold: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            link_base: DEFAULT_LINK_BASE.to_string(),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            timeout_secs: 30,
            max_retries: 3,
            retry_delay_ms: 500,
            output_dir: PathBuf::from("."),
            header: HeaderConfig::default(),
        }
    }
}

impl Default for HeaderConfig {
    fn default() -> Self {
        Self {
            keywords: DEFAULT_HEADER_KEYWORDS.iter().map(|k| k.to_string()).collect(),
            threshold: DEFAULT_HEADER_THRESHOLD,
        }
    }
}

impl From<&HeaderConfig> for HeaderClassifier {
    fn from(cfg: &HeaderConfig) -> Self {
        HeaderClassifier::new(cfg.keywords.iter().cloned(), cfg.threshold)
    }
}

impl Config {
    /// Load from `path` (YAML) if given, then apply `REFDRUGS_*` overrides.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut cfg = match path {
            Some(p) => Self::from_yaml_file(p)?,
            None => {
                debug!("no config file given; using defaults");
                Self::default()
            }
        };
        cfg.apply_env_overrides(|k| env::var(k).ok())?;
        Ok(cfg)
    }

    pub fn from_yaml_file(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        let cfg = Self::from_yaml_str(&text)
            .with_context(|| format!("parsing config {}", path.display()))?;
        info!(path = %path.display(), "loaded config");
        Ok(cfg)
    }

    pub fn from_yaml_str(text: &str) -> Result<Self> {
        if text.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yaml::from_str(text)?)
    }

    /// `lookup` is `env::var` in production and a map in tests.
    pub fn apply_env_overrides<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(v) = lookup("REFDRUGS_BASE_URL") {
            self.base_url = v;
        }
        if let Some(v) = lookup("REFDRUGS_OUTPUT_DIR") {
            self.output_dir = PathBuf::from(v);
        }
        if let Some(v) = lookup("REFDRUGS_TIMEOUT_SECS") {
            self.timeout_secs = v
                .trim()
                .parse()
                .with_context(|| format!("REFDRUGS_TIMEOUT_SECS={:?} is not a number", v))?;
        }
        Ok(())
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn retry_delay(&self) -> Duration {
        Duration::from_millis(self.retry_delay_ms)
    }

    pub fn classifier(&self) -> HeaderClassifier {
        HeaderClassifier::from(&self.header)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn defaults_match_the_published_layout() {
        let cfg = Config::default();
        assert_eq!(cfg.timeout(), Duration::from_secs(30));
        assert_eq!(cfg.classifier(), HeaderClassifier::default());
    }

    #[test]
    fn partial_yaml_keeps_other_defaults() {
        let cfg = Config::from_yaml_str(
            "output_dir: out\nheader:\n  keywords: [COL, NAME]\n  threshold: 2\n",
        )
        .unwrap();
        assert_eq!(cfg.output_dir, PathBuf::from("out"));
        assert_eq!(cfg.base_url, DEFAULT_BASE_URL);
        assert_eq!(cfg.classifier().threshold(), 2);
        assert!(cfg.classifier().is_header(&["col", "name"]));
    }

    #[test]
    fn empty_yaml_is_default() {
        assert_eq!(Config::from_yaml_str("  \n").unwrap(), Config::default());
    }

    #[test]
    fn non_numeric_timeout_is_rejected() {
        assert!(Config::from_yaml_str("timeout_secs: soon").is_err());
    }

    #[test]
    fn env_overrides_win() {
        let vars: HashMap<&str, &str> = [
            ("REFDRUGS_OUTPUT_DIR", "/tmp/refs"),
            ("REFDRUGS_TIMEOUT_SECS", " 5 "),
        ]
        .into_iter()
        .collect();
        let mut cfg = Config::default();
        cfg.apply_env_overrides(|k| vars.get(k).map(|v| v.to_string()))
            .unwrap();
        assert_eq!(cfg.output_dir, PathBuf::from("/tmp/refs"));
        assert_eq!(cfg.timeout_secs, 5);

        let mut bad = Config::default();
        assert!(bad
            .apply_env_overrides(|k| (k == "REFDRUGS_TIMEOUT_SECS").then(|| "x".to_string()))
            .is_err());
    }

    #[test]
    fn loads_from_file() {
        let mut tmp = NamedTempFile::new().unwrap();
        writeln!(tmp, "timeout_secs: 12\nmax_retries: 1").unwrap();
        let cfg = Config::from_yaml_file(tmp.path()).unwrap();
        assert_eq!(cfg.timeout_secs, 12);
        assert_eq!(cfg.max_retries, 1);
    }
}
