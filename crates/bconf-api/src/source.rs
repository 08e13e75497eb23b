use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use bconf_build::{Catalog, Preset};
use reqwest::blocking::Client;
use serde::de::DeserializeOwned;

use crate::Config;

/// Where catalogs and presets come from
pub trait CatalogSource {
    fn fetch_catalog(&self) -> Result<Catalog>;
    fn fetch_presets(&self) -> Result<Vec<Preset>>;

    /// Human-readable origin, for log and status lines
    fn describe(&self) -> String;
}

/// The catalog service over HTTP
#[derive(Debug, Clone)]
pub struct HttpSource {
    base_url: String,
    timeout: Duration,
}

impl HttpSource {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            timeout,
        }
    }

    pub fn from_config(config: &Config) -> Result<Self> {
        Ok(Self::new(config.api_base_url()?, config.timeout()))
    }

    pub fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        let url = self.endpoint(path);
        log::debug!("GET {url}");

        let client = Client::builder().timeout(self.timeout).build()?;
        let response = client
            .get(&url)
            .send()
            .with_context(|| format!("Failed to reach {url}"))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().unwrap_or_default();
            anyhow::bail!("Request to {} failed ({}): {}", url, status, error_text);
        }

        response
            .json()
            .with_context(|| format!("Failed to parse response from {url}"))
    }
}

impl CatalogSource for HttpSource {
    fn fetch_catalog(&self) -> Result<Catalog> {
        let catalog: Catalog = self.get_json("components")?;
        log::info!("Fetched {} catalog options from {}", catalog.len(), self.base_url);
        Ok(catalog)
    }

    fn fetch_presets(&self) -> Result<Vec<Preset>> {
        self.get_json("presets")
    }

    fn describe(&self) -> String {
        self.base_url.clone()
    }
}

/// Catalog and presets read from local JSON files
#[derive(Debug, Clone)]
pub struct FileSource {
    catalog: PathBuf,
    presets: Option<PathBuf>,
}

impl FileSource {
    /// Presets default to `presets.json` next to the catalog file
    pub fn new(catalog: impl Into<PathBuf>) -> Self {
        let catalog = catalog.into();
        let presets = catalog.with_file_name("presets.json");
        Self {
            catalog,
            presets: Some(presets),
        }
    }

    pub fn with_presets(mut self, presets: Option<PathBuf>) -> Self {
        self.presets = presets;
        self
    }
}

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let contents =
        fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))?;
    serde_json::from_str(&contents).with_context(|| format!("Failed to parse {}", path.display()))
}

impl CatalogSource for FileSource {
    fn fetch_catalog(&self) -> Result<Catalog> {
        read_json(&self.catalog)
    }

    fn fetch_presets(&self) -> Result<Vec<Preset>> {
        match &self.presets {
            Some(path) if path.exists() => read_json(path),
            Some(path) => {
                log::debug!("No preset file at {}", path.display());
                Ok(Vec::new())
            }
            None => Ok(Vec::new()),
        }
    }

    fn describe(&self) -> String {
        self.catalog.display().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bconf_build::Category;

    #[test]
    fn test_endpoints() {
        let source = HttpSource::new("http://localhost:8000/", Duration::from_secs(1));
        assert_eq!(source.endpoint("components"), "http://localhost:8000/components");
        assert_eq!(source.endpoint("/presets"), "http://localhost:8000/presets");
    }

    #[test]
    fn test_file_source() {
        let dir = tempfile::tempdir().unwrap();
        let catalog_path = dir.path().join("catalog.json");
        fs::write(
            &catalog_path,
            r#"{"SSD": [{"name": "NVMe 512GB", "price": 2500, "capacity_gb": 512}]}"#,
        )
        .unwrap();

        let source = FileSource::new(&catalog_path);
        let catalog = source.fetch_catalog().unwrap();
        assert!(catalog.contains(Category::Ssd, "NVMe 512GB"));
        assert!(source.fetch_presets().unwrap().is_empty());

        fs::write(
            dir.path().join("presets.json"),
            r#"[{"name": "Tiny", "components": {"SSD": "NVMe 512GB"}}]"#,
        )
        .unwrap();
        let presets = source.fetch_presets().unwrap();
        assert_eq!(presets.len(), 1);
        assert_eq!(presets[0].components.kit_count(Category::Ssd, "NVMe 512GB"), 1);
    }

    #[test]
    fn test_missing_catalog_file_names_the_path() {
        let source = FileSource::new("/nonexistent/catalog.json");
        let err = source.fetch_catalog().unwrap_err();
        assert!(err.to_string().contains("/nonexistent/catalog.json"));
    }
}
