//! State shared by every subcommand: where the catalog comes from and where
//! the build file lives.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use atomicwrites::{AtomicFile, OverwriteBehavior};
use bconf_api::{CatalogSource, Config, FileSource, HttpSource};
use bconf_build::{Catalog, NamingOptions, Preset, Selection};
use indicatif::ProgressBar;

pub struct Session {
    pub config: Config,
    source: Box<dyn CatalogSource>,
    build_path: PathBuf,
}

impl Session {
    pub fn new(catalog: Option<PathBuf>, presets: Option<PathBuf>, build_path: PathBuf) -> Result<Self> {
        let config = Config::load()?;
        let source: Box<dyn CatalogSource> = match catalog {
            Some(path) => {
                let file = FileSource::new(path);
                Box::new(match presets {
                    Some(p) => file.with_presets(Some(p)),
                    None => file,
                })
            }
            None => Box::new(HttpSource::from_config(&config)?),
        };
        log::debug!("Catalog source: {}", source.describe());

        Ok(Self {
            config,
            source,
            build_path,
        })
    }

    pub fn naming(&self) -> NamingOptions {
        self.config.naming_options()
    }

    fn with_spinner<T>(&self, what: &str, f: impl FnOnce() -> Result<T>) -> Result<T> {
        let spinner = ProgressBar::new_spinner();
        spinner.enable_steady_tick(Duration::from_millis(100));
        spinner.set_message(format!("Fetching {what} from {}...", self.source.describe()));
        let result = f();
        spinner.finish_and_clear();
        result
    }

    pub fn catalog(&self) -> Result<Catalog> {
        self.with_spinner("catalog", || self.source.fetch_catalog())
            .context("Failed to load catalog")
    }

    pub fn presets(&self) -> Result<Vec<Preset>> {
        self.with_spinner("presets", || self.source.fetch_presets())
            .context("Failed to load presets")
    }

    pub fn build_path(&self) -> &Path {
        &self.build_path
    }

    /// The saved build; a missing file is an empty build
    pub fn load_selection(&self) -> Result<Selection> {
        if !self.build_path.exists() {
            return Ok(Selection::new());
        }
        let contents = fs::read_to_string(&self.build_path)
            .with_context(|| format!("Failed to read {}", self.build_path.display()))?;
        serde_json::from_str(&contents)
            .with_context(|| format!("Invalid build file {}", self.build_path.display()))
    }

    pub fn save_selection(&self, selection: &Selection) -> Result<()> {
        if let Some(parent) = self.build_path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        let contents = serde_json::to_string_pretty(selection)?;
        AtomicFile::new(&self.build_path, OverwriteBehavior::AllowOverwrite)
            .write(|f| {
                f.write_all(contents.as_bytes())?;
                f.write_all(b"\n")?;
                f.flush()
            })
            .map_err(|err| {
                anyhow::anyhow!("Failed to write {}: {err}", self.build_path.display())
            })?;
        log::debug!("Saved build to {}", self.build_path.display());
        Ok(())
    }
}
