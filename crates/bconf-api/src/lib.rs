//! Catalog service access for bconf.

pub mod config;
pub mod source;

pub use config::{API_URL_ENV, Config, ENVIRONMENT_ENV, Environment, config_file_path};
pub use source::{CatalogSource, FileSource, HttpSource};
