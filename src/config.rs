//! Runtime settings: which catalog to serve and where ratings live.
//!
//! Backend selection: a backend URL (flag or `FLURRY_BACKEND_URL`) picks the
//! REST backend unless `--offline` is set; otherwise ratings go to the local
//! JSON file (`--data`, default ~/.flurry/ratings.json).

use crate::catalog::{Catalog, CatalogError};
use crate::ratings::{FileBackend, RatingBackend, RatingStore, RestBackend};
use std::path::PathBuf;
use thiserror::Error;

/// Raw settings as collected from flags and environment.
#[derive(Debug, Clone, Default)]
pub struct ConfigInput {
    pub catalog: Option<PathBuf>,
    pub data: Option<PathBuf>,
    pub backend_url: Option<String>,
    pub backend_key: Option<String>,
    pub offline: bool,
}

/// Where ratings are persisted.
#[derive(Debug, Clone, PartialEq)]
pub enum BackendChoice {
    Rest { url: String, key: String },
    File { path: PathBuf },
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("backend URL '{0}' given without an API key (--backend-key or FLURRY_BACKEND_KEY)")]
    MissingKey(String),
}

/// Resolved settings.
#[derive(Debug, Clone)]
pub struct Settings {
    pub catalog_path: Option<PathBuf>,
    pub backend: BackendChoice,
}

impl Settings {
    pub fn resolve(input: ConfigInput) -> Result<Self, ConfigError> {
        let url = input
            .backend_url
            .map(|u| u.trim().to_string())
            .filter(|u| !u.is_empty());

        let backend = match url {
            Some(url) if !input.offline => {
                let key = input
                    .backend_key
                    .filter(|k| !k.is_empty())
                    .ok_or_else(|| ConfigError::MissingKey(url.clone()))?;
                BackendChoice::Rest { url, key }
            }
            _ => BackendChoice::File {
                path: input.data.unwrap_or_else(FileBackend::default_path),
            },
        };

        Ok(Self { catalog_path: input.catalog, backend })
    }

    /// The configured catalog, or the built-in one.
    pub fn load_catalog(&self) -> Result<Catalog, CatalogError> {
        match &self.catalog_path {
            Some(path) => Catalog::load_from(path),
            None => Ok(Catalog::builtin()),
        }
    }

    pub fn backend(&self) -> Box<dyn RatingBackend> {
        match &self.backend {
            BackendChoice::Rest { url, key } => Box::new(RestBackend::new(url.clone(), key.clone())),
            BackendChoice::File { path } => Box::new(FileBackend::open(path.clone())),
        }
    }

    /// A fresh, not yet loaded store over the configured backend.
    pub fn open_store(&self) -> RatingStore {
        RatingStore::from_boxed(self.backend())
    }

    /// Short description for the startup banner.
    pub fn backend_label(&self) -> String {
        match &self.backend {
            BackendChoice::Rest { url, .. } => format!("REST {}", url),
            BackendChoice::File { path } => format!("file {}", path.display()),
        }
    }
}
