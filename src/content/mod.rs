//! Content catalog: categories, per-category manifests and dialogue documents.
//!
//! Documents are fetched through a [`ContentSource`]. [`FsSource`] serves them
//! from a local `public/` directory, mapping web paths such as
//! `/content/conversation/office/manifest.json` onto files below it.

pub mod base_url;
pub mod catalog;
pub mod script;

use std::collections::HashMap;
use std::path::{Component, Path, PathBuf};
use std::time::SystemTime;

pub use base_url::with_base;
pub use catalog::{Catalog, Category, Dialogue, DialogueMetadata, Manifest, ManifestItem, Turn};
pub use script::{DialogueScript, ScriptLine};

/// Web path of the top-level catalog.
pub const CATALOG_PATH: &str = "/content/conversation/categories.json";

#[derive(thiserror::Error, Debug)]
pub enum ContentError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Invalid content JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Content not found: {0}")]
    NotFound(String),
    #[error("HTTP {0}")]
    Http(u16),
}

/// Fetches content documents by web path.
pub trait ContentSource {
    fn fetch(&self, path: &str) -> Result<String, ContentError>;
}

/// Serves content from a directory that mirrors the site root.
#[derive(Debug, Clone)]
pub struct FsSource {
    root: PathBuf,
}

impl FsSource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Map a web path onto the filesystem, refusing to leave the root.
    pub fn resolve(&self, path: &str) -> Result<PathBuf, ContentError> {
        let relative = Path::new(path.trim_start_matches('/'));
        if relative
            .components()
            .any(|c| !matches!(c, Component::Normal(_) | Component::CurDir))
        {
            return Err(ContentError::NotFound(path.to_string()));
        }
        Ok(self.root.join(relative))
    }
}

impl ContentSource for FsSource {
    fn fetch(&self, path: &str) -> Result<String, ContentError> {
        let file = self.resolve(path)?;
        match std::fs::read_to_string(&file) {
            Ok(content) => Ok(content),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                Err(ContentError::NotFound(path.to_string()))
            }
            Err(e) => Err(e.into()),
        }
    }
}

/// A manifest and the path it was fetched from.
#[derive(Debug, Clone)]
struct LoadedManifest {
    manifest: Manifest,
    path: String,
}

/// Loaded categories and manifests.
pub struct ContentLibrary<S> {
    source: S,
    categories: Vec<Category>,
    error: Option<String>,
    last_loaded_at: Option<SystemTime>,
    manifests: HashMap<String, LoadedManifest>,
    manifest_error: Option<String>,
}

impl<S: ContentSource> ContentLibrary<S> {
    pub fn new(source: S) -> Self {
        Self {
            source,
            categories: Vec::new(),
            error: None,
            last_loaded_at: None,
            manifests: HashMap::new(),
            manifest_error: None,
        }
    }

    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    /// Message of the last failed [`ContentLibrary::load_categories`].
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Message of the last failed [`ContentLibrary::load_manifest`].
    pub fn manifest_error(&self) -> Option<&str> {
        self.manifest_error.as_deref()
    }

    /// When the catalog was last loaded successfully.
    pub fn last_loaded_at(&self) -> Option<SystemTime> {
        self.last_loaded_at
    }

    pub fn manifest(&self, category_id: &str) -> Option<&Manifest> {
        self.manifests.get(category_id).map(|m| &m.manifest)
    }

    /// Path the manifest of `category_id` was fetched from, for use with [`with_base`].
    pub fn manifest_path(&self, category_id: &str) -> Option<&str> {
        self.manifests.get(category_id).map(|m| m.path.as_str())
    }

    /// Load the catalog unless categories are already present and `force` is unset.
    ///
    /// On failure the category list is emptied and the message kept in
    /// [`ContentLibrary::error`].
    pub fn load_categories(&mut self, force: bool) {
        if !force && !self.categories.is_empty() {
            return;
        }
        self.error = None;
        match self
            .source
            .fetch(CATALOG_PATH)
            .and_then(|raw| Catalog::from_json(&raw))
        {
            Ok(catalog) => {
                log::info!("Loaded {} categories", catalog.categories.len());
                self.categories = catalog.categories;
                self.last_loaded_at = Some(SystemTime::now());
            }
            Err(e) => {
                log::warn!("Failed to load categories: {e}");
                self.error = Some(e.to_string());
                self.categories.clear();
            }
        }
    }

    /// Load the manifest of `category`, reusing an already loaded non-empty one.
    pub fn load_manifest(&mut self, category: &Category) -> Result<&Manifest, ContentError> {
        let id = &category.id;
        let cached = self
            .manifests
            .get(id)
            .is_some_and(|m| !m.manifest.items.is_empty());
        if !cached {
            let loaded = self.fetch_manifest(category)?;
            self.manifests.insert(id.clone(), loaded);
        }
        Ok(&self.manifests[id].manifest)
    }

    fn fetch_manifest(&mut self, category: &Category) -> Result<LoadedManifest, ContentError> {
        self.manifest_error = None;
        let path = category.manifest_path();
        match self
            .source
            .fetch(&path)
            .and_then(|raw| Manifest::from_json(&raw))
        {
            Ok(manifest) => {
                log::debug!("Loaded manifest {path} with {} items", manifest.items.len());
                Ok(LoadedManifest { manifest, path })
            }
            Err(e) => {
                log::warn!("Failed to load manifest {path}: {e}");
                self.manifest_error = Some(e.to_string());
                Err(e)
            }
        }
    }

    pub fn load_dialogue(&self, item: &ManifestItem) -> Result<Dialogue, ContentError> {
        let raw = self.source.fetch(&item.path)?;
        Dialogue::from_json(&raw)
    }
}
