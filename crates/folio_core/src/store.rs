//! Keyed lookup of raw markdown bodies and their metadata.
//!
//! The renderer never touches storage; callers fetch a [`Content`] here and
//! hand its `body` to [`crate::parse`].

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Invalid content id {0:?}")]
    InvalidId(String),

    #[error("Failed to read {path}: {source}")]
    Read { path: PathBuf, source: io::Error },

    #[error("Failed to parse metadata at {path}: {source}")]
    Metadata {
        path: PathBuf,
        source: toml::de::Error,
    },
}

/// Descriptive fields kept alongside a markdown body, never inside it.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Metadata {
    pub title: String,
    pub description: String,
    pub tags: Vec<String>,
    pub date: String,
    pub category: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Content {
    pub id: String,
    pub metadata: Metadata,
    pub body: String,
}

pub trait ContentStore {
    /// Look up one item. `Ok(None)` means no such id.
    fn get(&self, id: &str) -> Result<Option<Content>, StoreError>;

    /// All known ids, sorted.
    fn ids(&self) -> Result<Vec<String>, StoreError>;
}

#[derive(Debug, Default)]
pub struct MemoryStore {
    items: BTreeMap<String, (Metadata, String)>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, id: impl Into<String>, metadata: Metadata, body: impl Into<String>) {
        self.items.insert(id.into(), (metadata, body.into()));
    }
}

impl ContentStore for MemoryStore {
    fn get(&self, id: &str) -> Result<Option<Content>, StoreError> {
        Ok(self.items.get(id).map(|(metadata, body)| Content {
            id: id.to_string(),
            metadata: metadata.clone(),
            body: body.clone(),
        }))
    }

    fn ids(&self) -> Result<Vec<String>, StoreError> {
        Ok(self.items.keys().cloned().collect())
    }
}

/// Content laid out as `<dir>/<id>.md` with optional `<dir>/<id>.toml`
/// metadata next to it.
#[derive(Debug, Clone)]
pub struct DirectoryStore {
    root: PathBuf,
}

impl DirectoryStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn metadata_for(&self, id: &str) -> Result<Metadata, StoreError> {
        let path = self.root.join(format!("{id}.toml"));
        let content = match fs::read_to_string(&path) {
            Ok(content) => content,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                return Ok(Metadata {
                    title: id.to_string(),
                    ..Metadata::default()
                });
            }
            Err(source) => return Err(StoreError::Read { path, source }),
        };
        toml::from_str(&content).map_err(|source| StoreError::Metadata { path, source })
    }
}

impl ContentStore for DirectoryStore {
    fn get(&self, id: &str) -> Result<Option<Content>, StoreError> {
        validate_id(id)?;

        let path = self.root.join(format!("{id}.md"));
        let body = match fs::read_to_string(&path) {
            Ok(body) => body,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(source) => return Err(StoreError::Read { path, source }),
        };
        let metadata = self.metadata_for(id)?;

        log::debug!("loaded {id} from {}", path.display());
        Ok(Some(Content {
            id: id.to_string(),
            metadata,
            body,
        }))
    }

    fn ids(&self) -> Result<Vec<String>, StoreError> {
        let read_err = |source| StoreError::Read {
            path: self.root.clone(),
            source,
        };

        let mut ids = Vec::new();
        for entry in fs::read_dir(&self.root).map_err(read_err)? {
            let path = entry.map_err(read_err)?.path();
            if !path.is_file() || path.extension().is_none_or(|ext| ext != "md") {
                continue;
            }
            if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
                ids.push(stem.to_string());
            }
        }
        ids.sort();
        Ok(ids)
    }
}

/// Ids name a single file stem; anything that could walk the tree is refused.
fn validate_id(id: &str) -> Result<(), StoreError> {
    if id.is_empty() || id.contains(['/', '\\']) || id.contains("..") {
        return Err(StoreError::InvalidId(id.to_string()));
    }
    Ok(())
}
