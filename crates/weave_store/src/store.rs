//! Named descriptor files under a store directory.
//!
//! Each kind of descriptor lives in its own subdirectory:
//! `<root>/<kind>/<name>.json`.

use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fmt;
use std::path::{Path, PathBuf};
use weave_fabric::{EmbeddedTileDescriptor, ModuleDescriptor, RawTileDescriptor};

use crate::envelope::Envelope;
use crate::error::StoreError;

const EXTENSION: &str = "json";

/// The kinds of descriptor a store holds.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ArtifactKind {
    /// Abstract tiles awaiting embedding.
    RawTile,
    /// Embedded tiles.
    Tile,
    /// Composed modules.
    Module,
}

impl ArtifactKind {
    /// Subdirectory name under the store root.
    pub fn subdir(self) -> &'static str {
        match self {
            ArtifactKind::RawTile => "raw_tiles",
            ArtifactKind::Tile => "tiles",
            ArtifactKind::Module => "modules",
        }
    }

    /// Human-readable name used in error messages.
    pub fn describe(self) -> &'static str {
        match self {
            ArtifactKind::RawTile => "raw tile",
            ArtifactKind::Tile => "tile",
            ArtifactKind::Module => "module",
        }
    }
}

impl fmt::Display for ArtifactKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.describe())
    }
}

/// Reads and writes descriptors by name.
#[derive(Debug, Clone)]
pub struct DescriptorStore {
    root: PathBuf,
}

fn check_name(name: &str) -> Result<(), StoreError> {
    let legal = |c: char| c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.');
    if name.is_empty() || name.starts_with('.') || !name.chars().all(legal) {
        return Err(StoreError::InvalidName(name.to_string()));
    }
    Ok(())
}

impl DescriptorStore {
    /// Creates a store rooted at `root`. Nothing is created on disk until
    /// the first save.
    pub fn new(root: &Path) -> Self {
        Self {
            root: root.to_path_buf(),
        }
    }

    /// The store directory.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// File path of the descriptor `name` of `kind`.
    pub fn path(&self, kind: ArtifactKind, name: &str) -> PathBuf {
        self.root.join(kind.subdir()).join(format!("{name}.{EXTENSION}"))
    }

    /// Returns `true` if a descriptor with this name exists.
    pub fn contains(&self, kind: ArtifactKind, name: &str) -> bool {
        check_name(name).is_ok() && self.path(kind, name).is_file()
    }

    /// Writes `descriptor` under `name`, replacing any previous version.
    pub fn save<T: Serialize>(
        &self,
        kind: ArtifactKind,
        name: &str,
        descriptor: &T,
    ) -> Result<PathBuf, StoreError> {
        check_name(name)?;
        let dir = self.root.join(kind.subdir());
        std::fs::create_dir_all(&dir).map_err(|e| StoreError::Io {
            path: dir.clone(),
            source: e,
        })?;

        let path = self.path(kind, name);
        let malformed = |e: serde_json::Error| StoreError::Serialization {
            path: path.clone(),
            reason: e.to_string(),
        };
        let envelope = Envelope::seal(descriptor).map_err(malformed)?;
        let text = serde_json::to_string_pretty(&envelope).map_err(malformed)?;
        std::fs::write(&path, text).map_err(|e| StoreError::Io {
            path: path.clone(),
            source: e,
        })?;
        Ok(path)
    }

    /// Reads and validates the descriptor `name`.
    pub fn load<T: DeserializeOwned>(&self, kind: ArtifactKind, name: &str) -> Result<T, StoreError> {
        check_name(name)?;
        let path = self.path(kind, name);
        let text = match std::fs::read_to_string(&path) {
            Ok(text) => text,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(StoreError::NotFound {
                    kind: kind.describe(),
                    name: name.to_string(),
                })
            }
            Err(e) => return Err(StoreError::Io { path, source: e }),
        };
        let envelope: Envelope =
            serde_json::from_str(&text).map_err(|e| StoreError::Serialization {
                path: path.clone(),
                reason: e.to_string(),
            })?;
        envelope.open(&path)
    }

    /// Names of all stored descriptors of `kind`, sorted.
    pub fn list(&self, kind: ArtifactKind) -> Result<Vec<String>, StoreError> {
        let dir = self.root.join(kind.subdir());
        if !dir.exists() {
            return Ok(Vec::new());
        }
        let entries = std::fs::read_dir(&dir).map_err(|e| StoreError::Io {
            path: dir.clone(),
            source: e,
        })?;

        let mut names = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|e| StoreError::Io {
                path: dir.clone(),
                source: e,
            })?;
            let path = entry.path();
            if path.extension().and_then(|e| e.to_str()) == Some(EXTENSION) {
                if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
                    names.push(stem.to_string());
                }
            }
        }
        names.sort();
        Ok(names)
    }

    /// Saves a raw tile under its own name.
    pub fn save_raw_tile(&self, raw: &RawTileDescriptor) -> Result<PathBuf, StoreError> {
        self.save(ArtifactKind::RawTile, &raw.name, raw)
    }

    /// Loads a raw tile.
    pub fn load_raw_tile(&self, name: &str) -> Result<RawTileDescriptor, StoreError> {
        self.load(ArtifactKind::RawTile, name)
    }

    /// Saves an embedded tile under its own name.
    pub fn save_tile(&self, tile: &EmbeddedTileDescriptor) -> Result<PathBuf, StoreError> {
        self.save(ArtifactKind::Tile, &tile.name, tile)
    }

    /// Loads an embedded tile.
    pub fn load_tile(&self, name: &str) -> Result<EmbeddedTileDescriptor, StoreError> {
        self.load(ArtifactKind::Tile, name)
    }

    /// Saves a module under its own name.
    pub fn save_module(&self, module: &ModuleDescriptor) -> Result<PathBuf, StoreError> {
        self.save(ArtifactKind::Module, &module.name, module)
    }

    /// Loads a module.
    pub fn load_module(&self, name: &str) -> Result<ModuleDescriptor, StoreError> {
        self.load(ArtifactKind::Module, name)
    }
}
