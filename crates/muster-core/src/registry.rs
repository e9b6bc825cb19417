//! Directory-backed store of enrolled identities.
//!
//! One PNG per identity, named `<name>.png`. There is no in-memory cache:
//! every [`Registry::list`] re-reads and re-decodes the directory, so the
//! store can be inspected or pruned externally between calls.

use crate::identity::{Identity, IdentityName};
use image::GrayImage;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// File extension used for stored reference images.
const REFERENCE_EXT: &str = "png";

#[derive(Error, Debug)]
pub enum RegistryError {
    #[error("registry I/O failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to encode reference image: {0}")]
    Image(#[from] image::ImageError),
}

/// Handle to a registry directory. The directory itself is created lazily
/// on the first [`add`](Registry::add).
pub struct Registry {
    dir: PathBuf,
}

impl Registry {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Persist `reference` as the image for `name`, silently overwriting
    /// any prior reference for the same name.
    pub fn add(&self, name: &IdentityName, reference: &GrayImage) -> Result<PathBuf, RegistryError> {
        fs::create_dir_all(&self.dir)?;
        let path = self.reference_path(name);
        reference.save(&path)?;
        tracing::info!(name = %name, path = %path.display(), "stored reference image");
        Ok(path)
    }

    /// Enumerate every stored identity, decoding each reference fresh.
    ///
    /// Entries come back in file-name order so repeated scans see the same
    /// sequence. Files with other extensions are ignored; references that
    /// fail to decode or carry an invalid name are skipped with a warning.
    pub fn list(&self) -> Result<Vec<Identity>, RegistryError> {
        if !self.dir.exists() {
            return Ok(Vec::new());
        }

        let mut paths: Vec<PathBuf> = fs::read_dir(&self.dir)?
            .filter_map(|entry| entry.ok().map(|e| e.path()))
            .filter(|p| p.extension().and_then(|e| e.to_str()) == Some(REFERENCE_EXT))
            .collect();
        paths.sort();

        let mut identities = Vec::with_capacity(paths.len());
        for path in paths {
            let Some(stem) = path.file_stem().and_then(|s| s.to_str()) else {
                continue;
            };
            let name = match IdentityName::parse(stem) {
                Ok(name) => name,
                Err(e) => {
                    tracing::warn!(path = %path.display(), error = %e, "skipping reference with invalid name");
                    continue;
                }
            };
            match image::open(&path) {
                Ok(decoded) => identities.push(Identity {
                    name,
                    reference: decoded.into_luma8(),
                }),
                Err(e) => {
                    tracing::warn!(path = %path.display(), error = %e, "skipping undecodable reference");
                }
            }
        }

        Ok(identities)
    }

    fn reference_path(&self, name: &IdentityName) -> PathBuf {
        self.dir.join(format!("{}.{REFERENCE_EXT}", name.as_str()))
    }
}
