//! Module scaffolding
//!
//! - [`ScaffoldGenerator`] creates a complete module skeleton and registers it
//! - [`ControllerGenerator`] and [`MigrationGenerator`] add one artifact to an
//!   existing module
//! - [`OptimizeHook`] runs after a successful scaffold
//!
//! Generation is not transactional. If a write fails part way through, whatever
//! was already created stays on disk and the error is returned.

mod controller;
mod generator;
mod hooks;
mod migration;

pub use controller::ControllerGenerator;
pub use generator::{ScaffoldGenerator, ScaffoldReport, SUBFOLDERS};
pub use hooks::{ManifestCache, NoopHook, OptimizeHook, MANIFEST_FILE};
pub use migration::MigrationGenerator;

use crate::error::{RegistryError, RegistryResult};
use crate::module::Slug;
use crate::registry::Registry;
use std::fs;
use std::path::{Path, PathBuf};

/// Generator for a single artifact inside an existing module
pub trait ArtifactGenerator {
    /// Render and write the artifact, returning the written path
    ///
    /// Existing files at the target path are overwritten.
    ///
    /// # Errors
    ///
    /// Returns `InvalidArtifactName` or `NotFound` (before any write) if the
    /// name normalises to nothing or the module does not exist, or `Io` if the
    /// file cannot be written.
    fn generate(&self, slug: &Slug, artifact_name: &str) -> RegistryResult<PathBuf>;
}

/// Directory of an existing module
fn require_module(registry: &Registry, slug: &Slug) -> RegistryResult<PathBuf> {
    if !registry.exists(slug)? {
        return Err(RegistryError::NotFound(slug.to_string()));
    }
    registry.resolve_path(slug, false)
}

/// Normalised artifact name, rejected when it has no letters or digits left
fn require_name(input: &str, normalized: String) -> RegistryResult<String> {
    if normalized.chars().any(|c| c.is_ascii_alphanumeric()) {
        Ok(normalized)
    } else {
        Err(RegistryError::InvalidArtifactName(input.to_string()))
    }
}

fn create_dir(path: &Path) -> RegistryResult<()> {
    fs::create_dir_all(path).map_err(|e| RegistryError::io(path, e))?;
    tracing::debug!(path = %path.display(), "Created directory");
    Ok(())
}

fn write_file(path: &Path, contents: &str) -> RegistryResult<()> {
    fs::write(path, contents).map_err(|e| RegistryError::io(path, e))?;
    tracing::debug!(path = %path.display(), bytes = contents.len(), "Wrote file");
    Ok(())
}
