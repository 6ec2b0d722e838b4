//! Migration generator

use super::{create_dir, require_module, require_name, write_file, ArtifactGenerator};
use crate::error::RegistryResult;
use crate::module::Slug;
use crate::naming::Naming;
use crate::registry::Registry;
use crate::template::{Bindings, Placeholder, Stub, StubStore, TemplateRenderer};
use chrono::{DateTime, Utc};
use std::path::PathBuf;

/// Writes `database/migrations/<timestamp>_create_<table>_table.sql` into an
/// existing module
pub struct MigrationGenerator<'a> {
    registry: &'a Registry,
    stubs: StubStore,
    now: fn() -> DateTime<Utc>,
}

impl<'a> MigrationGenerator<'a> {
    /// Create a generator using the configured stub overrides
    #[must_use]
    pub fn new(registry: &'a Registry) -> Self {
        Self {
            registry,
            stubs: StubStore::new(registry.config().stubs_path.clone()),
            now: Utc::now,
        }
    }

    /// Use a fixed clock for the file name timestamp
    #[must_use]
    pub fn with_clock(mut self, now: fn() -> DateTime<Utc>) -> Self {
        self.now = now;
        self
    }

    fn file_name(&self, table: &str) -> String {
        let timestamp = (self.now)().format("%Y%m%d%H%M%S");
        format!("{timestamp}_create_{table}_table.sql")
    }
}

impl ArtifactGenerator for MigrationGenerator<'_> {
    fn generate(&self, slug: &Slug, artifact_name: &str) -> RegistryResult<PathBuf> {
        let table = require_name(artifact_name, Naming::table(artifact_name))?;
        let module_dir = require_module(self.registry, slug)?;

        let dir = module_dir.join("database").join("migrations");
        create_dir(&dir)?;

        let bindings = Bindings::new()
            .with(Placeholder::Module, slug.as_str())
            .with(Placeholder::Table, table.as_str());

        let path = dir.join(self.file_name(&table));
        let contents = TemplateRenderer::render(&self.stubs.load(Stub::Migration)?, &bindings);
        write_file(&path, &contents)?;

        tracing::info!(module = %slug, table = %table, "Migration created");
        Ok(path)
    }
}
