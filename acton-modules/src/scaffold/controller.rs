//! Controller generator

use super::{create_dir, require_module, require_name, write_file, ArtifactGenerator};
use crate::error::RegistryResult;
use crate::module::Slug;
use crate::naming::Naming;
use crate::registry::Registry;
use crate::template::{Bindings, Placeholder, Stub, StubStore, TemplateRenderer};
use std::path::PathBuf;

const CONTROLLERS_DIR: [&str; 2] = ["http", "controllers"];

/// Writes `http/controllers/<snake_name>.rs` into an existing module
pub struct ControllerGenerator<'a> {
    registry: &'a Registry,
    stubs: StubStore,
}

impl<'a> ControllerGenerator<'a> {
    /// Create a generator using the configured stub overrides
    #[must_use]
    pub fn new(registry: &'a Registry) -> Self {
        Self {
            registry,
            stubs: StubStore::new(registry.config().stubs_path.clone()),
        }
    }
}

impl ArtifactGenerator for ControllerGenerator<'_> {
    fn generate(&self, slug: &Slug, artifact_name: &str) -> RegistryResult<PathBuf> {
        let class_name = require_name(artifact_name, Naming::studly(artifact_name))?;
        let module_dir = require_module(self.registry, slug)?;

        let dir = CONTROLLERS_DIR.iter().fold(module_dir, |p, s| p.join(s));
        create_dir(&dir)?;

        let bindings = Bindings::new()
            .with(Placeholder::ClassName, class_name.as_str())
            .with(Placeholder::ModuleName, slug.name())
            .with(
                Placeholder::Namespace,
                self.registry.paths().artifact_namespace(slug, &CONTROLLERS_DIR),
            );

        let path = dir.join(Naming::file_name(&class_name));
        let contents = TemplateRenderer::render(&self.stubs.load(Stub::Controller)?, &bindings);
        write_file(&path, &contents)?;

        tracing::info!(module = %slug, controller = %class_name, "Controller created");
        Ok(path)
    }
}
