//! `module:make:controller` command

use acton_modules::scaffold::{ArtifactGenerator, ControllerGenerator};
use acton_modules::{Registry, Slug};
use anyhow::Result;
use console::style;

use super::SUCCESS;

/// Create a controller inside an existing module
pub struct MakeControllerCommand<'a> {
    module: Slug,
    name: &'a str,
}

impl<'a> MakeControllerCommand<'a> {
    /// Create a new command instance
    #[must_use]
    pub const fn new(module: Slug, name: &'a str) -> Self {
        Self { module, name }
    }

    /// Execute the command
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the module does not exist, or an I/O failure.
    pub fn execute(&self, registry: &Registry) -> Result<()> {
        let path = ControllerGenerator::new(registry).generate(&self.module, self.name)?;
        let shown = path.strip_prefix(registry.root_path()).unwrap_or(&path);

        println!(
            "{} {} {}",
            SUCCESS,
            style("Created controller:").green().bold(),
            style(shown.display()).cyan()
        );
        Ok(())
    }
}
