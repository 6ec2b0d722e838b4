//! `module:make:migration` command

use acton_modules::scaffold::{ArtifactGenerator, MigrationGenerator};
use acton_modules::{Registry, Slug};
use anyhow::Result;
use console::style;

use super::SUCCESS;

/// Create a migration inside an existing module
pub struct MakeMigrationCommand<'a> {
    module: Slug,
    table: &'a str,
}

impl<'a> MakeMigrationCommand<'a> {
    /// Create a new command instance
    #[must_use]
    pub const fn new(module: Slug, table: &'a str) -> Self {
        Self { module, table }
    }

    /// Execute the command
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the module does not exist, or an I/O failure.
    pub fn execute(&self, registry: &Registry) -> Result<()> {
        let path = MigrationGenerator::new(registry).generate(&self.module, self.table)?;
        let shown = path.strip_prefix(registry.root_path()).unwrap_or(&path);

        println!(
            "{} {} {}",
            SUCCESS,
            style("Created migration:").green().bold(),
            style(shown.display()).cyan()
        );
        Ok(())
    }
}
