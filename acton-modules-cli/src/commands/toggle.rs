//! `module:enable` / `module:disable` commands

use acton_modules::{Registry, Slug};
use anyhow::Result;
use console::style;

use super::SUCCESS;

/// Flip a module's `enabled` flag
pub struct ToggleCommand {
    slug: Slug,
    enable: bool,
}

impl ToggleCommand {
    /// Enable `slug`
    #[must_use]
    pub const fn enable(slug: Slug) -> Self {
        Self { slug, enable: true }
    }

    /// Disable `slug`
    #[must_use]
    pub const fn disable(slug: Slug) -> Self {
        Self {
            slug,
            enable: false,
        }
    }

    /// Execute the command
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the module does not exist, or a storage failure.
    pub fn execute(&self, registry: &Registry) -> Result<()> {
        let state = if self.enable {
            registry.enable(&self.slug)?;
            style("enabled").green()
        } else {
            registry.disable(&self.slug)?;
            style("disabled").yellow()
        };

        println!("{} Module {} {}", SUCCESS, style(&self.slug).cyan().bold(), state);
        Ok(())
    }
}
