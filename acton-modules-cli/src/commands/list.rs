//! `module:list` command

use acton_modules::{Module, Registry, RegistryResult};
use anyhow::Result;
use console::style;
use serde_json::Value;

use super::INFO;

/// Which modules to show
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ListFilter {
    /// Every module
    #[default]
    All,
    /// Enabled modules only
    Enabled,
    /// Disabled modules only
    Disabled,
}

/// Options for `module:list`
#[derive(Debug, Clone, Default)]
pub struct ListOptions {
    /// Enabled/disabled filter
    pub filter: ListFilter,
    /// Property to sort by
    pub sort: Option<String>,
    /// Sort descending
    pub descending: bool,
}

/// Print a table of modules
pub struct ListCommand {
    options: ListOptions,
}

impl ListCommand {
    /// Create a new command instance
    #[must_use]
    pub const fn new(options: ListOptions) -> Self {
        Self { options }
    }

    /// Modules matching the options, in display order
    ///
    /// # Errors
    ///
    /// Returns a storage error if the repository cannot be read.
    pub fn select(&self, registry: &Registry) -> RegistryResult<Vec<Module>> {
        let modules = match (&self.options.sort, self.options.descending) {
            (Some(key), false) => registry.sort_by(key)?,
            (Some(key), true) => registry.sort_by_desc(key)?,
            (None, _) => registry.all()?,
        };

        Ok(modules
            .into_iter()
            .filter(|m| match self.options.filter {
                ListFilter::All => true,
                ListFilter::Enabled => m.is_enabled(),
                ListFilter::Disabled => !m.is_enabled(),
            })
            .collect())
    }

    /// Execute the command
    ///
    /// # Errors
    ///
    /// Returns a storage error if the repository cannot be read.
    pub fn execute(&self, registry: &Registry) -> Result<()> {
        let modules = self.select(registry)?;

        if modules.is_empty() {
            println!("{} {}", INFO, style("No modules found.").dim());
            return Ok(());
        }

        println!("{:<20} {:<24} {:<8} {:<10}", "Slug", "Name", "Order", "Status");
        println!("{}", "─".repeat(64));
        for module in &modules {
            let order = module.property("order").map_or_else(String::new, display_value);
            let status = if module.is_enabled() {
                style("Enabled").green()
            } else {
                style("Disabled").red()
            };
            println!(
                "{:<20} {:<24} {:<8} {:<10}",
                module.slug().as_str(),
                module.name(),
                order,
                status
            );
        }
        println!();
        println!("{} {} module(s)", INFO, modules.len());
        Ok(())
    }
}

fn display_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
