//! `module:make` command

use acton_modules::{Registry, ScaffoldGenerator, ScaffoldReport};
use anyhow::{Context, Result};
use console::style;
use indicatif::{ProgressBar, ProgressStyle};

use super::SUCCESS;

/// Scaffold a new module
pub struct MakeCommand<'a> {
    name: &'a str,
}

impl<'a> MakeCommand<'a> {
    /// Create a new command instance
    #[must_use]
    pub const fn new(name: &'a str) -> Self {
        Self { name }
    }

    /// Execute the command
    ///
    /// # Errors
    ///
    /// Returns the generator error, e.g. `AlreadyExists` or an I/O failure.
    pub fn execute(&self, registry: &Registry) -> Result<()> {
        println!(
            "{} {} {}",
            style("Creating").green().bold(),
            style("module:").bold(),
            style(self.name).cyan().bold()
        );

        let spinner = ProgressBar::new_spinner();
        spinner.set_style(
            ProgressStyle::default_spinner()
                .template("{spinner:.green} {msg}")
                .context("Failed to set progress style")?,
        );
        spinner.enable_steady_tick(std::time::Duration::from_millis(100));
        spinner.set_message("Generating module structure...");

        let result = ScaffoldGenerator::new(registry).generate(self.name);
        spinner.finish_and_clear();

        let report = result?;
        Self::print_success(registry, &report);
        Ok(())
    }

    fn print_success(registry: &Registry, report: &ScaffoldReport) {
        let root = registry.root_path();
        let module_dir = &report.directories[0];

        println!();
        println!("{} {}", SUCCESS, style("Module created successfully!").green().bold());
        println!();
        println!("  {}       {}", style("Path:").bold(), module_dir.display());
        println!(
            "  {}  {}",
            style("Namespace:").bold(),
            registry.module_namespace(report.module.slug())
        );
        println!();
        println!("{} {} files:", style("Generated").green().bold(), report.files.len());
        for file in report.files.iter().filter(|f| !f.ends_with(".gitkeep")) {
            let shown = file.strip_prefix(root).unwrap_or(file);
            println!("  {} {}", style("+").green(), shown.display());
        }
        println!();
        println!("{}", style("Next steps:").bold());
        println!(
            "  {} Add a controller: {}",
            style("1.").cyan(),
            style(format!(
                "acton-modules module:make:controller {} <Name>",
                report.module.slug()
            ))
            .cyan()
        );
        println!(
            "  {} Add a migration:  {}",
            style("2.").cyan(),
            style(format!(
                "acton-modules module:make:migration {} <table>",
                report.module.slug()
            ))
            .cyan()
        );
    }
}
