//! acton-modules CLI library

pub mod commands;

use acton_modules::{ModulesConfig, Registry, RegistryError};
use anyhow::{Context, Result};
use clap::Parser;
use commands::ModuleCommand;
use console::style;
use std::path::PathBuf;

pub use commands::{ListFilter, ListOptions};

/// Command line interface
#[derive(Debug, Parser)]
#[command(name = "acton-modules")]
#[command(version)]
#[command(about = "Scaffold and manage application modules", long_about = None)]
pub struct Cli {
    /// Configuration file (defaults to the standard search path)
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[allow(missing_docs)]
    #[command(subcommand)]
    pub command: ModuleCommand,
}

impl Cli {
    /// Load configuration, open the registry and run the command
    ///
    /// Validation failures (unknown module, module already exists, invalid
    /// name) are printed and treated as success. Anything else is returned.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration cannot be loaded, the repository cannot
    /// be opened, or a filesystem/storage operation fails.
    pub fn run(&self) -> Result<()> {
        let config = self.load_config()?;
        tracing::debug!(root = %config.path.display(), driver = ?config.driver, "Configuration loaded");

        let registry = Registry::new(config).context("Failed to open module repository")?;

        match self.command.execute(&registry) {
            Ok(()) => Ok(()),
            Err(err) => match err.downcast_ref::<RegistryError>() {
                Some(e) if e.is_validation() => {
                    report_validation(e);
                    Ok(())
                }
                _ => Err(err),
            },
        }
    }

    fn load_config(&self) -> Result<ModulesConfig> {
        match &self.config {
            Some(path) => ModulesConfig::load_from(path)
                .with_context(|| format!("Failed to load configuration from {}", path.display())),
            None => ModulesConfig::load().context("Failed to load configuration"),
        }
    }
}

fn report_validation(error: &RegistryError) {
    match error {
        RegistryError::AlreadyExists(_) => {
            println!("{} {}", commands::INFO, style(error).yellow());
        }
        _ => {
            eprintln!("{} {}", style("Error:").red().bold(), error);
        }
    }
}
